use std::path::PathBuf;

use tokio::net::UdpSocket;

use crate::persistence;

/// Largest datagram read per receive; longer payloads are truncated, which is
/// the transport's own behavior for oversized messages.
pub const MAX_DATAGRAM_LEN: usize = 1024;

/// Receive loop for relayed form submissions.
///
/// Each packet is handled to completion before the next receive; the store
/// file has no other writer. Bad packets and receive errors are logged and
/// the loop keeps going. The socket is released when the task is dropped at
/// process shutdown.
pub async fn run(socket: UdpSocket, storage_file: PathBuf) {
    match socket.local_addr() {
        Ok(addr) => tracing::info!("Receiving submissions on {addr}"),
        Err(e) => tracing::warn!("Receiver socket has no local address: {e}"),
    }

    let mut buf = [0u8; MAX_DATAGRAM_LEN];

    loop {
        match socket.recv_from(&mut buf).await {
            Ok((len, from)) => {
                tracing::debug!("Received {len} bytes from {from}");
                persistence::save_submission(&storage_file, &buf[..len]);
            }
            Err(e) => tracing::warn!("Datagram receive failed: {e}"),
        }
    }
}
