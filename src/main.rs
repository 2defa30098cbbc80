/*****************************************************************************************
 *
 *  minisite – Personal Website Backend in Rust
 *  ---------------------------------------------
 *
 *  Serves the site's pages over HTTP and relays contact-form submissions over
 *  a loopback datagram channel to a receiver that persists them as JSON.
 *
 *****************************************************************************************/

mod app;
mod config;
mod errors;
mod persistence;
mod receiver;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;

use axum::serve;
use tokio::net::{TcpListener, UdpSocket};
use tokio::task;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::FmtSubscriber;

use crate::config::AppConfig;
use crate::state::app::AppState;

#[tokio::main]
async fn main() {
    //
    // ────────────────────────────────────────────────────────
    //  Load configuration (optional config.json in the CWD)
    // ────────────────────────────────────────────────────────
    //
    let cfg = AppConfig::load();

    //
    // ────────────────────────────────────────────────────────
    //  Configure logging
    // ────────────────────────────────────────────────────────
    //
    let level = match cfg.log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => LevelFilter::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    tracing::info!("Starting minisite…");
    tracing::info!("Loaded configuration: {:?}", cfg);

    //
    // ────────────────────────────────────────────────────────
    //  Ensure the submission store exists before any listener
    // ────────────────────────────────────────────────────────
    //
    persistence::init_store_file(&cfg.storage_file)
        .expect("Failed to initialize the submission store");

    //
    // ────────────────────────────────────────────────────────
    //  Bind the datagram socket and spawn the receiver
    // ────────────────────────────────────────────────────────
    //
    let socket = UdpSocket::bind(cfg.socket_addr)
        .await
        .expect("Failed to bind datagram socket");

    {
        let storage = cfg.storage_file.clone();

        task::spawn(async move {
            receiver::run(socket, storage).await;
        });
    }

    //
    // ────────────────────────────────────────────────────────
    //  Build the Axum app, bind and start listening
    // ────────────────────────────────────────────────────────
    //
    let state = AppState::new(cfg.clone()).expect("Failed to load templates");
    let app = app::build_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    tracing::info!("Listening on http://{}", addr);

    serve(listener, app)
        .with_graceful_shutdown(shutdown())
        .await
        .expect("Server error");
}

//
// ─────────────────────────────────────────────────────────────
//  Graceful shutdown handler
// ─────────────────────────────────────────────────────────────
//
async fn shutdown() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");

    tracing::warn!("CTRL+C received, shutting down");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    use serde_json::Value;
    use tempfile::tempdir;
    use tokio::net::{TcpListener, UdpSocket};
    use tokio::time::sleep;

    use crate::config::AppConfig;
    use crate::state::app::AppState;
    use crate::{app, persistence, receiver};

    fn write_fixtures(dir: &Path) {
        fs::write(dir.join("index.html"), "<h1>Home</h1>").unwrap();
        fs::write(dir.join("message.html"), "<form></form>").unwrap();
        fs::write(dir.join("error.html"), "<h1>Nothing here</h1>").unwrap();
        fs::write(dir.join("about_me.json"), r#"[{"title": "First post"}]"#).unwrap();

        let templates = dir.join("templates");
        fs::create_dir_all(&templates).unwrap();
        fs::write(
            templates.join("about_me.html"),
            "{% for blog in blogs %}{{ blog.title }}{% endfor %}",
        )
        .unwrap();
    }

    async fn wait_for_record(path: &Path, key: &str, value: &str) -> bool {
        for _ in 0..200 {
            if let Ok(data) = fs::read_to_string(path) {
                if let Ok(Value::Object(root)) = serde_json::from_str(&data) {
                    if root.values().any(|rec| rec[key] == *value) {
                        return true;
                    }
                }
            }
            sleep(Duration::from_millis(25)).await;
        }
        false
    }

    /// Wire everything the way `main` does, on ephemeral ports, and check
    /// that both listeners are live at the same time: HTTP answers while a
    /// datagram sent directly to the receiver is persisted too.
    #[tokio::test]
    async fn test_both_listeners_are_independently_live() {
        let dir = tempdir().unwrap();
        write_fixtures(dir.path());

        let udp = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let udp_addr = udp.local_addr().unwrap();

        let cfg = AppConfig {
            socket_addr: udp_addr,
            storage_file: dir.path().join("storage").join("data.json"),
            static_root: dir.path().to_path_buf(),
            index_file: dir.path().join("index.html"),
            message_file: dir.path().join("message.html"),
            error_file: dir.path().join("error.html"),
            about_data_file: dir.path().join("about_me.json"),
            templates_dir: dir.path().join("templates").to_string_lossy().into_owned(),
            ..AppConfig::default()
        };

        persistence::init_store_file(&cfg.storage_file).unwrap();
        tokio::spawn(receiver::run(udp, cfg.storage_file.clone()));

        let state = AppState::new(cfg.clone()).unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let http_addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app::build_app(state)).await.unwrap();
        });

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        // HTTP front door is live.
        let resp = client
            .get(format!("http://{http_addr}/"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.text().await.unwrap(), "<h1>Home</h1>");

        // Full submission round trip: POST, 302 back, datagram, store entry.
        let resp = client
            .post(format!("http://{http_addr}/message"))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body("name=Ann&text=Hi")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 302);
        assert_eq!(resp.headers()["location"], "/");
        assert!(wait_for_record(&cfg.storage_file, "name", "Ann").await);

        // The receiver is live in its own right: a datagram that bypasses
        // HTTP entirely is persisted as well.
        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender.send_to(b"direct=yes", udp_addr).await.unwrap();
        assert!(wait_for_record(&cfg.storage_file, "direct", "yes").await);
    }
}
