use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::Local;
use serde_json::{Map, Value};

use crate::errors::SiteError;
use crate::services::form_service;

/// Format of the store's timestamp keys. Second resolution: two submissions
/// landing in the same second share a key and the later one wins.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Make sure the store file exists before any listener starts.
///
/// Creates the parent directory and an empty JSON object on first run; an
/// existing file is left untouched.
pub fn init_store_file(path: &Path) -> Result<(), SiteError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }

    if !path.exists() {
        fs::write(path, "{}")?;
        tracing::info!("Initialized empty submission store at {}", path.display());
    }

    Ok(())
}

/// Persist one raw datagram payload.
///
/// Never propagates: the receiver loop has to survive any bad packet or I/O
/// hiccup, so failures are logged and the payload is dropped with the store
/// left as it was.
pub fn save_submission(path: &Path, raw: &[u8]) {
    match persist_submission(path, raw) {
        Ok(stamp) => tracing::info!("Stored submission under {stamp:?}"),
        Err(e) => tracing::warn!("Dropped submission: {e}"),
    }
}

fn persist_submission(path: &Path, raw: &[u8]) -> Result<String, SiteError> {
    let fields = form_service::decode_form(raw)?;
    let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();

    write_record(path, &stamp, &fields)?;

    Ok(stamp)
}

/// Read-modify-write cycle over the whole store file.
///
/// The rewrite is a plain overwrite, not a write-temp-then-rename: a crash in
/// the middle can corrupt the file. Known open issue.
fn write_record(
    path: &Path,
    stamp: &str,
    fields: &BTreeMap<String, String>,
) -> Result<(), SiteError> {
    let mut root = read_store(path)?;

    let record: Map<String, Value> = fields
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    root.insert(stamp.to_string(), Value::Object(record));

    fs::write(path, serde_json::to_string_pretty(&Value::Object(root))?)?;

    Ok(())
}

/// Parse the store file as a JSON object, or start fresh when it is absent.
fn read_store(path: &Path) -> Result<Map<String, Value>, SiteError> {
    if !path.exists() {
        return Ok(Map::new());
    }

    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}
