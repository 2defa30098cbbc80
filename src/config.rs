use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::{fs, path::Path};

/// Every path and address the server uses lives here; components receive the
/// struct instead of reaching for module-level constants.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP port to listen on (all interfaces).
    pub port: u16,

    /// Log level for tracing (e.g. "info", "debug").
    pub log_level: String,

    /// Loopback address the datagram receiver binds; form submissions are
    /// relayed here.
    pub socket_addr: SocketAddr,

    /// Path to the submission store JSON file.
    pub storage_file: PathBuf,

    /// Directory static asset paths are resolved against.
    pub static_root: PathBuf,

    /// HTML file served for `/`.
    pub index_file: PathBuf,

    /// HTML file served for `/message`.
    pub message_file: PathBuf,

    /// HTML file served with a 404 status for unknown paths.
    pub error_file: PathBuf,

    /// JSON document feeding the about-page template.
    pub about_data_file: PathBuf,

    /// Template rendered for `/about_me`.
    pub about_template: String,

    /// Directory scanned for HTML templates.
    pub templates_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            log_level: "info".to_string(),
            socket_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 5000)),
            storage_file: PathBuf::from("storage/data.json"),
            static_root: PathBuf::from("."),
            index_file: PathBuf::from("index.html"),
            message_file: PathBuf::from("message.html"),
            error_file: PathBuf::from("error.html"),
            about_data_file: PathBuf::from("about_me.json"),
            about_template: "about_me.html".to_string(),
            templates_dir: "templates".to_string(),
        }
    }
}

impl AppConfig {
    /// Load `config.json` from the working directory. A missing file means
    /// the defaults above; a present-but-malformed file is a startup error.
    pub fn load() -> Self {
        Self::load_from_file(Path::new("config.json"))
    }

    pub fn load_from_file(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let file = fs::read_to_string(path).expect("Failed to read config.json");

        serde_json::from_str::<AppConfig>(&file).expect("Invalid config.json")
    }
}
