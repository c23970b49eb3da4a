pub mod models;
pub mod routes;
pub mod services;

use serde::Deserialize;
use spectree::Config;

/// Settings read from `application.yaml`.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub addr: String,
    pub spectree: Config,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:3000".to_string(),
            spectree: Config::new("User Service", "1.0.0"),
        }
    }
}

impl AppConfig {
    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Ok(serde_yaml::from_str(&raw)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }
}
