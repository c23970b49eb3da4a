use serde::Deserialize;
use std::str::FromStr;

/// Which discovered routes a documentation instance claims.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Every route except those decorated by another instance.
    #[default]
    Normal,
    /// Every route, whoever decorated it.
    Greedy,
    /// Only routes decorated by this instance.
    Strict,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Greedy => "greedy",
            Mode::Strict => "strict",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Mode::Normal),
            "greedy" => Ok(Mode::Greedy),
            "strict" => Ok(Mode::Strict),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

/// Interactive documentation page served next to the JSON document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocsUi {
    #[default]
    Redoc,
    Swagger,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownMode(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::UnknownMode(mode) => {
                write!(f, "Unknown mode '{mode}': expected normal, greedy or strict")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Construction-time options of a [`SpecTree`](crate::SpecTree).
///
/// Built in code with the `with_*` methods, or deserialized from the host
/// application's own configuration (missing keys fall back to defaults).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub version: String,
    pub openapi_version: String,
    pub mode: Mode,
    /// URL prefix of the documentation routes, without slashes.
    pub path: String,
    pub filename: String,
    pub ui: DocsUi,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Service API Document".to_string(),
            version: "0.1".to_string(),
            openapi_version: "3.0.3".to_string(),
            mode: Mode::Normal,
            path: "apidoc".to_string(),
            filename: "openapi.json".to_string(),
            ui: DocsUi::Redoc,
        }
    }
}

impl Config {
    pub fn new(title: &str, version: &str) -> Self {
        Self {
            title: title.to_string(),
            version: version.to_string(),
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_openapi_version(mut self, version: &str) -> Self {
        self.openapi_version = version.to_string();
        self
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.trim_matches('/').to_string();
        self
    }

    pub fn with_filename(mut self, filename: &str) -> Self {
        self.filename = filename.trim_matches('/').to_string();
        self
    }

    pub fn with_ui(mut self, ui: DocsUi) -> Self {
        self.ui = ui;
        self
    }

    /// URL the JSON document is served at, e.g. `/apidoc/openapi.json`.
    pub fn spec_url(&self) -> String {
        format!("/{}/{}", self.path.trim_matches('/'), self.filename)
    }

    /// URL of the documentation page, if one is enabled.
    pub fn ui_url(&self) -> Option<String> {
        let page = match self.ui {
            DocsUi::Redoc => "redoc",
            DocsUi::Swagger => "swagger",
            DocsUi::Disabled => return None,
        };
        Some(format!("/{}/{page}", self.path.trim_matches('/')))
    }
}
