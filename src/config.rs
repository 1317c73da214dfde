//! Client configuration loaded from TOML plus environment overrides.
//!
//! Schema (every key optional):
//!
//! ```toml
//! api_server = "http://localhost:5000"
//! listing_page_size = 6
//! questions_per_play = 5
//! request_timeout_secs = 20
//! ```

use serde::Deserialize;
use tracing::{error, info, warn};

pub const DEFAULT_API_SERVER: &str = "http://localhost:5000";
pub const DEFAULT_LISTING_PAGE_SIZE: u32 = 6;
pub const DEFAULT_QUESTIONS_PER_PLAY: usize = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;

/// Shared by both controllers; handed over at construction.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
  pub api_server: String,
  pub listing_page_size: u32,
  pub questions_per_play: usize,
  pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      api_server: DEFAULT_API_SERVER.into(),
      listing_page_size: DEFAULT_LISTING_PAGE_SIZE,
      questions_per_play: DEFAULT_QUESTIONS_PER_PLAY,
      request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
    }
  }
}

impl ClientConfig {
  /// Parse a TOML document and normalize the result.
  pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
    toml::from_str::<ClientConfig>(s).map(ClientConfig::normalized)
  }

  /// Build from `TRIVIA_CONFIG_PATH` (if set) and `API_SERVER`.
  /// Read or parse errors are logged and fall back to defaults.
  pub fn from_env() -> Self {
    let mut cfg = match std::env::var("TRIVIA_CONFIG_PATH") {
      Ok(path) => load_file(&path).unwrap_or_default(),
      Err(_) => ClientConfig::default(),
    };
    if let Ok(server) = std::env::var("API_SERVER") {
      if !server.trim().is_empty() {
        cfg.api_server = server;
      }
    }
    cfg.normalized()
  }

  fn normalized(mut self) -> Self {
    self.api_server = self.api_server.trim().trim_end_matches('/').to_string();
    if self.api_server.is_empty() {
      self.api_server = DEFAULT_API_SERVER.into();
    }
    if self.listing_page_size == 0 {
      warn!(target: "trivia_client", "listing_page_size = 0 is invalid; using default");
      self.listing_page_size = DEFAULT_LISTING_PAGE_SIZE;
    }
    if self.questions_per_play == 0 {
      warn!(target: "trivia_client", "questions_per_play = 0 is invalid; using default");
      self.questions_per_play = DEFAULT_QUESTIONS_PER_PLAY;
    }
    self
  }
}

fn load_file(path: &str) -> Option<ClientConfig> {
  match std::fs::read_to_string(path) {
    Ok(s) => match ClientConfig::from_toml_str(&s) {
      Ok(cfg) => {
        info!(target: "trivia_client", %path, "Loaded client config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "trivia_client", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "trivia_client", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
