//! Trivia · terminal client
//!
//! - Browse questions page by page (all, by category, by search), delete them
//! - Play a quiz of up to `questions_per_play` questions
//!
//! Important env variables:
//!   API_SERVER          : backend base URL (default "http://localhost:5000")
//!   TRIVIA_CONFIG_PATH  : path to TOML config (page sizes, timeout, server)
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

use std::sync::Arc;

use tracing::info;

use trivia_client::host::Host;
use trivia_client::telemetry;
use trivia_client::{ClientConfig, HttpBackend, TriviaBackend};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let config = ClientConfig::from_env();
  info!(
    target: "trivia_client",
    api_server = %config.api_server,
    listing_page_size = config.listing_page_size,
    questions_per_play = config.questions_per_play,
    "starting"
  );

  let backend: Arc<dyn TriviaBackend> = Arc::new(HttpBackend::new(&config)?);
  Host::new(backend, &config).run().await?;
  Ok(())
}
