//! Tracing setup for the terminal client.
//!
//! `LOG_LEVEL` takes any `EnvFilter` directive string, for example
//! `"warn,listing=trace"`. `LOG_FORMAT=json` emits one JSON object per event;
//! anything else gives the human-readable format. Output goes to stderr so
//! it never interleaves with the listing and quiz views on stdout.

use tracing_subscriber::EnvFilter;

/// Directives used when `LOG_LEVEL` is unset or unparsable.
const DEFAULT_FILTER: &str = "info,trivia_client=debug,listing=debug,quiz=debug";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn from_setting(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_tracing() {
    let format = LogFormat::from_setting(std::env::var("LOG_FORMAT").ok().as_deref());
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }
}
