//! HTTP client for the trivia backend.
//!
//! Controllers talk to the backend through the `TriviaBackend` trait so they
//! can be driven by an in-memory fake in tests. `HttpBackend` is the reqwest
//! implementation. Calls log method, path, status and latency (never bodies).

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

use crate::config::ClientConfig;
use crate::domain::QuizScope;
use crate::protocol::{CategoriesOut, QuestionsPage, QuizIn, QuizOut, QuizTurn, SearchIn};
use crate::util::trunc_for_log;

/// The only error kind: network failure, non-2xx status or an undecodable body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
  pub operation: &'static str,
  pub detail: String,
}

impl TransportFailure {
  pub fn new(operation: &'static str, detail: impl Into<String>) -> Self {
    Self { operation, detail: detail.into() }
  }
}

impl std::fmt::Display for TransportFailure {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} failed: {}", self.operation, self.detail)
  }
}

impl std::error::Error for TransportFailure {}

#[async_trait]
pub trait TriviaBackend: Send + Sync {
  async fn list_questions(&self, page: u32) -> Result<QuestionsPage, TransportFailure>;
  async fn list_by_category(&self, category_id: i64, page: u32) -> Result<QuestionsPage, TransportFailure>;
  async fn search_questions(&self, term: &str, page: u32) -> Result<QuestionsPage, TransportFailure>;
  async fn delete_question(&self, id: i64) -> Result<(), TransportFailure>;
  async fn list_categories(&self) -> Result<BTreeMap<i64, String>, TransportFailure>;
  async fn next_quiz_question(&self, previous: &[i64], scope: &QuizScope) -> Result<QuizTurn, TransportFailure>;
}

#[derive(Clone)]
pub struct HttpBackend {
  pub client: reqwest::Client,
  pub base_url: String,
}

impl HttpBackend {
  pub fn new(config: &ClientConfig) -> Result<Self, TransportFailure> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.request_timeout_secs))
      .build()
      .map_err(|e| TransportFailure::new("build http client", e.to_string()))?;
    Ok(Self { client, base_url: config.api_server.clone() })
  }

  fn request(&self, method: Method, path: &str) -> RequestBuilder {
    self.client
      .request(method, format!("{}{}", self.base_url, path))
      .header(USER_AGENT, "trivia-client/0.1")
  }

  /// Send, check the status and hand back the raw response.
  async fn send(&self, operation: &'static str, method: Method, path: &str, req: RequestBuilder) -> Result<reqwest::Response, TransportFailure> {
    let start = Instant::now();
    let res = req.send().await.map_err(|e| {
      error!(target: "trivia_client", %method, %path, error = %e, "request failed");
      TransportFailure::new(operation, e.to_string())
    })?;
    let status = res.status();
    let elapsed = start.elapsed();
    if !status.is_success() {
      let body = res.text().await.unwrap_or_default();
      error!(target: "trivia_client", %method, %path, %status, ?elapsed, body = %trunc_for_log(&body, 200), "non-success status");
      return Err(TransportFailure::new(operation, format!("HTTP {}", status)));
    }
    debug!(target: "trivia_client", %method, %path, %status, ?elapsed, "response received");
    Ok(res)
  }

  async fn send_json<T: DeserializeOwned>(&self, operation: &'static str, method: Method, path: &str, req: RequestBuilder) -> Result<T, TransportFailure> {
    let res = self.send(operation, method, path, req).await?;
    res.json::<T>().await.map_err(|e| {
      error!(target: "trivia_client", %path, error = %e, "undecodable response body");
      TransportFailure::new(operation, format!("JSON decode error: {}", e))
    })
  }
}

#[async_trait]
impl TriviaBackend for HttpBackend {
  #[instrument(level = "info", skip(self))]
  async fn list_questions(&self, page: u32) -> Result<QuestionsPage, TransportFailure> {
    let path = "/questions";
    let req = self.request(Method::GET, path).query(&[("page", page)]);
    self.send_json("list questions", Method::GET, path, req).await
  }

  #[instrument(level = "info", skip(self))]
  async fn list_by_category(&self, category_id: i64, page: u32) -> Result<QuestionsPage, TransportFailure> {
    let path = format!("/categories/{}/questions", category_id);
    let req = self.request(Method::GET, &path).query(&[("page", page)]);
    self.send_json("list questions by category", Method::GET, &path, req).await
  }

  #[instrument(level = "info", skip(self, term), fields(term_len = term.len()))]
  async fn search_questions(&self, term: &str, page: u32) -> Result<QuestionsPage, TransportFailure> {
    let path = "/questions/search";
    // The reference backend pages search results from the query string.
    let req = self
      .request(Method::POST, path)
      .query(&[("page", page)])
      .header(CONTENT_TYPE, "application/json")
      .json(&SearchIn { search_term: term, page });
    self.send_json("search questions", Method::POST, path, req).await
  }

  #[instrument(level = "info", skip(self))]
  async fn delete_question(&self, id: i64) -> Result<(), TransportFailure> {
    let path = format!("/questions/{}", id);
    let req = self.request(Method::DELETE, &path);
    self.send("delete question", Method::DELETE, &path, req).await.map(|_| ())
  }

  #[instrument(level = "info", skip(self))]
  async fn list_categories(&self) -> Result<BTreeMap<i64, String>, TransportFailure> {
    let path = "/categories";
    let req = self.request(Method::GET, path);
    let out: CategoriesOut = self.send_json("list categories", Method::GET, path, req).await?;
    Ok(out.categories)
  }

  #[instrument(level = "info", skip(self, previous), fields(previous = previous.len(), category = scope.category_id()))]
  async fn next_quiz_question(&self, previous: &[i64], scope: &QuizScope) -> Result<QuizTurn, TransportFailure> {
    let path = "/quizzes";
    let body = QuizIn { previous_questions: previous, quiz_category: scope.into() };
    let req = self
      .request(Method::POST, path)
      .header(CONTENT_TYPE, "application/json")
      .json(&body);
    let out: QuizOut = self.send_json("load quiz question", Method::POST, path, req).await?;
    QuizTurn::try_from(out).map_err(|e| TransportFailure::new("load quiz question", format!("JSON decode error: {}", e)))
  }
}
