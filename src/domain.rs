//! Domain models: questions, categories, listing retrieval modes and quiz scope.

use serde::{Deserialize, Serialize};

/// A trivia question as served by the backend. Ids are server-assigned.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
  pub id: i64,
  pub question: String,
  pub answer: String,
  pub category: i64,
  pub difficulty: i64,
}

/// Read-only reference data.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
  pub id: i64,
  #[serde(rename = "type")]
  pub kind: String,
}

/// Which filter currently governs the question listing.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum RetrievalMode {
  #[default]
  All,
  ByCategory(i64),
  BySearch(String),
}

impl RetrievalMode {
  pub fn label(&self) -> &'static str {
    match self {
      RetrievalMode::All => "all",
      RetrievalMode::ByCategory(_) => "by_category",
      RetrievalMode::BySearch(_) => "by_search",
    }
  }
}

/// Category scope of a quiz session. `All` plays across every category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizScope {
  All,
  Category(Category),
}

impl QuizScope {
  /// Id sent to the backend; 0 stands for every category.
  pub fn category_id(&self) -> i64 {
    match self {
      QuizScope::All => 0,
      QuizScope::Category(c) => c.id,
    }
  }

  pub fn display_name(&self) -> &str {
    match self {
      QuizScope::All => "ALL",
      QuizScope::Category(c) => &c.kind,
    }
  }
}
