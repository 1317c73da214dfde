//! User-facing notifications: blocking alerts and the confirmation gate used
//! before destructive actions.

use async_trait::async_trait;

#[async_trait]
pub trait Notifier: Send + Sync {
  /// Show a message the user has to acknowledge.
  async fn alert(&self, message: &str);

  /// Ask a yes/no question. `false` means the action is abandoned.
  async fn confirm(&self, prompt: &str) -> bool;
}

/// Alert texts, one per failed operation.
pub mod messages {
  pub const LOAD_QUESTIONS: &str = "Unable to load questions. Please try your request again";
  pub const SEARCH: &str = "Unable to search questions. Please try your request again";
  pub const DELETE: &str = "Unable to delete the question. Please try your request again";
  pub const LOAD_CATEGORIES: &str = "Unable to load categories. Please try your request again";
  pub const LOAD_QUIZ_QUESTION: &str = "Unable to load question. Please try your request again";
  pub const CONFIRM_DELETE: &str = "are you sure you want to delete the question?";
}
