//! In-memory backend and notifier used by controller unit tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::api::{TransportFailure, TriviaBackend};
use crate::domain::{Question, QuizScope};
use crate::notify::Notifier;
use crate::protocol::{QuestionsPage, QuizTurn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
  ListAll { page: u32 },
  ByCategory { id: i64, page: u32 },
  Search { term: String, page: u32 },
  Delete { id: i64 },
  Categories,
  Quiz { previous: Vec<i64>, category: i64 },
}

pub fn question(id: i64, category: i64) -> Question {
  Question {
    id,
    question: format!("Question {id}?"),
    answer: format!("Answer {id}"),
    category,
    difficulty: 1,
  }
}

pub struct FakeBackend {
  pub questions: Mutex<Vec<Question>>,
  pub categories: BTreeMap<i64, String>,
  pub page_size: usize,
  pub calls: Mutex<Vec<Call>>,
  pub fail: AtomicBool,
  pub fail_refresh_after_delete: AtomicBool,
}

impl FakeBackend {
  /// `count` questions with ids 1..=count, alternating categories 1 and 2.
  pub fn with_questions(count: i64, page_size: usize) -> Self {
    let questions = (1..=count).map(|id| question(id, if id % 2 == 0 { 2 } else { 1 })).collect();
    let mut categories = BTreeMap::new();
    categories.insert(1, "Science".to_string());
    categories.insert(2, "Art".to_string());
    Self {
      questions: Mutex::new(questions),
      categories,
      page_size,
      calls: Mutex::new(Vec::new()),
      fail: AtomicBool::new(false),
      fail_refresh_after_delete: AtomicBool::new(false),
    }
  }

  pub fn set_failing(&self, failing: bool) {
    self.fail.store(failing, Ordering::SeqCst);
  }

  pub async fn calls(&self) -> Vec<Call> {
    self.calls.lock().await.clone()
  }

  pub async fn last_call(&self) -> Option<Call> {
    self.calls.lock().await.last().cloned()
  }

  async fn record(&self, call: Call) -> Result<(), TransportFailure> {
    self.calls.lock().await.push(call);
    if self.fail.load(Ordering::SeqCst) {
      return Err(TransportFailure::new("fake", "HTTP 500 Internal Server Error"));
    }
    Ok(())
  }

  fn page_of(&self, matching: Vec<Question>, page: u32) -> QuestionsPage {
    let start = (page.max(1) as usize - 1) * self.page_size;
    let total = matching.len() as u64;
    let questions = matching.into_iter().skip(start).take(self.page_size).collect();
    QuestionsPage {
      questions,
      total_questions: total,
      categories: Some(self.categories.clone()),
      current_category: None,
    }
  }
}

#[async_trait]
impl TriviaBackend for FakeBackend {
  async fn list_questions(&self, page: u32) -> Result<QuestionsPage, TransportFailure> {
    self.record(Call::ListAll { page }).await?;
    let all = self.questions.lock().await.clone();
    Ok(self.page_of(all, page))
  }

  async fn list_by_category(&self, category_id: i64, page: u32) -> Result<QuestionsPage, TransportFailure> {
    self.record(Call::ByCategory { id: category_id, page }).await?;
    let matching = self.questions.lock().await.iter().filter(|q| q.category == category_id).cloned().collect();
    Ok(self.page_of(matching, page))
  }

  async fn search_questions(&self, term: &str, page: u32) -> Result<QuestionsPage, TransportFailure> {
    self.record(Call::Search { term: term.to_string(), page }).await?;
    let needle = term.to_lowercase();
    let matching = self
      .questions
      .lock()
      .await
      .iter()
      .filter(|q| q.question.to_lowercase().contains(&needle))
      .cloned()
      .collect();
    Ok(self.page_of(matching, page))
  }

  async fn delete_question(&self, id: i64) -> Result<(), TransportFailure> {
    self.record(Call::Delete { id }).await?;
    self.questions.lock().await.retain(|q| q.id != id);
    if self.fail_refresh_after_delete.load(Ordering::SeqCst) {
      self.set_failing(true);
    }
    Ok(())
  }

  async fn list_categories(&self) -> Result<BTreeMap<i64, String>, TransportFailure> {
    self.record(Call::Categories).await?;
    Ok(self.categories.clone())
  }

  async fn next_quiz_question(&self, previous: &[i64], scope: &QuizScope) -> Result<QuizTurn, TransportFailure> {
    let category = scope.category_id();
    self.record(Call::Quiz { previous: previous.to_vec(), category }).await?;
    let questions = self.questions.lock().await;
    let eligible: Vec<&Question> = questions.iter().filter(|q| category == 0 || q.category == category).collect();
    let total = eligible.len() as u64;
    let next = eligible.into_iter().find(|q| !previous.contains(&q.id)).cloned();
    Ok(QuizTurn { question: next, total_questions: Some(total) })
  }
}

#[derive(Default)]
pub struct RecordingNotifier {
  pub alerts: Mutex<Vec<String>>,
  pub decline: AtomicBool,
  pub confirms: AtomicU64,
}

impl RecordingNotifier {
  pub fn declining() -> Self {
    let n = Self::default();
    n.decline.store(true, Ordering::SeqCst);
    n
  }

  pub async fn alerts(&self) -> Vec<String> {
    self.alerts.lock().await.clone()
  }
}

#[async_trait]
impl Notifier for RecordingNotifier {
  async fn alert(&self, message: &str) {
    self.alerts.lock().await.push(message.to_string());
  }

  async fn confirm(&self, _prompt: &str) -> bool {
    self.confirms.fetch_add(1, Ordering::Relaxed);
    !self.decline.load(Ordering::SeqCst)
  }
}
