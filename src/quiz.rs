//! Quiz play: non-repeating question sequencing, grading and end detection.
//!
//! Lifecycle: `PreSelect -> InPlay <-> AnswerRevealed -> SessionEnded`,
//! with `restart` returning to `PreSelect` from anywhere.
//!
//! The backend decides which question comes next and how many are eligible;
//! the controller only keeps the served ids (in serving order) and replays
//! them on every request so nothing is served twice.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::api::{TransportFailure, TriviaBackend};
use crate::config::ClientConfig;
use crate::domain::{Question, QuizScope};
use crate::evaluator::is_match;
use crate::notify::{messages, Notifier};

pub const NEXT_QUESTION_LABEL: &str = "Next Question";
pub const FINISH_LABEL: &str = "How'd I do?";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuizSession {
  /// `None` until a category (or "all") is picked.
  pub category_scope: Option<QuizScope>,
  pub asked_ids: Vec<i64>,
  pub total_available: u64,
  pub current: Option<Question>,
  pub guess: String,
  pub revealed: bool,
  pub correct_count: u32,
  pub ended: bool,
  /// Grade of the current question once revealed.
  pub last_correct: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizPhase {
  PreSelect,
  InPlay,
  AnswerRevealed,
  SessionEnded,
}

/// What the host should show. Precedence: picker, final score, revealed
/// answer, question form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuizView {
  CategoryPicker { categories: BTreeMap<i64, String> },
  FinalScore { correct: u32 },
  RevealedAnswer { question: Question, correct: bool, next_label: &'static str },
  QuestionForm { question: Option<Question> },
}

pub struct QuizController {
  backend: Arc<dyn TriviaBackend>,
  notifier: Arc<dyn Notifier>,
  questions_per_play: usize,
  categories: BTreeMap<i64, String>,
  session: QuizSession,
}

impl QuizController {
  pub fn new(backend: Arc<dyn TriviaBackend>, notifier: Arc<dyn Notifier>, config: &ClientConfig) -> Self {
    Self {
      backend,
      notifier,
      questions_per_play: config.questions_per_play,
      categories: BTreeMap::new(),
      session: QuizSession::default(),
    }
  }

  pub fn session(&self) -> &QuizSession {
    &self.session
  }

  pub fn categories(&self) -> &BTreeMap<i64, String> {
    &self.categories
  }

  /// Category picker data.
  #[instrument(level = "info", skip(self))]
  pub async fn load_categories(&mut self) -> Result<(), TransportFailure> {
    match self.backend.list_categories().await {
      Ok(categories) => {
        debug!(target: "quiz", count = categories.len(), "categories loaded");
        self.categories = categories;
        Ok(())
      }
      Err(e) => {
        error!(target: "quiz", error = %e, "loading categories failed");
        self.notifier.alert(messages::LOAD_CATEGORIES).await;
        Err(e)
      }
    }
  }

  /// Start a session in `scope` and fetch its first question.
  #[instrument(level = "info", skip(self, scope), fields(category = scope.category_id()))]
  pub async fn select_category(&mut self, scope: QuizScope) -> Result<(), TransportFailure> {
    if self.session.category_scope.is_some() {
      warn!(target: "quiz", "category already chosen; restart first");
      return Ok(());
    }
    info!(target: "quiz", scope = scope.display_name(), "session started");
    self.session.category_scope = Some(scope);
    self.next_question().await
  }

  pub fn set_guess(&mut self, guess: impl Into<String>) {
    self.session.guess = guess.into();
  }

  /// Move past the current question and fetch the next one, or end the
  /// session when the cap is reached or the pool is known to be exhausted.
  #[instrument(level = "info", skip(self), fields(asked = self.session.asked_ids.len(), total = self.session.total_available))]
  pub async fn next_question(&mut self) -> Result<(), TransportFailure> {
    let Some(scope) = self.session.category_scope.clone() else {
      warn!(target: "quiz", "no category chosen");
      return Ok(());
    };
    if self.session.ended {
      return Ok(());
    }

    let mut asked = self.session.asked_ids.clone();
    if let Some(current) = &self.session.current {
      asked.push(current.id);
    }

    if asked.len() >= self.questions_per_play {
      info!(target: "quiz", asked = asked.len(), "question cap reached");
      self.finish(asked);
      return Ok(());
    }
    // Pre-emptive end: one short of the pool size is treated as exhausted.
    if !asked.is_empty() && self.session.total_available.checked_sub(1) == Some(asked.len() as u64) {
      info!(target: "quiz", asked = asked.len(), total = self.session.total_available, "pool exhausted; ending without fetch");
      self.finish(asked);
      return Ok(());
    }

    match self.backend.next_quiz_question(&asked, &scope).await {
      Ok(turn) => {
        if let Some(total) = turn.total_questions {
          self.session.total_available = total;
        }
        self.session.asked_ids = asked;
        self.session.revealed = false;
        self.session.guess.clear();
        self.session.last_correct = None;
        match turn.question {
          Some(q) => {
            debug!(target: "quiz", id = q.id, "question served");
            self.session.current = Some(q);
          }
          None => {
            info!(target: "quiz", "backend has no further question");
            self.session.current = None;
            self.session.ended = true;
          }
        }
        Ok(())
      }
      Err(e) => {
        error!(target: "quiz", error = %e, "loading next question failed");
        self.notifier.alert(messages::LOAD_QUIZ_QUESTION).await;
        Err(e)
      }
    }
  }

  /// Grade the guess against the current answer and reveal it. Returns the
  /// grade, or `None` when there is nothing to grade in the current phase.
  pub fn submit_guess(&mut self) -> Option<bool> {
    if self.phase() != QuizPhase::InPlay {
      warn!(target: "quiz", phase = ?self.phase(), "guess submitted outside of play");
      return None;
    }
    let answer = &self.session.current.as_ref()?.answer;
    let correct = is_match(&self.session.guess, answer);
    if correct {
      self.session.correct_count += 1;
    }
    self.session.revealed = true;
    self.session.last_correct = Some(correct);
    debug!(target: "quiz", correct, score = self.session.correct_count, "guess graded");
    Some(correct)
  }

  pub fn restart(&mut self) {
    info!(target: "quiz", score = self.session.correct_count, "session reset");
    self.session = QuizSession::default();
  }

  pub fn phase(&self) -> QuizPhase {
    let s = &self.session;
    if s.category_scope.is_none() {
      QuizPhase::PreSelect
    } else if s.ended || s.asked_ids.len() == self.questions_per_play {
      QuizPhase::SessionEnded
    } else if s.revealed {
      QuizPhase::AnswerRevealed
    } else {
      QuizPhase::InPlay
    }
  }

  pub fn view(&self) -> QuizView {
    let s = &self.session;
    match self.phase() {
      QuizPhase::PreSelect => QuizView::CategoryPicker { categories: self.categories.clone() },
      QuizPhase::SessionEnded => QuizView::FinalScore { correct: s.correct_count },
      QuizPhase::AnswerRevealed => match &s.current {
        Some(q) => QuizView::RevealedAnswer {
          question: q.clone(),
          correct: s.last_correct.unwrap_or_else(|| is_match(&s.guess, &q.answer)),
          next_label: self.next_label(),
        },
        None => QuizView::QuestionForm { question: None },
      },
      QuizPhase::InPlay => QuizView::QuestionForm { question: s.current.clone() },
    }
  }

  /// "Next Question" unless moving on is going to end the session.
  fn next_label(&self) -> &'static str {
    let after = self.session.asked_ids.len() + 1;
    if after < self.questions_per_play && (after as u64) + 1 < self.session.total_available {
      NEXT_QUESTION_LABEL
    } else {
      FINISH_LABEL
    }
  }

  fn finish(&mut self, asked: Vec<i64>) {
    self.session.asked_ids = asked;
    self.session.current = None;
    self.session.revealed = false;
    self.session.ended = true;
  }
}
