//! Line-oriented terminal host: reads commands from stdin, drives the
//! listing and quiz controllers, prints the resulting views to stdout.
//!
//! Alerts are printed inline; confirmations read the next input line.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::api::TriviaBackend;
use crate::config::ClientConfig;
use crate::domain::{Category, QuizScope};
use crate::listing::{page_count, DeleteOutcome, ListingController};
use crate::notify::Notifier;
use crate::quiz::{QuizController, QuizView};

type SharedInput = Arc<Mutex<Lines<BufReader<Stdin>>>>;

pub const HELP: &str = "\
Commands:
  list [page]         all questions
  category <id> [pg]  questions of one category
  search <term>       search question text
  page <n>            go to page n of the current listing
  delete <id>         delete a question (asks for confirmation)
  refresh             reload the current page
  categories          show categories
  play [all|<id>]     start a quiz
  guess <text>        answer the current quiz question
  next                next quiz question
  restart             abandon the quiz and pick again
  help | quit";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
  List(u32),
  Category(i64, u32),
  Search(String),
  Page(u32),
  Delete(i64),
  Refresh,
  Categories,
  Play(Option<i64>),
  Guess(String),
  Next,
  Restart,
  Help,
  Quit,
}

fn parse_num<T: std::str::FromStr>(what: &str, s: &str) -> Result<T, String> {
  s.parse::<T>().map_err(|_| format!("{what} must be a number, got '{s}'"))
}

pub fn parse_command(line: &str) -> Result<Command, String> {
  let line = line.trim();
  let (head, rest) = match line.split_once(char::is_whitespace) {
    Some((h, r)) => (h, r.trim()),
    None => (line, ""),
  };
  let mut args = rest.split_whitespace();
  match head.to_ascii_lowercase().as_str() {
    "list" | "ls" => Ok(Command::List(args.next().map(|p| parse_num("page", p)).transpose()?.unwrap_or(1))),
    "category" | "cat" => {
      let id = parse_num("category id", args.next().ok_or("usage: category <id> [page]")?)?;
      let page = args.next().map(|p| parse_num("page", p)).transpose()?.unwrap_or(1);
      Ok(Command::Category(id, page))
    }
    "search" if !rest.is_empty() => Ok(Command::Search(rest.to_string())),
    "search" => Err("usage: search <term>".into()),
    "page" => Ok(Command::Page(parse_num("page", args.next().ok_or("usage: page <n>")?)?)),
    "delete" | "rm" => Ok(Command::Delete(parse_num("question id", args.next().ok_or("usage: delete <id>")?)?)),
    "refresh" => Ok(Command::Refresh),
    "categories" => Ok(Command::Categories),
    "play" => match args.next() {
      None => Ok(Command::Play(None)),
      Some(a) if a.eq_ignore_ascii_case("all") => Ok(Command::Play(None)),
      Some(a) => Ok(Command::Play(Some(parse_num("category id", a)?))),
    },
    "guess" => Ok(Command::Guess(rest.to_string())),
    "next" => Ok(Command::Next),
    "restart" => Ok(Command::Restart),
    "help" | "?" => Ok(Command::Help),
    "quit" | "exit" | "q" => Ok(Command::Quit),
    "" => Err(String::new()),
    other => Err(format!("unknown command '{other}' (try 'help')")),
  }
}

pub fn render_listing(listing: &ListingController) -> String {
  let st = listing.state();
  let mut out = String::new();
  out.push_str(&format!("Questions ({} total, mode: {})\n", st.total_count, st.mode.label()));
  if st.questions.is_empty() {
    out.push_str("  (no questions)\n");
  }
  for q in &st.questions {
    let category = listing.category_name(q.category).unwrap_or("?");
    out.push_str(&format!("  #{} [{} | difficulty {}] {}\n      answer: {}\n", q.id, category, q.difficulty, q.question, q.answer));
  }
  if let Some(pages) = page_strip(page_count(st.total_count, listing.page_size()), st.page) {
    out.push_str(&format!("Pages: {pages}\n"));
  }
  out
}

/// Pages shown on either side of the current one.
const PAGE_WINDOW: u32 = 3;

/// First page, last page, and a window around `page`; gaps shown as `..`.
pub fn page_strip(last: u32, page: u32) -> Option<String> {
  if last == 0 {
    return None;
  }
  let page = page.clamp(1, last);
  let lo = page.saturating_sub(PAGE_WINDOW).max(1);
  let hi = page.saturating_add(PAGE_WINDOW).min(last);
  let label = |n: u32| if n == page { format!("[{n}]") } else { n.to_string() };

  let mut parts = Vec::new();
  if lo > 1 {
    parts.push(label(1));
    if lo > 2 {
      parts.push("..".to_string());
    }
  }
  parts.extend((lo..=hi).map(label));
  if hi < last {
    if hi + 1 < last {
      parts.push("..".to_string());
    }
    parts.push(label(last));
  }
  Some(parts.join(" "))
}

pub fn render_quiz(view: &QuizView) -> String {
  match view {
    QuizView::CategoryPicker { categories } => {
      let mut out = String::from("Choose Category: play all");
      for (id, name) in categories {
        out.push_str(&format!(" | play {id} ({name})"));
      }
      out
    }
    QuizView::FinalScore { correct } => format!("Your Final Score is {correct}. Play Again? (restart)"),
    QuizView::RevealedAnswer { question, correct, next_label } => format!(
      "{}\n{}\nAnswer: {}\n{} (next)",
      question.question,
      if *correct { "You were correct!" } else { "You were incorrect" },
      question.answer,
      next_label
    ),
    QuizView::QuestionForm { question: Some(q) } => format!("{}\n(guess <text>)", q.question),
    QuizView::QuestionForm { question: None } => "No question loaded (next)".to_string(),
  }
}

pub struct ConsoleNotifier {
  input: SharedInput,
}

#[async_trait]
impl Notifier for ConsoleNotifier {
  async fn alert(&self, message: &str) {
    println!("! {message}");
  }

  async fn confirm(&self, prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    let _ = std::io::stdout().flush();
    match self.input.lock().await.next_line().await {
      Ok(Some(answer)) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
      _ => false,
    }
  }
}

pub struct Host {
  input: SharedInput,
  listing: ListingController,
  quiz: QuizController,
}

impl Host {
  pub fn new(backend: Arc<dyn TriviaBackend>, config: &ClientConfig) -> Self {
    let input: SharedInput = Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()));
    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier { input: input.clone() });
    Self {
      input,
      listing: ListingController::new(backend.clone(), notifier.clone(), config),
      quiz: QuizController::new(backend, notifier, config),
    }
  }

  pub async fn run(mut self) -> std::io::Result<()> {
    println!("{HELP}");
    if self.listing.load_all(1).await.is_ok() {
      println!("{}", render_listing(&self.listing));
    }
    let _ = self.quiz.load_categories().await; // alerted via Notifier

    loop {
      print!("> ");
      let _ = std::io::stdout().flush();
      let line = {
        let mut input = self.input.lock().await;
        tokio::select! {
          line = input.next_line() => line?,
          _ = tokio::signal::ctrl_c() => None,
        }
      };
      let Some(line) = line else { break };

      match parse_command(&line) {
        Ok(Command::Quit) => break,
        Ok(cmd) => self.dispatch(cmd).await,
        Err(msg) if msg.is_empty() => {}
        Err(msg) => println!("{msg}"),
      }
    }
    info!(target: "trivia_client", "host loop finished");
    Ok(())
  }

  async fn dispatch(&mut self, cmd: Command) {
    debug!(target: "trivia_client", ?cmd, "command");
    match cmd {
      Command::List(page) => {
        let ok = self.listing.load_all(page).await.is_ok();
        self.show_listing_if(ok);
      }
      Command::Category(id, page) => {
        let ok = self.listing.load_by_category(id, page).await.is_ok();
        self.show_listing_if(ok);
      }
      Command::Search(term) => {
        let ok = self.listing.search(&term, 1).await.is_ok();
        self.show_listing_if(ok);
      }
      Command::Page(n) => {
        let ok = self.listing.select_page(n).await.is_ok();
        self.show_listing_if(ok);
      }
      Command::Refresh => {
        let ok = self.listing.refresh().await.is_ok();
        self.show_listing_if(ok);
      }
      Command::Delete(id) => match self.listing.delete_question(id).await {
        Ok(DeleteOutcome::Declined) => println!("Not deleted."),
        Ok(DeleteOutcome::Deleted { refreshed, .. }) => {
          println!("Deleted question #{id}.");
          self.show_listing_if(refreshed);
        }
        Err(_) => {}
      },
      Command::Categories => {
        for (id, name) in &self.listing.state().categories {
          println!("  {id}: {name}");
        }
      }
      Command::Play(choice) => {
        if self.quiz.categories().is_empty() {
          let _ = self.quiz.load_categories().await; // alerted via Notifier
        }
        let scope = match choice {
          None => QuizScope::All,
          Some(id) => match self.quiz.categories().get(&id) {
            Some(kind) => QuizScope::Category(Category { id, kind: kind.clone() }),
            None => {
              println!("unknown category {id}");
              return;
            }
          },
        };
        let _ = self.quiz.select_category(scope).await; // alerted via Notifier
        self.show_quiz();
      }
      Command::Guess(text) => {
        self.quiz.set_guess(text);
        if self.quiz.submit_guess().is_none() {
          println!("Nothing to answer right now.");
        }
        self.show_quiz();
      }
      Command::Next => {
        let _ = self.quiz.next_question().await; // alerted via Notifier
        self.show_quiz();
      }
      Command::Restart => {
        self.quiz.restart();
        self.show_quiz();
      }
      Command::Help => println!("{HELP}"),
      Command::Quit => {}
    }
  }

  fn show_listing_if(&self, ok: bool) {
    if ok {
      println!("{}", render_listing(&self.listing));
    }
  }

  fn show_quiz(&self) {
    println!("{}", render_quiz(&self.quiz.view()));
  }
}
