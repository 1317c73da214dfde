//! In-process stand-in for the trivia backend, served with axum on an
//! ephemeral port. Mirrors the reference backend's response shapes
//! (position-keyed `questions`, id-keyed `categories`) and records every
//! request it sees.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use trivia_client::domain::Question;
use trivia_client::ClientConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
}

pub struct Db {
    pub questions: Vec<Question>,
    pub categories: BTreeMap<i64, String>,
    pub page_size: usize,
}

#[derive(Clone)]
pub struct FakeServer {
    pub db: Arc<Mutex<Db>>,
    pub log: Arc<Mutex<Vec<Recorded>>>,
}

#[derive(Deserialize)]
struct PageQuery {
    page: Option<usize>,
}

pub fn sample_questions(count: i64) -> Vec<Question> {
    (1..=count)
        .map(|id| Question {
            id,
            question: format!("Question {id}?"),
            answer: format!("Answer {id}"),
            category: if id % 3 == 0 { 3 } else { 1 },
            difficulty: (id % 5) + 1,
        })
        .collect()
}

impl FakeServer {
    pub fn new(questions: Vec<Question>, page_size: usize) -> Self {
        let mut categories = BTreeMap::new();
        categories.insert(1, "Science".to_string());
        categories.insert(2, "Art".to_string());
        categories.insert(3, "Geography".to_string());
        Self {
            db: Arc::new(Mutex::new(Db { questions, categories, page_size })),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Bind to 127.0.0.1:0, serve in the background, return a config
    /// pointing at it.
    pub async fn spawn(&self) -> ClientConfig {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let app = self.router();
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });
        ClientConfig { api_server: format!("http://{addr}"), ..ClientConfig::default() }
    }

    pub async fn requests(&self) -> Vec<Recorded> {
        self.log.lock().await.clone()
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/questions", get(list_questions))
            .route("/questions/search", post(search_questions))
            .route("/questions/:id", delete(delete_question))
            .route("/categories", get(list_categories))
            .route("/categories/:id/questions", get(list_by_category))
            .route("/quizzes", post(next_quiz_question))
            .with_state(self.clone())
    }

    async fn record(&self, method: Method, uri: &Uri, body: Option<Value>) {
        self.log.lock().await.push(Recorded {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            body,
        });
    }
}

fn package(db: &Db, matching: Vec<Question>, page: usize) -> Value {
    let start = (page.max(1) - 1) * db.page_size;
    let keyed: BTreeMap<String, Question> = matching
        .iter()
        .skip(start)
        .take(db.page_size)
        .enumerate()
        .map(|(i, q)| ((i + 1).to_string(), q.clone()))
        .collect();
    json!({
        "questions": keyed,
        "total_questions": matching.len(),
        "categories": db.categories,
        "success": true,
    })
}

async fn list_questions(State(s): State<FakeServer>, uri: Uri, Query(q): Query<PageQuery>) -> impl IntoResponse {
    s.record(Method::GET, &uri, None).await;
    let db = s.db.lock().await;
    Json(package(&db, db.questions.clone(), q.page.unwrap_or(1)))
}

async fn list_by_category(
    State(s): State<FakeServer>,
    uri: Uri,
    Path(id): Path<i64>,
    Query(q): Query<PageQuery>,
) -> impl IntoResponse {
    s.record(Method::GET, &uri, None).await;
    let db = s.db.lock().await;
    let matching = db.questions.iter().filter(|x| x.category == id).cloned().collect();
    Json(package(&db, matching, q.page.unwrap_or(1)))
}

async fn search_questions(
    State(s): State<FakeServer>,
    uri: Uri,
    Query(q): Query<PageQuery>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    s.record(Method::POST, &uri, Some(body.clone())).await;
    let Some(term) = body.get("searchTerm").and_then(Value::as_str) else {
        return (StatusCode::BAD_REQUEST, Json(json!({"success": false, "error": 400}))).into_response();
    };
    let needle = term.to_lowercase();
    let db = s.db.lock().await;
    let matching = db.questions.iter().filter(|x| x.question.to_lowercase().contains(&needle)).cloned().collect();
    (StatusCode::CREATED, Json(package(&db, matching, q.page.unwrap_or(1)))).into_response()
}

async fn delete_question(State(s): State<FakeServer>, uri: Uri, Path(id): Path<i64>) -> impl IntoResponse {
    s.record(Method::DELETE, &uri, None).await;
    let mut db = s.db.lock().await;
    let before = db.questions.len();
    db.questions.retain(|q| q.id != id);
    if db.questions.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({"success": false, "error": 404, "message": "Not found"})));
    }
    (StatusCode::OK, Json(json!({"success": true, "deleted": id})))
}

async fn list_categories(State(s): State<FakeServer>, uri: Uri) -> impl IntoResponse {
    s.record(Method::GET, &uri, None).await;
    let db = s.db.lock().await;
    Json(json!({ "categories": db.categories }))
}

async fn next_quiz_question(State(s): State<FakeServer>, uri: Uri, Json(body): Json<Value>) -> impl IntoResponse {
    s.record(Method::POST, &uri, Some(body.clone())).await;
    let previous: Vec<i64> = body
        .get("previous_questions")
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default();
    let category = body.pointer("/quiz_category/id").and_then(Value::as_i64).unwrap_or(0);

    let db = s.db.lock().await;
    let eligible: Vec<&Question> = db.questions.iter().filter(|q| category == 0 || q.category == category).collect();
    let total = eligible.len();
    let remaining: Vec<&Question> = eligible.into_iter().filter(|q| !previous.contains(&q.id)).collect();
    match remaining.choose(&mut rand::thread_rng()) {
        Some(q) => Json(json!({ "question": q, "total_questions": total })),
        None => Json(json!({
            "question": {"id": 0, "question": "", "answer": "", "difficulty": -1, "category": 0}
        })),
    }
}
