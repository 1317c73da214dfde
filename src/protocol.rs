//! Wire structs for the trivia backend's HTTP API (serde ready).
//!
//! The backend serializes collections as JSON objects keyed by position
//! (`{"1": {...}, "2": {...}}`) rather than arrays; the decoders here accept
//! both shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{Question, QuizScope};

/// One page of listing results (all / by-category / search share the shape).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QuestionsPage {
    #[serde(default, deserialize_with = "de_questions")]
    pub questions: Vec<Question>,
    pub total_questions: u64,
    #[serde(default)]
    pub categories: Option<BTreeMap<i64, String>>,
    #[serde(rename = "currentCategory", default, deserialize_with = "de_current_category")]
    pub current_category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategoriesOut {
    #[serde(default)]
    pub categories: BTreeMap<i64, String>,
}

#[derive(Debug, Serialize)]
pub struct SearchIn<'a> {
    #[serde(rename = "searchTerm")]
    pub search_term: &'a str,
    pub page: u32,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct QuizCategoryIn<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub id: i64,
}

impl<'a> From<&'a QuizScope> for QuizCategoryIn<'a> {
    fn from(scope: &'a QuizScope) -> Self {
        QuizCategoryIn { kind: scope.display_name(), id: scope.category_id() }
    }
}

#[derive(Debug, Serialize)]
pub struct QuizIn<'a> {
    pub previous_questions: &'a [i64],
    pub quiz_category: QuizCategoryIn<'a>,
}

#[derive(Debug, Deserialize)]
pub struct QuizOut {
    #[serde(default)]
    pub question: Option<serde_json::Value>,
    #[serde(default)]
    pub total_questions: Option<u64>,
}

/// Decoded reply of `POST /quizzes`.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizTurn {
    /// `None` when the backend has no further question for the scope.
    pub question: Option<Question>,
    pub total_questions: Option<u64>,
}

impl TryFrom<QuizOut> for QuizTurn {
    type Error = serde_json::Error;

    /// The backend signals exhaustion with null, a missing key, or a
    /// placeholder question whose id is 0. Anything else must decode.
    fn try_from(out: QuizOut) -> Result<Self, Self::Error> {
        let question = match out.question {
            None | Some(serde_json::Value::Null) => None,
            Some(v) if v.get("id").and_then(serde_json::Value::as_i64) == Some(0) => None,
            Some(v) => Some(serde_json::from_value::<Question>(v)?),
        };
        Ok(QuizTurn { question, total_questions: out.total_questions })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionsField {
    List(Vec<Question>),
    Keyed(BTreeMap<String, Question>),
}

fn de_questions<'de, D>(d: D) -> Result<Vec<Question>, D::Error>
where
    D: Deserializer<'de>,
{
    let field = Option::<QuestionsField>::deserialize(d)?;
    Ok(match field {
        None => Vec::new(),
        Some(QuestionsField::List(v)) => v,
        Some(QuestionsField::Keyed(map)) => {
            let mut entries: Vec<(String, Question)> = map.into_iter().collect();
            // Numeric keys first in numeric order, then anything else lexically.
            entries.sort_by(|(a, _), (b, _)| match (a.parse::<u64>(), b.parse::<u64>()) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                (Err(_), Err(_)) => a.cmp(b),
            });
            entries.into_iter().map(|(_, q)| q).collect()
        }
    })
}

fn de_current_category<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<serde_json::Value>::deserialize(d)?;
    Ok(match v {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
