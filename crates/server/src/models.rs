use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
}

impl Question {
    /// Published within the last 24 hours and not in the future.
    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        published_recently(self.pub_date, now)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Choice {
    pub id: i64,
    pub question_id: i64,
    pub choice_text: String,
    pub votes: i64,
}

/// Row for the admin list view: a question plus how many choices it owns.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct QuestionOverview {
    pub id: i64,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    pub choice_count: i64,
}

impl QuestionOverview {
    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        published_recently(self.pub_date, now)
    }
}

pub fn published_recently(pub_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    pub_date <= now && pub_date > now - Duration::days(1)
}

// ===== Form payloads =====

#[derive(Debug, Deserialize)]
pub struct VoteForm {
    pub choice: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionForm {
    pub question_text: String,
    pub pub_date: String,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceForm {
    pub choice_text: String,
    #[serde(default)]
    pub votes: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminListParams {
    pub q: Option<String>,
    pub date: Option<String>,
    pub page: Option<u32>,
}

/// Parses the value of a `datetime-local` form input as a UTC timestamp.
/// Seconds are optional, everything else is an error.
pub fn parse_pub_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M"))
        .ok()
        .map(|naive| naive.and_utc())
}
