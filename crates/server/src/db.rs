//! Query layer. Timestamps are stored as text and always compared through
//! sqlite's datetime() so stored and bound values collate the same way.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::models::{AdminListParams, Choice, Question, QuestionOverview};

pub const LIST_PER_PAGE: i64 = 10;

pub async fn init_schema(db: &SqlitePool) -> sqlx::Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS questions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            question_text TEXT NOT NULL,
            pub_date TEXT NOT NULL
        )",
    )
    .execute(db)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS choices (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            question_id INTEGER NOT NULL
                REFERENCES questions(id) ON DELETE CASCADE,
            choice_text TEXT NOT NULL,
            votes INTEGER NOT NULL DEFAULT 0 CHECK (votes >= 0)
        )",
    )
    .execute(db)
    .await?;

    Ok(())
}

// ===== Public views =====

/// Questions published up to `now` that own at least one choice,
/// newest first.
pub async fn latest_questions(
    db: &SqlitePool,
    now: DateTime<Utc>,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as(
        "SELECT id, question_text, pub_date FROM questions
         WHERE datetime(pub_date) <= datetime($1)
           AND EXISTS (SELECT 1 FROM choices WHERE choices.question_id = questions.id)
         ORDER BY datetime(pub_date) DESC",
    )
    .bind(now)
    .fetch_all(db)
    .await
}

/// Looks up a question by id, treating future-dated ones as absent.
pub async fn published_question(
    db: &SqlitePool,
    id: i64,
    now: DateTime<Utc>,
) -> sqlx::Result<Option<Question>> {
    sqlx::query_as(
        "SELECT id, question_text, pub_date FROM questions
         WHERE id = $1 AND datetime(pub_date) <= datetime($2)",
    )
    .bind(id)
    .bind(now)
    .fetch_optional(db)
    .await
}

pub async fn choices_of(db: &SqlitePool, question_id: i64) -> sqlx::Result<Vec<Choice>> {
    sqlx::query_as(
        "SELECT id, question_id, choice_text, votes FROM choices
         WHERE question_id = $1
         ORDER BY id",
    )
    .bind(question_id)
    .fetch_all(db)
    .await
}

/// Counts one vote for the choice. Returns false when the choice does not
/// belong to the question (or does not exist at all).
pub async fn record_vote(
    db: &SqlitePool,
    question_id: i64,
    choice_id: i64,
) -> sqlx::Result<bool> {
    let result = sqlx::query(
        "UPDATE choices SET votes = votes + 1
         WHERE id = $1 AND question_id = $2",
    )
    .bind(choice_id)
    .bind(question_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

// ===== Admin =====

pub struct AdminPage {
    pub rows: Vec<QuestionOverview>,
    pub total: i64,
    pub page: u32,
    pub pages: u32,
}

/// One page of the admin question list, filtered by the optional search
/// term and publication day.
pub async fn admin_question_page(
    db: &SqlitePool,
    params: &AdminListParams,
) -> sqlx::Result<AdminPage> {
    let mut count = QueryBuilder::new("SELECT COUNT(*) FROM questions");
    push_filters(&mut count, params);
    let total: i64 = count.build_query_scalar().fetch_one(db).await?;

    let pages = ((total as u64).div_ceil(LIST_PER_PAGE as u64)).max(1) as u32;
    let page = params.page.unwrap_or(1).clamp(1, pages);
    let offset = (page as i64 - 1) * LIST_PER_PAGE;

    let mut list = QueryBuilder::new(
        "SELECT id, question_text, pub_date,
            (SELECT COUNT(*) FROM choices
             WHERE choices.question_id = questions.id) AS choice_count
         FROM questions",
    );
    push_filters(&mut list, params);
    list.push(" ORDER BY datetime(pub_date) DESC LIMIT ");
    list.push_bind(LIST_PER_PAGE);
    list.push(" OFFSET ");
    list.push_bind(offset);

    let rows = list
        .build_query_as::<QuestionOverview>()
        .fetch_all(db)
        .await?;

    Ok(AdminPage {
        rows,
        total,
        page,
        pages,
    })
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, params: &AdminListParams) {
    let mut sep = " WHERE ";
    if let Some(term) = params.q.as_deref().filter(|term| !term.is_empty()) {
        builder
            .push(sep)
            .push("question_text LIKE ")
            .push_bind(format!("%{term}%"));
        sep = " AND ";
    }
    if let Some(day) = params.date.as_deref().filter(|day| !day.is_empty()) {
        builder
            .push(sep)
            .push("date(pub_date) = ")
            .push_bind(day.to_string());
    }
}

pub async fn question(db: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as("SELECT id, question_text, pub_date FROM questions WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn question_text_exists(db: &SqlitePool, text: &str) -> sqlx::Result<bool> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM questions WHERE question_text = $1)")
        .bind(text)
        .fetch_one(db)
        .await
}

pub async fn create_question(
    db: &SqlitePool,
    text: &str,
    pub_date: DateTime<Utc>,
) -> sqlx::Result<i64> {
    let result = sqlx::query("INSERT INTO questions (question_text, pub_date) VALUES ($1, $2)")
        .bind(text)
        .bind(pub_date)
        .execute(db)
        .await?;

    Ok(result.last_insert_rowid())
}

pub async fn update_question(
    db: &SqlitePool,
    id: i64,
    text: &str,
    pub_date: DateTime<Utc>,
) -> sqlx::Result<bool> {
    let result = sqlx::query("UPDATE questions SET question_text = $1, pub_date = $2 WHERE id = $3")
        .bind(text)
        .bind(pub_date)
        .bind(id)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Deletes a question; its choices go with it via the cascade.
pub async fn delete_question(db: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM questions WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn add_choice(
    db: &SqlitePool,
    question_id: i64,
    text: &str,
    votes: i64,
) -> sqlx::Result<i64> {
    let result =
        sqlx::query("INSERT INTO choices (question_id, choice_text, votes) VALUES ($1, $2, $3)")
            .bind(question_id)
            .bind(text)
            .bind(votes)
            .execute(db)
            .await?;

    Ok(result.last_insert_rowid())
}

pub async fn update_choice(
    db: &SqlitePool,
    question_id: i64,
    choice_id: i64,
    text: &str,
    votes: i64,
) -> sqlx::Result<bool> {
    let result = sqlx::query(
        "UPDATE choices SET choice_text = $1, votes = $2
         WHERE id = $3 AND question_id = $4",
    )
    .bind(text)
    .bind(votes)
    .bind(choice_id)
    .bind(question_id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_choice(
    db: &SqlitePool,
    question_id: i64,
    choice_id: i64,
) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM choices WHERE id = $1 AND question_id = $2")
        .bind(choice_id)
        .bind(question_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}
