//! Admin surface: CRUD over questions and their inline choices.
//!
//! Authentication is expected in front of this router in a real
//! deployment; none is wired up here.

use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, Redirect},
};
use chrono::Utc;

use crate::AppState;
use crate::db;
use crate::error::AppError;
use crate::models::{
    AdminListParams, Choice, ChoiceForm, Question, QuestionForm, parse_pub_date,
};
use crate::pages;

/// Blank add-choice rows shown on every edit page.
const EXTRA_CHOICE_SLOTS: usize = 2;

// ===== List =====

pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<AdminListParams>,
) -> Result<Html<String>, AppError> {
    let page = db::admin_question_page(&state.db, &params).await?;
    let now = Utc::now();

    let rows: String = page
        .rows
        .iter()
        .map(|q| {
            format!(
                "<tr><td><a href=\"/admin/polls/{id}/\">{text}</a></td>\
                 <td>{date}</td><td>{recent}</td><td>{count}</td></tr>\n",
                id = q.id,
                text = pages::escape(&q.question_text),
                date = pages::format_date(q.pub_date),
                recent = if q.was_published_recently(now) { "yes" } else { "no" },
                count = q.choice_count,
            )
        })
        .collect();

    let table = if page.rows.is_empty() {
        "<p>No questions found.</p>".to_string()
    } else {
        format!(
            "<table>\n<tr><th>Question</th><th>Published</th>\
             <th>Recently?</th><th>Choices</th></tr>\n{rows}</table>"
        )
    };

    let mut nav = format!("<p>{} question(s), page {} of {}.", page.total, page.page, page.pages);
    if page.page > 1 {
        nav.push_str(&format!(
            " <a href=\"{}\">&laquo; prev</a>",
            pages::escape(&list_url(&params, page.page - 1))
        ));
    }
    if page.page < page.pages {
        nav.push_str(&format!(
            " <a href=\"{}\">next &raquo;</a>",
            pages::escape(&list_url(&params, page.page + 1))
        ));
    }
    nav.push_str("</p>");

    let body = format!(
        "<h1>Questions</h1>\n\
         <form method=\"get\" action=\"/admin/polls/\">\n\
         <input name=\"q\" placeholder=\"Search question text\" value=\"{q}\">\n\
         <input type=\"date\" name=\"date\" value=\"{date}\">\n\
         <button type=\"submit\">Filter</button>\n\
         </form>\n{table}\n{nav}\n\
         <p><a href=\"/admin/polls/new/\">Add question</a></p>",
        q = pages::escape(params.q.as_deref().unwrap_or("")),
        date = pages::escape(params.date.as_deref().unwrap_or("")),
    );

    Ok(pages::page("Question admin", &body))
}

fn list_url(params: &AdminListParams, page: u32) -> String {
    let mut url = format!("/admin/polls/?page={page}");
    if let Some(term) = params.q.as_deref().filter(|t| !t.is_empty()) {
        url.push_str(&format!("&q={term}"));
    }
    if let Some(day) = params.date.as_deref().filter(|d| !d.is_empty()) {
        url.push_str(&format!("&date={day}"));
    }
    url
}

// ===== Question forms =====

pub async fn new_form() -> Html<String> {
    let body = question_form_body("/admin/polls/", "", &pages::format_date_input(Utc::now()));
    pages::page("Add question", &format!("<h1>Add question</h1>\n{body}"))
}

pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<QuestionForm>,
) -> Result<Redirect, AppError> {
    let (text, pub_date) = validate_question(&form)?;
    let id = db::create_question(&state.db, text, pub_date).await?;
    tracing::info!("created question {id}");

    Ok(Redirect::to(&format!("/admin/polls/{id}/")))
}

pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let question = db::question(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;
    let choices = db::choices_of(&state.db, id).await?;

    Ok(edit_page(&question, &choices))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<QuestionForm>,
) -> Result<Redirect, AppError> {
    let (text, pub_date) = validate_question(&form)?;
    if !db::update_question(&state.db, id, text, pub_date).await? {
        return Err(AppError::NotFound);
    }

    Ok(Redirect::to(&format!("/admin/polls/{id}/")))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    if !db::delete_question(&state.db, id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!("deleted question {id}");

    Ok(Redirect::to("/admin/polls/"))
}

// ===== Inline choices =====

pub async fn add_choice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<ChoiceForm>,
) -> Result<Redirect, AppError> {
    if db::question(&state.db, id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    // Untouched blank slots submit empty text; ignore them.
    let text = form.choice_text.trim();
    if !text.is_empty() {
        let votes = validate_votes(form.votes)?;
        db::add_choice(&state.db, id, text, votes).await?;
    }

    Ok(Redirect::to(&format!("/admin/polls/{id}/")))
}

pub async fn update_choice(
    State(state): State<AppState>,
    Path((id, choice_id)): Path<(i64, i64)>,
    Form(form): Form<ChoiceForm>,
) -> Result<Redirect, AppError> {
    let text = form.choice_text.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest("Choice text must not be empty".into()));
    }
    let votes = validate_votes(form.votes)?;

    if !db::update_choice(&state.db, id, choice_id, text, votes).await? {
        return Err(AppError::NotFound);
    }

    Ok(Redirect::to(&format!("/admin/polls/{id}/")))
}

pub async fn delete_choice(
    State(state): State<AppState>,
    Path((id, choice_id)): Path<(i64, i64)>,
) -> Result<Redirect, AppError> {
    if !db::delete_choice(&state.db, id, choice_id).await? {
        return Err(AppError::NotFound);
    }

    Ok(Redirect::to(&format!("/admin/polls/{id}/")))
}

// ===== Validation =====

fn validate_question(form: &QuestionForm) -> Result<(&str, chrono::DateTime<Utc>), AppError> {
    let text = form.question_text.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest("Question text must not be empty".into()));
    }
    let pub_date = parse_pub_date(&form.pub_date)
        .ok_or_else(|| AppError::BadRequest("Invalid publication date".into()))?;

    Ok((text, pub_date))
}

fn validate_votes(votes: Option<i64>) -> Result<i64, AppError> {
    let votes = votes.unwrap_or(0);
    if votes < 0 {
        return Err(AppError::BadRequest("Votes must not be negative".into()));
    }

    Ok(votes)
}

// ===== Rendering =====

fn question_form_body(action: &str, text: &str, pub_date: &str) -> String {
    format!(
        "<form method=\"post\" action=\"{action}\">\n\
         <p><label>Question: <input name=\"question_text\" value=\"{text}\"></label></p>\n\
         <details>\n<summary>Date Information</summary>\n\
         <p><label>Publication date: \
         <input type=\"datetime-local\" step=\"1\" name=\"pub_date\" value=\"{pub_date}\"></label></p>\n\
         </details>\n\
         <button type=\"submit\">Save</button>\n</form>",
        action = pages::escape(action),
        text = pages::escape(text),
        pub_date = pages::escape(pub_date),
    )
}

fn edit_page(question: &Question, choices: &[Choice]) -> Html<String> {
    let form = question_form_body(
        &format!("/admin/polls/{}/", question.id),
        &question.question_text,
        &pages::format_date_input(question.pub_date),
    );

    let mut inline = String::from("<h2>Choices</h2>\n");
    for choice in choices {
        inline.push_str(&format!(
            "<form method=\"post\" action=\"/admin/polls/{qid}/choices/{cid}/\" class=\"inline\">\n\
             <input name=\"choice_text\" value=\"{text}\">\n\
             <input type=\"number\" min=\"0\" name=\"votes\" value=\"{votes}\">\n\
             <button type=\"submit\">Save</button>\n</form>\n\
             <form method=\"post\" action=\"/admin/polls/{qid}/choices/{cid}/delete/\" class=\"inline\">\n\
             <button type=\"submit\">Delete</button>\n</form><br>\n",
            qid = question.id,
            cid = choice.id,
            text = pages::escape(&choice.choice_text),
            votes = choice.votes,
        ));
    }
    for _ in 0..EXTRA_CHOICE_SLOTS {
        inline.push_str(&format!(
            "<form method=\"post\" action=\"/admin/polls/{qid}/choices/\" class=\"inline\">\n\
             <input name=\"choice_text\" placeholder=\"New choice\" value=\"\">\n\
             <button type=\"submit\">Add</button>\n</form><br>\n",
            qid = question.id,
        ));
    }

    let body = format!(
        "<h1>Edit question</h1>\n{form}\n{inline}\n\
         <form method=\"post\" action=\"/admin/polls/{qid}/delete/\">\n\
         <button type=\"submit\">Delete question</button>\n</form>\n\
         <p><a href=\"/admin/polls/\">Back to list</a></p>",
        qid = question.id,
    );

    pages::page("Edit question", &body)
}
