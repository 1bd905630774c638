//! Public request handlers: question index, detail, results and voting.

use axum::{
    Json,
    extract::{Form, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;

use crate::AppState;
use crate::db;
use crate::error::AppError;
use crate::models::{Choice, Question, VoteForm};
use crate::pages;

pub async fn root() -> &'static str {
    "Polls backend - see /polls/ for the question index, /health to check status"
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    // Check DB connection
    match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => Json(serde_json::json!({
            "status": "ok",
            "database": "connected"
        })),
        Err(_) => Json(serde_json::json!({
            "status": "error",
            "database": "disconnected"
        })),
    }
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let questions = db::latest_questions(&state.db, Utc::now()).await?;

    let body = if questions.is_empty() {
        "<p>No polls are available.</p>".to_string()
    } else {
        let items: String = questions
            .iter()
            .map(|q| {
                format!(
                    "<li><a href=\"/polls/{}/\">{}</a></li>\n",
                    q.id,
                    pages::escape(&q.question_text)
                )
            })
            .collect();
        format!("<h1>Latest polls</h1>\n<ul>\n{items}</ul>")
    };

    Ok(pages::page("Polls", &body))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let question = published_or_404(&state, id).await?;
    let choices = db::choices_of(&state.db, id).await?;

    Ok(detail_page(&question, &choices, None))
}

pub async fn vote(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<VoteForm>,
) -> Result<Response, AppError> {
    let question = published_or_404(&state, id).await?;

    let counted = match form.choice {
        Some(choice_id) => db::record_vote(&state.db, id, choice_id).await?,
        None => false,
    };

    if counted {
        Ok(Redirect::to(&format!("/polls/{id}/results/")).into_response())
    } else {
        // Redisplay the voting form instead of failing the request.
        let choices = db::choices_of(&state.db, id).await?;
        Ok(detail_page(&question, &choices, Some("You didn't select a choice.")).into_response())
    }
}

pub async fn results(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let question = published_or_404(&state, id).await?;
    let choices = db::choices_of(&state.db, id).await?;

    let rows: String = choices
        .iter()
        .map(|c| {
            format!(
                "<li>{} &mdash; {} vote{}</li>\n",
                pages::escape(&c.choice_text),
                c.votes,
                if c.votes == 1 { "" } else { "s" }
            )
        })
        .collect();

    let body = format!(
        "<h1>{}</h1>\n<ul>\n{rows}</ul>\n<p><a href=\"/polls/{}/\">Vote again?</a></p>",
        pages::escape(&question.question_text),
        question.id
    );

    Ok(pages::page(&question.question_text, &body))
}

async fn published_or_404(state: &AppState, id: i64) -> Result<Question, AppError> {
    db::published_question(&state.db, id, Utc::now())
        .await?
        .ok_or(AppError::NotFound)
}

fn detail_page(question: &Question, choices: &[Choice], error: Option<&str>) -> Html<String> {
    let error_line = match error {
        Some(message) => format!("<p class=\"error\"><strong>{}</strong></p>\n", message),
        None => String::new(),
    };

    let inputs: String = choices
        .iter()
        .map(|c| {
            format!(
                "<label><input type=\"radio\" name=\"choice\" value=\"{}\"> {}</label><br>\n",
                c.id,
                pages::escape(&c.choice_text)
            )
        })
        .collect();

    let body = format!(
        "<h1>{title}</h1>\n{error_line}<form method=\"post\" action=\"/polls/{id}/vote/\">\n\
         {inputs}<button type=\"submit\">Vote</button>\n</form>\n\
         <p><a href=\"/polls/{id}/results/\">Results</a></p>",
        title = pages::escape(&question.question_text),
        id = question.id,
    );

    pages::page(&question.question_text, &body)
}
