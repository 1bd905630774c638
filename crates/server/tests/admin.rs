mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{create_question, get, post_form, test_state};
use polls::db;

// ===== List =====

#[tokio::test]
async fn list_shows_recency_and_choice_count() {
    let state = test_state().await;
    create_question(&state, "Fresh question.", 0, true).await;
    create_question(&state, "Stale question.", -30, false).await;

    let (status, body) = get(&state, "/admin/polls/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Fresh question."));
    assert!(body.contains("<td>yes</td>"));
    assert!(body.contains("<td>no</td>"));
    assert!(body.contains("<td>1</td>"));
    assert!(body.contains("<td>0</td>"));
}

#[tokio::test]
async fn list_paginates_ten_per_page() {
    let state = test_state().await;
    for i in 0..15i64 {
        create_question(&state, &format!("Question {i:02}."), -(i + 1), false).await;
    }

    let (_, body) = get(&state, "/admin/polls/").await;
    assert!(body.contains("15 question(s), page 1 of 2"));
    assert_eq!(body.matches("<tr>").count(), 11); // header + 10 rows

    let (_, body) = get(&state, "/admin/polls/?page=2").await;
    assert!(body.contains("page 2 of 2"));
    assert_eq!(body.matches("<tr>").count(), 6); // header + 5 rows
}

#[tokio::test]
async fn list_search_narrows_by_question_text() {
    let state = test_state().await;
    create_question(&state, "Banana question.", -1, false).await;
    create_question(&state, "Apple question.", -1, false).await;

    let (_, body) = get(&state, "/admin/polls/?q=Banana").await;

    assert!(body.contains("Banana question."));
    assert!(!body.contains("Apple question."));
}

#[tokio::test]
async fn list_filters_by_publication_day() {
    let state = test_state().await;
    create_question(&state, "Old question.", -5, false).await;
    create_question(&state, "New question.", 0, false).await;
    let day = (Utc::now() - Duration::days(5)).format("%Y-%m-%d");

    let (_, body) = get(&state, &format!("/admin/polls/?date={day}")).await;

    assert!(body.contains("Old question."));
    assert!(!body.contains("New question."));
}

#[tokio::test]
async fn list_includes_future_questions() {
    let state = test_state().await;
    create_question(&state, "Future question.", 30, false).await;

    let (_, body) = get(&state, "/admin/polls/").await;

    assert!(body.contains("Future question."));
}

// ===== Question CRUD =====

#[tokio::test]
async fn create_question_redirects_to_edit_page() {
    let state = test_state().await;

    let (status, location, _) = post_form(
        &state,
        "/admin/polls/",
        "question_text=Fresh+question&pub_date=2026-08-30T12:00",
    )
    .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    let location = location.unwrap();
    let (status, body) = get(&state, &location).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Fresh question"));
    assert!(body.contains("Date Information"));
}

#[tokio::test]
async fn create_question_rejects_bad_date() {
    let state = test_state().await;

    let (status, _, _) = post_form(
        &state,
        "/admin/polls/",
        "question_text=Broken&pub_date=whenever",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_question_changes_text() {
    let state = test_state().await;
    let id = create_question(&state, "Old text.", -1, false).await;

    let (status, _, _) = post_form(
        &state,
        &format!("/admin/polls/{id}/"),
        "question_text=New+text.&pub_date=2026-08-30T12:00",
    )
    .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    let (_, body) = get(&state, &format!("/admin/polls/{id}/")).await;
    assert!(body.contains("New text."));
    assert!(!body.contains("Old text."));
}

#[tokio::test]
async fn delete_question_cascades_to_choices() {
    let state = test_state().await;
    let id = create_question(&state, "Doomed question.", -1, true).await;

    let (status, location, _) =
        post_form(&state, &format!("/admin/polls/{id}/delete/"), "").await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/admin/polls/"));
    assert!(db::choices_of(&state.db, id).await.unwrap().is_empty());

    let (status, _) = get(&state, &format!("/polls/{id}/")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn edit_page_of_unknown_question_is_404() {
    let state = test_state().await;

    let (status, _) = get(&state, "/admin/polls/999/").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ===== Inline choices =====

#[tokio::test]
async fn edit_page_offers_two_blank_choice_slots() {
    let state = test_state().await;
    let id = create_question(&state, "Any question.", -1, false).await;

    let (_, body) = get(&state, &format!("/admin/polls/{id}/")).await;

    assert_eq!(body.matches("New choice").count(), 2);
}

#[tokio::test]
async fn add_choice_attaches_to_question() {
    let state = test_state().await;
    let id = create_question(&state, "Any question.", -1, false).await;

    let (status, _, _) = post_form(
        &state,
        &format!("/admin/polls/{id}/choices/"),
        "choice_text=New+option",
    )
    .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    let choices = db::choices_of(&state.db, id).await.unwrap();
    assert_eq!(choices.len(), 1);
    assert_eq!(choices[0].choice_text, "New option");
    assert_eq!(choices[0].votes, 0);
}

#[tokio::test]
async fn blank_choice_submission_adds_nothing() {
    let state = test_state().await;
    let id = create_question(&state, "Any question.", -1, false).await;

    let (status, _, _) =
        post_form(&state, &format!("/admin/polls/{id}/choices/"), "choice_text=").await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert!(db::choices_of(&state.db, id).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_choice_changes_text_and_votes() {
    let state = test_state().await;
    let id = create_question(&state, "Any question.", -1, true).await;
    let choice_id = db::choices_of(&state.db, id).await.unwrap()[0].id;

    let (status, _, _) = post_form(
        &state,
        &format!("/admin/polls/{id}/choices/{choice_id}/"),
        "choice_text=Renamed&votes=7",
    )
    .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    let choices = db::choices_of(&state.db, id).await.unwrap();
    assert_eq!(choices[0].choice_text, "Renamed");
    assert_eq!(choices[0].votes, 7);
}

#[tokio::test]
async fn update_choice_rejects_negative_votes() {
    let state = test_state().await;
    let id = create_question(&state, "Any question.", -1, true).await;
    let choice_id = db::choices_of(&state.db, id).await.unwrap()[0].id;

    let (status, _, _) = post_form(
        &state,
        &format!("/admin/polls/{id}/choices/{choice_id}/"),
        "choice_text=Renamed&votes=-3",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_choice_removes_it() {
    let state = test_state().await;
    let id = create_question(&state, "Any question.", -1, true).await;
    let choice_id = db::choices_of(&state.db, id).await.unwrap()[0].id;

    let (status, _, _) = post_form(
        &state,
        &format!("/admin/polls/{id}/choices/{choice_id}/delete/"),
        "",
    )
    .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert!(db::choices_of(&state.db, id).await.unwrap().is_empty());
}
