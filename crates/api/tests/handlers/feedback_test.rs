use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

use crate::test_utils::{TestContext, as_user};

#[rstest]
#[case(json!(0))]
#[case(json!(6))]
#[case(json!(3.5))]
#[case(json!("5"))]
#[case(Value::Null)]
#[tokio::test]
async fn test_rating_out_of_range_is_rejected(#[case] rating: Value) {
    let ctx = TestContext::new();
    let student = ctx.student().await;
    let tutor = ctx.tutor().await;
    let id = ctx.create_request(&student, &tutor).await;
    ctx.accept(&tutor, id).await;

    let response = as_user(ctx.server.post(&format!("/api/session/{id}/feedback")), &student)
        .json(&json!({ "rating": rating, "from": student.id, "to": tutor.id }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(ctx.store_feedback_is_empty().await);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(4)]
#[case(5)]
#[tokio::test]
async fn test_every_rating_in_range_is_accepted(#[case] rating: i64) {
    let ctx = TestContext::new();
    let student = ctx.student().await;
    let tutor = ctx.tutor().await;
    let id = ctx.create_request(&student, &tutor).await;
    ctx.accept(&tutor, id).await;

    let response = as_user(ctx.server.post(&format!("/api/session/{id}/feedback")), &tutor)
        .json(&json!({ "rating": rating, "from": tutor.id, "to": student.id }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["message"], "Feedback submitted successfully");
    assert_eq!(body["feedback"]["rating"], rating);
}

#[tokio::test]
async fn test_feedback_needs_accepted_request() {
    let ctx = TestContext::new();
    let student = ctx.student().await;
    let tutor = ctx.tutor().await;
    let id = ctx.create_request(&student, &tutor).await;

    as_user(ctx.server.post(&format!("/api/session/{id}/feedback")), &student)
        .json(&json!({ "rating": 4, "from": student.id, "to": tutor.id }))
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_feedback_for_missing_request() {
    let ctx = TestContext::new();
    let student = ctx.student().await;
    let tutor = ctx.tutor().await;

    as_user(
        ctx.server.post(&format!("/api/session/{}/feedback", uuid::Uuid::new_v4())),
        &student,
    )
    .json(&json!({ "rating": 4, "from": student.id, "to": tutor.id }))
    .await
    .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_feedback_parties_must_match_session() {
    let ctx = TestContext::new();
    let student = ctx.student().await;
    let tutor = ctx.tutor().await;
    let outsider = ctx.tutor().await;
    let id = ctx.create_request(&student, &tutor).await;
    ctx.accept(&tutor, id).await;

    // Reviewer must be the caller.
    as_user(ctx.server.post(&format!("/api/session/{id}/feedback")), &outsider)
        .json(&json!({ "rating": 4, "from": student.id, "to": tutor.id }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    // An outsider cannot rate a session they were not part of.
    as_user(ctx.server.post(&format!("/api/session/{id}/feedback")), &outsider)
        .json(&json!({ "rating": 4, "from": outsider.id, "to": tutor.id }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // Nobody rates themselves.
    as_user(ctx.server.post(&format!("/api/session/{id}/feedback")), &student)
        .json(&json!({ "rating": 4, "from": student.id, "to": student.id }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    assert!(ctx.store_feedback_is_empty().await);
}
