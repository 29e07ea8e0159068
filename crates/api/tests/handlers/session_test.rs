use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::test_utils::{TestContext, as_user, session_request_body};

#[tokio::test]
async fn test_request_accept_and_rate() {
    let ctx = TestContext::new();
    let student = ctx.student().await;
    let tutor = ctx.tutor().await;

    let id = ctx.create_request(&student, &tutor).await;

    let response = as_user(ctx.server.get(&format!("/api/session/{id}")), &student).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["session"]["status"], "pending");
    assert_eq!(body["session"]["tutorName"], json!(tutor.name));

    let response = as_user(ctx.server.put(&format!("/api/session/{id}/respond")), &tutor)
        .json(&json!({ "status": "accepted" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Session request accepted");
    assert_eq!(body["sessionRequest"]["status"], "accepted");

    let response = as_user(ctx.server.post(&format!("/api/session/{id}/feedback")), &student)
        .json(&json!({ "rating": 5, "comments": "Great", "from": student.id, "to": tutor.id }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["feedback"]["rating"], 5);
    assert_eq!(body["feedback"]["from"], json!(student.id));

    let response = as_user(ctx.server.post(&format!("/api/session/{id}/feedback")), &student)
        .json(&json!({ "rating": 10, "from": student.id, "to": tutor.id }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_rejects_unknown_tutor() {
    let ctx = TestContext::new();
    let student = ctx.student().await;

    let response = as_user(ctx.server.post("/api/session/request"), &student)
        .json(&session_request_body(student.id, Uuid::new_v4()))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid tutor ID");
}

#[tokio::test]
async fn test_create_rejects_tutor_as_student() {
    let ctx = TestContext::new();
    let student = ctx.student().await;
    let tutor = ctx.tutor().await;
    let other_tutor = ctx.tutor().await;

    // The caller is a tutor posing as the student side.
    let response = as_user(ctx.server.post("/api/session/request"), &tutor)
        .json(&session_request_body(tutor.id, other_tutor.id))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Invalid student ID");

    // A student cannot file on someone else's behalf.
    let someone = ctx.student().await;
    let response = as_user(ctx.server.post("/api/session/request"), &student)
        .json(&session_request_body(someone.id, tutor.id))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_requires_subject() {
    let ctx = TestContext::new();
    let student = ctx.student().await;
    let tutor = ctx.tutor().await;

    let mut body = session_request_body(student.id, tutor.id);
    body["subject"] = json!("   ");
    let response = as_user(ctx.server.post("/api/session/request"), &student)
        .json(&body)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_requires_identity() {
    let ctx = TestContext::new();
    let student = ctx.student().await;
    let tutor = ctx.tutor().await;

    let response = ctx
        .server
        .post("/api/session/request")
        .json(&session_request_body(student.id, tutor.id))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_respond_by_other_tutor_is_forbidden() {
    let ctx = TestContext::new();
    let student = ctx.student().await;
    let tutor = ctx.tutor().await;
    let other = ctx.tutor().await;
    let id = ctx.create_request(&student, &tutor).await;

    let foreign = as_user(ctx.server.put(&format!("/api/session/{id}/respond")), &other)
        .json(&json!({ "status": "accepted" }))
        .await;
    let missing = as_user(
        ctx.server.put(&format!("/api/session/{}/respond", Uuid::new_v4())),
        &other,
    )
    .json(&json!({ "status": "accepted" }))
    .await;

    foreign.assert_status(StatusCode::FORBIDDEN);
    missing.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(foreign.text(), missing.text());

    let response = as_user(ctx.server.get(&format!("/api/session/{id}")), &student).await;
    let body: Value = response.json();
    assert_eq!(body["session"]["status"], "pending");
}

#[tokio::test]
async fn test_respond_rejects_unknown_status() {
    let ctx = TestContext::new();
    let student = ctx.student().await;
    let tutor = ctx.tutor().await;
    let id = ctx.create_request(&student, &tutor).await;

    for status in ["pending", "maybe", "ACCEPTED"] {
        as_user(ctx.server.put(&format!("/api/session/{id}/respond")), &tutor)
            .json(&json!({ "status": status }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_second_response_conflicts() {
    let ctx = TestContext::new();
    let student = ctx.student().await;
    let tutor = ctx.tutor().await;
    let id = ctx.create_request(&student, &tutor).await;

    as_user(ctx.server.put(&format!("/api/session/{id}/respond")), &tutor)
        .json(&json!({ "status": "declined" }))
        .await
        .assert_status_ok();

    as_user(ctx.server.put(&format!("/api/session/{id}/respond")), &tutor)
        .json(&json!({ "status": "accepted" }))
        .await
        .assert_status(StatusCode::CONFLICT);

    let response = as_user(ctx.server.get(&format!("/api/session/{id}")), &tutor).await;
    let body: Value = response.json();
    assert_eq!(body["session"]["status"], "declined");
}

#[tokio::test]
async fn test_concurrent_responses_have_one_winner() {
    let ctx = TestContext::new();
    let student = ctx.student().await;
    let tutor = ctx.tutor().await;
    let id = ctx.create_request(&student, &tutor).await;
    let path = format!("/api/session/{id}/respond");

    let (accept, decline) = tokio::join!(
        as_user(ctx.server.put(&path), &tutor)
            .json(&json!({ "status": "accepted" }))
            .into_future(),
        as_user(ctx.server.put(&path), &tutor)
            .json(&json!({ "status": "declined" }))
            .into_future(),
    );

    let mut codes = vec![accept.status_code().as_u16(), decline.status_code().as_u16()];
    codes.sort_unstable();
    assert_eq!(codes, vec![200, 409]);

    let winner = if accept.status_code() == StatusCode::OK { "accepted" } else { "declined" };
    let response = as_user(ctx.server.get(&format!("/api/session/{id}")), &student).await;
    let body: Value = response.json();
    assert_eq!(body["session"]["status"], winner);
}

#[tokio::test]
async fn test_list_views_carry_counterpart_names() {
    let ctx = TestContext::new();
    let student = ctx.student_named("Sam Student").await;
    let tutor = ctx.tutor_named("Tina Tutor", &["Algebra"]).await;
    let bystander = ctx.student().await;
    ctx.create_request(&student, &tutor).await;
    ctx.create_request(&bystander, &tutor).await;

    let response = as_user(ctx.server.get("/api/session-requests"), &student).await;
    response.assert_status_ok();
    let body: Value = response.json();
    let requests = body["requests"].as_array().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["counterpartName"], "Tina Tutor");

    let response = as_user(ctx.server.get("/api/session-requests?role=tutor"), &tutor).await;
    let body: Value = response.json();
    assert_eq!(body["requests"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_other_users_requests() {
    let ctx = TestContext::new();
    let student = ctx.student().await;
    let tutor = ctx.tutor().await;
    let admin = ctx.admin().await;
    ctx.create_request(&student, &tutor).await;

    as_user(
        ctx.server.get(&format!("/api/session-requests?role=student&userId={}", student.id)),
        &tutor,
    )
    .await
    .assert_status(StatusCode::FORBIDDEN);

    as_user(ctx.server.get("/api/session-requests?role=mentor"), &student)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let response = as_user(
        ctx.server.get(&format!("/api/session-requests?role=student&userId={}", student.id)),
        &admin,
    )
    .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["requests"].as_array().unwrap().len(), 1);
}
