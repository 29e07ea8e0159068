use axum::http::{HeaderName, HeaderValue, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use test_log::test;
use uuid::Uuid;

use crate::test_utils::{TestContext, as_user};
use educonnect_api::middleware::auth::CALLER_HEADER;
use educonnect_core::{errors::FORBIDDEN_MESSAGE, models::user::VerificationStatus};
use educonnect_db::Store;

const ADMIN_GETS: [&str; 6] = [
    "/api/admin/users",
    "/api/admin/tutors",
    "/api/admin/students",
    "/api/admin/session-requests",
    "/api/admin/feedbacks",
    "/api/admin/summary",
];

#[test(tokio::test)]
async fn test_admin_routes_deny_everyone_else() {
    let ctx = TestContext::new();
    let student = ctx.student().await;
    let tutor = ctx.tutor().await;

    for path in ADMIN_GETS {
        let denials = [
            as_user(ctx.server.get(path), &student).await,
            as_user(ctx.server.get(path), &tutor).await,
            ctx.server.get(path).await,
            ctx.server
                .get(path)
                .add_header(
                    HeaderName::from_static(CALLER_HEADER),
                    HeaderValue::from_static("not-a-uuid"),
                )
                .await,
            ctx.server
                .get(path)
                .add_header(
                    HeaderName::from_static(CALLER_HEADER),
                    HeaderValue::from_str(&Uuid::new_v4().to_string()).unwrap(),
                )
                .await,
        ];
        for response in denials {
            response.assert_status(StatusCode::FORBIDDEN);
            let body: Value = response.json();
            assert_eq!(body["message"], FORBIDDEN_MESSAGE);
        }
    }
}

#[test(tokio::test)]
async fn test_malformed_admin_input_is_still_forbidden_for_non_admins() {
    let ctx = TestContext::new();
    let student = ctx.student().await;
    let tutor = ctx.tutor().await;

    let responses = [
        as_user(ctx.server.put("/api/admin/users/not-a-uuid/verify"), &student)
            .json(&json!({ "verificationStatus": "verified" }))
            .await,
        as_user(ctx.server.put(&format!("/api/admin/users/{}/verify", tutor.id)), &student)
            .text("{not json")
            .content_type("application/json")
            .await,
        as_user(ctx.server.put(&format!("/api/admin/users/{}/verify", tutor.id)), &student)
            .json(&json!({ "status": "verified" }))
            .await,
        as_user(ctx.server.get("/api/admin/users?role=a&role=b"), &student).await,
        as_user(ctx.server.get("/api/admin/users?role=wizard"), &tutor).await,
        ctx.server.put("/api/admin/users/not-a-uuid/verify").await,
    ];

    for response in responses {
        response.assert_status(StatusCode::FORBIDDEN);
        let body: Value = response.json();
        assert_eq!(body["message"], FORBIDDEN_MESSAGE);
    }
}

#[test(tokio::test)]
async fn test_malformed_admin_input_is_a_bad_request_for_admins() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;

    as_user(ctx.server.put("/api/admin/users/not-a-uuid/verify"), &admin)
        .json(&json!({ "verificationStatus": "verified" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    as_user(ctx.server.get("/api/admin/users?role=a&role=b"), &admin)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[test(tokio::test)]
async fn test_non_admin_cannot_verify_tutor() {
    let ctx = TestContext::new();
    let tutor = ctx.tutor().await;

    as_user(ctx.server.put(&format!("/api/admin/users/{}/verify", tutor.id)), &tutor)
        .json(&json!({ "verificationStatus": "verified" }))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let stored = ctx.store.find_user(tutor.id).await.unwrap().unwrap();
    assert_eq!(
        stored.profile.as_tutor().unwrap().verification_status,
        VerificationStatus::Pending
    );
}

#[test(tokio::test)]
async fn test_verification_is_visible_in_profile() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;
    let tutor = ctx.tutor().await;

    let response = as_user(ctx.server.put(&format!("/api/admin/users/{}/verify", tutor.id)), &admin)
        .json(&json!({ "verificationStatus": "verified" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Tutor verification status updated");
    assert_eq!(body["user"]["verificationStatus"], "verified");

    let response = as_user(ctx.server.get(&format!("/api/profile/{}", tutor.id)), &tutor).await;
    let body: Value = response.json();
    assert_eq!(body["user"]["verificationStatus"], "verified");
}

#[test(tokio::test)]
async fn test_verify_rejects_bad_status_and_non_tutors() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;
    let tutor = ctx.tutor().await;
    let student = ctx.student().await;

    as_user(ctx.server.put(&format!("/api/admin/users/{}/verify", tutor.id)), &admin)
        .json(&json!({ "verificationStatus": "approved" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    as_user(ctx.server.put(&format!("/api/admin/users/{}/verify", student.id)), &admin)
        .json(&json!({ "verificationStatus": "verified" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[test(tokio::test)]
async fn test_user_listings() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;
    ctx.student().await;
    ctx.student().await;
    ctx.tutor().await;

    let response = as_user(ctx.server.get("/api/admin/users"), &admin).await;
    let body: Value = response.json();
    assert_eq!(body["users"].as_array().unwrap().len(), 4);

    let response = as_user(ctx.server.get("/api/admin/users?role=student"), &admin).await;
    let body: Value = response.json();
    assert_eq!(body["users"].as_array().unwrap().len(), 2);

    let response = as_user(ctx.server.get("/api/admin/tutors"), &admin).await;
    let body: Value = response.json();
    assert_eq!(body["tutors"].as_array().unwrap().len(), 1);
    assert!(body["tutors"][0].get("passwordHash").is_none());

    as_user(ctx.server.get("/api/admin/users?role=wizard"), &admin)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[test(tokio::test)]
async fn test_session_and_feedback_overviews() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;
    let student = ctx.student_named("Sam Student").await;
    let tutor = ctx.tutor_named("Tina Tutor", &["Algebra"]).await;
    let accepted = ctx.create_request(&student, &tutor).await;
    ctx.accept(&tutor, accepted).await;
    ctx.create_request(&student, &tutor).await;

    for (from, to, rating) in [(&student, &tutor, 5), (&tutor, &student, 4)] {
        as_user(ctx.server.post(&format!("/api/session/{accepted}/feedback")), from)
            .json(&json!({ "rating": rating, "from": from.id, "to": to.id }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = as_user(ctx.server.get("/api/admin/session-requests"), &admin).await;
    let body: Value = response.json();
    let requests = body["sessionRequests"].as_array().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r["studentName"] == "Sam Student"));
    assert!(requests.iter().all(|r| r["tutorName"] == "Tina Tutor"));

    let response = as_user(ctx.server.get("/api/admin/feedbacks"), &admin).await;
    let body: Value = response.json();
    let feedbacks = body["feedbacks"].as_array().unwrap();
    assert_eq!(feedbacks.len(), 2);
    assert_eq!(feedbacks[0]["from"]["name"], "Sam Student");
    assert_eq!(feedbacks[0]["to"]["role"], "tutor");

    let response = as_user(ctx.server.get("/api/admin/summary"), &admin).await;
    response.assert_status_ok();
    let summary: Value = response.json();
    assert_eq!(summary["users"]["students"], 1);
    assert_eq!(summary["users"]["tutors"], 1);
    assert_eq!(summary["users"]["admins"], 1);
    assert_eq!(summary["tutorVerification"]["pending"], 1);
    assert_eq!(summary["sessionRequests"]["pending"], 1);
    assert_eq!(summary["sessionRequests"]["accepted"], 1);
    assert_eq!(summary["feedback"]["total"], 2);
    assert_eq!(summary["feedback"]["averageRating"], 4.5);
}
