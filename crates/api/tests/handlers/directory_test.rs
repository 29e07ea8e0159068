use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::test_utils::{TestContext, as_user};

fn names(body: &Value) -> Vec<String> {
    let mut names: Vec<String> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|user| user["name"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_student_finds_tutors_by_subject_or_name() {
    let ctx = TestContext::new();
    let student = ctx.student_named("Sam Learner").await;
    ctx.tutor_named("Ann Lee", &["Mathematics", "Physics"]).await;
    ctx.tutor_named("Bob Math", &["History"]).await;
    ctx.tutor_named("Cy Ng", &["Chemistry"]).await;
    ctx.student_named("Mathilda Pupil").await;

    let response = as_user(ctx.server.get("/api/search?query=math"), &student).await;

    response.assert_status_ok();
    assert_eq!(names(&response.json()), vec!["Ann Lee", "Bob Math"]);
}

#[tokio::test]
async fn test_tutor_finds_students_by_name_only() {
    let ctx = TestContext::new();
    let tutor = ctx.tutor_named("Tina Teach", &["Algebra"]).await;
    ctx.student_named("Alan Algebra").await;
    ctx.student_named("Ben Stone").await;
    ctx.tutor_named("Alice Algebra", &["Algebra"]).await;

    let response = as_user(ctx.server.get("/api/search?query=ALGEBRA&role=tutor"), &tutor).await;

    response.assert_status_ok();
    assert_eq!(names(&response.json()), vec!["Alan Algebra"]);
}

#[tokio::test]
async fn test_empty_query_lists_whole_target_role() {
    let ctx = TestContext::new();
    let student = ctx.student_named("Sam Learner").await;
    ctx.tutor_named("Ann Lee", &[]).await;
    ctx.tutor_named("Bob Ray", &[]).await;

    let response = as_user(ctx.server.get("/api/search"), &student).await;

    response.assert_status_ok();
    assert_eq!(names(&response.json()), vec!["Ann Lee", "Bob Ray"]);
}

#[tokio::test]
async fn test_query_is_matched_literally() {
    let ctx = TestContext::new();
    let student = ctx.student_named("Sam Learner").await;
    ctx.tutor_named("Ann Lee", &["C++"]).await;
    ctx.tutor_named("Bob Ray", &["Cobol"]).await;

    let response = as_user(ctx.server.get("/api/search?query=c%2B%2B"), &student).await;
    assert_eq!(names(&response.json()), vec!["Ann Lee"]);

    let response = as_user(ctx.server.get("/api/search?query=.*"), &student).await;
    assert_eq!(names(&response.json()), Vec::<String>::new());
}

#[tokio::test]
async fn test_admin_and_mismatched_roles_are_rejected() {
    let ctx = TestContext::new();
    let admin = ctx.admin().await;
    let student = ctx.student().await;

    as_user(ctx.server.get("/api/search?query=a"), &admin)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    as_user(ctx.server.get("/api/search?query=a&role=tutor"), &student)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    as_user(ctx.server.get("/api/search?query=a&role=wizard"), &student)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_requires_identity() {
    let ctx = TestContext::new();

    ctx.server
        .get("/api/search?query=a")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_long_query_is_searched_not_rejected() {
    let ctx = TestContext::new();
    let student = ctx.student_named("Sam Learner").await;
    ctx.tutor_named("Ann Lee", &["Algebra"]).await;

    let text = "algebra".repeat(1000);
    let response = as_user(ctx.server.get(&format!("/api/search?query={text}")), &student).await;

    response.assert_status_ok();
    assert_eq!(names(&response.json()), Vec::<String>::new());
}
