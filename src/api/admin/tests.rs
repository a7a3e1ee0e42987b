use axum::http::{header, Method, StatusCode};
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::repositories;
use crate::test_support;

async fn admin_token(ctx: &test_support::TestContext) -> String {
    let admin = test_support::insert_user(ctx.state.db(), "head", "pass", UserRole::Admin).await;
    test_support::session_token(&ctx.state, &admin).await
}

#[tokio::test]
async fn manage_students_searches_and_sorts() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let token = admin_token(&ctx).await;

    for (username, first_name, form) in
        [("u1", "Zawadi", "Form 2"), ("u2", "Baraka", "Form 1"), ("u3", "Amani", "Form 2")]
    {
        let user = test_support::insert_user(db, username, "pass", UserRole::Student).await;
        test_support::insert_student_profile(db, user.id, first_name, form, false).await;
    }

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/admin/manage_students?search=FORM%202&sort=first_name&order=desc",
            Some(&token),
            None,
        ))
        .await
        .expect("search");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    let names: Vec<&str> = body["students"]
        .as_array()
        .expect("students")
        .iter()
        .map(|student| student["first_name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["Zawadi", "Amani"]);
    assert_eq!(body["sort"], "first_name");
    assert_eq!(body["order"], "desc");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/admin/manage_students?sort=password",
            Some(&token),
            None,
        ))
        .await
        .expect("unknown sort");
    let body = test_support::read_json(response).await;
    assert_eq!(body["sort"], "id");
    assert_eq!(body["students"].as_array().expect("students").len(), 3);
}

#[tokio::test]
async fn mark_paid_and_blocked_toggle_activation() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let token = admin_token(&ctx).await;
    let user = test_support::insert_user(db, "payer", "pass", UserRole::Student).await;
    let profile = test_support::insert_student_profile(db, user.id, "Payer", "Form 4", false).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/mark_paid/{}", profile.id),
            Some(&token),
            None,
        ))
        .await
        .expect("mark paid");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/admin");
    let stored = repositories::student_profiles::find_by_id(db, profile.id)
        .await
        .expect("find")
        .expect("profile");
    assert!(stored.is_active);

    ctx.app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/mark_blocked/{}", profile.id),
            Some(&token),
            None,
        ))
        .await
        .expect("mark blocked");
    let stored = repositories::student_profiles::find_by_id(db, profile.id)
        .await
        .expect("find")
        .expect("profile");
    assert!(!stored.is_active);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/mark_paid/9999", Some(&token), None))
        .await
        .expect("missing student");
    let body = test_support::read_json(response).await;
    assert_eq!(body["category"], "danger");
    assert_eq!(body["message"], "Student not found.");
}

#[tokio::test]
async fn approving_a_teacher_opens_the_dashboard() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let token = admin_token(&ctx).await;
    let teacher = test_support::insert_user(db, "teach", "pass", UserRole::Teacher).await;
    let profile = test_support::insert_teacher_profile(db, teacher.id, "0720555444", false).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/admin/manage_teachers", Some(&token), None))
        .await
        .expect("list teachers");
    let body = test_support::read_json(response).await;
    assert_eq!(body["teachers"][0]["is_approved"], false);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/admin/approve_teacher/{}", profile.id),
            Some(&token),
            None,
        ))
        .await
        .expect("approve");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/admin/manage_teachers");

    let teacher_token = test_support::session_token(&ctx.state, &teacher).await;
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/teacher_dashboard",
            Some(&teacher_token),
            None,
        ))
        .await
        .expect("dashboard");
    assert_eq!(response.status(), StatusCode::OK);

    ctx.app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/admin/block_teacher/{}", profile.id),
            Some(&token),
            None,
        ))
        .await
        .expect("block");
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/teacher_dashboard",
            Some(&teacher_token),
            None,
        ))
        .await
        .expect("dashboard after block");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/admin/approve_teacher/4242",
            Some(&token),
            None,
        ))
        .await
        .expect("missing teacher");
    assert_eq!(test_support::read_json(response).await["message"], "Teacher not found.");
}
