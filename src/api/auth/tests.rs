use axum::http::{header, Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::repositories;
use crate::test_support;

#[tokio::test]
async fn student_registers_and_logs_in_to_profile_completion() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/register",
            None,
            Some(json!({
                "username": "  wanjiru ",
                "password": "s3cret-pass",
                "confirm_password": "s3cret-pass"
            })),
        ))
        .await
        .expect("register");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");
    let body = test_support::read_json(response).await;
    assert_eq!(body["message"], "Account created. Please login.");

    let user = repositories::users::find_by_username(ctx.state.db(), "wanjiru")
        .await
        .expect("find user")
        .expect("user stored trimmed");
    assert_eq!(user.role, UserRole::Student);
    assert_ne!(user.password, "s3cret-pass");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/login",
            None,
            Some(json!({"username": "wanjiru", "password": "s3cret-pass"})),
        ))
        .await
        .expect("login");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["redirect_to"], "/complete_profile");
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["user"]["role"], "student");
    assert!(body["access_token"].as_str().is_some_and(|token| !token.is_empty()));
}

#[tokio::test]
async fn duplicate_registration_is_rejected_without_new_row() {
    let ctx = test_support::setup_test_context().await;
    test_support::insert_user(ctx.state.db(), "kamau", "first-pass", UserRole::Student).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/register",
            None,
            Some(json!({
                "username": "kamau",
                "password": "other-pass",
                "confirm_password": "other-pass",
                "role": "teacher"
            })),
        ))
        .await
        .expect("register");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = test_support::read_json(response).await;
    assert_eq!(body["detail"], "Username already exists");
    assert_eq!(repositories::users::count(ctx.state.db()).await.expect("count"), 1);
}

#[tokio::test]
async fn registration_rejects_mismatch_and_admin_role() {
    let ctx = test_support::setup_test_context().await;

    let cases = [
        (json!({"username": "a1", "password": "x", "confirm_password": "y"}), "Passwords do not match"),
        (
            json!({"username": "a2", "password": "x", "confirm_password": "x", "role": "admin"}),
            "Invalid role",
        ),
        (json!({"username": "  ", "password": "x", "confirm_password": "x"}), "Username and password are required"),
    ];

    for (payload, expected) in cases {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(Method::POST, "/register", None, Some(payload)))
            .await
            .expect("register");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(test_support::read_json(response).await["detail"], expected);
    }

    assert_eq!(repositories::users::count(ctx.state.db()).await.expect("count"), 0);
}

#[tokio::test]
async fn unapproved_teacher_login_gets_no_session() {
    let ctx = test_support::setup_test_context().await;
    let teacher =
        test_support::insert_user(ctx.state.db(), "mwalimu", "teach-pass", UserRole::Teacher).await;
    test_support::insert_teacher_profile(ctx.state.db(), teacher.id, "0711000001", false).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/login",
            None,
            Some(json!({"username": "mwalimu", "password": "teach-pass"})),
        ))
        .await
        .expect("login");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = test_support::read_json(response).await;
    assert_eq!(body["code"], "pending_approval");
    assert_eq!(body["redirect_to"], "/login");
    assert_eq!(
        body["detail"],
        "Your profile is awaiting admin approval. Please wait before accessing your dashboard."
    );

    let sessions = repositories::auth_sessions::count_for_user(ctx.state.db(), teacher.id)
        .await
        .expect("count sessions");
    assert_eq!(sessions, 0);
}

#[tokio::test]
async fn teacher_login_redirects_by_profile_state() {
    let ctx = test_support::setup_test_context().await;
    let fresh =
        test_support::insert_user(ctx.state.db(), "newteacher", "pass-1", UserRole::Teacher).await;
    let approved =
        test_support::insert_user(ctx.state.db(), "oldteacher", "pass-2", UserRole::Teacher).await;
    test_support::insert_teacher_profile(ctx.state.db(), approved.id, "0711000002", true).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/login",
            None,
            Some(json!({"username": "newteacher", "password": "pass-1"})),
        ))
        .await
        .expect("login fresh");
    let body = test_support::read_json(response).await;
    assert_eq!(body["redirect_to"], format!("/complete_teacher_profile/{}", fresh.id));

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/login",
            None,
            Some(json!({"username": "oldteacher", "password": "pass-2"})),
        ))
        .await
        .expect("login approved");
    let body = test_support::read_json(response).await;
    assert_eq!(body["redirect_to"], "/teacher_dashboard");
}

#[tokio::test]
async fn legacy_plaintext_password_still_logs_in() {
    let ctx = test_support::setup_test_context().await;
    test_support::insert_legacy_user(ctx.state.db(), "admin", "admin123", UserRole::Admin).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/login",
            None,
            Some(json!({"username": "admin", "password": "admin123"})),
        ))
        .await
        .expect("login");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["redirect_to"], "/admin");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/login",
            None,
            Some(json!({"username": "admin", "password": "Admin123"})),
        ))
        .await
        .expect("login wrong");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(test_support::read_json(response).await["detail"], "Invalid credentials");
}

#[tokio::test]
async fn logout_revokes_the_session() {
    let ctx = test_support::setup_test_context().await;
    let student =
        test_support::insert_user(ctx.state.db(), "achieng", "pass", UserRole::Student).await;
    test_support::insert_student_profile(ctx.state.db(), student.id, "Achieng", "Form 1", true)
        .await;
    let token = test_support::session_token(&ctx.state, &student).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/logout", Some(&token), None))
        .await
        .expect("logout");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/student", Some(&token), None))
        .await
        .expect("dashboard after logout");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(test_support::read_json(response).await["code"], "not_authenticated");
}

#[tokio::test]
async fn password_reset_replaces_hash_and_revokes_sessions() {
    let ctx = test_support::setup_test_context().await;
    let user = test_support::insert_user(ctx.state.db(), "otieno", "old-pass", UserRole::Student)
        .await;
    let old_token = test_support::session_token(&ctx.state, &user).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/forgot_password",
            None,
            Some(json!({"username": "otieno"})),
        ))
        .await
        .expect("forgot");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/reset_password/otieno");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/reset_password/otieno",
            None,
            Some(json!({"new_password": "new-pass", "confirm_password": "nope"})),
        ))
        .await
        .expect("reset mismatch");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/reset_password/otieno",
            None,
            Some(json!({"new_password": "new-pass", "confirm_password": "new-pass"})),
        ))
        .await
        .expect("reset");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let sessions = repositories::auth_sessions::count_for_user(ctx.state.db(), user.id)
        .await
        .expect("count sessions");
    assert_eq!(sessions, 0);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/complete_profile", Some(&old_token), None))
        .await
        .expect("old token");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/login",
            None,
            Some(json!({"username": "otieno", "password": "new-pass"})),
        ))
        .await
        .expect("login with new password");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn forgot_password_for_unknown_user_is_not_found() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/forgot_password",
            None,
            Some(json!({"username": "ghost"})),
        ))
        .await
        .expect("forgot");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        test_support::read_json(response).await["detail"],
        "No account found with that username."
    );
}

#[test]
fn reset_path_encodes_username_as_one_segment() {
    assert_eq!(super::reset_password_path("otieno").expect("path"), "/reset_password/otieno");
    assert_eq!(
        super::reset_password_path("mary jane").expect("path"),
        "/reset_password/mary%20jane"
    );
    assert_eq!(
        super::reset_password_path("a/b?c#d").expect("path"),
        "/reset_password/a%2Fb%3Fc%23d"
    );
}

#[tokio::test]
async fn forgot_password_redirect_round_trips_username_with_space() {
    let ctx = test_support::setup_test_context().await;
    test_support::insert_user(ctx.state.db(), "mary jane", "pass", UserRole::Student).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/forgot_password",
            None,
            Some(json!({"username": "mary jane"})),
        ))
        .await
        .expect("forgot");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().expect("location").to_string();
    assert_eq!(location, "/reset_password/mary%20jane");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, &location, None, None))
        .await
        .expect("reset page");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(test_support::read_json(response).await["username"], "mary jane");
}

#[tokio::test]
async fn session_recorded_for_another_role_is_rejected() {
    let ctx = test_support::setup_test_context().await;
    let student =
        test_support::insert_user(ctx.state.db(), "wafula", "pass", UserRole::Student).await;
    let now = crate::core::time::primitive_now_utc();
    repositories::auth_sessions::create(
        ctx.state.db(),
        repositories::auth_sessions::CreateSession {
            id: "forged-admin-session",
            user_id: student.id,
            role: UserRole::Admin,
            created_at: now,
            expires_at: now + time::Duration::hours(1),
        },
    )
    .await
    .expect("session row");
    let token = crate::core::security::create_access_token(
        student.id,
        "forged-admin-session",
        UserRole::Admin,
        ctx.state.settings(),
        None,
    )
    .expect("token");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/admin", Some(&token), None))
        .await
        .expect("admin page");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(test_support::read_json(response).await["code"], "not_authenticated");
}
