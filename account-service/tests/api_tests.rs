mod common;

use account_service::domain::account::ports::MailTemplate;
use account_service::domain::account::ports::UserRepository;
use auth::TokenKind;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

async fn register_default(app: &TestApp) -> Value {
    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "email": "a@b.com",
            "username": "user1",
            "password": "12345678"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
async fn test_register_success() {
    let app = TestApp::spawn().await;

    let body = register_default(&app).await;

    let access_token = body["data"]["accessToken"].as_str().unwrap();
    let refresh_token = body["data"]["refreshToken"].as_str().unwrap();
    assert!(access_token.starts_with("Bearer "));
    assert!(refresh_token.starts_with("Bearer "));

    // Both tokens decode back to the registered email
    let claims = app.tokens.verify(TokenKind::Access, access_token).unwrap();
    assert_eq!(claims.email, "a@b.com");
    let claims = app.tokens.verify(TokenKind::Refresh, refresh_token).unwrap();
    assert_eq!(claims.email, "a@b.com");

    assert_eq!(app.repository.count().await.unwrap(), 1);
    let user = app
        .repository
        .find_by_email("a@b.com")
        .await
        .unwrap()
        .unwrap();
    assert!(!user.confirmed);
    assert!(user.password_hash.starts_with("$argon2"));

    // Registration dispatches a confirmation mail
    assert_eq!(
        app.mailer.sent(),
        vec![("a@b.com".to_string(), MailTemplate::ConfirmEmail)]
    );
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::spawn().await;

    register_default(&app).await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "email": "a@b.com",
            "username": "user2",
            "password": "12345678"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"].is_null());
    assert_eq!(body["errors"][0]["message"], "email_must_be_unique");
    assert_eq!(body["errors"][0]["extensions"]["constraint"], "IsEmailUnique");
    assert_eq!(body["errors"][0]["extensions"]["property"], "email");

    // Store count is unchanged
    assert_eq!(app.repository.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_register_reports_every_violation_together() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "email": "not-an-email",
            "username": "ab",
            "password": "short"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse response");
    let constraints: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["extensions"]["constraint"].as_str().unwrap())
        .collect();

    assert!(constraints.contains(&"IsEmail"));
    assert!(constraints.contains(&"Length"));
    assert!(constraints.contains(&"MinLength"));
    assert_eq!(app.repository.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_register_missing_fields() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse response");
    let messages: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["message"].as_str().unwrap())
        .collect();

    assert_eq!(
        messages,
        vec![
            "email_cannot_be_empty",
            "username_cannot_be_empty",
            "password_cannot_be_empty"
        ]
    );
    assert_eq!(
        body["errors"][0]["extensions"]["constraint"],
        "field_cannot_be_empty"
    );
}

#[tokio::test]
async fn test_register_empty_fields_report_transport_and_entity_errors() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "email": "",
            "username": "user1",
            "password": "12345678"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse response");
    let email_constraints: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["extensions"]["property"] == "email" || e["message"] == "email_cannot_be_empty")
        .map(|e| e["extensions"]["constraint"].as_str().unwrap())
        .collect();

    // Transport-level and entity-level entries for the same field
    assert!(email_constraints.contains(&"field_cannot_be_empty"));
    assert!(email_constraints.contains(&"IsNotEmpty"));
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::spawn().await;
    register_default(&app).await;

    let response = app
        .post("/api/auth/login")
        .json(&json!({
            "email": "a@b.com",
            "password": "12345678"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    let access_token = body["data"]["accessToken"].as_str().unwrap();
    let claims = app.tokens.verify(TokenKind::Access, access_token).unwrap();
    assert_eq!(claims.email, "a@b.com");
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_email_same_message() {
    let app = TestApp::spawn().await;
    register_default(&app).await;

    let wrong_password = app
        .post("/api/auth/login")
        .json(&json!({"email": "a@b.com", "password": "wrong"}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password: Value = wrong_password.json().await.unwrap();

    let unknown_email = app
        .post("/api/auth/login")
        .json(&json!({"email": "nobody@b.com", "password": "12345678"}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    let unknown_email: Value = unknown_email.json().await.unwrap();

    assert_eq!(
        wrong_password["errors"][0]["message"],
        "wrong_email_or_password"
    );
    assert_eq!(
        wrong_password["errors"][0]["message"],
        unknown_email["errors"][0]["message"]
    );
    assert!(wrong_password["data"].is_null());
}

#[tokio::test]
async fn test_refresh_tokens_success() {
    let app = TestApp::spawn().await;
    let body = register_default(&app).await;
    let refresh_token = body["data"]["refreshToken"].as_str().unwrap();

    let response = app
        .post("/api/auth/refresh")
        .json(&json!({ "refreshToken": refresh_token }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    let access_token = body["data"]["accessToken"].as_str().unwrap();
    let claims = app.tokens.verify(TokenKind::Access, access_token).unwrap();
    assert_eq!(claims.email, "a@b.com");
}

#[tokio::test]
async fn test_refresh_tokens_garbage_token() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/refresh")
        .json(&json!({ "refreshToken": "Bearer junk" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"][0]["message"], "refreshToken_invalid");
}

#[tokio::test]
async fn test_refresh_tokens_unknown_user() {
    let app = TestApp::spawn().await;

    // Validly signed, but no such account
    let refresh_token = app.tokens.issue(TokenKind::Refresh, "ghost@b.com").unwrap();

    let response = app
        .post("/api/auth/refresh")
        .json(&json!({ "refreshToken": refresh_token }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"][0]["message"], "refreshToken_invalid");
}

#[tokio::test]
async fn test_forgot_password_same_answer_for_existing_and_unknown() {
    let app = TestApp::spawn().await;
    register_default(&app).await;

    for email in ["a@b.com", "nobody@b.com"] {
        let response = app
            .post("/api/auth/forgot-password")
            .json(&json!({ "email": email }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.expect("Failed to parse response");
        assert_eq!(body["data"], "email_sent_if_exist");
    }

    // Only the existing account got a reset mail (after the register-time
    // confirmation mail)
    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1], ("a@b.com".to_string(), MailTemplate::ForgotPassword));
}

#[tokio::test]
async fn test_confirm_email_flow() {
    let app = TestApp::spawn().await;
    register_default(&app).await;

    let confirm_token = app.tokens.issue(TokenKind::Confirm, "a@b.com").unwrap();

    let response = app
        .post("/api/auth/confirm-email")
        .json(&json!({ "confirmToken": confirm_token }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["accessToken"].as_str().unwrap().starts_with("Bearer "));

    let user = app
        .repository
        .find_by_email("a@b.com")
        .await
        .unwrap()
        .unwrap();
    assert!(user.confirmed);
}

#[tokio::test]
async fn test_confirm_email_invalid_token() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/confirm-email")
        .json(&json!({ "confirmToken": "Bearer junk" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"][0]["message"], "confirmToken_invalid");
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn test_change_password_flow() {
    let app = TestApp::spawn().await;
    register_default(&app).await;

    let hash_before = app
        .repository
        .find_by_email("a@b.com")
        .await
        .unwrap()
        .unwrap()
        .password_hash;

    let forgot_token = app.tokens.issue(TokenKind::Forgot, "a@b.com").unwrap();

    let response = app
        .post("/api/auth/change-password")
        .json(&json!({
            "password": "NEWPASS1",
            "forgotToken": forgot_token
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let hash_after = app
        .repository
        .find_by_email("a@b.com")
        .await
        .unwrap()
        .unwrap()
        .password_hash;
    assert_ne!(hash_before, hash_after);

    // Old password no longer verifies
    let old_login = app
        .post("/api/auth/login")
        .json(&json!({"email": "a@b.com", "password": "12345678"}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(old_login.status(), StatusCode::UNAUTHORIZED);

    let new_login = app
        .post("/api/auth/login")
        .json(&json!({"email": "a@b.com", "password": "NEWPASS1"}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(new_login.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_change_password_rejects_short_password() {
    let app = TestApp::spawn().await;
    register_default(&app).await;

    let forgot_token = app.tokens.issue(TokenKind::Forgot, "a@b.com").unwrap();

    let response = app
        .post("/api/auth/change-password")
        .json(&json!({
            "password": "short",
            "forgotToken": forgot_token
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["errors"][0]["message"],
        "password_must_be_at_least_8_characters"
    );
}

#[tokio::test]
async fn test_me_requires_authentication() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/users/me")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"][0]["message"], "must_be_logged_in");
}

#[tokio::test]
async fn test_me_with_valid_token() {
    let app = TestApp::spawn().await;
    let body = register_default(&app).await;
    let access_token = body["data"]["accessToken"].as_str().unwrap();

    let response = app
        .get_authenticated("/api/users/me", access_token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["username"], "user1");
    assert_eq!(body["data"]["email"], "a@b.com");
}

#[tokio::test]
async fn test_me_with_expired_access_token_aborts_request() {
    let app = TestApp::spawn().await;
    register_default(&app).await;

    let expired = app.expired_access_token("a@b.com");

    let response = app
        .get_authenticated("/api/users/me", &expired)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"][0]["message"], "accessToken_expired");
}

#[tokio::test]
async fn test_garbage_authorization_header_resolves_anonymous() {
    let app = TestApp::spawn().await;
    register_default(&app).await;

    // Malformed credentials do not abort the request; the operation's own
    // guard rejects the anonymous context instead.
    let response = app
        .get_authenticated("/api/users/me", "Bearer garbage")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["errors"][0]["message"], "must_be_logged_in");
}

#[tokio::test]
async fn test_list_users() {
    let app = TestApp::spawn().await;
    let body = register_default(&app).await;
    let access_token = body["data"]["accessToken"].as_str().unwrap().to_string();

    app.post("/api/auth/register")
        .json(&json!({
            "email": "c@d.com",
            "username": "user2",
            "password": "12345678"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    let response = app
        .get_authenticated("/api/users", &access_token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    let users = body["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["username"], "user1");
    assert_eq!(users[0]["confirmed"], false);
    assert!(users[0]["id"].is_i64());
    assert!(users[0]["createdAt"].is_string());
    assert!(users[0]["updatedAt"].is_string());
    assert_eq!(users[1]["email"], "c@d.com");
}

#[tokio::test]
async fn test_list_users_requires_authentication() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/users")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
