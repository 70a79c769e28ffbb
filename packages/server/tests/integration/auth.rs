use serde_json::json;

use crate::common::{TestApp, TestResponse, routes};

fn ana() -> serde_json::Value {
    json!({
        "username": "ana",
        "email": "a@x.com",
        "password": "p1",
        "password2": "p1",
        "first_name": "Ana",
        "last_name": "Lopez",
    })
}

mod registration {
    use super::*;

    #[tokio::test]
    async fn new_user_can_register_and_has_no_groups() {
        let app = TestApp::spawn().await;

        let res = app.post_without_token(routes::REGISTER, &ana()).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["username"], "ana");
        assert_eq!(res.body["email"], "a@x.com");
        assert_eq!(res.body["first_name"], "Ana");
        assert_eq!(res.body["last_name"], "Lopez");
        assert_eq!(res.body["is_active"], true);
        assert_eq!(res.body["is_staff"], false);
        assert_eq!(res.body["groups"], json!([]));
        assert!(res.body.get("password").is_none());
        assert!(res.body.get("password2").is_none());
    }

    #[tokio::test]
    async fn password_is_stored_hashed() {
        let app = TestApp::spawn().await;
        let res = app.post_without_token(routes::REGISTER, &ana()).await;
        assert_eq!(res.status, 201, "{}", res.text);

        use faculty::entity::user;
        use sea_orm::EntityTrait;
        let stored = user::Entity::find_by_id(res.id())
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password, "p1");
        assert!(stored.password.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn mismatched_passwords_are_rejected_without_creating_a_user() {
        let app = TestApp::spawn().await;
        let mut body = ana();
        body["password2"] = json!("p2");

        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(res.body["field"], "password");
        assert_eq!(res.body["message"], "passwords do not match.");
        assert_eq!(app.user_count().await, 0);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_without_creating_a_user() {
        let app = TestApp::spawn().await;
        let first = app.post_without_token(routes::REGISTER, &ana()).await;
        assert_eq!(first.status, 201, "First registration failed: {}", first.text);

        let mut body = ana();
        body["username"] = json!("ana2");
        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["field"], "email");
        assert_eq!(res.body["message"], "email already in use.");
        assert_eq!(app.user_count().await, 1);
    }

    #[tokio::test]
    async fn email_match_is_case_sensitive() {
        let app = TestApp::spawn().await;
        let first = app.post_without_token(routes::REGISTER, &ana()).await;
        assert_eq!(first.status, 201, "{}", first.text);

        let mut body = ana();
        body["username"] = json!("ana2");
        body["email"] = json!("A@X.com");
        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 201, "{}", res.text);
    }

    #[tokio::test]
    async fn malformed_email_is_rejected_without_creating_a_user() {
        let app = TestApp::spawn().await;

        let mut body = ana();
        body["email"] = json!("not an email");
        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["field"], "email");
        assert_eq!(app.user_count().await, 0);
    }

    #[tokio::test]
    async fn email_is_trimmed_before_storing_and_comparing() {
        let app = TestApp::spawn().await;
        let mut body = ana();
        body["email"] = json!("  a@x.com ");
        let first = app.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(first.status, 201, "{}", first.text);
        assert_eq!(first.body["email"], "a@x.com");

        let mut again = ana();
        again["username"] = json!("ana2");
        let res = app.post_without_token(routes::REGISTER, &again).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["field"], "email");
        assert_eq!(app.user_count().await, 1);
    }

    #[tokio::test]
    async fn concurrent_registrations_with_one_email_create_one_user() {
        let app = TestApp::spawn().await;
        let mut first = ana();
        first["username"] = json!("ana1");
        let mut second = ana();
        second["username"] = json!("ana2");

        let (a, b) = tokio::join!(
            app.post_without_token(routes::REGISTER, &first),
            app.post_without_token(routes::REGISTER, &second),
        );

        let mut statuses = [a.status, b.status];
        statuses.sort_unstable();
        assert_eq!(statuses, [201, 400], "{} / {}", a.text, b.text);
        let rejected = if a.status == 400 { &a } else { &b };
        assert_eq!(rejected.body["field"], "email");
        assert_eq!(app.user_count().await, 1);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let app = TestApp::spawn().await;
        let first = app.post_without_token(routes::REGISTER, &ana()).await;
        assert_eq!(first.status, 201, "{}", first.text);

        let mut body = ana();
        body["email"] = json!("other@x.com");
        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["field"], "username");
    }

    #[tokio::test]
    async fn invalid_username_is_rejected() {
        let app = TestApp::spawn().await;
        let mut body = ana();
        body["username"] = json!("no spaces!");

        let res = app.post_without_token(routes::REGISTER, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["field"], "username");
    }

    #[tokio::test]
    async fn missing_confirmation_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "ana", "email": "a@x.com", "password": "p1"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_json_body_returns_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .client
            .post(format!("http://{}{}", app.addr, routes::REGISTER))
            .header("Content-Type", "application/json")
            .body("not valid json")
            .send()
            .await
            .expect("Failed to send request");

        let res = TestResponse::from_response(res).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod token {
    use super::*;

    #[tokio::test]
    async fn login_returns_token_pair_and_account_attributes() {
        let app = TestApp::spawn().await;
        let reg = app.post_without_token(routes::REGISTER, &ana()).await;
        assert_eq!(reg.status, 201, "{}", reg.text);

        let res = app.login("ana", "p1").await;

        assert!(res.body["access"].is_string());
        assert!(res.body["refresh"].is_string());
        assert_eq!(res.body["user_id"], reg.body["id"]);
        assert_eq!(res.body["username"], "ana");
        assert_eq!(res.body["email"], "a@x.com");
        assert_eq!(res.body["first_name"], "Ana");
        assert_eq!(res.body["last_name"], "Lopez");
        assert_eq!(res.body["is_staff"], false);
        assert_eq!(res.body["is_superuser"], false);
        assert_eq!(res.body["groups"], json!([]));
    }

    #[tokio::test]
    async fn groups_are_listed_and_teacher_keys_omitted_without_profile() {
        let app = TestApp::spawn().await;
        let user_id = app.register("ana", "p1").await;
        app.add_to_group(user_id, "Admins").await;
        app.add_to_group(user_id, "Docentes").await;

        let res = app.login("ana", "p1").await;

        assert_eq!(res.body["groups"], json!(["Admins", "Docentes"]));
        let obj = res.body.as_object().unwrap();
        assert!(!obj.contains_key("docente_id"));
        assert!(!obj.contains_key("codigo_docente"));
    }

    #[tokio::test]
    async fn linked_teacher_profile_adds_teacher_keys() {
        let app = TestApp::spawn().await;
        let staff = app.create_staff_user("admin", "adminpass").await;
        let user_id = app.register("ana", "p1").await;
        let teacher_id = app
            .create_teacher(
                &staff,
                &json!({
                    "usuario": user_id,
                    "codigo_docente": "D007",
                    "nombres": "Ana",
                    "apellidos": "Lopez",
                }),
            )
            .await;

        let res = app.login("ana", "p1").await;

        assert_eq!(res.body["docente_id"], teacher_id);
        assert_eq!(res.body["codigo_docente"], "D007");
        assert!(res.body["access"].is_string());
        assert!(res.body["refresh"].is_string());
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;
        app.register("ana", "p1").await;

        let res = app
            .post_without_token(routes::TOKEN, &json!({"username": "ana", "password": "nope"}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_username_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::TOKEN, &json!({"username": "nobody", "password": "p1"}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn inactive_account_cannot_obtain_tokens() {
        let app = TestApp::spawn().await;
        let id = app.register("ana", "p1").await;

        use faculty::entity::user;
        use sea_orm::{ActiveModelTrait, EntityTrait, Set};
        let stored = user::Entity::find_by_id(id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        let mut active: user::ActiveModel = stored.into();
        active.is_active = Set(false);
        active.update(&app.db).await.unwrap();

        let res = app
            .post_without_token(routes::TOKEN, &json!({"username": "ana", "password": "p1"}))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn refresh_token_yields_a_working_access_token() {
        let app = TestApp::spawn().await;
        app.register("ana", "p1").await;
        let login = app.login("ana", "p1").await;

        let res = app
            .post_without_token(
                routes::TOKEN_REFRESH,
                &json!({"refresh": login.body["refresh"]}),
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        let me = app.get_with_token(routes::ME, &res.access()).await;
        assert_eq!(me.status, 200);
        assert_eq!(me.body["username"], "ana");
    }

    #[tokio::test]
    async fn access_token_cannot_be_used_to_refresh() {
        let app = TestApp::spawn().await;
        app.register("ana", "p1").await;
        let login = app.login("ana", "p1").await;

        let res = app
            .post_without_token(
                routes::TOKEN_REFRESH,
                &json!({"refresh": login.body["access"]}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}

mod authenticated_access {
    use super::*;

    #[tokio::test]
    async fn authenticated_user_can_retrieve_their_profile() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("alice", "securepass").await;

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["username"], "alice");
        assert!(res.body["id"].is_number());
        assert!(res.body["groups"].is_array());
    }

    #[tokio::test]
    async fn request_without_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ME).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn request_with_malformed_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::ME, "not-a-valid-jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn refresh_token_is_not_accepted_as_bearer() {
        let app = TestApp::spawn().await;
        app.register("ana", "p1").await;
        let login = app.login("ana", "p1").await;
        let refresh = login.body["refresh"].as_str().unwrap();

        let res = app.get_with_token(routes::ME, refresh).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn request_with_non_bearer_auth_scheme_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .client
            .get(format!("http://{}{}", app.addr, routes::ME))
            .header("Authorization", "Basic abc123")
            .send()
            .await
            .expect("Failed to send request");

        let res = TestResponse::from_response(res).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}
