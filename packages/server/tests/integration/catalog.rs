use serde_json::json;

use crate::common::{TestApp, routes};

mod roles {
    use super::*;

    #[tokio::test]
    async fn staff_can_manage_roles() {
        let app = TestApp::spawn().await;
        let token = app.create_staff_user("admin", "adminpass").await;

        let created = app
            .post_with_token(
                routes::ROLES,
                &json!({"nombre_rol": "Coordinador", "descripcion": "Coordina el área"}),
                &token,
            )
            .await;
        assert_eq!(created.status, 201, "{}", created.text);
        let id = created.body["rol_id"].as_i64().unwrap() as i32;
        assert_eq!(created.body["nombre_rol"], "Coordinador");

        let updated = app
            .patch_with_token(&routes::role(id), &json!({"descripcion": null}), &token)
            .await;
        assert_eq!(updated.status, 200, "{}", updated.text);
        assert_eq!(updated.body["descripcion"], serde_json::Value::Null);
        assert_eq!(updated.body["nombre_rol"], "Coordinador");

        let list = app.get_with_token(routes::ROLES, &token).await;
        assert_eq!(list.body.as_array().unwrap().len(), 1);

        let deleted = app.delete_with_token(&routes::role(id), &token).await;
        assert_eq!(deleted.status, 204);
        let gone = app.get_with_token(&routes::role(id), &token).await;
        assert_eq!(gone.status, 404);
    }

    #[tokio::test]
    async fn duplicate_role_name_conflicts() {
        let app = TestApp::spawn().await;
        let token = app.create_staff_user("admin", "adminpass").await;
        let body = json!({"nombre_rol": "Coordinador"});

        let first = app.post_with_token(routes::ROLES, &body, &token).await;
        assert_eq!(first.status, 201, "{}", first.text);
        let res = app.post_with_token(routes::ROLES, &body, &token).await;

        assert_eq!(res.status, 409);
    }

    #[tokio::test]
    async fn non_staff_cannot_create_roles() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("ana", "p1").await;

        let res = app
            .post_with_token(routes::ROLES, &json!({"nombre_rol": "X"}), &token)
            .await;

        assert_eq!(res.status, 403);
    }
}

mod specialties {
    use super::*;

    #[tokio::test]
    async fn staff_can_create_and_everyone_can_list() {
        let app = TestApp::spawn().await;
        let staff = app.create_staff_user("admin", "adminpass").await;
        let user = app.create_authenticated_user("ana", "p1").await;

        let created = app
            .post_with_token(
                routes::SPECIALTIES,
                &json!({"nombre_especialidad": "Física"}),
                &staff,
            )
            .await;
        assert_eq!(created.status, 201, "{}", created.text);
        assert!(created.body["especialidad_id"].is_number());

        let list = app.get_with_token(routes::SPECIALTIES, &user).await;
        assert_eq!(list.status, 200);
        assert_eq!(list.body[0]["nombre_especialidad"], "Física");
    }

    #[tokio::test]
    async fn blank_name_is_a_field_error() {
        let app = TestApp::spawn().await;
        let staff = app.create_staff_user("admin", "adminpass").await;

        let res = app
            .post_with_token(
                routes::SPECIALTIES,
                &json!({"nombre_especialidad": "  "}),
                &staff,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["field"], "nombre_especialidad");
    }
}

mod users {
    use super::*;

    #[tokio::test]
    async fn staff_can_list_users_with_groups() {
        let app = TestApp::spawn().await;
        let token = app.create_staff_user("admin", "adminpass").await;
        let ana = app.register("ana", "p1").await;
        app.add_to_group(ana, "Coordinadores").await;

        let res = app.get_with_token(routes::USERS, &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["pagination"]["total"], 2);
        let listed = res.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .find(|u| u["username"] == "ana")
            .expect("ana should be listed")
            .clone();
        assert_eq!(listed["groups"][0]["name"], "Coordinadores");
    }

    #[tokio::test]
    async fn non_staff_cannot_list_users() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("ana", "p1").await;

        let res = app.get_with_token(routes::USERS, &token).await;

        assert_eq!(res.status, 403);
    }

    #[tokio::test]
    async fn users_can_read_only_themselves() {
        let app = TestApp::spawn().await;
        let other = app.register("bruno", "p1").await;
        let token = app.create_authenticated_user("ana", "p1").await;
        let me = app.get_with_token(routes::ME, &token).await;
        let my_id = me.id();

        let own = app.get_with_token(&routes::user(my_id), &token).await;
        assert_eq!(own.status, 200);

        let theirs = app.get_with_token(&routes::user(other), &token).await;
        assert_eq!(theirs.status, 403);
    }

    #[tokio::test]
    async fn groups_are_seeded_but_not_assigned() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_user("ana", "p1").await;

        let groups = app.get_with_token(routes::GROUPS, &token).await;
        let names: Vec<&str> = groups
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|g| g["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Admins", "Coordinadores", "DocentesStaff"]);

        let me = app.get_with_token(routes::ME, &token).await;
        assert_eq!(me.body["groups"], json!([]));
    }
}
