use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/groups", group_routes())
        .nest("/roles", role_routes())
        .nest("/specialties", specialty_routes())
        .nest("/teachers", teacher_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::obtain_token))
        .routes(routes!(handlers::auth::refresh_token))
        .routes(routes!(handlers::auth::me))
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::user::list_users))
        .routes(routes!(handlers::user::get_user))
}

fn group_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::user::list_groups))
}

fn role_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::role::list_roles,
            handlers::role::create_role
        ))
        .routes(routes!(
            handlers::role::get_role,
            handlers::role::update_role,
            handlers::role::delete_role
        ))
}

fn specialty_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(
        handlers::specialty::list_specialties,
        handlers::specialty::create_specialty
    ))
}

fn teacher_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::teacher::list_teachers,
            handlers::teacher::create_teacher
        ))
        .routes(routes!(
            handlers::teacher::get_teacher,
            handlers::teacher::update_teacher,
            handlers::teacher::delete_teacher
        ))
}
