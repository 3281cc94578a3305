// ABOUTME: HTTP API layer for Larder providing REST endpoints and routing
// ABOUTME: Integration layer over the user, tag, ingredient and recipe packages

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod db;
pub mod error;
pub mod extract;
pub mod health;
pub mod labels_handlers;
pub mod middleware;
pub mod recipes_handlers;
pub mod users_handlers;

pub use auth::{api_token_middleware, CurrentUser};
pub use db::DbState;
pub use error::{ApiResult, AppError};

use labels_handlers::LabelResource;
use larder_tags::{Ingredient, Tag};

/// Creates a tag or ingredient router (nested under /api/recipe/tags or /ingredients)
pub fn create_labels_router<L: LabelResource>() -> Router<DbState> {
    Router::new()
        .route(
            "/",
            get(labels_handlers::list_labels::<L>).post(labels_handlers::create_label::<L>),
        )
        .route(
            "/{id}",
            get(labels_handlers::get_label::<L>)
                .patch(labels_handlers::update_label::<L>)
                .delete(labels_handlers::delete_label::<L>),
        )
}

/// Creates the recipes router (nested under /api/recipe/recipes)
pub fn create_recipes_router() -> Router<DbState> {
    Router::new()
        .route(
            "/",
            get(recipes_handlers::list_recipes).post(recipes_handlers::create_recipe),
        )
        .route(
            "/{id}",
            get(recipes_handlers::get_recipe)
                .patch(recipes_handlers::update_recipe)
                .delete(recipes_handlers::delete_recipe),
        )
}

/// Creates the users router (nested under /api/user)
pub fn create_users_router() -> Router<DbState> {
    Router::new()
        .route("/create", post(users_handlers::create_user))
        .route(
            "/token",
            post(users_handlers::create_token).delete(users_handlers::delete_token),
        )
        .route(
            "/me",
            get(users_handlers::get_me).patch(users_handlers::update_me),
        )
}

/// Full application router with authentication, tracing and panic recovery
pub fn create_router(db: DbState) -> Router {
    let recipe_routes = Router::new()
        .nest("/tags", create_labels_router::<Tag>())
        .nest("/ingredients", create_labels_router::<Ingredient>())
        .nest("/recipes", create_recipes_router());

    Router::new()
        .route("/api/health", get(health::health_check))
        .nest("/api/user", create_users_router())
        .nest("/api/recipe", recipe_routes)
        .layer(from_fn_with_state(db.clone(), api_token_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::create_panic_handler())
        .with_state(db)
}
