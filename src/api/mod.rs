pub mod auth;
pub mod error;
pub mod favorite;
pub mod health;
pub mod ingredient;
pub mod pagination;
pub mod recipe;
pub mod shopping_cart;
pub mod subscription;
pub mod tag;
pub mod user;

use axum::{
    Router,
    routing::{get, post},
};

use crate::infrastructure::AppState;

/// All JSON routes, to be nested under `/api`
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/auth/token/login", post(auth::login))
        // Users and subscriptions (literal segments before `:id`)
        .route("/users", get(user::list_users).post(user::register))
        .route("/users/me", get(user::me))
        .route("/users/subscriptions", get(subscription::list_subscriptions))
        .route("/users/:id", get(user::get_user))
        .route(
            "/users/:id/subscribe",
            post(subscription::subscribe).delete(subscription::unsubscribe),
        )
        // Reference data
        .route("/tags", get(tag::list_tags))
        .route("/tags/:id", get(tag::get_tag))
        .route("/ingredients", get(ingredient::list_ingredients))
        .route("/ingredients/:id", get(ingredient::get_ingredient))
        // Recipes
        .route(
            "/recipes",
            get(recipe::list_recipes).post(recipe::create_recipe),
        )
        .route(
            "/recipes/download_shopping_cart",
            get(shopping_cart::download_shopping_cart),
        )
        .route(
            "/recipes/:id",
            get(recipe::get_recipe)
                .patch(recipe::update_recipe)
                .put(recipe::update_recipe)
                .delete(recipe::delete_recipe),
        )
        .route(
            "/recipes/:id/favorite",
            post(favorite::add_favorite).delete(favorite::remove_favorite),
        )
        .route(
            "/recipes/:id/shopping_cart",
            post(shopping_cart::add_to_cart).delete(shopping_cart::remove_from_cart),
        )
        .with_state(state)
}
