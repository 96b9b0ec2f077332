#![allow(dead_code)]

use std::path::PathBuf;

use foodgram::auth;
use foodgram::db;
use foodgram::infrastructure::AppState;
use foodgram::models::{ingredient, tag, user};
use foodgram::services::ingredient_validator::IngredientAmountInput;
use foodgram::services::recipe_service::{self, CreateRecipeInput, RecipeDto};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// 1x1 transparent PNG
pub const PNG_1X1: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

// Helper to create a test app state with its own media directory
pub async fn setup_test_state() -> AppState {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    let media_root: PathBuf =
        std::env::temp_dir().join(format!("foodgram-test-{}", uuid::Uuid::new_v4()));
    AppState::new(db, media_root, 6)
}

pub async fn create_user(db: &DatabaseConnection, username: &str) -> i32 {
    let model = user::ActiveModel {
        email: Set(format!("{}@example.com", username)),
        username: Set(username.to_string()),
        first_name: Set("Test".to_string()),
        last_name: Set("User".to_string()),
        password_hash: Set("hash".to_string()),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
        ..Default::default()
    };
    model.insert(db).await.expect("Failed to create user").id
}

pub async fn create_ingredient(db: &DatabaseConnection, name: &str, unit: &str) -> i32 {
    let model = ingredient::ActiveModel {
        name: Set(name.to_string()),
        measurement_unit: Set(unit.to_string()),
        ..Default::default()
    };
    model
        .insert(db)
        .await
        .expect("Failed to create ingredient")
        .id
}

pub async fn create_tag(db: &DatabaseConnection, name: &str, slug: &str) -> i32 {
    let model = tag::ActiveModel {
        name: Set(name.to_string()),
        slug: Set(slug.to_string()),
        color: Set("#49B64E".to_string()),
        ..Default::default()
    };
    model.insert(db).await.expect("Failed to create tag").id
}

pub fn token_for(user_id: i32, username: &str) -> String {
    auth::create_jwt(user_id, &format!("{}@example.com", username))
        .expect("Failed to create token")
}

pub fn recipe_input(name: &str, ingredients: &[(i32, i32)], tags: &[i32]) -> CreateRecipeInput {
    CreateRecipeInput {
        ingredients: ingredients
            .iter()
            .map(|&(id, amount)| IngredientAmountInput { id, amount })
            .collect(),
        tags: tags.to_vec(),
        image: PNG_1X1.to_string(),
        name: name.to_string(),
        text: "Mix everything.".to_string(),
        cooking_time: 10,
    }
}

pub async fn create_recipe(
    state: &AppState,
    author_id: i32,
    name: &str,
    ingredients: &[(i32, i32)],
    tags: &[i32],
) -> RecipeDto {
    recipe_service::create_recipe(
        state.db(),
        state.media_root(),
        author_id,
        recipe_input(name, ingredients, tags),
    )
    .await
    .expect("Failed to create recipe")
}
