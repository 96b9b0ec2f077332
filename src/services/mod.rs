//! Services Layer
//!
//! Business logic extracted from HTTP handlers. Every operation takes the
//! acting user's id explicitly.

pub mod image_service;
pub mod ingredient_validator;
pub mod recipe_list_service;
pub mod recipe_service;
pub mod shopping_list_service;
pub mod subscription_service;
pub mod user_service;

pub use recipe_list_service::RecipeList;
