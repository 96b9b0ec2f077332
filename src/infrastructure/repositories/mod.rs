//! Repository implementations using SeaORM

pub mod ingredient_repository;
pub mod tag_repository;

pub use ingredient_repository::SeaOrmIngredientRepository;
pub use tag_repository::SeaOrmTagRepository;
