//! SeaORM implementation of IngredientRepository

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::{DomainError, Ingredient, IngredientRepository};
use crate::models::ingredient::{Column, Entity as IngredientEntity};

const LIKE_ESCAPE: char = '!';

/// `LIKE` pattern matching names that start with `prefix` literally
fn prefix_pattern(prefix: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, LIKE_ESCAPE | '%' | '_') {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped.push('%');
    LikeExpr::new(escaped).escape(LIKE_ESCAPE)
}

/// SeaORM-based implementation of IngredientRepository
pub struct SeaOrmIngredientRepository {
    db: DatabaseConnection,
}

impl SeaOrmIngredientRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IngredientRepository for SeaOrmIngredientRepository {
    async fn find_all(&self, name_prefix: Option<String>) -> Result<Vec<Ingredient>, DomainError> {
        let mut query = IngredientEntity::find();

        if let Some(prefix) = &name_prefix
            && !prefix.is_empty()
        {
            // SQLite LIKE is case-insensitive for ASCII only
            query = query.filter(Expr::col(Column::Name).like(prefix_pattern(prefix)));
        }

        let ingredients = query.order_by_asc(Column::Name).all(&self.db).await?;

        Ok(ingredients.into_iter().map(Ingredient::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, DomainError> {
        let result = IngredientEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Ingredient::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::ingredient;
    use sea_orm::{ActiveModelTrait, Set};

    async fn repo_with(names: &[&str]) -> SeaOrmIngredientRepository {
        let db = db::init_db("sqlite::memory:")
            .await
            .expect("Failed to init DB");
        for name in names {
            ingredient::ActiveModel {
                name: Set(name.to_string()),
                measurement_unit: Set("g".to_string()),
                ..Default::default()
            }
            .insert(&db)
            .await
            .expect("Failed to create ingredient");
        }
        SeaOrmIngredientRepository::new(db)
    }

    async fn names(repo: &SeaOrmIngredientRepository, prefix: &str) -> Vec<String> {
        repo.find_all(Some(prefix.to_string()))
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect()
    }

    #[tokio::test]
    async fn test_prefix_search() {
        let repo = repo_with(&["sugar", "apple", "apricot"]).await;
        assert_eq!(names(&repo, "ap").await, vec!["apple", "apricot"]);
        assert_eq!(repo.find_all(None).await.unwrap().len(), 3);
        assert_eq!(names(&repo, "").await.len(), 3);
    }

    #[tokio::test]
    async fn test_wildcards_in_prefix_are_literal() {
        let repo = repo_with(&["apple", "sugar", "100% juice", "half_fat milk", "wow! bar"]).await;
        assert!(names(&repo, "_").await.is_empty());
        assert!(names(&repo, "%").await.is_empty());
        assert!(names(&repo, "!").await.is_empty());
        assert_eq!(names(&repo, "100%").await, vec!["100% juice"]);
        assert_eq!(names(&repo, "half_").await, vec!["half_fat milk"]);
        assert!(names(&repo, "hal_").await.is_empty());
        assert_eq!(names(&repo, "wow!").await, vec!["wow! bar"]);
    }
}
