//! Favorites and shopping cart - per-user recipe sets
//!
//! Both lists have the same contract: adding a recipe that is already there
//! is a Conflict, removing one that is not there is NotFound.

use sea_orm::*;

use crate::domain::DomainError;
use crate::models::{favorite, shopping_cart};
use crate::services::recipe_service::{RecipeShortDto, find_recipe};

/// Which per-user recipe set an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeList {
    Favorites,
    ShoppingCart,
}

impl RecipeList {
    fn label(self) -> &'static str {
        match self {
            RecipeList::Favorites => "favorites",
            RecipeList::ShoppingCart => "shopping cart",
        }
    }

    async fn contains<C: ConnectionTrait>(
        self,
        db: &C,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<bool, DbErr> {
        let found = match self {
            RecipeList::Favorites => favorite::Entity::find_by_id((user_id, recipe_id))
                .one(db)
                .await?
                .is_some(),
            RecipeList::ShoppingCart => shopping_cart::Entity::find_by_id((user_id, recipe_id))
                .one(db)
                .await?
                .is_some(),
        };
        Ok(found)
    }

    async fn insert<C: ConnectionTrait>(
        self,
        db: &C,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<(), DbErr> {
        let now = chrono::Utc::now().to_rfc3339();
        match self {
            RecipeList::Favorites => {
                let row = favorite::ActiveModel {
                    user_id: Set(user_id),
                    recipe_id: Set(recipe_id),
                    added_at: Set(now),
                };
                favorite::Entity::insert(row).exec_without_returning(db).await?;
            }
            RecipeList::ShoppingCart => {
                let row = shopping_cart::ActiveModel {
                    user_id: Set(user_id),
                    recipe_id: Set(recipe_id),
                    added_at: Set(now),
                };
                shopping_cart::Entity::insert(row)
                    .exec_without_returning(db)
                    .await?;
            }
        }
        Ok(())
    }

    async fn delete<C: ConnectionTrait>(
        self,
        db: &C,
        user_id: i32,
        recipe_id: i32,
    ) -> Result<u64, DbErr> {
        let result = match self {
            RecipeList::Favorites => {
                favorite::Entity::delete_by_id((user_id, recipe_id))
                    .exec(db)
                    .await?
            }
            RecipeList::ShoppingCart => {
                shopping_cart::Entity::delete_by_id((user_id, recipe_id))
                    .exec(db)
                    .await?
            }
        };
        Ok(result.rows_affected)
    }
}

/// Put a recipe in the user's list
pub async fn add_recipe(
    db: &DatabaseConnection,
    list: RecipeList,
    user_id: i32,
    recipe_id: i32,
) -> Result<RecipeShortDto, DomainError> {
    let recipe = find_recipe(db, recipe_id).await?;

    if list.contains(db, user_id, recipe_id).await? {
        return Err(DomainError::conflict(format!(
            "Recipe {} is already in {}",
            recipe_id,
            list.label()
        )));
    }

    // A racing duplicate insert trips the primary key and maps to Conflict as well
    list.insert(db, user_id, recipe_id)
        .await
        .map_err(|e| match DomainError::from(e) {
            DomainError::Conflict(_) => DomainError::conflict(format!(
                "Recipe {} is already in {}",
                recipe_id,
                list.label()
            )),
            other => other,
        })?;

    tracing::info!("User {} added recipe {} to {}", user_id, recipe_id, list.label());
    Ok(RecipeShortDto::from(recipe))
}

/// Take a recipe out of the user's list
pub async fn remove_recipe(
    db: &DatabaseConnection,
    list: RecipeList,
    user_id: i32,
    recipe_id: i32,
) -> Result<(), DomainError> {
    find_recipe(db, recipe_id).await?;

    if list.delete(db, user_id, recipe_id).await? == 0 {
        return Err(DomainError::not_found(format!(
            "Recipe {} in {}",
            recipe_id,
            list.label()
        )));
    }

    tracing::info!(
        "User {} removed recipe {} from {}",
        user_id,
        recipe_id,
        list.label()
    );
    Ok(())
}
