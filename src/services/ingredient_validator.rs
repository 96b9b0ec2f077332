//! Ingredient list validation for recipe create/update
//!
//! Checks run in this order: amounts, existence, duplicates. The first
//! failing check decides the error. Nothing is written here; the recipe
//! service persists the validated list.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

use crate::domain::DomainError;
use crate::models::ingredient::{self, Entity as IngredientEntity};

/// One `{id, amount}` entry of a recipe submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IngredientAmountInput {
    pub id: i32,
    pub amount: i32,
}

/// A resolved ledger entry, ready for insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedIngredient {
    pub ingredient: ingredient::Model,
    pub amount: i32,
}

/// Validate `items` against the set of ingredients known to the database.
pub fn check_ingredients(
    items: &[IngredientAmountInput],
    known: &HashMap<i32, ingredient::Model>,
) -> Result<Vec<ValidatedIngredient>, DomainError> {
    if items.is_empty() {
        return Err(DomainError::validation(
            "a recipe needs at least one ingredient",
        ));
    }

    if let Some(item) = items.iter().find(|item| item.amount < 1) {
        return Err(DomainError::validation(format!(
            "amount of ingredient {} must be at least 1",
            item.id
        )));
    }

    let mut resolved = Vec::with_capacity(items.len());
    for item in items {
        let ingredient = known
            .get(&item.id)
            .ok_or_else(|| DomainError::not_found(format!("Ingredient {}", item.id)))?;
        resolved.push(ValidatedIngredient {
            ingredient: ingredient.clone(),
            amount: item.amount,
        });
    }

    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id) {
            return Err(DomainError::conflict(format!(
                "Ingredient {} is listed more than once",
                item.id
            )));
        }
    }

    Ok(resolved)
}

/// Resolve the submitted ingredient ids and validate the list.
pub async fn validate_ingredients<C: ConnectionTrait>(
    db: &C,
    items: &[IngredientAmountInput],
) -> Result<Vec<ValidatedIngredient>, DomainError> {
    let ids: Vec<i32> = items
        .iter()
        .map(|item| item.id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let known: HashMap<i32, ingredient::Model> = if ids.is_empty() {
        HashMap::new()
    } else {
        IngredientEntity::find()
            .filter(ingredient::Column::Id.is_in(ids))
            .all(db)
            .await?
            .into_iter()
            .map(|model| (model.id, model))
            .collect()
    };

    check_ingredients(items, &known)
}
