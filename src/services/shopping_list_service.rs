//! Shopping list aggregation
//!
//! Sums ledger amounts per ingredient over every recipe in a user's cart and
//! renders the totals as a plain-text document.

use sea_orm::sea_query::Expr;
use sea_orm::*;
use std::collections::HashMap;

use crate::domain::DomainError;
use crate::models::ingredient::{self, Entity as IngredientEntity};
use crate::models::recipe_ingredient::{self, Entity as RecipeIngredient};
use crate::models::shopping_cart::{self, Entity as ShoppingCart};

pub const SHOPPING_LIST_BANNER: &str = "Shopping list from Foodgram:";
pub const SHOPPING_LIST_FILENAME: &str = "shopping-list.txt";

/// One aggregated line of the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListItem {
    pub ingredient_id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

#[derive(Debug, FromQueryResult)]
struct IngredientTotal {
    ingredient_id: i32,
    total: i64,
}

/// Aggregate the user's cart, ordered by ingredient id
pub async fn shopping_list(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<ShoppingListItem>, DomainError> {
    let recipe_ids: Vec<i32> = ShoppingCart::find()
        .filter(shopping_cart::Column::UserId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|entry| entry.recipe_id)
        .collect();

    if recipe_ids.is_empty() {
        return Ok(Vec::new());
    }

    let totals = RecipeIngredient::find()
        .select_only()
        .column(recipe_ingredient::Column::IngredientId)
        .column_as(Expr::col(recipe_ingredient::Column::Amount).sum(), "total")
        .filter(recipe_ingredient::Column::RecipeId.is_in(recipe_ids.clone()))
        .group_by(recipe_ingredient::Column::IngredientId)
        .order_by_asc(recipe_ingredient::Column::IngredientId)
        .into_model::<IngredientTotal>()
        .all(db)
        .await?;

    let ingredients: HashMap<i32, ingredient::Model> = IngredientEntity::find()
        .filter(ingredient::Column::Id.is_in(totals.iter().map(|t| t.ingredient_id)))
        .all(db)
        .await?
        .into_iter()
        .map(|model| (model.id, model))
        .collect();

    let items: Vec<ShoppingListItem> = totals
        .into_iter()
        .filter_map(|total| {
            ingredients
                .get(&total.ingredient_id)
                .map(|ingredient| ShoppingListItem {
                    ingredient_id: ingredient.id,
                    name: ingredient.name.clone(),
                    measurement_unit: ingredient.measurement_unit.clone(),
                    amount: total.total,
                })
        })
        .collect();

    tracing::info!(
        "Shopping list for user {}: {} recipes, {} ingredients",
        user_id,
        recipe_ids.len(),
        items.len()
    );

    Ok(items)
}

/// Banner, a blank line, then one `"{name}, {amount} {unit}"` line per item
pub fn render_shopping_list(items: &[ShoppingListItem]) -> String {
    let mut text = format!("{}\n\n", SHOPPING_LIST_BANNER);
    for item in items {
        text.push_str(&format!(
            "{}, {} {}\n",
            item.name, item.amount, item.measurement_unit
        ));
    }
    text
}
