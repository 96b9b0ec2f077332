//! Recipe Service - recipes and their ingredient ledger
//!
//! Create and update validate everything first, then write the recipe row,
//! its ledger rows and its tags in one transaction. Update replaces the whole
//! ingredient and tag sets.
#![allow(clippy::needless_update)] // SeaORM ActiveModels require ..Default::default()

use sea_orm::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::domain::{DomainError, PageRequest, Paginated, Tag};
use crate::models::favorite::Entity as Favorite;
use crate::models::ingredient::Entity as IngredientEntity;
use crate::models::recipe::{self, Entity as Recipe};
use crate::models::recipe_ingredient::{self, Entity as RecipeIngredient};
use crate::models::recipe_tag::{self, Entity as RecipeTag};
use crate::models::shopping_cart::Entity as ShoppingCart;
use crate::models::tag::{self, Entity as TagEntity};
use crate::models::{favorite, shopping_cart};
use crate::models::user::Entity as User;
use crate::services::image_service::{image_url, remove_recipe_image, save_recipe_image};
use crate::services::ingredient_validator::{
    IngredientAmountInput, ValidatedIngredient, validate_ingredients,
};
use crate::services::user_service::{UserDto, is_subscribed};

const MAX_NAME_LEN: usize = 256;

/// Ingredient line of a recipe as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeIngredientDto {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Full recipe as seen by a (possibly anonymous) viewer
#[derive(Debug, Clone, Serialize)]
pub struct RecipeDto {
    pub id: i32,
    pub tags: Vec<Tag>,
    pub author: UserDto,
    pub ingredients: Vec<RecipeIngredientDto>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

/// Compact recipe card used by favorites, cart and subscriptions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeShortDto {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<recipe::Model> for RecipeShortDto {
    fn from(model: recipe::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            image: image_url(&model.image),
            cooking_time: model.cooking_time,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecipeInput {
    pub ingredients: Vec<IngredientAmountInput>,
    pub tags: Vec<i32>,
    pub image: String,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
}

/// Same as create; a missing `image` keeps the stored one
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRecipeInput {
    pub ingredients: Vec<IngredientAmountInput>,
    pub tags: Vec<i32>,
    pub image: Option<String>,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
}

/// Filter parameters for listing recipes
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author: Option<i32>,
    /// Tag slugs, any of which must be present
    pub tags: Vec<String>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

fn validate_fields(name: &str, text: &str, cooking_time: i32) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    if text.trim().is_empty() {
        return Err(DomainError::validation("text is required"));
    }
    if cooking_time < 1 {
        return Err(DomainError::validation("cooking_time must be at least 1"));
    }
    Ok(())
}

/// Resolve tag ids; repeats collapse, unknown ids are NotFound
async fn resolve_tags<C: ConnectionTrait>(db: &C, ids: &[i32]) -> Result<Vec<i32>, DomainError> {
    if ids.is_empty() {
        return Err(DomainError::validation("a recipe needs at least one tag"));
    }

    let mut seen = HashSet::new();
    let unique: Vec<i32> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

    let known: HashSet<i32> = TagEntity::find()
        .filter(tag::Column::Id.is_in(unique.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();

    if let Some(missing) = unique.iter().find(|id| !known.contains(id)) {
        return Err(DomainError::not_found(format!("Tag {}", missing)));
    }

    Ok(unique)
}

/// Insert ledger and tag rows for `recipe_id`
async fn write_associations<C: ConnectionTrait>(
    db: &C,
    recipe_id: i32,
    ingredients: &[ValidatedIngredient],
    tag_ids: &[i32],
) -> Result<(), DomainError> {
    let ledger = ingredients.iter().map(|item| recipe_ingredient::ActiveModel {
        recipe_id: Set(recipe_id),
        ingredient_id: Set(item.ingredient.id),
        amount: Set(item.amount),
        ..Default::default()
    });
    RecipeIngredient::insert_many(ledger).exec(db).await?;

    let tags = tag_ids.iter().map(|tag_id| recipe_tag::ActiveModel {
        recipe_id: Set(recipe_id),
        tag_id: Set(*tag_id),
    });
    RecipeTag::insert_many(tags).exec_without_returning(db).await?;

    Ok(())
}

/// Find a recipe row or fail with NotFound
pub async fn find_recipe<C: ConnectionTrait>(db: &C, id: i32) -> Result<recipe::Model, DomainError> {
    Recipe::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("Recipe {}", id)))
}

/// Ledger rows of a recipe joined with their ingredients, in entry order
pub async fn recipe_ingredients<C: ConnectionTrait>(
    db: &C,
    recipe_id: i32,
) -> Result<Vec<RecipeIngredientDto>, DomainError> {
    let rows = RecipeIngredient::find()
        .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
        .order_by_asc(recipe_ingredient::Column::Id)
        .find_also_related(IngredientEntity)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(row, ingredient)| {
            ingredient.map(|ingredient| RecipeIngredientDto {
                id: ingredient.id,
                name: ingredient.name,
                measurement_unit: ingredient.measurement_unit,
                amount: row.amount,
            })
        })
        .collect())
}

async fn to_dto(
    db: &DatabaseConnection,
    viewer: Option<i32>,
    model: recipe::Model,
) -> Result<RecipeDto, DomainError> {
    let author = User::find_by_id(model.author_id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("User {}", model.author_id)))?;
    let subscribed = is_subscribed(db, viewer, author.id).await?;

    let tags = model
        .find_related(TagEntity)
        .order_by_asc(tag::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(Tag::from)
        .collect();

    let ingredients = recipe_ingredients(db, model.id).await?;

    let (is_favorited, is_in_shopping_cart) = match viewer {
        Some(user_id) => (
            Favorite::find_by_id((user_id, model.id)).one(db).await?.is_some(),
            ShoppingCart::find_by_id((user_id, model.id)).one(db).await?.is_some(),
        ),
        None => (false, false),
    };

    Ok(RecipeDto {
        id: model.id,
        tags,
        author: UserDto::from_model(author, subscribed),
        ingredients,
        is_favorited,
        is_in_shopping_cart,
        name: model.name,
        image: image_url(&model.image),
        text: model.text,
        cooking_time: model.cooking_time,
    })
}

/// Create a recipe owned by `author_id`
pub async fn create_recipe(
    db: &DatabaseConnection,
    media_root: &Path,
    author_id: i32,
    input: CreateRecipeInput,
) -> Result<RecipeDto, DomainError> {
    validate_fields(&input.name, &input.text, input.cooking_time)?;
    let ingredients = validate_ingredients(db, &input.ingredients).await?;
    let tag_ids = resolve_tags(db, &input.tags).await?;
    let image = save_recipe_image(media_root, &input.image).await?;

    let txn = db.begin().await?;
    let written = async {
        let model = recipe::ActiveModel {
            author_id: Set(author_id),
            name: Set(input.name.trim().to_string()),
            text: Set(input.text),
            cooking_time: Set(input.cooking_time),
            image: Set(image.clone()),
            pub_date: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        write_associations(&txn, model.id, &ingredients, &tag_ids).await?;
        Ok::<_, DomainError>(model)
    }
    .await;

    let model = match written {
        Ok(model) => {
            txn.commit().await?;
            model
        }
        Err(e) => {
            txn.rollback().await?;
            remove_recipe_image(media_root, &image).await;
            return Err(e);
        }
    };

    tracing::info!(
        "User {} created recipe {} with {} ingredients",
        author_id,
        model.id,
        ingredients.len()
    );

    to_dto(db, Some(author_id), model).await
}

/// Update a recipe; only its author may do so
pub async fn update_recipe(
    db: &DatabaseConnection,
    media_root: &Path,
    user_id: i32,
    recipe_id: i32,
    input: UpdateRecipeInput,
) -> Result<RecipeDto, DomainError> {
    let existing = find_recipe(db, recipe_id).await?;
    if existing.author_id != user_id {
        return Err(DomainError::Forbidden(
            "only the author can change this recipe".to_string(),
        ));
    }

    validate_fields(&input.name, &input.text, input.cooking_time)?;
    let ingredients = validate_ingredients(db, &input.ingredients).await?;
    let tag_ids = resolve_tags(db, &input.tags).await?;
    let new_image = match &input.image {
        Some(payload) => Some(save_recipe_image(media_root, payload).await?),
        None => None,
    };

    let old_image = existing.image.clone();
    let txn = db.begin().await?;
    let written = async {
        let mut active: recipe::ActiveModel = existing.into();
        active.name = Set(input.name.trim().to_string());
        active.text = Set(input.text);
        active.cooking_time = Set(input.cooking_time);
        if let Some(image) = &new_image {
            active.image = Set(image.clone());
        }
        let model = active.update(&txn).await?;

        RecipeIngredient::delete_many()
            .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
            .exec(&txn)
            .await?;
        RecipeTag::delete_many()
            .filter(recipe_tag::Column::RecipeId.eq(recipe_id))
            .exec(&txn)
            .await?;
        write_associations(&txn, recipe_id, &ingredients, &tag_ids).await?;
        Ok::<_, DomainError>(model)
    }
    .await;

    let model = match written {
        Ok(model) => {
            txn.commit().await?;
            model
        }
        Err(e) => {
            txn.rollback().await?;
            if let Some(image) = &new_image {
                remove_recipe_image(media_root, image).await;
            }
            return Err(e);
        }
    };

    if new_image.is_some() {
        remove_recipe_image(media_root, &old_image).await;
    }

    tracing::info!("User {} updated recipe {}", user_id, recipe_id);

    to_dto(db, Some(user_id), model).await
}

/// Delete a recipe; ledger, tags, favorites and cart entries cascade
pub async fn delete_recipe(
    db: &DatabaseConnection,
    media_root: &Path,
    user_id: i32,
    recipe_id: i32,
) -> Result<(), DomainError> {
    let existing = find_recipe(db, recipe_id).await?;
    if existing.author_id != user_id {
        return Err(DomainError::Forbidden(
            "only the author can delete this recipe".to_string(),
        ));
    }

    let image = existing.image.clone();
    existing.delete(db).await?;
    remove_recipe_image(media_root, &image).await;

    tracing::info!("User {} deleted recipe {}", user_id, recipe_id);
    Ok(())
}

/// Fetch one recipe as seen by `viewer`
pub async fn get_recipe(
    db: &DatabaseConnection,
    viewer: Option<i32>,
    recipe_id: i32,
) -> Result<RecipeDto, DomainError> {
    let model = find_recipe(db, recipe_id).await?;
    to_dto(db, viewer, model).await
}

/// Recipe ids a user has favorited or put in the cart, depending on `cart`
async fn marked_recipe_ids(
    db: &DatabaseConnection,
    user_id: i32,
    cart: bool,
) -> Result<Vec<i32>, DomainError> {
    let ids = if cart {
        ShoppingCart::find()
            .filter(shopping_cart::Column::UserId.eq(user_id))
            .all(db)
            .await?
            .into_iter()
            .map(|row| row.recipe_id)
            .collect()
    } else {
        Favorite::find()
            .filter(favorite::Column::UserId.eq(user_id))
            .all(db)
            .await?
            .into_iter()
            .map(|row| row.recipe_id)
            .collect()
    };
    Ok(ids)
}

/// List recipes, newest first
pub async fn list_recipes(
    db: &DatabaseConnection,
    viewer: Option<i32>,
    filter: RecipeFilter,
    page: PageRequest,
) -> Result<Paginated<RecipeDto>, DomainError> {
    let empty = || Paginated {
        items: Vec::new(),
        total: 0,
    };

    let mut query = Recipe::find();

    if let Some(author) = filter.author {
        query = query.filter(recipe::Column::AuthorId.eq(author));
    }

    if !filter.tags.is_empty() {
        let tag_ids: Vec<i32> = TagEntity::find()
            .filter(tag::Column::Slug.is_in(filter.tags.clone()))
            .all(db)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();
        if tag_ids.is_empty() {
            return Ok(empty());
        }

        let recipe_ids: HashSet<i32> = RecipeTag::find()
            .filter(recipe_tag::Column::TagId.is_in(tag_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|row| row.recipe_id)
            .collect();
        if recipe_ids.is_empty() {
            return Ok(empty());
        }
        query = query.filter(recipe::Column::Id.is_in(recipe_ids));
    }

    for (wanted, cart) in [(filter.is_favorited, false), (filter.is_in_shopping_cart, true)] {
        if !wanted {
            continue;
        }
        let Some(user_id) = viewer else {
            return Ok(empty());
        };
        let ids = marked_recipe_ids(db, user_id, cart).await?;
        if ids.is_empty() {
            return Ok(empty());
        }
        query = query.filter(recipe::Column::Id.is_in(ids));
    }

    let paginator = query
        .order_by_desc(recipe::Column::Id)
        .paginate(db, page.limit());
    let total = paginator.num_items().await?;
    let models = paginator.fetch_page(page.index()).await?;

    let mut items = Vec::with_capacity(models.len());
    for model in models {
        items.push(to_dto(db, viewer, model).await?);
    }

    tracing::debug!("Recipe list {:?} matched {} recipes", filter, total);
    Ok(Paginated { items, total })
}

/// Recipes of an author as short cards, newest first, optionally capped
pub async fn author_recipes(
    db: &DatabaseConnection,
    author_id: i32,
    limit: Option<u64>,
) -> Result<(Vec<RecipeShortDto>, u64), DomainError> {
    let query = Recipe::find()
        .filter(recipe::Column::AuthorId.eq(author_id))
        .order_by_desc(recipe::Column::Id);

    let count = query.clone().count(db).await?;
    // a limit at or past the count is no limit; keeps huge values out of SQL
    let models = match limit {
        Some(limit) if limit < count => query.limit(limit).all(db).await?,
        _ => query.all(db).await?,
    };

    Ok((models.into_iter().map(RecipeShortDto::from).collect(), count))
}
