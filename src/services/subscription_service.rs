//! Subscription Service - following authors

use sea_orm::*;
use serde::Serialize;

use crate::domain::{DomainError, PageRequest, Paginated};
use crate::models::subscription::{self, Entity as Subscription};
use crate::models::user::{self, Entity as User};
use crate::services::recipe_service::{RecipeShortDto, author_recipes};

/// An author as listed in someone's subscriptions
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionDto {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub recipes: Vec<RecipeShortDto>,
    pub recipes_count: u64,
}

async fn author_card(
    db: &DatabaseConnection,
    author: user::Model,
    is_subscribed: bool,
    recipes_limit: Option<u64>,
) -> Result<SubscriptionDto, DomainError> {
    let (recipes, recipes_count) = author_recipes(db, author.id, recipes_limit).await?;

    Ok(SubscriptionDto {
        email: author.email,
        id: author.id,
        username: author.username,
        first_name: author.first_name,
        last_name: author.last_name,
        is_subscribed,
        recipes,
        recipes_count,
    })
}

/// `user_id` starts following `author_id`
pub async fn subscribe(
    db: &DatabaseConnection,
    user_id: i32,
    author_id: i32,
    recipes_limit: Option<u64>,
) -> Result<SubscriptionDto, DomainError> {
    let author = User::find_by_id(author_id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("User {}", author_id)))?;

    if user_id == author_id {
        return Err(DomainError::validation("You cannot subscribe to yourself"));
    }

    if Subscription::find_by_id((user_id, author_id))
        .one(db)
        .await?
        .is_some()
    {
        return Err(DomainError::conflict(
            "You are already subscribed to this author",
        ));
    }

    let row = subscription::ActiveModel {
        user_id: Set(user_id),
        author_id: Set(author_id),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
    };
    Subscription::insert(row)
        .exec_without_returning(db)
        .await
        .map_err(|e| match DomainError::from(e) {
            DomainError::Conflict(_) => {
                DomainError::conflict("You are already subscribed to this author")
            }
            other => other,
        })?;

    tracing::info!("User {} subscribed to {}", user_id, author_id);
    author_card(db, author, true, recipes_limit).await
}

/// `user_id` stops following `author_id`
pub async fn unsubscribe(
    db: &DatabaseConnection,
    user_id: i32,
    author_id: i32,
) -> Result<(), DomainError> {
    if User::find_by_id(author_id).one(db).await?.is_none() {
        return Err(DomainError::not_found(format!("User {}", author_id)));
    }

    let result = Subscription::delete_by_id((user_id, author_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(DomainError::not_found(format!(
            "Subscription to user {}",
            author_id
        )));
    }

    tracing::info!("User {} unsubscribed from {}", user_id, author_id);
    Ok(())
}

/// Authors `user_id` follows, ordered by when they were followed
pub async fn list_subscriptions(
    db: &DatabaseConnection,
    user_id: i32,
    page: PageRequest,
    recipes_limit: Option<u64>,
) -> Result<Paginated<SubscriptionDto>, DomainError> {
    let paginator = Subscription::find()
        .filter(subscription::Column::UserId.eq(user_id))
        .order_by_asc(subscription::Column::CreatedAt)
        .order_by_asc(subscription::Column::AuthorId)
        .paginate(db, page.limit());
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(page.index()).await?;

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(author) = User::find_by_id(row.author_id).one(db).await? {
            items.push(author_card(db, author, true, recipes_limit).await?);
        }
    }

    Ok(Paginated { items, total })
}
