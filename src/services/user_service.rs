//! User Service - registration, lookup and login

use sea_orm::*;
use serde::{Deserialize, Serialize};

use crate::auth::{create_jwt, hash_password, verify_password};
use crate::domain::{DomainError, PageRequest, Paginated};
use crate::models::subscription::{self, Entity as Subscription};
use crate::models::user::{self, Entity as User};

/// Public user card; `is_subscribed` is relative to the viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDto {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

impl UserDto {
    pub fn from_model(model: user::Model, is_subscribed: bool) -> Self {
        Self {
            email: model.email,
            id: model.id,
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            is_subscribed,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Response of a successful registration (no subscription flag)
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredUser {
    pub email: String,
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

fn validate_registration(input: &RegisterInput) -> Result<(), DomainError> {
    let email = input.email.trim();
    if email.is_empty() || !email.contains('@') || email.len() > 254 {
        return Err(DomainError::validation("email is not a valid address"));
    }

    let username = input.username.trim();
    if username.is_empty() || username.len() > 150 {
        return Err(DomainError::validation(
            "username must be 1 to 150 characters",
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
    {
        return Err(DomainError::validation(
            "username may only contain letters, digits and @.+-_",
        ));
    }

    if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
        return Err(DomainError::validation(
            "first_name and last_name are required",
        ));
    }

    if input.password.is_empty() || input.password.len() > 150 {
        return Err(DomainError::validation(
            "password must be 1 to 150 characters",
        ));
    }

    Ok(())
}

/// Register a new account
pub async fn register(
    db: &DatabaseConnection,
    input: RegisterInput,
) -> Result<RegisteredUser, DomainError> {
    validate_registration(&input)?;

    let password_hash = hash_password(&input.password).map_err(DomainError::Internal)?;

    let new_user = user::ActiveModel {
        email: Set(input.email.trim().to_lowercase()),
        username: Set(input.username.trim().to_string()),
        first_name: Set(input.first_name.trim().to_string()),
        last_name: Set(input.last_name.trim().to_string()),
        password_hash: Set(password_hash),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
        ..Default::default()
    };

    let model = new_user.insert(db).await.map_err(|e| match DomainError::from(e) {
        DomainError::Conflict(_) => {
            DomainError::conflict("A user with that email or username already exists")
        }
        other => other,
    })?;

    tracing::info!("Registered user {} ({})", model.username, model.id);

    Ok(RegisteredUser {
        email: model.email,
        id: model.id,
        username: model.username,
        first_name: model.first_name,
        last_name: model.last_name,
    })
}

/// Exchange email + password for a bearer token
pub async fn login(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
) -> Result<String, DomainError> {
    let invalid = || DomainError::Unauthorized("Invalid credentials".to_string());

    let user = User::find()
        .filter(user::Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Login attempt for unknown email");
            invalid()
        })?;

    match verify_password(password, &user.password_hash) {
        Ok(true) => {
            tracing::info!("Password verified for user {}", user.username);
            create_jwt(user.id, &user.email).map_err(DomainError::Internal)
        }
        _ => {
            tracing::warn!("Password verification failed for user {}", user.username);
            Err(invalid())
        }
    }
}

/// Whether `viewer` follows `author_id`. Anonymous viewers follow no one.
pub async fn is_subscribed<C: ConnectionTrait>(
    db: &C,
    viewer: Option<i32>,
    author_id: i32,
) -> Result<bool, DomainError> {
    let Some(viewer) = viewer else {
        return Ok(false);
    };

    let found = Subscription::find_by_id((viewer, author_id)).one(db).await?;
    Ok(found.is_some())
}

/// Fetch a user card as seen by `viewer`
pub async fn get_user(
    db: &DatabaseConnection,
    viewer: Option<i32>,
    id: i32,
) -> Result<UserDto, DomainError> {
    let model = User::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("User {}", id)))?;

    let subscribed = is_subscribed(db, viewer, model.id).await?;
    Ok(UserDto::from_model(model, subscribed))
}

/// List users ordered by id
pub async fn list_users(
    db: &DatabaseConnection,
    viewer: Option<i32>,
    page: PageRequest,
) -> Result<Paginated<UserDto>, DomainError> {
    let paginator = User::find()
        .order_by_asc(user::Column::Id)
        .paginate(db, page.limit());
    let total = paginator.num_items().await?;
    let models = paginator.fetch_page(page.index()).await?;

    // One query for the viewer's subscriptions on this page
    let followed: std::collections::HashSet<i32> = match viewer {
        Some(viewer) if !models.is_empty() => Subscription::find()
            .filter(subscription::Column::UserId.eq(viewer))
            .filter(subscription::Column::AuthorId.is_in(models.iter().map(|m| m.id)))
            .all(db)
            .await?
            .into_iter()
            .map(|s| s.author_id)
            .collect(),
        _ => Default::default(),
    };

    let items = models
        .into_iter()
        .map(|model| {
            let subscribed = followed.contains(&model.id);
            UserDto::from_model(model, subscribed)
        })
        .collect();

    Ok(Paginated { items, total })
}
