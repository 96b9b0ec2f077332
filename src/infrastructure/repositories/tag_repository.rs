//! SeaORM implementation of TagRepository

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::domain::{DomainError, Tag, TagRepository};
use crate::models::tag::{Column, Entity as TagEntity};

/// SeaORM-based implementation of TagRepository
pub struct SeaOrmTagRepository {
    db: DatabaseConnection,
}

impl SeaOrmTagRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TagRepository for SeaOrmTagRepository {
    async fn find_all(&self) -> Result<Vec<Tag>, DomainError> {
        let tags = TagEntity::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?;

        Ok(tags.into_iter().map(Tag::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, DomainError> {
        let result = TagEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Tag::from))
    }
}
