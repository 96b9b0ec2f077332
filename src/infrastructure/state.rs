//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::{IngredientRepository, TagRepository};
use crate::infrastructure::config::Config;
use crate::infrastructure::{SeaOrmIngredientRepository, SeaOrmTagRepository};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    /// Ingredient reference data
    pub ingredient_repo: Arc<dyn IngredientRepository>,
    /// Tag reference data
    pub tag_repo: Arc<dyn TagRepository>,
    media_root: PathBuf,
    page_size: u64,
}

impl AppState {
    pub fn new(db: DatabaseConnection, media_root: PathBuf, page_size: u64) -> Self {
        let ingredient_repo = Arc::new(SeaOrmIngredientRepository::new(db.clone()));
        let tag_repo = Arc::new(SeaOrmTagRepository::new(db.clone()));

        Self {
            db,
            ingredient_repo,
            tag_repo,
            media_root,
            page_size,
        }
    }

    pub fn from_config(db: DatabaseConnection, config: &Config) -> Self {
        Self::new(db, config.media_root.clone(), config.page_size)
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Directory uploaded recipe images are written under
    pub fn media_root(&self) -> &Path {
        &self.media_root
    }

    /// Default page size when a request carries no `limit`
    pub fn page_size(&self) -> u64 {
        self.page_size
    }
}
