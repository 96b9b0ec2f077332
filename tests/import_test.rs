use foodgram::db;
use foodgram::import::{RowOutcome, import_ingredients};
use foodgram::models::ingredient;
use sea_orm::{EntityTrait, PaginatorTrait};

const CSV: &str = "name,units\napple,pcs\nsugar,g\n\"salt, sea\",g\nbroken\n";

#[tokio::test]
async fn test_import_is_idempotent() {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");

    let first = import_ingredients(&db, CSV.as_bytes()).await.unwrap();
    assert_eq!(first.imported, 3);
    assert_eq!(first.skipped, 0);
    assert_eq!(first.malformed, 1);

    let second = import_ingredients(&db, CSV.as_bytes()).await.unwrap();
    assert_eq!(second.imported, 0);
    assert_eq!(second.skipped, 3);
    assert!(
        second
            .rows
            .iter()
            .filter(|r| r.name.is_some())
            .all(|r| r.outcome == RowOutcome::SkippedDuplicate)
    );

    assert_eq!(ingredient::Entity::find().count(&db).await.unwrap(), 3);
}
