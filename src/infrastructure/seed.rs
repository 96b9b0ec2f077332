use crate::models::tag;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;

const DEMO_TAGS: &[(&str, &str, &str)] = &[
    ("Breakfast", "breakfast", "#E26C2D"),
    ("Lunch", "lunch", "#49B64E"),
    ("Dinner", "dinner", "#8775D2"),
];

/// Insert the demo tags, leaving existing ones untouched. Returns how many were new.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<u64, DbErr> {
    let mut inserted = 0;

    for (name, slug, color) in DEMO_TAGS {
        let tag = tag::ActiveModel {
            name: Set(name.to_string()),
            slug: Set(slug.to_string()),
            color: Set(color.to_string()),
            ..Default::default()
        };

        inserted += tag::Entity::insert(tag)
            .on_conflict(OnConflict::column(tag::Column::Slug).do_nothing().to_owned())
            .exec_without_returning(db)
            .await?;
    }

    Ok(inserted)
}
