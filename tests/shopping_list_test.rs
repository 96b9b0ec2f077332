mod common;

use common::*;
use foodgram::domain::DomainError;
use foodgram::models::{favorite, shopping_cart};
use sea_orm::Set;
use foodgram::services::shopping_list_service::{render_shopping_list, shopping_list};
use foodgram::services::{RecipeList, recipe_list_service};
use sea_orm::{EntityTrait, PaginatorTrait};

#[tokio::test]
async fn test_cart_totals_sum_per_ingredient() {
    let state = setup_test_state().await;
    let db = state.db();
    let chef = create_user(db, "chef").await;
    let buyer = create_user(db, "buyer").await;
    let apple = create_ingredient(db, "apple", "pcs").await;
    let sugar = create_ingredient(db, "sugar", "g").await;
    let flour = create_ingredient(db, "flour", "g").await;
    let lunch = create_tag(db, "Lunch", "lunch").await;

    let pie = create_recipe(&state, chef, "Pie", &[(apple, 2), (sugar, 1)], &[lunch]).await;
    let cake = create_recipe(&state, chef, "Cake", &[(apple, 3), (flour, 5)], &[lunch]).await;
    // not in the cart
    create_recipe(&state, chef, "Jam", &[(sugar, 100)], &[lunch]).await;

    for id in [pie.id, cake.id] {
        recipe_list_service::add_recipe(db, RecipeList::ShoppingCart, buyer, id)
            .await
            .unwrap();
    }

    let items = shopping_list(db, buyer).await.unwrap();
    let totals: Vec<(&str, i64, &str)> = items
        .iter()
        .map(|i| (i.name.as_str(), i.amount, i.measurement_unit.as_str()))
        .collect();
    assert_eq!(
        totals,
        vec![("apple", 5, "pcs"), ("sugar", 1, "g"), ("flour", 5, "g")]
    );

    let text = render_shopping_list(&items);
    assert!(text.contains("apple, 5 pcs\n"));
    assert!(text.contains("flour, 5 g\n"));
    assert!(!text.contains("100"));
}

#[tokio::test]
async fn test_empty_cart_renders_banner_only() {
    let state = setup_test_state().await;
    let buyer = create_user(state.db(), "buyer").await;

    let items = shopping_list(state.db(), buyer).await.unwrap();
    assert!(items.is_empty());
    assert_eq!(render_shopping_list(&items), "Shopping list from Foodgram:\n\n");
}

#[tokio::test]
async fn test_favorite_twice_is_conflict() {
    let state = setup_test_state().await;
    let db = state.db();
    let chef = create_user(db, "chef").await;
    let apple = create_ingredient(db, "apple", "pcs").await;
    let lunch = create_tag(db, "Lunch", "lunch").await;
    let pie = create_recipe(&state, chef, "Pie", &[(apple, 2)], &[lunch]).await;

    let card = recipe_list_service::add_recipe(db, RecipeList::Favorites, chef, pie.id)
        .await
        .unwrap();
    assert_eq!(card.id, pie.id);
    assert_eq!(card.image, pie.image);

    let again = recipe_list_service::add_recipe(db, RecipeList::Favorites, chef, pie.id).await;
    assert!(matches!(again, Err(DomainError::Conflict(_))));
    assert_eq!(favorite::Entity::find().count(db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_remove_missing_entry_is_not_found() {
    let state = setup_test_state().await;
    let db = state.db();
    let chef = create_user(db, "chef").await;
    let apple = create_ingredient(db, "apple", "pcs").await;
    let lunch = create_tag(db, "Lunch", "lunch").await;
    let pie = create_recipe(&state, chef, "Pie", &[(apple, 2)], &[lunch]).await;

    for list in [RecipeList::Favorites, RecipeList::ShoppingCart] {
        let result = recipe_list_service::remove_recipe(db, list, chef, pie.id).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }
    assert_eq!(favorite::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(shopping_cart::Entity::find().count(db).await.unwrap(), 0);

    let unknown = recipe_list_service::add_recipe(db, RecipeList::ShoppingCart, chef, 999).await;
    assert!(matches!(unknown, Err(DomainError::NotFound(_))));
}

#[tokio::test]
async fn test_cart_add_remove_cycle() {
    let state = setup_test_state().await;
    let db = state.db();
    let chef = create_user(db, "chef").await;
    let apple = create_ingredient(db, "apple", "pcs").await;
    let lunch = create_tag(db, "Lunch", "lunch").await;
    let pie = create_recipe(&state, chef, "Pie", &[(apple, 2)], &[lunch]).await;

    recipe_list_service::add_recipe(db, RecipeList::ShoppingCart, chef, pie.id)
        .await
        .unwrap();
    recipe_list_service::remove_recipe(db, RecipeList::ShoppingCart, chef, pie.id)
        .await
        .unwrap();
    recipe_list_service::add_recipe(db, RecipeList::ShoppingCart, chef, pie.id)
        .await
        .unwrap();

    assert_eq!(shopping_cart::Entity::find().count(db).await.unwrap(), 1);
    assert_eq!(shopping_list(db, chef).await.unwrap()[0].amount, 2);
}

fn favorite_row(user_id: i32, recipe_id: i32) -> favorite::ActiveModel {
    favorite::ActiveModel {
        user_id: Set(user_id),
        recipe_id: Set(recipe_id),
        added_at: Set(chrono::Utc::now().to_rfc3339()),
    }
}

#[tokio::test]
async fn test_duplicate_favorite_insert_maps_to_conflict() {
    let state = setup_test_state().await;
    let db = state.db();
    let chef = create_user(db, "chef").await;
    let apple = create_ingredient(db, "apple", "pcs").await;
    let lunch = create_tag(db, "Lunch", "lunch").await;
    let pie = create_recipe(&state, chef, "Pie", &[(apple, 2)], &[lunch]).await;

    // a writer that skipped the presence check, as a concurrent request would
    favorite::Entity::insert(favorite_row(chef, pie.id))
        .exec_without_returning(db)
        .await
        .unwrap();
    let err = favorite::Entity::insert(favorite_row(chef, pie.id))
        .exec_without_returning(db)
        .await
        .unwrap_err();
    assert!(matches!(DomainError::from(err), DomainError::Conflict(_)));

    let again = recipe_list_service::add_recipe(db, RecipeList::Favorites, chef, pie.id).await;
    assert!(matches!(again, Err(DomainError::Conflict(_))));
    assert_eq!(favorite::Entity::find().count(db).await.unwrap(), 1);
}
