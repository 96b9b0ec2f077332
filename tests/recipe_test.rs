mod common;

use common::*;
use foodgram::domain::{DomainError, PageRequest};
use foodgram::models::{favorite, recipe, recipe_ingredient, recipe_tag, shopping_cart};
use foodgram::services::ingredient_validator::IngredientAmountInput;
use foodgram::services::recipe_service::{self, RecipeFilter, UpdateRecipeInput};
use foodgram::services::{RecipeList, recipe_list_service};
use sea_orm::{EntityTrait, PaginatorTrait};

#[tokio::test]
async fn test_create_recipe_reads_back_ledger() {
    let state = setup_test_state().await;
    let db = state.db();
    let author = create_user(db, "chef").await;
    let flour = create_ingredient(db, "flour", "g").await;
    let lunch = create_tag(db, "Lunch", "lunch").await;

    let created = create_recipe(&state, author, "Bread", &[(flour, 3)], &[lunch]).await;
    assert_eq!(created.ingredients.len(), 1);
    assert_eq!(created.ingredients[0].id, flour);
    assert_eq!(created.ingredients[0].name, "flour");
    assert_eq!(created.ingredients[0].measurement_unit, "g");
    assert_eq!(created.ingredients[0].amount, 3);
    assert_eq!(created.tags.len(), 1);
    assert_eq!(created.tags[0].slug, "lunch");
    assert!(created.image.starts_with("/media/recipes/"));
    assert!(created.image.ends_with(".png"));

    let stored = created.image.trim_start_matches("/media/");
    assert!(state.media_root().join(stored).exists());

    let fetched = recipe_service::get_recipe(db, None, created.id).await.unwrap();
    assert_eq!(fetched.ingredients, created.ingredients);
    assert!(!fetched.is_favorited);
    assert!(!fetched.is_in_shopping_cart);
}

#[tokio::test]
async fn test_duplicate_ingredient_is_rejected_without_writes() {
    let state = setup_test_state().await;
    let db = state.db();
    let author = create_user(db, "chef").await;
    let apple = create_ingredient(db, "apple", "pcs").await;
    let tag = create_tag(db, "Lunch", "lunch").await;

    let result = recipe_service::create_recipe(
        db,
        state.media_root(),
        author,
        recipe_input("Pie", &[(apple, 1), (apple, 2)], &[tag]),
    )
    .await;

    assert!(matches!(result, Err(DomainError::Conflict(_))));
    assert_eq!(recipe::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(recipe_ingredient::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(recipe_tag::Entity::find().count(db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_invalid_submissions() {
    let state = setup_test_state().await;
    let db = state.db();
    let author = create_user(db, "chef").await;
    let apple = create_ingredient(db, "apple", "pcs").await;
    let tag = create_tag(db, "Lunch", "lunch").await;

    let cases = vec![
        (recipe_input("Pie", &[], &[tag]), "empty ingredients"),
        (recipe_input("Pie", &[(apple, 0)], &[tag]), "zero amount"),
        (recipe_input("Pie", &[(apple, 1)], &[]), "no tags"),
    ];
    for (input, case) in cases {
        let result = recipe_service::create_recipe(db, state.media_root(), author, input).await;
        assert!(
            matches!(result, Err(DomainError::Validation(_))),
            "{} should be a validation error",
            case
        );
    }

    let unknown = recipe_service::create_recipe(
        db,
        state.media_root(),
        author,
        recipe_input("Pie", &[(999, 1)], &[tag]),
    )
    .await;
    assert!(matches!(unknown, Err(DomainError::NotFound(_))));

    let mut zero_time = recipe_input("Pie", &[(apple, 1)], &[tag]);
    zero_time.cooking_time = 0;
    let result = recipe_service::create_recipe(db, state.media_root(), author, zero_time).await;
    assert!(matches!(result, Err(DomainError::Validation(_))));

    let mut bad_image = recipe_input("Pie", &[(apple, 1)], &[tag]);
    bad_image.image = "not an image".to_string();
    let result = recipe_service::create_recipe(db, state.media_root(), author, bad_image).await;
    assert!(matches!(result, Err(DomainError::Validation(_))));

    assert_eq!(recipe::Entity::find().count(db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_replaces_ledger_and_tags() {
    let state = setup_test_state().await;
    let db = state.db();
    let author = create_user(db, "chef").await;
    let apple = create_ingredient(db, "apple", "pcs").await;
    let sugar = create_ingredient(db, "sugar", "g").await;
    let flour = create_ingredient(db, "flour", "g").await;
    let lunch = create_tag(db, "Lunch", "lunch").await;
    let dinner = create_tag(db, "Dinner", "dinner").await;

    let created = create_recipe(&state, author, "Pie", &[(apple, 2), (sugar, 1)], &[lunch]).await;

    let updated = recipe_service::update_recipe(
        db,
        state.media_root(),
        author,
        created.id,
        UpdateRecipeInput {
            ingredients: vec![IngredientAmountInput { id: flour, amount: 5 }],
            tags: vec![dinner],
            image: None,
            name: "Flour pie".to_string(),
            text: "Bake.".to_string(),
            cooking_time: 40,
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.name, "Flour pie");
    assert_eq!(updated.cooking_time, 40);
    assert_eq!(updated.image, created.image);
    assert_eq!(updated.ingredients.len(), 1);
    assert_eq!(updated.ingredients[0].id, flour);
    assert_eq!(updated.ingredients[0].amount, 5);
    assert_eq!(updated.tags.len(), 1);
    assert_eq!(updated.tags[0].id, dinner);
    assert_eq!(recipe_ingredient::Entity::find().count(db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_only_author_may_change_recipe() {
    let state = setup_test_state().await;
    let db = state.db();
    let author = create_user(db, "chef").await;
    let other = create_user(db, "guest").await;
    let apple = create_ingredient(db, "apple", "pcs").await;
    let lunch = create_tag(db, "Lunch", "lunch").await;

    let created = create_recipe(&state, author, "Pie", &[(apple, 2)], &[lunch]).await;

    let update = recipe_service::update_recipe(
        db,
        state.media_root(),
        other,
        created.id,
        UpdateRecipeInput {
            ingredients: vec![IngredientAmountInput { id: apple, amount: 9 }],
            tags: vec![lunch],
            image: None,
            name: "Stolen".to_string(),
            text: "x".to_string(),
            cooking_time: 1,
        },
    )
    .await;
    assert!(matches!(update, Err(DomainError::Forbidden(_))));

    let delete = recipe_service::delete_recipe(db, state.media_root(), other, created.id).await;
    assert!(matches!(delete, Err(DomainError::Forbidden(_))));

    let unchanged = recipe_service::get_recipe(db, None, created.id).await.unwrap();
    assert_eq!(unchanged.name, "Pie");
    assert_eq!(unchanged.ingredients[0].amount, 2);
}

#[tokio::test]
async fn test_delete_recipe_cascades() {
    let state = setup_test_state().await;
    let db = state.db();
    let author = create_user(db, "chef").await;
    let fan = create_user(db, "fan").await;
    let apple = create_ingredient(db, "apple", "pcs").await;
    let lunch = create_tag(db, "Lunch", "lunch").await;

    let created = create_recipe(&state, author, "Pie", &[(apple, 2)], &[lunch]).await;
    recipe_list_service::add_recipe(db, RecipeList::Favorites, fan, created.id)
        .await
        .unwrap();
    recipe_list_service::add_recipe(db, RecipeList::ShoppingCart, fan, created.id)
        .await
        .unwrap();

    recipe_service::delete_recipe(db, state.media_root(), author, created.id)
        .await
        .unwrap();

    assert_eq!(recipe::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(recipe_ingredient::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(recipe_tag::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(favorite::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(shopping_cart::Entity::find().count(db).await.unwrap(), 0);

    let stored = created.image.trim_start_matches("/media/");
    assert!(!state.media_root().join(stored).exists());

    let again = recipe_service::get_recipe(db, None, created.id).await;
    assert!(matches!(again, Err(DomainError::NotFound(_))));
}

#[tokio::test]
async fn test_list_filters() {
    let state = setup_test_state().await;
    let db = state.db();
    let chef = create_user(db, "chef").await;
    let cook = create_user(db, "cook").await;
    let apple = create_ingredient(db, "apple", "pcs").await;
    let lunch = create_tag(db, "Lunch", "lunch").await;
    let dinner = create_tag(db, "Dinner", "dinner").await;
    let breakfast = create_tag(db, "Breakfast", "breakfast").await;

    let soup = create_recipe(&state, chef, "Soup", &[(apple, 1)], &[lunch]).await;
    let stew = create_recipe(&state, cook, "Stew", &[(apple, 1)], &[dinner]).await;
    let toast = create_recipe(&state, chef, "Toast", &[(apple, 1)], &[breakfast]).await;
    let page = PageRequest::new(None, None, 6).unwrap();

    let all = recipe_service::list_recipes(db, None, RecipeFilter::default(), page)
        .await
        .unwrap();
    assert_eq!(all.total, 3);
    let ids: Vec<i32> = all.items.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![toast.id, stew.id, soup.id]);

    let by_author = RecipeFilter {
        author: Some(chef),
        ..Default::default()
    };
    let found = recipe_service::list_recipes(db, None, by_author, page).await.unwrap();
    assert_eq!(found.total, 2);

    let by_tags = RecipeFilter {
        tags: vec!["lunch".to_string(), "dinner".to_string()],
        ..Default::default()
    };
    let found = recipe_service::list_recipes(db, None, by_tags, page).await.unwrap();
    let ids: Vec<i32> = found.items.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![stew.id, soup.id]);

    recipe_list_service::add_recipe(db, RecipeList::Favorites, cook, soup.id)
        .await
        .unwrap();
    let favorited = RecipeFilter {
        is_favorited: true,
        ..Default::default()
    };
    let mine = recipe_service::list_recipes(db, Some(cook), favorited.clone(), page)
        .await
        .unwrap();
    assert_eq!(mine.total, 1);
    assert!(mine.items[0].is_favorited);

    let anonymous = recipe_service::list_recipes(db, None, favorited, page)
        .await
        .unwrap();
    assert_eq!(anonymous.total, 0);
    assert!(anonymous.items.is_empty());
}

#[tokio::test]
async fn test_list_pages() {
    let state = setup_test_state().await;
    let db = state.db();
    let chef = create_user(db, "chef").await;
    let apple = create_ingredient(db, "apple", "pcs").await;
    let lunch = create_tag(db, "Lunch", "lunch").await;
    for i in 0..5 {
        create_recipe(&state, chef, &format!("Dish {}", i), &[(apple, 1)], &[lunch]).await;
    }

    let second = recipe_service::list_recipes(
        db,
        None,
        RecipeFilter::default(),
        PageRequest::new(Some(2), Some(2), 6).unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(second.total, 5);
    let names: Vec<&str> = second.items.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Dish 2", "Dish 1"]);
}
