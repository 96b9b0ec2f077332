use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::auth::login,
        api::ingredient::list_ingredients,
        api::recipe::list_recipes,
        api::recipe::create_recipe,
        api::recipe::get_recipe,
        api::shopping_cart::download_shopping_cart,
    ),
    tags(
        (name = "foodgram", description = "Foodgram recipe API")
    )
)]
pub struct ApiDoc;
