use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use diesel::Connection;
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::error::{ApiError, ValidationErrorResponse};
use crate::models::{NewRestaurantPizza, MAX_PRICE, MIN_PRICE, PRICE_RANGE};
use crate::repository::Repository;
use crate::serializer::{serialize_created_restaurant_pizza, CreatedRestaurantPizza};

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/restaurant_pizzas", post(create_restaurant_pizza))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRestaurantPizzaRequest {
    /// Price in whole units, 1 to 30 inclusive
    pub price: i64,
    pub pizza_id: i32,
    pub restaurant_id: i32,
}

fn validate_price(price: i64) -> Result<i32, ApiError> {
    i32::try_from(price)
        .ok()
        .filter(|price| PRICE_RANGE.contains(price))
        .ok_or_else(|| {
            ApiError::validation(format!("Price must be between {MIN_PRICE} and {MAX_PRICE}"))
        })
}

#[utoipa::path(
    post,
    path = "/restaurant_pizzas",
    request_body = CreateRestaurantPizzaRequest,
    responses(
        (status = 201, description = "Restaurant pizza created", body = CreatedRestaurantPizza),
        (status = 400, description = "Invalid price or unknown pizza/restaurant", body = ValidationErrorResponse),
    ),
    tag = "restaurant_pizzas"
)]
#[instrument(skip(state))]
pub async fn create_restaurant_pizza(
    State(state): State<AppState>,
    payload: Result<Json<CreateRestaurantPizzaRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedRestaurantPizza>), ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::validation(e.body_text()))?;
    let price = validate_price(payload.price)?;

    let created = state
        .with_conn(move |conn| {
            conn.immediate_transaction::<_, ApiError, _>(|conn| {
                let mut repo = Repository::new(conn);
                let pizza = repo.find_pizza(payload.pizza_id)?;
                let restaurant = repo.find_restaurant(payload.restaurant_id)?;

                let (pizza, restaurant) = match (pizza, restaurant) {
                    (Some(pizza), Some(restaurant)) => (pizza, restaurant),
                    (pizza, restaurant) => {
                        let mut errors = Vec::new();
                        if pizza.is_none() {
                            errors.push(format!("Pizza {} does not exist", payload.pizza_id));
                        }
                        if restaurant.is_none() {
                            errors.push(format!(
                                "Restaurant {} does not exist",
                                payload.restaurant_id
                            ));
                        }
                        return Err(ApiError::Validation(errors));
                    }
                };

                let restaurant_pizza = repo.insert_restaurant_pizza(&NewRestaurantPizza {
                    price,
                    restaurant_id: restaurant.id,
                    pizza_id: pizza.id,
                })?;

                Ok(serialize_created_restaurant_pizza(
                    &restaurant_pizza,
                    &pizza,
                    &restaurant,
                ))
            })
        })
        .await?;

    info!(
        id = created.id,
        restaurant_id = created.restaurant_id,
        pizza_id = created.pizza_id,
        "created restaurant pizza"
    );
    Ok((StatusCode::CREATED, Json(created)))
}
