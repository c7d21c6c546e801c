use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use diesel::Connection;
use tracing::{info, instrument};

use crate::error::{ApiError, ApiErrorResponse};
use crate::repository::Repository;
use crate::serializer::{
    serialize_restaurant_details, serialize_restaurant_summary, RestaurantDetails,
    RestaurantSummary,
};

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(list_restaurants))
        .route(
            "/restaurants/{id}",
            get(get_restaurant).delete(delete_restaurant),
        )
}

// Ids that are not integers can never match a row.
fn restaurant_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::NotFound("Restaurant"))
}

#[utoipa::path(
    get,
    path = "/restaurants",
    responses(
        (status = 200, description = "Every restaurant, without nested pizzas", body = [RestaurantSummary]),
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn list_restaurants(
    State(state): State<AppState>,
) -> Result<Json<Vec<RestaurantSummary>>, ApiError> {
    let restaurants = state
        .with_conn(|conn| Ok(Repository::new(conn).list_restaurants()?))
        .await?;

    Ok(Json(
        restaurants.iter().map(serialize_restaurant_summary).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    responses(
        (status = 200, description = "Restaurant details", body = RestaurantDetails),
        (status = 404, description = "Restaurant not found", body = ApiErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn get_restaurant(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<RestaurantDetails>, ApiError> {
    let id = restaurant_id(path)?;

    let details = state
        .with_conn(move |conn| {
            conn.transaction::<_, ApiError, _>(|conn| {
                let mut repo = Repository::new(conn);
                let restaurant = repo
                    .find_restaurant(id)?
                    .ok_or(ApiError::NotFound("Restaurant"))?;
                let restaurant_pizzas = repo.restaurant_pizzas_of(&restaurant)?;
                Ok(serialize_restaurant_details(&restaurant, &restaurant_pizzas))
            })
        })
        .await?;

    Ok(Json(details))
}

#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    responses(
        (status = 204, description = "Restaurant and its pizzas deleted"),
        (status = 404, description = "Restaurant not found", body = ApiErrorResponse),
    ),
    params(
        ("id" = i32, Path, description = "Restaurant ID")
    ),
    tag = "restaurants"
)]
#[instrument(skip(state))]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = restaurant_id(path)?;

    state
        .with_conn(move |conn| {
            conn.immediate_transaction::<_, ApiError, _>(|conn| {
                match Repository::new(conn).delete_restaurant(id)? {
                    0 => Err(ApiError::NotFound("Restaurant")),
                    _ => Ok(()),
                }
            })
        })
        .await?;

    info!(id, "deleted restaurant");
    Ok(StatusCode::NO_CONTENT)
}
