use axum::{extract::State, response::Json, routing::get, Router};
use tracing::instrument;

use crate::error::ApiError;
use crate::repository::Repository;
use crate::serializer::{serialize_pizza, Pizza};

use super::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/pizzas", get(list_pizzas))
}

#[utoipa::path(
    get,
    path = "/pizzas",
    responses(
        (status = 200, description = "Every pizza", body = [Pizza]),
    ),
    tag = "pizzas"
)]
#[instrument(skip(state))]
pub async fn list_pizzas(State(state): State<AppState>) -> Result<Json<Vec<Pizza>>, ApiError> {
    let pizzas = state
        .with_conn(|conn| Ok(Repository::new(conn).list_pizzas()?))
        .await?;

    Ok(Json(pizzas.iter().map(serialize_pizza).collect()))
}
