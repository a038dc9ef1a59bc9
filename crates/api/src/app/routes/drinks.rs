use axum::{
    body::Bytes,
    extract::{Extension, Path, rejection::BytesRejection},
    Json,
};

use coffeeshop_auth::Claims;
use coffeeshop_core::DrinkId;
use coffeeshop_drinks::{Drink, DrinkPatch, LongView, NewDrink, ShortView};

use crate::app::dto::{self, DeleteResponse, DrinksResponse};
use crate::app::errors::ApiError;
use crate::context::AppContext;

/// `GET /drinks`: public, short views only.
pub async fn list_drinks(
    Extension(ctx): Extension<AppContext>,
) -> Result<Json<DrinksResponse<ShortView>>, ApiError> {
    let drinks = ctx.store().all().await.map_err(ApiError::read_failure)?;
    Ok(Json(DrinksResponse::new(drinks.iter().map(Drink::short).collect())))
}

/// `GET /drinks-detail`: long views, guarded by `get:drinks-detail`.
pub async fn drink_details(
    Extension(ctx): Extension<AppContext>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<DrinksResponse<LongView>>, ApiError> {
    let drinks = ctx.store().all().await.map_err(ApiError::read_failure)?;
    tracing::debug!(sub = %claims.sub, count = drinks.len(), "listing drink details");
    Ok(Json(DrinksResponse::new(drinks.iter().map(Drink::long).collect())))
}

pub async fn create_drink(
    Extension(ctx): Extension<AppContext>,
    Extension(claims): Extension<Claims>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<DrinksResponse<LongView>>, ApiError> {
    let new = NewDrink::from_json(dto::json_body(&body?)?)?;
    let drink = ctx.store().insert(new).await?;

    tracing::info!(sub = %claims.sub, id = %drink.id(), title = drink.title(), "drink created");
    Ok(Json(DrinksResponse::new(vec![drink.long()])))
}

/// Existence is checked before the body is looked at, so an unknown id is a
/// 404 even when the body is also invalid.
pub async fn update_drink(
    Extension(ctx): Extension<AppContext>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<DrinksResponse<LongView>>, ApiError> {
    let mut drink = existing(&ctx, &id).await?;

    let patch = DrinkPatch::from_json(dto::json_body(&body?)?)?;
    let changed = drink.apply(patch);
    ctx.store().update(&drink).await?;

    tracing::info!(sub = %claims.sub, id = %drink.id(), changed, "drink updated");
    Ok(Json(DrinksResponse::new(vec![drink.long()])))
}

pub async fn delete_drink(
    Extension(ctx): Extension<AppContext>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let drink = existing(&ctx, &id).await?;
    ctx.store().delete(drink.id()).await?;

    tracing::info!(sub = %claims.sub, id = %drink.id(), "drink deleted");
    Ok(Json(DeleteResponse::new(drink.id())))
}

/// Resolve a path id to a stored drink. Ids that are not integers name no drink.
async fn existing(ctx: &AppContext, raw_id: &str) -> Result<Drink, ApiError> {
    let id: DrinkId = raw_id.parse()?;
    ctx.store()
        .find_by_id(id)
        .await
        .map_err(ApiError::read_failure)?
        .ok_or(ApiError::NotFound)
}
