// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cart mutation. A caller may only change their own cart.

use axum::{extract::State, Json};

use crate::{
    auth::{Auth, AuthenticatedUser},
    error::ApiError,
    models::{Cart, ModifyCartRequest},
    state::AppState,
};

fn ensure_owner(caller: &AuthenticatedUser, username: &str) -> Result<(), ApiError> {
    if caller.owns(username) {
        return Ok(());
    }
    tracing::warn!(
        caller = %caller.username,
        target = %username,
        "Cart change for another user refused"
    );
    Err(ApiError::forbidden("Cannot modify another user's cart"))
}

#[utoipa::path(
    post,
    path = "/api/cart/addToCart",
    request_body = ModifyCartRequest,
    tag = "Cart",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated cart", body = Cart),
        (status = 400, description = "Cart would exceed its item limit"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Cart belongs to another user"),
        (status = 404, description = "Unknown user or item"),
    )
)]
pub async fn add_to_cart(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Json(request): Json<ModifyCartRequest>,
) -> Result<Json<Cart>, ApiError> {
    ensure_owner(&caller, &request.username)?;
    let cart = state.store.write().await.add_to_cart(
        &request.username,
        request.item_id,
        request.quantity,
    )?;
    tracing::debug!(
        username = %request.username,
        item_id = request.item_id,
        quantity = request.quantity,
        total_cents = cart.total_cents,
        "Items added to cart"
    );
    Ok(Json(cart))
}

#[utoipa::path(
    post,
    path = "/api/cart/removeFromCart",
    request_body = ModifyCartRequest,
    tag = "Cart",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated cart", body = Cart),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Cart belongs to another user"),
        (status = 404, description = "Unknown user or item"),
    )
)]
pub async fn remove_from_cart(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Json(request): Json<ModifyCartRequest>,
) -> Result<Json<Cart>, ApiError> {
    ensure_owner(&caller, &request.username)?;
    let cart = state.store.write().await.remove_from_cart(
        &request.username,
        request.item_id,
        request.quantity,
    )?;
    tracing::debug!(
        username = %request.username,
        item_id = request.item_id,
        quantity = request.quantity,
        total_cents = cart.total_cents,
        "Items removed from cart"
    );
    Ok(Json(cart))
}
