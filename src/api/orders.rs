// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{auth::Auth, error::ApiError, models::UserOrder, state::AppState};

/// Snapshot the caller's cart as a new order. The cart itself is left as is.
#[utoipa::path(
    post,
    path = "/api/order/submit/{username}",
    params(("username" = String, Path, description = "Owner of the cart")),
    tag = "Orders",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Submitted order", body = UserOrder),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Cart belongs to another user"),
        (status = 404, description = "User not found"),
    )
)]
pub async fn submit_order(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserOrder>, ApiError> {
    if !caller.owns(&username) {
        tracing::warn!(caller = %caller.username, target = %username, "Order submit refused");
        return Err(ApiError::forbidden("Cannot submit another user's order"));
    }
    let order = state.store.write().await.submit_order(&username)?;
    tracing::info!(
        order_id = %order.id,
        username = %username,
        total_cents = order.total_cents,
        "Order submitted"
    );
    Ok(Json(order))
}

#[utoipa::path(
    get,
    path = "/api/order/history/{username}",
    params(("username" = String, Path, description = "Owner of the orders")),
    tag = "Orders",
    security(("bearer" = [])),
    responses(
        (status = 200, body = [UserOrder]),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Orders belong to another user"),
        (status = 404, description = "User not found"),
    )
)]
pub async fn order_history(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<UserOrder>>, ApiError> {
    if !caller.owns(&username) {
        tracing::warn!(caller = %caller.username, target = %username, "Order history refused");
        return Err(ApiError::forbidden("Cannot view another user's orders"));
    }
    let orders = state.store.read().await.order_history(&username)?;
    Ok(Json(orders))
}
