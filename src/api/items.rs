// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{auth::Auth, error::ApiError, models::Item, state::AppState};

#[utoipa::path(
    get,
    path = "/api/item",
    tag = "Items",
    security(("bearer" = [])),
    responses(
        (status = 200, body = [Item]),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn list_items(Auth(_caller): Auth, State(state): State<AppState>) -> Json<Vec<Item>> {
    Json(state.store.read().await.items())
}

#[utoipa::path(
    get,
    path = "/api/item/{id}",
    params(("id" = u64, Path, description = "Item id")),
    tag = "Items",
    security(("bearer" = [])),
    responses(
        (status = 200, body = Item),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "Item not found"),
    )
)]
pub async fn item_by_id(
    Auth(_caller): Auth,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Item>, ApiError> {
    state
        .store
        .read()
        .await
        .item_by_id(id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Item not found"))
}

/// All items with exactly this name. An empty match is a 404.
#[utoipa::path(
    get,
    path = "/api/item/name/{name}",
    params(("name" = String, Path, description = "Exact item name")),
    tag = "Items",
    security(("bearer" = [])),
    responses(
        (status = 200, body = [Item]),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "No item with that name"),
    )
)]
pub async fn items_by_name(
    Auth(_caller): Auth,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let items = state.store.read().await.items_by_name(&name);
    if items.is_empty() {
        return Err(ApiError::not_found("Item not found"));
    }
    Ok(Json(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::test_state;
    use crate::auth::AuthenticatedUser;
    use axum::http::StatusCode;

    fn caller() -> Auth {
        Auth(AuthenticatedUser {
            username: "alice".into(),
        })
    }

    #[tokio::test]
    async fn list_returns_catalog() {
        let (state, _) = test_state();
        let Json(items) = list_items(caller(), State(state)).await;
        let names: Vec<_> = items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, ["Round Widget", "Square Widget"]);
    }

    #[tokio::test]
    async fn lookup_by_id() {
        let (state, _) = test_state();

        let Json(item) = item_by_id(caller(), State(state.clone()), Path(2))
            .await
            .unwrap();
        assert_eq!(item.name, "Square Widget");
        assert_eq!(item.price_cents, 199);

        let err = item_by_id(caller(), State(state), Path(42))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn lookup_by_name_requires_a_match() {
        let (state, _) = test_state();

        let Json(items) = items_by_name(
            caller(),
            State(state.clone()),
            Path("Round Widget".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(items.len(), 1);

        let err = items_by_name(caller(), State(state), Path("round widget".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
