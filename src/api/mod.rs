// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{authenticate, AuthenticatedUser, PolicyError, PolicyRule, RouteAccess, RoutePolicy},
    models::{
        Cart, CreateUserRequest, Item, LoginRequest, LoginResponse, ModifyCartRequest, User,
        UserOrder,
    },
    state::AppState,
};

pub mod cart;
pub mod health;
pub mod items;
pub mod orders;
pub mod users;

/// Access table for every path the router serves.
///
/// Exact rules win over prefixes, the longest prefix wins among prefixes, and
/// anything unlisted is protected.
pub fn route_policy() -> Result<RoutePolicy, PolicyError> {
    RoutePolicy::new([
        PolicyRule::exact("/login", RouteAccess::Public),
        PolicyRule::exact("/api/user/create", RouteAccess::Public),
        PolicyRule::prefix("/health", RouteAccess::Public),
        PolicyRule::prefix("/docs", RouteAccess::Public),
        PolicyRule::prefix("/api-doc", RouteAccess::Public),
        PolicyRule::prefix("/api", RouteAccess::Protected),
    ])
}

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/login", post(users::login))
        .route("/api/user/create", post(users::create_user))
        .route("/api/user/me", get(users::current_user))
        .route("/api/user/id/{id}", get(users::user_by_id))
        .route("/api/user/{username}", get(users::user_by_username))
        .route("/api/item", get(items::list_items))
        .route("/api/item/{id}", get(items::item_by_id))
        .route("/api/item/name/{name}", get(items::items_by_name))
        .route("/api/cart/addToCart", post(cart::add_to_cart))
        .route("/api/cart/removeFromCart", post(cart::remove_from_cart))
        .route("/api/order/submit/{username}", post(orders::submit_order))
        .route("/api/order/history/{username}", get(orders::order_history))
        .route("/health", get(health::liveness))
        .with_state(state.clone());

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(state, authenticate))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        users::login,
        users::create_user,
        users::current_user,
        users::user_by_id,
        users::user_by_username,
        items::list_items,
        items::item_by_id,
        items::items_by_name,
        cart::add_to_cart,
        cart::remove_from_cart,
        orders::submit_order,
        orders::order_history,
        health::liveness
    ),
    components(
        schemas(
            User,
            CreateUserRequest,
            LoginRequest,
            LoginResponse,
            AuthenticatedUser,
            Item,
            Cart,
            ModifyCartRequest,
            UserOrder,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Registration, login and user lookup"),
        (name = "Items", description = "Item catalog"),
        (name = "Cart", description = "Cart mutation"),
        (name = "Orders", description = "Order submission and history"),
        (name = "Health", description = "Liveness")
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
