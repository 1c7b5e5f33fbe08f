//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domains::auth::{ElevationService, TokenService};
use crate::server::middleware::{require_admin, require_auth};
use crate::server::routes::{
    blogs, catalog, health, newsletter, orders, reports, tokens, users, wishlist,
};

/// Shared application state.
///
/// Everything here is immutable after startup and shared by cloning;
/// request handlers never mutate it.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub tokens: Arc<TokenService>,
    pub elevation: ElevationService,
}

/// Build the Axum application router.
///
/// Routes are grouped by the gates they sit behind: public, authenticated,
/// and admin. Both gates run to completion before any handler executes.
pub fn build_app(pool: PgPool, tokens: TokenService) -> Router {
    let state = AppState {
        db_pool: pool.clone(),
        tokens: Arc::new(tokens),
        elevation: ElevationService::new(pool),
    };

    let public_routes = Router::new()
        .route("/health", get(health::health_handler))
        .route("/tokens", post(tokens::issue))
        .route("/users/:email", put(users::register))
        .route("/users/admin/:email", get(users::role_lookup))
        .route("/categories", get(catalog::list_categories))
        .route("/categories/:id/products", get(catalog::products_by_category))
        .route(
            "/products",
            get(catalog::list_products).post(catalog::create_product),
        )
        .route("/products/advertised", get(catalog::advertised_products))
        .route("/products/brand/:brand", get(catalog::products_by_brand))
        .route("/blogs", get(blogs::list).post(blogs::create))
        .route("/blogs/:id", get(blogs::detail))
        .route("/subscriptions/:email", put(newsletter::subscribe));

    let authed_routes = Router::new()
        .route("/products/seller/:email", get(catalog::products_by_seller))
        .route("/products/:id/advertise", put(catalog::advertise_product))
        .route("/orders", post(orders::create).get(orders::list))
        .route("/orders/:email", get(orders::by_email))
        .route(
            "/wishlist/:email",
            get(wishlist::list_for_owner).put(wishlist::update),
        )
        .route(
            "/wishlist/:email/:product_id",
            post(wishlist::add).delete(wishlist::remove),
        )
        .route("/reports/:email", put(reports::file))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let admin_routes = Router::new()
        .route("/users", get(users::list))
        .route("/users/role/:role", get(users::list_by_role))
        .route("/users/:email", delete(users::remove))
        .route("/users/admin/:email", put(users::promote_admin))
        .route("/users/seller/:email", put(users::verify_seller))
        .route("/categories", post(catalog::create_category))
        .route("/categories/:id", delete(catalog::delete_category))
        .route("/products/:id", delete(catalog::delete_product))
        .route("/reports", get(reports::list))
        .route("/subscriptions", get(newsletter::list))
        .route("/wishlist", get(wishlist::list_all))
        // Gate layers (applied in reverse order - the authentication gate
        // added last runs first)
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Browser clients talk to this API from anywhere.
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    Router::new()
        .merge(public_routes)
        .merge(authed_routes)
        .merge(admin_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
