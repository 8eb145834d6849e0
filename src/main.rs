mod aggregate;
mod api;
mod commands;
mod filters;
mod handlers;
mod models;
mod session;

use axum::{
    response::Redirect,
    routing::{get, post},
    Router,
};
use dotenvy::dotenv;
use std::env;
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use api::ApiClient;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    // Remote POS backend this front end talks to
    let api_url = env::var("PHARMACY_API_URL").expect("PHARMACY_API_URL must be set");
    let client = ApiClient::new(&api_url);

    let app = create_router(client);

    // Get port from environment or use default
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{}", port);

    println!("Pharmadesk serving on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

fn create_router(client: ApiClient) -> Router {
    Router::new()
        // Public routes (no session required)
        .route("/", get(|| async { Redirect::permanent("/login") }))
        .route("/login", get(handlers::auth::login_page))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        // Dispatches to the dashboard for the signed-in role
        .route("/dashboard", get(handlers::dashboard))
        // Admin
        .route("/admin", get(handlers::admin::dashboard))
        .route("/admin/register", post(handlers::admin::register_user))
        .route("/admin/export/:format", get(handlers::admin::export))
        // Cashier
        .route("/cashier", get(handlers::cashier::dashboard))
        .route("/cashier/sales", post(handlers::cashier::create_sale))
        .route("/cashier/earnings", post(handlers::cashier::create_earning))
        .route("/cashier/expenses", post(handlers::cashier::create_expense))
        // Pharmacist
        .route("/pharmacist", get(handlers::pharmacist::dashboard))
        .route("/pharmacist/medicines", post(handlers::pharmacist::create_medicine))
        .route("/pharmacist/stock", post(handlers::pharmacist::update_stock))
        .route(
            "/pharmacist/insurance-records",
            post(handlers::pharmacist::create_insurance_record),
        )
        .route(
            "/pharmacist/insurance-payments",
            post(handlers::pharmacist::create_insurance_payment),
        )
        // Stock keeper
        .route("/stock-keeper", get(handlers::stock_keeper::dashboard))
        .route(
            "/stock-keeper/purchases",
            post(handlers::stock_keeper::create_purchase),
        )
        // Static files
        .nest_service("/static", ServeDir::new("static"))
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CookieManagerLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(client)
}
