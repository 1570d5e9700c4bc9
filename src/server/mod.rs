mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, patch, post},
    Router,
};

use crate::server::handlers::{bikes, rides, wallets};
use crate::{api::API, auth::User};

pub type DynAPI = Arc<dyn API + Send + Sync>;

pub async fn serve<T: API + Sync + Send + 'static>(api: T) {
    let api = Arc::new(api) as DynAPI;

    let app = Router::new()
        .route("/bikes", post(bikes::register).get(bikes::all))
        .route("/bikes/available", get(bikes::available))
        .route("/bikes/:id", get(bikes::find))
        .route("/bikes/:id/status", patch(bikes::update_status))
        .route("/rides/start", post(rides::start))
        .route("/rides/end", post(rides::end))
        .route("/rides/active", get(rides::active))
        .route("/rides", get(rides::all))
        .route("/rides/:id", get(rides::find))
        .route("/wallets", post(wallets::create))
        .route("/wallets/me", get(wallets::find))
        .route("/wallets/credit", post(wallets::credit))
        .route("/wallets/transactions", get(wallets::history))
        .layer(Extension(api))
        .layer(Extension(User::new_system_user()));

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
