use axum::extract::{Extension, Json};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::User;
use crate::entities::{Transaction, Wallet};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    user_id: Uuid,
}

#[derive(Serialize, Deserialize)]
pub struct CreditParams {
    amount: f64,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Extension(user): Extension<User>,
    Json(params): Json<CreateParams>,
) -> Result<(StatusCode, Json<Wallet>), Error> {
    let wallet = api.create_wallet(user, params.user_id).await?;

    Ok((StatusCode::CREATED, wallet.into()))
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Extension(user): Extension<User>,
) -> Result<Json<Wallet>, Error> {
    let wallet = api.find_wallet(user).await?;

    Ok(wallet.into())
}

pub async fn credit(
    Extension(api): Extension<DynAPI>,
    Extension(user): Extension<User>,
    Json(params): Json<CreditParams>,
) -> Result<Json<Transaction>, Error> {
    let entry = api.credit_wallet(user, params.amount).await?;

    Ok(entry.into())
}

pub async fn history(
    Extension(api): Extension<DynAPI>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let entries = api.wallet_history(user).await?;

    Ok(entries.into())
}
