use axum::extract::{Extension, Json, Path};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::User;
use crate::entities::Bike;
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct UpdateStatusParams {
    status: i32,
}

pub async fn register(
    Extension(api): Extension<DynAPI>,
    Extension(user): Extension<User>,
) -> Result<(StatusCode, Json<Bike>), Error> {
    let bike = api.register_bike(user).await?;

    Ok((StatusCode::CREATED, bike.into()))
}

pub async fn all(
    Extension(api): Extension<DynAPI>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<Bike>>, Error> {
    let bikes = api.all_bikes(user).await?;

    Ok(bikes.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<Bike>, Error> {
    let bike = api.find_bike(id).await?;

    Ok(bike.into())
}

pub async fn available(
    Extension(api): Extension<DynAPI>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<Bike>>, Error> {
    let bikes = api.available_bikes(user).await?;

    Ok(bikes.into())
}

pub async fn update_status(
    Extension(api): Extension<DynAPI>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
    Json(params): Json<UpdateStatusParams>,
) -> Result<Json<Bike>, Error> {
    let bike = api.update_bike_status(user, id, params.status).await?;

    Ok(bike.into())
}
