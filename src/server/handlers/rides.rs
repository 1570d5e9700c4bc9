use axum::extract::{Extension, Json, Path};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::User;
use crate::entities::Ride;
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct StartParams {
    bike_id: Uuid,
    start_coords: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
pub struct EndParams {
    ride_id: Uuid,
    end_coords: Vec<f64>,
    battery: Option<f64>,
}

pub async fn start(
    Extension(api): Extension<DynAPI>,
    Extension(user): Extension<User>,
    Json(params): Json<StartParams>,
) -> Result<(StatusCode, Json<Ride>), Error> {
    let ride = api
        .start_ride(user, params.bike_id, params.start_coords)
        .await?;

    Ok((StatusCode::CREATED, ride.into()))
}

pub async fn end(
    Extension(api): Extension<DynAPI>,
    Extension(user): Extension<User>,
    Json(params): Json<EndParams>,
) -> Result<Json<Value>, Error> {
    let ride = api
        .end_ride(user, params.ride_id, params.end_coords, params.battery)
        .await?;

    Ok(Json(json!({
        "status": "ended",
        "ride_id": ride.id,
        "final_cost": ride.final_cost,
        "battery_left": ride.battery_left,
    })))
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Extension(user): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ride>, Error> {
    let ride = api.find_ride(user, id).await?;

    Ok(ride.into())
}

pub async fn all(
    Extension(api): Extension<DynAPI>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<Ride>>, Error> {
    let rides = api.all_rides(user).await?;

    Ok(rides.into())
}

pub async fn active(
    Extension(api): Extension<DynAPI>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<Ride>>, Error> {
    let rides = api.active_rides(user).await?;

    Ok(rides.into())
}
