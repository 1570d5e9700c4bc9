use super::helpers::{
    deadline, fetch_bike, fetch_bike_for_update, fetch_ride, fetch_ride_for_update, fetch_rides,
    insert_ride, update_bike, update_ride,
};
use super::Engine;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::Acquire;
use uuid::Uuid;

use crate::{
    api::{FleetAPI, LedgerAPI, RideAPI},
    auth::{Platform, User},
    entities::{battery_after, fare, BikeStatus, Coordinates, Ride, RideStatus, UNLOCK_FEE},
    error::{
        bike_battery_low_error, bike_unavailable_error, inconsistency_error, invalid_input_error,
        invalid_state_error, Error,
    },
};

#[async_trait]
impl RideAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn start_ride(
        &self,
        user: User,
        bike_id: Uuid,
        start_coords: Vec<f64>,
    ) -> Result<Ride, Error> {
        self.authorize(user.clone(), "start_ride", Platform::default())?;

        if bike_id.is_nil() {
            return Err(invalid_input_error());
        }

        let start_coords = Coordinates::try_from(start_coords.as_slice())?;

        let mut conn = deadline(self.pool.acquire()).await?;

        // the bike must be free with enough charge before any money moves
        let bike = fetch_bike(&mut conn, &bike_id).await?;

        if !bike.is_free() {
            return Err(bike_unavailable_error());
        }

        if !bike.has_ride_battery() {
            return Err(bike_battery_low_error());
        }

        // capture the unlock fee before the bike is held; if the claim
        // below loses a race the fee is not refunded automatically
        self.debit_wallet(user.id.clone(), UNLOCK_FEE).await?;

        tracing::info!(user_id = %user.id, bike_id = %bike_id, "unlock fee captured, claiming bike");

        // the status flip is the serialization point for ride admission:
        // of two concurrent starters exactly one sees the bike still free
        let mut tx = deadline(conn.begin()).await?;

        let mut bike = fetch_bike_for_update(&mut tx, &bike_id).await?;

        if !bike.is_free() {
            tracing::warn!(user_id = %user.id, bike_id = %bike_id, "bike claimed by another rider after fee capture");
            return Err(bike_unavailable_error());
        }

        bike.transition(BikeStatus::InUse, user.id.clone())?;

        update_bike(&mut tx, &bike).await?;
        deadline(tx.commit()).await?;

        let ride = Ride::new(user.id, bike_id, start_coords);
        insert_ride(&mut conn, &ride).await?;

        tracing::info!(ride_id = %ride.id, bike_id = %bike_id, "ride started");

        Ok(ride)
    }

    #[tracing::instrument(skip(self))]
    async fn end_ride(
        &self,
        user: User,
        ride_id: Uuid,
        end_coords: Vec<f64>,
        reported_battery: Option<f64>,
    ) -> Result<Ride, Error> {
        let end_coords = Coordinates::try_from(end_coords.as_slice())?;

        let mut conn = deadline(self.pool.acquire()).await?;

        let ride = fetch_ride(&mut conn, &ride_id).await?;

        self.authorize(user.clone(), "end", ride.clone())?;

        if !ride.is_ongoing() {
            return Err(invalid_state_error());
        }

        let duration = ride.duration_minutes(Utc::now());
        let final_cost = fare(duration);

        let bike = fetch_bike(&mut conn, &ride.bike_id).await?;
        let battery_left = battery_after(bike.battery_level, duration);

        // the client-reported battery is advisory only; billing and fleet
        // state use the server-side estimate
        if let Some(reported) = reported_battery {
            if (reported - battery_left).abs() > 1.0 {
                tracing::debug!(
                    reported,
                    computed = battery_left,
                    "client battery report diverges from server estimate"
                );
            }
        }

        // finalize the ride; the loser of a double-end race fails here
        // inside the row lock and never recomputes cost
        let mut tx = deadline(conn.begin()).await?;

        let mut ride = fetch_ride_for_update(&mut tx, &ride_id).await?;
        ride.end(end_coords, final_cost, battery_left)?;

        update_ride(&mut tx, &ride).await?;
        deadline(tx.commit()).await?;

        // the bike release is a separate write; when it fails the ride
        // stays ended with the bike still held, and the caller sees a
        // generic internal failure
        if let Err(err) = self
            .apply_ride_end(ride.bike_id, end_coords, battery_left)
            .await
        {
            tracing::error!(
                ride_id = %ride.id,
                bike_id = %ride.bike_id,
                error = ?err,
                "bike release failed after ride finalize"
            );
            return Err(inconsistency_error());
        }

        tracing::info!(ride_id = %ride.id, final_cost, battery_left, "ride ended");

        Ok(ride)
    }

    #[tracing::instrument(skip(self))]
    async fn find_ride(&self, user: User, id: Uuid) -> Result<Ride, Error> {
        let mut conn = deadline(self.pool.acquire()).await?;

        let ride = fetch_ride(&mut conn, &id).await?;

        self.authorize(user, "read", ride.clone())?;

        Ok(ride)
    }

    #[tracing::instrument(skip(self))]
    async fn all_rides(&self, user: User) -> Result<Vec<Ride>, Error> {
        self.authorize(user, "list_rides", Platform::default())?;

        let mut conn = deadline(self.pool.acquire()).await?;

        fetch_rides(&mut conn, None).await
    }

    #[tracing::instrument(skip(self))]
    async fn active_rides(&self, user: User) -> Result<Vec<Ride>, Error> {
        self.authorize(user, "list_rides", Platform::default())?;

        let mut conn = deadline(self.pool.acquire()).await?;

        let ongoing = RideStatus::Ongoing.name();
        fetch_rides(&mut conn, Some(&ongoing)).await
    }
}
