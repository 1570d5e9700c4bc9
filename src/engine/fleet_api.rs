use super::helpers::{deadline, fetch_bike, fetch_bike_for_update, fetch_bikes, insert_bike, update_bike};
use super::Engine;

use async_trait::async_trait;
use sqlx::Acquire;
use uuid::Uuid;

use crate::{
    api::FleetAPI,
    auth::{Platform, User},
    entities::{Bike, BikeStatus, Coordinates},
    error::{invalid_input_error, Error},
};

#[async_trait]
impl FleetAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn register_bike(&self, user: User) -> Result<Bike, Error> {
        self.authorize(user, "register_bike", Platform::default())?;

        let bike = Bike::new();

        let mut conn = deadline(self.pool.acquire()).await?;
        insert_bike(&mut conn, &bike).await?;

        tracing::info!(bike_id = %bike.id, "bike registered");

        Ok(bike)
    }

    #[tracing::instrument(skip(self))]
    async fn find_bike(&self, id: Uuid) -> Result<Bike, Error> {
        let mut conn = deadline(self.pool.acquire()).await?;

        fetch_bike(&mut conn, &id).await
    }

    #[tracing::instrument(skip(self))]
    async fn all_bikes(&self, user: User) -> Result<Vec<Bike>, Error> {
        self.authorize(user, "list_bikes", Platform::default())?;

        let mut conn = deadline(self.pool.acquire()).await?;

        fetch_bikes(&mut conn, None).await
    }

    #[tracing::instrument(skip(self))]
    async fn available_bikes(&self, user: User) -> Result<Vec<Bike>, Error> {
        self.authorize(user, "list_bikes", Platform::default())?;

        let mut conn = deadline(self.pool.acquire()).await?;

        let free = BikeStatus::Free.name();
        fetch_bikes(&mut conn, Some(&free)).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_bike_status(&self, user: User, id: Uuid, status: i32) -> Result<Bike, Error> {
        self.authorize(user.clone(), "update_bike_status", Platform::default())?;

        let status = BikeStatus::from_code(status).ok_or_else(|| invalid_input_error())?;

        let mut conn = deadline(self.pool.acquire()).await?;
        let mut tx = deadline(conn.begin()).await?;

        // the row lock serializes racing transitions; the entity state
        // machine then admits at most one of them
        let mut bike = fetch_bike_for_update(&mut tx, &id).await?;
        bike.transition(status, user.id)?;

        update_bike(&mut tx, &bike).await?;
        deadline(tx.commit()).await?;

        Ok(bike)
    }

    #[tracing::instrument(skip(self))]
    async fn apply_ride_end(
        &self,
        bike_id: Uuid,
        position: Coordinates,
        battery_left: f64,
    ) -> Result<Bike, Error> {
        let mut conn = deadline(self.pool.acquire()).await?;
        let mut tx = deadline(conn.begin()).await?;

        let mut bike = fetch_bike_for_update(&mut tx, &bike_id).await?;
        bike.apply_ride_end(position, battery_left);

        update_bike(&mut tx, &bike).await?;
        deadline(tx.commit()).await?;

        Ok(bike)
    }
}
