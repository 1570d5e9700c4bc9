use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::User;
use crate::entities::{Bike, Coordinates, Ride, Transaction, Wallet};
use crate::error::Error;

#[async_trait]
pub trait LedgerAPI {
    async fn create_wallet(&self, user: User, owner_id: Uuid) -> Result<Wallet, Error>;

    async fn find_wallet(&self, user: User) -> Result<Wallet, Error>;

    async fn credit_wallet(&self, user: User, amount: f64) -> Result<Transaction, Error>;

    async fn debit_wallet(&self, user_id: Uuid, amount: f64) -> Result<Transaction, Error>;

    async fn wallet_history(&self, user: User) -> Result<Vec<Transaction>, Error>;
}

#[async_trait]
pub trait FleetAPI {
    async fn register_bike(&self, user: User) -> Result<Bike, Error>;

    async fn find_bike(&self, id: Uuid) -> Result<Bike, Error>;

    async fn all_bikes(&self, user: User) -> Result<Vec<Bike>, Error>;

    async fn available_bikes(&self, user: User) -> Result<Vec<Bike>, Error>;

    async fn update_bike_status(&self, user: User, id: Uuid, status: i32) -> Result<Bike, Error>;

    async fn apply_ride_end(
        &self,
        bike_id: Uuid,
        position: Coordinates,
        battery_left: f64,
    ) -> Result<Bike, Error>;
}

#[async_trait]
pub trait RideAPI {
    async fn start_ride(
        &self,
        user: User,
        bike_id: Uuid,
        start_coords: Vec<f64>,
    ) -> Result<Ride, Error>;

    async fn end_ride(
        &self,
        user: User,
        ride_id: Uuid,
        end_coords: Vec<f64>,
        reported_battery: Option<f64>,
    ) -> Result<Ride, Error>;

    async fn find_ride(&self, user: User, id: Uuid) -> Result<Ride, Error>;

    async fn all_rides(&self, user: User) -> Result<Vec<Ride>, Error>;

    async fn active_rides(&self, user: User) -> Result<Vec<Ride>, Error>;
}

pub trait API: LedgerAPI + FleetAPI + RideAPI {}
