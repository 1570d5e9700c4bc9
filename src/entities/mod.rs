mod bike;
mod coordinates;
mod ride;
mod wallet;

pub use bike::{Bike, Status as BikeStatus, MIN_RIDE_BATTERY};
pub use coordinates::Coordinates;
pub use ride::{
    battery_after, fare, Ride, Status as RideStatus, BATTERY_PER_MINUTE, RATE_PER_MINUTE,
    UNLOCK_FEE,
};
pub use wallet::{Transaction, TransactionKind, Wallet};
