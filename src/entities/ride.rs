use chrono::{DateTime, Utc};
use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Coordinates;
use crate::error::{invalid_state_error, Error};

pub const UNLOCK_FEE: f64 = 5.0;
pub const RATE_PER_MINUTE: f64 = 0.5;
pub const BATTERY_PER_MINUTE: f64 = 2.0;

#[derive(Clone, Debug, Serialize, Deserialize, PolarClass)]
pub struct Ride {
    #[polar(attribute)]
    pub id: Uuid,
    pub status: Status,
    #[polar(attribute)]
    pub user_id: Uuid,
    #[polar(attribute)]
    pub bike_id: Uuid,
    pub start_coords: Coordinates,
    pub end_coords: Option<Coordinates>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub final_cost: Option<f64>,
    pub battery_left: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ongoing,
    Ended,
}

impl Status {
    pub fn name(&self) -> String {
        match self {
            Self::Ongoing => "ongoing".into(),
            Self::Ended => "ended".into(),
        }
    }
}

pub fn fare(duration_minutes: f64) -> f64 {
    duration_minutes * RATE_PER_MINUTE
}

// The authoritative battery level is derived from elapsed time; the value
// a client reports at ride end is advisory only.
pub fn battery_after(battery_level: f64, duration_minutes: f64) -> f64 {
    (battery_level - duration_minutes * BATTERY_PER_MINUTE).max(0.0)
}

impl Ride {
    pub fn new(user_id: Uuid, bike_id: Uuid, start_coords: Coordinates) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            status: Status::Ongoing,
            user_id,
            bike_id,
            start_coords,
            end_coords: None,
            created_at: now,
            updated_at: now,
            final_cost: None,
            battery_left: None,
        }
    }

    pub fn is_ongoing(&self) -> bool {
        match self.status {
            Status::Ongoing => true,
            _ => false,
        }
    }

    pub fn duration_minutes(&self, now: DateTime<Utc>) -> f64 {
        (now - self.created_at).num_seconds().max(0) as f64 / 60.0
    }

    /// Finalizes the ride. A ride ends exactly once; cost is never
    /// recomputed for a ride that has already ended.
    #[tracing::instrument]
    pub fn end(
        &mut self,
        end_coords: Coordinates,
        final_cost: f64,
        battery_left: f64,
    ) -> Result<(), Error> {
        match self.status {
            Status::Ongoing => {
                self.status = Status::Ended;
                self.end_coords = Some(end_coords);
                self.final_cost = Some(final_cost);
                self.battery_left = Some(battery_left);
                self.updated_at = Utc::now();
                Ok(())
            }
            Status::Ended => Err(invalid_state_error()),
        }
    }
}

#[test]
fn status_names_match_serialized_form_test() {
    for status in [Status::Ongoing, Status::Ended] {
        let encoded = serde_json::to_value(&status).unwrap();
        assert_eq!(encoded, serde_json::json!(status.name()));
    }
}

#[test]
fn fare_and_battery_for_ten_minutes_test() {
    assert_eq!(fare(10.0), 5.0);
    assert_eq!(battery_after(100.0, 10.0), 80.0);
}

#[test]
fn battery_is_clamped_at_zero_test() {
    // bike at 15% ridden for 10 minutes consumes 20 points
    assert_eq!(battery_after(15.0, 10.0), 0.0);
}

#[test]
fn ride_ends_exactly_once_test() {
    let mut ride = Ride::new(
        Uuid::new_v4(),
        Uuid::new_v4(),
        Coordinates {
            latitude: 0.0,
            longitude: 0.0,
        },
    );

    let end = Coordinates {
        latitude: 1.0,
        longitude: 1.0,
    };

    ride.end(end, 5.0, 80.0).unwrap();
    assert_eq!(ride.status, Status::Ended);
    assert_eq!(ride.final_cost, Some(5.0));
    assert_eq!(ride.battery_left, Some(80.0));
    assert_eq!(ride.end_coords, Some(end));

    assert!(ride.end(end, 5.0, 80.0).is_err());
    assert_eq!(ride.final_cost, Some(5.0));
}

#[test]
fn new_ride_is_ongoing_test() {
    let ride = Ride::new(
        Uuid::new_v4(),
        Uuid::new_v4(),
        Coordinates {
            latitude: 0.0,
            longitude: 0.0,
        },
    );

    assert!(ride.is_ongoing());
    assert!(ride.end_coords.is_none());
    assert!(ride.final_cost.is_none());
}

#[test]
fn duration_never_negative_test() {
    use chrono::Duration;

    let ride = Ride::new(
        Uuid::new_v4(),
        Uuid::new_v4(),
        Coordinates {
            latitude: 0.0,
            longitude: 0.0,
        },
    );

    let skewed_clock = ride.created_at - Duration::minutes(1);
    assert_eq!(ride.duration_minutes(skewed_clock), 0.0);
}
