use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Coordinates;
use crate::error::{invalid_state_error, Error};

pub const MIN_RIDE_BATTERY: f64 = 20.0;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bike {
    pub id: Uuid,
    pub status: Status,
    pub battery_level: f64,
    pub coordinates: Coordinates,
    pub last_used_at: Option<DateTime<Utc>>,
    pub user_history: Vec<Uuid>,
    pub total_usage_minutes: f64,
    pub total_earnings: f64,
    pub last_maintenance: Option<DateTime<Utc>>,
    pub next_maintenance: Option<DateTime<Utc>>,
    pub operational_since: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Free,
    InUse,
    Maintenance,
    NoBattery,
    Reserved,
}

impl Status {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Free),
            2 => Some(Self::InUse),
            3 => Some(Self::Maintenance),
            4 => Some(Self::NoBattery),
            5 => Some(Self::Reserved),
            _ => None,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::Free => 1,
            Self::InUse => 2,
            Self::Maintenance => 3,
            Self::NoBattery => 4,
            Self::Reserved => 5,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::Free => "free".into(),
            Self::InUse => "in_use".into(),
            Self::Maintenance => "maintenance".into(),
            Self::NoBattery => "no_battery".into(),
            Self::Reserved => "reserved".into(),
        }
    }
}

impl Bike {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            status: Status::Free,
            battery_level: 100.0,
            coordinates: Coordinates {
                latitude: 0.0,
                longitude: 0.0,
            },
            last_used_at: None,
            user_history: vec![],
            total_usage_minutes: 0.0,
            total_earnings: 0.0,
            last_maintenance: None,
            next_maintenance: None,
            operational_since: Utc::now(),
        }
    }

    pub fn is_free(&self) -> bool {
        match self.status {
            Status::Free => true,
            _ => false,
        }
    }

    pub fn has_ride_battery(&self) -> bool {
        self.battery_level >= MIN_RIDE_BATTERY
    }

    /// Moves the bike through its status machine. InUse can only be left
    /// via `apply_ride_end`; a bike already in use admits no new rider.
    #[tracing::instrument]
    pub fn transition(&mut self, to: Status, acting_user: Uuid) -> Result<(), Error> {
        let allowed = match (self.status, to) {
            (Status::Free, Status::InUse)
            | (Status::Free, Status::Maintenance)
            | (Status::Free, Status::NoBattery)
            | (Status::Free, Status::Reserved) => true,
            (Status::Maintenance, Status::Free) => true,
            (Status::NoBattery, Status::Free) => true,
            (Status::Reserved, Status::InUse) | (Status::Reserved, Status::Free) => true,
            _ => false,
        };

        if !allowed {
            return Err(invalid_state_error());
        }

        if let Status::InUse = to {
            self.user_history.push(acting_user);
        }

        self.status = to;
        self.last_used_at = Some(Utc::now());

        Ok(())
    }

    /// The only path that changes status, position and battery together.
    #[tracing::instrument]
    pub fn apply_ride_end(&mut self, position: Coordinates, battery_left: f64) {
        self.status = Status::Free;
        self.coordinates = position;
        self.battery_level = battery_left.max(0.0);
        self.last_used_at = Some(Utc::now());
    }
}

#[test]
fn new_bike_is_provisioned_free_test() {
    let bike = Bike::new();

    assert_eq!(bike.status, Status::Free);
    assert_eq!(bike.battery_level, 100.0);
    assert!(bike.user_history.is_empty());
    assert!(bike.last_used_at.is_none());
}

#[test]
fn status_codes_round_trip_test() {
    for code in 1..=5 {
        let status = Status::from_code(code).unwrap();
        assert_eq!(status.code(), code);
    }

    assert!(Status::from_code(0).is_none());
    assert!(Status::from_code(6).is_none());
}

#[test]
fn status_names_match_serialized_form_test() {
    // the status column written by the engine and the tag inside the JSONB
    // record must agree, or status filters would miss rows
    for status in [
        Status::Free,
        Status::InUse,
        Status::Maintenance,
        Status::NoBattery,
        Status::Reserved,
    ] {
        let encoded = serde_json::to_value(&status).unwrap();
        assert_eq!(encoded, serde_json::json!(status.name()));
    }
}

#[test]
fn battery_admission_threshold_test() {
    let mut bike = Bike::new();
    assert!(bike.has_ride_battery());

    // exactly at the threshold is still admitted
    bike.battery_level = MIN_RIDE_BATTERY;
    assert!(bike.has_ride_battery());

    bike.battery_level = 19.9;
    assert!(!bike.has_ride_battery());

    bike.battery_level = 15.0;
    assert!(!bike.has_ride_battery());
}

#[test]
fn ride_cycle_transitions_test() {
    let rider = Uuid::new_v4();
    let mut bike = Bike::new();

    bike.transition(Status::InUse, rider).unwrap();
    assert_eq!(bike.status, Status::InUse);
    assert_eq!(bike.user_history, vec![rider]);
    assert!(bike.last_used_at.is_some());

    // a second rider cannot claim a bike already in use
    assert!(bike.transition(Status::InUse, Uuid::new_v4()).is_err());
    assert_eq!(bike.user_history.len(), 1);

    bike.apply_ride_end(
        Coordinates {
            latitude: 1.0,
            longitude: 2.0,
        },
        80.0,
    );
    assert_eq!(bike.status, Status::Free);
    assert_eq!(bike.battery_level, 80.0);
}

#[test]
fn maintenance_and_recharge_transitions_test() {
    let actor = Uuid::new_v4();
    let mut bike = Bike::new();

    bike.transition(Status::Maintenance, actor).unwrap();
    assert!(bike.transition(Status::Reserved, actor).is_err());
    bike.transition(Status::Free, actor).unwrap();

    bike.transition(Status::NoBattery, actor).unwrap();
    bike.transition(Status::Free, actor).unwrap();

    // maintenance and recharge never touch the usage history
    assert!(bike.user_history.is_empty());
}

#[test]
fn reserved_bike_can_be_claimed_or_released_test() {
    let rider = Uuid::new_v4();

    let mut bike = Bike::new();
    bike.transition(Status::Reserved, rider).unwrap();
    bike.transition(Status::InUse, rider).unwrap();
    assert_eq!(bike.user_history, vec![rider]);

    let mut bike = Bike::new();
    bike.transition(Status::Reserved, rider).unwrap();
    bike.transition(Status::Free, rider).unwrap();
    assert!(bike.user_history.is_empty());
}

#[test]
fn self_transition_is_rejected_test() {
    let actor = Uuid::new_v4();
    let mut bike = Bike::new();

    assert!(bike.transition(Status::Free, actor).is_err());
}

#[test]
fn ride_end_clamps_battery_test() {
    let mut bike = Bike::new();
    bike.transition(Status::InUse, Uuid::new_v4()).unwrap();

    bike.apply_ride_end(
        Coordinates {
            latitude: 0.0,
            longitude: 0.0,
        },
        -5.0,
    );

    assert_eq!(bike.battery_level, 0.0);
    assert_eq!(bike.status, Status::Free);
}
