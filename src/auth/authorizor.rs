use oso::{Oso, PolarClass};

use crate::auth::{Platform, User};
use crate::entities::Ride;

pub fn new() -> Oso {
    let mut o = Oso::new();

    o.register_class(Platform::get_polar_class()).unwrap();
    o.register_class(User::get_polar_class()).unwrap();
    o.register_class(Ride::get_polar_class()).unwrap();

    o.load_str(include_str!("rules.polar")).unwrap();

    o
}

#[test]
fn platform_open_actions_test() {
    use uuid::Uuid;

    let authorizor = new();

    let rider = User::new(Uuid::new_v4());

    for action in ["start_ride", "list_rides", "list_bikes", "read_wallet"] {
        let result = authorizor.is_allowed(rider.clone(), action, Platform::default());
        assert_eq!(result.unwrap(), true);
    }
}

#[test]
fn platform_system_actions_test() {
    use uuid::Uuid;

    let authorizor = new();

    let rider = User::new(Uuid::new_v4());
    let system = User::new_system_user();

    for action in ["register_bike", "update_bike_status", "create_wallet"] {
        let result = authorizor.is_allowed(rider.clone(), action, Platform::default());
        assert_eq!(result.unwrap(), false);

        let result = authorizor.is_allowed(system.clone(), action, Platform::default());
        assert_eq!(result.unwrap(), true);
    }
}

#[test]
fn ride_owner_role_test() {
    use crate::entities::Coordinates;
    use uuid::Uuid;

    let authorizor = new();

    let rider = User::new(Uuid::new_v4());
    let stranger = User::new(Uuid::new_v4());

    let ride = Ride::new(
        rider.id.clone(),
        Uuid::new_v4(),
        Coordinates {
            latitude: 0.0,
            longitude: 0.0,
        },
    );

    let result = authorizor.is_allowed(rider.clone(), "read", ride.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(rider.clone(), "end", ride.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(stranger.clone(), "read", ride.clone());
    assert_eq!(result.unwrap(), false);

    let result = authorizor.is_allowed(stranger.clone(), "end", ride.clone());
    assert_eq!(result.unwrap(), false);
}

#[test]
fn ride_system_role_test() {
    use crate::entities::Coordinates;
    use uuid::Uuid;

    let authorizor = new();

    let system = User::new_system_user();

    let ride = Ride::new(
        Uuid::new_v4(),
        Uuid::new_v4(),
        Coordinates {
            latitude: 0.0,
            longitude: 0.0,
        },
    );

    let result = authorizor.is_allowed(system.clone(), "read", ride.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(system.clone(), "end", ride.clone());
    assert_eq!(result.unwrap(), true);
}
