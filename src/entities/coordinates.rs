use serde::{Deserialize, Serialize};

use crate::error::{invalid_input_error, Error};

// Serialized as a [latitude, longitude] pair on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<(f64, f64)> for Coordinates {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<Coordinates> for (f64, f64) {
    fn from(coordinates: Coordinates) -> Self {
        (coordinates.latitude, coordinates.longitude)
    }
}

impl TryFrom<&[f64]> for Coordinates {
    type Error = Error;

    fn try_from(pair: &[f64]) -> Result<Self, Error> {
        match pair {
            [latitude, longitude] => Ok(Self {
                latitude: *latitude,
                longitude: *longitude,
            }),
            _ => Err(invalid_input_error()),
        }
    }
}

#[test]
fn coordinates_serialize_as_pair_test() {
    let coordinates = Coordinates {
        latitude: -33.45,
        longitude: -70.66,
    };

    let encoded = serde_json::to_value(&coordinates).unwrap();
    assert_eq!(encoded, serde_json::json!([-33.45, -70.66]));

    let decoded: Coordinates = serde_json::from_value(encoded).unwrap();
    assert_eq!(decoded, coordinates);
}

#[test]
fn coordinates_reject_malformed_pair_test() {
    assert!(Coordinates::try_from([1.0].as_slice()).is_err());
    assert!(Coordinates::try_from([1.0, 2.0, 3.0].as_slice()).is_err());
    assert!(Coordinates::try_from([1.0, 2.0].as_slice()).is_ok());
}
