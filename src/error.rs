use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::Debug;

// Codes 1..=99 are internal and never surface their message to the caller.
#[derive(Debug)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        database_error(err)
    }
}

impl From<oso::OsoError> for Error {
    fn from(err: oso::OsoError) -> Self {
        policy_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            103 => (StatusCode::NOT_FOUND, self.message.as_str()),
            104 => (StatusCode::UNAUTHORIZED, self.message.as_str()),
            106 => (StatusCode::PAYMENT_REQUIRED, self.message.as_str()),
            110 => (StatusCode::GATEWAY_TIMEOUT, self.message.as_str()),
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            _ => (StatusCode::BAD_REQUEST, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        code: 1,
        message: "environment variable error".into(),
    }
}

pub fn database_error<T: Debug>(_: T) -> Error {
    Error {
        code: 2,
        message: "database error".into(),
    }
}

pub fn policy_error(_: oso::OsoError) -> Error {
    Error {
        code: 3,
        message: "authorization engine error".into(),
    }
}

// A multi-entity workflow committed its first write but failed a later one.
// The partial state is left as-is and the caller sees a generic failure.
pub fn inconsistency_error() -> Error {
    Error {
        code: 7,
        message: "partially committed workflow".into(),
    }
}

pub fn invalid_state_error() -> Error {
    Error {
        code: 100,
        message: "invalid state".into(),
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 101,
        message: "invalid input".into(),
    }
}

pub fn not_found_error() -> Error {
    Error {
        code: 103,
        message: "not found".into(),
    }
}

pub fn unauthorized_error() -> Error {
    Error {
        code: 104,
        message: "unauthorized".into(),
    }
}

pub fn insufficient_funds_error() -> Error {
    Error {
        code: 106,
        message: "insufficient funds".into(),
    }
}

pub fn bike_unavailable_error() -> Error {
    Error {
        code: 107,
        message: "bike unavailable".into(),
    }
}

pub fn bike_battery_low_error() -> Error {
    Error {
        code: 108,
        message: "bike battery too low".into(),
    }
}

pub fn timeout_error() -> Error {
    Error {
        code: 110,
        message: "storage deadline exceeded".into(),
    }
}
