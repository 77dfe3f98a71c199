use axum::{Json, extract::rejection::JsonRejection};
use tracing::debug;

use crate::error::{AppError, StoreError};

pub fn get_payload<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        debug!("Rejected payload: {rejection}");
        AppError::from(rejection)
    })
}

/// Presence check for a body field. `0`, `false` and `""` count as present.
pub fn require<T>(value: Option<T>, name: &str) -> Result<T, StoreError> {
    value.ok_or_else(|| {
        debug!("Missing field: {name}");
        StoreError::InvalidInput(format!("{name} is required"))
    })
}

/// Presence check for a name-like body field, which also must not be empty.
pub fn require_text(value: Option<String>, name: &str) -> Result<String, StoreError> {
    match require(value, name)? {
        text if text.is_empty() => {
            debug!("Empty field: {name}");
            Err(StoreError::InvalidInput(format!("{name} must not be empty")))
        }
        text => Ok(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_accepts_falsy_values() {
        assert_eq!(require(Some(0), "value"), Ok(0));
        assert_eq!(require(Some(false), "value"), Ok(false));
        assert_eq!(require(Some(String::new()), "value"), Ok(String::new()));
    }

    #[test]
    fn test_require_rejects_missing() {
        assert!(matches!(require::<u8>(None, "value"), Err(StoreError::InvalidInput(_))));
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text(Some("u1".into()), "userId"), Ok("u1".to_string()));
        assert!(matches!(
            require_text(Some(String::new()), "userId"),
            Err(StoreError::InvalidInput(_))
        ));
        assert!(matches!(require_text(None, "userId"), Err(StoreError::InvalidInput(_))));
    }
}
