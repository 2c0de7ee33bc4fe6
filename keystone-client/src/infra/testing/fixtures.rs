use chrono::{TimeZone, Utc};

use keystone_model::prelude::{AuthResponse, Role, User, UserId};

use crate::infra::errors::{ApiError, HttpError, RawBody};

pub fn sample_user(id: &str) -> User {
    let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    User {
        id: UserId::new(id),
        email: "a@b.com".to_string(),
        name: "A".to_string(),
        role: Role::User,
        created_at: stamp,
        updated_at: stamp,
    }
}

pub fn auth_response(id: &str, token: &str) -> AuthResponse {
    AuthResponse {
        user: sample_user(id),
        token: token.to_string(),
    }
}

/// JSON user payload in the server's wire format
pub fn user_json(id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "email": "a@b.com",
        "name": "A",
        "role": "user",
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z"
    })
}

/// An [`ApiError::Http`] shaped like a JSON `{"message": ...}` response
pub fn http_error(status: u16, message: &str) -> ApiError {
    HttpError::new(
        status,
        message,
        RawBody::Json(serde_json::json!({ "message": message })),
    )
    .into()
}
