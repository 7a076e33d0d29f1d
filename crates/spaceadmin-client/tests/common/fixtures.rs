//! Sample backend payloads

use serde_json::{Value, json};
use spaceadmin_core::AdminUser;

/// The administrator used across tests
pub fn admin_user(user_type: Option<i64>) -> AdminUser {
    AdminUser {
        id: "a1".to_string(),
        name: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        user_type,
        role: Some("Administrator".to_string()),
    }
}

/// `{ status, statusCode, message, data }`
pub fn envelope(message: &str, data: Value) -> Value {
    json!({
        "status": true,
        "statusCode": 200,
        "message": message,
        "data": data,
    })
}

/// Error body with a server message
pub fn error_body(status: u16, message: &str) -> Value {
    json!({
        "status": false,
        "statusCode": status,
        "message": message,
    })
}

/// Paginated list envelope
pub fn paged(items: Value, total: u64, page: u32, limit: u32) -> Value {
    envelope(
        "Fetched successfully",
        json!({
            "total": total,
            "page": page,
            "limit": limit,
            "data": items,
        }),
    )
}

/// Login success body for `user_type`
pub fn login_body(token: &str, user_type: i64) -> Value {
    envelope(
        "Login successful",
        json!({
            "token": token,
            "user": {
                "id": "a1",
                "name": "Asha Rao",
                "email": "asha@example.com",
                "user_type": user_type,
                "role": "Administrator",
            },
        }),
    )
}

/// Blog records
pub fn blogs() -> Value {
    json!([
        {"id": "b1", "title": "Launch week", "status": "published"},
        {"id": "b2", "title": "Launch recap", "status": "draft"},
    ])
}

/// Role records
pub fn roles() -> Value {
    json!([
        {"id": "r1", "name": "Support", "user_type": 3},
        {"id": "r2", "name": "Content", "user_type": 4},
    ])
}

/// User records
pub fn users() -> Value {
    json!([
        {"id": "u1", "name": "Ravi", "email": "ravi@example.com", "status": "active"},
        {"id": "u2", "name": "Meera", "email": "meera@example.com", "status": "active"},
    ])
}
