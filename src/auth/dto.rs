use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub first_name: String,
    pub password: String,
    pub confirm_password: String,
}

/// Response returned after login or signup. The client echoes `session_id`
/// back in the `X-Session-Id` header on subsequent requests.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub session_id: Uuid,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
}

/// Human-readable outcome for logout and account deletion.
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_serializes_without_secrets() {
        let user = PublicUser {
            id: Uuid::new_v4(),
            email: "new@example.com".to_string(),
            first_name: "New".to_string(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("new@example.com"));
        assert!(json.contains("New"));
        assert!(!json.contains("password"));
    }
}
