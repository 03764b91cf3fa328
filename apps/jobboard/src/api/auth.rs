use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::ApiClient;
use crate::errors::ClientError;
use crate::models::{Role, User};

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    user: User,
}

impl ApiClient {
    /// POST /api/auth/login: stores the returned session.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ClientError> {
        let auth: AuthResponse = self
            .post("/api/auth/login", &LoginRequest { email, password })
            .await?;
        info!("Logged in as {} ({})", auth.user.email, auth.user.role.label());
        self.store.set_session(auth.token, auth.user.clone())?;
        Ok(auth.user)
    }

    /// POST /api/auth/register: the backend logs the new account in immediately.
    pub async fn register(&self, request: &RegisterRequest<'_>) -> Result<User, ClientError> {
        if request.password.len() < 6 {
            return Err(ClientError::Validation(
                "Password must be at least 6 characters.".to_string(),
            ));
        }
        let auth: AuthResponse = self.post("/api/auth/register", request).await?;
        info!("Registered {} ({})", auth.user.email, auth.user.role.label());
        self.store.set_session(auth.token, auth.user.clone())?;
        Ok(auth.user)
    }

    /// GET /api/auth/me: refreshes the stored user from the server.
    pub async fn me(&self) -> Result<User, ClientError> {
        let me: MeResponse = self.get("/api/auth/me").await?;
        self.store.update_user(me.user.clone())?;
        Ok(me.user)
    }

    /// Local only: the backend keeps no server-side session.
    pub fn logout(&self) {
        self.store.clear_session();
        info!("Logged out");
    }
}
