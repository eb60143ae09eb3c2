use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use crate::models::UserRole;

/// JWT token claims issued by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,    // Subject (user ID)
    pub email: String,  // User email
    pub role: UserRole, // User role
    pub exp: usize,     // Expiration time
    pub iat: usize,     // Issued at
}

/// Verified caller identity, inserted into request extensions by the auth middleware
#[derive(Debug, Clone, PartialEq)]
pub struct UserSession {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl UserSession {
    pub fn from_claims(claims: &Claims) -> Result<Self, uuid::Error> {
        Ok(Self {
            user_id: Uuid::parse_str(&claims.sub)?,
            email: claims.email.clone(),
            role: claims.role,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
