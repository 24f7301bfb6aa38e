//! Public types for the session API
use serde::{Deserialize, Serialize};

use crate::auth::SessionClaims;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct SessionUser {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub user: SessionUser,
    /// RFC 3339 timestamp
    pub expires: String,
}

impl From<SessionClaims> for SessionResponse {
    fn from(claims: SessionClaims) -> Self {
        let expires = claims
            .expires()
            .map(|ts| ts.to_rfc3339())
            .unwrap_or_default();
        Self {
            user: SessionUser {
                id: claims.sub,
                name: claims.name,
                email: claims.email,
                image: claims.image,
            },
            expires,
        }
    }
}
