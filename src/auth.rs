use axum::{
    extract::{FromRef, FromRequestParts, Request},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    errors::ApiError,
    models::User,
    repository::UserRepositoryState,
};

/// Claims
///
/// The payload expected inside the JSON Web Token issued by the external identity layer.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the UUID of the user in the `users` table.
    pub sub: Uuid,
    /// Expiration Time (exp): the token is rejected after this timestamp.
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
}

/// Role
///
/// Authorization labels gating endpoint access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Admin => "ROLE_ADMIN",
        }
    }
}

/// AuthUser
///
/// The resolved identity of an authenticated request, with the roles it holds.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub roles: Vec<Role>,
}

impl AuthUser {
    /// Every known user holds USER. ADMIN comes from the user's flag or the
    /// configured admin email list.
    pub fn from_user(user: User, config: &AppConfig) -> Self {
        let mut roles = vec![Role::User];
        if user.admin || config.is_admin_email(&user.email) {
            roles.push(Role::Admin);
        }
        Self {
            id: user.id,
            email: user.email,
            roles,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn require(&self, role: Role) -> Result<(), ApiError> {
        if self.has_role(role) {
            Ok(())
        } else {
            tracing::warn!(user = %self.id, role = role.as_str(), "missing role");
            Err(ApiError::AccessDenied)
        }
    }
}

/// AuthUser Extractor Implementation
///
/// Resolves the caller in three steps:
/// 1. Local Bypass: in `Env::Local`, an `x-user-id` header naming a known user.
/// 2. Token Validation: a `Bearer` JWT signed with the configured secret.
/// 3. DB Lookup: the token subject must still exist in the `users` table.
///
/// Rejection: `ApiError::AccessDenied` (403) for any missing or invalid credential,
/// the same body a missing role produces. `ApiError::Repository` (500) if the user
/// lookup itself fails.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    UserRepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let users = UserRepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        // 1. Local Development Bypass
        // An unknown bypass id falls through to the token check.
        if config.env == Env::Local
            && let Some(user_id) = parts
                .headers
                .get("x-user-id")
                .and_then(|value| value.to_str().ok())
                .and_then(|id_str| Uuid::parse_str(id_str).ok())
            && let Some(user) = users.find_user(user_id).await?
        {
            return Ok(AuthUser::from_user(user, &config));
        }

        // 2. Token Extraction
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError::AccessDenied)?;

        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => tracing::debug!("rejected expired token"),
                other => tracing::debug!("rejected token: {:?}", other),
            }
            ApiError::AccessDenied
        })?;

        // 3. Database Lookup
        let user = users
            .find_user(token_data.claims.sub)
            .await?
            .ok_or(ApiError::AccessDenied)?;

        Ok(AuthUser::from_user(user, &config))
    }
}

/// require_user
///
/// Route-layer middleware for the read endpoints. Runs the `AuthUser` extractor
/// and checks the USER role before the handler is reached.
pub async fn require_user(user: AuthUser, request: Request, next: Next) -> Result<Response, ApiError> {
    user.require(Role::User)?;
    Ok(next.run(request).await)
}

/// require_admin
///
/// Route-layer middleware for the create, update and delete endpoints.
pub async fn require_admin(user: AuthUser, request: Request, next: Next) -> Result<Response, ApiError> {
    user.require(Role::Admin)?;
    Ok(next.run(request).await)
}
