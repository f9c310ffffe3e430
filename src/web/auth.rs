use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use crate::web::{AppState, error::ApiError};

pub const MIN_PASSWORD_LEN: usize = 8;
const TOKEN_BYTES: usize = 32;

/// Static roles recognized by the platform, stored as snake_case text.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    ContentManager,
    FormManager,
    PartnerView,
    PublicUser,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::ContentManager => "content_manager",
            Role::FormManager => "form_manager",
            Role::PartnerView => "partner_view",
            Role::PublicUser => "public_user",
        }
    }

    pub fn parse(raw: &str) -> Option<Role> {
        match raw {
            "super_admin" => Some(Role::SuperAdmin),
            "content_manager" => Some(Role::ContentManager),
            "form_manager" => Some(Role::FormManager),
            "partner_view" => Some(Role::PartnerView),
            "public_user" => Some(Role::PublicUser),
            _ => None,
        }
    }
}

/// Roles allowed to manage pages, programs, tracks, media, and partner
/// assignments.
pub const CONTENT_ROLES: &[Role] = &[Role::SuperAdmin, Role::ContentManager];
/// Roles allowed to read and export form submissions.
pub const FORM_ROLES: &[Role] = &[Role::SuperAdmin, Role::FormManager];
/// Roles allowed to see the admin dashboard counters.
pub const STATS_ROLES: &[Role] = &[Role::SuperAdmin, Role::ContentManager, Role::FormManager];
/// Roles allowed on the partner dashboard.
pub const PARTNER_ROLES: &[Role] = &[Role::PartnerView, Role::SuperAdmin];
/// Roles allowed to manage user accounts.
pub const USER_ADMIN_ROLES: &[Role] = &[Role::SuperAdmin];

#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

#[derive(sqlx::FromRow)]
struct AuthRow {
    id: Uuid,
    email: String,
    full_name: String,
    role: String,
}

/// Resolves the bearer token to its user, rejecting missing, unknown, and
/// expired tokens alike.
pub async fn require_user(pool: &PgPool, headers: &HeaderMap) -> Result<CurrentUser, ApiError> {
    let token = bearer_token(headers).ok_or(ApiError::Unauthorized)?;

    let row = sqlx::query_as::<_, AuthRow>(
        "SELECT u.id, u.email, u.full_name, u.role
         FROM api_tokens t JOIN users u ON u.id = t.user_id
         WHERE t.token = $1 AND (t.expires_at IS NULL OR t.expires_at > NOW())",
    )
    .bind(&token)
    .fetch_optional(pool)
    .await?
    .ok_or(ApiError::Unauthorized)?;

    let role = Role::parse(&row.role).ok_or_else(|| {
        error!(user_id = %row.id, role = %row.role, "user row carries an unrecognized role");
        ApiError::Internal
    })?;

    Ok(CurrentUser {
        id: row.id,
        email: row.email,
        full_name: row.full_name,
        role,
    })
}

pub fn require_role(user: &CurrentUser, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, value) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Issues a fresh bearer token with no expiry. The auth query still honors
/// `expires_at` when a row is expired out-of-band.
pub async fn issue_token(pool: &PgPool, user_id: Uuid) -> sqlx::Result<String> {
    let token = generate_token();
    sqlx::query("INSERT INTO api_tokens (token, user_id) VALUES ($1, $2)")
        .bind(&token)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(token)
}

pub async fn revoke_token(pool: &PgPool, token: &str) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM api_tokens WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed = PasswordHash::new(password_hash);
    match parsed {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

#[derive(Deserialize)]
pub struct RegisterPayload {
    #[serde(default)]
    email: String,
    #[serde(default)]
    full_name: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let email = payload.email.trim().to_lowercase();
    let full_name = payload.full_name.trim().to_string();

    if email.is_empty() || full_name.is_empty() || payload.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation("Invalid registration data."));
    }

    let password_hash = hash_password(&payload.password).map_err(|err| {
        error!(?err, "failed to hash password during registration");
        ApiError::Internal
    })?;

    let id = Uuid::new_v4();
    let result = sqlx::query(
        "INSERT INTO users (id, email, full_name, password_hash, role) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(&email)
    .bind(&full_name)
    .bind(&password_hash)
    .bind(Role::PublicUser.as_str())
    .execute(state.pool_ref())
    .await;

    match result {
        Ok(_) => {}
        Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
            return Err(ApiError::Conflict("Email already registered."));
        }
        Err(err) => return Err(ApiError::from_db(err)),
    }

    let token = issue_token(state.pool_ref(), id).await?;

    Ok((
        StatusCode::CREATED,
        Json(token_response(token, id, &email, &full_name, Role::PublicUser)),
    ))
}

#[derive(sqlx::FromRow)]
struct LoginRow {
    id: Uuid,
    password_hash: String,
    full_name: String,
    role: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<Value>, ApiError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation("Invalid credentials."));
    }

    let row = sqlx::query_as::<_, LoginRow>(
        "SELECT id, password_hash, full_name, role FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(state.pool_ref())
    .await?;

    let Some(user) = row else {
        return Err(ApiError::InvalidCredentials);
    };
    if !verify_password(&payload.password, &user.password_hash) {
        return Err(ApiError::InvalidCredentials);
    }

    let role = Role::parse(&user.role).ok_or_else(|| {
        error!(user_id = %user.id, role = %user.role, "user row carries an unrecognized role");
        ApiError::Internal
    })?;

    let token = issue_token(state.pool_ref(), user.id).await?;

    Ok(Json(token_response(
        token,
        user.id,
        &email,
        &user.full_name,
        role,
    )))
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    if let Some(token) = bearer_token(&headers) {
        revoke_token(state.pool_ref(), &token).await?;
    }
    Ok(Json(json!({ "status": "ok" })))
}

fn token_response(token: String, id: Uuid, email: &str, full_name: &str, role: Role) -> Value {
    json!({
        "access_token": token,
        "token_type": "bearer",
        "user": {
            "id": id,
            "email": email,
            "full_name": full_name,
            "role": role,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn role_strings_round_trip() {
        for role in [
            Role::SuperAdmin,
            Role::ContentManager,
            Role::FormManager,
            Role::PartnerView,
            Role::PublicUser,
        ] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("root"), None);
    }

    #[test]
    fn role_sets_gate_as_specified() {
        let partner = CurrentUser {
            id: Uuid::new_v4(),
            email: "p@example.org".to_string(),
            full_name: "Partner".to_string(),
            role: Role::PartnerView,
        };
        assert!(require_role(&partner, PARTNER_ROLES).is_ok());
        assert!(require_role(&partner, CONTENT_ROLES).is_err());
        assert!(require_role(&partner, FORM_ROLES).is_err());
        assert!(require_role(&partner, USER_ADMIN_ROLES).is_err());
    }

    #[test]
    fn bearer_token_parsing_is_scheme_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("bEaReR abc123"),
        );
        assert_eq!(bearer_token(&headers), Some("abc123".to_string()));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic x"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn generated_tokens_are_64_hex_chars() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token());
    }

    #[test]
    fn password_hashing_round_trips() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn role_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(Role::ContentManager).unwrap(),
            serde_json::json!("content_manager")
        );
    }
}
