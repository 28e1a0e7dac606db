use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::config_loader;
use crate::infrastructure::axum_http::error_responses::AppError;

const ACCESS_TOKEN_COOKIE: &str = "sb-access-token";

#[derive(Debug, Serialize, Deserialize)]
pub struct SupabaseClaims {
    pub sub: String,
    pub aud: String,
    pub role: String,
    pub email: Option<String>,
    pub exp: usize,
}

/// Authenticated caller extracted from a Supabase JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: String,
}

pub fn validate_supabase_jwt(token: &str, secret: &str) -> anyhow::Result<SupabaseClaims> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&["authenticated", "service_role"]);

    let token_data = decode::<SupabaseClaims>(token, &decoding_key, &validation)
        .map_err(|e| anyhow::anyhow!("JWT validation failed: {}", e))?;

    Ok(token_data.claims)
}

fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(header) = parts.headers.get(axum::http::header::AUTHORIZATION) {
        if let Ok(value) = header.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    // Web clients carry the Supabase session in a cookie instead.
    let jar = CookieJar::from_headers(&parts.headers);
    jar.get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts).ok_or(AppError::Unauthorized)?;

        let secret =
            config_loader::get_supabase_jwt_secret().map_err(|_| AppError::Unauthorized)?;
        let claims = validate_supabase_jwt(&token, &secret).map_err(|_| AppError::Unauthorized)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)?;

        Ok(AuthUser {
            user_id,
            email: claims.email,
            role: claims.role,
        })
    }
}
