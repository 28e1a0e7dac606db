use std::sync::Arc;

use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use serde_json::json;

use crate::{
    application::usercases::{presence::PresenceUseCase, rate_limit::RateLimiter},
    domain::repositories::{
        notifications::NotificationRepository, profiles::ProfileRepository,
        rate_limit::RateLimitRepository, social::SocialRepository,
    },
    infrastructure::{
        axum_http::{
            auth::AuthUser,
            error_responses::{AppError, from_usecase_error},
        },
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                notifications::NotificationPostgres, profiles::ProfilePostgres,
                rate_limit::RateLimitPostgres, social::SocialPostgres,
            },
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let rate_limiter = RateLimiter::new(Arc::new(RateLimitPostgres::new(Arc::clone(&db_pool))));
    let presence_usecase = PresenceUseCase::new(
        Arc::new(ProfilePostgres::new(Arc::clone(&db_pool))),
        Arc::new(SocialPostgres::new(Arc::clone(&db_pool))),
        Arc::new(NotificationPostgres::new(Arc::clone(&db_pool))),
        Arc::new(rate_limiter),
    );

    Router::new()
        .route("/ping", post(ping))
        .with_state(Arc::new(presence_usecase))
}

pub async fn ping<P, S, N, R>(
    State(presence_usecase): State<Arc<PresenceUseCase<P, S, N, R>>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError>
where
    P: ProfileRepository + Send + Sync + 'static,
    S: SocialRepository + Send + Sync + 'static,
    N: NotificationRepository + Send + Sync + 'static,
    R: RateLimitRepository + Send + Sync + 'static,
{
    presence_usecase
        .ping(auth.user_id)
        .await
        .map_err(from_usecase_error)?;

    Ok(Json(json!({ "ok": true })))
}
