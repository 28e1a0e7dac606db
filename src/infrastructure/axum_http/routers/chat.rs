use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    application::usercases::{
        chat::ChatUseCase, rate_limit::RateLimiter, vip_entitlement::VipEntitlementUseCase,
    },
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::{
            chat::ChatRepository, plans::PlanRepository, profiles::ProfileRepository,
            rate_limit::RateLimitRepository, subscriptions::SubscriptionRepository,
            vip_usage::VipUsageRepository,
        },
        value_objects::chat::{
            ListMessagesFilter, MarkReadModel, OpenDirectChannelModel, SendMessageModel,
        },
    },
    infrastructure::{
        axum_http::{
            auth::AuthUser,
            error_responses::{AppError, from_usecase_error},
        },
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                chat::ChatPostgres, plans::PlanPostgres, profiles::ProfilePostgres,
                rate_limit::RateLimitPostgres, subscriptions::SubscriptionPostgres,
                vip_usage::VipUsagePostgres,
            },
        },
    },
};

#[derive(Debug, Deserialize)]
pub struct ListMessagesQuery {
    pub limit: Option<i64>,
    pub before_id: Option<Uuid>,
}

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let profile_repository = Arc::new(ProfilePostgres::new(Arc::clone(&db_pool)));
    let vip_entitlement_usecase = VipEntitlementUseCase::new(
        Arc::clone(&profile_repository),
        Arc::new(SubscriptionPostgres::new(Arc::clone(&db_pool))),
        Arc::new(PlanPostgres::new(Arc::clone(&db_pool))),
        Arc::new(VipUsagePostgres::new(Arc::clone(&db_pool))),
        Duration::from_secs(config.vip.entitlement_cache_seconds),
    );
    let rate_limiter = RateLimiter::new(Arc::new(RateLimitPostgres::new(Arc::clone(&db_pool))));
    let chat_usecase = ChatUseCase::new(
        Arc::new(ChatPostgres::new(Arc::clone(&db_pool))),
        profile_repository,
        Arc::new(vip_entitlement_usecase),
        Arc::new(rate_limiter),
        config.chat.send_max_per_minute,
    );

    Router::new()
        .route("/channels/direct", post(open_direct))
        .route("/channels/global/ensure", post(ensure_global))
        .route("/channels/:id/messages", get(list_messages))
        .route("/channels/:id/read", post(mark_read))
        .route("/messages", post(send_message))
        .with_state(Arc::new(chat_usecase))
}

pub async fn open_direct<C, P, S, L, U, R>(
    State(chat_usecase): State<Arc<ChatUseCase<C, P, S, L, U, R>>>,
    auth: AuthUser,
    Json(open_direct_channel_model): Json<OpenDirectChannelModel>,
) -> Result<impl IntoResponse, AppError>
where
    C: ChatRepository + Send + Sync + 'static,
    P: ProfileRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    L: PlanRepository + Send + Sync + 'static,
    U: VipUsageRepository + Send + Sync + 'static,
    R: RateLimitRepository + Send + Sync + 'static,
{
    let channel_id = chat_usecase
        .open_direct_channel(auth.user_id, open_direct_channel_model)
        .await
        .map_err(from_usecase_error)?;

    Ok(Json(json!({ "ok": true, "channel_id": channel_id })))
}

pub async fn ensure_global<C, P, S, L, U, R>(
    State(chat_usecase): State<Arc<ChatUseCase<C, P, S, L, U, R>>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError>
where
    C: ChatRepository + Send + Sync + 'static,
    P: ProfileRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    L: PlanRepository + Send + Sync + 'static,
    U: VipUsageRepository + Send + Sync + 'static,
    R: RateLimitRepository + Send + Sync + 'static,
{
    let channel_id = chat_usecase
        .ensure_global_channel(auth.user_id)
        .await
        .map_err(from_usecase_error)?;

    Ok(Json(json!({ "ok": true, "channel_id": channel_id })))
}

pub async fn send_message<C, P, S, L, U, R>(
    State(chat_usecase): State<Arc<ChatUseCase<C, P, S, L, U, R>>>,
    auth: AuthUser,
    Json(send_message_model): Json<SendMessageModel>,
) -> Result<impl IntoResponse, AppError>
where
    C: ChatRepository + Send + Sync + 'static,
    P: ProfileRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    L: PlanRepository + Send + Sync + 'static,
    U: VipUsageRepository + Send + Sync + 'static,
    R: RateLimitRepository + Send + Sync + 'static,
{
    let message = chat_usecase
        .send_message(auth.user_id, send_message_model)
        .await
        .map_err(from_usecase_error)?;

    Ok(Json(json!({ "ok": true, "message": message })))
}

pub async fn list_messages<C, P, S, L, U, R>(
    State(chat_usecase): State<Arc<ChatUseCase<C, P, S, L, U, R>>>,
    auth: AuthUser,
    Path(channel_id): Path<Uuid>,
    Query(query): Query<ListMessagesQuery>,
) -> Result<impl IntoResponse, AppError>
where
    C: ChatRepository + Send + Sync + 'static,
    P: ProfileRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    L: PlanRepository + Send + Sync + 'static,
    U: VipUsageRepository + Send + Sync + 'static,
    R: RateLimitRepository + Send + Sync + 'static,
{
    let messages = chat_usecase
        .list_messages(
            auth.user_id,
            ListMessagesFilter {
                channel_id,
                limit: query.limit,
                before_id: query.before_id,
            },
        )
        .await
        .map_err(from_usecase_error)?;

    Ok(Json(json!({ "ok": true, "messages": messages })))
}

pub async fn mark_read<C, P, S, L, U, R>(
    State(chat_usecase): State<Arc<ChatUseCase<C, P, S, L, U, R>>>,
    auth: AuthUser,
    Path(channel_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    C: ChatRepository + Send + Sync + 'static,
    P: ProfileRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    L: PlanRepository + Send + Sync + 'static,
    U: VipUsageRepository + Send + Sync + 'static,
    R: RateLimitRepository + Send + Sync + 'static,
{
    let updated = chat_usecase
        .mark_read(auth.user_id, MarkReadModel { channel_id })
        .await
        .map_err(from_usecase_error)?;

    Ok(Json(json!({ "ok": true, "updated": updated })))
}
