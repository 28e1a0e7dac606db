use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;

use crate::{
    application::usercases::vip_entitlement::VipEntitlementUseCase,
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::{
            plans::PlanRepository, profiles::ProfileRepository,
            subscriptions::SubscriptionRepository, vip_usage::VipUsageRepository,
        },
        value_objects::vip::VipFeature,
    },
    infrastructure::{
        axum_http::{auth::AuthUser, error_responses::AppError},
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                plans::PlanPostgres, profiles::ProfilePostgres,
                subscriptions::SubscriptionPostgres, vip_usage::VipUsagePostgres,
            },
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let profile_repository = ProfilePostgres::new(Arc::clone(&db_pool));
    let subscription_repository = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let plan_repository = PlanPostgres::new(Arc::clone(&db_pool));
    let usage_repository = VipUsagePostgres::new(Arc::clone(&db_pool));
    let vip_entitlement_usecase = VipEntitlementUseCase::new(
        Arc::new(profile_repository),
        Arc::new(subscription_repository),
        Arc::new(plan_repository),
        Arc::new(usage_repository),
        Duration::from_secs(config.vip.entitlement_cache_seconds),
    );

    Router::new()
        .route("/status", get(status))
        .route("/access/:feature", get(access))
        .route("/usage/:feature", post(record_usage))
        .with_state(Arc::new(vip_entitlement_usecase))
}

pub async fn status<P, S, L, U>(
    State(vip_entitlement_usecase): State<Arc<VipEntitlementUseCase<P, S, L, U>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    P: ProfileRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    L: PlanRepository + Send + Sync + 'static,
    U: VipUsageRepository + Send + Sync + 'static,
{
    let plan = vip_entitlement_usecase
        .resolve_plan_limits(auth.user_id)
        .await;

    Json(json!({
        "ok": true,
        "tier": plan.tier,
        "source": plan.source,
        "limits": plan.limits,
    }))
}

pub async fn access<P, S, L, U>(
    State(vip_entitlement_usecase): State<Arc<VipEntitlementUseCase<P, S, L, U>>>,
    auth: AuthUser,
    Path(feature): Path<String>,
) -> Result<impl IntoResponse, AppError>
where
    P: ProfileRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    L: PlanRepository + Send + Sync + 'static,
    U: VipUsageRepository + Send + Sync + 'static,
{
    let feature = VipFeature::from_key(&feature)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown feature: {}", feature)))?;

    let access = vip_entitlement_usecase
        .check_feature_access(auth.user_id, feature)
        .await;

    Ok(Json(json!({
        "ok": true,
        "allowed": access.allowed,
        "current_usage": access.current_usage,
        "limit": access.limit,
        "tier": access.tier,
    })))
}

pub async fn record_usage<P, S, L, U>(
    State(vip_entitlement_usecase): State<Arc<VipEntitlementUseCase<P, S, L, U>>>,
    auth: AuthUser,
    Path(feature): Path<String>,
) -> Result<impl IntoResponse, AppError>
where
    P: ProfileRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    L: PlanRepository + Send + Sync + 'static,
    U: VipUsageRepository + Send + Sync + 'static,
{
    let feature = VipFeature::from_key(&feature)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown feature: {}", feature)))?;
    if feature.usage_key().is_none() {
        return Err(AppError::BadRequest("Feature is not counted".to_string()));
    }

    vip_entitlement_usecase
        .record_usage(auth.user_id, feature)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(json!({ "ok": true })))
}
