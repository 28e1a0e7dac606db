use std::sync::Arc;
use std::time::Duration;

use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use serde_json::json;

use crate::{
    application::usercases::{admin_vip::AdminVipUseCase, vip_entitlement::VipEntitlementUseCase},
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::{
            audit_events::AuditEventRepository, plans::PlanRepository,
            profiles::ProfileRepository, subscriptions::SubscriptionRepository,
            vip_usage::VipUsageRepository,
        },
        value_objects::vip::GrantTrialBatchModel,
    },
    infrastructure::{
        axum_http::{
            auth::AuthUser,
            error_responses::{AppError, from_usecase_error},
        },
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                audit_events::AuditEventPostgres, plans::PlanPostgres,
                profiles::ProfilePostgres, subscriptions::SubscriptionPostgres,
                vip_usage::VipUsagePostgres,
            },
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let profile_repository = Arc::new(ProfilePostgres::new(Arc::clone(&db_pool)));
    let subscription_repository = Arc::new(SubscriptionPostgres::new(Arc::clone(&db_pool)));
    let vip_entitlement_usecase = VipEntitlementUseCase::new(
        Arc::clone(&profile_repository),
        Arc::clone(&subscription_repository),
        Arc::new(PlanPostgres::new(Arc::clone(&db_pool))),
        Arc::new(VipUsagePostgres::new(Arc::clone(&db_pool))),
        Duration::from_secs(config.vip.entitlement_cache_seconds),
    );
    let admin_vip_usecase = AdminVipUseCase::new(
        profile_repository,
        subscription_repository,
        Arc::new(AuditEventPostgres::new(Arc::clone(&db_pool))),
        Arc::new(vip_entitlement_usecase),
    );

    Router::new()
        .route("/vip/grant-trial", post(grant_trial))
        .with_state(Arc::new(admin_vip_usecase))
}

pub async fn grant_trial<P, S, L, U, A>(
    State(admin_vip_usecase): State<Arc<AdminVipUseCase<P, S, L, U, A>>>,
    auth: AuthUser,
    Json(grant_trial_batch_model): Json<GrantTrialBatchModel>,
) -> Result<impl IntoResponse, AppError>
where
    P: ProfileRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    L: PlanRepository + Send + Sync + 'static,
    U: VipUsageRepository + Send + Sync + 'static,
    A: AuditEventRepository + Send + Sync + 'static,
{
    let summary = admin_vip_usecase
        .grant_trials(auth.user_id, grant_trial_batch_model)
        .await
        .map_err(from_usecase_error)?;

    Ok(Json(json!({
        "ok": true,
        "created": summary.created,
        "updated": summary.updated,
        "results": summary.results,
    })))
}
