use std::sync::Arc;

use anyhow::{Result, anyhow};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::usercases::vip_entitlement::VipEntitlementUseCase;
use crate::domain::entities::audit_events::InsertAuditEventEntity;
use crate::domain::entities::subscriptions::{ADMIN_GRANT_PROVIDER, InsertAppSubscriptionEntity};
use crate::domain::repositories::{
    audit_events::AuditEventRepository, plans::PlanRepository, profiles::ProfileRepository,
    subscriptions::SubscriptionRepository, vip_usage::VipUsageRepository,
};
use crate::domain::value_objects::enums::roles::Role;
use crate::domain::value_objects::vip::{
    GRANTABLE_PLANS, GrantResultModel, GrantSummaryModel, GrantTrialBatchModel, GrantTrialModel,
    MAX_GRANT_DAYS, MAX_GRANTS_PER_REQUEST,
};

pub struct AdminVipUseCase<P, S, L, U, A>
where
    P: ProfileRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    L: PlanRepository + Send + Sync + 'static,
    U: VipUsageRepository + Send + Sync + 'static,
    A: AuditEventRepository + Send + Sync + 'static,
{
    profile_repository: Arc<P>,
    subscription_repository: Arc<S>,
    audit_repository: Arc<A>,
    vip_entitlement: Arc<VipEntitlementUseCase<P, S, L, U>>,
}

impl<P, S, L, U, A> AdminVipUseCase<P, S, L, U, A>
where
    P: ProfileRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    L: PlanRepository + Send + Sync + 'static,
    U: VipUsageRepository + Send + Sync + 'static,
    A: AuditEventRepository + Send + Sync + 'static,
{
    pub fn new(
        profile_repository: Arc<P>,
        subscription_repository: Arc<S>,
        audit_repository: Arc<A>,
        vip_entitlement: Arc<VipEntitlementUseCase<P, S, L, U>>,
    ) -> Self {
        Self {
            profile_repository,
            subscription_repository,
            audit_repository,
            vip_entitlement,
        }
    }

    /// Grants trial subscriptions in batch. Each grant succeeds or fails on
    /// its own; the summary reports both outcomes.
    pub async fn grant_trials(
        &self,
        actor_id: Uuid,
        batch: GrantTrialBatchModel,
    ) -> Result<GrantSummaryModel> {
        self.require_admin(actor_id).await?;

        if batch.grants.is_empty() {
            return Err(anyhow!("No grants given"));
        }
        if batch.grants.len() > MAX_GRANTS_PER_REQUEST {
            return Err(anyhow!("Too many grants"));
        }

        let mut summary = GrantSummaryModel {
            created: 0,
            updated: 0,
            results: Vec::with_capacity(batch.grants.len()),
        };

        for grant in batch.grants {
            let outcome = self.apply_grant(actor_id, &grant).await;
            let result = match outcome {
                Ok(created) => {
                    if created {
                        summary.created += 1;
                    } else {
                        summary.updated += 1;
                    }
                    GrantResultModel {
                        ok: true,
                        user_id: grant.user_id,
                        email: grant.email,
                        plan_id: grant.plan_id,
                        days: grant.days,
                        error: None,
                    }
                }
                Err(err) => GrantResultModel {
                    ok: false,
                    user_id: grant.user_id,
                    email: grant.email,
                    plan_id: grant.plan_id,
                    days: grant.days,
                    error: Some(err.to_string()),
                },
            };
            summary.results.push(result);
        }

        info!(
            %actor_id,
            created = summary.created,
            updated = summary.updated,
            failed = summary.results.iter().filter(|r| !r.ok).count(),
            "admin_vip: trial grants processed"
        );
        Ok(summary)
    }

    /// Returns `true` when a new subscription was created, `false` when an
    /// existing grant was extended.
    async fn apply_grant(&self, actor_id: Uuid, grant: &GrantTrialModel) -> Result<bool> {
        if !GRANTABLE_PLANS.contains(&grant.plan_id.as_str()) {
            return Err(anyhow!("Unknown plan"));
        }
        if grant.days < 1 || grant.days > MAX_GRANT_DAYS {
            return Err(anyhow!("Days out of range"));
        }

        let user_id = self.resolve_user(grant).await?;
        let now = Utc::now();
        let existing = self
            .subscription_repository
            .latest_entitling_app_subscription(user_id)
            .await?
            .filter(|s| s.provider == ADMIN_GRANT_PROVIDER && s.plan_id == grant.plan_id);

        let created = match existing {
            Some(subscription) => {
                // A grant shorter than the remaining validity leaves the
                // expiry untouched.
                let requested = now + ChronoDuration::days(grant.days);
                let valid_until = subscription
                    .valid_until
                    .map_or(requested, |until| until.max(requested));
                self.subscription_repository
                    .extend_app_subscription(subscription.id, valid_until)
                    .await?;
                self.audit_grant(actor_id, user_id, grant, valid_until, "vip.trial_extended")
                    .await;
                false
            }
            None => {
                let valid_until = now + ChronoDuration::days(grant.days);
                self.subscription_repository
                    .insert_app_subscription(InsertAppSubscriptionEntity {
                        user_id,
                        plan_id: grant.plan_id.clone(),
                        provider: ADMIN_GRANT_PROVIDER.to_string(),
                        status: "active".to_string(),
                        valid_until: Some(valid_until),
                        created_at: now,
                    })
                    .await?;
                self.audit_grant(actor_id, user_id, grant, valid_until, "vip.trial_granted")
                    .await;
                true
            }
        };

        self.vip_entitlement.invalidate(user_id);
        Ok(created)
    }

    async fn resolve_user(&self, grant: &GrantTrialModel) -> Result<Uuid> {
        if let Some(user_id) = grant.user_id {
            if self.profile_repository.find_by_id(user_id).await?.is_none() {
                return Err(anyhow!("User not found"));
            }
            return Ok(user_id);
        }
        let email = grant
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| anyhow!("Either user_id or email is required"))?;
        self.profile_repository
            .find_id_by_email(&email.to_lowercase())
            .await?
            .ok_or_else(|| anyhow!("User not found"))
    }

    async fn audit_grant(
        &self,
        actor_id: Uuid,
        user_id: Uuid,
        grant: &GrantTrialModel,
        valid_until: DateTime<Utc>,
        action: &str,
    ) {
        let event = InsertAuditEventEntity {
            actor_id: Some(actor_id),
            action: action.to_string(),
            entity: "app_subscription".to_string(),
            entity_id: Some(user_id.to_string()),
            metadata: json!({
                "plan_id": grant.plan_id,
                "days": grant.days,
                "valid_until": valid_until,
            }),
            created_at: Utc::now(),
        };
        if let Err(err) = self.audit_repository.append(event).await {
            warn!(%actor_id, %user_id, error = %err, "admin_vip: audit append failed");
        }
    }

    async fn require_admin(&self, actor_id: Uuid) -> Result<()> {
        let role = self
            .profile_repository
            .find_role(actor_id)
            .await?
            .ok_or_else(|| anyhow!("Profile not found"))?;
        if Role::from_str(&role) == Role::Admin {
            Ok(())
        } else {
            Err(anyhow!("Forbidden"))
        }
    }
}
