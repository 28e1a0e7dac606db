use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{Duration as ChronoDuration, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::repositories::{
    plans::PlanRepository, profiles::ProfileRepository, subscriptions::SubscriptionRepository,
    vip_usage::VipUsageRepository,
};
use crate::domain::value_objects::enums::roles::Role;
use crate::domain::value_objects::vip::{
    FeatureAccess, STAFF_TIER, VipEntitlementSource, VipFeature, VipPlanResult, VipTierLimits,
};

/// Resolves the effective VIP tier and per-feature limits for a user.
///
/// The resolved tier is never persisted: it is recomputed per request, with
/// a short TTL cache bounding database load. Resolution order is staff role,
/// app-store subscription, marketplace subscription, free fallback, and any
/// repository failure degrades to the free tier instead of erroring.
pub struct VipEntitlementUseCase<P, S, L, U>
where
    P: ProfileRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    L: PlanRepository + Send + Sync + 'static,
    U: VipUsageRepository + Send + Sync + 'static,
{
    profile_repository: Arc<P>,
    subscription_repository: Arc<S>,
    plan_repository: Arc<L>,
    usage_repository: Arc<U>,
    cache_ttl: Duration,
    cache: Mutex<HashMap<Uuid, (Instant, VipPlanResult)>>,
}

impl<P, S, L, U> VipEntitlementUseCase<P, S, L, U>
where
    P: ProfileRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    L: PlanRepository + Send + Sync + 'static,
    U: VipUsageRepository + Send + Sync + 'static,
{
    pub fn new(
        profile_repository: Arc<P>,
        subscription_repository: Arc<S>,
        plan_repository: Arc<L>,
        usage_repository: Arc<U>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            profile_repository,
            subscription_repository,
            plan_repository,
            usage_repository,
            cache_ttl,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub async fn resolve_plan_limits(&self, user_id: Uuid) -> VipPlanResult {
        if let Some(cached) = self.cached(user_id) {
            return cached;
        }

        let result = match self.try_resolve(user_id).await {
            Ok(result) => result,
            Err(err) => {
                warn!(
                    %user_id,
                    error = %err,
                    "vip_entitlement: resolution failed, degrading to free tier"
                );
                VipPlanResult::free(VipEntitlementSource::FreeNoSubscription)
            }
        };

        self.store(user_id, result.clone());
        result
    }

    async fn try_resolve(&self, user_id: Uuid) -> Result<VipPlanResult> {
        if let Some(role) = self.profile_repository.find_role(user_id).await? {
            if Role::from_str(&role).is_staff() {
                debug!(%user_id, role, "vip_entitlement: staff role, unlimited limits");
                return Ok(VipPlanResult {
                    tier: STAFF_TIER.to_string(),
                    limits: VipTierLimits::unlimited(),
                    source: VipEntitlementSource::Role,
                });
            }
        }

        if let Some(subscription) = self
            .subscription_repository
            .latest_entitling_app_subscription(user_id)
            .await?
        {
            return match self.plan_repository.find_limits(&subscription.plan_id).await? {
                Some(limits) => Ok(VipPlanResult {
                    tier: subscription.plan_id,
                    limits: VipTierLimits::from_plan_json(&limits),
                    source: VipEntitlementSource::AppSubscription,
                }),
                None => {
                    warn!(
                        %user_id,
                        subscription_id = %subscription.id,
                        plan_id = subscription.plan_id,
                        "vip_entitlement: app subscription references missing plan"
                    );
                    Ok(VipPlanResult::free(
                        VipEntitlementSource::AppSubscriptionMissingPlan,
                    ))
                }
            };
        }

        if let Some(subscription) = self
            .subscription_repository
            .latest_entitling_marketplace_subscription(user_id)
            .await?
        {
            return match self.plan_repository.find_limits(&subscription.plan_id).await? {
                Some(limits) => Ok(VipPlanResult {
                    tier: subscription.plan_id,
                    limits: VipTierLimits::from_plan_json(&limits),
                    source: VipEntitlementSource::MarketplaceSubscription,
                }),
                None => {
                    warn!(
                        %user_id,
                        subscription_id = %subscription.id,
                        plan_id = subscription.plan_id,
                        "vip_entitlement: marketplace subscription references missing plan"
                    );
                    Ok(VipPlanResult::free(
                        VipEntitlementSource::MarketplaceSubscriptionMissingPlan,
                    ))
                }
            };
        }

        Ok(VipPlanResult::free(VipEntitlementSource::FreeNoSubscription))
    }

    pub async fn check_feature_access(&self, user_id: Uuid, feature: VipFeature) -> FeatureAccess {
        let plan = self.resolve_plan_limits(user_id).await;
        let tier = plan.tier.clone();

        let (numeric_limit, usage_key, daily_window) = match feature {
            VipFeature::NutritionMacros | VipFeature::Offline | VipFeature::ChefAi => {
                let enabled = match feature {
                    VipFeature::NutritionMacros => plan.limits.nutrition_macros,
                    VipFeature::Offline => plan.limits.offline,
                    _ => plan.limits.chef_ai,
                };
                return FeatureAccess {
                    allowed: enabled,
                    current_usage: 0,
                    limit: Some(if enabled { 1 } else { 0 }),
                    tier,
                };
            }
            VipFeature::HistoryDays => {
                return FeatureAccess {
                    allowed: true,
                    current_usage: 0,
                    limit: plan.limits.history_days.map(i64::from),
                    tier,
                };
            }
            VipFeature::ChatDaily => (i64::from(plan.limits.chat_daily), "chat", true),
            VipFeature::WizardWeekly => (i64::from(plan.limits.wizard_weekly), "wizard", false),
            VipFeature::InsightsWeekly => {
                (i64::from(plan.limits.insights_weekly), "insights", false)
            }
        };

        let today = Utc::now().date_naive();
        let usage = if daily_window {
            self.usage_repository
                .usage_on_day(user_id, usage_key, today)
                .await
        } else {
            // Trailing 7-day window: today plus the previous six days.
            self.usage_repository
                .usage_since(user_id, usage_key, today - ChronoDuration::days(6))
                .await
        };

        match usage {
            Ok(current_usage) => FeatureAccess {
                allowed: current_usage < numeric_limit,
                current_usage,
                limit: Some(numeric_limit),
                tier,
            },
            Err(err) => {
                warn!(
                    %user_id,
                    feature = usage_key,
                    error = %err,
                    "vip_entitlement: usage lookup failed, denying feature"
                );
                FeatureAccess {
                    allowed: false,
                    current_usage: 0,
                    limit: Some(numeric_limit),
                    tier,
                }
            }
        }
    }

    /// Counts one use of a counted feature for today. Callers treat failures
    /// as non-fatal.
    pub async fn record_usage(&self, user_id: Uuid, feature: VipFeature) -> Result<()> {
        let Some(usage_key) = feature.usage_key() else {
            return Ok(());
        };
        self.usage_repository
            .increment(user_id, usage_key, Utc::now().date_naive())
            .await
    }

    pub fn invalidate(&self, user_id: Uuid) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.remove(&user_id);
        }
    }

    fn cached(&self, user_id: Uuid) -> Option<VipPlanResult> {
        let cache = self.cache.lock().ok()?;
        let (stored_at, result) = cache.get(&user_id)?;
        if stored_at.elapsed() < self.cache_ttl {
            Some(result.clone())
        } else {
            None
        }
    }

    fn store(&self, user_id: Uuid, result: VipPlanResult) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(user_id, (Instant::now(), result));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::subscriptions::AppSubscriptionEntity;
    use crate::domain::repositories::{
        plans::MockPlanRepository, profiles::MockProfileRepository,
        subscriptions::MockSubscriptionRepository, vip_usage::MockVipUsageRepository,
    };
    use crate::domain::value_objects::vip::FREE_TIER;
    use mockall::predicate::eq;
    use serde_json::json;

    fn usecase(
        profiles: MockProfileRepository,
        subscriptions: MockSubscriptionRepository,
        plans: MockPlanRepository,
        usage: MockVipUsageRepository,
    ) -> VipEntitlementUseCase<
        MockProfileRepository,
        MockSubscriptionRepository,
        MockPlanRepository,
        MockVipUsageRepository,
    > {
        VipEntitlementUseCase::new(
            Arc::new(profiles),
            Arc::new(subscriptions),
            Arc::new(plans),
            Arc::new(usage),
            Duration::from_secs(30),
        )
    }

    fn app_subscription(user_id: Uuid, plan_id: &str) -> AppSubscriptionEntity {
        AppSubscriptionEntity {
            id: Uuid::new_v4(),
            user_id,
            plan_id: plan_id.to_string(),
            provider: "app_store".to_string(),
            status: "active".to_string(),
            valid_until: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn no_subscriptions_resolves_to_free() {
        let user_id = Uuid::new_v4();

        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find_role()
            .with(eq(user_id))
            .returning(|_| Box::pin(async { Ok(Some("user".to_string())) }));

        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_latest_entitling_app_subscription()
            .returning(|_| Box::pin(async { Ok(None) }));
        subscriptions
            .expect_latest_entitling_marketplace_subscription()
            .returning(|_| Box::pin(async { Ok(None) }));

        let resolved = usecase(
            profiles,
            subscriptions,
            MockPlanRepository::new(),
            MockVipUsageRepository::new(),
        )
        .resolve_plan_limits(user_id)
        .await;

        assert_eq!(resolved.tier, FREE_TIER);
        assert_eq!(resolved.source, VipEntitlementSource::FreeNoSubscription);
        assert_eq!(resolved.limits, VipTierLimits::free());
    }

    #[tokio::test]
    async fn staff_role_gets_unlimited_limits() {
        let user_id = Uuid::new_v4();

        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find_role()
            .returning(|_| Box::pin(async { Ok(Some("teacher".to_string())) }));

        let resolved = usecase(
            profiles,
            MockSubscriptionRepository::new(),
            MockPlanRepository::new(),
            MockVipUsageRepository::new(),
        )
        .resolve_plan_limits(user_id)
        .await;

        assert_eq!(resolved.tier, STAFF_TIER);
        assert_eq!(resolved.source, VipEntitlementSource::Role);
        assert_eq!(resolved.limits.history_days, None);
    }

    #[tokio::test]
    async fn app_subscription_wins_over_marketplace() {
        let user_id = Uuid::new_v4();

        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find_role()
            .returning(|_| Box::pin(async { Ok(Some("user".to_string())) }));

        let mut subscriptions = MockSubscriptionRepository::new();
        let subscription = app_subscription(user_id, "vip_pro");
        subscriptions
            .expect_latest_entitling_app_subscription()
            .returning(move |_| {
                let subscription = subscription.clone();
                Box::pin(async move { Ok(Some(subscription)) })
            });
        // The marketplace table must not be consulted when an app-store
        // subscription exists.
        subscriptions
            .expect_latest_entitling_marketplace_subscription()
            .times(0);

        let mut plans = MockPlanRepository::new();
        plans
            .expect_find_limits()
            .with(eq("vip_pro"))
            .returning(|_| {
                Box::pin(async { Ok(Some(json!({ "chat_daily": 50, "offline": true }))) })
            });

        let resolved = usecase(profiles, subscriptions, plans, MockVipUsageRepository::new())
            .resolve_plan_limits(user_id)
            .await;

        assert_eq!(resolved.tier, "vip_pro");
        assert_eq!(resolved.source, VipEntitlementSource::AppSubscription);
        assert_eq!(resolved.limits.chat_daily, 50);
        assert!(resolved.limits.offline);
    }

    #[tokio::test]
    async fn missing_plan_degrades_to_free_with_provenance() {
        let user_id = Uuid::new_v4();

        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find_role()
            .returning(|_| Box::pin(async { Ok(Some("user".to_string())) }));

        let mut subscriptions = MockSubscriptionRepository::new();
        let subscription = app_subscription(user_id, "vip_legacy");
        subscriptions
            .expect_latest_entitling_app_subscription()
            .returning(move |_| {
                let subscription = subscription.clone();
                Box::pin(async move { Ok(Some(subscription)) })
            });

        let mut plans = MockPlanRepository::new();
        plans
            .expect_find_limits()
            .returning(|_| Box::pin(async { Ok(None) }));

        let resolved = usecase(profiles, subscriptions, plans, MockVipUsageRepository::new())
            .resolve_plan_limits(user_id)
            .await;

        assert_eq!(resolved.tier, FREE_TIER);
        assert_eq!(
            resolved.source,
            VipEntitlementSource::AppSubscriptionMissingPlan
        );
        assert_eq!(resolved.limits, VipTierLimits::free());
    }

    #[tokio::test]
    async fn repository_error_degrades_to_free() {
        let user_id = Uuid::new_v4();

        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find_role()
            .returning(|_| Box::pin(async { Err(anyhow::anyhow!("connection refused")) }));

        let resolved = usecase(
            profiles,
            MockSubscriptionRepository::new(),
            MockPlanRepository::new(),
            MockVipUsageRepository::new(),
        )
        .resolve_plan_limits(user_id)
        .await;

        assert_eq!(resolved.tier, FREE_TIER);
        assert_eq!(resolved.source, VipEntitlementSource::FreeNoSubscription);
    }

    #[tokio::test]
    async fn resolution_is_cached_within_ttl() {
        let user_id = Uuid::new_v4();

        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find_role()
            .times(1)
            .returning(|_| Box::pin(async { Ok(Some("admin".to_string())) }));

        let usecase = usecase(
            profiles,
            MockSubscriptionRepository::new(),
            MockPlanRepository::new(),
            MockVipUsageRepository::new(),
        );

        let first = usecase.resolve_plan_limits(user_id).await;
        let second = usecase.resolve_plan_limits(user_id).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn invalidate_drops_the_cached_entry() {
        let user_id = Uuid::new_v4();

        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find_role()
            .times(2)
            .returning(|_| Box::pin(async { Ok(Some("admin".to_string())) }));

        let usecase = usecase(
            profiles,
            MockSubscriptionRepository::new(),
            MockPlanRepository::new(),
            MockVipUsageRepository::new(),
        );

        usecase.resolve_plan_limits(user_id).await;
        usecase.invalidate(user_id);
        usecase.resolve_plan_limits(user_id).await;
    }

    #[tokio::test]
    async fn chat_daily_compares_todays_usage() {
        let user_id = Uuid::new_v4();

        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find_role()
            .returning(|_| Box::pin(async { Ok(Some("user".to_string())) }));

        let mut subscriptions = MockSubscriptionRepository::new();
        let subscription = app_subscription(user_id, "vip_start");
        subscriptions
            .expect_latest_entitling_app_subscription()
            .returning(move |_| {
                let subscription = subscription.clone();
                Box::pin(async move { Ok(Some(subscription)) })
            });

        let mut plans = MockPlanRepository::new();
        plans
            .expect_find_limits()
            .returning(|_| Box::pin(async { Ok(Some(json!({ "chat_daily": 10 }))) }));

        let mut usage = MockVipUsageRepository::new();
        usage
            .expect_usage_on_day()
            .returning(|_, _, _| Box::pin(async { Ok(3) }));

        let access = usecase(profiles, subscriptions, plans, usage)
            .check_feature_access(user_id, VipFeature::ChatDaily)
            .await;

        assert!(access.allowed);
        assert_eq!(access.current_usage, 3);
        assert_eq!(access.limit, Some(10));
        assert_eq!(access.tier, "vip_start");
    }

    #[tokio::test]
    async fn usage_error_denies_the_feature() {
        let user_id = Uuid::new_v4();

        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find_role()
            .returning(|_| Box::pin(async { Ok(Some("user".to_string())) }));

        let mut subscriptions = MockSubscriptionRepository::new();
        let subscription = app_subscription(user_id, "vip_start");
        subscriptions
            .expect_latest_entitling_app_subscription()
            .returning(move |_| {
                let subscription = subscription.clone();
                Box::pin(async move { Ok(Some(subscription)) })
            });

        let mut plans = MockPlanRepository::new();
        plans
            .expect_find_limits()
            .returning(|_| Box::pin(async { Ok(Some(json!({ "chat_daily": 10 }))) }));

        let mut usage = MockVipUsageRepository::new();
        usage
            .expect_usage_on_day()
            .returning(|_, _, _| Box::pin(async { Err(anyhow::anyhow!("usage table down")) }));

        let access = usecase(profiles, subscriptions, plans, usage)
            .check_feature_access(user_id, VipFeature::ChatDaily)
            .await;

        assert!(!access.allowed);
        assert_eq!(access.current_usage, 0);
    }

    #[tokio::test]
    async fn boolean_features_gate_directly() {
        let user_id = Uuid::new_v4();

        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find_role()
            .returning(|_| Box::pin(async { Ok(Some("user".to_string())) }));

        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_latest_entitling_app_subscription()
            .returning(|_| Box::pin(async { Ok(None) }));
        subscriptions
            .expect_latest_entitling_marketplace_subscription()
            .returning(|_| Box::pin(async { Ok(None) }));

        let access = usecase(
            profiles,
            subscriptions,
            MockPlanRepository::new(),
            MockVipUsageRepository::new(),
        )
        .check_feature_access(user_id, VipFeature::ChefAi)
        .await;

        assert!(!access.allowed);
        assert_eq!(access.limit, Some(0));
        assert_eq!(access.tier, FREE_TIER);
    }
}
