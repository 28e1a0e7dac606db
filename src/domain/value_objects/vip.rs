use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const FREE_TIER: &str = "free";
pub const STAFF_TIER: &str = "admin";

/// Per-feature limits carried by a plan. `history_days == None` means
/// unlimited history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VipTierLimits {
    pub chat_daily: i32,
    pub wizard_weekly: i32,
    pub insights_weekly: i32,
    pub history_days: Option<i32>,
    pub nutrition_macros: bool,
    pub offline: bool,
    pub chef_ai: bool,
}

impl VipTierLimits {
    pub fn free() -> Self {
        Self {
            chat_daily: 0,
            wizard_weekly: 0,
            insights_weekly: 1,
            history_days: Some(30),
            nutrition_macros: false,
            offline: false,
            chef_ai: false,
        }
    }

    /// Staff accounts get everything, effectively unbounded.
    pub fn unlimited() -> Self {
        Self {
            chat_daily: 9999,
            wizard_weekly: 9999,
            insights_weekly: 9999,
            history_days: None,
            nutrition_macros: true,
            offline: true,
            chef_ai: true,
        }
    }

    /// Merges plan-stored JSON limits over the free defaults so plans only
    /// need to declare the keys they change.
    pub fn from_plan_json(limits: &Value) -> Self {
        let base = Self::free();
        let Some(map) = limits.as_object() else {
            return base;
        };

        let int = |key: &str, fallback: i32| {
            map.get(key)
                .and_then(Value::as_i64)
                .map(|v| v as i32)
                .unwrap_or(fallback)
        };
        let flag = |key: &str, fallback: bool| {
            map.get(key).and_then(Value::as_bool).unwrap_or(fallback)
        };

        let history_days = match map.get("history_days") {
            Some(Value::Null) => None,
            Some(value) => value.as_i64().map(|v| v as i32).or(base.history_days),
            None => base.history_days,
        };

        Self {
            chat_daily: int("chat_daily", base.chat_daily),
            wizard_weekly: int("wizard_weekly", base.wizard_weekly),
            insights_weekly: int("insights_weekly", base.insights_weekly),
            history_days,
            nutrition_macros: flag("nutrition_macros", base.nutrition_macros),
            offline: flag("offline", base.offline),
            chef_ai: flag("chef_ai", base.chef_ai),
        }
    }
}

/// Provenance of a resolved entitlement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum VipEntitlementSource {
    Role,
    AppSubscription,
    MarketplaceSubscription,
    FreeNoSubscription,
    AppSubscriptionMissingPlan,
    MarketplaceSubscriptionMissingPlan,
}

impl Display for VipEntitlementSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match self {
            VipEntitlementSource::Role => "role",
            VipEntitlementSource::AppSubscription => "app_subscription",
            VipEntitlementSource::MarketplaceSubscription => "marketplace_subscription",
            VipEntitlementSource::FreeNoSubscription => "free_no_subscription",
            VipEntitlementSource::AppSubscriptionMissingPlan => "app_subscription_missing_plan",
            VipEntitlementSource::MarketplaceSubscriptionMissingPlan => {
                "marketplace_subscription_missing_plan"
            }
        };
        write!(f, "{}", source)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VipPlanResult {
    pub tier: String,
    pub limits: VipTierLimits,
    pub source: VipEntitlementSource,
}

impl VipPlanResult {
    pub fn free(source: VipEntitlementSource) -> Self {
        Self {
            tier: FREE_TIER.to_string(),
            limits: VipTierLimits::free(),
            source,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum VipFeature {
    ChatDaily,
    WizardWeekly,
    InsightsWeekly,
    HistoryDays,
    NutritionMacros,
    Offline,
    ChefAi,
}

impl VipFeature {
    pub fn from_key(value: &str) -> Option<Self> {
        match value {
            "chat_daily" => Some(VipFeature::ChatDaily),
            "wizard_weekly" => Some(VipFeature::WizardWeekly),
            "insights_weekly" => Some(VipFeature::InsightsWeekly),
            "history_days" => Some(VipFeature::HistoryDays),
            "nutrition_macros" => Some(VipFeature::NutritionMacros),
            "offline" => Some(VipFeature::Offline),
            "chef_ai" => Some(VipFeature::ChefAi),
            _ => None,
        }
    }

    /// Key used in `vip_usage_daily.feature_key` for counted features.
    pub fn usage_key(&self) -> Option<&'static str> {
        match self {
            VipFeature::ChatDaily => Some("chat"),
            VipFeature::WizardWeekly => Some("wizard"),
            VipFeature::InsightsWeekly => Some("insights"),
            _ => None,
        }
    }
}

pub const GRANTABLE_PLANS: [&str; 3] = ["vip_start", "vip_pro", "vip_elite"];
pub const MAX_GRANT_DAYS: i64 = 365;
pub const MAX_GRANTS_PER_REQUEST: usize = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct GrantTrialModel {
    pub user_id: Option<Uuid>,
    pub email: Option<String>,
    pub plan_id: String,
    pub days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GrantTrialBatchModel {
    pub grants: Vec<GrantTrialModel>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GrantResultModel {
    pub ok: bool,
    pub user_id: Option<Uuid>,
    pub email: Option<String>,
    pub plan_id: String,
    pub days: i64,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GrantSummaryModel {
    pub created: usize,
    pub updated: usize,
    pub results: Vec<GrantResultModel>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeatureAccess {
    pub allowed: bool,
    pub current_usage: i64,
    pub limit: Option<i64>,
    pub tier: String,
}
