use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_TITLE_CHARS: usize = 120;
pub const MAX_EXERCISES_PER_WORKOUT: usize = 50;
pub const MAX_SETS_PER_EXERCISE: usize = 20;

/// Per-set intensity technique, tagged by `type` in the stored JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AdvancedConfig {
    DropSet {
        initial_reps: Option<i32>,
        mini_sets: Option<i32>,
        rest_time_sec: Option<i32>,
    },
    RestPause {
        total_reps: Option<i32>,
        rest_time_sec: Option<i32>,
    },
    ClusterSet {
        cluster_size: Option<i32>,
        intra_rest_sec: Option<i32>,
        total_reps: Option<i32>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SetDetailModel {
    pub set_number: i32,
    pub weight: Option<f64>,
    pub reps: Option<String>,
    pub rpe: Option<f64>,
    #[serde(default)]
    pub is_warmup: bool,
    #[serde(default)]
    pub advanced_config: Option<AdvancedConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExerciseModel {
    pub name: String,
    pub sets: Option<i32>,
    pub reps: Option<String>,
    pub method: Option<String>,
    pub cadence: Option<String>,
    pub rest_seconds: Option<i32>,
    pub notes: Option<String>,
    #[serde(default)]
    pub set_details: Vec<SetDetailModel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveWorkoutModel {
    pub name: String,
    #[serde(default)]
    pub is_template: bool,
    pub notes: Option<String>,
    #[serde(default)]
    pub exercises: Vec<ExerciseModel>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkoutModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub title_key: String,
    pub is_template: bool,
    pub notes: Option<String>,
    pub duration_seconds: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub exercises: Vec<ExerciseModel>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListWorkoutsFilter {
    pub templates_only: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn advanced_config_round_trips_the_type_tag() {
        let parsed: AdvancedConfig = serde_json::from_value(json!({
            "type": "cluster_set",
            "cluster_size": 3,
            "intra_rest_sec": 15,
            "total_reps": 12,
        }))
        .unwrap();

        assert_eq!(
            parsed,
            AdvancedConfig::ClusterSet {
                cluster_size: Some(3),
                intra_rest_sec: Some(15),
                total_reps: Some(12),
            }
        );
    }

    #[test]
    fn unknown_advanced_config_type_is_rejected() {
        let parsed = serde_json::from_value::<AdvancedConfig>(json!({ "type": "giant_set" }));
        assert!(parsed.is_err());
    }
}
