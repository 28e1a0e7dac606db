use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    application::usercases::{vip_entitlement::VipEntitlementUseCase, workouts::WorkoutUseCase},
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::{
            plans::PlanRepository, profiles::ProfileRepository,
            subscriptions::SubscriptionRepository, vip_usage::VipUsageRepository,
            workouts::WorkoutRepository,
        },
        value_objects::workouts::{
            ListWorkoutsFilter, MAX_EXERCISES_PER_WORKOUT, MAX_SETS_PER_EXERCISE, MAX_TITLE_CHARS,
            SaveWorkoutModel,
        },
    },
    infrastructure::{
        axum_http::{
            auth::AuthUser,
            error_responses::{AppError, ValidationIssue, from_usecase_error},
        },
        postgres::{
            postgres_connection::PgPoolSquad,
            repositories::{
                plans::PlanPostgres, profiles::ProfilePostgres,
                subscriptions::SubscriptionPostgres, vip_usage::VipUsagePostgres,
                workouts::WorkoutPostgres,
            },
        },
    },
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let workout_repository = WorkoutPostgres::new(Arc::clone(&db_pool));
    let vip_entitlement_usecase = VipEntitlementUseCase::new(
        Arc::new(ProfilePostgres::new(Arc::clone(&db_pool))),
        Arc::new(SubscriptionPostgres::new(Arc::clone(&db_pool))),
        Arc::new(PlanPostgres::new(Arc::clone(&db_pool))),
        Arc::new(VipUsagePostgres::new(Arc::clone(&db_pool))),
        Duration::from_secs(config.vip.entitlement_cache_seconds),
    );
    let workout_usecase = WorkoutUseCase::new(
        Arc::new(workout_repository),
        Arc::new(vip_entitlement_usecase),
    );

    Router::new()
        .route("/", post(save))
        .route("/", get(list))
        .route("/:id/finish", post(finish))
        .with_state(Arc::new(workout_usecase))
}

fn validate_save(model: &SaveWorkoutModel) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let name = model.name.trim();
    if name.is_empty() {
        issues.push(ValidationIssue::new("name", "Workout name is required"));
    } else if name.chars().count() > MAX_TITLE_CHARS {
        issues.push(ValidationIssue::new("name", "Workout name is too long"));
    }
    if model.exercises.len() > MAX_EXERCISES_PER_WORKOUT {
        issues.push(ValidationIssue::new("exercises", "Too many exercises"));
    }
    for (index, exercise) in model.exercises.iter().enumerate() {
        if exercise.name.trim().is_empty() {
            issues.push(ValidationIssue::new(
                &format!("exercises[{}].name", index),
                "Exercise name is required",
            ));
        }
        if exercise.set_details.len() > MAX_SETS_PER_EXERCISE {
            issues.push(ValidationIssue::new(
                &format!("exercises[{}].set_details", index),
                "Too many sets",
            ));
        }
    }

    issues
}

pub async fn save<W, P, S, L, U>(
    State(workout_usecase): State<Arc<WorkoutUseCase<W, P, S, L, U>>>,
    auth: AuthUser,
    Json(save_workout_model): Json<SaveWorkoutModel>,
) -> Result<impl IntoResponse, AppError>
where
    W: WorkoutRepository + Send + Sync + 'static,
    P: ProfileRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    L: PlanRepository + Send + Sync + 'static,
    U: VipUsageRepository + Send + Sync + 'static,
{
    let issues = validate_save(&save_workout_model);
    if !issues.is_empty() {
        return Err(AppError::Validation(issues));
    }

    let workout_id = workout_usecase
        .save_workout(auth.user_id, save_workout_model)
        .await
        .map_err(from_usecase_error)?;

    Ok(Json(json!({ "ok": true, "workout_id": workout_id })))
}

pub async fn list<W, P, S, L, U>(
    State(workout_usecase): State<Arc<WorkoutUseCase<W, P, S, L, U>>>,
    auth: AuthUser,
    Query(filter): Query<ListWorkoutsFilter>,
) -> Result<impl IntoResponse, AppError>
where
    W: WorkoutRepository + Send + Sync + 'static,
    P: ProfileRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    L: PlanRepository + Send + Sync + 'static,
    U: VipUsageRepository + Send + Sync + 'static,
{
    let workouts = workout_usecase
        .list_workouts(auth.user_id, filter)
        .await
        .map_err(from_usecase_error)?;

    Ok(Json(json!({ "ok": true, "workouts": workouts })))
}

pub async fn finish<W, P, S, L, U>(
    State(workout_usecase): State<Arc<WorkoutUseCase<W, P, S, L, U>>>,
    auth: AuthUser,
    Path(workout_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError>
where
    W: WorkoutRepository + Send + Sync + 'static,
    P: ProfileRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    L: PlanRepository + Send + Sync + 'static,
    U: VipUsageRepository + Send + Sync + 'static,
{
    let duration_seconds = workout_usecase
        .finish_workout(auth.user_id, workout_id)
        .await
        .map_err(from_usecase_error)?;

    Ok(Json(json!({ "ok": true, "duration_seconds": duration_seconds })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::workouts::ExerciseModel;

    #[test]
    fn validation_collects_every_issue() {
        let model = SaveWorkoutModel {
            name: "  ".to_string(),
            is_template: false,
            notes: None,
            exercises: vec![ExerciseModel {
                name: "".to_string(),
                sets: None,
                reps: None,
                method: None,
                cadence: None,
                rest_seconds: None,
                notes: None,
                set_details: vec![],
            }],
        };

        let issues = validate_save(&model);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].field, "name");
        assert_eq!(issues[1].field, "exercises[0].name");
    }

    #[test]
    fn valid_payload_has_no_issues() {
        let model = SaveWorkoutModel {
            name: "Treino A - Peito".to_string(),
            is_template: false,
            notes: None,
            exercises: vec![],
        };
        assert!(validate_save(&model).is_empty());
    }
}
