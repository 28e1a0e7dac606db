use std::sync::Arc;

use anyhow::{Result, anyhow};
use chrono::{Duration as ChronoDuration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::application::usercases::vip_entitlement::VipEntitlementUseCase;
use crate::domain::entities::workouts::{
    ExerciseSetEntity, InsertExerciseSetEntity, InsertWorkoutEntity, InsertWorkoutExerciseEntity,
    WorkoutEntity, WorkoutExerciseEntity,
};
use crate::domain::repositories::{
    plans::PlanRepository, profiles::ProfileRepository, subscriptions::SubscriptionRepository,
    vip_usage::VipUsageRepository, workouts::WorkoutRepository,
};
use crate::domain::value_objects::pacing::{self, ExercisePacing};
use crate::domain::value_objects::pagination::Pagination;
use crate::domain::value_objects::workout_title::{normalize_workout_title, workout_title_key};
use crate::domain::value_objects::workouts::{
    ExerciseModel, ListWorkoutsFilter, MAX_EXERCISES_PER_WORKOUT, MAX_SETS_PER_EXERCISE,
    MAX_TITLE_CHARS, SaveWorkoutModel, SetDetailModel, WorkoutModel,
};

pub struct WorkoutUseCase<W, P, S, L, U>
where
    W: WorkoutRepository + Send + Sync + 'static,
    P: ProfileRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    L: PlanRepository + Send + Sync + 'static,
    U: VipUsageRepository + Send + Sync + 'static,
{
    workout_repository: Arc<W>,
    vip_entitlement: Arc<VipEntitlementUseCase<P, S, L, U>>,
}

impl<W, P, S, L, U> WorkoutUseCase<W, P, S, L, U>
where
    W: WorkoutRepository + Send + Sync + 'static,
    P: ProfileRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    L: PlanRepository + Send + Sync + 'static,
    U: VipUsageRepository + Send + Sync + 'static,
{
    pub fn new(
        workout_repository: Arc<W>,
        vip_entitlement: Arc<VipEntitlementUseCase<P, S, L, U>>,
    ) -> Self {
        Self {
            workout_repository,
            vip_entitlement,
        }
    }

    pub async fn save_workout(&self, user_id: Uuid, model: SaveWorkoutModel) -> Result<Uuid> {
        let raw_name = model.name.trim();
        if raw_name.is_empty() {
            return Err(anyhow!("Workout name is required"));
        }
        if raw_name.chars().count() > MAX_TITLE_CHARS {
            return Err(anyhow!("Workout name is too long"));
        }
        if model.exercises.len() > MAX_EXERCISES_PER_WORKOUT {
            return Err(anyhow!("Too many exercises"));
        }
        if model
            .exercises
            .iter()
            .any(|e| e.set_details.len() > MAX_SETS_PER_EXERCISE)
        {
            return Err(anyhow!("Too many sets"));
        }

        let name = normalize_workout_title(raw_name);
        let title_key = workout_title_key(raw_name);
        let now = Utc::now();
        let workout_id = Uuid::new_v4();

        let workout = InsertWorkoutEntity {
            id: workout_id,
            user_id,
            name: name.clone(),
            title_key,
            is_template: model.is_template,
            notes: model.notes.clone(),
            created_at: now,
            updated_at: now,
        };

        let mut exercises = Vec::with_capacity(model.exercises.len());
        let mut sets = Vec::new();
        for (position, exercise) in model.exercises.iter().enumerate() {
            let exercise_id = Uuid::new_v4();
            exercises.push(InsertWorkoutExerciseEntity {
                id: exercise_id,
                workout_id,
                name: exercise.name.trim().to_string(),
                position: position as i32,
                sets: exercise.sets,
                reps: exercise.reps.clone(),
                method: exercise.method.clone(),
                cadence: exercise.cadence.clone(),
                rest_seconds: exercise.rest_seconds,
                notes: exercise.notes.clone(),
            });
            for detail in &exercise.set_details {
                sets.push(InsertExerciseSetEntity {
                    id: Uuid::new_v4(),
                    exercise_id,
                    set_number: detail.set_number,
                    weight: detail.weight,
                    reps: detail.reps.clone(),
                    rpe: detail.rpe,
                    is_warmup: detail.is_warmup,
                    advanced_config: detail
                        .advanced_config
                        .as_ref()
                        .map(serde_json::to_value)
                        .transpose()?,
                });
            }
        }

        let saved_id = self
            .workout_repository
            .save_workout(workout, exercises, sets)
            .await?;

        info!(%user_id, workout_id = %saved_id, name, "workouts: saved");
        Ok(saved_id)
    }

    pub async fn list_workouts(
        &self,
        user_id: Uuid,
        filter: ListWorkoutsFilter,
    ) -> Result<Vec<WorkoutModel>> {
        let pagination = Pagination::clamped(filter.limit, filter.offset);

        // Free-tier history is windowed; templates are always visible.
        let since = if filter.templates_only == Some(true) {
            None
        } else {
            let plan = self.vip_entitlement.resolve_plan_limits(user_id).await;
            plan.limits
                .history_days
                .map(|days| Utc::now() - ChronoDuration::days(i64::from(days)))
        };

        let workouts = self
            .workout_repository
            .list_workouts(user_id, filter.templates_only, since, pagination)
            .await?;

        let mut models = Vec::with_capacity(workouts.len());
        for workout in workouts {
            let exercises = self.load_exercises(&workout).await?;
            models.push(Self::to_model(workout, exercises));
        }
        Ok(models)
    }

    pub async fn finish_workout(&self, user_id: Uuid, workout_id: Uuid) -> Result<i64> {
        let workout = self
            .workout_repository
            .find_workout(workout_id)
            .await?
            .ok_or_else(|| anyhow!("Workout not found"))?;
        if workout.user_id != user_id {
            return Err(anyhow!("Forbidden"));
        }

        let exercises = self.workout_repository.list_exercises(workout_id).await?;
        let pacing: Vec<ExercisePacing> = exercises
            .iter()
            .map(|exercise| ExercisePacing {
                name: exercise.name.clone(),
                method: exercise.method.clone(),
                exercise_type: None,
                reps: exercise.reps.clone(),
                sets: exercise.sets,
                rest_seconds: exercise.rest_seconds,
                cadence: exercise.cadence.clone(),
            })
            .collect();

        let duration_seconds = pacing::estimate_workout_seconds(&pacing);
        self.workout_repository
            .set_duration(workout_id, duration_seconds.min(i64::from(i32::MAX)) as i32)
            .await?;

        info!(%user_id, %workout_id, duration_seconds, "workouts: finished");
        Ok(duration_seconds)
    }

    async fn load_exercises(&self, workout: &WorkoutEntity) -> Result<Vec<ExerciseModel>> {
        let exercises = self.workout_repository.list_exercises(workout.id).await?;
        let exercise_ids: Vec<Uuid> = exercises.iter().map(|e| e.id).collect();
        let mut sets = self.workout_repository.list_sets(exercise_ids).await?;
        sets.sort_by_key(|s| s.set_number);

        Ok(exercises
            .into_iter()
            .map(|exercise| {
                let details = sets
                    .iter()
                    .filter(|s| s.exercise_id == exercise.id)
                    .map(Self::to_set_detail)
                    .collect();
                Self::to_exercise_model(exercise, details)
            })
            .collect())
    }

    fn to_set_detail(set: &ExerciseSetEntity) -> SetDetailModel {
        let advanced_config = set.advanced_config.as_ref().and_then(|value| {
            serde_json::from_value(value.clone())
                .map_err(|err| {
                    debug!(set_id = %set.id, error = %err, "workouts: unreadable advanced_config");
                    err
                })
                .ok()
        });

        SetDetailModel {
            set_number: set.set_number,
            weight: set.weight,
            reps: set.reps.clone(),
            rpe: set.rpe,
            is_warmup: set.is_warmup,
            advanced_config,
        }
    }

    fn to_exercise_model(
        exercise: WorkoutExerciseEntity,
        set_details: Vec<SetDetailModel>,
    ) -> ExerciseModel {
        ExerciseModel {
            name: exercise.name,
            sets: exercise.sets,
            reps: exercise.reps,
            method: exercise.method,
            cadence: exercise.cadence,
            rest_seconds: exercise.rest_seconds,
            notes: exercise.notes,
            set_details,
        }
    }

    fn to_model(workout: WorkoutEntity, exercises: Vec<ExerciseModel>) -> WorkoutModel {
        WorkoutModel {
            id: workout.id,
            user_id: workout.user_id,
            name: workout.name,
            title_key: workout.title_key,
            is_template: workout.is_template,
            notes: workout.notes,
            duration_seconds: workout.duration_seconds,
            created_at: workout.created_at,
            exercises,
        }
    }
}
