use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::workouts::{
    ExerciseSetEntity, InsertExerciseSetEntity, InsertWorkoutEntity, InsertWorkoutExerciseEntity,
    WorkoutEntity, WorkoutExerciseEntity,
};
use crate::domain::value_objects::pagination::Pagination;

#[async_trait]
#[automock]
pub trait WorkoutRepository {
    /// Inserts the workout with its exercises and sets in one transaction.
    async fn save_workout(
        &self,
        workout: InsertWorkoutEntity,
        exercises: Vec<InsertWorkoutExerciseEntity>,
        sets: Vec<InsertExerciseSetEntity>,
    ) -> Result<Uuid>;

    async fn find_workout(&self, workout_id: Uuid) -> Result<Option<WorkoutEntity>>;

    async fn list_workouts(
        &self,
        user_id: Uuid,
        templates_only: Option<bool>,
        since: Option<DateTime<Utc>>,
        pagination: Pagination,
    ) -> Result<Vec<WorkoutEntity>>;

    async fn list_exercises(&self, workout_id: Uuid) -> Result<Vec<WorkoutExerciseEntity>>;

    async fn list_sets(&self, exercise_ids: Vec<Uuid>) -> Result<Vec<ExerciseSetEntity>>;

    async fn set_duration(&self, workout_id: Uuid, duration_seconds: i32) -> Result<()>;
}
