use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::{exercise_sets, workout_exercises, workouts};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = workouts)]
pub struct WorkoutEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub title_key: String,
    pub is_template: bool,
    pub notes: Option<String>,
    pub duration_seconds: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = workouts)]
pub struct InsertWorkoutEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub title_key: String,
    pub is_template: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = workout_exercises)]
pub struct WorkoutExerciseEntity {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub name: String,
    pub position: i32,
    pub sets: Option<i32>,
    pub reps: Option<String>,
    pub method: Option<String>,
    pub cadence: Option<String>,
    pub rest_seconds: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = workout_exercises)]
pub struct InsertWorkoutExerciseEntity {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub name: String,
    pub position: i32,
    pub sets: Option<i32>,
    pub reps: Option<String>,
    pub method: Option<String>,
    pub cadence: Option<String>,
    pub rest_seconds: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = exercise_sets)]
pub struct ExerciseSetEntity {
    pub id: Uuid,
    pub exercise_id: Uuid,
    pub set_number: i32,
    pub weight: Option<f64>,
    pub reps: Option<String>,
    pub rpe: Option<f64>,
    pub is_warmup: bool,
    pub advanced_config: Option<Value>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = exercise_sets)]
pub struct InsertExerciseSetEntity {
    pub id: Uuid,
    pub exercise_id: Uuid,
    pub set_number: i32,
    pub weight: Option<f64>,
    pub reps: Option<String>,
    pub rpe: Option<f64>,
    pub is_warmup: bool,
    pub advanced_config: Option<Value>,
}
