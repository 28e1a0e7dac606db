use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{Connection, RunQueryDsl, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain::{
        entities::workouts::{
            ExerciseSetEntity, InsertExerciseSetEntity, InsertWorkoutEntity,
            InsertWorkoutExerciseEntity, WorkoutEntity, WorkoutExerciseEntity,
        },
        repositories::workouts::WorkoutRepository,
        value_objects::pagination::Pagination,
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{exercise_sets, workout_exercises, workouts},
    },
};

pub struct WorkoutPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl WorkoutPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl WorkoutRepository for WorkoutPostgres {
    async fn save_workout(
        &self,
        workout: InsertWorkoutEntity,
        exercises: Vec<InsertWorkoutExerciseEntity>,
        sets: Vec<InsertExerciseSetEntity>,
    ) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let workout_id = conn.transaction::<Uuid, diesel::result::Error, _>(|conn| {
            let workout_id = insert_into(workouts::table)
                .values(&workout)
                .returning(workouts::id)
                .get_result::<Uuid>(conn)?;

            if !exercises.is_empty() {
                insert_into(workout_exercises::table)
                    .values(&exercises)
                    .execute(conn)?;
            }
            if !sets.is_empty() {
                insert_into(exercise_sets::table)
                    .values(&sets)
                    .execute(conn)?;
            }

            Ok(workout_id)
        })?;

        Ok(workout_id)
    }

    async fn find_workout(&self, workout_id: Uuid) -> Result<Option<WorkoutEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = workouts::table
            .find(workout_id)
            .select(WorkoutEntity::as_select())
            .first::<WorkoutEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_workouts(
        &self,
        user_id: Uuid,
        templates_only: Option<bool>,
        since: Option<DateTime<Utc>>,
        pagination: Pagination,
    ) -> Result<Vec<WorkoutEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = workouts::table
            .filter(workouts::user_id.eq(user_id))
            .into_boxed();

        if let Some(templates_only) = templates_only {
            query = query.filter(workouts::is_template.eq(templates_only));
        }
        if let Some(since) = since {
            query = query.filter(workouts::created_at.ge(since));
        }

        let results = query
            .order(workouts::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(WorkoutEntity::as_select())
            .load::<WorkoutEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_exercises(&self, workout_id: Uuid) -> Result<Vec<WorkoutExerciseEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = workout_exercises::table
            .filter(workout_exercises::workout_id.eq(workout_id))
            .order(workout_exercises::position.asc())
            .select(WorkoutExerciseEntity::as_select())
            .load::<WorkoutExerciseEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_sets(&self, exercise_ids: Vec<Uuid>) -> Result<Vec<ExerciseSetEntity>> {
        if exercise_ids.is_empty() {
            return Ok(vec![]);
        }
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = exercise_sets::table
            .filter(exercise_sets::exercise_id.eq_any(exercise_ids))
            .order(exercise_sets::set_number.asc())
            .select(ExerciseSetEntity::as_select())
            .load::<ExerciseSetEntity>(&mut conn)?;

        Ok(results)
    }

    async fn set_duration(&self, workout_id: Uuid, duration_seconds: i32) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(workouts::table)
            .filter(workouts::id.eq(workout_id))
            .set((
                workouts::duration_seconds.eq(Some(duration_seconds)),
                workouts::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }
}
