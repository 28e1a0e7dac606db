//! Elapsed-time estimation for a workout from exercise metadata.

const DEFAULT_SECONDS_PER_REP: i64 = 4;
const DEFAULT_CARDIO_MINUTES: i64 = 5;
const DEFAULT_REST_SECONDS: i64 = 60;
const DEFAULT_REPS: i64 = 10;

const CARDIO_NAME_KEYWORDS: [&str; 6] = ["cardio", "run", "corrida", "bike", "cicl", "esteira"];

#[derive(Debug, Clone, Default)]
pub struct ExercisePacing {
    pub name: String,
    pub method: Option<String>,
    pub exercise_type: Option<String>,
    pub reps: Option<String>,
    pub sets: Option<i32>,
    pub rest_seconds: Option<i32>,
    pub cadence: Option<String>,
}

fn parse_leading_int(value: &str) -> Option<i64> {
    let digits: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

pub fn is_cardio_exercise(exercise: &ExercisePacing) -> bool {
    let method = exercise.method.as_deref().unwrap_or("").to_lowercase();
    let exercise_type = exercise.exercise_type.as_deref().unwrap_or("").to_lowercase();
    let name = exercise.name.to_lowercase();

    method == "cardio"
        || exercise_type == "cardio"
        || CARDIO_NAME_KEYWORDS.iter().any(|kw| name.contains(kw))
}

/// Each digit of the cadence string is a phase duration in seconds; the
/// seconds-per-rep is their sum ("2020" -> 4), defaulting when unparseable.
pub fn parse_cadence_seconds_per_rep(cadence: Option<&str>) -> i64 {
    let Some(cadence) = cadence else {
        return DEFAULT_SECONDS_PER_REP;
    };

    let sum: i64 = cadence
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(i64::from)
        .sum();

    if cadence.chars().any(|c| c.is_ascii_digit()) {
        sum
    } else {
        DEFAULT_SECONDS_PER_REP
    }
}

pub fn estimate_exercise_seconds(exercise: &ExercisePacing) -> i64 {
    if is_cardio_exercise(exercise) {
        // Cardio entries store minutes in the reps field.
        let minutes = exercise
            .reps
            .as_deref()
            .and_then(parse_leading_int)
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_CARDIO_MINUTES);
        return minutes * 60;
    }

    let reps = exercise
        .reps
        .as_deref()
        .and_then(parse_leading_int)
        .filter(|r| *r > 0)
        .unwrap_or(DEFAULT_REPS);
    let sets = i64::from(exercise.sets.unwrap_or(1)).max(1);
    let rest = exercise
        .rest_seconds
        .map(i64::from)
        .filter(|r| *r > 0)
        .unwrap_or(DEFAULT_REST_SECONDS);
    let per_rep = parse_cadence_seconds_per_rep(exercise.cadence.as_deref());

    (per_rep * reps + rest) * sets
}

pub fn estimate_workout_seconds(exercises: &[ExercisePacing]) -> i64 {
    exercises.iter().map(estimate_exercise_seconds).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strength(reps: &str, sets: i32, rest: i32, cadence: &str) -> ExercisePacing {
        ExercisePacing {
            name: "Supino reto".to_string(),
            reps: Some(reps.to_string()),
            sets: Some(sets),
            rest_seconds: Some(rest),
            cadence: Some(cadence.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn cardio_reps_are_minutes() {
        let exercise = ExercisePacing {
            name: "Corrida na esteira".to_string(),
            reps: Some("30".to_string()),
            ..Default::default()
        };

        assert!(is_cardio_exercise(&exercise));
        assert_eq!(estimate_exercise_seconds(&exercise), 1800);
    }

    #[test]
    fn cardio_without_reps_defaults_to_five_minutes() {
        let exercise = ExercisePacing {
            name: "Remada".to_string(),
            method: Some("cardio".to_string()),
            ..Default::default()
        };

        assert_eq!(estimate_exercise_seconds(&exercise), 300);
    }

    #[test]
    fn strength_uses_cadence_reps_rest_and_sets() {
        // ((2+0+2+0) * 10 + 60) * 3
        assert_eq!(estimate_exercise_seconds(&strength("10", 3, 60, "2020")), 300);
    }

    #[test]
    fn rep_ranges_take_the_leading_number() {
        assert_eq!(estimate_exercise_seconds(&strength("8-12", 1, 60, "2020")), 92);
    }

    #[test]
    fn unparseable_cadence_defaults_to_four_seconds_per_rep() {
        assert_eq!(parse_cadence_seconds_per_rep(Some("lento")), 4);
        assert_eq!(parse_cadence_seconds_per_rep(None), 4);
        assert_eq!(parse_cadence_seconds_per_rep(Some("2020")), 4);
        assert_eq!(parse_cadence_seconds_per_rep(Some("31x1")), 5);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let exercise = ExercisePacing {
            name: "Agachamento".to_string(),
            ..Default::default()
        };

        // (4 * 10 + 60) * 1
        assert_eq!(estimate_exercise_seconds(&exercise), 100);
    }

    #[test]
    fn workout_estimate_sums_exercises() {
        let exercises = vec![strength("10", 3, 60, "2020"), strength("10", 2, 30, "11")];
        assert_eq!(estimate_workout_seconds(&exercises), 300 + 100);
    }
}
