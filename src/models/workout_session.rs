use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

use super::validation::{PayloadReader, Rule, ValidationErrors};

pub const SESSION_TIME_MAX_LEN: usize = 50;
pub const ACTIVITY_MAX_LEN: usize = 255;

const NEW_SESSION_FIELDS: &[&str] = &[
    "member_id",
    "session_date",
    "session_time",
    "activity",
    "duration_minutes",
    "calories_burned",
];

const SESSION_CHANGE_FIELDS: &[&str] = &[
    "session_date",
    "session_time",
    "activity",
    "duration_minutes",
    "calories_burned",
];

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct WorkoutSession {
    pub session_id: i32,
    pub member_id: Option<i32>,
    pub session_date: Option<NaiveDate>,
    pub session_time: Option<String>,
    pub activity: Option<String>,
    pub duration_minutes: Option<i32>,
    pub calories_burned: Option<i32>,
}

/// A session as listed under its member; the owner is implied by the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutSessionSummary {
    pub session_id: i32,
    pub session_date: Option<NaiveDate>,
    pub session_time: Option<String>,
    pub activity: Option<String>,
    pub duration_minutes: Option<i32>,
    pub calories_burned: Option<i32>,
}

impl From<WorkoutSession> for WorkoutSessionSummary {
    fn from(session: WorkoutSession) -> Self {
        Self {
            session_id: session.session_id,
            session_date: session.session_date,
            session_time: session.session_time,
            activity: session.activity,
            duration_minutes: session.duration_minutes,
            calories_burned: session.calories_burned,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkoutSession {
    pub member_id: i32,
    pub session_date: NaiveDate,
    pub session_time: Option<String>,
    pub activity: Option<String>,
    pub duration_minutes: Option<i32>,
    pub calories_burned: Option<i32>,
}

impl NewWorkoutSession {
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = PayloadReader::new(body, NEW_SESSION_FIELDS)?;

        let member_id = reader.integer("member_id", Rule::Required);
        let session_date = reader.date("session_date", Rule::Required);
        let session_time = reader.string("session_time", Rule::Optional, SESSION_TIME_MAX_LEN);
        let activity = reader.string("activity", Rule::Optional, ACTIVITY_MAX_LEN);
        let duration_minutes = reader.integer("duration_minutes", Rule::Optional);
        let calories_burned = reader.integer("calories_burned", Rule::Optional);

        if member_id.is_some_and(|id| id < 1) {
            reader.reject("member_id", "Must be greater than or equal to 1.");
        }
        check_non_negative(&mut reader, "duration_minutes", duration_minutes);
        check_non_negative(&mut reader, "calories_burned", calories_burned);

        reader.finish()?;

        match (member_id, session_date) {
            (Some(member_id), Some(session_date)) => Ok(Self {
                member_id,
                session_date,
                session_time,
                activity,
                duration_minutes,
                calories_burned,
            }),
            _ => Err(ValidationErrors::schema("Invalid workout session payload.")),
        }
    }

    pub fn into_session(self, session_id: i32) -> WorkoutSession {
        WorkoutSession {
            session_id,
            member_id: Some(self.member_id),
            session_date: Some(self.session_date),
            session_time: self.session_time,
            activity: self.activity,
            duration_minutes: self.duration_minutes,
            calories_burned: self.calories_burned,
        }
    }
}

/// Partial update of a session. Omitted fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutSessionChanges {
    pub session_date: Option<NaiveDate>,
    pub session_time: Option<String>,
    pub activity: Option<String>,
    pub duration_minutes: Option<i32>,
    pub calories_burned: Option<i32>,
}

impl WorkoutSessionChanges {
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = PayloadReader::new(body, SESSION_CHANGE_FIELDS)?;

        let changes = Self {
            session_date: reader.date("session_date", Rule::Patch),
            session_time: reader.string("session_time", Rule::Patch, SESSION_TIME_MAX_LEN),
            activity: reader.string("activity", Rule::Patch, ACTIVITY_MAX_LEN),
            duration_minutes: reader.integer("duration_minutes", Rule::Patch),
            calories_burned: reader.integer("calories_burned", Rule::Patch),
        };

        check_non_negative(&mut reader, "duration_minutes", changes.duration_minutes);
        check_non_negative(&mut reader, "calories_burned", changes.calories_burned);

        reader.finish()?;
        Ok(changes)
    }

    /// Overlays the supplied fields onto `stored`.
    pub fn apply_to(self, stored: &WorkoutSession) -> WorkoutSession {
        WorkoutSession {
            session_id: stored.session_id,
            member_id: stored.member_id,
            session_date: self.session_date.or(stored.session_date),
            session_time: self.session_time.or_else(|| stored.session_time.clone()),
            activity: self.activity.or_else(|| stored.activity.clone()),
            duration_minutes: self.duration_minutes.or(stored.duration_minutes),
            calories_burned: self.calories_burned.or(stored.calories_burned),
        }
    }
}

fn check_non_negative(reader: &mut PayloadReader<'_>, field: &'static str, value: Option<i32>) {
    if value.is_some_and(|v| v < 0) {
        reader.reject(field, "Must be greater than or equal to 0.");
    }
}
