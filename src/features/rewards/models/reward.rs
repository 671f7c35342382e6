use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for one point-grant record. Created exactly once per
/// incident and never mutated.
#[derive(Debug, Clone, FromRow)]
pub struct Reward {
    pub id: i64,
    pub user_id: i64,
    pub incident_id: String,
    pub points: i32,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}
