use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::incidents::models::IncidentSeverity;
use crate::features::rewards::models::Reward;

/// Points added when the report carried a photo
const PHOTO_BONUS: i32 = 3;

/// Points added when the report carried a location
const LOCATION_BONUS: i32 = 2;

/// Outcome of a reward accrual attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardOutcome {
    pub points_awarded: i32,
    pub total_points: i64,
}

/// Base points per severity. Exhaustive: a new severity variant must pick its
/// base value here before the crate compiles again.
pub fn base_points(severity: IncidentSeverity) -> i32 {
    match severity {
        IncidentSeverity::Low => 5,
        IncidentSeverity::Medium => 8,
        IncidentSeverity::High => 12,
        IncidentSeverity::Critical => 15,
    }
}

/// Full point formula for one incident report
pub fn points_for(severity: IncidentSeverity, has_photo: bool, has_location: bool) -> i32 {
    base_points(severity)
        + if has_photo { PHOTO_BONUS } else { 0 }
        + if has_location { LOCATION_BONUS } else { 0 }
}

/// Point bookkeeping for incident reporters. Invoked by incident creation but
/// never in control of it; all failures here are the caller's to downgrade.
pub struct RewardService {
    pool: PgPool,
}

impl RewardService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Award points for a successfully created incident.
    ///
    /// Idempotent per incident: the UNIQUE constraint on `incident_id` makes
    /// the insert a no-op on a repeat call (or a lost race), in which case
    /// `points_awarded` is 0 and the stored total is unchanged.
    pub async fn award_for_incident(
        &self,
        user_id: i64,
        incident_id: &str,
        severity: IncidentSeverity,
        has_photo: bool,
        has_location: bool,
    ) -> Result<RewardOutcome> {
        let points = points_for(severity, has_photo, has_location);
        let reason = format!("Incident report {} ({})", incident_id, severity);

        let result = sqlx::query(
            r#"
            INSERT INTO rewards (user_id, incident_id, points, reason)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (incident_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(incident_id)
        .bind(points)
        .bind(&reason)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert reward: {:?}", e);
            AppError::Database(e)
        })?;

        let points_awarded = if result.rows_affected() > 0 {
            tracing::info!(
                "Awarded {} points to user {} for incident {}",
                points,
                user_id,
                incident_id
            );
            points
        } else {
            tracing::debug!(
                "Reward for incident {} already exists, skipping",
                incident_id
            );
            0
        };

        let total_points = self.total_points(user_id).await?;

        Ok(RewardOutcome {
            points_awarded,
            total_points,
        })
    }

    /// Sum of all reward rows for the user, recomputed on every call
    pub async fn total_points(&self, user_id: i64) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(points), 0) FROM rewards WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to compute total points: {:?}", e);
            AppError::Database(e)
        })
    }

    /// List reward rows for the user, newest first
    pub async fn list_by_user(&self, user_id: i64, limit: i64) -> Result<Vec<Reward>> {
        sqlx::query_as::<_, Reward>(
            r#"
            SELECT id, user_id, incident_id, points, reason, created_at
            FROM rewards
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list rewards: {:?}", e);
            AppError::Database(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use IncidentSeverity::*;

    #[test]
    fn base_points_per_severity() {
        assert_eq!(base_points(Low), 5);
        assert_eq!(base_points(Medium), 8);
        assert_eq!(base_points(High), 12);
        assert_eq!(base_points(Critical), 15);
    }

    #[test]
    fn bonuses_stack_on_base() {
        // High severity with photo and location: 12 + 3 + 2
        assert_eq!(points_for(High, true, true), 17);

        assert_eq!(points_for(Low, false, false), 5);
        assert_eq!(points_for(Low, true, false), 8);
        assert_eq!(points_for(Low, false, true), 7);
        assert_eq!(points_for(Critical, true, true), 20);
    }
}
