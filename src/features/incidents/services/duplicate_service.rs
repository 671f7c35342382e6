use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;

use crate::core::error::{AppError, Result};

/// Half-width of the duplicate bounding box, in degrees (~100m near the equator)
pub const GEO_WINDOW_DEGREES: f64 = 0.001;

/// Half-width of the duplicate time window, in minutes
pub const TIME_WINDOW_MINUTES: i64 = 30;

/// Detects likely-repeat reports from the same reporter before a new incident
/// is persisted.
///
/// The read-then-decide check here is inherently racy under concurrent
/// submissions; the `(photo_hash, reported_by)` unique constraint in the store
/// is the authoritative backstop. This service exists to turn the common case
/// (client retry, double tap) into a clear 409 naming the earlier incident.
pub struct DuplicateService {
    pool: PgPool,
}

/// Inclusive latitude/longitude bounds of the duplicate bounding box
pub fn geo_bounds(value: f64) -> (f64, f64) {
    (value - GEO_WINDOW_DEGREES, value + GEO_WINDOW_DEGREES)
}

/// Inclusive bounds of the duplicate time window centered on `ts`
pub fn time_bounds(ts: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let window = Duration::minutes(TIME_WINDOW_MINUTES);
    (ts - window, ts + window)
}

impl DuplicateService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs both duplicate checks for a new report. Fails with
    /// [`AppError::Conflict`] naming the pre-existing incident when either
    /// check matches; a report with neither photo nor coordinates passes
    /// through untouched.
    pub async fn check_new_report(
        &self,
        reporter_id: i64,
        photo_hash: Option<&str>,
        coordinates: Option<(f64, f64)>,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        if let Some(hash) = photo_hash {
            if let Some(existing) = self.find_by_photo(reporter_id, hash).await? {
                return Err(AppError::Conflict(format!(
                    "Duplicate photo: already reported as incident {}",
                    existing
                )));
            }
        }

        if let Some((lat, lon)) = coordinates {
            if let Some(existing) = self
                .find_nearby_recent(reporter_id, lat, lon, timestamp)
                .await?
            {
                return Err(AppError::Conflict(format!(
                    "Likely duplicate of nearby incident {} reported within the last {} minutes",
                    existing, TIME_WINDOW_MINUTES
                )));
            }
        }

        Ok(())
    }

    /// Photo-identity check: same fingerprint from the same reporter
    async fn find_by_photo(&self, reporter_id: i64, photo_hash: &str) -> Result<Option<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT incident_id
            FROM incidents
            WHERE photo_hash = $1 AND reported_by = $2
            LIMIT 1
            "#,
        )
        .bind(photo_hash)
        .bind(reporter_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to run photo duplicate check: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Spatio-temporal check: same reporter inside the bounding box and time
    /// window. The `(reported_by, timestamp)` index narrows this to the
    /// reporter's recent rows before the coordinate comparison runs.
    async fn find_nearby_recent(
        &self,
        reporter_id: i64,
        lat: f64,
        lon: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<Option<String>> {
        let (lat_min, lat_max) = geo_bounds(lat);
        let (lon_min, lon_max) = geo_bounds(lon);
        let (ts_min, ts_max) = time_bounds(timestamp);

        sqlx::query_scalar::<_, String>(
            r#"
            SELECT incident_id
            FROM incidents
            WHERE reported_by = $1
              AND timestamp BETWEEN $2 AND $3
              AND geo_latitude BETWEEN $4 AND $5
              AND geo_longitude BETWEEN $6 AND $7
            LIMIT 1
            "#,
        )
        .bind(reporter_id)
        .bind(ts_min)
        .bind(ts_max)
        .bind(lat_min)
        .bind(lat_max)
        .bind(lon_min)
        .bind(lon_max)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to run spatio-temporal duplicate check: {:?}", e);
            AppError::Database(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn geo_bounds_are_symmetric_around_value() {
        let (min, max) = geo_bounds(34.0);
        assert!((min - 33.999).abs() < 1e-9);
        assert!((max - 34.001).abs() < 1e-9);

        // A report 0.0005 degrees away lands inside the box
        let probe = 34.0005;
        assert!(probe >= min && probe <= max);

        // A report 0.01 degrees away lands outside
        let far = 34.01;
        assert!(far > max);
    }

    #[test]
    fn time_bounds_span_thirty_minutes_each_way() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let (min, max) = time_bounds(t);

        assert_eq!(min, Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap());
        assert_eq!(max, Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap());

        // T+10min is inside the window, T+40min is not
        let near = t + Duration::minutes(10);
        assert!(near >= min && near <= max);
        let late = t + Duration::minutes(40);
        assert!(late > max);
    }
}
