use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::incidents::dtos::{
    is_photo_mime_type_allowed, CreateIncidentDto, PhotoUpload, UpdateIncidentStatusDto,
    ALLOWED_PHOTO_MIME_TYPES, MAX_PHOTO_SIZE,
};
use crate::features::incidents::models::{Incident, IncidentStatus, NewIncident};
use crate::features::incidents::services::duplicate_service::DuplicateService;
use crate::features::incidents::services::transition;
use crate::features::rewards::RewardService;
use crate::shared::fingerprint::fingerprint;

const INCIDENT_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const INCIDENT_ID_SUFFIX_LEN: usize = 6;

const INCIDENT_COLUMNS: &str = r#"
    id, incident_id, photo, photo_hash, description,
    incident_type, severity, timestamp, reported_by, status,
    geo_latitude, geo_longitude, manual_address,
    resolved_at, resolved_by, resolution_notes, metadata,
    created_at, updated_at
"#;

/// Orchestrates incident creation and status mutation: validation, duplicate
/// suppression, persistence, resolution stamping, and best-effort reward
/// bookkeeping.
pub struct IncidentService {
    pool: PgPool,
    duplicate_service: Arc<DuplicateService>,
    reward_service: Arc<RewardService>,
}

/// Generate an external reference: INC-<YYYYMMDD>-<6 random alphanumerics>.
///
/// No collision-retry loop; the UNIQUE constraint on `incident_id` turns the
/// astronomically rare same-day collision into a rejected insert.
pub fn generate_incident_id() -> String {
    let date = Utc::now().format("%Y%m%d");
    let entropy = uuid::Uuid::new_v4();
    let suffix: String = entropy.as_bytes()[..INCIDENT_ID_SUFFIX_LEN]
        .iter()
        .map(|b| INCIDENT_ID_ALPHABET[(*b as usize) % INCIDENT_ID_ALPHABET.len()] as char)
        .collect();
    format!("INC-{}-{}", date, suffix)
}

impl IncidentService {
    pub fn new(
        pool: PgPool,
        duplicate_service: Arc<DuplicateService>,
        reward_service: Arc<RewardService>,
    ) -> Self {
        Self {
            pool,
            duplicate_service,
            reward_service,
        }
    }

    /// Create a new incident report.
    ///
    /// Every failure path aborts before persistence except the reward step,
    /// which is explicitly decoupled: the incident is the durable source of
    /// truth, points are best-effort bookkeeping.
    pub async fn create(
        &self,
        dto: CreateIncidentDto,
        photo: Option<PhotoUpload>,
        reporter_id: i64,
    ) -> Result<Incident> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if let Some(ref photo) = photo {
            if !is_photo_mime_type_allowed(&photo.content_type) {
                return Err(AppError::Validation(format!(
                    "Photo type '{}' is not allowed. Allowed types: {}",
                    photo.content_type,
                    ALLOWED_PHOTO_MIME_TYPES.join(", ")
                )));
            }
            if photo.data.len() > MAX_PHOTO_SIZE {
                return Err(AppError::Validation(format!(
                    "Photo too large. Maximum size is {} bytes ({} MB)",
                    MAX_PHOTO_SIZE,
                    MAX_PHOTO_SIZE / 1024 / 1024
                )));
            }
        }

        if !dto.has_location() {
            return Err(AppError::Validation(
                "Location is required: supply geo coordinates or a manual address".to_string(),
            ));
        }

        let photo_hash = photo.as_ref().map(|p| fingerprint(&p.data));
        let incident_id = generate_incident_id();

        self.duplicate_service
            .check_new_report(
                reporter_id,
                photo_hash.as_deref(),
                dto.coordinates(),
                Utc::now(),
            )
            .await?;

        let new_incident = NewIncident {
            incident_id,
            photo: photo.map(|p| p.data),
            photo_hash,
            description: dto.description,
            incident_type: dto.incident_type,
            severity: dto.severity,
            reported_by: reporter_id,
            geo_latitude: dto.geo_latitude,
            geo_longitude: dto.geo_longitude,
            manual_address: dto.manual_address,
            metadata: dto.metadata,
        };

        let incident = self.insert(new_incident).await?;

        tracing::info!(
            "Created incident {} (type={}, severity={}) for reporter {}",
            incident.incident_id,
            incident.incident_type,
            incident.severity,
            reporter_id
        );

        // Post-commit reward; failure never rolls back the incident
        let has_location = incident.geo_latitude.is_some() && incident.geo_longitude.is_some()
            || incident.manual_address.is_some();
        if let Err(e) = self
            .reward_service
            .award_for_incident(
                reporter_id,
                &incident.incident_id,
                incident.severity,
                incident.photo_hash.is_some(),
                has_location,
            )
            .await
        {
            tracing::warn!(
                "Reward accrual failed for incident {}: {}",
                incident.incident_id,
                e
            );
        }

        Ok(incident)
    }

    /// Persist a fully-populated incident. A `(photo_hash, reported_by)`
    /// unique violation here means the duplicate pre-check lost a race; it is
    /// reported as the same Conflict the detector would have raised.
    async fn insert(&self, data: NewIncident) -> Result<Incident> {
        let query = format!(
            r#"
            INSERT INTO incidents (
                incident_id, photo, photo_hash, description,
                incident_type, severity, reported_by,
                geo_latitude, geo_longitude, manual_address, metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {INCIDENT_COLUMNS}
            "#
        );

        let result = sqlx::query_as::<_, Incident>(&query)
            .bind(&data.incident_id)
            .bind(&data.photo)
            .bind(&data.photo_hash)
            .bind(&data.description)
            .bind(data.incident_type)
            .bind(data.severity)
            .bind(data.reported_by)
            .bind(data.geo_latitude)
            .bind(data.geo_longitude)
            .bind(&data.manual_address)
            .bind(&data.metadata)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(incident) => Ok(incident),
            Err(e) => {
                let unique_violation = e
                    .as_database_error()
                    .is_some_and(|db| db.is_unique_violation());
                if unique_violation {
                    if let Some(hash) = data.photo_hash.as_deref() {
                        if let Some(existing) =
                            self.find_incident_id_by_photo(hash, data.reported_by).await?
                        {
                            return Err(AppError::Conflict(format!(
                                "Duplicate photo: already reported as incident {}",
                                existing
                            )));
                        }
                    }
                    return Err(AppError::Conflict(
                        "Incident conflicts with an existing report".to_string(),
                    ));
                }
                tracing::error!("Failed to insert incident: {:?}", e);
                Err(AppError::Database(e))
            }
        }
    }

    async fn find_incident_id_by_photo(
        &self,
        photo_hash: &str,
        reported_by: i64,
    ) -> Result<Option<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT incident_id FROM incidents WHERE photo_hash = $1 AND reported_by = $2 LIMIT 1",
        )
        .bind(photo_hash)
        .bind(reported_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up conflicting incident: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Apply a guarded status transition and stamp resolver attribution.
    pub async fn update_status(
        &self,
        incident_id: &str,
        dto: &UpdateIncidentStatusDto,
        acting_user_id: i64,
    ) -> Result<Incident> {
        let incident = self.get_by_incident_id(incident_id).await?;

        transition::check_transition(incident.status, dto.status)?;

        // Entering investigating stamps the same fields as resolved -
        // observed product behavior, preserved deliberately
        let (resolved_at, resolved_by) = if transition::stamps_resolution(dto.status) {
            (Some(Utc::now()), Some(acting_user_id))
        } else {
            (None, None)
        };

        let query = format!(
            r#"
            UPDATE incidents
            SET status = $2,
                resolved_at = COALESCE($3, resolved_at),
                resolved_by = COALESCE($4, resolved_by),
                resolution_notes = COALESCE($5, resolution_notes),
                updated_at = NOW()
            WHERE incident_id = $1
            RETURNING {INCIDENT_COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, Incident>(&query)
            .bind(incident_id)
            .bind(dto.status)
            .bind(resolved_at)
            .bind(resolved_by)
            .bind(&dto.notes)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update incident status: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| {
                AppError::NotFound(format!("Incident {} not found", incident_id))
            })?;

        tracing::info!(
            "Incident {} transitioned {} -> {} by user {}",
            incident_id,
            incident.status,
            updated.status,
            acting_user_id
        );

        Ok(updated)
    }

    /// Get incident by external reference
    pub async fn get_by_incident_id(&self, incident_id: &str) -> Result<Incident> {
        let query = format!(
            "SELECT {INCIDENT_COLUMNS} FROM incidents WHERE incident_id = $1"
        );

        sqlx::query_as::<_, Incident>(&query)
            .bind(incident_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get incident: {:?}", e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Incident {} not found", incident_id)))
    }

    /// List incidents for one reporter, newest first
    pub async fn list_by_reporter(&self, reporter_id: i64, limit: i64) -> Result<Vec<Incident>> {
        let query = format!(
            r#"
            SELECT {INCIDENT_COLUMNS}
            FROM incidents
            WHERE reported_by = $1
            ORDER BY timestamp DESC
            LIMIT $2
            "#
        );

        sqlx::query_as::<_, Incident>(&query)
            .bind(reporter_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list incidents by reporter: {:?}", e);
                AppError::Database(e)
            })
    }

    /// List all incidents, newest first, with reporter/resolver identity
    pub async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<Incident>> {
        let query = format!(
            r#"
            SELECT {INCIDENT_COLUMNS}
            FROM incidents
            ORDER BY timestamp DESC
            LIMIT $1 OFFSET $2
            "#
        );

        sqlx::query_as::<_, Incident>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list incidents: {:?}", e);
                AppError::Database(e)
            })
    }

    pub async fn count_all(&self) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM incidents")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count incidents: {:?}", e);
                AppError::Database(e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::validation::INCIDENT_ID_REGEX;

    #[test]
    fn incident_id_matches_declared_format() {
        for _ in 0..100 {
            let id = generate_incident_id();
            assert!(
                INCIDENT_ID_REGEX.is_match(&id),
                "generated id {} does not match format",
                id
            );
        }
    }

    #[test]
    fn incident_id_embeds_todays_date() {
        let id = generate_incident_id();
        let expected_date = Utc::now().format("%Y%m%d").to_string();
        assert_eq!(&id[4..12], expected_date.as_str());
    }

    #[test]
    fn incident_ids_are_not_constant() {
        let ids: std::collections::HashSet<String> =
            (0..50).map(|_| generate_incident_id()).collect();
        // 6 alphanumerics of entropy; 50 draws colliding en masse would mean
        // the suffix generation is broken
        assert!(ids.len() > 1);
    }
}
