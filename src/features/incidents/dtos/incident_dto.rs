use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::incidents::models::{
    Incident, IncidentSeverity, IncidentStatus, IncidentType,
};

/// Maximum photo size in bytes (5MB)
pub const MAX_PHOTO_SIZE: usize = 5 * 1024 * 1024;

/// Allowed MIME types for incident photos
pub const ALLOWED_PHOTO_MIME_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// Check if a MIME type is allowed for incident photos
pub fn is_photo_mime_type_allowed(content_type: &str) -> bool {
    ALLOWED_PHOTO_MIME_TYPES.contains(&content_type)
}

/// Validated fields of a new incident report, assembled from the multipart
/// form by the handler before the lifecycle manager runs.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateIncidentDto {
    #[validate(length(max = 200, message = "Description must be at most 200 characters"))]
    pub description: Option<String>,
    pub incident_type: IncidentType,
    pub severity: IncidentSeverity,
    pub geo_latitude: Option<f64>,
    pub geo_longitude: Option<f64>,
    pub manual_address: Option<String>,
    /// Opaque client metadata, stored as-is and never interpreted by the core
    pub metadata: Option<serde_json::Value>,
}

impl CreateIncidentDto {
    /// Coordinates only count when both halves are present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.geo_latitude, self.geo_longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Either coordinates or a non-empty manual address satisfies the
    /// location requirement
    pub fn has_location(&self) -> bool {
        self.coordinates().is_some()
            || self
                .manual_address
                .as_deref()
                .is_some_and(|a| !a.trim().is_empty())
    }
}

/// A photo pulled out of the multipart request
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Create incident request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct CreateIncidentFormDto {
    /// Free-text description (max 200 characters)
    pub description: Option<String>,
    /// Incident classification (hazard, injury, near_miss, equipment, environmental, other)
    pub incident_type: String,
    /// Severity (low, medium, high, critical)
    pub severity: String,
    pub geo_latitude: Option<f64>,
    pub geo_longitude: Option<f64>,
    /// Free-text location, used when coordinates are absent
    pub manual_address: Option<String>,
    /// Opaque JSON metadata
    pub metadata: Option<String>,
    /// Optional photo (JPEG or PNG, max 5MB)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub photo: Option<String>,
}

/// Request DTO for updating incident status
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateIncidentStatusDto {
    pub status: IncidentStatus,
    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,
}

/// Response DTO for incident (photo bytes are never echoed back)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IncidentResponseDto {
    pub incident_id: String,
    pub description: Option<String>,
    pub incident_type: IncidentType,
    pub severity: IncidentSeverity,
    pub status: IncidentStatus,
    pub timestamp: DateTime<Utc>,
    pub reported_by: i64,
    pub has_photo: bool,
    pub photo_hash: Option<String>,
    pub geo_latitude: Option<f64>,
    pub geo_longitude: Option<f64>,
    pub manual_address: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<i64>,
    pub resolution_notes: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Incident> for IncidentResponseDto {
    fn from(i: Incident) -> Self {
        Self {
            incident_id: i.incident_id,
            description: i.description,
            incident_type: i.incident_type,
            severity: i.severity,
            status: i.status,
            timestamp: i.timestamp,
            reported_by: i.reported_by,
            has_photo: i.photo.is_some(),
            photo_hash: i.photo_hash,
            geo_latitude: i.geo_latitude,
            geo_longitude: i.geo_longitude,
            manual_address: i.manual_address,
            resolved_at: i.resolved_at,
            resolved_by: i.resolved_by,
            resolution_notes: i.resolution_notes,
            metadata: i.metadata,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{faker::lorem::en::Sentence, Fake};

    fn base_dto() -> CreateIncidentDto {
        CreateIncidentDto {
            description: None,
            incident_type: IncidentType::Hazard,
            severity: IncidentSeverity::Low,
            geo_latitude: None,
            geo_longitude: None,
            manual_address: None,
            metadata: None,
        }
    }

    #[test]
    fn description_over_200_chars_fails_validation() {
        let mut dto = base_dto();
        dto.description = Some("x".repeat(201));
        assert!(dto.validate().is_err());

        dto.description = Some("x".repeat(200));
        assert!(dto.validate().is_ok());

        let sentence: String = Sentence(3..8).fake();
        dto.description = Some(sentence.chars().take(200).collect());
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn location_requires_both_coordinates_or_address() {
        let mut dto = base_dto();
        assert!(!dto.has_location());

        dto.geo_latitude = Some(33.5);
        assert!(!dto.has_location()); // longitude missing

        dto.geo_longitude = Some(-7.6);
        assert!(dto.has_location());
        assert_eq!(dto.coordinates(), Some((33.5, -7.6)));

        let mut dto = base_dto();
        dto.manual_address = Some("Building 4".to_string());
        assert!(dto.has_location());

        dto.manual_address = Some("   ".to_string());
        assert!(!dto.has_location());
    }

    #[test]
    fn photo_mime_allowlist() {
        assert!(is_photo_mime_type_allowed("image/jpeg"));
        assert!(is_photo_mime_type_allowed("image/png"));
        assert!(!is_photo_mime_type_allowed("image/gif"));
        assert!(!is_photo_mime_type_allowed("application/pdf"));
        assert!(!is_photo_mime_type_allowed("video/mp4"));
    }
}
