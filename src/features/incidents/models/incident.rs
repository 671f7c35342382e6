use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

/// Incident status enum matching database enum
///
/// `Closed` is declared in the product schema but no transition currently
/// leads to or from it; it is kept for forward compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "incident_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    Open,
    Investigating,
    Resolved,
    Closed,
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentStatus::Open => write!(f, "open"),
            IncidentStatus::Investigating => write!(f, "investigating"),
            IncidentStatus::Resolved => write!(f, "resolved"),
            IncidentStatus::Closed => write!(f, "closed"),
        }
    }
}

/// Incident classification enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "incident_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IncidentType {
    Hazard,
    Injury,
    NearMiss,
    Equipment,
    Environmental,
    Other,
}

impl std::fmt::Display for IncidentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentType::Hazard => write!(f, "hazard"),
            IncidentType::Injury => write!(f, "injury"),
            IncidentType::NearMiss => write!(f, "near_miss"),
            IncidentType::Equipment => write!(f, "equipment"),
            IncidentType::Environmental => write!(f, "environmental"),
            IncidentType::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for IncidentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hazard" => Ok(IncidentType::Hazard),
            "injury" => Ok(IncidentType::Injury),
            "near_miss" => Ok(IncidentType::NearMiss),
            "equipment" => Ok(IncidentType::Equipment),
            "environmental" => Ok(IncidentType::Environmental),
            "other" => Ok(IncidentType::Other),
            _ => Err(format!("Unknown incident type: {}", s)),
        }
    }
}

/// Incident severity enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "incident_severity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IncidentSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for IncidentSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentSeverity::Low => write!(f, "low"),
            IncidentSeverity::Medium => write!(f, "medium"),
            IncidentSeverity::High => write!(f, "high"),
            IncidentSeverity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for IncidentSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(IncidentSeverity::Low),
            "medium" => Ok(IncidentSeverity::Medium),
            "high" => Ok(IncidentSeverity::High),
            "critical" => Ok(IncidentSeverity::Critical),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// Database model for incident
#[derive(Debug, Clone, FromRow)]
pub struct Incident {
    pub id: i64,
    pub incident_id: String,
    pub photo: Option<Vec<u8>>,
    pub photo_hash: Option<String>,
    pub description: Option<String>,
    pub incident_type: IncidentType,
    pub severity: IncidentSeverity,
    pub timestamp: DateTime<Utc>,
    pub reported_by: i64,
    pub status: IncidentStatus,
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

/// Data for inserting a new incident
#[derive(Debug)]
pub struct NewIncident {
    pub incident_id: String,
    pub photo: Option<Vec<u8>>,
    pub photo_hash: Option<String>,
    pub description: Option<String>,
    pub incident_type: IncidentType,
    pub severity: IncidentSeverity,
    pub reported_by: i64,
    pub geo_latitude: Option<f64>,
    pub geo_longitude: Option<f64>,
    pub manual_address: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn severity_round_trips_through_str() {
        for s in ["low", "medium", "high", "critical"] {
            assert_eq!(IncidentSeverity::from_str(s).unwrap().to_string(), s);
        }
        assert!(IncidentSeverity::from_str("severe").is_err());
    }

    #[test]
    fn incident_type_round_trips_through_str() {
        for s in [
            "hazard",
            "injury",
            "near_miss",
            "equipment",
            "environmental",
            "other",
        ] {
            assert_eq!(IncidentType::from_str(s).unwrap().to_string(), s);
        }
        assert!(IncidentType::from_str("fire").is_err());
    }
}
