use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::rewards::models::Reward;

/// Response DTO for one reward row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RewardResponseDto {
    pub incident_id: String,
    pub points: i32,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl From<Reward> for RewardResponseDto {
    fn from(r: Reward) -> Self {
        Self {
            incident_id: r.incident_id,
            points: r.points,
            reason: r.reason,
            created_at: r.created_at,
        }
    }
}

/// Response DTO for a user's point total
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RewardSummaryDto {
    pub user_id: i64,
    pub total_points: i64,
}
