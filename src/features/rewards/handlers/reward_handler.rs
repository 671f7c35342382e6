use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::{AppError, Result};
use crate::core::identity::AuthenticatedUser;
use crate::features::rewards::dtos::{RewardResponseDto, RewardSummaryDto};
use crate::features::rewards::services::RewardService;
use crate::shared::constants::{DEFAULT_REPORTER_LIST_LIMIT, ROLE_SAFETY_ADMIN};
use crate::shared::types::ApiResponse;

/// State for reward handlers
#[derive(Clone)]
pub struct RewardState {
    pub reward_service: Arc<RewardService>,
}

/// List the caller's reward rows
#[utoipa::path(
    get,
    path = "/api/rewards/my",
    tag = "rewards",
    responses(
        (status = 200, description = "Caller's rewards, newest first", body = ApiResponse<Vec<RewardResponseDto>>),
        (status = 401, description = "Authentication required")
    ),
    security(("gateway_identity" = []))
)]
pub async fn list_my_rewards(
    user: AuthenticatedUser,
    State(state): State<RewardState>,
) -> Result<Json<ApiResponse<Vec<RewardResponseDto>>>> {
    let rewards = state
        .reward_service
        .list_by_user(user.user_id, DEFAULT_REPORTER_LIST_LIMIT)
        .await?;
    let dtos: Vec<RewardResponseDto> = rewards.into_iter().map(|r| r.into()).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Get the caller's point total
#[utoipa::path(
    get,
    path = "/api/rewards/my/points",
    tag = "rewards",
    responses(
        (status = 200, description = "Caller's total points", body = ApiResponse<RewardSummaryDto>),
        (status = 401, description = "Authentication required")
    ),
    security(("gateway_identity" = []))
)]
pub async fn get_my_points(
    user: AuthenticatedUser,
    State(state): State<RewardState>,
) -> Result<Json<ApiResponse<RewardSummaryDto>>> {
    let total_points = state.reward_service.total_points(user.user_id).await?;
    let dto = RewardSummaryDto {
        user_id: user.user_id,
        total_points,
    };
    Ok(Json(ApiResponse::success(Some(dto), None, None)))
}

/// Get any user's point total (safety admin dashboard)
#[utoipa::path(
    get,
    path = "/api/rewards/users/{user_id}/points",
    tag = "rewards",
    params(
        ("user_id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's total points", body = ApiResponse<RewardSummaryDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Safety admin role required")
    ),
    security(("gateway_identity" = []))
)]
pub async fn get_user_points(
    user: AuthenticatedUser,
    State(state): State<RewardState>,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<RewardSummaryDto>>> {
    if !user.has_role(ROLE_SAFETY_ADMIN) {
        return Err(AppError::Forbidden(
            "Safety admin role required".to_string(),
        ));
    }

    let total_points = state.reward_service.total_points(user_id).await?;
    let dto = RewardSummaryDto {
        user_id,
        total_points,
    };
    Ok(Json(ApiResponse::success(Some(dto), None, None)))
}
