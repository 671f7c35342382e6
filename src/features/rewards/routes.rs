use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::rewards::handlers::{reward_handler, RewardState};
use crate::features::rewards::services::RewardService;

/// Create routes for the rewards feature
///
/// All routes require the gateway identity middleware to be applied by the caller
pub fn routes(reward_service: Arc<RewardService>) -> Router {
    let state = RewardState { reward_service };

    Router::new()
        .route("/api/rewards/my", get(reward_handler::list_my_rewards))
        .route("/api/rewards/my/points", get(reward_handler::get_my_points))
        .route(
            "/api/rewards/users/{user_id}/points",
            get(reward_handler::get_user_points),
        )
        .with_state(state)
}
