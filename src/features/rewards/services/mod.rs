mod reward_service;

pub use reward_service::{base_points, points_for, RewardOutcome, RewardService};
