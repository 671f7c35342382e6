mod reward_dto;

pub use reward_dto::{RewardResponseDto, RewardSummaryDto};
