//! Reward accumulator: one idempotent point grant per created incident,
//! totals recomputed from the grant rows on every read.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::RewardService;
