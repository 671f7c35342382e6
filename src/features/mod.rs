pub mod incidents;
pub mod rewards;
