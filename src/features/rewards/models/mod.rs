mod reward;

pub use reward::Reward;
