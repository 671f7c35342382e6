pub mod constants;
pub mod fingerprint;
pub mod test_helpers;
pub mod types;
pub mod validation;
