/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default cap for "my incidents" listings when no limit is supplied
pub const DEFAULT_REPORTER_LIST_LIMIT: i64 = 50;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Safety admin role - can list all incidents and drive status transitions
pub const ROLE_SAFETY_ADMIN: &str = "safety_admin";

/// Reporter role - can submit incidents and track their own reports
#[allow(dead_code)]
pub const ROLE_REPORTER: &str = "reporter";
