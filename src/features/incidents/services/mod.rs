mod duplicate_service;
mod incident_service;
pub mod transition;

pub use duplicate_service::{DuplicateService, GEO_WINDOW_DEGREES, TIME_WINDOW_MINUTES};
pub use incident_service::{generate_incident_id, IncidentService};
