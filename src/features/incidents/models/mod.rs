mod incident;

pub use incident::{Incident, IncidentSeverity, IncidentStatus, IncidentType, NewIncident};
