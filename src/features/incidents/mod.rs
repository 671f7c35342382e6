//! Incident lifecycle feature: report submission with duplicate suppression,
//! guarded status transitions, and reporter/resolver attribution.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/incidents` | Yes | Submit incident report (multipart) |
//! | GET | `/api/incidents` | Admin | List all incidents |
//! | GET | `/api/incidents/my` | Yes | List caller's incidents |
//! | GET | `/api/incidents/{incident_id}` | Yes | Get incident by reference |
//! | PATCH | `/api/incidents/{incident_id}/status` | Yes | Guarded status transition |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{DuplicateService, IncidentService};
