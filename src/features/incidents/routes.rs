use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::incidents::handlers::{incident_handler, IncidentState};
use crate::features::incidents::services::IncidentService;

/// Create routes for the incidents feature
///
/// All routes require the gateway identity middleware to be applied by the caller
pub fn routes(incident_service: Arc<IncidentService>) -> Router {
    let state = IncidentState { incident_service };

    Router::new()
        .route(
            "/api/incidents",
            post(incident_handler::create_incident).get(incident_handler::list_incidents),
        )
        .route("/api/incidents/my", get(incident_handler::list_my_incidents))
        .route(
            "/api/incidents/{incident_id}",
            get(incident_handler::get_incident),
        )
        .route(
            "/api/incidents/{incident_id}/status",
            patch(incident_handler::update_incident_status),
        )
        .with_state(state)
}
