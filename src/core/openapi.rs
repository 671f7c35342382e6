use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::incidents::{
    dtos as incidents_dtos, handlers as incidents_handlers, models as incidents_models,
};
use crate::features::rewards::{dtos as rewards_dtos, handlers as rewards_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Incidents
        incidents_handlers::incident_handler::create_incident,
        incidents_handlers::incident_handler::list_incidents,
        incidents_handlers::incident_handler::list_my_incidents,
        incidents_handlers::incident_handler::get_incident,
        incidents_handlers::incident_handler::update_incident_status,
        // Rewards
        rewards_handlers::reward_handler::list_my_rewards,
        rewards_handlers::reward_handler::get_my_points,
        rewards_handlers::reward_handler::get_user_points,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Incidents
            incidents_models::IncidentStatus,
            incidents_models::IncidentType,
            incidents_models::IncidentSeverity,
            incidents_dtos::CreateIncidentFormDto,
            incidents_dtos::UpdateIncidentStatusDto,
            incidents_dtos::IncidentResponseDto,
            ApiResponse<incidents_dtos::IncidentResponseDto>,
            ApiResponse<Vec<incidents_dtos::IncidentResponseDto>>,
            // Rewards
            rewards_dtos::RewardResponseDto,
            rewards_dtos::RewardSummaryDto,
            ApiResponse<Vec<rewards_dtos::RewardResponseDto>>,
            ApiResponse<rewards_dtos::RewardSummaryDto>,
        )
    ),
    tags(
        (name = "incidents", description = "Incident reporting and lifecycle management"),
        (name = "rewards", description = "Reporter reward points"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "ProSafe API",
        version = "0.1.0",
        description = "Workplace safety incident lifecycle API for ProSafe",
    )
)]
pub struct ApiDoc;

/// Adds the gateway identity header scheme to the OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "gateway_identity",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-User-Id"))),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
