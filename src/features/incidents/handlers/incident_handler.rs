use std::str::FromStr;
use std::sync::Arc;

use validator::Validate;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::core::identity::AuthenticatedUser;
use crate::features::incidents::dtos::{
    CreateIncidentDto, CreateIncidentFormDto, IncidentResponseDto, PhotoUpload,
    UpdateIncidentStatusDto,
};
use crate::features::incidents::models::{IncidentSeverity, IncidentType};
use crate::features::incidents::services::IncidentService;
use crate::shared::constants::{DEFAULT_REPORTER_LIST_LIMIT, ROLE_SAFETY_ADMIN};
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// State for incident handlers
#[derive(Clone)]
pub struct IncidentState {
    pub incident_service: Arc<IncidentService>,
}

/// Query parameters for the reporter's own listing
#[derive(Debug, serde::Deserialize, utoipa::IntoParams)]
pub struct MyIncidentsQuery {
    /// Maximum number of incidents to return (default: 50)
    pub limit: Option<i64>,
}

fn parse_f64_field(name: &str, value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .map_err(|_| AppError::BadRequest(format!("Field '{}' must be a number", name)))
}

/// Pull the incident fields and optional photo out of the multipart form
async fn parse_create_form(
    mut multipart: Multipart,
) -> Result<(CreateIncidentDto, Option<PhotoUpload>)> {
    let mut description: Option<String> = None;
    let mut incident_type: Option<IncidentType> = None;
    let mut severity: Option<IncidentSeverity> = None;
    let mut geo_latitude: Option<f64> = None;
    let mut geo_longitude: Option<f64> = None;
    let mut manual_address: Option<String> = None;
    let mut metadata: Option<serde_json::Value> = None;
    let mut photo: Option<PhotoUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "photo" => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read photo bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read photo data: {}", e))
                })?;
                photo = Some(PhotoUpload {
                    content_type,
                    data: data.to_vec(),
                });
            }
            name => {
                let text = field.text().await.map_err(|e| {
                    debug!("Failed to read field '{}': {}", name, e);
                    AppError::BadRequest(format!("Failed to read field '{}'", name))
                })?;

                match name {
                    "description" => description = Some(text),
                    "incident_type" => {
                        incident_type =
                            Some(IncidentType::from_str(&text).map_err(AppError::Validation)?)
                    }
                    "severity" => {
                        severity =
                            Some(IncidentSeverity::from_str(&text).map_err(AppError::Validation)?)
                    }
                    "geo_latitude" => geo_latitude = Some(parse_f64_field("geo_latitude", &text)?),
                    "geo_longitude" => {
                        geo_longitude = Some(parse_f64_field("geo_longitude", &text)?)
                    }
                    "manual_address" => manual_address = Some(text),
                    "metadata" => {
                        // Opaque payload; only require that it is valid JSON
                        metadata = Some(serde_json::from_str(&text).map_err(|e| {
                            AppError::BadRequest(format!("Field 'metadata' must be JSON: {}", e))
                        })?)
                    }
                    other => debug!("Ignoring unknown field: {}", other),
                }
            }
        }
    }

    let incident_type = incident_type
        .ok_or_else(|| AppError::Validation("Field 'incident_type' is required".to_string()))?;
    let severity = severity
        .ok_or_else(|| AppError::Validation("Field 'severity' is required".to_string()))?;

    Ok((
        CreateIncidentDto {
            description,
            incident_type,
            severity,
            geo_latitude,
            geo_longitude,
            manual_address,
            metadata,
        },
        photo,
    ))
}

/// Report a new incident
#[utoipa::path(
    post,
    path = "/api/incidents",
    tag = "incidents",
    request_body(
        content = CreateIncidentFormDto,
        content_type = "multipart/form-data",
        description = "Incident report fields plus optional photo"
    ),
    responses(
        (status = 201, description = "Incident created", body = ApiResponse<IncidentResponseDto>),
        (status = 400, description = "Validation error (photo type/size, missing location)"),
        (status = 401, description = "Authentication required"),
        (status = 409, description = "Duplicate of an existing incident")
    ),
    security(("gateway_identity" = []))
)]
pub async fn create_incident(
    user: AuthenticatedUser,
    State(state): State<IncidentState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<IncidentResponseDto>>)> {
    let (dto, photo) = parse_create_form(multipart).await?;

    let incident = state
        .incident_service
        .create(dto, photo, user.user_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(incident.into()), None, None)),
    ))
}

/// List all incidents (safety admin dashboard)
#[utoipa::path(
    get,
    path = "/api/incidents",
    tag = "incidents",
    params(PaginationQuery),
    responses(
        (status = 200, description = "All incidents, newest first", body = ApiResponse<Vec<IncidentResponseDto>>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Safety admin role required")
    ),
    security(("gateway_identity" = []))
)]
pub async fn list_incidents(
    user: AuthenticatedUser,
    State(state): State<IncidentState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<IncidentResponseDto>>>> {
    if !user.has_role(ROLE_SAFETY_ADMIN) {
        return Err(AppError::Forbidden(
            "Safety admin role required".to_string(),
        ));
    }

    let incidents = state
        .incident_service
        .list_all(pagination.limit(), pagination.offset())
        .await?;
    let total = state.incident_service.count_all().await?;

    let dtos: Vec<IncidentResponseDto> = incidents.into_iter().map(|i| i.into()).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// List the authenticated reporter's incidents
#[utoipa::path(
    get,
    path = "/api/incidents/my",
    tag = "incidents",
    params(MyIncidentsQuery),
    responses(
        (status = 200, description = "Caller's incidents, newest first", body = ApiResponse<Vec<IncidentResponseDto>>),
        (status = 401, description = "Authentication required")
    ),
    security(("gateway_identity" = []))
)]
pub async fn list_my_incidents(
    user: AuthenticatedUser,
    State(state): State<IncidentState>,
    Query(query): Query<MyIncidentsQuery>,
) -> Result<Json<ApiResponse<Vec<IncidentResponseDto>>>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_REPORTER_LIST_LIMIT)
        .clamp(1, DEFAULT_REPORTER_LIST_LIMIT);
    let incidents = state
        .incident_service
        .list_by_reporter(user.user_id, limit)
        .await?;

    let dtos: Vec<IncidentResponseDto> = incidents.into_iter().map(|i| i.into()).collect();
    Ok(Json(ApiResponse::success(Some(dtos), None, None)))
}

/// Get incident by external reference
#[utoipa::path(
    get,
    path = "/api/incidents/{incident_id}",
    tag = "incidents",
    params(
        ("incident_id" = String, Path, description = "External incident reference (INC-...)")
    ),
    responses(
        (status = 200, description = "Incident found", body = ApiResponse<IncidentResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Incident not found")
    ),
    security(("gateway_identity" = []))
)]
pub async fn get_incident(
    _user: AuthenticatedUser,
    State(state): State<IncidentState>,
    Path(incident_id): Path<String>,
) -> Result<Json<ApiResponse<IncidentResponseDto>>> {
    let incident = state.incident_service.get_by_incident_id(&incident_id).await?;
    Ok(Json(ApiResponse::success(Some(incident.into()), None, None)))
}

/// Update incident status through the transition guard
#[utoipa::path(
    patch,
    path = "/api/incidents/{incident_id}/status",
    tag = "incidents",
    params(
        ("incident_id" = String, Path, description = "External incident reference (INC-...)")
    ),
    request_body = UpdateIncidentStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<IncidentResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Illegal status transition"),
        (status = 404, description = "Incident not found")
    ),
    security(("gateway_identity" = []))
)]
pub async fn update_incident_status(
    user: AuthenticatedUser,
    State(state): State<IncidentState>,
    Path(incident_id): Path<String>,
    AppJson(dto): AppJson<UpdateIncidentStatusDto>,
) -> Result<Json<ApiResponse<IncidentResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let incident = state
        .incident_service
        .update_status(&incident_id, &dto, user.user_id)
        .await?;
    Ok(Json(ApiResponse::success(Some(incident.into()), None, None)))
}
