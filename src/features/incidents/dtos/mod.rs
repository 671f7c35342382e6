mod incident_dto;

pub use incident_dto::{
    is_photo_mime_type_allowed, CreateIncidentDto, CreateIncidentFormDto, IncidentResponseDto,
    PhotoUpload, UpdateIncidentStatusDto, ALLOWED_PHOTO_MIME_TYPES, MAX_PHOTO_SIZE,
};
