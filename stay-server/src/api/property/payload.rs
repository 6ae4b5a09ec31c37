//! Property form payload
//!
//! multipart 表单里 `homestay` 字段携带 JSON 负载，`files[]` 字段携带
//! 图片。负载字段全部可选，缺失的必填字段在 [`HomestayPayload::validate`]
//! 里统一报 400，保证验证先于任何持久化发生。

use axum::extract::Multipart;
use serde::Deserialize;
use surrealdb::RecordId;

use crate::api::attachments::upload::UploadFile;
use crate::db::models::{AvailabilitySlot, Location};
use crate::db::repository::parse_record_id;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// Raw JSON payload from the `homestay` form field
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomestayPayload {
    /// Present on update only
    pub id: Option<String>,
    pub host_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<Location>,
    pub price_per_night: Option<i64>,
    pub amenities: Option<Vec<String>>,
    pub availability: Option<Vec<AvailabilitySlot>>,
    /// Update only: attachments to unlink and delete
    pub deleted_attachment_ids: Option<Vec<String>>,
}

/// Payload with required fields checked and ids parsed
#[derive(Debug, Clone)]
pub struct ValidatedHomestay {
    pub id: Option<String>,
    pub host: RecordId,
    pub name: String,
    pub description: Option<String>,
    pub location: Location,
    pub price_per_night: i64,
    pub amenities: Vec<String>,
    pub availability: Vec<AvailabilitySlot>,
    pub deleted_attachment_ids: Vec<RecordId>,
}

impl HomestayPayload {
    /// Validate required fields {hostId, name, pricePerNight, location, availability}
    ///
    /// `require_id` 为 true 时 (更新) 额外要求 `id`。
    pub fn validate(self, require_id: bool) -> AppResult<ValidatedHomestay> {
        let host_id = self.host_id.filter(|h| !h.is_empty());
        let name = self.name.filter(|n| !n.trim().is_empty());

        let all_present = host_id.is_some()
            && name.is_some()
            && self.price_per_night.is_some()
            && self.location.is_some()
            && self.availability.is_some()
            && (!require_id || self.id.as_deref().is_some_and(|id| !id.is_empty()));

        if !all_present {
            return Err(AppError::validation("Required fields are missing"));
        }

        let name = name.unwrap_or_default();
        let price_per_night = self.price_per_night.unwrap_or_default();
        let location = self
            .location
            .ok_or_else(|| AppError::validation("Required fields are missing"))?;

        validate_required_text(&name, "name", MAX_NAME_LEN)?;
        validate_optional_text(&self.description, "description", MAX_TEXT_LEN)?;
        validate_required_text(&location.address, "location.address", MAX_TEXT_LEN)?;
        if price_per_night <= 0 {
            return Err(AppError::validation("Price must be greater than zero"));
        }

        let host = parse_record_id("host", &host_id.unwrap_or_default());
        let deleted_attachment_ids = self
            .deleted_attachment_ids
            .unwrap_or_default()
            .iter()
            .map(|id| parse_record_id("attachment", id))
            .collect();

        Ok(ValidatedHomestay {
            id: self.id,
            host,
            name,
            description: self.description,
            location,
            price_per_night,
            amenities: self.amenities.unwrap_or_default(),
            availability: self.availability.unwrap_or_default(),
            deleted_attachment_ids,
        })
    }
}

/// Parse the property multipart form into (payload, buffered files)
pub async fn parse_property_form(
    mut multipart: Multipart,
) -> AppResult<(HomestayPayload, Vec<UploadFile>)> {
    let mut payload_json: Option<String> = None;
    let mut files: Vec<UploadFile> = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("homestay") => {
                payload_json = Some(field.text().await?);
            }
            Some("files[]") | Some("files") => {
                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "file".to_string());
                let content_type = field.content_type().map(|s| s.to_string());
                let data = field.bytes().await?.to_vec();
                files.push(UploadFile {
                    file_name,
                    content_type,
                    data,
                });
            }
            _ => {
                // 忽略未知字段
            }
        }
    }

    let payload_json = payload_json
        .ok_or_else(|| AppError::validation("Missing 'homestay' payload field"))?;
    let payload: HomestayPayload = serde_json::from_str(&payload_json)
        .map_err(|e| AppError::validation(format!("Invalid homestay payload: {}", e)))?;

    Ok((payload, files))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> HomestayPayload {
        serde_json::from_value(serde_json::json!({
            "hostId": "host:h1",
            "name": "Lakeview",
            "pricePerNight": 100,
            "location": { "address": "123 Lake Rd" },
            "availability": [{ "date": "2024-02-01", "isAvailable": true }]
        }))
        .unwrap()
    }

    #[test]
    fn accepts_complete_payload() {
        let v = full_payload().validate(false).unwrap();
        assert_eq!(v.name, "Lakeview");
        assert_eq!(v.price_per_night, 100);
        assert_eq!(v.host.to_string(), "host:h1");
        assert!(v.deleted_attachment_ids.is_empty());
    }

    #[test]
    fn missing_host_id_is_a_validation_error() {
        let mut payload = full_payload();
        payload.host_id = None;
        let err = payload.validate(false).unwrap_err();
        assert!(err.to_string().contains("Validation"));
    }

    #[test]
    fn update_requires_id() {
        let payload = full_payload();
        assert!(payload.clone().validate(true).is_err());

        let mut with_id = payload;
        with_id.id = Some("homestay:s1".to_string());
        assert!(with_id.validate(true).is_ok());
    }

    #[test]
    fn rejects_non_positive_price() {
        let mut payload = full_payload();
        payload.price_per_night = Some(0);
        assert!(payload.validate(false).is_err());
    }
}
