//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::{CreateLink, LinkUsage};
use crate::domain::entities::Link;

/// Request body for `POST /api/links`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    /// The URL to shorten (must be valid HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"))]
    pub original_url: String,

    /// Optional caller-chosen short code. Empty means none.
    #[validate(length(max = 50))]
    pub custom_alias: Option<String>,
}

impl From<CreateLinkRequest> for CreateLink {
    fn from(req: CreateLinkRequest) -> Self {
        Self {
            original_url: req.original_url,
            custom_alias: req.custom_alias,
        }
    }
}

/// Request body for `PUT /api/links/{code}`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkRequest {
    #[validate(url(message = "Invalid URL format"))]
    pub original_url: String,
}

/// JSON representation of a link.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub short_code: String,
    pub original_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_alias: Option<String>,
    pub is_active: bool,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            user_id: link.owner.user_id(),
            short_code: link.short_code,
            original_url: link.original_url,
            created_at: link.created_at,
            expires_at: link.expires_at,
            click_count: link.click_count,
            custom_alias: link.custom_alias,
            is_active: link.is_active,
        }
    }
}

/// Response for `GET /api/links`.
#[derive(Debug, Serialize)]
pub struct LinksResponse {
    pub links: Vec<LinkResponse>,
    pub usage: LinkUsage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Owner;
    use serde_json::json;

    #[test]
    fn test_link_response_is_camel_case() {
        let link = Link {
            short_code: "mybrand".to_string(),
            original_url: "https://example.com".to_string(),
            owner: Owner::User(7),
            created_at: Utc::now(),
            expires_at: None,
            click_count: 3,
            custom_alias: Some("mybrand".to_string()),
            is_active: true,
        };

        let value = serde_json::to_value(LinkResponse::from(link)).unwrap();

        assert_eq!(value["shortCode"], "mybrand");
        assert_eq!(value["originalUrl"], "https://example.com");
        assert_eq!(value["userId"], 7);
        assert_eq!(value["clickCount"], 3);
        assert_eq!(value["customAlias"], "mybrand");
        assert_eq!(value["isActive"], true);
        assert!(value.get("expiresAt").is_none());
    }

    #[test]
    fn test_anonymous_link_omits_user_id() {
        let link = Link {
            short_code: "Xy3_kQ9aBc1-".to_string(),
            original_url: "https://example.com".to_string(),
            owner: Owner::Anonymous,
            created_at: Utc::now(),
            expires_at: Some(Utc::now()),
            click_count: 0,
            custom_alias: None,
            is_active: true,
        };

        let value = serde_json::to_value(LinkResponse::from(link)).unwrap();

        assert!(value.get("userId").is_none());
        assert!(value.get("customAlias").is_none());
        assert!(value.get("expiresAt").is_some());
    }

    #[test]
    fn test_create_request_validation() {
        let req: CreateLinkRequest = serde_json::from_value(json!({
            "originalUrl": "https://example.com",
            "customAlias": "mybrand"
        }))
        .unwrap();
        assert!(req.validate().is_ok());

        let req: CreateLinkRequest =
            serde_json::from_value(json!({ "originalUrl": "not a url" })).unwrap();
        assert!(req.validate().is_err());

        let req: CreateLinkRequest = serde_json::from_value(json!({
            "originalUrl": "https://example.com",
            "customAlias": "a".repeat(51)
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }
}
