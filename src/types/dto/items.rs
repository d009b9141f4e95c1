use poem_openapi::{types::multipart::Upload, Multipart, Object};

use crate::errors::InternalError;
use crate::lifecycle::ItemStatus;
use crate::types::db::item;

/// Name and email of a person interacting with an item
#[derive(Object, Debug, Clone)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
}

/// Item as shown to the public: no contact details, no archive flag
/// (archived items never reach this view in the first place).
#[derive(Object, Debug)]
pub struct PublicItemResponse {
    /// Unique identifier
    pub id: String,

    /// Free-text description of the found item
    pub description: String,

    /// Public URL of the full-size image
    pub image_url: String,

    /// Public URL of the derived thumbnail; clients fall back to
    /// `image_url` when absent
    pub thumbnail_url: Option<String>,

    /// Lifecycle status
    pub status: ItemStatus,

    /// Creation timestamp (ISO 8601)
    pub created_at: String,
}

/// Item as shown on the admin dashboard
#[derive(Object, Debug)]
pub struct AdminItemResponse {
    /// Unique identifier
    pub id: String,

    /// Free-text description of the found item
    pub description: String,

    /// Public URL of the full-size image
    pub image_url: String,

    /// Public URL of the derived thumbnail
    pub thumbnail_url: Option<String>,

    /// Lifecycle status
    pub status: ItemStatus,

    /// Creation timestamp (ISO 8601)
    pub created_at: String,

    /// Last reserver, retained even after retrieval
    pub reserved_by: Option<ContactDetails>,

    /// Person who picked the item up
    pub retrieved_by: Option<ContactDetails>,

    /// Whether the item has been archived out of the listings
    pub is_archived: bool,
}

fn contact(name: &Option<String>, email: &Option<String>) -> Option<ContactDetails> {
    match (name, email) {
        (None, None) => None,
        (n, e) => Some(ContactDetails {
            name: n.clone().unwrap_or_default(),
            email: e.clone().unwrap_or_default(),
        }),
    }
}

fn format_timestamp(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

impl PublicItemResponse {
    pub fn from_model(m: &item::Model) -> Result<Self, InternalError> {
        Ok(Self {
            id: m.id.clone(),
            description: m.description.clone(),
            image_url: m.image_url.clone(),
            thumbnail_url: m.thumbnail_url.clone(),
            status: m.item_status()?,
            created_at: format_timestamp(m.created_at),
        })
    }
}

impl AdminItemResponse {
    pub fn from_model(m: &item::Model) -> Result<Self, InternalError> {
        Ok(Self {
            id: m.id.clone(),
            description: m.description.clone(),
            image_url: m.image_url.clone(),
            thumbnail_url: m.thumbnail_url.clone(),
            status: m.item_status()?,
            created_at: format_timestamp(m.created_at),
            reserved_by: contact(&m.reserved_by_name, &m.reserved_by_email),
            retrieved_by: contact(&m.retrieved_by_name, &m.retrieved_by_email),
            is_archived: m.is_archived,
        })
    }
}

/// Request body for reserving an item
#[derive(Object, Debug)]
pub struct ReserveRequest {
    /// Reserver's name (required, non-empty)
    pub name: String,

    /// Reserver's email (required, well-formed)
    pub email: String,
}

/// Response for a reservation
#[derive(Object, Debug)]
pub struct ReserveResponse {
    /// Whether the operator notification email went out. The reservation
    /// itself stands either way.
    pub notification_sent: bool,
}

/// Request body for marking an item retrieved
#[derive(Object, Debug)]
pub struct RetrieveRequest {
    /// Retriever's name (required, non-empty)
    pub name: String,

    /// Retriever's email (required, well-formed)
    pub email: String,
}

/// Request body for the administrative status override
#[derive(Object, Debug)]
pub struct SetStatusRequest {
    /// Target status; only the `to_collect <-> reserved` toggle is legal
    pub status: ItemStatus,
}

/// Multipart form for adding a new found item
#[derive(Multipart)]
pub struct CreateItemForm {
    /// Free-text description (required, non-empty)
    pub description: String,

    /// Raster image of the item; re-encoded server-side
    pub image: Upload,
}
