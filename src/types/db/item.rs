use sea_orm::entity::prelude::*;

use crate::errors::InternalError;
use crate::lifecycle::ItemStatus;

/// SeaORM entity for the items table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub description: String,
    pub image_url: String,
    pub thumbnail_url: Option<String>,
    pub status: String,
    pub created_at: i64,

    // Set on first reservation, never cleared afterwards
    pub reserved_by_name: Option<String>,
    pub reserved_by_email: Option<String>,

    // Set when the owner picks the item up
    pub retrieved_by_name: Option<String>,
    pub retrieved_by_email: Option<String>,

    // One-way flag, orthogonal to status
    pub is_archived: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Typed view of the stored status string.
    pub fn item_status(&self) -> Result<ItemStatus, InternalError> {
        self.status
            .parse()
            .map_err(|e: crate::lifecycle::UnknownStatus| InternalError::parse("item status", e.to_string()))
    }
}
