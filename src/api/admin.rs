use std::sync::Arc;

use poem_openapi::auth::Bearer;
use poem_openapi::param::{Path, Query};
use poem_openapi::{payload::Json, OpenApi, SecurityScheme, Tags};
use sha2::{Digest, Sha256};

use crate::api::is_well_formed_email;
use crate::errors::AdminError;
use crate::lifecycle::{Actor, ItemStatus};
use crate::listing::{self, ListingQuery, SortColumn, SortDirection, SortState};
use crate::services;
use crate::stores::ItemStore;
use crate::types::dto::common::OkResponse;
use crate::types::dto::items::{
    AdminItemResponse, CreateItemForm, RetrieveRequest, SetStatusRequest,
};

/// Static bearer token authentication for the admin dashboard.
///
/// Replaces the original client-side password prompt with a check the
/// server performs; full user accounts are out of scope.
#[derive(SecurityScheme)]
#[oai(ty = "bearer")]
pub struct AdminAuth(Bearer);

/// Administrative items API: item intake and lifecycle management.
pub struct AdminApi {
    items: Arc<ItemStore>,
    admin_token: String,
}

impl AdminApi {
    pub fn new(items: Arc<ItemStore>, admin_token: String) -> Self {
        Self { items, admin_token }
    }

    fn authorize(&self, auth: &AdminAuth) -> Result<(), AdminError> {
        // Compare digests so length is not observable
        let expected = Sha256::digest(self.admin_token.as_bytes());
        let supplied = Sha256::digest(auth.0.token.as_bytes());
        if expected == supplied {
            Ok(())
        } else {
            Err(AdminError::unauthorized())
        }
    }
}

/// API tags for admin endpoints
#[derive(Tags)]
enum AdminTags {
    /// Item management endpoints
    Admin,
}

#[OpenApi(prefix_path = "/admin")]
impl AdminApi {
    /// List all items for the dashboard
    ///
    /// Includes expired items still inside the grace window; archived
    /// items only when `include_archived` is set. `search` fuzzy-matches
    /// descriptions and reserver/retriever contact details.
    #[oai(path = "/items", method = "get", tag = "AdminTags::Admin")]
    async fn list(
        &self,
        auth: AdminAuth,
        search: Query<Option<String>>,
        status: Query<Option<ItemStatus>>,
        include_archived: Query<Option<bool>>,
        sort_by: Query<Option<SortColumn>>,
        sort_dir: Query<Option<SortDirection>>,
    ) -> Result<Json<Vec<AdminItemResponse>>, AdminError> {
        self.authorize(&auth)?;

        let items = self
            .items
            .fetch_all(include_archived.0.unwrap_or(false))
            .await?;

        let query = ListingQuery {
            search: search.0,
            status: status.0,
            sort: sort_by.0.map(|column| {
                let mut sort = SortState::new(column);
                if let Some(direction) = sort_dir.0 {
                    sort.direction = direction;
                }
                sort
            }),
            match_contacts: true,
        };

        listing::filter_and_sort(items, &query)
            .iter()
            .map(AdminItemResponse::from_model)
            .collect::<Result<Vec<_>, _>>()
            .map(Json)
            .map_err(AdminError::from)
    }

    /// Add a new found item
    ///
    /// Takes the description and the raw photo; both image variants are
    /// prepared and uploaded before the record is written.
    #[oai(path = "/items", method = "post", tag = "AdminTags::Admin")]
    async fn create(
        &self,
        auth: AdminAuth,
        form: CreateItemForm,
    ) -> Result<Json<AdminItemResponse>, AdminError> {
        self.authorize(&auth)?;

        let description = form.description.trim().to_string();
        if description.is_empty() {
            return Err(AdminError::validation("Description is required"));
        }

        let image_bytes = form
            .image
            .into_vec()
            .await
            .map_err(|_| AdminError::validation("Image upload could not be read"))?;
        if image_bytes.is_empty() {
            return Err(AdminError::validation("An image is required"));
        }

        let prepared = services::prepare(&image_bytes)?;
        let inserted = self
            .items
            .insert(&description, &prepared.image, &prepared.thumbnail)
            .await?;

        AdminItemResponse::from_model(&inserted)
            .map(Json)
            .map_err(AdminError::from)
    }

    /// Mark an item as retrieved by its owner
    ///
    /// Legal from `to_collect` or `reserved`; the retriever's name and
    /// email are recorded, and any earlier reserver details are kept.
    #[oai(path = "/items/:id/retrieve", method = "post", tag = "AdminTags::Admin")]
    async fn retrieve(
        &self,
        auth: AdminAuth,
        id: Path<String>,
        body: Json<RetrieveRequest>,
    ) -> Result<Json<OkResponse>, AdminError> {
        self.authorize(&auth)?;

        let name = body.name.trim();
        if name.is_empty() {
            return Err(AdminError::validation("Retriever name is required"));
        }
        if !is_well_formed_email(&body.email) {
            return Err(AdminError::validation("A valid retriever email is required"));
        }

        let item = self.items.get(&id.0).await?;
        let current = item.item_status()?;
        if !current.can_transition(ItemStatus::Retrieved, Actor::Admin) {
            return Err(AdminError::illegal_transition(format!(
                "Item cannot be retrieved while {current}"
            )));
        }

        self.items
            .update_status(&id.0, ItemStatus::Retrieved, Some((name, &body.email)))
            .await?;
        Ok(Json(OkResponse::new()))
    }

    /// Administrative status override
    ///
    /// Toggles an item between `to_collect` and `reserved` without going
    /// through the reservation form (no reserver details are captured).
    /// Retrieval must use the retrieve operation so contact details are
    /// recorded.
    #[oai(path = "/items/:id/status", method = "post", tag = "AdminTags::Admin")]
    async fn set_status(
        &self,
        auth: AdminAuth,
        id: Path<String>,
        body: Json<SetStatusRequest>,
    ) -> Result<Json<OkResponse>, AdminError> {
        self.authorize(&auth)?;

        if !matches!(body.status, ItemStatus::ToCollect | ItemStatus::Reserved) {
            return Err(AdminError::illegal_transition(
                "Only the to_collect/reserved toggle can be set directly",
            ));
        }

        let item = self.items.get(&id.0).await?;
        let current = item.item_status()?;
        if !current.can_transition(body.status, Actor::Admin) {
            return Err(AdminError::illegal_transition(format!(
                "Cannot move item from {current} to {}",
                body.status
            )));
        }

        self.items.update_status(&id.0, body.status, None).await?;
        Ok(Json(OkResponse::new()))
    }

    /// Archive an item
    ///
    /// One-way; legal once an item is retrieved or expired. Archiving an
    /// already-archived item succeeds without effect.
    #[oai(path = "/items/:id/archive", method = "post", tag = "AdminTags::Admin")]
    async fn archive(
        &self,
        auth: AdminAuth,
        id: Path<String>,
    ) -> Result<Json<OkResponse>, AdminError> {
        self.authorize(&auth)?;

        let item = self.items.get(&id.0).await?;
        let current = item.item_status()?;
        if !matches!(current, ItemStatus::Retrieved | ItemStatus::Expired) {
            return Err(AdminError::illegal_transition(format!(
                "Only retrieved or expired items can be archived, item is {current}"
            )));
        }

        self.items.archive(&id.0).await?;
        Ok(Json(OkResponse::new()))
    }

    /// Permanently delete an item
    ///
    /// Removes the record and, best-effort, its image blobs. Responds 404
    /// when the item is already gone, e.g. after losing a race against
    /// another administrator.
    #[oai(path = "/items/:id", method = "delete", tag = "AdminTags::Admin")]
    async fn delete(
        &self,
        auth: AdminAuth,
        id: Path<String>,
    ) -> Result<Json<OkResponse>, AdminError> {
        self.authorize(&auth)?;

        self.items.delete(&id.0).await?;
        Ok(Json(OkResponse::new()))
    }
}
