use std::sync::Arc;

use poem_openapi::param::{Path, Query};
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::is_well_formed_email;
use crate::errors::ItemsError;
use crate::lifecycle::{Actor, ItemStatus};
use crate::listing::{self, ListingQuery, SortColumn, SortDirection, SortState};
use crate::stores::{ItemStore, ReserveOutcome};
use crate::types::dto::items::{PublicItemResponse, ReserveRequest, ReserveResponse};

/// Public items API: browse the visible set and reserve an item.
pub struct ItemsApi {
    items: Arc<ItemStore>,
}

impl ItemsApi {
    pub fn new(items: Arc<ItemStore>) -> Self {
        Self { items }
    }
}

/// API tags for item endpoints
#[derive(Tags)]
enum ApiTags {
    /// Public item browsing and reservation
    Items,
}

#[OpenApi]
impl ItemsApi {
    /// List items visible to the public
    ///
    /// Returns unarchived items still waiting for their owner
    /// (`to_collect` or `reserved`), newest first unless a sort is
    /// selected. `search` is fuzzy-matched against descriptions.
    #[oai(path = "/items", method = "get", tag = "ApiTags::Items")]
    async fn list(
        &self,
        search: Query<Option<String>>,
        status: Query<Option<ItemStatus>>,
        sort_by: Query<Option<SortColumn>>,
        sort_dir: Query<Option<SortDirection>>,
    ) -> Result<Json<Vec<PublicItemResponse>>, ItemsError> {
        let mut items = self.items.fetch_all(false).await?;
        items.retain(|m| {
            m.status == ItemStatus::ToCollect.as_str() || m.status == ItemStatus::Reserved.as_str()
        });

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
            match_contacts: false,
        };

        listing::filter_and_sort(items, &query)
            .iter()
            .map(PublicItemResponse::from_model)
            .collect::<Result<Vec<_>, _>>()
            .map(Json)
            .map_err(ItemsError::from)
    }

    /// Reserve an item
    ///
    /// Legal only while the item is still `to_collect`. Sets the reserver's
    /// contact details and emails the operator; a failed email is reported
    /// in the response but never undoes the reservation.
    #[oai(path = "/items/:id/reserve", method = "post", tag = "ApiTags::Items")]
    async fn reserve(
        &self,
        id: Path<String>,
        body: Json<ReserveRequest>,
    ) -> Result<Json<ReserveResponse>, ItemsError> {
        let name = body.name.trim();
        if name.is_empty() {
            return Err(ItemsError::validation("Reserver name is required"));
        }
        if !is_well_formed_email(&body.email) {
            return Err(ItemsError::validation("A valid reserver email is required"));
        }

        let item = self.items.get(&id.0).await?;
        let current = item.item_status()?;
        if !current.can_transition(ItemStatus::Reserved, Actor::Visitor) {
            return Err(ItemsError::illegal_transition(format!(
                "Item cannot be reserved while {current}"
            )));
        }

        let outcome = self.items.reserve(&id.0, name, &body.email).await?;
        Ok(Json(ReserveResponse {
            notification_sent: matches!(outcome, ReserveOutcome::NotificationSent),
        }))
    }
}
