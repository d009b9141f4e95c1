//! Sole point of contact with durable item storage.
//!
//! Consistency model is mutate-then-refetch: callers follow every mutator
//! with a fresh [`ItemStore::fetch_all`] instead of patching local state,
//! so there is no cache to invalidate. Transition legality is enforced by
//! the caller against the lifecycle model; the store executes what it is
//! told (except expiry, which it detects itself during fetch).

use std::sync::Arc;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::{InternalError, ItemError, NotificationError};
use crate::lifecycle::{self, ItemStatus};
use crate::services::ReservationNotifier;
use crate::stores::BlobStore;
use crate::types::db::item;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Result of a reservation: the reservation itself always succeeded, but
/// the operator email may not have gone out.
#[derive(Debug)]
pub enum ReserveOutcome {
    NotificationSent,
    NotificationFailed(NotificationError),
}

pub struct ItemStore {
    db: DatabaseConnection,
    blobs: Arc<BlobStore>,
    notifier: Arc<dyn ReservationNotifier>,
    retention_days: i64,
    grace_days: i64,
}

fn image_key(id: &str) -> String {
    format!("{id}.jpg")
}

fn thumbnail_key(id: &str) -> String {
    format!("thumbnails/{id}.jpg")
}

impl ItemStore {
    pub fn new(
        db: DatabaseConnection,
        blobs: Arc<BlobStore>,
        notifier: Arc<dyn ReservationNotifier>,
        retention_days: i64,
        grace_days: i64,
    ) -> Self {
        Self {
            db,
            blobs,
            notifier,
            retention_days,
            grace_days,
        }
    }

    /// Fetch all items, newest first.
    ///
    /// Expired items older than the grace window are excluded: rows already
    /// persisted as `Expired` at the query level (expiry time is a pure
    /// function of `created_at`, so the cutoff translates to a single
    /// `created_at` bound), rows flipped during this fetch by a final retain
    /// on the same cutoff. Items that outlived the retention window since
    /// the last fetch are flipped to `Expired` here: the new status is
    /// persisted best-effort and the returned copy is updated either way,
    /// even when the item is already past the grace window and therefore
    /// dropped from the result. A persisted flip cannot be detected again,
    /// so each item is written at most once.
    pub async fn fetch_all(&self, include_archived: bool) -> Result<Vec<item::Model>, InternalError> {
        let now = Utc::now().timestamp();
        let stale_cutoff = now - (self.retention_days + self.grace_days) * SECONDS_PER_DAY;

        let mut query = item::Entity::find()
            .filter(
                Condition::any()
                    .add(item::Column::Status.ne(ItemStatus::Expired.as_str()))
                    .add(item::Column::CreatedAt.gt(stale_cutoff)),
            )
            .order_by_desc(item::Column::CreatedAt);
        if !include_archived {
            query = query.filter(item::Column::IsArchived.eq(false));
        }

        let mut items = query
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("fetch_items", e))?;

        for model in items.iter_mut() {
            if model.status == ItemStatus::ToCollect.as_str()
                && lifecycle::is_expired(model.created_at, now, self.retention_days)
            {
                let persisted = item::Entity::update_many()
                    .col_expr(item::Column::Status, Expr::value(ItemStatus::Expired.as_str()))
                    .filter(item::Column::Id.eq(model.id.as_str()))
                    .exec(&self.db)
                    .await;
                if let Err(e) = persisted {
                    tracing::warn!(item = %model.id, error = %e, "failed to persist expiry");
                }
                model.status = ItemStatus::Expired.as_str().to_string();
            }
        }

        items.retain(|m| {
            m.status != ItemStatus::Expired.as_str()
                || now
                    <= lifecycle::visibility_cutoff(
                        m.created_at,
                        self.retention_days,
                        self.grace_days,
                    )
        });

        Ok(items)
    }

    /// Fetch a single item by id.
    pub async fn get(&self, id: &str) -> Result<item::Model, InternalError> {
        item::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_item", e))?
            .ok_or_else(|| ItemError::NotFound(id.to_string()).into())
    }

    /// Insert a new item with both image variants already prepared.
    ///
    /// Blob uploads come first: a failed upload aborts the insert before
    /// any record is written, so no record ever points at a missing image.
    pub async fn insert(
        &self,
        description: &str,
        image: &[u8],
        thumbnail: &[u8],
    ) -> Result<item::Model, InternalError> {
        let id = Uuid::new_v4().to_string();

        let image_url = self.blobs.put(&image_key(&id), image).await?;
        let thumbnail_url = self.blobs.put(&thumbnail_key(&id), thumbnail).await?;

        let model = item::ActiveModel {
            id: Set(id.clone()),
            description: Set(description.to_owned()),
            image_url: Set(image_url),
            thumbnail_url: Set(Some(thumbnail_url)),
            status: Set(ItemStatus::ToCollect.as_str().to_owned()),
            created_at: Set(Utc::now().timestamp()),
            reserved_by_name: Set(None),
            reserved_by_email: Set(None),
            retrieved_by_name: Set(None),
            retrieved_by_email: Set(None),
            is_archived: Set(false),
        };

        let inserted = model
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_item", e))?;

        tracing::info!(item = %inserted.id, "item created");
        Ok(inserted)
    }

    /// Set an item's status and, when it becomes `Retrieved`, the
    /// retriever's contact details. Does not check transition legality.
    pub async fn update_status(
        &self,
        id: &str,
        status: ItemStatus,
        retrieved_by: Option<(&str, &str)>,
    ) -> Result<(), InternalError> {
        let mut update = item::Entity::update_many()
            .col_expr(item::Column::Status, Expr::value(status.as_str()))
            .filter(item::Column::Id.eq(id));

        if let Some((name, email)) = retrieved_by {
            update = update
                .col_expr(item::Column::RetrievedByName, Expr::value(name))
                .col_expr(item::Column::RetrievedByEmail, Expr::value(email));
        }

        let result = update
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("update_status", e))?;
        if result.rows_affected == 0 {
            return Err(ItemError::NotFound(id.to_string()).into());
        }

        tracing::info!(item = id, status = %status, "status updated");
        Ok(())
    }

    /// Reserve an item: set status and reserver details, then notify the
    /// operator. The notification is best-effort; its failure is reported
    /// in the outcome but the reservation stands.
    pub async fn reserve(
        &self,
        id: &str,
        name: &str,
        email: &str,
    ) -> Result<ReserveOutcome, InternalError> {
        // Also surfaces not-found before any write
        let existing = self.get(id).await?;

        let result = item::Entity::update_many()
            .col_expr(item::Column::Status, Expr::value(ItemStatus::Reserved.as_str()))
            .col_expr(item::Column::ReservedByName, Expr::value(name))
            .col_expr(item::Column::ReservedByEmail, Expr::value(email))
            .filter(item::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("reserve_item", e))?;
        if result.rows_affected == 0 {
            // Lost a race against a delete
            return Err(ItemError::NotFound(id.to_string()).into());
        }

        tracing::info!(item = id, "item reserved");

        match self
            .notifier
            .reservation_created(&existing.description, name, email)
            .await
        {
            Ok(()) => Ok(ReserveOutcome::NotificationSent),
            Err(e) => {
                tracing::warn!(item = id, error = %e, "reservation email failed");
                Ok(ReserveOutcome::NotificationFailed(e))
            }
        }
    }

    /// Archive an item. One-way and idempotent.
    pub async fn archive(&self, id: &str) -> Result<(), InternalError> {
        let result = item::Entity::update_many()
            .col_expr(item::Column::IsArchived, Expr::value(true))
            .filter(item::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("archive_item", e))?;
        if result.rows_affected == 0 {
            return Err(ItemError::NotFound(id.to_string()).into());
        }

        tracing::info!(item = id, "item archived");
        Ok(())
    }

    /// Permanently delete an item and, best-effort, its blobs.
    pub async fn delete(&self, id: &str) -> Result<(), InternalError> {
        let result = item::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_item", e))?;
        if result.rows_affected == 0 {
            return Err(ItemError::NotFound(id.to_string()).into());
        }

        for key in [image_key(id), thumbnail_key(id)] {
            if let Err(e) = self.blobs.delete(&key).await {
                tracing::warn!(item = id, key, error = %e, "failed to delete blob");
            }
        }

        tracing::info!(item = id, "item deleted");
        Ok(())
    }
}
