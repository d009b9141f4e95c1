use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Settings;
use crate::services::{DisabledNotifier, ResendNotifier, ReservationNotifier};
use crate::stores::{BlobStore, ItemStore};

/// Centralized application data, created once in main and shared across
/// the API implementations.
pub struct AppData {
    pub settings: Settings,
    pub db: DatabaseConnection,
    pub blob_store: Arc<BlobStore>,
    pub item_store: Arc<ItemStore>,
}

impl AppData {
    /// Wire up stores and services. The database should be connected and
    /// migrated before calling this.
    pub fn init(settings: Settings, db: DatabaseConnection) -> Self {
        let blob_store = Arc::new(BlobStore::new(
            settings.media_dir.clone(),
            settings.public_base_url.clone(),
        ));

        let notifier: Arc<dyn ReservationNotifier> = match settings.resend_api_key.clone() {
            Some(api_key) => Arc::new(ResendNotifier::new(
                api_key,
                settings.notify_from.clone(),
                settings.notify_to.clone(),
            )),
            None => Arc::new(DisabledNotifier),
        };

        let item_store = Arc::new(ItemStore::new(
            db.clone(),
            blob_store.clone(),
            notifier,
            settings.retention_days,
            settings.expiry_grace_days,
        ));

        Self {
            settings,
            db,
            blob_store,
            item_store,
        }
    }
}
