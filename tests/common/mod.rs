// Common test utilities for integration tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use tempfile::TempDir;
use uuid::Uuid;

use lostfound_backend::errors::NotificationError;
use lostfound_backend::lifecycle::ItemStatus;
use lostfound_backend::services::ReservationNotifier;
use lostfound_backend::stores::{BlobStore, ItemStore};
use lostfound_backend::types::db::item;

pub const RETENTION_DAYS: i64 = 30;
pub const GRACE_DAYS: i64 = 1;

/// Creates a test database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Notifier double: records every call, optionally failing each one.
pub struct RecordingNotifier {
    pub calls: Mutex<Vec<(String, String, String)>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl ReservationNotifier for RecordingNotifier {
    async fn reservation_created(
        &self,
        item_description: &str,
        reserved_by_name: &str,
        reserved_by_email: &str,
    ) -> Result<(), NotificationError> {
        self.calls.lock().unwrap().push((
            item_description.to_string(),
            reserved_by_name.to_string(),
            reserved_by_email.to_string(),
        ));
        if self.fail {
            return Err(NotificationError::Rejected {
                status: 500,
                body: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}

/// Everything an item store test needs; the temp dir must stay alive for
/// the duration of the test.
pub struct TestContext {
    pub db: DatabaseConnection,
    pub store: Arc<ItemStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub media_dir: TempDir,
}

pub async fn setup_store() -> TestContext {
    setup_store_with(RecordingNotifier::new()).await
}

pub async fn setup_store_with(notifier: RecordingNotifier) -> TestContext {
    let db = setup_test_db().await;
    let media_dir = TempDir::new().expect("Failed to create media dir");
    let blobs = Arc::new(BlobStore::new(media_dir.path(), "http://localhost:3000"));
    let notifier = Arc::new(notifier);

    let store = Arc::new(ItemStore::new(
        db.clone(),
        blobs,
        notifier.clone(),
        RETENTION_DAYS,
        GRACE_DAYS,
    ));

    TestContext {
        db,
        store,
        notifier,
        media_dir,
    }
}

/// Insert a record directly with an arbitrary creation time, bypassing the
/// store, so expiry behavior can be exercised against real timestamps.
pub async fn insert_backdated(
    db: &DatabaseConnection,
    description: &str,
    status: ItemStatus,
    created_at: i64,
) -> String {
    let id = Uuid::new_v4().to_string();
    let model = item::ActiveModel {
        id: Set(id.clone()),
        description: Set(description.to_string()),
        image_url: Set(format!("http://localhost:3000/media/{id}.jpg")),
        thumbnail_url: Set(None),
        status: Set(status.as_str().to_string()),
        created_at: Set(created_at),
        reserved_by_name: Set(None),
        reserved_by_email: Set(None),
        retrieved_by_name: Set(None),
        retrieved_by_email: Set(None),
        is_archived: Set(false),
    };
    model.insert(db).await.expect("Failed to insert test item");
    id
}

pub fn days_ago(days: i64) -> i64 {
    chrono::Utc::now().timestamp() - days * 24 * 60 * 60
}
