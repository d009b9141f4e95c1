mod common;

use sea_orm::EntityTrait;

use common::{days_ago, insert_backdated, setup_store};
use lostfound_backend::lifecycle::ItemStatus;
use lostfound_backend::types::db::item;

#[tokio::test]
async fn test_item_past_retention_expires_on_fetch() {
    let ctx = setup_store().await;
    let id = insert_backdated(&ctx.db, "Forgotten coat", ItemStatus::ToCollect, days_ago(31)).await;

    let items = ctx.store.fetch_all(false).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].status, ItemStatus::Expired.as_str());

    // The flip was persisted, not just patched in memory
    let stored = item::Entity::find_by_id(&id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ItemStatus::Expired.as_str());
}

#[tokio::test]
async fn test_item_within_retention_stays_collectable() {
    let ctx = setup_store().await;
    insert_backdated(&ctx.db, "Fresh find", ItemStatus::ToCollect, days_ago(29)).await;

    let items = ctx.store.fetch_all(false).await.unwrap();
    assert_eq!(items[0].status, ItemStatus::ToCollect.as_str());
}

#[tokio::test]
async fn test_reserved_items_never_expire() {
    let ctx = setup_store().await;
    insert_backdated(&ctx.db, "Long reserved", ItemStatus::Reserved, days_ago(40)).await;

    let items = ctx.store.fetch_all(false).await.unwrap();
    assert_eq!(items[0].status, ItemStatus::Reserved.as_str());
}

#[tokio::test]
async fn test_expired_item_stays_visible_through_grace_window() {
    let ctx = setup_store().await;
    // Expired half a day ago; grace window is one day
    let created_at = days_ago(30) - 12 * 60 * 60;
    insert_backdated(&ctx.db, "Just expired", ItemStatus::ToCollect, created_at).await;

    let items = ctx.store.fetch_all(false).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].status, ItemStatus::Expired.as_str());
}

#[tokio::test]
async fn test_expired_item_beyond_grace_is_excluded() {
    let ctx = setup_store().await;
    insert_backdated(&ctx.db, "Long gone", ItemStatus::Expired, days_ago(32)).await;

    assert!(ctx.store.fetch_all(false).await.unwrap().is_empty());
    // The archived filter does not bring it back either
    assert!(ctx.store.fetch_all(true).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_to_collect_item_beyond_grace_is_excluded_on_first_fetch() {
    let ctx = setup_store().await;
    // Never fetched since creation, so still stored as to_collect even
    // though retention plus grace elapsed long ago
    let id = insert_backdated(&ctx.db, "Ancient scarf", ItemStatus::ToCollect, days_ago(40)).await;

    assert!(ctx.store.fetch_all(false).await.unwrap().is_empty());
    assert!(ctx.store.fetch_all(true).await.unwrap().is_empty());

    // The expiry flip is persisted even though the item is never returned
    let stored = item::Entity::find_by_id(&id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ItemStatus::Expired.as_str());
}

#[tokio::test]
async fn test_expiry_write_happens_once_per_item() {
    let ctx = setup_store().await;
    let id = insert_backdated(&ctx.db, "Old umbrella", ItemStatus::ToCollect, days_ago(31)).await;

    // First fetch detects and persists the transition
    ctx.store.fetch_all(false).await.unwrap();
    let stored = item::Entity::find_by_id(&id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ItemStatus::Expired.as_str());

    // A second fetch sees the persisted status; the item is no longer a
    // candidate for detection and is simply reported as expired
    let items = ctx.store.fetch_all(false).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].status, ItemStatus::Expired.as_str());
}
