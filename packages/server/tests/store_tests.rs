//! Integration tests for the document store layer: upsert semantics,
//! conditional inserts, filters, and deletes.

mod common;

use common::TestHarness;
use serde_json::{json, Value};
use server_core::domains::{catalog, newsletter, orders, users, wishlist};
use server_core::kernel::store::Fields;
use test_context::test_context;

fn fields(value: Value) -> Fields {
    value.as_object().cloned().expect("literal is an object")
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_upsert_is_idempotent(ctx: &TestHarness) {
    let subscriptions = newsletter::collection(&ctx.db_pool);
    let doc = fields(json!({"email": "idempotent@store.test", "source": "footer"}));

    let first = subscriptions.upsert_by_key(doc.clone()).await.unwrap();
    let second = subscriptions.upsert_by_key(doc).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.fields, second.fields);

    let all = subscriptions
        .find(&fields(json!({"email": "idempotent@store.test"})))
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_upsert_merges_without_discarding_fields(ctx: &TestHarness) {
    let users = users::collection(&ctx.db_pool);

    users
        .upsert_by_key(fields(json!({"email": "merge@store.test", "name": "Sam"})))
        .await
        .unwrap();
    let merged = users
        .upsert_by_key(fields(json!({"email": "merge@store.test", "role": "admin"})))
        .await
        .unwrap();

    // The unrelated field survives the partial update.
    assert_eq!(merged.get_str("name"), Some("Sam"));
    assert_eq!(merged.get_str("role"), Some("admin"));

    let all = users
        .find(&fields(json!({"email": "merge@store.test"})))
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_upsert_overwrites_named_fields(ctx: &TestHarness) {
    let users = users::collection(&ctx.db_pool);

    users
        .upsert_by_key(fields(json!({"email": "overwrite@store.test", "name": "Sam"})))
        .await
        .unwrap();
    let merged = users
        .upsert_by_key(fields(json!({"email": "overwrite@store.test", "name": "Samantha"})))
        .await
        .unwrap();

    assert_eq!(merged.get_str("name"), Some("Samantha"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_insert_unique_dedupes_on_natural_key(ctx: &TestHarness) {
    let entries = wishlist::collection(&ctx.db_pool);
    let doc = fields(json!({
        "email": "unique@store.test",
        "product_id": "0123456789abcdef01234567",
    }));

    let first = entries.insert_unique(doc.clone()).await.unwrap();
    assert!(first.is_some());

    let second = entries.insert_unique(doc).await.unwrap();
    assert!(second.is_none());

    let all = entries
        .find(&fields(json!({"email": "unique@store.test"})))
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_plain_insert_allows_duplicates(ctx: &TestHarness) {
    let orders = orders::collection(&ctx.db_pool);
    let doc = fields(json!({"email": "dupes@store.test", "product_name": "ThinkPad"}));

    let first = orders.insert(doc.clone()).await.unwrap();
    let second = orders.insert(doc).await.unwrap();

    assert_ne!(first.id, second.id);

    let all = orders
        .find(&fields(json!({"email": "dupes@store.test"})))
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_find_filters_on_top_level_equality(ctx: &TestHarness) {
    let products = catalog::products(&ctx.db_pool);
    products
        .insert(fields(json!({"brand": "filter-brand-a", "owner": "find@store.test"})))
        .await
        .unwrap();
    products
        .insert(fields(json!({"brand": "filter-brand-b", "owner": "find@store.test"})))
        .await
        .unwrap();

    let matching = products
        .find(&fields(json!({"brand": "filter-brand-a"})))
        .await
        .unwrap();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].get_str("brand"), Some("filter-brand-a"));

    let none = products
        .find_one(&fields(json!({"brand": "filter-brand-missing"})))
        .await
        .unwrap();
    assert!(none.is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_update_by_id_is_exact_match(ctx: &TestHarness) {
    let products = catalog::products(&ctx.db_pool);

    let stored = products
        .insert(fields(json!({"name": "exact@store.test"})))
        .await
        .unwrap();
    let updated = products
        .update_by_id(&stored.id, fields(json!({"advertise": "yes"})))
        .await
        .unwrap()
        .expect("record exists");
    assert_eq!(updated.get_str("advertise"), Some("yes"));
    assert_eq!(updated.get_str("name"), Some("exact@store.test"));

    // A fresh id matches nothing and writes nothing.
    let missing = products
        .update_by_id(
            &"ffffffffffffffffffffffff".parse().unwrap(),
            fields(json!({"advertise": "yes"})),
        )
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_delete_one_removes_single_match(ctx: &TestHarness) {
    let orders = orders::collection(&ctx.db_pool);
    let filter = fields(json!({"email": "delete@store.test"}));

    orders
        .insert(fields(json!({"email": "delete@store.test", "item": "first"})))
        .await
        .unwrap();
    orders
        .insert(fields(json!({"email": "delete@store.test", "item": "second"})))
        .await
        .unwrap();

    assert!(orders.delete_one(&filter).await.unwrap());
    let remaining = orders.find(&filter).await.unwrap();
    assert_eq!(remaining.len(), 1);

    assert!(orders.delete_one(&filter).await.unwrap());
    assert!(!orders.delete_one(&filter).await.unwrap());
}
