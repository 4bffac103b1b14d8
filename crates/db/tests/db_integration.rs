//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `chattr_test`)
//!   `TEST_DB_PASSWORD` (default: `chattr_test`)
//!   `TEST_DB_NAME` (default: `chattr_test`)

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chattr_db::entities::{channel, message, profile, thread_message};
use chattr_db::repositories::{
    ChannelRepository, MessageRepository, ProfileRepository, ThreadMessageRepository,
};
use chattr_db::test_utils::{TestDatabase, TestDbConfig};
use chrono::Utc;
use sea_orm::Set;

fn profile_model(id: &str, email: &str) -> profile::ActiveModel {
    profile::ActiveModel {
        id: Set(id.to_string()),
        name: Set("Test User".to_string()),
        email: Set(email.to_string()),
        image_url: Set("https://example.com/a.png".to_string()),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_channel_message_thread_flow() {
    let db = TestDatabase::create_unique().await.unwrap();
    chattr_db::migrate(db.connection()).await.unwrap();

    let conn = Arc::new(db.conn.clone());
    let profiles = ProfileRepository::new(Arc::clone(&conn));
    let channels = ChannelRepository::new(Arc::clone(&conn));
    let messages = MessageRepository::new(Arc::clone(&conn));
    let threads = ThreadMessageRepository::new(Arc::clone(&conn));

    let author = profiles
        .create(profile_model("p1", "p1@example.com"))
        .await
        .unwrap();

    let channel = channels
        .create(channel::ActiveModel {
            id: Set("ch1".to_string()),
            name: Set("general".to_string()),
            description: Set(None),
            created_by_id: Set(author.id.clone()),
            is_private: Set(false),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        })
        .await
        .unwrap();

    let msg = messages
        .create(message::ActiveModel {
            id: Set("m1".to_string()),
            content: Set("hello".to_string()),
            channel_id: Set(channel.id.clone()),
            profile_id: Set(author.id.clone()),
            has_thread: Set(false),
            files: Set(None),
            client_token: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        })
        .await
        .unwrap();

    // Reply sets the parent flag in the same transaction
    let reply = threads
        .create(thread_message::ActiveModel {
            id: Set("t1".to_string()),
            content: Set("a reply".to_string()),
            message_id: Set(msg.id.clone()),
            profile_id: Set(author.id.clone()),
            files: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        })
        .await
        .unwrap();

    let parent = messages.get_by_id(&msg.id).await.unwrap();
    assert!(parent.has_thread);

    // Deleting the only reply clears the flag
    threads.delete(&reply.id, &msg.id).await.unwrap();
    let parent = messages.get_by_id(&msg.id).await.unwrap();
    assert!(!parent.has_thread);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_channel_delete_cascades_messages() {
    let db = TestDatabase::create_unique().await.unwrap();
    chattr_db::migrate(db.connection()).await.unwrap();

    let conn = Arc::new(db.conn.clone());
    let profiles = ProfileRepository::new(Arc::clone(&conn));
    let channels = ChannelRepository::new(Arc::clone(&conn));
    let messages = MessageRepository::new(Arc::clone(&conn));

    profiles
        .create(profile_model("p1", "p1@example.com"))
        .await
        .unwrap();

    channels
        .create(channel::ActiveModel {
            id: Set("ch1".to_string()),
            name: Set("ephemeral".to_string()),
            description: Set(None),
            created_by_id: Set("p1".to_string()),
            is_private: Set(false),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        })
        .await
        .unwrap();

    messages
        .create(message::ActiveModel {
            id: Set("m1".to_string()),
            content: Set("soon gone".to_string()),
            channel_id: Set("ch1".to_string()),
            profile_id: Set("p1".to_string()),
            has_thread: Set(false),
            files: Set(None),
            client_token: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        })
        .await
        .unwrap();

    channels.delete("ch1").await.unwrap();

    let orphan = messages.find_by_id("m1").await.unwrap();
    assert!(orphan.is_none());

    db.drop_database().await.unwrap();
}
