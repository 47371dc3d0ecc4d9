//! PostgreSQL repository tests. Run with `DATABASE_URL` set and `--ignored`.

use linkshrink::domain::entities::NewLink;
use linkshrink::domain::repositories::{LinkRepository, StatsRepository};
use linkshrink::error::AppError;
use linkshrink::infrastructure::persistence::{PgLinkRepository, PgStatsRepository};
use sqlx::PgPool;
use std::sync::Arc;

fn new_link(code: &str, url: &str) -> NewLink {
    NewLink {
        code: code.to_string(),
        original_url: url.to_string(),
    }
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_insert_link(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo
        .insert(new_link("test123", "https://example.com"))
        .await
        .unwrap();

    assert_eq!(link.code, "test123");
    assert_eq!(link.original_url, "https://example.com");
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_find_by_code(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    let created = repo
        .insert(new_link("abc1234", "https://example.com/x"))
        .await
        .unwrap();

    let found = repo.find_by_code("abc1234").await.unwrap();

    assert_eq!(found, Some(created));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_find_by_code_not_found(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert!(repo.find_by_code("nonexistent").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_duplicate_code_conflicts(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    repo.insert(new_link("dup0001", "https://first.example"))
        .await
        .unwrap();

    let err = repo
        .insert(new_link("dup0001", "https://second.example"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict { .. }));
    let stored = repo.find_by_code("dup0001").await.unwrap().unwrap();
    assert_eq!(stored.original_url, "https://first.example");
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_health_check(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    assert!(repo.health_check().await);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL"]
async fn test_click_counters_accumulate(pool: PgPool) {
    let repo = PgStatsRepository::new(Arc::new(pool));

    assert_eq!(repo.click_count("abc1234").await.unwrap(), 0);
    repo.increment_clicks("abc1234", 2).await.unwrap();
    repo.increment_clicks("abc1234", 5).await.unwrap();

    assert_eq!(repo.click_count("abc1234").await.unwrap(), 7);
}
