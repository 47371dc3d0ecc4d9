//! Process-local link store.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Link store backed by a sharded concurrent map.
///
/// Used when no `DATABASE_URL` is configured and by the integration tests.
/// Insert goes through the entry API, which holds the shard lock for the
/// check and the write, so of two racing inserts on one code exactly one wins.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: DashMap<String, Link>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        match self.links.entry(new_link.code.clone()) {
            Entry::Occupied(_) => Err(AppError::conflict(
                "Short code already taken",
                json!({ "code": new_link.code }),
            )),
            Entry::Vacant(slot) => {
                let link = new_link.into_link();
                slot.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.links.get(code).map(|entry| entry.value().clone()))
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_link(code: &str, url: &str) -> NewLink {
        NewLink {
            code: code.to_string(),
            original_url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryLinkRepository::new();
        let link = repo
            .insert(new_link("abc1234", "https://example.com"))
            .await
            .unwrap();

        let found = repo.find_by_code("abc1234").await.unwrap();
        assert_eq!(found, Some(link));
    }

    #[tokio::test]
    async fn test_find_unknown_returns_none() {
        let repo = InMemoryLinkRepository::new();
        assert!(repo.find_by_code("nothere").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_code_conflicts_and_keeps_original() {
        let repo = InMemoryLinkRepository::new();
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

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_inserts_have_single_winner() {
        let repo = Arc::new(InMemoryLinkRepository::new());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.insert(new_link("race001", &format!("https://example.com/{i}")))
                        .await
                })
            })
            .collect();

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                wins += 1;
            }
        }

        assert_eq!(wins, 1);
        assert_eq!(repo.len(), 1);
    }
}
