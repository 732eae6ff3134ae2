use std::collections::BTreeMap;

use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::Recommendation,
};

use super::{RecommendationFilter, RecommendationRepository};

/// Process-local recommendation storage
///
/// Used when no database is configured and by the test suites. Identities
/// start at 1 and are never reused, even after deletes.
pub struct MemoryRecommendationRepository {
    inner: RwLock<MemoryInner>,
}

struct MemoryInner {
    rows: BTreeMap<i64, Recommendation>,
    next_id: i64,
}

impl Default for MemoryRecommendationRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRecommendationRepository {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryInner {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

fn not_found(rec_id: i64) -> AppError {
    AppError::NotFound(format!("Recommendation with id '{rec_id}' was not found."))
}

#[async_trait::async_trait]
impl RecommendationRepository for MemoryRecommendationRepository {
    async fn create(&self, mut recommendation: Recommendation) -> AppResult<Recommendation> {
        let mut inner = self.inner.write().await;

        let rec_id = inner.next_id;
        inner.next_id += 1;
        recommendation.rec_id = Some(rec_id);
        inner.rows.insert(rec_id, recommendation.clone());

        tracing::info!(rec_id, name = %recommendation.recommendation_name, "Created recommendation");
        Ok(recommendation)
    }

    async fn update(&self, recommendation: &Recommendation) -> AppResult<Recommendation> {
        let rec_id = recommendation.rec_id.ok_or_else(|| {
            AppError::Internal("cannot update a recommendation without rec_id".to_string())
        })?;

        let mut inner = self.inner.write().await;
        let row = inner.rows.get_mut(&rec_id).ok_or_else(|| not_found(rec_id))?;
        *row = recommendation.clone();

        tracing::info!(rec_id, name = %recommendation.recommendation_name, "Saved recommendation");
        Ok(recommendation.clone())
    }

    async fn delete(&self, recommendation: &Recommendation) -> AppResult<()> {
        let rec_id = recommendation.rec_id.ok_or_else(|| {
            AppError::Internal("cannot delete a recommendation without rec_id".to_string())
        })?;

        let mut inner = self.inner.write().await;
        inner.rows.remove(&rec_id).ok_or_else(|| not_found(rec_id))?;

        tracing::info!(rec_id, name = %recommendation.recommendation_name, "Deleted recommendation");
        Ok(())
    }

    async fn find(&self, rec_id: i64) -> AppResult<Option<Recommendation>> {
        let inner = self.inner.read().await;
        Ok(inner.rows.get(&rec_id).cloned())
    }

    async fn all(&self) -> AppResult<Vec<Recommendation>> {
        let inner = self.inner.read().await;
        Ok(inner.rows.values().cloned().collect())
    }

    async fn find_by(&self, filter: &RecommendationFilter) -> AppResult<Vec<Recommendation>> {
        let inner = self.inner.read().await;
        Ok(inner
            .rows
            .values()
            .filter(|rec| filter.matches(rec))
            .cloned()
            .collect())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecommendationType;

    fn sample(source_pid: i64, kind: RecommendationType) -> Recommendation {
        Recommendation::new(source_pid, "Laptop", "Sleeve", kind)
    }

    #[tokio::test]
    async fn test_create_assigns_fresh_identity() {
        let repo = MemoryRecommendationRepository::new();

        let mut rec = sample(1, RecommendationType::CrossSell);
        rec.rec_id = Some(500);

        let first = repo.create(rec.clone()).await.unwrap();
        let second = repo.create(rec).await.unwrap();

        assert_eq!(first.rec_id, Some(1));
        assert_eq!(second.rec_id, Some(2));
    }

    #[tokio::test]
    async fn test_identities_are_not_reused_after_delete() {
        let repo = MemoryRecommendationRepository::new();
        let first = repo.create(sample(1, RecommendationType::CrossSell)).await.unwrap();
        repo.delete(&first).await.unwrap();

        let second = repo.create(sample(1, RecommendationType::CrossSell)).await.unwrap();
        assert_eq!(second.rec_id, Some(2));
    }

    #[tokio::test]
    async fn test_find_returns_none_when_absent() {
        let repo = MemoryRecommendationRepository::new();
        assert_eq!(repo.find(42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_requires_identity() {
        let repo = MemoryRecommendationRepository::new();
        let result = repo.update(&sample(1, RecommendationType::UpSell)).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_update_unknown_identity_is_not_found() {
        let repo = MemoryRecommendationRepository::new();
        let mut rec = sample(1, RecommendationType::UpSell);
        rec.rec_id = Some(9);
        assert!(matches!(repo.update(&rec).await, Err(AppError::NotFound(_))));
        assert!(repo.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_persists_in_place() {
        let repo = MemoryRecommendationRepository::new();
        let mut rec = repo.create(sample(1, RecommendationType::UpSell)).await.unwrap();

        rec.name = "Desktop".to_string();
        rec.like();
        repo.update(&rec).await.unwrap();

        let stored = repo.find(rec.rec_id.unwrap()).await.unwrap().unwrap();
        assert_eq!(stored.name, "Desktop");
        assert_eq!(stored.number_of_likes, 1);
    }

    #[tokio::test]
    async fn test_delete_twice_reports_not_found() {
        let repo = MemoryRecommendationRepository::new();
        let rec = repo.create(sample(1, RecommendationType::UpSell)).await.unwrap();

        repo.delete(&rec).await.unwrap();
        assert!(matches!(repo.delete(&rec).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_filters_on_one_field() {
        let repo = MemoryRecommendationRepository::new();
        repo.create(sample(0, RecommendationType::CrossSell)).await.unwrap();
        repo.create(sample(0, RecommendationType::Accessory)).await.unwrap();
        repo.create(sample(1, RecommendationType::Accessory)).await.unwrap();

        let by_pid = repo
            .find_by(&RecommendationFilter::SourcePid(0))
            .await
            .unwrap();
        assert_eq!(by_pid.len(), 2);
        assert!(by_pid.iter().all(|r| r.source_pid == 0));

        let by_type = repo
            .find_by(&RecommendationFilter::Type(RecommendationType::Accessory))
            .await
            .unwrap();
        let ids: Vec<_> = by_type.iter().filter_map(|r| r.rec_id).collect();
        assert_eq!(ids, vec![2, 3]);
    }
}
