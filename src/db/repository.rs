use crate::{
    error::AppResult,
    models::{Recommendation, RecommendationType},
};

/// Single-column equality filter over the recommendations table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationFilter {
    Name(String),
    RecommendationName(String),
    SourcePid(i64),
    Type(RecommendationType),
}

impl RecommendationFilter {
    /// Column the filter compares against
    pub fn column(&self) -> &'static str {
        match self {
            RecommendationFilter::Name(_) => "name",
            RecommendationFilter::RecommendationName(_) => "recommendation_name",
            RecommendationFilter::SourcePid(_) => "source_pid",
            RecommendationFilter::Type(_) => "\"type\"",
        }
    }

    pub fn matches(&self, recommendation: &Recommendation) -> bool {
        match self {
            RecommendationFilter::Name(name) => recommendation.name == *name,
            RecommendationFilter::RecommendationName(name) => {
                recommendation.recommendation_name == *name
            }
            RecommendationFilter::SourcePid(pid) => recommendation.source_pid == *pid,
            RecommendationFilter::Type(kind) => recommendation.kind == *kind,
        }
    }
}

/// Data-access abstraction for recommendations
///
/// Owns the mapping between [`Recommendation`] values and persisted rows. Every
/// method is a single storage operation; nothing is retried and there is no
/// cross-call transaction, so concurrent read-modify-write sequences on the same
/// row resolve as last writer wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationRepository: Send + Sync {
    /// Persists a new row and returns it with a fresh identity.
    ///
    /// Any identity already set on `recommendation` is discarded.
    async fn create(&self, recommendation: Recommendation) -> AppResult<Recommendation>;

    /// Writes every non-identity field of an already persisted recommendation.
    ///
    /// Fails with `Internal` when `rec_id` is unset and `NotFound` when no row
    /// carries that identity.
    async fn update(&self, recommendation: &Recommendation) -> AppResult<Recommendation>;

    /// Removes the row for the recommendation's identity
    async fn delete(&self, recommendation: &Recommendation) -> AppResult<()>;

    /// Looks up a single row by primary key
    async fn find(&self, rec_id: i64) -> AppResult<Option<Recommendation>>;

    /// Every row, ordered by identity
    async fn all(&self) -> AppResult<Vec<Recommendation>>;

    /// Rows matching one equality filter, ordered by identity
    async fn find_by(&self, filter: &RecommendationFilter) -> AppResult<Vec<Recommendation>>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_matches_only_its_column() {
        let rec = Recommendation::new(3, "Laptop", "Mouse", RecommendationType::Accessory);

        assert!(RecommendationFilter::Name("Laptop".to_string()).matches(&rec));
        assert!(!RecommendationFilter::Name("Mouse".to_string()).matches(&rec));
        assert!(RecommendationFilter::RecommendationName("Mouse".to_string()).matches(&rec));
        assert!(RecommendationFilter::SourcePid(3).matches(&rec));
        assert!(!RecommendationFilter::SourcePid(4).matches(&rec));
        assert!(RecommendationFilter::Type(RecommendationType::Accessory).matches(&rec));
        assert!(!RecommendationFilter::Type(RecommendationType::UpSell).matches(&rec));
    }

    #[test]
    fn test_name_filter_is_exact() {
        let rec = Recommendation::new(3, "Laptop", "Mouse", RecommendationType::Accessory);
        assert!(!RecommendationFilter::Name("laptop".to_string()).matches(&rec));
        assert!(!RecommendationFilter::Name("Lap".to_string()).matches(&rec));
    }
}
