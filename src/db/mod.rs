pub mod memory;
pub mod postgres;
pub mod repository;

pub use memory::MemoryRecommendationRepository;
pub use postgres::{create_pool, run_migrations, PgRecommendationRepository};
pub use repository::{RecommendationFilter, RecommendationRepository};
