pub mod recommendation;

pub use recommendation::{Recommendation, RecommendationType, ValidationError, MAX_NAME_LEN};
