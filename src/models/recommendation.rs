use std::{fmt, str::FromStr};

use serde::Serialize;
use serde_json::{Map, Value};

/// Maximum length of the product name columns
pub const MAX_NAME_LEN: usize = 63;

/// Errors raised while turning client input into a [`Recommendation`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid Recommendation: missing {0}")]
    MissingField(&'static str),

    #[error("Invalid Recommendation: body of request contained bad or no data - Error message: {0}")]
    BadData(String),

    #[error("Invalid Recommendation: unknown type '{0}'")]
    UnknownType(String),

    #[error("Invalid Recommendation: {field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Invalid Recommendation: {0} must not be negative")]
    Negative(&'static str),
}

/// Relationship between the source product and the recommended one
///
/// Stored as a SMALLINT (0, 1, 2) and exchanged on the wire by its uppercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, sqlx::Type)]
#[repr(i16)]
pub enum RecommendationType {
    #[default]
    #[serde(rename = "CROSSSELL")]
    CrossSell = 0,
    #[serde(rename = "UPSELL")]
    UpSell = 1,
    #[serde(rename = "ACCESSORY")]
    Accessory = 2,
}

impl RecommendationType {
    pub const ALL: [RecommendationType; 3] = [
        RecommendationType::CrossSell,
        RecommendationType::UpSell,
        RecommendationType::Accessory,
    ];

    /// Canonical wire name
    pub fn name(&self) -> &'static str {
        match self {
            RecommendationType::CrossSell => "CROSSSELL",
            RecommendationType::UpSell => "UPSELL",
            RecommendationType::Accessory => "ACCESSORY",
        }
    }
}

impl fmt::Display for RecommendationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RecommendationType {
    type Err = ValidationError;

    /// Case-sensitive lookup by canonical name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ValidationError::UnknownType(s.to_string()))
    }
}

/// A link from a source product to a suggested related product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Recommendation {
    /// Server-assigned identity, `None` until first persisted
    pub rec_id: Option<i64>,
    pub source_pid: i64,
    pub name: String,
    pub recommendation_name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: RecommendationType,
    pub number_of_likes: i64,
    pub number_of_dislikes: i64,
}

impl Recommendation {
    /// Creates an unsaved recommendation with zeroed counters
    pub fn new(
        source_pid: i64,
        name: impl Into<String>,
        recommendation_name: impl Into<String>,
        kind: RecommendationType,
    ) -> Self {
        Self {
            rec_id: None,
            source_pid,
            name: name.into(),
            recommendation_name: recommendation_name.into(),
            kind,
            number_of_likes: 0,
            number_of_dislikes: 0,
        }
    }

    /// Builds an unsaved recommendation from a JSON document.
    ///
    /// Any `rec_id` present in `data` is ignored.
    pub fn from_value(data: &Value) -> Result<Self, ValidationError> {
        let mut recommendation = Self::new(0, "", "", RecommendationType::default());
        recommendation.apply(data)?;
        Ok(recommendation)
    }

    /// Overwrites every field except the identity with the contents of `data`.
    ///
    /// `name`, `source_pid`, `recommendation_name`, `number_of_likes` and
    /// `number_of_dislikes` are required; a missing or null `type` means
    /// CROSSSELL. Nothing is modified when validation fails.
    pub fn apply(&mut self, data: &Value) -> Result<(), ValidationError> {
        let map = data.as_object().ok_or_else(|| {
            ValidationError::BadData(format!("expected a JSON object, got {}", kind_of(data)))
        })?;

        let name = required_name(map, "name")?;
        let source_pid = required_integer(map, "source_pid")?;
        let recommendation_name = required_name(map, "recommendation_name")?;
        let number_of_likes = required_counter(map, "number_of_likes")?;
        let number_of_dislikes = required_counter(map, "number_of_dislikes")?;
        let kind = match map.get("type") {
            None | Some(Value::Null) => RecommendationType::CrossSell,
            Some(Value::String(s)) => s.parse()?,
            Some(other) => return Err(ValidationError::UnknownType(other.to_string())),
        };

        self.name = name;
        self.source_pid = source_pid;
        self.recommendation_name = recommendation_name;
        self.number_of_likes = number_of_likes;
        self.number_of_dislikes = number_of_dislikes;
        self.kind = kind;
        Ok(())
    }

    /// True when both records carry the same persisted identity
    pub fn same_entity(&self, other: &Recommendation) -> bool {
        matches!((self.rec_id, other.rec_id), (Some(a), Some(b)) if a == b)
    }

    pub fn like(&mut self) {
        self.number_of_likes = self.number_of_likes.saturating_add(1);
    }

    pub fn dislike(&mut self) {
        self.number_of_dislikes = self.number_of_dislikes.saturating_add(1);
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rec_id {
            Some(id) => write!(f, "<Recommendation {} id=[{}]>", self.recommendation_name, id),
            None => write!(f, "<Recommendation {} id=[None]>", self.recommendation_name),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn required<'a>(map: &'a Map<String, Value>, key: &'static str) -> Result<&'a Value, ValidationError> {
    match map.get(key) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(key)),
        Some(value) => Ok(value),
    }
}

fn required_name(map: &Map<String, Value>, key: &'static str) -> Result<String, ValidationError> {
    let value = required(map, key)?
        .as_str()
        .ok_or_else(|| ValidationError::BadData(format!("{key} must be a string")))?;

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: key,
            max: MAX_NAME_LEN,
        });
    }

    Ok(value.to_string())
}

// Integers posted as strings are accepted; table-driven clients send every cell as text.
fn required_integer(map: &Map<String, Value>, key: &'static str) -> Result<i64, ValidationError> {
    let parsed = match required(map, key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| ValidationError::BadData(format!("{key} must be an integer")))
}

fn required_counter(map: &Map<String, Value>, key: &'static str) -> Result<i64, ValidationError> {
    let count = required_integer(map, key)?;
    if count < 0 {
        return Err(ValidationError::Negative(key));
    }
    Ok(count)
}
