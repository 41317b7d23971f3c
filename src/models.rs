use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Page size used by the dashboard. There are no pagination controls.
pub const PAGE_LIMIT: u32 = 50;
pub const PAGE_SKIP: u32 = 0;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// A star rating known to be in 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: u8) -> Option<Self> {
        (MIN_RATING..=MAX_RATING).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All ratings, highest first, the order filter options are listed in.
    pub fn all_desc() -> impl Iterator<Item = Rating> {
        (MIN_RATING..=MAX_RATING).rev().map(Rating)
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value).ok_or_else(|| format!("rating must be between 1 and 5, got {}", value))
    }
}

impl From<Rating> for u8 {
    fn from(r: Rating) -> u8 {
        r.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a review, resolved once when the record is ingested.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ReviewId(String);

impl ReviewId {
    pub const PLACEHOLDER: &'static str = "unknown";

    /// Prefer `id`, fall back to `_id`, else the placeholder.
    pub fn resolve(id: Option<&Value>, legacy_id: Option<&Value>) -> Self {
        id.and_then(id_text)
            .or_else(|| legacy_id.and_then(id_text))
            .map(ReviewId)
            .unwrap_or_else(|| ReviewId(Self::PLACEHOLDER.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_placeholder(&self) -> bool {
        self.0 == Self::PLACEHOLDER
    }

    /// Last 8 characters, for display on cards.
    pub fn short(&self) -> &str {
        let count = self.0.chars().count();
        if count <= 8 {
            return &self.0;
        }
        let start = self
            .0
            .char_indices()
            .nth(count - 8)
            .map(|(i, _)| i)
            .unwrap_or(0);
        &self.0[start..]
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn id_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        // Extended-JSON ObjectId: {"$oid": "..."}
        Value::Object(map) => map.get("$oid").and_then(id_text),
        _ => None,
    }
}

/// Wire shape of a review record. Every field is optional on the wire;
/// [`Review`] is the normalized form the rest of the crate sees.
#[derive(Debug, Deserialize)]
struct RawReview {
    id: Option<Value>,
    #[serde(rename = "_id")]
    legacy_id: Option<Value>,
    rating: Option<u8>,
    review_text: Option<String>,
    timestamp: Option<String>,
    ai_summary: Option<String>,
    ai_response: Option<String>,
    suggested_actions: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawReview")]
pub struct Review {
    pub id: ReviewId,
    /// 0 when the record carries no rating.
    pub rating: u8,
    pub review_text: String,
    /// Kept raw; parsed when rendered so a malformed value cannot fail ingestion.
    pub timestamp: String,
    pub ai_summary: String,
    pub ai_response: Option<String>,
    pub suggested_actions: Vec<String>,
}

impl From<RawReview> for Review {
    fn from(raw: RawReview) -> Self {
        Review {
            id: ReviewId::resolve(raw.id.as_ref(), raw.legacy_id.as_ref()),
            rating: raw.rating.unwrap_or(0),
            review_text: raw.review_text.unwrap_or_default(),
            timestamp: raw.timestamp.unwrap_or_default(),
            ai_summary: raw.ai_summary.unwrap_or_default(),
            ai_response: raw.ai_response,
            suggested_actions: raw.suggested_actions.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewPage {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub total_reviews: u64,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub rating_distribution: BTreeMap<u8, u64>,
    #[serde(default)]
    pub recent_count_24h: u64,
}

impl Stats {
    /// Rating with the highest count. Ties go to the lower rating; `None`
    /// when every count is zero.
    pub fn most_common_rating(&self) -> Option<u8> {
        let mut best: Option<(u8, u64)> = None;
        for (&rating, &count) in &self.rating_distribution {
            if count > best.map_or(0, |(_, c)| c) {
                best = Some((rating, count));
            }
        }
        best.map(|(rating, _)| rating)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    pub limit: u32,
    pub skip: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl ListQuery {
    pub fn first_page(rating: Option<Rating>) -> Self {
        Self {
            limit: PAGE_LIMIT,
            skip: PAGE_SKIP,
            rating,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSubmission {
    pub rating: Rating,
    pub review_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubmitReceipt {
    #[serde(default)]
    pub ai_response: String,
    #[serde(default)]
    pub submission_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body returned by the API on non-2xx replies.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    /// The server's `detail`, flattened to one line. Validation errors come
    /// back as a list of `{msg}` objects.
    pub fn detail_message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Array(items) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                (!msgs.is_empty()).then(|| msgs.join("; "))
            }
            _ => None,
        }
    }
}
