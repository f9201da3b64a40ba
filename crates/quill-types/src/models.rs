use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub author_id: i64,
    /// Populated on single-post pages (JOIN against users), absent on lists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_username: Option<String>,
    pub created_at: DateTime<Utc>,
}
