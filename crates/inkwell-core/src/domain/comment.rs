use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const COMMENT_BODY_MAX_LEN: usize = 100;

/// Comment entity - a short reply attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i32,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    pub post_id: i32,
    pub author_id: i32,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub body: String,
    pub timestamp: DateTime<Utc>,
    pub post_id: i32,
    pub author_id: i32,
}

impl NewComment {
    pub fn new(post_id: i32, author_id: i32, body: String) -> Self {
        Self {
            body,
            timestamp: Utc::now(),
            post_id,
            author_id,
        }
    }
}
