use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Image reference used until a picture is uploaded for a post.
pub const DEFAULT_POST_IMAGE: &str = "news_default.png";

pub const POST_TITLE_MAX_LEN: usize = 100;

/// Post entity - a news article.
///
/// `date_posted` and `author_id` are fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub date_posted: DateTime<Utc>,
    pub author_id: i32,
    pub image_file: String,
}

/// A post that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub date_posted: DateTime<Utc>,
    pub author_id: i32,
    pub image_file: String,
}

impl NewPost {
    /// Create a new post dated now, with the default image.
    pub fn new(author_id: i32, title: String, content: String) -> Self {
        Self {
            title,
            content,
            date_posted: Utc::now(),
            author_id,
            image_file: DEFAULT_POST_IMAGE.to_string(),
        }
    }
}
