use serde::{Deserialize, Serialize};

/// A blog post. `content` is trusted HTML written by the site owner and is
/// stored unsanitized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Millisecond timestamp taken at creation, doubles as the unique id.
    pub id: i64,
    pub title: String,
    pub preface: String,
    pub content: String,
    /// `YYYY-MM-DD HH:MM:SS` (UTC).
    pub date: String,
    pub category: String,
    pub views: i64,
    pub comments: i64,
    pub tags: Vec<String>,
    pub published: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    #[serde(rename = "postId")]
    pub post_id: i64,
    pub nickname: String,
    pub content: String,
    pub date: String,
}

/// One record per calendar date (UTC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBlogView {
    pub date: String,
    pub views: i64,
}

/// One record per (calendar date, post) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyArticleView {
    pub date: String,
    #[serde(rename = "postId")]
    pub post_id: i64,
    pub views: i64,
}

/// Running totals, maintained incrementally alongside every mutation that
/// touches the detail records. Never recomputed; only the clear actions
/// reset them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(rename = "totalBlogViews")]
    pub total_blog_views: i64,
    #[serde(rename = "totalArticleViews")]
    pub total_article_views: i64,
    #[serde(rename = "totalComments")]
    pub total_comments: i64,
}

/// The whole database: one JSON document holding every collection.
///
/// `users` stays in the document for shape parity with older dumps, but
/// authentication reads credentials from the environment and never consults
/// it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default, rename = "dailyBlogViews")]
    pub daily_blog_views: Vec<DailyBlogView>,
    #[serde(default, rename = "dailyArticleViews")]
    pub daily_article_views: Vec<DailyArticleView>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub users: Vec<serde_json::Value>,
}

impl Document {
    pub fn post_by_id(&self, id: i64) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn post_by_id_mut(&mut self, id: i64) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id == id)
    }
}
