use serde::Deserialize;

/// The POST body: one JSON object naming an action plus whichever fields
/// that action reads. `post` stays loosely typed because create and update
/// accept different shapes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    pub action: String,
    #[serde(default)]
    pub post: Option<serde_json::Value>,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub publish: Option<bool>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub post_id: Option<i64>,
}

/// Actions anyone may call: read-only counters, comment reads and
/// submission, view increments. Everything else needs the session cookie.
pub const PUBLIC_ACTIONS: &[&str] = &[
    "getTodayBlogViews",
    "getTodayArticleViews",
    "getArticleViews",
    "getTodayArticleComments",
    "get-comments",
    "increment-blog-views",
    "increment-article-views",
    "add-comment",
];

pub fn is_public(action: &str) -> bool {
    PUBLIC_ACTIONS.contains(&action)
}
