use anyhow::anyhow;
use serde::Deserialize;
use shared::{
    errors::ApiError,
    store::Store,
    types::Post,
    utils::{error_response, now_datetime, now_millis, success_response},
};

use crate::types::ActionRequest;

/// Shape of the `post` field on create. The server owns id, date, counters
/// and the publication flag.
#[derive(Deserialize)]
struct NewPost {
    title: String,
    preface: String,
    content: String,
    category: String,
    #[serde(default)]
    tags: Vec<String>,
}

fn post_field<T: for<'a> Deserialize<'a>>(request: &ActionRequest) -> anyhow::Result<T> {
    let value = request.post.clone().ok_or_else(|| anyhow!(ApiError::InvalidBody))?;
    serde_json::from_value(value).map_err(|_| anyhow!(ApiError::InvalidBody))
}

pub fn create(store: &Store, request: &ActionRequest) -> anyhow::Result<cgi::Response> {
    let input: NewPost = post_field(request)?;
    let mut db = store.load()?;
    db.posts.push(Post {
        id: now_millis(),
        title: input.title,
        preface: input.preface,
        content: input.content,
        date: now_datetime(),
        category: input.category,
        views: 0,
        comments: 0,
        tags: input.tags,
        published: false,
    });
    store.save(&db)?;
    success_response()
}

/// Wholesale replacement of the post whose id matches `post.id`.
pub fn update(store: &Store, request: &ActionRequest) -> anyhow::Result<cgi::Response> {
    let replacement: Post = post_field(request)?;
    let mut db = store.load()?;
    match db.post_by_id_mut(replacement.id) {
        Some(existing) => {
            *existing = replacement;
            store.save(&db)?;
            success_response()
        }
        None => error_response(404, "Post not found"),
    }
}

pub fn publish(store: &Store, request: &ActionRequest) -> anyhow::Result<cgi::Response> {
    let publish = request.publish.unwrap_or(false);
    let mut db = store.load()?;
    match request.id.and_then(|id| db.post_by_id_mut(id)) {
        Some(post) => {
            post.published = publish;
            store.save(&db)?;
            success_response()
        }
        None => error_response(404, "Post not found"),
    }
}

/// Removing a post cascades to its comments and daily view records, and
/// gives the post's counters back to the aggregate stats. Deleting an
/// unknown id still succeeds.
pub fn delete(store: &Store, request: &ActionRequest) -> anyhow::Result<cgi::Response> {
    let mut db = store.load()?;
    let deleted = request.id.and_then(|id| db.post_by_id(id).cloned());
    if let Some(post) = deleted {
        db.posts.retain(|p| p.id != post.id);
        db.comments.retain(|c| c.post_id != post.id);
        db.daily_article_views.retain(|d| d.post_id != post.id);
        db.stats.total_article_views -= post.views;
        db.stats.total_comments -= post.comments;
    }
    store.save(&db)?;
    success_response()
}
