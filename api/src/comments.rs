use anyhow::anyhow;
use serde_json::json;
use shared::{
    errors::ApiError,
    store::Store,
    types::Comment,
    utils::{json_response, now_datetime, now_millis, success_response},
};

use crate::types::ActionRequest;

/// `get-comments`: the comments for one post, as a bare JSON array.
pub fn list(store: &Store, request: &ActionRequest) -> anyhow::Result<cgi::Response> {
    let db = store.load()?;
    let comments: Vec<&Comment> = db
        .comments
        .iter()
        .filter(|c| Some(c.post_id) == request.post_id)
        .collect();
    json_response(200, &comments)
}

/// `add-comment` is public. The owning post's counter only moves when the
/// post actually exists, but the aggregate total always does.
pub fn add(store: &Store, request: &ActionRequest) -> anyhow::Result<cgi::Response> {
    let post_id = request.post_id.ok_or_else(|| anyhow!(ApiError::InvalidBody))?;
    let nickname = request
        .nickname
        .clone()
        .ok_or_else(|| anyhow!(ApiError::InvalidBody))?;
    let content = request
        .content
        .clone()
        .ok_or_else(|| anyhow!(ApiError::InvalidBody))?;

    let mut db = store.load()?;
    db.comments.push(Comment {
        id: now_millis(),
        post_id,
        nickname,
        content,
        date: now_datetime(),
    });
    if let Some(post) = db.post_by_id_mut(post_id) {
        post.comments += 1;
    }
    db.stats.total_comments += 1;
    store.save(&db)?;
    success_response()
}

/// `delete-comment`. The aggregate total drops unconditionally, matched to
/// the site this replaces.
pub fn remove(store: &Store, request: &ActionRequest) -> anyhow::Result<cgi::Response> {
    let mut db = store.load()?;
    let target = request
        .id
        .and_then(|id| db.comments.iter().find(|c| c.id == id).cloned());
    if let Some(comment) = &target {
        if let Some(post) = db.post_by_id_mut(comment.post_id) {
            post.comments -= 1;
        }
    }
    db.comments.retain(|c| Some(c.id) != request.id);
    db.stats.total_comments -= 1;
    store.save(&db)?;
    success_response()
}

/// `clear-comments`: wipe the list, zero every post's counter and the total.
pub fn clear(store: &Store) -> anyhow::Result<cgi::Response> {
    let mut db = store.load()?;
    db.comments.clear();
    for post in &mut db.posts {
        post.comments = 0;
    }
    db.stats.total_comments = 0;
    store.save(&db)?;
    json_response(
        200,
        &json!({ "success": true, "message": "All comment data cleared." }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts;
    use crate::testing::{action, post_input, store_in};

    fn created_post_id(store: &Store) -> i64 {
        posts::create(store, &action("create").with_post(post_input("T"))).unwrap();
        store.load().unwrap().posts[0].id
    }

    #[test]
    fn add_then_delete_keeps_counters_in_step() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let post_id = created_post_id(&store);

        let request = action("add-comment")
            .with_post_id(post_id)
            .with_nickname("visitor")
            .with_content("nice post");
        assert_eq!(add(&store, &request).unwrap().status(), 200);

        let db = store.load().unwrap();
        assert_eq!(db.comments.len(), 1);
        assert_eq!(db.post_by_id(post_id).unwrap().comments, 1);
        assert_eq!(db.stats.total_comments, 1);

        let comment_id = db.comments[0].id;
        assert_eq!(
            remove(&store, &action("delete-comment").with_id(comment_id))
                .unwrap()
                .status(),
            200
        );

        let db = store.load().unwrap();
        assert!(db.comments.is_empty());
        assert_eq!(db.post_by_id(post_id).unwrap().comments, 0);
        assert_eq!(db.stats.total_comments, 0);
    }

    #[test]
    fn list_filters_by_post() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let post_id = created_post_id(&store);

        let request = action("add-comment")
            .with_post_id(post_id)
            .with_nickname("a")
            .with_content("one");
        add(&store, &request).unwrap();
        let request = action("add-comment")
            .with_post_id(post_id + 1)
            .with_nickname("b")
            .with_content("other post");
        add(&store, &request).unwrap();

        let response = list(&store, &action("get-comments").with_post_id(post_id)).unwrap();
        let listed: Vec<Comment> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].nickname, "a");
    }

    #[test]
    fn clear_zeroes_everything_comment_shaped() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let post_id = created_post_id(&store);

        for n in 0..3 {
            let request = action("add-comment")
                .with_post_id(post_id)
                .with_nickname(&format!("v{n}"))
                .with_content("hello");
            add(&store, &request).unwrap();
        }

        let response = clear(&store).unwrap();
        assert_eq!(response.status(), 200);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["success"], true);

        let db = store.load().unwrap();
        assert!(db.comments.is_empty());
        assert_eq!(db.post_by_id(post_id).unwrap().comments, 0);
        assert_eq!(db.stats.total_comments, 0);
    }
}
