use serde_json::json;
use shared::{
    store::Store,
    types::{DailyArticleView, DailyBlogView},
    utils::{error_response, json_response, success_response, today},
};

use crate::types::ActionRequest;

/// `increment-blog-views`: upsert today's record and bump the total.
pub fn increment_blog(store: &Store) -> anyhow::Result<cgi::Response> {
    let date = today();
    let mut db = store.load()?;
    match db.daily_blog_views.iter_mut().find(|d| d.date == date) {
        Some(daily) => daily.views += 1,
        None => db.daily_blog_views.push(DailyBlogView { date, views: 1 }),
    }
    db.stats.total_blog_views += 1;
    store.save(&db)?;
    success_response()
}

/// `increment-article-views`: one record per (date, post); the post's own
/// counter and the aggregate total move in the same write.
pub fn increment_article(store: &Store, request: &ActionRequest) -> anyhow::Result<cgi::Response> {
    let mut db = store.load()?;
    let id = match request.id.filter(|id| db.post_by_id(*id).is_some()) {
        Some(id) => id,
        None => return error_response(404, "Post not found"),
    };

    let date = today();
    match db
        .daily_article_views
        .iter_mut()
        .find(|d| d.date == date && d.post_id == id)
    {
        Some(daily) => daily.views += 1,
        None => db.daily_article_views.push(DailyArticleView {
            date,
            post_id: id,
            views: 1,
        }),
    }
    if let Some(post) = db.post_by_id_mut(id) {
        post.views += 1;
    }
    db.stats.total_article_views += 1;
    store.save(&db)?;
    success_response()
}

pub fn today_blog_views(store: &Store) -> anyhow::Result<cgi::Response> {
    let date = today();
    let db = store.load()?;
    let views = db
        .daily_blog_views
        .iter()
        .find(|d| d.date == date)
        .map(|d| d.views)
        .unwrap_or(0);
    json_response(200, &json!({ "views": views }))
}

pub fn today_article_views(store: &Store) -> anyhow::Result<cgi::Response> {
    let date = today();
    let db = store.load()?;
    let views: i64 = db
        .daily_article_views
        .iter()
        .filter(|d| d.date == date)
        .map(|d| d.views)
        .sum();
    json_response(200, &json!({ "views": views }))
}

/// `getArticleViews`: lifetime views for one post, summed from the daily
/// records rather than read off the post.
pub fn article_views(store: &Store, request: &ActionRequest) -> anyhow::Result<cgi::Response> {
    let db = store.load()?;
    let views: i64 = db
        .daily_article_views
        .iter()
        .filter(|d| Some(d.post_id) == request.post_id)
        .map(|d| d.views)
        .sum();
    json_response(200, &json!({ "views": views }))
}

/// `getTodayArticleComments`: comments written today, matched on the date
/// string prefix.
pub fn today_article_comments(store: &Store) -> anyhow::Result<cgi::Response> {
    let date = today();
    let db = store.load()?;
    let count = db.comments.iter().filter(|c| c.date.starts_with(&date)).count();
    json_response(200, &json!({ "count": count }))
}

pub fn clear_blog(store: &Store) -> anyhow::Result<cgi::Response> {
    let mut db = store.load()?;
    db.daily_blog_views.clear();
    db.stats.total_blog_views = 0;
    store.save(&db)?;
    json_response(
        200,
        &json!({ "success": true, "message": "All blog view data cleared." }),
    )
}

/// `clear-article-views` also zeroes every post's own counter.
pub fn clear_article(store: &Store) -> anyhow::Result<cgi::Response> {
    let mut db = store.load()?;
    db.daily_article_views.clear();
    for post in &mut db.posts {
        post.views = 0;
    }
    db.stats.total_article_views = 0;
    store.save(&db)?;
    json_response(
        200,
        &json!({ "success": true, "message": "All article view data cleared." }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts;
    use crate::testing::{action, body_json, post_input, store_in};

    fn created_post_id(store: &Store) -> i64 {
        posts::create(store, &action("create").with_post(post_input("T"))).unwrap();
        store.load().unwrap().posts[0].id
    }

    #[test]
    fn blog_views_upsert_one_record_per_day() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        increment_blog(&store).unwrap();
        increment_blog(&store).unwrap();

        let db = store.load().unwrap();
        assert_eq!(db.daily_blog_views.len(), 1);
        assert_eq!(db.daily_blog_views[0].views, 2);
        assert_eq!(db.stats.total_blog_views, 2);

        let body = body_json(&today_blog_views(&store).unwrap());
        assert_eq!(body["views"], 2);
    }

    #[test]
    fn article_views_track_the_post_and_the_totals() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let id = created_post_id(&store);

        increment_article(&store, &action("increment-article-views").with_id(id)).unwrap();
        increment_article(&store, &action("increment-article-views").with_id(id)).unwrap();

        let db = store.load().unwrap();
        assert_eq!(db.daily_article_views.len(), 1);
        assert_eq!(db.daily_article_views[0].views, 2);
        assert_eq!(db.post_by_id(id).unwrap().views, 2);
        assert_eq!(db.stats.total_article_views, 2);

        let body = body_json(&article_views(&store, &action("getArticleViews").with_post_id(id)).unwrap());
        assert_eq!(body["views"], 2);
        let body = body_json(&today_article_views(&store).unwrap());
        assert_eq!(body["views"], 2);
    }

    #[test]
    fn incrementing_an_unknown_article_is_a_404() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let response =
            increment_article(&store, &action("increment-article-views").with_id(99)).unwrap();
        assert_eq!(response.status(), 404);
        assert!(store.load().unwrap().daily_article_views.is_empty());
    }

    #[test]
    fn todays_comments_are_counted_by_date_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let id = created_post_id(&store);

        let request = action("add-comment")
            .with_post_id(id)
            .with_nickname("v")
            .with_content("hi");
        crate::comments::add(&store, &request).unwrap();

        // A stale comment from another day never counts.
        let mut db = store.load().unwrap();
        db.comments.push(shared::types::Comment {
            id: 1,
            post_id: id,
            nickname: "old".into(),
            content: "then".into(),
            date: "2001-01-01 00:00:00".into(),
        });
        store.save(&db).unwrap();

        let body = body_json(&today_article_comments(&store).unwrap());
        assert_eq!(body["count"], 1);
    }

    #[test]
    fn clears_reset_details_counters_and_totals() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let id = created_post_id(&store);

        increment_blog(&store).unwrap();
        increment_article(&store, &action("increment-article-views").with_id(id)).unwrap();

        clear_blog(&store).unwrap();
        clear_article(&store).unwrap();

        let db = store.load().unwrap();
        assert!(db.daily_blog_views.is_empty());
        assert!(db.daily_article_views.is_empty());
        assert_eq!(db.post_by_id(id).unwrap().views, 0);
        assert_eq!(db.stats.total_blog_views, 0);
        assert_eq!(db.stats.total_article_views, 0);
    }
}
