use shared::{
    errors::ApiError,
    session,
    settings,
    store::Store,
    utils::{error_response, http_date, json_body},
};
use tracing::error;

mod comments;
mod posts;
mod types;
mod views;

use types::{is_public, ActionRequest};

/// GET: the whole document, uncached, stamped with the backing file's
/// mtime.
fn get_document(store: &Store) -> anyhow::Result<cgi::Response> {
    let document = store.load()?;
    let mut builder = http::response::Builder::new()
        .status(200)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(http::header::CACHE_CONTROL, "no-cache");
    if let Some(modified) = store.last_modified() {
        builder = builder.header(http::header::LAST_MODIFIED, http_date(modified));
    }
    let response = builder.body(serde_json::to_vec(&document)?)?;
    Ok(response)
}

fn dispatch(store: &Store, request: &cgi::Request) -> anyhow::Result<cgi::Response> {
    let action_request: ActionRequest = match json_body(request) {
        Ok(parsed) => parsed,
        Err(_) => return error_response(400, "Invalid request body"),
    };

    if !is_public(&action_request.action) {
        session::require_session(request)?;
    }

    match action_request.action.as_str() {
        "create" => posts::create(store, &action_request),
        "update" => posts::update(store, &action_request),
        "publish" => posts::publish(store, &action_request),
        "delete" => posts::delete(store, &action_request),
        "increment-blog-views" => views::increment_blog(store),
        "increment-article-views" => views::increment_article(store, &action_request),
        "getTodayBlogViews" => views::today_blog_views(store),
        "getTodayArticleViews" => views::today_article_views(store),
        "getArticleViews" => views::article_views(store, &action_request),
        "getTodayArticleComments" => views::today_article_comments(store),
        "get-comments" => comments::list(store, &action_request),
        "add-comment" => comments::add(store, &action_request),
        "delete-comment" => comments::remove(store, &action_request),
        "clear-blog-views" => views::clear_blog(store),
        "clear-article-views" => views::clear_article(store),
        "clear-comments" => comments::clear(store),
        _ => error_response(400, "Invalid action"),
    }
}

fn process(store: &Store, request: &cgi::Request) -> anyhow::Result<cgi::Response> {
    match request.method().as_str() {
        "GET" => get_document(store),
        "POST" => dispatch(store, request),
        _ => error_response(405, "Method not allowed"),
    }
}

/// Maps handler failures onto the wire: `ApiError` keeps its status,
/// anything else is a 500.
fn respond(result: anyhow::Result<cgi::Response>) -> anyhow::Result<cgi::Response> {
    match result {
        Ok(response) => Ok(response),
        Err(e) => match e.downcast_ref::<ApiError>() {
            Some(api_error) => error_response(api_error.status(), &api_error.to_string()),
            None => {
                error!("API error: {e:#}");
                error_response(500, "Internal server error")
            }
        },
    }
}

cgi::cgi_try_main! { |request: cgi::Request| -> anyhow::Result<cgi::Response> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let store = Store::new(settings::db_path());
    respond(process(&store, &request))
}}
