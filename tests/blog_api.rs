mod support;

use axum::http::StatusCode;
use serde_json::{Value, json};

use support::TestApp;

fn slugs(posts: &Value) -> Vec<String> {
    posts
        .as_array()
        .expect("posts array")
        .iter()
        .map(|post| post["slug"].as_str().expect("slug").to_string())
        .collect()
}

/// Two categories, one tag and a mix of drafts and published posts.
async fn seeded_blog() -> TestApp {
    let app = TestApp::new();
    let token = app.admin_token();

    let frontend = app.create_category(&token, "Frontend", "frontend").await;
    let react = app.create_category(&token, "React", "react").await;
    let hooks = app.create_tag(&token, "REACT hooks", "react-hooks").await;

    let posts = [
        json!({
            "title": "Learning React the hard way",
            "content": "Components",
            "slug": "title-match",
            "published": true,
        }),
        json!({
            "title": "Excerpt",
            "excerpt": "a react primer",
            "content": "x",
            "slug": "excerpt-match",
            "published": true,
            "categoryIds": [frontend["id"]],
        }),
        json!({
            "title": "Content",
            "content": "Deep dive into ReAcT reconciliation",
            "slug": "content-match",
            "published": true,
        }),
        json!({
            "title": "Category",
            "content": "x",
            "slug": "category-match",
            "published": true,
            "categoryIds": [react["id"]],
        }),
        json!({
            "title": "Tag",
            "content": "x",
            "slug": "tag-match",
            "published": true,
            "categoryIds": [frontend["id"]],
            "tagIds": [hooks["id"]],
        }),
        json!({
            "title": "Unrelated",
            "content": "Rust and axum",
            "slug": "unrelated",
            "published": true,
            "categoryIds": [frontend["id"]],
        }),
        json!({
            "title": "React draft",
            "content": "react react react",
            "slug": "react-draft",
            "categoryIds": [react["id"], frontend["id"]],
        }),
    ];
    for post in posts {
        app.create_post(&token, post).await;
    }
    app
}

#[tokio::test]
async fn public_listing_hides_drafts_and_author_email() {
    let app = seeded_blog().await;

    let response = app.get("/api/blog/posts", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let listed = slugs(&response.body);
    assert_eq!(listed.len(), 6);
    assert!(!listed.contains(&"react-draft".to_string()));

    for post in response.body.as_array().expect("posts") {
        assert_eq!(post["published"], true);
        assert!(post["author"].get("email").is_none());
    }

    let draft = app.get("/api/blog/posts/react-draft", None).await;
    assert_eq!(draft.status, StatusCode::NOT_FOUND);
    assert_eq!(draft.body["error"]["message"], "Post not found");

    let post = app.get("/api/blog/posts/tag-match", None).await;
    assert_eq!(post.status, StatusCode::OK);
    assert_eq!(post.body["tags"][0]["slug"], "react-hooks");
    assert_eq!(post.body["categories"][0]["slug"], "frontend");
}

#[tokio::test]
async fn public_categories_count_only_published_posts() {
    let app = seeded_blog().await;

    let response = app.get("/api/blog/categories", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let counts: Vec<(String, i64)> = response
        .body
        .as_array()
        .expect("categories")
        .iter()
        .map(|c| {
            (
                c["slug"].as_str().expect("slug").to_string(),
                c["_count"]["posts"].as_i64().expect("count"),
            )
        })
        .collect();
    assert!(counts.contains(&("frontend".to_string(), 3)));
    assert!(counts.contains(&("react".to_string(), 1)));
}

#[tokio::test]
async fn category_page_lists_its_published_posts() {
    let app = seeded_blog().await;

    let response = app.get("/api/blog/categories/react", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["category"]["slug"], "react");
    assert_eq!(slugs(&response.body["posts"]), vec!["category-match"]);
    assert_eq!(
        response.body["allCategories"].as_array().map(Vec::len),
        Some(2)
    );

    let missing = app.get("/api/blog/categories/nope", None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["error"]["message"], "Category not found");
}

#[tokio::test]
async fn search_matches_every_text_field_case_insensitively() {
    let app = seeded_blog().await;

    let response = app.get("/api/blog/search?q=react", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let mut found = slugs(&response.body["posts"]);
    found.sort();
    assert_eq!(
        found,
        vec![
            "category-match",
            "content-match",
            "excerpt-match",
            "tag-match",
            "title-match",
        ]
    );
    assert_eq!(response.body["query"], "react");
    assert_eq!(response.body["pagination"]["total"], 5);
    assert_eq!(response.body["pagination"]["limit"], 20);
    assert_eq!(response.body["pagination"]["hasMore"], false);

    let padded = app.get("/api/blog/search?q=%20React", None).await;
    assert_eq!(padded.status, StatusCode::OK);
    assert_eq!(padded.body["query"], " React");
}

#[tokio::test]
async fn search_category_narrows_and_all_means_unfiltered() {
    let app = seeded_blog().await;

    let narrowed = app
        .get("/api/blog/search?q=react&category=frontend", None)
        .await;
    assert_eq!(narrowed.status, StatusCode::OK);
    let mut found = slugs(&narrowed.body["posts"]);
    found.sort();
    assert_eq!(found, vec!["excerpt-match", "tag-match"]);
    assert_eq!(narrowed.body["category"], "frontend");

    let all = app.get("/api/blog/search?q=react&category=all", None).await;
    assert_eq!(all.body["pagination"]["total"], 5);
    assert_eq!(all.body["category"], "all");
}

#[tokio::test]
async fn search_pagination_reports_has_more() {
    let app = seeded_blog().await;

    let first = app
        .get("/api/blog/search?q=react&limit=2&offset=0", None)
        .await;
    assert_eq!(first.body["posts"].as_array().map(Vec::len), Some(2));
    assert_eq!(first.body["pagination"]["hasMore"], true);

    let last = app
        .get("/api/blog/search?q=react&limit=2&offset=4", None)
        .await;
    assert_eq!(last.body["posts"].as_array().map(Vec::len), Some(1));
    assert_eq!(last.body["pagination"]["offset"], 4);
    assert_eq!(last.body["pagination"]["hasMore"], false);
}

#[tokio::test]
async fn search_requires_a_query() {
    let app = TestApp::new();

    for uri in ["/api/blog/search", "/api/blog/search?q=%20%20"] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(response.body["error"]["message"], "Search query is required");
    }

    let malformed = app.get("/api/blog/search?q=x&limit=ten", None).await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn storage_failures_surface_as_generic_internal_errors() {
    let app = seeded_blog().await;
    app.store.fail_reads();

    for uri in [
        "/api/blog/posts",
        "/api/blog/categories",
        "/api/blog/search?q=react",
    ] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(response.body["error"]["code"], "internal");
        let message = response.body["error"]["message"].as_str().expect("message");
        assert!(!message.contains("connection refused"));
    }
}

#[tokio::test]
async fn database_health_reflects_storage() {
    let app = TestApp::new();

    let healthy = app.get("/_health/db", None).await;
    assert_eq!(healthy.status, StatusCode::NO_CONTENT);

    app.store.fail_reads();
    let failing = app.get("/_health/db", None).await;
    assert_eq!(failing.status, StatusCode::SERVICE_UNAVAILABLE);
}
