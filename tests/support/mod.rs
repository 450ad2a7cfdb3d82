//! In-memory doubles for the repository, hashing and media seams, plus a
//! small client that drives the router with `oneshot`.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

use quill::application::admin::categories::AdminCategoryService;
use quill::application::admin::dashboard::AdminDashboardService;
use quill::application::admin::posts::AdminPostService;
use quill::application::admin::tags::AdminTagService;
use quill::application::auth::{
    AuthService, Identity, PasswordHashError, PasswordHasher, SessionCodec,
};
use quill::application::blog::BlogService;
use quill::application::repos::{
    CategoriesRepo, CategoriesWriteRepo, ContentCounts, CreateCategoryParams, CreatePostParams,
    CreateTagParams, CreateUserParams, DashboardRepo, HealthRepo, PostsRepo, PostsWriteRepo,
    RepoError, SearchPage, TagsRepo, TagsWriteRepo, UpdateCategoryParams, UpdatePostParams,
    UpdateTagParams, UsersRepo, UsersWriteRepo,
};
use quill::application::search::SearchFilter;
use quill::application::uploads::{ImageUploadService, MediaHost, MediaHostError, UploadedImage};
use quill::domain::entities::{
    AuthorSummary, CategoryRecord, CategoryRef, CategoryWithCount, PostDetail, PostRecord,
    PostSummary, TagRecord, TagRef, TagWithCount, UserRecord,
};
use quill::domain::types::Role;
use quill::infra::auth::JwtSessionCodec;
use quill::infra::http::{ApiState, CookieSettings, build_router};

pub const SESSION_SECRET: &[u8] = b"integration-test-secret-0123456789";

// ----- Storage -----

#[derive(Default)]
struct State {
    users: Vec<UserRecord>,
    categories: Vec<CategoryRecord>,
    tags: Vec<TagRecord>,
    posts: Vec<PostRecord>,
    post_categories: Vec<(Uuid, Uuid)>,
    post_tags: Vec<(Uuid, Uuid)>,
}

impl State {
    fn detail(&self, post: &PostRecord) -> PostDetail {
        PostDetail {
            post: post.clone(),
            author: self.author(post.author_id),
            categories: self.category_refs(post.id),
            tags: self.tag_refs(post.id),
        }
    }

    fn author(&self, id: Uuid) -> AuthorSummary {
        self.users
            .iter()
            .find(|user| user.id == id)
            .map(|user| AuthorSummary {
                name: user.name.clone(),
                email: user.email.clone(),
                image: user.image.clone(),
            })
            .unwrap_or(AuthorSummary {
                name: None,
                email: String::new(),
                image: None,
            })
    }

    fn category_refs(&self, post_id: Uuid) -> Vec<CategoryRef> {
        let mut refs: Vec<_> = self
            .post_categories
            .iter()
            .filter(|(post, _)| *post == post_id)
            .filter_map(|(_, id)| self.categories.iter().find(|c| c.id == *id))
            .map(|c| CategoryRef {
                id: c.id,
                name: c.name.clone(),
                slug: c.slug.clone(),
            })
            .collect();
        refs.sort_by(|a, b| a.name.cmp(&b.name));
        refs
    }

    fn tag_refs(&self, post_id: Uuid) -> Vec<TagRef> {
        let mut refs: Vec<_> = self
            .post_tags
            .iter()
            .filter(|(post, _)| *post == post_id)
            .filter_map(|(_, id)| self.tags.iter().find(|t| t.id == *id))
            .map(|t| TagRef {
                id: t.id,
                name: t.name.clone(),
                slug: t.slug.clone(),
            })
            .collect();
        refs.sort_by(|a, b| a.name.cmp(&b.name));
        refs
    }

    fn is_published(&self, post_id: Uuid) -> bool {
        self.posts
            .iter()
            .any(|post| post.id == post_id && post.published)
    }

    fn category_count(&self, category_id: Uuid, published_only: bool) -> i64 {
        self.post_categories
            .iter()
            .filter(|(post, id)| *id == category_id && (!published_only || self.is_published(*post)))
            .count() as i64
    }

    fn tag_count(&self, tag_id: Uuid) -> i64 {
        self.post_tags.iter().filter(|(_, id)| *id == tag_id).count() as i64
    }

    fn categories_with_counts(&self, published_only: bool) -> Vec<CategoryWithCount> {
        let mut rows: Vec<_> = self
            .categories
            .iter()
            .map(|category| CategoryWithCount {
                category: category.clone(),
                post_count: self.category_count(category.id, published_only),
            })
            .collect();
        rows.sort_by(|a, b| a.category.name.cmp(&b.category.name));
        rows
    }

    fn published_details(&self) -> Vec<PostDetail> {
        let mut details: Vec<_> = self
            .posts
            .iter()
            .filter(|post| post.published)
            .map(|post| self.detail(post))
            .collect();
        sort_published(&mut details);
        details
    }

    fn check_links(&self, category_ids: &[Uuid], tag_ids: &[Uuid]) -> Result<(), RepoError> {
        let unknown_category = category_ids
            .iter()
            .any(|id| !self.categories.iter().any(|c| c.id == *id));
        let unknown_tag = tag_ids
            .iter()
            .any(|id| !self.tags.iter().any(|t| t.id == *id));
        if unknown_category || unknown_tag {
            return Err(RepoError::InvalidInput {
                message: "referenced category or tag does not exist".into(),
            });
        }
        Ok(())
    }

    fn replace_categories(&mut self, post_id: Uuid, ids: &[Uuid]) {
        self.post_categories.retain(|(post, _)| *post != post_id);
        for id in ids {
            if !self.post_categories.contains(&(post_id, *id)) {
                self.post_categories.push((post_id, *id));
            }
        }
    }

    fn replace_tags(&mut self, post_id: Uuid, ids: &[Uuid]) {
        self.post_tags.retain(|(post, _)| *post != post_id);
        for id in ids {
            if !self.post_tags.contains(&(post_id, *id)) {
                self.post_tags.push((post_id, *id));
            }
        }
    }
}

fn sort_published(details: &mut [PostDetail]) {
    details.sort_by(|a, b| {
        b.post
            .published_at
            .cmp(&a.post.published_at)
            .then(b.post.created_at.cmp(&a.post.created_at))
            .then(b.post.id.cmp(&a.post.id))
    });
}

fn duplicate(constraint: &str) -> RepoError {
    RepoError::Duplicate {
        constraint: constraint.into(),
    }
}

/// Mirrors the Postgres schema's unique and foreign-key constraints.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    failing: AtomicBool,
}

impl MemoryStore {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory store lock")
    }

    /// Makes every read used by the public API and health check fail.
    pub fn fail_reads(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), RepoError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(RepoError::Persistence("connection refused".into()))
        } else {
            Ok(())
        }
    }

    pub fn seed_user(&self, email: &str, password: Option<&str>, role: Role) -> UserRecord {
        let user = UserRecord {
            id: Uuid::new_v4(),
            name: Some("Seeded".into()),
            email: email.into(),
            password_hash: password.map(|p| format!("plain:{p}")),
            role,
            image: Some("https://cdn.example.com/avatar.png".into()),
            created_at: OffsetDateTime::now_utc(),
        };
        self.state().users.push(user.clone());
        user
    }

    pub fn remove_user(&self, id: Uuid) {
        self.state().users.retain(|user| user.id != id);
    }

    pub fn post_count(&self) -> usize {
        self.state().posts.len()
    }

    pub fn user_by_email(&self, email: &str) -> Option<UserRecord> {
        self.state()
            .users
            .iter()
            .find(|user| user.email == email)
            .cloned()
    }
}

#[async_trait]
impl UsersRepo for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError> {
        Ok(self.user_by_email(email))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError> {
        Ok(self.state().users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl UsersWriteRepo for MemoryStore {
    async fn create_user(&self, params: CreateUserParams) -> Result<UserRecord, RepoError> {
        let mut state = self.state();
        if state.users.iter().any(|u| u.email == params.email) {
            return Err(duplicate("users_email_key"));
        }
        let user = UserRecord {
            id: Uuid::new_v4(),
            name: Some(params.name),
            email: params.email,
            password_hash: Some(params.password_hash),
            role: params.role,
            image: None,
            created_at: OffsetDateTime::now_utc(),
        };
        state.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl CategoriesRepo for MemoryStore {
    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError> {
        Ok(self.state().categories_with_counts(false))
    }

    async fn list_with_published_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError> {
        self.check_available()?;
        Ok(self.state().categories_with_counts(true))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CategoryWithCount>, RepoError> {
        Ok(self
            .state()
            .categories_with_counts(false)
            .into_iter()
            .find(|c| c.category.id == id))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryWithCount>, RepoError> {
        self.check_available()?;
        Ok(self
            .state()
            .categories_with_counts(true)
            .into_iter()
            .find(|c| c.category.slug == slug))
    }

    async fn find_conflict(
        &self,
        name: Option<&str>,
        slug: Option<&str>,
        exclude: Option<Uuid>,
    ) -> Result<Option<CategoryRecord>, RepoError> {
        Ok(self
            .state()
            .categories
            .iter()
            .filter(|c| Some(c.id) != exclude)
            .find(|c| Some(c.name.as_str()) == name || Some(c.slug.as_str()) == slug)
            .cloned())
    }
}

#[async_trait]
impl CategoriesWriteRepo for MemoryStore {
    async fn create_category(
        &self,
        params: CreateCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let mut state = self.state();
        if state.categories.iter().any(|c| c.name == params.name) {
            return Err(duplicate("categories_name_key"));
        }
        if state.categories.iter().any(|c| c.slug == params.slug) {
            return Err(duplicate("categories_slug_key"));
        }
        let now = OffsetDateTime::now_utc();
        let category = CategoryRecord {
            id: Uuid::new_v4(),
            name: params.name,
            slug: params.slug,
            description: params.description,
            created_at: now,
            updated_at: now,
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        params: UpdateCategoryParams,
    ) -> Result<CategoryRecord, RepoError> {
        let mut state = self.state();
        let category = state
            .categories
            .iter_mut()
            .find(|c| c.id == params.id)
            .ok_or(RepoError::NotFound)?;
        if let Some(name) = params.name {
            category.name = name;
        }
        if let Some(slug) = params.slug {
            category.slug = slug;
        }
        if let Some(description) = params.description {
            category.description = Some(description);
        }
        category.updated_at = OffsetDateTime::now_utc();
        Ok(category.clone())
    }

    async fn delete_category(&self, id: Uuid) -> Result<(), RepoError> {
        let mut state = self.state();
        if state.post_categories.iter().any(|(_, c)| *c == id) {
            return Err(RepoError::InvalidInput {
                message: "category is still referenced".into(),
            });
        }
        let before = state.categories.len();
        state.categories.retain(|c| c.id != id);
        if state.categories.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl TagsRepo for MemoryStore {
    async fn list_with_counts(&self) -> Result<Vec<TagWithCount>, RepoError> {
        let state = self.state();
        let mut rows: Vec<_> = state
            .tags
            .iter()
            .map(|tag| TagWithCount {
                tag: tag.clone(),
                post_count: state.tag_count(tag.id),
            })
            .collect();
        rows.sort_by(|a, b| a.tag.name.cmp(&b.tag.name));
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TagWithCount>, RepoError> {
        let state = self.state();
        Ok(state.tags.iter().find(|t| t.id == id).map(|tag| TagWithCount {
            tag: tag.clone(),
            post_count: state.tag_count(tag.id),
        }))
    }

    async fn find_conflict(
        &self,
        name: Option<&str>,
        slug: Option<&str>,
        exclude: Option<Uuid>,
    ) -> Result<Option<TagRecord>, RepoError> {
        Ok(self
            .state()
            .tags
            .iter()
            .filter(|t| Some(t.id) != exclude)
            .find(|t| Some(t.name.as_str()) == name || Some(t.slug.as_str()) == slug)
            .cloned())
    }
}

#[async_trait]
impl TagsWriteRepo for MemoryStore {
    async fn create_tag(&self, params: CreateTagParams) -> Result<TagRecord, RepoError> {
        let mut state = self.state();
        if state
            .tags
            .iter()
            .any(|t| t.name == params.name || t.slug == params.slug)
        {
            return Err(duplicate("tags_slug_key"));
        }
        let now = OffsetDateTime::now_utc();
        let tag = TagRecord {
            id: Uuid::new_v4(),
            name: params.name,
            slug: params.slug,
            created_at: now,
            updated_at: now,
        };
        state.tags.push(tag.clone());
        Ok(tag)
    }

    async fn update_tag(&self, params: UpdateTagParams) -> Result<TagRecord, RepoError> {
        let mut state = self.state();
        let tag = state
            .tags
            .iter_mut()
            .find(|t| t.id == params.id)
            .ok_or(RepoError::NotFound)?;
        if let Some(name) = params.name {
            tag.name = name;
        }
        if let Some(slug) = params.slug {
            tag.slug = slug;
        }
        tag.updated_at = OffsetDateTime::now_utc();
        Ok(tag.clone())
    }

    async fn delete_tag(&self, id: Uuid) -> Result<(), RepoError> {
        let mut state = self.state();
        if state.post_tags.iter().any(|(_, t)| *t == id) {
            return Err(RepoError::InvalidInput {
                message: "tag is still referenced".into(),
            });
        }
        let before = state.tags.len();
        state.tags.retain(|t| t.id != id);
        if state.tags.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl PostsRepo for MemoryStore {
    async fn list_summaries(&self) -> Result<Vec<PostSummary>, RepoError> {
        let state = self.state();
        let mut posts: Vec<_> = state.posts.clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(posts
            .iter()
            .map(|post| PostSummary {
                post: post.clone(),
                author: state.author(post.author_id),
                categories: state.category_refs(post.id),
                tag_count: state.tag_refs(post.id).len() as i64,
            })
            .collect())
    }

    async fn find_detail(&self, id: Uuid) -> Result<Option<PostDetail>, RepoError> {
        let state = self.state();
        Ok(state
            .posts
            .iter()
            .find(|p| p.id == id)
            .map(|post| state.detail(post)))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        Ok(self.state().posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn list_published(&self) -> Result<Vec<PostDetail>, RepoError> {
        self.check_available()?;
        Ok(self.state().published_details())
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<PostDetail>, RepoError> {
        self.check_available()?;
        Ok(self
            .state()
            .published_details()
            .into_iter()
            .find(|d| d.post.slug == slug))
    }

    async fn list_published_in_category(
        &self,
        category_id: Uuid,
    ) -> Result<Vec<PostDetail>, RepoError> {
        self.check_available()?;
        Ok(self
            .state()
            .published_details()
            .into_iter()
            .filter(|d| d.categories.iter().any(|c| c.id == category_id))
            .collect())
    }

    async fn search_published(
        &self,
        filter: &SearchFilter,
        limit: u32,
        offset: u64,
    ) -> Result<SearchPage, RepoError> {
        self.check_available()?;
        let state = self.state();
        let mut matches: Vec<_> = state
            .posts
            .iter()
            .map(|post| state.detail(post))
            .filter(|detail| filter.matches(detail))
            .collect();
        sort_published(&mut matches);

        let total = matches.len() as u64;
        let posts = matches
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok(SearchPage { posts, total })
    }
}

#[async_trait]
impl PostsWriteRepo for MemoryStore {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let mut state = self.state();
        if state.posts.iter().any(|p| p.slug == params.slug) {
            return Err(duplicate("posts_slug_key"));
        }
        state.check_links(&params.category_ids, &params.tag_ids)?;

        let now = OffsetDateTime::now_utc();
        let post = PostRecord {
            id: Uuid::new_v4(),
            title: params.title,
            slug: params.slug,
            content: params.content,
            excerpt: params.excerpt,
            published: params.published,
            published_at: params.published_at,
            created_at: now,
            updated_at: now,
            author_id: params.author_id,
        };
        state.posts.push(post.clone());
        state.replace_categories(post.id, &params.category_ids);
        state.replace_tags(post.id, &params.tag_ids);
        Ok(post)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let mut state = self.state();
        if !state.posts.iter().any(|p| p.id == params.id) {
            return Err(RepoError::NotFound);
        }
        if let Some(slug) = params.slug.as_deref() {
            if state
                .posts
                .iter()
                .any(|p| p.slug == slug && p.id != params.id)
            {
                return Err(duplicate("posts_slug_key"));
            }
        }
        state.check_links(
            params.category_ids.as_deref().unwrap_or_default(),
            params.tag_ids.as_deref().unwrap_or_default(),
        )?;

        if let Some(ids) = params.category_ids.as_deref() {
            state.replace_categories(params.id, ids);
        }
        if let Some(ids) = params.tag_ids.as_deref() {
            state.replace_tags(params.id, ids);
        }

        let post = state
            .posts
            .iter_mut()
            .find(|p| p.id == params.id)
            .ok_or(RepoError::NotFound)?;
        if let Some(title) = params.title {
            post.title = title;
        }
        if let Some(slug) = params.slug {
            post.slug = slug;
        }
        if let Some(content) = params.content {
            post.content = content;
        }
        if let Some(excerpt) = params.excerpt {
            post.excerpt = Some(excerpt);
        }
        if let Some(published) = params.published {
            post.published = published;
        }
        if let Some(published_at) = params.published_at {
            post.published_at = Some(published_at);
        }
        post.updated_at = OffsetDateTime::now_utc();
        Ok(post.clone())
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        let mut state = self.state();
        let before = state.posts.len();
        state.posts.retain(|p| p.id != id);
        if state.posts.len() == before {
            return Err(RepoError::NotFound);
        }
        state.post_categories.retain(|(post, _)| *post != id);
        state.post_tags.retain(|(post, _)| *post != id);
        Ok(())
    }
}

#[async_trait]
impl DashboardRepo for MemoryStore {
    async fn content_counts(&self) -> Result<ContentCounts, RepoError> {
        let state = self.state();
        Ok(ContentCounts {
            posts: state.posts.len() as u64,
            published_posts: state.posts.iter().filter(|p| p.published).count() as u64,
            categories: state.categories.len() as u64,
            tags: state.tags.len() as u64,
        })
    }

    async fn recent_posts(&self, limit: u32) -> Result<Vec<PostSummary>, RepoError> {
        let mut posts = self.list_summaries().await?;
        posts.truncate(limit as usize);
        Ok(posts)
    }
}

#[async_trait]
impl HealthRepo for MemoryStore {
    async fn health_check(&self) -> Result<(), RepoError> {
        self.check_available()
    }
}

// ----- Credentials and media -----

pub struct PlainHasher;

#[async_trait]
impl PasswordHasher for PlainHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(format!("plain:{password}"))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        Ok(hash == format!("plain:{password}"))
    }
}

#[derive(Default)]
pub struct StubMediaHost {
    reject_with: Option<String>,
    received: Mutex<Vec<(Option<String>, usize)>>,
}

impl StubMediaHost {
    pub fn rejecting(message: &str) -> Self {
        Self {
            reject_with: Some(message.into()),
            ..Default::default()
        }
    }

    /// `(file name, byte length)` of every forwarded upload.
    pub fn received(&self) -> Vec<(Option<String>, usize)> {
        self.received.lock().expect("media lock").clone()
    }
}

#[async_trait]
impl MediaHost for StubMediaHost {
    async fn upload(&self, image: UploadedImage) -> Result<String, MediaHostError> {
        self.received
            .lock()
            .expect("media lock")
            .push((image.file_name.clone(), image.bytes.len()));
        match &self.reject_with {
            Some(message) => Err(MediaHostError::Rejected(message.clone())),
            None => Ok(format!(
                "https://res.cloudinary.test/{}",
                image.file_name.unwrap_or_else(|| "upload".into())
            )),
        }
    }
}

// ----- Application under test -----

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub media: Arc<StubMediaHost>,
    sessions: Arc<JwtSessionCodec>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_media(StubMediaHost::default())
    }

    pub fn with_media(media: StubMediaHost) -> Self {
        let store = Arc::new(MemoryStore::default());
        let media = Arc::new(media);
        let sessions = Arc::new(JwtSessionCodec::new(
            SESSION_SECRET,
            std::time::Duration::from_secs(3600),
        ));

        let state = ApiState {
            auth: Arc::new(AuthService::new(
                store.clone(),
                store.clone(),
                Arc::new(PlainHasher),
                sessions.clone(),
            )),
            categories: Arc::new(AdminCategoryService::new(store.clone(), store.clone())),
            tags: Arc::new(AdminTagService::new(store.clone(), store.clone())),
            posts: Arc::new(AdminPostService::new(store.clone(), store.clone())),
            blog: Arc::new(BlogService::new(store.clone(), store.clone())),
            dashboard: Arc::new(AdminDashboardService::new(store.clone())),
            uploads: Arc::new(ImageUploadService::new(media.clone())),
            health: store.clone(),
            cookies: CookieSettings {
                secure: false,
                max_age: time::Duration::hours(1),
            },
            max_upload_bytes: 64 * 1024,
        };

        Self {
            router: build_router(state),
            store,
            media,
            sessions,
        }
    }

    /// Token for a freshly seeded account with the given role.
    pub fn token_for(&self, role: Role) -> String {
        let email = format!("{}@example.com", Uuid::new_v4().simple());
        let user = self.store.seed_user(&email, Some("Password1"), role);
        self.sessions
            .issue(Identity { id: user.id, role })
            .expect("issue session")
            .token
    }

    pub fn admin_token(&self) -> String {
        self.token_for(Role::Admin)
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router should respond");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).expect("request should build"))
            .await
    }

    pub async fn create_category(&self, token: &str, name: &str, slug: &str) -> Value {
        let response = self
            .request(
                Method::POST,
                "/api/admin/categories",
                Some(token),
                Some(serde_json::json!({ "name": name, "slug": slug })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body
    }

    pub async fn create_tag(&self, token: &str, name: &str, slug: &str) -> Value {
        let response = self
            .request(
                Method::POST,
                "/api/admin/tags",
                Some(token),
                Some(serde_json::json!({ "name": name, "slug": slug })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body
    }

    pub async fn create_post(&self, token: &str, body: Value) -> Value {
        let response = self
            .request(Method::POST, "/api/admin/posts", Some(token), Some(body))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body
    }
}
