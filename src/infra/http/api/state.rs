use std::sync::Arc;

use crate::application::admin::categories::AdminCategoryService;
use crate::application::admin::dashboard::AdminDashboardService;
use crate::application::admin::posts::AdminPostService;
use crate::application::admin::tags::AdminTagService;
use crate::application::auth::AuthService;
use crate::application::blog::BlogService;
use crate::application::repos::HealthRepo;
use crate::application::uploads::ImageUploadService;

#[derive(Clone)]
pub struct ApiState {
    pub auth: Arc<AuthService>,
    pub categories: Arc<AdminCategoryService>,
    pub tags: Arc<AdminTagService>,
    pub posts: Arc<AdminPostService>,
    pub blog: Arc<BlogService>,
    pub dashboard: Arc<AdminDashboardService>,
    pub uploads: Arc<ImageUploadService>,
    pub health: Arc<dyn HealthRepo>,
    pub cookies: CookieSettings,
    /// Upper bound for multipart upload bodies.
    pub max_upload_bytes: usize,
}

/// Attributes of the session cookie set on sign-in.
#[derive(Debug, Clone, Copy)]
pub struct CookieSettings {
    pub secure: bool,
    pub max_age: time::Duration,
}
