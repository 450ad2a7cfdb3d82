//! Input contracts accepted by the admin and auth services.
//!
//! Each entity has a "create" shape with every required field present and a
//! "patch" shape where `None` means "leave the stored value untouched".

use std::fmt;

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.slug.is_none() && self.description.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
}

impl TagPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.slug.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub slug: String,
    pub published: bool,
    pub category_ids: Vec<Uuid>,
    pub tag_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub slug: Option<String>,
    pub published: Option<bool>,
    /// When present, replaces the whole category set.
    pub category_ids: Option<Vec<Uuid>>,
    /// When present, replaces the whole tag set.
    pub tag_ids: Option<Vec<Uuid>>,
    /// Set when the request named another field, even as `null`. Such a
    /// patch is never a bare publish toggle.
    pub other_fields_present: bool,
}

impl PostPatch {
    /// `Some(flag)` when the patch does nothing but toggle `published`.
    pub fn publish_toggle(&self) -> Option<bool> {
        let only_published = !self.other_fields_present
            && self.title.is_none()
            && self.content.is_none()
            && self.excerpt.is_none()
            && self.slug.is_none()
            && self.category_ids.is_none()
            && self.tag_ids.is_none();
        if only_published { self.published } else { None }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SignUp {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl fmt::Debug for SignUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUp")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SignIn {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SignIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignIn")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}
