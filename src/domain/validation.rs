//! Pure input validation producing field → message maps.

use std::{collections::BTreeMap, fmt};

use email_address::EmailAddress;
use serde::Serialize;

use crate::domain::{
    error::DomainError,
    inputs::{CategoryPatch, NewCategory, NewPost, NewTag, PostPatch, SignIn, SignUp, TagPatch},
    slug::is_valid_slug,
};

const TITLE_MAX: usize = 255;
const CATEGORY_NAME_MAX: usize = 100;
const TAG_NAME_MAX: usize = 50;
const USER_NAME_MIN: usize = 2;
const USER_NAME_MAX: usize = 50;
const PASSWORD_MIN: usize = 8;

/// Field name → first failure message for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    /// Records a failure; later failures for the same field are dropped.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn into_result(self) -> Result<(), DomainError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

fn check_required(errors: &mut FieldErrors, field: &'static str, label: &str, value: &str) {
    if value.is_empty() {
        errors.push(field, format!("{label} is required"));
    }
}

fn check_max_chars(
    errors: &mut FieldErrors,
    field: &'static str,
    label: &str,
    value: &str,
    max: usize,
) {
    if value.chars().count() > max {
        errors.push(field, format!("{label} must be less than {max} characters"));
    }
}

fn check_slug(errors: &mut FieldErrors, field: &'static str, value: &str) {
    check_required(errors, field, "Slug", value);
    if !value.is_empty() && !is_valid_slug(value) {
        errors.push(field, "Slug must be lowercase with hyphens");
    }
}

fn check_category_name(errors: &mut FieldErrors, value: &str) {
    check_required(errors, "name", "Name", value);
    check_max_chars(errors, "name", "Name", value, CATEGORY_NAME_MAX);
}

fn check_tag_name(errors: &mut FieldErrors, value: &str) {
    check_required(errors, "name", "Name", value);
    check_max_chars(errors, "name", "Name", value, TAG_NAME_MAX);
}

fn check_title(errors: &mut FieldErrors, value: &str) {
    check_required(errors, "title", "Title", value);
    check_max_chars(errors, "title", "Title", value, TITLE_MAX);
}

fn check_content(errors: &mut FieldErrors, value: &str) {
    check_required(errors, "content", "Content", value);
}

fn check_email(errors: &mut FieldErrors, value: &str) {
    if value.is_empty() {
        errors.push("email", "Email is required");
    } else if !EmailAddress::is_valid(value) {
        errors.push("email", "Please enter a valid email address");
    }
}

/// Minimum length plus at least one lowercase, one uppercase and one digit.
pub fn password_is_strong(password: &str) -> bool {
    password.chars().count() >= PASSWORD_MIN
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

impl NewCategory {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = FieldErrors::default();
        check_category_name(&mut errors, &self.name);
        check_slug(&mut errors, "slug", &self.slug);
        errors.into_result()
    }
}

impl CategoryPatch {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = FieldErrors::default();
        if let Some(name) = self.name.as_deref() {
            check_category_name(&mut errors, name);
        }
        if let Some(slug) = self.slug.as_deref() {
            check_slug(&mut errors, "slug", slug);
        }
        errors.into_result()
    }
}

impl NewTag {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = FieldErrors::default();
        check_tag_name(&mut errors, &self.name);
        check_slug(&mut errors, "slug", &self.slug);
        errors.into_result()
    }
}

impl TagPatch {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = FieldErrors::default();
        if let Some(name) = self.name.as_deref() {
            check_tag_name(&mut errors, name);
        }
        if let Some(slug) = self.slug.as_deref() {
            check_slug(&mut errors, "slug", slug);
        }
        errors.into_result()
    }
}

impl NewPost {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = FieldErrors::default();
        check_title(&mut errors, &self.title);
        check_content(&mut errors, &self.content);
        check_slug(&mut errors, "slug", &self.slug);
        errors.into_result()
    }
}

impl PostPatch {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = FieldErrors::default();
        if let Some(title) = self.title.as_deref() {
            check_title(&mut errors, title);
        }
        if let Some(content) = self.content.as_deref() {
            check_content(&mut errors, content);
        }
        if let Some(slug) = self.slug.as_deref() {
            check_slug(&mut errors, "slug", slug);
        }
        errors.into_result()
    }
}

impl SignUp {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = FieldErrors::default();

        let name_len = self.name.chars().count();
        if name_len < USER_NAME_MIN {
            errors.push("name", "Name must be at least 2 characters");
        } else if name_len > USER_NAME_MAX {
            errors.push("name", "Name must be less than 50 characters");
        }

        check_email(&mut errors, &self.email);

        if self.password.chars().count() < PASSWORD_MIN {
            errors.push("password", "Password must be at least 8 characters");
        } else if !password_is_strong(&self.password) {
            errors.push(
                "password",
                "Password must contain at least one uppercase letter, one lowercase letter, and one number",
            );
        }

        if self.confirm_password.is_empty() {
            errors.push("confirmPassword", "Please confirm your password");
        } else if self.confirm_password != self.password {
            errors.push("confirmPassword", "Passwords don't match");
        }

        errors.into_result()
    }
}

impl SignIn {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = FieldErrors::default();
        check_email(&mut errors, &self.email);
        if self.password.is_empty() {
            errors.push("password", "Password is required");
        }
        errors.into_result()
    }
}
