//! Schema checks for incoming post and category payloads.
//!
//! Raw fields arrive as `Option<String>` so that "missing" and "empty" can be
//! told apart. Every value is trimmed before its rules are applied, and all
//! checks run before anything touches a store.

use validator::{Validate, ValidationErrors};

use crate::domain::Post;
use crate::error::DomainError;

/// Raw post fields as decoded from JSON or multipart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFields {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

/// Raw category fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFields {
    pub name: Option<String>,
}

/// A fully specified post, ready to be created.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewPost {
    #[validate(length(
        min = 1,
        max = 200,
        message = "title must be between 1 and 200 characters"
    ))]
    pub title: String,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
    #[validate(length(min = 1, message = "category must not be empty"))]
    pub category: String,
}

impl NewPost {
    pub fn parse(fields: PostFields) -> Result<Self, DomainError> {
        let mut missing = Vec::new();
        let title = required(fields.title, "title", &mut missing);
        let content = required(fields.content, "content", &mut missing);
        let category = required(fields.category, "category", &mut missing);

        if !missing.is_empty() {
            return Err(DomainError::Validation(missing.join(", ")));
        }

        let post = Self {
            title,
            content,
            category,
        };
        post.validate().map_err(into_domain_error)?;
        Ok(post)
    }
}

/// A partial post update; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct PostChanges {
    #[validate(length(
        min = 1,
        max = 200,
        message = "title must be between 1 and 200 characters"
    ))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: Option<String>,
    #[validate(length(min = 1, message = "category must not be empty"))]
    pub category: Option<String>,
}

impl PostChanges {
    pub fn parse(fields: PostFields) -> Result<Self, DomainError> {
        let changes = Self {
            title: fields.title.map(trimmed),
            content: fields.content.map(trimmed),
            category: fields.category.map(trimmed),
        };
        changes.validate().map_err(into_domain_error)?;
        Ok(changes)
    }
}

/// Re-run the post rules against a merged record before it is written back.
pub fn check_post(post: &Post) -> Result<(), DomainError> {
    NewPost {
        title: post.title.clone(),
        content: post.content.clone(),
        category: post.category_id.to_string(),
    }
    .validate()
    .map_err(into_domain_error)
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewCategory {
    #[validate(length(
        min = 1,
        max = 50,
        message = "name must be between 1 and 50 characters"
    ))]
    pub name: String,
}

impl NewCategory {
    pub fn parse(fields: CategoryFields) -> Result<Self, DomainError> {
        let Some(name) = fields.name else {
            return Err(DomainError::Validation("name is required".to_string()));
        };

        let category = Self {
            name: trimmed(name),
        };
        category.validate().map_err(into_domain_error)?;
        Ok(category)
    }
}

fn trimmed(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

fn required(value: Option<String>, field: &str, missing: &mut Vec<String>) -> String {
    match value {
        Some(value) => trimmed(value),
        None => {
            missing.push(format!("{field} is required"));
            String::new()
        }
    }
}

fn into_domain_error(errors: ValidationErrors) -> DomainError {
    let mut messages: Vec<(String, String)> = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        let field = field.to_string();
        for error in field_errors.iter() {
            let message = match &error.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            };
            messages.push((field.clone(), message));
        }
    }
    messages.sort();

    let joined = messages
        .into_iter()
        .map(|(_, message)| message)
        .collect::<Vec<_>>()
        .join(", ");
    DomainError::Validation(joined)
}
