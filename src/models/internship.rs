// src/models/internship.rs

use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::{Validate, ValidationError};

/// Represents the 'internship_applications' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternshipApplication {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college: Option<String>,
    pub domain: String,
    pub resume_url: Option<String>,
    pub message: Option<String>,
    /// 'received' on intake; reviewers advance it from the admin panel.
    pub status: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for submitting an internship application.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInternshipRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 7, max = 20, message = "Phone must be between 7 and 20 characters"))]
    pub phone: String,
    #[validate(length(max = 150))]
    pub college: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Domain is required"))]
    pub domain: String,
    #[validate(custom(function = validate_resume_url))]
    pub resume_url: Option<String>,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
}

fn validate_resume_url(resume_url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(resume_url) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => Ok(()),
        _ => Err(ValidationError::new("invalid_resume_url")),
    }
}
