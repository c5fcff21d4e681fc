//! Learning content items (courses, lessons, worksheets)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::store::Record;
use crate::validation::validate_not_blank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub grade_level: Option<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateContentInput {
    #[validate(
        length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"),
        custom(function = "validate_not_blank", message = "Name cannot be blank")
    )]
    pub name: String,

    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Subject must be between 1 and 100 characters"))]
    pub subject: Option<String>,

    #[validate(range(min = 1, max = 12, message = "Grade level must be between 1 and 12"))]
    pub grade_level: Option<u8>,
}

impl CreateContentInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateContentInput {
    #[validate(
        length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"),
        custom(function = "validate_not_blank", message = "Name cannot be blank")
    )]
    pub name: Option<String>,

    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Subject must be between 1 and 100 characters"))]
    pub subject: Option<String>,

    #[validate(range(min = 1, max = 12, message = "Grade level must be between 1 and 12"))]
    pub grade_level: Option<u8>,
}

impl Record for ContentItem {
    type CreateInput = CreateContentInput;
    type UpdateInput = UpdateContentInput;

    const KIND: &'static str = "Content item";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn materialize(id: String, input: CreateContentInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            subject: input.subject,
            grade_level: input.grade_level,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, input: UpdateContentInput, now: DateTime<Utc>) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(description) = input.description {
            self.description = Some(description);
        }
        if let Some(subject) = input.subject {
            self.subject = Some(subject);
        }
        if let Some(grade_level) = input.grade_level {
            self.grade_level = Some(grade_level);
        }
        self.updated_at = now;
    }
}
