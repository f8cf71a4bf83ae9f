//! Book model and request payloads

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Wire and storage format of `release_date`
pub const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

pub static RELEASE_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid release date regex"));

/// Book record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i32,
    /// Title
    pub name: String,
    pub author: String,
    /// Unique across the catalog
    pub isbn: String,
    pub release_date: NaiveDate,
    /// `false` while the book is checked out
    pub availability: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/replace book request.
///
/// Every field is optional at the deserialization level so that missing
/// fields surface as field-level validation errors rather than a body
/// rejection. Text fields are trimmed on the way in, so a blank value
/// fails the length rule.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    #[validate(
        required(message = "Name is required"),
        length(min = 1, max = 100, message = "Name must be between 1 and 100 characters")
    )]
    #[serde(default, deserialize_with = "trimmed")]
    pub name: Option<String>,
    #[validate(
        required(message = "Author is required"),
        length(min = 1, max = 100, message = "Author must be between 1 and 100 characters")
    )]
    #[serde(default, deserialize_with = "trimmed")]
    pub author: Option<String>,
    #[validate(
        required(message = "ISBN is required"),
        length(min = 1, max = 20, message = "ISBN must be between 1 and 20 characters")
    )]
    #[serde(default, deserialize_with = "trimmed")]
    pub isbn: Option<String>,
    #[validate(
        required(message = "Release date is required"),
        regex(path = *RELEASE_DATE_RE, message = "Invalid date format (YYYY-MM-DD)")
    )]
    pub release_date: Option<String>,
}

/// Validated book fields, ready for persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookData {
    pub name: String,
    pub author: String,
    pub isbn: String,
    pub release_date: NaiveDate,
}

impl TryFrom<BookInput> for BookData {
    type Error = AppError;

    fn try_from(input: BookInput) -> AppResult<Self> {
        input.validate()?;

        let missing =
            |field: &str| AppError::invalid_field(field, format!("{} is required", field));
        let release_date = input.release_date.ok_or_else(|| missing("releaseDate"))?;

        Ok(Self {
            name: input.name.ok_or_else(|| missing("name"))?,
            author: input.author.ok_or_else(|| missing("author"))?,
            isbn: input.isbn.ok_or_else(|| missing("isbn"))?,
            release_date: parse_release_date(&release_date).ok_or_else(|| {
                AppError::invalid_field("releaseDate", "Invalid date format (YYYY-MM-DD)")
            })?,
        })
    }
}

/// ISBN lookup query parameters
#[derive(Debug, Default, Deserialize, Validate)]
pub struct BookSearchQuery {
    #[validate(
        required(message = "ISBN query parameter is required"),
        length(min = 1, message = "ISBN query parameter is required")
    )]
    #[serde(default, deserialize_with = "trimmed")]
    pub isbn: Option<String>,
}

/// Strip surrounding whitespace from an optional string field
fn trimmed<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|s| s.trim().to_string()))
}

/// Parse a `YYYY-MM-DD` calendar date, rejecting impossible days.
///
/// The derive only checks the shape; days such as `2023-02-30` are caught
/// here when the input is converted into [`BookData`].
pub fn parse_release_date(value: &str) -> Option<NaiveDate> {
    if !RELEASE_DATE_RE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, RELEASE_DATE_FORMAT).ok()
}
