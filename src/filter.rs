//! Client-side comment filtering.
//!
//! Tokens look like `field:value` and are ANDed together. Recognized fields:
//!
//! - `author:<substring>` matches the author's display name, case-insensitive
//! - `text:<substring>` matches the comment body, case-insensitive
//! - `date:<YYYY-MM-DD>` matches the calendar day exactly
//! - `date:<start> to <end>` matches days within the inclusive range
//!
//! A token that can't be understood produces a [`FilterWarning`] and is
//! dropped; it never excludes anything.

use thiserror::Error;
use tracing::debug;

use crate::model::record::Comment;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterToken {
    Author(String),
    Text(String),
    Day(String),
    DayRange { start: String, end: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterWarning {
    #[error("Invalid filter format: {token}. Expected field:value")]
    MissingSeparator { token: String },

    #[error("Invalid filter field '{field}' in {token}. Expected author, text or date")]
    UnknownField { token: String, field: String },

    #[error("Invalid date range in {token}. Expected <start> to <end>")]
    BadRange { token: String },
}

impl FilterToken {
    pub fn parse(token: &str) -> Result<Self, FilterWarning> {
        let (field, value) = token
            .split_once(':')
            .ok_or_else(|| FilterWarning::MissingSeparator {
                token: token.to_string(),
            })?;
        let field = field.trim().to_lowercase();
        let value = value
            .trim()
            .trim_matches(&['"', '\''][..])
            .to_lowercase();

        match field.as_str() {
            "author" => Ok(Self::Author(value)),
            "text" => Ok(Self::Text(value)),
            "date" if value.contains("to") => {
                let bounds: Vec<&str> = value.split("to").collect();
                match bounds.as_slice() {
                    [start, end] => Ok(Self::DayRange {
                        start: start.trim().to_string(),
                        end: end.trim().to_string(),
                    }),
                    _ => Err(FilterWarning::BadRange {
                        token: token.to_string(),
                    }),
                }
            }
            "date" => Ok(Self::Day(value)),
            _ => Err(FilterWarning::UnknownField {
                token: token.to_string(),
                field,
            }),
        }
    }

    pub fn matches(&self, comment: &Comment) -> bool {
        match self {
            Self::Author(needle) => comment
                .author
                .as_deref()
                .unwrap_or_default()
                .to_lowercase()
                .contains(needle.as_str()),
            Self::Text(needle) => comment.body.to_lowercase().contains(needle.as_str()),
            // zero-padded ISO days order correctly as plain strings
            Self::Day(day) => comment.day() == day,
            Self::DayRange { start, end } => {
                let day = comment.day();
                day >= start.as_str() && day <= end.as_str()
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommentFilter {
    tokens: Vec<FilterToken>,
}

impl CommentFilter {
    /// Parse every token, keeping the good ones. Each rejected token comes
    /// back as a warning for the caller to show.
    pub fn parse<I, S>(raw: I) -> (Self, Vec<FilterWarning>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tokens = Vec::new();
        let mut warnings = Vec::new();
        for token in raw {
            match FilterToken::parse(token.as_ref()) {
                Ok(t) => tokens.push(t),
                Err(w) => {
                    debug!("dropped filter token: {w}");
                    warnings.push(w);
                }
            }
        }
        (Self { tokens }, warnings)
    }

    pub fn tokens(&self) -> &[FilterToken] {
        &self.tokens
    }

    pub fn matches(&self, comment: &Comment) -> bool {
        self.tokens.iter().all(|t| t.matches(comment))
    }

    pub fn apply(&self, comments: Vec<Comment>) -> Vec<Comment> {
        comments.into_iter().filter(|c| self.matches(c)).collect()
    }
}
