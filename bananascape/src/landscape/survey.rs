//! Survey items and their validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::errors::{BananascapeError, SurveyValidationError};

/// A survey score between 1 (bleakest) and 5 (most radiant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Score(u8);

impl Score {
    /// Lowest score.
    pub const MIN: u8 = 1;
    /// Highest score.
    pub const MAX: u8 = 5;

    /// Validates a raw score.
    pub fn new(value: i64) -> Result<Self, SurveyValidationError> {
        match u8::try_from(value) {
            Ok(v) if (Self::MIN..=Self::MAX).contains(&v) => Ok(Self(v)),
            _ => Err(SurveyValidationError::ScoreOutOfRange {
                index: None,
                score: value,
            }),
        }
    }

    /// Returns `None` outside 1..=5. Usable in constants.
    #[must_use]
    pub const fn checked(value: u8) -> Option<Self> {
        if value < Self::MIN || value > Self::MAX {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Returns the score as an integer.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = SurveyValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One answered survey question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyItem {
    /// What the element depicts, e.g. "sky".
    pub category: String,
    /// How well it is doing.
    pub score: Score,
}

impl SurveyItem {
    /// Creates an item, validating the score.
    pub fn new(category: impl Into<String>, score: i64) -> Result<Self, SurveyValidationError> {
        Ok(Self {
            category: category.into(),
            score: Score::new(score)?,
        })
    }
}

/// Checks that a survey is non-empty and every category is non-blank.
pub fn validate_survey(items: &[SurveyItem]) -> Result<(), SurveyValidationError> {
    if items.is_empty() {
        return Err(SurveyValidationError::Empty);
    }
    if let Some(index) = items.iter().position(|i| i.category.trim().is_empty()) {
        return Err(SurveyValidationError::BlankCategory { index });
    }
    Ok(())
}

/// Parses and validates a survey from a JSON value.
///
/// Errors name the offending item, unlike plain deserialization.
pub fn parse_survey_value(
    value: &serde_json::Value,
) -> Result<Vec<SurveyItem>, SurveyValidationError> {
    let entries = value.as_array().ok_or_else(|| {
        SurveyValidationError::Parse("expected a JSON array of survey items".to_string())
    })?;

    let mut items = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let category = entry
            .get("category")
            .ok_or(SurveyValidationError::MissingField {
                index,
                field: "category",
            })?
            .as_str()
            .ok_or_else(|| {
                SurveyValidationError::Parse(format!("item {index}: category must be a string"))
            })?;
        let raw_score = entry.get("score").ok_or(SurveyValidationError::MissingField {
            index,
            field: "score",
        })?;
        let score = raw_score.as_i64().ok_or_else(|| {
            SurveyValidationError::Parse(format!("item {index}: score must be an integer"))
        })?;
        let score = Score::new(score).map_err(|_| SurveyValidationError::ScoreOutOfRange {
            index: Some(index),
            score,
        })?;
        items.push(SurveyItem {
            category: category.to_string(),
            score,
        });
    }

    validate_survey(&items)?;
    Ok(items)
}

/// Parses and validates a survey from a JSON string.
pub fn parse_survey(input: &str) -> Result<Vec<SurveyItem>, SurveyValidationError> {
    let value: serde_json::Value =
        serde_json::from_str(input).map_err(|e| SurveyValidationError::Parse(e.to_string()))?;
    parse_survey_value(&value)
}

/// Loads a survey from a `.json` file path or an inline JSON string.
pub async fn load_survey(input: &str) -> Result<Vec<SurveyItem>, BananascapeError> {
    let trimmed = input.trim();
    if Path::new(trimmed)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    {
        let contents = tokio::fs::read_to_string(trimmed).await?;
        Ok(parse_survey(&contents)?)
    } else {
        Ok(parse_survey(trimmed)?)
    }
}
