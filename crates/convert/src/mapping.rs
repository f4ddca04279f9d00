use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Separator used when joining composite description columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionSeparator {
    #[default]
    Space,
    Dash,
    Comma,
    Pipe,
}

impl DescriptionSeparator {
    pub fn as_str(self) -> &'static str {
        match self {
            DescriptionSeparator::Space => " ",
            DescriptionSeparator::Dash => " - ",
            DescriptionSeparator::Comma => ", ",
            DescriptionSeparator::Pipe => " | ",
        }
    }
}

/// Maximum number of columns a composite description may draw from.
pub const MAX_DESCRIPTION_COLUMNS: usize = 4;

/// Associates logical transaction roles with input column names. `None`
/// means the role is not mapped; date and amount are the only roles a
/// conversion cannot run without.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    pub date: Option<String>,
    pub amount: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub id: Option<String>,
    /// Up to [`MAX_DESCRIPTION_COLUMNS`] columns joined by `separator`;
    /// takes precedence over `description` when non-empty.
    pub description_columns: Vec<String>,
    pub separator: DescriptionSeparator,
}

impl FieldMapping {
    /// Validate once at configuration time, so per-row lookups can assume
    /// the required roles exist.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.date.is_none() {
            return Err(ConvertError::MissingRequiredField("date column".into()));
        }
        if self.amount.is_none() {
            return Err(ConvertError::MissingRequiredField("amount column".into()));
        }
        if self.description_columns.len() > MAX_DESCRIPTION_COLUMNS {
            return Err(ConvertError::MissingRequiredField(format!(
                "at most {MAX_DESCRIPTION_COLUMNS} description columns, got {}",
                self.description_columns.len()
            )));
        }
        Ok(())
    }
}
