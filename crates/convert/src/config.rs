use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use csv2ofx_core::{Money, PeriodError, StatementPeriod};

use crate::mapping::FieldMapping;

/// What to do with a transaction whose date falls outside the statement
/// period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateAction {
    /// Export it unchanged.
    #[default]
    Keep,
    /// Snap the date to the nearest period boundary.
    Clamp,
    /// Drop it from the export.
    Exclude,
}

/// Date validation settings: the statement period plus the default action
/// for out-of-range rows. The caller may override the action per row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatePolicy {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub default_action: DateAction,
}

impl DatePolicy {
    /// The period is validated here, not at deserialization, so an
    /// inverted range surfaces as a conversion failure with detail.
    pub fn period(&self) -> Result<StatementPeriod, PeriodError> {
        StatementPeriod::new(self.start, self.end)
    }
}

/// Everything one conversion run needs. Immutable for the duration of the
/// run and owned by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    pub mapping: FieldMapping,
    /// CSV field delimiter, consumed by the caller's reader.
    pub delimiter: char,
    /// Decimal separator expected in amount cells.
    pub decimal_separator: char,
    /// Multiply every amount by -1 and swap debit/credit.
    pub invert_values: bool,
    pub date_policy: Option<DatePolicy>,
    pub account_id: String,
    pub bank_name: String,
    pub currency: String,
    pub initial_balance: Money,
    /// When set, serialized as the ledger balance instead of the computed
    /// one. Serialization only; the computed balance is still reported.
    pub final_balance_override: Option<Money>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        ConversionConfig {
            mapping: FieldMapping::default(),
            delimiter: ';',
            decimal_separator: ',',
            invert_values: false,
            date_policy: None,
            account_id: String::new(),
            bank_name: String::new(),
            currency: "BRL".to_string(),
            initial_balance: Money::zero(),
            final_balance_override: None,
        }
    }
}
