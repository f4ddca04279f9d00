use csv2ofx_core::{Transaction, TxnKind};

use crate::error::ConvertError;
use crate::mapping::FieldMapping;
use crate::row::RawRow;
use crate::{amount, date, fitid};

/// Fallback description when no description role is mapped or every mapped
/// cell is empty.
pub const DEFAULT_DESCRIPTION: &str = "TRANSACTION";

/// Hard OFX limit on the MEMO field.
pub const MAX_DESCRIPTION_LEN: usize = 255;

/// Builds normalized [`Transaction`]s from raw rows under one mapping.
pub struct RecordBuilder<'a> {
    mapping: &'a FieldMapping,
    decimal_separator: char,
    invert_values: bool,
    account_id: &'a str,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(
        mapping: &'a FieldMapping,
        decimal_separator: char,
        invert_values: bool,
        account_id: &'a str,
    ) -> Self {
        RecordBuilder {
            mapping,
            decimal_separator,
            invert_values,
            account_id,
        }
    }

    /// Build one transaction. `seq` is the row's ordinal position in the
    /// source, used only as the id-generation disambiguator.
    pub fn build(&self, row: &RawRow, seq: usize) -> Result<Transaction, ConvertError> {
        let date_raw = self.required(row, self.mapping.date.as_deref(), "date")?;
        let amount_raw = self.required(row, self.mapping.amount.as_deref(), "amount")?;

        let date = date::parse(date_raw)?;
        let mut amount = amount::normalize(amount_raw, self.decimal_separator)?;

        let description = self.description(row);

        // Explicit type column wins; otherwise the sign decides.
        let mut kind = self
            .mapping
            .kind
            .as_deref()
            .and_then(|col| row.get(col))
            .and_then(|v| v.parse::<TxnKind>().ok())
            .unwrap_or_else(|| TxnKind::from_amount(amount));

        // Inversion applies after derivation, uniformly for the whole run.
        if self.invert_values {
            amount = -amount;
            kind = kind.inverted();
        }

        let fitid = match self
            .mapping
            .id
            .as_deref()
            .and_then(|col| row.get(col))
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            // Explicit ids are taken verbatim, never overwritten.
            Some(explicit) => explicit.to_string(),
            None => fitid::generate(date, amount, &description, self.account_id, seq),
        };

        Ok(Transaction {
            date,
            amount,
            description,
            kind,
            fitid,
        })
    }

    fn required<'r>(
        &self,
        row: &'r RawRow,
        column: Option<&str>,
        role: &str,
    ) -> Result<&'r str, ConvertError> {
        let column =
            column.ok_or_else(|| ConvertError::MissingRequiredField(format!("{role} column")))?;
        row.get(column)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConvertError::MissingRequiredField(format!("{role} ({column})")))
    }

    fn description(&self, row: &RawRow) -> String {
        let joined = if !self.mapping.description_columns.is_empty() {
            let parts: Vec<&str> = self
                .mapping
                .description_columns
                .iter()
                .filter_map(|col| row.get(col))
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .collect();
            parts.join(self.mapping.separator.as_str())
        } else {
            self.mapping
                .description
                .as_deref()
                .and_then(|col| row.get(col))
                .map(str::trim)
                .unwrap_or_default()
                .to_string()
        };

        let text = if joined.is_empty() {
            DEFAULT_DESCRIPTION.to_string()
        } else {
            joined
        };

        truncate_chars(&text, MAX_DESCRIPTION_LEN)
    }
}

/// Truncate by character count, keeping multi-byte text valid UTF-8.
fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}
