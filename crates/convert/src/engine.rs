use std::collections::{HashMap, HashSet};
use std::io::Write;

use csv2ofx_core::{Money, Transaction};

use crate::balance::BalanceAccumulator;
use crate::builder::RecordBuilder;
use crate::config::{ConversionConfig, DateAction};
use crate::error::ConvertError;
use crate::ofx::{self, OfxStatement};
use crate::row::RawRow;

/// Conversion phases. Linear except that `Failed` is reachable from any
/// non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Parsing,
    Validating,
    Accumulating,
    Serializing,
    Done,
    Failed,
}

/// Caller-supplied per-row decisions: rows to drop outright, and per-row
/// overrides of the date-policy default action. Keys are 0-based ordinals
/// in the input.
#[derive(Debug, Default)]
pub struct RowDecisions {
    pub excluded: HashSet<usize>,
    pub date_overrides: HashMap<usize, DateAction>,
}

/// Outcome of one conversion run.
#[derive(Debug)]
pub struct ConversionResult {
    pub success: bool,
    pub transactions_written: usize,
    pub transactions_excluded: usize,
    /// The balance actually serialized (override included).
    pub final_balance: Money,
    pub error_detail: Option<String>,
}

impl ConversionResult {
    fn failed(detail: String) -> Self {
        ConversionResult {
            success: false,
            transactions_written: 0,
            transactions_excluded: 0,
            final_balance: Money::zero(),
            error_detail: Some(detail),
        }
    }
}

/// Drives one conversion: rows in, OFX text out.
///
/// Owns its config, accumulator, and state; conversions running in
/// parallel each get their own orchestrator and share nothing.
pub struct ConversionOrchestrator {
    config: ConversionConfig,
    decisions: RowDecisions,
    state: EngineState,
}

impl ConversionOrchestrator {
    pub fn new(config: ConversionConfig) -> Self {
        ConversionOrchestrator {
            config,
            decisions: RowDecisions::default(),
            state: EngineState::Idle,
        }
    }

    pub fn with_decisions(mut self, decisions: RowDecisions) -> Self {
        self.decisions = decisions;
        self
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Run the conversion, writing the OFX document to `out`.
    ///
    /// Row-level problems exclude single rows and are counted; config and
    /// output problems fail the run with `error_detail` set.
    pub fn run<W: Write>(
        &mut self,
        rows: impl IntoIterator<Item = RawRow>,
        out: W,
    ) -> ConversionResult {
        match self.try_run(rows, out) {
            Ok(result) => {
                self.advance(EngineState::Done);
                result
            }
            Err(err) => {
                self.advance(EngineState::Failed);
                tracing::error!(error = %err, "conversion failed");
                ConversionResult::failed(err.to_string())
            }
        }
    }

    fn try_run<W: Write>(
        &mut self,
        rows: impl IntoIterator<Item = RawRow>,
        out: W,
    ) -> Result<ConversionResult, ConvertError> {
        self.config.mapping.validate()?;
        let period = self
            .config
            .date_policy
            .as_ref()
            .map(|p| p.period())
            .transpose()?;

        // ── Parsing ──────────────────────────────────────────────────────
        self.advance(EngineState::Parsing);
        let mut built: Vec<(usize, Transaction)> = Vec::new();
        let mut excluded = 0usize;
        {
            let builder = RecordBuilder::new(
                &self.config.mapping,
                self.config.decimal_separator,
                self.config.invert_values,
                &self.config.account_id,
            );

            for (seq, row) in rows.into_iter().enumerate() {
                if self.decisions.excluded.contains(&seq) {
                    excluded += 1;
                    continue;
                }
                if row.is_empty() {
                    continue;
                }
                match builder.build(&row, seq) {
                    Ok(tx) => built.push((seq, tx)),
                    Err(err) if err.is_row_level() => {
                        tracing::warn!(row = seq, error = %err, "row excluded");
                        excluded += 1;
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        // ── Validating ───────────────────────────────────────────────────
        self.advance(EngineState::Validating);
        let mut accepted: Vec<Transaction> = Vec::with_capacity(built.len());
        for (seq, mut tx) in built {
            if let (Some(period), Some(policy)) = (period, self.config.date_policy.as_ref()) {
                if !period.contains(tx.date) {
                    let action = self
                        .decisions
                        .date_overrides
                        .get(&seq)
                        .copied()
                        .unwrap_or(policy.default_action);
                    match action {
                        DateAction::Keep => {}
                        DateAction::Clamp => tx.date = period.clamp(tx.date),
                        DateAction::Exclude => {
                            tracing::debug!(row = seq, date = %tx.date, "out of period, excluded");
                            excluded += 1;
                            continue;
                        }
                    }
                }
            }
            accepted.push(tx);
        }

        if accepted.is_empty() {
            return Err(ConvertError::EmptyTransactionSet);
        }

        // ── Accumulating ─────────────────────────────────────────────────
        self.advance(EngineState::Accumulating);
        let mut balance = BalanceAccumulator::new();
        for tx in &accepted {
            balance.add(tx);
        }
        let computed = balance.final_balance(self.config.initial_balance);
        let final_balance = self.config.final_balance_override.unwrap_or(computed);

        // ── Serializing ──────────────────────────────────────────────────
        self.advance(EngineState::Serializing);
        ofx::write_document(
            &OfxStatement {
                transactions: &accepted,
                account_id: &self.config.account_id,
                bank_name: &self.config.bank_name,
                currency: &self.config.currency,
                initial_balance: self.config.initial_balance,
                final_balance,
            },
            out,
        )?;

        tracing::info!(
            written = accepted.len(),
            excluded,
            balance = %final_balance,
            "conversion complete"
        );

        Ok(ConversionResult {
            success: true,
            transactions_written: accepted.len(),
            transactions_excluded: excluded,
            final_balance,
            error_detail: None,
        })
    }

    fn advance(&mut self, next: EngineState) {
        tracing::debug!(from = ?self.state, to = ?next, "state transition");
        self.state = next;
    }
}

/// Single conversion entry point: rows in, OFX to `out`.
pub fn convert<W: Write>(
    config: ConversionConfig,
    rows: impl IntoIterator<Item = RawRow>,
    out: W,
) -> ConversionResult {
    ConversionOrchestrator::new(config).run(rows, out)
}

/// Convenience wrapper returning the document as a string alongside the
/// result. The string is `None` when the run failed.
pub fn convert_to_string(
    config: ConversionConfig,
    rows: impl IntoIterator<Item = RawRow>,
) -> (ConversionResult, Option<String>) {
    let mut buf = Vec::new();
    let result = convert(config, rows, &mut buf);
    if result.success {
        (result, Some(String::from_utf8_lossy(&buf).into_owned()))
    } else {
        (result, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::FieldMapping;
    use std::sync::Arc;

    fn headers() -> Arc<[String]> {
        RawRow::headers(["data", "valor", "descricao", "id"])
    }

    fn rows(cells: &[[&str; 4]]) -> Vec<RawRow> {
        let h = headers();
        cells
            .iter()
            .map(|c| RawRow::new(h.clone(), c.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    fn config() -> ConversionConfig {
        ConversionConfig {
            mapping: FieldMapping {
                date: Some("data".into()),
                amount: Some("valor".into()),
                description: Some("descricao".into()),
                ..FieldMapping::default()
            },
            account_id: "1234".into(),
            bank_name: "Banco Teste".into(),
            ..ConversionConfig::default()
        }
    }

    #[test]
    fn bad_row_is_excluded_not_fatal() {
        let input = rows(&[
            ["01/10/2025", "-100,50", "Compra", ""],
            ["not-a-date", "-1,00", "Ruim", ""],
            ["02/10/2025", "sem valor", "Ruim", ""],
            ["03/10/2025", "50,00", "Estorno", ""],
        ]);
        let (result, ofx) = convert_to_string(config(), input);
        assert!(result.success);
        assert_eq!(result.transactions_written, 2);
        assert_eq!(result.transactions_excluded, 2);
        assert!(ofx.unwrap().contains("<MEMO>Estorno"));
    }

    #[test]
    fn caller_exclusions_are_skipped() {
        let input = rows(&[
            ["01/10/2025", "-100,50", "Compra", ""],
            ["02/10/2025", "-200,00", "Apagada", ""],
        ]);
        let mut decisions = RowDecisions::default();
        decisions.excluded.insert(1);
        let mut orch = ConversionOrchestrator::new(config()).with_decisions(decisions);
        let mut buf = Vec::new();
        let result = orch.run(input, &mut buf);
        assert_eq!(result.transactions_written, 1);
        assert_eq!(result.transactions_excluded, 1);
        assert!(!String::from_utf8_lossy(&buf).contains("Apagada"));
        assert_eq!(orch.state(), EngineState::Done);
    }

    #[test]
    fn empty_set_after_filtering_fails() {
        let input = rows(&[["not-a-date", "x", "", ""]]);
        let (result, ofx) = convert_to_string(config(), input);
        assert!(!result.success);
        assert!(result.error_detail.unwrap().contains("no transactions"));
        assert!(ofx.is_none());
    }

    #[test]
    fn inverted_period_fails_the_run() {
        let mut cfg = config();
        cfg.date_policy = Some(crate::config::DatePolicy {
            start: chrono::NaiveDate::from_ymd_opt(2025, 10, 31).unwrap(),
            end: chrono::NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            default_action: DateAction::Keep,
        });
        let input = rows(&[["15/10/2025", "-1,00", "Compra", ""]]);
        let (result, _) = convert_to_string(cfg, input);
        assert!(!result.success);
        assert!(result.error_detail.unwrap().contains("inverted"));
    }

    #[test]
    fn clamp_policy_moves_out_of_range_dates() {
        let mut cfg = config();
        cfg.date_policy = Some(crate::config::DatePolicy {
            start: chrono::NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            end: chrono::NaiveDate::from_ymd_opt(2025, 10, 31).unwrap(),
            default_action: DateAction::Clamp,
        });
        let input = rows(&[["15/09/2025", "-1,00", "Compra", ""]]);
        let (result, ofx) = convert_to_string(cfg, input);
        assert!(result.success);
        assert!(ofx.unwrap().contains("<DTPOSTED>20251001000000[-3:BRT]"));
    }

    #[test]
    fn exclude_policy_drops_and_counts() {
        let mut cfg = config();
        cfg.date_policy = Some(crate::config::DatePolicy {
            start: chrono::NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            end: chrono::NaiveDate::from_ymd_opt(2025, 10, 31).unwrap(),
            default_action: DateAction::Exclude,
        });
        let input = rows(&[
            ["15/09/2025", "-1,00", "Fora", ""],
            ["15/10/2025", "-2,00", "Dentro", ""],
        ]);
        let (result, ofx) = convert_to_string(cfg, input);
        assert!(result.success);
        assert_eq!(result.transactions_written, 1);
        assert_eq!(result.transactions_excluded, 1);
        assert!(!ofx.unwrap().contains("Fora"));
    }

    #[test]
    fn per_row_override_beats_default_action() {
        let mut cfg = config();
        cfg.date_policy = Some(crate::config::DatePolicy {
            start: chrono::NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            end: chrono::NaiveDate::from_ymd_opt(2025, 10, 31).unwrap(),
            default_action: DateAction::Exclude,
        });
        let mut decisions = RowDecisions::default();
        decisions.date_overrides.insert(0, DateAction::Keep);
        let input = rows(&[["15/09/2025", "-1,00", "Mantida", ""]]);
        let mut buf = Vec::new();
        let result = ConversionOrchestrator::new(cfg)
            .with_decisions(decisions)
            .run(input, &mut buf);
        assert!(result.success);
        assert!(String::from_utf8_lossy(&buf).contains("Mantida"));
    }

    #[test]
    fn balance_reflects_survivors_only() {
        let mut cfg = config();
        cfg.initial_balance = Money::from_cents(10000);
        cfg.date_policy = Some(crate::config::DatePolicy {
            start: chrono::NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            end: chrono::NaiveDate::from_ymd_opt(2025, 10, 31).unwrap(),
            default_action: DateAction::Exclude,
        });
        let input = rows(&[
            ["15/10/2025", "-100,00", "Compra", ""],
            ["15/09/2025", "-999,00", "Fora", ""],
        ]);
        let (result, _) = convert_to_string(cfg, input);
        // 100.00 - 100.00 debit
        assert_eq!(result.final_balance, Money::zero());
    }

    #[test]
    fn override_balance_is_serialized_and_reported() {
        let mut cfg = config();
        cfg.final_balance_override = Some(Money::from_cents(77700));
        let input = rows(&[["01/10/2025", "-100,50", "Compra", ""]]);
        let (result, ofx) = convert_to_string(cfg, input);
        assert_eq!(result.final_balance, Money::from_cents(77700));
        assert!(ofx.unwrap().contains("<BALAMT>777.00"));
    }

    #[test]
    fn unvalidated_mapping_fails_fast() {
        let mut cfg = config();
        cfg.mapping.amount = None;
        let input = rows(&[["01/10/2025", "-100,50", "Compra", ""]]);
        let (result, _) = convert_to_string(cfg, input);
        assert!(!result.success);
        assert!(result.error_detail.unwrap().contains("amount column"));
    }
}
