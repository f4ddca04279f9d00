use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::money::Money;

/// OFX transaction type. Only the two kinds a statement export distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxnKind {
    Debit,
    Credit,
}

impl TxnKind {
    /// Derive the kind from the sign of an amount: negative is a debit,
    /// zero and positive are credits.
    pub fn from_amount(amount: Money) -> Self {
        if amount.is_negative() {
            TxnKind::Debit
        } else {
            TxnKind::Credit
        }
    }

    pub fn inverted(self) -> Self {
        match self {
            TxnKind::Debit => TxnKind::Credit,
            TxnKind::Credit => TxnKind::Debit,
        }
    }

    /// The literal TRNTYPE value serialized into OFX.
    pub fn as_ofx(self) -> &'static str {
        match self {
            TxnKind::Debit => "DEBIT",
            TxnKind::Credit => "CREDIT",
        }
    }
}

impl FromStr for TxnKind {
    type Err = ();

    /// Case-insensitive match on the literal column values `DEBIT`/`CREDIT`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBIT" => Ok(TxnKind::Debit),
            "CREDIT" => Ok(TxnKind::Credit),
            _ => Err(()),
        }
    }
}

impl fmt::Display for TxnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ofx())
    }
}

/// One statement transaction, fully normalized and ready to serialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub amount: Money,
    pub description: String,
    pub kind: TxnKind,
    pub fitid: String,
}
