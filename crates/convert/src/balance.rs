use csv2ofx_core::{Money, Transaction, TxnKind};

/// Running credit/debit totals over the accepted transaction stream.
///
/// Only transactions that survived date policy and caller exclusion are fed
/// in, so the totals reflect exactly what gets serialized.
#[derive(Debug, Default)]
pub struct BalanceAccumulator {
    credits: Money,
    debits: Money,
}

impl BalanceAccumulator {
    pub fn new() -> Self {
        BalanceAccumulator::default()
    }

    pub fn add(&mut self, tx: &Transaction) {
        match tx.kind {
            TxnKind::Credit => self.credits = self.credits + tx.amount.abs(),
            TxnKind::Debit => self.debits = self.debits + tx.amount.abs(),
        }
    }

    pub fn total_credits(&self) -> Money {
        self.credits
    }

    pub fn total_debits(&self) -> Money {
        self.debits
    }

    pub fn final_balance(&self, initial: Money) -> Money {
        initial + self.credits - self.debits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(cents: i64, kind: TxnKind) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            amount: Money::from_cents(cents),
            description: "t".into(),
            kind,
            fitid: "x".into(),
        }
    }

    #[test]
    fn totals_are_non_negative_sums() {
        let mut acc = BalanceAccumulator::new();
        acc.add(&tx(-10050, TxnKind::Debit));
        acc.add(&tx(25000, TxnKind::Credit));
        acc.add(&tx(-4950, TxnKind::Debit));
        assert_eq!(acc.total_debits(), Money::from_cents(15000));
        assert_eq!(acc.total_credits(), Money::from_cents(25000));
    }

    #[test]
    fn final_balance_from_initial() {
        let mut acc = BalanceAccumulator::new();
        acc.add(&tx(-10000, TxnKind::Debit));
        acc.add(&tx(30000, TxnKind::Credit));
        assert_eq!(acc.final_balance(Money::from_cents(5000)), Money::from_cents(25000));
    }

    #[test]
    fn empty_accumulator_keeps_initial() {
        let acc = BalanceAccumulator::new();
        assert_eq!(acc.final_balance(Money::from_cents(123)), Money::from_cents(123));
    }

    #[test]
    fn kind_decides_bucket_even_for_positive_debits() {
        // An inverted run can leave a Debit with a positive amount; the
        // kind, not the sign, picks the bucket.
        let mut acc = BalanceAccumulator::new();
        acc.add(&tx(10000, TxnKind::Debit));
        assert_eq!(acc.total_debits(), Money::from_cents(10000));
        assert_eq!(acc.total_credits(), Money::zero());
    }
}
