pub mod money;
pub mod period;
pub mod transaction;

pub use money::Money;
pub use period::{DateStatus, PeriodError, StatementPeriod};
pub use transaction::{Transaction, TxnKind};
