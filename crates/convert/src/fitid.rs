use chrono::NaiveDate;
use uuid::Uuid;

use csv2ofx_core::Money;

/// Namespace for name-based FITIDs: `uuid5(NAMESPACE_DNS, "csv2ofx.fitid")`.
///
/// Hard-coded on purpose. Regenerating this constant would silently change
/// every id ever issued, which downstream financial software treats as a
/// brand-new set of transactions.
const FITID_NAMESPACE: Uuid = Uuid::from_u128(0x7641_5136_3a39_58d8_98de_31d2_0e5e_af7b);

/// Derive a stable transaction id from the normalized transaction fields.
///
/// Identical inputs always produce the identical id, so re-running a
/// conversion of the same file reproduces the same FITIDs. `disambiguator`
/// is the row's ordinal position in the source, which separates rows that
/// are field-identical; note this also means reordering rows in the input
/// changes the ids of such duplicates.
pub fn generate(
    date: NaiveDate,
    amount: Money,
    memo: &str,
    account: &str,
    disambiguator: usize,
) -> String {
    let canonical = format!(
        "{}|{}|{}|{}|{}",
        date.format("%Y%m%d"),
        amount,
        memo.trim().to_lowercase(),
        account.trim(),
        disambiguator,
    );
    Uuid::new_v5(&FITID_NAMESPACE, canonical.as_bytes()).to_string()
}
