use chrono::NaiveDate;
use std::io::Write;

use csv2ofx_core::{Money, Transaction};

use crate::error::ConvertError;

/// Everything the writer needs to emit one credit-card statement response.
#[derive(Debug)]
pub struct OfxStatement<'a> {
    pub transactions: &'a [Transaction],
    pub account_id: &'a str,
    pub bank_name: &'a str,
    pub currency: &'a str,
    pub initial_balance: Money,
    pub final_balance: Money,
}

/// Fixed OFX 1.0.2 header block. Unquoted key:value lines in this exact
/// order, followed by a blank line, precede the SGML body.
const HEADER: &str = "OFXHEADER:100\n\
DATA:OFXSGML\n\
VERSION:102\n\
SECURITY:NONE\n\
ENCODING:USASCII\n\
CHARSET:1252\n\
COMPRESSION:NONE\n\
OLDFILEUID:NONE\n\
NEWFILEUID:NONE\n\
\n";

/// Full date-time stamp: midnight in the fixed BRT offset.
fn stamp(date: NaiveDate) -> String {
    format!("{}000000[-3:BRT]", date.format("%Y%m%d"))
}

/// Serialize the statement as OFX 1.0.2 SGML.
///
/// Value-carrying tags are left unclosed per SGML convention; aggregate
/// tags are closed. Transactions keep their accumulated order, and the
/// transaction-list DTSTART/DTEND come from the minimum and maximum
/// transaction dates. The document contains no wall-clock values, so the
/// same input always serializes to the same bytes.
pub fn write_document<W: Write>(stmt: &OfxStatement<'_>, mut w: W) -> Result<(), ConvertError> {
    let (Some(first), Some(last)) = (
        stmt.transactions.iter().map(|t| t.date).min(),
        stmt.transactions.iter().map(|t| t.date).max(),
    ) else {
        return Err(ConvertError::EmptyTransactionSet);
    };
    let as_of = stamp(last);

    w.write_all(HEADER.as_bytes())?;

    writeln!(w, "<OFX>")?;
    writeln!(w, "<SIGNONMSGSRSV1>")?;
    writeln!(w, "<SONRS>")?;
    writeln!(w, "<STATUS>")?;
    writeln!(w, "<CODE>0")?;
    writeln!(w, "<SEVERITY>INFO")?;
    writeln!(w, "</STATUS>")?;
    writeln!(w, "<DTSERVER>{as_of}")?;
    writeln!(w, "<LANGUAGE>POR")?;
    writeln!(w, "<FI>")?;
    writeln!(w, "<ORG>{}", stmt.bank_name)?;
    writeln!(w, "</FI>")?;
    writeln!(w, "</SONRS>")?;
    writeln!(w, "</SIGNONMSGSRSV1>")?;
    writeln!(w, "<CREDITCARDMSGSRSV1>")?;
    writeln!(w, "<CCSTMTTRNRS>")?;
    writeln!(w, "<TRNUID>1")?;
    writeln!(w, "<STATUS>")?;
    writeln!(w, "<CODE>0")?;
    writeln!(w, "<SEVERITY>INFO")?;
    writeln!(w, "</STATUS>")?;
    writeln!(w, "<CCSTMTRS>")?;
    writeln!(w, "<CURDEF>{}", stmt.currency)?;
    writeln!(w, "<CCACCTFROM>")?;
    writeln!(w, "<ACCTID>{}", stmt.account_id)?;
    writeln!(w, "</CCACCTFROM>")?;
    writeln!(w, "<BANKTRANLIST>")?;
    writeln!(w, "<DTSTART>{}", first.format("%Y%m%d"))?;
    writeln!(w, "<DTEND>{}", last.format("%Y%m%d"))?;

    for tx in stmt.transactions {
        writeln!(w, "<STMTTRN>")?;
        writeln!(w, "<TRNTYPE>{}", tx.kind.as_ofx())?;
        writeln!(w, "<DTPOSTED>{}", stamp(tx.date))?;
        writeln!(w, "<TRNAMT>{}", tx.amount)?;
        writeln!(w, "<FITID>{}", tx.fitid)?;
        writeln!(w, "<MEMO>{}", tx.description)?;
        writeln!(w, "</STMTTRN>")?;
    }

    writeln!(w, "</BANKTRANLIST>")?;
    writeln!(w, "<LEDGERBAL>")?;
    writeln!(w, "<BALAMT>{}", stmt.final_balance)?;
    writeln!(w, "<DTASOF>{as_of}")?;
    writeln!(w, "</LEDGERBAL>")?;
    writeln!(w, "<AVAILBAL>")?;
    writeln!(w, "<BALAMT>{}", stmt.initial_balance)?;
    writeln!(w, "<DTASOF>{as_of}")?;
    writeln!(w, "</AVAILBAL>")?;
    writeln!(w, "</CCSTMTRS>")?;
    writeln!(w, "</CCSTMTTRNRS>")?;
    writeln!(w, "</CREDITCARDMSGSRSV1>")?;
    writeln!(w, "</OFX>")?;
    w.flush()?;

    Ok(())
}

/// Serialize to an in-memory string.
pub fn to_string(stmt: &OfxStatement<'_>) -> Result<String, ConvertError> {
    let mut buf = Vec::new();
    write_document(stmt, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
