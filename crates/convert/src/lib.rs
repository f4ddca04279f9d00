//! Conversion engine: delimited bank-statement rows in, OFX 1.0.2 SGML out.

pub mod amount;
pub mod balance;
pub mod builder;
pub mod config;
pub mod date;
pub mod engine;
pub mod error;
pub mod fitid;
pub mod mapping;
pub mod ofx;
pub mod row;

pub use config::{ConversionConfig, DateAction, DatePolicy};
pub use engine::{convert, convert_to_string, ConversionOrchestrator, ConversionResult, RowDecisions};
pub use error::ConvertError;
pub use mapping::{DescriptionSeparator, FieldMapping};
pub use row::RawRow;
