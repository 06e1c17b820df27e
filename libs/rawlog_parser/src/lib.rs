pub mod error;
pub mod parser;

#[cfg(test)]
mod tests;

pub use error::{RawLogError, RawLogResult};
pub use parser::{FIELD_COUNT, NumericPolicy, ParsedLog, RawLogParser};
