pub mod csv;
pub mod extractors;
