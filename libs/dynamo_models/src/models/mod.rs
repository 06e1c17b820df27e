pub mod attributes;
pub mod readings;
