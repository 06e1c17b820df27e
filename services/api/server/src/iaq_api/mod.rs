pub(crate) mod core;
pub(crate) mod error_recorder;
pub(crate) mod iaq_error_v1;
