pub mod payload;
pub mod request_id;
