pub mod error;
pub mod scratch;
