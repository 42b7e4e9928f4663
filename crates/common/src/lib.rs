pub mod canonical;
pub mod error;
pub mod types;
