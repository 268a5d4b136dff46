pub mod fields;
pub mod inspection;
pub mod query;
pub mod timestamp;
