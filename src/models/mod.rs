pub mod classify_types;
pub mod review_types;
