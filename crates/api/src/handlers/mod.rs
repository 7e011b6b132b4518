pub mod fallback;
pub mod records;
