//! Selection/filtering (C9)
pub mod filter;
