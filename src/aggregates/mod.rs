pub mod error;
pub(crate) mod fields;
pub mod index;
pub mod loader;
pub mod report;
pub mod rollup;
