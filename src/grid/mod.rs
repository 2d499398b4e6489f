pub mod error;
pub mod hex_locator;
