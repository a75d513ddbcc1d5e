pub mod config;
pub mod dates;
pub mod test_helpers;
