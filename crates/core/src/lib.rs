mod assets;

pub mod client;
pub mod config;
pub mod message;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod view;

pub use crate::assets::get_data_dir;
