pub mod error_logger;

pub use error_logger::{ErrorHistory, GodotLogger};
