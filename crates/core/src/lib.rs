pub mod config;
pub mod error;
pub mod settings;

pub use config::Config;
pub use error::*;
pub use settings::*;
