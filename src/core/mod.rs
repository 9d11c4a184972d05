pub mod builder;
pub mod command_line;
pub mod config;
pub mod config_loader;
pub mod error;
pub mod request;

pub use builder::*;
pub use command_line::*;
pub use config::*;
pub use config_loader::*;
pub use error::*;
pub use request::*;
