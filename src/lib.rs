pub mod core;
pub mod logging;
pub mod security;

pub use self::core::*;
pub use security::{CommandError, JarSignerExecutor, JarSignerOutput};
