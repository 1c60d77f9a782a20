// crates/core/src/lib.rs
pub mod config;
pub mod discovery;
pub mod error;
pub mod extractor;
pub mod naming;
pub mod paths;
pub mod setup;
pub mod tasks;
pub mod template;
pub mod types;

pub use config::*;
pub use discovery::*;
pub use error::*;
pub use extractor::*;
pub use naming::*;
pub use paths::*;
pub use types::*;
