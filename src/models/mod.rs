pub mod autocomplete;
pub mod diagnostics;
pub mod error;
pub mod execution;
pub mod file;
pub mod health;
pub mod messages;
pub mod room;

pub use autocomplete::*;
pub use diagnostics::*;
pub use error::*;
pub use execution::*;
pub use file::*;
pub use health::*;
pub use messages::*;
pub use room::*;
