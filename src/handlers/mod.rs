pub mod autocomplete;
pub mod diagnostics;
pub mod executions;
pub mod files;
pub mod health;
pub mod rooms;

pub use autocomplete::*;
pub use diagnostics::*;
pub use executions::*;
pub use files::*;
pub use health::*;
pub use rooms::*;
