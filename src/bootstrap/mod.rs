pub mod machine;
pub mod readiness;
pub mod traits;

pub use machine::{Bootstrap, BootstrapConfig, BootstrapFailure, BootstrapState, EnableErrorPolicy};
pub use readiness::Readiness;
pub use traits::{BleStack, StackError};
