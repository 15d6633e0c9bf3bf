//! Application layer - failpoint registry and injection
//!
//! Owns the runtime state of every failpoint and the operations the control
//! plane and instrumented code perform on it. Builds on the term language in
//! `domain` and performs no network I/O.

pub mod assignments;
pub mod error;
pub mod failpoint;
pub mod hook;
pub mod registry;

pub use assignments::parse_assignments;
pub use error::ApplicationError;
pub use failpoint::Failpoint;
pub use hook::{Evaluation, Injection, InjectionHook};
pub use registry::{FailpointRegistry, FailpointSnapshot};
