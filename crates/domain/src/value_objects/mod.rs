//! Value Objects - Immutable, identity-less domain primitives

mod failpoint_name;

pub use failpoint_name::FailpointName;
