//! Domain layer for failswitch
//!
//! Contains the failpoint term language (actions, segments, terms), its
//! parser and evaluator, and the validated failpoint name. This layer does
//! no I/O and knows nothing about registries or transports.

pub mod errors;
pub mod term;
pub mod value_objects;

pub use errors::DomainError;
pub use term::{Action, Literal, Position, Segment, Term};
pub use value_objects::*;
