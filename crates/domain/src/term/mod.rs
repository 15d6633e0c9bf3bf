//! Failpoint terms
//!
//! A term describes what a failpoint does each time it is hit, as a chain of
//! segments joined by `->`:
//!
//! ```text
//! term     := segment ('->' segment)*
//! segment  := [percent '%'] [count '*'] action
//! action   := off | return[(literal)] | sleep(duration)
//!           | panic[(string)] | print[(string)]
//! ```
//!
//! A segment with a count is consumed that many times before the next
//! segment takes over. A segment without a count repeats forever, so the
//! first count-less segment is terminal.
//!
//! # Examples
//!
//! ```
//! use domain::{Action, Literal, Position, Term};
//!
//! let term: Term = r#"1*return("A")->return("B")"#.parse().unwrap();
//! let mut position = Position::start(&term);
//!
//! assert_eq!(
//!     position.advance(&term),
//!     Action::Return(Some(Literal::String("A".to_string())))
//! );
//! assert_eq!(
//!     position.advance(&term),
//!     Action::Return(Some(Literal::String("B".to_string())))
//! );
//! ```

mod duration;
mod evaluator;
mod parser;

use std::{fmt, num::NonZeroU64, str::FromStr, time::Duration};

use serde::Serialize;

use crate::errors::DomainError;

pub use duration::parse_duration;
pub use evaluator::Position;
pub use parser::parse;

/// A value carried by `return(...)`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    /// Double-quoted string with backslash escapes
    String(String),
    /// Signed 64-bit integer
    Integer(i64),
    /// Decimal number containing a `.`
    Float(f64),
    /// `true` or `false`
    Bool(bool),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s:?}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// The behavior an instrumented site enacts on a hit
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Continue normal execution
    Off,
    /// Return early, optionally with a value
    Return(Option<Literal>),
    /// Pause for the duration, then continue
    Sleep(Duration),
    /// Raise a fatal error, optionally with a message
    Panic(Option<String>),
    /// Log that the failpoint fired, then continue
    Print(Option<String>),
}

impl Action {
    /// Whether this action leaves the instrumented site untouched
    #[must_use]
    pub const fn is_off(&self) -> bool {
        matches!(self, Self::Off)
    }

    /// Short name of the action, as written in term syntax
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Return(_) => "return",
            Self::Sleep(_) => "sleep",
            Self::Panic(_) => "panic",
            Self::Print(_) => "print",
        }
    }
}

/// One `[percent%][count*]action` unit of a term
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    probability: Option<f64>,
    count: Option<NonZeroU64>,
    action: Action,
}

impl Segment {
    /// Create a segment
    #[must_use]
    pub const fn new(probability: Option<f64>, count: Option<NonZeroU64>, action: Action) -> Self {
        Self {
            probability,
            count,
            action,
        }
    }

    /// Percentage of hits on which this segment fires, if gated
    #[must_use]
    pub const fn probability(&self) -> Option<f64> {
        self.probability
    }

    /// Number of firings before the next segment takes over
    #[must_use]
    pub const fn count(&self) -> Option<NonZeroU64> {
        self.count
    }

    /// The action this segment yields
    #[must_use]
    pub const fn action(&self) -> &Action {
        &self.action
    }
}

/// A parsed term together with the text it was parsed from
///
/// Rendering a term gives back the accepted text byte for byte, never a
/// normalized form.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    source: String,
    segments: Vec<Segment>,
}

impl Term {
    /// Parse a term specification
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTerm`] if the specification is malformed.
    pub fn parse(spec: &str) -> Result<Self, DomainError> {
        parse(spec)
    }

    pub(crate) fn from_parts(source: String, segments: Vec<Segment>) -> Self {
        debug_assert!(!segments.is_empty());
        Self { source, segments }
    }

    /// The exact specification text this term was parsed from
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The segments of the term, in evaluation order
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether this is the bare `off` term
    #[must_use]
    pub fn is_off(&self) -> bool {
        matches!(
            self.segments.as_slice(),
            [Segment {
                probability: None,
                count: None,
                action: Action::Off,
            }]
        )
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for Term {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
