//! Instrumented demo functions
//!
//! A small set of functions with failpoints compiled in, served by the demo
//! call server so the control plane can be exercised end to end.

use std::str::FromStr;

use application::{Injection, InjectionHook};
use serde_json::Value;

/// Failpoint consulted by [`DemoFunction::Example`]
pub const EXAMPLE_STRING: &str = "ExampleString";
/// Failpoint consulted by [`DemoFunction::ExampleOneLine`]
pub const EXAMPLE_ONE_LINE: &str = "ExampleOneLine";
/// Failpoint consulted by [`DemoFunction::ExampleLabels`]
pub const EXAMPLE_LABELS: &str = "ExampleLabels";

/// Every failpoint compiled into the demo functions
pub const FAILPOINT_NAMES: [&str; 3] = [EXAMPLE_STRING, EXAMPLE_ONE_LINE, EXAMPLE_LABELS];

const LABEL_ROUNDS: usize = 5;

/// Functions callable through `/call/{function}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoFunction {
    /// `ExampleFunc`: returns `"example"` unless `ExampleString` returns a value
    Example,
    /// `ExampleOneLineFunc`: returns `"abc"`; `ExampleOneLine` only enacts side effects
    ExampleOneLine,
    /// `ExampleLabelsFunc`: nested loops where `ExampleLabels` skips to the next outer round
    ExampleLabels,
}

impl DemoFunction {
    /// Name used in the call path
    pub const fn name(self) -> &'static str {
        match self {
            Self::Example => "ExampleFunc",
            Self::ExampleOneLine => "ExampleOneLineFunc",
            Self::ExampleLabels => "ExampleLabelsFunc",
        }
    }

    /// Number of `arg` values the function takes
    pub const fn arity(self) -> usize {
        match self {
            Self::Example | Self::ExampleOneLine | Self::ExampleLabels => 0,
        }
    }

    /// Run the function, consulting its failpoint through `hook`
    pub async fn call(self, hook: &InjectionHook) -> Value {
        match self {
            Self::Example => example(hook).await,
            Self::ExampleOneLine => Value::from(example_one_line(hook).await),
            Self::ExampleLabels => Value::from(example_labels(hook).await),
        }
    }
}

impl FromStr for DemoFunction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Example, Self::ExampleOneLine, Self::ExampleLabels]
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| s.to_string())
    }
}

async fn example(hook: &InjectionHook) -> Value {
    match hook.inject(EXAMPLE_STRING).await {
        Injection::Return(Some(value)) => serde_json::to_value(value).unwrap_or_default(),
        // A bare `return` yields the zero value of the declared string.
        Injection::Return(None) => Value::from(""),
        Injection::Continue => Value::from("example"),
    }
}

async fn example_one_line(hook: &InjectionHook) -> &'static str {
    let _ = hook.inject(EXAMPLE_ONE_LINE).await;
    "abc"
}

async fn example_labels(hook: &InjectionHook) -> String {
    let mut s = String::new();
    'rounds: for _ in 0..LABEL_ROUNDS {
        s.push('i');
        for _ in 0..LABEL_ROUNDS {
            s.push('j');
            if let Injection::Return(_) = hook.inject(EXAMPLE_LABELS).await {
                continue 'rounds;
            }
        }
    }
    s
}
