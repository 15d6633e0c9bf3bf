//! Injection hook used by instrumented code
//!
//! Call sites ask the hook whether a failpoint fires and what to do. The
//! registry lock is released before any action is enacted, so a `sleep`
//! never blocks the control plane.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use application::{FailpointRegistry, Injection, InjectionHook};
//!
//! # tokio_test::block_on(async {
//! let registry = Arc::new(FailpointRegistry::new(["ExampleString"]).unwrap());
//! let hook = InjectionHook::new(Arc::clone(&registry));
//!
//! assert_eq!(hook.inject("ExampleString").await, Injection::Continue);
//!
//! registry.set("ExampleString", "return").unwrap();
//! assert_eq!(hook.inject("ExampleString").await, Injection::Return(None));
//! # });
//! ```

use std::sync::Arc;

use domain::{Action, Literal};
use tracing::{debug, info, warn};

use crate::{error::ApplicationError, registry::FailpointRegistry};

/// Result of evaluating a failpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Whether the call site should enact `action`
    pub should_act: bool,
    /// The selected action, `Off` when nothing fires
    pub action: Action,
}

impl Evaluation {
    const fn inactive() -> Self {
        Self {
            should_act: false,
            action: Action::Off,
        }
    }
}

/// What the call site should do after the hook has run
#[derive(Debug, Clone, PartialEq)]
pub enum Injection {
    /// Carry on with normal execution
    Continue,
    /// Return early, optionally with the configured value
    Return(Option<Literal>),
}

/// Entry point for instrumented code
#[derive(Debug, Clone)]
pub struct InjectionHook {
    registry: Arc<FailpointRegistry>,
}

impl InjectionHook {
    /// Create a hook over a shared registry
    pub const fn new(registry: Arc<FailpointRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this hook reads
    pub fn registry(&self) -> &Arc<FailpointRegistry> {
        &self.registry
    }

    /// Record a hit and report whether the call site should act
    ///
    /// Unknown and disabled failpoints both evaluate to `(false, Off)`.
    pub fn evaluate(&self, name: &str) -> Evaluation {
        match self.registry.hit(name) {
            Ok(action) => Evaluation {
                should_act: !action.is_off(),
                action,
            },
            Err(ApplicationError::NotFound) => {
                warn!(failpoint = name, "Hit on unregistered failpoint");
                Evaluation::inactive()
            },
            Err(_) => Evaluation::inactive(),
        }
    }

    /// Evaluate and enact a failpoint from async code
    ///
    /// `sleep` suspends the task; `panic` panics with the configured message.
    pub async fn inject(&self, name: &str) -> Injection {
        let Evaluation { should_act, action } = self.evaluate(name);
        if !should_act {
            return Injection::Continue;
        }
        debug!(failpoint = name, action = action.kind(), "Failpoint fired");
        match action {
            Action::Sleep(duration) => {
                tokio::time::sleep(duration).await;
                Injection::Continue
            },
            other => enact(name, other),
        }
    }

    /// Evaluate and enact a failpoint from synchronous code
    ///
    /// `sleep` blocks the current thread.
    pub fn inject_blocking(&self, name: &str) -> Injection {
        let Evaluation { should_act, action } = self.evaluate(name);
        if !should_act {
            return Injection::Continue;
        }
        debug!(failpoint = name, action = action.kind(), "Failpoint fired");
        match action {
            Action::Sleep(duration) => {
                std::thread::sleep(duration);
                Injection::Continue
            },
            other => enact(name, other),
        }
    }
}

#[allow(clippy::panic)]
fn enact(name: &str, action: Action) -> Injection {
    match action {
        Action::Off | Action::Sleep(_) => Injection::Continue,
        Action::Return(value) => Injection::Return(value),
        Action::Print(message) => {
            match message {
                Some(message) => info!(failpoint = name, "{message}"),
                None => info!(failpoint = name, "failpoint {name} fired"),
            }
            Injection::Continue
        },
        Action::Panic(Some(message)) => panic!("{message}"),
        Action::Panic(None) => panic!("failpoint {name} panicked"),
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn hook() -> InjectionHook {
        InjectionHook::new(Arc::new(
            FailpointRegistry::new(["ExampleString", "ExampleOneLine"]).unwrap(),
        ))
    }

    #[test]
    fn unknown_and_disabled_are_inactive() {
        let hook = hook();
        assert_eq!(hook.evaluate("missing"), Evaluation::inactive());
        assert_eq!(hook.evaluate("ExampleString"), Evaluation::inactive());
        assert_eq!(hook.registry().count("ExampleString"), Err(ApplicationError::Disabled));
    }

    #[test]
    fn off_counts_but_does_not_act() {
        let hook = hook();
        hook.registry().set("ExampleString", "off").unwrap();

        assert_eq!(hook.evaluate("ExampleString"), Evaluation::inactive());
        assert_eq!(hook.registry().count("ExampleString"), Ok(1));
    }

    #[test]
    fn print_and_sleep_act() {
        let hook = hook();
        hook.registry().set("ExampleString", "1*print->sleep(1)").unwrap();

        let first = hook.evaluate("ExampleString");
        assert!(first.should_act);
        assert_eq!(first.action, Action::Print(None));

        let second = hook.evaluate("ExampleString");
        assert!(second.should_act);
        assert_eq!(second.action, Action::Sleep(Duration::from_millis(1)));
    }

    #[tokio::test]
    async fn inject_returns_configured_value() {
        let hook = hook();
        hook.registry()
            .set("ExampleString", r#"1*return("boom")->off"#)
            .unwrap();

        assert_eq!(
            hook.inject("ExampleString").await,
            Injection::Return(Some(Literal::String("boom".to_string())))
        );
        assert_eq!(hook.inject("ExampleString").await, Injection::Continue);
    }

    #[tokio::test]
    async fn inject_sleeps_then_continues() {
        let hook = hook();
        hook.registry().set("ExampleOneLine", "sleep(20ms)").unwrap();

        let started = Instant::now();
        assert_eq!(hook.inject("ExampleOneLine").await, Injection::Continue);
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn sleep_does_not_hold_the_failpoint_lock() {
        let hook = hook();
        hook.registry().set("ExampleOneLine", "sleep(200ms)").unwrap();

        let sleeper = {
            let hook = hook.clone();
            tokio::spawn(async move { hook.inject("ExampleOneLine").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let started = Instant::now();
        hook.registry().deactivate("ExampleOneLine").unwrap();
        assert!(started.elapsed() < Duration::from_millis(100));

        assert_eq!(sleeper.await.unwrap(), Injection::Continue);
    }

    #[test]
    fn inject_blocking_enacts_print() {
        let hook = hook();
        hook.registry().set("ExampleString", r#"print("hello")"#).unwrap();
        assert_eq!(hook.inject_blocking("ExampleString"), Injection::Continue);
        assert_eq!(hook.registry().count("ExampleString"), Ok(1));
    }

    #[test]
    #[should_panic(expected = "failpoint ExampleString panicked")]
    fn inject_blocking_panics_with_default_message() {
        let hook = hook();
        hook.registry().set("ExampleString", "panic").unwrap();
        hook.inject_blocking("ExampleString");
    }

    #[test]
    #[should_panic(expected = "custom message")]
    fn inject_blocking_panics_with_configured_message() {
        let hook = hook();
        hook.registry()
            .set("ExampleString", r#"panic("custom message")"#)
            .unwrap();
        hook.inject_blocking("ExampleString");
    }
}
