//! Failpoint registry
//!
//! The set of names is fixed at construction, so the map itself is never
//! mutated afterwards and lookups take no lock. Each failpoint guards its own
//! state.

use std::collections::BTreeMap;

use domain::{Action, FailpointName, Term};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{assignments::parse_assignments, error::ApplicationError, failpoint::Failpoint};

/// Point-in-time view of one failpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailpointSnapshot {
    /// Failpoint name
    pub name: String,
    /// Whether a term is installed
    pub enabled: bool,
    /// Installed term text, empty when disabled
    pub term: String,
    /// Hits since the term was installed
    pub hit_count: u64,
}

/// Registry of all failpoints known to the process
#[derive(Debug)]
pub struct FailpointRegistry {
    failpoints: BTreeMap<FailpointName, Failpoint>,
}

impl FailpointRegistry {
    /// Build a registry with every failpoint disabled
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Registration`] for an invalid name and
    /// [`ApplicationError::DuplicateName`] when a name appears twice.
    pub fn new<I, S>(names: I) -> Result<Self, ApplicationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut failpoints = BTreeMap::new();
        for raw in names {
            let name = FailpointName::new(raw).map_err(ApplicationError::Registration)?;
            if failpoints.contains_key(&name) {
                return Err(ApplicationError::DuplicateName(name.into()));
            }
            failpoints.insert(name.clone(), Failpoint::new(name));
        }
        Ok(Self { failpoints })
    }

    fn lookup(&self, name: &str) -> Result<&Failpoint, ApplicationError> {
        self.failpoints.get(name).ok_or(ApplicationError::NotFound)
    }

    /// Registered names, in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.failpoints.keys().map(FailpointName::as_str)
    }

    /// Snapshot of a failpoint, enabled or not
    pub fn get(&self, name: &str) -> Result<FailpointSnapshot, ApplicationError> {
        let failpoint = self.lookup(name)?;
        let (enabled, term, hit_count) = failpoint.snapshot();
        Ok(FailpointSnapshot {
            name: failpoint.name().to_string(),
            enabled,
            term,
            hit_count,
        })
    }

    /// The installed term's text
    pub fn term(&self, name: &str) -> Result<String, ApplicationError> {
        self.lookup(name)?.term()
    }

    /// Hits since the term was installed
    pub fn count(&self, name: &str) -> Result<u64, ApplicationError> {
        self.lookup(name)?.count()
    }

    /// Parse `spec` and install it on `name`
    ///
    /// The failpoint is left untouched when the spec does not parse.
    #[instrument(skip(self), level = "debug")]
    pub fn set(&self, name: &str, spec: &str) -> Result<(), ApplicationError> {
        let failpoint = self.lookup(name)?;
        let term = Term::parse(spec).map_err(|e| {
            debug!(name, spec, error = %e, "Rejected failpoint term");
            ApplicationError::Parse(e)
        })?;
        failpoint.install(term);
        info!(name, term = spec, "Failpoint enabled");
        Ok(())
    }

    /// Apply each assignment independently, in order
    ///
    /// Every pair is attempted; the first failure is returned afterwards.
    pub fn set_many<I, N, S>(&self, assignments: I) -> Result<(), ApplicationError>
    where
        I: IntoIterator<Item = (N, S)>,
        N: AsRef<str>,
        S: AsRef<str>,
    {
        let mut first_error = None;
        for (name, spec) in assignments {
            if let Err(e) = self.set(name.as_ref(), spec.as_ref()) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Parse the `name=term;...` syntax and apply every well-formed pair
    ///
    /// Malformed entries and failed assignments are reported the same way as
    /// in [`Self::set_many`]: all are attempted, the first error wins.
    pub fn set_from_assignments(&self, body: &str) -> Result<(), ApplicationError> {
        let mut first_error = None;
        for entry in parse_assignments(body) {
            let outcome = entry.and_then(|(name, spec)| self.set(&name, &spec));
            if let Err(e) = outcome {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Disable a failpoint
    pub fn deactivate(&self, name: &str) -> Result<(), ApplicationError> {
        self.lookup(name)?.clear();
        info!(name, "Failpoint disabled");
        Ok(())
    }

    /// `(name, term)` for every failpoint, ordered by name
    ///
    /// Disabled failpoints report an empty term. Each entry is read
    /// atomically; the list as a whole is not a snapshot.
    pub fn list_all(&self) -> Vec<(String, String)> {
        self.failpoints
            .iter()
            .map(|(name, failpoint)| (name.to_string(), failpoint.term().unwrap_or_default()))
            .collect()
    }

    /// Record a hit on `name` and return the action to enact
    pub fn hit(&self, name: &str) -> Result<Action, ApplicationError> {
        self.lookup(name)?.hit()
    }
}
