//! A single named failpoint and its guarded state

use domain::{Action, FailpointName, Position, Term};
use parking_lot::Mutex;

use crate::error::ApplicationError;

#[derive(Debug, Default)]
struct FailpointState {
    term: Option<Term>,
    position: Position,
    hit_count: u64,
}

/// A named injection site
///
/// All state sits behind one lock per failpoint, so operations on different
/// failpoints never contend.
#[derive(Debug)]
pub struct Failpoint {
    name: FailpointName,
    state: Mutex<FailpointState>,
}

impl Failpoint {
    /// Create a disabled failpoint
    pub fn new(name: FailpointName) -> Self {
        Self {
            name,
            state: Mutex::new(FailpointState::default()),
        }
    }

    /// The failpoint's name
    pub const fn name(&self) -> &FailpointName {
        &self.name
    }

    /// Whether a term is installed
    pub fn is_enabled(&self) -> bool {
        self.state.lock().term.is_some()
    }

    /// Install a term, resetting position and hit count
    pub fn install(&self, term: Term) {
        let mut state = self.state.lock();
        state.position = Position::start(&term);
        state.term = Some(term);
        state.hit_count = 0;
    }

    /// Remove the installed term, resetting the hit count
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.term = None;
        state.position = Position::default();
        state.hit_count = 0;
    }

    /// The installed term's source text
    pub fn term(&self) -> Result<String, ApplicationError> {
        self.state
            .lock()
            .term
            .as_ref()
            .map(ToString::to_string)
            .ok_or(ApplicationError::Disabled)
    }

    /// Hits recorded since the term was installed
    pub fn count(&self) -> Result<u64, ApplicationError> {
        let state = self.state.lock();
        if state.term.is_none() {
            return Err(ApplicationError::Disabled);
        }
        Ok(state.hit_count)
    }

    /// Consistent view of enabled flag, term text and hit count
    pub fn snapshot(&self) -> (bool, String, u64) {
        let state = self.state.lock();
        match &state.term {
            Some(term) => (true, term.to_string(), state.hit_count),
            None => (false, String::new(), 0),
        }
    }

    /// Record one hit and select the action to enact
    pub fn hit(&self) -> Result<Action, ApplicationError> {
        let mut state = self.state.lock();
        let FailpointState {
            term,
            position,
            hit_count,
        } = &mut *state;
        let term = term.as_ref().ok_or(ApplicationError::Disabled)?;
        *hit_count += 1;
        Ok(position.advance(term))
    }
}
