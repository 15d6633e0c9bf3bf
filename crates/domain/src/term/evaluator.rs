//! Term evaluation
//!
//! A [`Position`] tracks where a failpoint is within its term. It is owned
//! by the failpoint state and only mutated under that failpoint's lock.

use rand::Rng;

use super::{Action, Term};

/// Cursor into a term: the active segment and how many firings it has left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    segment_index: usize,
    remaining: u64,
}

impl Position {
    /// The reset position for `term`: first segment, full count
    #[must_use]
    pub fn start(term: &Term) -> Self {
        Self {
            segment_index: 0,
            remaining: term
                .segments()
                .first()
                .and_then(super::Segment::count)
                .map_or(0, std::num::NonZeroU64::get),
        }
    }

    /// Index of the active segment
    #[must_use]
    pub const fn segment_index(&self) -> usize {
        self.segment_index
    }

    /// Firings left on the active segment, zero for a count-less segment
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Select the action for one hit and advance, drawing from the thread RNG
    pub fn advance(&mut self, term: &Term) -> Action {
        let mut rng = rand::rng();
        self.advance_with(term, &mut || rng.random::<f64>() * 100.0)
    }

    /// Select the action for one hit and advance
    ///
    /// `draw` must return a value in `[0, 100)`. It is called only when the
    /// active segment carries a percentage; the segment fires when the draw
    /// is below that percentage.
    pub fn advance_with(&mut self, term: &Term, draw: &mut impl FnMut() -> f64) -> Action {
        let segments = term.segments();
        let Some(segment) = segments.get(self.segment_index) else {
            return Action::Off;
        };

        if let Some(probability) = segment.probability() {
            if draw() >= probability {
                return Action::Off;
            }
        }

        let action = segment.action().clone();

        if segment.count().is_some() {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                if let Some(next) = segments.get(self.segment_index + 1) {
                    self.segment_index += 1;
                    self.remaining = next.count().map_or(0, std::num::NonZeroU64::get);
                } else {
                    // Last segment keeps firing once its count is spent.
                    self.remaining = segment.count().map_or(0, std::num::NonZeroU64::get);
                }
            }
        }

        action
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::term::Literal;

    fn ret(s: &str) -> Action {
        Action::Return(Some(Literal::String(s.to_string())))
    }

    fn never() -> f64 {
        unreachable!("draw should not be consulted")
    }

    #[test]
    fn start_uses_first_segment_count() {
        let term = Term::parse("3*return->off").unwrap();
        let position = Position::start(&term);
        assert_eq!(position.segment_index(), 0);
        assert_eq!(position.remaining(), 3);

        let term = Term::parse("return").unwrap();
        assert_eq!(Position::start(&term).remaining(), 0);
    }

    #[test]
    fn one_shot_then_fallback() {
        let term = Term::parse(r#"1*return("A")->return("B")"#).unwrap();
        let mut position = Position::start(&term);

        assert_eq!(position.advance_with(&term, &mut never), ret("A"));
        for _ in 0..5 {
            assert_eq!(position.advance_with(&term, &mut never), ret("B"));
        }
        assert_eq!(position.segment_index(), 1);
    }

    #[test]
    fn counts_are_consumed_exactly() {
        let term = Term::parse("2*sleep(10)->3*return->off").unwrap();
        let mut position = Position::start(&term);

        let actions: Vec<_> = (0..7)
            .map(|_| position.advance_with(&term, &mut never))
            .collect();
        assert_eq!(
            actions,
            vec![
                Action::Sleep(Duration::from_millis(10)),
                Action::Sleep(Duration::from_millis(10)),
                Action::Return(None),
                Action::Return(None),
                Action::Return(None),
                Action::Off,
                Action::Off,
            ]
        );
    }

    #[test]
    fn first_count_less_segment_is_terminal() {
        let term = Term::parse(r#"return("fail string1")->return("fail string2")"#).unwrap();
        let mut position = Position::start(&term);
        for _ in 0..10 {
            assert_eq!(position.advance_with(&term, &mut never), ret("fail string1"));
        }
        assert_eq!(position.segment_index(), 0);
    }

    #[test]
    fn counted_last_segment_never_exhausts() {
        let term = Term::parse("2*return").unwrap();
        let mut position = Position::start(&term);
        for _ in 0..10 {
            assert_eq!(position.advance_with(&term, &mut never), Action::Return(None));
        }
    }

    #[test]
    fn failed_draw_yields_off_without_consuming() {
        let term = Term::parse(r#"50%1*return("A")->return("B")"#).unwrap();
        let mut position = Position::start(&term);

        assert_eq!(position.advance_with(&term, &mut || 75.0), Action::Off);
        assert_eq!(position.advance_with(&term, &mut || 50.0), Action::Off);
        assert_eq!(position.remaining(), 1);

        assert_eq!(position.advance_with(&term, &mut || 10.0), ret("A"));
        assert_eq!(position.advance_with(&term, &mut never), ret("B"));
    }

    #[test]
    fn full_percentage_always_fires() {
        let term = Term::parse("100%return").unwrap();
        let mut position = Position::start(&term);
        assert_eq!(position.advance(&term), Action::Return(None));
        assert_eq!(position.advance_with(&term, &mut || 99.999), Action::Return(None));
    }

    #[test]
    fn random_draw_stays_within_bounds() {
        let term = Term::parse("30%return").unwrap();
        let mut position = Position::start(&term);
        let fired = (0..2000)
            .filter(|_| !position.advance(&term).is_off())
            .count();
        assert!(fired > 300 && fired < 900, "fired {fired} of 2000");
    }
}
