//! Accumulated results and failure counters of a running batch

use crate::domain::GeocodeResult;

/// Failure counts reported by one progress line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressWindow {
    /// Failures since the previous progress line
    pub window: usize,
    /// Failures since the start of the run, `window` included
    pub total: usize,
}

/// Owned state of one batch run
///
/// Results are kept in input order and only ever appended.
#[derive(Debug, Default)]
pub struct BatchState {
    results: Vec<GeocodeResult>,
    window_failures: usize,
    total_failures: usize,
    succeeded: usize,
    not_found: usize,
    errors: usize,
}

impl BatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: GeocodeResult) {
        match &result {
            GeocodeResult::Success { .. } => self.succeeded += 1,
            GeocodeResult::NotFound { .. } => self.not_found += 1,
            GeocodeResult::Error { .. } => self.errors += 1,
        }
        if result.is_failure() {
            self.window_failures += 1;
        }
        self.results.push(result);
    }

    /// Fold the window counter into the total and start a new window
    pub fn roll_window(&mut self) -> ProgressWindow {
        let window = std::mem::take(&mut self.window_failures);
        self.total_failures += window;
        ProgressWindow {
            window,
            total: self.total_failures,
        }
    }

    pub fn results(&self) -> &[GeocodeResult] {
        &self.results
    }

    /// Addresses recorded so far
    pub fn processed(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn not_found(&self) -> usize {
        self.not_found
    }

    pub fn errors(&self) -> usize {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_window_folds_into_total() {
        let mut state = BatchState::new();
        state.push(GeocodeResult::not_found("a"));
        state.push(GeocodeResult::error("b", "timeout"));

        assert_eq!(state.roll_window(), ProgressWindow { window: 2, total: 2 });

        state.push(GeocodeResult::not_found("c"));
        assert_eq!(state.roll_window(), ProgressWindow { window: 1, total: 3 });
        assert_eq!(state.roll_window(), ProgressWindow { window: 0, total: 3 });
    }

    #[test]
    fn test_push_keeps_order_and_counts() {
        let mut state = BatchState::new();
        state.push(GeocodeResult::not_found("first"));
        state.push(GeocodeResult::error("second", "refused"));
        state.push(GeocodeResult::not_found("third"));

        let addresses: Vec<&str> = state.results().iter().map(|r| r.address()).collect();
        assert_eq!(addresses, vec!["first", "second", "third"]);
        assert_eq!(state.not_found(), 2);
        assert_eq!(state.errors(), 1);
        assert_eq!(state.succeeded(), 0);
        assert_eq!(state.processed(), 3);
    }
}
