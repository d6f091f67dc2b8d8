use std::time::Duration;

/// Record of one attempt made by the diagnostic retry loop.
#[derive(Debug, Clone)]
pub struct RetryActionResult<S, T, E> {
    /// Source the attempt ran against.
    pub source: S,
    pub outcome: Result<T, E>,
    /// Wall time spent inside the operation.
    pub elapsed: Duration,
    /// Attempt number, starting at 1.
    pub attempt: u32,
}

impl<S, T, E> RetryActionResult<S, T, E> {
    pub fn is_error(&self) -> bool {
        self.outcome.is_err()
    }

    pub fn result(&self) -> Option<&T> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&E> {
        self.outcome.as_ref().err()
    }
}

/// Ordered attempt records of one diagnostic run. Never empty.
#[derive(Debug, Clone)]
pub struct RetryDiagnostics<S, T, E> {
    earlier: Vec<RetryActionResult<S, T, E>>,
    last: RetryActionResult<S, T, E>,
}

impl<S, T, E> RetryDiagnostics<S, T, E> {
    pub(crate) fn new(
        earlier: Vec<RetryActionResult<S, T, E>>,
        last: RetryActionResult<S, T, E>,
    ) -> Self {
        Self { earlier, last }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RetryActionResult<S, T, E>> {
        self.earlier.iter().chain(std::iter::once(&self.last))
    }

    pub fn len(&self) -> usize {
        self.earlier.len() + 1
    }

    /// Always false; present for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn attempt_count(&self) -> u32 {
        self.last.attempt
    }

    /// The attempt that stopped the loop.
    pub fn last(&self) -> &RetryActionResult<S, T, E> {
        &self.last
    }

    pub fn is_success(&self) -> bool {
        !self.last.is_error()
    }

    /// Total time spent inside the operation across attempts.
    pub fn total_elapsed(&self) -> Duration {
        self.iter().map(|r| r.elapsed).sum()
    }

    /// Outcome of the final attempt: the value on success, the last error otherwise.
    pub fn into_result(self) -> Result<T, E> {
        self.last.outcome
    }

    pub fn into_vec(self) -> Vec<RetryActionResult<S, T, E>> {
        let mut records = self.earlier;
        records.push(self.last);
        records
    }
}

impl<S, T, E> IntoIterator for RetryDiagnostics<S, T, E> {
    type Item = RetryActionResult<S, T, E>;
    type IntoIter = std::vec::IntoIter<RetryActionResult<S, T, E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(attempt: u32, outcome: Result<u32, &'static str>) -> RetryActionResult<&'static str, u32, &'static str> {
        RetryActionResult {
            source: "src",
            outcome,
            elapsed: Duration::from_millis(attempt as u64),
            attempt,
        }
    }

    #[test]
    fn test_record_accessors() {
        let ok = record(1, Ok(7));
        assert!(!ok.is_error());
        assert_eq!(ok.result(), Some(&7));
        assert!(ok.error().is_none());

        let failed = record(2, Err("boom"));
        assert!(failed.is_error());
        assert_eq!(failed.error(), Some(&"boom"));
    }

    #[test]
    fn test_diagnostics_order_and_last() {
        let diag = RetryDiagnostics::new(vec![record(1, Err("a")), record(2, Err("b"))], record(3, Ok(9)));

        assert_eq!(diag.len(), 3);
        assert_eq!(diag.attempt_count(), 3);
        assert!(diag.is_success());
        assert_eq!(diag.total_elapsed(), Duration::from_millis(6));
        let attempts: Vec<u32> = diag.iter().map(|r| r.attempt).collect();
        assert_eq!(attempts, vec![1, 2, 3]);
        assert_eq!(diag.into_result(), Ok(9));
    }

    #[test]
    fn test_into_result_surfaces_last_error() {
        let diag = RetryDiagnostics::new(vec![record(1, Err("first"))], record(2, Err("second")));
        assert!(!diag.is_success());
        assert_eq!(diag.clone().into_vec().len(), 2);
        assert_eq!(diag.into_result(), Err("second"));
    }
}
