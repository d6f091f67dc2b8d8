use super::predicate::OnError;
use super::result::{RetryActionResult, RetryDiagnostics};
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::time::Instant;
use tracing::debug;

/// Select, invoke, feed back, retry-or-stop.
///
/// Holds no state between calls: `select` picks a source for each attempt and
/// `update_weight` receives the outcome of every attempt, before the retry
/// decision is made. Usually bound to a pool through
/// [`ResourcePoolExt`](crate::ext::ResourcePoolExt), but any pair of functions
/// works, which keeps the loop testable without a pool.
pub struct RetryAction<S, Sel, Upd> {
    select: Sel,
    update_weight: Upd,
    _source: PhantomData<fn() -> S>,
}

impl<S, Sel, Upd> fmt::Debug for RetryAction<S, Sel, Upd> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAction").finish_non_exhaustive()
    }
}

impl<S, Sel, Upd> RetryAction<S, Sel, Upd>
where
    S: Clone + fmt::Debug,
    Sel: Fn() -> S,
    Upd: Fn(&S, bool),
{
    pub fn new(select: Sel, update_weight: Upd) -> Self {
        Self {
            select,
            update_weight,
            _source: PhantomData,
        }
    }

    /// Run a synchronous operation.
    ///
    /// `func` must return its `Result` directly; operations producing a future
    /// belong to [`execute_async`](Self::execute_async). Exhausted retries
    /// return the last error unchanged.
    pub fn execute_action<T, E, F, P>(
        &self,
        mut func: F,
        should_retry: P,
        on_error: OnError<'_, E>,
    ) -> Result<T, E>
    where
        F: FnMut(&S, u32) -> Result<T, E>,
        P: Fn(u32, &E) -> bool,
        E: fmt::Debug,
    {
        let mut attempt = 1;
        loop {
            let source = (self.select)();
            match func(&source, attempt) {
                Ok(value) => {
                    (self.update_weight)(&source, true);
                    return Ok(value);
                }
                Err(err) => {
                    if !self.on_failure(&source, &err, attempt, &should_retry, on_error) {
                        return Err(err);
                    }
                }
            }
            attempt += 1;
        }
    }

    /// Run an asynchronous operation. The source is handed to `func` by value.
    pub async fn execute_async<T, E, F, Fut, P>(
        &self,
        mut func: F,
        should_retry: P,
        on_error: OnError<'_, E>,
    ) -> Result<T, E>
    where
        F: FnMut(S, u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(u32, &E) -> bool,
        E: fmt::Debug,
    {
        let mut attempt = 1;
        loop {
            let source = (self.select)();
            match func(source.clone(), attempt).await {
                Ok(value) => {
                    (self.update_weight)(&source, true);
                    return Ok(value);
                }
                Err(err) => {
                    if !self.on_failure(&source, &err, attempt, &should_retry, on_error) {
                        return Err(err);
                    }
                }
            }
            attempt += 1;
        }
    }

    /// Same loop as [`execute_async`](Self::execute_async), keeping a record of every attempt.
    ///
    /// Operation errors end up in the records; the run itself never fails.
    pub async fn execute_async_with_diag<T, E, F, Fut, P>(
        &self,
        mut func: F,
        should_retry: P,
        on_error: OnError<'_, E>,
    ) -> RetryDiagnostics<S, T, E>
    where
        F: FnMut(S, u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(u32, &E) -> bool,
        E: fmt::Debug,
    {
        let mut earlier = Vec::new();
        let mut attempt = 1;
        loop {
            let source = (self.select)();
            let started = Instant::now();
            let outcome = func(source.clone(), attempt).await;
            let elapsed = started.elapsed();

            let retry = match &outcome {
                Ok(_) => {
                    (self.update_weight)(&source, true);
                    false
                }
                Err(err) => self.on_failure(&source, err, attempt, &should_retry, on_error),
            };
            let record = RetryActionResult {
                source,
                outcome,
                elapsed,
                attempt,
            };
            if !retry {
                return RetryDiagnostics::new(earlier, record);
            }
            earlier.push(record);
            attempt += 1;
        }
    }

    /// Error callback, negative feedback, then the retry decision.
    fn on_failure<E, P>(
        &self,
        source: &S,
        err: &E,
        attempt: u32,
        should_retry: &P,
        on_error: OnError<'_, E>,
    ) -> bool
    where
        P: Fn(u32, &E) -> bool,
        E: fmt::Debug,
    {
        if let Some(on_error) = on_error {
            on_error(err, attempt);
        }
        (self.update_weight)(source, false);
        let retry = should_retry(attempt, err);
        debug!(
            attempt,
            source = ?source,
            error = ?err,
            retry,
            "operation attempt failed"
        );
        retry
    }
}
