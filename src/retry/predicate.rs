//! Retry predicates and error callbacks.
//!
//! A predicate is called as `should_retry(attempt, &error)` with the number of
//! the attempt that just failed, counting from 1.

/// Observer for failed attempts, called with the error and the attempt number.
pub type OnError<'a, E> = Option<&'a (dyn Fn(&E, u32) + Send + Sync)>;

/// Attempt budget used when none is configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Retry any error until `n` attempts have been made.
pub fn max_attempts<E>(n: u32) -> impl Fn(u32, &E) -> bool + Clone + Send + Sync {
    move |attempt: u32, _: &E| attempt < n
}

/// Retry errors accepted by `classify` until `n` attempts have been made.
///
/// ```rust
/// use weighted_retry::retry::predicate::max_attempts_when;
///
/// let transient = max_attempts_when(3, |e: &std::io::Error| {
///     e.kind() == std::io::ErrorKind::TimedOut
/// });
/// let timeout = std::io::Error::from(std::io::ErrorKind::TimedOut);
/// let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
/// assert!(transient(1, &timeout));
/// assert!(!transient(3, &timeout));
/// assert!(!transient(1, &denied));
/// ```
pub fn max_attempts_when<E, C>(n: u32, classify: C) -> impl Fn(u32, &E) -> bool + Clone + Send + Sync
where
    C: Fn(&E) -> bool + Clone + Send + Sync,
{
    move |attempt: u32, error: &E| attempt < n && classify(error)
}

/// Never retry.
pub fn never<E>() -> impl Fn(u32, &E) -> bool + Clone + Send + Sync {
    |_: u32, _: &E| false
}
