//! Retry entry points bound to a resource pool.
//!
//! [`ResourcePoolExt`] is implemented for every [`ResourcePool`], including
//! `dyn ResourcePool<S>`, so collaborators can hold either a concrete
//! [`ResourceManager`](crate::resource::ResourceManager) or a trait object.
//!
//! The synchronous entry point only takes operations that return their
//! `Result` directly. Handing it an operation that returns a future does not
//! compile:
//!
//! ```rust,compile_fail
//! use weighted_retry::ext::ResourcePoolExt;
//! use weighted_retry::resource::ResourceManager;
//!
//! let pool = ResourceManager::from_sources(["a"]).unwrap();
//! let _ = pool.execute_action(
//!     |_source: &&str, _attempt| async { Ok::<u32, std::io::Error>(1) },
//!     |_, _| false,
//!     None,
//! );
//! ```
//!
//! Such operations go through [`ResourcePoolExt::execute_async`] instead:
//!
//! ```rust
//! use weighted_retry::ext::ResourcePoolExt;
//! use weighted_retry::resource::ResourceManager;
//! use weighted_retry::retry::predicate;
//!
//! # tokio_test::block_on(async {
//! let pool = ResourceManager::from_sources(["a"]).unwrap();
//! let value = pool
//!     .execute_async(
//!         |_source, _attempt| async { Ok::<u32, std::io::Error>(1) },
//!         predicate::max_attempts(3),
//!         None,
//!     )
//!     .await
//!     .unwrap();
//! assert_eq!(value, 1);
//! # });
//! ```

use crate::resource::{ResourcePool, Source};
use crate::retry::{OnError, RetryAction, RetryDiagnostics};
use crate::weight::WeightItem;
use crate::Result;
use std::fmt;
use std::future::Future;

pub trait ResourcePoolExt<S: Source>: ResourcePool<S> {
    /// Run `func` against weighted picks from this pool, feeding every outcome back.
    fn execute_action<T, E, F, P>(
        &self,
        func: F,
        should_retry: P,
        on_error: OnError<'_, E>,
    ) -> std::result::Result<T, E>
    where
        F: FnMut(&S, u32) -> std::result::Result<T, E>,
        P: Fn(u32, &E) -> bool,
        E: fmt::Debug,
    {
        RetryAction::new(|| self.select_randomly(), |s: &S, ok| self.update_weight(s, ok))
            .execute_action(func, should_retry, on_error)
    }

    fn execute_async<T, E, F, Fut, P>(
        &self,
        func: F,
        should_retry: P,
        on_error: OnError<'_, E>,
    ) -> impl Future<Output = std::result::Result<T, E>> + Send
    where
        F: FnMut(S, u32) -> Fut + Send,
        Fut: Future<Output = std::result::Result<T, E>> + Send,
        P: Fn(u32, &E) -> bool + Send,
        T: Send,
        E: fmt::Debug + Send,
    {
        async move {
            RetryAction::new(|| self.select_randomly(), |s: &S, ok| self.update_weight(s, ok))
                .execute_async(func, should_retry, on_error)
                .await
        }
    }

    fn execute_async_with_diag<T, E, F, Fut, P>(
        &self,
        func: F,
        should_retry: P,
        on_error: OnError<'_, E>,
    ) -> impl Future<Output = RetryDiagnostics<S, T, E>> + Send
    where
        F: FnMut(S, u32) -> Fut + Send,
        Fut: Future<Output = std::result::Result<T, E>> + Send,
        P: Fn(u32, &E) -> bool + Send,
        T: Send,
        E: fmt::Debug + Send,
    {
        async move {
            RetryAction::new(|| self.select_randomly(), |s: &S, ok| self.update_weight(s, ok))
                .execute_async_with_diag(func, should_retry, on_error)
                .await
        }
    }

    /// Replace the pool from bare identifiers. Duplicates collapse; new
    /// sources start at [`WeightItem::default`].
    fn update_resources_from(&self, sources: impl IntoIterator<Item = S>) -> Result<()> {
        self.update_resources(
            sources
                .into_iter()
                .map(|s| (s, WeightItem::default()))
                .collect(),
        )
    }
}

impl<S: Source, P: ResourcePool<S> + ?Sized> ResourcePoolExt<S> for P {}
