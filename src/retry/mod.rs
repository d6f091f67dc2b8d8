//! 重试模块：选择资源、执行操作、反馈权重并决定是否重试。
//!
//! # Retry Module
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`RetryAction`] | The select → invoke → feedback → retry loop |
//! | [`RetryActionResult`] | One attempt of a diagnostic run |
//! | [`RetryDiagnostics`] | All attempts of a diagnostic run, in order |
//! | [`predicate`] | Ready-made `should_retry` predicates |
//!
//! Attempts are numbered from 1. After each failure the loop calls `on_error`
//! (if any), lowers the source's weight, then asks the predicate whether to go
//! again. When the predicate says no, the operation's own error is returned.
//!
//! ```rust
//! use weighted_retry::retry::{predicate, RetryAction};
//!
//! let action = RetryAction::new(|| "primary", |_: &&str, _ok: bool| {});
//! let result: Result<u32, &str> = action.execute_action(
//!     |_source, attempt| if attempt < 2 { Err("busy") } else { Ok(attempt) },
//!     predicate::max_attempts(3),
//!     None,
//! );
//! assert_eq!(result, Ok(2));
//! ```

pub mod action;
pub mod predicate;
pub mod result;

pub use action::RetryAction;
pub use predicate::OnError;
pub use result::{RetryActionResult, RetryDiagnostics};
