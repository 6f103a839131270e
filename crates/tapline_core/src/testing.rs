//! Assertion helpers for test point bodies.
//!
//! Every helper returns a [`PointResult`], so point bodies chain them with `?`:
//!
//! ```rust
//! use tapline_core::testing::{check, check_eq};
//! use tapline_core::PointResult;
//!
//! fn adds_up() -> PointResult {
//!     check(1 + 1 == 2, "arithmetic is broken")?;
//!     check_eq(2 * 2, 4)?;
//!     Ok(())
//! }
//! assert!(adds_up().is_ok());
//! ```

use std::fmt::Debug;

use crate::signal::{PointResult, Signal};

/// Fail with `msg` unless `condition` holds.
pub fn check(condition: bool, msg: &str) -> PointResult {
    if condition {
        Ok(())
    } else {
        Err(Signal::fail(msg))
    }
}

/// Fail unless the two values are equal.
pub fn check_eq<T: PartialEq + Debug>(left: T, right: T) -> PointResult {
    if left == right {
        Ok(())
    } else {
        Err(Signal::fail(format!(
            "assertion failed: left != right\n  left:  {:?}\n  right: {:?}",
            left, right
        )))
    }
}

/// Fail if the two values are equal.
pub fn check_ne<T: PartialEq + Debug>(left: T, right: T) -> PointResult {
    if left != right {
        Ok(())
    } else {
        Err(Signal::fail(format!(
            "assertion failed: left == right\n  left:  {:?}\n  right: {:?}",
            left, right
        )))
    }
}

/// Explicitly fail a test point with a message.
pub fn fail(msg: &str) -> PointResult {
    Err(Signal::fail(msg))
}

/// Mark the current point as skipped.
pub fn skip(reason: &str) -> PointResult {
    Err(Signal::skip(reason))
}

/// Mark the current point as not finished yet.
pub fn todo(reason: &str) -> PointResult {
    Err(Signal::todo(reason))
}

/// Stop the whole session.
pub fn bail_out(reason: &str) -> PointResult {
    Err(Signal::bail_out(reason))
}
