//! Running a single test point.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use tapline_core::{Outcome, TestPoint};

/// Fault kind used for points that panic.
pub const PANIC_FAULT_KIND: &str = "panic";

/// Invoke a point's entry and classify what it did.
///
/// Signals map onto their outcome one to one. A panic is contained here and becomes
/// `Outcome::Unexpected { kind: "panic", .. }`; the engine never unwinds past this call.
pub fn invoke(point: &TestPoint) -> Outcome {
    match catch_unwind(AssertUnwindSafe(|| point.invoke())) {
        Ok(result) => Outcome::from(result),
        Err(payload) => Outcome::Unexpected {
            kind: PANIC_FAULT_KIND.to_string(),
            message: panic_message(payload.as_ref()),
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}
