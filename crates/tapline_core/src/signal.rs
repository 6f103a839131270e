//! Signals raised by test points and the outcomes the engine derives from them.
//!
//! A test point returns [`PointResult`]. `Ok(())` means the point passed; `Err(signal)` carries one of the
//! four control signals, or a [`Signal::Fault`] for any other error bubbled up with `?`.

use std::any::type_name;
use std::fmt;

/// Result type returned by every test point entry.
pub type PointResult = Result<(), Signal>;

/// Control signal a test point uses to report something other than a plain pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    /// The point could not run because of external circumstances; reported as passing.
    Skip(String),
    /// The point is not finished yet; reported as failing with a `TODO` directive.
    ToDo(String),
    /// The point detected a failure.
    Fail(String),
    /// The whole session must stop right now.
    BailOut(String),
    /// Any other error surfaced by the point.
    Fault { kind: String, message: String },
}

impl Signal {
    pub fn skip(reason: impl Into<String>) -> Self {
        Signal::Skip(reason.into())
    }

    pub fn todo(reason: impl Into<String>) -> Self {
        Signal::ToDo(reason.into())
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Signal::Fail(reason.into())
    }

    pub fn bail_out(reason: impl Into<String>) -> Self {
        Signal::BailOut(reason.into())
    }

    /// Build a fault with an explicit kind label.
    pub fn fault(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Signal::Fault {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

// `Signal` deliberately does not implement `std::error::Error`, otherwise this impl would overlap with the
// reflexive `From<T> for T`.
impl<E> From<E> for Signal
where
    E: std::error::Error,
{
    fn from(err: E) -> Self {
        Signal::Fault {
            kind: type_name::<E>().to_string(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Skip(reason) => write!(f, "skip: {reason}"),
            Signal::ToDo(reason) => write!(f, "todo: {reason}"),
            Signal::Fail(reason) => write!(f, "fail: {reason}"),
            Signal::BailOut(reason) => write!(f, "bail out: {reason}"),
            Signal::Fault { kind, message } => write!(f, "{kind}: {message}"),
        }
    }
}

/// Final classification of one executed test point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Skipped(String),
    ToDo(String),
    Failed(String),
    Unexpected { kind: String, message: String },
    BailOut(String),
}

impl Outcome {
    /// Whether a TAP consumer sees this outcome as `ok`.
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Passed | Outcome::Skipped(_))
    }

    /// Whether this outcome counts against the session's failure total (ToDo included).
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Outcome::ToDo(_) | Outcome::Failed(_) | Outcome::Unexpected { .. }
        )
    }
}

impl From<PointResult> for Outcome {
    fn from(result: PointResult) -> Self {
        match result {
            Ok(()) => Outcome::Passed,
            Err(Signal::Skip(reason)) => Outcome::Skipped(reason),
            Err(Signal::ToDo(reason)) => Outcome::ToDo(reason),
            Err(Signal::Fail(reason)) => Outcome::Failed(reason),
            Err(Signal::BailOut(reason)) => Outcome::BailOut(reason),
            Err(Signal::Fault { kind, message }) => Outcome::Unexpected { kind, message },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct SensorOffline;

    impl fmt::Display for SensorOffline {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("sensor did not answer")
        }
    }

    impl std::error::Error for SensorOffline {}

    fn read_sensor() -> Result<u8, SensorOffline> {
        Err(SensorOffline)
    }

    fn point_using_question_mark() -> PointResult {
        let _value = read_sensor()?;
        Ok(())
    }

    #[test]
    fn test_question_mark_converts_errors_into_faults() {
        let signal = point_using_question_mark().unwrap_err();
        match signal {
            Signal::Fault { kind, message } => {
                assert!(kind.ends_with("SensorOffline"), "unexpected kind {kind}");
                assert_eq!(message, "sensor did not answer");
            }
            other => panic!("expected a fault, got {other:?}"),
        }
    }

    #[test]
    fn test_io_error_kind_is_type_name() {
        let err = std::io::Error::other("disk gone");
        let signal = Signal::from(err);
        assert_eq!(
            signal,
            Signal::fault(type_name::<std::io::Error>(), "disk gone")
        );
    }

    #[test]
    fn test_outcome_from_point_result() {
        assert_eq!(Outcome::from(Ok(())), Outcome::Passed);
        assert_eq!(
            Outcome::from(Err(Signal::skip("no uart"))),
            Outcome::Skipped("no uart".to_string())
        );
        assert_eq!(
            Outcome::from(Err(Signal::todo("later"))),
            Outcome::ToDo("later".to_string())
        );
        assert_eq!(
            Outcome::from(Err(Signal::fail("x"))),
            Outcome::Failed("x".to_string())
        );
        assert_eq!(
            Outcome::from(Err(Signal::bail_out("board on fire"))),
            Outcome::BailOut("board on fire".to_string())
        );
    }

    #[test]
    fn test_outcome_classification() {
        assert!(Outcome::Passed.is_ok());
        assert!(Outcome::Skipped(String::new()).is_ok());
        assert!(!Outcome::ToDo(String::new()).is_ok());
        assert!(Outcome::ToDo(String::new()).is_failure());
        assert!(Outcome::Failed(String::new()).is_failure());
        assert!(
            Outcome::Unexpected {
                kind: "panic".into(),
                message: String::new()
            }
            .is_failure()
        );
        assert!(!Outcome::Skipped(String::new()).is_failure());
        assert!(!Outcome::BailOut(String::new()).is_failure());
        assert!(!Outcome::BailOut(String::new()).is_ok());
    }
}
