//! TAP version 14 output.
//!
//! - `format` - pure line builders (result lines, directives, escaping, diagnostics)
//! - `reporter` - the [`Reporter`] trait and the flushing [`TapReporter`]

pub mod format;
pub mod reporter;

pub use format::{Directive, ResultLine, Status};
pub use reporter::{Reporter, TapReporter};
