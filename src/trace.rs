//! Stage instrumentation for decode, filter and NMS.
//!
//! Every stage wraps its work in `trace_span!(...).entered()` and reports how
//! many records it produced with `trace_event!`. Both go to `tracing` at debug
//! level when the `tracing` feature is on. When it is off, call sites compile
//! unchanged against [`StageSpan`] and the event field values are dropped.

/// Debug-level span covering one pipeline stage.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::debug_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::StageSpan
    };
}

/// Debug-level record-count event inside the current stage span.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::debug!(name: $name, $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// Zero-sized placeholder for `tracing::Span` in builds without `tracing`.
#[cfg(not(feature = "tracing"))]
#[derive(Clone, Copy, Debug, Default)]
pub struct StageSpan;

#[cfg(not(feature = "tracing"))]
impl StageSpan {
    /// Matches `Span::entered`; there is nothing to enter.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
