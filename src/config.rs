//! Per-call dispatch configuration and layered timeout resolution.

use std::time::Duration;

use serde_json::Value;

use crate::shape::ShapeDescriptor;

/// Timeout applied when neither the call nor the dispatcher supplies one.
pub const FALLBACK_TIMEOUT: Duration = Duration::from_millis(5000);

pub type SuccessCallback<S> = Box<dyn FnOnce(S) + Send>;
pub type ErrorCallback<E> = Box<dyn FnOnce(E) + Send>;
pub type UnknownCallback = Box<dyn FnOnce(Value) + Send>;

/// Configuration for a single [`handle`](crate::Dispatcher::handle) call.
///
/// Carries the ordered success and error shape candidates, the callbacks,
/// and an optional per-call timeout. The two mandatory callbacks are fixed
/// at construction; everything else is added fluently.
pub struct DispatchConfig<S, E> {
    pub(crate) valid_responses: Vec<ShapeDescriptor<S>>,
    pub(crate) valid_errors: Vec<ShapeDescriptor<E>>,
    pub(crate) on_success: SuccessCallback<S>,
    pub(crate) on_error: ErrorCallback<E>,
    pub(crate) on_unknown: Option<UnknownCallback>,
    pub(crate) timeout: Option<Duration>,
}

impl<S, E> DispatchConfig<S, E> {
    pub fn new(
        on_success: impl FnOnce(S) + Send + 'static,
        on_error: impl FnOnce(E) + Send + 'static,
    ) -> Self {
        Self {
            valid_responses: Vec::new(),
            valid_errors: Vec::new(),
            on_success: Box::new(on_success),
            on_error: Box::new(on_error),
            on_unknown: None,
            timeout: None,
        }
    }

    /// Append a success shape candidate. Order is significant: the first
    /// matching candidate wins.
    pub fn response(mut self, descriptor: ShapeDescriptor<S>) -> Self {
        self.valid_responses.push(descriptor);
        self
    }

    /// Append an error shape candidate. Order is significant.
    pub fn error(mut self, descriptor: ShapeDescriptor<E>) -> Self {
        self.valid_errors.push(descriptor);
        self
    }

    /// Install a callback for values that match no candidate. Without one,
    /// unmatched values go to the dispatcher's diagnostic sink.
    pub fn on_unknown(mut self, callback: impl FnOnce(Value) + Send + 'static) -> Self {
        self.on_unknown = Some(Box::new(callback));
        self
    }

    /// Per-call timeout; overrides the dispatcher's default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Instance-level partial defaults, set once at dispatcher construction.
///
/// Only `timeout` participates in dispatch; it sits between the per-call
/// value and the [`FALLBACK_TIMEOUT`] constant in precedence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatcherDefaults {
    pub timeout: Option<Duration>,
}

/// Resolve the timeout layers once, at the start of a `handle` call:
/// per-call value, then instance default, then the constant fallback.
pub(crate) fn effective_timeout(
    per_call: Option<Duration>,
    defaults: &DispatcherDefaults,
) -> Duration {
    per_call.or(defaults.timeout).unwrap_or(FALLBACK_TIMEOUT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_call_timeout_wins() {
        let defaults = DispatcherDefaults {
            timeout: Some(Duration::from_secs(9)),
        };
        assert_eq!(
            effective_timeout(Some(Duration::from_millis(100)), &defaults),
            Duration::from_millis(100)
        );
    }

    #[test]
    fn instance_default_beats_fallback() {
        let defaults = DispatcherDefaults {
            timeout: Some(Duration::from_secs(9)),
        };
        assert_eq!(effective_timeout(None, &defaults), Duration::from_secs(9));
    }

    #[test]
    fn fallback_applies_when_nothing_is_set() {
        assert_eq!(
            effective_timeout(None, &DispatcherDefaults::default()),
            FALLBACK_TIMEOUT
        );
    }
}
