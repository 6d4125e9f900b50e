//! The outcome dispatcher: timeout race, failure taxonomy, and callback
//! dispatch.

use std::future::Future;
use std::sync::Arc;

use serde_json::{Value, json};
use thiserror::Error;
use tokio::task::JoinError;

use crate::config::{DispatchConfig, DispatcherDefaults, UnknownCallback, effective_timeout};
use crate::shape::{ShapeDescriptor, classify};

/// Message carried by the synthesized timeout failure.
pub const TIMEOUT_MESSAGE: &str = "Operation timed out";

/// Failures synthesized by the dispatcher itself, as opposed to failure
/// values the producer settled with.
#[derive(Debug, Error)]
pub enum DispatchFailure {
    /// The effective timeout elapsed before the producer settled.
    #[error("{}", TIMEOUT_MESSAGE)]
    Timeout,
    /// The producer task panicked; the payload is the panic message.
    #[error("producer panicked: {0}")]
    ProducerPanic(String),
}

impl DispatchFailure {
    /// Render as a message-carrying value so error descriptors that require
    /// a `message` field classify it like any producer failure.
    fn into_value(self) -> Value {
        json!({ "message": self.to_string() })
    }
}

/// Destination for diagnostics about values that matched no descriptor.
///
/// The default sink logs through `tracing`; embedders and tests can install
/// their own via [`Dispatcher::with_sink`].
pub trait DiagnosticSink: Send + Sync {
    /// Called with a value that matched no configured descriptor when no
    /// `on_unknown` callback was supplied. Non-fatal by contract.
    fn unclassified(&self, value: &Value);
}

/// [`DiagnosticSink`] backed by a `tracing` warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn unclassified(&self, value: &Value) {
        tracing::warn!(%value, "outcome matched no configured shape");
    }
}

/// Classifies the outcome of a single asynchronous operation and dispatches
/// to caller-supplied callbacks, enforcing a timeout.
///
/// A dispatcher holds no mutable state: it is created once with optional
/// [`DispatcherDefaults`] and reused across any number of concurrent
/// [`handle`](Self::handle) calls, each of which owns its own timer and
/// race.
pub struct Dispatcher {
    defaults: DispatcherDefaults,
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::with_defaults(DispatcherDefaults::default())
    }

    #[must_use]
    pub fn with_defaults(defaults: DispatcherDefaults) -> Self {
        Self {
            defaults,
            sink: Arc::new(TracingSink),
        }
    }

    /// Replace the diagnostic sink used when no `on_unknown` callback is
    /// configured.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Run `produce`, race it against the effective timeout, classify the
    /// settled value, and invoke exactly one callback.
    ///
    /// The effective timeout is the per-call value if present, else the
    /// instance default, else [`FALLBACK_TIMEOUT`](crate::FALLBACK_TIMEOUT).
    ///
    /// Nothing escapes this call: producer failures, producer panics, and
    /// the timeout are all absorbed into the error or unknown path. Exactly
    /// one of `on_success`, `on_error`, or `on_unknown` (falling back to the
    /// diagnostic sink) fires before `handle` returns.
    pub async fn handle<S, E, F, Fut>(&self, produce: F, config: DispatchConfig<S, E>)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, Value>> + Send + 'static,
    {
        let timeout = effective_timeout(config.timeout, &self.defaults);
        let task = tokio::spawn(produce());

        // The loser of the race is abandoned, not aborted: on timeout the
        // join handle is dropped but the task keeps running and its eventual
        // result is discarded. The timer is dropped as soon as the producer
        // settles, so neither side leaks.
        let settled = match tokio::time::timeout(timeout, task).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(join_error)) => Err(panic_failure(join_error).into_value()),
            Err(_elapsed) => Err(DispatchFailure::Timeout.into_value()),
        };

        match settled {
            Ok(value) => Self::dispatch(
                value,
                &config.valid_responses,
                config.on_success,
                config.on_unknown,
                &self.sink,
                "success",
            ),
            Err(value) => Self::dispatch(
                value,
                &config.valid_errors,
                config.on_error,
                config.on_unknown,
                &self.sink,
                "error",
            ),
        }
    }

    fn dispatch<T>(
        value: Value,
        candidates: &[ShapeDescriptor<T>],
        callback: Box<dyn FnOnce(T) + Send>,
        on_unknown: Option<UnknownCallback>,
        sink: &Arc<dyn DiagnosticSink>,
        path: &'static str,
    ) {
        match classify(&value, candidates) {
            Some(descriptor) => {
                tracing::debug!(shape = descriptor.name(), path, "dispatching outcome");
                // The original payload is deliberately discarded: the
                // callback receives a fresh instance of the matched shape.
                callback(descriptor.construct());
            }
            None => match on_unknown {
                Some(unknown) => unknown(value),
                None => sink.unclassified(&value),
            },
        }
    }
}

fn panic_failure(error: JoinError) -> DispatchFailure {
    let message = match error.try_into_panic() {
        Ok(payload) => payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_owned()),
        Err(error) => error.to_string(),
    };
    DispatchFailure::ProducerPanic(message)
}
