//! Classify the outcome of a single async operation and dispatch callbacks.
//!
//! This crate wraps one asynchronous producer at a time: it races the
//! producer against a timeout, classifies whatever it settled with (success
//! value, failure value, or the synthesized timeout failure) against ordered
//! lists of shape candidates, and invokes exactly one caller-supplied
//! callback. It performs no I/O of its own and never propagates an error to
//! the caller; outcomes are observable only through the callbacks.
//!
//! # Classification
//!
//! A [`ShapeDescriptor`] declares the field names a value must carry to
//! count as that shape. Candidates are tested in list order and the first
//! match wins. On a match the callback receives a **fresh** instance built
//! by the descriptor; the classified payload itself is discarded (a
//! deliberately preserved quirk of the system this replaces — see
//! `DESIGN.md`). Values that match nothing go to the optional `on_unknown`
//! callback, or failing that to a pluggable [`DiagnosticSink`].
//!
//! # Example
//!
//! ```
//! use outcome_dispatch::{DispatchConfig, Dispatcher, Shape, ShapeDescriptor};
//! use serde_json::json;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Created;
//!
//! impl Shape for Created {
//!     const NAME: &'static str = "Created";
//!     const REQUIRED_FIELDS: &'static [&'static str] = &["id"];
//! }
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct ApiError;
//!
//! impl Shape for ApiError {
//!     const NAME: &'static str = "ApiError";
//!     const REQUIRED_FIELDS: &'static [&'static str] = &["message"];
//! }
//!
//! # async fn demo() {
//! let dispatcher = Dispatcher::new();
//! let config = DispatchConfig::new(
//!     |created: Created| println!("created: {created:?}"),
//!     |error: ApiError| eprintln!("failed: {error:?}"),
//! )
//! .response(ShapeDescriptor::of::<Created>())
//! .error(ShapeDescriptor::of::<ApiError>());
//!
//! dispatcher
//!     .handle(|| async { Ok(json!({ "id": 7 })) }, config)
//!     .await;
//! # }
//! ```

pub mod config;
pub mod dispatcher;
pub mod shape;

pub use config::{DispatchConfig, DispatcherDefaults, FALLBACK_TIMEOUT};
pub use dispatcher::{DiagnosticSink, DispatchFailure, Dispatcher, TIMEOUT_MESSAGE, TracingSink};
pub use shape::{Shape, ShapeDescriptor, classify};
