//! The measurement execution engine: validates incoming requests, drives
//! the underlying diagnostic tools, parses their output incrementally,
//! enriches results, and enforces the no-private-destinations safety
//! policy. Owns no transport and no persistence of its own.

pub mod dispatcher;
pub mod enrichment;
pub mod error;
pub mod handlers;
pub mod net;
pub mod parsers;
pub mod validate;

pub use dispatcher::Dispatcher;
pub use error::{ProbeError, Result};
pub use handlers::{HandlerContext, ProgressEvent};
