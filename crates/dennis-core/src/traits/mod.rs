//! Core traits for the Dennis client
//!
//! - [`Transport`]: Perform one API request and return its decoded body

pub mod transport;

pub use transport::{Lookup, Method, Request, RouteSegment, Transport};
