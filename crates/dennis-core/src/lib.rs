// # dennis-core
//
// Core library for the Dennis DNS management API client.
//
// ## Architecture Overview
//
// - **Transport**: Trait that performs one API request (HTTP lives in `dennis-http`)
// - **Client**: Shared handle every entity keeps to issue its own requests
// - **Entities**: Group, Zone, Record and Nameserver wrappers over API payloads
// - **ErrorMap**: Static table turning API error codes into typed outcomes
// - **PaginatedArray**: One page of entities plus pagination metadata
//
// ## Design Principles
//
// 1. **One operation, one request**: every entity method maps to a single
//    request/response cycle (`create_or_update` is a lookup then a write)
// 2. **Not found is not exceptional**: `find_by` returns `None`
// 3. **Translate at the call site only**: unknown error codes pass through
// 4. **No hidden state**: no retries, no caching beyond memoized nested objects

pub mod client;
pub mod config;
pub mod entities;
pub mod error;
pub mod pagination;
pub mod traits;

// Re-export core types for convenience
pub use client::Client;
pub use config::ClientConfig;
pub use entities::{
    Group, GroupProperties, Nameserver, NameserverProperties, NewGroup, Record,
    RecordListOptions, RecordProperties, Zone, ZoneProperties, normalize_type,
};
pub use error::{Entity, Error, ErrorMap, RequestError, Result, Translation, ValidationErrors};
pub use pagination::{PaginatedArray, Pagination};
pub use traits::{Lookup, Method, Request, RouteSegment, Transport};
