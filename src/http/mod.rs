//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! AccountSession
//!     → request.rs (ApiRequest: verb, path, query, JSON body, bearer)
//!     → transport.rs (reqwest client bound to the account's proxy, deadline)
//!     → response.rs (status + body → typed result or ApiError)
//! ```
//!
//! # Design Decisions
//! - `Transport` is a trait so sessions can run against scripted responses
//! - No retries here; the resilience wrapper owns retry policy
//! - Every request has a deadline; elapsed deadlines count as "no response"

pub mod request;
pub mod response;
pub mod transport;

pub use request::ApiRequest;
pub use response::ApiResponse;
pub use transport::{ReqwestTransport, Transport, TransportError};
