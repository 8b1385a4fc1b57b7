//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic behind the store's lock and the
//! request/response contract.

pub mod error;
pub mod error_ext;
pub mod protocol;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use protocol::{dispatch, handle_json, ErrorCode, Request, Response};
