//! HTTP/1.1 GET-only request handling: parsing, URI resolution,
//! response framing, and content typing.

pub mod connection;
pub mod content_type;
pub mod request;
pub mod resolve;
pub mod response;

pub use connection::{service, Outcome};
