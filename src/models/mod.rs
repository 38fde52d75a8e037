//! Data models for requests, responses and collections.
//!
//! The serialized shapes match the JSON the workbench exports and imports, so
//! collections saved by one installation can be loaded by another.

pub mod collection;
pub mod request;
pub mod response;

pub use collection::Collection;
pub use request::{
    ApiRequest, BodyMode, FieldKind, FormField, Header, HttpMethod, KeyValue, QueryParam,
    RequestBody,
};
pub use response::ApiResponse;
