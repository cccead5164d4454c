//! Shared API types for the UMD backend
//!
//! # Design Principle
//!
//! This module contains ONLY wire types (serde structs matching the
//! backend's JSON) and pure helpers over them. HTTP transport lives in the
//! client crate; nothing here depends on an HTTP library.

pub mod types;

pub use types::{
    AnnotationMode, GroupMap, GroupRecord, NormMapping, SessionUser, Ta2Config,
};
