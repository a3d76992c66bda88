//! Core types and operations for the Quill blog content store.
//!
//! This crate owns the canonical post/comment/like collections, the derived
//! views computed from them, and the session holder. It is free of HTTP and
//! database dependencies: durable storage is reached through the
//! [`kv::KvStore`] trait, implemented here in memory and by
//! `quill-store-sqlite` on disk.

pub mod blog;
pub mod comment;
pub mod error;
pub mod image;
pub mod kv;
pub mod like;
pub mod persist;
pub mod post;
pub mod search;
pub mod seed;
pub mod session;
pub mod store;
pub mod user;
pub mod views;

pub use blog::Blog;
pub use error::{Entity, Error, Result};
