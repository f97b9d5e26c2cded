//! # voxnote-storage
//!
//! Durable note storage for voxnote.
//!
//! This crate provides:
//! - [`StorageConfig`], the explicit storage policy value object
//!   (prefer-local, force-remote, optional remote credentials)
//! - An [`ObjectStore`] trait with an S3 implementation
//! - Atomic local filesystem writes
//! - [`NoteStore`], which applies the backend selection and fallback
//!   policy and normalizes every outcome into a
//!   [`voxnote_core::StorageResult`]

pub mod config;
pub mod local;
pub mod object_store;
pub mod store;

// Re-export core types
pub use voxnote_core::{Error, Result, StorageResult, StorageType};

pub use config::{RemoteStorageConfig, StorageConfig};
pub use object_store::{ObjectStore, S3ObjectStore};
pub use store::NoteStore;
