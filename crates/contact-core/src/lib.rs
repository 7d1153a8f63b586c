//! Core types and storage for organization directories.
//!
//! Provides the content model ([`content::ContentNode`]) for directories, organizations,
//! persons, positions and held positions, the containment-checked tree
//! ([`tree::ContactTree`]), ancestor-chain title resolution, JSON persistence,
//! and directory vocabularies.

pub mod config;
pub mod content;
pub mod error;
pub mod outline;
pub mod policy;
pub mod sample;
pub mod schema;
pub mod storage;
pub mod titles;
pub mod tree;
pub mod validate;
pub mod vocabulary;
