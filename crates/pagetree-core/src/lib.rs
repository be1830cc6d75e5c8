//! Pagetree Core Types and Definitions
//!
//! This crate provides the foundational types for the Pagetree page hierarchy
//! editor. It includes:
//!
//! - **Identifiers**: Stable page identifiers ([`identifier::PageId`])
//! - **Geometry**: Node positions and sizes ([`geometry`] module)
//! - **Pages**: The [`page::PageNode`] record and the [`document::Document`]
//!   that owns pages and home sections
//! - **Edges**: The parent-link projection ([`edge`] module)
//! - **Reorder**: Single-element list moves ([`reorder`] module)
//! - **Options**: Layout direction and engine selection ([`options`] module)

pub mod document;
pub mod edge;
pub mod geometry;
pub mod identifier;
pub mod options;
pub mod page;
pub mod reorder;
