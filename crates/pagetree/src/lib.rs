//! Pagetree - a visual editor core for website page hierarchies.
//!
//! A [`Document`](document::Document) holds the page tree (each page names
//! its parent) and the ordered list of home-page sections. This crate lays
//! the tree out as a diagram, applies drag and drop edits to it, and saves,
//! loads and exports it as JSON.
//!
//! # Example
//!
//! ```
//! use pagetree::{
//!     config::AppConfig,
//!     editor::{Command, Session, ViewEvent},
//!     notice::Notice,
//!     persist::{MemorySink, MemoryStorage, Persistence},
//! };
//!
//! let config = AppConfig::default();
//! let persistence = Persistence::new(MemoryStorage::new()).with_export_config(config.export());
//! let mut session = Session::start(config.layout().clone(), persistence, MemorySink::new())
//!     .expect("initial layout");
//!
//! assert_eq!(session.editor().view().edges().len(), 11);
//!
//! session
//!     .dispatch(ViewEvent::SectionDragEnd {
//!         active_id: "Footer".to_string(),
//!         over_id: Some("Hero".to_string()),
//!     })
//!     .expect("event");
//! assert_eq!(session.dispatch(Command::Save).expect("save"), Some(Notice::Saved));
//! ```

pub mod check;
pub mod config;
pub mod editor;
pub mod layout;
pub mod notice;
pub mod persist;
pub mod structure;
pub mod view;

mod error;

pub use pagetree_core::{document, edge, geometry, identifier, options, page, reorder};

pub use error::PagetreeError;
