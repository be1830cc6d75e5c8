//! Pagetree CLI library
//!
//! This module contains the CLI host for the Pagetree editor. Each invocation
//! restores the saved document from local storage (or starts from the
//! default hierarchy), performs one action and, when the action changed the
//! document, saves it again.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Action, Args};

use std::{fs, path::PathBuf};

use log::{info, warn};

use pagetree::{
    PagetreeError,
    editor::{Command, EditorEvent, Session, ViewEvent},
    geometry::Point,
    identifier::PageId,
    notice::Notice,
    persist::{DirectorySink, FileStorage, Persistence},
};

type CliSession = Session<FileStorage, DirectorySink>;

/// Run the Pagetree CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `PagetreeError` for:
/// - Configuration loading errors
/// - Storage directory resolution errors
/// - Event script read or parse errors
/// - Layout errors
/// - Storage errors while clearing
pub fn run(args: &Args) -> Result<(), PagetreeError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let storage_dir = config::storage_directory(args.storage_dir.as_deref(), &app_config)?;
    info!(storage_dir = storage_dir.display().to_string(); "Using local storage");

    let storage =
        FileStorage::new(&storage_dir).with_quota(app_config.storage().quota_bytes());
    let persistence = Persistence::new(storage).with_export_config(app_config.export());

    let output_dir = match &args.action {
        Action::Export {
            output_dir: Some(dir),
        } => PathBuf::from(dir),
        _ => app_config
            .export()
            .directory()
            .map_or_else(|| PathBuf::from("."), |dir| dir.to_path_buf()),
    };
    let sink = DirectorySink::new(output_dir);

    let mut session = Session::start(app_config.layout().clone(), persistence, sink)?;

    match &args.action {
        Action::Show { json } => {
            let view = session.editor().view();
            if *json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{view}");
            }
        }
        Action::ResetLayout { direction } => {
            let event = ViewEvent::ResetLayout {
                direction: *direction,
            };
            apply_and_save(&mut session, event)?;
        }
        Action::Move { id, x, y } => {
            let event = ViewEvent::NodeDragEnd {
                id: PageId::new(id.as_str()),
                position: Point::new(*x, *y),
            };
            apply_and_save(&mut session, event)?;
        }
        Action::ReorderSection { active, over } => {
            let event = ViewEvent::SectionDragEnd {
                active_id: active.clone(),
                over_id: over.clone(),
            };
            apply_and_save(&mut session, event)?;
        }
        Action::ReorderPage { active, over } => {
            let event = ViewEvent::PageDragEnd {
                active_id: PageId::new(active.as_str()),
                over_id: over.as_deref().map(PageId::new),
            };
            apply_and_save(&mut session, event)?;
        }
        Action::Reparent { id, parent } => {
            let event = ViewEvent::Reparent {
                id: PageId::new(id.as_str()),
                parent_id: parent.as_deref().map(PageId::new),
            };
            apply_and_save(&mut session, event)?;
        }
        Action::Apply { script } => {
            let text = fs::read_to_string(script)?;
            let events: Vec<EditorEvent> = serde_json::from_str(&text)?;
            info!(script = script.as_str(), events = events.len(); "Replaying event script");
            for event in events {
                if let Some(notice) = session.dispatch(event)? {
                    report(&notice);
                }
            }
        }
        Action::Export { .. } => {
            if let Some(notice) = session.dispatch(Command::Export)? {
                report(&notice);
            }
        }
        Action::Check => {
            let report = session.editor().check();
            print!("{report}");
            if !report.is_clean() {
                warn!(issues = report.issue_count(); "Document has structural issues");
            }
        }
        Action::Clear => {
            session.persistence_mut().clear()?;
            println!("Saved document cleared");
        }
    }

    Ok(())
}

/// Applies one view event and saves the document if it changed.
fn apply_and_save(session: &mut CliSession, event: ViewEvent) -> Result<(), PagetreeError> {
    if !session.editor_mut().apply(event)? {
        info!("Nothing changed");
        return Ok(());
    }
    if let Some(notice) = session.dispatch(Command::Save)? {
        report(&notice);
    }
    Ok(())
}

fn report(notice: &Notice) {
    println!("{notice}");
}
