//! Editor session.
//!
//! [`Editor`] owns the in-memory [`Document`] and applies user interactions
//! to it. Every interaction arrives as a [`ViewEvent`]; explicit Save, Load
//! and Export arrive as a [`Command`] and go through a
//! [`Persistence`] adapter. [`Session`] ties an editor to its persistence
//! adapter and download sink and dispatches both kinds of event.
//!
//! Events naming pages or sections that do not exist change nothing.
//!
//! # Example
//!
//! ```
//! use pagetree::{
//!     config::LayoutConfig,
//!     editor::{Editor, ViewEvent},
//! };
//!
//! let mut editor = Editor::new(LayoutConfig::default());
//! editor.mount().expect("layout");
//!
//! editor
//!     .apply(ViewEvent::SectionDragEnd {
//!         active_id: "CTA".to_string(),
//!         over_id: Some("Features".to_string()),
//!     })
//!     .expect("event");
//! assert_eq!(
//!     editor.document().sections(),
//!     ["Hero", "CTA", "Features", "Testimonials", "Footer"]
//! );
//! ```

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use pagetree_core::{
    document::Document,
    geometry::Point,
    identifier::PageId,
    options::LayoutDirection,
    page::PageNode,
    reorder::{reorder, reorder_by},
};

use crate::{
    check::{StructureReport, check},
    config::LayoutConfig,
    error::PagetreeError,
    layout::EngineBuilder,
    notice::Notice,
    persist::{DownloadSink, Persistence, Storage},
    view::DiagramView,
};

/// Interaction reported by the diagram or the list views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ViewEvent {
    /// A node was dropped at `position`.
    NodeDragEnd { id: PageId, position: Point },
    /// A home section was dropped on `over_id`.
    SectionDragEnd {
        active_id: String,
        #[serde(default)]
        over_id: Option<String>,
    },
    /// A page row was dropped on `over_id`.
    PageDragEnd {
        active_id: PageId,
        #[serde(default)]
        over_id: Option<PageId>,
    },
    /// Recompute every position, optionally switching direction first.
    ResetLayout {
        #[serde(default)]
        direction: Option<LayoutDirection>,
    },
    /// Move a page under another parent, or make it a root.
    Reparent {
        id: PageId,
        #[serde(default)]
        parent_id: Option<PageId>,
    },
}

/// Explicit user command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    Save,
    Load,
    Export,
}

/// Anything a [`Session`] can dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EditorEvent {
    View(ViewEvent),
    Command(Command),
}

impl From<ViewEvent> for EditorEvent {
    fn from(event: ViewEvent) -> Self {
        Self::View(event)
    }
}

impl From<Command> for EditorEvent {
    fn from(command: Command) -> Self {
        Self::Command(command)
    }
}

/// The in-memory editing state.
#[derive(Debug, Clone)]
pub struct Editor {
    document: Document,
    layout: LayoutConfig,
    direction: LayoutDirection,
}

impl Editor {
    /// Creates an editor over the default hierarchy.
    pub fn new(layout: LayoutConfig) -> Self {
        let direction = layout.direction();
        Self {
            document: Document::default(),
            layout,
            direction,
        }
    }

    /// Replaces the document being edited.
    pub fn with_document(mut self, document: Document) -> Self {
        self.document = document;
        self
    }

    /// Startup path: the saved document if there is one, else the defaults.
    pub fn restore<S: Storage>(layout: LayoutConfig, persistence: &Persistence<S>) -> Self {
        let editor = Self::new(layout);
        match persistence.load() {
            Some(document) => editor.with_document(document),
            None => {
                info!("Starting from the default hierarchy");
                editor
            }
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Direction used by the next automatic layout.
    pub fn direction(&self) -> LayoutDirection {
        self.direction
    }

    /// Projects the current document for the diagram.
    pub fn view(&self) -> DiagramView {
        DiagramView::project(&self.document, self.direction)
    }

    /// Lays the document out if no page has a position yet.
    ///
    /// Returns whether layout ran.
    ///
    /// # Errors
    ///
    /// Returns [`PagetreeError::Layout`] if no engine could place the pages.
    pub fn mount(&mut self) -> Result<bool, PagetreeError> {
        if !self.document.is_unpositioned() {
            debug!("Document already positioned, skipping initial layout");
            return Ok(false);
        }
        self.relayout()?;
        Ok(true)
    }

    /// Applies a view event.
    ///
    /// Returns whether the document changed.
    ///
    /// # Errors
    ///
    /// Only [`ViewEvent::ResetLayout`] can fail, with
    /// [`PagetreeError::Layout`].
    pub fn apply(&mut self, event: ViewEvent) -> Result<bool, PagetreeError> {
        match event {
            ViewEvent::NodeDragEnd { id, position } => Ok(self.move_node(id.as_str(), position)),
            ViewEvent::SectionDragEnd { active_id, over_id } => {
                Ok(self.reorder_sections(&active_id, over_id.as_deref()))
            }
            ViewEvent::PageDragEnd { active_id, over_id } => Ok(self.reorder_pages(
                active_id.as_str(),
                over_id.as_ref().map(PageId::as_str),
            )),
            ViewEvent::ResetLayout { direction } => {
                self.reset_layout(direction)?;
                Ok(true)
            }
            ViewEvent::Reparent { id, parent_id } => Ok(self.reparent(
                id.as_str(),
                parent_id.as_ref().map(PageId::as_str),
            )),
        }
    }

    /// Records the final position of a dragged node.
    pub fn move_node(&mut self, id: &str, position: Point) -> bool {
        let moved = self.document.set_position(id, position);
        if moved {
            debug!(page_id = id, x = position.x(), y = position.y(); "Page moved");
        } else {
            debug!(page_id = id; "Ignoring drag");
        }
        moved
    }

    /// Moves section `active` to where `over` is.
    pub fn reorder_sections(&mut self, active: &str, over: Option<&str>) -> bool {
        let active = active.to_string();
        let over = over.map(str::to_string);
        let sections = reorder(self.document.sections(), &active, over.as_ref());
        if sections == self.document.sections() {
            return false;
        }
        self.document = self.take_document().with_sections(sections);
        true
    }

    /// Moves page `active` to where `over` is in the page list.
    pub fn reorder_pages(&mut self, active: &str, over: Option<&str>) -> bool {
        let nodes = reorder_by(
            self.document.nodes(),
            |page: &PageNode| page.id().as_str(),
            active,
            over,
        );
        if nodes == self.document.nodes() {
            return false;
        }
        self.document = self.take_document().with_nodes(nodes);
        true
    }

    /// Moves page `id` under `parent` (`None` makes it a root).
    ///
    /// Levels of the moved subtree are recomputed; positions are kept.
    pub fn reparent(&mut self, id: &str, parent: Option<&str>) -> bool {
        let changed = self.document.reparent(id, parent);
        if changed {
            info!(page_id = id, parent_id = parent.unwrap_or("<root>"); "Page reparented");
        }
        changed
    }

    /// Recomputes every position, switching to `direction` when given.
    ///
    /// # Errors
    ///
    /// Returns [`PagetreeError::Layout`] if no engine could place the pages;
    /// the document and direction are unchanged in that case.
    pub fn reset_layout(
        &mut self,
        direction: Option<LayoutDirection>,
    ) -> Result<(), PagetreeError> {
        let direction = direction.unwrap_or(self.direction);
        EngineBuilder::new(&self.layout)
            .with_direction(direction)
            .apply(&mut self.document)?;
        self.direction = direction;
        Ok(())
    }

    /// Writes the document through `persistence`.
    pub fn save<S: Storage>(&self, persistence: &mut Persistence<S>) -> Notice {
        persistence.save(&self.document)
    }

    /// Replaces the document with the saved one.
    ///
    /// Keeps the current document and returns [`Notice::NoSavedData`] when
    /// nothing usable is stored. A loaded document without positions is laid
    /// out.
    pub fn load<S: Storage>(&mut self, persistence: &Persistence<S>) -> Notice {
        let Some(document) = persistence.load() else {
            return Notice::NoSavedData;
        };
        self.document = document;
        if let Err(err) = self.mount() {
            warn!(err:% = err; "Loaded document could not be laid out");
        }
        Notice::Loaded
    }

    /// Offers the document as a download through `sink`.
    pub fn export<S: Storage>(
        &self,
        persistence: &Persistence<S>,
        sink: &mut impl DownloadSink,
    ) -> Notice {
        persistence.export(&self.document, sink)
    }

    /// Reports structural problems in the document.
    pub fn check(&self) -> StructureReport {
        check(&self.document)
    }

    fn relayout(&mut self) -> Result<(), PagetreeError> {
        let builder = EngineBuilder::new(&self.layout).with_direction(self.direction);
        builder.apply(&mut self.document)
    }

    fn take_document(&mut self) -> Document {
        std::mem::replace(&mut self.document, Document::new(Vec::new(), Vec::new()))
    }
}

/// An editor wired to its persistence adapter and download sink.
#[derive(Debug)]
pub struct Session<S, D> {
    editor: Editor,
    persistence: Persistence<S>,
    sink: D,
}

impl<S: Storage, D: DownloadSink> Session<S, D> {
    pub fn new(editor: Editor, persistence: Persistence<S>, sink: D) -> Self {
        Self {
            editor,
            persistence,
            sink,
        }
    }

    /// Restores the saved document (or defaults) and mounts it.
    ///
    /// # Errors
    ///
    /// Returns [`PagetreeError::Layout`] if the initial layout fails.
    pub fn start(
        layout: LayoutConfig,
        persistence: Persistence<S>,
        sink: D,
    ) -> Result<Self, PagetreeError> {
        let mut editor = Editor::restore(layout, &persistence);
        editor.mount()?;
        Ok(Self::new(editor, persistence, sink))
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut Persistence<S> {
        &mut self.persistence
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    /// Handles one event.
    ///
    /// View events return `None`; commands return the notice to show.
    ///
    /// # Errors
    ///
    /// Returns [`PagetreeError::Layout`] if a layout reset fails.
    pub fn dispatch(
        &mut self,
        event: impl Into<EditorEvent>,
    ) -> Result<Option<Notice>, PagetreeError> {
        match event.into() {
            EditorEvent::View(event) => {
                self.editor.apply(event)?;
                Ok(None)
            }
            EditorEvent::Command(command) => Ok(Some(self.run(command))),
        }
    }

    fn run(&mut self, command: Command) -> Notice {
        let notice = match command {
            Command::Save => self.editor.save(&mut self.persistence),
            Command::Load => self.editor.load(&self.persistence),
            Command::Export => self.editor.export(&self.persistence, &mut self.sink),
        };
        if notice.is_failure() {
            warn!(notice:% = notice; "Command did not complete");
        } else {
            info!(notice:% = notice; "Command completed");
        }
        notice
    }

    /// Splits the session back into its parts.
    pub fn into_parts(self) -> (Editor, Persistence<S>, D) {
        (self.editor, self.persistence, self.sink)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use crate::{
        persist::{MemorySink, MemoryStorage, STORAGE_KEY},
        view::HandleSide,
    };

    use super::*;

    fn mounted() -> Editor {
        let mut editor = Editor::new(LayoutConfig::default());
        assert!(editor.mount().unwrap());
        editor
    }

    #[test]
    fn test_mount_runs_once() {
        let mut editor = mounted();
        assert!(!editor.document().is_unpositioned());
        assert!(!editor.mount().unwrap());
    }

    #[test]
    fn test_drag_keeps_other_positions() {
        let mut editor = mounted();
        let before = editor.document().clone();

        let changed = editor
            .apply(ViewEvent::NodeDragEnd {
                id: PageId::new("blog"),
                position: Point::new(999.0, 5.5),
            })
            .unwrap();
        assert!(changed);

        for page in editor.document().nodes() {
            let old = before.node(page.id().as_str()).unwrap();
            if page.id() == "blog" {
                assert_approx_eq!(f64, page.position().x(), 999.0);
                assert_approx_eq!(f64, page.position().y(), 5.5);
            } else {
                assert_eq!(page.position(), old.position());
            }
        }
    }

    #[test]
    fn test_unknown_ids_change_nothing() {
        let mut editor = mounted();
        let before = editor.document().clone();

        let events = [
            ViewEvent::NodeDragEnd {
                id: PageId::new("pricing"),
                position: Point::new(1.0, 1.0),
            },
            ViewEvent::SectionDragEnd {
                active_id: "Pricing".to_string(),
                over_id: Some("Hero".to_string()),
            },
            ViewEvent::SectionDragEnd {
                active_id: "Hero".to_string(),
                over_id: None,
            },
            ViewEvent::PageDragEnd {
                active_id: PageId::new("about"),
                over_id: Some(PageId::new("pricing")),
            },
            ViewEvent::Reparent {
                id: PageId::new("home"),
                parent_id: Some(PageId::new("post1")),
            },
        ];
        for event in events {
            assert!(!editor.apply(event).unwrap());
        }
        assert_eq!(editor.document(), &before);
    }

    #[test]
    fn test_page_drag_reorders_list() {
        let mut editor = mounted();
        assert!(editor.reorder_pages("contact", Some("about")));
        let ids: Vec<&str> = editor
            .document()
            .nodes()
            .iter()
            .take(3)
            .map(|page| page.id().as_str())
            .collect();
        assert_eq!(ids, ["home", "contact", "about"]);
    }

    #[test]
    fn test_reset_layout_switches_direction() {
        let mut editor = mounted();
        editor
            .apply(ViewEvent::ResetLayout {
                direction: Some(LayoutDirection::LeftToRight),
            })
            .unwrap();
        assert_eq!(editor.direction(), LayoutDirection::LeftToRight);

        let home = editor.document().node("home").unwrap().position();
        let about = editor.document().node("about").unwrap().position();
        assert!(home.x() < about.x());

        let view = editor.view();
        let home = view.home().unwrap();
        assert_eq!(home.source_position(), HandleSide::Right);
        assert_eq!(home.target_position(), HandleSide::Left);
    }

    #[test]
    fn test_failed_reset_keeps_direction_and_positions() {
        let layout: LayoutConfig = serde_json::from_str(r#"{"node_spacing": 1e308}"#).unwrap();
        let positioned = mounted().document().clone();
        let mut editor = Editor::new(layout).with_document(positioned.clone());

        let result = editor.reset_layout(Some(LayoutDirection::LeftToRight));
        assert!(matches!(result, Err(PagetreeError::Layout(_))));
        assert_eq!(editor.direction(), LayoutDirection::TopToBottom);
        assert_eq!(editor.document(), &positioned);
    }

    #[test]
    fn test_non_finite_drag_is_ignored_and_save_round_trips() {
        let mut editor = mounted();
        let mut persistence = Persistence::new(MemoryStorage::new());

        let changed = editor
            .apply(ViewEvent::NodeDragEnd {
                id: PageId::new("blog"),
                position: Point::new(f64::NAN, 10.0),
            })
            .unwrap();
        assert!(!changed);

        assert_eq!(editor.save(&mut persistence), Notice::Saved);
        let stored = persistence.storage().get_item(STORAGE_KEY).unwrap();
        assert!(!stored.unwrap_or_default().contains("null"));
        assert_eq!(persistence.load().as_ref(), Some(editor.document()));
    }

    #[test]
    fn test_reparent_updates_levels_without_relayout() {
        let mut editor = mounted();
        let before = editor.document().node("blog").unwrap().position();

        assert!(editor.reparent("blog", Some("about")));
        let document = editor.document();
        assert_eq!(document.node("blog").map(PageNode::level), Some(3));
        assert_eq!(document.node("post1").map(PageNode::level), Some(4));
        assert_eq!(document.node("blog").unwrap().position(), before);
        assert!(editor.check().is_clean());
    }

    #[test]
    fn test_load_without_data_keeps_document() {
        let mut editor = mounted();
        editor.reorder_sections("Footer", Some("Hero"));
        let before = editor.document().clone();

        let persistence = Persistence::new(MemoryStorage::new());
        assert_eq!(editor.load(&persistence), Notice::NoSavedData);
        assert_eq!(editor.document(), &before);
    }

    #[test]
    fn test_load_lays_out_unpositioned_document() {
        let mut persistence = Persistence::new(MemoryStorage::new());
        persistence.save(&Document::default());

        let mut editor = Editor::new(LayoutConfig::default());
        assert_eq!(editor.load(&persistence), Notice::Loaded);
        assert!(!editor.document().is_unpositioned());
    }

    #[test]
    fn test_event_json_shapes() {
        let events: Vec<EditorEvent> = serde_json::from_str(
            r#"[
                {"type": "nodeDragEnd", "id": "blog", "position": {"x": 10, "y": 20}},
                {"type": "sectionDragEnd", "activeId": "CTA", "overId": "Features"},
                {"type": "pageDragEnd", "activeId": "about"},
                {"type": "resetLayout", "direction": "LR"},
                {"type": "reparent", "id": "post1", "parentId": null},
                {"type": "save"},
                {"type": "export"}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            events[0],
            EditorEvent::View(ViewEvent::NodeDragEnd {
                id: PageId::new("blog"),
                position: Point::new(10.0, 20.0),
            })
        );
        assert_eq!(
            events[2],
            EditorEvent::View(ViewEvent::PageDragEnd {
                active_id: PageId::new("about"),
                over_id: None,
            })
        );
        assert_eq!(
            events[3],
            EditorEvent::View(ViewEvent::ResetLayout {
                direction: Some(LayoutDirection::LeftToRight),
            })
        );
        assert_eq!(events[5], EditorEvent::Command(Command::Save));
        assert_eq!(events[6], EditorEvent::Command(Command::Export));
    }

    #[test]
    fn test_session_dispatch() {
        let mut session = Session::start(
            LayoutConfig::default(),
            Persistence::new(MemoryStorage::new()),
            MemorySink::new(),
        )
        .unwrap();

        assert_eq!(
            session.dispatch(Command::Load).unwrap(),
            Some(Notice::NoSavedData)
        );
        assert_eq!(
            session
                .dispatch(ViewEvent::SectionDragEnd {
                    active_id: "CTA".to_string(),
                    over_id: Some("Features".to_string()),
                })
                .unwrap(),
            None
        );
        assert_eq!(
            session.dispatch(Command::Save).unwrap(),
            Some(Notice::Saved)
        );
        assert_eq!(
            session.dispatch(Command::Export).unwrap(),
            Some(Notice::Exported {
                file_name: "page-structure.json".to_string()
            })
        );

        let (editor, persistence, sink) = session.into_parts();
        assert_eq!(persistence.load().as_ref(), Some(editor.document()));
        assert_eq!(sink.downloads().len(), 1);
    }
}
