//! Diagram view projected from the document.
//!
//! The diagram never owns state: [`DiagramView::project`] rebuilds nodes and
//! edges from the [`Document`] after every change. Edges come from
//! [`project_edges`], so they always match the parent links. Edge handles
//! follow the layout direction: edges leave a node towards its children and
//! enter it from its parent's side.

use std::fmt;

use serde::Serialize;

use pagetree_core::{
    document::Document,
    edge::{Edge, project_edges},
    geometry::Point,
    identifier::PageId,
    options::LayoutDirection,
};

/// Side of a node box an edge attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl HandleSide {
    /// Side outgoing edges leave from.
    pub fn source(direction: LayoutDirection) -> Self {
        match direction {
            LayoutDirection::TopToBottom => Self::Bottom,
            LayoutDirection::LeftToRight => Self::Right,
        }
    }

    /// Side incoming edges arrive at.
    pub fn target(direction: LayoutDirection) -> Self {
        match direction {
            LayoutDirection::TopToBottom => Self::Top,
            LayoutDirection::LeftToRight => Self::Left,
        }
    }
}

/// How a node is drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeKind {
    /// The home page, drawn with its ordered section list.
    Home { sections: Vec<String> },
    /// Any other page.
    Page,
}

/// One diagram node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewNode {
    id: PageId,
    label: String,
    level: u32,
    position: Point,
    source_position: HandleSide,
    target_position: HandleSide,
    #[serde(flatten)]
    kind: NodeKind,
}

impl ViewNode {
    pub fn id(&self) -> &PageId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Depth used for the node colour.
    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn source_position(&self) -> HandleSide {
        self.source_position
    }

    pub fn target_position(&self) -> HandleSide {
        self.target_position
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_home(&self) -> bool {
        matches!(self.kind, NodeKind::Home { .. })
    }
}

/// Nodes and edges handed to the diagram renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramView {
    nodes: Vec<ViewNode>,
    edges: Vec<Edge>,
}

impl DiagramView {
    /// Projects `document` into diagram nodes and edges laid out in
    /// `direction`.
    pub fn project(document: &Document, direction: LayoutDirection) -> Self {
        let source_position = HandleSide::source(direction);
        let target_position = HandleSide::target(direction);
        let home = document.home().map(|home| home.id());
        let nodes = document
            .nodes()
            .iter()
            .map(|page| {
                let kind = if Some(page.id()) == home {
                    NodeKind::Home {
                        sections: document.sections().to_vec(),
                    }
                } else {
                    NodeKind::Page
                };
                ViewNode {
                    id: page.id().clone(),
                    label: page.label().to_string(),
                    level: page.level(),
                    position: page.position(),
                    source_position,
                    target_position,
                    kind,
                }
            })
            .collect();

        Self {
            nodes,
            edges: project_edges(document.nodes()),
        }
    }

    pub fn nodes(&self) -> &[ViewNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&ViewNode> {
        self.nodes.iter().find(|node| node.id == *id)
    }

    pub fn home(&self) -> Option<&ViewNode> {
        self.nodes.iter().find(|node| node.is_home())
    }
}

impl fmt::Display for DiagramView {
    /// Indented outline: every page under its parent, in document order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_node(
            f: &mut fmt::Formatter<'_>,
            view: &DiagramView,
            node: &ViewNode,
            depth: usize,
            seen: &mut Vec<PageId>,
        ) -> fmt::Result {
            if seen.contains(&node.id) {
                return Ok(());
            }
            seen.push(node.id.clone());

            write!(
                f,
                "{:indent$}{} [{}] ({}, {})",
                "",
                node.label,
                node.id,
                node.position.x(),
                node.position.y(),
                indent = depth * 2
            )?;
            if let NodeKind::Home { sections } = &node.kind {
                write!(f, " sections: {}", sections.join(", "))?;
            }
            writeln!(f)?;

            for edge in view.edges.iter().filter(|edge| *edge.source() == node.id) {
                if let Some(child) = view.node(edge.target().as_str()) {
                    write_node(f, view, child, depth + 1, seen)?;
                }
            }
            Ok(())
        }

        let mut seen = Vec::new();
        let targets: Vec<&PageId> = self.edges.iter().map(Edge::target).collect();
        for node in self.nodes.iter().filter(|node| !targets.contains(&&node.id)) {
            write_node(f, self, node, 0, &mut seen)?;
        }
        // Pages reachable only through a parent cycle.
        for node in &self.nodes {
            write_node(f, self, node, 0, &mut seen)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pagetree_core::page::PageNode;

    use super::*;

    #[test]
    fn test_project_default_document() {
        let view = DiagramView::project(&Document::default(), LayoutDirection::TopToBottom);
        assert_eq!(view.nodes().len(), 12);
        assert_eq!(view.edges().len(), 11);

        let home = view.home().unwrap();
        assert_eq!(home.id().as_str(), "home");
        assert_eq!(
            home.kind(),
            &NodeKind::Home {
                sections: vec![
                    "Hero".to_string(),
                    "Features".to_string(),
                    "Testimonials".to_string(),
                    "CTA".to_string(),
                    "Footer".to_string(),
                ]
            }
        );
        assert_eq!(view.node("blog").map(ViewNode::kind), Some(&NodeKind::Page));
    }

    #[test]
    fn test_view_serializes_kind_inline() {
        let document = Document::new(
            vec![PageNode::root("home", "Home")],
            vec!["Hero".to_string()],
        );
        let json = serde_json::to_value(DiagramView::project(&document, LayoutDirection::TopToBottom)).unwrap();
        assert_eq!(json["nodes"][0]["type"], "home");
        assert_eq!(json["nodes"][0]["sections"][0], "Hero");
        assert_eq!(json["edges"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn test_handles_follow_direction() {
        let document = Document::default();

        let view = DiagramView::project(&document, LayoutDirection::TopToBottom);
        for node in view.nodes() {
            assert_eq!(node.source_position(), HandleSide::Bottom);
            assert_eq!(node.target_position(), HandleSide::Top);
        }

        let view = DiagramView::project(&document, LayoutDirection::LeftToRight);
        for node in view.nodes() {
            assert_eq!(node.source_position(), HandleSide::Right);
            assert_eq!(node.target_position(), HandleSide::Left);
        }

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["nodes"][0]["sourcePosition"], "right");
        assert_eq!(json["nodes"][0]["targetPosition"], "left");
    }

    #[test]
    fn test_outline_nests_children() {
        let document = Document::new(
            vec![
                PageNode::root("home", "Home"),
                PageNode::child("blog", "Blog", "home", 2),
                PageNode::child("post1", "Post", "blog", 3),
            ],
            Vec::new(),
        );
        let outline = DiagramView::project(&document, LayoutDirection::TopToBottom).to_string();
        let lines: Vec<&str> = outline.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Home [home]"));
        assert!(lines[1].starts_with("  Blog [blog]"));
        assert!(lines[2].starts_with("    Post [post1]"));
    }
}
