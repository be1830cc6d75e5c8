//! Reading stored documents, including older layouts.
//!
//! Three stored shapes are accepted:
//!
//! - the current `{ "nodes": [...], "sections": [...] }`,
//! - `{ "pages": [{ "id", "label", "parent", "level" }], "homeSections": [...] }`,
//! - `{ "flowData": { "nodes": [{ "id", "data": { "label" }, "position" }],
//!   "edges": [{ "source", "target" }] }, "homeSections": [...] }`.
//!
//! Older shapes are converted to a [`Document`]. Missing levels are derived
//! from the parent links; missing positions stay at the origin.

use std::collections::HashMap;

use log::info;
use serde::Deserialize;
use serde_json::Value;

use pagetree_core::{document::Document, geometry::Point, identifier::PageId, page::PageNode};

use crate::structure::HierarchyGraph;

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredDocument {
    Current(Document),
    Pages(PagesDocument),
    Flow(FlowDocument),
}

#[derive(Deserialize)]
struct PagesDocument {
    pages: Vec<StoredPage>,
    #[serde(rename = "homeSections", default)]
    home_sections: Vec<String>,
}

#[derive(Deserialize)]
struct StoredPage {
    id: String,
    label: String,
    #[serde(default)]
    parent: Option<String>,
    #[serde(default)]
    level: Option<u32>,
    #[serde(default)]
    position: Option<Point>,
}

#[derive(Deserialize)]
struct FlowDocument {
    #[serde(rename = "flowData")]
    flow_data: FlowData,
    #[serde(rename = "homeSections", default)]
    home_sections: Vec<String>,
}

#[derive(Deserialize)]
struct FlowData {
    nodes: Vec<FlowNode>,
    #[serde(default)]
    edges: Vec<FlowEdge>,
}

#[derive(Deserialize)]
struct FlowNode {
    id: String,
    #[serde(default)]
    data: FlowNodeData,
    #[serde(default)]
    position: Option<Point>,
}

/// Node payload; `label` was sometimes a rendered element rather than text.
#[derive(Default, Deserialize)]
struct FlowNodeData {
    #[serde(default)]
    label: Option<Value>,
    #[serde(default)]
    sections: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct FlowEdge {
    source: String,
    target: String,
}

/// Parses stored text in any accepted shape.
///
/// # Errors
///
/// Returns the JSON error when the text matches none of the shapes.
pub(super) fn parse(text: &str) -> Result<Document, serde_json::Error> {
    Ok(match serde_json::from_str::<StoredDocument>(text)? {
        StoredDocument::Current(document) => document,
        StoredDocument::Pages(stored) => {
            info!(pages = stored.pages.len(); "Migrating stored document from page list");
            from_pages(stored)
        }
        StoredDocument::Flow(stored) => {
            info!(nodes = stored.flow_data.nodes.len(); "Migrating stored document from diagram data");
            from_flow(stored)
        }
    })
}

fn from_pages(stored: PagesDocument) -> Document {
    let nodes = stored
        .pages
        .iter()
        .map(|page| {
            PageNode::new(
                page.id.as_str(),
                page.label.as_str(),
                page.parent.as_deref().map(PageId::from),
                page.level.unwrap_or(0),
                page.position.unwrap_or_default(),
            )
        })
        .collect();
    let explicit: HashMap<&str, u32> = stored
        .pages
        .iter()
        .filter_map(|page| Some((page.id.as_str(), page.level?)))
        .collect();

    with_levels(nodes, &explicit, stored.home_sections)
}

fn from_flow(stored: FlowDocument) -> Document {
    let FlowDocument {
        flow_data,
        mut home_sections,
    } = stored;

    // First incoming edge wins; later ones cannot be expressed as a tree.
    let mut parents: HashMap<&str, &str> = HashMap::new();
    for edge in &flow_data.edges {
        parents
            .entry(edge.target.as_str())
            .or_insert(edge.source.as_str());
    }

    if home_sections.is_empty() {
        if let Some(sections) = flow_data
            .nodes
            .iter()
            .find_map(|node| node.data.sections.clone())
        {
            home_sections = sections;
        }
    }

    let nodes = flow_data
        .nodes
        .iter()
        .map(|node| {
            let label = node
                .data
                .label
                .as_ref()
                .and_then(Value::as_str)
                .unwrap_or(node.id.as_str());
            PageNode::new(
                node.id.as_str(),
                label,
                parents.get(node.id.as_str()).map(|&parent| PageId::from(parent)),
                0,
                node.position.unwrap_or_default(),
            )
        })
        .collect();

    with_levels(nodes, &HashMap::new(), home_sections)
}

/// Fills levels not given in `explicit` from the parent links.
fn with_levels(
    nodes: Vec<PageNode>,
    explicit: &HashMap<&str, u32>,
    sections: Vec<String>,
) -> Document {
    let draft = Document::new(nodes, Vec::new());
    let derived = HierarchyGraph::from_document(&draft).derived_levels();

    let nodes = draft
        .nodes()
        .iter()
        .map(|node| {
            let level = explicit
                .get(node.id().as_str())
                .or_else(|| derived.get(node.id()))
                .copied()
                .unwrap_or(1);
            PageNode::new(
                node.id().clone(),
                node.label(),
                node.parent_id().cloned(),
                level,
                node.position(),
            )
        })
        .collect();
    Document::new(nodes, sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_current_shape() {
        let document = Document::default();
        let text = serde_json::to_string(&document).unwrap();
        assert_eq!(parse(&text).unwrap(), document);
    }

    #[test]
    fn test_parse_page_list_shape() {
        let text = r#"{
            "pages": [
                {"id": "home", "label": "Home", "parent": null, "level": 1},
                {"id": "blog", "label": "Blog", "parent": "home", "level": 2},
                {"id": "post1", "label": "Blog Post 1", "parent": "blog"}
            ],
            "homeSections": ["Hero", "Footer"]
        }"#;
        let document = parse(text).unwrap();

        assert_eq!(document.nodes().len(), 3);
        assert_eq!(document.sections(), ["Hero", "Footer"]);
        let post = document.node("post1").unwrap();
        assert_eq!(post.parent_id().map(PageId::as_str), Some("blog"));
        assert_eq!(post.level(), 3);
        assert!(document.is_unpositioned());
    }

    #[test]
    fn test_parse_diagram_shape() {
        let text = r#"{
            "flowData": {
                "nodes": [
                    {"id": "home", "data": {"label": "Home", "sections": ["Hero", "CTA"]},
                     "position": {"x": 400, "y": 50}},
                    {"id": "about", "data": {"label": {"type": "div"}},
                     "position": {"x": 100, "y": 200}}
                ],
                "edges": [{"id": "home-about", "source": "home", "target": "about"}]
            }
        }"#;
        let document = parse(text).unwrap();

        assert_eq!(document.sections(), ["Hero", "CTA"]);
        let about = document.node("about").unwrap();
        assert_eq!(about.label(), "about");
        assert_eq!(about.parent_id().map(PageId::as_str), Some("home"));
        assert_eq!(about.level(), 2);
        assert_eq!(about.position(), Point::new(100.0, 200.0));
        assert_eq!(document.node("home").map(PageNode::level), Some(1));
    }

    #[test]
    fn test_parse_rejects_unknown_shape() {
        assert!(parse(r#"{"something": []}"#).is_err());
        assert!(parse("not json").is_err());
    }
}
