//! Structural checks on a document.
//!
//! [`check`] never changes anything; it lists the places where a document
//! strays from a well-formed hierarchy. Editing operations tolerate all of
//! these, so the report is informational.

use std::{collections::HashSet, fmt};

use pagetree_core::{document::Document, identifier::PageId};

use crate::structure::HierarchyGraph;

/// A page whose stored level differs from its depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelMismatch {
    pub id: PageId,
    pub stored: u32,
    pub derived: u32,
}

/// Findings of [`check`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureReport {
    /// `(page, parent)` pairs whose parent does not exist.
    pub dangling_parents: Vec<(PageId, PageId)>,
    /// Pages whose parent links loop, one entry per loop.
    pub cycles: Vec<Vec<PageId>>,
    /// Ids used by more than one page.
    pub duplicate_ids: Vec<PageId>,
    /// Section names listed more than once.
    pub duplicate_sections: Vec<String>,
    pub level_mismatches: Vec<LevelMismatch>,
}

impl StructureReport {
    /// Returns true when nothing was found.
    pub fn is_clean(&self) -> bool {
        self.dangling_parents.is_empty()
            && self.cycles.is_empty()
            && self.duplicate_ids.is_empty()
            && self.duplicate_sections.is_empty()
            && self.level_mismatches.is_empty()
    }

    /// Number of findings.
    pub fn issue_count(&self) -> usize {
        self.dangling_parents.len()
            + self.cycles.len()
            + self.duplicate_ids.len()
            + self.duplicate_sections.len()
            + self.level_mismatches.len()
    }
}

impl fmt::Display for StructureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return writeln!(f, "No structural issues found");
        }
        for (id, parent) in &self.dangling_parents {
            writeln!(f, "page {id}: parent {parent} does not exist")?;
        }
        for cycle in &self.cycles {
            let ids: Vec<&str> = cycle.iter().map(PageId::as_str).collect();
            writeln!(f, "parent cycle: {}", ids.join(" -> "))?;
        }
        for id in &self.duplicate_ids {
            writeln!(f, "duplicate page id: {id}")?;
        }
        for section in &self.duplicate_sections {
            writeln!(f, "duplicate section: {section}")?;
        }
        for mismatch in &self.level_mismatches {
            writeln!(
                f,
                "page {}: level {} but depth {}",
                mismatch.id, mismatch.stored, mismatch.derived
            )?;
        }
        Ok(())
    }
}

fn duplicates<'a, T, I>(items: I) -> Vec<T>
where
    T: Clone + Eq + std::hash::Hash + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut found = Vec::new();
    for item in items {
        if !seen.insert(item) && reported.insert(item) {
            found.push(item.clone());
        }
    }
    found
}

/// Inspects `document` for structural problems.
pub fn check(document: &Document) -> StructureReport {
    let dangling_parents = document
        .nodes()
        .iter()
        .filter_map(|page| {
            let parent = page.parent_id()?;
            (!document.contains(parent.as_str())).then(|| (page.id().clone(), parent.clone()))
        })
        .collect();

    let graph = HierarchyGraph::from_document(document);
    let derived = graph.derived_levels();
    let level_mismatches = document
        .nodes()
        .iter()
        .filter_map(|page| {
            let &depth = derived.get(page.id())?;
            (depth != page.level()).then(|| LevelMismatch {
                id: page.id().clone(),
                stored: page.level(),
                derived: depth,
            })
        })
        .collect();

    StructureReport {
        dangling_parents,
        cycles: graph.cycles(),
        duplicate_ids: duplicates(document.nodes().iter().map(|page| page.id())),
        duplicate_sections: duplicates(document.sections()),
        level_mismatches,
    }
}

#[cfg(test)]
mod tests {
    use pagetree_core::page::PageNode;

    use super::*;

    #[test]
    fn test_default_document_is_clean() {
        let report = check(&Document::default());
        assert!(report.is_clean(), "{report}");
        assert_eq!(report.issue_count(), 0);
    }

    #[test]
    fn test_reports_every_kind_of_issue() {
        let document = Document::new(
            vec![
                PageNode::root("home", "Home"),
                PageNode::child("blog", "Blog", "home", 3),
                PageNode::child("orphan", "Orphan", "missing", 2),
                PageNode::child("a", "A", "b", 2),
                PageNode::child("b", "B", "a", 2),
                PageNode::root("home", "Home again"),
            ],
            vec!["Hero".to_string(), "CTA".to_string(), "Hero".to_string()],
        );
        let report = check(&document);

        assert_eq!(
            report.dangling_parents,
            vec![(PageId::new("orphan"), PageId::new("missing"))]
        );
        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.duplicate_ids, vec![PageId::new("home")]);
        assert_eq!(report.duplicate_sections, vec!["Hero".to_string()]);
        assert_eq!(
            report.level_mismatches,
            vec![
                LevelMismatch {
                    id: PageId::new("blog"),
                    stored: 3,
                    derived: 2,
                },
                LevelMismatch {
                    id: PageId::new("orphan"),
                    stored: 2,
                    derived: 1,
                },
            ]
        );
        assert_eq!(report.issue_count(), 6);
        assert!(report.to_string().contains("parent cycle"));
    }
}
