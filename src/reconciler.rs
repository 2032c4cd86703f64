//! Patch a rendered container against freshly generated markup.
//!
//! The new markup is parsed into a detached tree. Both element lists are
//! flattened in document order and compared pairwise by index:
//!
//! ```text
//!     for i in 0..min(len(new), len(cur)):
//!         if new[i] deep-equals cur[i]: continue
//!         if new[i] has no children:
//!             cur[i].text_content = ""   (if cur[i] has any)
//!         else if new[i].first_child is non-blank text:
//!             cur[i].text_content = new[i].text_content
//!         if attrs(new[i]) != attrs(cur[i]):
//!             for (k, v) in attrs(new[i]): cur[i].set(k, v)
//! ```
//!
//! Alignment is by position only, not by key. Inserting or removing an item
//! in the middle of a list shifts every later comparison, and elements past
//! the shorter list are never visited. Attributes that only exist on the
//! live node are kept. Anything not patched keeps its transient state.

use crate::dom::{NodeId, NodeKind, Tree, same_attributes};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Aligned element pairs compared.
    pub visited: usize,
    pub text_updates: usize,
    pub attribute_updates: usize,
    /// Elements left alone because one list was longer than the other.
    pub unvisited: usize,
}

impl ReconcileReport {
    pub fn mutations(&self) -> usize {
        self.text_updates + self.attribute_updates
    }
}

/// Bring `live` in line with `markup` without rebuilding it.
pub fn reconcile(live: &mut Tree, markup: &str) -> ReconcileReport {
    let fresh = Tree::parse_fragment(markup);
    reconcile_tree(live, &fresh)
}

/// Same as [`reconcile`] with an already parsed tree.
pub fn reconcile_tree(live: &mut Tree, fresh: &Tree) -> ReconcileReport {
    let new_elements = fresh.descendant_elements(fresh.root());
    let cur_elements = live.descendant_elements(live.root());

    let mut report = ReconcileReport {
        unvisited: new_elements.len().abs_diff(cur_elements.len()),
        ..ReconcileReport::default()
    };

    for (&new_el, &cur_el) in new_elements.iter().zip(&cur_elements) {
        report.visited += 1;
        if fresh.is_equal_node(new_el, live, cur_el) {
            continue;
        }

        if fresh.first_child(new_el).is_none() {
            // the new element is empty; drop whatever the live one holds
            if live.first_child(cur_el).is_some() {
                live.set_text_content(cur_el, "");
                report.text_updates += 1;
            }
        } else if starts_with_text(fresh, new_el) {
            live.set_text_content(cur_el, &fresh.text_content(new_el));
            report.text_updates += 1;
        }

        let new_attrs = fresh.attributes(new_el);
        if !same_attributes(new_attrs, live.attributes(cur_el)) {
            for (name, value) in new_attrs {
                live.set_attribute(cur_el, name, value);
            }
            report.attribute_updates += 1;
        }
    }

    if report.unvisited > 0 {
        log::debug!(
            "reconcile: element count changed ({} -> {}), {} element(s) left as is",
            cur_elements.len(),
            new_elements.len(),
            report.unvisited
        );
    }
    log::debug!(
        "reconcile: {} pair(s), {} text and {} attribute update(s)",
        report.visited,
        report.text_updates,
        report.attribute_updates
    );
    report
}

/// The first child is a text node with something other than whitespace.
fn starts_with_text(tree: &Tree, id: NodeId) -> bool {
    tree.first_child(id)
        .is_some_and(|child| matches!(tree.node(child).kind(), NodeKind::Text(t) if !t.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_text() {
        let tree = Tree::parse_fragment("<p>hi</p><p>  <b>x</b></p><p></p>");
        let els = tree.descendant_elements(tree.root());
        assert!(starts_with_text(&tree, els[0]));
        assert!(!starts_with_text(&tree, els[1]));
        assert!(!starts_with_text(&tree, els[3]));
    }
}
