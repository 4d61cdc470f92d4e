//! Content visibility synchronization.
//!
//! Only blocks whose condition value changed are touched. A block in the
//! document without a condition is a defect in the page data; a condition
//! without a block is normal (the block was pruned from this view).

use std::collections::BTreeMap;

use super::dom::{Document, NodeId};
use crate::core::config::ControllerConfig;
use crate::core::error::{PrefsError, Result};
use crate::core::types::ContentRef;
use crate::expression::ContentCondition;

/// Old and new value of one condition across a re-evaluation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueChange {
    pub content_ref: ContentRef,
    pub previous: bool,
    pub current: bool,
}

impl ValueChange {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

/// Index the attached content blocks by content reference
pub fn content_blocks(
    doc: &Document,
    config: &ControllerConfig,
) -> Result<BTreeMap<ContentRef, NodeId>> {
    let mut blocks = BTreeMap::new();
    for node in doc.elements_with_attr(&config.content_ref_attr) {
        let content_ref = ContentRef::new(doc.attr(node, &config.content_ref_attr).unwrap_or_default());
        if blocks.insert(content_ref.clone(), node).is_some() {
            return Err(PrefsError::DuplicateContentBlock(content_ref));
        }
    }
    Ok(blocks)
}

/// Every block must have a condition
pub fn check_blocks(
    blocks: &BTreeMap<ContentRef, NodeId>,
    conditions: &BTreeMap<ContentRef, ContentCondition>,
) -> Result<()> {
    match blocks.keys().find(|r| !conditions.contains_key(*r)) {
        Some(orphan) => Err(PrefsError::MissingCondition(orphan.clone())),
        None => Ok(()),
    }
}

/// Blocks to update and their new visibility, for changed values only
pub fn plan_visibility(
    changes: &[ValueChange],
    blocks: &BTreeMap<ContentRef, NodeId>,
) -> Vec<(NodeId, bool)> {
    changes
        .iter()
        .filter(|c| c.changed())
        .filter_map(|c| blocks.get(&c.content_ref).map(|&node| (node, c.current)))
        .collect()
}

/// Toggle the hidden class on blocks whose condition changed.
///
/// Returns the number of blocks toggled.
pub fn sync_visibility(
    doc: &mut Document,
    config: &ControllerConfig,
    conditions: &BTreeMap<ContentRef, ContentCondition>,
    changes: &[ValueChange],
) -> Result<usize> {
    let blocks = content_blocks(doc, config)?;
    check_blocks(&blocks, conditions)?;

    let plan = plan_visibility(changes, &blocks);
    for &(node, visible) in &plan {
        doc.set_class(node, &config.hidden_class, !visible);
    }
    tracing::debug!("Toggled {} content blocks", plan.len());
    Ok(plan.len())
}

/// Set every block to its condition's current value.
///
/// Used once at initialize, when there is no previous value to diff.
pub fn sync_all(
    doc: &mut Document,
    config: &ControllerConfig,
    conditions: &BTreeMap<ContentRef, ContentCondition>,
) -> Result<usize> {
    let blocks = content_blocks(doc, config)?;
    check_blocks(&blocks, conditions)?;

    let mut toggled = 0;
    for (content_ref, &node) in &blocks {
        let visible = conditions[content_ref].value;
        if doc.set_class(node, &config.hidden_class, !visible) {
            toggled += 1;
        }
    }
    Ok(toggled)
}
