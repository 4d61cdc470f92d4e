//! Page controller: owns the selection and conditions for one page.
//!
//! Every selection change runs the same cycle: write the selection, resolve
//! and re-render the chooser (correcting invalidated selections), re-evaluate
//! conditions against the corrected selection, toggle the blocks whose value
//! changed, refresh placeholders, rebuild navigation. The chooser step must
//! run before evaluation so an invalidated selection never drives visibility.

use std::collections::BTreeMap;

use super::chooser::{sync_chooser, HandlerTable};
use super::dom::{Document, NodeId};
use super::manifest::PageData;
use super::navigation::sync_navigation;
use super::placeholders::sync_placeholders;
use super::visibility::{content_blocks, sync_all, sync_visibility, ValueChange};
use crate::core::config::ControllerConfig;
use crate::core::error::{PrefsError, Result};
use crate::core::types::{ContentRef, OptionId, PrefId, SelectionState};
use crate::expression::{decode, ContentCondition};
use crate::preferences::{
    resolve, resolved_selection, validate_dependencies, OptionCatalog, PreferenceDefinition,
    ResolvedPreference,
};

/// What one re-render cycle did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Preferences whose requested selection was replaced by the default
    pub corrected: Vec<PrefId>,
    /// Content references whose condition value changed
    pub changed: Vec<ContentRef>,
    /// Content blocks whose visibility was toggled
    pub toggled: usize,
    /// Headings listed in the rebuilt navigation
    pub nav_items: usize,
}

#[derive(Debug)]
struct PageState {
    definitions: Vec<PreferenceDefinition>,
    catalog: OptionCatalog,
    selection: SelectionState,
    resolved: Vec<ResolvedPreference>,
    conditions: BTreeMap<ContentRef, ContentCondition>,
    handlers: HandlerTable,
}

#[derive(Debug)]
enum ControllerState {
    Uninitialized,
    Ready(PageState),
}

/// Controller for the currently loaded page
#[derive(Debug)]
pub struct PageController {
    config: ControllerConfig,
    document: Document,
    state: ControllerState,
}

impl PageController {
    pub fn new(config: ControllerConfig, document: Document) -> Self {
        Self {
            config,
            document,
            state: ControllerState::Uninitialized,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ControllerState::Ready(_))
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Load page data and bring the chooser and content in line with it.
    ///
    /// Calling this again replaces all previous state. On failure the
    /// controller is left uninitialized, although the document may already
    /// carry part of the new markup.
    pub fn initialize(&mut self, data: &PageData) -> Result<()> {
        self.state = ControllerState::Uninitialized;
        let page = self.load(data)?;
        self.state = ControllerState::Ready(page);
        Ok(())
    }

    fn load(&mut self, data: &PageData) -> Result<PageState> {
        self.config.validate().map_err(PrefsError::InvalidConfig)?;
        validate_dependencies(&data.preferences)?;

        let catalog = OptionCatalog::from_parts(data.options.iter().cloned(), data.option_sets.clone());

        let mut conditions = BTreeMap::new();
        for (content_ref, encoded) in &data.conditions {
            let expr = decode(encoded)?;
            conditions.insert(
                content_ref.clone(),
                ContentCondition::new(content_ref.clone(), expr),
            );
        }

        let resolved = resolve(&data.preferences, &catalog, &data.selection)?;
        let selection = resolved_selection(&resolved);
        let handlers = sync_chooser(&mut self.document, &self.config, &catalog, &resolved)?;

        for condition in conditions.values_mut() {
            *condition = condition.reevaluate(&selection)?;
        }

        let toggled = sync_all(&mut self.document, &self.config, &conditions)?;
        sync_placeholders(&mut self.document, &self.config, &catalog, &selection)?;

        tracing::info!(
            "Initialized page with {} preferences, {} conditions ({} blocks hidden or shown)",
            resolved.len(),
            conditions.len(),
            toggled
        );

        Ok(PageState {
            definitions: data.preferences.clone(),
            catalog,
            selection,
            resolved,
            conditions,
            handlers,
        })
    }

    /// Apply a user's selection and re-render everything that depends on it
    pub fn on_selection_changed(&mut self, pref: &PrefId, option: &OptionId) -> Result<RenderReport> {
        let ControllerState::Ready(page) = &mut self.state else {
            return Err(PrefsError::NotInitialized);
        };
        if !page.definitions.iter().any(|d| d.id == *pref) {
            return Err(PrefsError::UnknownPreference(pref.clone()));
        }

        tracing::debug!("Selection changed: {}={}", pref, option);
        page.selection.insert(pref.clone(), option.clone());

        rerender(page, &mut self.document, &self.config)
    }

    /// Dispatch a click on `target` to the nearest wired option control.
    ///
    /// Returns `Ok(None)` when the click does not land on an option control.
    pub fn handle_click(&mut self, target: NodeId) -> Result<Option<RenderReport>> {
        let ControllerState::Ready(page) = &self.state else {
            return Err(PrefsError::NotInitialized);
        };
        if !self.document.is_element(target) || !self.document.is_attached(target) {
            return Ok(None);
        }

        let handler = std::iter::once(target)
            .chain(self.document.ancestors(target))
            .find_map(|node| page.handlers.get(&node))
            .cloned();

        match handler {
            Some(handler) => self
                .on_selection_changed(&handler.pref, &handler.option)
                .map(Some),
            None => Ok(None),
        }
    }

    /// Build the navigation summary once the page is ready
    pub fn on_page_ready(&mut self) -> Result<usize> {
        if !self.is_ready() {
            return Err(PrefsError::NotInitialized);
        }
        sync_navigation(&mut self.document, &self.config)
    }

    pub fn selection(&self) -> Result<&SelectionState> {
        Ok(&self.page()?.selection)
    }

    pub fn resolved(&self) -> Result<&[ResolvedPreference]> {
        Ok(&self.page()?.resolved)
    }

    /// Current value of the condition for `content_ref`, if there is one
    pub fn condition_value(&self, content_ref: &ContentRef) -> Result<Option<bool>> {
        Ok(self.page()?.conditions.get(content_ref).map(|c| c.value))
    }

    /// Whether the document block for `content_ref` is shown; None if absent
    pub fn is_block_visible(&self, content_ref: &ContentRef) -> Option<bool> {
        let blocks = content_blocks(&self.document, &self.config).ok()?;
        blocks
            .get(content_ref)
            .map(|&node| !self.document.has_class(node, &self.config.hidden_class))
    }

    /// Attached option control for a preference/option pair
    pub fn option_control(&self, pref: &PrefId, option: &OptionId) -> Option<NodeId> {
        let page = self.page().ok()?;
        page.handlers
            .iter()
            .find(|(_, h)| h.pref == *pref && h.option == *option)
            .map(|(&node, _)| node)
    }

    fn page(&self) -> Result<&PageState> {
        match &self.state {
            ControllerState::Ready(page) => Ok(page),
            ControllerState::Uninitialized => Err(PrefsError::NotInitialized),
        }
    }
}

fn rerender(
    page: &mut PageState,
    doc: &mut Document,
    config: &ControllerConfig,
) -> Result<RenderReport> {
    let mut report = RenderReport::default();

    // chooser first: evaluation must only ever see corrected selections
    let resolved = resolve(&page.definitions, &page.catalog, &page.selection)?;
    report.corrected = resolved
        .iter()
        .filter(|p| page.selection.get(&p.id).map_or(false, |s| *s != p.selected))
        .map(|p| p.id.clone())
        .collect();
    page.handlers = sync_chooser(doc, config, &page.catalog, &resolved)?;
    page.selection = resolved_selection(&resolved);
    page.resolved = resolved;
    if !report.corrected.is_empty() {
        tracing::debug!("Corrected selections: {:?}", report.corrected);
    }

    let mut changes = Vec::with_capacity(page.conditions.len());
    let mut updated = BTreeMap::new();
    for (content_ref, condition) in &page.conditions {
        let next = condition.reevaluate(&page.selection)?;
        changes.push(ValueChange {
            content_ref: content_ref.clone(),
            previous: condition.value,
            current: next.value,
        });
        updated.insert(content_ref.clone(), next);
    }
    page.conditions = updated;
    report.changed = changes
        .iter()
        .filter(|c| c.changed())
        .map(|c| c.content_ref.clone())
        .collect();
    tracing::debug!("{} conditions changed value", report.changed.len());

    report.toggled = sync_visibility(doc, config, &page.conditions, &changes)?;
    sync_placeholders(doc, config, &page.catalog, &page.selection)?;
    report.nav_items = sync_navigation(doc, config)?;

    Ok(report)
}
