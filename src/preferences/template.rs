//! `{pref_id}` placeholder interpolation and dependency validation.

use std::collections::{BTreeMap, BTreeSet};

use super::schema::PreferenceDefinition;
use crate::core::error::{PrefsError, Result};
use crate::core::types::{PrefId, SelectionState};

/// Placeholder names in a template, in order of appearance.
///
/// An unclosed `{` is literal text.
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                names.push(&after[..close]);
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    names
}

/// Fill every placeholder in `template` from `resolved`
pub fn interpolate(pref: &PrefId, template: &str, resolved: &SelectionState) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            break;
        };
        let name = &after[..close];
        let value = resolved.get(&PrefId::from(name)).ok_or_else(|| {
            PrefsError::UnresolvedPlaceholder {
                pref: pref.clone(),
                placeholder: name.to_string(),
            }
        })?;
        out.push_str(&rest[..open]);
        out.push_str(value.as_str());
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Preferences a definition's templates read, in order of appearance
pub fn dependencies(def: &PreferenceDefinition) -> Vec<PrefId> {
    let mut deps: Vec<PrefId> = Vec::new();
    let templates = def
        .options
        .templates()
        .into_iter()
        .chain(std::iter::once(def.default.as_str()));
    for template in templates {
        for name in placeholders(template) {
            let dep = PrefId::from(name);
            if !deps.contains(&dep) {
                deps.push(dep);
            }
        }
    }
    deps
}

/// Check that preference ids are unique and every placeholder names a
/// preference declared earlier.
///
/// Cycles are reported first, with the full path; an acyclic reference to
/// a later preference is a forward reference; a name that matches no
/// preference is an unresolved placeholder.
pub fn validate_dependencies(defs: &[PreferenceDefinition]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for def in defs {
        if !seen.insert(&def.id) {
            return Err(PrefsError::DuplicatePreference(def.id.clone()));
        }
    }

    let index: BTreeMap<&PrefId, usize> = defs.iter().enumerate().map(|(i, d)| (&d.id, i)).collect();
    let graph: Vec<Vec<PrefId>> = defs.iter().map(dependencies).collect();

    for (i, deps) in graph.iter().enumerate() {
        for dep in deps {
            if !index.contains_key(dep) {
                return Err(PrefsError::UnresolvedPlaceholder {
                    pref: defs[i].id.clone(),
                    placeholder: dep.to_string(),
                });
            }
        }
    }

    let mut state = vec![Visit::New; defs.len()];
    let mut path = Vec::new();
    for start in 0..defs.len() {
        if let Some(cycle) = find_cycle(start, defs, &graph, &index, &mut state, &mut path) {
            return Err(PrefsError::CyclicPreferences(cycle));
        }
    }

    for (i, deps) in graph.iter().enumerate() {
        for dep in deps {
            if index[dep] >= i {
                return Err(PrefsError::ForwardReference {
                    pref: defs[i].id.clone(),
                    dependency: dep.clone(),
                });
            }
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Active,
    Done,
}

fn find_cycle(
    node: usize,
    defs: &[PreferenceDefinition],
    graph: &[Vec<PrefId>],
    index: &BTreeMap<&PrefId, usize>,
    state: &mut [Visit],
    path: &mut Vec<usize>,
) -> Option<Vec<PrefId>> {
    match state[node] {
        Visit::Done => return None,
        Visit::Active => {
            let start = path.iter().position(|&n| n == node).unwrap_or(0);
            let mut cycle: Vec<PrefId> = path[start..].iter().map(|&n| defs[n].id.clone()).collect();
            cycle.push(defs[node].id.clone());
            return Some(cycle);
        }
        Visit::New => {}
    }

    state[node] = Visit::Active;
    path.push(node);
    for dep in &graph[node] {
        let next = index[dep];
        if let Some(cycle) = find_cycle(next, defs, graph, index, state, path) {
            return Some(cycle);
        }
    }
    path.pop();
    state[node] = Visit::Done;
    None
}
