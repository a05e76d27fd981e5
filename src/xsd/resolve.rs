//! Top-level element resolution
//!
//! After lowering, every recorded element tag becomes a top-level
//! `<xsd:element>` declaration. A tag referring to several distinct types is
//! disambiguated by walking the captured prefix chains with an ascending
//! index until all candidate names differ; each chain entry concatenates one
//! more ancestor, so conflicting uses separate once enough ancestors are in
//! play.

use crate::document::Element;
use crate::error::{Error, Result};
use crate::xsd::builder::XsdBuilder;
use crate::xsd::lower::{title_case, RecordedElement};

/// Emit top-level element declarations for the recorded element table
///
/// Returns the declarations in resolver iteration order together with the
/// final name of the top-level element `top_name` (which may itself have
/// been prefixed by disambiguation).
pub fn resolve_elements(
    recorded: &[RecordedElement],
    top_name: &str,
) -> Result<(Vec<Element>, String)> {
    let mut elements = Vec::new();
    let mut root_tag = top_name.to_string();

    for (tag, entries) in group_by_tag(recorded) {
        let names = disambiguate(tag, &entries)?;

        for (entry, name) in entries.iter().zip(&names) {
            elements.push(XsdBuilder::element(
                "element",
                &[("name", name), ("type", &entry.type_name)],
            ));

            if entry.tag == top_name && entry.prefix_chain.is_empty() {
                root_tag = name.clone();
            }
        }
    }

    Ok((elements, root_tag))
}

/// Group entries by tag, preserving first-appearance order
fn group_by_tag(recorded: &[RecordedElement]) -> Vec<(&str, Vec<&RecordedElement>)> {
    let mut groups: Vec<(&str, Vec<&RecordedElement>)> = Vec::new();
    for entry in recorded {
        match groups.iter_mut().find(|(tag, _)| *tag == entry.tag) {
            Some((_, entries)) => entries.push(entry),
            None => groups.push((entry.tag.as_str(), vec![entry])),
        }
    }
    groups
}

/// Compute distinct element names for all uses of one tag
fn disambiguate(tag: &str, entries: &[&RecordedElement]) -> Result<Vec<String>> {
    if entries.len() == 1 {
        return Ok(vec![tag.to_string()]);
    }

    let longest_chain = entries
        .iter()
        .map(|e| e.prefix_chain.len())
        .max()
        .unwrap_or(0);

    for i in 0..=longest_chain {
        let candidates: Vec<String> = entries
            .iter()
            .map(|entry| candidate_name(tag, &entry.prefix_chain, i))
            .collect();

        if all_distinct(&candidates) {
            return Ok(candidates);
        }
    }

    Err(Error::Internal(format!(
        "could not disambiguate element name '{}'",
        tag
    )))
}

/// Candidate name for one entry at disambiguation depth `i`
///
/// Past the end of a chain the last entry keeps being used; an empty chain
/// falls back to the bare tag.
fn candidate_name(tag: &str, chain: &[String], i: usize) -> String {
    match chain.get(i).or_else(|| chain.last()) {
        Some(prefix) => format!("{}{}", prefix, title_case(tag)),
        None => tag.to_string(),
    }
}

fn all_distinct(names: &[String]) -> bool {
    names
        .iter()
        .all(|n| names.iter().filter(|m| *m == n).count() == 1)
}
