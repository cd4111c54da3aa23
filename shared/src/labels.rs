//! Display strings derived from raw classifier labels.
//!
//! Labels look like `001.Furnarius_rufus_cristatus_hembra`: a numeric class
//! prefix, common-name tokens, the two scientific-name tokens and an optional
//! sex marker, all joined by underscores.

use std::str::FromStr;

use derive_more::Display;
use strum_macros::EnumString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
pub enum SexMarker {
    #[strum(serialize = "macho")]
    #[display(fmt = "Macho")]
    Macho,
    #[strum(serialize = "hembra")]
    #[display(fmt = "Hembra")]
    Hembra,
}

impl SexMarker {
    /// Sex marker carried by the last underscore-separated token, if any.
    pub fn of_label(label: &str) -> Option<Self> {
        label.rsplit('_').next().and_then(|last| Self::from_str(last).ok())
    }
}

/// Human-readable common name for a class label.
///
/// Labels with fewer than three name tokens yield an empty string.
pub fn common_name(label: &str) -> String {
    let name = strip_class_prefix(label);
    let mut parts: Vec<&str> = name.split('_').collect();
    if parts.last().is_some_and(|last| SexMarker::from_str(last).is_ok()) {
        parts.pop();
    }
    let keep = parts.len().saturating_sub(2);
    title_case(&parts[..keep].join(" "))
}

/// `Macho`/`Hembra` when the label ends in a sex marker, empty otherwise.
pub fn sex_label(label: &str) -> String {
    SexMarker::of_label(label)
        .map(|marker| marker.to_string())
        .unwrap_or_default()
}

fn strip_class_prefix(label: &str) -> &str {
    let digits = label.len() - label.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    match label[digits..].strip_prefix('.') {
        Some(rest) if digits > 0 => rest,
        _ => label,
    }
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        let is_word = c.is_alphanumeric() || c == '_';
        if is_word && at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !is_word;
    }
    out
}
