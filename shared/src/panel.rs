use crate::labels::{common_name, sex_label};
use crate::session::Phase;
use crate::{ClassifyFailure, EbirdInfo, Outcome, Prediction};

/// What the result panel shows for the current session.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel<'a> {
    Hidden,
    Loading { caption: &'static str },
    Failed { reason: String },
    Unidentified { confidence: Option<String> },
    Identified(SpeciesView<'a>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesView<'a> {
    pub name: String,
    pub sex: Option<String>,
    pub confidence: Option<String>,
    /// `None` renders the "not found" notice.
    pub lookup: Option<&'a EbirdInfo>,
}

impl<'a> Panel<'a> {
    pub fn build(phase: Phase, result: Option<&'a Outcome>) -> Self {
        if let Some(caption) = loading_caption(phase) {
            return Panel::Loading { caption };
        }
        match result {
            None => Panel::Hidden,
            Some(Err(failure)) => Panel::Failed {
                reason: failure_reason(failure),
            },
            Some(Ok(prediction)) if prediction.is_unidentified() => Panel::Unidentified {
                confidence: prediction.confidence.map(format_confidence),
            },
            Some(Ok(prediction)) => Panel::Identified(SpeciesView::of(prediction)),
        }
    }
}

impl<'a> SpeciesView<'a> {
    pub fn of(prediction: &'a Prediction) -> Self {
        let sex = sex_label(&prediction.label);
        Self {
            name: common_name(&prediction.label),
            sex: (!sex.is_empty()).then_some(sex),
            confidence: prediction.confidence.map(format_confidence),
            lookup: prediction.lookup(),
        }
    }
}

/// Caption shown above the crop surface; failures read as "Error".
pub fn caption(result: Option<&Outcome>) -> (String, Option<String>) {
    match result {
        None => (String::new(), None),
        Some(Err(_)) => ("Error".to_string(), None),
        Some(Ok(prediction)) => {
            let view = SpeciesView::of(prediction);
            (view.name, view.sex)
        }
    }
}

/// Text under the spinner while a crop is being handled.
pub fn loading_caption(phase: Phase) -> Option<&'static str> {
    match phase {
        Phase::Rasterizing => Some("Preparing image..."),
        Phase::Submitting => Some("Classifying..."),
        _ => None,
    }
}

pub fn format_confidence(confidence: f32) -> String {
    format!("{:.2}%", confidence * 100.0)
}

fn failure_reason(failure: &ClassifyFailure) -> String {
    match failure {
        ClassifyFailure::Network(_) => "The classifier could not be reached.".to_string(),
        ClassifyFailure::Status(code) => format!("The classifier answered with status {}.", code),
        ClassifyFailure::Decode(_) => "The classifier sent an unreadable answer.".to_string(),
        ClassifyFailure::Raster(_) => "The selected image could not be prepared.".to_string(),
    }
}
