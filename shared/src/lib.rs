use serde::{Deserialize, Serialize};

pub mod crop;
pub mod debounce;
pub mod endpoint;
pub mod labels;
pub mod panel;
pub mod raster;
pub mod session;

/// Side length of the square image the classifier expects.
pub const CLASSIFIER_INPUT_SIZE: u32 = 224;

/// Species lookup metadata attached to a prediction by the classifier.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EbirdInfo {
    #[serde(default)]
    pub com_name: Option<String>,
    #[serde(default)]
    pub sci_name: Option<String>,
    #[serde(default)]
    pub family_com_name: Option<String>,
    #[serde(default)]
    pub family_sci_name: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub species_code: Option<String>,
}

impl EbirdInfo {
    pub fn is_empty(&self) -> bool {
        self == &EbirdInfo::default()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Prediction {
    #[serde(rename = "class")]
    pub label: String,
    #[serde(default)]
    pub confidence: Option<f32>,
    #[serde(default)]
    pub index: Option<i64>,
    #[serde(default)]
    pub ebird_info: Option<EbirdInfo>,
}

impl Prediction {
    /// The classifier answers with index -1 when its confidence is under threshold.
    pub fn is_unidentified(&self) -> bool {
        self.index == Some(-1)
    }

    /// Lookup metadata, treating an empty object the same as a missing one.
    pub fn lookup(&self) -> Option<&EbirdInfo> {
        self.ebird_info.as_ref().filter(|info| !info.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifyFailure {
    #[error("network error: {0}")]
    Network(String),
    #[error("classifier returned status {0}")]
    Status(u16),
    #[error("failed to parse response: {0}")]
    Decode(String),
    #[error("failed to prepare image: {0}")]
    Raster(String),
}

pub type Outcome = Result<Prediction, ClassifyFailure>;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_path: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_classifier_response() {
        let body = r#"{
            "class": "001.Furnarius_rufus_cristatus_hembra",
            "index": 0,
            "confidence": 0.93,
            "ebird_info": {
                "comName": "Rufous Hornero",
                "sciName": "Furnarius rufus",
                "familyComName": "Ovenbirds and Woodcreepers",
                "familySciName": "Furnariidae",
                "order": "Passeriformes",
                "category": "species",
                "speciesCode": "rufhor2"
            }
        }"#;

        let prediction: Prediction = serde_json::from_str(body).unwrap();
        assert_eq!(prediction.label, "001.Furnarius_rufus_cristatus_hembra");
        assert_eq!(prediction.confidence, Some(0.93));
        assert!(!prediction.is_unidentified());
        let info = prediction.lookup().unwrap();
        assert_eq!(info.com_name.as_deref(), Some("Rufous Hornero"));
        assert_eq!(info.species_code.as_deref(), Some("rufhor2"));
    }

    #[test]
    fn minimal_response_only_needs_class() {
        let prediction: Prediction = serde_json::from_str(r#"{"class":"x"}"#).unwrap();
        assert_eq!(prediction.confidence, None);
        assert_eq!(prediction.lookup(), None);
    }

    #[test]
    fn empty_or_null_lookup_counts_as_missing() {
        let empty: Prediction =
            serde_json::from_str(r#"{"class":"a_b_c","ebird_info":{}}"#).unwrap();
        assert!(empty.ebird_info.is_some());
        assert_eq!(empty.lookup(), None);

        let null: Prediction =
            serde_json::from_str(r#"{"class":"a_b_c","ebird_info":null}"#).unwrap();
        assert_eq!(null.lookup(), None);
    }

    #[test]
    fn below_threshold_answer_is_unidentified() {
        let prediction: Prediction = serde_json::from_str(
            r#"{"class":"no se identifica ave","index":-1,"confidence":0.31,"ebird_info":null}"#,
        )
        .unwrap();
        assert!(prediction.is_unidentified());
    }

    #[test]
    fn upload_response_uses_camel_case() {
        let json = serde_json::to_string(&UploadResponse {
            file_path: "/uploads/a.png".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"filePath":"/uploads/a.png"}"#);
    }
}
