//! Parsing of the model's JSON reply.
//!
//! Models wrap JSON in code fences or add a sentence before it often enough
//! that the object is cut out of the reply before deserializing.

use crate::types::Citation;
use serde::Deserialize;

/// Summary and claimed citations, not yet checked against the search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelOutput {
    pub summary: String,
    pub citations: Vec<Citation>,
}

#[derive(Deserialize)]
struct RawOutput {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    citations: Vec<RawCitation>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCitation {
    Url(String),
    Detailed {
        url: String,
        #[serde(default)]
        title: Option<String>,
    },
}

impl From<RawCitation> for Citation {
    fn from(raw: RawCitation) -> Self {
        match raw {
            RawCitation::Url(url) => Citation { url, title: None },
            RawCitation::Detailed { url, title } => Citation {
                url,
                title: title
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty()),
            },
        }
    }
}

/// Cut the outermost `{ ... }` span out of a reply.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

/// Parse a model reply. The error string describes what was wrong and is
/// shown to the model in the repair request.
pub fn parse_model_output(raw: &str) -> Result<ModelOutput, String> {
    let json = extract_json_object(raw).ok_or_else(|| "reply contained no JSON object".to_string())?;

    let parsed: RawOutput =
        serde_json::from_str(json).map_err(|e| format!("reply was not valid JSON: {}", e))?;

    let summary = parsed.summary.trim().to_string();
    if summary.is_empty() {
        return Err("the \"summary\" field was missing or empty".to_string());
    }

    Ok(ModelOutput {
        summary,
        citations: parsed.citations.into_iter().map(Citation::from).collect(),
    })
}
