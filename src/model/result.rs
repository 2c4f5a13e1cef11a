//! Request and result types of the analysis pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// What to do with the extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    Translate,
    Summarize,
}

impl FromStr for AnalysisType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "translate" => Ok(AnalysisType::Translate),
            "summarize" => Ok(AnalysisType::Summarize),
            other => Err(Error::InvalidRequest(format!(
                "unknown analysis type: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisType::Translate => write!(f, "translate"),
            AnalysisType::Summarize => write!(f, "summarize"),
        }
    }
}

/// Requested summary size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl FromStr for SummaryLength {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(SummaryLength::Short),
            "medium" => Ok(SummaryLength::Medium),
            "long" => Ok(SummaryLength::Long),
            other => Err(Error::InvalidRequest(format!(
                "unknown summary length: {}",
                other
            ))),
        }
    }
}

/// Parameters of one `analyze` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub analysis_type: AnalysisType,
    #[serde(default)]
    pub target_language: Option<String>,
    #[serde(default)]
    pub summary_length: Option<SummaryLength>,
}

impl AnalysisRequest {
    /// Translate into `target_language`.
    pub fn translate(target_language: impl Into<String>) -> Self {
        Self {
            analysis_type: AnalysisType::Translate,
            target_language: Some(target_language.into()),
            summary_length: None,
        }
    }

    /// Summarize with the given length.
    pub fn summarize(length: SummaryLength) -> Self {
        Self {
            analysis_type: AnalysisType::Summarize,
            target_language: None,
            summary_length: Some(length),
        }
    }
}

/// Final output handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub analysis_type: AnalysisType,
    pub source_language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
    /// Normalized text extracted from the document
    pub original_text: String,
    pub result_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analysis_type() {
        assert_eq!("Translate".parse::<AnalysisType>().unwrap(), AnalysisType::Translate);
        assert_eq!(" summarize ".parse::<AnalysisType>().unwrap(), AnalysisType::Summarize);
        assert!("ocr".parse::<AnalysisType>().is_err());
    }

    #[test]
    fn test_parse_summary_length() {
        assert_eq!("SHORT".parse::<SummaryLength>().unwrap(), SummaryLength::Short);
        assert_eq!(SummaryLength::default(), SummaryLength::Medium);
        assert!("tiny".parse::<SummaryLength>().is_err());
    }

    #[test]
    fn test_result_json_omits_missing_target() {
        let result = AnalysisResult {
            analysis_type: AnalysisType::Summarize,
            source_language: "en".into(),
            target_language: None,
            original_text: "A. B.".into(),
            result_text: "A.".into(),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"analysis_type\":\"summarize\""));
        assert!(!json.contains("target_language"));
    }
}
