//! Report export encoder
//!
//! Wraps an [`AnalyticsReport`] in a versioned envelope with producer metadata
//! for JSON download.

use crate::error::AnalyticsError;
use crate::types::AnalyticsReport;
use crate::{ENGINE_VERSION, PRODUCER_NAME};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current export envelope version
pub const REPORT_VERSION: &str = "1.0.0";

/// Producer metadata embedded in every export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Exported analytics payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportExport {
    pub report_version: String,
    pub producer: ReportProducer,
    pub user_id: String,
    pub generated_at_utc: String,
    pub report: AnalyticsReport,
}

/// Encoder for report exports
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Wrap a report in the export envelope
    pub fn encode(&self, user_id: &str, report: AnalyticsReport) -> ReportExport {
        ReportExport {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: ENGINE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            user_id: user_id.to_string(),
            generated_at_utc: Utc::now().to_rfc3339(),
            report,
        }
    }

    /// Encode to a pretty-printed JSON string
    pub fn encode_to_json(
        &self,
        user_id: &str,
        report: AnalyticsReport,
    ) -> Result<String, AnalyticsError> {
        let export = self.encode(user_id, report);
        serde_json::to_string_pretty(&export).map_err(AnalyticsError::JsonError)
    }
}
