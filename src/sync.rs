// One-way sync boundary for the external spreadsheet.
//
// The core only promises the payload shape: dataset kind, the full ordered
// detail rows, and the source file's timestamp. The transport behind
// `SheetSync` is a collaborator concern; the bundled implementation writes
// the payload JSON to disk for the sheet-side importer to pick up.
use crate::types::{AnalysisResult, B2bProcessedRow, B2cProcessedRow};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SyncRows<'a> {
    B2c(&'a [B2cProcessedRow]),
    B2b(&'a [B2bProcessedRow]),
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncRequest<'a> {
    #[serde(rename = "type")]
    pub dataset: &'static str,
    pub timestamp: DateTime<Utc>,
    pub rows: SyncRows<'a>,
}

impl<'a> SyncRequest<'a> {
    /// Build the payload from an analysis result and the source file's
    /// modification time. Row order is the normalizer's order.
    pub fn from_result(result: &'a AnalysisResult, timestamp: DateTime<Utc>) -> Self {
        let rows = match result {
            AnalysisResult::B2c(r) => SyncRows::B2c(&r.detailed_wbns),
            AnalysisResult::B2b(r) => SyncRows::B2b(&r.detailed_wbns),
        };
        Self {
            dataset: result.kind().as_str(),
            timestamp,
            rows,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub success: bool,
    pub error: Option<String>,
}

pub trait SheetSync {
    fn push(&self, req: &SyncRequest) -> SyncOutcome;
}

/// File-backed sync target: serializes the request to a JSON file.
pub struct FileSync {
    pub path: String,
}

impl SheetSync for FileSync {
    fn push(&self, req: &SyncRequest) -> SyncOutcome {
        let payload = match serde_json::to_string_pretty(req) {
            Ok(s) => s,
            Err(e) => {
                return SyncOutcome {
                    success: false,
                    error: Some(format!("serialize failed: {}", e)),
                }
            }
        };
        match std::fs::write(&self.path, payload) {
            Ok(()) => SyncOutcome {
                success: true,
                error: None,
            },
            Err(e) => SyncOutcome {
                success: false,
                error: Some(format!("write failed: {}", e)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::engine::analyze;

    #[test]
    fn payload_carries_kind_timestamp_and_rows() {
        let cfg = AnalysisConfig::default();
        let result = analyze("wbn,sd_dif,producttype\nW1,10,Heavy\n", &cfg).unwrap();
        let ts = Utc::now();
        let req = SyncRequest::from_result(&result, ts);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["type"], "b2c");
        assert_eq!(json["rows"][0]["wbn"], "W1");
        assert!(json["timestamp"].is_string());
    }
}
