use crate::util::display_hours;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tabled::Tabled;

/// One parsed CSV row: trimmed, case-folded header name to trimmed cell
/// text. Consumed immediately by the normalizers.
pub type RawRow = HashMap<String, String>;

/// Column names as they appear (after folding) in the two known export
/// shapes. Order in the file is irrelevant; cells are looked up by key.
pub mod col {
    pub const WBN: &str = "wbn";
    pub const SD_DIF: &str = "sd_dif";
    pub const PRODUCT_TYPE: &str = "producttype";
    pub const STATUS: &str = "status";
    pub const NDC: &str = "ndc";
    pub const FACILITY: &str = "facility";
    pub const LARGE: &str = "large";
    pub const CONTROLLABLE_REMARK: &str = "controllable_remark";
    pub const PUT_REMARKS: &str = "put_remarks";
    pub const NTC: &str = "ntc";
    pub const CLIENT: &str = "client";
    pub const CS_SR: &str = "cs_sr";
    pub const NOT_PUT_WBNS: &str = "not_put_wbns";
    pub const AGEING_DAYS: &str = "ageing_days";
}

/// Which of the two known export shapes a header belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    B2c,
    B2b,
    Unrecognized,
}

impl DatasetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::B2c => "b2c",
            DatasetKind::B2b => "b2b",
            DatasetKind::Unrecognized => "unrecognized",
        }
    }
}

/// One ageing B2C/Heavy shipment after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct B2cProcessedRow {
    #[tabled(rename = "WBN")]
    pub wbn: String,
    #[tabled(rename = "Ageing (hrs)", display_with = "display_hours")]
    pub sd_dif: f64,
    #[tabled(rename = "Large")]
    pub large: bool,
    #[tabled(rename = "Bucket")]
    pub aging_bucket: String,
    #[tabled(rename = "Product")]
    pub producttype: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "NDC")]
    pub ndc: String,
    #[tabled(rename = "Facility")]
    pub facility: String,
}

/// One pending B2B "to-connect" shipment after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct B2bProcessedRow {
    #[tabled(rename = "WBN")]
    pub wbn: String,
    #[tabled(rename = "Facility")]
    pub facility: String,
    #[tabled(rename = "Remark")]
    pub controllable_remark: String,
    #[tabled(rename = "Sub Remark")]
    pub sub_remark: String,
    #[tabled(rename = "Put Remark")]
    pub put_remarks: String,
    #[tabled(rename = "NTC")]
    pub ntc: String,
    #[tabled(rename = "Client")]
    pub client: String,
    #[tabled(rename = "CS SR")]
    pub cs_sr: String,
    #[tabled(rename = "Not Put")]
    pub not_put_wbns: String,
    #[tabled(rename = "Ageing (days)", display_with = "display_hours")]
    pub ageing_days: f64,
    #[tabled(rename = "Bucket")]
    pub ageing_bucket_hrs: String,
    #[tabled(skip)]
    pub remark_combined: String,
    #[tabled(skip)]
    pub put_combined: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct B2cSummary {
    #[serde(rename = "totalWBNs")]
    pub total_wbns: usize,
    #[serde(rename = "ageBreakdown")]
    pub age_breakdown: BTreeMap<String, usize>,
    #[serde(rename = "productBreakdown")]
    pub product_breakdown: BTreeMap<String, usize>,
    #[serde(rename = "statusBreakdown")]
    pub status_breakdown: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct NdcSummaryRow {
    #[tabled(rename = "NDC")]
    pub ndc: String,
    #[tabled(rename = "Total")]
    pub total_ageing_wbns: usize,
    #[tabled(rename = ">96h")]
    pub age_gt_96: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ControllableBreakdownRow {
    #[tabled(rename = "Remark")]
    pub controllable_remark: String,
    #[tabled(rename = "Sub Remark")]
    pub sub_remark: String,
    #[tabled(rename = "Count")]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct B2bSummary {
    #[serde(rename = "totalWBNs")]
    pub total_wbns: usize,
    #[serde(rename = "controllableBreakdown")]
    pub controllable_breakdown: Vec<ControllableBreakdownRow>,
    #[serde(rename = "ageingBreakdown")]
    pub ageing_breakdown: BTreeMap<String, usize>,
    #[serde(rename = "putBreakdown")]
    pub put_breakdown: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct NtcSummaryRow {
    #[tabled(rename = "NTC")]
    pub ntc: String,
    #[tabled(rename = "Total")]
    pub total_wbns: usize,
    #[tabled(rename = ">96h")]
    pub age_gt_96: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct ClientSummaryRow {
    #[tabled(rename = "Client")]
    pub client: String,
    #[tabled(rename = "Total")]
    pub total_wbns: usize,
    #[tabled(rename = ">96h")]
    pub age_gt_96: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct B2cAnalysisResult {
    pub summary: B2cSummary,
    #[serde(rename = "ndcSummary")]
    pub ndc_summary: Vec<NdcSummaryRow>,
    #[serde(rename = "detailedWBNs")]
    pub detailed_wbns: Vec<B2cProcessedRow>,
    #[serde(rename = "droppedRows")]
    pub dropped_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct B2bAnalysisResult {
    pub summary: B2bSummary,
    #[serde(rename = "ntcSummary")]
    pub ntc_summary: Vec<NtcSummaryRow>,
    #[serde(rename = "clientSummary")]
    pub client_summary: Vec<ClientSummaryRow>,
    #[serde(rename = "detailedWBNs")]
    pub detailed_wbns: Vec<B2bProcessedRow>,
    #[serde(rename = "droppedRows")]
    pub dropped_rows: usize,
}

/// The tagged result handed to the presentation layer. Serializes as
/// `{"type": "b2c"|"b2b", "data": {...}}` to match the sheet-facing JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum AnalysisResult {
    B2c(B2cAnalysisResult),
    B2b(B2bAnalysisResult),
}

impl AnalysisResult {
    pub fn kind(&self) -> DatasetKind {
        match self {
            AnalysisResult::B2c(_) => DatasetKind::B2c,
            AnalysisResult::B2b(_) => DatasetKind::B2b,
        }
    }

    pub fn total_wbns(&self) -> usize {
        match self {
            AnalysisResult::B2c(r) => r.summary.total_wbns,
            AnalysisResult::B2b(r) => r.summary.total_wbns,
        }
    }

    pub fn dropped_rows(&self) -> usize {
        match self {
            AnalysisResult::B2c(r) => r.dropped_rows,
            AnalysisResult::B2b(r) => r.dropped_rows,
        }
    }
}
