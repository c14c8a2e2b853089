// Analysis configuration.
//
// Everything the pipeline treats as business policy lives here rather than
// as literals inside the transformation code: the default facility name, the
// ageing bucket edges for both dataset kinds, the ">96h" highlight
// threshold, and the remark mapping table. The whole struct deserializes
// from JSON so an operator can override any of it without a rebuild.
use crate::util::fold_key;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A two-level remark category: the controllable/non-controllable bucket and
/// the finer sub-remark under it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemarkCategory {
    pub controllable_remark: String,
    pub sub_remark: String,
}

impl RemarkCategory {
    pub fn new(controllable_remark: &str, sub_remark: &str) -> Self {
        Self {
            controllable_remark: controllable_remark.to_string(),
            sub_remark: sub_remark.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Facility name assumed when the export carries no facility column.
    pub default_facility: String,
    /// Rows strictly older than this (in hours) count toward `age_gt_96`.
    pub highlight_hours: f64,
    /// Ascending bucket edges for B2C ageing hours. Five buckets: one per
    /// consecutive pair, lower bound inclusive, plus a final open bucket.
    pub b2c_bucket_edges: Vec<f64>,
    /// Ascending bucket edges for B2B ageing hours (days * 24). Four buckets.
    pub b2b_bucket_edges: Vec<f64>,
    /// Raw remark text (case-folded) to its two-level category.
    pub remark_map: BTreeMap<String, RemarkCategory>,
    /// Category applied to remark values missing from `remark_map`.
    pub fallback_remark: RemarkCategory,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_facility: "Main GW".to_string(),
            highlight_hours: 96.0,
            b2c_bucket_edges: vec![0.0, 24.0, 48.0, 72.0, 96.0],
            b2b_bucket_edges: vec![0.0, 24.0, 48.0, 96.0],
            remark_map: default_remark_map(),
            fallback_remark: RemarkCategory::new("Non-Controllable", "Unmapped"),
        }
    }
}

impl AnalysisConfig {
    /// Bucket label for a B2C ageing value in hours.
    pub fn b2c_bucket(&self, hours: f64) -> String {
        bucket_label(hours, &self.b2c_bucket_edges)
    }

    /// Bucket label for a B2B ageing value in hours.
    pub fn b2b_bucket(&self, hours: f64) -> String {
        bucket_label(hours, &self.b2b_bucket_edges)
    }

    /// Map raw remark text to its two-level category. Lookup is trimmed and
    /// case-folded; anything unmapped gets the configured fallback.
    pub fn remark_category(&self, raw: &str) -> RemarkCategory {
        self.remark_map
            .get(&fold_key(raw))
            .cloned()
            .unwrap_or_else(|| self.fallback_remark.clone())
    }
}

/// Labels follow the upstream sheet convention: `0_24`, `24_48`, ... and
/// `gt_96` for the open-ended tail. Lower edges are inclusive, so every
/// non-negative value lands in exactly one bucket.
fn bucket_label(hours: f64, edges: &[f64]) -> String {
    for w in edges.windows(2) {
        if hours >= w[0] && hours < w[1] {
            return format!("{}_{}", fmt_edge(w[0]), fmt_edge(w[1]));
        }
    }
    match edges.last() {
        Some(last) if hours >= *last => format!("gt_{}", fmt_edge(*last)),
        // Below the first edge: clamp into the first bucket.
        _ => match edges.windows(2).next() {
            Some(w) => format!("{}_{}", fmt_edge(w[0]), fmt_edge(w[1])),
            None => "gt_0".to_string(),
        },
    }
}

fn fmt_edge(e: f64) -> String {
    if e.fract() == 0.0 {
        format!("{}", e as i64)
    } else {
        format!("{}", e)
    }
}

fn default_remark_map() -> BTreeMap<String, RemarkCategory> {
    let entries = [
        // Raw values that already name the top-level category.
        ("controllable", ("Controllable", "General")),
        ("non-controllable", ("Non-Controllable", "General")),
        // Internal, actionable causes.
        ("connection missed", ("Controllable", "Connection Missed")),
        ("late inscan", ("Controllable", "Late Inscan")),
        ("mis-sort", ("Controllable", "Mis-sort")),
        ("space constraint", ("Controllable", "Space Constraint")),
        ("manpower shortage", ("Controllable", "Manpower Shortage")),
        // External causes outside the facility's control.
        ("vehicle breakdown", ("Non-Controllable", "Vehicle Breakdown")),
        ("flight delay", ("Non-Controllable", "Network Delay")),
        ("weather hold", ("Non-Controllable", "Weather Hold")),
        ("client hold", ("Non-Controllable", "Client Hold")),
    ];
    entries
        .into_iter()
        .map(|(raw, (top, sub))| (raw.to_string(), RemarkCategory::new(top, sub)))
        .collect()
}
