// Aggregation: fold normalized rows into the nested summaries.
//
// Each dataset kind gets one streaming pass that fills every breakdown map
// at once, plus one `group_rollup` traversal per keyed rollup. Breakdown
// maps hold observed categories only; consumers treat absence as zero.
use crate::config::AnalysisConfig;
use crate::types::{
    B2bProcessedRow, B2bSummary, B2cProcessedRow, B2cSummary, ClientSummaryRow,
    ControllableBreakdownRow, NdcSummaryRow, NtcSummaryRow,
};
use std::collections::{BTreeMap, HashMap};

/// Totals for one group of a keyed rollup.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotals {
    pub key: String,
    pub total: usize,
    pub over_threshold: usize,
}

/// Group rows by a string key, counting the group total and the strictly
/// over-threshold sub-count in one traversal. Output keeps first-appearance
/// order so repeated runs over the same rows are identical.
pub fn group_rollup<'a, T: 'a, I, K, H>(rows: I, key: K, hours: H, threshold: f64) -> Vec<GroupTotals>
where
    I: IntoIterator<Item = &'a T>,
    K: Fn(&T) -> &str,
    H: Fn(&T) -> f64,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<GroupTotals> = Vec::new();
    for row in rows {
        let k = key(row);
        let i = *index.entry(k.to_string()).or_insert_with(|| {
            groups.push(GroupTotals {
                key: k.to_string(),
                total: 0,
                over_threshold: 0,
            });
            groups.len() - 1
        });
        groups[i].total += 1;
        if hours(row) > threshold {
            groups[i].over_threshold += 1;
        }
    }
    groups
}

/// Summarize B2C rows: total, the three breakdown maps, and the per-NDC
/// rollup with its `>96h` highlight count.
pub fn summarize_b2c(
    rows: &[B2cProcessedRow],
    cfg: &AnalysisConfig,
) -> (B2cSummary, Vec<NdcSummaryRow>) {
    let mut age_breakdown: BTreeMap<String, usize> = BTreeMap::new();
    let mut product_breakdown: BTreeMap<String, usize> = BTreeMap::new();
    let mut status_breakdown: BTreeMap<String, usize> = BTreeMap::new();

    for r in rows {
        *age_breakdown.entry(r.aging_bucket.clone()).or_insert(0) += 1;
        *product_breakdown.entry(r.producttype.clone()).or_insert(0) += 1;
        *status_breakdown.entry(r.status.clone()).or_insert(0) += 1;
    }

    let ndc_summary = group_rollup(rows, |r| r.ndc.as_str(), |r| r.sd_dif, cfg.highlight_hours)
        .into_iter()
        .map(|g| NdcSummaryRow {
            ndc: g.key,
            total_ageing_wbns: g.total,
            age_gt_96: g.over_threshold,
        })
        .collect();

    (
        B2cSummary {
            total_wbns: rows.len(),
            age_breakdown,
            product_breakdown,
            status_breakdown,
        },
        ndc_summary,
    )
}

/// Summarize B2B rows. The NTC and client rollups are computed only over
/// rows whose top-level remark is the controllable category; the breakdown
/// maps count every row.
pub fn summarize_b2b(
    rows: &[B2bProcessedRow],
    cfg: &AnalysisConfig,
) -> (B2bSummary, Vec<NtcSummaryRow>, Vec<ClientSummaryRow>) {
    let mut pair_counts: BTreeMap<(String, String), usize> = BTreeMap::new();
    let mut ageing_breakdown: BTreeMap<String, usize> = BTreeMap::new();
    let mut put_breakdown: BTreeMap<String, usize> = BTreeMap::new();

    for r in rows {
        *pair_counts
            .entry((r.controllable_remark.clone(), r.sub_remark.clone()))
            .or_insert(0) += 1;
        *ageing_breakdown
            .entry(r.ageing_bucket_hrs.clone())
            .or_insert(0) += 1;
        *put_breakdown.entry(r.put_remarks.clone()).or_insert(0) += 1;
    }

    let controllable_breakdown = pair_counts
        .into_iter()
        .map(|((controllable_remark, sub_remark), count)| ControllableBreakdownRow {
            controllable_remark,
            sub_remark,
            count,
        })
        .collect();

    let hours = |r: &B2bProcessedRow| r.ageing_days * 24.0;
    let controllable = |r: &&B2bProcessedRow| is_controllable(r);

    let ntc_summary = group_rollup(
        rows.iter().filter(controllable),
        |r| r.ntc.as_str(),
        hours,
        cfg.highlight_hours,
    )
    .into_iter()
    .map(|g| NtcSummaryRow {
        ntc: g.key,
        total_wbns: g.total,
        age_gt_96: g.over_threshold,
    })
    .collect();

    let client_summary = group_rollup(
        rows.iter().filter(controllable),
        |r| r.client.as_str(),
        hours,
        cfg.highlight_hours,
    )
    .into_iter()
    .map(|g| ClientSummaryRow {
        client: g.key,
        total_wbns: g.total,
        age_gt_96: g.over_threshold,
    })
    .collect();

    (
        B2bSummary {
            total_wbns: rows.len(),
            controllable_breakdown,
            ageing_breakdown,
            put_breakdown,
        },
        ntc_summary,
        client_summary,
    )
}

fn is_controllable(r: &B2bProcessedRow) -> bool {
    r.controllable_remark.eq_ignore_ascii_case("controllable")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;

    fn b2c_row(wbn: &str, sd_dif: f64, producttype: &str, status: &str, ndc: &str) -> B2cProcessedRow {
        let cfg = AnalysisConfig::default();
        B2cProcessedRow {
            wbn: wbn.to_string(),
            sd_dif,
            large: false,
            aging_bucket: cfg.b2c_bucket(sd_dif),
            producttype: producttype.to_string(),
            status: status.to_string(),
            ndc: ndc.to_string(),
            facility: cfg.default_facility.clone(),
        }
    }

    fn b2b_row(wbn: &str, days: f64, remark: &str, sub: &str, ntc: &str, client: &str) -> B2bProcessedRow {
        let cfg = AnalysisConfig::default();
        B2bProcessedRow {
            wbn: wbn.to_string(),
            facility: cfg.default_facility.clone(),
            controllable_remark: remark.to_string(),
            sub_remark: sub.to_string(),
            put_remarks: "Put".to_string(),
            ntc: ntc.to_string(),
            client: client.to_string(),
            cs_sr: String::new(),
            not_put_wbns: String::new(),
            ageing_days: days,
            ageing_bucket_hrs: cfg.b2b_bucket(days * 24.0),
            remark_combined: format!("{} | {}", remark, sub),
            put_combined: "Put | ".to_string(),
        }
    }

    #[test]
    fn rollup_preserves_first_appearance_order() {
        let rows = vec![
            b2c_row("W1", 10.0, "Heavy", "OK", "N2"),
            b2c_row("W2", 10.0, "Heavy", "OK", "N1"),
            b2c_row("W3", 10.0, "Heavy", "OK", "N2"),
        ];
        let groups = group_rollup(&rows, |r| r.ndc.as_str(), |r| r.sd_dif, 96.0);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["N2", "N1"]);
        assert_eq!(groups[0].total, 2);
    }

    #[test]
    fn b2c_rollup_totals_sum_to_total_wbns() {
        let rows = vec![
            b2c_row("W1", 10.0, "Heavy", "OK", "N1"),
            b2c_row("W2", 100.0, "Standard", "OK", "N1"),
            b2c_row("W3", 50.0, "Heavy", "Hold", "N2"),
        ];
        let cfg = AnalysisConfig::default();
        let (summary, ndc) = summarize_b2c(&rows, &cfg);
        assert_eq!(summary.total_wbns, 3);
        let sum: usize = ndc.iter().map(|g| g.total_ageing_wbns).sum();
        assert_eq!(sum, summary.total_wbns);
        for g in &ndc {
            assert!(g.age_gt_96 <= g.total_ageing_wbns);
        }
    }

    #[test]
    fn b2c_breakdowns_contain_only_observed_categories() {
        let rows = vec![b2c_row("W1", 30.0, "Heavy", "OK", "N1")];
        let cfg = AnalysisConfig::default();
        let (summary, _) = summarize_b2c(&rows, &cfg);
        assert_eq!(summary.age_breakdown.len(), 1);
        assert_eq!(summary.age_breakdown["24_48"], 1);
        assert!(!summary.age_breakdown.contains_key("0_24"));
    }

    #[test]
    fn controllable_filter_excludes_non_controllable_rows() {
        let rows = vec![
            b2b_row("W1", 5.0, "Controllable", "Connection Missed", "T1", "C1"),
            b2b_row("W2", 5.0, "Non-Controllable", "Client Hold", "T2", "C2"),
        ];
        let cfg = AnalysisConfig::default();
        let (summary, ntc, client) = summarize_b2b(&rows, &cfg);
        // Both rows count toward the breakdown maps...
        assert_eq!(summary.total_wbns, 2);
        assert_eq!(summary.ageing_breakdown["gt_96"], 2);
        // ...but only the controllable row reaches the keyed rollups.
        assert_eq!(ntc.len(), 1);
        assert_eq!(ntc[0].ntc, "T1");
        assert_eq!(ntc[0].age_gt_96, 1);
        assert_eq!(client.len(), 1);
        assert_eq!(client[0].client, "C1");
    }

    #[test]
    fn controllable_breakdown_lists_observed_pairs_with_counts() {
        let rows = vec![
            b2b_row("W1", 1.0, "Controllable", "Connection Missed", "T1", "C1"),
            b2b_row("W2", 1.0, "Controllable", "Connection Missed", "T1", "C1"),
            b2b_row("W3", 1.0, "Non-Controllable", "Client Hold", "T1", "C1"),
        ];
        let cfg = AnalysisConfig::default();
        let (summary, _, _) = summarize_b2b(&rows, &cfg);
        assert_eq!(summary.controllable_breakdown.len(), 2);
        let missed = summary
            .controllable_breakdown
            .iter()
            .find(|p| p.sub_remark == "Connection Missed")
            .unwrap();
        assert_eq!(missed.count, 2);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let rows = vec![
            b2b_row("W1", 2.0, "Controllable", "Late Inscan", "T1", "C1"),
            b2b_row("W2", 6.0, "Non-Controllable", "Weather Hold", "T2", "C2"),
            b2b_row("W3", 0.5, "Controllable", "Mis-sort", "T1", "C3"),
        ];
        let cfg = AnalysisConfig::default();
        let first = summarize_b2b(&rows, &cfg);
        let second = summarize_b2b(&rows, &cfg);
        assert_eq!(first, second);
    }
}
