// Row normalization: raw keyed cells to typed, derived records.
//
// Numeric conversion failures never fail the file; the offending row is
// dropped and counted, and the count is surfaced on the final result.
use crate::config::AnalysisConfig;
use crate::types::{col, B2bProcessedRow, B2cProcessedRow, RawRow};
use crate::util::{is_truthy, parse_f64_safe};

#[derive(Debug, Clone)]
pub struct Normalized<T> {
    /// Typed rows in input order.
    pub rows: Vec<T>,
    /// Rows excluded because a required numeric cell would not parse.
    pub dropped_rows: usize,
}

fn cell<'a>(row: &'a RawRow, name: &str) -> &'a str {
    row.get(name).map(String::as_str).unwrap_or("")
}

fn cell_or(row: &RawRow, name: &str, default: &str) -> String {
    let v = cell(row, name);
    if v.is_empty() {
        default.to_string()
    } else {
        v.to_string()
    }
}

/// Normalize raw B2C rows: parse ageing hours, bucket them, and derive the
/// size flag. Ageing must parse to a non-negative number or the row drops.
pub fn normalize_b2c(rows: &[RawRow], cfg: &AnalysisConfig) -> Normalized<B2cProcessedRow> {
    let mut out = Vec::with_capacity(rows.len());
    let mut dropped_rows = 0usize;

    for row in rows {
        let sd_dif = match parse_f64_safe(row.get(col::SD_DIF).map(String::as_str)) {
            Some(v) if v >= 0.0 => v,
            _ => {
                dropped_rows += 1;
                continue;
            }
        };

        out.push(B2cProcessedRow {
            wbn: cell(row, col::WBN).to_string(),
            sd_dif,
            large: is_truthy(cell(row, col::LARGE)),
            aging_bucket: cfg.b2c_bucket(sd_dif),
            producttype: cell_or(row, col::PRODUCT_TYPE, "Unknown"),
            status: cell_or(row, col::STATUS, "Unknown"),
            ndc: cell_or(row, col::NDC, "Unknown"),
            facility: cell_or(row, col::FACILITY, &cfg.default_facility),
        });
    }

    Normalized {
        rows: out,
        dropped_rows,
    }
}

/// Normalize raw B2B rows: parse ageing days, bucket the equivalent hours,
/// and resolve the two-level remark category through the config table.
pub fn normalize_b2b(rows: &[RawRow], cfg: &AnalysisConfig) -> Normalized<B2bProcessedRow> {
    let mut out = Vec::with_capacity(rows.len());
    let mut dropped_rows = 0usize;

    for row in rows {
        let ageing_days = match parse_f64_safe(row.get(col::AGEING_DAYS).map(String::as_str)) {
            Some(v) if v >= 0.0 => v,
            _ => {
                dropped_rows += 1;
                continue;
            }
        };
        let ageing_hours = ageing_days * 24.0;

        let remark = cfg.remark_category(cell(row, col::CONTROLLABLE_REMARK));
        let put_remarks = cell_or(row, col::PUT_REMARKS, "Unspecified");
        let not_put_wbns = cell(row, col::NOT_PUT_WBNS).to_string();

        out.push(B2bProcessedRow {
            wbn: cell(row, col::WBN).to_string(),
            facility: cell_or(row, col::FACILITY, &cfg.default_facility),
            remark_combined: format!("{} | {}", remark.controllable_remark, remark.sub_remark),
            put_combined: format!("{} | {}", put_remarks, not_put_wbns),
            controllable_remark: remark.controllable_remark,
            sub_remark: remark.sub_remark,
            put_remarks,
            ntc: cell_or(row, col::NTC, "Unknown"),
            client: cell_or(row, col::CLIENT, "Unknown"),
            cs_sr: cell(row, col::CS_SR).to_string(),
            not_put_wbns,
            ageing_days,
            ageing_bucket_hrs: cfg.b2b_bucket(ageing_hours),
        });
    }

    Normalized {
        rows: out,
        dropped_rows,
    }
}
