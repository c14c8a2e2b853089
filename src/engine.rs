// The analysis pipeline: parse, classify, normalize, summarize, package.
//
// A pure function of the input text and the config; no state survives
// between calls, so it is safe to run from any thread.
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::types::{AnalysisResult, B2bAnalysisResult, B2cAnalysisResult, DatasetKind};
use crate::{classify, loader, normalize, reports};

/// Run the full analysis over raw CSV text.
///
/// Returns the tagged result for a recognized export, or a typed error; on
/// failure nothing partial is observable.
pub fn analyze(text: &str, cfg: &AnalysisConfig) -> Result<AnalysisResult, AnalysisError> {
    let parsed = loader::parse_csv(text)?;

    match classify::detect(&parsed.headers) {
        DatasetKind::B2c => {
            let normalized = normalize::normalize_b2c(&parsed.rows, cfg);
            let (summary, ndc_summary) = reports::summarize_b2c(&normalized.rows, cfg);
            Ok(AnalysisResult::B2c(B2cAnalysisResult {
                summary,
                ndc_summary,
                detailed_wbns: normalized.rows,
                dropped_rows: normalized.dropped_rows,
            }))
        }
        DatasetKind::B2b => {
            let normalized = normalize::normalize_b2b(&parsed.rows, cfg);
            let (summary, ntc_summary, client_summary) =
                reports::summarize_b2b(&normalized.rows, cfg);
            Ok(AnalysisResult::B2b(B2bAnalysisResult {
                summary,
                ntc_summary,
                client_summary,
                detailed_wbns: normalized.rows,
                dropped_rows: normalized.dropped_rows,
            }))
        }
        DatasetKind::Unrecognized => Err(AnalysisError::UnrecognizedHeader(parsed.headers)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn b2c_ageing_export_end_to_end() {
        let csv = "wbn,sd_dif,producttype,status,ndc\n\
                   W1,10,Standard,OK,N1\n\
                   W2,100,Heavy,OK,N1\n";
        let cfg = AnalysisConfig::default();
        let result = analyze(csv, &cfg).unwrap();
        let AnalysisResult::B2c(r) = result else {
            panic!("expected a B2C result");
        };
        assert_eq!(r.summary.total_wbns, 2);
        assert_eq!(r.summary.age_breakdown["0_24"], 1);
        assert_eq!(r.summary.age_breakdown["gt_96"], 1);
        assert_eq!(r.ndc_summary.len(), 1);
        assert_eq!(r.ndc_summary[0].ndc, "N1");
        assert_eq!(r.ndc_summary[0].total_ageing_wbns, 2);
        assert_eq!(r.ndc_summary[0].age_gt_96, 1);
        assert_eq!(r.detailed_wbns.len(), 2);
        assert_eq!(r.detailed_wbns[0].wbn, "W1");
        assert_eq!(r.dropped_rows, 0);
    }

    #[test]
    fn b2b_pending_export_end_to_end() {
        let csv = "wbn,ntc,client,ageing_days,controllable_remark\n\
                   W1,T1,C1,5,Controllable\n\
                   W2,T2,C2,1,Client Hold\n";
        let cfg = AnalysisConfig::default();
        let result = analyze(csv, &cfg).unwrap();
        let AnalysisResult::B2b(r) = result else {
            panic!("expected a B2B result");
        };
        // 5 days = 120h: the controllable row sits in the open tail bucket.
        assert_eq!(r.summary.total_wbns, 2);
        assert_eq!(r.summary.ageing_breakdown["gt_96"], 1);
        assert_eq!(r.summary.ageing_breakdown["24_48"], 1);
        assert_eq!(r.ntc_summary.len(), 1);
        assert_eq!(r.ntc_summary[0].ntc, "T1");
        assert_eq!(r.ntc_summary[0].age_gt_96, 1);
        assert_eq!(r.client_summary.len(), 1);
        assert_eq!(r.client_summary[0].client, "C1");
    }

    #[test]
    fn header_only_file_is_a_parse_error() {
        let cfg = AnalysisConfig::default();
        let err = analyze("wbn,sd_dif,producttype\n", &cfg).unwrap_err();
        assert!(matches!(err, AnalysisError::NoDataRows));
    }

    #[test]
    fn unrelated_header_is_a_classification_error() {
        let cfg = AnalysisConfig::default();
        let err = analyze("id,name\n1,foo\n", &cfg).unwrap_err();
        match err {
            AnalysisError::UnrecognizedHeader(cols) => {
                assert_eq!(cols, vec!["id".to_string(), "name".to_string()]);
            }
            other => panic!("expected UnrecognizedHeader, got {:?}", other),
        }
    }

    #[test]
    fn dropped_rows_surface_on_the_result() {
        let csv = "wbn,sd_dif,producttype\nW1,abc,Heavy\nW2,10,Heavy\n";
        let cfg = AnalysisConfig::default();
        let result = analyze(csv, &cfg).unwrap();
        assert_eq!(result.dropped_rows(), 1);
        assert_eq!(result.total_wbns(), 1);
    }

    #[test]
    fn result_serializes_with_the_sheet_facing_field_names() {
        let csv = "wbn,sd_dif,producttype\nW1,10,Heavy\n";
        let cfg = AnalysisConfig::default();
        let result = analyze(csv, &cfg).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["type"], "b2c");
        assert_eq!(json["data"]["summary"]["totalWBNs"], 1);
        assert!(json["data"]["detailedWBNs"].is_array());
        assert_eq!(json["data"]["droppedRows"], 0);
    }
}
