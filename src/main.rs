// Entry point and high-level CLI flow.
//
// The binary wraps the pure analysis engine in a small menu:
// - Option [1] loads a CSV export, classifies it, and runs the analysis.
// - Option [2] prints the dashboard summaries and exports the detail rows.
// - Option [3] pushes the detail rows to the sheet-sync collaborator.
mod classify;
mod config;
mod engine;
mod error;
mod loader;
mod normalize;
mod output;
mod reports;
mod sync;
mod types;
mod util;

use chrono::{DateTime, Utc};
use config::AnalysisConfig;
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use sync::{FileSync, SheetSync, SyncRequest};
use types::{AnalysisResult, DatasetKind};

const CONFIG_PATH: &str = "agesight.json";
const DEFAULT_INPUT: &str = "ageing_export.csv";
const SYNC_PAYLOAD_PATH: &str = "sheet_sync_payload.json";

// Simple in-memory app state so we only analyze the CSV once but can print
// reports and sync multiple times in a single run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { analysis: None }));

struct AppState {
    analysis: Option<Loaded>,
}

struct Loaded {
    result: AnalysisResult,
    /// Modification time of the source file, forwarded to the sync payload.
    timestamp: DateTime<Utc>,
}

/// Read a single line of input after printing the common "Enter choice:"
/// prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask the user whether to go back to the menu after printing reports.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Menu (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        let resp = buf.trim().to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Load the analysis configuration, falling back to the built-in defaults
/// when no override file is present or it fails to parse.
fn load_config() -> AnalysisConfig {
    if !Path::new(CONFIG_PATH).exists() {
        return AnalysisConfig::default();
    }
    match std::fs::read_to_string(CONFIG_PATH)
        .map_err(|e| e.to_string())
        .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()))
    {
        Ok(cfg) => {
            println!("Loaded configuration overrides from {}.", CONFIG_PATH);
            cfg
        }
        Err(e) => {
            eprintln!("Ignoring {}: {}. Using defaults.", CONFIG_PATH, e);
            AnalysisConfig::default()
        }
    }
}

fn file_timestamp(path: &str) -> DateTime<Utc> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now())
}

/// Handle option [1]: read the CSV export and run the analysis.
///
/// On success the tagged result is stored in `APP_STATE` and a short
/// textual summary of the classification is printed.
fn handle_load() {
    print!("CSV file path [{}]: ", DEFAULT_INPUT);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    let path = match buf.trim() {
        "" => DEFAULT_INPUT,
        p => p,
    }
    .to_string();

    let text = match std::fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to read file: {}\n", e);
            return;
        }
    };

    let cfg = load_config();
    match engine::analyze(&text, &cfg) {
        Ok(result) => {
            let kind = match result.kind() {
                DatasetKind::B2c => "B2C/Heavy",
                DatasetKind::B2b => "B2B (To Connect)",
                DatasetKind::Unrecognized => "Unrecognized",
            };
            println!(
                "Classified as {} ({} WBNs analyzed)",
                kind,
                util::format_int(result.total_wbns() as i64)
            );
            if result.dropped_rows() > 0 {
                println!(
                    "Note: {} rows skipped due to unparseable ageing values.",
                    util::format_int(result.dropped_rows() as i64)
                );
            }
            println!();
            let mut state = APP_STATE.lock().unwrap();
            state.analysis = Some(Loaded {
                result,
                timestamp: file_timestamp(&path),
            });
        }
        Err(e) => {
            eprintln!("Analysis failed: {}\n", e);
        }
    }
}

/// Handle option [2]: print the dashboard summaries and export the detail
/// rows to CSV/TSV plus the full result JSON.
fn handle_report() {
    let state = APP_STATE.lock().unwrap();
    let Some(loaded) = state.analysis.as_ref() else {
        println!("Error: No data loaded. Please load a CSV file first (option 1).\n");
        return;
    };

    match &loaded.result {
        AnalysisResult::B2c(r) => {
            println!("B2C/Heavy Dashboard\n");
            println!(
                "Total Ageing WBNs: {}\n",
                util::format_int(r.summary.total_wbns as i64)
            );
            output::preview_counts("Ageing Breakdown", &r.summary.age_breakdown);
            output::preview_counts("Product Type", &r.summary.product_breakdown);
            output::preview_counts("Status", &r.summary.status_breakdown);
            println!("NDC Breakdown");
            output::preview_table_rows(&r.ndc_summary, 10);
            println!("Detail preview");
            output::preview_table_rows(&r.detailed_wbns, 3);

            let detail_csv = "b2c_detailed_wbns.csv";
            let detail_tsv = "b2c_detailed_wbns.tsv";
            if let Err(e) = output::write_csv(detail_csv, &r.detailed_wbns) {
                eprintln!("Write error: {}", e);
            }
            if let Err(e) = output::write_tsv(detail_tsv, &r.detailed_wbns) {
                eprintln!("Write error: {}", e);
            }
            println!("(Detail rows exported to {} and {})", detail_csv, detail_tsv);
        }
        AnalysisResult::B2b(r) => {
            println!("B2B (To Connect) Dashboard\n");
            println!(
                "Total Pending WBNs: {}\n",
                util::format_int(r.summary.total_wbns as i64)
            );
            println!("Controllable Breakdown");
            output::preview_table_rows(&r.summary.controllable_breakdown, 20);
            output::preview_counts("Ageing Breakdown", &r.summary.ageing_breakdown);
            output::preview_counts("Put Remark Breakdown", &r.summary.put_breakdown);
            println!("NTC Breakdown (Controllable Ageing Only)");
            output::preview_table_rows(&r.ntc_summary, 10);
            println!("Client Breakdown (Controllable Ageing Only)");
            output::preview_table_rows(&r.client_summary, 10);
            println!("Detail preview");
            output::preview_table_rows(&r.detailed_wbns, 3);

            let detail_csv = "b2b_detailed_wbns.csv";
            let detail_tsv = "b2b_detailed_wbns.tsv";
            if let Err(e) = output::write_csv(detail_csv, &r.detailed_wbns) {
                eprintln!("Write error: {}", e);
            }
            if let Err(e) = output::write_tsv(detail_tsv, &r.detailed_wbns) {
                eprintln!("Write error: {}", e);
            }
            println!("(Detail rows exported to {} and {})", detail_csv, detail_tsv);
        }
    }

    if let Err(e) = output::write_json("analysis_result.json", &loaded.result) {
        eprintln!("Write error: {}", e);
    }
    println!("(Full result exported to analysis_result.json)\n");
}

/// Handle option [3]: push the detail rows to the sheet-sync target.
fn handle_sync() {
    let state = APP_STATE.lock().unwrap();
    let Some(loaded) = state.analysis.as_ref() else {
        println!("Error: No data loaded. Please load a CSV file first (option 1).\n");
        return;
    };

    let req = SyncRequest::from_result(&loaded.result, loaded.timestamp);
    let target = FileSync {
        path: SYNC_PAYLOAD_PATH.to_string(),
    };
    let outcome = target.push(&req);
    if outcome.success {
        println!("Sync payload written to {}.\n", SYNC_PAYLOAD_PATH);
    } else {
        eprintln!(
            "Sync failed: {}\n",
            outcome.error.unwrap_or_else(|| "unknown error".to_string())
        );
    }
}

fn main() {
    loop {
        println!("AGE-SIGHT Ageing Report");
        println!("[1] Load ageing CSV");
        println!("[2] Show dashboard report");
        println!("[3] Sync detail rows to sheet");
        println!("[4] Exit\n");
        match read_choice().as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                println!();
                handle_report();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => {
                println!();
                handle_sync();
            }
            "4" => {
                println!("Exiting the program.");
                break;
            }
            _ => {
                println!("Invalid choice. Please enter 1, 2, 3 or 4.\n");
            }
        }
    }
}
