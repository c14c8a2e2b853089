use thiserror::Error;

/// Typed failures surfaced by the analysis pipeline.
///
/// Row-level numeric conversion failures are deliberately not here: those
/// follow a skip-and-count policy and show up as `dropped_rows` on the
/// result instead of failing the whole file.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("empty file: no header row found")]
    EmptyInput,

    #[error("no data rows found after the header")]
    NoDataRows,

    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unrecognized dataset: header matches neither the B2C nor the B2B export shape (columns: {0:?})")]
    UnrecognizedHeader(Vec<String>),
}
