// Dataset classification from header shape.
//
// The decision looks only at which columns exist, never at row values, so a
// file with zero usable rows still classifies the same way.
use crate::types::{col, DatasetKind};

/// Columns that only the B2C ageing export carries.
const B2C_MARKERS: [&str; 2] = [col::SD_DIF, col::PRODUCT_TYPE];
/// Columns that only the B2B to-connect export carries.
const B2B_MARKERS: [&str; 2] = [col::CONTROLLABLE_REMARK, col::CLIENT];

/// Decide which export shape a (folded) header list belongs to.
pub fn detect(headers: &[String]) -> DatasetKind {
    let has = |name: &str| headers.iter().any(|h| h == name);
    if B2C_MARKERS.iter().all(|m| has(m)) {
        DatasetKind::B2c
    } else if B2B_MARKERS.iter().all(|m| has(m)) {
        DatasetKind::B2b
    } else {
        DatasetKind::Unrecognized
    }
}
