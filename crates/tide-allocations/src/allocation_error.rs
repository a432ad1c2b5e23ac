use thiserror::Error;
use tide_scenarios::{ScenarioNotFound, SnapshotKind};

use crate::snapshot_reader::SnapshotParseError;

/// Terminal failures of one aggregation request.
///
/// Field-level coercion problems are not errors; see
/// [`FieldCoercionWarning`](crate::record_normalizer::FieldCoercionWarning).
#[derive(Debug, Error)]
pub enum AllocationServiceError {
    #[error(transparent)]
    ScenarioNotFound(#[from] ScenarioNotFound),
    #[error("no {kind} file for scenario '{scenario}'")]
    SnapshotNotFound {
        scenario: String,
        kind: SnapshotKind,
    },
    #[error(transparent)]
    SnapshotParse(#[from] SnapshotParseError),
}
