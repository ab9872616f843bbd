//! Spatial queries over entity positions.
//!
//! Distances are measured between entity positions (top-left corners),
//! except for placement clearance which uses half sizes.

use watershed_core::constants::PLACEMENT_CLEARANCE;
use watershed_core::types::Position;

/// True iff any of `others` is closer than `size/2 + other_size/2 + 10`
/// to `position`. Only used when placing entities, never during movement.
pub fn is_overlapping(
    position: Position,
    size: f64,
    others: impl IntoIterator<Item = Position>,
    other_size: f64,
) -> bool {
    let clearance = size / 2.0 + other_size / 2.0 + PLACEMENT_CLEARANCE;
    others
        .into_iter()
        .any(|other| other.distance(position) < clearance)
}

/// Nearest candidate to `from`. Ties keep the first candidate in scan order.
pub fn nearest<T>(
    from: Position,
    candidates: impl IntoIterator<Item = (T, Position)>,
) -> Option<(T, f64)> {
    let mut best: Option<(T, f64)> = None;
    for (item, position) in candidates {
        let dist = from.distance(position);
        if best.as_ref().map_or(true, |(_, d)| dist < *d) {
            best = Some((item, dist));
        }
    }
    best
}

/// Move `from` toward `to` by `step` along the normalised direction.
/// Coincident points stay put rather than producing NaN.
pub fn step_toward(from: Position, to: Position, step: f64) -> Position {
    let direction = (to - from).normalize_or_zero();
    from + direction * step
}
