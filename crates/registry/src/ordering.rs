//! Position assignment and renumbering for ordered assets.
//!
//! Pure functions only: callers apply the returned plans inside a single
//! registry transaction so observers never see a partially renumbered
//! state. Positions within a parent are always exactly `0..n-1`.

use uuid::Uuid;

/// Where a new asset lands and whether existing assets must move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Position assigned to the new asset.
    pub position: i64,
    /// True when every existing asset shifts up by one (insert at front).
    pub shift_existing: bool,
}

/// Compute the placement for an insert.
///
/// Inserting as primary (or into an empty parent) takes position 0 and
/// shifts the rest up; otherwise the asset is appended at position `n`.
pub fn placement(existing_count: u32, as_primary: bool) -> Placement {
    if as_primary || existing_count == 0 {
        Placement {
            position: 0,
            shift_existing: existing_count > 0,
        }
    } else {
        Placement {
            position: existing_count as i64,
            shift_existing: false,
        }
    }
}

/// A batch of final position assignments, applied atomically.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderPlan {
    /// (asset_id, final position) pairs covering every asset of the parent.
    pub positions: Vec<(Uuid, i64)>,
}

/// Build the plan for an explicit reorder.
///
/// `current` is the parent's asset ids in position order; `requested` is
/// the caller-supplied order. The requested ids must be exactly a
/// permutation of the current ones (set equality, no duplicates), else the
/// reorder is invalid and no plan is produced.
pub fn reorder_plan(current: &[Uuid], requested: &[Uuid]) -> Result<OrderPlan, String> {
    if requested.len() != current.len() {
        return Err(format!(
            "expected {} asset ids, got {}",
            current.len(),
            requested.len()
        ));
    }

    let mut seen = std::collections::HashSet::with_capacity(requested.len());
    for id in requested {
        if !seen.insert(*id) {
            return Err(format!("duplicate asset id {id}"));
        }
    }
    for id in current {
        if !seen.contains(id) {
            return Err(format!("asset {id} missing from requested order"));
        }
    }

    Ok(OrderPlan {
        positions: requested
            .iter()
            .enumerate()
            .map(|(index, id)| (*id, index as i64))
            .collect(),
    })
}

/// Renumber the survivors after a removal, preserving relative order.
///
/// `remaining` must be sorted by prior position ascending (stable
/// renumbering). Returns the full contiguous assignment `0..n-1`.
pub fn renumber_after_removal(remaining: &[Uuid]) -> OrderPlan {
    OrderPlan {
        positions: remaining
            .iter()
            .enumerate()
            .map(|(index, id)| (*id, index as i64))
            .collect(),
    }
}
