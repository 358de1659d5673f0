//! The pack combination engine.
//!
//! Given an order quantity and a catalog snapshot, computes the shipment
//! that never under-ships, minimizes the total items shipped and, among
//! overage-minimal solutions, minimizes the number of packs. Each call is a
//! pure function of its inputs; calls may run in parallel without any
//! coordination.
//!
//! Two solvers implement the same two-objective optimization:
//! - a bottom-up table over all candidate totals (the baseline, used for
//!   small orders), and
//! - a windowed shortest-path relaxation over pack size residues whose
//!   cost is bounded by the pack sizes, never by the order magnitude
//!   (used for everything else).
//!
//! Both solvers are exact at every order magnitude and produce identical
//! shipments on all inputs.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use crate::model::Shipment;

/// Errors raised by a calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalculationError {
    /// The order quantity is not strictly positive.
    InvalidOrder,
    /// The catalog snapshot holds no pack sizes.
    EmptyCatalog,
    /// No reachable total was found within the search bound. The bound
    /// construction guarantees one for any non-empty catalog, so this is
    /// an internal invariant violation, not a user input error.
    Unreachable,
}

impl CalculationError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            CalculationError::InvalidOrder => "invalid_order",
            CalculationError::EmptyCatalog => "empty_catalog",
            CalculationError::Unreachable => "unreachable",
        }
    }
}

impl std::fmt::Display for CalculationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalculationError::InvalidOrder => {
                write!(f, "items ordered must be greater than 0")
            }
            CalculationError::EmptyCatalog => write!(f, "no pack sizes available"),
            CalculationError::Unreachable => {
                write!(f, "no reachable total within the search bound")
            }
        }
    }
}

impl std::error::Error for CalculationError {}

/// Solver selection for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverStrategy {
    /// Pick the table solver for small orders and the windowed solver once
    /// the order exceeds a few multiples of the largest pack size, where
    /// the full-range table stops being the cheaper option.
    #[default]
    Auto,
    /// Always use the table solver. Intended for verification; table size
    /// grows with the order quantity.
    TableOnly,
    /// Always use the windowed solver.
    WindowedOnly,
}

/// Calculates the optimal shipment for an order against a catalog snapshot.
///
/// # Parameters
/// * `items_ordered` - The order quantity (must be strictly positive)
/// * `sizes` - The catalog snapshot; order and duplicates do not matter,
///   zero entries are ignored
///
/// # Returns
/// The overage-minimal, then pack-minimal `Shipment`, or a
/// `CalculationError` for invalid input.
///
/// # Examples
/// ```
/// use packwise::calculator::calculate;
///
/// let shipment = calculate(251, &[250, 500, 1000, 2000, 5000]).unwrap();
/// assert_eq!(shipment.total_items, 500);
/// assert_eq!(shipment.total_packs, 1);
/// ```
pub fn calculate(items_ordered: u64, sizes: &[u64]) -> Result<Shipment, CalculationError> {
    calculate_with_strategy(items_ordered, sizes, SolverStrategy::Auto)
}

/// Like [`calculate`], with an explicit solver strategy.
pub fn calculate_with_strategy(
    items_ordered: u64,
    sizes: &[u64],
    strategy: SolverStrategy,
) -> Result<Shipment, CalculationError> {
    if items_ordered == 0 {
        return Err(CalculationError::InvalidOrder);
    }

    let sizes = normalize_sizes(sizes);
    if sizes.is_empty() {
        return Err(CalculationError::EmptyCatalog);
    }

    let quantities = if use_windowed(items_ordered, &sizes, strategy) {
        solve_windowed(items_ordered, &sizes)?
    } else {
        solve_table(items_ordered, &sizes)?
    };

    Ok(Shipment::from_quantities(items_ordered, quantities))
}

/// Sorted, deduplicated, strictly positive copy of the snapshot.
fn normalize_sizes(sizes: &[u64]) -> Vec<u64> {
    let mut sizes: Vec<u64> = sizes.iter().copied().filter(|&s| s > 0).collect();
    sizes.sort_unstable();
    sizes.dedup();
    sizes
}

/// Decides which solver handles the order.
///
/// Both solvers are exact everywhere, so under `Auto` the choice is purely
/// about cost: the full-range table grows linearly with the order, the
/// windowed tables only with the pack sizes. A few multiples of the
/// largest size is where the table stops paying off.
fn use_windowed(items_ordered: u64, sizes: &[u64], strategy: SolverStrategy) -> bool {
    match strategy {
        SolverStrategy::TableOnly => false,
        SolverStrategy::WindowedOnly => true,
        SolverStrategy::Auto => {
            let largest = sizes[sizes.len() - 1];
            items_ordered > largest.saturating_mul(4)
        }
    }
}

/// Baseline solver: two bottom-up tables over candidate totals.
///
/// Phase 1 marks every total in `[0, items + largest - 1]` that is exactly
/// reachable as a non-negative combination of the sizes; the smallest
/// reachable total at or above the order is the target. Phase 2 computes
/// the minimal pack count for every total up to the target and backtracks
/// canonically, preferring the smallest size at each step.
fn solve_table(items_ordered: u64, sizes: &[u64]) -> Result<BTreeMap<u64, u64>, CalculationError> {
    let largest = sizes[sizes.len() - 1];
    // A multiple of the largest size always lies within this window, so a
    // reachable total at or above the order is guaranteed to exist here.
    let bound = (items_ordered + largest - 1) as usize;

    let mut reachable = vec![false; bound + 1];
    reachable[0] = true;
    for total in 1..=bound {
        for &size in sizes {
            let size = size as usize;
            if size > total {
                break;
            }
            if reachable[total - size] {
                reachable[total] = true;
                break;
            }
        }
    }

    let target = match (items_ordered as usize..=bound).find(|&t| reachable[t]) {
        Some(t) => t,
        None => {
            tracing::error!(
                items_ordered,
                bound,
                "no reachable total within the search bound; this is a bound construction bug"
            );
            return Err(CalculationError::Unreachable);
        }
    };

    count_quantities(target as u64, sizes)
}

/// Minimal-pack-count quantities for an exactly reachable target total.
///
/// Bottom-up table over `[0, target]` with the canonical backtrack that
/// prefers the smallest size at each step.
fn count_quantities(target: u64, sizes: &[u64]) -> Result<BTreeMap<u64, u64>, CalculationError> {
    let target = target as usize;

    const UNREACHED: u64 = u64::MAX;
    let mut packs = vec![UNREACHED; target + 1];
    packs[0] = 0;
    for total in 1..=target {
        let mut best = UNREACHED;
        for &size in sizes {
            let size = size as usize;
            if size > total {
                break;
            }
            let prev = packs[total - size];
            if prev != UNREACHED && prev + 1 < best {
                best = prev + 1;
            }
        }
        packs[total] = best;
    }

    let mut quantities: BTreeMap<u64, u64> = BTreeMap::new();
    let mut remaining = target;
    while remaining > 0 {
        let step = sizes.iter().copied().find(|&size| {
            let size = size as usize;
            size <= remaining
                && packs[remaining - size] != UNREACHED
                && packs[remaining - size] + 1 == packs[remaining]
        });
        match step {
            Some(size) => {
                *quantities.entry(size).or_insert(0) += 1;
                remaining -= size as usize;
            }
            None => {
                tracing::error!(
                    remaining,
                    target,
                    "pack count table has no predecessor; this is a table construction bug"
                );
                return Err(CalculationError::Unreachable);
            }
        }
    }

    Ok(quantities)
}

/// Windowed solver, exact at every order magnitude.
///
/// Works on residue classes, so table sizes are bounded by the pack sizes
/// and never by the order quantity. The residue relaxation for the pack
/// count only applies when its path value fits under the target; when it
/// does not, the target is necessarily smaller than the square of the
/// largest size and the plain count table takes over, still bounded by the
/// catalog alone.
fn solve_windowed(
    items_ordered: u64,
    sizes: &[u64],
) -> Result<BTreeMap<u64, u64>, CalculationError> {
    let target = windowed_target(items_ordered, sizes);
    if let Some(quantities) = windowed_quantities(target, sizes)? {
        return Ok(quantities);
    }
    count_quantities(target, sizes)
}

/// Smallest reachable total at or above the order.
///
/// Shortest-path relaxation over residues modulo the smallest size: for
/// each residue class the minimal reachable value is computed; every value
/// in the class at or above that minimum is reachable by padding with packs
/// of the smallest size. The result is the least per-class candidate at or
/// above the order.
fn windowed_target(items_ordered: u64, sizes: &[u64]) -> u64 {
    let modulus = sizes[0];
    let classes = modulus as usize;

    let mut dist = vec![u64::MAX; classes];
    dist[0] = 0;
    let mut heap = BinaryHeap::new();
    heap.push(Reverse((0u64, 0usize)));
    while let Some(Reverse((value, residue))) = heap.pop() {
        if value > dist[residue] {
            continue;
        }
        for &size in sizes {
            let step = (size % modulus) as usize;
            if step == 0 {
                // Self-loop; never shortens a path.
                continue;
            }
            let next = (residue + step) % classes;
            let next_value = value.saturating_add(size);
            if next_value < dist[next] {
                dist[next] = next_value;
                heap.push(Reverse((next_value, next)));
            }
        }
    }

    let mut best = u64::MAX;
    for &base in dist.iter().filter(|&&base| base != u64::MAX) {
        let candidate = if base >= items_ordered {
            base
        } else {
            let gap = items_ordered - base;
            base + gap.div_ceil(modulus) * modulus
        };
        best = best.min(candidate);
    }
    // Residue 0 is always reachable with value 0, so `best` is finite.
    best
}

/// Residue relaxation for the minimal pack count.
///
/// For a combination summing to `target` with largest size `L`, the pack
/// count equals `(target + sum(L - size)) / L` over all packs used. The
/// per-pack surcharge `L - size` is non-negative, so minimizing the count
/// reduces to a shortest path over residues modulo `L`. The canonical
/// backtrack prefers the smallest size at each step, which matches the
/// table solver's reconstruction exactly; the remainder is covered by
/// packs of the largest size.
///
/// Returns `Ok(None)` when the canonical path value exceeds the target,
/// meaning the relaxation does not apply and the caller must fall back to
/// the count table. A shortest path visits each residue at most once, so
/// its value stays below `L²`; the fallback therefore only triggers for
/// targets below `L²`.
fn windowed_quantities(
    target: u64,
    sizes: &[u64],
) -> Result<Option<BTreeMap<u64, u64>>, CalculationError> {
    let largest = sizes[sizes.len() - 1];
    let classes = largest as usize;

    let mut cost = vec![u64::MAX; classes];
    cost[0] = 0;
    let mut heap = BinaryHeap::new();
    heap.push(Reverse((0u64, 0usize)));
    while let Some(Reverse((surcharge, residue))) = heap.pop() {
        if surcharge > cost[residue] {
            continue;
        }
        for &size in sizes {
            if size == largest {
                continue;
            }
            let next = (residue + size as usize) % classes;
            let next_surcharge = surcharge + (largest - size);
            if next_surcharge < cost[next] {
                cost[next] = next_surcharge;
                heap.push(Reverse((next_surcharge, next)));
            }
        }
    }

    let class = (target % largest) as usize;
    if cost[class] == u64::MAX {
        tracing::error!(
            target,
            "target residue unreachable in the pack count relaxation; this is an engine bug"
        );
        return Err(CalculationError::Unreachable);
    }

    let mut quantities: BTreeMap<u64, u64> = BTreeMap::new();
    let mut residue = class;
    let mut value_used: u64 = 0;
    while cost[residue] > 0 {
        let step = sizes.iter().copied().find(|&size| {
            if size == largest {
                return false;
            }
            let prev = (residue + classes - size as usize % classes) % classes;
            cost[prev] != u64::MAX && cost[prev] + (largest - size) == cost[residue]
        });
        match step {
            Some(size) => {
                *quantities.entry(size).or_insert(0) += 1;
                value_used += size;
                residue = (residue + classes - size as usize % classes) % classes;
            }
            None => {
                tracing::error!(
                    residue = residue as u64,
                    "pack count relaxation has no predecessor; this is an engine bug"
                );
                return Err(CalculationError::Unreachable);
            }
        }
    }

    if value_used > target {
        // The canonical path overshoots small targets; the relaxation does
        // not apply and the count table decides instead.
        return Ok(None);
    }

    let remainder = target - value_used;
    debug_assert_eq!(remainder % largest, 0);
    let largest_count = remainder / largest;
    if largest_count > 0 {
        *quantities.entry(largest).or_insert(0) += largest_count;
    }

    Ok(Some(quantities))
}
