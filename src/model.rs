//! Data models for pack calculation.
//!
//! This module defines the fundamental value types of the domain:
//! - `PackAllocation`: A pack size together with the number of packs shipped
//! - `Shipment`: The complete answer to an order, with derived totals
//!
//! A `Shipment` is produced fresh per calculation and never mutated
//! afterwards; the derived totals are computed once at construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One line of a shipment: how many packs of a single size are shipped.
///
/// Allocations with a quantity of zero are never part of a shipment.
///
/// # Fields
/// * `size` - The pack size (number of items per pack)
/// * `quantity` - How many packs of this size to ship (always >= 1)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackAllocation {
    pub size: u64,
    pub quantity: u64,
}

impl PackAllocation {
    /// Number of items this allocation contributes to the shipment.
    #[inline]
    pub fn items(&self) -> u64 {
        self.size * self.quantity
    }
}

/// The result of a pack calculation for a single order.
///
/// Invariants (guaranteed by the engine, checked by its tests):
/// * `total_items >= items_ordered` (never under-ship)
/// * no reachable combination has a smaller `total_items`
/// * among combinations with the minimal `total_items`, none uses
///   fewer packs than `total_packs`
///
/// # Fields
/// * `items_ordered` - The order quantity the shipment fulfills
/// * `total_items` - Sum of `size * quantity` over all allocations
/// * `total_packs` - Sum of `quantity` over all allocations
/// * `allocations` - Per-size quantities, ascending by size
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub items_ordered: u64,
    pub total_items: u64,
    pub total_packs: u64,
    pub allocations: Vec<PackAllocation>,
}

impl Shipment {
    /// Builds a shipment from per-size quantities, deriving the totals.
    ///
    /// Zero-quantity entries are omitted. The allocation order follows the
    /// ascending key order of the map, so identical quantities always
    /// produce an identical shipment.
    ///
    /// # Parameters
    /// * `items_ordered` - The order quantity
    /// * `quantities` - Map of pack size to pack count
    pub fn from_quantities(items_ordered: u64, quantities: BTreeMap<u64, u64>) -> Self {
        let allocations: Vec<PackAllocation> = quantities
            .into_iter()
            .filter(|&(_, quantity)| quantity > 0)
            .map(|(size, quantity)| PackAllocation { size, quantity })
            .collect();

        let total_items = allocations.iter().map(PackAllocation::items).sum();
        let total_packs = allocations.iter().map(|a| a.quantity).sum();

        Self {
            items_ordered,
            total_items,
            total_packs,
            allocations,
        }
    }

    /// Items shipped beyond the order quantity.
    pub fn overage(&self) -> u64 {
        self.total_items - self.items_ordered
    }

    /// Quantity shipped for a given pack size (zero if the size is unused).
    pub fn quantity_of(&self, size: u64) -> u64 {
        self.allocations
            .iter()
            .find(|a| a.size == size)
            .map_or(0, |a| a.quantity)
    }
}
