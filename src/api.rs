//! The service facade consumed by any front end.
//!
//! Implements the four-operation contract (query catalog, add size,
//! remove size, calculate) over the catalog and the engine, together with
//! the serde request/response models a boundary adapter serializes. No wire
//! format is mandated here; HTTP, queues or anything else wrap these
//! operations unchanged.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::calculator::{self, CalculationError, SolverStrategy};
use crate::catalog::{CatalogError, PackCatalog, Page};
use crate::config::AppConfig;
use crate::model::Shipment;

/// Request model for a calculation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CalculateRequest {
    pub items_ordered: u64,
}

/// Response model for the current catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackSizesResponse {
    pub pack_sizes: Vec<u64>,
}

/// Response model for a completed calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentResponse {
    pub items_ordered: u64,
    pub total_items: u64,
    pub total_packs: u64,
    pub packs: Vec<PackLine>,
}

/// One pack-size/quantity pair in a shipment response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackLine {
    pub size: u64,
    pub quantity: u64,
}

impl From<Shipment> for ShipmentResponse {
    fn from(shipment: Shipment) -> Self {
        Self {
            items_ordered: shipment.items_ordered,
            total_items: shipment.total_items,
            total_packs: shipment.total_packs,
            packs: shipment
                .allocations
                .iter()
                .map(|a| PackLine {
                    size: a.size,
                    quantity: a.quantity,
                })
                .collect(),
        }
    }
}

/// Structured error model.
///
/// The message is meant to be surfaced to the end user verbatim; the code
/// is stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<CatalogError> for ErrorResponse {
    fn from(err: CatalogError) -> Self {
        Self {
            code: err.code().to_owned(),
            message: err.to_string(),
        }
    }
}

impl From<CalculationError> for ErrorResponse {
    fn from(err: CalculationError) -> Self {
        Self {
            code: err.code().to_owned(),
            message: err.to_string(),
        }
    }
}

/// The pack service: catalog plus engine behind one handle.
///
/// Cloning is cheap and every clone shares the same catalog, so a front
/// end can hand the service to as many workers as it likes; calculations
/// are pure and run in parallel without coordination.
#[derive(Clone)]
pub struct PackService {
    catalog: Arc<PackCatalog>,
    strategy: SolverStrategy,
}

impl PackService {
    /// Creates a service from configuration, seeding the catalog.
    ///
    /// Seed sizes that fail validation are skipped with a warning rather
    /// than aborting startup.
    pub fn from_config(config: &AppConfig) -> Self {
        let catalog = Arc::new(PackCatalog::new());
        for &size in config.catalog.seed_sizes() {
            if let Err(err) = catalog.add(size) {
                tracing::warn!(size, %err, "skipping configured pack size");
            }
        }
        Self {
            catalog,
            strategy: config.calculator.strategy(),
        }
    }

    /// Creates a service around an existing catalog.
    pub fn with_catalog(catalog: Arc<PackCatalog>, strategy: SolverStrategy) -> Self {
        Self { catalog, strategy }
    }

    /// Query operation: the current pack sizes in ascending order.
    pub fn pack_sizes(&self) -> PackSizesResponse {
        PackSizesResponse {
            pack_sizes: self.catalog.list(),
        }
    }

    /// Query operation: one page of the catalog listing.
    pub fn pack_sizes_page(&self, page: u64, limit: u64) -> Page {
        self.catalog.list_page(page, limit)
    }

    /// Mutation operation: adds a pack size and returns the new membership.
    pub fn add_pack_size(&self, size: u64) -> Result<PackSizesResponse, ErrorResponse> {
        self.catalog.add(size)?;
        tracing::info!(size, "pack size added");
        Ok(self.pack_sizes())
    }

    /// Mutation operation: removes a pack size and returns the remaining
    /// membership.
    pub fn remove_pack_size(&self, size: u64) -> Result<PackSizesResponse, ErrorResponse> {
        self.catalog.remove(size)?;
        tracing::info!(size, "pack size removed");
        Ok(self.pack_sizes())
    }

    /// Calculation operation: optimal shipment for an order against the
    /// current catalog snapshot.
    pub fn calculate(&self, request: CalculateRequest) -> Result<ShipmentResponse, ErrorResponse> {
        let snapshot = self.catalog.list();
        let shipment =
            calculator::calculate_with_strategy(request.items_ordered, &snapshot, self.strategy)?;
        tracing::debug!(
            items_ordered = request.items_ordered,
            total_items = shipment.total_items,
            total_packs = shipment.total_packs,
            "calculation finished"
        );
        Ok(shipment.into())
    }
}
