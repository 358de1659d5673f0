//! Order fulfillment from a catalog of fixed pack sizes.
//!
//! Given an order quantity and the configured pack sizes, the engine picks
//! the shipment that never under-ships, minimizes the items shipped and,
//! among those, minimizes the number of packs. See [`calculator::calculate`]
//! for the core operation and [`api::PackService`] for the facade a front
//! end consumes.

pub mod api;
pub mod calculator;
pub mod catalog;
pub mod config;
pub mod model;
