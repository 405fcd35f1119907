//! # Topology Plan Module
//!
//! This module defines the output of topology planning and the contract
//! with the provisioning backend that consumes it.
//!
//! ## Key Components
//!
//! - `types.rs`: the `Plan` value and its parts (subnets, route tables,
//!   NAT gateways, ACLs, subnet groups, VPN, flow logs)
//! - `intents.rs`: flattening a plan into ordered resource-creation intents
//! - `backend.rs`: the `ProvisioningBackend` trait and a dry-run backend
//!
//! ## Lifecycle
//!
//! 1. **Assembly**: the orchestrator builds a `Plan` in one pass
//! 2. **Hand-off**: ownership moves to the caller; the plan is never mutated
//! 3. **Apply**: a backend ensures each intent in order
//!
//! Discarding the plan before applying it is the only form of cancellation.

pub mod backend;
pub mod intents;
pub mod types;

pub use backend::{apply_plan, BackendError, DryRunBackend, ProvisioningBackend, ResourceRef};
pub use intents::Intent;
pub use types::*;
