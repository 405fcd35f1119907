//! # Vpcplan - Topology planner for multi-tier VPC networks
//!
//! This library turns a declarative network definition into a complete,
//! side-effect-free plan of the resources a multi-tier VPC needs: subnets,
//! route tables and routes, internet/egress-only/NAT gateways, network
//! ACLs, subnet groups, VPN gateway and flow logs.
//!
//! ## Overview
//!
//! Planning happens entirely before anything is provisioned. The planner
//! decides which resources exist and how they relate (subnet to AZ, subnet
//! to route table, route table to NAT gateway, subnet to network ACL), then
//! hands the finished `Plan` to a provisioning backend as an ordered list
//! of intents.
//!
//! ## Key Features
//!
//! - **Seven Tiers**: public, private, database, elasticache, redshift, intra, outpost
//! - **AZ Cycling**: subnets spread round-robin across availability zones
//! - **NAT Strategies**: single, one per AZ, or one per private subnet
//! - **IPv6**: dual-stack and IPv6-native subnets derived from the VPC block
//! - **Deterministic**: identical input always yields a deeply equal plan
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `config`: Type-safe network definition structures and YAML parsing
//! - `config_loader`: Network file loading and validation
//! - `ip`: AZ cycling and IPv6 sub-allocation
//! - `topology`: Tier planning, NAT allocation, route and ACL binding
//! - `plan`: The plan value, its intents and the backend seam
//! - `utils`: Tag merging, CIDR helpers and configuration lints
//! - `orchestrator`: Assembly of the full plan and plan output
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use vpcplan::{config_loader, orchestrator};
//! use vpcplan::plan::{apply_plan, DryRunBackend};
//!
//! // Load the network definition from a YAML file
//! let spec = config_loader::load_config(Path::new("network.yaml"))?;
//!
//! // Build the plan
//! let plan = orchestrator::assemble_plan(&spec)?;
//!
//! // Walk every intent without provisioning anything
//! let mut backend = DryRunBackend::new();
//! apply_plan(&plan, &mut backend)?;
//! # Ok::<(), color_eyre::Report>(())
//! ```
//!
//! ## Network File Format
//!
//! ```yaml
//! name: prod
//! cidr: "10.0.0.0/16"
//! azs: ["eu-west-1a", "eu-west-1b"]
//!
//! public_subnets:
//!   cidr_blocks: ["10.0.0.0/24", "10.0.1.0/24"]
//! private_subnets:
//!   cidr_blocks: ["10.0.10.0/24", "10.0.11.0/24"]
//! database_subnets:
//!   cidr_blocks: ["10.0.20.0/24", "10.0.21.0/24"]
//!
//! nat_gateway:
//!   enable: true
//!   strategy: one_per_az   # single / one_per_az / per_subnet
//! ```
//!
//! ## Error Handling
//!
//! Planning errors are `error::PlanError` values; nothing is planned when
//! one occurs. Loading and output use `color_eyre` for error reporting with
//! context.

pub mod config;
pub mod config_loader;
pub mod error;
pub mod ip;
pub mod orchestrator;
pub mod plan;
pub mod topology;
pub mod utils;
