//! Network topology planning.
//!
//! This module turns the tiers of a `NetworkSpec` into subnets and route
//! tables, allocates NAT gateways, binds routes and network ACLs, and plans
//! the VPC-wide resources (gateways, DHCP, VPN, flow logs).

pub mod acl;
pub mod nat;
pub mod network;
pub mod routes;
pub mod tier;
pub mod types;

// Re-export key types and functions for easier access
pub use acl::bind_acl;
pub use nat::{nat_gateway_count, plan_nat};
pub use routes::{bind_routes, Gateways};
pub use tier::{plan_tier, PlanContext};
pub use types::{NatStrategy, RoutePolicy, RouteTableStrategy, Tier, TierRouting};
