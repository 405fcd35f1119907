//! Topology type definitions.
//!
//! This file contains the per-tier routing rules: whether a tier owns its
//! route tables, how many it gets, which routes they carry, and which tier
//! lends its tables when it owns none.

/// Re-export types from config to keep the topology API in one place
pub use crate::config::{NatStrategy, RouteTableStrategy, Tier};

use crate::config::TierSpec;

/// Which routes a tier's route tables want
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoutePolicy {
    /// `0.0.0.0/0` through the internet gateway
    pub internet_gateway: bool,
    /// `::/0` through the internet gateway; public tables only
    pub internet_gateway_ipv6: bool,
    /// Default route through a NAT gateway
    pub nat_gateway: bool,
    /// `::/0` through the egress-only gateway
    pub egress_only: bool,
}

/// Resolved routing rules for one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierRouting {
    /// Whether the tier gets route tables of its own
    pub owns_route_tables: bool,
    pub strategy: RouteTableStrategy,
    pub policy: RoutePolicy,
    /// Tier whose tables this tier's subnets join when it owns none
    pub fallback: Option<Tier>,
}

impl TierRouting {
    /// Resolve the routing rules of `tier` from its spec and the tier defaults
    pub fn resolve(tier: Tier, spec: &TierSpec) -> Self {
        let multiple = if spec.create_multiple_route_tables {
            RouteTableStrategy::PerSubnet
        } else {
            RouteTableStrategy::Single
        };

        let (owns_route_tables, default_strategy, policy, fallback) = match tier {
            Tier::Public => (
                true,
                multiple,
                RoutePolicy {
                    internet_gateway: true,
                    internet_gateway_ipv6: true,
                    ..RoutePolicy::default()
                },
                None,
            ),
            Tier::Private => (
                true,
                RouteTableStrategy::PerSubnet,
                RoutePolicy {
                    nat_gateway: spec.create_nat_gateway_route.unwrap_or(true),
                    egress_only: true,
                    ..RoutePolicy::default()
                },
                None,
            ),
            Tier::Database => (
                spec.create_route_table.unwrap_or(false),
                RouteTableStrategy::PerSubnet,
                RoutePolicy {
                    internet_gateway: spec.create_internet_gateway_route,
                    nat_gateway: spec.create_nat_gateway_route.unwrap_or(false),
                    egress_only: true,
                    ..RoutePolicy::default()
                },
                Some(Tier::Private),
            ),
            Tier::Elasticache => (
                spec.create_route_table.unwrap_or(false),
                RouteTableStrategy::Single,
                RoutePolicy {
                    nat_gateway: spec.create_nat_gateway_route.unwrap_or(false),
                    egress_only: true,
                    ..RoutePolicy::default()
                },
                Some(Tier::Private),
            ),
            Tier::Redshift => (
                spec.create_route_table.unwrap_or(false),
                RouteTableStrategy::Single,
                RoutePolicy {
                    internet_gateway: spec.enable_public,
                    nat_gateway: spec.create_nat_gateway_route.unwrap_or(false),
                    egress_only: true,
                    ..RoutePolicy::default()
                },
                Some(if spec.enable_public { Tier::Public } else { Tier::Private }),
            ),
            Tier::Intra => (true, multiple, RoutePolicy::default(), None),
            Tier::Outpost => (
                false,
                RouteTableStrategy::PerSubnet,
                RoutePolicy::default(),
                Some(Tier::Private),
            ),
        };

        TierRouting {
            owns_route_tables,
            strategy: spec.route_table_strategy.unwrap_or(default_strategy),
            policy,
            fallback,
        }
    }

    /// Number of route tables for a tier with `subnet_count` subnets
    pub fn table_count(&self, subnet_count: usize) -> usize {
        if !self.owns_route_tables || subnet_count == 0 {
            return 0;
        }
        match self.strategy {
            RouteTableStrategy::Single => 1,
            // One table per subnet ordinal, even when AZs repeat
            RouteTableStrategy::PerSubnet | RouteTableStrategy::PerAz => subnet_count,
        }
    }
}
