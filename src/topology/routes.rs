//! Route binding.
//!
//! Fills a route table with its default routes once the gateways and NAT
//! gateways are known. Routes are emitted in a fixed order: internet
//! gateway, IPv6 through the internet gateway, NAT, egress-only gateway.

use crate::error::PlanError;
use crate::plan::{Destination, NatPlan, Route, RouteTablePlan, RouteTarget, SubnetPlan};

use super::types::{NatStrategy, RoutePolicy};

const IPV4_DEFAULT: &str = "0.0.0.0/0";
const IPV6_DEFAULT: &str = "::/0";

/// Gateways available to route tables
#[derive(Debug, Clone, Copy)]
pub struct Gateways<'a> {
    pub internet_gateway: bool,
    pub egress_only_gateway: bool,
    pub enable_ipv6: bool,
    /// NAT gateways are enabled
    pub nat_enabled: bool,
    /// Destination of NAT routes
    pub nat_destination: &'a str,
}

/// Index of the NAT gateway a route table sends traffic through
pub fn nat_index_for(
    strategy: NatStrategy,
    table: &RouteTablePlan,
    subnets: &[SubnetPlan],
    nat_count: usize,
) -> usize {
    match strategy {
        NatStrategy::OnePerAz => {
            let az_index = table
                .members
                .first()
                .and_then(|ordinal| subnets.iter().find(|subnet| subnet.ordinal == *ordinal))
                .map_or(table.ordinal, |subnet| subnet.az_index);
            az_index % nat_count
        }
        NatStrategy::Single => 0,
        NatStrategy::PerSubnet => table.ordinal % nat_count,
    }
}

/// Compute the routes of one table.
///
/// `subnets` are the subnets of the table's tier.
pub fn bind_routes(
    table: &RouteTablePlan,
    policy: RoutePolicy,
    strategy: NatStrategy,
    nat_plans: &[NatPlan],
    gateways: &Gateways,
    subnets: &[SubnetPlan],
) -> Result<Vec<Route>, PlanError> {
    let mut routes = Vec::new();

    if policy.internet_gateway && gateways.internet_gateway {
        routes.push(Route {
            destination: Destination::Ipv4(IPV4_DEFAULT.to_string()),
            target: RouteTarget::InternetGateway,
        });
        if policy.internet_gateway_ipv6 && gateways.enable_ipv6 {
            routes.push(Route {
                destination: Destination::Ipv6(IPV6_DEFAULT.to_string()),
                target: RouteTarget::InternetGateway,
            });
        }
    }

    if policy.nat_gateway && gateways.nat_enabled {
        if nat_plans.is_empty() {
            return Err(PlanError::config(format!(
                "route table {} wants a NAT route but no NAT gateways were planned",
                table.name
            )));
        }
        let index = nat_index_for(strategy, table, subnets, nat_plans.len());
        routes.push(Route {
            destination: Destination::Ipv4(gateways.nat_destination.to_string()),
            target: RouteTarget::NatGateway(index),
        });
    }

    if policy.egress_only && gateways.enable_ipv6 && gateways.egress_only_gateway {
        routes.push(Route {
            destination: Destination::Ipv6(IPV6_DEFAULT.to_string()),
            target: RouteTarget::EgressOnlyGateway,
        });
    }

    Ok(routes)
}
