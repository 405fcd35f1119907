//! NAT gateway allocation.
//!
//! Decides how many NAT gateways exist, which public subnet hosts each one,
//! and whether each gets a fresh elastic IP or reuses an external one. All
//! of it is a pure function of the strategy and the tier sizes.

use crate::config::NatGatewayConfig;
use crate::error::PlanError;
use crate::plan::{IpSource, NatPlan};
use crate::utils::tags::name_tags;

use super::tier::PlanContext;
use super::types::NatStrategy;

/// Number of NAT gateways for a strategy
pub fn nat_gateway_count(strategy: NatStrategy, az_count: usize, private_count: usize) -> usize {
    match strategy {
        NatStrategy::OnePerAz => az_count,
        NatStrategy::Single => 1,
        NatStrategy::PerSubnet => private_count,
    }
}

/// Ordinal of the public subnet hosting NAT gateway `ordinal`.
///
/// `az_count` and `public_count` must be non-zero. Outside `OnePerAz` the
/// host follows AZ rotation, which spreads gateways unevenly when
/// `public_count` is not a multiple of `az_count`.
pub(crate) fn nat_host_subnet(
    strategy: NatStrategy,
    ordinal: usize,
    az_count: usize,
    public_count: usize,
) -> usize {
    match strategy {
        NatStrategy::OnePerAz => ordinal % public_count,
        NatStrategy::Single | NatStrategy::PerSubnet => (ordinal / az_count) % public_count,
    }
}

/// Plan the NAT gateways of the network.
///
/// Returns no gateways when NAT is disabled or either the public or the
/// private tier has no subnets.
pub fn plan_nat(
    config: &NatGatewayConfig,
    az_count: usize,
    public_count: usize,
    private_count: usize,
    ctx: &PlanContext,
) -> Result<Vec<NatPlan>, PlanError> {
    if !config.enable || public_count == 0 || private_count == 0 {
        return Ok(Vec::new());
    }
    if az_count == 0 {
        return Err(PlanError::config(format!(
            "NAT strategy {:?} needs at least one availability zone",
            config.strategy
        )));
    }

    let count = nat_gateway_count(config.strategy, az_count, private_count);
    let reuse = config.reuse_eips && !config.external_nat_ip_ids.is_empty();

    let nat_plans: Vec<NatPlan> = (0..count)
        .map(|ordinal| {
            let name = format!("{}-nat-{}", ctx.name, ordinal);
            let ip_source = if reuse {
                let ids = &config.external_nat_ip_ids;
                IpSource::ReusedAllocationId {
                    allocation_id: ids[ordinal % ids.len()].clone(),
                    public_ip: config.external_nat_ips.get(ordinal).cloned(),
                }
            } else {
                IpSource::NewElasticIp {
                    tags: name_tags(&name, [Some(ctx.tags), Some(&config.eip_tags)]),
                }
            };

            NatPlan {
                ordinal,
                host_subnet: nat_host_subnet(config.strategy, ordinal, az_count, public_count),
                ip_source,
                tags: name_tags(&name, [Some(ctx.tags), Some(&config.tags)]),
                name,
            }
        })
        .collect();

    log::info!(
        "Planned {} NAT gateways ({:?}, {} reused IPs)",
        nat_plans.len(),
        config.strategy,
        if reuse { nat_plans.len() } else { 0 }
    );

    Ok(nat_plans)
}
