//! Tier planning.
//!
//! Expands one tier's CIDR list into subnets (AZ, name, tags, IPv6 block,
//! launch attributes) and decides how many route tables the tier owns and
//! which subnets each one holds.

use crate::config::{NetworkSpec, Tags, TierSpec};
use crate::error::PlanError;
use crate::ip::{az_at, az_index, derive_ipv6};
use crate::plan::{RouteTablePlan, RouteTableRef, SubnetAttributes, SubnetPlan};
use crate::utils::tags::name_tags;

use super::types::{RouteTableStrategy, Tier, TierRouting};

/// Read-only view of the network definition shared by every tier planner
#[derive(Debug, Clone, Copy)]
pub struct PlanContext<'a> {
    pub name: &'a str,
    pub azs: &'a [String],
    /// Global tags applied to every resource
    pub tags: &'a Tags,
    /// Parent block for derived subnet IPv6 CIDRs
    pub ipv6_cidr: Option<&'a str>,
    pub enable_ipv6: bool,
}

impl<'a> PlanContext<'a> {
    pub fn from_spec(spec: &'a NetworkSpec) -> Self {
        PlanContext {
            name: &spec.name,
            azs: &spec.azs,
            tags: &spec.tags,
            ipv6_cidr: spec.ipv6_cidr.as_deref(),
            enable_ipv6: spec.enable_ipv6,
        }
    }
}

/// Plan the subnets and owned route tables of one tier.
///
/// A tier with no CIDR blocks is skipped and yields `([], [])`. Route tables
/// come back without routes; those are bound once NAT gateways are known.
pub fn plan_tier(
    tier: Tier,
    spec: &TierSpec,
    ctx: &PlanContext,
) -> Result<(Vec<SubnetPlan>, Vec<RouteTablePlan>), PlanError> {
    let count = spec.cidr_blocks.len();
    if count == 0 {
        return Ok((Vec::new(), Vec::new()));
    }
    if ctx.azs.is_empty() {
        return Err(PlanError::config(format!(
            "{} subnets have {} CIDR blocks but no availability zones are configured",
            tier, count
        )));
    }

    let routing = TierRouting::resolve(tier, spec);
    let table_count = routing.table_count(count);
    let suffix = spec.suffix_or(tier);

    let mut subnets = Vec::with_capacity(count);
    for (ordinal, cidr) in spec.cidr_blocks.iter().enumerate() {
        subnets.push(plan_subnet(tier, spec, ctx, ordinal, cidr, suffix, table_count)?);
    }

    let mut tables = Vec::with_capacity(table_count);
    for ordinal in 0..table_count {
        let name = match routing.strategy {
            RouteTableStrategy::Single => format!("{}-{}", ctx.name, suffix),
            RouteTableStrategy::PerSubnet | RouteTableStrategy::PerAz => {
                format!("{}-{}-{}", ctx.name, suffix, az_at(ctx.azs, ordinal)?)
            }
        };
        let members = (0..count).filter(|i| i % table_count == ordinal).collect();
        let tags = name_tags(&name, [Some(ctx.tags), Some(&spec.route_table_tags)]);

        tables.push(RouteTablePlan {
            tier,
            ordinal,
            name,
            members,
            routes: Vec::new(),
            tags,
        });
    }

    log::debug!(
        "Planned {} {} subnets with {} route tables",
        subnets.len(),
        tier,
        tables.len()
    );

    Ok((subnets, tables))
}

fn plan_subnet(
    tier: Tier,
    spec: &TierSpec,
    ctx: &PlanContext,
    ordinal: usize,
    cidr: &str,
    suffix: &str,
    table_count: usize,
) -> Result<SubnetPlan, PlanError> {
    let az = az_at(ctx.azs, ordinal)?;
    let ipv6_native = ctx.enable_ipv6 && spec.ipv6_native;

    let name = match spec.explicit_name(ordinal) {
        Some(name) => name.to_string(),
        None => format!("{}-{}-{}", ctx.name, suffix, az),
    };
    let tags = name_tags(
        &name,
        [Some(ctx.tags), Some(&spec.tags), spec.tags_per_az.get(az)],
    );

    let ipv6_cidr_block = match (ctx.enable_ipv6, ctx.ipv6_cidr, spec.ipv6_prefix(ordinal)) {
        (true, Some(parent), Some(tag)) => Some(derive_ipv6(parent, tag)?),
        _ => None,
    };

    let outpost = tier == Tier::Outpost;
    let attributes = SubnetAttributes {
        map_public_ip_on_launch: tier == Tier::Public && spec.map_public_ip_on_launch,
        assign_ipv6_address_on_creation: ipv6_native
            || (ctx.enable_ipv6 && spec.assign_ipv6_address_on_creation),
        enable_dns64: ctx.enable_ipv6 && spec.enable_dns64,
        enable_resource_name_dns_aaaa_record_on_launch: ctx.enable_ipv6
            && spec.enable_resource_name_dns_aaaa_record_on_launch,
        enable_resource_name_dns_a_record_on_launch: !ipv6_native
            && spec.enable_resource_name_dns_a_record_on_launch,
        private_dns_hostname_type_on_launch: spec.private_dns_hostname_type_on_launch.clone(),
        outpost_arn: spec.outpost_arn.clone().filter(|_| outpost),
        customer_owned_ipv4_pool: spec.customer_owned_ipv4_pool.clone().filter(|_| outpost),
        map_customer_owned_ip_on_launch: outpost && spec.map_customer_owned_ip_on_launch,
    };

    Ok(SubnetPlan {
        tier,
        ordinal,
        name,
        availability_zone: az.to_string(),
        az_index: az_index(ctx.azs, ordinal)?,
        cidr_block: if ipv6_native { None } else { Some(cidr.to_string()) },
        ipv6_cidr_block,
        ipv6_native,
        route_table: (table_count > 0).then(|| RouteTableRef {
            tier,
            ordinal: ordinal % table_count,
        }),
        attributes,
        tags,
    })
}
