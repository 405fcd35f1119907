//! VPC-wide resource planning.
//!
//! Everything that is not tied to a single subnet: the VPC itself, DHCP
//! options, internet and egress-only gateways, subnet groups, the VPN
//! gateway and flow logs.

use crate::config::{FlowLogConfig, NetworkSpec, TierSpec};
use crate::plan::{
    DhcpOptionsPlan, FlowLogPlan, GatewayPlan, IamRolePlan, LogDestination, LogGroupPlan,
    ResourceName, SubnetGroupPlan, TierPlan, VpcPlan, VpnGatewayPlan,
};
use crate::utils::tags::name_tags;

use super::tier::PlanContext;
use super::types::Tier;

const DEFAULT_TENANCY: &str = "default";
const DEFAULT_NAME_SERVER: &str = "AmazonProvidedDNS";
const DEFAULT_AMAZON_SIDE_ASN: &str = "64512";
const DEFAULT_LOG_GROUP_PREFIX: &str = "/aws/vpc-flow-log/";
const DEFAULT_FLOW_LOG_DESTINATION: &str = "cloud-watch-logs";
const DEFAULT_TRAFFIC_TYPE: &str = "ALL";
const DEFAULT_AGGREGATION_INTERVAL: u32 = 600;

/// Plan the VPC resource
pub fn plan_vpc(spec: &NetworkSpec) -> VpcPlan {
    VpcPlan {
        cidr_block: spec.vpc_cidr().to_string(),
        secondary_cidr_blocks: spec.secondary_cidr_blocks.clone(),
        instance_tenancy: spec
            .instance_tenancy
            .clone()
            .unwrap_or_else(|| DEFAULT_TENANCY.to_string()),
        enable_dns_hostnames: spec.enable_dns_hostnames.unwrap_or(true),
        enable_dns_support: spec.enable_dns_support.unwrap_or(true),
        enable_network_address_usage_metrics: spec.enable_network_address_usage_metrics,
        ipv4_ipam_pool_id: spec.ipv4_ipam_pool_id.clone(),
        ipv4_netmask_length: spec.ipv4_netmask_length,
        assign_generated_ipv6_cidr_block: spec.enable_ipv6 && !spec.use_ipam_pool,
        ipv6_cidr_block: spec.ipv6_cidr.clone(),
        ipv6_ipam_pool_id: spec.ipv6_ipam_pool_id.clone(),
        ipv6_netmask_length: spec.ipv6_netmask_length,
        ipv6_cidr_block_network_border_group: spec.ipv6_cidr_block_network_border_group.clone(),
        tags: name_tags(&spec.name, [Some(&spec.tags), Some(&spec.vpc_tags)]),
    }
}

/// Plan the DHCP options set, if enabled
pub fn plan_dhcp_options(spec: &NetworkSpec) -> Option<DhcpOptionsPlan> {
    let dhcp = spec.dhcp_options.as_ref().filter(|dhcp| dhcp.enable)?;

    Some(DhcpOptionsPlan {
        domain_name: dhcp.domain_name.clone(),
        domain_name_servers: dhcp
            .domain_name_servers
            .clone()
            .unwrap_or_else(|| vec![DEFAULT_NAME_SERVER.to_string()]),
        ntp_servers: dhcp.ntp_servers.clone(),
        netbios_name_servers: dhcp.netbios_name_servers.clone(),
        netbios_node_type: dhcp.netbios_node_type.clone(),
        ipv6_address_preferred_lease_time: dhcp
            .ipv6_address_preferred_lease_time
            .map(|seconds| seconds.to_string()),
        tags: name_tags(&spec.name, [Some(&spec.tags), Some(&dhcp.tags)]),
    })
}

/// Plan the internet gateway and the egress-only gateway
pub fn plan_gateways(spec: &NetworkSpec) -> (Option<GatewayPlan>, Option<GatewayPlan>) {
    let internet_gateway = spec.create_igw.then(|| GatewayPlan {
        tags: name_tags(&spec.name, [Some(&spec.tags), Some(&spec.igw_tags)]),
    });
    let egress_only_gateway = (spec.enable_ipv6 && spec.create_egress_only_igw)
        .then(|| GatewayPlan { tags: Default::default() });

    (internet_gateway, egress_only_gateway)
}

/// Plan the subnet group of a database, elasticache or redshift tier
pub fn plan_subnet_group(
    tier: Tier,
    spec: &TierSpec,
    members: &[usize],
    ctx: &PlanContext,
) -> Option<SubnetGroupPlan> {
    if !tier.supports_subnet_group() || !spec.create_subnet_group.unwrap_or(true) || members.is_empty() {
        return None;
    }

    let name = spec
        .subnet_group_name
        .clone()
        .unwrap_or_else(|| format!("{}-{}", ctx.name, tier.key()));
    let tags = name_tags(&name, [Some(ctx.tags), Some(&spec.subnet_group_tags)]);

    Some(SubnetGroupPlan {
        tier,
        name,
        members: members.to_vec(),
        tags,
    })
}

/// Plan the VPN gateway.
///
/// `tiers` must already carry their route tables so propagations can point
/// at them.
pub fn plan_vpn_gateway(spec: &NetworkSpec, tiers: &[TierPlan]) -> Option<VpnGatewayPlan> {
    if !spec.enable_vpn_gateway {
        return None;
    }

    if let Some(id) = &spec.vpn_gateway_id {
        return Some(VpnGatewayPlan::Attach {
            vpn_gateway_id: id.clone(),
        });
    }

    let propagated = [
        (Tier::Private, spec.propagate_private_route_tables_vgw),
        (Tier::Public, spec.propagate_public_route_tables_vgw),
        (Tier::Intra, spec.propagate_intra_route_tables_vgw),
    ];
    let propagations = propagated
        .into_iter()
        .filter(|(_, enabled)| *enabled)
        .filter_map(|(tier, _)| tiers.iter().find(|plan| plan.tier == tier))
        .flat_map(|plan| plan.route_tables.iter().map(|table| table.reference()))
        .collect();

    Some(VpnGatewayPlan::Create {
        amazon_side_asn: spec
            .amazon_side_asn
            .clone()
            .unwrap_or_else(|| DEFAULT_AMAZON_SIDE_ASN.to_string()),
        availability_zone: spec.vpn_gateway_az.clone(),
        propagations,
        tags: name_tags(&spec.name, [Some(&spec.tags), Some(&spec.vpn_gateway_tags)]),
    })
}

/// Plan the VPC flow log, if enabled
pub fn plan_flow_log(spec: &NetworkSpec) -> Option<FlowLogPlan> {
    let flow_log = spec.flow_log.as_ref().filter(|flow_log| flow_log.enable)?;
    let cloud_watch = flow_log.cloud_watch.as_ref();

    let destination = match cloud_watch {
        Some(cw) if cw.create_log_group => {
            let name = format!(
                "{}{}{}",
                cw.log_group_name_prefix.as_deref().unwrap_or(DEFAULT_LOG_GROUP_PREFIX),
                spec.name,
                cw.log_group_name_suffix.as_deref().unwrap_or("")
            );
            Some(LogDestination::CreateLogGroup(LogGroupPlan {
                name,
                retention_in_days: cw.retention_in_days,
                kms_key_id: cw.kms_key_id.clone(),
                skip_destroy: cw.skip_destroy,
                log_group_class: cw.log_group_class.clone(),
                tags: spec.tags.clone(),
            }))
        }
        _ => flow_log.destination_arn.clone().map(LogDestination::Existing),
    };

    let iam_role = match cloud_watch {
        Some(cw) if cw.create_iam_role => Some(plan_flow_log_role(spec, flow_log)),
        Some(cw) => cw.iam_role_arn.clone().map(IamRolePlan::Existing),
        None => None,
    };

    Some(FlowLogPlan {
        destination,
        iam_role,
        destination_type: flow_log
            .destination_type
            .clone()
            .unwrap_or_else(|| DEFAULT_FLOW_LOG_DESTINATION.to_string()),
        traffic_type: flow_log
            .traffic_type
            .clone()
            .unwrap_or_else(|| DEFAULT_TRAFFIC_TYPE.to_string()),
        max_aggregation_interval: flow_log
            .max_aggregation_interval
            .unwrap_or(DEFAULT_AGGREGATION_INTERVAL),
        log_format: flow_log.log_format.clone(),
        deliver_cross_account_role: flow_log.deliver_cross_account_role.clone(),
        file_format: flow_log.file_format.clone(),
        hive_compatible_partitions: flow_log.hive_compatible_partitions,
        per_hour_partition: flow_log.per_hour_partition,
        tags: name_tags(&spec.name, [Some(&spec.tags), Some(&flow_log.tags)]),
    })
}

fn plan_flow_log_role(spec: &NetworkSpec, flow_log: &FlowLogConfig) -> IamRolePlan {
    let role_name = resource_name(
        flow_log.iam_role_name.as_deref(),
        flow_log.iam_role_use_name_prefix,
        &format!("{}-vpc-flow-log-role", spec.name),
    );
    let policy_name = resource_name(
        flow_log.iam_policy_name.as_deref(),
        flow_log.iam_policy_use_name_prefix,
        &format!("{}-vpc-flow-log-to-cloudwatch", spec.name),
    );

    IamRolePlan::Create {
        role_name,
        policy_name,
        permissions_boundary: flow_log.permissions_boundary.clone(),
        tags: spec.tags.clone(),
    }
}

/// Exact name, or a generated-name prefix ending in `-` by default
fn resource_name(explicit: Option<&str>, use_prefix: bool, default: &str) -> ResourceName {
    match (explicit, use_prefix) {
        (Some(name), true) => ResourceName::Prefix(name.to_string()),
        (None, true) => ResourceName::Prefix(format!("{}-", default)),
        (Some(name), false) => ResourceName::Exact(name.to_string()),
        (None, false) => ResourceName::Exact(default.to_string()),
    }
}
