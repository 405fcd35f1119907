//! Resource-creation intents.
//!
//! A plan is consumed by the provisioning backend as a flat, ordered list of
//! intents. Each intent names one resource by a stable key; the backend
//! looks the details up in the plan. The order is fixed:
//!
//! ```text
//! VPC -> DHCP options -> gateways -> route tables -> routes -> subnets
//!     -> associations -> NAT resources -> subnet groups -> ACLs -> VPN
//!     -> flow logs
//! ```

use serde::Serialize;
use std::fmt;

use crate::config::Tier;
use super::types::{IamRolePlan, IpSource, LogDestination, Plan, RouteTableRef, VpnGatewayPlan};

/// One resource the backend must ensure exists
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    Vpc,
    SecondaryCidr { index: usize },
    DhcpOptions,
    DhcpOptionsAssociation,
    InternetGateway,
    EgressOnlyGateway,
    RouteTable { table: RouteTableRef },
    Route { table: RouteTableRef, index: usize },
    Subnet { tier: Tier, ordinal: usize },
    RouteTableAssociation { tier: Tier, ordinal: usize, table: RouteTableRef },
    ElasticIp { nat: usize },
    NatGateway { nat: usize },
    SubnetGroup { tier: Tier },
    NetworkAcl { tier: Tier },
    NetworkAclRule { tier: Tier, egress: bool, index: usize },
    VpnGatewayAttachment,
    VpnGateway,
    VpnRoutePropagation { table: RouteTableRef },
    FlowLogGroup,
    FlowLogRole,
    FlowLogRolePolicy,
    FlowLog,
}

impl Intent {
    /// Short resource kind, used for identifiers and log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Intent::Vpc => "vpc",
            Intent::SecondaryCidr { .. } => "secondary-cidr",
            Intent::DhcpOptions => "dhcp-options",
            Intent::DhcpOptionsAssociation => "dhcp-options-association",
            Intent::InternetGateway => "igw",
            Intent::EgressOnlyGateway => "eigw",
            Intent::RouteTable { .. } => "route-table",
            Intent::Route { .. } => "route",
            Intent::Subnet { .. } => "subnet",
            Intent::RouteTableAssociation { .. } => "route-table-association",
            Intent::ElasticIp { .. } => "eip",
            Intent::NatGateway { .. } => "nat-gateway",
            Intent::SubnetGroup { .. } => "subnet-group",
            Intent::NetworkAcl { .. } => "network-acl",
            Intent::NetworkAclRule { .. } => "network-acl-rule",
            Intent::VpnGatewayAttachment => "vpn-gateway-attachment",
            Intent::VpnGateway => "vpn-gateway",
            Intent::VpnRoutePropagation { .. } => "vpn-route-propagation",
            Intent::FlowLogGroup => "flow-log-group",
            Intent::FlowLogRole => "flow-log-role",
            Intent::FlowLogRolePolicy => "flow-log-role-policy",
            Intent::FlowLog => "flow-log",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::SecondaryCidr { index } => write!(f, "{}-{}", self.kind(), index),
            Intent::RouteTable { table } | Intent::VpnRoutePropagation { table } => {
                write!(f, "{}-{}-{}", self.kind(), table.tier, table.ordinal)
            }
            Intent::Route { table, index } => {
                write!(f, "{}-{}-{}-{}", self.kind(), table.tier, table.ordinal, index)
            }
            Intent::Subnet { tier, ordinal } | Intent::RouteTableAssociation { tier, ordinal, .. } => {
                write!(f, "{}-{}-{}", self.kind(), tier, ordinal)
            }
            Intent::ElasticIp { nat } | Intent::NatGateway { nat } => {
                write!(f, "{}-{}", self.kind(), nat)
            }
            Intent::SubnetGroup { tier } | Intent::NetworkAcl { tier } => {
                write!(f, "{}-{}", self.kind(), tier)
            }
            Intent::NetworkAclRule { tier, egress, index } => {
                let direction = if *egress { "egress" } else { "ingress" };
                write!(f, "{}-{}-{}-{}", self.kind(), tier, direction, index)
            }
            _ => f.write_str(self.kind()),
        }
    }
}

impl Plan {
    /// Every intent of the plan, in the order the backend must process them
    pub fn intents(&self) -> Vec<Intent> {
        let mut intents = Vec::new();

        let vpc = match &self.vpc {
            Some(vpc) => vpc,
            None => return intents,
        };

        intents.push(Intent::Vpc);
        intents.extend((0..vpc.secondary_cidr_blocks.len()).map(|index| Intent::SecondaryCidr { index }));

        if self.dhcp_options.is_some() {
            intents.push(Intent::DhcpOptions);
            intents.push(Intent::DhcpOptionsAssociation);
        }

        if self.internet_gateway.is_some() {
            intents.push(Intent::InternetGateway);
        }
        if self.egress_only_gateway.is_some() {
            intents.push(Intent::EgressOnlyGateway);
        }

        let tables = self.tiers.iter().flat_map(|tier| tier.route_tables.iter());
        for table in tables.clone() {
            intents.push(Intent::RouteTable { table: table.reference() });
        }
        for table in tables {
            let reference = table.reference();
            intents.extend((0..table.routes.len()).map(|index| Intent::Route { table: reference, index }));
        }

        for subnet in self.tiers.iter().flat_map(|tier| tier.subnets.iter()) {
            intents.push(Intent::Subnet { tier: subnet.tier, ordinal: subnet.ordinal });
        }
        for subnet in self.tiers.iter().flat_map(|tier| tier.subnets.iter()) {
            if let Some(table) = subnet.route_table {
                intents.push(Intent::RouteTableAssociation {
                    tier: subnet.tier,
                    ordinal: subnet.ordinal,
                    table,
                });
            }
        }

        for nat in &self.nat_gateways {
            if matches!(nat.ip_source, IpSource::NewElasticIp { .. }) {
                intents.push(Intent::ElasticIp { nat: nat.ordinal });
            }
            intents.push(Intent::NatGateway { nat: nat.ordinal });
        }

        for tier in &self.tiers {
            if tier.subnet_group.is_some() {
                intents.push(Intent::SubnetGroup { tier: tier.tier });
            }
        }

        for tier in &self.tiers {
            if let Some(acl) = &tier.network_acl {
                intents.push(Intent::NetworkAcl { tier: tier.tier });
                intents.extend((0..acl.ingress.len()).map(|index| Intent::NetworkAclRule {
                    tier: tier.tier,
                    egress: false,
                    index,
                }));
                intents.extend((0..acl.egress.len()).map(|index| Intent::NetworkAclRule {
                    tier: tier.tier,
                    egress: true,
                    index,
                }));
            }
        }

        match &self.vpn_gateway {
            Some(VpnGatewayPlan::Attach { .. }) => intents.push(Intent::VpnGatewayAttachment),
            Some(VpnGatewayPlan::Create { propagations, .. }) => {
                intents.push(Intent::VpnGateway);
                intents.extend(
                    propagations
                        .iter()
                        .map(|table| Intent::VpnRoutePropagation { table: *table }),
                );
            }
            None => {}
        }

        if let Some(flow_log) = &self.flow_log {
            if matches!(flow_log.destination, Some(LogDestination::CreateLogGroup(_))) {
                intents.push(Intent::FlowLogGroup);
            }
            if matches!(flow_log.iam_role, Some(IamRolePlan::Create { .. })) {
                intents.push(Intent::FlowLogRole);
                intents.push(Intent::FlowLogRolePolicy);
            }
            intents.push(Intent::FlowLog);
        }

        intents
    }
}
