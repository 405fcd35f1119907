//! Plan type definitions.
//!
//! This module contains the data structures of a finished topology plan:
//! the VPC itself, its gateways, one `TierPlan` per populated tier (subnets,
//! route tables, ACL, subnet group), NAT gateways, VPN and flow logs.
//! Everything derives `PartialEq` so two plans can be compared deeply.

use serde::Serialize;

use crate::config::{NetworkAclRule, Tags, Tier};

// ============================================================================
// Plan Root
// ============================================================================

/// Complete, side-effect-free output of topology planning.
///
/// Built once by the assembler and handed to the provisioning backend as an
/// immutable value.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Plan {
    /// Name used as identifier on every resource
    pub name: String,
    /// VPC to create (absent when `create_vpc` is false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc: Option<VpcPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_options: Option<DhcpOptionsPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internet_gateway: Option<GatewayPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub egress_only_gateway: Option<GatewayPlan>,
    /// Populated tiers in planning order
    pub tiers: Vec<TierPlan>,
    pub nat_gateways: Vec<NatPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpn_gateway: Option<VpnGatewayPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_log: Option<FlowLogPlan>,
}

impl Plan {
    /// A plan that creates nothing
    pub fn empty(name: &str) -> Self {
        Plan {
            name: name.to_string(),
            vpc: None,
            dhcp_options: None,
            internet_gateway: None,
            egress_only_gateway: None,
            tiers: Vec::new(),
            nat_gateways: Vec::new(),
            vpn_gateway: None,
            flow_log: None,
        }
    }

    /// Plan of one tier, if the tier has subnets
    pub fn tier(&self, tier: Tier) -> Option<&TierPlan> {
        self.tiers.iter().find(|plan| plan.tier == tier)
    }

    /// Look up a route table by reference
    pub fn route_table(&self, table: RouteTableRef) -> Option<&RouteTablePlan> {
        self.tier(table.tier)?.route_tables.get(table.ordinal)
    }

    /// Total number of planned subnets across all tiers
    pub fn subnet_count(&self) -> usize {
        self.tiers.iter().map(|tier| tier.subnets.len()).sum()
    }

    /// Total number of planned route tables across all tiers
    pub fn route_table_count(&self) -> usize {
        self.tiers.iter().map(|tier| tier.route_tables.len()).sum()
    }
}

/// VPC resource
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct VpcPlan {
    pub cidr_block: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub secondary_cidr_blocks: Vec<String>,
    pub instance_tenancy: String,
    pub enable_dns_hostnames: bool,
    pub enable_dns_support: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_network_address_usage_metrics: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4_ipam_pool_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv4_netmask_length: Option<u8>,
    pub assign_generated_ipv6_cidr_block: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6_cidr_block: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6_ipam_pool_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6_netmask_length: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6_cidr_block_network_border_group: Option<String>,
    pub tags: Tags,
}

/// DHCP options set, associated with the VPC
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DhcpOptionsPlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
    pub domain_name_servers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ntp_servers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub netbios_name_servers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netbios_node_type: Option<String>,
    /// Lease time in seconds, as the string the API expects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6_address_preferred_lease_time: Option<String>,
    pub tags: Tags,
}

/// Internet or egress-only gateway attached to the VPC
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GatewayPlan {
    pub tags: Tags,
}

// ============================================================================
// Tier Types
// ============================================================================

/// Everything planned for one tier
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TierPlan {
    pub tier: Tier,
    pub subnets: Vec<SubnetPlan>,
    /// Route tables owned by this tier (empty when it borrows another tier's)
    pub route_tables: Vec<RouteTablePlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_acl: Option<AclPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_group: Option<SubnetGroupPlan>,
}

impl TierPlan {
    /// Ordinals of every subnet in the tier
    pub fn subnet_ordinals(&self) -> Vec<usize> {
        self.subnets.iter().map(|subnet| subnet.ordinal).collect()
    }
}

/// Identity of a route table: owning tier plus ordinal within that tier
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteTableRef {
    pub tier: Tier,
    pub ordinal: usize,
}

/// One planned subnet
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SubnetPlan {
    pub tier: Tier,
    pub ordinal: usize,
    pub name: String,
    pub availability_zone: String,
    /// Always `ordinal % azs.len()`
    pub az_index: usize,
    /// IPv4 block; absent for IPv6-native subnets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidr_block: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6_cidr_block: Option<String>,
    pub ipv6_native: bool,
    /// Route table the subnet is associated with (main table when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_table: Option<RouteTableRef>,
    pub attributes: SubnetAttributes,
    pub tags: Tags,
}

/// Launch-time attributes passed through to the subnet resource
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct SubnetAttributes {
    pub map_public_ip_on_launch: bool,
    pub assign_ipv6_address_on_creation: bool,
    pub enable_dns64: bool,
    pub enable_resource_name_dns_aaaa_record_on_launch: bool,
    pub enable_resource_name_dns_a_record_on_launch: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_dns_hostname_type_on_launch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outpost_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_owned_ipv4_pool: Option<String>,
    pub map_customer_owned_ip_on_launch: bool,
}

/// One planned route table
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RouteTablePlan {
    pub tier: Tier,
    pub ordinal: usize,
    pub name: String,
    /// Ordinals of the tier's subnets associated with this table
    pub members: Vec<usize>,
    /// Routes in emission order
    pub routes: Vec<Route>,
    pub tags: Tags,
}

impl RouteTablePlan {
    pub fn reference(&self) -> RouteTableRef {
        RouteTableRef {
            tier: self.tier,
            ordinal: self.ordinal,
        }
    }
}

/// Route destination
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Ipv4(String),
    Ipv6(String),
}

/// Route target
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RouteTarget {
    InternetGateway,
    /// Index into `Plan::nat_gateways`
    NatGateway(usize),
    EgressOnlyGateway,
}

/// A single route entry
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub destination: Destination,
    pub target: RouteTarget,
}

/// Dedicated network ACL covering every subnet of a tier
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AclPlan {
    pub tier: Tier,
    pub name: String,
    pub members: Vec<usize>,
    /// Inbound rules, in the order they were given
    pub ingress: Vec<NetworkAclRule>,
    /// Outbound rules, in the order they were given
    pub egress: Vec<NetworkAclRule>,
    pub tags: Tags,
}

/// RDS / ElastiCache / Redshift subnet group
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SubnetGroupPlan {
    pub tier: Tier,
    pub name: String,
    pub members: Vec<usize>,
    pub tags: Tags,
}

// ============================================================================
// NAT Types
// ============================================================================

/// Where a NAT gateway's public address comes from
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum IpSource {
    /// Allocate a fresh elastic IP
    NewElasticIp { tags: Tags },
    /// Reuse an existing allocation
    ReusedAllocationId {
        allocation_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        public_ip: Option<String>,
    },
}

/// One planned NAT gateway
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NatPlan {
    pub ordinal: usize,
    pub name: String,
    pub ip_source: IpSource,
    /// Ordinal of the public subnet hosting the gateway
    pub host_subnet: usize,
    pub tags: Tags,
}

// ============================================================================
// VPN and Flow Log Types
// ============================================================================

/// VPN gateway handling
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum VpnGatewayPlan {
    /// Attach an existing gateway to the VPC
    Attach { vpn_gateway_id: String },
    /// Create a new gateway and propagate its routes
    Create {
        amazon_side_asn: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        availability_zone: Option<String>,
        propagations: Vec<RouteTableRef>,
        tags: Tags,
    },
}

/// Exact name or generated name with a prefix
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResourceName {
    Exact(String),
    Prefix(String),
}

/// CloudWatch log group receiving flow logs
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LogGroupPlan {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_in_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kms_key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_destroy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_group_class: Option<String>,
    pub tags: Tags,
}

/// Flow log destination
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LogDestination {
    CreateLogGroup(LogGroupPlan),
    Existing(String),
}

/// IAM role the flow log service assumes
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum IamRolePlan {
    Create {
        role_name: ResourceName,
        policy_name: ResourceName,
        #[serde(skip_serializing_if = "Option::is_none")]
        permissions_boundary: Option<String>,
        tags: Tags,
    },
    Existing(String),
}

/// VPC flow log
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FlowLogPlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<LogDestination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iam_role: Option<IamRolePlan>,
    pub destination_type: String,
    pub traffic_type: String,
    pub max_aggregation_interval: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deliver_cross_account_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hive_compatible_partitions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_hour_partition: Option<bool>,
    pub tags: Tags,
}
