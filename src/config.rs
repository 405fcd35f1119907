use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tag map applied to a resource. Ordered so plans serialize identically.
pub type Tags = BTreeMap<String, String>;

/// Network tiers, in the order the planner visits them
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Public,
    Private,
    Database,
    Elasticache,
    Redshift,
    Intra,
    Outpost,
}

impl Tier {
    /// Fixed planning order
    pub const ALL: [Tier; 7] = [
        Tier::Public,
        Tier::Private,
        Tier::Database,
        Tier::Elasticache,
        Tier::Redshift,
        Tier::Intra,
        Tier::Outpost,
    ];

    /// Stable identifier used in intent keys and default subnet group names
    pub fn key(self) -> &'static str {
        match self {
            Tier::Public => "public",
            Tier::Private => "private",
            Tier::Database => "database",
            Tier::Elasticache => "elasticache",
            Tier::Redshift => "redshift",
            Tier::Intra => "intra",
            Tier::Outpost => "outpost",
        }
    }

    /// Name suffix used when the tier spec does not set one
    pub fn default_suffix(self) -> &'static str {
        match self {
            Tier::Database => "db",
            other => other.key(),
        }
    }

    /// Whether the tier can carry a subnet group (RDS, ElastiCache, Redshift)
    pub fn supports_subnet_group(self) -> bool {
        matches!(self, Tier::Database | Tier::Elasticache | Tier::Redshift)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// How many route tables a tier gets
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RouteTableStrategy {
    /// One table shared by every subnet of the tier
    Single,
    /// One table per subnet ordinal
    PerSubnet,
    /// One table per subnet ordinal, named after the subnet's AZ
    PerAz,
}

/// How many NAT gateways to create
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum NatStrategy {
    /// A single gateway shared by every private route table
    Single,
    /// One gateway per availability zone
    OnePerAz,
    /// One gateway per private subnet
    #[default]
    PerSubnet,
}

/// Top-level network definition
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NetworkSpec {
    /// Name used as identifier on every resource
    pub name: String,
    #[serde(default = "default_true")]
    pub create_vpc: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secondary_cidr_blocks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_tenancy: Option<String>,
    /// Ordered availability zones; subnets cycle through them
    #[serde(default)]
    pub azs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_dns_hostnames: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_dns_support: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_network_address_usage_metrics: Option<bool>,
    #[serde(default)]
    pub use_ipam_pool: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_ipam_pool_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_netmask_length: Option<u8>,
    #[serde(default)]
    pub enable_ipv6: bool,
    /// IPv6 block of the VPC; subnet IPv6 CIDRs are derived from it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_ipam_pool_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_netmask_length: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_cidr_block_network_border_group: Option<String>,
    #[serde(default)]
    pub vpc_tags: Tags,
    /// Tags applied to every resource
    #[serde(default)]
    pub tags: Tags,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dhcp_options: Option<DhcpOptionsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_subnets: Option<TierSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_subnets: Option<TierSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_subnets: Option<TierSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elasticache_subnets: Option<TierSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redshift_subnets: Option<TierSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intra_subnets: Option<TierSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outpost_subnets: Option<TierSpec>,

    #[serde(default = "default_true")]
    pub create_igw: bool,
    #[serde(default = "default_true")]
    pub create_egress_only_igw: bool,
    #[serde(default)]
    pub igw_tags: Tags,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nat_gateway: Option<NatGatewayConfig>,

    #[serde(default)]
    pub enable_vpn_gateway: bool,
    /// Existing VPN gateway to attach instead of creating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpn_gateway_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amazon_side_asn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpn_gateway_az: Option<String>,
    #[serde(default)]
    pub propagate_intra_route_tables_vgw: bool,
    #[serde(default)]
    pub propagate_private_route_tables_vgw: bool,
    #[serde(default)]
    pub propagate_public_route_tables_vgw: bool,
    #[serde(default)]
    pub vpn_gateway_tags: Tags,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_log: Option<FlowLogConfig>,
}

impl NetworkSpec {
    /// Validate the network definition
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::InvalidNetwork(
                "name cannot be empty".to_string(),
            ));
        }

        for (tier, spec) in self.tiers() {
            if spec.ipv6_native && !self.enable_ipv6 {
                return Err(ValidationError::InvalidTier(format!(
                    "{} subnets are IPv6-native but enable_ipv6 is false",
                    tier
                )));
            }

            if let Some(acl) = &spec.network_acl {
                for rule in acl.inbound_rules.iter().chain(acl.outbound_rules.iter()) {
                    Self::validate_acl_rule(tier, rule)?;
                }
            }
        }

        Ok(())
    }

    fn validate_acl_rule(tier: Tier, rule: &NetworkAclRule) -> Result<(), ValidationError> {
        match rule.rule_action.to_lowercase().as_str() {
            "allow" | "deny" => {}
            other => {
                return Err(ValidationError::InvalidTier(format!(
                    "{} network ACL rule {} has unknown action '{}'",
                    tier, rule.rule_number, other
                )));
            }
        }
        if rule.cidr_block.is_none() && rule.ipv6_cidr_block.is_none() {
            return Err(ValidationError::InvalidTier(format!(
                "{} network ACL rule {} needs cidr_block or ipv6_cidr_block",
                tier, rule.rule_number
            )));
        }
        Ok(())
    }

    /// Get the spec of one tier, if configured
    pub fn tier(&self, tier: Tier) -> Option<&TierSpec> {
        match tier {
            Tier::Public => self.public_subnets.as_ref(),
            Tier::Private => self.private_subnets.as_ref(),
            Tier::Database => self.database_subnets.as_ref(),
            Tier::Elasticache => self.elasticache_subnets.as_ref(),
            Tier::Redshift => self.redshift_subnets.as_ref(),
            Tier::Intra => self.intra_subnets.as_ref(),
            Tier::Outpost => self.outpost_subnets.as_ref(),
        }
    }

    /// Configured tiers in planning order
    pub fn tiers(&self) -> impl Iterator<Item = (Tier, &TierSpec)> + '_ {
        Tier::ALL
            .into_iter()
            .filter_map(move |tier| self.tier(tier).map(|spec| (tier, spec)))
    }

    /// Number of subnets a tier will get (0 when the tier is absent)
    pub fn subnet_count(&self, tier: Tier) -> usize {
        self.tier(tier).map_or(0, |spec| spec.cidr_blocks.len())
    }

    /// Primary IPv4 block, falling back to 10.0.0.0/16
    pub fn vpc_cidr(&self) -> &str {
        self.cidr.as_deref().unwrap_or(DEFAULT_VPC_CIDR)
    }
}

/// Default VPC IPv4 block
pub const DEFAULT_VPC_CIDR: &str = "10.0.0.0/16";

fn default_true() -> bool {
    true
}

/// One network tier
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct TierSpec {
    pub cidr_blocks: Vec<String>,
    /// IPv6 subnet tags, index-aligned with `cidr_blocks`
    pub ipv6_prefixes: Vec<Option<i64>>,
    /// Explicit subnet names, index-aligned with `cidr_blocks`
    pub names: Vec<String>,
    pub suffix: Option<String>,
    pub ipv6_native: bool,
    pub assign_ipv6_address_on_creation: bool,
    pub enable_dns64: bool,
    pub enable_resource_name_dns_aaaa_record_on_launch: bool,
    pub enable_resource_name_dns_a_record_on_launch: bool,
    pub private_dns_hostname_type_on_launch: Option<String>,
    pub tags: Tags,
    pub tags_per_az: BTreeMap<String, Tags>,
    pub route_table_tags: Tags,

    /// Explicit route table strategy; overrides the tier default
    pub route_table_strategy: Option<RouteTableStrategy>,
    /// Public/intra shorthand for `route_table_strategy: per_subnet`
    pub create_multiple_route_tables: bool,
    /// Database/elasticache/redshift: create dedicated route tables
    pub create_route_table: Option<bool>,
    pub create_internet_gateway_route: bool,
    pub create_nat_gateway_route: Option<bool>,

    pub map_public_ip_on_launch: bool,
    /// Redshift: make the cluster subnets publicly routable
    pub enable_public: bool,

    pub create_subnet_group: Option<bool>,
    pub subnet_group_name: Option<String>,
    pub subnet_group_tags: Tags,

    pub outpost_arn: Option<String>,
    pub customer_owned_ipv4_pool: Option<String>,
    pub map_customer_owned_ip_on_launch: bool,

    pub network_acl: Option<NetworkAclConfig>,
}

impl TierSpec {
    /// Suffix used in generated names
    pub fn suffix_or(&self, tier: Tier) -> &str {
        self.suffix.as_deref().unwrap_or_else(|| tier.default_suffix())
    }

    /// IPv6 prefix tag for an ordinal, if one was given
    pub fn ipv6_prefix(&self, ordinal: usize) -> Option<i64> {
        self.ipv6_prefixes.get(ordinal).copied().flatten()
    }

    /// Explicit name for an ordinal, if one was given and is non-empty
    pub fn explicit_name(&self, ordinal: usize) -> Option<&str> {
        self.names
            .get(ordinal)
            .map(String::as_str)
            .filter(|name| !name.is_empty())
    }

    /// Whether a dedicated network ACL is requested
    pub fn has_dedicated_acl(&self) -> bool {
        self.network_acl.as_ref().map_or(false, |acl| acl.dedicated)
    }
}

/// Network ACL configuration for a tier
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct NetworkAclConfig {
    pub dedicated: bool,
    pub inbound_rules: Vec<NetworkAclRule>,
    pub outbound_rules: Vec<NetworkAclRule>,
    pub tags: Tags,
}

/// A numbered network ACL rule
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NetworkAclRule {
    pub rule_number: u32,
    pub rule_action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_port: Option<u16>,
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr_block: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_cidr_block: Option<String>,
}

/// NAT gateway configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct NatGatewayConfig {
    pub enable: bool,
    pub strategy: NatStrategy,
    pub destination_cidr_block: Option<String>,
    /// Reuse pre-allocated elastic IPs instead of allocating new ones
    pub reuse_eips: bool,
    pub external_nat_ip_ids: Vec<String>,
    pub external_nat_ips: Vec<String>,
    pub tags: Tags,
    pub eip_tags: Tags,
}

/// DHCP options configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct DhcpOptionsConfig {
    pub enable: bool,
    pub domain_name: Option<String>,
    pub domain_name_servers: Option<Vec<String>>,
    pub ntp_servers: Vec<String>,
    pub netbios_name_servers: Vec<String>,
    pub netbios_node_type: Option<String>,
    pub ipv6_address_preferred_lease_time: Option<u32>,
    pub tags: Tags,
}

/// CloudWatch destination settings for flow logs
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct CloudWatchConfig {
    pub create_log_group: bool,
    pub create_iam_role: bool,
    pub iam_role_arn: Option<String>,
    pub log_group_name_prefix: Option<String>,
    pub log_group_name_suffix: Option<String>,
    pub retention_in_days: Option<u32>,
    pub kms_key_id: Option<String>,
    pub skip_destroy: Option<bool>,
    pub log_group_class: Option<String>,
}

/// VPC flow log configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FlowLogConfig {
    pub enable: bool,
    pub iam_role_name: Option<String>,
    pub iam_role_use_name_prefix: bool,
    pub permissions_boundary: Option<String>,
    pub iam_policy_name: Option<String>,
    pub iam_policy_use_name_prefix: bool,
    pub max_aggregation_interval: Option<u32>,
    pub traffic_type: Option<String>,
    pub destination_type: Option<String>,
    pub log_format: Option<String>,
    pub destination_arn: Option<String>,
    pub deliver_cross_account_role: Option<String>,
    pub file_format: Option<String>,
    pub hive_compatible_partitions: Option<bool>,
    pub per_hour_partition: Option<bool>,
    pub tags: Tags,
    pub cloud_watch: Option<CloudWatchConfig>,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid network configuration: {0}")]
    InvalidNetwork(String),
    #[error("Invalid tier configuration: {0}")]
    InvalidTier(String),
}
