//! Configuration lint utilities.
//!
//! Lints flag input that plans successfully but probably does not do what
//! the author intended. They never fail planning: every finding is logged
//! as a warning and returned so callers and tests can inspect it.

use std::collections::BTreeSet;

use crate::config::{NetworkSpec, Tier};
use crate::topology::nat::nat_host_subnet;
use crate::topology::nat_gateway_count;
use crate::utils::ip_utils::{is_valid_ip, is_valid_ipv4_cidr, is_valid_ipv6_cidr, prefix_len};

/// Parent IPv6 prefix length the 8-bit subnet field is sized for
const EXPECTED_IPV6_PREFIX: u8 = 56;

/// Run every lint over a network spec, logging each finding.
///
/// # Returns
/// The warning messages, in the order they were found
pub fn lint_network_spec(spec: &NetworkSpec) -> Vec<String> {
    let mut warnings = Vec::new();

    lint_cidrs(spec, &mut warnings);
    lint_ipv6(spec, &mut warnings);
    lint_names(spec, &mut warnings);
    lint_nat(spec, &mut warnings);

    for warning in &warnings {
        log::warn!("{}", warning);
    }

    warnings
}

fn lint_cidrs(spec: &NetworkSpec, warnings: &mut Vec<String>) {
    if !is_valid_ipv4_cidr(spec.vpc_cidr()) {
        warnings.push(format!("VPC CIDR '{}' is not a valid IPv4 block", spec.vpc_cidr()));
    }

    for (tier, tier_spec) in spec.tiers() {
        if spec.enable_ipv6 && tier_spec.ipv6_native {
            continue;
        }
        for (i, cidr) in tier_spec.cidr_blocks.iter().enumerate() {
            if !is_valid_ipv4_cidr(cidr) {
                warnings.push(format!(
                    "{} subnet {} has CIDR '{}' which is not a valid IPv4 block",
                    tier, i, cidr
                ));
            }
        }
    }
}

fn lint_ipv6(spec: &NetworkSpec, warnings: &mut Vec<String>) {
    let has_prefixes = spec
        .tiers()
        .any(|(_, tier_spec)| tier_spec.ipv6_prefixes.iter().any(Option::is_some));

    match spec.ipv6_cidr.as_deref() {
        Some(parent) if spec.enable_ipv6 => {
            if !is_valid_ipv6_cidr(parent) {
                warnings.push(format!("IPv6 CIDR '{}' is not a valid IPv6 block", parent));
            } else if let Some(len) = prefix_len(parent) {
                if len != EXPECTED_IPV6_PREFIX {
                    warnings.push(format!(
                        "IPv6 CIDR '{}' is a /{}; derived subnets assume a /{} parent",
                        parent, len, EXPECTED_IPV6_PREFIX
                    ));
                }
            }
        }
        None if spec.enable_ipv6 && has_prefixes => {
            warnings.push(
                "ipv6_prefixes are set but ipv6_cidr is unknown; subnets get no IPv6 block"
                    .to_string(),
            );
        }
        _ => {}
    }

    if !spec.enable_ipv6 {
        return;
    }

    for (tier, tier_spec) in spec.tiers() {
        if tier_spec.ipv6_native && tier_spec.ipv6_prefixes.len() < tier_spec.cidr_blocks.len() {
            warnings.push(format!(
                "{} subnets: {} IPv6 prefixes for {} CIDR blocks; the rest get no IPv6 block",
                tier,
                tier_spec.ipv6_prefixes.len(),
                tier_spec.cidr_blocks.len()
            ));
        }
    }
}

fn lint_names(spec: &NetworkSpec, warnings: &mut Vec<String>) {
    for (tier, tier_spec) in spec.tiers() {
        if tier_spec.names.len() > tier_spec.cidr_blocks.len() {
            warnings.push(format!(
                "{} subnets: {} names for {} CIDR blocks; extra names are ignored",
                tier,
                tier_spec.names.len(),
                tier_spec.cidr_blocks.len()
            ));
        }
    }
}

fn lint_nat(spec: &NetworkSpec, warnings: &mut Vec<String>) {
    let nat = match &spec.nat_gateway {
        Some(nat) if nat.enable => nat,
        _ => return,
    };

    let az_count = spec.azs.len();
    let public_count = spec.subnet_count(Tier::Public);
    let private_count = spec.subnet_count(Tier::Private);
    if az_count > 0 && public_count > 0 && private_count > 0 {
        let count = nat_gateway_count(nat.strategy, az_count, private_count);
        let hosts: BTreeSet<usize> = (0..count)
            .map(|i| nat_host_subnet(nat.strategy, i, az_count, public_count))
            .collect();
        let reachable = count.min(public_count);
        if hosts.len() < reachable {
            warnings.push(format!(
                "{} NAT gateways land on {} of {} public subnets: NAT gateways will be spread unevenly",
                count,
                hosts.len(),
                public_count
            ));
        }
    }

    for ip in &nat.external_nat_ips {
        if !is_valid_ip(ip) {
            warnings.push(format!("external NAT IP '{}' is not a valid address", ip));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(yaml: &str) -> NetworkSpec {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_clean_spec_has_no_warnings() {
        let spec = spec(
            r#"
name: demo
azs: ["a", "b"]
public_subnets:
  cidr_blocks: ["10.0.0.0/24", "10.0.1.0/24"]
private_subnets:
  cidr_blocks: ["10.0.10.0/24", "10.0.11.0/24"]
nat_gateway:
  enable: true
  strategy: one_per_az
"#,
        );
        assert!(lint_network_spec(&spec).is_empty());
    }

    #[test]
    fn test_uneven_nat_placement() {
        let spec = spec(
            r#"
name: demo
azs: ["a", "b", "c"]
public_subnets:
  cidr_blocks: ["10.0.0.0/24", "10.0.1.0/24", "10.0.2.0/24"]
private_subnets:
  cidr_blocks: ["10.0.10.0/24", "10.0.11.0/24", "10.0.12.0/24"]
nat_gateway:
  enable: true
  strategy: per_subnet
"#,
        );
        let warnings = lint_network_spec(&spec);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("land on 1 of 3 public subnets"));
    }

    #[test]
    fn test_single_nat_is_never_uneven() {
        let spec = spec(
            r#"
name: demo
azs: ["a", "b"]
public_subnets:
  cidr_blocks: ["10.0.0.0/24", "10.0.1.0/24", "10.0.2.0/24"]
private_subnets:
  cidr_blocks: ["10.0.10.0/24"]
nat_gateway:
  enable: true
  strategy: single
"#,
        );
        assert!(lint_network_spec(&spec).is_empty());
    }

    #[test]
    fn test_ipv6_lints() {
        let spec = spec(
            r#"
name: demo
azs: ["a"]
enable_ipv6: true
ipv6_cidr: "2001:db8::/48"
private_subnets:
  cidr_blocks: ["10.0.10.0/24", "10.0.11.0/24"]
  ipv6_native: true
  ipv6_prefixes: [1]
"#,
        );
        let warnings = lint_network_spec(&spec);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("/48"));
        assert!(warnings[1].contains("1 IPv6 prefixes for 2 CIDR blocks"));
    }

    #[test]
    fn test_prefixes_without_parent() {
        let spec = spec(
            r#"
name: demo
azs: ["a"]
enable_ipv6: true
public_subnets:
  cidr_blocks: ["10.0.0.0/24"]
  ipv6_prefixes: [0]
"#,
        );
        let warnings = lint_network_spec(&spec);
        assert!(warnings.iter().any(|w| w.contains("ipv6_cidr is unknown")));
    }

    #[test]
    fn test_bad_cidr_and_extra_names() {
        let spec = spec(
            r#"
name: demo
azs: ["a"]
intra_subnets:
  cidr_blocks: ["10.0.50/24"]
  names: ["one", "two"]
"#,
        );
        let warnings = lint_network_spec(&spec);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("10.0.50/24"));
        assert!(warnings[1].contains("extra names"));
    }
}
