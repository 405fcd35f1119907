//! Dedicated network ACL binding.

use crate::config::TierSpec;
use crate::plan::AclPlan;
use crate::utils::tags::name_tags;

use super::tier::PlanContext;
use super::types::Tier;

/// Bind a dedicated network ACL to a tier.
///
/// Absent unless the tier asks for a dedicated ACL. When present it covers
/// every subnet in `members`, and its rules keep the order and numbers they
/// were given in.
pub fn bind_acl(tier: Tier, spec: &TierSpec, members: &[usize], ctx: &PlanContext) -> Option<AclPlan> {
    if !spec.has_dedicated_acl() {
        return None;
    }
    let acl = spec.network_acl.as_ref()?;

    let name = format!("{}-{}", ctx.name, spec.suffix_or(tier));
    let tags = name_tags(&name, [Some(ctx.tags), Some(&acl.tags)]);

    Some(AclPlan {
        tier,
        name,
        members: members.to_vec(),
        ingress: acl.inbound_rules.clone(),
        egress: acl.outbound_rules.clone(),
        tags,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tags;

    fn context(tags: &Tags) -> PlanContext<'_> {
        PlanContext {
            name: "demo",
            azs: &[],
            tags,
            ipv6_cidr: None,
            enable_ipv6: false,
        }
    }

    #[test]
    fn test_no_acl_unless_dedicated() {
        let tags = Tags::new();
        let ctx = context(&tags);

        let plain = TierSpec::default();
        assert!(bind_acl(Tier::Public, &plain, &[0, 1], &ctx).is_none());

        let shared: TierSpec = serde_yaml::from_str(
            r#"
network_acl:
  dedicated: false
  inbound_rules:
    - { rule_number: 100, rule_action: allow, protocol: "-1", cidr_block: "0.0.0.0/0" }
"#,
        )
        .unwrap();
        assert!(bind_acl(Tier::Public, &shared, &[0, 1], &ctx).is_none());
    }

    #[test]
    fn test_dedicated_acl_covers_whole_tier() {
        let tags = Tags::new();
        let ctx = context(&tags);
        let spec: TierSpec = serde_yaml::from_str(
            r#"
cidr_blocks: ["10.0.20.0/24", "10.0.21.0/24", "10.0.22.0/24"]
network_acl:
  dedicated: true
  tags:
    scope: data
  inbound_rules:
    - { rule_number: 200, rule_action: deny, protocol: tcp, from_port: 22, to_port: 22, cidr_block: "0.0.0.0/0" }
    - { rule_number: 100, rule_action: allow, protocol: "-1", cidr_block: "10.0.0.0/16" }
  outbound_rules:
    - { rule_number: 100, rule_action: allow, protocol: "-1", ipv6_cidr_block: "::/0" }
"#,
        )
        .unwrap();

        let acl = bind_acl(Tier::Database, &spec, &[0, 1, 2], &ctx).unwrap();
        assert_eq!(acl.members, vec![0, 1, 2]);
        assert_eq!(acl.name, "demo-db");
        assert_eq!(acl.tags["scope"], "data");

        // Order and numbers are carried through untouched
        let numbers: Vec<u32> = acl.ingress.iter().map(|r| r.rule_number).collect();
        assert_eq!(numbers, vec![200, 100]);
        assert_eq!(acl.egress.len(), 1);
        assert_eq!(acl.egress[0].ipv6_cidr_block.as_deref(), Some("::/0"));
    }
}
