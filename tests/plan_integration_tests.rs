#[cfg(test)]
mod plan_integration_tests {
    use std::collections::BTreeSet;
    use std::io::Write;
    use tempfile::NamedTempFile;

    use vpcplan::config_loader::load_config;
    use vpcplan::config::Tier;
    use vpcplan::orchestrator::{assemble_plan, write_plan, PlanFormat};
    use vpcplan::plan::{apply_plan, Destination, DryRunBackend, Intent, IpSource, Plan, RouteTarget};

    const FULL_NETWORK: &str = r#"
name: prod
azs: ["eu-west-1a", "eu-west-1b"]
secondary_cidr_blocks: ["100.64.0.0/16"]
enable_ipv6: true
ipv6_cidr: "2001:db8:1200::/56"
tags:
  env: prod

dhcp_options:
  enable: true
  domain_name: corp.internal

public_subnets:
  cidr_blocks: ["10.0.0.0/24", "10.0.1.0/24"]
  ipv6_prefixes: [0, 1]
  map_public_ip_on_launch: true
  network_acl:
    dedicated: true
    inbound_rules:
      - { rule_number: 100, rule_action: allow, protocol: "-1", cidr_block: "0.0.0.0/0" }
    outbound_rules:
      - { rule_number: 100, rule_action: allow, protocol: "-1", cidr_block: "0.0.0.0/0" }

private_subnets:
  cidr_blocks: ["10.0.10.0/24", "10.0.11.0/24"]
  ipv6_prefixes: [10, 11]

database_subnets:
  cidr_blocks: ["10.0.20.0/24", "10.0.21.0/24"]
  create_route_table: true

intra_subnets:
  cidr_blocks: ["10.0.50.0/24"]

nat_gateway:
  enable: true
  strategy: single

enable_vpn_gateway: true
propagate_private_route_tables_vgw: true

flow_log:
  enable: true
  cloud_watch:
    create_log_group: true
    create_iam_role: true
"#;

    fn load(yaml: &str) -> Plan {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        let spec = load_config(file.path()).unwrap();
        assemble_plan(&spec).unwrap()
    }

    /// Processing stage of an intent; intents must never go back a stage
    fn stage(intent: &Intent) -> usize {
        match intent {
            Intent::Vpc | Intent::SecondaryCidr { .. } => 0,
            Intent::DhcpOptions | Intent::DhcpOptionsAssociation => 1,
            Intent::InternetGateway | Intent::EgressOnlyGateway => 2,
            Intent::RouteTable { .. } => 3,
            Intent::Route { .. } => 4,
            Intent::Subnet { .. } => 5,
            Intent::RouteTableAssociation { .. } => 6,
            Intent::ElasticIp { .. } | Intent::NatGateway { .. } => 7,
            Intent::SubnetGroup { .. } => 8,
            Intent::NetworkAcl { .. } | Intent::NetworkAclRule { .. } => 9,
            Intent::VpnGatewayAttachment | Intent::VpnGateway | Intent::VpnRoutePropagation { .. } => 10,
            Intent::FlowLogGroup | Intent::FlowLogRole | Intent::FlowLogRolePolicy | Intent::FlowLog => 11,
        }
    }

    #[test]
    fn test_intents_follow_processing_order() {
        let plan = load(FULL_NETWORK);
        let intents = plan.intents();

        assert_eq!(intents.first(), Some(&Intent::Vpc));
        assert_eq!(intents.last(), Some(&Intent::FlowLog));
        assert_eq!(intents.len(), 47);

        let stages: Vec<usize> = intents.iter().map(stage).collect();
        let mut sorted = stages.clone();
        sorted.sort();
        assert_eq!(stages, sorted);
    }

    #[test]
    fn test_full_network_shape() {
        let plan = load(FULL_NETWORK);

        assert_eq!(plan.subnet_count(), 7);
        assert_eq!(plan.route_table_count(), 6);
        assert_eq!(plan.nat_gateways.len(), 1);
        assert!(plan.egress_only_gateway.is_some());
        assert_eq!(plan.dhcp_options.as_ref().unwrap().domain_name.as_deref(), Some("corp.internal"));

        // Every private table goes through the single NAT gateway
        let private = plan.tier(Tier::Private).unwrap();
        for table in &private.route_tables {
            assert_eq!(table.routes[0].target, RouteTarget::NatGateway(0));
            assert_eq!(table.routes[1].target, RouteTarget::EgressOnlyGateway);
        }

        // Dedicated database tables only carry the egress-only route
        let database = plan.tier(Tier::Database).unwrap();
        assert_eq!(database.route_tables.len(), 2);
        for table in &database.route_tables {
            assert_eq!(table.routes.len(), 1);
            assert_eq!(table.routes[0].target, RouteTarget::EgressOnlyGateway);
        }

        let intra = plan.tier(Tier::Intra).unwrap();
        assert!(intra.route_tables[0].routes.is_empty());

        let public = plan.tier(Tier::Public).unwrap();
        assert_eq!(
            public.subnets[1].ipv6_cidr_block.as_deref(),
            Some("2001:db8:1200::/64:1::/64")
        );
        assert_eq!(public.subnets[1].tags["env"], "prod");
    }

    #[test]
    fn test_route_tables_partition_every_tier() {
        let plan = load(FULL_NETWORK);

        for tier in &plan.tiers {
            if tier.route_tables.is_empty() {
                continue;
            }
            let mut members = Vec::new();
            for table in &tier.route_tables {
                members.extend(table.members.iter().copied());
            }
            let unique: BTreeSet<usize> = members.iter().copied().collect();
            assert_eq!(unique.len(), members.len(), "{} tables overlap", tier.tier);
            assert_eq!(unique, tier.subnet_ordinals().into_iter().collect::<BTreeSet<usize>>());
        }
    }

    #[test]
    fn test_dedicated_acl_is_all_or_nothing() {
        let plan = load(FULL_NETWORK);

        let public = plan.tier(Tier::Public).unwrap();
        let acl = public.network_acl.as_ref().unwrap();
        assert_eq!(acl.members, public.subnet_ordinals());

        for tier in [Tier::Private, Tier::Database, Tier::Intra] {
            assert!(plan.tier(tier).unwrap().network_acl.is_none());
        }
    }

    #[test]
    fn test_planning_is_idempotent() {
        let first = load(FULL_NETWORK);
        let second = load(FULL_NETWORK);
        assert_eq!(first, second);
    }

    #[test]
    fn test_dry_run_resolves_every_intent() {
        let plan = load(FULL_NETWORK);
        let mut backend = DryRunBackend::new();

        let ensured = apply_plan(&plan, &mut backend).unwrap();
        assert_eq!(ensured.len(), plan.intents().len());
        assert_eq!(ensured[0].1.id, "prod-vpc");
        assert_eq!(backend.ensured()[0], "vpc");
    }

    #[test]
    fn test_write_plan_formats() {
        let plan = load(FULL_NETWORK);
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("plan.json");
        write_plan(&plan, &json_path, PlanFormat::Json).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(json["name"], "prod");
        assert_eq!(json["tiers"].as_array().unwrap().len(), 4);

        let yaml_path = dir.path().join("plan.yaml");
        write_plan(&plan, &yaml_path, PlanFormat::Yaml).unwrap();
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(&std::fs::read_to_string(&yaml_path).unwrap()).unwrap();
        assert_eq!(yaml["vpc"]["cidr_block"].as_str(), Some("10.0.0.0/16"));
    }

    #[test]
    fn test_minimal_network() {
        let plan = load(
            r#"
name: tiny
azs: ["us-east-1a"]
private_subnets:
  cidr_blocks: ["10.0.1.0/24"]
"#,
        );

        let intents: Vec<String> = plan.intents().iter().map(|i| i.to_string()).collect();
        assert_eq!(
            intents,
            vec![
                "vpc",
                "igw",
                "route-table-private-0",
                "subnet-private-0",
                "route-table-association-private-0",
            ]
        );
    }

    #[test]
    fn test_reuse_without_ip_ids_allocates_fresh_ips() {
        let plan = load(
            r#"
name: reuse
azs: ["us-east-1a", "us-east-1b"]
public_subnets:
  cidr_blocks: ["10.0.0.0/24", "10.0.1.0/24"]
private_subnets:
  cidr_blocks: ["10.0.10.0/24", "10.0.11.0/24"]
nat_gateway:
  enable: true
  strategy: one_per_az
  reuse_eips: true
"#,
        );

        assert_eq!(plan.nat_gateways.len(), 2);
        for nat in &plan.nat_gateways {
            assert!(matches!(nat.ip_source, IpSource::NewElasticIp { .. }));
        }
        let eips = plan
            .intents()
            .iter()
            .filter(|intent| matches!(intent, Intent::ElasticIp { .. }))
            .count();
        assert_eq!(eips, 2);
    }

    #[test]
    fn test_database_internet_route_has_one_ipv6_default() {
        let plan = load(
            r#"
name: dual
azs: ["us-east-1a"]
enable_ipv6: true
ipv6_cidr: "2001:db8:1200::/56"
public_subnets:
  cidr_blocks: ["10.0.0.0/24"]
database_subnets:
  cidr_blocks: ["10.0.20.0/24"]
  create_route_table: true
  create_internet_gateway_route: true
"#,
        );

        let database = plan.tier(Tier::Database).unwrap();
        let routes = &database.route_tables[0].routes;
        let ipv6_defaults: Vec<_> = routes
            .iter()
            .filter(|route| route.destination == Destination::Ipv6("::/0".to_string()))
            .collect();
        assert_eq!(ipv6_defaults.len(), 1);
        assert_eq!(ipv6_defaults[0].target, RouteTarget::EgressOnlyGateway);
        assert_eq!(routes[0].target, RouteTarget::InternetGateway);

        // Public tables still send IPv6 through the internet gateway
        let public = plan.tier(Tier::Public).unwrap();
        assert_eq!(public.route_tables[0].routes.len(), 2);
        assert_eq!(public.route_tables[0].routes[1].target, RouteTarget::InternetGateway);
    }
}
