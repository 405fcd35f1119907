//! Topology assembler.
//!
//! This module coordinates plan construction, managing the flow from a
//! validated `NetworkSpec` through tier planning, NAT allocation, route and
//! ACL binding to a finished `Plan`, and writes plans to disk.

use std::collections::BTreeMap;
use std::path::Path;

use color_eyre::eyre::WrapErr;
use log::info;
use rayon::prelude::*;

use crate::config::{NetworkSpec, TierSpec};
use crate::error::PlanError;
use crate::plan::{Plan, RouteTableRef, TierPlan};
use crate::topology::network::{
    plan_dhcp_options, plan_flow_log, plan_gateways, plan_subnet_group, plan_vpc, plan_vpn_gateway,
};
use crate::topology::{
    bind_acl, bind_routes, plan_nat, plan_tier, Gateways, NatStrategy, PlanContext, Tier,
    TierRouting,
};
use crate::utils::validation::lint_network_spec;

const DEFAULT_NAT_DESTINATION: &str = "0.0.0.0/0";

/// A populated tier while the plan is being built
struct TierState<'a> {
    spec: &'a TierSpec,
    routing: TierRouting,
    plan: TierPlan,
}

/// Build the complete plan for a network spec.
///
/// Deterministic: the same spec always yields a deeply equal plan. Any
/// error aborts planning and no partial plan is returned.
pub fn assemble_plan(spec: &NetworkSpec) -> Result<Plan, PlanError> {
    if !spec.create_vpc {
        info!("create_vpc is false, planning nothing for '{}'", spec.name);
        return Ok(Plan::empty(&spec.name));
    }

    lint_network_spec(spec);
    let ctx = PlanContext::from_spec(spec);

    let mut tiers = plan_tiers(spec, &ctx)?;

    // NAT gateways
    let nat_config = spec.nat_gateway.as_ref().filter(|nat| nat.enable);
    let public_count = subnet_count(&tiers, Tier::Public);
    let private_count = subnet_count(&tiers, Tier::Private);
    let nat_gateways = match nat_config {
        Some(_) if public_count == 0 || private_count == 0 => {
            return Err(PlanError::config(format!(
                "NAT gateways need public and private subnets (got {} public, {} private)",
                public_count, private_count
            )));
        }
        Some(nat) => plan_nat(nat, spec.azs.len(), public_count, private_count, &ctx)?,
        None => Vec::new(),
    };

    associate_fallback_tables(&mut tiers);

    // Routes
    let (internet_gateway, egress_only_gateway) = plan_gateways(spec);
    let gateways = Gateways {
        internet_gateway: internet_gateway.is_some(),
        egress_only_gateway: egress_only_gateway.is_some(),
        enable_ipv6: spec.enable_ipv6,
        nat_enabled: nat_config.is_some(),
        nat_destination: nat_config
            .and_then(|nat| nat.destination_cidr_block.as_deref())
            .unwrap_or(DEFAULT_NAT_DESTINATION),
    };
    let nat_strategy = nat_config.map_or(NatStrategy::default(), |nat| nat.strategy);

    for state in &mut tiers {
        for index in 0..state.plan.route_tables.len() {
            let routes = bind_routes(
                &state.plan.route_tables[index],
                state.routing.policy,
                nat_strategy,
                &nat_gateways,
                &gateways,
                &state.plan.subnets,
            )?;
            state.plan.route_tables[index].routes = routes;
        }
    }

    // ACLs and subnet groups
    for state in &mut tiers {
        let members = state.plan.subnet_ordinals();
        state.plan.network_acl = bind_acl(state.plan.tier, state.spec, &members, &ctx);
        state.plan.subnet_group = plan_subnet_group(state.plan.tier, state.spec, &members, &ctx);
    }

    let tiers: Vec<TierPlan> = tiers.into_iter().map(|state| state.plan).collect();
    let vpn_gateway = plan_vpn_gateway(spec, &tiers);

    let plan = Plan {
        name: spec.name.clone(),
        vpc: Some(plan_vpc(spec)),
        dhcp_options: plan_dhcp_options(spec),
        internet_gateway,
        egress_only_gateway,
        tiers,
        nat_gateways,
        vpn_gateway,
        flow_log: plan_flow_log(spec),
    };

    info!(
        "Planned '{}': {} subnets, {} route tables, {} NAT gateways",
        plan.name,
        plan.subnet_count(),
        plan.route_table_count(),
        plan.nat_gateways.len()
    );

    Ok(plan)
}

/// Plan every configured tier in parallel, keeping tier order.
///
/// The first error in tier order wins, regardless of which thread hit it
/// first. Tiers without subnets are dropped.
fn plan_tiers<'a>(
    spec: &'a NetworkSpec,
    ctx: &PlanContext,
) -> Result<Vec<TierState<'a>>, PlanError> {
    let configured: Vec<(Tier, &TierSpec)> = spec.tiers().collect();

    let planned: Vec<Result<TierState<'a>, PlanError>> = configured
        .par_iter()
        .map(|&(tier, tier_spec)| {
            let (subnets, route_tables) = plan_tier(tier, tier_spec, ctx)?;
            Ok(TierState {
                spec: tier_spec,
                routing: TierRouting::resolve(tier, tier_spec),
                plan: TierPlan {
                    tier,
                    subnets,
                    route_tables,
                    network_acl: None,
                    subnet_group: None,
                },
            })
        })
        .collect();

    let mut tiers = Vec::with_capacity(planned.len());
    for state in planned {
        let state = state?;
        if !state.plan.subnets.is_empty() {
            tiers.push(state);
        }
    }
    Ok(tiers)
}

fn subnet_count(tiers: &[TierState], tier: Tier) -> usize {
    tiers
        .iter()
        .find(|state| state.plan.tier == tier)
        .map_or(0, |state| state.plan.subnets.len())
}

/// Point subnets of tiers without own route tables at their fallback tier's
/// tables, round-robin by ordinal.
fn associate_fallback_tables(tiers: &mut [TierState]) {
    let table_counts: BTreeMap<Tier, usize> = tiers
        .iter()
        .map(|state| (state.plan.tier, state.plan.route_tables.len()))
        .collect();

    for state in tiers.iter_mut() {
        if state.routing.owns_route_tables {
            continue;
        }
        let fallback = match state.routing.fallback {
            Some(fallback) => fallback,
            None => continue,
        };
        let count = table_counts.get(&fallback).copied().unwrap_or(0);
        if count == 0 {
            log::debug!(
                "{} subnets keep the main route table: no {} route tables",
                state.plan.tier,
                fallback
            );
            continue;
        }

        for subnet in &mut state.plan.subnets {
            subnet.route_table = Some(RouteTableRef {
                tier: fallback,
                ordinal: subnet.ordinal % count,
            });
        }
    }
}

/// Output format of a written plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PlanFormat {
    Json,
    Yaml,
}

impl PlanFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<PlanFormat> {
        match path.extension()?.to_str()? {
            "json" => Some(PlanFormat::Json),
            "yaml" | "yml" => Some(PlanFormat::Yaml),
            _ => None,
        }
    }
}

/// Serialize a plan in the given format
pub fn render_plan(plan: &Plan, format: PlanFormat) -> color_eyre::Result<String> {
    let rendered = match format {
        PlanFormat::Json => serde_json::to_string_pretty(plan)?,
        PlanFormat::Yaml => serde_yaml::to_string(plan)?,
    };
    Ok(rendered)
}

/// Write a plan to `output_path`
pub fn write_plan(plan: &Plan, output_path: &Path, format: PlanFormat) -> color_eyre::Result<()> {
    let rendered = render_plan(plan, format)?;
    std::fs::write(output_path, rendered)
        .wrap_err_with(|| format!("Failed to write plan to '{}'", output_path.display()))?;
    info!("Wrote {:?} plan to {:?}", format, output_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{Destination, RouteTarget};

    fn spec(yaml: &str) -> NetworkSpec {
        serde_yaml::from_str(yaml).unwrap()
    }

    const THREE_TIER: &str = r#"
name: demo
azs: ["a", "b", "c"]
public_subnets:
  cidr_blocks: ["10.0.0.0/24", "10.0.1.0/24", "10.0.2.0/24"]
private_subnets:
  cidr_blocks: ["10.0.10.0/24", "10.0.11.0/24", "10.0.12.0/24"]
database_subnets:
  cidr_blocks: ["10.0.20.0/24", "10.0.21.0/24"]
nat_gateway:
  enable: true
  strategy: one_per_az
"#;

    #[test]
    fn test_three_tier_plan() {
        let plan = assemble_plan(&spec(THREE_TIER)).unwrap();

        assert_eq!(plan.tiers.len(), 3);
        assert_eq!(plan.subnet_count(), 8);
        // One public table, three private ones, none for the database tier
        assert_eq!(plan.route_table_count(), 4);
        assert_eq!(plan.nat_gateways.len(), 3);

        let public = plan.tier(Tier::Public).unwrap();
        assert_eq!(public.route_tables[0].routes.len(), 1);
        assert_eq!(public.route_tables[0].routes[0].target, RouteTarget::InternetGateway);

        let private = plan.tier(Tier::Private).unwrap();
        for table in &private.route_tables {
            assert_eq!(table.routes.len(), 1);
            assert_eq!(table.routes[0].target, RouteTarget::NatGateway(table.ordinal));
            assert_eq!(table.routes[0].destination, Destination::Ipv4("0.0.0.0/0".to_string()));
        }

        let database = plan.tier(Tier::Database).unwrap();
        assert_eq!(
            database.subnets[1].route_table,
            Some(RouteTableRef { tier: Tier::Private, ordinal: 1 })
        );
        assert_eq!(database.subnet_group.as_ref().unwrap().name, "demo-database");
    }

    #[test]
    fn test_assembly_is_idempotent() {
        let spec = spec(THREE_TIER);
        let first = assemble_plan(&spec).unwrap();
        let second = assemble_plan(&spec).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.intents(), second.intents());
    }

    #[test]
    fn test_no_vpc_plans_nothing() {
        let plan = assemble_plan(&spec("name: demo\ncreate_vpc: false\nazs: [a]")).unwrap();
        assert_eq!(plan, Plan::empty("demo"));
    }

    #[test]
    fn test_nat_without_public_tier_is_an_error() {
        let spec = spec(
            r#"
name: demo
azs: ["a"]
private_subnets:
  cidr_blocks: ["10.0.10.0/24"]
nat_gateway:
  enable: true
"#,
        );
        assert!(matches!(assemble_plan(&spec), Err(PlanError::Configuration(_))));
    }

    #[test]
    fn test_missing_zones_aborts_whole_plan() {
        let spec = spec(
            r#"
name: demo
public_subnets:
  cidr_blocks: ["10.0.0.0/24"]
"#,
        );
        assert!(matches!(assemble_plan(&spec), Err(PlanError::Configuration(_))));
    }

    #[test]
    fn test_public_redshift_uses_public_tables() {
        let spec = spec(
            r#"
name: demo
azs: ["a", "b"]
public_subnets:
  cidr_blocks: ["10.0.0.0/24", "10.0.1.0/24"]
redshift_subnets:
  cidr_blocks: ["10.0.30.0/24", "10.0.31.0/24"]
  enable_public: true
"#,
        );
        let plan = assemble_plan(&spec).unwrap();
        let redshift = plan.tier(Tier::Redshift).unwrap();
        for subnet in &redshift.subnets {
            assert_eq!(subnet.route_table, Some(RouteTableRef { tier: Tier::Public, ordinal: 0 }));
        }
    }

    #[test]
    fn test_dual_stack_routes() {
        let spec = spec(
            r#"
name: demo
azs: ["a"]
enable_ipv6: true
ipv6_cidr: "2001:db8::/56"
public_subnets:
  cidr_blocks: ["10.0.0.0/24"]
  ipv6_prefixes: [0]
private_subnets:
  cidr_blocks: ["10.0.10.0/24"]
  ipv6_prefixes: [1]
nat_gateway:
  enable: true
  strategy: single
  destination_cidr_block: "10.100.0.0/16"
"#,
        );
        let plan = assemble_plan(&spec).unwrap();
        assert!(plan.egress_only_gateway.is_some());

        let public = &plan.tier(Tier::Public).unwrap().route_tables[0];
        let targets: Vec<RouteTarget> = public.routes.iter().map(|r| r.target).collect();
        assert_eq!(targets, vec![RouteTarget::InternetGateway, RouteTarget::InternetGateway]);

        let private = &plan.tier(Tier::Private).unwrap().route_tables[0];
        assert_eq!(
            private.routes[0].destination,
            Destination::Ipv4("10.100.0.0/16".to_string())
        );
        assert_eq!(private.routes[1].target, RouteTarget::EgressOnlyGateway);

        let subnet = &plan.tier(Tier::Private).unwrap().subnets[0];
        assert_eq!(subnet.ipv6_cidr_block.as_deref(), Some("2001:db8::/64:1::/64"));
    }

    #[test]
    fn test_plan_format_from_path() {
        assert_eq!(PlanFormat::from_path(Path::new("plan.json")), Some(PlanFormat::Json));
        assert_eq!(PlanFormat::from_path(Path::new("out/plan.yml")), Some(PlanFormat::Yaml));
        assert_eq!(PlanFormat::from_path(Path::new("plan")), None);
    }

    #[test]
    fn test_render_plan_json() {
        let plan = assemble_plan(&spec(THREE_TIER)).unwrap();
        let rendered = render_plan(&plan, PlanFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["name"], "demo");
        assert_eq!(value["nat_gateways"].as_array().unwrap().len(), 3);
    }
}
