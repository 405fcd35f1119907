//! Provisioning backend seam.
//!
//! The planner never talks to a cloud API. A backend receives the plan's
//! intents one at a time, in order, and must make each resource exist
//! idempotently, returning its identifier. Retry and partial-failure
//! handling belong to the backend.

use log::{debug, info};

use super::intents::Intent;
use super::types::{IamRolePlan, LogDestination, Plan, VpnGatewayPlan};

/// Identifier of a provisioned resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub id: String,
    pub arn: Option<String>,
}

/// Errors reported by a provisioning backend
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Backend rejected {intent}: {reason}")]
    Rejected { intent: String, reason: String },

    #[error("Intent {0} does not resolve against the plan")]
    Unresolved(String),
}

/// Something that can make planned resources exist
pub trait ProvisioningBackend {
    /// Ensure the resource named by `intent` exists; must be idempotent
    fn ensure(&mut self, plan: &Plan, intent: &Intent) -> Result<ResourceRef, BackendError>;
}

/// Drive a backend through every intent of a plan, in order.
///
/// Stops at the first error; resources ensured before it stay in place.
pub fn apply_plan<B: ProvisioningBackend + ?Sized>(
    plan: &Plan,
    backend: &mut B,
) -> Result<Vec<(Intent, ResourceRef)>, BackendError> {
    let intents = plan.intents();
    info!("Applying plan '{}' ({} intents)", plan.name, intents.len());

    let mut ensured = Vec::with_capacity(intents.len());
    for intent in intents {
        let resource = backend.ensure(plan, &intent)?;
        debug!("Ensured {} -> {}", intent, resource.id);
        ensured.push((intent, resource));
    }
    Ok(ensured)
}

/// Backend that provisions nothing and fabricates identifiers.
///
/// Identifiers are derived from the intent, so repeated runs over the same
/// plan produce the same identifiers.
#[derive(Debug, Default)]
pub struct DryRunBackend {
    ensured: Vec<String>,
}

impl DryRunBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intents seen so far, in order
    pub fn ensured(&self) -> &[String] {
        &self.ensured
    }

    fn resolves(plan: &Plan, intent: &Intent) -> bool {
        match intent {
            Intent::Vpc => plan.vpc.is_some(),
            Intent::SecondaryCidr { index } => plan
                .vpc
                .as_ref()
                .map_or(false, |vpc| *index < vpc.secondary_cidr_blocks.len()),
            Intent::DhcpOptions | Intent::DhcpOptionsAssociation => plan.dhcp_options.is_some(),
            Intent::InternetGateway => plan.internet_gateway.is_some(),
            Intent::EgressOnlyGateway => plan.egress_only_gateway.is_some(),
            Intent::RouteTable { table } => plan.route_table(*table).is_some(),
            Intent::Route { table, index } => plan
                .route_table(*table)
                .map_or(false, |rt| *index < rt.routes.len()),
            Intent::Subnet { tier, ordinal } | Intent::RouteTableAssociation { tier, ordinal, .. } => plan
                .tier(*tier)
                .map_or(false, |t| *ordinal < t.subnets.len()),
            Intent::ElasticIp { nat } | Intent::NatGateway { nat } => *nat < plan.nat_gateways.len(),
            Intent::SubnetGroup { tier } => plan.tier(*tier).map_or(false, |t| t.subnet_group.is_some()),
            Intent::NetworkAcl { tier } | Intent::NetworkAclRule { tier, .. } => {
                plan.tier(*tier).map_or(false, |t| t.network_acl.is_some())
            }
            Intent::VpnGatewayAttachment => {
                matches!(plan.vpn_gateway, Some(VpnGatewayPlan::Attach { .. }))
            }
            Intent::VpnGateway => matches!(plan.vpn_gateway, Some(VpnGatewayPlan::Create { .. })),
            Intent::VpnRoutePropagation { table } => match &plan.vpn_gateway {
                Some(VpnGatewayPlan::Create { propagations, .. }) => propagations.contains(table),
                _ => false,
            },
            Intent::FlowLogGroup => plan.flow_log.as_ref().map_or(false, |log| {
                matches!(log.destination, Some(LogDestination::CreateLogGroup(_)))
            }),
            Intent::FlowLogRole | Intent::FlowLogRolePolicy => plan
                .flow_log
                .as_ref()
                .map_or(false, |log| matches!(log.iam_role, Some(IamRolePlan::Create { .. }))),
            Intent::FlowLog => plan.flow_log.is_some(),
        }
    }
}

impl ProvisioningBackend for DryRunBackend {
    fn ensure(&mut self, plan: &Plan, intent: &Intent) -> Result<ResourceRef, BackendError> {
        if !Self::resolves(plan, intent) {
            return Err(BackendError::Unresolved(intent.to_string()));
        }

        let key = intent.to_string();
        info!("[dry-run] ensure {}", key);
        self.ensured.push(key.clone());

        Ok(ResourceRef {
            id: format!("{}-{}", plan.name, key),
            arn: Some(format!("arn:dry-run:{}:{}", plan.name, key)),
        })
    }
}
