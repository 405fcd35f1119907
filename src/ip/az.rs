//! Availability-zone cycling.
//!
//! Subnets, route tables and NAT gateways are spread across availability
//! zones round-robin: ordinal `k` lands in `azs[k % azs.len()]`. Wraparound
//! is the intended behavior when a tier has more subnets than zones.

use crate::error::PlanError;

/// Index into `azs` for a given ordinal
pub fn az_index(azs: &[String], ordinal: usize) -> Result<usize, PlanError> {
    if azs.is_empty() {
        return Err(PlanError::config(format!(
            "cannot place ordinal {} without availability zones",
            ordinal
        )));
    }
    Ok(ordinal % azs.len())
}

/// Availability zone for a given ordinal
pub fn az_at(azs: &[String], ordinal: usize) -> Result<&str, PlanError> {
    let index = az_index(azs, ordinal)?;
    Ok(azs[index].as_str())
}
