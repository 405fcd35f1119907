//! IPv6 subnet sub-allocation.
//!
//! A subnet's IPv6 block is derived from the VPC block by reserving an
//! 8-bit subnetting field after the parent prefix (the usual /56 -> /64
//! split) and appending the subnet's prefix tag:
//!
//! ```text
//! 2001:db8::/56 + tag 7  ->  2001:db8::/64:7::/64
//! ```
//!
//! The transform is purely textual. It does not check that the result is
//! a bitwise subset of the parent; a caller passing inconsistent tags gets
//! a well-formed but meaningless block.

use crate::error::PlanError;

/// Width of the subnetting field added to the parent prefix length
pub const SUBNET_FIELD_BITS: u8 = 8;

/// Split a CIDR into its base address text and prefix length.
///
/// The split happens on the last `/`, so anything before it is returned
/// unchanged as the base.
pub fn split_cidr(cidr: &str) -> Result<(&str, u8), PlanError> {
    let (base, prefix) = cidr
        .rsplit_once('/')
        .ok_or_else(|| PlanError::InvalidCidr(format!("'{}' has no '/' separator", cidr)))?;

    let prefix_len = prefix.trim().parse::<u8>().map_err(|_| {
        PlanError::InvalidCidr(format!("'{}' has a non-numeric prefix length", cidr))
    })?;

    Ok((base, prefix_len))
}

/// Derive a subnet IPv6 CIDR from the parent block and a prefix tag.
///
/// # Examples
/// ```
/// use vpcplan::ip::derive_ipv6;
///
/// assert_eq!(derive_ipv6("2001:db8::/56", 7).unwrap(), "2001:db8::/64:7::/64");
/// assert!(derive_ipv6("2001:db8::", 7).is_err());
/// assert!(derive_ipv6("2001:db8::/56", -1).is_err());
/// ```
pub fn derive_ipv6(parent_cidr: &str, tag: i64) -> Result<String, PlanError> {
    if tag < 0 {
        return Err(PlanError::InvalidCidr(format!(
            "IPv6 prefix tag {} for '{}' is negative",
            tag, parent_cidr
        )));
    }

    let (base, prefix_len) = split_cidr(parent_cidr)?;
    let sub_prefix_len = u16::from(prefix_len) + u16::from(SUBNET_FIELD_BITS);

    Ok(format!("{}/{}:{}::/64", base, sub_prefix_len, tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_from_slash_56() {
        assert_eq!(derive_ipv6("2001:db8::/56", 7).unwrap(), "2001:db8::/64:7::/64");
        assert_eq!(derive_ipv6("2001:db8::/56", 0).unwrap(), "2001:db8::/64:0::/64");
    }

    #[test]
    fn test_derive_other_prefix_lengths() {
        assert_eq!(derive_ipv6("fd00::/48", 12).unwrap(), "fd00::/56:12::/64");
    }

    #[test]
    fn test_split_uses_last_separator() {
        let (base, len) = split_cidr("a/b/60").unwrap();
        assert_eq!(base, "a/b");
        assert_eq!(len, 60);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(derive_ipv6("2001:db8::", 1), Err(PlanError::InvalidCidr(_))));
        assert!(matches!(derive_ipv6("2001:db8::/xx", 1), Err(PlanError::InvalidCidr(_))));
        assert!(matches!(derive_ipv6("2001:db8::/56", -3), Err(PlanError::InvalidCidr(_))));
    }
}
