use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// CIDR utility functions for lint checks

/// Check if a string is a valid IPv4 CIDR block (e.g. "10.0.1.0/24")
pub fn is_valid_ipv4_cidr(cidr: &str) -> bool {
    match cidr.split_once('/') {
        Some((addr, len)) => {
            addr.parse::<Ipv4Addr>().is_ok() && len.parse::<u8>().map_or(false, |l| l <= 32)
        }
        None => false,
    }
}

/// Check if a string is a valid IPv6 CIDR block (e.g. "2001:db8::/56")
pub fn is_valid_ipv6_cidr(cidr: &str) -> bool {
    match cidr.rsplit_once('/') {
        Some((addr, len)) => {
            addr.parse::<Ipv6Addr>().is_ok() && len.parse::<u8>().map_or(false, |l| l <= 128)
        }
        None => false,
    }
}

/// Check if a string is a valid IP address (IPv4 or IPv6)
pub fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<IpAddr>().is_ok()
}

/// Prefix length of a CIDR block, if it has one
pub fn prefix_len(cidr: &str) -> Option<u8> {
    cidr.rsplit_once('/').and_then(|(_, len)| len.parse::<u8>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_cidr() {
        assert!(is_valid_ipv4_cidr("10.0.0.0/16"));
        assert!(is_valid_ipv4_cidr("0.0.0.0/0"));
        assert!(!is_valid_ipv4_cidr("10.0.0.0"));
        assert!(!is_valid_ipv4_cidr("10.0.0.0/33"));
        assert!(!is_valid_ipv4_cidr("10.0.0/24"));
    }

    #[test]
    fn test_ipv6_cidr() {
        assert!(is_valid_ipv6_cidr("2001:db8::/56"));
        assert!(is_valid_ipv6_cidr("::/0"));
        assert!(!is_valid_ipv6_cidr("2001:db8::"));
        assert!(!is_valid_ipv6_cidr("10.0.0.0/8"));
    }

    #[test]
    fn test_prefix_len() {
        assert_eq!(prefix_len("2001:db8::/56"), Some(56));
        assert_eq!(prefix_len("10.0.0.0"), None);
        assert!(is_valid_ip("::1"));
    }
}
