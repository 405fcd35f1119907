//! Address-space helpers for topology planning.
//!
//! This module resolves where a subnet lives and which IPv6 block it gets:
//! availability-zone cycling for subnet ordinals, and syntactic IPv6
//! sub-allocation from the VPC's IPv6 block.

pub mod az;
pub mod ipv6;

// Re-export commonly used functions
pub use az::{az_at, az_index};
pub use ipv6::{derive_ipv6, split_cidr, SUBNET_FIELD_BITS};
