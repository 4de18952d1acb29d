//! iPAddress values: single IPv4 or IPv6 addresses (4 or 16 bytes), or address and netmask pairs
//! (8 or 32 bytes) as used in name constraints.

use core::fmt;
use core::str::FromStr;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use log::debug;

use crate::names::general_name::NameRelation;
use crate::{Error, Result};

/// `IpAddressName` holds the octets of an iPAddress GeneralName. The empty value built by
/// [`IpAddressName::widest`] is the widest possible constraint and is
/// never produced by parsing or DER decoding.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct IpAddressName {
    address: Vec<u8>,
}

impl IpAddressName {
    /// Creates a name from 4, 8, 16 or 32 octets
    pub fn new(address: &[u8]) -> Result<Self> {
        match address.len() {
            4 | 8 | 16 | 32 => Ok(IpAddressName {
                address: address.to_vec(),
            }),
            l => {
                debug!("IP address name with invalid length {}", l);
                Err(Error::InvalidName)
            }
        }
    }

    /// Returns the empty name, which contains every IPv4 and IPv6 address and subnet
    pub fn widest() -> Self {
        IpAddressName { address: vec![] }
    }

    /// The octets
    pub fn as_bytes(&self) -> &[u8] {
        &self.address
    }

    /// Returns true for the empty name
    pub fn is_empty(&self) -> bool {
        self.address.is_empty()
    }

    /// Returns true if the value is an IPv4 address or subnet
    pub fn is_ipv4(&self) -> bool {
        matches!(self.address.len(), 4 | 8)
    }

    /// Returns true if the value carries a netmask
    pub fn is_subnet(&self) -> bool {
        matches!(self.address.len(), 8 | 32)
    }

    /// Returns the relation of `other` to the subtree rooted at this name.
    ///
    /// Two single addresses either match or do not overlap. A subnet contains the addresses that
    /// agree with it under its mask. Two subnets are compared by testing whether either one's mask
    /// and masked address make it a subset of the other. A subnet whose address has bits set
    /// outside its mask matches nothing and is treated as wider than any other subnet.
    pub fn constrains(&self, other: &IpAddressName) -> NameRelation {
        if self.address == other.address {
            return NameRelation::Match;
        }
        if self.is_empty() {
            return NameRelation::Narrows;
        }
        if other.is_empty() {
            return NameRelation::Widens;
        }
        if self.is_ipv4() != other.is_ipv4() {
            return NameRelation::SameType;
        }

        let this = &self.address;
        let that = &other.address;
        match (self.is_subnet(), other.is_subnet()) {
            (false, false) => NameRelation::SameType,
            (true, true) => {
                let offset = this.len() / 2;
                let mut this_empty = false;
                let mut other_empty = false;
                let mut other_subset_of_this = true;
                let mut this_subset_of_other = true;
                for i in 0..offset {
                    let (this_addr, this_mask) = (this[i], this[i + offset]);
                    let (that_addr, that_mask) = (that[i], that[i + offset]);
                    if this_addr & this_mask != this_addr {
                        this_empty = true;
                    }
                    if that_addr & that_mask != that_addr {
                        other_empty = true;
                    }
                    if !(this_mask & that_mask == this_mask
                        && this_addr & this_mask == that_addr & this_mask)
                    {
                        other_subset_of_this = false;
                    }
                    if !(that_mask & this_mask == that_mask
                        && that_addr & that_mask == this_addr & that_mask)
                    {
                        this_subset_of_other = false;
                    }
                }
                if this_empty || other_empty {
                    if this_empty && other_empty {
                        NameRelation::Match
                    } else if this_empty {
                        NameRelation::Widens
                    } else {
                        NameRelation::Narrows
                    }
                } else if other_subset_of_this {
                    NameRelation::Narrows
                } else if this_subset_of_other {
                    NameRelation::Widens
                } else {
                    NameRelation::SameType
                }
            }
            (false, true) => {
                let offset = that.len() / 2;
                if (0..offset).all(|i| this[i] & that[i + offset] == that[i]) {
                    NameRelation::Widens
                } else {
                    NameRelation::SameType
                }
            }
            (true, false) => {
                let offset = this.len() / 2;
                if (0..offset).all(|i| that[i] & this[i + offset] == this[i]) {
                    NameRelation::Narrows
                } else {
                    NameRelation::SameType
                }
            }
        }
    }
}

impl From<IpAddr> for IpAddressName {
    fn from(addr: IpAddr) -> Self {
        let address = match addr {
            IpAddr::V4(v4) => v4.octets().to_vec(),
            IpAddr::V6(v6) => v6.octets().to_vec(),
        };
        IpAddressName { address }
    }
}

fn prefix_to_mask(prefix: u32, len: usize) -> Option<Vec<u8>> {
    if prefix as usize > len * 8 {
        return None;
    }
    let mut mask = vec![0u8; len];
    for (i, b) in mask.iter_mut().enumerate() {
        let bits = (prefix as usize).saturating_sub(i * 8).min(8);
        *b = if bits == 0 { 0 } else { 0xFFu8 << (8 - bits) };
    }
    Some(mask)
}

impl FromStr for IpAddressName {
    type Err = Error;

    /// Parses `a.b.c.d`, `a.b.c.d/m.m.m.m`, `a.b.c.d/prefix`, an IPv6 address, or
    /// `ipv6-address/prefix`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            debug!("Invalid IP address name \"{}\"", s);
            Error::InvalidName
        };
        let (addr, mask) = match s.split_once('/') {
            Some((a, m)) => (a, Some(m)),
            None => (s, None),
        };

        let mut address = if s.contains(':') {
            Ipv6Addr::from_str(addr).map_err(|_| invalid())?.octets().to_vec()
        } else {
            Ipv4Addr::from_str(addr).map_err(|_| invalid())?.octets().to_vec()
        };
        if let Some(mask) = mask {
            let len = address.len();
            let mask_bytes = if len == 4 && mask.contains('.') {
                Ipv4Addr::from_str(mask).map_err(|_| invalid())?.octets().to_vec()
            } else {
                let prefix = u32::from_str(mask).map_err(|_| invalid())?;
                prefix_to_mask(prefix, len).ok_or_else(invalid)?
            };
            address.extend_from_slice(&mask_bytes);
        }
        IpAddressName::new(&address)
    }
}

impl fmt::Display for IpAddressName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = &self.address;
        match a.len() {
            4 => write!(f, "{}", Ipv4Addr::new(a[0], a[1], a[2], a[3])),
            8 => write!(
                f,
                "{}/{}",
                Ipv4Addr::new(a[0], a[1], a[2], a[3]),
                Ipv4Addr::new(a[4], a[5], a[6], a[7])
            ),
            16 | 32 => {
                let mut addr = [0u8; 16];
                addr.copy_from_slice(&a[..16]);
                write!(f, "{}", Ipv6Addr::from(addr))?;
                if a.len() == 32 {
                    let mut mask = [0u8; 16];
                    mask.copy_from_slice(&a[16..]);
                    let bits = u128::from_be_bytes(mask);
                    if bits.leading_ones() + bits.trailing_zeros() == 128 {
                        write!(f, "/{}", bits.leading_ones())?;
                    } else {
                        write!(f, "/{}", Ipv6Addr::from(mask))?;
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
