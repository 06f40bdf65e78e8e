//! IPv4 CIDR keys and the codec that exposes them to the trie engine.
//!
//! The numeric side of this module (parsing, netmask arithmetic, canonical
//! host-bit clearing) is treated the way spec.md treats it: a small, fixed
//! piece of arithmetic the codec leans on, not a feature of the engine
//! itself. It is deliberately plain `u32` shifting and masking, no crates,
//! mirroring the teacher's stated preference for straightforward, safe
//! arithmetic over unsafe cleverness.
use crate::codec::BitCodec;
use serde::Deserialize;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// An IPv4 CIDR block: the top `prefix_len` bits of `addr` are significant,
/// and every bit beyond `prefix_len` is guaranteed to be zero (canonical
/// form).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Ipv4Cidr {
    addr: u32,
    prefix_len: u8,
}

/// A CIDR block text failed to parse as `a.b.c.d/m`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCidrError {
    #[error("{0} is not a valid IPv4 CIDR: expected a.b.c.d or a.b.c.d/m")]
    Malformed(String),
    #[error("{0} is not a valid IPv4 CIDR: mask {1} is out of range 0..=32")]
    MaskOutOfRange(String, u32),
    #[error("{0} is not a valid IPv4 CIDR: host part of address was not zero. Did you mean {1}?")]
    HostBitsSet(String, Ipv4Cidr),
}

impl Ipv4Cidr {
    /// Build a canonical CIDR block, clearing any bits beyond `prefix_len`.
    pub fn new(addr: Ipv4Addr, prefix_len: u8) -> Self {
        let mut bits = u32::from(addr);
        bits = clear_host_bits(bits, prefix_len);
        Ipv4Cidr {
            addr: bits,
            prefix_len,
        }
    }

    /// A single host address, equivalent to a /32.
    pub fn host(addr: Ipv4Addr) -> Self {
        Ipv4Cidr::new(addr, 32)
    }

    pub fn network_address(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.addr)
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Whether `addr` falls within this block.
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        clear_host_bits(u32::from(addr), self.prefix_len) == self.addr
    }
}

fn clear_host_bits(addr: u32, prefix_len: u8) -> u32 {
    if prefix_len == 0 {
        0
    } else if prefix_len >= 32 {
        addr
    } else {
        let mask = !0u32 << (32 - prefix_len as u32);
        addr & mask
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network_address(), self.prefix_len)
    }
}

impl FromStr for Ipv4Cidr {
    type Err = ParseCidrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr_part, mask_part) = match s.split_once('/') {
            Some((a, m)) => (a, Some(m)),
            None => (s, None),
        };
        let addr: Ipv4Addr = addr_part
            .parse()
            .map_err(|_| ParseCidrError::Malformed(s.to_string()))?;
        let prefix_len: u8 = match mask_part {
            Some(m) => {
                let parsed: u32 = m
                    .parse()
                    .map_err(|_| ParseCidrError::Malformed(s.to_string()))?;
                if parsed > 32 {
                    return Err(ParseCidrError::MaskOutOfRange(s.to_string(), parsed));
                }
                parsed as u8
            }
            None => 32,
        };
        let canonical = Ipv4Cidr::new(addr, prefix_len);
        if canonical.addr != u32::from(addr) {
            return Err(ParseCidrError::HostBitsSet(s.to_string(), canonical));
        }
        Ok(canonical)
    }
}

impl serde::Serialize for Ipv4Cidr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Ipv4Cidr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ipv4Cidr::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Codec for [`Ipv4Cidr`] keys: `length_in_bits` is the mask width, and the
/// bit at index `i` is the `i`-th most-significant bit of the address.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ipv4CidrCodec;

impl BitCodec for Ipv4CidrCodec {
    type Key = Ipv4Cidr;

    fn length_in_bits(&self, key: &Ipv4Cidr) -> usize {
        key.prefix_len as usize
    }

    fn bit_at(&self, key: &Ipv4Cidr, index: usize) -> bool {
        assert!(
            index < key.prefix_len as usize,
            "bit index {index} out of range for {key} (len {})",
            key.prefix_len
        );
        (key.addr >> (31 - index)) & 1 == 1
    }

    fn max_length_in_bits(&self) -> usize {
        32
    }

    fn recreate_key(&self, bits: &[bool], length: usize) -> Ipv4Cidr {
        let mut addr: u32 = 0;
        for (i, bit) in bits.iter().enumerate().take(length) {
            if *bit {
                addr |= 1u32 << (31 - i);
            }
        }
        Ipv4Cidr::new(Ipv4Addr::from(addr), length as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let c: Ipv4Cidr = "127.0.0.1".parse().unwrap();
        assert_eq!(c.to_string(), "127.0.0.1/32");

        let c: Ipv4Cidr = "10.0.0.0/8".parse().unwrap();
        assert_eq!(c.to_string(), "10.0.0.0/8");
    }

    #[test]
    fn rejects_host_bits() {
        let err = "10.0.0.1/24".parse::<Ipv4Cidr>().unwrap_err();
        match err {
            ParseCidrError::HostBitsSet(_, suggested) => {
                assert_eq!(suggested.to_string(), "10.0.0.0/24");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn codec_round_trip() {
        let codec = Ipv4CidrCodec;
        for text in ["0.0.0.0/1", "127.255.255.255/32", "224.0.0.0/3", "0.0.0.0/0"] {
            let key: Ipv4Cidr = text.parse().unwrap();
            let length = codec.length_in_bits(&key);
            let bits: Vec<bool> = (0..length).map(|i| codec.bit_at(&key, i)).collect();
            assert_eq!(codec.recreate_key(&bits, length), key);
        }
    }
}
