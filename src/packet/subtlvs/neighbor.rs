//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

use std::net::Ipv4Addr;

use bitflags::bitflags;
use bytes::{Buf, Bytes};
use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::bytes::BytesExt;
use crate::ip::Ipv4AddrExt;
use crate::packet::SystemId;
use crate::packet::error::{TlvDecodeError, TlvDecodeResult};

// A traffic-engineering bandwidth value.
//
// The wire bytes are kept verbatim since the downstream leaf is a binary
// value; decoding only validates that they hold a finite IEEE-754 float.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct Bandwidth([u8; 4]);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct AdminGroupSubTlv(u32);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct LinkIdSubTlv {
    pub local: u32,
    pub remote: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct Ipv4InterfaceAddrSubTlv(Ipv4Addr);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct Ipv4NeighborAddrSubTlv(Ipv4Addr);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct MaxLinkBwSubTlv(Bandwidth);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct MaxResvLinkBwSubTlv(Bandwidth);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct UnreservedBwSubTlv([Bandwidth; 8]);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct ResidualBwSubTlv(Bandwidth);

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct AdjSidFlags: u8 {
        const F = 0x80;
        const B = 0x40;
        const V = 0x20;
        const L = 0x10;
        const S = 0x08;
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct AdjSidSubTlv {
    pub flags: AdjSidFlags,
    pub weight: u8,
    pub value: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct LanAdjSidSubTlv {
    pub flags: AdjSidFlags,
    pub weight: u8,
    pub neighbor: SystemId,
    pub value: u32,
}

// ===== impl Bandwidth =====

impl Bandwidth {
    pub const SIZE: usize = 4;

    pub(crate) fn decode(buf: &mut Bytes) -> TlvDecodeResult<Self> {
        let mut bytes = [0; Self::SIZE];
        buf.try_copy_to_slice(&mut bytes)?;
        if !f32::from_be_bytes(bytes).is_finite() {
            return Err(TlvDecodeError::InvalidBandwidth);
        }

        Ok(Bandwidth(bytes))
    }

    pub fn get(&self) -> f32 {
        f32::from_be_bytes(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

// ===== impl AdminGroupSubTlv =====

impl AdminGroupSubTlv {
    const SIZE: usize = 4;

    pub(crate) fn decode(stlv_len: u8, buf: &mut Bytes) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if stlv_len as usize != Self::SIZE {
            return Err(TlvDecodeError::InvalidLength(stlv_len));
        }

        let groups = buf.try_get_u32()?;

        Ok(AdminGroupSubTlv(groups))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

// ===== impl LinkIdSubTlv =====

impl LinkIdSubTlv {
    const SIZE: usize = 8;

    pub(crate) fn decode(stlv_len: u8, buf: &mut Bytes) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if stlv_len as usize != Self::SIZE {
            return Err(TlvDecodeError::InvalidLength(stlv_len));
        }

        let local = buf.try_get_u32()?;
        let remote = buf.try_get_u32()?;

        Ok(LinkIdSubTlv { local, remote })
    }
}

// ===== impl Ipv4InterfaceAddrSubTlv =====

impl Ipv4InterfaceAddrSubTlv {
    const SIZE: usize = Ipv4Addr::LENGTH;

    pub(crate) fn decode(stlv_len: u8, buf: &mut Bytes) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if stlv_len as usize != Self::SIZE {
            return Err(TlvDecodeError::InvalidLength(stlv_len));
        }

        let addr = buf.try_get_ipv4()?;

        Ok(Ipv4InterfaceAddrSubTlv(addr))
    }

    pub fn get(&self) -> &Ipv4Addr {
        &self.0
    }
}

// ===== impl Ipv4NeighborAddrSubTlv =====

impl Ipv4NeighborAddrSubTlv {
    const SIZE: usize = Ipv4Addr::LENGTH;

    pub(crate) fn decode(stlv_len: u8, buf: &mut Bytes) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if stlv_len as usize != Self::SIZE {
            return Err(TlvDecodeError::InvalidLength(stlv_len));
        }

        let addr = buf.try_get_ipv4()?;

        Ok(Ipv4NeighborAddrSubTlv(addr))
    }

    pub fn get(&self) -> &Ipv4Addr {
        &self.0
    }
}

// ===== impl MaxLinkBwSubTlv =====

impl MaxLinkBwSubTlv {
    pub(crate) fn decode(stlv_len: u8, buf: &mut Bytes) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if stlv_len as usize != Bandwidth::SIZE {
            return Err(TlvDecodeError::InvalidLength(stlv_len));
        }

        let bw = Bandwidth::decode(buf)?;

        Ok(MaxLinkBwSubTlv(bw))
    }

    pub fn get(&self) -> &Bandwidth {
        &self.0
    }
}

// ===== impl MaxResvLinkBwSubTlv =====

impl MaxResvLinkBwSubTlv {
    pub(crate) fn decode(stlv_len: u8, buf: &mut Bytes) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if stlv_len as usize != Bandwidth::SIZE {
            return Err(TlvDecodeError::InvalidLength(stlv_len));
        }

        let bw = Bandwidth::decode(buf)?;

        Ok(MaxResvLinkBwSubTlv(bw))
    }

    pub fn get(&self) -> &Bandwidth {
        &self.0
    }
}

// ===== impl UnreservedBwSubTlv =====

impl UnreservedBwSubTlv {
    const SIZE: usize = 32;

    pub(crate) fn decode(stlv_len: u8, buf: &mut Bytes) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if stlv_len as usize != Self::SIZE {
            return Err(TlvDecodeError::InvalidLength(stlv_len));
        }

        let mut bws = [Bandwidth::new([0; 4]); 8];
        for bw in &mut bws {
            *bw = Bandwidth::decode(buf)?;
        }

        Ok(UnreservedBwSubTlv(bws))
    }

    // Iterates over the bandwidth values keyed by setup priority.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Bandwidth)> {
        self.0.iter().enumerate().map(|(prio, bw)| (prio as u8, bw))
    }
}

// ===== impl ResidualBwSubTlv =====

impl ResidualBwSubTlv {
    pub(crate) fn decode(stlv_len: u8, buf: &mut Bytes) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if stlv_len as usize != Bandwidth::SIZE {
            return Err(TlvDecodeError::InvalidLength(stlv_len));
        }

        let bw = Bandwidth::decode(buf)?;

        Ok(ResidualBwSubTlv(bw))
    }

    pub fn get(&self) -> &Bandwidth {
        &self.0
    }
}

// ===== impl AdjSidSubTlv =====

impl AdjSidSubTlv {
    const MIN_LEN: usize = 5;

    pub(crate) fn decode(stlv_len: u8, buf: &mut Bytes) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if (stlv_len as usize) < Self::MIN_LEN {
            return Err(TlvDecodeError::InvalidLength(stlv_len));
        }

        let flags = AdjSidFlags::from_bits_truncate(buf.try_get_u8()?);
        let weight = buf.try_get_u8()?;
        let value = adj_sid_value(flags, buf)?;

        Ok(AdjSidSubTlv {
            flags,
            weight,
            value,
        })
    }
}

// ===== impl LanAdjSidSubTlv =====

impl LanAdjSidSubTlv {
    const MIN_LEN: usize = 8;

    pub(crate) fn decode(stlv_len: u8, buf: &mut Bytes) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if (stlv_len as usize) < Self::MIN_LEN {
            return Err(TlvDecodeError::InvalidLength(stlv_len));
        }

        let flags = AdjSidFlags::from_bits_truncate(buf.try_get_u8()?);
        let weight = buf.try_get_u8()?;
        let neighbor = SystemId::decode(buf)?;
        let value = adj_sid_value(flags, buf)?;

        Ok(LanAdjSidSubTlv {
            flags,
            weight,
            neighbor,
            value,
        })
    }
}

// ===== helper functions =====

// Parses the SID value of an Adjacency-SID or LAN-Adjacency-SID sub-TLV.
//
// The VALUE and LOCAL flags together select the width: both set means a
// 3-byte MPLS label, both clear a 4-byte index. Any other combination is
// rejected, as is a leftover byte count that does not match the deduced
// width.
fn adj_sid_value(flags: AdjSidFlags, buf: &mut Bytes) -> TlvDecodeResult<u32> {
    let value_flag = flags.contains(AdjSidFlags::V);
    let local_flag = flags.contains(AdjSidFlags::L);
    match (value_flag, local_flag) {
        (true, true) => {
            if buf.remaining() != 3 {
                return Err(TlvDecodeError::InvalidSidLength(
                    buf.remaining() as u8
                ));
            }
            Ok(buf.try_get_u24()?)
        }
        (false, false) => {
            if buf.remaining() != 4 {
                return Err(TlvDecodeError::InvalidSidLength(
                    buf.remaining() as u8
                ));
            }
            Ok(buf.try_get_u32()?)
        }
        _ => Err(TlvDecodeError::InvalidFlagCombination),
    }
}
