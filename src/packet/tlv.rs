//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::net::{Ipv4Addr, Ipv6Addr};

use bitflags::bitflags;
use bytes::{Buf, Bytes};
use derive_new::new;
use ipnetwork::{Ipv4Network, Ipv6Network};
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use tracing::debug_span;

use crate::bytes::BytesExt;
use crate::ip::{Ipv4AddrExt, Ipv4NetworkExt, Ipv6AddrExt, Ipv6NetworkExt};
use crate::packet::consts::{
    Nlpid, NeighborStlvType, PrefixStlvType, RouterCapStlvType, TlvType,
};
use crate::packet::error::{Diagnostics, TlvDecodeError, TlvDecodeResult};
use crate::packet::subtlvs::capability::{SrAlgoSubTlv, SrCapabilitiesSubTlv};
use crate::packet::subtlvs::neighbor::{
    AdjSidSubTlv, AdminGroupSubTlv, Ipv4InterfaceAddrSubTlv,
    Ipv4NeighborAddrSubTlv, LanAdjSidSubTlv, LinkIdSubTlv, MaxLinkBwSubTlv,
    MaxResvLinkBwSubTlv, ResidualBwSubTlv, UnreservedBwSubTlv,
};
use crate::packet::subtlvs::prefix::PrefixSidSubTlv;
use crate::packet::{AreaAddr, LanId};

// TLV header size.
pub const TLV_HDR_SIZE: usize = 2;
// TLV maximum length.
pub const TLV_MAX_LEN: usize = 255;

// A raw Type-Length-Value record carved out of a byte range.
//
// Top-level TLVs and nested sub-TLVs share this shape; `value` always holds
// exactly `length` bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct RawTlv {
    pub tlv_type: u8,
    pub length: u8,
    pub value: Bytes,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct AreaAddressesTlv {
    pub list: Vec<AreaAddr>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct ProtocolsSupportedTlv {
    pub list: Vec<Nlpid>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Ipv4AddressesTlv {
    pub list: Vec<Ipv4Addr>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Ipv4TeRouterIdTlv {
    pub list: Vec<Ipv4Addr>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct DynamicHostnameTlv {
    pub list: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Ipv6AddressesTlv {
    pub list: Vec<Ipv6Addr>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct ExtIsReachTlv {
    pub neighbors: BTreeMap<LanId, Neighbor>,
}

// All adjacencies advertised towards one neighbor, keyed by the instance
// number synthesized at insertion time.
#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Neighbor {
    pub instances: BTreeMap<u64, NeighborInstance>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct NeighborInstance {
    pub metric: u32,
    pub sub_tlvs: ExtIsReachSubTlvs,
}

// Sub-TLVs of one Extended IS Reachability adjacency.
//
// One slot per sub-TLV type: repeatable values accumulate in their slot,
// singular values are overwritten by a later occurrence.
#[derive(Clone, Debug, Default, PartialEq)]
#[serde_with::apply(
    Option => #[serde(default, skip_serializing_if = "Option::is_none")],
    BTreeMap => #[serde(default, skip_serializing_if = "BTreeMap::is_empty")],
    Vec => #[serde(default, skip_serializing_if = "Vec::is_empty")],
)]
#[derive(Deserialize, Serialize)]
pub struct ExtIsReachSubTlvs {
    pub admin_groups: Vec<AdminGroupSubTlv>,
    pub link_id: Option<LinkIdSubTlv>,
    pub ipv4_interface_addrs: Vec<Ipv4InterfaceAddrSubTlv>,
    pub ipv4_neighbor_addrs: Vec<Ipv4NeighborAddrSubTlv>,
    pub max_link_bw: Option<MaxLinkBwSubTlv>,
    pub max_resv_link_bw: Option<MaxResvLinkBwSubTlv>,
    pub unreserved_bw: Option<UnreservedBwSubTlv>,
    pub adj_sids: BTreeMap<u32, AdjSidSubTlv>,
    pub lan_adj_sids: BTreeMap<u32, LanAdjSidSubTlv>,
    pub residual_bw: Option<ResidualBwSubTlv>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct ExtIpv4ReachTlv {
    pub prefixes: BTreeMap<Ipv4Network, Ipv4ReachEntry>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Ipv4ReachEntry {
    pub metric: u32,
    pub up_down: bool,
    pub s_bit: bool,
    pub sub_tlvs: PrefixSubTlvs,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Ipv6ReachTlv {
    pub prefixes: BTreeMap<Ipv6Network, Ipv6ReachEntry>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Ipv6ReachEntry {
    pub metric: u32,
    pub up_down: bool,
    pub x_bit: bool,
    pub s_bit: bool,
    pub sub_tlvs: PrefixSubTlvs,
}

// Sub-TLVs of one prefix reachability entry, with Prefix-SIDs keyed by
// SID value.
#[derive(Clone, Debug, Default, PartialEq)]
#[serde_with::apply(
    BTreeMap => #[serde(default, skip_serializing_if = "BTreeMap::is_empty")],
)]
#[derive(Deserialize, Serialize)]
pub struct PrefixSubTlvs {
    pub prefix_sids: BTreeMap<u32, PrefixSidSubTlv>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct RouterCapTlv {
    pub capabilities: BTreeMap<u32, Capability>,
}

#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Capability {
    pub router_id: Ipv4Addr,
    pub flags: CapabilityFlags,
    pub sub_tlvs: CapabilitySubTlvs,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct CapabilityFlags: u8 {
        const D = 0x02;
        const S = 0x01;
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[serde_with::apply(
    Option => #[serde(default, skip_serializing_if = "Option::is_none")],
)]
#[derive(Deserialize, Serialize)]
pub struct CapabilitySubTlvs {
    pub sr_cap: Option<SrCapabilitiesSubTlv>,
    pub sr_algo: Option<SrAlgoSubTlv>,
}

// ===== impl AreaAddressesTlv =====

impl AreaAddressesTlv {
    pub(crate) fn decode(
        tlv_len: u8,
        buf: &mut Bytes,
        tlv: &mut Option<Self>,
    ) -> TlvDecodeResult<()> {
        let tlv = tlv.get_or_insert_default();

        while buf.remaining() >= 1 {
            // Parse area address length.
            let addr_len = buf.try_get_u8()?;

            // An address running past the TLV is fatal for the TLV.
            if addr_len as usize > buf.remaining() {
                return Err(TlvDecodeError::InvalidLength(tlv_len));
            }

            // Parse area address.
            let addr = buf.copy_to_bytes(addr_len as usize);
            tlv.list.push(AreaAddr::from(addr.as_ref()));
        }

        Ok(())
    }
}

// ===== impl ProtocolsSupportedTlv =====

impl ProtocolsSupportedTlv {
    pub(crate) fn decode(
        _tlv_len: u8,
        buf: &mut Bytes,
        tlv: &mut Option<Self>,
        diags: &mut Diagnostics,
    ) -> TlvDecodeResult<()> {
        let tlv = tlv.get_or_insert_default();

        while buf.remaining() >= 1 {
            let proto = buf.try_get_u8()?;
            let Some(proto) = Nlpid::from_u8(proto) else {
                diags.push(
                    TlvType::ProtocolsSupported as u8,
                    TlvDecodeError::UnknownNlpid(proto),
                );
                continue;
            };
            tlv.list.push(proto);
        }

        Ok(())
    }
}

// ===== impl Ipv4AddressesTlv =====

impl Ipv4AddressesTlv {
    pub(crate) fn decode(
        tlv_len: u8,
        buf: &mut Bytes,
        tlv: &mut Option<Self>,
    ) -> TlvDecodeResult<()> {
        let tlv = tlv.get_or_insert_default();

        // Validate the TLV length.
        if tlv_len as usize % Ipv4Addr::LENGTH != 0 {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        while buf.remaining() >= Ipv4Addr::LENGTH {
            // Parse IPv4 address.
            let addr = buf.try_get_ipv4()?;
            tlv.list.push(addr);
        }

        Ok(())
    }
}

// ===== impl Ipv4TeRouterIdTlv =====

impl Ipv4TeRouterIdTlv {
    const SIZE: usize = 4;

    pub(crate) fn decode(
        tlv_len: u8,
        buf: &mut Bytes,
        tlv: &mut Option<Self>,
    ) -> TlvDecodeResult<()> {
        // Validate the TLV length.
        if tlv_len as usize != Self::SIZE {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }
        let tlv = tlv.get_or_insert_default();

        let addr = buf.try_get_ipv4()?;
        tlv.list.push(addr);

        Ok(())
    }
}

// ===== impl DynamicHostnameTlv =====

impl DynamicHostnameTlv {
    pub(crate) fn decode(
        tlv_len: u8,
        buf: &mut Bytes,
        tlv: &mut Option<Self>,
    ) -> TlvDecodeResult<()> {
        // Validate the TLV length.
        if tlv_len == 0 {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }
        let tlv = tlv.get_or_insert_default();

        let hostname = buf.copy_to_bytes(buf.remaining());
        let hostname = String::from_utf8_lossy(&hostname).to_string();
        tlv.list.push(hostname);

        Ok(())
    }
}

// ===== impl Ipv6AddressesTlv =====

impl Ipv6AddressesTlv {
    pub(crate) fn decode(
        tlv_len: u8,
        buf: &mut Bytes,
        tlv: &mut Option<Self>,
    ) -> TlvDecodeResult<()> {
        let tlv = tlv.get_or_insert_default();

        // Validate the TLV length.
        if tlv_len as usize % Ipv6Addr::LENGTH != 0 {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }

        while buf.remaining() >= Ipv6Addr::LENGTH {
            // Parse IPv6 address.
            let addr = buf.try_get_ipv6()?;
            tlv.list.push(addr);
        }

        Ok(())
    }
}

// ===== impl ExtIsReachTlv =====

impl ExtIsReachTlv {
    const ENTRY_MIN_SIZE: usize = 11;

    pub(crate) fn decode(
        tlv_len: u8,
        buf: &mut Bytes,
        tlv: &mut Option<Self>,
        diags: &mut Diagnostics,
    ) -> TlvDecodeResult<()> {
        const TLV_TYPE: u8 = TlvType::ExtIsReach as u8;

        // Validate the TLV length.
        if (tlv_len as usize) < Self::ENTRY_MIN_SIZE {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }
        let tlv = tlv.get_or_insert_default();

        while buf.remaining() >= 1 {
            // A truncated entry ends the walk; anything past it is
            // unreachable anyway.
            if buf.remaining() < Self::ENTRY_MIN_SIZE {
                diags.push(TLV_TYPE, TlvDecodeError::Truncated);
                break;
            }

            let neighbor_id = LanId::decode(buf)?;
            let metric = buf.try_get_u24()?;

            // Parse Sub-TLVs.
            let sub_tlvs_len = buf.try_get_u8()?;
            if sub_tlvs_len as usize > buf.remaining() {
                diags.push(TLV_TYPE, TlvDecodeError::Truncated);
                break;
            }
            let buf_stlvs = buf.copy_to_bytes(sub_tlvs_len as usize);
            let stlvs = match tlv_split(buf_stlvs) {
                Ok(stlvs) => stlvs,
                Err(error) => {
                    diags.push(TLV_TYPE, error);
                    break;
                }
            };

            let mut sub_tlvs = ExtIsReachSubTlvs::default();
            for stlv in stlvs {
                let span = debug_span!(
                    "sub-TLV",
                    r#type = stlv.tlv_type,
                    length = stlv.length
                );
                let _span_guard = span.enter();
                let mut buf_stlv = stlv.value;
                match NeighborStlvType::from_u8(stlv.tlv_type) {
                    Some(NeighborStlvType::AdminGroup) => {
                        match AdminGroupSubTlv::decode(stlv.length, &mut buf_stlv)
                        {
                            Ok(stlv) => sub_tlvs.admin_groups.push(stlv),
                            Err(error) => diags.push(TLV_TYPE, error),
                        }
                    }
                    Some(NeighborStlvType::LinkLocalRemoteIds) => {
                        match LinkIdSubTlv::decode(stlv.length, &mut buf_stlv) {
                            Ok(stlv) => sub_tlvs.link_id = Some(stlv),
                            Err(error) => diags.push(TLV_TYPE, error),
                        }
                    }
                    Some(NeighborStlvType::Ipv4InterfaceAddress) => {
                        match Ipv4InterfaceAddrSubTlv::decode(
                            stlv.length,
                            &mut buf_stlv,
                        ) {
                            Ok(stlv) => {
                                sub_tlvs.ipv4_interface_addrs.push(stlv)
                            }
                            Err(error) => diags.push(TLV_TYPE, error),
                        }
                    }
                    Some(NeighborStlvType::Ipv4NeighborAddress) => {
                        match Ipv4NeighborAddrSubTlv::decode(
                            stlv.length,
                            &mut buf_stlv,
                        ) {
                            Ok(stlv) => sub_tlvs.ipv4_neighbor_addrs.push(stlv),
                            Err(error) => diags.push(TLV_TYPE, error),
                        }
                    }
                    Some(NeighborStlvType::MaxLinkBandwidth) => {
                        match MaxLinkBwSubTlv::decode(stlv.length, &mut buf_stlv)
                        {
                            Ok(stlv) => sub_tlvs.max_link_bw = Some(stlv),
                            Err(error) => diags.push(TLV_TYPE, error),
                        }
                    }
                    Some(NeighborStlvType::MaxResvLinkBandwidth) => {
                        match MaxResvLinkBwSubTlv::decode(
                            stlv.length,
                            &mut buf_stlv,
                        ) {
                            Ok(stlv) => sub_tlvs.max_resv_link_bw = Some(stlv),
                            Err(error) => diags.push(TLV_TYPE, error),
                        }
                    }
                    Some(NeighborStlvType::UnreservedBandwidth) => {
                        match UnreservedBwSubTlv::decode(
                            stlv.length,
                            &mut buf_stlv,
                        ) {
                            Ok(stlv) => sub_tlvs.unreserved_bw = Some(stlv),
                            Err(error) => diags.push(TLV_TYPE, error),
                        }
                    }
                    Some(NeighborStlvType::AdjacencySid) => {
                        match AdjSidSubTlv::decode(stlv.length, &mut buf_stlv) {
                            Ok(stlv) => match sub_tlvs.adj_sids.entry(stlv.value)
                            {
                                Entry::Vacant(e) => {
                                    e.insert(stlv);
                                }
                                Entry::Occupied(_) => diags.push(
                                    TLV_TYPE,
                                    TlvDecodeError::DuplicateSid(stlv.value),
                                ),
                            },
                            Err(error) => diags.push(TLV_TYPE, error),
                        }
                    }
                    Some(NeighborStlvType::LanAdjacencySid) => {
                        match LanAdjSidSubTlv::decode(stlv.length, &mut buf_stlv)
                        {
                            Ok(stlv) => {
                                match sub_tlvs.lan_adj_sids.entry(stlv.value) {
                                    Entry::Vacant(e) => {
                                        e.insert(stlv);
                                    }
                                    Entry::Occupied(_) => diags.push(
                                        TLV_TYPE,
                                        TlvDecodeError::DuplicateSid(stlv.value),
                                    ),
                                }
                            }
                            Err(error) => diags.push(TLV_TYPE, error),
                        }
                    }
                    Some(NeighborStlvType::ResidualBandwidth) => {
                        match ResidualBwSubTlv::decode(stlv.length, &mut buf_stlv)
                        {
                            Ok(stlv) => sub_tlvs.residual_bw = Some(stlv),
                            Err(error) => diags.push(TLV_TYPE, error),
                        }
                    }
                    _ => {
                        // Unsupported neighbor sub-TLVs are skipped.
                    }
                }
            }

            // The same neighbor may be advertised multiple times; each
            // repetition becomes a new instance with the next free number.
            let neighbor = tlv.neighbors.entry(neighbor_id).or_default();
            let instance_id = neighbor.instances.len() as u64;
            neighbor
                .instances
                .insert(instance_id, NeighborInstance { metric, sub_tlvs });
        }

        Ok(())
    }
}

// ===== impl ExtIpv4ReachTlv =====

impl ExtIpv4ReachTlv {
    const ENTRY_MIN_SIZE: usize = 5;
    const CONTROL_UPDOWN_BIT: u8 = 0x80;
    const CONTROL_SUBTLVS: u8 = 0x40;
    const CONTROL_PLEN_MASK: u8 = 0x3F;

    pub(crate) fn decode(
        tlv_len: u8,
        buf: &mut Bytes,
        tlv: &mut Option<Self>,
        diags: &mut Diagnostics,
    ) -> TlvDecodeResult<()> {
        let tlv = tlv.get_or_insert_default();

        while buf.remaining() >= 1 {
            if buf.remaining() < Self::ENTRY_MIN_SIZE {
                return Err(TlvDecodeError::InvalidLength(tlv_len));
            }

            // Parse metric.
            let metric = buf.try_get_u32()?;

            // Parse control field.
            let control = buf.try_get_u8()?;
            let up_down = (control & Self::CONTROL_UPDOWN_BIT) != 0;
            let s_bit = (control & Self::CONTROL_SUBTLVS) != 0;
            let plen = control & Self::CONTROL_PLEN_MASK;
            if plen > Ipv4Network::MAX_PREFIXLEN {
                return Err(TlvDecodeError::InvalidPrefixLength(plen));
            }

            // Parse prefix (variable length).
            let mut prefix_bytes = [0; Ipv4Addr::LENGTH];
            let plen_wire = prefix_wire_len(plen);
            buf.try_copy_to_slice(&mut prefix_bytes[..plen_wire])?;
            let prefix = Ipv4Addr::from(prefix_bytes);
            let prefix = Ipv4Network::new(prefix, plen)
                .map_err(|_| TlvDecodeError::InvalidPrefixLength(plen))?;

            // The prefix is the entry key; a repeated key is rejected rather
            // than overwritten.
            if tlv.prefixes.contains_key(&prefix) {
                return Err(TlvDecodeError::DuplicatePrefix(prefix.into()));
            }

            // Parse Sub-TLVs.
            let mut sub_tlvs = PrefixSubTlvs::default();
            if s_bit {
                sub_tlvs =
                    PrefixSubTlvs::decode(TlvType::ExtIpv4Reach, buf, diags)?;
            }

            tlv.prefixes.insert(
                prefix,
                Ipv4ReachEntry {
                    metric,
                    up_down,
                    s_bit,
                    sub_tlvs,
                },
            );
        }

        Ok(())
    }
}

// ===== impl Ipv6ReachTlv =====

impl Ipv6ReachTlv {
    const ENTRY_MIN_SIZE: usize = 6;
    const FLAG_UPDOWN: u8 = 0x80;
    const FLAG_EXTERNAL: u8 = 0x40;
    const FLAG_SUBTLVS: u8 = 0x20;

    pub(crate) fn decode(
        tlv_len: u8,
        buf: &mut Bytes,
        tlv: &mut Option<Self>,
        diags: &mut Diagnostics,
    ) -> TlvDecodeResult<()> {
        let tlv = tlv.get_or_insert_default();

        while buf.remaining() >= 1 {
            if buf.remaining() < Self::ENTRY_MIN_SIZE {
                return Err(TlvDecodeError::InvalidLength(tlv_len));
            }

            // Parse metric.
            let metric = buf.try_get_u32()?;

            // Parse flags field.
            let flags = buf.try_get_u8()?;
            let up_down = (flags & Self::FLAG_UPDOWN) != 0;
            let x_bit = (flags & Self::FLAG_EXTERNAL) != 0;
            let s_bit = (flags & Self::FLAG_SUBTLVS) != 0;

            // Parse prefix length.
            let plen = buf.try_get_u8()?;
            if plen > Ipv6Network::MAX_PREFIXLEN {
                return Err(TlvDecodeError::InvalidPrefixLength(plen));
            }

            // Parse prefix (variable length).
            let mut prefix_bytes = [0; Ipv6Addr::LENGTH];
            let plen_wire = prefix_wire_len(plen);
            buf.try_copy_to_slice(&mut prefix_bytes[..plen_wire])?;
            let prefix = Ipv6Addr::from(prefix_bytes);
            let prefix = Ipv6Network::new(prefix, plen)
                .map_err(|_| TlvDecodeError::InvalidPrefixLength(plen))?;

            // The prefix is the entry key; a repeated key is rejected rather
            // than overwritten.
            if tlv.prefixes.contains_key(&prefix) {
                return Err(TlvDecodeError::DuplicatePrefix(prefix.into()));
            }

            // Parse Sub-TLVs.
            let mut sub_tlvs = PrefixSubTlvs::default();
            if s_bit {
                sub_tlvs =
                    PrefixSubTlvs::decode(TlvType::Ipv6Reach, buf, diags)?;
            }

            tlv.prefixes.insert(
                prefix,
                Ipv6ReachEntry {
                    metric,
                    up_down,
                    x_bit,
                    s_bit,
                    sub_tlvs,
                },
            );
        }

        Ok(())
    }
}

// ===== impl PrefixSubTlvs =====

impl PrefixSubTlvs {
    pub(crate) fn decode(
        tlv_type: TlvType,
        buf: &mut Bytes,
        diags: &mut Diagnostics,
    ) -> TlvDecodeResult<Self> {
        let mut sub_tlvs = PrefixSubTlvs::default();

        // Parse and validate the Sub-TLV region length.
        let sub_tlvs_len = buf.try_get_u8()?;
        if sub_tlvs_len as usize > buf.remaining() {
            return Err(TlvDecodeError::InvalidLength(sub_tlvs_len));
        }
        let buf_stlvs = buf.copy_to_bytes(sub_tlvs_len as usize);

        for stlv in tlv_split(buf_stlvs)? {
            let span = debug_span!(
                "sub-TLV",
                r#type = stlv.tlv_type,
                length = stlv.length
            );
            let _span_guard = span.enter();
            let mut buf_stlv = stlv.value;
            match PrefixStlvType::from_u8(stlv.tlv_type) {
                Some(PrefixStlvType::PrefixSid) => {
                    match PrefixSidSubTlv::decode(stlv.length, &mut buf_stlv) {
                        Ok(stlv) => {
                            match sub_tlvs.prefix_sids.entry(stlv.value) {
                                Entry::Vacant(e) => {
                                    e.insert(stlv);
                                }
                                Entry::Occupied(_) => diags.push(
                                    tlv_type as u8,
                                    TlvDecodeError::DuplicateSid(stlv.value),
                                ),
                            }
                        }
                        Err(error) => diags.push(tlv_type as u8, error),
                    }
                }
                _ => diags.push(
                    tlv_type as u8,
                    TlvDecodeError::UnknownStlvType(stlv.tlv_type),
                ),
            }
        }

        Ok(sub_tlvs)
    }
}

// ===== impl RouterCapTlv =====

impl RouterCapTlv {
    const MIN_SIZE: usize = 5;

    pub(crate) fn decode(
        tlv_len: u8,
        buf: &mut Bytes,
        tlv: &mut Option<Self>,
        diags: &mut Diagnostics,
    ) -> TlvDecodeResult<()> {
        const TLV_TYPE: u8 = TlvType::RouterCapability as u8;

        // Validate the TLV length.
        if (tlv_len as usize) < Self::MIN_SIZE {
            return Err(TlvDecodeError::InvalidLength(tlv_len));
        }
        let tlv = tlv.get_or_insert_default();

        let router_id = buf.try_get_ipv4()?;
        let flags = CapabilityFlags::from_bits_truncate(buf.try_get_u8()?);

        // Each occurrence of the TLV advertises a new capability instance.
        let instance_id = tlv.capabilities.len() as u32;
        let capability = tlv.capabilities.entry(instance_id).or_insert(
            Capability {
                router_id,
                flags,
                sub_tlvs: Default::default(),
            },
        );

        // Parse Sub-TLVs.
        for stlv in tlv_split(buf.copy_to_bytes(buf.remaining()))? {
            let span = debug_span!(
                "sub-TLV",
                r#type = stlv.tlv_type,
                length = stlv.length
            );
            let _span_guard = span.enter();
            let mut buf_stlv = stlv.value;
            match RouterCapStlvType::from_u8(stlv.tlv_type) {
                Some(RouterCapStlvType::SrCapability) => {
                    match SrCapabilitiesSubTlv::decode(
                        stlv.length,
                        &mut buf_stlv,
                        diags,
                    ) {
                        Ok(stlv) => capability.sub_tlvs.sr_cap = Some(stlv),
                        Err(error) => diags.push(TLV_TYPE, error),
                    }
                }
                Some(RouterCapStlvType::SrAlgorithm) => {
                    match SrAlgoSubTlv::decode(stlv.length, &mut buf_stlv, diags)
                    {
                        Ok(stlv) => capability.sub_tlvs.sr_algo = Some(stlv),
                        Err(error) => diags.push(TLV_TYPE, error),
                    }
                }
                _ => diags.push(
                    TLV_TYPE,
                    TlvDecodeError::UnknownStlvType(stlv.tlv_type),
                ),
            }
        }

        Ok(())
    }
}

// ===== helper functions =====

// Calculates the number of bytes required to encode a prefix.
const fn prefix_wire_len(len: u8) -> usize {
    (len as usize).div_ceil(8)
}

// ===== global functions =====

// Splits a byte range into its sequence of raw TLV records.
//
// Each record is carved as one type byte, one length byte, then as many
// value bytes as the length declares. The concatenation of the records is
// exactly the input: no padding, no alignment. A type byte without a length
// byte, or a length running past the end of the input, fails the whole
// split.
pub fn tlv_split(mut buf: Bytes) -> TlvDecodeResult<Vec<RawTlv>> {
    let mut tlvs = vec![];

    while buf.remaining() >= 1 {
        let tlv_type = buf.try_get_u8()?;
        if buf.remaining() < 1 {
            return Err(TlvDecodeError::Truncated);
        }
        let tlv_len = buf.try_get_u8()?;
        if tlv_len as usize > buf.remaining() {
            return Err(TlvDecodeError::Truncated);
        }
        let value = buf.copy_to_bytes(tlv_len as usize);
        tlvs.push(RawTlv::new(tlv_type, tlv_len, value));
    }

    Ok(tlvs)
}
