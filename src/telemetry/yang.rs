//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

use std::borrow::Cow;

use crate::packet::consts::{
    NeighborStlvType, Nlpid, PrefixStlvType, RouterCapStlvType, SrAlgo,
    TlvType,
};
use crate::packet::pdu::LspFlags;
use crate::packet::subtlvs::capability::SrCapabilitiesFlags;
use crate::packet::subtlvs::neighbor::AdjSidFlags;
use crate::packet::subtlvs::prefix::PrefixSidFlags;
use crate::packet::tlv::CapabilityFlags;

// Conversion from a model type to its schema identity name.
pub trait ToYang {
    fn to_yang(&self) -> Cow<'static, str>;
}

// Conversion from a flags field to the corresponding sequence of schema
// names, most significant bit first.
pub trait ToYangBits {
    fn to_yang_bits(&self) -> Vec<&'static str>;
}

// ===== ToYang implementations =====

impl ToYang for TlvType {
    fn to_yang(&self) -> Cow<'static, str> {
        match self {
            TlvType::AreaAddresses => "AREA_ADDRESSES".into(),
            TlvType::ExtIsReach => "EXTENDED_IS_REACHABILITY".into(),
            TlvType::ProtocolsSupported => "NLPID".into(),
            TlvType::Ipv4Addresses => "IPV4_INTERFACE_ADDRESSES".into(),
            TlvType::Ipv4TeRouterId => "IPV4_TE_ROUTER_ID".into(),
            TlvType::ExtIpv4Reach => "EXTENDED_IPV4_REACHABILITY".into(),
            TlvType::DynamicHostname => "DYNAMIC_NAME".into(),
            TlvType::Ipv6Addresses => "IPV6_INTERFACE_ADDRESSES".into(),
            TlvType::Ipv6Reach => "IPV6_REACHABILITY".into(),
            TlvType::RouterCapability => "ROUTER_CAPABILITY".into(),
        }
    }
}

impl ToYang for NeighborStlvType {
    fn to_yang(&self) -> Cow<'static, str> {
        match self {
            NeighborStlvType::AdminGroup => {
                "IS_REACHABILITY_ADMIN_GROUP".into()
            }
            NeighborStlvType::LinkLocalRemoteIds => {
                "IS_REACHABILITY_LINK_ID".into()
            }
            NeighborStlvType::Ipv4InterfaceAddress => {
                "IS_REACHABILITY_IPV4_INTERFACE_ADDRESS".into()
            }
            NeighborStlvType::Ipv4NeighborAddress => {
                "IS_REACHABILITY_IPV4_NEIGHBOR_ADDRESS".into()
            }
            NeighborStlvType::MaxLinkBandwidth => {
                "IS_REACHABILITY_MAX_LINK_BANDWIDTH".into()
            }
            NeighborStlvType::MaxResvLinkBandwidth => {
                "IS_REACHABILITY_MAX_RESERVABLE_BANDWIDTH".into()
            }
            NeighborStlvType::UnreservedBandwidth => {
                "IS_REACHABILITY_UNRESERVED_BANDWIDTH".into()
            }
            NeighborStlvType::AdjacencySid => "IS_REACHABILITY_ADJ_SID".into(),
            NeighborStlvType::LanAdjacencySid => {
                "IS_REACHABILITY_ADJ_LAN_SID".into()
            }
            NeighborStlvType::ResidualBandwidth => {
                "IS_REACHABILITY_RESIDUAL_BANDWIDTH".into()
            }
        }
    }
}

impl ToYang for PrefixStlvType {
    fn to_yang(&self) -> Cow<'static, str> {
        match self {
            PrefixStlvType::PrefixSid => "IP_REACHABILITY_PREFIX_SID".into(),
        }
    }
}

impl ToYang for RouterCapStlvType {
    fn to_yang(&self) -> Cow<'static, str> {
        match self {
            RouterCapStlvType::SrCapability => {
                "ROUTER_CAPABILITY_SR_CAPABILITY".into()
            }
            RouterCapStlvType::SrAlgorithm => {
                "ROUTER_CAPABILITY_SR_ALGORITHM".into()
            }
        }
    }
}

impl ToYang for Nlpid {
    fn to_yang(&self) -> Cow<'static, str> {
        match self {
            Nlpid::Ipv4 => "IPV4".into(),
            Nlpid::Ipv6 => "IPV6".into(),
        }
    }
}

impl ToYang for SrAlgo {
    fn to_yang(&self) -> Cow<'static, str> {
        match self {
            SrAlgo::Spf => "SPF".into(),
            SrAlgo::StrictSpf => "STRICT_SPF".into(),
        }
    }
}

// ===== ToYangBits implementations =====

impl ToYangBits for LspFlags {
    fn to_yang_bits(&self) -> Vec<&'static str> {
        let mut flags = vec![];
        if self.contains(LspFlags::P) {
            flags.push("PARTITION_REPAIR");
        }
        if self.contains(LspFlags::ATT_ERROR) {
            flags.push("ATTACHED_ERROR");
        }
        if self.contains(LspFlags::ATT_EXPENSE) {
            flags.push("ATTACHED_EXPENSE");
        }
        if self.contains(LspFlags::ATT_DELAY) {
            flags.push("ATTACHED_DELAY");
        }
        if self.contains(LspFlags::ATT_DEFAULT) {
            flags.push("ATTACHED_DEFAULT");
        }
        if self.contains(LspFlags::OL) {
            flags.push("OVERLOAD");
        }
        flags
    }
}

impl ToYangBits for CapabilityFlags {
    fn to_yang_bits(&self) -> Vec<&'static str> {
        let mut flags = vec![];
        if self.contains(CapabilityFlags::D) {
            flags.push("DOWN");
        }
        if self.contains(CapabilityFlags::S) {
            flags.push("FLOOD");
        }
        flags
    }
}

impl ToYangBits for SrCapabilitiesFlags {
    fn to_yang_bits(&self) -> Vec<&'static str> {
        let mut flags = vec![];
        if self.contains(SrCapabilitiesFlags::I) {
            flags.push("IPV4_MPLS");
        }
        if self.contains(SrCapabilitiesFlags::V) {
            flags.push("IPV6_MPLS");
        }
        flags
    }
}

impl ToYangBits for AdjSidFlags {
    fn to_yang_bits(&self) -> Vec<&'static str> {
        let mut flags = vec![];
        if self.contains(AdjSidFlags::F) {
            flags.push("ADDRESS_FAMILY");
        }
        if self.contains(AdjSidFlags::B) {
            flags.push("BACKUP");
        }
        if self.contains(AdjSidFlags::V) {
            flags.push("VALUE");
        }
        if self.contains(AdjSidFlags::L) {
            flags.push("LOCAL");
        }
        if self.contains(AdjSidFlags::S) {
            flags.push("SET");
        }
        flags
    }
}

impl ToYangBits for PrefixSidFlags {
    fn to_yang_bits(&self) -> Vec<&'static str> {
        let mut flags = vec![];
        if self.contains(PrefixSidFlags::R) {
            flags.push("READVERTISEMENT");
        }
        if self.contains(PrefixSidFlags::N) {
            flags.push("NODE");
        }
        if self.contains(PrefixSidFlags::P) {
            flags.push("NO_PHP");
        }
        if self.contains(PrefixSidFlags::E) {
            flags.push("EXPLICIT_NULL");
        }
        if self.contains(PrefixSidFlags::V) {
            flags.push("VALUE");
        }
        if self.contains(PrefixSidFlags::L) {
            flags.push("LOCAL");
        }
        flags
    }
}
