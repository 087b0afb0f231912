//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

use num_derive::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

// IS-IS top-level TLV types.
//
// IANA registry:
// https://www.iana.org/assignments/isis-tlv-codepoints/isis-tlv-codepoints.xhtml#tlv-codepoints
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum TlvType {
    AreaAddresses = 1,
    ExtIsReach = 22,
    ProtocolsSupported = 129,
    Ipv4Addresses = 132,
    Ipv4TeRouterId = 134,
    ExtIpv4Reach = 135,
    DynamicHostname = 137,
    Ipv6Addresses = 232,
    Ipv6Reach = 236,
    RouterCapability = 242,
}

// IS-IS Sub-TLVs for TLVs Advertising Neighbor Information.
//
// IANA registry:
// https://www.iana.org/assignments/isis-tlv-codepoints/isis-tlv-codepoints.xhtml#isis-tlv-codepoints-advertising-neighbor-information
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum NeighborStlvType {
    AdminGroup = 3,
    LinkLocalRemoteIds = 4,
    Ipv4InterfaceAddress = 6,
    Ipv4NeighborAddress = 8,
    MaxLinkBandwidth = 9,
    MaxResvLinkBandwidth = 10,
    UnreservedBandwidth = 11,
    AdjacencySid = 31,
    LanAdjacencySid = 32,
    ResidualBandwidth = 38,
}

// IS-IS Sub-TLVs for TLVs Advertising Prefix Reachability.
//
// IANA registry:
// https://www.iana.org/assignments/isis-tlv-codepoints/isis-tlv-codepoints.xhtml#isis-tlv-codepoints-advertising-prefix-reachability
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum PrefixStlvType {
    PrefixSid = 3,
}

// IS-IS Sub-TLVs for the Router Capability TLV.
//
// IANA registry:
// https://www.iana.org/assignments/isis-tlv-codepoints/isis-tlv-codepoints.xhtml#isis-tlv-codepoints-242
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum RouterCapStlvType {
    SrCapability = 2,
    SrAlgorithm = 19,
}

// IS-IS Sub-TLVs for Segment Identifier/Label Binding TLVs.
//
// IANA registry:
// https://www.iana.org/assignments/isis-tlv-codepoints/isis-tlv-codepoints.xhtml#tlv-149-150
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum LabelBindingStlvType {
    SidLabel = 1,
}

// Network Layer Protocol IDs (TLV 129).
//
// IANA registry:
// https://www.iana.org/assignments/nlpids/nlpids.xhtml
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum Nlpid {
    Ipv4 = 0xCC,
    Ipv6 = 0x8E,
}

// Segment Routing algorithms (TLV 242, sub-TLV 19).
//
// IANA registry:
// https://www.iana.org/assignments/igp-parameters/igp-parameters.xhtml#igp-algorithm-types
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(FromPrimitive, ToPrimitive)]
#[derive(Deserialize, Serialize)]
pub enum SrAlgo {
    Spf = 0,
    StrictSpf = 1,
}
