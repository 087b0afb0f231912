//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

use bitflags::bitflags;
use bytes::{Buf, Bytes};
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use tracing::debug_span;

use crate::packet::LspId;
use crate::packet::consts::TlvType;
use crate::packet::error::{
    DecodeError, DecodeResult, Diagnostics, TlvDecodeError,
};
use crate::packet::tlv::{
    AreaAddressesTlv, DynamicHostnameTlv, ExtIpv4ReachTlv, ExtIsReachTlv,
    Ipv4AddressesTlv, Ipv4TeRouterIdTlv, Ipv6AddressesTlv, Ipv6ReachTlv,
    ProtocolsSupportedTlv, RouterCapTlv,
};

// IS-IS Link State PDU, starting at the LSP ID field.
#[derive(Clone, Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Lsp {
    pub lsp_id: LspId,
    pub seqno: u32,
    pub cksum: u16,
    pub flags: LspFlags,
    pub tlvs: LspTlvs,
}

// IS-IS LSP flags field.
//
// The two low-order IS-type bits share the byte but are not LSP flags and
// are dropped on decode.
bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct LspFlags: u8 {
        const P = 0x80;
        const ATT_ERROR = 0x40;
        const ATT_EXPENSE = 0x20;
        const ATT_DELAY = 0x10;
        const ATT_DEFAULT = 0x08;
        const OL = 0x04;
    }
}

// The TLV payload of one LSP: exactly one container per supported TLV type,
// created on first encounter and merged into by later occurrences of the
// same type.
#[derive(Clone, Debug, Default, PartialEq)]
#[serde_with::apply(
    Option => #[serde(default, skip_serializing_if = "Option::is_none")],
)]
#[derive(Deserialize, Serialize)]
pub struct LspTlvs {
    pub area_addrs: Option<AreaAddressesTlv>,
    pub protocols_supported: Option<ProtocolsSupportedTlv>,
    pub ipv4_addrs: Option<Ipv4AddressesTlv>,
    pub ipv4_te_router_id: Option<Ipv4TeRouterIdTlv>,
    pub hostname: Option<DynamicHostnameTlv>,
    pub ipv6_addrs: Option<Ipv6AddressesTlv>,
    pub ext_is_reach: Option<ExtIsReachTlv>,
    pub ext_ipv4_reach: Option<ExtIpv4ReachTlv>,
    pub ipv6_reach: Option<Ipv6ReachTlv>,
    pub router_cap: Option<RouterCapTlv>,
}

// ===== impl Lsp =====

impl Lsp {
    // LSP ID (8), sequence number (4), checksum (2) and flags (1).
    pub const MIN_LEN: usize = 16;

    // Decodes an IS-IS LSP from a bytes buffer, discarding `offset` leading
    // bytes first.
    //
    // Header-level failures abort the decode. TLV-level failures do not: the
    // affected TLV is cut short, the error is recorded in the returned
    // diagnostics, and the walk continues with the next top-level TLV.
    pub fn decode(
        mut buf: Bytes,
        offset: usize,
    ) -> DecodeResult<(Self, Diagnostics)> {
        if offset > buf.len() {
            return Err(DecodeError::IncompletePdu);
        }
        buf.advance(offset);
        if buf.remaining() < Self::MIN_LEN {
            return Err(DecodeError::IncompletePdu);
        }

        // Parse LSP ID.
        let lsp_id = LspId::decode(&mut buf)?;

        // Parse sequence number.
        let seqno = buf.try_get_u32()?;

        // Parse checksum.
        let cksum = buf.try_get_u16()?;

        // Parse flags.
        let flags = buf.try_get_u8()?;
        let flags = LspFlags::from_bits_truncate(flags);

        // Parse top-level TLVs.
        let span = debug_span!("LSP", lsp_id = %lsp_id, seqno);
        let _span_guard = span.enter();
        let mut tlvs = LspTlvs::default();
        let mut diags = Diagnostics::default();
        while buf.remaining() >= 1 {
            // Parse TLV type.
            let tlv_type = buf.try_get_u8()?;
            let tlv_etype = TlvType::from_u8(tlv_type);

            // Parse and validate TLV length. A type byte without a length
            // byte, or a length running past the buffer, leaves nothing
            // decodable behind it.
            if buf.remaining() < 1 {
                diags.push(tlv_type, TlvDecodeError::Truncated);
                break;
            }
            let tlv_len = buf.try_get_u8()?;
            if tlv_len as usize > buf.remaining() {
                diags.push(tlv_type, TlvDecodeError::Truncated);
                break;
            }

            // Parse TLV value.
            let span = debug_span!("TLV", r#type = tlv_type, length = tlv_len);
            let _span_guard = span.enter();
            let mut buf_tlv = buf.copy_to_bytes(tlv_len as usize);
            let result = match tlv_etype {
                Some(TlvType::AreaAddresses) => AreaAddressesTlv::decode(
                    tlv_len,
                    &mut buf_tlv,
                    &mut tlvs.area_addrs,
                ),
                Some(TlvType::ExtIsReach) => ExtIsReachTlv::decode(
                    tlv_len,
                    &mut buf_tlv,
                    &mut tlvs.ext_is_reach,
                    &mut diags,
                ),
                Some(TlvType::ProtocolsSupported) => {
                    ProtocolsSupportedTlv::decode(
                        tlv_len,
                        &mut buf_tlv,
                        &mut tlvs.protocols_supported,
                        &mut diags,
                    )
                }
                Some(TlvType::Ipv4Addresses) => Ipv4AddressesTlv::decode(
                    tlv_len,
                    &mut buf_tlv,
                    &mut tlvs.ipv4_addrs,
                ),
                Some(TlvType::Ipv4TeRouterId) => Ipv4TeRouterIdTlv::decode(
                    tlv_len,
                    &mut buf_tlv,
                    &mut tlvs.ipv4_te_router_id,
                ),
                Some(TlvType::ExtIpv4Reach) => ExtIpv4ReachTlv::decode(
                    tlv_len,
                    &mut buf_tlv,
                    &mut tlvs.ext_ipv4_reach,
                    &mut diags,
                ),
                Some(TlvType::DynamicHostname) => DynamicHostnameTlv::decode(
                    tlv_len,
                    &mut buf_tlv,
                    &mut tlvs.hostname,
                ),
                Some(TlvType::Ipv6Addresses) => Ipv6AddressesTlv::decode(
                    tlv_len,
                    &mut buf_tlv,
                    &mut tlvs.ipv6_addrs,
                ),
                Some(TlvType::Ipv6Reach) => Ipv6ReachTlv::decode(
                    tlv_len,
                    &mut buf_tlv,
                    &mut tlvs.ipv6_reach,
                    &mut diags,
                ),
                Some(TlvType::RouterCapability) => RouterCapTlv::decode(
                    tlv_len,
                    &mut buf_tlv,
                    &mut tlvs.router_cap,
                    &mut diags,
                ),
                None => {
                    Err(TlvDecodeError::UnknownTlvType(tlv_type))
                }
            };
            if let Err(error) = result {
                diags.push(tlv_type, error);
            }
        }

        let lsp = Lsp {
            lsp_id,
            seqno,
            cksum,
            flags,
            tlvs,
        };
        Ok((lsp, diags))
    }
}
