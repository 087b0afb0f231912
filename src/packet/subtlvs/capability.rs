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
use derive_new::new;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::bytes::BytesExt;
use crate::packet::consts::{LabelBindingStlvType, SrAlgo, TlvType};
use crate::packet::error::{Diagnostics, TlvDecodeError, TlvDecodeResult};

#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct SrCapabilitiesSubTlv {
    pub flags: SrCapabilitiesFlags,
    pub srgb_descriptors: Vec<SrgbDescriptor>,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct SrCapabilitiesFlags: u8 {
        const I = 0x80;
        const V = 0x40;
    }
}

// One SRGB descriptor: a label range size and the first SID of the range.
//
// The wire form carries the first SID either as a 3-byte MPLS label or a
// 4-byte index; both collapse into the 32-bit value here.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct SrgbDescriptor {
    pub range: u32,
    pub value: u32,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct SrAlgoSubTlv(Vec<SrAlgo>);

// ===== impl SrCapabilitiesSubTlv =====

impl SrCapabilitiesSubTlv {
    const MIN_LEN: usize = 1;

    pub(crate) fn decode(
        stlv_len: u8,
        buf: &mut Bytes,
        diags: &mut Diagnostics,
    ) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if (stlv_len as usize) < Self::MIN_LEN {
            return Err(TlvDecodeError::InvalidLength(stlv_len));
        }

        let flags = SrCapabilitiesFlags::from_bits_truncate(buf.try_get_u8()?);
        let mut srgb_descriptors = vec![];
        while buf.remaining() >= 1 {
            if buf.remaining() < SrgbDescriptor::MIN_SIZE {
                return Err(TlvDecodeError::InvalidLength(stlv_len));
            }
            let descriptor = SrgbDescriptor::decode(buf, diags)?;
            srgb_descriptors.push(descriptor);
        }

        Ok(SrCapabilitiesSubTlv {
            flags,
            srgb_descriptors,
        })
    }
}

// ===== impl SrgbDescriptor =====

impl SrgbDescriptor {
    // 3-byte range plus the smallest SID/Label sub-TLV (label form).
    const MIN_SIZE: usize = 8;

    pub(crate) fn decode(
        buf: &mut Bytes,
        diags: &mut Diagnostics,
    ) -> TlvDecodeResult<Self> {
        let range = buf.try_get_u24()?;

        // Only the SID/Label sub-TLV is valid here; an unexpected type is
        // recorded but the value is still taken from the declared width.
        let stlv_type = buf.try_get_u8()?;
        if stlv_type != LabelBindingStlvType::SidLabel as u8 {
            diags.push(
                TlvType::RouterCapability as u8,
                TlvDecodeError::UnexpectedType(stlv_type),
            );
        }
        let stlv_len = buf.try_get_u8()?;
        let value = match stlv_len {
            3 => buf.try_get_u24()?,
            4 => buf.try_get_u32()?,
            _ => {
                return Err(TlvDecodeError::InvalidLength(stlv_len));
            }
        };

        Ok(SrgbDescriptor { range, value })
    }
}

// ===== impl SrAlgoSubTlv =====

impl SrAlgoSubTlv {
    pub(crate) fn decode(
        stlv_len: u8,
        buf: &mut Bytes,
        diags: &mut Diagnostics,
    ) -> TlvDecodeResult<Self> {
        let mut list = vec![];
        for _ in 0..stlv_len {
            let algo = buf.try_get_u8()?;
            let Some(algo) = SrAlgo::from_u8(algo) else {
                diags.push(
                    TlvType::RouterCapability as u8,
                    TlvDecodeError::UnknownSrAlgo(algo),
                );
                continue;
            };
            list.push(algo);
        }

        Ok(SrAlgoSubTlv(list))
    }

    pub fn get(&self) -> &[SrAlgo] {
        &self.0
    }
}
