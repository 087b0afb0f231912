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
use serde::{Deserialize, Serialize};

use crate::bytes::BytesExt;
use crate::packet::error::{TlvDecodeError, TlvDecodeResult};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[derive(Deserialize, Serialize)]
    #[serde(transparent)]
    pub struct PrefixSidFlags: u8 {
        const R = 0x80;
        const N = 0x40;
        const P = 0x20;
        const E = 0x10;
        const V = 0x08;
        const L = 0x04;
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(new)]
#[derive(Deserialize, Serialize)]
pub struct PrefixSidSubTlv {
    pub flags: PrefixSidFlags,
    pub algo: u8,
    pub value: u32,
}

// ===== impl PrefixSidSubTlv =====

impl PrefixSidSubTlv {
    const MIN_LEN: usize = 4;

    pub(crate) fn decode(stlv_len: u8, buf: &mut Bytes) -> TlvDecodeResult<Self> {
        // Validate the TLV length.
        if (stlv_len as usize) < Self::MIN_LEN {
            return Err(TlvDecodeError::InvalidLength(stlv_len));
        }

        let flags = PrefixSidFlags::from_bits_truncate(buf.try_get_u8()?);
        let algo = buf.try_get_u8()?;

        // Parse SID (variable length). The VALUE flag selects a 3-byte MPLS
        // label over a 4-byte index.
        let value = if flags.contains(PrefixSidFlags::V) {
            if (stlv_len as usize) < Self::MIN_LEN + 1 {
                return Err(TlvDecodeError::InvalidLength(stlv_len));
            }
            buf.try_get_u24()?
        } else {
            if (stlv_len as usize) < Self::MIN_LEN + 2 {
                return Err(TlvDecodeError::InvalidLength(stlv_len));
            }
            buf.try_get_u32()?
        };

        Ok(PrefixSidSubTlv { flags, algo, value })
    }
}
