//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

use bytes::TryGetError;
use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use tracing::warn;

// Type aliases.
pub type DecodeResult<T> = Result<T, DecodeError>;
pub type TlvDecodeResult<T> = Result<T, TlvDecodeError>;

// IS-IS LSP decoding errors.
//
// These are fatal: no LSP is returned when one of them is raised while
// decoding the fixed header.
#[derive(Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum DecodeError {
    ReadOutOfBounds,
    IncompletePdu,
}

// IS-IS TLV decoding errors.
//
// Raised while decoding an individual TLV or sub-TLV. They never abort the
// overall parse; the dispatcher records them as diagnostics and moves on to
// the next top-level TLV.
#[derive(Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum TlvDecodeError {
    ReadOutOfBounds,
    Truncated,
    InvalidLength(u8),
    InvalidPrefixLength(u8),
    DuplicatePrefix(IpNetwork),
    DuplicateSid(u32),
    InvalidSidLength(u8),
    InvalidFlagCombination,
    InvalidBandwidth,
    UnexpectedType(u8),
    UnknownTlvType(u8),
    UnknownStlvType(u8),
    UnknownNlpid(u8),
    UnknownSrAlgo(u8),
}

// A TLV decoding error recorded against the top-level TLV type it was
// encountered in.
#[derive(Debug, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Diagnostic {
    pub tlv_type: u8,
    pub error: TlvDecodeError,
}

// Ordered aggregate of the non-fatal errors accumulated during one parse.
#[derive(Debug, Default, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Diagnostics(Vec<Diagnostic>);

// ===== impl DecodeError =====

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::ReadOutOfBounds => {
                write!(f, "attempt to read out of bounds")
            }
            DecodeError::IncompletePdu => {
                write!(f, "incomplete PDU")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<TryGetError> for DecodeError {
    fn from(_error: TryGetError) -> DecodeError {
        DecodeError::ReadOutOfBounds
    }
}

// ===== impl TlvDecodeError =====

impl std::fmt::Display for TlvDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TlvDecodeError::ReadOutOfBounds => {
                write!(f, "attempt to read out of bounds")
            }
            TlvDecodeError::Truncated => {
                write!(f, "TLV length overflows the enclosing buffer")
            }
            TlvDecodeError::InvalidLength(tlv_len) => {
                write!(f, "invalid length: {tlv_len}")
            }
            TlvDecodeError::InvalidPrefixLength(plen) => {
                write!(f, "invalid prefix length: {plen}")
            }
            TlvDecodeError::DuplicatePrefix(prefix) => {
                write!(f, "duplicate prefix: {prefix}")
            }
            TlvDecodeError::DuplicateSid(value) => {
                write!(f, "duplicate SID value: {value}")
            }
            TlvDecodeError::InvalidSidLength(len) => {
                write!(f, "invalid SID value length: {len}")
            }
            TlvDecodeError::InvalidFlagCombination => {
                write!(f, "invalid combination of VALUE and LOCAL flags")
            }
            TlvDecodeError::InvalidBandwidth => {
                write!(f, "bandwidth is not a finite IEEE-754 value")
            }
            TlvDecodeError::UnexpectedType(stlv_type) => {
                write!(f, "unexpected type: {stlv_type}")
            }
            TlvDecodeError::UnknownTlvType(tlv_type) => {
                write!(f, "unknown TLV type: {tlv_type}")
            }
            TlvDecodeError::UnknownStlvType(stlv_type) => {
                write!(f, "unknown sub-TLV type: {stlv_type}")
            }
            TlvDecodeError::UnknownNlpid(nlpid) => {
                write!(f, "unknown NLPID: {nlpid}")
            }
            TlvDecodeError::UnknownSrAlgo(algo) => {
                write!(f, "unknown SR algorithm: {algo}")
            }
        }
    }
}

impl std::error::Error for TlvDecodeError {}

impl From<TryGetError> for TlvDecodeError {
    fn from(_error: TryGetError) -> TlvDecodeError {
        TlvDecodeError::ReadOutOfBounds
    }
}

// ===== impl Diagnostic =====

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TLV {}: {}", self.tlv_type, self.error)
    }
}

// ===== impl Diagnostics =====

impl Diagnostics {
    pub(crate) fn push(&mut self, tlv_type: u8, error: TlvDecodeError) {
        warn!(%tlv_type, "{}", error);
        self.0.push(Diagnostic { tlv_type, error });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for diagnostic in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{diagnostic}")?;
            first = false;
        }
        Ok(())
    }
}
