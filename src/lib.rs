//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

//! Decoder for binary IS-IS Link State PDUs and renderer of the decoded
//! contents as per-leaf telemetry updates.
//!
//! The input is the raw LSP starting at the LSP ID field (leading transport
//! or header bytes can be discarded with an offset). [`packet::pdu::Lsp::decode`]
//! produces an owned, strongly typed [`packet::pdu::Lsp`] together with the
//! non-fatal diagnostics accumulated while walking the TLV payload.
//! [`telemetry::render_notifications`] flattens that model into a single
//! atomic notification of leaf-path/value updates anchored under the
//! link-state-database entry of the LSP.

pub mod bytes;
pub mod ip;
pub mod packet;
pub mod telemetry;
