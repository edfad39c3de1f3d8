// Copyright (C) 2022 Michael Herstine <sp1ff@pobox.com>
//
// This file is part of logship.
//
// logship is free software: you can redistribute it and/or modify it under the terms of the
// GNU General Public License as published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// mpdpopm is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even
// the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General
// Public License for more details.
//
// You should have received a copy of the GNU General Public License along with mpdpopm.  If not,
// see <http://www.gnu.org/licenses/>.
//! A minimal client for shipping severity-leveled log lines to a remote, token-routed log
//! collector over a raw socket
//!
//! # Introduction
//!
//! Hosted log-ingestion services of the Logentries lineage accept plain text lines over TCP or
//! UDP, with an opaque authentication token prefixed to every line to route it to the right
//! log stream. No handshake, no acknowledgment, no response at all: a client connects, writes,
//! and hopes. This crate is such a client.
//!
//! The design goal, inherited from that lineage, is that logging must never break the host
//! application. [`LogShipper::log`](shipper::LogShipper::log) returns nothing & never panics.
//! The connection is made lazily, on the first `log` call, and at most once per instance; if
//! that one attempt fails, the instance silently drops every line for the rest of its life.
//! Writes are fire-and-forget over a non-blocking socket. Embedders who want to know whether
//! the connection came up can opt in via
//! [`connect_error`](shipper::LogShipper::connect_error); connect failures are also reported
//! as [`tracing`] diagnostics at `warn` level.
//!
//! [`tracing`]: https://docs.rs/tracing/latest/tracing/index.html
//!
//! # Usage
//!
//! A [`LogShipper`](shipper::LogShipper) comes with sane defaults-- TCP transport & the most
//! verbose threshold, so everything goes out:
//!
//! ```no_run
//! use logship::config::Config;
//! use logship::shipper::LogShipper;
//!
//! let mut log = LogShipper::new(
//!     Config::builder()
//!         .logger_name("mylogger".to_string())
//!         .token("ad43g-dfd34-df3ed-3d3d3".to_string())
//!         .build(),
//! );
//! log.info("I'm an informational message");
//! log.warn("I'm a warning message");
//! ```
//!
//! Will put lines like these on the wire (token first, then a local-time timestamp, then the
//! level label):
//!
//! ```text
//! ad43g-dfd34-df3ed-3d3d32024-01-01 12:00:00  INFO - I'm an informational message
//! ad43g-dfd34-df3ed-3d3d32024-01-01 12:00:00 - WARN - I'm a warning message
//! ```
//!
//! The threshold expresses verbosity: messages ranked numerically at or below it are
//! transmitted, the rest suppressed:
//!
//! ```no_run
//! use logship::config::Config;
//! use logship::severity::Severity;
//! use logship::shipper::LogShipper;
//!
//! let mut log = LogShipper::new(
//!     Config::builder()
//!         .token("ad43g-dfd34-df3ed-3d3d3".to_string())
//!         .threshold(Severity::Warn)
//!         .use_tcp(false) // ship over UDP instead
//!         .build(),
//! );
//! log.error("this goes out");
//! log.debug("this does not");
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod severity;
pub mod shipper;
pub mod transport;
