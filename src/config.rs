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

//! Shipper configuration.
//!
//! The older Logentries clients accepted a loose bag of options & pulled recognized keys out of
//! it dynamically. [`Config`] replaces that with an explicit struct: named fields, documented
//! defaults, nothing extracted at runtime. Instances are immutable once handed to a
//! [`LogShipper`](crate::shipper::LogShipper); in particular the timestamp format is
//! per-instance state, not a process-global.

use crate::severity::Severity;

/// Default timestamp format: local time at seconds resolution, 24-hour clock with no leading
/// zero on the hour (the moral equivalent of PHP's `Y-m-d G:i:s`).
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %-H:%M:%S";

/// Configuration for a [`LogShipper`](crate::shipper::LogShipper) instance.
#[derive(Clone, Debug)]
pub struct Config {
    /// Cosmetic identifier for this shipper; never transmitted, but it appears in diagnostics.
    pub logger_name: String,
    /// Opaque authentication token, prefixed to every line on the wire. The collector uses it
    /// to route the line to the right log stream.
    pub token: String,
    /// true selects a TCP stream to the collector, false a connected UDP socket.
    pub use_tcp: bool,
    /// Verbosity threshold; messages ranked numerically above it are suppressed. Defaults to
    /// the most verbose level, so everything goes out.
    pub threshold: Severity,
    /// [`chrono` format string] used for the line timestamp.
    ///
    /// [`chrono` format string]: https://docs.rs/chrono/latest/chrono/format/strftime/index.html
    pub timestamp_format: String,
}

impl std::default::Default for Config {
    fn default() -> Self {
        Config {
            logger_name: String::from("Default"),
            token: String::new(),
            use_tcp: true,
            threshold: Severity::Debug,
            timestamp_format: String::from(DEFAULT_TIMESTAMP_FORMAT),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder {
            imp: Config::default(),
        }
    }
}

pub struct ConfigBuilder {
    imp: Config,
}

impl ConfigBuilder {
    pub fn logger_name(mut self, logger_name: String) -> Self {
        self.imp.logger_name = logger_name;
        self
    }
    pub fn token(mut self, token: String) -> Self {
        self.imp.token = token;
        self
    }
    pub fn use_tcp(mut self, use_tcp: bool) -> Self {
        self.imp.use_tcp = use_tcp;
        self
    }
    pub fn threshold(mut self, threshold: Severity) -> Self {
        self.imp.threshold = threshold;
        self
    }
    pub fn timestamp_format(mut self, timestamp_format: String) -> Self {
        self.imp.timestamp_format = timestamp_format;
        self
    }
    pub fn build(self) -> Config {
        self.imp
    }
}
