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

//! Severity level definitions.
//!
//! [`Severity`] replicates the five levels the collector understands. Each level carries a
//! numeric *rank*: zero is the most severe (Error) and four the most verbose (Debug). The rank
//! doubles as the threshold scale, so a threshold is itself just a [`Severity`].

use crate::error::{Error, Result};

use backtrace::Backtrace;

type StdResult<T, E> = std::result::Result<T, E>;

/// The five severity levels understood by the collector, ordered by rank.
///
/// Note that the ordering runs counter to most logging frameworks: numerically *lower* means
/// more severe. A threshold consequently expresses verbosity, not urgency; see
/// [`permits`](Severity::permits).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Severity {
    /// error conditions
    Error = 0,
    /// warning conditions
    Warn = 1,
    /// normal, but significant condition
    Notice = 2,
    /// informational message
    Info = 3,
    /// debug-level message
    Debug = 4,
}

impl Severity {
    /// The numeric rank of this level (0 = Error .. 4 = Debug).
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Map a numeric rank back to a level; ranks outside 0..=4 have no level (on the wire they
    /// render with the label `LOG`).
    pub fn from_rank(rank: u8) -> Option<Severity> {
        match rank {
            0 => Some(Severity::Error),
            1 => Some(Severity::Warn),
            2 => Some(Severity::Notice),
            3 => Some(Severity::Info),
            4 => Some(Severity::Debug),
            _ => None,
        }
    }

    /// The label that appears on the wire for this level.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warn => "WARN",
            Severity::Notice => "NOTICE",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
        }
    }

    /// Treating `self` as a threshold, would a message of rank `rank` be transmitted?
    ///
    /// A message goes out iff its rank is numerically less than or equal to the threshold's;
    /// i.e. a threshold of [`Info`](Severity::Info) (3) passes Error, Warn, Notice & Info but
    /// suppresses Debug. This mirrors the original Logentries clients exactly, inverted naming
    /// and all.
    pub fn permits(&self, rank: u8) -> bool {
        rank <= self.rank()
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Severity {
    type Err = Error;
    /// Parse a named level, case-insensitively. Configuration surfaces accept either a named
    /// level or a raw rank; this handles the former.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warn" => Ok(Severity::Warn),
            "notice" => Ok(Severity::Notice),
            "info" => Ok(Severity::Info),
            "debug" => Ok(Severity::Debug),
            _ => Err(Error::BadLevelName {
                name: s.to_string(),
                back: Backtrace::new(),
            }),
        }
    }
}
