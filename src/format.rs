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

//! Wire-line formatting.
//!
//! The collector's line format is venerable & a little quirky, but it is what the fleet of
//! Logentries-era clients put on the wire, so we reproduce it bit-for-bit:
//!
//! ```text
//! <token><timestamp><level prefix><message text><line terminator>
//! ```
//!
//! The timestamp is local time at seconds resolution, with no timezone & no zero-padding on the
//! hour (PHP's `Y-m-d G:i:s`). The level prefix is ` - <LABEL> - ` for every label except
//! `INFO`, which historically got two spaces and no leading dash. A rank outside the five known
//! levels renders as `LOG`. There is no framing beyond the terminator.

use crate::severity::Severity;

use chrono::prelude::*;

/// Platform line terminator, appended to every formatted line.
#[cfg(windows)]
pub const LINE_TERMINATOR: &str = "\r\n";
/// Platform line terminator, appended to every formatted line.
#[cfg(not(windows))]
pub const LINE_TERMINATOR: &str = "\n";

/// Timestamp-plus-level prefix for a message of rank `rank` at time `when`.
///
/// `timestamp_format` is a [`chrono` format string]; each shipper instance carries its own
/// immutable copy (see [`Config`](crate::config::Config)), so there is no process-global format
/// state to trip over.
///
/// [`chrono` format string]: https://docs.rs/chrono/latest/chrono/format/strftime/index.html
pub fn prefix(when: &DateTime<Local>, timestamp_format: &str, rank: u8) -> String {
    let time = when.format(timestamp_format);
    match Severity::from_rank(rank) {
        Some(Severity::Info) => format!("{}  INFO - ", time),
        Some(sev) => format!("{} - {} - ", time, sev.label()),
        None => format!("{} - LOG - ", time),
    }
}

/// Assemble the complete wire payload: token, prefix, message text & terminator, nothing else.
pub fn payload(token: &str, prefix: &str, line: &str) -> Vec<u8> {
    use bytes::BufMut;
    let mut buf =
        Vec::with_capacity(token.len() + prefix.len() + line.len() + LINE_TERMINATOR.len());
    buf.put_slice(token.as_bytes());
    buf.put_slice(prefix.as_bytes());
    buf.put_slice(line.as_bytes());
    buf.put_slice(LINE_TERMINATOR.as_bytes());
    buf
}

#[cfg(test)]
mod format_tests {
    use super::*;

    use crate::config::DEFAULT_TIMESTAMP_FORMAT;

    fn noon_new_years() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_prefixes() {
        let when = noon_new_years();
        // INFO is the odd one out: two spaces, no leading dash
        assert_eq!(
            "2024-01-01 12:00:00  INFO - ",
            prefix(&when, DEFAULT_TIMESTAMP_FORMAT, Severity::Info.rank())
        );
        assert_eq!(
            "2024-01-01 12:00:00 - ERROR - ",
            prefix(&when, DEFAULT_TIMESTAMP_FORMAT, Severity::Error.rank())
        );
        assert_eq!(
            "2024-01-01 12:00:00 - WARN - ",
            prefix(&when, DEFAULT_TIMESTAMP_FORMAT, Severity::Warn.rank())
        );
        assert_eq!(
            "2024-01-01 12:00:00 - NOTICE - ",
            prefix(&when, DEFAULT_TIMESTAMP_FORMAT, Severity::Notice.rank())
        );
        assert_eq!(
            "2024-01-01 12:00:00 - DEBUG - ",
            prefix(&when, DEFAULT_TIMESTAMP_FORMAT, Severity::Debug.rank())
        );
    }

    #[test]
    fn test_unknown_rank_renders_log() {
        let when = noon_new_years();
        assert_eq!(
            "2024-01-01 12:00:00 - LOG - ",
            prefix(&when, DEFAULT_TIMESTAMP_FORMAT, 17)
        );
    }

    #[test]
    fn test_hour_is_not_zero_padded() {
        let when = Local.with_ymd_and_hms(2024, 1, 1, 9, 5, 7).unwrap();
        assert_eq!(
            "2024-01-01 9:05:07  INFO - ",
            prefix(&when, DEFAULT_TIMESTAMP_FORMAT, Severity::Info.rank())
        );
    }

    #[test]
    fn test_payload() {
        let when = noon_new_years();
        let pfx = prefix(&when, DEFAULT_TIMESTAMP_FORMAT, Severity::Info.rank());
        let buf = payload("abc123", &pfx, "hello");
        assert_eq!(
            format!("abc1232024-01-01 12:00:00  INFO - hello{}", LINE_TERMINATOR).into_bytes(),
            buf
        );
    }
}
