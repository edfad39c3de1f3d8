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
//! [logship](crate) errors

use backtrace::Backtrace;

/// [logship](crate) error type
///
/// [logship](crate) eschews libraries like [thiserror], [anyhow] & [Snafu] in favor of
/// a straightforward enumeration with a few match arms chosen on the basis what the caller will
/// need to repond.
///
/// [thiserror]: https://docs.rs/thiserror
/// [anyhow]: https://docs.rs/anyhow
/// [Snafu]: https://docs.rs/snafu/latest/snafu
#[non_exhaustive]
pub enum Error {
    /// A string did not name one of the five known severity levels
    BadLevelName {
        name: String,
        back: Backtrace,
    },
    /// The socket was allocated, but the collector endpoint could not be reached
    Connect {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        back: Backtrace,
    },
    /// The underlying socket could not be allocated at all
    SocketCreation {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        back: Backtrace,
    },
    /// Wire-level send error
    Transport {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        back: Backtrace,
    },
}

impl std::fmt::Display for Error {
    // `Error` is non-exhaustive so that adding variants won't be a breaking change to our
    // callers. That means the compiler won't catch us if we miss a variant here, so we
    // always include a `_` arm.
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::BadLevelName { name, .. } => {
                write!(f, "'{}' does not name a severity level", name)
            }
            Error::Connect { source, .. } => {
                write!(f, "Could not connect to the log collector: {}", source)
            }
            Error::SocketCreation { source, .. } => {
                write!(f, "Could not create a socket: {}", source)
            }
            Error::Transport { source, .. } => write!(f, "Transport error: {:?}", source),
            _ => write!(f, "Other logship error"),
        }
    }
}

impl std::fmt::Debug for Error {
    // `Error` is non-exhaustive so that adding variants won't be a breaking change to our
    // callers. That means the compiler won't catch us if we miss a variant here, so we
    // always include a `_` arm.
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::BadLevelName { name: _, back } => write!(f, "{}\n{:?}", self, back),
            Error::Connect { source: _, back } => write!(f, "{}\n{:?}", self, back),
            Error::SocketCreation { source: _, back } => write!(f, "{}\n{:?}", self, back),
            Error::Transport { source: _, back } => write!(f, "{}\n{:?}", self, back),
            err => write!(f, "logship error: {}", err),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
