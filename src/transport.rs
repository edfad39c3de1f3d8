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

//! The collector transport layer.
//!
//! This module defines the [`Transport`] trait that all implementations must support, as well
//! as the TCP & UDP implementations. Both are put into non-blocking mode on construction so
//! that a send can never stall the caller; the price is that a send may silently fail or
//! complete partially, which the shipper does not inspect.
//!
//! # Examples
//!
//! To ship lines over TCP to a collector on a non-standard host & port:
//!
//! ```rust
//! use logship::transport::TcpTransport;
//! let transpo = TcpTransport::new("some-host.domain.io:10000");
//! assert!(transpo.is_err()); // no such host, after all
//! ```

use crate::error::{Error, Result};

use backtrace::Backtrace;

use std::net::TcpStream;

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                      transport mechanisms                                      //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Operations all transport layers must support.
pub trait Transport {
    /// Send a slice of bytes on this transport mechanism.
    ///
    /// It would be nice to make this more general, to accept input in a variety of forms that
    /// might support zero-copy, but at the end of the day both TCP & UDP sockets operate on a
    /// contiguous slice of `u8`, so we require that our caller assemble one.
    fn send(&self, buf: &[u8]) -> Result<usize>;
}

/// Shipping log lines over a TCP stream.
pub struct TcpTransport {
    socket: TcpStream,
}

impl TcpTransport {
    /// Construct a [`Transport`] implementation via TCP at `addr`.
    ///
    /// `std` surfaces socket allocation & connection as a single operation, so an allocation
    /// failure here comes back as [`Error::Connect`], too.
    pub fn new<A: std::net::ToSocketAddrs>(addr: A) -> Result<TcpTransport> {
        let socket = TcpStream::connect(addr).map_err(|err| Error::Connect {
            source: Box::new(err),
            back: Backtrace::new(),
        })?;
        socket.set_nonblocking(true).map_err(|err| Error::Connect {
            source: Box::new(err),
            back: Backtrace::new(),
        })?;
        Ok(TcpTransport { socket })
    }
}

impl Transport for TcpTransport {
    fn send(&self, buf: &[u8]) -> Result<usize> {
        use std::io::Write;
        // Trick I learned from tracing-subscriber.
        // <https://docs.rs/tracing-subscriber/0.3.11/src/tracing_subscriber/fmt/fmt_layer.rs.html#867-903>
        // The problem is that `std::io::Write()` takes a `&mut self` and we just have a
        // `&self`. The workaround depends upon the fact that `Write` is implemented both on
        // `TcpStream` and `&TcpStream`: declare a mutable variable `writer` whose type is
        // `&TcpStream` and invoke `write()` on _that_ receiver.
        let mut writer: &TcpStream = &self.socket;
        // A single best-effort write; the socket is non-blocking, so this may be short. The
        // shipper does not retry.
        writer.write(buf).map_err(|err| Error::Transport {
            source: Box::new(err),
            back: Backtrace::new(),
        })
    }
}

/// Shipping log lines via UDP datagrams.
pub struct UdpTransport {
    socket: std::net::UdpSocket,
}

impl UdpTransport {
    /// Construct a [`Transport`] implementation via UDP at `addr`.
    pub fn new<A: std::net::ToSocketAddrs>(addr: A) -> Result<UdpTransport> {
        // Bind to any available port...
        let socket =
            std::net::UdpSocket::bind("0.0.0.0:0").map_err(|err| Error::SocketCreation {
                source: Box::new(err),
                back: Backtrace::new(),
            })?;
        // and connect to the collector at `addr`:
        socket.connect(addr).map_err(|err| Error::Connect {
            source: Box::new(err),
            back: Backtrace::new(),
        })?;
        socket.set_nonblocking(true).map_err(|err| Error::Connect {
            source: Box::new(err),
            back: Backtrace::new(),
        })?;
        Ok(UdpTransport { socket })
    }
}

impl Transport for UdpTransport {
    fn send(&self, buf: &[u8]) -> Result<usize> {
        self.socket.send(buf).map_err(|err| Error::Transport {
            source: Box::new(err),
            back: Backtrace::new(),
        })
    }
}
