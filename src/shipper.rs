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

//! The [`LogShipper`] itself.
//!
//! A [`LogShipper`] owns a lazily-created connection to the collector, a verbosity threshold &
//! an authentication token. Nothing touches the network at construction time; the first call to
//! [`log`](LogShipper::log) (of any severity, even one the threshold will suppress) attempts to
//! connect, exactly once for the lifetime of the instance. A failed attempt is terminal: the
//! instance never logs again, and never retries.
//!
//! Logging is strictly best-effort. `log` has no return value, never panics, and never blocks
//! on the collector; at worst it is a silent no-op. Embedders that want to know whether the
//! connection ever came up can inspect [`status`](LogShipper::status) &
//! [`connect_error`](LogShipper::connect_error).

use crate::{
    config::Config,
    error::Error,
    format,
    severity::Severity,
    transport::{TcpTransport, Transport, UdpTransport},
};

use chrono::prelude::*;

/// The collector host that receives shipped lines. Fixed; not user-configurable.
pub const COLLECTOR_HOST: &str = "api.logentries.com";
/// The collector port for token-based ingestion. Fixed; not user-configurable.
pub const COLLECTOR_PORT: u16 = 10000;

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                       connection lifecycle                                     //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Externally-visible connection lifecycle state.
///
/// The full machine is small: `Closed --(first log, success)--> Open`,
/// `Closed --(first log, failure)--> Failed`, `Open --(teardown)--> Closed`. `Failed` is
/// terminal apart from teardown.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Status {
    /// No connection; either never attempted or already torn down.
    Closed,
    /// Connected; lines that pass the threshold go out on the wire.
    Open,
    /// The one permitted connection attempt failed; all logging is a silent no-op.
    Failed,
}

/// Internal connection state. A live transport exists iff `Open`; `Failed` keeps the error
/// around for [`LogShipper::connect_error`].
enum Connection {
    Closed,
    Open(Box<dyn Transport>),
    Failed(Error),
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                        struct LogShipper                                       //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Ships severity-leveled log lines to the collector, token-prefixed, fire-and-forget.
///
/// # Examples
///
/// ```no_run
/// use logship::config::Config;
/// use logship::shipper::LogShipper;
///
/// let mut log = LogShipper::new(
///     Config::builder()
///         .logger_name("mylogger".to_string())
///         .token("ad43g-dfd34-df3ed-3d3d3".to_string())
///         .build(),
/// );
/// log.info("I'm an informational message");
/// log.warn("I'm a warning message");
/// ```
pub struct LogShipper {
    config: Config,
    conn: Connection,
    connect_attempted: bool,
    collector_addr: (String, u16),
}

impl LogShipper {
    /// Construct a shipper from `config`. No connection is made here; that happens on the first
    /// `log` call.
    pub fn new(config: Config) -> LogShipper {
        LogShipper {
            config,
            conn: Connection::Closed,
            connect_attempted: false,
            collector_addr: (COLLECTOR_HOST.to_string(), COLLECTOR_PORT),
        }
    }

    /// Construct a shipper around a pre-connected [`Transport`].
    ///
    /// The shipper starts [`Open`](Status::Open) & the lazy connect is considered spent, so the
    /// fixed collector endpoint is never contacted. Useful for pointing a shipper at a local or
    /// custom collector, and for testing.
    pub fn with_transport<T: Transport + 'static>(config: Config, transport: T) -> LogShipper {
        LogShipper {
            config,
            conn: Connection::Open(Box::new(transport)),
            connect_attempted: true,
            collector_addr: (COLLECTOR_HOST.to_string(), COLLECTOR_PORT),
        }
    }

    /// The cosmetic identifier this shipper was configured with.
    pub fn logger_name(&self) -> &str {
        &self.config.logger_name
    }

    /// Where in the connection lifecycle this instance is.
    pub fn status(&self) -> Status {
        match self.conn {
            Connection::Closed => Status::Closed,
            Connection::Open(_) => Status::Open,
            Connection::Failed(_) => Status::Failed,
        }
    }

    /// If the one permitted connection attempt failed, the error it failed with.
    ///
    /// This is the opt-in surface for embedders who care: `log` itself will never report the
    /// failure (logging must never break the host application).
    pub fn connect_error(&self) -> Option<&Error> {
        match &self.conn {
            Connection::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Ship `line` at Debug severity.
    pub fn debug(&mut self, line: &str) {
        self.log(line, Severity::Debug)
    }

    /// Ship `line` at Info severity.
    pub fn info(&mut self, line: &str) {
        self.log(line, Severity::Info)
    }

    /// Ship `line` at Notice severity.
    pub fn notice(&mut self, line: &str) {
        self.log(line, Severity::Notice)
    }

    /// Ship `line` at Warn severity.
    pub fn warn(&mut self, line: &str) {
        self.log(line, Severity::Warn)
    }

    /// Ship `line` at Error severity.
    pub fn error(&mut self, line: &str) {
        self.log(line, Severity::Error)
    }

    /// Ship `line` at severity `severity`; the level methods above are sugar for this.
    pub fn log(&mut self, line: &str, severity: Severity) {
        self.log_rank(line, severity.rank())
    }

    /// Ship `line` at raw rank `rank`.
    ///
    /// Ranks outside the five known levels render on the wire with the label `LOG`; they still
    /// pass through the threshold check numerically, so only ranks at or below the threshold's
    /// go out. The connect attempt happens on the first call regardless of whether the
    /// threshold will suppress the message.
    pub fn log_rank(&mut self, line: &str, rank: u8) {
        if !self.connect_attempted {
            self.connect();
        }
        if self.config.threshold.permits(rank) {
            let prefix = format::prefix(&Local::now(), &self.config.timestamp_format, rank);
            let payload = format::payload(&self.config.token, &prefix, line);
            self.write(&payload);
        }
    }

    /// Tear down the connection, if one exists. Idempotent; the once-only connect guard is not
    /// reset, so subsequent `log` calls are silent no-ops.
    pub fn close(&mut self) {
        if matches!(self.conn, Connection::Open(_)) {
            // Dropping the transport closes the socket.
            self.conn = Connection::Closed;
        }
    }

    /// The one & only connection attempt.
    fn connect(&mut self) {
        self.connect_attempted = true;
        let addr = (self.collector_addr.0.as_str(), self.collector_addr.1);
        let res = if self.config.use_tcp {
            TcpTransport::new(addr).map(|t| Box::new(t) as Box<dyn Transport>)
        } else {
            UdpTransport::new(addr).map(|t| Box::new(t) as Box<dyn Transport>)
        };
        match res {
            Ok(transport) => {
                self.conn = Connection::Open(transport);
            }
            Err(err) => {
                // A diagnostic for the embedding application, never an error it has to handle.
                tracing::warn!(
                    logger = %self.config.logger_name,
                    "Could not reach the log collector; this shipper will drop all lines: {}",
                    err
                );
                self.conn = Connection::Failed(err);
            }
        }
    }

    /// Hand `buf` to the transport if we have one; otherwise drop it on the floor. The send is
    /// fire-and-forget: a short or failed write is neither reported nor retried.
    fn write(&mut self, buf: &[u8]) {
        if let Connection::Open(transport) = &self.conn {
            if let Err(err) = transport.send(buf) {
                tracing::trace!(logger = %self.config.logger_name, "Dropped a log line: {}", err);
            }
        }
    }
}

impl Drop for LogShipper {
    /// Teardown happens exactly once, here or in an earlier explicit
    /// [`close`](LogShipper::close).
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod shipper_tests {
    use super::*;

    use crate::error::Result;

    use backtrace::Backtrace;

    use std::cell::RefCell;
    use std::net::TcpListener;
    use std::rc::Rc;

    /// A [`Transport`] that records every buffer handed to it.
    #[derive(Clone, Default)]
    struct CaptureTransport {
        sent: Rc<RefCell<Vec<Vec<u8>>>>,
    }

    impl Transport for CaptureTransport {
        fn send(&self, buf: &[u8]) -> Result<usize> {
            self.sent.borrow_mut().push(buf.to_vec());
            Ok(buf.len())
        }
    }

    /// A [`Transport`] whose every send fails.
    struct BrokenTransport;

    impl Transport for BrokenTransport {
        fn send(&self, _buf: &[u8]) -> Result<usize> {
            Err(Error::Transport {
                source: Box::new(std::io::Error::new(std::io::ErrorKind::Other, "nope")),
                back: Backtrace::new(),
            })
        }
    }

    fn shipper_with_capture(threshold: Severity, token: &str) -> (LogShipper, CaptureTransport) {
        let capture = CaptureTransport::default();
        let shipper = LogShipper::with_transport(
            Config::builder()
                .token(token.to_string())
                .threshold(threshold)
                .build(),
            capture.clone(),
        );
        (shipper, capture)
    }

    #[test]
    fn test_threshold_filtering() {
        // Transmit iff rank(S) <= rank(T), for every combination
        for t in 0..5u8 {
            let threshold = Severity::from_rank(t).unwrap();
            let (mut shipper, capture) = shipper_with_capture(threshold, "");
            for s in 0..5u8 {
                shipper.log_rank("x", s);
            }
            assert_eq!((t + 1) as usize, capture.sent.borrow().len());
        }
    }

    #[test]
    fn test_level_methods() {
        let (mut shipper, capture) = shipper_with_capture(Severity::Warn, "");
        shipper.error("e");
        shipper.warn("w");
        shipper.notice("n");
        shipper.info("i");
        shipper.debug("d");
        let sent = capture.sent.borrow();
        assert_eq!(2, sent.len());
        assert!(std::str::from_utf8(&sent[0]).unwrap().contains(" - ERROR - e"));
        assert!(std::str::from_utf8(&sent[1]).unwrap().contains(" - WARN - w"));
    }

    #[test]
    fn test_payload_shape() {
        let (mut shipper, capture) = shipper_with_capture(Severity::Info, "abc123");
        shipper.info("hello");
        let sent = capture.sent.borrow();
        assert_eq!(1, sent.len());
        let line = std::str::from_utf8(&sent[0]).unwrap();
        // token first, no framing, terminator last
        assert!(line.starts_with("abc123"));
        assert!(line.ends_with(&format!("  INFO - hello{}", format::LINE_TERMINATOR)));
        // the timestamp sits between token & level label: "YYYY-MM-DD H:MM:SS"
        let stamp = &line["abc123".len()..line.find("  INFO").unwrap()];
        let (date, time) = stamp.split_at(stamp.find(' ').unwrap());
        assert!(NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok());
        assert!(NaiveTime::parse_from_str(time.trim(), "%H:%M:%S").is_ok());
    }

    #[test]
    fn test_unknown_rank_is_suppressed_by_every_threshold() {
        // Ranks above 4 exceed even the most verbose threshold, so they never leave the
        // shipper (the `LOG` wire label is exercised in the `format` module's tests).
        let (mut shipper, capture) = shipper_with_capture(Severity::Debug, "");
        shipper.log_rank("mystery", 9);
        assert_eq!(0, capture.sent.borrow().len());
    }

    #[test]
    fn test_close_stops_writes_and_does_not_reconnect() {
        let (mut shipper, capture) = shipper_with_capture(Severity::Debug, "");
        shipper.info("before");
        assert_eq!(Status::Open, shipper.status());

        shipper.close();
        assert_eq!(Status::Closed, shipper.status());
        shipper.close(); // idempotent

        shipper.info("after");
        assert_eq!(Status::Closed, shipper.status()); // no reconnect attempt
        assert_eq!(1, capture.sent.borrow().len()); // nothing written after teardown
    }

    #[test]
    fn test_send_failure_is_swallowed() {
        let mut shipper = LogShipper::with_transport(Config::default(), BrokenTransport {});
        shipper.error("this line is lost, and that's fine");
        assert_eq!(Status::Open, shipper.status());
    }

    #[test]
    fn test_lazy_connect_happens_on_first_log_even_when_suppressed() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let mut shipper = LogShipper::new(
            Config::builder().threshold(Severity::Error).build(),
        );
        shipper.collector_addr = ("127.0.0.1".to_string(), addr.port());
        assert_eq!(Status::Closed, shipper.status());

        // Debug(4) > Error(0): suppressed, but the connect attempt must still happen
        shipper.debug("suppressed");
        assert_eq!(Status::Open, shipper.status());
        listener.accept().unwrap();

        // A second call must not open a second connection
        listener.set_nonblocking(true).unwrap();
        shipper.debug("still suppressed");
        assert!(matches!(
            listener.accept(),
            Err(ref err) if err.kind() == std::io::ErrorKind::WouldBlock
        ));
    }

    #[test]
    fn test_failed_connect_is_terminal_and_silent() {
        // Grab a port that nothing is listening on
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let mut shipper = LogShipper::new(Config::default());
        shipper.collector_addr = ("127.0.0.1".to_string(), addr.port());

        shipper.error("no one is listening");
        assert_eq!(Status::Failed, shipper.status());
        assert!(shipper.connect_error().is_some());

        // Every subsequent call of any severity is a silent no-op; no retry, no panic
        shipper.debug("dropped");
        shipper.info("dropped");
        shipper.error("dropped");
        assert_eq!(Status::Failed, shipper.status());
    }

    #[test]
    fn test_udp_connect_path() {
        let receiver = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        receiver
            .set_read_timeout(Some(std::time::Duration::from_secs(5)))
            .unwrap();
        let addr = receiver.local_addr().unwrap();

        let mut shipper = LogShipper::new(
            Config::builder()
                .token("tok".to_string())
                .use_tcp(false)
                .build(),
        );
        shipper.collector_addr = ("127.0.0.1".to_string(), addr.port());

        shipper.notice("over datagrams");
        assert_eq!(Status::Open, shipper.status());

        let mut buf = [0u8; 256];
        let n = receiver.recv(&mut buf).unwrap();
        let line = std::str::from_utf8(&buf[..n]).unwrap();
        assert!(line.starts_with("tok"));
        assert!(line.ends_with(&format!(" - NOTICE - over datagrams{}", format::LINE_TERMINATOR)));
    }
}
