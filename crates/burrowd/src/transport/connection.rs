//! Per-connection buffering on top of a non-blocking TCP stream.

use std::io::{self, Read, Write};
use std::mem;
use std::net::{Shutdown, SocketAddr, TcpStream};

use crate::session::ConnectionId;

use super::errors::LineOverflow;

const LINE_FEED: u8 = b'\n';

/// Queued output above which the connection is no longer read from.
pub(crate) const OUTBOUND_HIGH_WATER: usize = 1024 * 1024;

/// Result of a single non-blocking read.
#[derive(Debug)]
pub(crate) enum ReadOutcome {
    /// Bytes were copied into the scratch buffer.
    Data(usize),
    /// Nothing to read right now.
    WouldBlock,
    /// The peer closed its side.
    Closed,
    /// The read failed.
    Failed(io::Error),
}

/// Accumulates bytes until a line feed arrives.
///
/// Everything up to the last line feed in the buffer forms one logical
/// command line; bytes after it stay pending for the next read. A line longer
/// than the limit is dropped whole: once the pending bytes overflow, input is
/// discarded up to and including the next line feed.
#[derive(Debug)]
pub(crate) struct LineBuffer {
    pending: Vec<u8>,
    limit: usize,
    discarding: bool,
}

impl LineBuffer {
    pub(crate) const fn new(limit: usize) -> Self {
        Self {
            pending: Vec::new(),
            limit,
            discarding: false,
        }
    }

    /// Appends received bytes, returning a completed line when one is ready.
    ///
    /// Line terminators are removed from the returned text without inserting
    /// separators, so several lines delivered together read as one.
    pub(crate) fn push(&mut self, bytes: &[u8]) -> Result<Option<String>, LineOverflow> {
        let mut received = bytes;
        if self.discarding {
            let Some(end) = received.iter().position(|byte| *byte == LINE_FEED) else {
                return Ok(None);
            };
            self.discarding = false;
            received = received.get(end.saturating_add(1)..).unwrap_or_default();
        }
        self.pending.extend_from_slice(received);

        let Some(last) = self.pending.iter().rposition(|byte| *byte == LINE_FEED) else {
            if self.pending.len() > self.limit {
                self.discarding = true;
                return Err(self.discard());
            }
            return Ok(None);
        };

        let remainder = self.pending.split_off(last.saturating_add(1));
        let line = mem::replace(&mut self.pending, remainder);
        let content: Vec<u8> = line
            .into_iter()
            .filter(|byte| !matches!(byte, b'\r' | b'\n'))
            .collect();
        if content.len() > self.limit {
            return Err(LineOverflow {
                discarded: content.len(),
                limit: self.limit,
            });
        }
        Ok(Some(String::from_utf8_lossy(&content).into_owned()))
    }

    fn discard(&mut self) -> LineOverflow {
        let discarded = self.pending.len();
        self.pending.clear();
        LineOverflow {
            discarded,
            limit: self.limit,
        }
    }

    #[cfg(test)]
    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// An accepted client owned by the event loop.
#[derive(Debug)]
pub(crate) struct Connection {
    id: ConnectionId,
    peer: SocketAddr,
    stream: TcpStream,
    lines: LineBuffer,
    outbound: Vec<u8>,
}

impl Connection {
    pub(crate) fn new(
        id: ConnectionId,
        peer: SocketAddr,
        stream: TcpStream,
        max_line_bytes: usize,
    ) -> Self {
        Self {
            id,
            peer,
            stream,
            lines: LineBuffer::new(max_line_bytes),
            outbound: Vec::new(),
        }
    }

    pub(crate) const fn id(&self) -> ConnectionId {
        self.id
    }

    pub(crate) const fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Reports whether the peer has sent bytes or closed its side.
    pub(crate) fn is_readable(&self) -> bool {
        let mut peeked = [0_u8; 1];
        match self.stream.peek(&mut peeked) {
            Ok(_) => true,
            Err(error) => !matches!(
                error.kind(),
                io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
            ),
        }
    }

    pub(crate) fn read(&mut self, scratch: &mut [u8]) -> ReadOutcome {
        match self.stream.read(scratch) {
            Ok(0) => ReadOutcome::Closed,
            Ok(read) => ReadOutcome::Data(read),
            Err(error)
                if matches!(
                    error.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                ) =>
            {
                ReadOutcome::WouldBlock
            }
            Err(error) => ReadOutcome::Failed(error),
        }
    }

    pub(crate) fn receive(&mut self, bytes: &[u8]) -> Result<Option<String>, LineOverflow> {
        self.lines.push(bytes)
    }

    /// Output queue for replies awaiting the next flush.
    pub(crate) const fn outbound(&mut self) -> &mut Vec<u8> {
        &mut self.outbound
    }

    pub(crate) fn has_outbound(&self) -> bool {
        !self.outbound.is_empty()
    }

    /// Reports whether the peer has left too much output unread to accept
    /// further commands.
    pub(crate) fn is_backlogged(&self) -> bool {
        self.outbound.len() > OUTBOUND_HIGH_WATER
    }

    /// Writes queued output until the socket stops accepting bytes.
    ///
    /// Bytes the socket did not take stay queued in order.
    pub(crate) fn flush(&mut self) -> io::Result<()> {
        let mut written = 0_usize;
        let result = loop {
            let Some(remaining) = self.outbound.get(written..) else {
                break Ok(());
            };
            if remaining.is_empty() {
                break Ok(());
            }
            match self.stream.write(remaining) {
                Ok(0) => break Err(io::Error::from(io::ErrorKind::WriteZero)),
                Ok(count) => written = written.saturating_add(count),
                Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
                Err(error) if error.kind() == io::ErrorKind::WouldBlock => break Ok(()),
                Err(error) => break Err(error),
            }
        };
        self.outbound.drain(..written.min(self.outbound.len()));
        result
    }

    /// Attempts a last flush and closes both directions.
    pub(crate) fn close(mut self) {
        let _flushed = self.flush();
        let _closed = self.stream.shutdown(Shutdown::Both);
    }
}
