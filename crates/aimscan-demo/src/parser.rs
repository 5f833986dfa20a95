//! Whole-demo parsing.
//!
//! [`DemoParser`] drives a [`DemoReader`] through a [`SessionState`] and
//! finalizes the result. Decoding is all-or-nothing: any error discards
//! the partially built session.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Instant;

use aimscan_core::CancelToken;
use log::{debug, warn};

use crate::error::DemoError;
use crate::reader::DemoReader;
use crate::replay::Replay;
use crate::session::SessionState;

/// Demo parser with an optional cancellation token.
///
/// # Examples
///
/// ```
/// use aimscan_core::CancelToken;
/// use aimscan_demo::{DemoError, DemoParser, DemoWriter};
///
/// let bytes = DemoWriter::new(Vec::new()).unwrap().finish().unwrap();
/// let replay = DemoParser::new().parse(bytes.as_slice()).unwrap();
/// assert!(replay.players().is_empty());
///
/// let token = CancelToken::new();
/// token.cancel();
/// let result = DemoParser::new().with_cancel(token).parse(bytes.as_slice());
/// assert!(matches!(result, Err(DemoError::Cancelled)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct DemoParser {
    cancel: Option<CancelToken>,
}

impl DemoParser {
    /// Create a parser without cancellation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check `token` before every record.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn check_cancel(&self) -> Result<(), DemoError> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(DemoError::Cancelled),
            _ => Ok(()),
        }
    }

    /// Decode a whole demo stream.
    pub fn parse<R: Read>(&self, reader: R) -> Result<Replay, DemoError> {
        let started = Instant::now();
        let mut reader = DemoReader::open(reader)?;
        debug!("demo protocol {}", reader.protocol());

        let mut session = SessionState::new();
        loop {
            self.check_cancel()?;
            match reader.next_record()? {
                Some(record) => session.apply_record(record)?,
                None => break,
            }
        }

        if !reader.saw_eof() {
            warn!(
                "demo ended at offset {} without an EOF record",
                reader.offset()
            );
        }
        let mut replay = session.finish(reader.protocol(), reader.saw_eof());
        replay.metrics.total_us = started.elapsed().as_micros() as u64;
        debug!(
            "decoded {} records, {} samples ({} dropped), {} players retained in {}us",
            replay.metrics.records(),
            replay.metrics.samples_appended,
            replay.metrics.samples_dropped,
            replay.metrics.players_retained,
            replay.metrics.total_us
        );
        Ok(replay)
    }

    /// Decode a demo file.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Replay, DemoError> {
        let file = File::open(path)?;
        self.parse(BufReader::new(file))
    }
}

/// Decode a whole demo stream without cancellation.
pub fn parse<R: Read>(reader: R) -> Result<Replay, DemoError> {
    DemoParser::new().parse(reader)
}

/// Decode a demo file without cancellation.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Replay, DemoError> {
    DemoParser::new().parse_file(path)
}
