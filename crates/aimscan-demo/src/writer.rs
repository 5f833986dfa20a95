//! Demo encoder.
//!
//! [`DemoWriter`] streams records to any `Write` sink in the same format
//! [`DemoReader`](crate::DemoReader) decodes. The header is written
//! immediately on construction.

use std::io::Write;

use crate::codec::{encode_gamestate, encode_header, encode_record, encode_snapshot};
use crate::command::format_player_config_command;
use crate::error::DemoError;
use crate::types::{Gamestate, Record, Snapshot};
use crate::PROTOCOL_VERSION;

/// Writes demo records to a byte stream.
///
/// # Examples
///
/// ```
/// use aimscan_demo::{DemoReader, DemoWriter, Record};
///
/// let mut writer = DemoWriter::new(Vec::new()).unwrap();
/// writer.write_player_config(1, 1, "Bob", 2).unwrap();
/// writer.write_client_command(2, "+attack").unwrap();
/// assert_eq!(writer.records_written(), 2);
/// let bytes = writer.finish().unwrap();
///
/// let mut reader = DemoReader::open(bytes.as_slice()).unwrap();
/// assert!(matches!(reader.next_record().unwrap(), Some(Record::ServerCommand { .. })));
/// assert!(matches!(reader.next_record().unwrap(), Some(Record::ClientCommand { .. })));
/// assert_eq!(reader.next_record().unwrap(), Some(Record::Eof));
/// ```
pub struct DemoWriter<W: Write> {
    writer: W,
    records_written: u64,
}

impl<W: Write> DemoWriter<W> {
    /// Create a writer using [`PROTOCOL_VERSION`], writing the header.
    pub fn new(writer: W) -> Result<Self, DemoError> {
        Self::with_protocol(writer, PROTOCOL_VERSION)
    }

    /// Create a writer with an explicit protocol version.
    pub fn with_protocol(mut writer: W, protocol: i32) -> Result<Self, DemoError> {
        encode_header(&mut writer, protocol)?;
        Ok(Self {
            writer,
            records_written: 0,
        })
    }

    /// Write any record.
    pub fn write_record(&mut self, record: &Record) -> Result<(), DemoError> {
        encode_record(&mut self.writer, record)?;
        self.records_written += 1;
        Ok(())
    }

    /// Write a server text command.
    pub fn write_server_command(&mut self, sequence: i32, text: &str) -> Result<(), DemoError> {
        self.write_record(&Record::ServerCommand {
            sequence,
            text: text.to_string(),
        })
    }

    /// Write a `cs` server command naming a player and assigning a team.
    pub fn write_player_config(
        &mut self,
        sequence: i32,
        client_id: i32,
        name: &str,
        team: i32,
    ) -> Result<(), DemoError> {
        self.write_server_command(sequence, &format_player_config_command(client_id, name, team))
    }

    /// Write a client text command.
    pub fn write_client_command(&mut self, sequence: i32, text: &str) -> Result<(), DemoError> {
        self.write_record(&Record::ClientCommand {
            sequence,
            text: text.to_string(),
        })
    }

    /// Write a gamestate checkpoint.
    pub fn write_gamestate(&mut self, gamestate: &Gamestate) -> Result<(), DemoError> {
        encode_gamestate(&mut self.writer, gamestate)?;
        self.records_written += 1;
        Ok(())
    }

    /// Write a snapshot.
    pub fn write_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), DemoError> {
        encode_snapshot(&mut self.writer, snapshot)?;
        self.records_written += 1;
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> Result<(), DemoError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Number of records written so far, EOF excluded.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Write the EOF record, flush, and return the sink.
    pub fn finish(mut self) -> Result<W, DemoError> {
        encode_record(&mut self.writer, &Record::Eof)?;
        self.writer.flush()?;
        Ok(self.writer)
    }

    /// Return the sink without writing an EOF record.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
