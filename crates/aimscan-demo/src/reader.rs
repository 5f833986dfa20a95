//! Record-level demo reader.
//!
//! [`DemoReader`] reads records from any `Read` source. The header is
//! validated on construction.

use std::io::{self, Read};

use log::trace;

use crate::codec::{decode_header, decode_record_body};
use crate::error::DemoError;
use crate::types::{Record, RecordTag};

/// `Read` adapter tracking the byte offset.
struct OffsetReader<R> {
    inner: R,
    offset: u64,
}

impl<R: Read> Read for OffsetReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.offset += n as u64;
        Ok(n)
    }
}

/// Reads demo records from a byte stream.
///
/// Generic over `R: Read` so tests can use `&[u8]` and production code
/// can use `BufReader<File>`. After the EOF record, or when the stream
/// ends cleanly at a record boundary, [`next_record`] returns `None`.
///
/// [`next_record`]: DemoReader::next_record
pub struct DemoReader<R: Read> {
    reader: OffsetReader<R>,
    protocol: i32,
    records_read: u64,
    saw_eof: bool,
    done: bool,
}

impl<R: Read> DemoReader<R> {
    /// Open a demo stream, reading and validating the header.
    pub fn open(reader: R) -> Result<Self, DemoError> {
        let mut reader = OffsetReader {
            inner: reader,
            offset: 0,
        };
        let protocol = decode_header(&mut reader)?;
        Ok(Self {
            reader,
            protocol,
            records_read: 0,
            saw_eof: false,
            done: false,
        })
    }

    /// Protocol version from the header.
    pub fn protocol(&self) -> i32 {
        self.protocol
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> u64 {
        self.reader.offset
    }

    /// Records read so far, EOF record included.
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Whether an explicit EOF record has been read.
    pub fn saw_eof(&self) -> bool {
        self.saw_eof
    }

    fn read_tag(&mut self) -> Result<Option<u8>, DemoError> {
        let mut buf = [0u8; 1];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(DemoError::Io(e)),
            }
        }
    }

    /// Read the next record, or `None` once the stream is finished.
    ///
    /// A stream that ends exactly between records finishes cleanly; one
    /// that ends inside a record is [`DemoError::Truncated`].
    pub fn next_record(&mut self) -> Result<Option<Record>, DemoError> {
        if self.done {
            return Ok(None);
        }
        let offset = self.reader.offset;
        let Some(tag) = self.read_tag()? else {
            self.done = true;
            return Ok(None);
        };
        let Some(tag) = RecordTag::from_u8(tag) else {
            self.done = true;
            return Err(DemoError::UnknownRecordTag { tag, offset });
        };
        trace!("record {tag:?} at offset {offset}");
        let record = match decode_record_body(&mut self.reader, tag) {
            Ok(record) => record,
            Err(e) => {
                self.done = true;
                return Err(e);
            }
        };
        self.records_read += 1;
        if tag == RecordTag::Eof {
            self.saw_eof = true;
            self.done = true;
        }
        Ok(Some(record))
    }

    /// Convert into a record iterator.
    pub fn records(self) -> RecordIter<R> {
        RecordIter { reader: self }
    }
}

/// Iterator adapter over demo records.
///
/// Yields at most one error, after which it is exhausted.
pub struct RecordIter<R: Read> {
    reader: DemoReader<R>,
}

impl<R: Read> Iterator for RecordIter<R> {
    type Item = Result<Record, DemoError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_record().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::DemoWriter;
    use crate::MAGIC;

    fn two_commands(with_eof: bool) -> Vec<u8> {
        let mut writer = DemoWriter::new(Vec::new()).unwrap();
        writer.write_server_command(1, "print hi").unwrap();
        writer.write_client_command(2, "+attack").unwrap();
        if with_eof {
            writer.finish().unwrap()
        } else {
            writer.into_inner()
        }
    }

    #[test]
    fn reads_records_then_eof() {
        let buf = two_commands(true);
        let mut reader = DemoReader::open(buf.as_slice()).unwrap();
        assert_eq!(reader.protocol(), crate::PROTOCOL_VERSION);
        assert!(matches!(
            reader.next_record().unwrap(),
            Some(Record::ServerCommand { sequence: 1, .. })
        ));
        assert!(matches!(
            reader.next_record().unwrap(),
            Some(Record::ClientCommand { sequence: 2, .. })
        ));
        assert_eq!(reader.next_record().unwrap(), Some(Record::Eof));
        assert!(reader.saw_eof());
        assert_eq!(reader.next_record().unwrap(), None);
        assert_eq!(reader.records_read(), 3);
        assert_eq!(reader.offset(), buf.len() as u64);
    }

    #[test]
    fn clean_end_without_eof() {
        let buf = two_commands(false);
        let records: Vec<_> = DemoReader::open(buf.as_slice())
            .unwrap()
            .records()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn unknown_tag_reports_offset() {
        let mut buf = two_commands(false);
        let offset = buf.len() as u64;
        buf.push(9);
        let mut reader = DemoReader::open(buf.as_slice()).unwrap();
        reader.next_record().unwrap();
        reader.next_record().unwrap();
        match reader.next_record() {
            Err(DemoError::UnknownRecordTag { tag: 9, offset: o }) => assert_eq!(o, offset),
            other => panic!("expected UnknownRecordTag, got {other:?}"),
        }
        assert_eq!(reader.next_record().unwrap(), None);
    }

    #[test]
    fn truncated_record_errors() {
        let mut buf = two_commands(false);
        buf.truncate(buf.len() - 2);
        let result: Result<Vec<_>, _> = DemoReader::open(buf.as_slice()).unwrap().records().collect();
        assert!(matches!(result, Err(DemoError::Truncated { .. })));
    }

    #[test]
    fn bad_magic_on_open() {
        let mut data = b"ETLDEMO1".to_vec();
        data.extend_from_slice(&84i32.to_le_bytes());
        assert_ne!(&data[..8], &MAGIC);
        assert!(matches!(
            DemoReader::open(data.as_slice()),
            Err(DemoError::InvalidMagic { .. })
        ));
    }
}
