//! Carbon line protocol
//!
//! Records are newline-delimited: `<key> <value> <timestamp>\n`. Only the key
//! matters here; everything after the first space is ignored. Lines may end
//! with LF or CRLF, and a final line without terminator still counts.

use std::io;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Why a record was skipped
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    /// No space byte, so no key can be extracted (blank lines included)
    #[error("record has no key separator")]
    MissingSeparator,

    /// Line exceeded the configured limit and was discarded unread
    #[error("record exceeds {limit} bytes")]
    TooLong { limit: usize },
}

/// Key of a record: the bytes before the first space
///
/// The key may be empty when the record starts with a space.
pub fn extract_key(record: &[u8]) -> Result<&[u8], MalformedRecord> {
    record
        .iter()
        .position(|&b| b == b' ')
        .map(|pos| &record[..pos])
        .ok_or(MalformedRecord::MissingSeparator)
}

/// Outcome of reading one record
#[derive(Debug, PartialEq, Eq)]
pub enum ReadRecord {
    /// The buffer holds one record, terminator stripped
    Record,
    /// The line exceeded the limit; `length` bytes were consumed and dropped
    TooLong { length: usize },
    /// End of stream, nothing left to read
    Eof,
}

/// Read one record into `buf`, holding at most `max_len` bytes in memory.
///
/// `max_len` excludes the terminator, so a CRLF record may buffer one extra
/// byte. An over-long line is consumed up to and including its newline, so
/// the next call starts on the following record.
pub async fn read_record<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max_len: usize,
) -> io::Result<ReadRecord>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();

    // Room for a trailing '\r' that is stripped below
    let held = max_len.saturating_add(1);
    let mut consumed = 0;
    let mut overflowed = false;

    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            if consumed == 0 {
                return Ok(ReadRecord::Eof);
            }
            break;
        }

        let (chunk, terminated) = match available.iter().position(|&b| b == b'\n') {
            Some(pos) => (&available[..pos], true),
            None => (available, false),
        };

        if !overflowed {
            if buf.len() + chunk.len() <= held {
                buf.extend_from_slice(chunk);
            } else {
                overflowed = true;
                buf.clear();
            }
        }

        let used = chunk.len() + usize::from(terminated);
        consumed += used;
        reader.consume(used);

        if terminated {
            break;
        }
    }

    if !overflowed && buf.last() == Some(&b'\r') {
        buf.pop();
    }
    if overflowed || buf.len() > max_len {
        buf.clear();
        return Ok(ReadRecord::TooLong { length: consumed });
    }
    Ok(ReadRecord::Record)
}
