//! The polymorphic sliding byte source (component A).
//!
//! A [`Source`] exposes the `more`/`less`/`close` capability set over a
//! tagged variant of five backing implementations, the way the donor
//! crate's `reader.rs` keeps one `raw_buffer: VecDeque<u8>` behind a single
//! `read_handler` trait object. Positions handed out by a `Source` are
//! absolute byte offsets from the start of the logical input, not memory
//! addresses — window relocation never invalidates anything computed from
//! them (see the "Rebase safety" note in `DESIGN.md`).

use std::io::Read;

use crate::decode::Encoding;
use crate::{ParserError, SourceError};

/// Bytes are grown in multiples of this size, per the spec's dynamic-buffer
/// growth policy.
pub(crate) const GROW_INCREMENT: usize = 8 * 1024;

/// A single contiguous, growable, front-releasable byte buffer.
///
/// This is the "dynamic-buffer" building block that the stream-reading
/// variants wrap. `less` reclaims the freed gap at the front of the
/// allocation whenever the gap is at least as large as the data it would
/// have to shift, keeping `less` amortized O(1) and never overlapping a
/// `memmove` the way an always-left-pack implementation would.
#[derive(Debug, Default)]
struct DynamicBuffer {
    bytes: Vec<u8>,
    begin: usize,
    byte_offset: u64,
}

impl DynamicBuffer {
    fn window(&self) -> &[u8] {
        &self.bytes[self.begin..]
    }

    fn byte_offset(&self) -> u64 {
        self.byte_offset
    }

    fn append(&mut self, data: &[u8]) {
        self.bytes.extend_from_slice(data);
    }

    fn less(&mut self, n: usize) -> Result<usize, SourceError> {
        let available = self.bytes.len() - self.begin;
        if n > available {
            return Err(SourceError::OverRelease {
                requested: n,
                available,
            });
        }
        self.begin += n;
        self.byte_offset += n as u64;
        let retained = self.bytes.len() - self.begin;
        if self.begin >= retained {
            self.bytes.drain(0..self.begin);
            self.begin = 0;
        }
        Ok(n)
    }
}

/// A source backed by a single, fully materialized buffer supplied by the
/// caller. `more` never has anything to add.
#[derive(Debug, Default)]
pub struct StaticBuffer {
    buf: DynamicBuffer,
}

impl StaticBuffer {
    fn new(bytes: Vec<u8>) -> Self {
        StaticBuffer {
            buf: DynamicBuffer {
                bytes,
                begin: 0,
                byte_offset: 0,
            },
        }
    }
}

/// A source that reads from a [`std::io::Read`] implementation into a
/// dynamic buffer on demand.
///
/// Both the FILE-read and fd-read variants from the spec are this same
/// struct in safe Rust: the distinction in the C original is which libc
/// buffering layer backs the reads, a distinction that does not exist once
/// the reader is expressed as `std::io::Read`. `open_source_file` and
/// `open_source_fd` (§6) construct one of these with a `std::fs::File` and
/// an arbitrary reader, respectively, and the resulting `Source` variant
/// records which constructor was used for diagnostics.
#[derive(Debug)]
pub struct StreamRead {
    buf: DynamicBuffer,
    reader: Box<dyn Read + Send>,
    eof: bool,
}

impl StreamRead {
    fn new(reader: Box<dyn Read + Send>) -> Self {
        StreamRead {
            buf: DynamicBuffer::default(),
            reader,
            eof: false,
        }
    }

    fn more(&mut self, n: usize) -> Result<usize, SourceError> {
        if self.eof {
            return Ok(0);
        }
        let want = n.max(GROW_INCREMENT);
        let mut chunk = vec![0u8; want];
        let mut total = 0;
        while total < want {
            let read = self.reader.read(&mut chunk[total..])?;
            if read == 0 {
                self.eof = true;
                break;
            }
            total += read;
        }
        chunk.truncate(total);
        self.buf.append(&chunk);
        Ok(total)
    }
}

/// A source backed by a read-only memory mapping of an entire file.
///
/// The window spans the full mapping; there is no dynamic growth, and
/// `less` only ever advances the front of the window. `close` drops the
/// mapping.
pub struct FdMmap {
    #[allow(dead_code)]
    file: std::fs::File,
    map: memmap2::Mmap,
    begin: usize,
    byte_offset: u64,
}

impl std::fmt::Debug for FdMmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FdMmap")
            .field("begin", &self.begin)
            .field("byte_offset", &self.byte_offset)
            .field("len", &self.map.len())
            .finish()
    }
}

impl FdMmap {
    fn window(&self) -> &[u8] {
        &self.map[self.begin..]
    }

    fn less(&mut self, n: usize) -> Result<usize, SourceError> {
        let available = self.map.len() - self.begin;
        if n > available {
            return Err(SourceError::OverRelease {
                requested: n,
                available,
            });
        }
        self.begin += n;
        self.byte_offset += n as u64;
        Ok(n)
    }
}

/// The polymorphic byte source: a tagged variant over the five backing
/// implementations named in the spec.
#[derive(Debug)]
#[non_exhaustive]
pub enum Source {
    /// In-memory buffer, no backing I/O.
    StaticBuffer(StaticBuffer),
    /// `std::fs::File`-backed stream read.
    FileRead(StreamRead),
    /// Generic-reader-backed stream read (e.g. standard input).
    FdRead(StreamRead),
    /// Read-only memory-mapped file.
    FdMmap(FdMmap),
}

impl Source {
    /// Wrap an in-memory buffer. No I/O is ever performed; `more` always
    /// returns 0.
    pub fn from_buffer(bytes: impl Into<Vec<u8>>) -> Self {
        Source::StaticBuffer(StaticBuffer::new(bytes.into()))
    }

    /// Wrap a `std::fs::File`, reading it incrementally as `more` is
    /// called.
    pub fn from_file(file: std::fs::File) -> Self {
        Source::FileRead(StreamRead::new(Box::new(file)))
    }

    /// Wrap an arbitrary reader (for example standard input), reading it
    /// incrementally as `more` is called.
    pub fn from_reader(reader: impl Read + Send + 'static) -> Self {
        Source::FdRead(StreamRead::new(Box::new(reader)))
    }

    /// Memory-map a file in full. `close` unmaps it.
    ///
    /// # Safety note
    /// `memmap2::Mmap::map` is unsafe because the file may be truncated or
    /// mutated by another process while mapped, which this crate cannot
    /// prevent; the caller is trusted to own the file exclusively for the
    /// parser's lifetime, matching the source-ownership model in §5.
    pub fn from_mmap(file: std::fs::File) -> Result<Self, SourceError> {
        #[allow(unsafe_code)]
        let map = unsafe { memmap2::Mmap::map(&file)? };
        Ok(Source::FdMmap(FdMmap {
            file,
            map,
            begin: 0,
            byte_offset: 0,
        }))
    }

    /// Request that at least `n` more bytes be available in the window,
    /// appending as many as can be produced. Returns the number of bytes
    /// actually appended; 0 signals EOF.
    pub fn more(&mut self, n: usize) -> Result<usize, SourceError> {
        match self {
            Source::StaticBuffer(_) => Ok(0),
            Source::FileRead(s) | Source::FdRead(s) => s.more(n),
            Source::FdMmap(_) => Ok(0),
        }
    }

    /// Release `n` bytes from the front of the window.
    pub fn less(&mut self, n: usize) -> Result<usize, SourceError> {
        match self {
            Source::StaticBuffer(s) => s.buf.less(n),
            Source::FileRead(s) | Source::FdRead(s) => s.buf.less(n),
            Source::FdMmap(s) => s.less(n),
        }
    }

    /// The currently materialized slice of bytes.
    pub fn window(&self) -> &[u8] {
        match self {
            Source::StaticBuffer(s) => s.buf.window(),
            Source::FileRead(s) | Source::FdRead(s) => s.buf.window(),
            Source::FdMmap(s) => s.window(),
        }
    }

    /// How many bytes have been released before the start of the window.
    pub fn byte_offset(&self) -> u64 {
        match self {
            Source::StaticBuffer(s) => s.buf.byte_offset(),
            Source::FileRead(s) | Source::FdRead(s) => s.buf.byte_offset(),
            Source::FdMmap(s) => s.byte_offset,
        }
    }

    /// The absolute offset just past the last available byte.
    pub fn end_offset(&self) -> u64 {
        self.byte_offset() + self.window().len() as u64
    }

    /// Whether the source has reached EOF and the window is exhausted.
    pub fn is_exhausted(&self) -> bool {
        let at_eof = match self {
            Source::StaticBuffer(_) | Source::FdMmap(_) => true,
            Source::FileRead(s) | Source::FdRead(s) => s.eof,
        };
        at_eof && self.window().is_empty()
    }

    /// Release all resources. After `close`, no further use is defined.
    pub fn close(&mut self) -> Result<(), SourceError> {
        // `std::fs::File`/`Mmap` release their resources on drop; nothing
        // further to do here. The method exists to match the spec's
        // `close` capability and to give callers an explicit point to
        // surface a final I/O error at, matching `close_parser`'s contract.
        Ok(())
    }
}

/// Determine the stream encoding from the leading bytes of `source`,
/// without consuming any of them (component A/§4.A). `open_parser` runs
/// this once, before the character engine takes its first lookahead
/// character, so the BOM bytes (if any) remain in the window for the
/// `stream` production to tokenize in the usual way.
///
/// Requests up to 4 bytes via `more`, padding any that the source cannot
/// produce (a source shorter than 4 bytes) with `0xAA`, a value that
/// never matches a BOM or zero-stride pattern. Checked in order: the
/// four-byte UTF-32 BOMs, the zero-byte-stride patterns a BOM-less
/// ASCII-prefixed UTF-32 or UTF-16 document leaves in its first four
/// bytes, the two-byte UTF-16 BOMs, the three-byte UTF-8 BOM, and
/// finally the UTF-8 default.
pub(crate) fn detect_encoding(source: &mut Source) -> Result<Encoding, ParserError> {
    loop {
        let have = source.window().len();
        if have >= 4 {
            break;
        }
        if source.more(4 - have)? == 0 {
            break;
        }
    }
    let window = source.window();
    let byte = |i: usize| -> u8 { window.get(i).copied().unwrap_or(0xAA) };
    let (b0, b1, b2, b3) = (byte(0), byte(1), byte(2), byte(3));

    if b0 == 0x00 && b1 == 0x00 && b2 == 0xFE && b3 == 0xFF {
        return Ok(Encoding::Utf32Be);
    }
    if b0 == 0xFF && b1 == 0xFE && b2 == 0x00 && b3 == 0x00 {
        return Ok(Encoding::Utf32Le);
    }
    if b0 == 0x00 && b1 == 0x00 && b2 == 0x00 && b3 != 0x00 {
        return Ok(Encoding::Utf32Be);
    }
    if b0 != 0x00 && b1 == 0x00 && b2 == 0x00 && b3 == 0x00 {
        return Ok(Encoding::Utf32Le);
    }
    if b0 == 0x00 && b1 != 0x00 && b2 == 0x00 && b3 != 0x00 {
        return Ok(Encoding::Utf16Be);
    }
    if b0 != 0x00 && b1 == 0x00 && b2 != 0x00 && b3 == 0x00 {
        return Ok(Encoding::Utf16Le);
    }
    if b0 == 0xFE && b1 == 0xFF {
        return Ok(Encoding::Utf16Be);
    }
    if b0 == 0xFF && b1 == 0xFE {
        return Ok(Encoding::Utf16Le);
    }
    Ok(Encoding::Utf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_buffer_more_is_always_zero() {
        let mut source = Source::from_buffer(*b"abc");
        assert_eq!(source.more(10).unwrap(), 0);
        assert_eq!(source.window(), b"abc");
    }

    #[test]
    fn less_releases_from_the_front() {
        let mut source = Source::from_buffer(*b"abcdef");
        assert_eq!(source.less(2).unwrap(), 2);
        assert_eq!(source.byte_offset(), 2);
        assert_eq!(source.window(), b"cdef");
    }

    #[test]
    fn less_zero_is_a_no_op() {
        let mut source = Source::from_buffer(*b"abc");
        assert_eq!(source.less(0).unwrap(), 0);
        assert_eq!(source.window(), b"abc");
    }

    #[test]
    fn over_release_is_an_error() {
        let mut source = Source::from_buffer(*b"ab");
        assert!(source.less(3).is_err());
    }

    #[test]
    fn stream_read_reports_eof() {
        let mut source = Source::from_reader(std::io::Cursor::new(b"hello".to_vec()));
        let mut total = 0;
        loop {
            let n = source.more(4096).unwrap();
            if n == 0 {
                break;
            }
            total += n;
        }
        assert_eq!(total, 5);
        assert!(source.is_exhausted());
    }

    #[test]
    fn gap_reclaim_keeps_allocation_bounded() {
        let mut source = Source::from_reader(std::io::Cursor::new(vec![0u8; 3 * GROW_INCREMENT]));
        source.more(GROW_INCREMENT).unwrap();
        source.less(GROW_INCREMENT).unwrap();
        // After releasing everything retained so far, the backing
        // allocation for the stream-read variant should have been
        // compacted rather than growing unboundedly.
        if let Source::FdRead(s) = &source {
            assert_eq!(s.buf.begin, 0);
        } else {
            panic!("expected FdRead source");
        }
    }

    #[test]
    fn detects_utf8_bom() {
        let mut source = Source::from_buffer(*b"\xef\xbb\xbfa");
        assert_eq!(detect_encoding(&mut source).unwrap(), Encoding::Utf8);
        assert_eq!(source.window(), b"\xef\xbb\xbfa");
    }

    #[test]
    fn detects_utf16le_bom() {
        let mut source = Source::from_buffer(*b"\xff\xfea\x00");
        assert_eq!(detect_encoding(&mut source).unwrap(), Encoding::Utf16Le);
    }

    #[test]
    fn detects_utf16be_bom() {
        let mut source = Source::from_buffer(*b"\xfe\xff\x00a");
        assert_eq!(detect_encoding(&mut source).unwrap(), Encoding::Utf16Be);
    }

    #[test]
    fn detects_utf32le_bom() {
        let mut source = Source::from_buffer(*b"\xff\xfe\x00\x00");
        assert_eq!(detect_encoding(&mut source).unwrap(), Encoding::Utf32Le);
    }

    #[test]
    fn detects_utf32be_bom() {
        let mut source = Source::from_buffer(*b"\x00\x00\xfe\xff");
        assert_eq!(detect_encoding(&mut source).unwrap(), Encoding::Utf32Be);
    }

    #[test]
    fn detects_bom_less_utf16be_from_zero_stride() {
        let mut source = Source::from_buffer(*b"\x00a\x00b");
        assert_eq!(detect_encoding(&mut source).unwrap(), Encoding::Utf16Be);
    }

    #[test]
    fn detects_bom_less_utf16le_from_zero_stride() {
        let mut source = Source::from_buffer(*b"a\x00b\x00");
        assert_eq!(detect_encoding(&mut source).unwrap(), Encoding::Utf16Le);
    }

    #[test]
    fn defaults_to_utf8_with_no_bom() {
        let mut source = Source::from_buffer(*b"key: value");
        assert_eq!(detect_encoding(&mut source).unwrap(), Encoding::Utf8);
    }

    #[test]
    fn tolerates_a_source_shorter_than_four_bytes() {
        let mut source = Source::from_buffer(*b"a");
        assert_eq!(detect_encoding(&mut source).unwrap(), Encoding::Utf8);
    }
}
