/// A position within the original source bytes.
///
/// `byte_offset` and `char_offset` are 0-based; `line` is 1-based and
/// `line_char` is the 0-based column within that line.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct Mark {
    /// Offset in bytes from the start of the source.
    pub byte_offset: u64,
    /// Offset in characters from the start of the source.
    pub char_offset: u64,
    /// 1-based line number.
    pub line: u64,
    /// 0-based column within `line`.
    pub line_char: u64,
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {} column {}", self.line, self.line_char)
    }
}

/// Errors raised by a [`Source`](crate::Source) implementation.
///
/// These are the out-of-band errors described for byte sources: bad
/// arguments, over-release, I/O failure, or allocation failure.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// `more`/`less` was called with a negative or over-large size.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// `less` tried to release more bytes than are in the window.
    #[error("attempted to release {requested} bytes but only {available} are available")]
    OverRelease {
        /// Number of bytes `less` was asked to release.
        requested: usize,
        /// Number of bytes actually available in the window.
        available: usize,
    },
    /// The backing I/O failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Allocation failed while growing the dynamic buffer.
    #[error("out of memory")]
    OutOfMemory,
}

/// Errors raised while decoding a single code point.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The byte sequence does not encode a valid code point in this
    /// encoding (invalid leading byte, invalid trailing byte, lone
    /// surrogate, or out-of-range value).
    #[error("invalid byte sequence")]
    InvalidByteSequence,
    /// Fewer bytes remain than the encoding needs to decode one character,
    /// but the source is not at EOF yet.
    #[error("incomplete byte sequence")]
    Incomplete,
}

/// Errors raised by [`open_parser`](crate::open_parser) and friends that
/// are not carried in-band as `ERROR` tokens.
///
/// Every variant corresponds to one member of the POSIX-flavored error
/// surface in the external interface: `EINVAL`, `EILSEQ`, `EFAULT`,
/// `ENOMEM`, and I/O pass-through.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    /// Bad arguments to a public entry point (`EINVAL`).
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// Malformed encoding or byte sequence that could not be recovered
    /// from at the byte-source level (`EILSEQ`).
    #[error("invalid byte sequence at {mark}")]
    InvalidEncoding {
        /// Position of the malformed bytes.
        mark: Mark,
    },
    /// No production registered under the requested `{name, n, c, t}`
    /// combination.
    #[error("no production registered for {name:?} (n={n:?}, c={c:?}, t={t:?})")]
    UnknownProduction {
        /// Requested production name.
        name: &'static str,
        /// Requested indentation parameter, if any.
        n: Option<i64>,
        /// Requested context parameter, if any.
        c: Option<&'static str>,
        /// Requested chomping parameter, if any.
        t: Option<&'static str>,
    },
    /// An internal invariant was violated (`EFAULT`, should be
    /// unreachable).
    #[error("internal invariant violated: {0}")]
    Invariant(&'static str),
    /// Allocation failed (`ENOMEM`).
    #[error("out of memory")]
    OutOfMemory,
    /// The byte source failed.
    #[error(transparent)]
    Source(#[from] SourceError),
}
