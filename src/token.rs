//! YEAST token codes and the [`Token`] record itself (part of the data
//! model in §3, plus the `code_type`/`code_pair` entries in the external
//! interface, §6).

use crate::Encoding;

/// Which of the four groups a [`TokenCode`] belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CodeType {
    /// Opens a nested region; paired with an `End` code.
    Begin,
    /// Closes a nested region opened by a `Begin` code.
    End,
    /// Content-bearing: text, indicators, breaks, and the like.
    Match,
    /// Out-of-band: BOM, error, or stream-done markers.
    Fake,
}

/// A YEAST token code: one printable ASCII character naming the role of a
/// region of source bytes. Variant names follow the spec's own short
/// names (`R`/`A`/`C`/... for `Begin`, lowercase for the paired `End`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TokenCode {
    /// `R` — begin stream.
    BeginStream,
    /// `r` — end stream.
    EndStream,
    /// `A` — begin document-anchors region (a single document's anchor
    /// namespace).
    BeginAnchors,
    /// `a` — end document-anchors region.
    EndAnchors,
    /// `C` — begin comment run.
    BeginComment,
    /// `c` — end comment run.
    EndComment,
    /// `D` — begin document.
    BeginDocument,
    /// `d` — end document.
    EndDocument,
    /// `O` — begin node properties (anchor + tag prefix on a node).
    BeginProperties,
    /// `o` — end node properties.
    EndProperties,
    /// `E` — begin content (the "node content" that follows properties).
    BeginContent,
    /// `e` — end content.
    EndContent,
    /// `H` — begin directive.
    BeginDirective,
    /// `h` — end directive.
    EndDirective,
    /// `M` — begin mapping.
    BeginMapping,
    /// `m` — end mapping.
    EndMapping,
    /// `N` — begin node.
    BeginNode,
    /// `n` — end node.
    EndNode,
    /// `X` — begin mapping pair.
    BeginPair,
    /// `x` — end mapping pair.
    EndPair,
    /// `P` — begin sequence.
    BeginSequence,
    /// `p` — end sequence.
    EndSequence,
    /// `S` — begin scalar.
    BeginScalar,
    /// `s` — end scalar.
    EndScalar,
    /// `Q` — begin quoted-scalar escape/quote detail.
    BeginQuote,
    /// `q` — end quoted-scalar escape/quote detail.
    EndQuote,
    /// `G` — begin tag.
    BeginTag,
    /// `g` — end tag.
    EndTag,

    /// `T` — scalar text content.
    Text,
    /// `t` — meta text (anchor/tag/directive names, not scalar content).
    Meta,
    /// `b` — a line break that is neither fold nor literal-preserved.
    Break,
    /// `L` — a line break classified as a preserved line feed (inside a
    /// literal block scalar).
    LineFeed,
    /// `l` — a line break classified as a fold (plain/folded scalars,
    /// collapses to a single space).
    LineFold,
    /// `I` — a structural indicator character (`-?:,[]{}#&*!|>'"%@\``).
    Indicator,
    /// `w` — white space (spaces/tabs that are not indentation).
    White,
    /// `i` — indentation white space.
    Indent,
    /// `K` — document-start marker `---`.
    DocumentStart,
    /// `k` — document-end marker `...`.
    DocumentEnd,
    /// `-` — an unparsed region left behind after error recovery.
    Unparsed,

    /// `U` — a synthetic byte-order-mark token.
    Bom,
    /// `!` — a synthetic in-band error token.
    Error,
    /// `\0` — the final token of a stream.
    Done,
}

impl TokenCode {
    /// Which group this code belongs to.
    pub fn code_type(self) -> CodeType {
        use TokenCode::*;
        match self {
            BeginStream | BeginAnchors | BeginComment | BeginDocument | BeginProperties
            | BeginContent | BeginDirective | BeginMapping | BeginNode | BeginPair
            | BeginSequence | BeginScalar | BeginQuote | BeginTag => CodeType::Begin,
            EndStream | EndAnchors | EndComment | EndDocument | EndProperties | EndContent
            | EndDirective | EndMapping | EndNode | EndPair | EndSequence | EndScalar
            | EndQuote | EndTag => CodeType::End,
            Text | Meta | Break | LineFeed | LineFold | Indicator | White | Indent
            | DocumentStart | DocumentEnd | Unparsed => CodeType::Match,
            Bom | Error | Done => CodeType::Fake,
        }
    }

    /// The printable-ASCII spelling of this code, per §6.
    pub fn as_char(self) -> char {
        use TokenCode::*;
        match self {
            BeginStream => 'R',
            EndStream => 'r',
            BeginAnchors => 'A',
            EndAnchors => 'a',
            BeginComment => 'C',
            EndComment => 'c',
            BeginDocument => 'D',
            EndDocument => 'd',
            BeginProperties => 'O',
            EndProperties => 'o',
            BeginContent => 'E',
            EndContent => 'e',
            BeginDirective => 'H',
            EndDirective => 'h',
            BeginMapping => 'M',
            EndMapping => 'm',
            BeginNode => 'N',
            EndNode => 'n',
            BeginPair => 'X',
            EndPair => 'x',
            BeginSequence => 'P',
            EndSequence => 'p',
            BeginScalar => 'S',
            EndScalar => 's',
            BeginQuote => 'Q',
            EndQuote => 'q',
            BeginTag => 'G',
            EndTag => 'g',
            Text => 'T',
            Meta => 't',
            Break => 'b',
            LineFeed => 'L',
            LineFold => 'l',
            Indicator => 'I',
            White => 'w',
            Indent => 'i',
            DocumentStart => 'K',
            DocumentEnd => 'k',
            Unparsed => '-',
            Bom => 'U',
            Error => '!',
            Done => '\0',
        }
    }
}

/// The code paired with `code` (`Begin` <-> `End`). Identity on `Match`
/// and `Fake` codes, so `code_pair(code_pair(c)) == c` always holds, per
/// the nesting property in §8.
pub fn code_pair(code: TokenCode) -> TokenCode {
    use TokenCode::*;
    match code {
        BeginStream => EndStream,
        EndStream => BeginStream,
        BeginAnchors => EndAnchors,
        EndAnchors => BeginAnchors,
        BeginComment => EndComment,
        EndComment => BeginComment,
        BeginDocument => EndDocument,
        EndDocument => BeginDocument,
        BeginProperties => EndProperties,
        EndProperties => BeginProperties,
        BeginContent => EndContent,
        EndContent => BeginContent,
        BeginDirective => EndDirective,
        EndDirective => BeginDirective,
        BeginMapping => EndMapping,
        EndMapping => BeginMapping,
        BeginNode => EndNode,
        EndNode => BeginNode,
        BeginPair => EndPair,
        EndPair => BeginPair,
        BeginSequence => EndSequence,
        EndSequence => BeginSequence,
        BeginScalar => EndScalar,
        EndScalar => BeginScalar,
        BeginQuote => EndQuote,
        EndQuote => BeginQuote,
        BeginTag => EndTag,
        EndTag => BeginTag,
        other => other,
    }
}

/// Where a token's bytes live.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenBody {
    /// A `[begin, end)` sub-range of the original source, as absolute byte
    /// offsets.
    Source {
        /// Start offset, inclusive.
        begin: u64,
        /// End offset, exclusive.
        end: u64,
    },
    /// A pointer to a static UTF-8 string — used for the BOM-name rewrite
    /// and for `ERROR` tokens.
    Static(&'static str),
}

impl TokenBody {
    /// Number of bytes this body covers.
    pub fn len(&self) -> u64 {
        match self {
            TokenBody::Source { begin, end } => end - begin,
            TokenBody::Static(s) => s.len() as u64,
        }
    }

    /// Whether this body covers zero bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single emitted token: a typed, positioned region of the input (or a
/// static string, for synthetic tokens).
#[derive(Copy, Clone, Debug)]
#[non_exhaustive]
pub struct Token {
    /// Absolute byte offset at the start of the token.
    pub byte_offset: u64,
    /// 0-based character offset at the start of the token.
    pub char_offset: u64,
    /// 1-based line number at the start of the token.
    pub line: u64,
    /// 0-based column at the start of the token.
    pub line_char: u64,
    /// Where the token's bytes live.
    pub body: TokenBody,
    /// Encoding of `body`'s bytes (always [`Encoding::Utf8`] for
    /// synthetic tokens).
    pub encoding: Encoding,
    /// The token's code.
    pub code: TokenCode,
}

impl Token {
    pub(crate) fn empty_at(
        pos: &crate::char_engine::Character,
        encoding: Encoding,
        code: TokenCode,
    ) -> Self {
        Token {
            byte_offset: pos.byte_offset,
            char_offset: pos.char_offset,
            line: pos.line,
            line_char: pos.line_char,
            body: TokenBody::Source {
                begin: pos.begin,
                end: pos.begin,
            },
            encoding,
            code,
        }
    }

    /// The token's byte slice, resolved against the current source
    /// window. Panics if this token's range is no longer inside the
    /// window (the caller let the window slide past an undelivered
    /// token — a usage error, not a data error).
    pub fn bytes<'a>(&self, window: &'a [u8], window_byte_offset: u64) -> &'a [u8] {
        match self.body {
            TokenBody::Source { begin, end } => {
                let start = (begin - window_byte_offset) as usize;
                let stop = (end - window_byte_offset) as usize;
                &window[start..stop]
            }
            TokenBody::Static(s) => s.as_bytes(),
        }
    }
}
