//! Pluggable chunking strategies.
//!
//! Every strategy implements [`ChunkStrategy`] and returns byte-offset
//! [`Span`]s into the source text rather than owned strings. Because all
//! chunk text is sliced from the one source string, overlapping neighbours
//! share boundary text byte-for-byte and provenance offsets come for free.
//!
//! Contract for all variants:
//! - deterministic given identical input and configuration;
//! - every character of the source appears in at least one span;
//! - no span holds more than the configured maximum word count;
//! - no span is empty.
//!
//! Strategies are selected by configuration, never by runtime type
//! inspection; new strategies are added as new [`ChunkStrategy`] impls.

use crate::error::DossierError;
use crate::models::DocumentType;

/// A half-open byte range `[start, end)` into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Capability implemented by every chunking strategy.
pub trait ChunkStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Split `text` into ordered, validated spans.
    fn split(&self, text: &str, doc_type: DocumentType) -> Result<Vec<Span>, DossierError>;
}

/// Byte spans of each whitespace-delimited word in `text`.
fn word_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    for (i, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                spans.push(Span { start: s, end: i });
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        spans.push(Span {
            start: s,
            end: text.len(),
        });
    }
    spans
}

fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Fixed-size word windows with configurable overlap.
///
/// Breaks only at word boundaries. Adjacent spans share exactly
/// `overlap_words` words; with zero overlap the window end is extended to
/// the next word start so inter-chunk whitespace is never dropped.
#[derive(Debug, Clone)]
pub struct DefaultChunker {
    max_words: usize,
    overlap_words: usize,
}

impl DefaultChunker {
    pub fn new(max_words: usize, overlap_words: usize) -> Self {
        let max_words = max_words.max(1);
        Self {
            max_words,
            overlap_words: overlap_words.min(max_words - 1),
        }
    }

    /// Window the given region of `text`, offsetting spans by the region
    /// start so they index into the full source.
    fn split_region(&self, text: &str, region: Span) -> Vec<Span> {
        let slice = region.slice(text);
        let words = word_spans(slice);
        if words.is_empty() {
            // Whitespace-only region: keep it whole so coverage holds.
            return vec![region];
        }
        if words.len() <= self.max_words {
            return vec![region];
        }

        let step = self.max_words - self.overlap_words;
        let mut out = Vec::new();
        let mut i = 0usize;
        loop {
            let j = (i + self.max_words).min(words.len());
            let start = if i == 0 { 0 } else { words[i].start };
            let end = if j == words.len() {
                slice.len()
            } else if self.overlap_words == 0 {
                words[j].start
            } else {
                words[j - 1].end
            };
            out.push(Span {
                start: region.start + start,
                end: region.start + end,
            });
            if j == words.len() {
                break;
            }
            i += step;
        }
        out
    }
}

impl ChunkStrategy for DefaultChunker {
    fn name(&self) -> &'static str {
        "default"
    }

    fn split(&self, text: &str, _doc_type: DocumentType) -> Result<Vec<Span>, DossierError> {
        if text.trim().is_empty() {
            return Err(DossierError::Chunking(
                "document contains no words".to_string(),
            ));
        }
        Ok(self.split_region(
            text,
            Span {
                start: 0,
                end: text.len(),
            },
        ))
    }
}

/// Section-first splitting on structural markers.
///
/// Splits on blank lines and `#`-style headers, merges small adjacent
/// sections up to the word limit, and recursively falls back to
/// [`DefaultChunker`] for oversized sections. Section boundaries are hard
/// breaks: no overlap is carried across them.
#[derive(Debug, Clone)]
pub struct SemanticChunker {
    max_words: usize,
    fallback: DefaultChunker,
}

impl SemanticChunker {
    pub fn new(max_words: usize, overlap_words: usize) -> Self {
        Self {
            max_words: max_words.max(1),
            fallback: DefaultChunker::new(max_words, overlap_words),
        }
    }
}

/// Partition `text` into contiguous section spans.
///
/// A new section starts at the first non-blank line after a blank line, or
/// at a `#` header line. Blank-line runs attach to the preceding section so
/// the spans cover every byte.
fn sections(text: &str) -> Vec<Span> {
    let mut bounds = vec![0usize];
    let mut offset = 0usize;
    let mut prev_blank = false;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        let starts_section = (prev_blank && !trimmed.is_empty()) || trimmed.starts_with('#');
        if offset > 0 && starts_section {
            bounds.push(offset);
        }
        prev_blank = trimmed.is_empty();
        offset += line.len();
    }
    bounds.push(text.len());
    bounds.dedup();
    bounds
        .windows(2)
        .map(|w| Span {
            start: w[0],
            end: w[1],
        })
        .collect()
}

impl ChunkStrategy for SemanticChunker {
    fn name(&self) -> &'static str {
        "semantic"
    }

    fn split(&self, text: &str, _doc_type: DocumentType) -> Result<Vec<Span>, DossierError> {
        if text.trim().is_empty() {
            return Err(DossierError::Chunking(
                "document contains no words".to_string(),
            ));
        }

        let mut out: Vec<Span> = Vec::new();
        let mut cur: Option<Span> = None;
        let mut cur_words = 0usize;

        for sec in sections(text) {
            let sec_words = count_words(sec.slice(text));

            if cur_words > 0 && cur_words + sec_words > self.max_words {
                if let Some(span) = cur.take() {
                    out.push(span);
                }
                cur_words = 0;
            }

            if sec_words > self.max_words {
                let mut region = sec;
                if let Some(span) = cur.take() {
                    if cur_words > 0 {
                        out.push(span);
                    } else {
                        // Word-less buffer (leading blank lines) folds into
                        // the fallback region rather than becoming a chunk.
                        region.start = span.start;
                    }
                    cur_words = 0;
                }
                out.extend(self.fallback.split_region(text, region));
            } else {
                match cur.as_mut() {
                    Some(span) => span.end = sec.end,
                    None => cur = Some(sec),
                }
                cur_words += sec_words;
            }
        }

        if let Some(span) = cur {
            if cur_words > 0 {
                out.push(span);
            } else if let Some(last) = out.last_mut() {
                // Trailing whitespace-only tail folds into the last chunk.
                last.end = span.end;
            } else {
                out.push(span);
            }
        }

        Ok(out)
    }
}

/// Line prefixes that mark a top-level function/class-like definition.
const DEFINITION_KEYWORDS: &[&str] = &[
    "def ",
    "async def ",
    "class ",
    "fn ",
    "pub fn ",
    "pub struct ",
    "pub enum ",
    "impl ",
    "struct ",
    "function ",
    "public ",
    "private ",
    "const ",
    "static ",
];

/// Maximum indentation (in bytes) at which a definition still counts as
/// top-level.
const MAX_DEFINITION_INDENT: usize = 4;

fn is_definition_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    if line.len() - trimmed.len() > MAX_DEFINITION_INDENT {
        return false;
    }
    DEFINITION_KEYWORDS.iter().any(|kw| trimmed.starts_with(kw))
}

/// Code-aware splitting at top-level definition boundaries.
///
/// Accumulates lines until the word limit is exceeded, then breaks at the
/// next definition line. Regions that still exceed the limit (no boundary
/// found) fall back to [`DefaultChunker`] windows without overlap.
#[derive(Debug, Clone)]
pub struct CodeChunker {
    max_words: usize,
    fallback: DefaultChunker,
}

impl CodeChunker {
    pub fn new(max_words: usize) -> Self {
        Self {
            max_words: max_words.max(1),
            fallback: DefaultChunker::new(max_words, 0),
        }
    }

    fn flush(&self, text: &str, region: Span, out: &mut Vec<Span>) {
        if region.start >= region.end {
            return;
        }
        if count_words(region.slice(text)) > self.max_words {
            out.extend(self.fallback.split_region(text, region));
        } else {
            out.push(region);
        }
    }
}

impl ChunkStrategy for CodeChunker {
    fn name(&self) -> &'static str {
        "code"
    }

    fn split(&self, text: &str, _doc_type: DocumentType) -> Result<Vec<Span>, DossierError> {
        if text.trim().is_empty() {
            return Err(DossierError::Chunking(
                "document contains no words".to_string(),
            ));
        }

        let mut out = Vec::new();
        let mut cur_start = 0usize;
        let mut cur_words = 0usize;
        let mut offset = 0usize;

        for line in text.split_inclusive('\n') {
            let line_words = count_words(line);
            if cur_words > 0 && cur_words + line_words > self.max_words && is_definition_line(line)
            {
                self.flush(
                    text,
                    Span {
                        start: cur_start,
                        end: offset,
                    },
                    &mut out,
                );
                cur_start = offset;
                cur_words = 0;
            }
            cur_words += line_words;
            offset += line.len();
        }

        self.flush(
            text,
            Span {
                start: cur_start,
                end: text.len(),
            },
            &mut out,
        );

        Ok(out)
    }
}

/// Dispatches to the strategy best suited to the document type.
///
/// Resume-like and prose documents get [`SemanticChunker`], source code gets
/// [`CodeChunker`], everything else the [`DefaultChunker`].
pub struct AdaptiveChunker {
    semantic: SemanticChunker,
    code: CodeChunker,
    default: DefaultChunker,
}

impl AdaptiveChunker {
    pub fn new(max_words: usize, overlap_words: usize) -> Self {
        Self {
            semantic: SemanticChunker::new(max_words, overlap_words),
            code: CodeChunker::new(max_words),
            default: DefaultChunker::new(max_words, overlap_words),
        }
    }
}

impl ChunkStrategy for AdaptiveChunker {
    fn name(&self) -> &'static str {
        "adaptive"
    }

    fn split(&self, text: &str, doc_type: DocumentType) -> Result<Vec<Span>, DossierError> {
        match doc_type {
            DocumentType::Resume
            | DocumentType::CoverLetter
            | DocumentType::Profile
            | DocumentType::Documentation => self.semantic.split(text, doc_type),
            DocumentType::Code => self.code.split(text, doc_type),
            DocumentType::Project | DocumentType::Generic => self.default.split(text, doc_type),
        }
    }
}

/// Signature of an injected chunk function: `(text, doc_type)` to ordered
/// `(start, end)` byte offsets.
pub type ChunkFn = dyn Fn(&str, DocumentType) -> Vec<(usize, usize)> + Send + Sync;

/// Wraps a user-provided chunk function and validates its output.
///
/// Offsets must be within document bounds, on UTF-8 character boundaries,
/// monotonic, non-empty, and overlapping by at most `overlap_budget` bytes;
/// anything else fails with [`DossierError::Chunking`].
pub struct CustomChunker {
    func: Box<ChunkFn>,
    overlap_budget: usize,
}

impl CustomChunker {
    pub fn new<F>(func: F, overlap_budget: usize) -> Self
    where
        F: Fn(&str, DocumentType) -> Vec<(usize, usize)> + Send + Sync + 'static,
    {
        Self {
            func: Box::new(func),
            overlap_budget,
        }
    }
}

impl ChunkStrategy for CustomChunker {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn split(&self, text: &str, doc_type: DocumentType) -> Result<Vec<Span>, DossierError> {
        let raw = (self.func)(text, doc_type);
        if raw.is_empty() {
            return Err(DossierError::Chunking(
                "custom chunk function produced no spans".to_string(),
            ));
        }

        let mut prev: Option<Span> = None;
        let mut out = Vec::with_capacity(raw.len());
        for (idx, &(start, end)) in raw.iter().enumerate() {
            if start >= end {
                return Err(DossierError::Chunking(format!(
                    "custom span {idx} is empty ({start}..{end})"
                )));
            }
            if end > text.len() {
                return Err(DossierError::Chunking(format!(
                    "custom span {idx} exceeds document bounds ({end} > {})",
                    text.len()
                )));
            }
            if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
                return Err(DossierError::Chunking(format!(
                    "custom span {idx} is not on a character boundary"
                )));
            }
            if let Some(p) = prev {
                if start < p.start {
                    return Err(DossierError::Chunking(format!(
                        "custom span {idx} is not monotonic ({start} < {})",
                        p.start
                    )));
                }
                let overlap = p.end.saturating_sub(start);
                if overlap > self.overlap_budget {
                    return Err(DossierError::Chunking(format!(
                        "custom span {idx} overlaps previous span by {overlap} bytes \
                         (budget {})",
                        self.overlap_budget
                    )));
                }
            }
            let span = Span { start, end };
            prev = Some(span);
            out.push(span);
        }
        Ok(out)
    }
}
