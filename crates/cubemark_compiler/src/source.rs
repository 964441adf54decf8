//! Event source backed by markdown-rs.
//!
//! markdown-rs does not expose its event stream, so this module parses a
//! document to mdast and walks the tree back into well-nested enter/exit
//! events named after the default grammar's token types. Delimited
//! constructs contributed by extensions are recognised around and inside
//! the markdown-rs output: block markers on their own lines split the
//! document into segments, inline markers are found inside text runs.
//!
//! Text is emitted from mdast values. Where a value differs from the
//! source under its position (escapes, character references, container
//! prefixes) the token carries the resolved text.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

use cubemark_ast::Span;
use markdown::mdast;
use markdown::{ParseOptions, to_mdast};
use tracing::debug;

use crate::config::{CompilerConfig, DelimitedSyntax, Placement};
use crate::error::SourceError;
use crate::grammar::DATA;
use crate::mdast::STRIKETHROUGH;
use crate::token::{Event, Token};

/// Turns markdown documents into token events.
#[derive(Debug, Clone, Default)]
pub struct MarkdownSource {
    options: Arc<ParseOptions>,
    blocks: Vec<DelimitedSyntax>,
    inlines: Vec<DelimitedSyntax>,
}

impl MarkdownSource {
    /// Creates a source recognising every syntax in `config`.
    pub fn new(config: &CompilerConfig) -> Self {
        Self {
            options: Arc::new(config.parse_options()),
            blocks: config.delimited(Placement::Block).cloned().collect(),
            inlines: config.delimited(Placement::Inline).cloned().collect(),
        }
    }

    /// Tokenizes a document.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidSource`] if markdown-rs rejects a
    /// segment of the document.
    pub fn events(&self, source: &str) -> Result<Vec<Event>, SourceError> {
        let mut walker = Walker {
            source,
            options: &self.options,
            inlines: &self.inlines,
            definitions: HashMap::new(),
            events: Vec::new(),
        };
        walker.blocks(&self.blocks)?;

        debug!("Tokenized document into {} events", walker.events.len());
        Ok(walker.events)
    }
}

/// Destination of a link reference definition.
#[derive(Clone)]
struct Resource {
    url: String,
    title: Option<String>,
}

struct Walker<'s> {
    source: &'s str,
    options: &'s ParseOptions,
    inlines: &'s [DelimitedSyntax],
    definitions: HashMap<String, Resource>,
    events: Vec<Event>,
}

impl<'s> Walker<'s> {
    /// Splits the document on block marker lines.
    ///
    /// Marker lines inside fenced code are code. An unterminated block runs
    /// to the end of the document.
    fn blocks(&mut self, blocks: &'s [DelimitedSyntax]) -> Result<(), SourceError> {
        let mut open: Vec<(&'s DelimitedSyntax, usize)> = Vec::new();
        let mut fence: Option<Fence> = None;
        let mut segment_start = 0;
        let mut offset = 0;
        let source = self.source;

        for line in source.split_inclusive('\n') {
            let line_start = offset;
            offset += line.len();
            let marker = line.trim();

            if let Some(current) = fence {
                if current.closed_by(marker) {
                    fence = None;
                }
                continue;
            }
            if let Some(opened) = Fence::opened_by(marker) {
                fence = Some(opened);
                continue;
            }

            match open.last() {
                Some((syntax, start)) if syntax.close.as_deref() == Some(marker) => {
                    let (syntax, start) = (*syntax, *start);
                    self.segment(segment_start..line_start)?;
                    let end = line_start + line.trim_end().len();
                    self.exit(syntax.token_type.clone(), Span::from(start..end));
                    open.pop();
                    segment_start = offset;
                }
                _ => {
                    if let Some(syntax) = blocks.iter().find(|syntax| syntax.open == marker) {
                        self.segment(segment_start..line_start)?;
                        self.enter(syntax.token_type.clone(), Span::empty(line_start as u32));
                        open.push((syntax, line_start));
                        segment_start = offset;
                    }
                }
            }
        }

        self.segment(segment_start..source.len())?;
        while let Some((syntax, start)) = open.pop() {
            self.exit(syntax.token_type.clone(), Span::from(start..source.len()));
        }
        Ok(())
    }

    /// Parses one markdown segment and walks its tree.
    fn segment(&mut self, range: Range<usize>) -> Result<(), SourceError> {
        let source = self.source;
        let Some(text) = source.get(range.clone()) else {
            return Ok(());
        };
        if text.trim().is_empty() {
            return Ok(());
        }

        let tree = to_mdast(text, self.options)
            .map_err(|e| SourceError::invalid_source(e.to_string()))?;
        self.definitions.clear();
        collect_definitions(&tree, &mut self.definitions);
        self.children(&tree, range.start);
        Ok(())
    }

    fn node(&mut self, node: &mdast::Node, base: usize) {
        use markdown::mdast::Node;

        let span = node_span(node, base);
        let token_type = match node {
            Node::Paragraph(_) => "paragraph",
            Node::Emphasis(_) => "emphasis",
            Node::Strong(_) => "strong",
            Node::Delete(_) => STRIKETHROUGH,
            Node::Blockquote(_) => "blockQuote",
            Node::List(list) if list.ordered => "listOrdered",
            Node::List(_) => "listUnordered",
            Node::ListItem(_) => "listItem",
            Node::Break(_) => "hardBreak",
            Node::ThematicBreak(_) => "thematicBreak",
            Node::Heading(_) => return self.heading(node, span, base),
            Node::Text(text) => return self.text(TextRun::new(self.source, span, &text.value)),
            Node::InlineCode(code) => return self.inline_code(span, &code.value),
            Node::Code(code) => return self.code(code, span),
            Node::Html(html) => return self.html(span, &html.value, false),
            Node::Link(link) => {
                return self.link(node, span, base, &link.url, link.title.as_deref());
            }
            Node::Image(image) => {
                return self.image(span, &image.alt, &image.url, image.title.as_deref());
            }
            Node::LinkReference(reference) => {
                let Some(Resource { url, title }) = self.definition(&reference.identifier) else {
                    return self.children(node, base);
                };
                return self.link(node, span, base, &url, title.as_deref());
            }
            Node::ImageReference(reference) => {
                let Some(Resource { url, title }) = self.definition(&reference.identifier) else {
                    return;
                };
                return self.image(span, &reference.alt, &url, title.as_deref());
            }
            // Constructs without a token mapping are transparent.
            _ => return self.children(node, base),
        };

        self.enter(token_type, span);
        self.children(node, base);
        self.exit(token_type, span);
    }

    fn definition(&self, identifier: &str) -> Option<Resource> {
        self.definitions.get(identifier).cloned()
    }

    /// Walks children, joining adjacent text nodes into one run so inline
    /// markers split across them by markdown-rs are still found.
    fn children(&mut self, node: &mdast::Node, base: usize) {
        let Some(children) = node.children() else {
            return;
        };
        let flow = matches!(
            node,
            mdast::Node::Root(_) | mdast::Node::Blockquote(_) | mdast::Node::ListItem(_)
        );

        let mut run: Option<TextRun> = None;
        for child in children {
            if let mdast::Node::Text(text) = child {
                let piece = TextRun::new(self.source, node_span(child, base), &text.value);
                match run.as_mut() {
                    Some(current) if current.end() == piece.start() => current.extend(piece),
                    _ => {
                        if let Some(done) = run.replace(piece) {
                            self.text(done);
                        }
                    }
                }
                continue;
            }
            if let Some(done) = run.take() {
                self.text(done);
            }
            match child {
                mdast::Node::Html(html) if flow => {
                    self.html(node_span(child, base), &html.value, true);
                }
                _ => self.node(child, base),
            }
        }
        if let Some(done) = run {
            self.text(done);
        }
    }

    fn heading(&mut self, node: &mdast::Node, span: Span, base: usize) {
        let source = self.source;
        let text = source.get(span.range()).unwrap_or_default();
        let indent = text.len() - text.trim_start().len();
        let hashes = text[indent..].bytes().take_while(|&b| b == b'#').count();

        if hashes > 0 {
            let start = span.start as usize + indent;
            self.enter("atxHeading", span);
            self.leaf("atxHeadingSequence", start..start + hashes);
            self.children(node, base);
            self.exit("atxHeading", span);
        } else {
            let body = text.trim_end();
            let underline = body.rfind('\n').map_or(0, |newline| newline + 1);
            let start = span.start as usize;
            self.enter("setextHeading", span);
            self.children(node, base);
            self.leaf("setextHeadingLineSequence", start + underline..start + body.len());
            self.exit("setextHeading", span);
        }
    }

    fn inline_code(&mut self, span: Span, value: &str) {
        let source = self.source;
        let range = span.range();
        let text = source.get(range.clone()).unwrap_or_default();
        let ticks = text.bytes().take_while(|&b| b == b'`').count();
        let inner_start = range.start + ticks;
        let mut inner = inner_start..range.end.saturating_sub(ticks).max(inner_start);

        let content = source.get(inner.clone()).unwrap_or_default();
        if content.len() >= 2
            && content.starts_with(' ')
            && content.ends_with(' ')
            && !content.trim().is_empty()
        {
            inner = inner.start + 1..inner.end - 1;
        }

        self.enter("codeText", span);
        if !value.is_empty() {
            let token = self.resolved("codeTextData", Span::from(inner), value);
            self.leaf_token(token);
        }
        self.exit("codeText", span);
    }

    /// Fenced or indented code. The value is everything between the fence
    /// lines, or the whole block when indented.
    fn code(&mut self, code: &mdast::Code, span: Span) {
        let source = self.source;
        let start = span.start as usize;
        let text = source.get(span.range()).unwrap_or_default();
        let indent = text.bytes().take_while(|&b| b == b' ').count();
        let fence = text[indent..]
            .chars()
            .next()
            .filter(|&c| indent < 4 && (c == '`' || c == '~'));
        let token_type = if fence.is_some() {
            "codeFenced"
        } else {
            "codeIndented"
        };

        let mut body = 0..text.len();
        self.enter(token_type, span);
        if let Some(marker) = fence {
            let first_line = text.find('\n').unwrap_or(text.len());
            if let Some(lang) = &code.lang {
                self.resolved_leaf("codeFencedFenceInfo", start..start + first_line, lang);
            }
            if let Some(meta) = &code.meta {
                self.resolved_leaf("codeFencedFenceMeta", start..start + first_line, meta);
            }

            let body_start = (first_line + 1).min(text.len());
            let trimmed = text.trim_end();
            let last_line = trimmed.rfind('\n').map_or(0, |newline| newline + 1);
            let closed = last_line >= body_start
                && trimmed[last_line..].trim_start().starts_with(marker);
            let body_end = if closed {
                last_line.saturating_sub(1).max(body_start)
            } else {
                text.len()
            };
            body = body_start..body_end;
        }
        if !code.value.is_empty() {
            let content = Span::from(start + body.start..start + body.end);
            let token = self.resolved("codeFlowValue", content, &code.value);
            self.leaf_token(token);
        }
        self.exit(token_type, span);
    }

    fn html(&mut self, span: Span, value: &str, flow: bool) {
        let token_type = if flow { "htmlFlow" } else { "htmlText" };
        let token = self.resolved(token_type, span, value);
        self.leaf_token(token);
    }

    fn link(
        &mut self,
        node: &mdast::Node,
        span: Span,
        base: usize,
        url: &str,
        title: Option<&str>,
    ) {
        self.enter("link", span);
        self.children(node, base);
        self.resource(span, url, title);
        self.exit("link", span);
    }

    fn image(&mut self, span: Span, alt: &str, url: &str, title: Option<&str>) {
        let start = span.start as usize;
        let end = span.end as usize;
        self.enter("image", span);
        self.resolved_leaf("labelText", (start + 2).min(end)..self.resource_start(span), alt);
        self.resource(span, url, title);
        self.exit("image", span);
    }

    /// Destination and title leaves of a link or image.
    fn resource(&mut self, span: Span, url: &str, title: Option<&str>) {
        let within = self.resource_start(span)..span.end as usize;
        self.resolved_leaf("resourceDestinationString", within.clone(), url);
        if let Some(title) = title {
            self.resolved_leaf("resourceTitleString", within, title);
        }
    }

    /// Offset just past the `](` of an inline resource, or the end of
    /// `span` when the link has none.
    fn resource_start(&self, span: Span) -> usize {
        self.source
            .get(span.range())
            .and_then(|text| text.rfind("]("))
            .map_or(span.end as usize, |index| span.start as usize + index + 2)
    }

    /// Emits a text run, splitting out inline delimited constructs.
    fn text(&mut self, run: TextRun) {
        let mut scanner = InlineScanner::new(self.inlines);
        let mut cursor = 0;
        let mut from = 0;

        while let Some(found) = scanner.next(&run.value, from) {
            let close = found.value.end..found.end;
            if !self.is_literal(&run, found.start..found.value.start)
                || !self.is_literal(&run, close)
            {
                // An escaped or referenced marker is text.
                let skip = run.value[found.start..].chars().next().map_or(1, char::len_utf8);
                from = found.start + skip;
                continue;
            }
            if found.start > cursor {
                self.data(&run, cursor..found.start);
            }
            let outer = run.span(found.start..found.end);
            let inner = run.span(found.value.clone());
            let value_type = found.syntax.value_type();
            self.enter(found.syntax.token_type.clone(), outer);
            self.enter(value_type.clone(), inner);
            self.data(&run, found.value.clone());
            self.exit(value_type, inner);
            self.exit(found.syntax.token_type.clone(), outer);
            cursor = found.end;
            from = cursor;
        }

        if cursor < run.value.len() {
            self.data(&run, cursor..run.value.len());
        }
    }

    /// Whether `range` of the run is written as-is in the source.
    fn is_literal(&self, run: &TextRun, range: Range<usize>) -> bool {
        let value = &run.value[range.clone()];
        self.source.get(run.span(range).range()) == Some(value)
    }

    fn data(&mut self, run: &TextRun, range: Range<usize>) {
        let token = self.resolved(DATA, run.span(range.clone()), &run.value[range]);
        self.leaf_token(token);
    }

    /// A token over `span`, carrying `value` when the source differs.
    fn resolved(&self, token_type: &'static str, span: Span, value: &str) -> Token {
        let token = Token::new(token_type, span);
        if self.source.get(span.range()) == Some(value) {
            token
        } else {
            token.with_value(value)
        }
    }

    /// Emits a leaf for `value`, spanning its first occurrence in `within`.
    fn resolved_leaf(&mut self, token_type: &'static str, within: Range<usize>, value: &str) {
        let source = self.source;
        let haystack = source.get(within.clone()).unwrap_or_default();
        let span = match haystack.find(value) {
            Some(offset) if !value.is_empty() => {
                let start = within.start + offset;
                Span::from(start..start + value.len())
            }
            _ => Span::empty(within.end as u32),
        };
        let token = self.resolved(token_type, span, value);
        self.leaf_token(token);
    }

    fn leaf(&mut self, token_type: &'static str, range: Range<usize>) {
        self.leaf_token(Token::new(token_type, Span::from(range)));
    }

    fn leaf_token(&mut self, token: Token) {
        self.events.push(Event::enter(token.clone()));
        self.events.push(Event::exit(token));
    }

    fn enter(&mut self, token_type: impl Into<std::borrow::Cow<'static, str>>, span: Span) {
        self.events.push(Event::enter(Token::new(token_type, span)));
    }

    fn exit(&mut self, token_type: impl Into<std::borrow::Cow<'static, str>>, span: Span) {
        self.events.push(Event::exit(Token::new(token_type, span)));
    }
}

fn node_span(node: &mdast::Node, base: usize) -> Span {
    node.position().map_or(Span::empty(base as u32), |position| {
        Span::from(base + position.start.offset..base + position.end.offset)
    })
}

fn collect_definitions(node: &mdast::Node, definitions: &mut HashMap<String, Resource>) {
    if let mdast::Node::Definition(definition) = node {
        definitions
            .entry(definition.identifier.clone())
            .or_insert_with(|| Resource {
                url: definition.url.clone(),
                title: definition.title.clone(),
            });
    }
    for child in node.children().into_iter().flatten() {
        collect_definitions(child, definitions);
    }
}

/// A code fence opened by a run of backticks or tildes.
#[derive(Debug, Clone, Copy)]
struct Fence {
    marker: u8,
    len: usize,
}

impl Fence {
    fn opened_by(line: &str) -> Option<Self> {
        let marker = *line.as_bytes().first()?;
        if marker != b'`' && marker != b'~' {
            return None;
        }
        let len = line.bytes().take_while(|&b| b == marker).count();
        // Backtick info strings may not contain backticks.
        let info_ok = marker == b'~' || !line[len..].contains('`');
        (len >= 3 && info_ok).then_some(Self { marker, len })
    }

    fn closed_by(self, line: &str) -> bool {
        let len = line.bytes().take_while(|&b| b == self.marker).count();
        len >= self.len && line[len..].trim().is_empty()
    }
}

/// Text of adjacent mdast text nodes, with the source offset of every byte.
struct TextRun {
    value: String,
    /// `offsets[i]` is where `value[i..]` starts in the source. One extra
    /// entry holds the end of the run.
    offsets: Vec<usize>,
}

impl TextRun {
    fn new(source: &str, span: Span, value: &str) -> Self {
        let raw = source.get(span.range()).unwrap_or_default();
        let base = span.start as usize;
        let mut offsets = Vec::with_capacity(value.len() + 1);
        let mut i = 0;

        for (j, ch) in value.char_indices() {
            let (skipped, len) = locate(&raw[i..], &value[j..], ch);
            offsets.extend(std::iter::repeat_n(base + i + skipped, ch.len_utf8()));
            i += skipped + len;
        }
        offsets.push(base + raw.len());

        Self {
            value: value.to_string(),
            offsets,
        }
    }

    fn start(&self) -> usize {
        self.offsets[0]
    }

    fn end(&self) -> usize {
        self.offsets[self.value.len()]
    }

    fn extend(&mut self, other: TextRun) {
        self.value.push_str(&other.value);
        self.offsets.pop();
        self.offsets.extend(other.offsets);
    }

    fn span(&self, range: Range<usize>) -> Span {
        Span::from(self.offsets[range.start]..self.offsets[range.end])
    }
}

/// Finds `ch`, the first character of `value`, at the start of `raw`.
///
/// Returns the bytes skipped before it and the length of its source form:
/// the character itself, a backslash escape, or a character reference.
/// Container prefixes and stripped whitespace are skipped. A character
/// with no source form gets an empty one.
fn locate(raw: &str, value: &str, ch: char) -> (usize, usize) {
    let mut skipped = 0;
    loop {
        let rest = &raw[skipped..];
        if let Some(len) = reference_len(rest).filter(|&len| !value.starts_with(&rest[..len])) {
            return (skipped, len);
        }

        let mut chars = rest.chars();
        let (first, second) = (chars.next(), chars.next());
        match first {
            Some('\\') if second == Some(ch) && ch.is_ascii_punctuation() => {
                return (skipped, 1 + ch.len_utf8());
            }
            Some(c) if c == ch => return (skipped, c.len_utf8()),
            Some(c @ (' ' | '\t' | '>' | '\r')) => skipped += c.len_utf8(),
            _ => return (0, 0),
        }
    }
}

/// Length of a character reference (`&amp;`, `&#42;`, `&#x2A;`) at the
/// start of `text`.
fn reference_len(text: &str) -> Option<usize> {
    let body = text.strip_prefix('&')?;
    let end = body.find(';')?;
    let name = &body[..end];
    let valid = (1..=32).contains(&end)
        && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'#');
    valid.then_some(end + 2)
}

struct InlineMatch<'s> {
    syntax: &'s DelimitedSyntax,
    start: usize,
    value: Range<usize>,
    end: usize,
}

enum Candidate<'s> {
    Pending,
    Found(InlineMatch<'s>),
    Exhausted,
}

/// Per-syntax scan state for one text run.
struct Lane<'s> {
    syntax: &'s DelimitedSyntax,
    candidate: Candidate<'s>,
    /// First closing marker found so far. No closing marker sits between
    /// the opening marker it was searched from and this offset.
    close_at: Option<usize>,
}

/// Finds inline constructs in a text run, left to right.
///
/// Each syntax keeps its next match until the cursor passes it, and
/// remembers its next closing marker, so a run is scanned in linear time.
struct InlineScanner<'s> {
    lanes: Vec<Lane<'s>>,
}

impl<'s> InlineScanner<'s> {
    fn new(syntaxes: &'s [DelimitedSyntax]) -> Self {
        Self {
            lanes: syntaxes
                .iter()
                .map(|syntax| Lane {
                    syntax,
                    candidate: if syntax.open.is_empty() {
                        Candidate::Exhausted
                    } else {
                        Candidate::Pending
                    },
                    close_at: None,
                })
                .collect(),
        }
    }

    /// Returns the earliest construct starting at or after `cursor`.
    ///
    /// On a tie the longest opening marker wins, so `[[!` beats `[[`.
    fn next(&mut self, text: &str, cursor: usize) -> Option<InlineMatch<'s>> {
        for lane in &mut self.lanes {
            let stale = match &lane.candidate {
                Candidate::Pending => true,
                Candidate::Found(found) => found.start < cursor,
                Candidate::Exhausted => false,
            };
            if stale {
                lane.candidate = lane.scan(text, cursor);
            }
        }

        let index = self
            .lanes
            .iter()
            .enumerate()
            .filter_map(|(index, lane)| match &lane.candidate {
                Candidate::Found(found) => Some((index, found)),
                _ => None,
            })
            .min_by_key(|(_, found)| (found.start, std::cmp::Reverse(found.syntax.open.len())))
            .map(|(index, _)| index)?;

        match std::mem::replace(&mut self.lanes[index].candidate, Candidate::Pending) {
            Candidate::Found(found) => Some(found),
            _ => None,
        }
    }
}

impl<'s> Lane<'s> {
    fn scan(&mut self, text: &str, from: usize) -> Candidate<'s> {
        let syntax = self.syntax;
        let Some(haystack) = text.get(from..) else {
            return Candidate::Exhausted;
        };

        for (index, _) in haystack.match_indices(syntax.open.as_str()) {
            let start = from + index;
            let value_start = start + syntax.open.len();
            let value_end = match &syntax.close {
                Some(close) => {
                    let close_at = match self.close_at {
                        Some(at) if at >= value_start => at,
                        _ => match text[value_start..].find(close.as_str()) {
                            Some(offset) => value_start + offset,
                            // No later opening marker can be closed either.
                            None => return Candidate::Exhausted,
                        },
                    };
                    self.close_at = Some(close_at);
                    close_at
                }
                None => {
                    if text[..start].chars().next_back().is_some_and(is_word) {
                        continue;
                    }
                    let rest = &text[value_start..];
                    value_start + rest.find(|c: char| !is_word(c)).unwrap_or(rest.len())
                }
            };
            if value_end > value_start {
                let close_len = syntax.close.as_ref().map_or(0, String::len);
                return Candidate::Found(InlineMatch {
                    syntax,
                    start,
                    value: value_start..value_end,
                    end: value_end + close_len,
                });
            }
        }
        Candidate::Exhausted
    }
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}
