//! Markup parser for doc comments and include files.
//!
//! Block structure (headings, lists, fenced code, paragraphs) is recognised
//! line by line; inline markup inside a block is parsed with winnow. The
//! parser never fails: anything it cannot make sense of becomes text, and an
//! unterminated fence runs to the end of the input.
//!
//! All spans are byte offsets into the text handed to the public entry
//! points, so diagnostics can point back into the raw comment.

use log::trace;
use winnow::{
    Parser as _,
    combinator::{alt, delimited, opt, preceded, repeat},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location},
    token::{any, one_of, take_till, take_until},
};

use tome_core::{
    content::{Content, ContentNode, Link},
    model::{Documentation, Tag, TagSection},
};

use crate::Span;

type Input<'a> = LocatingSlice<&'a str>;

/// Parse free-form markup into a content tree.
///
/// # Example
///
/// ```
/// # use tome_parser::parse_markup;
/// # use tome_core::content::ContentNode;
///
/// let content = parse_markup("# Usage\n\nSee [D] for details.");
/// assert_eq!(content.blocks().len(), 2);
/// assert!(matches!(content.blocks()[0], ContentNode::Heading { level: 1, .. }));
/// ```
pub fn parse_markup(text: &str) -> Content {
    parse_region(text, 0, text.len())
}

/// Parse `text[start..end]`, keeping spans relative to `text`.
pub(crate) fn parse_region(text: &str, start: usize, end: usize) -> Content {
    Content::new(parse_blocks(&text[start..end], start))
}

/// Parse a doc comment into a description and block tag sections.
///
/// The comment delimiters must already be stripped. Lines starting with a
/// known `@tag` open a new section; unknown tags stay part of the text.
/// `@suppress` marks the documentation as suppressed.
pub fn parse_doc_comment(text: &str) -> Documentation {
    let lines = split_lines(text);
    let mut boundaries = Vec::new();
    let mut fence: Option<&str> = None;
    for line in &lines {
        let trimmed = line.text.trim_start();
        if let Some(open) = fence {
            if trimmed.starts_with(open) {
                fence = None;
            }
            continue;
        }
        if let Some(marker) = fence_marker(trimmed) {
            fence = Some(marker);
            continue;
        }
        if let Some(tag) = block_tag(trimmed) {
            let at = line.start + (line.text.len() - trimmed.len());
            boundaries.push((at, tag));
        }
    }

    let description_end = boundaries.first().map_or(text.len(), |(at, _)| *at);
    let description = parse_region(text, 0, description_end);

    let mut sections = Vec::new();
    let mut suppressed = false;
    for (i, (at, name)) in boundaries.iter().enumerate() {
        let section_end = boundaries.get(i + 1).map_or(text.len(), |(next, _)| *next);
        // Skip `@name`.
        let mut cursor = at + 1 + name.len();
        let tag = match *name {
            "suppress" => {
                suppressed = true;
                continue;
            }
            "param" | "property" => {
                let (subject, _, next) = subject_word(text, cursor, section_end);
                cursor = next;
                let subject = clean_reference(subject).to_string();
                if *name == "param" {
                    Tag::Param(subject)
                } else {
                    Tag::Property(subject)
                }
            }
            "throws" | "exception" | "see" | "sample" => {
                let (subject, span, next) = subject_word(text, cursor, section_end);
                cursor = next;
                let link = Link::new(clean_reference(subject), Vec::new(), span);
                match *name {
                    "see" => Tag::See(link),
                    "sample" => Tag::Sample(link),
                    _ => Tag::Throws(link),
                }
            }
            "return" => Tag::Return,
            "receiver" => Tag::Receiver,
            "constructor" => Tag::Constructor,
            "since" => Tag::Since,
            _ => Tag::Author,
        };
        sections.push(TagSection::new(
            tag,
            parse_region(text, cursor.min(section_end), section_end),
        ));
    }

    trace!(
        tags = sections.len(),
        suppressed = suppressed;
        "Parsed doc comment"
    );

    Documentation::new(description, sections)
        .with_raw(text)
        .with_suppressed(suppressed)
}

const BLOCK_TAGS: [&str; 12] = [
    "param",
    "property",
    "return",
    "receiver",
    "constructor",
    "throws",
    "exception",
    "see",
    "sample",
    "since",
    "author",
    "suppress",
];

/// The known tag name a trimmed line opens, if any.
fn block_tag(trimmed: &str) -> Option<&'static str> {
    let rest = trimmed.strip_prefix('@')?;
    let word_end = rest
        .find(|c: char| c.is_whitespace())
        .unwrap_or(rest.len());
    let word = &rest[..word_end];
    BLOCK_TAGS.iter().copied().find(|tag| *tag == word)
}

/// The first whitespace-delimited word in `text[from..end]`.
///
/// Returns the word, its span, and the offset just past it.
fn subject_word(text: &str, from: usize, end: usize) -> (&str, Span, usize) {
    let region = &text[from..end];
    let leading = region.len() - region.trim_start().len();
    let start = from + leading;
    let length = text[start..end]
        .find(|c: char| c.is_whitespace())
        .unwrap_or(end - start);
    let word_end = start + length;
    (&text[start..word_end], Span::new(start..word_end), word_end)
}

/// Strip surrounding brackets and backticks from a reference.
fn clean_reference(reference: &str) -> &str {
    let reference = reference.trim();
    let reference = reference
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
        .unwrap_or(reference);
    reference
        .strip_prefix('`')
        .and_then(|r| r.strip_suffix('`'))
        .unwrap_or(reference)
        .trim()
}

// =========================================================================
// Blocks
// =========================================================================

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    text: &'a str,
    /// Absolute byte offset of the first character.
    start: usize,
}

impl Line<'_> {
    fn end(&self) -> usize {
        self.start + self.text.len()
    }

    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    fn indent(&self) -> usize {
        self.text.len() - self.text.trim_start().len()
    }
}

fn split_lines(text: &str) -> Vec<Line<'_>> {
    split_lines_at(text, 0)
}

fn split_lines_at(text: &str, base: usize) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for raw in text.split_inclusive('\n') {
        let content = raw.trim_end_matches(['\n', '\r']);
        lines.push(Line {
            text: content,
            start: base + offset,
        });
        offset += raw.len();
    }
    lines
}

fn fence_marker(trimmed: &str) -> Option<&'static str> {
    if trimmed.starts_with("```") {
        Some("```")
    } else if trimmed.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}

/// Heading level and the offset of its text within the trimmed line.
fn heading(trimmed: &str) -> Option<(u8, usize)> {
    let level = trimmed.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }
    let text_at = level + (rest.len() - rest.trim_start().len());
    u8::try_from(level).ok().map(|level| (level, text_at))
}

/// List marker kind and the offset of the item text within the trimmed line.
fn list_item(trimmed: &str) -> Option<(bool, usize)> {
    for marker in ["- ", "* ", "+ "] {
        if trimmed.starts_with(marker) {
            return Some((false, marker.len()));
        }
    }
    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 && digits <= 9 {
        let rest = &trimmed[digits..];
        if rest.starts_with(". ") || rest.starts_with(") ") {
            return Some((true, digits + 2));
        }
    }
    None
}

fn starts_block(line: &Line<'_>) -> bool {
    let trimmed = line.text.trim_start();
    fence_marker(trimmed).is_some() || heading(trimmed).is_some() || list_item(trimmed).is_some()
}

fn parse_blocks(source: &str, base: usize) -> Vec<ContentNode> {
    let lines = split_lines_at(source, base);
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.text.trim_start();

        if line.is_blank() {
            i += 1;
            continue;
        }

        if let Some(marker) = fence_marker(trimmed) {
            let language = trimmed[marker.len()..].trim();
            let indent = line.indent();
            let mut code_lines = Vec::new();
            i += 1;
            while i < lines.len() && !lines[i].text.trim_start().starts_with(marker) {
                code_lines.push(strip_indent(lines[i].text, indent));
                i += 1;
            }
            // Step over the closing fence; an unterminated fence ends the input.
            i += 1;
            blocks.push(ContentNode::CodeBlock {
                language: (!language.is_empty()).then(|| language.to_string()),
                code: code_lines.join("\n"),
            });
            continue;
        }

        if let Some((level, text_at)) = heading(trimmed) {
            let start = line.start + line.indent() + text_at;
            let text = line.text[line.indent() + text_at..].trim_end();
            let text = text.trim_end_matches('#').trim_end();
            blocks.push(ContentNode::Heading {
                level,
                children: parse_inlines(text, start),
            });
            i += 1;
            continue;
        }

        if let Some((ordered, _)) = list_item(trimmed) {
            let mut items = Vec::new();
            while i < lines.len() {
                let item_line = lines[i];
                let item_trimmed = item_line.text.trim_start();
                let Some((item_ordered, text_at)) = list_item(item_trimmed) else {
                    break;
                };
                if item_ordered != ordered {
                    break;
                }
                let start = item_line.start + item_line.indent() + text_at;
                let mut end = item_line.end();
                i += 1;
                while i < lines.len() && !lines[i].is_blank() && !starts_block(&lines[i]) {
                    end = lines[i].end();
                    i += 1;
                }
                let text = &source[start - base..end - base];
                items.push(parse_inlines(text, start));
            }
            blocks.push(ContentNode::List { ordered, items });
            continue;
        }

        let start = line.start + line.indent();
        let mut end = line.end();
        i += 1;
        while i < lines.len() && !lines[i].is_blank() && !starts_block(&lines[i]) {
            end = lines[i].end();
            i += 1;
        }
        let text = &source[start - base..end - base];
        blocks.push(ContentNode::Paragraph(parse_inlines(text, start)));
    }

    blocks
}

fn strip_indent(line: &str, indent: usize) -> &str {
    let removable = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[removable.min(indent)..]
}

// =========================================================================
// Inlines
// =========================================================================

/// Parse inline markup of `text`, whose first byte sits at `base`.
fn parse_inlines(text: &str, base: usize) -> Vec<ContentNode> {
    let mut input = LocatingSlice::new(text);
    let nodes: Vec<ContentNode> = repeat(0.., |i: &mut Input<'_>| inline_node(i, base))
        .parse_next(&mut input)
        .unwrap_or_default();
    merge_text(nodes)
}

fn inline_node(input: &mut Input<'_>, base: usize) -> ModalResult<ContentNode> {
    alt((
        escape,
        code_span,
        |i: &mut Input<'_>| strong(i, base),
        |i: &mut Input<'_>| emphasis(i, base),
        |i: &mut Input<'_>| bracketed(i, base),
        plain_text,
        alt(("\r\n", "\n")).value(ContentNode::Text(" ".to_string())),
        any.map(|c: char| ContentNode::Text(c.to_string())),
    ))
    .parse_next(input)
}

fn escape(input: &mut Input<'_>) -> ModalResult<ContentNode> {
    preceded('\\', one_of(|c: char| c.is_ascii_punctuation()))
        .map(|c: char| ContentNode::Text(c.to_string()))
        .parse_next(input)
}

fn code_span(input: &mut Input<'_>) -> ModalResult<ContentNode> {
    delimited('`', take_till(0.., ['`', '\n']), '`')
        .map(|code: &str| ContentNode::Code(code.to_string()))
        .parse_next(input)
}

fn strong(input: &mut Input<'_>, base: usize) -> ModalResult<ContentNode> {
    let start = input.current_token_start();
    let inner = delimited("**", take_until(1.., "**"), "**").parse_next(input)?;
    Ok(ContentNode::Strong(parse_inlines(inner, base + start + 2)))
}

fn emphasis(input: &mut Input<'_>, base: usize) -> ModalResult<ContentNode> {
    let start = input.current_token_start();
    let inner = delimited(
        '*',
        take_till(1.., ['*', '\n']).verify(|inner: &str| !inner.starts_with(char::is_whitespace)),
        '*',
    )
    .parse_next(input)?;
    Ok(ContentNode::Emphasis(parse_inlines(inner, base + start + 1)))
}

/// `[text](url)`, `[text][reference]` or `[reference]`.
fn bracketed(input: &mut Input<'_>, base: usize) -> ModalResult<ContentNode> {
    let start = input.current_token_start();
    let text = delimited('[', take_till(1.., ['[', ']', '\n']), ']').parse_next(input)?;
    let text_base = base + start + 1;

    if let Some(url) = opt(delimited('(', take_till(1.., [')', '\n']), ')')).parse_next(input)? {
        return Ok(ContentNode::Hyperlink {
            url: url.trim().to_string(),
            children: parse_inlines(text, text_base),
        });
    }

    if let Some(reference) =
        opt(delimited('[', take_till(1.., ['[', ']', '\n']), ']')).parse_next(input)?
    {
        let end = input.current_token_start();
        return Ok(ContentNode::Link(Link::new(
            clean_reference(reference),
            parse_inlines(text, text_base),
            Span::new(base + start..base + end),
        )));
    }

    if !is_reference(text) {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    let end = input.current_token_start();
    Ok(ContentNode::Link(Link::new(
        clean_reference(text),
        Vec::new(),
        Span::new(base + start..base + end),
    )))
}

/// Whether bracketed text reads as a symbol name rather than prose.
fn is_reference(text: &str) -> bool {
    let reference = clean_reference(text);
    let mut chars = reference.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || "._()<>,? ".contains(c))
}

fn plain_text(input: &mut Input<'_>) -> ModalResult<ContentNode> {
    take_till(1.., ['\\', '`', '*', '[', '\r', '\n'])
        .map(|text: &str| ContentNode::Text(text.to_string()))
        .parse_next(input)
}

fn merge_text(nodes: Vec<ContentNode>) -> Vec<ContentNode> {
    let mut merged: Vec<ContentNode> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if let (ContentNode::Text(text), Some(ContentNode::Text(previous))) =
            (&node, merged.last_mut())
        {
            previous.push_str(text);
            continue;
        }
        merged.push(node);
    }
    if let Some(ContentNode::Text(last)) = merged.last_mut() {
        let trimmed = last.trim_end().len();
        last.truncate(trimmed);
        if last.is_empty() {
            merged.pop();
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use tome_core::content::LinkTarget;

    fn text(s: &str) -> ContentNode {
        ContentNode::Text(s.to_string())
    }

    fn paragraph(content: &Content) -> &[ContentNode] {
        match &content.blocks()[0] {
            ContentNode::Paragraph(children) => children,
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn test_paragraphs_split_on_blank_lines() {
        let content = parse_markup("first line\nsecond line\n\nnext");
        assert_eq!(content.blocks().len(), 2);
        assert_eq!(paragraph(&content), &[text("first line second line")]);
    }

    #[test]
    fn test_symbol_link_is_pending_with_span() {
        let source = "See [D] now";
        let content = parse_markup(source);
        let children = paragraph(&content);
        let ContentNode::Link(link) = &children[1] else {
            panic!("expected link, got {:?}", children[1]);
        };
        assert_eq!(link.reference(), "D");
        assert!(link.children().is_empty());
        assert_eq!(link.target(), &LinkTarget::Pending);
        assert_eq!(&source[link.span().start()..link.span().end()], "[D]");
    }

    #[test]
    fn test_labelled_link_and_hyperlink() {
        let content = parse_markup("[the docs][p.D] and [site](https://example.org)");
        let children = paragraph(&content);

        let ContentNode::Link(link) = &children[0] else {
            panic!("expected link");
        };
        assert_eq!(link.reference(), "p.D");
        assert_eq!(link.children(), &[text("the docs")]);

        assert_eq!(
            children[2],
            ContentNode::Hyperlink {
                url: "https://example.org".to_string(),
                children: vec![text("site")],
            }
        );
    }

    #[test]
    fn test_signature_reference() {
        let content = parse_markup("Use [foo(Int, String)].");
        let children = paragraph(&content);
        let ContentNode::Link(link) = &children[1] else {
            panic!("expected link");
        };
        assert_eq!(link.reference(), "foo(Int, String)");
    }

    #[test]
    fn test_prose_brackets_stay_text() {
        let content = parse_markup("a [1, 2] pair");
        assert_eq!(paragraph(&content), &[text("a [1, 2] pair")]);
    }

    #[test]
    fn test_inline_styles() {
        let content = parse_markup("**bold** and *soft* and `code`");
        assert_eq!(
            paragraph(&content),
            &[
                ContentNode::Strong(vec![text("bold")]),
                text(" and "),
                ContentNode::Emphasis(vec![text("soft")]),
                text(" and "),
                ContentNode::Code("code".to_string()),
            ]
        );
    }

    #[test]
    fn test_unterminated_inline_degrades_to_text() {
        let content = parse_markup("**open and `tick and [bracket");
        assert_eq!(
            paragraph(&content),
            &[text("**open and `tick and [bracket")]
        );
    }

    #[test]
    fn test_escapes() {
        let content = parse_markup(r"\[not a link\] \*x\*");
        assert_eq!(paragraph(&content), &[text("[not a link] *x*")]);
    }

    #[test]
    fn test_headings_and_lists() {
        let content = parse_markup("## Usage\n- one\n- two [D]\n1. first\n2. second");
        let blocks = content.blocks();
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks[0],
            ContentNode::Heading {
                level: 2,
                children: vec![text("Usage")],
            }
        );
        let ContentNode::List { ordered, items } = &blocks[1] else {
            panic!("expected list");
        };
        assert!(!ordered);
        assert_eq!(items.len(), 2);
        assert!(matches!(blocks[2], ContentNode::List { ordered: true, .. }));
    }

    #[test]
    fn test_fenced_code_block() {
        let content = parse_markup("```kotlin\nval x = [D]\n```\nafter");
        assert_eq!(
            content.blocks()[0],
            ContentNode::CodeBlock {
                language: Some("kotlin".to_string()),
                code: "val x = [D]".to_string(),
            }
        );
        assert_eq!(content.blocks().len(), 2);
    }

    #[test]
    fn test_unterminated_fence_runs_to_end() {
        let content = parse_markup("text\n\n```\ncode\nmore code");
        assert_eq!(
            content.blocks()[1],
            ContentNode::CodeBlock {
                language: None,
                code: "code\nmore code".to_string(),
            }
        );
    }

    #[test]
    fn test_doc_comment_tags() {
        let source = "Adds numbers.\n\n@param a the first\n@param b the second\n@return the sum\n@throws IllegalStateException when closed\n@see [Calculator]";
        let doc = parse_doc_comment(source);

        assert_eq!(
            doc.description().blocks(),
            &[ContentNode::Paragraph(vec![text("Adds numbers.")])]
        );
        let tags: Vec<_> = doc.tags().iter().map(|section| section.tag().clone()).collect();
        assert_eq!(tags.len(), 5);
        assert_eq!(tags[0], Tag::Param("a".to_string()));
        assert_eq!(tags[1], Tag::Param("b".to_string()));
        assert_eq!(tags[2], Tag::Return);

        let throws = tags[3].subject_link().unwrap();
        assert_eq!(throws.reference(), "IllegalStateException");
        assert_eq!(
            &source[throws.span().start()..throws.span().end()],
            "IllegalStateException"
        );
        assert_eq!(tags[4].subject_link().unwrap().reference(), "Calculator");

        assert_eq!(
            doc.tags()[2].content().blocks(),
            &[ContentNode::Paragraph(vec![text("the sum")])]
        );
        assert_eq!(doc.raw(), Some(source));
    }

    #[test]
    fn test_tag_body_links_have_absolute_spans() {
        let source = "Summary.\n@return a [Result]";
        let doc = parse_doc_comment(source);
        let mut spans = Vec::new();
        doc.for_each_link(&mut |link| spans.push(link.span()));
        assert_eq!(spans.len(), 1);
        assert_eq!(&source[spans[0].start()..spans[0].end()], "[Result]");
    }

    #[test]
    fn test_unknown_tag_stays_text_and_fenced_tags_ignored() {
        let doc = parse_doc_comment("Text\n@custom thing\n```\n@param x\n```");
        assert!(doc.tags().is_empty());
        assert_eq!(doc.description().blocks().len(), 2);
    }

    #[test]
    fn test_suppress_tag() {
        let doc = parse_doc_comment("Internal helper.\n@suppress");
        assert!(doc.is_suppressed());
        assert!(doc.tags().is_empty());
    }

    #[test]
    fn test_empty_comment() {
        let doc = parse_doc_comment("");
        assert!(doc.is_empty());
        assert!(!doc.is_suppressed());
    }

    mod properties {
        use proptest::prelude::*;

        use super::super::*;

        proptest! {
            #[test]
            fn parse_markup_never_panics(text in "\\PC*") {
                let _ = parse_markup(&text);
            }

            #[test]
            fn parse_doc_comment_never_panics(text in "[a-z@\\[\\]`*#\\-\\n ()]{0,64}") {
                let doc = parse_doc_comment(&text);
                doc.for_each_link(&mut |link| {
                    assert!(link.span().end() <= text.len());
                });
            }
        }
    }
}
