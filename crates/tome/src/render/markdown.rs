//! Plain Markdown pages.

use std::fmt::Write;

use tome_core::{
    content::{Content, ContentNode},
    model::{EntityIndex, EntityKind, Tag},
};

use super::{
    Error, RenderContext, Renderer,
    signature::{Token, signature},
};

/// The Markdown dialect. Declines to produce an outline.
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn extension(&self) -> &'static str {
        "md"
    }

    fn render_page(&self, ctx: &RenderContext<'_>, entity: EntityIndex) -> Result<String, Error> {
        let mut out = String::new();
        write_page(&mut out, ctx, entity)?;
        Ok(out)
    }
}

/// A full Markdown page; shared with the Jekyll dialect.
pub(super) fn write_page(
    out: &mut String,
    ctx: &RenderContext<'_>,
    entity: EntityIndex,
) -> Result<(), Error> {
    let crumbs: Vec<String> = ctx
        .breadcrumbs(entity)
        .into_iter()
        .map(|crumb| {
            format!(
                "[{}]({})",
                escape(ctx.title(crumb)),
                ctx.locations().relative(entity, crumb)
            )
        })
        .collect();
    writeln!(out, "{}", crumbs.join("/"))?;
    writeln!(out)?;
    writeln!(out, "# {}", escape(ctx.title(entity)))?;

    if !matches!(ctx.entity(entity).kind(), EntityKind::Module) {
        writeln!(out)?;
        writeln!(out, "{}", signature_line(ctx, entity, entity))?;
    }

    let documentation = ctx.entity(entity).documentation();
    if !documentation.description().is_empty() {
        writeln!(out)?;
        write_content(out, ctx, entity, documentation.description())?;
    }

    let mut current_title = None;
    for section in documentation.tags() {
        let title = section.tag().title();
        if current_title != Some(title) {
            writeln!(out)?;
            writeln!(out, "#### {title}")?;
            writeln!(out)?;
            current_title = Some(title);
        }
        let subject = match section.tag() {
            Tag::Param(name) | Tag::Property(name) => Some(code_span(name)),
            tag => tag
                .subject_link()
                .map(|link| inline(ctx, entity, &[ContentNode::Link(link.clone())])),
        };
        let body = section
            .content()
            .blocks()
            .iter()
            .map(|block| inline(ctx, entity, std::slice::from_ref(block)))
            .collect::<Vec<_>>()
            .join(" ");
        match (subject, body.is_empty()) {
            (Some(subject), true) => writeln!(out, "- {subject}")?,
            (Some(subject), false) => writeln!(out, "- {subject}: {body}")?,
            (None, _) => writeln!(out, "- {body}")?,
        }
    }

    if let Some(url) = ctx.source_url(entity) {
        writeln!(out)?;
        writeln!(out, "[View source]({url})")?;
    }

    for group in ctx.groups(entity) {
        writeln!(out)?;
        writeln!(out, "## {}", group.title)?;
        for member in group.members {
            writeln!(out)?;
            let location = ctx.locations().location(member);
            match (location.anchor(), ctx.href(entity, member)) {
                (Some(anchor), _) => {
                    writeln!(out, "<a id=\"{anchor}\"></a>")?;
                    writeln!(out)?;
                    writeln!(out, "### {}", escape(ctx.title(member)))?;
                }
                (None, Some(href)) => {
                    writeln!(out, "### [{}]({href})", escape(ctx.title(member)))?
                }
                (None, None) => writeln!(out, "### {}", escape(ctx.title(member)))?,
            }
            writeln!(out)?;
            writeln!(out, "{}", signature_line(ctx, entity, member))?;
            if let Some(summary) = ctx.entity(member).documentation().description().summary() {
                writeln!(out)?;
                writeln!(out, "{}", block(ctx, entity, summary))?;
            }
        }
    }
    Ok(())
}

fn signature_line(ctx: &RenderContext<'_>, page: EntityIndex, entity: EntityIndex) -> String {
    let mut line = String::new();
    for token in signature(ctx.module(), entity) {
        match token {
            Token::Annotation(name) => {
                line.push('@');
                line.push_str(&escape(name));
            }
            Token::Keyword(text) | Token::Text(text) => line.push_str(&escape(text)),
            Token::Name(name) => {
                line.push_str("**");
                line.push_str(&escape(name));
                line.push_str("**");
            }
            Token::Type { name, target } => match ctx.link_href(page, target) {
                Some(href) => {
                    let _ = write!(line, "[{}]({href})", escape(name));
                }
                None => line.push_str(&escape(name)),
            },
        }
    }
    line
}

fn write_content(
    out: &mut String,
    ctx: &RenderContext<'_>,
    page: EntityIndex,
    content: &Content,
) -> Result<(), Error> {
    let blocks: Vec<String> = content
        .blocks()
        .iter()
        .map(|node| block(ctx, page, node))
        .collect();
    writeln!(out, "{}", blocks.join("\n\n"))?;
    Ok(())
}

fn block(ctx: &RenderContext<'_>, page: EntityIndex, node: &ContentNode) -> String {
    match node {
        ContentNode::Paragraph(children) => inline(ctx, page, children),
        ContentNode::Heading { level, children } => format!(
            "{} {}",
            "#".repeat(usize::from((*level).clamp(1, 6))),
            inline(ctx, page, children)
        ),
        ContentNode::CodeBlock { language, code } => {
            let fence = "`".repeat(longest_run(code, '`').max(2) + 1);
            format!(
                "{fence}{}\n{}\n{fence}",
                language.as_deref().unwrap_or_default(),
                code.trim_end_matches('\n')
            )
        }
        ContentNode::List { ordered, items } => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let marker = if *ordered {
                    format!("{}.", i + 1)
                } else {
                    "-".to_string()
                };
                format!("{marker} {}", inline(ctx, page, item))
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => inline(ctx, page, std::slice::from_ref(other)),
    }
}

fn inline(ctx: &RenderContext<'_>, page: EntityIndex, nodes: &[ContentNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            ContentNode::Text(text) => out.push_str(&escape(text)),
            ContentNode::Code(code) => out.push_str(&code_span(code)),
            ContentNode::Emphasis(children) => {
                out.push('*');
                out.push_str(&inline(ctx, page, children));
                out.push('*');
            }
            ContentNode::Strong(children) => {
                out.push_str("**");
                out.push_str(&inline(ctx, page, children));
                out.push_str("**");
            }
            ContentNode::Hyperlink { url, children } => {
                let _ = write!(out, "[{}]({url})", inline(ctx, page, children));
            }
            ContentNode::Link(link) => {
                let text = if link.children().is_empty() {
                    escape(link.reference())
                } else {
                    inline(ctx, page, link.children())
                };
                match ctx.link_href(page, link.target()) {
                    Some(href) => {
                        let _ = write!(out, "[{text}]({href})");
                    }
                    None => out.push_str(&text),
                }
            }
            ContentNode::Paragraph(children) | ContentNode::Heading { children, .. } => {
                out.push_str(&inline(ctx, page, children));
            }
            block_node @ (ContentNode::CodeBlock { .. } | ContentNode::List { .. }) => {
                out.push('\n');
                out.push_str(&block(ctx, page, block_node));
                out.push('\n');
            }
        }
    }
    out
}

/// An inline code span whose fence is longer than any backtick run inside.
fn code_span(code: &str) -> String {
    let fence = "`".repeat(longest_run(code, '`') + 1);
    if code.starts_with('`') || code.ends_with('`') {
        format!("{fence} {code} {fence}")
    } else {
        format!("{fence}{code}{fence}")
    }
}

fn longest_run(text: &str, c: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for ch in text.chars() {
        if ch == c {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Backslash-escape characters Markdown would interpret.
pub(super) fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>' | '|') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::Fixture;

    #[test]
    fn test_see_d_pages() {
        let fixture = Fixture::see_d();
        assert_eq!(
            fixture.page(&MarkdownRenderer, "p.C"),
            "[root](../../index.md)/[p](../index.md)/[C](index.md)\n\
             \n\
             # C\n\
             \n\
             class **C**\n\
             \n\
             See [D](../-d/index.md)\n"
        );
        assert_eq!(
            fixture.page(&MarkdownRenderer, "p.D"),
            "[root](../../index.md)/[p](../index.md)/[D](index.md)\n\
             \n\
             # D\n\
             \n\
             class **D**\n"
        );
    }

    #[test]
    fn test_package_lists_types_with_summaries() {
        let fixture = Fixture::see_d();
        let page = fixture.page(&MarkdownRenderer, "p");
        assert!(page.contains("## Types\n\n### [C](-c/index.md)\n\nclass **C**\n\nSee [D](-d/index.md)\n"));
        assert!(page.contains("### [D](-d/index.md)\n\nclass **D**\n"));
    }

    #[test]
    fn test_type_parameter_anchor_and_source_link() {
        let fixture = Fixture::members();
        let page = fixture.page(&MarkdownRenderer, "p.C");
        assert!(page.contains("class **C**\\<T\\>"));
        assert!(page.contains("[View source](https://example.org/src/C.kt#L3)"));
        assert!(page.contains("<a id=\"-t\"></a>\n\n### T\n"));
        assert!(page.contains("### [run](run.md)\n\nfun **run**()\n\nRuns it.\n"));
    }

    #[test]
    fn test_outline_is_declined() {
        assert!(Fixture::see_d().outline(&MarkdownRenderer).is_none());
    }

    #[test]
    fn test_code_span_fences() {
        assert_eq!(code_span("a"), "`a`");
        assert_eq!(code_span("a`b"), "``a`b``");
        assert_eq!(code_span("`x"), "`` `x ``");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("List<T>"), "List\\<T\\>");
        assert_eq!(escape("a_b*c"), "a\\_b\\*c");
    }
}
