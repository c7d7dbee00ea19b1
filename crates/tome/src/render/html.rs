//! Standalone HTML pages.
//!
//! Every page links the shared stylesheet at the output root and carries a
//! breadcrumb trail. [`write_main`] produces the page body and is reused by
//! the website dialect, which only drops the document wrapper.

use std::fmt::Write;

use tome_core::{
    content::{Content, ContentNode},
    model::{EntityIndex, EntityKind, Tag},
};

use super::{
    Error, OutlinePage, RenderContext, Renderer, Resource,
    signature::{Token, signature},
    stylesheet,
};

/// Name of the outline page at the output root.
pub const OUTLINE_FILE: &str = "outline.html";

/// The HTML dialect.
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn name(&self) -> &'static str {
        "html"
    }

    fn extension(&self) -> &'static str {
        "html"
    }

    fn render_page(&self, ctx: &RenderContext<'_>, entity: EntityIndex) -> Result<String, Error> {
        let mut out = String::new();
        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html lang=\"en\">")?;
        writeln!(out, "<head>")?;
        writeln!(out, "<meta charset=\"utf-8\">")?;
        writeln!(
            out,
            "<title>{} - {}</title>",
            escape(ctx.title(entity)),
            escape(ctx.module().name())
        )?;
        writeln!(
            out,
            "<link rel=\"stylesheet\" href=\"{}\">",
            escape(&ctx.stylesheet_href(entity))
        )?;
        writeln!(out, "</head>")?;
        writeln!(out, "<body>")?;
        write_breadcrumbs(&mut out, ctx, entity)?;
        write_main(&mut out, ctx, entity)?;
        writeln!(out, "</body>")?;
        writeln!(out, "</html>")?;
        Ok(out)
    }

    fn render_outline(&self, ctx: &RenderContext<'_>) -> Option<Result<OutlinePage, Error>> {
        let root = ctx.module().root();
        let render = || -> Result<OutlinePage, Error> {
            let mut out = String::new();
            writeln!(out, "<!DOCTYPE html>")?;
            writeln!(out, "<html lang=\"en\">")?;
            writeln!(out, "<head>")?;
            writeln!(out, "<meta charset=\"utf-8\">")?;
            writeln!(out, "<title>{} - outline</title>", escape(ctx.module().name()))?;
            writeln!(
                out,
                "<link rel=\"stylesheet\" href=\"{}\">",
                escape(&ctx.stylesheet_href(root))
            )?;
            writeln!(out, "</head>")?;
            writeln!(out, "<body>")?;
            writeln!(out, "<nav class=\"outline\">")?;
            writeln!(out, "<ul>")?;
            write_outline_entry(&mut out, ctx, root)?;
            writeln!(out, "</ul>")?;
            writeln!(out, "</nav>")?;
            writeln!(out, "</body>")?;
            writeln!(out, "</html>")?;
            Ok(OutlinePage {
                file: OUTLINE_FILE.to_string(),
                contents: out,
            })
        };
        Some(render())
    }

    fn resources(&self) -> Vec<Resource> {
        vec![stylesheet()]
    }
}

/// Nested list item for `index` and its page-owning descendants.
///
/// Links are relative to the output root, where the outline lives.
fn write_outline_entry(
    out: &mut String,
    ctx: &RenderContext<'_>,
    index: EntityIndex,
) -> Result<(), Error> {
    let root = ctx.module().root();
    write!(
        out,
        "<li><a href=\"{}\">{}</a>",
        escape(&ctx.locations().relative(root, index)),
        escape(ctx.title(index))
    )?;
    let children: Vec<EntityIndex> = ctx
        .entity(index)
        .children()
        .iter()
        .copied()
        .filter(|&child| ctx.entity(child).kind().is_addressable() && ctx.is_published(child))
        .collect();
    if !children.is_empty() {
        writeln!(out)?;
        writeln!(out, "<ul>")?;
        for child in children {
            write_outline_entry(out, ctx, child)?;
        }
        write!(out, "</ul>")?;
    }
    writeln!(out, "</li>")?;
    Ok(())
}

pub(super) fn write_breadcrumbs(
    out: &mut String,
    ctx: &RenderContext<'_>,
    entity: EntityIndex,
) -> Result<(), Error> {
    write!(out, "<nav class=\"breadcrumbs\">")?;
    let crumbs = ctx.breadcrumbs(entity);
    for (i, &crumb) in crumbs.iter().enumerate() {
        if i > 0 {
            write!(out, " / ")?;
        }
        if crumb == entity {
            write!(out, "<span>{}</span>", escape(ctx.title(crumb)))?;
        } else {
            write!(
                out,
                "<a href=\"{}\">{}</a>",
                escape(&ctx.locations().relative(entity, crumb)),
                escape(ctx.title(crumb))
            )?;
        }
    }
    writeln!(out, "</nav>")?;
    Ok(())
}

/// The `<main>` element of a page: title, signature, documentation and
/// member listing.
pub(super) fn write_main(
    out: &mut String,
    ctx: &RenderContext<'_>,
    entity: EntityIndex,
) -> Result<(), Error> {
    let documentation = ctx.entity(entity).documentation();

    writeln!(out, "<main>")?;
    writeln!(out, "<h1>{}</h1>", escape(ctx.title(entity)))?;
    if !matches!(ctx.entity(entity).kind(), EntityKind::Module) {
        write_signature(out, ctx, entity, entity)?;
    }
    if !documentation.description().is_empty() {
        writeln!(out, "<div class=\"description\">")?;
        write_content(out, ctx, entity, documentation.description())?;
        writeln!(out, "</div>")?;
    }

    let mut current_title = None;
    for section in documentation.tags() {
        let title = section.tag().title();
        if current_title != Some(title) {
            if current_title.is_some() {
                writeln!(out, "</section>")?;
            }
            writeln!(out, "<section class=\"tag\">")?;
            writeln!(out, "<h4>{}</h4>", escape(title))?;
            current_title = Some(title);
        }
        write!(out, "<div class=\"tag-entry\">")?;
        match section.tag() {
            Tag::Param(name) | Tag::Property(name) => {
                write!(out, "<code>{}</code> ", escape(name))?;
            }
            tag => {
                if let Some(link) = tag.subject_link() {
                    write_inline(out, ctx, entity, &ContentNode::Link(link.clone()))?;
                    write!(out, " ")?;
                }
            }
        }
        write_content(out, ctx, entity, section.content())?;
        writeln!(out, "</div>")?;
    }
    if current_title.is_some() {
        writeln!(out, "</section>")?;
    }

    if let Some(url) = ctx.source_url(entity) {
        writeln!(
            out,
            "<p class=\"source\"><a href=\"{}\">View source</a></p>",
            escape(&url)
        )?;
    }

    for group in ctx.groups(entity) {
        writeln!(out, "<section class=\"members\">")?;
        writeln!(out, "<h2>{}</h2>", escape(group.title))?;
        for member in group.members {
            let anchor = ctx.locations().location(member).anchor();
            match anchor {
                Some(anchor) => writeln!(out, "<div class=\"member\" id=\"{}\">", escape(anchor))?,
                None => writeln!(out, "<div class=\"member\">")?,
            }
            match ctx.href(entity, member) {
                Some(href) if anchor.is_none() => writeln!(
                    out,
                    "<h3><a href=\"{}\">{}</a></h3>",
                    escape(&href),
                    escape(ctx.title(member))
                )?,
                _ => writeln!(out, "<h3>{}</h3>", escape(ctx.title(member)))?,
            }
            write_signature(out, ctx, entity, member)?;
            if let Some(summary) = ctx.entity(member).documentation().description().summary() {
                writeln!(out, "<div class=\"summary\">")?;
                write_block(out, ctx, entity, summary)?;
                writeln!(out, "</div>")?;
            }
            writeln!(out, "</div>")?;
        }
        writeln!(out, "</section>")?;
    }
    writeln!(out, "</main>")?;
    Ok(())
}

/// Signature of `entity`, with links relative to the page of `page`.
fn write_signature(
    out: &mut String,
    ctx: &RenderContext<'_>,
    page: EntityIndex,
    entity: EntityIndex,
) -> Result<(), Error> {
    write!(out, "<div class=\"signature\"><code>")?;
    for token in signature(ctx.module(), entity) {
        match token {
            Token::Annotation(name) => {
                write!(out, "<span class=\"annotation\">@{}</span>", escape(name))?
            }
            Token::Keyword(keyword) => {
                write!(out, "<span class=\"keyword\">{}</span>", escape(keyword))?
            }
            Token::Name(name) => write!(out, "<span class=\"name\">{}</span>", escape(name))?,
            Token::Type { name, target } => match ctx.link_href(page, target) {
                Some(href) => write!(out, "<a href=\"{}\">{}</a>", escape(&href), escape(name))?,
                None => out.push_str(&escape(name)),
            },
            Token::Text(text) => out.push_str(&escape(text)),
        }
    }
    writeln!(out, "</code></div>")?;
    Ok(())
}

fn write_content(
    out: &mut String,
    ctx: &RenderContext<'_>,
    page: EntityIndex,
    content: &Content,
) -> Result<(), Error> {
    for block in content.blocks() {
        write_block(out, ctx, page, block)?;
    }
    Ok(())
}

fn write_block(
    out: &mut String,
    ctx: &RenderContext<'_>,
    page: EntityIndex,
    node: &ContentNode,
) -> Result<(), Error> {
    match node {
        ContentNode::Paragraph(children) => {
            write!(out, "<p>")?;
            write_inlines(out, ctx, page, children)?;
            writeln!(out, "</p>")?;
        }
        ContentNode::Heading { level, children } => {
            let level = (*level).clamp(1, 6);
            write!(out, "<h{level}>")?;
            write_inlines(out, ctx, page, children)?;
            writeln!(out, "</h{level}>")?;
        }
        ContentNode::CodeBlock { language, code } => {
            match language {
                Some(language) => write!(
                    out,
                    "<pre><code class=\"language-{}\">",
                    escape(language)
                )?,
                None => write!(out, "<pre><code>")?,
            }
            out.push_str(&escape(code));
            writeln!(out, "</code></pre>")?;
        }
        ContentNode::List { ordered, items } => {
            let tag = if *ordered { "ol" } else { "ul" };
            writeln!(out, "<{tag}>")?;
            for item in items {
                write!(out, "<li>")?;
                write_inlines(out, ctx, page, item)?;
                writeln!(out, "</li>")?;
            }
            writeln!(out, "</{tag}>")?;
        }
        inline => {
            write!(out, "<p>")?;
            write_inline(out, ctx, page, inline)?;
            writeln!(out, "</p>")?;
        }
    }
    Ok(())
}

fn write_inlines(
    out: &mut String,
    ctx: &RenderContext<'_>,
    page: EntityIndex,
    nodes: &[ContentNode],
) -> Result<(), Error> {
    for node in nodes {
        write_inline(out, ctx, page, node)?;
    }
    Ok(())
}

fn write_inline(
    out: &mut String,
    ctx: &RenderContext<'_>,
    page: EntityIndex,
    node: &ContentNode,
) -> Result<(), Error> {
    match node {
        ContentNode::Text(text) => out.push_str(&escape(text)),
        ContentNode::Code(code) => write!(out, "<code>{}</code>", escape(code))?,
        ContentNode::Emphasis(children) => {
            write!(out, "<em>")?;
            write_inlines(out, ctx, page, children)?;
            write!(out, "</em>")?;
        }
        ContentNode::Strong(children) => {
            write!(out, "<strong>")?;
            write_inlines(out, ctx, page, children)?;
            write!(out, "</strong>")?;
        }
        ContentNode::Hyperlink { url, children } => {
            write!(out, "<a href=\"{}\">", escape(url))?;
            write_inlines(out, ctx, page, children)?;
            write!(out, "</a>")?;
        }
        ContentNode::Link(link) => {
            let href = ctx.link_href(page, link.target());
            if let Some(href) = &href {
                write!(out, "<a href=\"{}\">", escape(href))?;
            }
            if link.children().is_empty() {
                write!(out, "<code>{}</code>", escape(link.reference()))?;
            } else {
                write_inlines(out, ctx, page, link.children())?;
            }
            if href.is_some() {
                write!(out, "</a>")?;
            }
        }
        // Block nodes nested in inline position, e.g. inside list items.
        ContentNode::Paragraph(children) | ContentNode::Heading { children, .. } => {
            write_inlines(out, ctx, page, children)?;
        }
        block @ (ContentNode::CodeBlock { .. } | ContentNode::List { .. }) => {
            write_block(out, ctx, page, block)?;
        }
    }
    Ok(())
}

/// Escape text for HTML element content and attribute values.
pub(super) fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
