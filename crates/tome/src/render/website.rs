//! HTML fragments for embedding into a generated website.
//!
//! Pages carry no document wrapper; the host site supplies layout and
//! navigation, the latter from `_nav.yml`. Each fragment still links the
//! shipped `style.css` so it renders styled wherever it is embedded.

use std::fmt::Write as _;

use serde::Serialize;

use tome_core::model::EntityIndex;

use super::{Error, OutlinePage, RenderContext, Renderer, Resource, html, stylesheet};

/// Name of the navigation file at the output root.
pub const NAV_FILE: &str = "_nav.yml";

/// The website dialect.
pub struct WebsiteRenderer;

/// One entry of `_nav.yml`.
#[derive(Debug, Serialize)]
struct NavEntry<'a> {
    title: &'a str,
    url: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<NavEntry<'a>>,
}

impl Renderer for WebsiteRenderer {
    fn name(&self) -> &'static str {
        "website"
    }

    fn extension(&self) -> &'static str {
        "html"
    }

    fn render_page(&self, ctx: &RenderContext<'_>, entity: EntityIndex) -> Result<String, Error> {
        let mut out = String::new();
        writeln!(
            out,
            "<link rel=\"stylesheet\" href=\"{}\">",
            html::escape(&ctx.stylesheet_href(entity))
        )?;
        out.push_str("<div class=\"tome-page\">\n");
        html::write_breadcrumbs(&mut out, ctx, entity)?;
        html::write_main(&mut out, ctx, entity)?;
        out.push_str("</div>\n");
        Ok(out)
    }

    fn render_outline(&self, ctx: &RenderContext<'_>) -> Option<Result<OutlinePage, Error>> {
        let root = nav_entry(ctx, ctx.module().root());
        Some(
            serde_yaml::to_string(&[root])
                .map(|contents| OutlinePage {
                    file: NAV_FILE.to_string(),
                    contents,
                })
                .map_err(Error::from),
        )
    }

    fn resources(&self) -> Vec<Resource> {
        vec![stylesheet()]
    }
}

fn nav_entry<'a>(ctx: &RenderContext<'a>, index: EntityIndex) -> NavEntry<'a> {
    let root = ctx.module().root();
    NavEntry {
        title: ctx.title(index),
        url: ctx.locations().relative(root, index),
        children: ctx
            .entity(index)
            .children()
            .iter()
            .copied()
            .filter(|&child| ctx.entity(child).kind().is_addressable() && ctx.is_published(child))
            .map(|child| nav_entry(ctx, child))
            .collect(),
    }
}
