//! Markdown pages with YAML front matter for Jekyll sites.

use serde::Serialize;

use tome_core::model::EntityIndex;

use super::{Error, RenderContext, Renderer, markdown};

/// Layout name pages ask Jekyll for.
const LAYOUT: &str = "api";

/// The Jekyll dialect. Declines to produce an outline; sites build their own
/// navigation from front matter.
pub struct JekyllRenderer;

#[derive(Serialize)]
struct FrontMatter<'a> {
    title: &'a str,
    layout: &'a str,
    module: &'a str,
}

impl Renderer for JekyllRenderer {
    fn name(&self) -> &'static str {
        "jekyll"
    }

    fn extension(&self) -> &'static str {
        "md"
    }

    fn render_page(&self, ctx: &RenderContext<'_>, entity: EntityIndex) -> Result<String, Error> {
        let front_matter = serde_yaml::to_string(&FrontMatter {
            title: ctx.title(entity),
            layout: LAYOUT,
            module: ctx.module().name(),
        })?;

        let mut out = String::new();
        out.push_str("---\n");
        out.push_str(&front_matter);
        out.push_str("---\n\n");
        markdown::write_page(&mut out, ctx, entity)?;
        Ok(out)
    }
}
