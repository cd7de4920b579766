//! Svelte page generation.
//!
//! Two layouts exist for historical reasons; both consume the same
//! [`ArticleRecord`] and are chosen through [`RendererKind`]. Every
//! interpolated value is emitted as a JavaScript literal so titles and
//! markup containing quotes, braces, or backticks cannot break the page.

use crate::config::RendererKind;
use crate::errors::{Result, SyncError};
use crate::models::ArticleRecord;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

pub const PAGE_FILE_NAME: &str = "+page.svelte";

/// Turns one record into the text of a page file.
pub trait PageRenderer {
    fn render(&self, record: &ArticleRecord) -> Result<String>;

    fn file_name(&self) -> &'static str {
        PAGE_FILE_NAME
    }
}

pub fn renderer_for(kind: RendererKind) -> Box<dyn PageRenderer> {
    match kind {
        RendererKind::Script => Box::new(ScriptRenderer),
        RendererKind::Inline => Box::new(InlineRenderer),
    }
}

/// Serialize a value as a JS literal that is also safe inside `<script>`.
fn js_literal<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Escape text for a JS template literal.
fn template_literal_body(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

fn metadata_block(record: &ArticleRecord) -> Result<String> {
    Ok(format!(
        "  const metadata = {{\n    title: {},\n    date: {},\n    categories: {},\n    mediumUrl: {}\n  }};\n",
        js_literal(&record.title)?,
        js_literal(record.display_date.as_deref().unwrap_or_default())?,
        js_literal(&record.categories)?,
        js_literal(record.medium_url())?,
    ))
}

/// Metadata and content as constants, content injected with `{@html}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptRenderer;

impl PageRenderer for ScriptRenderer {
    fn render(&self, record: &ArticleRecord) -> Result<String> {
        let metadata = metadata_block(record)?;
        let html = js_literal(record.content_html.as_deref().unwrap_or_default())?;
        Ok(format!(
            r#"<script lang="ts">
  import ArticleLayout from '$lib/components/ArticleLayout.svelte';

{metadata}
  const articleHtml = {html};
</script>

<ArticleLayout
  title={{metadata.title}}
  date={{metadata.date}}
  categories={{metadata.categories}}
>
  {{@html articleHtml}}
</ArticleLayout>
"#
        ))
    }
}

/// Metadata constant plus content as a template literal inside the layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineRenderer;

impl PageRenderer for InlineRenderer {
    fn render(&self, record: &ArticleRecord) -> Result<String> {
        let metadata = metadata_block(record)?;
        let html = template_literal_body(record.content_html.as_deref().unwrap_or_default().trim());
        Ok(format!(
            r#"<script lang="ts">
  import ArticleLayout from '$lib/components/ArticleLayout.svelte';

{metadata}</script>

<ArticleLayout
  title={{metadata.title}}
  date={{metadata.date}}
  categories={{metadata.categories}}
>
  {{@html `{html}`}}
</ArticleLayout>
"#
        ))
    }
}

/// Write `<page_dir>/<slug>/<file_name>` and return its path.
#[instrument(level = "info", skip_all, fields(slug = %record.slug))]
pub async fn write_page(
    renderer: &dyn PageRenderer,
    record: &ArticleRecord,
    page_dir: &Path,
) -> Result<PathBuf> {
    let article_dir = page_dir.join(&record.slug);
    fs::create_dir_all(&article_dir)
        .await
        .map_err(|e| SyncError::io(&article_dir, e))?;

    let page_path = article_dir.join(renderer.file_name());
    let contents = renderer.render(record)?;
    fs::write(&page_path, contents)
        .await
        .map_err(|e| SyncError::io(&page_path, e))?;
    info!(path = %page_path.display(), "Created page");
    Ok(page_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ArticleRecord {
        ArticleRecord {
            title: r#"Quotes "and" {braces} `ticks`"#.to_string(),
            slug: "quotes-and-braces-ticks".to_string(),
            url: Some("https://medium.com/p/1".to_string()),
            canonical_url: Some("https://medium.com/p/1".to_string()),
            published_at: None,
            display_date: Some("May 01, 2023".to_string()),
            categories: vec!["ai".to_string(), "it's".to_string()],
            content_html: Some(
                "<article><p>a `b` ${c} \\d</p><script>x()</script></article>".to_string(),
            ),
        }
    }

    #[test]
    fn test_js_literal_escapes_script_close() {
        assert_eq!(js_literal("a</script>b").unwrap(), r#""a<\/script>b""#);
        assert_eq!(js_literal(r#"say "hi""#).unwrap(), r#""say \"hi\"""#);
    }

    #[test]
    fn test_template_literal_body() {
        assert_eq!(template_literal_body(r"a`b${c}\d"), r"a\`b\${c}\\d");
    }

    #[test]
    fn test_script_renderer_embeds_literals() {
        let page = ScriptRenderer.render(&record()).unwrap();
        assert!(page.contains(r#"title: "Quotes \"and\" {braces} `ticks`","#));
        assert!(page.contains(r#"date: "May 01, 2023","#));
        assert!(page.contains(r#"categories: ["ai","it's"],"#));
        assert!(page.contains(r#"mediumUrl: "https://medium.com/p/1""#));
        assert!(page.contains(r#"const articleHtml = "<article><p>a `b` ${c} \\d<\/p><script>x()<\/script><\/article>";"#));
        assert!(page.contains("{@html articleHtml}"));
        // only the closing tag of the page's own script block remains
        assert_eq!(page.matches("</script>").count(), 1);
    }

    #[test]
    fn test_inline_renderer_escapes_template_literal() {
        let page = InlineRenderer.render(&record()).unwrap();
        assert!(page.contains(r"{@html `<article><p>a \`b\` \${c} \\d</p>"));
        assert!(page.contains("const metadata = {"));
        assert!(!page.contains("articleHtml"));
    }

    #[test]
    fn test_missing_optional_fields_render_empty() {
        let mut r = record();
        r.display_date = None;
        r.url = None;
        r.canonical_url = None;
        r.content_html = None;
        let page = ScriptRenderer.render(&r).unwrap();
        assert!(page.contains(r#"date: "","#));
        assert!(page.contains(r#"mediumUrl: """#));
        assert!(page.contains(r#"const articleHtml = "";"#));
    }

    #[test]
    fn test_renderer_for_kind() {
        let page = renderer_for(RendererKind::Inline).render(&record()).unwrap();
        assert!(page.contains("{@html `"));
        let page = renderer_for(RendererKind::Script).render(&record()).unwrap();
        assert!(page.contains("{@html articleHtml}"));
    }

    #[tokio::test]
    async fn test_write_page_creates_slug_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write_page(&ScriptRenderer, &record(), tmp.path()).await.unwrap();
        assert_eq!(
            path,
            tmp.path().join("quotes-and-braces-ticks").join("+page.svelte")
        );
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.starts_with("<script lang=\"ts\">"));
    }
}
