//! Single-page HTML output: status lines, data preview, and every chart
//! embedded with Vega-Embed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::chart::ChartSpec;
use crate::domain::AssetSource;
use crate::error::AppError;
use crate::render::{ChartRenderer, EmbedOptions, PageParts, check_target};
use crate::report::escape_html;

/// Library files expected in a local asset directory, in load order.
pub const LOCAL_ASSETS: [&str; 3] = ["vega.min.js", "vega-lite.min.js", "vega-embed.min.js"];

const CDN_ASSETS: [&str; 3] = [
    "https://cdn.jsdelivr.net/npm/vega@5",
    "https://cdn.jsdelivr.net/npm/vega-lite@5",
    "https://cdn.jsdelivr.net/npm/vega-embed@6",
];

#[derive(Debug, Clone, Serialize)]
struct Embed {
    target: String,
    spec: Value,
    options: EmbedOptions,
}

pub struct HtmlRenderer {
    out: PathBuf,
    assets: AssetSource,
    embeds: Vec<Embed>,
}

impl HtmlRenderer {
    pub fn new(out: impl Into<PathBuf>, assets: AssetSource) -> Self {
        Self {
            out: out.into(),
            assets,
            embeds: Vec::new(),
        }
    }

    pub fn targets(&self) -> Vec<&str> {
        self.embeds.iter().map(|e| e.target.as_str()).collect()
    }

    fn script_tags(&self) -> String {
        let srcs: Vec<String> = match &self.assets {
            AssetSource::Cdn => CDN_ASSETS.iter().map(|s| s.to_string()).collect(),
            AssetSource::Local(dir) => LOCAL_ASSETS
                .iter()
                .map(|f| dir.join(f).display().to_string())
                .collect(),
        };
        srcs.iter()
            .map(|s| format!("<script src=\"{}\"></script>\n", escape_html(s)))
            .collect()
    }

    /// Full page text.
    pub fn page(&self, parts: &PageParts) -> Result<String, AppError> {
        let charts = serde_json::to_string(&self.embeds)
            .map_err(|e| AppError::render(format!("Failed to serialize chart specs: {e}")))?;

        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape_html(&parts.title)));
        html.push_str(STYLE);
        html.push_str(&self.script_tags());
        html.push_str("</head>\n<body>\n");
        html.push_str(&format!("<h1>{}</h1>\n", escape_html(&parts.title)));

        html.push_str("<div id=\"status\">\n");
        for (id, line) in [
            ("status-load", parts.status.load_line()),
            ("status-rows", parts.status.rows_line()),
            ("status-error", parts.status.error_line()),
        ] {
            html.push_str(&format!("<p id=\"{id}\">{}</p>\n", escape_html(line)));
        }
        html.push_str("</div>\n");

        for embed in &self.embeds {
            html.push_str(&format!(
                "<section class=\"chart\"><div id=\"chart-{}\"></div></section>\n",
                embed.target
            ));
        }

        html.push_str("<section id=\"preview\">\n");
        html.push_str(&parts.table_html);
        html.push_str("</section>\n");

        html.push_str("<script>\n");
        html.push_str(&format!("const charts = {};\n", script_safe(&charts)));
        html.push_str(EMBED_SCRIPT);
        html.push_str("</script>\n</body>\n</html>\n");
        Ok(html)
    }
}

impl ChartRenderer for HtmlRenderer {
    fn ensure_available(&self) -> Result<(), AppError> {
        let AssetSource::Local(dir) = &self.assets else {
            return Ok(());
        };
        let missing: Vec<&str> = LOCAL_ASSETS
            .iter()
            .copied()
            .filter(|f| !dir.join(f).is_file())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::dependency_missing(format!(
                "{} not found in {}",
                missing.join(", "),
                dir.display()
            )))
        }
    }

    fn embed(&mut self, target: &str, spec: &ChartSpec, options: &EmbedOptions) -> Result<(), AppError> {
        check_target(target)?;
        if self.embeds.iter().any(|e| e.target == target) {
            return Err(AppError::render(format!("Chart target `{target}` is already in use.")));
        }
        let spec = serde_json::to_value(spec)
            .map_err(|e| AppError::render(format!("Failed to serialize chart `{target}`: {e}")))?;
        self.embeds.push(Embed {
            target: target.to_string(),
            spec,
            options: *options,
        });
        Ok(())
    }

    fn finish(&mut self, page: &PageParts) -> Result<PathBuf, AppError> {
        let html = self.page(page)?;
        ensure_parent(&self.out)?;
        fs::write(&self.out, html)
            .map_err(|e| AppError::io(format!("Failed to write '{}': {e}", self.out.display())))?;
        tracing::info!(path = %self.out.display(), charts = self.embeds.len(), "wrote dashboard page");
        Ok(self.out.clone())
    }
}

pub(crate) fn ensure_parent(path: &Path) -> Result<(), AppError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
            .map_err(|e| AppError::io(format!("Failed to create '{}': {e}", dir.display()))),
        _ => Ok(()),
    }
}

/// JSON text that cannot close the surrounding `<script>` element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

const STYLE: &str = "<style>
body { font-family: system-ui, sans-serif; margin: 1.5rem; }
#status p { margin: 0.2rem 0; }
#status-error { color: #b00020; }
.chart { margin: 1.5rem 0; }
.chart > div { width: 100%; }
table { border-collapse: collapse; font-size: 0.9rem; }
th, td { border: 1px solid #ccc; padding: 0.2rem 0.5rem; text-align: left; }
</style>
";

const EMBED_SCRIPT: &str = r##"(async function () {
  const status = document.getElementById("status-error");
  if (typeof vegaEmbed !== "function") {
    status.textContent = "Chart library missing: vegaEmbed is not defined.";
    return;
  }
  for (const chart of charts) {
    try {
      await vegaEmbed("#chart-" + chart.target, chart.spec, chart.options);
    } catch (err) {
      console.error(chart.target, err);
      status.textContent = "Error: " + chart.target + ": " + err.message;
    }
  }
})();
"##;
