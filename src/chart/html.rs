use std::path::Path;

use log::info;

use super::spec::TopLevel;
use crate::error::Result;

const VEGA: &str = "https://cdn.jsdelivr.net/npm/vega@5";
const VEGA_LITE: &str = "https://cdn.jsdelivr.net/npm/vega-lite@5";
const VEGA_EMBED: &str = "https://cdn.jsdelivr.net/npm/vega-embed@6";

/// Standalone HTML page that renders `spec` with vega-embed.
pub fn render_html(spec: &TopLevel) -> Result<String> {
    // "</" inside a string literal would close the script element early.
    let json = serde_json::to_string(spec)?.replace("</", "<\\/");
    Ok(format!(
        r##"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <script src="{VEGA}"></script>
  <script src="{VEGA_LITE}"></script>
  <script src="{VEGA_EMBED}"></script>
</head>
<body>
  <div id="vis"></div>
  <script type="text/javascript">
    var spec = {json};
    vegaEmbed("#vis", spec, {{"mode": "vega-lite"}}).catch(console.error);
  </script>
</body>
</html>
"##
    ))
}

pub fn write_html(path: &Path, spec: &TopLevel) -> Result<()> {
    let html = render_html(spec)?;
    std::fs::write(path, html)?;
    info!("wrote {} chart(s) to {}", spec.spec.charts().len(), path.display());
    Ok(())
}
