//! Standalone HTML rendering of plotly figures.

use super::charts::Figure;
use anyhow::{Context, Result};
use std::path::Path;

/// plotly.js bundle loaded by every page.
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const DIV_ID: &str = "silkreport-figure";

/// Render a figure as a self-contained HTML page.
pub fn render_html(figure: &Figure, title: &str) -> Result<String> {
    // "</" inside JSON would close the script element early
    let data = serde_json::to_string(&figure.data)?.replace("</", "<\\/");
    let layout = serde_json::to_string(&figure.layout)?.replace("</", "<\\/");

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"utf-8\" />\n");
    html.push_str(&format!("<title>{}</title>\n", escape(title)));
    html.push_str(&format!(
        "<script src=\"{}\" charset=\"utf-8\"></script>\n",
        PLOTLY_CDN
    ));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!(
        "<div id=\"{}\" class=\"plotly-graph-div\" style=\"height:100vh; width:100%;\"></div>\n",
        DIV_ID
    ));
    html.push_str("<script type=\"text/javascript\">\n");
    html.push_str(&format!(
        "Plotly.newPlot(\"{}\", {}, {}, {{\"responsive\": true}});\n",
        DIV_ID, data, layout
    ));
    html.push_str("</script>\n</body>\n</html>\n");

    Ok(html)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Write a figure to `path`, creating parent directories as needed.
pub fn write_html(figure: &Figure, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let title = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let html = render_html(figure, &title)?;

    std::fs::write(path, html)
        .with_context(|| format!("Failed to write chart to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn figure() -> Figure {
        Figure {
            data: vec![json!({ "type": "scatter", "name": "</script>", "x": [1, 2] })],
            layout: json!({ "font": { "size": 30 } }),
        }
    }

    #[test]
    fn test_render_html() {
        let html = render_html(&figure(), "a <b>").unwrap();

        assert!(html.contains(PLOTLY_CDN));
        assert!(html.contains("Plotly.newPlot"));
        assert!(html.contains("\"size\":30"));
        assert!(html.contains("<title>a &lt;b&gt;</title>"));
        assert!(html.contains("<\\/script>"));
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn test_write_html_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plots").join("nested").join("chart.html");

        write_html(&figure(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<!DOCTYPE html>"));
        assert!(content.contains("<title>chart</title>"));
    }
}
