//! Plotly figure construction.
//!
//! Figures are plain plotly.js JSON (`data` + `layout`) built from the
//! corpus or the specimen summary. Each builder checks its required
//! columns first and reports the missing ones instead of failing.

use crate::analysis::distinct_values;
use crate::color::{ColorMap, ALPHABET};
use crate::config::{PlotsConfig, ViolinJob};
use crate::models::{Table, Value};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use thiserror::Error;

/// A chart could not be built because the table lacks columns.
#[derive(Debug, Error, PartialEq)]
#[error("required column(s) {} not in the table", .0.join(", "))]
pub struct MissingColumns(pub Vec<String>);

/// A plotly.js figure.
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<JsonValue>,
    pub layout: JsonValue,
}

fn require(table: &Table, columns: &[&str]) -> Result<(), MissingColumns> {
    let missing: Vec<String> = columns
        .iter()
        .filter(|c| !table.has_column(c))
        .map(|c| c.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(MissingColumns(missing))
    }
}

fn minor_ticks() -> JsonValue {
    json!({ "ticklen": 6, "tickcolor": "black", "showgrid": true })
}

/// Hover template listing x, y and each custom-data column.
fn hover_template(x: &str, y: &str, extra: &[&str]) -> String {
    let mut template = format!("{}=%{{x}}<br>{}=%{{y}}", x, y);
    for (i, column) in extra.iter().enumerate() {
        template.push_str(&format!("<br>{}=%{{customdata[{}]}}", column, i));
    }
    template.push_str("<extra></extra>");
    template
}

fn cells<'a>(table: &'a Table, column: &str, rows: &[usize]) -> Vec<&'a Value> {
    match table.column(column) {
        Some(c) => rows.iter().map(|&r| &c.values[r]).collect(),
        None => Vec::new(),
    }
}

fn custom_data<'a>(table: &'a Table, columns: &[&str], rows: &[usize]) -> Vec<Vec<&'a Value>> {
    rows.iter()
        .map(|&r| {
            columns
                .iter()
                .map(|c| table.get(c, r).unwrap_or(&Value::Missing))
                .collect()
        })
        .collect()
}

fn rows_where(table: &Table, column: &str, value: &Value) -> Vec<usize> {
    table
        .column(column)
        .map(|c| {
            c.values
                .iter()
                .enumerate()
                .filter(|(_, v)| *v == value)
                .map(|(i, _)| i)
                .collect()
        })
        .unwrap_or_default()
}

/// Stress-strain curves, one line per specimen.
///
/// Series are ordered and coloured by sorted specimen name; both axes
/// have fixed ranges so runs stay comparable.
pub fn line_chart(
    corpus: &Table,
    plots: &PlotsConfig,
    name_column: &str,
) -> Result<Figure, MissingColumns> {
    let x_col = plots.strain_column.as_str();
    let y_col = plots.stress_column.as_str();
    require(corpus, &[x_col, y_col, name_column])?;

    let hover: Vec<&str> = plots
        .hover_columns
        .iter()
        .map(String::as_str)
        .filter(|c| corpus.has_column(c))
        .collect();
    let template = hover_template(x_col, y_col, &hover);

    let names: Vec<Value> = distinct_values(corpus, name_column)
        .into_iter()
        .filter(|v| !v.is_missing())
        .collect();
    let colors = ColorMap::cycled(&names, &ALPHABET);

    let data = names
        .iter()
        .map(|name| {
            let rows = rows_where(corpus, name_column, name);
            json!({
                "type": "scatter",
                "mode": "lines",
                "name": name,
                "legendgroup": name,
                "showlegend": true,
                "x": cells(corpus, x_col, &rows),
                "y": cells(corpus, y_col, &rows),
                "line": { "color": colors.color_for(name), "width": plots.line_width, "dash": "solid" },
                "customdata": custom_data(corpus, &hover, &rows),
                "hovertemplate": template,
            })
        })
        .collect();

    let layout = json!({
        "font": { "color": "Black", "size": plots.line_font_size },
        "legend": { "title": { "text": name_column }, "tracegrouporder": "tracegroupordered" },
        "xaxis": { "title": { "text": x_col }, "range": plots.x_range, "minor": minor_ticks() },
        "yaxis": { "title": { "text": y_col }, "range": plots.y_range, "minor": minor_ticks() },
    });

    Ok(Figure { data, layout })
}

/// Distribution of `job.value` split by `job.group`, one violin per group.
///
/// Groups appear in order of first occurrence; rows without a group are
/// left out. Every point is drawn over a box, and hovering shows all
/// summary columns.
pub fn violin_chart(
    summary: &Table,
    job: &ViolinJob,
    font_size: u32,
) -> Result<Figure, MissingColumns> {
    require(summary, &[job.value.as_str(), job.group.as_str()])?;

    let mut groups: Vec<&Value> = Vec::new();
    if let Some(column) = summary.column(&job.group) {
        for v in &column.values {
            if !v.is_missing() && !groups.contains(&v) {
                groups.push(v);
            }
        }
    }
    let palette: Vec<Value> = groups.iter().map(|g| (*g).clone()).collect();
    let colors = ColorMap::new(&palette);

    let hover: Vec<&str> = summary.column_names();
    let template = hover_template(&job.group, &job.value, &hover);

    let data = groups
        .iter()
        .map(|group| {
            let rows = rows_where(summary, &job.group, group);
            json!({
                "type": "violin",
                "name": group,
                "legendgroup": group,
                "offsetgroup": group,
                "scalegroup": "True",
                "alignmentgroup": "True",
                "showlegend": true,
                "x": cells(summary, &job.group, &rows),
                "y": cells(summary, &job.value, &rows),
                "box": { "visible": true },
                "points": "all",
                "marker": { "color": colors.color_for(group) },
                "customdata": custom_data(summary, &hover, &rows),
                "hovertemplate": template,
            })
        })
        .collect();

    let layout = json!({
        "violinmode": "group",
        "font": { "color": "Black", "size": font_size },
        "legend": { "title": { "text": job.x_title } },
        "xaxis": { "title": { "text": job.x_title } },
        "yaxis": { "title": { "text": job.y_title }, "minor": minor_ticks() },
    });

    Ok(Figure { data, layout })
}
