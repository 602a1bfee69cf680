//! HTML rendering: the upload form, the dataset preview table, and the
//! result page tying the preview, the inline charts, and the workbook
//! download link together.
//!
//! The pages are deliberately string-built — two small pages do not
//! justify a template engine, and everything user-controlled passes
//! through [`escape`] on the way in.

use crate::bucket::ColumnAnalysis;
use crate::dataset::Dataset;

/// Escape a string for HTML text and attribute contexts.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// The upload form served at `GET /`.
pub fn index_page() -> String {
    r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>doc2chart</title></head>
<body>
<h1>doc2chart</h1>
<p>Upload a PDF, Word (.docx), or spreadsheet (.xls/.xlsx) document and
name a numeric column to bucket into fixed ranges.</p>
<form action="/upload" method="post" enctype="multipart/form-data">
  <p><input type="file" name="file" required></p>
  <p><label>Column name: <input type="text" name="column_name" required></label></p>
  <p><button type="submit">Generate report</button></p>
</form>
</body>
</html>
"#
    .to_string()
}

/// Render the filtered dataset as an escaped HTML table.
pub fn dataset_table(dataset: &Dataset) -> String {
    let mut html = String::from("<table border=\"1\" class=\"table table-striped\">\n<thead><tr>");
    for column in dataset.columns() {
        html.push_str("<th>");
        html.push_str(&escape(column));
        html.push_str("</th>");
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in dataset.rows() {
        html.push_str("<tr>");
        for cell in row {
            html.push_str("<td>");
            html.push_str(&escape(cell));
            html.push_str("</td>");
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

/// The result page returned by a successful `POST /upload`.
pub fn result_page(report_id: &str, analysis: &ColumnAnalysis) -> String {
    let id = escape(report_id);
    let column = escape(&analysis.column);
    let table = dataset_table(&analysis.filtered);
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>doc2chart report</title></head>
<body>
<h1>Report for column "{column}"</h1>
<p>{rows} rows kept, {dropped} dropped as non-numeric.</p>
<h2>Charts</h2>
<p><img src="/artifacts/{id}/pie_chart.png" alt="Pie chart of {column}" width="300"></p>
<p><img src="/artifacts/{id}/line_chart.png" alt="Line chart of {column}" width="500"></p>
<p><img src="/artifacts/{id}/bar_chart.png" alt="Bar chart of {column}" width="500"></p>
<h2>Data</h2>
{table}
<p><a href="/download/{id}/data.xlsx">Download workbook (data.xlsx)</a></p>
<p><a href="/">Convert another document</a></p>
</body>
</html>
"#,
        rows = analysis.filtered.len(),
        dropped = analysis.dropped_rows,
    )
}
