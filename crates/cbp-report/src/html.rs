//! HTML findings table.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use tracing::info;

use cbp_model::{ExitStatus, Finding, Severity};

use crate::summary::{RunSummary, STUDY_LEVEL};

const COLUMNS: &[&str] = &["File", "Line", "Column", "Level", "Message", "Value"];

const STYLE: &str = "body { font-family: sans-serif; margin: 2em; }
table { border-collapse: collapse; margin-bottom: 1.5em; }
th, td { border: 1px solid #cccccc; padding: 0.25em 0.5em; text-align: left; }
tr.error td { background: #f8d7da; }
tr.warning td { background: #fff3cd; }
tr.info td { background: #e7f1ff; }
p.status { font-weight: bold; }";

/// Options for the HTML report.
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Study or data directory shown in the page header.
    pub study_dir: String,
}

impl HtmlOptions {
    pub fn new(study_dir: impl Into<String>) -> Self {
        Self {
            study_dir: study_dir.into(),
        }
    }
}

/// Render the report. Identical findings give byte-identical output.
pub fn render_html(findings: &[Finding], options: &HtmlOptions) -> Result<String> {
    let summary = RunSummary::from_findings(findings);
    let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);

    xml.write_event(Event::DocType(BytesText::from_escaped("html")))?;
    let mut html = BytesStart::new("html");
    html.push_attribute(("lang", "en"));
    xml.write_event(Event::Start(html))?;

    xml.write_event(Event::Start(BytesStart::new("head")))?;
    let mut meta = BytesStart::new("meta");
    meta.push_attribute(("charset", "utf-8"));
    xml.write_event(Event::Empty(meta))?;
    text_element(&mut xml, "title", None, "cBioPortal study validation")?;
    text_element(&mut xml, "style", None, STYLE)?;
    xml.write_event(Event::End(BytesEnd::new("head")))?;

    xml.write_event(Event::Start(BytesStart::new("body")))?;
    text_element(
        &mut xml,
        "h1",
        None,
        &format!("Validation of {}", options.study_dir),
    )?;
    text_element(
        &mut xml,
        "p",
        Some(status_class(summary.status)),
        &format!("Validation status: {}", summary.status),
    )?;
    write_counts(&mut xml, &summary)?;

    for file in &summary.files {
        let rows: Vec<&Finding> = findings
            .iter()
            .filter(|finding| {
                finding.severity >= Severity::Info
                    && finding.file.as_deref().unwrap_or(STUDY_LEVEL) == file.file
            })
            .collect();
        if rows.is_empty() {
            continue;
        }
        xml.write_event(Event::Start(BytesStart::new("section")))?;
        text_element(&mut xml, "h2", None, &file.file)?;
        write_findings_table(&mut xml, &rows)?;
        xml.write_event(Event::End(BytesEnd::new("section")))?;
    }

    xml.write_event(Event::End(BytesEnd::new("body")))?;
    xml.write_event(Event::End(BytesEnd::new("html")))?;

    let mut bytes = xml.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).context("report is not valid UTF-8")
}

pub fn write_html_table(path: &Path, findings: &[Finding], options: &HtmlOptions) -> Result<()> {
    let html = render_html(findings, options)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, html).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "wrote HTML report");
    Ok(())
}

fn status_class(status: ExitStatus) -> &'static str {
    match status {
        ExitStatus::Succeeded => "status succeeded",
        ExitStatus::SucceededWithWarnings => "status warnings",
        ExitStatus::Failed | ExitStatus::NotPerformed => "status failed",
    }
}

fn write_counts<W: Write>(xml: &mut Writer<W>, summary: &RunSummary) -> Result<()> {
    let mut table = BytesStart::new("table");
    table.push_attribute(("class", "counts"));
    xml.write_event(Event::Start(table))?;
    xml.write_event(Event::Start(BytesStart::new("tr")))?;
    for header in ["Errors", "Warnings", "Infos"] {
        text_element(xml, "th", None, header)?;
    }
    xml.write_event(Event::End(BytesEnd::new("tr")))?;
    xml.write_event(Event::Start(BytesStart::new("tr")))?;
    for count in [
        summary.totals.errors,
        summary.totals.warnings,
        summary.totals.infos,
    ] {
        text_element(xml, "td", None, &count.to_string())?;
    }
    xml.write_event(Event::End(BytesEnd::new("tr")))?;
    xml.write_event(Event::End(BytesEnd::new("table")))?;
    Ok(())
}

fn write_findings_table<W: Write>(xml: &mut Writer<W>, rows: &[&Finding]) -> Result<()> {
    let mut table = BytesStart::new("table");
    table.push_attribute(("class", "findings"));
    xml.write_event(Event::Start(table))?;

    xml.write_event(Event::Start(BytesStart::new("thead")))?;
    xml.write_event(Event::Start(BytesStart::new("tr")))?;
    for column in COLUMNS {
        text_element(xml, "th", None, column)?;
    }
    xml.write_event(Event::End(BytesEnd::new("tr")))?;
    xml.write_event(Event::End(BytesEnd::new("thead")))?;

    xml.write_event(Event::Start(BytesStart::new("tbody")))?;
    for finding in rows {
        let mut row = BytesStart::new("tr");
        row.push_attribute(("class", finding.severity.as_str().to_lowercase().as_str()));
        xml.write_event(Event::Start(row))?;
        let optional = |value: Option<usize>| value.map(|n| n.to_string()).unwrap_or_default();
        let cells = [
            finding.file.clone().unwrap_or_default(),
            optional(finding.line),
            optional(finding.column),
            finding.severity.as_str().to_string(),
            finding.message.clone(),
            finding.cause.clone().unwrap_or_default(),
        ];
        for cell in &cells {
            text_element(xml, "td", None, cell)?;
        }
        xml.write_event(Event::End(BytesEnd::new("tr")))?;
    }
    xml.write_event(Event::End(BytesEnd::new("tbody")))?;

    xml.write_event(Event::End(BytesEnd::new("table")))?;
    Ok(())
}

fn text_element<W: Write>(
    xml: &mut Writer<W>,
    name: &str,
    class: Option<&str>,
    text: &str,
) -> Result<()> {
    let mut start = BytesStart::new(name);
    if let Some(class) = class {
        start.push_attribute(("class", class));
    }
    xml.write_event(Event::Start(start))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
