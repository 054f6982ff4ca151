//! Shared machinery for tab-delimited data files.
//!
//! [`run_data_file`] drives a [`FileRules`] implementation over one file:
//!
//! 1. leading `#` rows are handed to [`FileRules::leading_comments`];
//! 2. the header is checked by a fixed sequence of capability checks
//!    (blank names, required columns, duplicate names, namespaces, then the
//!    validator's own [`FileRules::check_header`]);
//! 3. a header with errors aborts the file with
//!    "Invalid column header, file cannot be parsed" unless relaxed mode is
//!    on;
//! 4. each data line goes through the generic line checks (blank line,
//!    column count, quotes, unique column) and then
//!    [`FileRules::check_line`];
//! 5. [`FileRules::finish`] runs once after the last line, followed by the
//!    per-file summary.
//!
//! The order above is part of the contract: it fixes the order of findings.

use std::collections::{BTreeMap, BTreeSet};

use cbp_ingest::{TextFile, is_blank, split_fields};
use cbp_model::{Finding, MetaDescriptor, PortalInstance, Severity};
use cbp_reference::ChromosomeSource;

use crate::context::StudyContext;
use crate::options::ValidationOptions;
use crate::sink::FileSink;

/// Column whose values must not repeat within one file.
#[derive(Debug, Clone)]
pub struct UniqueColumn {
    pub name: &'static str,
    pub severity: Severity,
    pub message: &'static str,
}

/// Header requirements of a file type.
#[derive(Debug, Clone, Default)]
pub struct HeaderSpec {
    /// Columns that must be present.
    pub required: Vec<&'static str>,
    /// Required columns must be the leading columns, in this order.
    pub ordered: bool,
    /// Check the `namespaces` meta key against the header.
    pub namespaces: bool,
    pub unique: Option<UniqueColumn>,
    /// File has no header row; these names describe its columns.
    pub headerless: Option<Vec<&'static str>>,
}

impl HeaderSpec {
    pub fn required(columns: &[&'static str]) -> Self {
        Self {
            required: columns.to_vec(),
            ..Self::default()
        }
    }

    pub fn ordered(columns: &[&'static str]) -> Self {
        Self {
            required: columns.to_vec(),
            ordered: true,
            ..Self::default()
        }
    }

    pub fn headerless(columns: &[&'static str]) -> Self {
        Self {
            headerless: Some(columns.to_vec()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_namespaces(mut self) -> Self {
        self.namespaces = true;
        self
    }

    #[must_use]
    pub fn with_unique(
        mut self,
        name: &'static str,
        severity: Severity,
        message: &'static str,
    ) -> Self {
        self.unique = Some(UniqueColumn {
            name,
            severity,
            message,
        });
        self
    }
}

/// Resolved column header of a data file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    pub columns: Vec<String>,
    /// Line the header was read from; 0 for headerless files.
    pub line: usize,
    index: BTreeMap<String, usize>,
}

impl Header {
    pub fn new(columns: Vec<String>, line: usize) -> Self {
        let mut index = BTreeMap::new();
        for (position, name) in columns.iter().enumerate() {
            index.entry(name.clone()).or_insert(position);
        }
        Self {
            columns,
            line,
            index,
        }
    }

    /// Zero-based position of the first column called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// One data row, split into cells.
#[derive(Debug, Clone)]
pub struct DataLine<'l> {
    /// 1-based line number in the file.
    pub number: usize,
    pub fields: Vec<&'l str>,
}

impl<'l> DataLine<'l> {
    /// Cell of the column called `name`, if the header has it.
    pub fn get(&self, header: &Header, name: &str) -> Option<&'l str> {
        header
            .position(name)
            .and_then(|index| self.fields.get(index).copied())
    }

    pub fn at(&self, index: usize) -> Option<&'l str> {
        self.fields.get(index).copied()
    }
}

/// Everything a validator may read or update while checking one file.
pub struct FileContext<'a> {
    pub portal: &'a PortalInstance,
    pub options: &'a ValidationOptions,
    pub meta: &'a MetaDescriptor,
    pub study: &'a mut StudyContext,
    pub chromosomes: &'a dyn ChromosomeSource,
    pub sink: FileSink<'a>,
}

impl FileContext<'_> {
    pub fn push(&mut self, finding: Finding) {
        self.sink.push(finding);
    }

    /// Reports an undefined sample at `line`/`column`. Nothing is reported
    /// when sample references are not being checked.
    pub fn check_sample_defined(&mut self, sample_id: &str, line: usize, column: usize) -> bool {
        match self.study.sample_defined(sample_id) {
            Some(false) => {
                self.push(
                    Finding::error("Sample ID not defined in clinical file")
                        .at_line(line)
                        .at_column(column)
                        .with_cause(sample_id),
                );
                false
            }
            _ => true,
        }
    }

    /// Patient counterpart of [`Self::check_sample_defined`].
    pub fn check_patient_defined(&mut self, patient_id: &str, line: usize, column: usize) -> bool {
        match self.study.patient_defined(patient_id) {
            Some(false) => {
                self.push(
                    Finding::error("Patient ID not defined in clinical file")
                        .at_line(line)
                        .at_column(column)
                        .with_cause(patient_id),
                );
                false
            }
            _ => true,
        }
    }
}

/// File-type specific rules plugged into [`run_data_file`].
pub trait FileRules {
    fn header_spec(&self, ctx: &FileContext<'_>) -> HeaderSpec;

    /// `#` rows before the header, with their line numbers.
    fn leading_comments(&mut self, _ctx: &mut FileContext<'_>, _rows: &[(usize, &str)]) {}

    /// Validator-specific header checks. Errors reported here make the
    /// header invalid.
    fn check_header(&mut self, _ctx: &mut FileContext<'_>, _header: &Header) {}

    fn check_line(&mut self, ctx: &mut FileContext<'_>, header: &Header, line: &DataLine<'_>);

    /// Checks that need the whole file, e.g. comparing against paired files.
    fn finish(&mut self, _ctx: &mut FileContext<'_>, _header: &Header) {}
}

/// Outcome of [`run_data_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Parsed { data_lines: usize },
    /// Header was invalid and the file was abandoned.
    Unparseable,
}

/// Validate `text` with `rules`.
pub fn run_data_file(
    rules: &mut dyn FileRules,
    ctx: &mut FileContext<'_>,
    text: &TextFile,
) -> FileOutcome {
    ctx.push(Finding::debug("Starting validation of file"));
    let spec = rules.header_spec(ctx);

    let mut lines = text.numbered().peekable();
    let mut comments = Vec::new();
    while let Some((number, line)) = lines.peek() {
        if !line.starts_with('#') {
            break;
        }
        comments.push((*number, *line));
        lines.next();
    }
    let errors_before = ctx.sink.error_count();
    rules.leading_comments(ctx, &comments);

    let header = match &spec.headerless {
        Some(names) => Header::new(names.iter().map(|name| (*name).to_string()).collect(), 0),
        None => match lines.next() {
            Some((number, line)) => Header::new(
                split_fields(line).into_iter().map(str::to_string).collect(),
                number,
            ),
            None => {
                ctx.push(Finding::error("No column header found in file"));
                return abandon(ctx);
            }
        },
    };

    if spec.headerless.is_none() {
        check_header_capabilities(ctx, &spec, &header);
    }
    rules.check_header(ctx, &header);
    if ctx.sink.error_count() > errors_before && !ctx.options.relaxed_mode {
        return abandon(ctx);
    }

    let mut seen_unique: BTreeMap<String, usize> = BTreeMap::new();
    let unique_index = spec
        .unique
        .as_ref()
        .and_then(|unique| header.position(unique.name).map(|index| (unique, index)));
    let mut data_lines = 0;
    for (number, line) in lines {
        if line.starts_with('#') {
            continue;
        }
        data_lines += 1;
        if is_blank(line) {
            ctx.push(Finding::error("Blank line").at_line(number));
            continue;
        }
        let fields = split_fields(line);
        if fields.len() != header.len() {
            ctx.push(
                Finding::error(format!(
                    "Expected {} columns based on header, found {}",
                    header.len(),
                    fields.len()
                ))
                .at_line(number),
            );
            continue;
        }
        for (index, field) in fields.iter().enumerate() {
            if field.contains('"') {
                ctx.push(
                    Finding::error("Found quotation marks around field(s)")
                        .at_line(number)
                        .at_column(index + 1)
                        .with_cause(*field),
                );
            }
        }
        if let Some((unique, index)) = unique_index {
            let value = fields[index].trim();
            if let Some(first) = seen_unique.get(value) {
                ctx.push(
                    Finding::new(
                        unique.severity,
                        format!("{} (first seen on line {first})", unique.message),
                    )
                    .at_line(number)
                    .at_column(index + 1)
                    .with_cause(value),
                );
                continue;
            }
            seen_unique.insert(value.to_string(), number);
        }
        let data_line = DataLine { number, fields };
        rules.check_line(ctx, &header, &data_line);
    }

    rules.finish(ctx, &header);
    ctx.push(Finding::info(format!(
        "Read {data_lines} lines. Lines with warning: {}. Lines with error: {}",
        ctx.sink.lines_with_warning(),
        ctx.sink.lines_with_error()
    )));
    ctx.push(Finding::info("Validation of file complete"));
    FileOutcome::Parsed { data_lines }
}

fn abandon(ctx: &mut FileContext<'_>) -> FileOutcome {
    ctx.push(Finding::error("Invalid column header, file cannot be parsed"));
    FileOutcome::Unparseable
}

fn check_header_capabilities(ctx: &mut FileContext<'_>, spec: &HeaderSpec, header: &Header) {
    let line = header.line;

    for (index, name) in header.columns.iter().enumerate() {
        if name.trim().is_empty() {
            ctx.push(
                Finding::error("Blank column name in header")
                    .at_line(line)
                    .at_column(index + 1)
                    .with_cause(name.as_str()),
            );
        }
    }

    for (expected_index, required) in spec.required.iter().enumerate() {
        match header.position(required) {
            None => ctx.push(
                Finding::error(format!("Missing column: {required}"))
                    .at_line(line)
                    .with_cause(*required),
            ),
            Some(found) if spec.ordered && found != expected_index => ctx.push(
                Finding::error(format!(
                    "Column {required} found at wrong position; expected in column {}",
                    expected_index + 1
                ))
                .at_line(line)
                .at_column(found + 1)
                .with_cause(*required),
            ),
            Some(_) => {}
        }
    }

    let mut seen = BTreeSet::new();
    for (index, name) in header.columns.iter().enumerate() {
        if !name.trim().is_empty() && !seen.insert(name.as_str()) {
            ctx.push(
                Finding::error("Duplicate column name in header")
                    .at_line(line)
                    .at_column(index + 1)
                    .with_cause(name.as_str()),
            );
        }
    }

    if spec.namespaces {
        for namespace in ctx.meta.namespaces() {
            let prefix = format!("{namespace}.");
            let matched = header
                .columns
                .iter()
                .any(|column| column.to_lowercase().starts_with(&prefix));
            if !matched {
                ctx.push(
                    Finding::error(format!(
                        "{namespace} namespace defined but the file does not have any matching columns"
                    ))
                    .at_line(line)
                    .with_cause(namespace.as_str()),
                );
            }
        }
    }
}

/// Tracks the first line on which a key was seen.
#[derive(Debug, Clone, Default)]
pub struct SeenKeys<K: Ord> {
    first_line: BTreeMap<K, usize>,
}

impl<K: Ord> SeenKeys<K> {
    pub fn new() -> Self {
        Self {
            first_line: BTreeMap::new(),
        }
    }

    /// Records `key` at `line`; returns the earlier line if it repeats.
    pub fn record(&mut self, key: K, line: usize) -> Option<usize> {
        match self.first_line.get(&key) {
            Some(first) => Some(*first),
            None => {
                self.first_line.insert(key, line);
                None
            }
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.first_line.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.first_line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first_line.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.first_line.keys()
    }
}
