//! Feature-by-sample matrices: discrete and continuous copy number,
//! expression, methylation, protein levels and GSVA scores/p-values.

use cbp_model::Finding;

use crate::base::{DataLine, FileContext, FileRules, Header, HeaderSpec, SeenKeys};
use crate::genes::{GeneColumns, resolve_gene};
use crate::values::{has_whitespace, is_numeric_null, parse_float};

/// Discrete copy-number calls accepted by the portal.
pub const DISCRETE_CNA_VALUES: &[&str] = &["-2", "-1.5", "-1", "0", "1", "2", "NA"];

const GENE_COLUMNS: &[&str] = &["Hugo_Symbol", "Entrez_Gene_Id"];
const IGNORED_COLUMNS: &[&str] = &["Cytoband"];
const RPPA_ID_COLUMN: &str = "Composite.Element.REF";
const GENESET_ID_COLUMN: &str = "geneset_id";

pub const GSVA_ROW_MISMATCH: &str = "Gene sets column in score and p-value file are not equal. The same set of gene sets should be used in the score and p-value files for this study. Please ensure that all gene set id's of one file are present in the other gene set data file.";

/// Error for a cell that is not a discrete copy-number call.
pub fn discrete_cna_error(value: &str) -> Option<Finding> {
    if value.trim().is_empty() {
        Some(Finding::error("Empty cell in discrete CNA file"))
    } else if !DISCRETE_CNA_VALUES.contains(&value) {
        Some(
            Finding::error(format!(
                "Invalid CNA value: possible values are [{}]",
                DISCRETE_CNA_VALUES.join(", ")
            ))
            .with_cause(value),
        )
    } else {
        None
    }
}

/// Cell semantics of a matrix file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    CnaDiscrete,
    Continuous,
    Rppa,
    GsvaScore,
    GsvaPvalue,
}

impl MatrixKind {
    fn is_gsva(self) -> bool {
        matches!(self, Self::GsvaScore | Self::GsvaPvalue)
    }
}

pub struct MatrixValidator {
    kind: MatrixKind,
    genes: GeneColumns,
    first_sample: usize,
    seen_rows: SeenKeys<String>,
    row_ids: Vec<String>,
}

impl MatrixValidator {
    pub fn new(kind: MatrixKind) -> Self {
        Self {
            kind,
            genes: GeneColumns::default(),
            first_sample: 0,
            seen_rows: SeenKeys::new(),
            row_ids: Vec::new(),
        }
    }

    /// Key of the row's feature, or `None` when it cannot be identified.
    fn row_key(&mut self, ctx: &mut FileContext<'_>, line: &DataLine<'_>) -> Option<String> {
        match self.kind {
            MatrixKind::Rppa => self.antibody_key(ctx, line),
            MatrixKind::GsvaScore | MatrixKind::GsvaPvalue => {
                let id = line.at(0).map(str::trim).unwrap_or_default();
                if id.is_empty() {
                    ctx.push(
                        Finding::error("Missing gene set id")
                            .at_line(line.number)
                            .at_column(1),
                    );
                    return None;
                }
                Some(id.to_string())
            }
            MatrixKind::CnaDiscrete | MatrixKind::Continuous => {
                resolve_gene(ctx.portal, &mut ctx.sink, line.number, self.genes, &line.fields)
            }
        }
    }

    fn antibody_key(&mut self, ctx: &mut FileContext<'_>, line: &DataLine<'_>) -> Option<String> {
        let value = line.at(0).map(str::trim).unwrap_or_default();
        let Some((genes, antibody)) = value.split_once('|') else {
            ctx.push(
                Finding::error("Composite.Element.REF should have the form GENE|ANTIBODY")
                    .at_line(line.number)
                    .at_column(1)
                    .with_cause(value),
            );
            return None;
        };
        for symbol in genes.split_whitespace() {
            if symbol == "NA" {
                ctx.push(
                    Finding::warning(
                        "Gene symbol NA in Composite.Element.REF; the antibody will be loaded without a gene",
                    )
                    .at_line(line.number)
                    .at_column(1)
                    .with_cause(value),
                );
                continue;
            }
            let columns = GeneColumns {
                hugo: Some(0),
                entrez: None,
            };
            resolve_gene(ctx.portal, &mut ctx.sink, line.number, columns, &[symbol]);
        }
        Some(antibody.trim().to_string())
    }

    fn check_cell(&self, ctx: &mut FileContext<'_>, value: &str, line: usize, column: usize) {
        let at = |finding: Finding| finding.at_line(line).at_column(column);
        match self.kind {
            MatrixKind::CnaDiscrete => {
                if let Some(finding) = discrete_cna_error(value) {
                    ctx.push(at(finding));
                }
            }
            MatrixKind::Continuous | MatrixKind::Rppa => {
                if !is_numeric_null(value) && parse_float(value).is_none() {
                    ctx.push(at(Finding::error("Value is neither a real number nor NA")).with_cause(value));
                }
            }
            MatrixKind::GsvaScore | MatrixKind::GsvaPvalue => {
                if value.trim() == "NA" {
                    return;
                }
                let (low, high) = if self.kind == MatrixKind::GsvaScore {
                    (-1.0, 1.0)
                } else {
                    (0.0, 1.0)
                };
                match parse_float(value) {
                    Some(number) if (low..=high).contains(&number) => {}
                    Some(_) => ctx.push(
                        at(Finding::error(format!(
                            "Value is not within the allowed range [{low}, {high}]"
                        )))
                        .with_cause(value),
                    ),
                    None => ctx.push(
                        at(Finding::error("Value is neither a real number nor NA")).with_cause(value),
                    ),
                }
            }
        }
    }
}

impl FileRules for MatrixValidator {
    fn header_spec(&self, _ctx: &FileContext<'_>) -> HeaderSpec {
        match self.kind {
            MatrixKind::Rppa => HeaderSpec::ordered(&[RPPA_ID_COLUMN]),
            MatrixKind::GsvaScore | MatrixKind::GsvaPvalue => {
                HeaderSpec::ordered(&[GENESET_ID_COLUMN])
            }
            MatrixKind::CnaDiscrete | MatrixKind::Continuous => HeaderSpec::default(),
        }
    }

    fn check_header(&mut self, ctx: &mut FileContext<'_>, header: &Header) {
        let leading: &[&str] = match self.kind {
            MatrixKind::Rppa => &[RPPA_ID_COLUMN],
            MatrixKind::GsvaScore | MatrixKind::GsvaPvalue => &[GENESET_ID_COLUMN],
            MatrixKind::CnaDiscrete | MatrixKind::Continuous => {
                self.genes = GeneColumns::from_header(header, "Hugo_Symbol", "Entrez_Gene_Id");
                if self.genes.is_empty() {
                    ctx.push(
                        Finding::error(
                            "Hugo_Symbol or Entrez_Gene_Id column needs to be present in the file.",
                        )
                        .at_line(header.line),
                    );
                } else if self.genes.entrez.is_none() {
                    ctx.push(
                        Finding::warning(
                            "The recommended column Entrez_Gene_Id was not found. Using Hugo_Symbol for all gene parsing.",
                        )
                        .at_line(header.line),
                    );
                }
                &[]
            }
        };
        self.first_sample = header
            .columns
            .iter()
            .position(|column| {
                !leading.contains(&column.as_str())
                    && !GENE_COLUMNS.contains(&column.as_str())
                    && !IGNORED_COLUMNS.contains(&column.as_str())
            })
            .unwrap_or(header.len());

        for (index, sample) in header.columns.iter().enumerate().skip(self.first_sample) {
            if sample.is_empty() {
                continue;
            }
            if has_whitespace(sample) {
                ctx.push(
                    Finding::error("White space in SAMPLE_ID is not supported")
                        .at_line(header.line)
                        .at_column(index + 1)
                        .with_cause(sample.as_str()),
                );
                continue;
            }
            ctx.check_sample_defined(sample, header.line, index + 1);
        }

        if self.kind.is_gsva() {
            let mismatch = ctx
                .study
                .gsva
                .header
                .as_ref()
                .map(|previous| *previous != header.columns);
            match mismatch {
                Some(true) => ctx.push(
                    Finding::error(
                        "The headers of the GSVA score and p-value files are different; they should list the same samples in the same order",
                    )
                    .at_line(header.line),
                ),
                Some(false) => {}
                None => ctx.study.gsva.header = Some(header.columns.clone()),
            }
        }
    }

    fn check_line(&mut self, ctx: &mut FileContext<'_>, _header: &Header, line: &DataLine<'_>) {
        let key = self.row_key(ctx, line);
        if let Some(key) = key {
            if self.kind.is_gsva() {
                self.row_ids.push(key.clone());
            }
            if let Some(first) = self.seen_rows.record(key.clone(), line.number) {
                ctx.push(
                    Finding::warning(format!(
                        "Duplicate feature found; it was first defined on line {first}. This row will be skipped"
                    ))
                    .at_line(line.number)
                    .with_cause(key),
                );
                return;
            }
        }
        for (index, value) in line.fields.iter().enumerate().skip(self.first_sample) {
            self.check_cell(ctx, value, line.number, index + 1);
        }
    }

    fn finish(&mut self, ctx: &mut FileContext<'_>, _header: &Header) {
        if !self.kind.is_gsva() {
            return;
        }
        let mut ids = self.row_ids.clone();
        ids.sort();
        ids.dedup();
        let mismatch = ctx
            .study
            .gsva
            .geneset_ids
            .as_ref()
            .map(|previous| *previous != ids);
        match mismatch {
            Some(true) => ctx.push(Finding::error(GSVA_ROW_MISMATCH)),
            Some(false) => {}
            None => ctx.study.gsva.geneset_ids = Some(ids),
        }
    }
}
