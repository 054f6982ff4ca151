//! Gene identification against the portal gene table.

use cbp_model::{Finding, GeneTable, PortalInstance};

use crate::base::Header;
use crate::sink::FileSink;

/// Positions of the gene identifier columns in a header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneColumns {
    pub hugo: Option<usize>,
    pub entrez: Option<usize>,
}

impl GeneColumns {
    pub fn from_header(header: &Header, hugo: &str, entrez: &str) -> Self {
        Self {
            hugo: header.position(hugo),
            entrez: header.position(entrez),
        }
    }

    pub fn is_empty(self) -> bool {
        self.hugo.is_none() && self.entrez.is_none()
    }

    /// Values of the identifier columns in `fields`, blanks and `NA` removed.
    pub fn values<'f>(self, fields: &[&'f str]) -> (Option<&'f str>, Option<&'f str>) {
        let pick = |index: Option<usize>| {
            index
                .and_then(|index| fields.get(index).copied())
                .map(str::trim)
                .filter(|value| !value.is_empty() && *value != "NA")
        };
        (pick(self.hugo), pick(self.entrez))
    }
}

/// Why a gene row could not be resolved cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneIssue {
    Missing,
    InvalidEntrez(String),
    UnknownEntrez(String),
    Mismatch { symbol: String, entrez: String },
    AmbiguousSymbol { symbol: String, candidates: Vec<String> },
    UnknownSymbol(String),
    AliasCollision { symbol: String },
}

/// Outcome of looking up one gene row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneResolution {
    /// Gene key (Entrez id, or the literal identifier when the portal has no
    /// gene table) plus an optional non-fatal note.
    Resolved {
        key: String,
        note: Option<GeneIssue>,
    },
    Unresolved(GeneIssue),
}

/// Resolve a gene from its symbol and/or Entrez id.
pub fn lookup_gene(
    genes: Option<&GeneTable>,
    symbol: Option<&str>,
    entrez: Option<&str>,
) -> GeneResolution {
    let Some(genes) = genes else {
        return match entrez.or(symbol) {
            Some(key) => GeneResolution::Resolved {
                key: key.to_string(),
                note: None,
            },
            None => GeneResolution::Unresolved(GeneIssue::Missing),
        };
    };

    if let Some(entrez) = entrez {
        if entrez.parse::<u64>().is_err() {
            return GeneResolution::Unresolved(GeneIssue::InvalidEntrez(entrez.to_string()));
        }
        let Some(official) = genes.symbol_of(entrez) else {
            return GeneResolution::Unresolved(GeneIssue::UnknownEntrez(entrez.to_string()));
        };
        let note = symbol
            .filter(|symbol| {
                !symbol.eq_ignore_ascii_case(official)
                    && !genes
                        .entrez_by_alias(symbol)
                        .iter()
                        .any(|id| id == entrez)
            })
            .map(|symbol| GeneIssue::Mismatch {
                symbol: symbol.to_string(),
                entrez: entrez.to_string(),
            });
        return GeneResolution::Resolved {
            key: entrez.to_string(),
            note,
        };
    }

    let Some(symbol) = symbol else {
        return GeneResolution::Unresolved(GeneIssue::Missing);
    };
    match genes.entrez_by_symbol(symbol) {
        [single] => {
            let collides = genes
                .entrez_by_alias(symbol)
                .iter()
                .any(|id| id != single);
            GeneResolution::Resolved {
                key: single.clone(),
                note: collides.then(|| GeneIssue::AliasCollision {
                    symbol: symbol.to_string(),
                }),
            }
        }
        [] => match genes.entrez_by_alias(symbol) {
            [single] => GeneResolution::Resolved {
                key: single.clone(),
                note: None,
            },
            [] => GeneResolution::Unresolved(GeneIssue::UnknownSymbol(symbol.to_string())),
            candidates => GeneResolution::Unresolved(GeneIssue::AmbiguousSymbol {
                symbol: symbol.to_string(),
                candidates: candidates.to_vec(),
            }),
        },
        candidates => GeneResolution::Unresolved(GeneIssue::AmbiguousSymbol {
            symbol: symbol.to_string(),
            candidates: candidates.to_vec(),
        }),
    }
}

/// Turn a gene issue into a finding at `line`.
pub fn report_gene_issue(
    sink: &mut FileSink<'_>,
    issue: &GeneIssue,
    line: usize,
    columns: GeneColumns,
) {
    let at = |finding: Finding, column: Option<usize>| match column {
        Some(column) => finding.at_line(line).at_column(column + 1),
        None => finding.at_line(line),
    };
    let finding = match issue {
        GeneIssue::Missing => at(
            Finding::error("No Entrez gene id or gene symbol provided for gene."),
            None,
        ),
        GeneIssue::InvalidEntrez(entrez) => at(
            Finding::error("Entrez gene id is not an integer").with_cause(entrez.as_str()),
            columns.entrez,
        ),
        GeneIssue::UnknownEntrez(entrez) => at(
            Finding::warning(
                "Entrez gene id not known to the cBioPortal instance. This record will not be loaded.",
            )
            .with_cause(entrez.as_str()),
            columns.entrez,
        ),
        GeneIssue::Mismatch { symbol, entrez } => at(
            Finding::warning(format!("Gene symbol does not match given Entrez id {entrez}"))
                .with_cause(symbol.as_str()),
            columns.hugo,
        ),
        GeneIssue::AmbiguousSymbol { symbol, candidates } => at(
            Finding::warning(format!(
                "Gene symbol maps to multiple Entrez gene ids ({}), please specify which one you mean. This record will not be loaded.",
                candidates.join("/")
            ))
            .with_cause(symbol.as_str()),
            columns.hugo,
        ),
        GeneIssue::UnknownSymbol(symbol) => at(
            Finding::warning(
                "Gene symbol not known to the cBioPortal instance. This record will not be loaded.",
            )
            .with_cause(symbol.as_str()),
            columns.hugo,
        ),
        GeneIssue::AliasCollision { symbol } => at(
            Finding::warning(
                "Gene symbol is also an alias of another gene; it is interpreted as the official symbol",
            )
            .with_cause(symbol.as_str()),
            columns.hugo,
        ),
    };
    sink.push(finding);
}

/// Look up and report in one go; returns the gene key when the row can be
/// loaded.
pub fn resolve_gene(
    portal: &PortalInstance,
    sink: &mut FileSink<'_>,
    line: usize,
    columns: GeneColumns,
    fields: &[&str],
) -> Option<String> {
    let (symbol, entrez) = columns.values(fields);
    match lookup_gene(portal.genes.as_ref(), symbol, entrez) {
        GeneResolution::Resolved { key, note } => {
            if let Some(issue) = note {
                report_gene_issue(sink, &issue, line, columns);
            }
            Some(key)
        }
        GeneResolution::Unresolved(issue) => {
            report_gene_issue(sink, &issue, line, columns);
            None
        }
    }
}
