//! Aggregated GISTIC genes files (`GISTIC_GENES_AMP` / `GISTIC_GENES_DEL`).

use std::sync::LazyLock;

use regex::Regex;

use cbp_model::Finding;
use cbp_reference::normalize_chromosome;

use crate::base::{DataLine, FileContext, FileRules, Header, HeaderSpec};
use crate::genes::{GeneColumns, GeneResolution, lookup_gene, report_gene_issue};
use crate::values::{parse_float, parse_int};

const COLUMNS: &[&str] = &[
    "chromosome",
    "peak_start",
    "peak_end",
    "genes_in_region",
    "amp",
    "cytoband",
    "q_value",
];

/// Chromosome part and arm of a cytoband such as `1p36.13` or `Xq21`.
static CYTOBAND_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:chr)?([0-9]*|X|Y)([pq])").expect("Invalid cytoband regex")
});

pub struct GisticValidator {
    amplification: bool,
}

impl GisticValidator {
    pub fn new(amplification: bool) -> Self {
        Self { amplification }
    }

    fn check_cytoband(
        &self,
        ctx: &mut FileContext<'_>,
        line: &DataLine<'_>,
        chromosome: Option<String>,
        (index, cytoband): (usize, &str),
    ) {
        let at = |finding: Finding| {
            finding
                .at_line(line.number)
                .at_column(index + 1)
        };
        let Some(captures) = CYTOBAND_REGEX.captures(cytoband) else {
            ctx.push(at(Finding::error("Cytoband does not specify a chromosome arm (p or q)")).with_cause(cytoband));
            return;
        };
        let band_chromosome = &captures[1];
        if band_chromosome.is_empty() {
            ctx.push(at(Finding::error("Cytoband does not specify a chromosome")).with_cause(cytoband));
            return;
        }
        if let Some(chromosome) = chromosome
            && normalize_chromosome(band_chromosome) != chromosome
        {
            ctx.push(
                at(Finding::error("Cytoband and chromosome specifications do not match"))
                    .with_cause(format!("({cytoband}, {chromosome})")),
            );
        }
    }

    fn check_genes(&self, ctx: &mut FileContext<'_>, line: &DataLine<'_>, (index, genes): (usize, &str)) {
        let at = |finding: Finding| finding.at_line(line.number).at_column(index + 1);
        if genes.trim().is_empty() {
            ctx.push(at(Finding::warning("No genes listed in GISTIC peak region")).with_cause(genes));
            return;
        }
        let columns = GeneColumns {
            hugo: Some(index),
            entrez: None,
        };
        for gene in genes.split(',') {
            let symbol = gene.trim().trim_start_matches('[').trim_end_matches(']');
            if symbol.is_empty() {
                ctx.push(at(Finding::warning("Blank gene in GISTIC gene list")).with_cause(symbol));
                continue;
            }
            if let GeneResolution::Unresolved(issue) | GeneResolution::Resolved { note: Some(issue), .. } =
                lookup_gene(ctx.portal.genes.as_ref(), Some(symbol), None)
            {
                report_gene_issue(&mut ctx.sink, &issue, line.number, columns);
            }
        }
    }
}

impl FileRules for GisticValidator {
    fn header_spec(&self, _ctx: &FileContext<'_>) -> HeaderSpec {
        HeaderSpec::required(COLUMNS)
    }

    fn check_line(&mut self, ctx: &mut FileContext<'_>, header: &Header, line: &DataLine<'_>) {
        let cell = |name: &str| {
            header
                .position(name)
                .and_then(|index| line.at(index).map(|value| (index, value.trim())))
        };
        let error = |message: &str, index: usize, cause: &str| {
            Finding::error(message)
                .at_line(line.number)
                .at_column(index + 1)
                .with_cause(cause)
        };

        if let Some((index, amp)) = cell("amp") {
            let expected = if self.amplification { "1" } else { "0" };
            if amp != expected {
                let kind = if self.amplification {
                    "GISTIC_GENES_AMP"
                } else {
                    "GISTIC_GENES_DEL"
                };
                ctx.push(error(
                    &format!("'amp' column must be {expected} in {kind} files"),
                    index,
                    amp,
                ));
            }
        }

        let mut chromosome = None;
        if let Some((index, value)) = cell("chromosome") {
            if value.is_empty() {
                ctx.push(error("Chromosome is missing", index, value));
            } else {
                chromosome = Some(normalize_chromosome(value));
            }
        }
        if let Some(cytoband) = cell("cytoband") {
            self.check_cytoband(ctx, line, chromosome, cytoband);
        }

        if let Some((index, value)) = cell("q_value") {
            match parse_float(value) {
                Some(q) if (0.0..=1.0).contains(&q) => {}
                Some(_) => ctx.push(error("q_value is not between 0 and 1", index, value)),
                None => ctx.push(error("q_value is not a real number", index, value)),
            }
        }

        let mut bounds = [None, None];
        for (slot, name) in ["peak_start", "peak_end"].into_iter().enumerate() {
            if let Some((index, value)) = cell(name) {
                bounds[slot] = parse_int(value);
                if bounds[slot].is_none() {
                    ctx.push(error(&format!("{name} is not an integer"), index, value));
                }
            }
        }
        if let [Some(start), Some(end)] = bounds {
            let start_index = header.position("peak_start").unwrap_or_default();
            if start > end {
                ctx.push(error(
                    "Start position of peak is not lower than its end position",
                    start_index,
                    &format!("{start}-{end}"),
                ));
            } else if start == end {
                ctx.push(
                    Finding::warning("Peak region is zero bases long")
                        .at_line(line.number)
                        .at_column(start_index + 1)
                        .with_cause(format!("{start}-{end}")),
                );
            }
        }

        if let Some(genes) = cell("genes_in_region") {
            self.check_genes(ctx, line, genes);
        }
    }
}
