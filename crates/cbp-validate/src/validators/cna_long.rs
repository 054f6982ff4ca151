//! Long-format discrete copy-number files: one row per (gene, sample) call.

use std::collections::BTreeMap;

use cbp_model::Finding;

use crate::base::{DataLine, FileContext, FileRules, Header, HeaderSpec};
use crate::genes::{GeneColumns, resolve_gene};
use crate::validators::driver::DriverColumns;
use crate::validators::matrix::discrete_cna_error;

const SAMPLE_COLUMN: &str = "Sample_Id";
const VALUE_COLUMN: &str = "Value";

/// Identifiers a call was given with, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GivenGene {
    hugo: Option<String>,
    entrez: Option<String>,
}

#[derive(Default)]
pub struct CnaLongValidator {
    genes: GeneColumns,
    drivers: DriverColumns,
    /// (sample, gene key) to the identifiers first seen for it.
    calls: BTreeMap<(String, String), GivenGene>,
}

impl CnaLongValidator {
    pub fn new() -> Self {
        Self::default()
    }

    fn duplicate_message(first: &GivenGene, again: &GivenGene) -> &'static str {
        if first == again {
            "Duplicated gene found within the same sample."
        } else if first.hugo.is_some() && again.hugo.is_some() && first.hugo != again.hugo {
            "Two different Hugo Symbols that map to the same Entrez Gene Id found within the same sample."
        } else {
            "Duplicated Entrez Gene Id found within the same sample."
        }
    }
}

impl FileRules for CnaLongValidator {
    fn header_spec(&self, _ctx: &FileContext<'_>) -> HeaderSpec {
        HeaderSpec::required(&[SAMPLE_COLUMN, VALUE_COLUMN]).with_namespaces()
    }

    fn check_header(&mut self, ctx: &mut FileContext<'_>, header: &Header) {
        self.genes = GeneColumns::from_header(header, "Hugo_Symbol", "Entrez_Gene_Id");
        if self.genes.is_empty() {
            ctx.push(
                Finding::error("Hugo_Symbol or Entrez_Gene_Id column needs to be present in the file.")
                    .at_line(header.line),
            );
        }
        self.drivers.check_header(ctx, header);
    }

    fn check_line(&mut self, ctx: &mut FileContext<'_>, header: &Header, line: &DataLine<'_>) {
        let sample = line.get(header, SAMPLE_COLUMN).map(str::trim).unwrap_or_default();
        if let Some(index) = header.position(SAMPLE_COLUMN) {
            ctx.check_sample_defined(sample, line.number, index + 1);
        }

        if let Some(index) = header.position(VALUE_COLUMN)
            && let Some(finding) = discrete_cna_error(line.at(index).unwrap_or_default())
        {
            ctx.push(finding.at_line(line.number).at_column(index + 1));
        }

        self.drivers.check_line(ctx, line);

        let (hugo, entrez) = self.genes.values(&line.fields);
        let given = GivenGene {
            hugo: hugo.map(str::to_string),
            entrez: entrez.map(str::to_string),
        };
        let Some(key) = resolve_gene(ctx.portal, &mut ctx.sink, line.number, self.genes, &line.fields)
        else {
            return;
        };
        let call = (sample.to_string(), key);
        match self.calls.get(&call) {
            Some(first) => {
                let message = Self::duplicate_message(first, &given);
                ctx.push(
                    Finding::error(message)
                        .at_line(line.number)
                        .with_cause(format!("({}, {})", call.0, call.1)),
                );
            }
            None => {
                self.calls.insert(call, given);
            }
        }
    }

    fn finish(&mut self, ctx: &mut FileContext<'_>, _header: &Header) {
        self.drivers.finish(ctx);
    }
}
