//! Driver annotations for discrete copy-number calls, referenced from a CNA
//! meta file by `pd_annotations_filename`.

use cbp_model::Finding;

use crate::base::{DataLine, FileContext, FileRules, Header, HeaderSpec};
use crate::genes::{GeneColumns, resolve_gene};
use crate::validators::driver::DriverColumns;

const SAMPLE_COLUMN: &str = "SAMPLE_ID";

#[derive(Default)]
pub struct PdAnnotationsValidator {
    genes: GeneColumns,
    drivers: DriverColumns,
}

impl PdAnnotationsValidator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileRules for PdAnnotationsValidator {
    fn header_spec(&self, _ctx: &FileContext<'_>) -> HeaderSpec {
        HeaderSpec::required(&[SAMPLE_COLUMN])
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
        if let Some(index) = header.position(SAMPLE_COLUMN) {
            let sample = line.at(index).map(str::trim).unwrap_or_default();
            ctx.check_sample_defined(sample, line.number, index + 1);
        }
        self.drivers.check_line(ctx, line);
        resolve_gene(ctx.portal, &mut ctx.sink, line.number, self.genes, &line.fields);
    }

    fn finish(&mut self, ctx: &mut FileContext<'_>, _header: &Header) {
        self.drivers.finish(ctx);
    }
}
