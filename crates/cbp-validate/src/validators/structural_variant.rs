//! Structural variant files: one row per rearrangement between two sites.

use cbp_model::Finding;

use crate::base::{DataLine, FileContext, FileRules, Header, HeaderSpec, SeenKeys};
use crate::genes::{GeneColumns, resolve_gene};

const SV_STATUSES: &[&str] = &["SOMATIC", "GERMLINE"];

/// Columns that together identify a structural variant.
const KEY_COLUMNS: &[&str] = &[
    "Site1_Chromosome",
    "Site1_Position",
    "Site2_Chromosome",
    "Site2_Position",
    "Event_Info",
];

#[derive(Default)]
pub struct StructuralVariantValidator {
    sites: [GeneColumns; 2],
    seen: SeenKeys<Vec<String>>,
}

impl StructuralVariantValidator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileRules for StructuralVariantValidator {
    fn header_spec(&self, _ctx: &FileContext<'_>) -> HeaderSpec {
        HeaderSpec::required(&["Sample_Id", "SV_Status"]).with_namespaces()
    }

    fn check_header(&mut self, ctx: &mut FileContext<'_>, header: &Header) {
        for (slot, site) in [1, 2].into_iter().enumerate() {
            let hugo = format!("Site{site}_Hugo_Symbol");
            let entrez = format!("Site{site}_Entrez_Gene_Id");
            self.sites[slot] = GeneColumns::from_header(header, &hugo, &entrez);
            if self.sites[slot].is_empty() {
                ctx.push(
                    Finding::error(format!(
                        "Structural variant event requires {entrez} and/or {hugo} column"
                    ))
                    .at_line(header.line),
                );
            }
        }
    }

    fn check_line(&mut self, ctx: &mut FileContext<'_>, header: &Header, line: &DataLine<'_>) {
        let sample = line.get(header, "Sample_Id").map(str::trim).unwrap_or_default();
        if let Some(index) = header.position("Sample_Id")
            && ctx.check_sample_defined(sample, line.number, index + 1)
        {
            ctx.study.structural_variant_samples.insert(sample.to_string());
        }

        if let Some(index) = header.position("SV_Status") {
            let status = line.at(index).map(str::trim).unwrap_or_default();
            if !SV_STATUSES.contains(&status.to_ascii_uppercase().as_str()) {
                ctx.push(
                    Finding::error("SV_Status value is not 'SOMATIC' or 'GERMLINE'")
                        .at_line(line.number)
                        .at_column(index + 1)
                        .with_cause(status),
                );
            }
        }

        let mut key = vec![sample.to_string()];
        let given = self.sites.map(|columns| columns.values(&line.fields) != (None, None));
        if given == [false, false] {
            ctx.push(
                Finding::error("No Entrez gene id or gene symbol provided for site 1 and site 2")
                    .at_line(line.number),
            );
        }
        for (columns, given) in self.sites.into_iter().zip(given) {
            let gene = given
                .then(|| resolve_gene(ctx.portal, &mut ctx.sink, line.number, columns, &line.fields))
                .flatten();
            key.push(gene.unwrap_or_default());
        }
        key.extend(
            KEY_COLUMNS
                .iter()
                .map(|name| line.get(header, name).map(str::trim).unwrap_or_default().to_string()),
        );
        let identity = key.join(", ");
        if let Some(first) = self.seen.record(key, line.number) {
            ctx.push(
                Finding::error(format!(
                    "Duplicate entry in structural variant data; it was first defined on line {first}"
                ))
                .at_line(line.number)
                .with_cause(identity),
            );
        }
    }
}
