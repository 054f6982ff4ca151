//! Copy-number segment (`.seg`) files.

use cbp_model::Finding;
use cbp_reference::{ChromosomeLengths, normalize_chromosome};

use crate::base::{DataLine, FileContext, FileRules, Header, HeaderSpec};
use crate::values::{is_numeric_null, parse_float, parse_int};

const COLUMNS: &[&str] = &["ID", "chrom", "loc.start", "loc.end", "num.mark", "seg.mean"];

#[derive(Default)]
pub struct SegmentValidator {
    lengths: ChromosomeLengths,
}

impl SegmentValidator {
    pub fn new() -> Self {
        Self::default()
    }

    fn build(ctx: &FileContext<'_>) -> String {
        ctx.meta
            .get("reference_genome_id")
            .map(str::to_string)
            .or_else(|| ctx.study.reference_genome.clone())
            .unwrap_or_else(|| ctx.options.reference_genome.clone())
    }
}

impl FileRules for SegmentValidator {
    fn header_spec(&self, _ctx: &FileContext<'_>) -> HeaderSpec {
        HeaderSpec::ordered(COLUMNS)
    }

    fn check_header(&mut self, ctx: &mut FileContext<'_>, header: &Header) {
        let build = Self::build(ctx);
        let source = ctx.chromosomes;
        match ctx.study.chromosome_lengths(&build, source) {
            Ok(lengths) => self.lengths = lengths.clone(),
            Err(error) => ctx.push(
                Finding::error(format!(
                    "Could not retrieve chromosome lengths for reference genome {build}: {error}"
                ))
                .at_line(header.line),
            ),
        }
    }

    fn check_line(&mut self, ctx: &mut FileContext<'_>, _header: &Header, line: &DataLine<'_>) {
        let cell = |index: usize| line.at(index).map(str::trim).unwrap_or_default();
        let error = |message: String, column: usize, cause: &str| {
            Finding::error(message)
                .at_line(line.number)
                .at_column(column)
                .with_cause(cause)
        };

        ctx.check_sample_defined(cell(0), line.number, 1);

        let chromosome = normalize_chromosome(cell(1));
        let length = self.lengths.length_of(&chromosome);
        if length.is_none() {
            ctx.push(error("Unknown chromosome".into(), 2, cell(1)));
        }

        let start = parse_int(cell(2));
        if start.is_none() {
            ctx.push(error("Segment start is not an integer".into(), 3, cell(2)));
        }
        let end = parse_int(cell(3));
        if end.is_none() {
            ctx.push(error("Segment end is not an integer".into(), 4, cell(3)));
        }
        if !is_numeric_null(cell(4)) && parse_int(cell(4)).is_none() {
            ctx.push(error("Number of markers is not an integer".into(), 5, cell(4)));
        }
        if parse_float(cell(5)).is_none() {
            ctx.push(error("Segment mean is not a real number".into(), 6, cell(5)));
        }

        let (Some(start), Some(end)) = (start, end) else {
            return;
        };
        if start > end {
            ctx.push(error(
                "Start position of segment is greater than end position".into(),
                3,
                cell(2),
            ));
        } else if start == end {
            ctx.push(
                Finding::warning("Start position of segment equals end position (zero-length segment)")
                    .at_line(line.number)
                    .at_column(3)
                    .with_cause(cell(2)),
            );
        }
        if let Some(length) = length {
            let range = format!("chr{chromosome}:0-{length}");
            if start < 0 {
                ctx.push(error(
                    format!("Genomic position beyond start of chromosome ({range})"),
                    3,
                    cell(2),
                ));
            }
            if u64::try_from(end).is_ok_and(|end| end > length) {
                ctx.push(error(
                    format!("Genomic position beyond end of chromosome ({range})"),
                    4,
                    cell(3),
                ));
            }
        }
    }
}
