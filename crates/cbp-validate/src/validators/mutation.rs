//! Mutation annotation format (MAF) files.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use cbp_model::{Finding, Severity};

use crate::base::{DataLine, FileContext, FileRules, Header, HeaderSpec, SeenKeys};
use crate::genes::{GeneColumns, GeneResolution, lookup_gene, report_gene_issue};
use crate::validators::driver::DriverColumns;
use crate::values::parse_int;

const VARIANT_CLASSIFICATIONS: &[&str] = &[
    "Frame_Shift_Del",
    "Frame_Shift_Ins",
    "In_Frame_Del",
    "In_Frame_Ins",
    "Missense_Mutation",
    "Nonsense_Mutation",
    "Silent",
    "Splice_Site",
    "Translation_Start_Site",
    "Nonstop_Mutation",
    "3'UTR",
    "3'Flank",
    "5'UTR",
    "5'Flank",
    "IGR",
    "Intron",
    "RNA",
    "Targeted_Region",
    "De_novo_Start_InFrame",
    "De_novo_Start_OutOfFrame",
    "Splice_Region",
    "Fusion",
    "Unknown",
];

const MUTATION_STATUSES: &[&str] = &[
    "none",
    "germline",
    "somatic",
    "loh",
    "post-transcriptional modification",
    "unknown",
    "wildtype",
];

/// `Mutation_Status` values whose rows are not loaded.
const UNLOADED_STATUSES: &[&str] = &["none", "loh", "wildtype"];

const VALIDATION_STATUSES: &[&str] = &["untested", "inconclusive", "valid", "invalid", "na", ""];
const VERIFICATION_STATUSES: &[&str] = &["verified", "unknown", "na", ""];

const ALLELE_COLUMNS: &[&str] = &[
    "Reference_Allele",
    "Tumor_Seq_Allele1",
    "Tumor_Seq_Allele2",
    "Match_Norm_Seq_Allele1",
    "Match_Norm_Seq_Allele2",
];

const VALIDATION_ALLELE_COLUMNS: &[&str] = &[
    "Tumor_Validation_Allele1",
    "Tumor_Validation_Allele2",
    "Match_Norm_Validation_Allele1",
    "Match_Norm_Validation_Allele2",
];

static SWISSPROT_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z0-9]{1,5}_[A-Z0-9]{1,5}$").expect("Invalid SWISSPROT name regex")
});

static SWISSPROT_ACCESSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([OPQ][0-9][A-Z0-9]{3}[0-9]|[A-NR-Z][0-9]([A-Z][A-Z0-9]{2}[0-9]){1,2})$")
        .expect("Invalid SWISSPROT accession regex")
});

static PROTEIN_CHANGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(p\.)?\(?([A-Za-z*?]{1,3}\d+[A-Za-z0-9*_=?>]*|=|\?|0|MUTATED)\)?$")
        .expect("Invalid protein change regex")
});

/// How SWISSPROT values identify a protein.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SwissprotType {
    Name,
    Accession,
}

impl SwissprotType {
    fn matches(self, value: &str) -> bool {
        match self {
            Self::Name => SWISSPROT_NAME_REGEX.is_match(value),
            Self::Accession => SWISSPROT_ACCESSION_REGEX.is_match(value),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Accession => "accession",
        }
    }
}

pub struct MutationValidator {
    genes: GeneColumns,
    drivers: DriverColumns,
    swissprot: SwissprotType,
    normal_samples: Option<BTreeSet<String>>,
    seen_mutations: SeenKeys<Vec<String>>,
}

impl MutationValidator {
    pub fn new() -> Self {
        Self {
            genes: GeneColumns::default(),
            drivers: DriverColumns::default(),
            swissprot: SwissprotType::Name,
            normal_samples: None,
            seen_mutations: SeenKeys::new(),
        }
    }

    fn classification_severity(&self, ctx: &FileContext<'_>) -> Severity {
        if ctx.options.strict_maf_checks {
            Severity::Error
        } else {
            Severity::Warning
        }
    }

    /// Returns `false` when the row is filtered out and needs no further checks.
    fn check_classification(
        &self,
        ctx: &mut FileContext<'_>,
        header: &Header,
        line: &DataLine<'_>,
    ) -> bool {
        let Some(index) = header.position("Variant_Classification") else {
            return true;
        };
        let value = line.at(index).map(str::trim).unwrap_or_default();
        let at = |finding: Finding| {
            finding
                .at_line(line.number)
                .at_column(index + 1)
                .with_cause(value)
        };
        if value.is_empty() {
            ctx.push(at(Finding::error("Value in Variant_Classification column is invalid")));
            return true;
        }
        if !VARIANT_CLASSIFICATIONS.contains(&value) {
            let severity = self.classification_severity(ctx);
            ctx.push(at(Finding::new(
                severity,
                "Given value for Variant_Classification column is not one of the expected values",
            )));
        }
        if ctx.options.skips_classification(value) {
            ctx.push(at(Finding::info(
                "Line will not be loaded due to the variant classification filter",
            )));
            return false;
        }
        true
    }

    /// Returns `false` when the row is filtered out.
    fn check_mutation_status(
        &self,
        ctx: &mut FileContext<'_>,
        header: &Header,
        line: &DataLine<'_>,
    ) -> bool {
        let Some(index) = header.position("Mutation_Status") else {
            return true;
        };
        let value = line.at(index).map(str::trim).unwrap_or_default();
        let lower = value.to_ascii_lowercase();
        let at = |finding: Finding| {
            finding
                .at_line(line.number)
                .at_column(index + 1)
                .with_cause(value)
        };
        if !lower.is_empty() && !MUTATION_STATUSES.contains(&lower.as_str()) {
            ctx.push(at(Finding::warning("Mutation_Status value is not in MAF format")));
        }
        if lower == "germline" {
            ctx.push(at(Finding::warning(
                "GERMLINE variant identified from the Mutation_Status value. If this variant is not meant for public release, please remove it.",
            )));
        }
        if UNLOADED_STATUSES.contains(&lower.as_str()) {
            ctx.push(at(Finding::info(
                "Mutation will not be loaded due to value in Mutation_Status",
            )));
            return false;
        }
        true
    }

    /// Gene key of the row, or `None` when the row cannot be loaded.
    fn check_gene(&self, ctx: &mut FileContext<'_>, line: &DataLine<'_>) -> Option<String> {
        let (symbol, entrez) = self.genes.values(&line.fields);
        let entrez = entrez.filter(|id| *id != "0");
        if symbol == Some("Unknown") && entrez.is_none() {
            ctx.push(
                Finding::warning(
                    "Gene specification (Hugo_Symbol 'Unknown', Entrez_Gene_Id 0) indicates an intergenic region",
                )
                .at_line(line.number),
            );
            ctx.push(
                Finding::info("This line will not be loaded because the gene is unknown")
                    .at_line(line.number),
            );
            return None;
        }
        match lookup_gene(ctx.portal.genes.as_ref(), symbol, entrez) {
            GeneResolution::Resolved { key, note } => {
                if let Some(issue) = note {
                    report_gene_issue(&mut ctx.sink, &issue, line.number, self.genes);
                }
                Some(key)
            }
            GeneResolution::Unresolved(issue) => {
                report_gene_issue(&mut ctx.sink, &issue, line.number, self.genes);
                None
            }
        }
    }

    fn check_alleles(&self, ctx: &mut FileContext<'_>, header: &Header, line: &DataLine<'_>) {
        for name in ALLELE_COLUMNS {
            let Some(index) = header.position(name) else {
                continue;
            };
            let value = line.at(index).map(str::trim).unwrap_or_default();
            if value.is_empty() || value == "NA" {
                continue;
            }
            if !is_allele(value) {
                ctx.push(
                    Finding::error(format!("Allele Based column {name} contains invalid character."))
                        .at_line(line.number)
                        .at_column(index + 1)
                        .with_cause(value),
                );
            }
        }
    }

    fn check_positions(
        &self,
        ctx: &mut FileContext<'_>,
        header: &Header,
        line: &DataLine<'_>,
    ) -> Option<(i64, i64)> {
        let mut positions = [None, None];
        for (slot, name) in ["Start_Position", "End_Position"].iter().enumerate() {
            let Some(index) = header.position(name) else {
                continue;
            };
            let value = line.at(index).map(str::trim).unwrap_or_default();
            match parse_int(value) {
                Some(position) => positions[slot] = Some(position),
                None if value.is_empty() || value == "NA" => {}
                None => ctx.push(
                    Finding::error(format!("{name} is not an integer"))
                        .at_line(line.number)
                        .at_column(index + 1)
                        .with_cause(value),
                ),
            }
        }
        let (start, end) = (positions[0]?, positions[1]?);
        if start > end {
            ctx.push(
                Finding::error("Start_Position should be smaller than or equal to End_Position.")
                    .at_line(line.number)
                    .with_cause(format!("{start} > {end}")),
            );
        }
        Some((start, end))
    }

    fn check_variant_type(
        &self,
        ctx: &mut FileContext<'_>,
        header: &Header,
        line: &DataLine<'_>,
        positions: Option<(i64, i64)>,
    ) {
        let Some(index) = header.position("Variant_Type") else {
            return;
        };
        let variant_type = line.at(index).map(str::trim).unwrap_or_default();
        if variant_type.is_empty() || variant_type == "NA" {
            return;
        }
        if !matches!(variant_type, "INS" | "DEL" | "SNP" | "DNP" | "TNP" | "ONP") {
            ctx.push(
                Finding::warning("Variant_Type value is not one of SNP, DNP, TNP, ONP, INS, DEL")
                    .at_line(line.number)
                    .at_column(index + 1)
                    .with_cause(variant_type),
            );
            return;
        }
        let reference = allele(header, line, "Reference_Allele");
        let tumor = [
            allele(header, line, "Tumor_Seq_Allele1"),
            allele(header, line, "Tumor_Seq_Allele2"),
        ];
        let reference_length = reference.map(str::len);
        let tumor_lengths: Vec<usize> = tumor.iter().flatten().map(|value| value.len()).collect();
        let mut error = |message: String| {
            ctx.push(
                Finding::error(message)
                    .at_line(line.number)
                    .at_column(index + 1)
                    .with_cause(variant_type),
            );
        };

        match variant_type {
            "INS" => {
                if let Some((start, end)) = positions {
                    let difference = end - start;
                    let spans_reference = reference_length
                        .and_then(|length| i64::try_from(length).ok())
                        .is_some_and(|length| length == difference);
                    if difference != 1 && !spans_reference {
                        error(
                            "Variant_Type indicates insertion, but difference in Start_Position and End_Position does not equal to 1 or the length or the Reference_Allele."
                                .into(),
                        );
                    }
                }
                if let Some(length) = reference_length
                    && tumor_lengths.iter().any(|tumor| length > *tumor)
                {
                    error(
                        "Variant_Type indicates insertion, but length of Reference_Allele is bigger than the length of the Tumor_Seq_Allele1 and/or 2 and therefore indicates deletion."
                            .into(),
                    );
                }
            }
            "DEL" => {
                if let (Some((start, end)), Some(length)) = (positions, reference_length)
                    && i64::try_from(length).ok() != Some(end - start + 1)
                {
                    error(
                        "Variant_Type indicates deletion, but the difference between Start_Position and End_Position are not equal to the length of the Reference_Allele."
                            .into(),
                    );
                }
                if let Some(length) = reference_length
                    && tumor_lengths.iter().any(|tumor| length < *tumor)
                {
                    error(
                        "Variant_Type indicates deletion, but length of Reference_Allele is smaller than the length of Tumor_Seq_Allele1 and/or Tumor_Seq_Allele2, indicating an insertion."
                            .into(),
                    );
                }
            }
            "ONP" => {
                let mut lengths = reference_length
                    .into_iter()
                    .chain(tumor_lengths.iter().copied());
                let consistent = match lengths.next() {
                    Some(first) => first > 3 && lengths.all(|length| length == first),
                    None => true,
                };
                if !consistent {
                    error(
                        "Variant_Type indicates a ONP, but length of Reference_Allele, Tumor_Seq_Allele1 and 2 are not bigger than 3 or are of unequal lengths."
                            .into(),
                    );
                }
            }
            _ => {
                let expected = match variant_type {
                    "SNP" => 1,
                    "DNP" => 2,
                    _ => 3,
                };
                let alleles: Vec<&str> = reference
                    .into_iter()
                    .chain(tumor.into_iter().flatten())
                    .collect();
                if alleles.iter().any(|allele| allele.len() != expected) {
                    error(format!(
                        "Variant_Type indicates a {variant_type}, but length of Reference_Allele, Tumor_Seq_Allele1 and/or Tumor_Seq_Allele2 do not equal {expected}."
                    ));
                }
                if alleles.iter().any(|allele| allele.contains('-')) {
                    error(format!(
                        "Variant_Type indicates a {variant_type}, but Reference_Allele, Tumor_Seq_Allele1 and/or Tumor_Seq_Allele2 contain deletion (-)."
                    ));
                }
            }
        }
    }

    fn check_validation(&self, ctx: &mut FileContext<'_>, header: &Header, line: &DataLine<'_>) {
        for (column, allowed) in [
            ("Validation_Status", VALIDATION_STATUSES),
            ("Verification_Status", VERIFICATION_STATUSES),
        ] {
            if let Some(index) = header.position(column) {
                let found = line.at(index).map(str::trim).unwrap_or_default();
                if !allowed.contains(&found.to_ascii_lowercase().as_str()) {
                    ctx.push(
                        Finding::warning(format!("Value in '{column}' not in MAF format"))
                            .at_line(line.number)
                            .at_column(index + 1)
                            .with_cause(found),
                    );
                }
            }
        }

        let Some(status) = allele(header, line, "Validation_Status") else {
            return;
        };
        let status = status.to_ascii_lowercase();
        let filled: Vec<&str> = VALIDATION_ALLELE_COLUMNS
            .iter()
            .copied()
            .filter(|name| allele(header, line, name).is_some())
            .collect();
        let at = |finding: Finding| finding.at_line(line.number).with_cause(status.as_str());

        if status != "valid" && status != "invalid" {
            if !filled.is_empty() {
                ctx.push(at(Finding::error(format!(
                    "Validation allele columns are filled in ({}), but Validation_Status is not Valid or Invalid",
                    filled.join(", ")
                ))));
            }
            return;
        }
        let has_allele_columns = VALIDATION_ALLELE_COLUMNS
            .iter()
            .any(|name| header.contains(name));
        if filled.is_empty() {
            if has_allele_columns {
                ctx.push(at(Finding::error(format!(
                    "Validation Status is {status}, but Validation Allele columns are empty."
                ))));
            }
            return;
        }
        if filled
            .iter()
            .filter_map(|name| allele(header, line, name))
            .any(|value| !is_allele(value))
        {
            ctx.push(at(Finding::error(
                "At least one of the Validation Allele Based columns (Tumor_Validation_Allele1, Tumor_Validation_Allele2, Match_Norm_Validation_Allele1, Match_Norm_Validation_Allele2) contains invalid character.",
            )));
            return;
        }

        let tumor = (
            allele(header, line, "Tumor_Validation_Allele1"),
            allele(header, line, "Tumor_Validation_Allele2"),
        );
        let normal = (
            allele(header, line, "Match_Norm_Validation_Allele1"),
            allele(header, line, "Match_Norm_Validation_Allele2"),
        );
        if status == "invalid" && tumor != normal {
            ctx.push(at(Finding::error(
                "When Validation_Status is invalid the Tumor_Validation_Allele and Match_Norm_Validation_Allele columns should be equal.",
            )));
        }
        if allele(header, line, "Validation_Method")
            .is_none_or(|method| method.eq_ignore_ascii_case("none"))
        {
            ctx.push(at(Finding::error(format!(
                "Validation Status is {status}, but Validation_Method is not defined."
            ))));
        }
        if status != "valid" {
            return;
        }
        let mutation_status = allele(header, line, "Mutation_Status")
            .unwrap_or_default()
            .to_ascii_lowercase();
        let reference = allele(header, line, "Reference_Allele");
        match mutation_status.as_str() {
            "germline" if tumor != normal => ctx.push(at(Finding::error(
                "When Validation_Status is valid and Mutation_Status is Germline, the Tumor_Validation_Allele should be equal to the Match_Norm_Validation_Allele.",
            ))),
            "somatic" => {
                let normal_is_reference = normal.0 == reference && normal.1 == reference;
                let tumor_differs = tumor.0 != reference || tumor.1 != reference;
                if !(normal_is_reference && tumor_differs) {
                    ctx.push(at(Finding::error(
                        "When Validation_Status is valid and Mutation_Status is Somatic, the Match_Norm_Validation_Allele columns should be equal to the Reference Allele and one of the Tumor_Validation_Allele columns should not be.",
                    )));
                }
            }
            _ => {}
        }
    }

    fn check_protein_change(&self, ctx: &mut FileContext<'_>, header: &Header, line: &DataLine<'_>) {
        let columns = ["HGVSp_Short", "Amino_Acid_Change"];
        let found = columns.iter().find_map(|name| {
            let index = header.position(name)?;
            let value = line.at(index).map(str::trim)?;
            (!is_null_protein_change(value)).then_some((index, value))
        });
        let Some((index, value)) = found else {
            if columns.iter().any(|name| header.contains(name)) {
                ctx.push(
                    Finding::warning(
                        "No Amino_Acid_Change or HGVSp_Short value. This mutation record will get a generic \"MUTATED\" flag",
                    )
                    .at_line(line.number),
                );
            }
            return;
        };
        let message = if value.contains('[') || value.contains(']') {
            Some("Allele notation with brackets is not supported for protein changes")
        } else if value.contains(';') {
            Some("Multiple protein changes separated by ';' are not supported, only one p. change per row")
        } else if value.contains(',') {
            Some("Haplotype notation with comma separated protein changes is not supported")
        } else if !PROTEIN_CHANGE_REGEX.is_match(value) {
            Some("Protein change is not a single HGVS-like amino acid change")
        } else {
            None
        };
        if let Some(message) = message {
            ctx.push(
                Finding::error(message)
                    .at_line(line.number)
                    .at_column(index + 1)
                    .with_cause(value),
            );
        }
    }

    fn check_swissprot(&self, ctx: &mut FileContext<'_>, header: &Header, line: &DataLine<'_>) {
        let Some(index) = header.position("SWISSPROT") else {
            return;
        };
        let value = line.at(index).map(str::trim).unwrap_or_default();
        if value.is_empty() || value == "NA" {
            return;
        }
        let kind = self.swissprot;
        let parts: Vec<&str> = value.split(',').map(str::trim).collect();
        let message = if !parts.iter().all(|part| kind.matches(part)) {
            format!("SWISSPROT value is not a UniProtKB/Swiss-Prot {}", kind.label())
        } else if parts.len() > 1 {
            format!(
                "SWISSPROT value lists more than one UniProtKB/Swiss-Prot {}; only one per row is supported",
                kind.label()
            )
        } else {
            return;
        };
        ctx.push(
            Finding::warning(message)
                .at_line(line.number)
                .at_column(index + 1)
                .with_cause(value),
        );
    }

    fn check_normal_sample(&self, ctx: &mut FileContext<'_>, header: &Header, line: &DataLine<'_>) {
        let (Some(allowed), Some(index)) =
            (&self.normal_samples, header.position("Matched_Norm_Sample_Barcode"))
        else {
            return;
        };
        let value = line.at(index).map(str::trim).unwrap_or_default();
        if !value.is_empty() && !allowed.contains(value) {
            ctx.push(
                Finding::error(
                    "Normal sample id not in list of sample ids configured in corresponding metafile",
                )
                .at_line(line.number)
                .at_column(index + 1)
                .with_cause(value),
            );
        }
    }
}

impl Default for MutationValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// The allele that differs from the reference: `Tumor_Seq_Allele1` unless it
/// equals `Reference_Allele`.
fn tumor_allele<'l>(header: &Header, line: &DataLine<'l>) -> Option<&'l str> {
    let reference = line.get(header, "Reference_Allele").map(str::trim);
    let first = line
        .get(header, "Tumor_Seq_Allele1")
        .map(str::trim)
        .filter(|allele| !allele.is_empty());
    let second = line.get(header, "Tumor_Seq_Allele2").map(str::trim);
    match first {
        Some(allele) if Some(allele) != reference => Some(allele),
        _ => second.or(first),
    }
}

/// Raw protein change of the row, `HGVSp_Short` preferred.
fn protein_change<'l>(header: &Header, line: &DataLine<'l>) -> &'l str {
    line.get(header, "HGVSp_Short")
        .or_else(|| line.get(header, "Amino_Acid_Change"))
        .map(str::trim)
        .unwrap_or_default()
}

/// Trimmed cell of `name`, blanks and `NA` removed.
fn allele<'l>(header: &Header, line: &DataLine<'l>, name: &str) -> Option<&'l str> {
    line.get(header, name)
        .map(str::trim)
        .filter(|value| !value.is_empty() && *value != "NA")
}

fn is_allele(value: &str) -> bool {
    value
        .chars()
        .all(|c| matches!(c.to_ascii_uppercase(), 'A' | 'C' | 'G' | 'T' | 'N' | '-'))
}

fn is_null_protein_change(value: &str) -> bool {
    matches!(value, "" | "NA" | "NULL")
}

impl FileRules for MutationValidator {
    fn header_spec(&self, _ctx: &FileContext<'_>) -> HeaderSpec {
        HeaderSpec::required(&["Tumor_Sample_Barcode", "Variant_Classification"]).with_namespaces()
    }

    fn check_header(&mut self, ctx: &mut FileContext<'_>, header: &Header) {
        self.genes = GeneColumns::from_header(header, "Hugo_Symbol", "Entrez_Gene_Id");
        if self.genes.is_empty() {
            ctx.push(
                Finding::error("Hugo_Symbol or Entrez_Gene_Id column needs to be present in the file.")
                    .at_line(header.line),
            );
        }
        if !header.contains("HGVSp_Short") && !header.contains("Amino_Acid_Change") {
            ctx.push(
                Finding::error("At least one of the columns HGVSp_Short or Amino_Acid_Change needs to be present")
                    .at_line(header.line),
            );
        }
        if !header.contains("SWISSPROT") {
            let severity = self.classification_severity(ctx);
            ctx.push(
                Finding::new(
                    severity,
                    "Including the SWISSPROT column is recommended to make sure that the UniProt canonical isoform is used when drawing Pfam domains in the mutations view",
                )
                .at_line(header.line),
            );
        }
        self.swissprot = match ctx.meta.get("swissprot_identifier") {
            Some("accession") => SwissprotType::Accession,
            Some(_) => SwissprotType::Name,
            None => {
                if header.contains("SWISSPROT") {
                    ctx.push(Finding::warning(
                        "No swissprot_identifier defined in the meta file; SWISSPROT values are expected to be UniProtKB/Swiss-Prot names",
                    ));
                }
                SwissprotType::Name
            }
        };
        self.normal_samples = ctx.meta.get("normal_samples_list").map(|list| {
            list.split(',')
                .map(|sample| sample.trim().to_string())
                .filter(|sample| !sample.is_empty())
                .collect()
        });
        self.drivers.check_header(ctx, header);
    }

    fn check_line(&mut self, ctx: &mut FileContext<'_>, header: &Header, line: &DataLine<'_>) {
        let sample_index = header.position("Tumor_Sample_Barcode");
        let sample = sample_index
            .and_then(|index| line.at(index))
            .map(str::trim)
            .unwrap_or_default();
        if let Some(index) = sample_index
            && ctx.check_sample_defined(sample, line.number, index + 1)
        {
            ctx.study.mutation_samples.insert(sample.to_string());
        }

        if !self.check_classification(ctx, header, line) {
            return;
        }
        if !self.check_mutation_status(ctx, header, line) {
            return;
        }
        let gene = self.check_gene(ctx, line);
        self.check_alleles(ctx, header, line);
        let positions = self.check_positions(ctx, header, line);
        self.check_variant_type(ctx, header, line, positions);
        self.check_validation(ctx, header, line);
        self.check_protein_change(ctx, header, line);
        self.check_swissprot(ctx, header, line);
        self.check_normal_sample(ctx, header, line);
        self.drivers.check_line(ctx, line);

        if let Some(gene) = gene {
            let field = |name: &str| line.get(header, name).map(str::trim).unwrap_or_default().to_string();
            let identity = vec![
                gene,
                field("Chromosome"),
                field("Start_Position"),
                field("End_Position"),
                field("Variant_Classification"),
                tumor_allele(header, line).unwrap_or_default().to_string(),
                protein_change(header, line).to_string(),
                sample.to_string(),
            ];
            let quoted: Vec<String> = identity.iter().map(|part| format!("'{part}'")).collect();
            if self.seen_mutations.record(identity, line.number).is_some() {
                ctx.push(
                    Finding::error(format!("Duplicate mutation found: ({})", quoted.join(", ")))
                        .at_line(line.number),
                );
            }
        }
    }

    fn finish(&mut self, ctx: &mut FileContext<'_>, _header: &Header) {
        self.drivers.finish(ctx);
    }
}
