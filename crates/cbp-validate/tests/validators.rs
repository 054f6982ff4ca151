//! Tests for individual data file validators, run through the shared
//! header/line machinery.

use std::collections::BTreeMap;

use cbp_ingest::TextFile;
use cbp_model::{Finding, GeneTable, MetaDescriptor, MetaFileType, PortalInstance, Severity};
use cbp_reference::{ChromosomeLengths, InMemoryChromosomes};
use cbp_validate::validators::{ClinicalLevel, GenericAssayKind, MatrixKind};
use cbp_validate::{
    FileContext, FileOutcome, FileSink, FindingSink, ResourceKind, StudyContext,
    ValidationOptions, ValidatorKind, run_data_file,
};

struct Fixture {
    portal: PortalInstance,
    options: ValidationOptions,
    chromosomes: InMemoryChromosomes,
    study: StudyContext,
}

impl Fixture {
    fn new() -> Self {
        Self {
            portal: PortalInstance::with_checks(),
            options: ValidationOptions::default(),
            chromosomes: InMemoryChromosomes::new().with_build(
                "hg19",
                ChromosomeLengths::from_pairs([("chr1", 249_250_621), ("chr19", 59_128_983)]),
            ),
            study: StudyContext::for_data_directory(),
        }
    }

    fn with_samples(mut self, samples: &[(&str, &str)]) -> Self {
        self.study.samples = Some(
            samples
                .iter()
                .map(|(sample, patient)| ((*sample).to_string(), (*patient).to_string()))
                .collect::<BTreeMap<_, _>>(),
        );
        self
    }

    fn run(
        &mut self,
        kind: ValidatorKind,
        meta: &[(&str, &str)],
        text: &str,
    ) -> (FileOutcome, Vec<Finding>) {
        let meta = MetaDescriptor::from_pairs("meta_test.txt", meta.iter().copied());
        let mut sink = FindingSink::new();
        let outcome = {
            let mut ctx = FileContext {
                portal: &self.portal,
                options: &self.options,
                meta: &meta,
                study: &mut self.study,
                chromosomes: &self.chromosomes,
                sink: FileSink::new("data_test.txt", &mut sink),
            };
            let mut rules = kind.build();
            run_data_file(rules.as_mut(), &mut ctx, &TextFile::from_text(text))
        };
        (outcome, sink.into_findings())
    }
}

fn problems(findings: &[Finding]) -> Vec<&Finding> {
    findings
        .iter()
        .filter(|finding| finding.severity >= Severity::Warning)
        .collect()
}

/// Line and message of every WARNING and ERROR, in report order.
fn reported(findings: &[Finding]) -> Vec<(Option<usize>, &str)> {
    problems(findings)
        .into_iter()
        .map(|finding| (finding.line, finding.message.as_str()))
        .collect()
}

fn errors(findings: &[Finding]) -> Vec<(Option<usize>, &str)> {
    findings
        .iter()
        .filter(|finding| finding.severity == Severity::Error)
        .map(|finding| (finding.line, finding.message.as_str()))
        .collect()
}

/// Tab-separated text from `|`-separated rows.
fn tsv(rows: &[&str]) -> String {
    rows.iter()
        .map(|row| format!("{}\n", row.replace('|', "\t")))
        .collect()
}

// --- header machinery ---

#[test]
fn missing_required_column_abandons_the_file() {
    let mut fixture = Fixture::new();
    let (outcome, findings) = fixture.run(
        ValidatorKind::Timeline,
        &[],
        "PATIENT_ID\tSTART_DATE\tSTOP_DATE\n\
         P-1\t0\t10\n",
    );

    assert_eq!(outcome, FileOutcome::Unparseable);
    let problems = problems(&findings);
    assert_eq!(problems.len(), 2, "{problems:?}");
    assert_eq!(problems[0].message, "Missing column: EVENT_TYPE");
    assert_eq!(problems[0].cause.as_deref(), Some("EVENT_TYPE"));
    assert_eq!(
        problems[1].message,
        "Invalid column header, file cannot be parsed"
    );
}

#[test]
fn relaxed_mode_keeps_reading_after_a_bad_header() {
    let mut fixture = Fixture::new();
    fixture.options = ValidationOptions::default().with_relaxed_mode(true);
    let (outcome, _) = fixture.run(
        ValidatorKind::Timeline,
        &[],
        "PATIENT_ID\tSTART_DATE\tSTOP_DATE\n\
         P-1\t0\t10\n",
    );

    assert_eq!(outcome, FileOutcome::Parsed { data_lines: 1 });
}

#[test]
fn quoted_cells_and_short_rows_are_errors() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::Timeline,
        &[],
        "PATIENT_ID\tSTART_DATE\tSTOP_DATE\tEVENT_TYPE\n\
         \"P-1\"\t0\t10\tTREATMENT\n\
         P-2\t0\n",
    );

    let problems = problems(&findings);
    assert_eq!(problems.len(), 2, "{problems:?}");
    assert_eq!(problems[0].message, "Found quotation marks around field(s)");
    assert_eq!((problems[0].line, problems[0].column), (Some(2), Some(1)));
    assert_eq!(
        problems[1].message,
        "Expected 4 columns based on header, found 2"
    );
    assert_eq!(problems[1].line, Some(3));
}

// --- timeline ---

#[test]
fn timeline_dates_must_be_integers() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::Timeline,
        &[],
        "PATIENT_ID\tSTART_DATE\tSTOP_DATE\tEVENT_TYPE\n\
         P-1\t0\t\tSPECIMEN\n\
         P-1\tday 3\t12.5\tTREATMENT\n",
    );

    let problems = problems(&findings);
    assert_eq!(problems.len(), 2, "{problems:?}");
    assert_eq!(problems[0].message, "Invalid START_DATE");
    assert_eq!(problems[0].cause.as_deref(), Some("day 3"));
    assert_eq!(problems[1].message, "Invalid STOP_DATE");
    assert_eq!(problems[1].column, Some(3));
}

#[test]
fn timeline_patient_must_be_defined() {
    let mut fixture = Fixture::new().with_samples(&[("S-1", "P-1")]);
    let (_, findings) = fixture.run(
        ValidatorKind::Timeline,
        &[],
        "PATIENT_ID\tSTART_DATE\tSTOP_DATE\tEVENT_TYPE\n\
         P-1\t0\t\tSPECIMEN\n\
         P-9\t0\t\tSPECIMEN\n",
    );

    let problems = problems(&findings);
    assert_eq!(problems.len(), 1, "{problems:?}");
    assert_eq!(problems[0].message, "Patient ID not defined in clinical file");
    assert_eq!(problems[0].cause.as_deref(), Some("P-9"));
}

// --- matrices ---

#[test]
fn discrete_cna_rejects_values_outside_the_call_set() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::Matrix(MatrixKind::CnaDiscrete),
        &[],
        "Hugo_Symbol\tEntrez_Gene_Id\tS-1\tS-2\tS-3\n\
         BRCA1\t672\t-1.5\t[Not Available]\t2\n\
         TP53\t7157\tNA\t0\t1.5\n",
    );

    let causes: Vec<(Option<usize>, Option<usize>, &str)> = problems(&findings)
        .iter()
        .map(|finding| {
            (
                finding.line,
                finding.column,
                finding.cause.as_deref().unwrap_or_default(),
            )
        })
        .collect();
    assert_eq!(
        causes,
        [
            (Some(2), Some(4), "[Not Available]"),
            (Some(3), Some(5), "1.5"),
        ]
    );
}

#[test]
fn gsva_scores_must_lie_within_unit_range() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::Matrix(MatrixKind::GsvaScore),
        &[],
        "geneset_id\tS-1\tS-2\n\
         GO_ATP_DEPENDENT\t-0.98\t2.371393691351566\n\
         GO_ACYLGLYCEROL\tNA\t1.5\n",
    );

    let problems = problems(&findings);
    assert_eq!(problems.len(), 2, "{problems:?}");
    assert_eq!((problems[0].line, problems[0].column), (Some(2), Some(3)));
    assert_eq!(problems[0].cause.as_deref(), Some("2.371393691351566"));
    assert_eq!((problems[1].line, problems[1].column), (Some(3), Some(3)));
    assert_eq!(problems[1].cause.as_deref(), Some("1.5"));
}

#[test]
fn matrix_sample_columns_must_be_defined() {
    let mut fixture = Fixture::new().with_samples(&[("S-1", "P-1")]);
    let (_, findings) = fixture.run(
        ValidatorKind::Matrix(MatrixKind::Continuous),
        &[],
        "Hugo_Symbol\tEntrez_Gene_Id\tS-1\tS-2\n\
         BRCA1\t672\t0.5\tNA\n",
    );

    let problems = problems(&findings);
    assert_eq!(problems.len(), 2, "{problems:?}");
    assert_eq!(problems[0].message, "Sample ID not defined in clinical file");
    assert_eq!((problems[0].line, problems[0].column), (Some(1), Some(4)));
    assert_eq!(
        problems[1].message,
        "Invalid column header, file cannot be parsed"
    );
}

// --- segments ---

#[test]
fn segment_end_beyond_chromosome_cites_the_valid_range() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::Segment,
        &[("reference_genome_id", "hg19")],
        "ID\tchrom\tloc.start\tloc.end\tnum.mark\tseg.mean\n\
         S-1\tchr19\t100\t63811651\t12\t0.25\n",
    );

    let problems = problems(&findings);
    assert_eq!(problems.len(), 1, "{problems:?}");
    assert_eq!(
        problems[0].message,
        "Genomic position beyond end of chromosome (chr19:0-59128983)"
    );
    assert_eq!(problems[0].cause.as_deref(), Some("63811651"));
}

#[test]
fn segment_start_after_end_is_an_error_and_equal_is_a_warning() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::Segment,
        &[],
        "ID\tchrom\tloc.start\tloc.end\tnum.mark\tseg.mean\n\
         S-1\t1\t500\t400\t3\t-0.1\n\
         S-1\t1\t700\t700\t1\t0.3\n",
    );

    let problems = problems(&findings);
    assert_eq!(problems.len(), 2, "{problems:?}");
    assert_eq!(problems[0].severity, Severity::Error);
    assert_eq!(problems[0].line, Some(2));
    assert_eq!(problems[1].severity, Severity::Warning);
    assert_eq!(problems[1].line, Some(3));
}

// --- clinical ---

#[test]
fn sample_file_defines_samples_for_later_files() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::Clinical(ClinicalLevel::Sample),
        &[],
        "#Patient Identifier\tSample Identifier\tAge\n\
         #Patient\tSample\tAge at diagnosis\n\
         #STRING\tSTRING\tNUMBER\n\
         #1\t1\t1\n\
         PATIENT_ID\tSAMPLE_ID\tAGE\n\
         P-1\tS-1\t52\n\
         P-2\tS-2\tfifty\n",
    );

    let problems = problems(&findings);
    assert_eq!(problems.len(), 1, "{problems:?}");
    assert_eq!(problems[0].cause.as_deref(), Some("fifty"));
    assert_eq!(fixture.study.sample_defined("S-2"), Some(true));
    assert_eq!(fixture.study.patient_defined("P-1"), Some(true));
    assert_eq!(fixture.study.sample_defined("S-3"), Some(false));
}

// --- gene panel matrix ---

#[test]
fn unknown_gene_panels_are_errors() {
    let mut fixture = Fixture::new().with_samples(&[("S-1", "P-1"), ("S-2", "P-2")]);
    fixture.portal = PortalInstance::with_checks().with_gene_panels(["IMPACT341".to_string()]);
    let (_, findings) = fixture.run(
        ValidatorKind::GenePanelMatrix,
        &[],
        "SAMPLE_ID\tmutations\n\
         S-1\tIMPACT341\n\
         S-2\tIMPACT999\n",
    );

    let problems = problems(&findings);
    assert_eq!(problems.len(), 1, "{problems:?}");
    assert_eq!(problems[0].cause.as_deref(), Some("IMPACT999"));
    assert_eq!(problems[0].column, Some(2));
}

// --- cancer types ---

#[test]
fn cancer_type_defined_twice_is_an_error() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::CancerType,
        &[],
        "luad\tLung Adenocarcinoma\tGainsboro\ttissue\n\
         luad\tLung Adenocarcinoma\tGainsboro\ttissue\n",
    );

    let problems = problems(&findings);
    assert_eq!(problems.len(), 1, "{problems:?}");
    assert_eq!(
        problems[0].message,
        "Cancer type defined a second time in the file (first defined on line 1)"
    );
    assert!(fixture.study.defines_cancer_type("luad"));
}

// --- headings and gene identifiers ---

#[test]
fn blank_heading_keeps_its_whitespace_as_cause() {
    let mut fixture = Fixture::new();
    let (outcome, findings) = fixture.run(
        ValidatorKind::Matrix(MatrixKind::CnaDiscrete),
        &[],
        "Hugo_Symbol\tEntrez_Gene_Id\t  \tS-1\n\
         BRCA1\t672\t0\t0\n",
    );

    assert_eq!(outcome, FileOutcome::Unparseable);
    let problems = problems(&findings);
    assert_eq!(problems.len(), 3, "{problems:?}");
    assert_eq!(problems[0].message, "Blank column name in header");
    assert_eq!(problems[0].column, Some(3));
    assert_eq!(problems[0].cause.as_deref(), Some("  "));
    assert_eq!(problems[1].message, "White space in SAMPLE_ID is not supported");
    assert_eq!(problems[1].cause.as_deref(), Some("  "));
    assert_eq!(
        problems[2].message,
        "Invalid column header, file cannot be parsed"
    );
}

#[test]
fn symbol_not_matching_entrez_id_is_reported_with_the_symbol() {
    let mut genes = GeneTable::new();
    genes.insert_gene("672", "BRCA1");
    genes.insert_gene("7157", "TP53");
    let mut fixture = Fixture::new();
    fixture.portal = PortalInstance::with_checks().with_genes(genes);
    let (_, findings) = fixture.run(
        ValidatorKind::Matrix(MatrixKind::CnaDiscrete),
        &[],
        "Hugo_Symbol\tEntrez_Gene_Id\tS-1\n\
         XXBRCA1\t672\t0\n\
         TP53\t7157\t-1\n",
    );

    let problems = problems(&findings);
    assert_eq!(problems.len(), 1, "{problems:?}");
    assert_eq!(problems[0].severity, Severity::Warning);
    assert_eq!(
        problems[0].message,
        "Gene symbol does not match given Entrez id 672"
    );
    assert_eq!((problems[0].line, problems[0].column), (Some(2), Some(1)));
    assert_eq!(problems[0].cause.as_deref(), Some("XXBRCA1"));
}

// --- gsva ---

#[test]
fn gsva_pair_must_share_the_header() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::Matrix(MatrixKind::GsvaScore),
        &[],
        "geneset_id\tS-1\tS-2\n\
         GO_A\t-0.5\t0.5\n",
    );
    assert!(problems(&findings).is_empty(), "{findings:?}");

    let (outcome, findings) = fixture.run(
        ValidatorKind::Matrix(MatrixKind::GsvaPvalue),
        &[],
        "geneset_id\tS-2\tS-1\n\
         GO_A\t0.01\t0.2\n",
    );

    assert_eq!(outcome, FileOutcome::Unparseable);
    assert_eq!(
        reported(&findings),
        [
            (
                Some(1),
                "The headers of the GSVA score and p-value files are different; they should list the same samples in the same order"
            ),
            (None, "Invalid column header, file cannot be parsed"),
        ]
    );
}

#[test]
fn gsva_pvalues_share_rows_and_lie_within_unit_interval() {
    let mut fixture = Fixture::new();
    fixture.run(
        ValidatorKind::Matrix(MatrixKind::GsvaScore),
        &[],
        "geneset_id\tS-1\tS-2\n\
         GO_A\t-0.5\t0.5\n\
         GO_B\t0.1\tNA\n",
    );

    let (_, findings) = fixture.run(
        ValidatorKind::Matrix(MatrixKind::GsvaPvalue),
        &[],
        "geneset_id\tS-1\tS-2\n\
         GO_A\t0.01\t1.5\n\
         GO_C\t-0.1\t0.2\n",
    );

    let problems = problems(&findings);
    assert_eq!(problems.len(), 3, "{problems:?}");
    assert_eq!(problems[0].message, "Value is not within the allowed range [0, 1]");
    assert_eq!((problems[0].line, problems[0].column), (Some(2), Some(3)));
    assert_eq!(problems[0].cause.as_deref(), Some("1.5"));
    assert_eq!((problems[1].line, problems[1].column), (Some(3), Some(2)));
    assert_eq!(problems[1].cause.as_deref(), Some("-0.1"));
    assert!(problems[2].message.starts_with("Gene sets column in score and p-value file are not equal"));
    assert_eq!(problems[2].line, None);
}

// --- mutations ---

const MAF_HEADER: &str = "Hugo_Symbol|Entrez_Gene_Id|Chromosome|Start_Position|End_Position|Variant_Classification|Variant_Type|Reference_Allele|Tumor_Seq_Allele1|Tumor_Seq_Allele2|Tumor_Sample_Barcode|HGVSp_Short|SWISSPROT";

const VALIDATION_HEADER: &str = "Hugo_Symbol|Entrez_Gene_Id|Chromosome|Start_Position|End_Position|Variant_Classification|Variant_Type|Reference_Allele|Tumor_Seq_Allele1|Tumor_Seq_Allele2|Tumor_Sample_Barcode|HGVSp_Short|SWISSPROT|Mutation_Status|Validation_Status|Validation_Method|Tumor_Validation_Allele1|Tumor_Validation_Allele2|Match_Norm_Validation_Allele1|Match_Norm_Validation_Allele2";

const SWISSPROT_NAMES: &[(&str, &str)] = &[("swissprot_identifier", "name")];

#[test]
fn variant_type_must_agree_with_alleles_and_positions() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::Mutation,
        SWISSPROT_NAMES,
        &tsv(&[
            MAF_HEADER,
            "TP53|7157|17|100|101|Frame_Shift_Ins|INS|A|A|AT|S-1|p.R175fs|P53_HUMAN",
            "TP53|7157|17|200|201|Frame_Shift_Del|DEL|AT|AT|A|S-1|p.R176fs|P53_HUMAN",
            "TP53|7157|17|300|300|Missense_Mutation|SNP|-|-|G|S-1|p.R177H|P53_HUMAN",
            "TP53|7157|17|400|404|Missense_Mutation|ONP|ACGTA|ACGTA|TTTTTTTT|S-1|p.R178H|P53_HUMAN",
            "TP53|7157|17|500|510|Frame_Shift_Ins|INS|-|-|AT|S-1|p.R179fs|P53_HUMAN",
            "TP53|7157|17|600|602|Frame_Shift_Del|DEL|AT|AT|-|S-1|p.R180fs|P53_HUMAN",
            "TP53|7157|17|700|701|Missense_Mutation|DNP|AC|AC|G|S-1|p.R181H|P53_HUMAN",
            "TP53|7157|17|900|800|Missense_Mutation|SNP|A|A|G|S-1|p.R182H|P53_HUMAN",
            "TP53|7157|17|1000|1001|Frame_Shift_Ins|INS|AT|AT|A|S-1|p.R183fs|P53_HUMAN",
            "TP53|7157|17|1100|1100|Frame_Shift_Del|DEL|A|A|AT|S-1|p.R184fs|P53_HUMAN",
        ]),
    );

    assert_eq!(
        reported(&findings),
        [
            (
                Some(4),
                "Variant_Type indicates a SNP, but Reference_Allele, Tumor_Seq_Allele1 and/or Tumor_Seq_Allele2 contain deletion (-)."
            ),
            (
                Some(5),
                "Variant_Type indicates a ONP, but length of Reference_Allele, Tumor_Seq_Allele1 and 2 are not bigger than 3 or are of unequal lengths."
            ),
            (
                Some(6),
                "Variant_Type indicates insertion, but difference in Start_Position and End_Position does not equal to 1 or the length or the Reference_Allele."
            ),
            (
                Some(7),
                "Variant_Type indicates deletion, but the difference between Start_Position and End_Position are not equal to the length of the Reference_Allele."
            ),
            (
                Some(8),
                "Variant_Type indicates a DNP, but length of Reference_Allele, Tumor_Seq_Allele1 and/or Tumor_Seq_Allele2 do not equal 2."
            ),
            (
                Some(9),
                "Start_Position should be smaller than or equal to End_Position."
            ),
            (
                Some(10),
                "Variant_Type indicates insertion, but length of Reference_Allele is bigger than the length of the Tumor_Seq_Allele1 and/or 2 and therefore indicates deletion."
            ),
            (
                Some(11),
                "Variant_Type indicates deletion, but length of Reference_Allele is smaller than the length of Tumor_Seq_Allele1 and/or Tumor_Seq_Allele2, indicating an insertion."
            ),
        ]
    );
    let problems = problems(&findings);
    assert_eq!(problems[0].column, Some(7));
    assert_eq!(problems[0].cause.as_deref(), Some("SNP"));
    assert_eq!(problems[5].column, None);
    assert_eq!(problems[5].cause.as_deref(), Some("900 > 800"));
}

#[test]
fn duplicate_mutations_cite_their_identity() {
    let row = "CHD1L|9557|1|146728217|146728217|Splice_Site|SNP|G|G|A|TCGA-A1-A0SB-01|p.X165_splice|CHD1L_HUMAN";
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::Mutation,
        SWISSPROT_NAMES,
        &tsv(&[MAF_HEADER, row, row]),
    );

    assert_eq!(
        reported(&findings),
        [(
            Some(3),
            "Duplicate mutation found: ('9557', '1', '146728217', '146728217', 'Splice_Site', 'A', 'p.X165_splice', 'TCGA-A1-A0SB-01')"
        )]
    );
}

#[test]
fn validation_status_governs_validation_alleles() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::Mutation,
        SWISSPROT_NAMES,
        &tsv(&[
            VALIDATION_HEADER,
            "TP53|7157|17|100|100|Missense_Mutation|SNP|A|A|G|S-1|p.R175H|P53_HUMAN|Somatic|Valid|Sanger||||",
            "TP53|7157|17|200|200|Missense_Mutation|SNP|A|A|G|S-1|p.R176H|P53_HUMAN|Somatic|Valid|Sanger|A|X|A|A",
            "TP53|7157|17|300|300|Missense_Mutation|SNP|A|A|G|S-1|p.R177H|P53_HUMAN|Somatic|Invalid|Sanger|A|G|A|A",
            "TP53|7157|17|400|400|Missense_Mutation|SNP|A|A|G|S-1|p.R178H|P53_HUMAN|Somatic|Invalid||A|A|A|A",
            "TP53|7157|17|500|500|Missense_Mutation|SNP|A|A|G|S-1|p.R179H|P53_HUMAN|Germline|Valid|Sanger|A|G|A|A",
            "TP53|7157|17|600|600|Missense_Mutation|SNP|A|A|G|S-1|p.R180H|P53_HUMAN|Somatic|Valid|Sanger|A|G|A|G",
            "TP53|7157|17|700|700|Missense_Mutation|SNP|A|A|G|S-1|p.R181H|P53_HUMAN|Somatic|Valid|Sanger|A|G|A|A",
            "TP53|7157|17|800|800|Missense_Mutation|SNP|A|A|G|S-1|p.R182H|P53_HUMAN|Somatic|Invalid|Sanger|A||A|",
            "TP53|7157|17|900|900|Missense_Mutation|SNP|A|A|G|S-1|p.R183H|P53_HUMAN|Somatic|Untested||G|||",
        ]),
    );

    assert_eq!(
        errors(&findings),
        [
            (
                Some(2),
                "Validation Status is valid, but Validation Allele columns are empty."
            ),
            (
                Some(3),
                "At least one of the Validation Allele Based columns (Tumor_Validation_Allele1, Tumor_Validation_Allele2, Match_Norm_Validation_Allele1, Match_Norm_Validation_Allele2) contains invalid character."
            ),
            (
                Some(4),
                "When Validation_Status is invalid the Tumor_Validation_Allele and Match_Norm_Validation_Allele columns should be equal."
            ),
            (
                Some(5),
                "Validation Status is invalid, but Validation_Method is not defined."
            ),
            (
                Some(6),
                "When Validation_Status is valid and Mutation_Status is Germline, the Tumor_Validation_Allele should be equal to the Match_Norm_Validation_Allele."
            ),
            (
                Some(7),
                "When Validation_Status is valid and Mutation_Status is Somatic, the Match_Norm_Validation_Allele columns should be equal to the Reference Allele and one of the Tumor_Validation_Allele columns should not be."
            ),
            (
                Some(10),
                "Validation allele columns are filled in (Tumor_Validation_Allele1), but Validation_Status is not Valid or Invalid"
            ),
        ]
    );
}

#[test]
fn germline_rows_are_flagged_one_by_one() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::Mutation,
        SWISSPROT_NAMES,
        &tsv(&[
            VALIDATION_HEADER,
            "TP53|7157|17|100|100|Missense_Mutation|SNP|A|A|G|S-1|p.R175H|P53_HUMAN|Somatic||||||",
            "TP53|7157|17|200|200|Missense_Mutation|SNP|A|A|G|S-1|p.R176H|P53_HUMAN|Germline||||||",
            "TP53|7157|17|300|300|Missense_Mutation|SNP|A|A|G|S-1|p.R177H|P53_HUMAN|None||||||",
            "TP53|7157|17|400|400|Missense_Mutation|SNP|A|A|G|S-1|p.R178H|P53_HUMAN|Tumor||||||",
        ]),
    );

    let problems = problems(&findings);
    assert_eq!(problems.len(), 2, "{problems:?}");
    assert_eq!(
        problems[0].message,
        "GERMLINE variant identified from the Mutation_Status value. If this variant is not meant for public release, please remove it."
    );
    assert_eq!(problems[0].severity, Severity::Warning);
    assert_eq!((problems[0].line, problems[0].column), (Some(3), Some(14)));
    assert_eq!(problems[0].cause.as_deref(), Some("Germline"));
    assert_eq!(problems[1].message, "Mutation_Status value is not in MAF format");
    assert_eq!(problems[1].line, Some(5));
    assert!(findings.iter().any(|finding| {
        finding.severity == Severity::Info
            && finding.line == Some(4)
            && finding.message == "Mutation will not be loaded due to value in Mutation_Status"
    }));
}

#[test]
fn swissprot_values_default_to_names() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::Mutation,
        &[],
        &tsv(&[
            MAF_HEADER,
            "TP53|7157|17|100|100|Missense_Mutation|SNP|A|A|G|S-1|p.R175H|P53_HUMAN",
            "TP53|7157|17|200|200|Missense_Mutation|SNP|A|A|G|S-1|p.R176H|P04637",
            "TP53|7157|17|300|300|Missense_Mutation|SNP|A|A|G|S-1|p.R177H|A1CF_HUMAN,Q9NQ94",
            "TP53|7157|17|400|400|Missense_Mutation|SNP|A|A|G|S-1|p.R178H|P53_HUMAN,HBB_YEAST",
        ]),
    );

    assert_eq!(
        reported(&findings),
        [
            (
                None,
                "No swissprot_identifier defined in the meta file; SWISSPROT values are expected to be UniProtKB/Swiss-Prot names"
            ),
            (Some(3), "SWISSPROT value is not a UniProtKB/Swiss-Prot name"),
            (Some(4), "SWISSPROT value is not a UniProtKB/Swiss-Prot name"),
            (
                Some(5),
                "SWISSPROT value lists more than one UniProtKB/Swiss-Prot name; only one per row is supported"
            ),
        ]
    );
    let problems = problems(&findings);
    assert_eq!(problems[1].severity, Severity::Warning);
    assert_eq!(problems[1].column, Some(13));
    assert_eq!(problems[2].cause.as_deref(), Some("A1CF_HUMAN,Q9NQ94"));
}

#[test]
fn swissprot_accessions_when_declared() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::Mutation,
        &[("swissprot_identifier", "accession")],
        &tsv(&[
            MAF_HEADER,
            "TP53|7157|17|100|100|Missense_Mutation|SNP|A|A|G|S-1|p.R175H|P04637",
            "TP53|7157|17|200|200|Missense_Mutation|SNP|A|A|G|S-1|p.R176H|TP53_HUMAN",
            "TP53|7157|17|300|300|Missense_Mutation|SNP|A|A|G|S-1|p.R177H|P99999,Z9ZZZ9ZZZ9",
        ]),
    );

    assert_eq!(
        reported(&findings),
        [
            (Some(3), "SWISSPROT value is not a UniProtKB/Swiss-Prot accession"),
            (
                Some(4),
                "SWISSPROT value lists more than one UniProtKB/Swiss-Prot accession; only one per row is supported"
            ),
        ]
    );
    assert_eq!(
        problems(&findings)[1].cause.as_deref(),
        Some("P99999,Z9ZZZ9ZZZ9")
    );
}

#[test]
fn protein_change_must_be_a_single_change() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::Mutation,
        SWISSPROT_NAMES,
        &tsv(&[
            "Hugo_Symbol|Entrez_Gene_Id|Variant_Classification|Tumor_Sample_Barcode|Amino_Acid_Change|SWISSPROT",
            "TP53|7157|Missense_Mutation|S-1||P53_HUMAN",
            "TP53|7157|Missense_Mutation|S-2|p.A195V;p.I167I|P53_HUMAN",
            "TP53|7157|Missense_Mutation|S-3|p.N851,Y1055delinsCC|P53_HUMAN",
            "TP53|7157|Missense_Mutation|S-4|p.[N851N];[Y1055C]|P53_HUMAN",
            "TP53|7157|Missense_Mutation|S-5|NULL|P53_HUMAN",
            "TP53|7157|Missense_Mutation|S-6|p.R175H|P53_HUMAN",
        ]),
    );

    let generic = "No Amino_Acid_Change or HGVSp_Short value. This mutation record will get a generic \"MUTATED\" flag";
    assert_eq!(
        reported(&findings),
        [
            (Some(2), generic),
            (
                Some(3),
                "Multiple protein changes separated by ';' are not supported, only one p. change per row"
            ),
            (
                Some(4),
                "Haplotype notation with comma separated protein changes is not supported"
            ),
            (
                Some(5),
                "Allele notation with brackets is not supported for protein changes"
            ),
            (Some(6), generic),
        ]
    );
    let problems = problems(&findings);
    assert_eq!(problems[0].severity, Severity::Warning);
    assert_eq!(problems[1].column, Some(5));
    assert_eq!(problems[1].cause.as_deref(), Some("p.A195V;p.I167I"));
    assert_eq!(problems[3].cause.as_deref(), Some("p.[N851N];[Y1055C]"));
}

#[test]
fn variant_classification_and_swissprot_column() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::Mutation,
        &[],
        &tsv(&[
            "Hugo_Symbol|Entrez_Gene_Id|Variant_Classification|Tumor_Sample_Barcode|HGVSp_Short",
            "TP53|7157|Missense|S-1|p.R175H",
            "TP53|7157||S-2|p.R176H",
            "TP53|7157|Silent|S-3|p.R177R",
        ]),
    );

    assert_eq!(
        reported(&findings),
        [
            (
                Some(1),
                "Including the SWISSPROT column is recommended to make sure that the UniProt canonical isoform is used when drawing Pfam domains in the mutations view"
            ),
            (
                Some(2),
                "Given value for Variant_Classification column is not one of the expected values"
            ),
            (Some(3), "Value in Variant_Classification column is invalid"),
        ]
    );
    let problems = problems(&findings);
    assert_eq!(problems[0].severity, Severity::Warning);
    assert_eq!(problems[1].severity, Severity::Warning);
    assert_eq!(problems[2].severity, Severity::Error);
    assert!(findings.iter().any(|finding| {
        finding.line == Some(4)
            && finding.message == "Line will not be loaded due to the variant classification filter"
    }));
}

// --- long-format copy number ---

#[test]
fn long_cna_duplicates_name_how_the_genes_collide() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::CnaLong,
        &[],
        &tsv(&[
            "Hugo_Symbol|Entrez_Gene_Id|Sample_Id|Value",
            "BRCA1|672|S-1|-2",
            "BRCA1|672|S-1|2",
            "RNF53|672|S-1|0",
            "|672|S-1|1",
            "BRCA1|672|S-2|1",
        ]),
    );

    assert_eq!(
        reported(&findings),
        [
            (Some(3), "Duplicated gene found within the same sample."),
            (
                Some(4),
                "Two different Hugo Symbols that map to the same Entrez Gene Id found within the same sample."
            ),
            (Some(5), "Duplicated Entrez Gene Id found within the same sample."),
        ]
    );
    assert_eq!(problems(&findings)[0].cause.as_deref(), Some("(S-1, 672)"));
}

#[test]
fn driver_columns_come_in_pairs() {
    let mut fixture = Fixture::new();
    let (outcome, findings) = fixture.run(
        ValidatorKind::CnaLong,
        &[],
        &tsv(&[
            "Hugo_Symbol|Entrez_Gene_Id|Sample_Id|Value|cbp_driver|cbp_driver_tiers_annotation",
            "BRCA1|672|S-1|2|Putative_Driver|note",
        ]),
    );

    assert_eq!(outcome, FileOutcome::Unparseable);
    assert_eq!(
        reported(&findings),
        [
            (
                Some(1),
                "Column cbp_driver found without any cbp_driver_annotation column."
            ),
            (
                Some(1),
                "Column cbp_driver_tiers_annotation found without any cbp_driver_tiers column."
            ),
            (None, "Invalid column header, file cannot be parsed"),
        ]
    );
}

#[test]
fn driver_values_and_lengths_are_limited() {
    let long_annotation = "a".repeat(81);
    let long_tier = "t".repeat(51);
    let rows = [
        "Hugo_Symbol|Entrez_Gene_Id|Sample_Id|Value|cbp_driver|cbp_driver_annotation|cbp_driver_tiers|cbp_driver_tiers_annotation".to_string(),
        format!("BRCA1|672|S-1|2|Putative_Driver|{long_annotation}|Tier1|note"),
        format!("TP53|7157|S-1|-2|Driver|ok|{long_tier}|note"),
        "KRAS|3845|S-1|0|NA|||late".to_string(),
    ];
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(ValidatorKind::CnaLong, &[], &tsv(&rows));

    assert_eq!(
        reported(&findings),
        [
            (
                Some(2),
                "cbp_driver_annotation and cbp_driver_tiers_annotation columns do not support annotations longer than 80 characters"
            ),
            (
                Some(3),
                "Only \"Putative_Passenger\", \"Putative_Driver\", \"NA\", \"Unknown\" and \"\" (empty) are allowed."
            ),
            (
                Some(3),
                "cbp_driver_tiers column does not support values longer than 50 characters"
            ),
            (
                Some(4),
                "This line has no value for cbp_driver_tiers and a value for cbp_driver_tiers_annotation. Please, fill the cbp_driver_tiers column."
            ),
        ]
    );
    let columns: Vec<Option<usize>> = problems(&findings).iter().map(|finding| finding.column).collect();
    assert_eq!(columns, [Some(6), Some(5), Some(7), Some(8)]);
}

// --- structural variants ---

#[test]
fn structural_variant_header_needs_both_sites_and_status() {
    let mut fixture = Fixture::new();
    let (outcome, findings) = fixture.run(
        ValidatorKind::StructuralVariant,
        &[("namespaces", "MyNamespace")],
        &tsv(&[
            "Sample_Id|Site1_Hugo_Symbol|Site1_Entrez_Gene_Id|Event_Info",
            "S-1|EML4|27436|Fusion",
        ]),
    );

    assert_eq!(outcome, FileOutcome::Unparseable);
    assert_eq!(
        reported(&findings),
        [
            (Some(1), "Missing column: SV_Status"),
            (
                Some(1),
                "mynamespace namespace defined but the file does not have any matching columns"
            ),
            (
                Some(1),
                "Structural variant event requires Site2_Entrez_Gene_Id and/or Site2_Hugo_Symbol column"
            ),
            (None, "Invalid column header, file cannot be parsed"),
        ]
    );
}

#[test]
fn structural_variant_rows_need_a_gene_and_are_unique() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::StructuralVariant,
        &[],
        &tsv(&[
            "Sample_Id|Site1_Hugo_Symbol|Site2_Hugo_Symbol|SV_Status|Site1_Chromosome|Site1_Position|Site2_Chromosome|Site2_Position|Event_Info",
            "S-1|EML4|ALK|SOMATIC|2|42522656|2|29446394|Fusion",
            "S-1|||SOMATIC|2|100|2|200|Deletion",
            "S-1|EML4|ALK|SOMATIC|2|42522656|2|29446394|Fusion",
            "S-1|EML4||GERMLINE|2|1|2|2|Intragenic",
        ]),
    );

    assert_eq!(
        reported(&findings),
        [
            (
                Some(3),
                "No Entrez gene id or gene symbol provided for site 1 and site 2"
            ),
            (
                Some(4),
                "Duplicate entry in structural variant data; it was first defined on line 2"
            ),
        ]
    );
}

// --- gistic ---

#[test]
fn gistic_rows_check_cytoband_q_value_and_genes() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::Gistic {
            amplification: false,
        },
        &[],
        &tsv(&[
            "chromosome|peak_start|peak_end|genes_in_region|amp|cytoband|q_value",
            "2|100|200|BRCA1,|0|1p36.13|0.05",
            "1|300|400||0|1q21|0.5",
            "1|500|600|TP53|0|1p|2.5",
            "1|700|800|KRAS|0|p36|abc",
            "1|900|1000|NRAS|1|1p13.2|0.01",
        ]),
    );

    assert_eq!(
        reported(&findings),
        [
            (Some(2), "Cytoband and chromosome specifications do not match"),
            (Some(2), "Blank gene in GISTIC gene list"),
            (Some(3), "No genes listed in GISTIC peak region"),
            (Some(4), "q_value is not between 0 and 1"),
            (Some(5), "Cytoband does not specify a chromosome"),
            (Some(5), "q_value is not a real number"),
            (Some(6), "'amp' column must be 0 in GISTIC_GENES_DEL files"),
        ]
    );
    let problems = problems(&findings);
    assert_eq!(problems[0].cause.as_deref(), Some("(1p36.13, 2)"));
    assert_eq!(problems[1].severity, Severity::Warning);
    assert_eq!(problems[2].column, Some(4));
}

// --- generic assay ---

#[test]
fn arm_level_categories_are_restricted() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::GenericAssay(GenericAssayKind::Categorical),
        &[
            ("generic_assay_type", "ARMLEVEL_CNA"),
            ("generic_entity_meta_properties", "name,description"),
        ],
        &tsv(&[
            "ENTITY_STABLE_ID|NAME|DESCRIPTION|S-1|S-2",
            "1p|1p arm|Arm 1p|Gain|Loss",
            "1q|1q arm|Arm 1q|Amplified|NA",
        ]),
    );

    let problems = problems(&findings);
    assert_eq!(problems.len(), 1, "{problems:?}");
    assert_eq!(
        problems[0].message,
        "Invalid value: possible values are [Gain, Loss, Unchanged]"
    );
    assert_eq!((problems[0].line, problems[0].column), (Some(3), Some(4)));
    assert_eq!(problems[0].cause.as_deref(), Some("Amplified"));
}

#[test]
fn binary_assay_values() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::GenericAssay(GenericAssayKind::Binary),
        &[("generic_entity_meta_properties", "NAME")],
        &tsv(&[
            "ENTITY_STABLE_ID|NAME|S-1|S-2",
            "m1|Marker 1|true|No",
            "m2|Marker 2|maybe|NA",
        ]),
    );

    let problems = problems(&findings);
    assert_eq!(problems.len(), 1, "{problems:?}");
    assert_eq!(
        problems[0].message,
        "Value of binary assay must be true, false, yes, no or NA"
    );
    assert_eq!(problems[0].cause.as_deref(), Some("maybe"));
}

#[test]
fn meta_properties_must_be_columns() {
    let mut fixture = Fixture::new();
    let (outcome, findings) = fixture.run(
        ValidatorKind::GenericAssay(GenericAssayKind::Continuous),
        &[("generic_entity_meta_properties", "NAME,URL")],
        &tsv(&["ENTITY_STABLE_ID|NAME|S-1", "m1|Marker 1|0.5"]),
    );

    assert_eq!(outcome, FileOutcome::Unparseable);
    assert_eq!(problems(&findings)[0].message, "Missing column: URL");
}

// --- resources ---

#[test]
fn resource_definitions_are_checked_and_recorded() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::ResourceDefinition,
        &[],
        &tsv(&[
            "RESOURCE_ID|DISPLAY_NAME|RESOURCE_TYPE|DESCRIPTION|OPEN_BY_DEFAULT|PRIORITY",
            "PATHOLOGY_SLIDE|Pathology Slide|SAMPLE|Slides|true|1",
            "PATIENT_NOTES|Notes|PATIENT|Notes|yes|x",
            "STUDY_SPONSORS|Sponsors|STUDY|Sponsors|false|2",
            "SHARED|Shared|SAMPLE|Shared|false|3",
            "SHARED|Shared|PATIENT|Shared|false|3",
            "BAD|Bad|ENTITY|Bad|false|1",
        ]),
    );

    assert_eq!(
        reported(&findings),
        [
            (Some(3), "PRIORITY should be an integer"),
            (Some(3), "OPEN_BY_DEFAULT should be true or false"),
            (Some(7), "RESOURCE_TYPE must be SAMPLE, PATIENT or STUDY"),
        ]
    );
    let definitions = fixture
        .study
        .resource_definitions
        .as_ref()
        .expect("definitions recorded");
    assert_eq!(definitions.len(), 4);
    assert_eq!(definitions["SHARED"].len(), 2);
    assert!(!definitions.contains_key("BAD"));
}

#[test]
fn sample_resources_match_definitions_and_are_unique_per_sample() {
    let mut fixture = Fixture::new();
    fixture.run(
        ValidatorKind::ResourceDefinition,
        &[],
        &tsv(&[
            "RESOURCE_ID|DISPLAY_NAME|RESOURCE_TYPE",
            "PATHOLOGY_SLIDE|Pathology Slide|SAMPLE",
            "PATIENT_NOTES|Notes|PATIENT",
            "STUDY_SPONSORS|Sponsors|STUDY",
            "SHARED|Shared|SAMPLE",
            "SHARED|Shared|PATIENT",
        ]),
    );

    let (_, findings) = fixture.run(
        ValidatorKind::ResourceData(ResourceKind::Sample),
        &[],
        &tsv(&[
            "SAMPLE_ID|PATIENT_ID|RESOURCE_ID|URL",
            "S-1|P-1|PATHOLOGY_SLIDE|https://example.org/slide1",
            "S-1|P-1|PATHOLOGY_SLIDE|https://example.org/slide2",
            "S-2|P-2|PATHOLOGY_SLIDE|https://example.org/slide1",
            "S-1|P-1|PATIENT_NOTES|https://example.org/notes",
            "S-2|P-2|SHARED|https://example.org/shared",
            "S-2|P-2|STUDY_SPONSORS|not a url",
        ]),
    );

    assert_eq!(
        reported(&findings),
        [
            (
                Some(3),
                "Duplicated resources found; first defined on line 2"
            ),
            (
                Some(5),
                "sample resource is not defined correctly in the resource definition file"
            ),
            (
                Some(6),
                "sample resource has been used by more than one RESOURCE_TYPE"
            ),
            (
                Some(7),
                "sample resource is not defined correctly in the resource definition file"
            ),
            (Some(7), "Resource URL is not an url"),
        ]
    );
    let problems = problems(&findings);
    assert_eq!(problems[0].column, Some(3));
    assert_eq!(problems[0].cause.as_deref(), Some("(S-1, PATHOLOGY_SLIDE)"));
    assert_eq!(problems[2].severity, Severity::Warning);
}

// --- clinical attributes ---

#[test]
fn tcga_near_duplicate_sample_is_a_warning() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::Clinical(ClinicalLevel::Sample),
        &[],
        "#Patient Identifier\tSample Identifier\n\
         #Patient\tSample\n\
         #STRING\tSTRING\n\
         #1\t1\n\
         PATIENT_ID\tSAMPLE_ID\n\
         TCGA-A1-A0SB\tTCGA-A1-A0SB-01\n\
         TCGA-A1-A0SB\tTCGA-A1-A0SB-01A\n",
    );

    let problems = problems(&findings);
    assert_eq!(problems.len(), 1, "{problems:?}");
    assert_eq!(problems[0].severity, Severity::Warning);
    assert_eq!(
        problems[0].message,
        "TCGA sample defined twice in the same file; 'TCGA-A1-A0SB-01' refers to the same sample"
    );
    assert_eq!((problems[0].line, problems[0].column), (Some(7), Some(2)));
    assert_eq!(problems[0].cause.as_deref(), Some("TCGA-A1-A0SB-01A"));
}

#[test]
fn survival_status_values_are_exact() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::Clinical(ClinicalLevel::Patient),
        &[],
        "#Patient Identifier\tOverall Survival Status\tOverall Survival (Months)\tDisease Free Status\tProgression Free Status\n\
         #Patient\tOS status\tOS months\tDFS status\tPFS status\n\
         #STRING\tSTRING\tNUMBER\tSTRING\tSTRING\n\
         #1\t1\t1\t1\t1\n\
         PATIENT_ID\tOS_STATUS\tOS_MONTHS\tDFS_STATUS\tPFS_STATUS\n\
         P-1\t0:ALIVE\t12\t0:DiseaseFree\t0:CENSORED\n\
         P-2\t0:LIVING\t10\t0:LIVING\t1:PROGRESSION\n\
         P-3\t0:LIVING\t5\tNA\tPROGRESSION\n\
         P-4\t0:living\t7\t1:recurred/progressed\tNA\n\
         P-5\t1:DECEASED\tNA\t1:Recurred/Progressed\tNA\n\
         P-6\t1:DECEASED\t20\tNA\tNA\n",
    );

    let os = "Value in 'OS_STATUS' column is not '0:LIVING' or '1:DECEASED'";
    let dfs = "Value in 'DFS_STATUS' column is not '0:DiseaseFree' or '1:Recurred/Progressed'";
    assert_eq!(
        reported(&findings),
        [
            (Some(6), os),
            (Some(7), dfs),
            (
                Some(8),
                "Value in 'PFS_STATUS' column should start with '0:' or '1:'"
            ),
            (Some(9), os),
            (Some(9), dfs),
            (
                Some(10),
                "OS_MONTHS is not specified for deceased patient. Patient will be excluded from survival curve and month of death will not be shown on patient view timeline."
            ),
        ]
    );
    let problems = problems(&findings);
    assert_eq!(problems[0].column, Some(2));
    assert_eq!(problems[0].cause.as_deref(), Some("0:ALIVE"));
    assert_eq!(problems[1].column, Some(4));
    assert_eq!(problems[5].severity, Severity::Warning);
    assert_eq!(problems[5].column, None);
}

#[test]
fn patient_file_is_compared_with_sample_patients() {
    let mut fixture = Fixture::new().with_samples(&[("S-1", "P-1"), ("S-2", "P-9")]);
    fixture.study.file_types.insert(MetaFileType::SampleAttributes);
    let (_, findings) = fixture.run(
        ValidatorKind::Clinical(ClinicalLevel::Patient),
        &[],
        "#Patient Identifier\tAge\n\
         #Patient\tAge\n\
         #STRING\tNUMBER\n\
         #1\t1\n\
         PATIENT_ID\tAGE\n\
         P-1\t50\n\
         P-2\t60\n",
    );

    assert_eq!(
        reported(&findings),
        [
            (
                None,
                "Clinical data for patient of a sample is missing from the patient file"
            ),
            (Some(7), "Patient defined in the patient file has no samples"),
        ]
    );
    let problems = problems(&findings);
    assert_eq!(problems[0].cause.as_deref(), Some("P-9"));
    assert_eq!(problems[1].cause.as_deref(), Some("P-2"));
}

#[test]
fn attribute_names_are_checked_against_the_file_level() {
    let mut fixture = Fixture::new();
    let (outcome, findings) = fixture.run(
        ValidatorKind::Clinical(ClinicalLevel::Sample),
        &[],
        "#Patient Identifier\tSample Identifier\tMutation Count\tOS Status\tSubtype\n\
         #Patient\tSample\tCount\tStatus\tSubtype\n\
         #STRING\tSTRING\tNUMBER\tSTRING\tSTRING\n\
         #1\t1\t1\t1\t1\n\
         PATIENT_ID\tSAMPLE_ID\tMUTATION_COUNT\tOS_STATUS\tSubtype\n\
         P-1\tS-1\t3\t0:LIVING\tA\n",
    );

    assert_eq!(outcome, FileOutcome::Unparseable);
    let problems = problems(&findings);
    assert_eq!(problems.len(), 4, "{problems:?}");
    assert_eq!(
        problems[0].message,
        "MUTATION_COUNT and FRACTION_GENOME_ALTERED are calculated in cBioPortal and must not be submitted"
    );
    assert_eq!(
        problems[1].message,
        "Attribute can only be defined in the patient attribute file"
    );
    assert_eq!(problems[2].message, "Attribute name not in upper case");
    let columns: Vec<Option<usize>> = problems[..3].iter().map(|finding| finding.column).collect();
    assert_eq!(columns, [Some(3), Some(4), Some(5)]);
    assert_eq!(
        problems[3].message,
        "Invalid column header, file cannot be parsed"
    );
}

#[test]
fn identifiers_are_restricted_to_safe_characters() {
    let mut fixture = Fixture::new();
    let (_, findings) = fixture.run(
        ValidatorKind::Clinical(ClinicalLevel::Sample),
        &[],
        "#Patient Identifier\tSample Identifier\n\
         #Patient\tSample\n\
         #STRING\tSTRING\n\
         #1\t1\n\
         PATIENT_ID\tSAMPLE_ID\n\
         P 1\tS-1\n\
         P-2\tS/2\n",
    );

    let message = "PATIENT_ID and SAMPLE_ID can only contain letters, numbers, points, underscores and/or hyphens";
    assert_eq!(reported(&findings), [(Some(6), message), (Some(7), message)]);
    let problems = problems(&findings);
    assert_eq!(problems[0].column, Some(1));
    assert_eq!(problems[1].column, Some(2));
    assert_eq!(problems[1].cause.as_deref(), Some("S/2"));
}
