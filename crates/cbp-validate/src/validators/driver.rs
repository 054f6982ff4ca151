//! Custom driver annotation columns (`cbp_driver*`), shared by mutation
//! files and long-format copy-number files.

use std::collections::BTreeSet;

use cbp_model::Finding;

use crate::base::{DataLine, FileContext, Header};

pub const DRIVER: &str = "cbp_driver";
pub const DRIVER_ANNOTATION: &str = "cbp_driver_annotation";
pub const DRIVER_TIERS: &str = "cbp_driver_tiers";
pub const DRIVER_TIERS_ANNOTATION: &str = "cbp_driver_tiers_annotation";

const DRIVER_VALUES: &[&str] = &["Putative_Driver", "Putative_Passenger", "Unknown", "NA", ""];
const MAX_ANNOTATION_LENGTH: usize = 80;
const MAX_TIER_LENGTH: usize = 50;
const MAX_DISTINCT_TIERS: usize = 10;

/// Positions of the driver columns in a header.
#[derive(Debug, Clone, Default)]
pub struct DriverColumns {
    driver: Option<usize>,
    driver_annotation: Option<usize>,
    tiers: Option<usize>,
    tiers_annotation: Option<usize>,
    seen_tiers: BTreeSet<String>,
}

impl DriverColumns {
    /// Locate the columns and report unpaired ones.
    pub fn check_header(&mut self, ctx: &mut FileContext<'_>, header: &Header) {
        self.driver = header.position(DRIVER);
        self.driver_annotation = header.position(DRIVER_ANNOTATION);
        self.tiers = header.position(DRIVER_TIERS);
        self.tiers_annotation = header.position(DRIVER_TIERS_ANNOTATION);

        let pairs = [
            (self.driver, DRIVER, self.driver_annotation, DRIVER_ANNOTATION),
            (self.tiers, DRIVER_TIERS, self.tiers_annotation, DRIVER_TIERS_ANNOTATION),
        ];
        for (value, value_name, annotation, annotation_name) in pairs {
            let (present, missing) = match (value, annotation) {
                (Some(_), None) => (value_name, annotation_name),
                (None, Some(_)) => (annotation_name, value_name),
                _ => continue,
            };
            ctx.push(
                Finding::error(format!(
                    "Column {present} found without any {missing} column."
                ))
                .at_line(header.line)
                .with_cause(present),
            );
        }
    }

    pub fn check_line(&mut self, ctx: &mut FileContext<'_>, line: &DataLine<'_>) {
        let cell = |index: Option<usize>| {
            index.and_then(|index| line.at(index).map(|value| (index, value.trim())))
        };

        if let Some((index, value)) = cell(self.driver)
            && !DRIVER_VALUES.contains(&value)
        {
            ctx.push(
                Finding::error(
                    "Only \"Putative_Passenger\", \"Putative_Driver\", \"NA\", \"Unknown\" and \"\" (empty) are allowed.",
                )
                .at_line(line.number)
                .at_column(index + 1)
                .with_cause(value),
            );
        }
        if let Some((index, annotation)) = cell(self.tiers_annotation)
            && !annotation.is_empty()
            && cell(self.tiers).is_some_and(|(_, tier)| tier.is_empty())
        {
            ctx.push(
                Finding::error(format!(
                    "This line has no value for {DRIVER_TIERS} and a value for {DRIVER_TIERS_ANNOTATION}. Please, fill the {DRIVER_TIERS} column."
                ))
                .at_line(line.number)
                .at_column(index + 1)
                .with_cause(annotation),
            );
        }
        for column in [self.driver_annotation, self.tiers_annotation] {
            if let Some((index, value)) = cell(column)
                && value.chars().count() > MAX_ANNOTATION_LENGTH
            {
                ctx.push(
                    Finding::error(format!(
                        "{DRIVER_ANNOTATION} and {DRIVER_TIERS_ANNOTATION} columns do not support annotations longer than {MAX_ANNOTATION_LENGTH} characters"
                    ))
                    .at_line(line.number)
                    .at_column(index + 1)
                    .with_cause(value),
                );
            }
        }
        if let Some((index, value)) = cell(self.tiers) {
            if value.chars().count() > MAX_TIER_LENGTH {
                ctx.push(
                    Finding::error(format!(
                        "{DRIVER_TIERS} column does not support values longer than {MAX_TIER_LENGTH} characters"
                    ))
                    .at_line(line.number)
                    .at_column(index + 1)
                    .with_cause(value),
                );
            } else if !value.is_empty() && value != "NA" {
                self.seen_tiers.insert(value.to_string());
            }
        }
    }

    pub fn finish(&self, ctx: &mut FileContext<'_>) {
        if self.seen_tiers.len() > MAX_DISTINCT_TIERS {
            let tiers: Vec<&str> = self.seen_tiers.iter().map(String::as_str).collect();
            ctx.push(
                Finding::warning(format!(
                    "More than {MAX_DISTINCT_TIERS} different tiers found in {DRIVER_TIERS}; only the first {MAX_DISTINCT_TIERS} will be shown in the tier filter"
                ))
                .with_cause(ctx.options.summarize(tiers)),
            );
        }
    }
}
