//! Clinical timeline files.

use cbp_model::Finding;

use crate::base::{DataLine, FileContext, FileRules, Header, HeaderSpec};
use crate::values::parse_int;

const COLUMNS: &[&str] = &["PATIENT_ID", "START_DATE", "STOP_DATE", "EVENT_TYPE"];

#[derive(Default)]
pub struct TimelineValidator;

impl TimelineValidator {
    pub fn new() -> Self {
        Self
    }
}

impl FileRules for TimelineValidator {
    fn header_spec(&self, _ctx: &FileContext<'_>) -> HeaderSpec {
        HeaderSpec::required(COLUMNS)
    }

    fn check_line(&mut self, ctx: &mut FileContext<'_>, header: &Header, line: &DataLine<'_>) {
        if let Some(index) = header.position("PATIENT_ID") {
            let patient = line.at(index).map(str::trim).unwrap_or_default();
            ctx.check_patient_defined(patient, line.number, index + 1);
        }

        // Point events leave STOP_DATE empty.
        for (name, optional) in [("START_DATE", false), ("STOP_DATE", true)] {
            let Some(index) = header.position(name) else {
                continue;
            };
            let value = line.at(index).map(str::trim).unwrap_or_default();
            if optional && value.is_empty() {
                continue;
            }
            if parse_int(value).is_none() {
                ctx.push(
                    Finding::error(format!("Invalid {name}"))
                        .at_line(line.number)
                        .at_column(index + 1)
                        .with_cause(value),
                );
            }
        }

        if let Some(index) = header.position("EVENT_TYPE")
            && line.at(index).is_some_and(|value| value.trim().is_empty())
        {
            ctx.push(
                Finding::error("EVENT_TYPE is empty")
                    .at_line(line.number)
                    .at_column(index + 1),
            );
        }
    }
}
