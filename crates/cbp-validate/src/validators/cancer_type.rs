//! Study-defined cancer types: a headerless file with one type per line.

use cbp_model::{CancerType, Finding};

use crate::base::{DataLine, FileContext, FileRules, Header, HeaderSpec, SeenKeys};
use crate::values::is_valid_color;

const COLUMNS: &[&str] = &["type_of_cancer", "name", "color", "parent"];

/// Root of the cancer type tree; always a valid parent.
const ROOT_TYPE: &str = "tissue";

#[derive(Default)]
pub struct CancerTypeValidator {
    seen: SeenKeys<String>,
}

impl CancerTypeValidator {
    pub fn new() -> Self {
        Self::default()
    }

    fn parent_known(ctx: &FileContext<'_>, parent: &str) -> Option<bool> {
        if parent.eq_ignore_ascii_case(ROOT_TYPE) || ctx.study.defines_cancer_type(parent) {
            return Some(true);
        }
        ctx.portal
            .cancer_types
            .as_ref()
            .map(|types| types.contains_key(parent))
    }
}

impl FileRules for CancerTypeValidator {
    fn header_spec(&self, _ctx: &FileContext<'_>) -> HeaderSpec {
        HeaderSpec::headerless(COLUMNS)
    }

    fn check_line(&mut self, ctx: &mut FileContext<'_>, _header: &Header, line: &DataLine<'_>) {
        let cell = |index: usize| line.at(index).map(str::trim).unwrap_or_default();
        let mut blank = false;
        for (index, name) in COLUMNS.iter().enumerate() {
            if cell(index).is_empty() {
                ctx.push(
                    Finding::error(format!("Field '{name}' is blank"))
                        .at_line(line.number)
                        .at_column(index + 1),
                );
                blank = true;
            }
        }
        if blank {
            return;
        }

        let cancer_type = CancerType {
            id: cell(0).to_lowercase(),
            name: cell(1).to_string(),
            color: cell(2).to_string(),
            parent: cell(3).to_lowercase(),
        };

        if !is_valid_color(&cancer_type.color) {
            ctx.push(
                Finding::error("Color is not a valid CSS color name or #rrggbb value")
                    .at_line(line.number)
                    .at_column(3)
                    .with_cause(cancer_type.color.as_str()),
            );
        }

        if let Some(first) = self.seen.record(cancer_type.id.clone(), line.number) {
            ctx.push(
                Finding::error(format!(
                    "Cancer type defined a second time in the file (first defined on line {first})"
                ))
                .at_line(line.number)
                .at_column(1)
                .with_cause(cancer_type.id.as_str()),
            );
            return;
        }

        if Self::parent_known(ctx, &cancer_type.parent) == Some(false) {
            ctx.push(
                Finding::error("Parent cancer type is not defined in the portal or earlier in the file")
                    .at_line(line.number)
                    .at_column(4)
                    .with_cause(cancer_type.parent.as_str()),
            );
        }

        match ctx.portal.cancer_type(&cancer_type.id) {
            Some(known) => {
                let same = known.name == cancer_type.name
                    && known.color.eq_ignore_ascii_case(&cancer_type.color)
                    && known.parent.eq_ignore_ascii_case(&cancer_type.parent);
                if !same {
                    ctx.push(
                        Finding::error(format!(
                            "Cancer type '{}' is already defined differently in the portal",
                            cancer_type.id
                        ))
                        .at_line(line.number)
                        .at_column(2)
                        .with_cause(cancer_type.name.as_str()),
                    );
                }
            }
            None => ctx.push(
                Finding::info("New disease type will be added to the portal")
                    .at_line(line.number)
                    .at_column(1)
                    .with_cause(cancer_type.id.as_str()),
            ),
        }

        ctx.study
            .study_cancer_types
            .insert(cancer_type.id.clone(), cancer_type);
    }
}
