use crate::domain::{CreatedEmployee, RowError, UploadReport, ValidationSummary};

/// Final fold of the pipeline: totals, errors, and created entities into one
/// structure. Errors are ordered by (row, field) so repeated runs over the
/// same file produce identical reports.
pub fn build_report(
    total_rows: u32,
    mut errors: Vec<RowError>,
    created: Vec<CreatedEmployee>,
) -> UploadReport {
    sort_errors(&mut errors);
    UploadReport {
        total_rows,
        errors,
        created,
    }
}

pub fn build_validation_summary(
    total_rows: u32,
    eligible_rows: u32,
    mut errors: Vec<RowError>,
    available_departments: Vec<String>,
) -> ValidationSummary {
    sort_errors(&mut errors);
    ValidationSummary {
        total_rows,
        eligible_rows,
        errors,
        available_departments,
    }
}

fn sort_errors(errors: &mut [RowError]) {
    errors.sort_by(|left, right| {
        left.row
            .cmp(&right.row)
            .then_with(|| left.field.cmp(&right.field))
    });
}
