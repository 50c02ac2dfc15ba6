//! Import template workbook: one sheet to fill in, one sheet documenting
//! every column.

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use super::validator::COLUMNS;
use crate::domain::DomainError;

pub const TEMPLATE_FILE_NAME: &str = "employee-import-template.xlsx";

pub fn build_template() -> Result<Vec<u8>, DomainError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Employees").map_err(xlsx_error)?;
    for (col, spec) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        sheet
            .write_with_format(0, col, spec.name, &bold)
            .map_err(xlsx_error)?;
        if !spec.example.is_empty() {
            sheet.write(1, col, spec.example).map_err(xlsx_error)?;
        }
    }

    let sheet = workbook.add_worksheet();
    sheet.set_name("Columns").map_err(xlsx_error)?;
    for (col, header) in ["column", "required", "format"].iter().enumerate() {
        sheet
            .write_with_format(0, col as u16, *header, &bold)
            .map_err(xlsx_error)?;
    }
    for (index, spec) in COLUMNS.iter().enumerate() {
        let row = index as u32 + 1;
        sheet.write(row, 0, spec.name).map_err(xlsx_error)?;
        sheet
            .write(row, 1, if spec.required { "required" } else { "optional" })
            .map_err(xlsx_error)?;
        sheet.write(row, 2, spec.format).map_err(xlsx_error)?;
    }

    workbook.save_to_buffer().map_err(xlsx_error)
}

fn xlsx_error(err: XlsxError) -> DomainError {
    DomainError::internal(format!("template workbook: {err}"))
}
