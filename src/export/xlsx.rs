// src/export/xlsx.rs

use crate::errors::{AppError, AppResult};
use crate::export::model::{HEADERS, RowKind, SheetRow};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

struct Formats {
    title: Format,
    employee: Format,
    header: Format,
    text: [Format; 2],
    number: [Format; 2],
    day_total: Format,
    week_total: Format,
}

impl Formats {
    fn new() -> Self {
        let band = |bg: u32| {
            Format::new()
                .set_background_color(Color::RGB(bg))
                .set_pattern(FormatPattern::Solid)
                .set_border(FormatBorder::Thin)
        };
        let band1 = 0xEAF3FB;
        let band2 = 0xFFFFFF;

        Self {
            title: Format::new().set_bold().set_font_size(13),
            employee: Format::new().set_bold().set_font_color(Color::RGB(0x1F4E79)),
            header: Format::new()
                .set_bold()
                .set_font_color(Color::RGB(0xFFFFFF))
                .set_background_color(Color::RGB(0x2F75B5))
                .set_pattern(FormatPattern::Solid)
                .set_border(FormatBorder::Thin),
            text: [band(band1), band(band2)],
            number: [
                band(band1).set_align(FormatAlign::Right).set_num_format("0.00"),
                band(band2).set_align(FormatAlign::Right).set_num_format("0.00"),
            ],
            day_total: band(0xDDEBF7).set_bold().set_num_format("0.00"),
            week_total: band(0xBDD7EE).set_bold().set_num_format("0.00"),
        }
    }
}

/// Export XLSX: same block layout as the PDF, numbers written as numbers.
pub(crate) fn export_xlsx(rows: &[SheetRow], path: &Path) -> AppResult<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Heures").map_err(to_app_error)?;

    let fmt = Formats::new();
    let mut col_widths: Vec<usize> = HEADERS.iter().map(|h| UnicodeWidthStr::width(*h)).collect();
    let mut band = 0usize;

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32;
        match row.kind {
            RowKind::Blank => {}
            RowKind::Title => write_text(worksheet, r, 0, &row.cells, &fmt.title)?,
            RowKind::Employee => {
                write_text(worksheet, r, 0, &row.cells, &fmt.employee)?;
                band = 0;
            }
            RowKind::Header => write_text(worksheet, r, 0, &row.cells, &fmt.header)?,
            RowKind::Entry => {
                let b = band % 2;
                band += 1;
                for (c, value) in row.cells.iter().enumerate() {
                    // only the hours column gets two decimals
                    let num = if c == 7 { &fmt.number[b] } else { &fmt.text[b] };
                    write_cell(worksheet, r, c as u16, value, &fmt.text[b], num)?;
                    col_widths[c] = col_widths[c].max(UnicodeWidthStr::width(value.as_str()));
                }
            }
            RowKind::DayTotal | RowKind::WeekTotal => {
                let f = if row.kind == RowKind::DayTotal {
                    &fmt.day_total
                } else {
                    &fmt.week_total
                };
                for (c, value) in row.cells.iter().enumerate() {
                    write_cell(worksheet, r, c as u16, value, f, f)?;
                }
            }
        }
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet
            .set_column_width(c as u16, *w as f64 + 2.0)
            .map_err(to_app_error)?;
    }

    workbook.save(path).map_err(to_app_error)?;
    Ok(())
}

fn write_text(ws: &mut Worksheet, row: u32, first_col: u16, cells: &[String], fmt: &Format) -> AppResult<()> {
    for (i, s) in cells.iter().enumerate() {
        ws.write_with_format(row, first_col + i as u16, s.as_str(), fmt)
            .map_err(to_app_error)?;
    }
    Ok(())
}

/// Numeric strings become numbers, the rest stays text.
fn write_cell(ws: &mut Worksheet, row: u32, col: u16, s: &str, text: &Format, number: &Format) -> AppResult<()> {
    if s.is_empty() {
        ws.write_blank(row, col, text).map_err(to_app_error)?;
    } else if let Ok(num) = s.parse::<f64>() {
        ws.write_with_format(row, col, num, number).map_err(to_app_error)?;
    } else {
        ws.write_with_format(row, col, s, text).map_err(to_app_error)?;
    }
    Ok(())
}

fn to_app_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(e.to_string())
}
