use crate::errors::{AppError, AppResult};
use crate::export::model::{HEADERS, RowKind, SheetRow};
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Map text to WinAnsiEncoding bytes, the encoding of the built-in Helvetica.
pub(crate) fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '€' => 0x80,
            '…' => 0x85,
            'Œ' => 0x8C,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '–' => 0x96,
            '—' => 0x97,
            'œ' => 0x9C,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

pub struct PdfManager {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    page_refs: Vec<Ref>,
    current_content_id: Option<Ref>,

    page_w: f32,
    page_h: f32,
    margin: f32,
    row_h: f32,

    next_id: i32,
    font_id: Ref,

    font_size: f32,
    header_font_size: f32,
    title_font_size: f32,
}

impl Default for PdfManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfManager {
    pub fn new() -> Self {
        let mut pdf = Pdf::new();

        // fixed ids for the document skeleton
        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);
        let next_id = 4;

        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        Self {
            pdf,
            catalog_id,
            pages_id,
            page_refs: Vec::new(),
            current_content_id: None,

            page_w: 595.0,
            page_h: 842.0,
            margin: 40.0,
            row_h: 18.0,

            next_id,
            font_id,

            font_size: 9.0,
            header_font_size: 9.5,
            title_font_size: 13.0,
        }
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    /// New page with its content stream id.
    fn new_page(&mut self) -> Content {
        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();

        self.page_refs.push(page_id);

        let mut page = self.pdf.page(page_id);
        page.parent(self.pages_id)
            .media_box(Rect::new(0.0, 0.0, self.page_w, self.page_h))
            .contents(content_id);

        page.resources().fonts().pair(Name(b"F1"), self.font_id);

        self.current_content_id = Some(content_id);

        Content::new()
    }

    fn finalize_page(&mut self, content: Content) {
        if let Some(id) = self.current_content_id {
            self.pdf.stream(id, &content.finish());
        }
    }

    fn build_pages_tree(&mut self) {
        let mut pages = self.pdf.pages(self.pages_id);
        pages.count(self.page_refs.len() as i32);
        pages.kids(self.page_refs.clone());
    }

    fn draw_text(&self, content: &mut Content, x: f32, y: f32, size: f32, text: &str) {
        let bytes = to_win_ansi(text);
        content.begin_text();
        content.set_font(Name(b"F1"), size);
        content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
        content.show(Str(&bytes));
        content.end_text();
    }

    fn draw_cell_borders(&self, content: &mut Content, x: f32, y: f32, w: f32, h: f32) {
        content.save_state();
        content.set_stroke_rgb(0.65, 0.65, 0.65);
        content.rect(x, y, w, h);
        content.stroke();
        content.restore_state();
    }

    fn fill_row(&self, content: &mut Content, y: f32, width: f32, rgb: (f32, f32, f32)) {
        content.save_state();
        content.set_fill_rgb(rgb.0, rgb.1, rgb.2);
        content.rect(self.margin, y, width, self.row_h);
        content.fill_nonzero();
        content.restore_state();
    }

    fn draw_row(&self, content: &mut Content, y: f32, col_widths: &[f32], row: &[String], font_size: f32) {
        let mut x = self.margin;

        for (i, w) in col_widths.iter().enumerate() {
            if let Some(text) = row.get(i) {
                self.draw_text(content, x + 3.0, y + 5.0, font_size, text);
            }
            self.draw_cell_borders(content, x, y, *w, self.row_h);
            x += w;
        }
    }

    /// Column widths from headers and cell lengths, scaled to fit the page.
    fn compute_col_widths(&self, headers: &[&str], rows: &[SheetRow]) -> Vec<f32> {
        let mut widths: Vec<f32> = headers
            .iter()
            .map(|h| h.chars().count() as f32 * 5.6 + 8.0)
            .collect();

        for row in rows.iter().filter(|r| matches!(r.kind, RowKind::Entry | RowKind::DayTotal | RowKind::WeekTotal)) {
            for (i, cell) in row.cells.iter().enumerate().take(widths.len()) {
                widths[i] = (cell.chars().count() as f32 * 5.2 + 8.0).max(widths[i]);
            }
        }

        let total: f32 = widths.iter().sum();
        let max = self.page_w - 2.0 * self.margin;

        if total > max {
            let scale = max / total;
            for w in &mut widths {
                *w *= scale;
            }
        }

        widths
    }

    /// Running title at the top, page number at the bottom. Returns the first free y.
    fn draw_page_frame(&self, content: &mut Content, titles: &[String], page: usize) -> f32 {
        let mut y = self.page_h - self.margin;

        let shown: &[String] = if page == 1 {
            titles
        } else {
            &titles[..titles.len().min(1)]
        };
        for (i, t) in shown.iter().enumerate() {
            let size = if i == 0 { self.title_font_size } else { self.font_size + 1.0 };
            self.draw_text(content, self.margin, y, size, t);
            y -= size + 6.0;
        }

        let pg = format!("Page {}", page);
        self.draw_text(
            content,
            self.page_w - self.margin - 40.0,
            self.margin - 25.0,
            self.font_size,
            &pg,
        );

        y - self.row_h
    }

    /// Multi-page report: title lines, then the rows in sheet order.
    pub fn write_report(&mut self, titles: &[String], headers: &[&str], rows: &[SheetRow]) {
        let col_widths = self.compute_col_widths(headers, rows);
        let table_w: f32 = col_widths.iter().sum();

        let mut page_idx = 1;
        let mut content = self.new_page();
        let mut y = self.draw_page_frame(&mut content, titles, page_idx);
        let mut zebra = 0usize;

        if !rows.iter().any(|r| r.kind == RowKind::Entry) {
            self.draw_text(&mut content, self.margin, y, self.font_size, "Aucune heure pour cette semaine.");
        }

        for row in rows.iter().filter(|r| r.kind != RowKind::Title) {
            if y - self.row_h < self.margin {
                self.finalize_page(content);
                page_idx += 1;
                content = self.new_page();
                y = self.draw_page_frame(&mut content, titles, page_idx);
            }

            match row.kind {
                RowKind::Title => {}
                RowKind::Blank => {
                    y -= self.row_h / 2.0;
                    continue;
                }
                RowKind::Employee => {
                    let line = row.cells.join("   ");
                    self.draw_text(&mut content, self.margin, y + 5.0, self.header_font_size + 1.5, &line);
                    zebra = 0;
                }
                RowKind::Header => {
                    self.fill_row(&mut content, y, table_w, (0.85, 0.87, 0.90));
                    self.draw_row(&mut content, y, &col_widths, &row.cells, self.header_font_size);
                }
                RowKind::Entry => {
                    if zebra % 2 == 0 {
                        self.fill_row(&mut content, y, table_w, (0.96, 0.96, 0.96));
                    }
                    zebra += 1;
                    self.draw_row(&mut content, y, &col_widths, &row.cells, self.font_size);
                }
                RowKind::DayTotal => {
                    self.fill_row(&mut content, y, table_w, (0.92, 0.95, 0.98));
                    self.draw_row(&mut content, y, &col_widths, &row.cells, self.font_size);
                }
                RowKind::WeekTotal => {
                    self.fill_row(&mut content, y, table_w, (0.80, 0.88, 0.96));
                    self.draw_row(&mut content, y, &col_widths, &row.cells, self.header_font_size);
                }
            }

            y -= self.row_h;
        }

        self.finalize_page(content);
    }

    pub fn save(mut self, path: &Path) -> std::io::Result<()> {
        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        self.build_pages_tree();

        let bytes = self.pdf.finish();
        let mut f = File::create(path)?;
        f.write_all(&bytes)?;
        Ok(())
    }
}

/// Title lines on the first page, then the employee blocks.
pub(crate) fn export_pdf(titles: &[String], rows: &[SheetRow], path: &Path) -> AppResult<()> {
    let mut pdf = PdfManager::new();
    pdf.write_report(titles, &HEADERS, rows);

    pdf.save(path)
        .map_err(|e| AppError::Export(format!("PDF export error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn french_text_maps_to_win_ansi() {
        assert_eq!(to_win_ansi("Dîner"), vec![b'D', 0xEE, b'n', b'e', b'r']);
        assert_eq!(to_win_ansi("Manœuvre")[3], 0x9C);
        assert_eq!(to_win_ansi("→"), vec![b'?']);
    }
}
