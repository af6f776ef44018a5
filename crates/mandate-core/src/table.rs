//! Tabular block primitive
//!
//! Rows of cells with fractional column widths, per-column alignment and an
//! optional header. Drawn with stroked rectangles and text runs only.

use crate::layout::{Mark, Page, PageGeometry};
use crate::metrics::{text_width, FontFace};
use crate::outline::Align;

/// Horizontal padding inside a cell
const CELL_PADDING: f32 = 4.0;

/// Gray level used to fill header cells
const HEADER_FILL: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    /// Fraction of the content width
    pub width: f32,
    pub align: Align,
}

impl Column {
    pub fn new(width: f32, align: Align) -> Self {
        Self { width, align }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: Vec<String>,
    /// Render the whole row in the bold face
    pub emphasis: bool,
}

impl TableRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self {
            cells,
            emphasis: false,
        }
    }

    pub fn emphasized(cells: Vec<String>) -> Self {
        Self {
            cells,
            emphasis: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableBlock {
    pub columns: Vec<Column>,
    pub header: Option<Vec<String>>,
    pub rows: Vec<TableRow>,
}

impl TableBlock {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            header: None,
            rows: Vec::new(),
        }
    }

    pub fn with_header(mut self, header: Vec<String>) -> Self {
        self.header = Some(header);
        self
    }

    pub fn push_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Label column in bold, value column in the regular face.
    pub fn key_value(pairs: &[(String, String)]) -> Self {
        let mut table = Self::new(vec![
            Column::new(0.35, Align::Left),
            Column::new(0.65, Align::Left),
        ]);
        for (label, value) in pairs {
            table.push_row(TableRow::new(vec![label.clone(), value.clone()]));
        }
        table
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_none() && self.rows.is_empty()
    }

    /// Absolute column widths for a given content width.
    pub fn column_widths(&self, content_width: f32) -> Vec<f32> {
        let total: f32 = self.columns.iter().map(|c| c.width).sum();
        if total <= 0.0 {
            return vec![content_width / self.columns.len().max(1) as f32; self.columns.len()];
        }
        self.columns
            .iter()
            .map(|c| c.width / total * content_width)
            .collect()
    }
}

/// Which faces a row uses: the label column of a key/value table is bold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RowStyle {
    Header,
    Body,
    Emphasis,
    KeyValue,
}

impl RowStyle {
    fn face(self, column: usize) -> FontFace {
        match self {
            RowStyle::Header | RowStyle::Emphasis => FontFace::Bold,
            RowStyle::KeyValue if column == 0 => FontFace::Bold,
            _ => FontFace::Regular,
        }
    }
}

/// Draw one row with its top edge at `top`.
pub(crate) fn draw_row(
    page: &mut Page,
    geometry: &PageGeometry,
    table: &TableBlock,
    widths: &[f32],
    cells: &[String],
    style: RowStyle,
    top: f32,
) {
    let height = geometry.row_height;
    let baseline = top + (height + geometry.font_size * 0.7) / 2.0;
    let fill = (style == RowStyle::Header).then_some(HEADER_FILL);

    let mut x = geometry.margin;
    for (index, width) in widths.iter().enumerate() {
        page.marks.push(Mark::Rect {
            x,
            top,
            width: *width,
            height,
            fill,
        });

        if let Some(text) = cells.get(index).filter(|t| !t.is_empty()) {
            let face = style.face(index);
            let align = table
                .columns
                .get(index)
                .map(|c| c.align)
                .unwrap_or_default();
            let text_x = match align {
                Align::Left => x + CELL_PADDING,
                Align::Right => {
                    x + width - CELL_PADDING - text_width(text, face, geometry.font_size)
                }
                Align::Center => x + (width - text_width(text, face, geometry.font_size)) / 2.0,
            };
            page.marks.push(Mark::Text {
                x: text_x,
                baseline,
                text: text.clone(),
                face,
                size: geometry.font_size,
            });
        }

        x += width;
    }
}
