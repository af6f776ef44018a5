//! Page layout
//!
//! Places outline blocks onto fixed-size pages. Coordinates here are
//! measured from the top of the page; the renderer flips them into PDF
//! space.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::metrics::{text_width, FontFace};
use crate::outline::{Align, Block, Outline, TextLine};
use crate::table::{draw_row, RowStyle, TableBlock};

/// Tolerance for floating point comparisons against the bottom margin
const EPSILON: f32 = 0.01;

/// Page size, margins and the fixed line metrics used for page-break
/// decisions. Defaults to A4 portrait in points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub font_size: f32,
    pub heading_size: f32,
    pub line_height: f32,
    pub heading_height: f32,
    pub row_height: f32,
    pub indent: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            margin: 50.0,
            font_size: 10.0,
            heading_size: 12.0,
            line_height: 14.0,
            heading_height: 22.0,
            row_height: 18.0,
            indent: 16.0,
        }
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Offset from the top past which nothing may be written.
    pub fn bottom(&self) -> f32 {
        self.height - self.margin
    }
}

/// Current write position.
#[derive(Debug, Clone)]
pub struct RenderCursor {
    y: f32,
    page_index: usize,
    geometry: PageGeometry,
}

impl RenderCursor {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            y: geometry.margin,
            page_index: 0,
            geometry,
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn remaining(&self) -> f32 {
        self.geometry.bottom() - self.y
    }

    pub fn fits(&self, height: f32) -> bool {
        self.y + height <= self.geometry.bottom() + EPSILON
    }

    pub fn at_page_top(&self) -> bool {
        (self.y - self.geometry.margin).abs() < EPSILON
    }

    pub fn advance(&mut self, height: f32) {
        self.y += height;
    }

    pub fn break_page(&mut self) {
        self.page_index += 1;
        self.y = self.geometry.margin;
    }
}

/// Something drawn on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Text {
        x: f32,
        baseline: f32,
        text: String,
        face: FontFace,
        size: f32,
    },
    Rect {
        x: f32,
        top: f32,
        width: f32,
        height: f32,
        /// Gray fill level, stroked only when `None`
        fill: Option<f32>,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub marks: Vec<Mark>,
}

impl Page {
    /// Text runs in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.marks.iter().filter_map(|mark| match mark {
            Mark::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// The laid-out document.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
}

impl Layout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All text runs across all pages, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(Page::texts)
    }
}

/// Lays blocks out page by page. One engine per document.
pub struct LayoutEngine {
    geometry: PageGeometry,
    cursor: RenderCursor,
    pages: Vec<Page>,
}

impl LayoutEngine {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            cursor: RenderCursor::new(geometry),
            pages: vec![Page::default()],
        }
    }

    pub fn cursor(&self) -> &RenderCursor {
        &self.cursor
    }

    /// Lay out every section of the outline in order.
    pub fn run(mut self, outline: &Outline) -> Layout {
        self.blocks(outline.sections.iter().flat_map(|section| &section.blocks));
        self.finish()
    }

    /// Lay out a run of blocks. A heading reserves room for the first unit
    /// of the block after it, so it never ends up alone at a page bottom.
    pub fn blocks<'b>(&mut self, blocks: impl IntoIterator<Item = &'b Block>) {
        let mut blocks = blocks.into_iter().peekable();
        while let Some(block) = blocks.next() {
            match block {
                Block::Heading(text) => {
                    let following = blocks.peek().map_or(0.0, |next| self.lead_height(next));
                    self.heading(text, following);
                }
                other => self.block(other),
            }
        }
    }

    pub fn finish(self) -> Layout {
        Layout {
            geometry: self.geometry,
            pages: self.pages,
        }
    }

    pub fn block(&mut self, block: &Block) {
        match block {
            Block::Heading(text) => self.heading(text, self.geometry.line_height),
            Block::Line(line) => self.line(line),
            Block::List(items) => items.iter().for_each(|item| self.line(item)),
            Block::KeyValue(pairs) => {
                self.table(&TableBlock::key_value(pairs), RowStyle::KeyValue)
            }
            Block::Table(table) => self.table(table, RowStyle::Body),
            Block::Spacer(lines) => self.spacer(*lines),
        }
    }

    fn page(&mut self) -> &mut Page {
        let index = self.cursor.page_index();
        &mut self.pages[index]
    }

    fn new_page(&mut self) {
        self.cursor.break_page();
        self.pages.push(Page::default());
        debug!(page = self.cursor.page_index() + 1, "page break");
    }

    /// Start a new page unless `height` fits below the cursor. A block taller
    /// than a whole page is written from the top of a fresh page and left to
    /// overflow.
    fn ensure(&mut self, height: f32) {
        if !self.cursor.fits(height) && !self.cursor.at_page_top() {
            self.new_page();
        }
    }

    /// Height that must fit below a heading for `block` to start under it.
    fn lead_height(&self, block: &Block) -> f32 {
        let g = &self.geometry;
        match block {
            Block::Heading(_) => g.heading_height,
            Block::Line(_) => g.line_height,
            Block::List(items) if items.is_empty() => 0.0,
            Block::List(_) => g.line_height,
            Block::KeyValue(pairs) if pairs.is_empty() => 0.0,
            Block::KeyValue(_) => g.row_height,
            Block::Table(table) if table.is_empty() => 0.0,
            // Header plus the first body row
            Block::Table(table) if table.header.is_some() => g.row_height * 2.0,
            Block::Table(_) => g.row_height,
            Block::Spacer(_) => 0.0,
        }
    }

    /// `following` is the height kept on the same page below the heading.
    fn heading(&mut self, text: &str, following: f32) {
        let g = self.geometry;
        self.ensure(g.heading_height + following);

        let top = self.cursor.y();
        let baseline = top + g.heading_height - 6.0;
        let x2 = g.margin + text_width(text, FontFace::Bold, g.heading_size);
        let page = self.page();
        page.marks.push(Mark::Text {
            x: g.margin,
            baseline,
            text: text.to_string(),
            face: FontFace::Bold,
            size: g.heading_size,
        });
        page.marks.push(Mark::Rule {
            x1: g.margin,
            x2,
            y: baseline + 2.0,
        });
        self.cursor.advance(g.heading_height);
    }

    fn line(&mut self, line: &TextLine) {
        let g = self.geometry;
        self.ensure(g.line_height);

        let width = text_width(&line.text, line.face, g.font_size);
        let left = g.margin + line.indent as f32 * g.indent;
        let x = match line.align {
            Align::Left => left,
            Align::Right => (g.width - g.margin - width).max(g.margin),
            Align::Center => ((g.width - width) / 2.0).max(g.margin),
        };
        let baseline = self.cursor.y() + g.font_size;

        if !line.text.is_empty() {
            self.page().marks.push(Mark::Text {
                x,
                baseline,
                text: line.text.clone(),
                face: line.face,
                size: g.font_size,
            });
        }
        self.cursor.advance(g.line_height);
    }

    fn table(&mut self, table: &TableBlock, style: RowStyle) {
        if table.is_empty() {
            return;
        }
        let g = self.geometry;
        let widths = table.column_widths(g.content_width());

        if let Some(header) = &table.header {
            // Header plus the first body row
            self.ensure(g.row_height * 2.0);
            self.table_row(table, &widths, header, RowStyle::Header);
        }

        for row in &table.rows {
            if !self.cursor.fits(g.row_height) {
                self.new_page();
                if let Some(header) = &table.header {
                    self.table_row(table, &widths, header, RowStyle::Header);
                }
            }
            let row_style = if row.emphasis {
                RowStyle::Emphasis
            } else {
                style
            };
            self.table_row(table, &widths, &row.cells, row_style);
        }

        // Breathing room below the grid
        self.spacer(0.5);
    }

    fn table_row(&mut self, table: &TableBlock, widths: &[f32], cells: &[String], style: RowStyle) {
        let g = self.geometry;
        let top = self.cursor.y();
        let page = self.page();
        draw_row(page, &g, table, widths, cells, style, top);
        self.cursor.advance(g.row_height);
    }

    /// Gaps never start a page; they shrink to whatever room is left.
    fn spacer(&mut self, lines: f32) {
        let height = (lines * self.geometry.line_height).min(self.cursor.remaining().max(0.0));
        self.cursor.advance(height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, TableRow};

    fn small_geometry() -> PageGeometry {
        // Room for exactly ten body lines
        PageGeometry {
            height: 240.0,
            margin: 50.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_geometry_is_a4() {
        let g = PageGeometry::default();
        assert!((g.width - 595.28).abs() < 0.01);
        assert!((g.height - 841.89).abs() < 0.01);
        assert_eq!(g.bottom(), g.height - 50.0);
    }

    #[test]
    fn test_cursor_starts_at_top_margin() {
        let cursor = RenderCursor::new(PageGeometry::default());
        assert_eq!(cursor.y(), 50.0);
        assert_eq!(cursor.page_index(), 0);
        assert!(cursor.at_page_top());
    }

    #[test]
    fn test_lines_break_onto_new_page() {
        let mut engine = LayoutEngine::new(small_geometry());
        for i in 0..25 {
            engine.block(&Block::Line(TextLine::plain(format!("line {}", i))));
            let g = small_geometry();
            assert!(engine.cursor().y() >= g.margin);
            assert!(engine.cursor().y() <= g.bottom() + EPSILON);
        }
        let layout = engine.finish();
        assert_eq!(layout.page_count(), 3);
        assert_eq!(layout.pages[0].texts().count(), 10);
        assert_eq!(layout.texts().count(), 25);
    }

    #[test]
    fn test_heading_keeps_with_next_line() {
        let g = small_geometry();
        let mut engine = LayoutEngine::new(g);
        // Fill all but one line of the first page
        for _ in 0..9 {
            engine.block(&Block::Line(TextLine::plain("filler")));
        }
        engine.block(&Block::Heading("Terms".into()));
        let layout = engine.finish();
        assert_eq!(layout.page_count(), 2);
        assert_eq!(layout.pages[1].texts().next(), Some("Terms"));
    }

    fn fee_table() -> TableBlock {
        let mut table = TableBlock::new(vec![Column::new(1.0, Align::Left)])
            .with_header(vec!["Scheme".into()]);
        table.push_row(TableRow::new(vec!["row".into()]));
        table
    }

    #[test]
    fn test_heading_keeps_with_table_header_and_first_row() {
        let g = small_geometry();
        let mut blocks: Vec<Block> = (0..7)
            .map(|_| Block::Line(TextLine::plain("filler")))
            .collect();
        // 42pt left: enough for a heading and a line, not for header plus row
        blocks.push(Block::Heading("Professional Fees".into()));
        blocks.push(Block::Table(fee_table()));

        let mut engine = LayoutEngine::new(g);
        engine.blocks(&blocks);
        let layout = engine.finish();

        assert_eq!(layout.page_count(), 2);
        assert_eq!(layout.pages[0].texts().last(), Some("filler"));
        assert_eq!(
            layout.pages[1].texts().collect::<Vec<_>>(),
            vec!["Professional Fees", "Scheme", "row"]
        );
    }

    #[test]
    fn test_heading_keeps_with_first_key_value_row() {
        // 38pt left after seven lines: a heading plus a line fits, a row does not
        let g = PageGeometry {
            height: 236.0,
            ..small_geometry()
        };
        let mut blocks: Vec<Block> = (0..7)
            .map(|_| Block::Line(TextLine::plain("filler")))
            .collect();
        blocks.push(Block::Heading("Commercial Offer".into()));
        blocks.push(Block::KeyValue(vec![("Category".into(), "Micro".into())]));

        let mut engine = LayoutEngine::new(g);
        engine.blocks(&blocks);
        let layout = engine.finish();

        assert_eq!(layout.page_count(), 2);
        assert_eq!(layout.pages[1].texts().next(), Some("Commercial Offer"));
    }

    #[test]
    fn test_heading_stays_when_table_fits() {
        let g = small_geometry();
        let mut blocks: Vec<Block> = (0..5)
            .map(|_| Block::Line(TextLine::plain("filler")))
            .collect();
        blocks.push(Block::Heading("Professional Fees".into()));
        blocks.push(Block::Table(fee_table()));

        let mut engine = LayoutEngine::new(g);
        engine.blocks(&blocks);
        assert_eq!(engine.finish().page_count(), 1);
    }

    #[test]
    fn test_table_repeats_header_after_break() {
        let g = small_geometry();
        let mut table = TableBlock::new(vec![Column::new(1.0, Align::Left)])
            .with_header(vec!["Scheme".into()]);
        for i in 0..12 {
            table.push_row(TableRow::new(vec![format!("row {}", i)]));
        }
        let mut engine = LayoutEngine::new(g);
        engine.block(&Block::Table(table));
        let layout = engine.finish();

        assert!(layout.page_count() >= 2);
        for page in &layout.pages {
            assert_eq!(page.texts().next(), Some("Scheme"));
        }
        let rows = layout.texts().filter(|t| t.starts_with("row ")).count();
        assert_eq!(rows, 12);
    }

    #[test]
    fn test_spacer_never_breaks_page() {
        let g = small_geometry();
        let mut engine = LayoutEngine::new(g);
        for _ in 0..9 {
            engine.block(&Block::Line(TextLine::plain("filler")));
        }
        engine.block(&Block::Spacer(5.0));
        assert_eq!(engine.cursor().page_index(), 0);
        assert!((engine.cursor().y() - g.bottom()).abs() < EPSILON);
    }

    #[test]
    fn test_right_aligned_line_ends_at_margin() {
        let g = PageGeometry::default();
        let mut engine = LayoutEngine::new(g);
        engine.block(&Block::Line(
            TextLine::plain("Date: 18-10-2026").aligned(Align::Right),
        ));
        let layout = engine.finish();
        match &layout.pages[0].marks[0] {
            Mark::Text { x, text, face, .. } => {
                let end = x + text_width(text, *face, g.font_size);
                assert!((end - (g.width - g.margin)).abs() < 0.01);
            }
            other => panic!("unexpected mark {:?}", other),
        }
    }

    #[test]
    fn test_oversized_block_on_fresh_page_does_not_loop() {
        let g = PageGeometry {
            height: 120.0,
            margin: 50.0,
            ..Default::default()
        };
        let mut engine = LayoutEngine::new(g);
        engine.block(&Block::Heading("Too tall".into()));
        let layout = engine.finish();
        assert_eq!(layout.page_count(), 1);
    }
}
