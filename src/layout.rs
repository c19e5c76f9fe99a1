//! Flows document blocks onto fixed-size A4 pages.
//!
//! Blocks are placed top-to-bottom inside a single frame per page. Paragraphs
//! break between lines and tables between rows. A row only splits when it is
//! taller than the whole frame, and then continues on the next page. Output is
//! a list of pages holding positioned draw primitives in PDF user space
//! (origin bottom-left, units in points).

use crate::document::{Block, Document, RowKind, Table};
use crate::metrics::{Face, text_width};

pub const PAGE_WIDTH: f32 = 595.2756;
pub const PAGE_HEIGHT: f32 = 841.8898;
pub const MARGIN: f32 = 36.0;

pub const FRAME_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
pub const FRAME_HEIGHT: f32 = PAGE_HEIGHT - 2.0 * MARGIN;

const CELL_PADDING: f32 = 6.0;
const GRID_WIDTH: f32 = 0.5;
const GRID_GRAY: f32 = 0.5;
const BLACK: f32 = 0.0;
const WHITE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    face: Face,
    size: f32,
    leading: f32,
    space_before: f32,
    space_after: f32,
    align: Align,
}

const TITLE: TextStyle = TextStyle {
    face: Face::Bold,
    size: 18.0,
    leading: 22.0,
    space_before: 0.0,
    space_after: 6.0,
    align: Align::Center,
};

const HEADING: TextStyle = TextStyle {
    face: Face::Bold,
    size: 14.0,
    leading: 18.0,
    space_before: 10.0,
    space_after: 6.0,
    align: Align::Left,
};

const BODY: TextStyle = TextStyle {
    face: Face::Regular,
    size: 10.0,
    leading: 12.0,
    space_before: 6.0,
    space_after: 0.0,
    align: Align::Left,
};

const CELL_SIZE: f32 = 10.0;
const CELL_LEADING: f32 = 12.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        face: Face,
        size: f32,
        gray: f32,
        text: String,
    },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        gray: f32,
    },
    StrokeRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        line_width: f32,
        gray: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

pub fn layout(doc: &Document) -> Vec<Page> {
    let mut flow = Flow::new();
    for block in &doc.blocks {
        match block {
            Block::Title(text) => flow.paragraph(text, &TITLE),
            Block::Heading(text) => flow.paragraph(text, &HEADING),
            Block::Paragraph(text) => flow.paragraph(text, &BODY),
            Block::Spacer(height) => flow.gap(*height),
            Block::Table(table) => flow.table(table),
        }
    }
    flow.finish()
}

struct Flow {
    pages: Vec<Page>,
    current: Page,
    /// Top of the free space on the current page.
    y: f32,
    at_top: bool,
}

impl Flow {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Page::default(),
            y: PAGE_HEIGHT - MARGIN,
            at_top: true,
        }
    }

    fn remaining(&self) -> f32 {
        self.y - MARGIN
    }

    fn new_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.pages.push(page);
        self.y = PAGE_HEIGHT - MARGIN;
        self.at_top = true;
    }

    /// Ensures `height` fits below the cursor, breaking the page if it does not.
    /// A fresh page accepts anything.
    fn reserve(&mut self, height: f32) {
        if !self.at_top && height > self.remaining() {
            self.new_page();
        }
    }

    /// Vertical space, dropped at the top of a page.
    fn gap(&mut self, height: f32) {
        if self.at_top {
            return;
        }
        if height >= self.remaining() {
            self.new_page();
        } else {
            self.y -= height;
        }
    }

    fn paragraph(&mut self, text: &str, style: &TextStyle) {
        let lines = wrap_text(text, style.face, style.size, FRAME_WIDTH);
        if lines.is_empty() {
            return;
        }

        self.gap(style.space_before);
        for line in lines {
            self.reserve(style.leading);
            let x = match style.align {
                Align::Left => MARGIN,
                Align::Center => {
                    MARGIN + (FRAME_WIDTH - text_width(&line, style.face, style.size)) / 2.0
                }
            };
            self.current.ops.push(DrawOp::Text {
                x,
                y: baseline(self.y, style.size, style.leading),
                face: style.face,
                size: style.size,
                gray: BLACK,
                text: line,
            });
            self.y -= style.leading;
            self.at_top = false;
        }
        self.gap(style.space_after);
    }

    fn table(&mut self, table: &Table) {
        let left = MARGIN + (FRAME_WIDTH - table.width()).max(0.0) / 2.0;

        for row in &table.rows {
            let mut cells = Vec::with_capacity(row.cells.len());
            let mut x = left;
            let mut column = 0;
            for cell in &row.cells {
                let span = cell.span.max(1);
                let width: f32 = table.column_widths.iter().skip(column).take(span).sum();
                let face = if cell.bold || row.kind == RowKind::Header {
                    Face::Bold
                } else {
                    Face::Regular
                };
                let lines = wrap_text(&cell.text, face, CELL_SIZE, width - 2.0 * CELL_PADDING);
                cells.push(CellBox {
                    x,
                    width,
                    face,
                    lines,
                });
                x += width;
                column += span;
            }

            let line_count = cells
                .iter()
                .map(|cell| cell.lines.len())
                .max()
                .unwrap_or(0)
                .max(1);
            let height = row_height(line_count);
            if height <= FRAME_HEIGHT {
                self.reserve(height);
                self.row_part(left, x - left, &cells, row.kind, 0, line_count);
                continue;
            }

            tracing::warn!(
                height,
                "table row taller than a page; continuing it on the next page"
            );
            if !self.at_top {
                self.new_page();
            }
            let per_page = ((FRAME_HEIGHT - 2.0 * CELL_PADDING) / CELL_LEADING).floor() as usize;
            let mut first = 0;
            while first < line_count {
                if first > 0 {
                    self.new_page();
                }
                let count = per_page.min(line_count - first);
                self.row_part(left, x - left, &cells, row.kind, first, count);
                first += count;
            }
        }
    }

    /// Draws lines `first..first + count` of every cell in a row as one boxed band.
    fn row_part(
        &mut self,
        left: f32,
        row_width: f32,
        cells: &[CellBox],
        kind: RowKind,
        first: usize,
        count: usize,
    ) {
        let height = row_height(count);
        let top = self.y;
        let bottom = top - height;
        let text_gray = match kind {
            RowKind::Header => {
                self.current.ops.push(DrawOp::FillRect {
                    x: left,
                    y: bottom,
                    width: row_width,
                    height,
                    gray: BLACK,
                });
                WHITE
            }
            RowKind::Body => BLACK,
        };

        for cell in cells {
            let mut line_top = top - CELL_PADDING;
            for line in cell.lines.iter().skip(first).take(count) {
                self.current.ops.push(DrawOp::Text {
                    x: cell.x + CELL_PADDING,
                    y: baseline(line_top, CELL_SIZE, CELL_LEADING),
                    face: cell.face,
                    size: CELL_SIZE,
                    gray: text_gray,
                    text: line.clone(),
                });
                line_top -= CELL_LEADING;
            }
            self.current.ops.push(DrawOp::StrokeRect {
                x: cell.x,
                y: bottom,
                width: cell.width,
                height,
                line_width: GRID_WIDTH,
                gray: GRID_GRAY,
            });
        }

        self.y = bottom;
        self.at_top = false;
    }

    fn finish(mut self) -> Vec<Page> {
        if !self.current.ops.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }
}

struct CellBox {
    x: f32,
    width: f32,
    face: Face,
    lines: Vec<String>,
}

fn row_height(line_count: usize) -> f32 {
    line_count as f32 * CELL_LEADING + 2.0 * CELL_PADDING
}

fn baseline(line_top: f32, size: f32, leading: f32) -> f32 {
    line_top - (leading - size) / 2.0 - size * 0.8
}

/// Greedy word wrap. Runs of whitespace (including line breaks) collapse to a
/// single space; words wider than `max_width` are broken between characters.
pub fn wrap_text(text: &str, face: Face, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width(&candidate, face, size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if text_width(word, face, size) <= max_width {
            current = word.to_string();
            continue;
        }

        for c in word.chars() {
            current.push(c);
            if text_width(&current, face, size) > max_width && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::replace(&mut current, c.to_string()));
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
