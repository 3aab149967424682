use ratatui::prelude::*;

use crate::engine::canvas::Canvas;
use crate::engine::geom::Vec2;

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;
/// Absorbs float error when a scale fits the area exactly.
const FIT_EPSILON: f32 = 1e-3;

/// Where a logical canvas lands on the terminal grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub area: Rect,
    /// Columns per logical pixel.
    pub sx: f32,
    /// Rows per logical pixel.
    pub sy: f32,
}

impl Viewport {
    /// Largest aspect-correct fit of `logical` inside `avail`, centred.
    pub fn fit(avail: Rect, logical: (f32, f32)) -> Self {
        let (w, h) = logical;
        let sy = (avail.height as f32 / h).min(avail.width as f32 / (w * CELL_ASPECT));
        let sx = sy * CELL_ASPECT;
        let cols = ((w * sx + FIT_EPSILON).floor() as u16).clamp(1, avail.width.max(1));
        let rows = ((h * sy + FIT_EPSILON).floor() as u16).clamp(1, avail.height.max(1));
        let area = Rect::new(
            avail.x + (avail.width.saturating_sub(cols)) / 2,
            avail.y + (avail.height.saturating_sub(rows)) / 2,
            cols,
            rows,
        );
        Self { area, sx, sy }
    }

    /// Logical position at the centre of a terminal cell, if the cell is inside.
    pub fn to_logical(&self, column: u16, row: u16) -> Option<Vec2> {
        if !self.area.contains(Position::new(column, row)) {
            return None;
        }
        let cx = (column - self.area.x) as f32 + 0.5;
        let cy = (row - self.area.y) as f32 + 0.5;
        Some(Vec2::new(cx / self.sx, cy / self.sy))
    }
}

/// Rasterizes logical-pixel primitives onto a character grid.
pub struct CellCanvas {
    logical: (f32, f32),
    sx: f32,
    sy: f32,
    cols: usize,
    rows: usize,
    grid: Vec<Vec<(char, Style)>>,
}

impl CellCanvas {
    pub fn new(viewport: &Viewport, logical: (f32, f32)) -> Self {
        let cols = viewport.area.width as usize;
        let rows = viewport.area.height as usize;
        Self {
            logical,
            sx: viewport.sx,
            sy: viewport.sy,
            cols,
            rows,
            grid: vec![vec![(' ', Style::default()); cols]; rows],
        }
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<(char, Style)> {
        self.grid.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Covered cell range `[start, end)` along one axis, at least one cell wide.
    fn span(start: f32, len: f32, scale: f32, limit: usize) -> (usize, usize) {
        let a = (start * scale).floor().max(0.0) as usize;
        let b = ((start + len) * scale).round().max(0.0) as usize;
        let a = a.min(limit);
        (a, b.max(a + 1).min(limit))
    }

    pub fn into_lines(self) -> Vec<Line<'static>> {
        self.grid
            .into_iter()
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .into_iter()
                    .map(|(ch, style)| Span::styled(String::from(ch), style))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

impl Canvas for CellCanvas {
    fn size(&self) -> (f32, f32) {
        self.logical
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let (c0, c1) = Self::span(x, w, self.sx, self.cols);
        let (r0, r1) = Self::span(y, h, self.sy, self.rows);
        for row in &mut self.grid[r0..r1] {
            for cell in &mut row[c0..c1] {
                *cell = (' ', Style::default().bg(color));
            }
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Color) {
        let (c0, c1) = Self::span(cx - r, 2.0 * r, self.sx, self.cols);
        let (r0, r1) = Self::span(cy - r, 2.0 * r, self.sy, self.rows);
        let mut painted = false;
        for row in r0..r1 {
            for col in c0..c1 {
                let px = (col as f32 + 0.5) / self.sx;
                let py = (row as f32 + 0.5) / self.sy;
                if (px - cx).powi(2) + (py - cy).powi(2) <= r * r {
                    self.grid[row][col] = (' ', Style::default().bg(color));
                    painted = true;
                }
            }
        }
        if !painted {
            // Smaller than a cell: mark the cell under the centre.
            let col = (cx * self.sx) as usize;
            let row = (cy * self.sy) as usize;
            if let Some(cell) = self.grid.get_mut(row).and_then(|r| r.get_mut(col)) {
                *cell = ('●', cell.1.fg(color).add_modifier(Modifier::BOLD));
            }
        }
    }

    fn text(&mut self, x: f32, y: f32, text: &str, color: Color) {
        // `y` is a baseline; draw on the row just above it.
        let row = ((y * self.sy) as usize).saturating_sub(1);
        let Some(line) = self.grid.get_mut(row) else { return };
        let start = (x * self.sx) as usize;
        for (cell, ch) in line.iter_mut().skip(start).zip(text.chars()) {
            *cell = (ch, cell.1.fg(color).add_modifier(Modifier::BOLD));
        }
    }
}
