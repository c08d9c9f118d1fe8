use gridfall_engine::PieceKind;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::CellDisplay;

/// Preview of a single piece kind at its spawn orientation, centered in a
/// 4×2 cell box.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    kind: Option<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            kind: None,
            block: None,
        }
    }

    pub fn kind(self, kind: PieceKind) -> Self {
        Self {
            kind: Some(kind),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        4 * CellDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        2 * CellDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

/// Spawn-orientation cells shifted so the bounding box starts at (0, 0),
/// plus the box size as (columns, rows).
fn preview_shape(kind: PieceKind) -> ([(u16, u16); 4], (u16, u16)) {
    let offsets = kind.spawn_offsets();
    let mut min_row = usize::MAX;
    let mut min_col = usize::MAX;
    let mut max_row = 0;
    let mut max_col = 0;
    for &(row, col) in &offsets {
        min_row = min_row.min(row);
        min_col = min_col.min(col);
        max_row = max_row.max(row);
        max_col = max_col.max(col);
    }
    let mut shape = [(0, 0); 4];
    #[expect(clippy::cast_possible_truncation)]
    for (target, &(row, col)) in shape.iter_mut().zip(&offsets) {
        *target = ((row - min_row) as u16, (col - min_col) as u16);
    }
    #[expect(clippy::cast_possible_truncation)]
    let size = (
        (max_col - min_col + 1) as u16,
        (max_row - min_row + 1) as u16,
    );
    (shape, size)
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let empty_cell = CellDisplay::from_color(None, false);
        let Some(kind) = self.kind else {
            Widget::render(&empty_cell, area, buf);
            return;
        };

        let (shape, (columns, rows)) = preview_shape(kind);
        let piece_area = area.centered(
            Constraint::Length(columns * CellDisplay::width()),
            Constraint::Length(rows * CellDisplay::height()),
        );

        let col_constraints = (0..columns).map(|_| Constraint::Length(CellDisplay::width()));
        let row_constraints = (0..rows).map(|_| Constraint::Length(CellDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let occupied_cell = CellDisplay::from_color(Some(kind.color()), false);
        for (y, grid_row) in grid_rows.enumerate() {
            for (x, grid_cell) in grid_row.into_iter().enumerate() {
                #[expect(clippy::cast_possible_truncation)]
                let position = (y as u16, x as u16);
                if shape.contains(&position) {
                    Widget::render(&occupied_cell, grid_cell, buf);
                } else {
                    Widget::render(&empty_cell, grid_cell, buf);
                }
            }
        }
    }
}
