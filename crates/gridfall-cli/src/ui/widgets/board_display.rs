use std::iter;

use gridfall_engine::{BOARD_HEIGHT, BOARD_WIDTH, Board, CellColor};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::widgets::CellDisplay;

/// The 20×10 playfield with the falling piece overlaid. Falling cells that
/// are still above the visible grid (negative rows) are clipped.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self { board, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        10 * CellDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        20 * CellDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }

    fn color_grid(&self) -> [[Option<CellColor>; BOARD_WIDTH]; BOARD_HEIGHT] {
        let mut grid = [[None; BOARD_WIDTH]; BOARD_HEIGHT];
        for (colors, row) in iter::zip(&mut grid, self.board.grid_rows()) {
            for (color, cell) in iter::zip(colors, row) {
                *color = cell.map(|cell| cell.color());
            }
        }
        for cell in self.board.falling_piece().cells() {
            let (Ok(row), Ok(column)) =
                (usize::try_from(cell.row()), usize::try_from(cell.column()))
            else {
                continue;
            };
            if row < BOARD_HEIGHT && column < BOARD_WIDTH {
                grid[row][column] = Some(cell.color());
            }
        }
        grid
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let grid = self.color_grid();

        let col_constraints = (0..BOARD_WIDTH).map(|_| Constraint::Length(CellDisplay::width()));
        let row_constraints = (0..BOARD_HEIGHT).map(|_| Constraint::Length(CellDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<BOARD_HEIGHT>(&vertical)
            .into_iter()
            .map(|row| row.layout::<BOARD_WIDTH>(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, grid) {
            for (grid_cell, color) in iter::zip(grid_row, row) {
                let cell_display = CellDisplay::from_color(color, true);
                cell_display.render(grid_cell, buf);
            }
        }
    }
}
