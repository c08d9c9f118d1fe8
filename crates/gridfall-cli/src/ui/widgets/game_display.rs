use gridfall_engine::Board;
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{BoardDisplay, PieceDisplay, QueueDisplay, StatsDisplay, color, style};

/// The whole play screen: HOLD and STATS on the left, the playfield in the
/// center, the NEXT queue on the right, with a status popup over the board
/// and a notice line underneath.
#[derive(Debug)]
pub struct GameDisplay<'a> {
    board: &'a Board,
    paused: bool,
    fast_drop: bool,
    notice: Option<&'a str>,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> GameDisplay<'a> {
    pub fn new(board: &'a Board, paused: bool) -> Self {
        Self {
            board,
            paused,
            fast_drop: false,
            notice: None,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    pub fn fast_drop(self, fast_drop: bool) -> Self {
        Self { fast_drop, ..self }
    }

    pub fn notice(self, notice: Option<&'a str>) -> Self {
        Self { notice, ..self }
    }
}

impl Widget for GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let style = style::DEFAULT;
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = if self.board.is_game_over() {
            color::RED
        } else if self.paused {
            color::YELLOW
        } else if self.fast_drop {
            color::MAGENTA
        } else {
            color::WHITE
        };

        let game_board = BoardDisplay::new(self.board)
            .block(Block::bordered().border_style(border_style).style(style));
        let hold_panel = {
            let panel = PieceDisplay::new().block(
                Block::bordered()
                    .title(Line::from("HOLD").centered())
                    .padding(block_padding)
                    .border_style(border_style)
                    .style(style::DEFAULT),
            );
            if let Some(piece) = self.board.held_piece() {
                panel.kind(piece.kind())
            } else {
                panel
            }
        };
        let piece_queue = QueueDisplay::new(self.board.queued_pieces()).block(
            Block::bordered()
                .title(Line::from("NEXT").centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT),
        );
        let game_stats = StatsDisplay::new(self.board).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT),
        );

        let [columns_area, notice_area] = Layout::vertical([
            Constraint::Length(game_board.height()),
            Constraint::Length(1),
        ])
        .areas(area);

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(u16::max(hold_panel.width(), game_stats.width())),
            Constraint::Length(game_board.width()),
            Constraint::Length(piece_queue.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(columns_area);

        let [hold_area, stats_area] = Layout::vertical([
            Constraint::Length(hold_panel.height()),
            Constraint::Length(game_stats.height()),
        ])
        .spacing(1)
        .areas(left_column);
        let hold_area = hold_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(hold_panel.width())]).flex(Flex::End),
        )[0];
        let stats_area = stats_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(game_stats.width())]).flex(Flex::End),
        )[0];

        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);

        let [piece_queue_area] =
            Layout::vertical([Constraint::Length(piece_queue.height())]).areas(right_column);

        let game_board_width = game_board.width();
        hold_panel.render(hold_area, buf);
        game_stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        piece_queue.render(piece_queue_area, buf);

        let popup = if self.board.is_game_over() {
            Some(("GAME OVER!!", Style::new().fg(color::WHITE).bg(color::RED)))
        } else if self.paused {
            Some(("PAUSED", Style::new().fg(color::BLACK).bg(color::YELLOW)))
        } else {
            None
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }

        if let Some(notice) = self.notice {
            let notice_area = notice_area.layout::<1>(
                &Layout::horizontal([Constraint::Length(game_board_width)]).flex(Flex::Center),
            )[0];
            Line::styled(notice, Style::new().fg(color::YELLOW).bg(color::BLACK))
                .centered()
                .render(notice_area, buf);
        }
    }
}
