use std::{
    fs, io,
    path::PathBuf,
    time::{Duration, Instant},
};

use crossterm::event::{self, Event, KeyCode};
use gridfall_engine::{Board, save};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::ui::widgets::GameDisplay;

const TICK_INTERVAL: Duration = Duration::from_millis(500);
const FAST_TICK_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug)]
pub struct PlayScreen {
    board: Board,
    save_path: PathBuf,
    paused: bool,
    fast_drop: bool,
    notice: Option<String>,
    next_tick_at: Instant,
    is_exiting: bool,
}

impl PlayScreen {
    pub fn new(save_path: PathBuf) -> Self {
        Self {
            board: Board::new(),
            save_path,
            paused: false,
            fast_drop: false,
            notice: None,
            next_tick_at: Instant::now() + TICK_INTERVAL,
            is_exiting: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        while !self.is_exiting {
            terminal.draw(|frame| self.draw(frame))?;

            let now = Instant::now();
            if now >= self.next_tick_at {
                self.tick();
                continue;
            }
            if event::poll(self.next_tick_at - now)? {
                let event = event::read()?;
                self.handle_event(&event);
            }
        }
        Ok(())
    }

    fn is_playing(&self) -> bool {
        !self.paused && !self.board.is_game_over()
    }

    fn tick_interval(&self) -> Duration {
        if self.fast_drop {
            FAST_TICK_INTERVAL
        } else {
            TICK_INTERVAL
        }
    }

    fn reschedule_tick(&mut self) {
        self.next_tick_at = Instant::now() + self.tick_interval();
    }

    fn tick(&mut self) {
        self.reschedule_tick();
        if self.is_playing() {
            self.board.fall();
        }
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        let game_display = GameDisplay::new(&self.board, self.paused)
            .fast_drop(self.fast_drop)
            .notice(self.notice.as_deref());
        let help_text = if self.board.is_game_over() {
            "Controls: R (New Game) | L (Load) | Q (Quit)"
        } else if self.paused {
            "Controls: P (Resume) | S (Save) | L (Load) | R (New Game) | Q (Quit)"
        } else {
            "Controls: ← → (Move) | Z X (Rotate) | Space (Drop) | C (Hold) | ↓ (Fast) | P (Pause) | S L R Q"
        };
        let help_text = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(25), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(game_display, main_area);
        frame.render_widget(help_text, help_area);
    }

    fn handle_event(&mut self, event: &Event) {
        let is_playing = self.is_playing();
        let Some(event) = event.as_key_event() else {
            return;
        };
        match event.code {
            KeyCode::Left if is_playing => self.board.move_left(),
            KeyCode::Right if is_playing => self.board.move_right(),
            KeyCode::Char('z') if is_playing => self.board.rotate_ccw(),
            KeyCode::Char('x') if is_playing => self.board.rotate_cw(),
            KeyCode::Char(' ') if is_playing => self.board.hard_fall(),
            KeyCode::Char('c') if is_playing => self.board.hold(),
            KeyCode::Down if is_playing => {
                self.fast_drop = !self.fast_drop;
                self.reschedule_tick();
            }
            KeyCode::Char('p') if !self.board.is_game_over() => {
                self.paused = !self.paused;
                if !self.paused {
                    self.notice = None;
                    self.reschedule_tick();
                }
            }
            KeyCode::Char('s') => self.save_game(),
            KeyCode::Char('l') => self.load_game(),
            KeyCode::Char('r') => self.reset_game(),
            KeyCode::Char('q') => self.is_exiting = true,
            _ => {}
        }
    }

    /// Saving pauses the game. A write failure leaves the in-memory game
    /// untouched and only surfaces a notice.
    fn save_game(&mut self) {
        self.paused = true;
        let parent = self
            .save_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());
        let result = parent
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|()| fs::write(&self.save_path, save::encode(&self.board)));
        self.notice = Some(match result {
            Ok(()) => "Game saved".to_owned(),
            Err(_) => "Could not write save file".to_owned(),
        });
    }

    /// Loading is all-or-nothing: a missing file or malformed save data
    /// resets to a fresh game, never a half-restored one. The loaded (or
    /// reset) game starts paused.
    fn load_game(&mut self) {
        self.paused = true;
        self.fast_drop = false;
        match fs::read_to_string(&self.save_path) {
            Ok(text) => match save::decode(&text) {
                Ok(board) => {
                    self.board = board;
                    self.notice = Some("Game loaded".to_owned());
                }
                Err(_) => {
                    self.board.reset();
                    self.notice = Some("Invalid save file".to_owned());
                }
            },
            Err(_) => {
                self.board.reset();
                self.notice = Some("Save file not found".to_owned());
            }
        }
    }

    fn reset_game(&mut self) {
        self.board.reset();
        self.paused = false;
        self.fast_drop = false;
        self.notice = None;
        self.reschedule_tick();
    }
}
