use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::games::bike::Bike;
use crate::games::racer::{Racer, CANYON, SPEEDWAY};
use crate::games::snake::Snake;
use crate::games::Game;
use crate::leaderboard::Leaderboard;

/// Leaderboard names are capped at 20 characters.
const MAX_NAME_LEN: usize = 20;

#[derive(Clone, Copy, PartialEq)]
pub enum Tab {
    Home,
    Snake,
    Speedway,
    Canyon,
    Bike,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Home, Tab::Snake, Tab::Speedway, Tab::Canyon, Tab::Bike]
    }

    pub fn title(&self) -> &str {
        match self {
            Tab::Home => " Home ",
            Tab::Snake => " Snake ",
            Tab::Speedway => " Speedway ",
            Tab::Canyon => " Canyon ",
            Tab::Bike => " Dirt Dash ",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Home => 0,
            Tab::Snake => 1,
            Tab::Speedway => 2,
            Tab::Canyon => 3,
            Tab::Bike => 4,
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub current_tab: Tab,
    pub selected_game: usize, // 0-3 for home screen tile selection
    pub snake: Snake,
    pub speedway: Racer,
    pub canyon: Racer,
    pub bike: Bike,
    pub leaderboard: Leaderboard,
    pub show_leaderboard: bool,
    // Name entry state (snake leaderboard only)
    pub entering_name: bool,
    pub name_buffer: String,
    pub name_score: u32,
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            current_tab: Tab::Home,
            selected_game: 0,
            snake: Snake::new(),
            speedway: Racer::new(SPEEDWAY),
            canyon: Racer::new(CANYON),
            bike: Bike::new(),
            leaderboard: Leaderboard::load(),
            show_leaderboard: false,
            entering_name: false,
            name_buffer: String::new(),
            name_score: 0,
        }
    }

    pub fn on_tick(&mut self) {
        // Freeze the games while a name is being entered
        if self.entering_name {
            return;
        }

        match self.current_tab {
            Tab::Home => {}
            Tab::Snake => self.snake.update(),
            Tab::Speedway => self.speedway.update(),
            Tab::Canyon => self.canyon.update(),
            Tab::Bike => self.bike.update(),
        }

        // Only the snake game feeds the persistent leaderboard
        if self.snake.is_game_over() && self.snake.get_score() > 0 && !self.snake.score_submitted
        {
            self.snake.score_submitted = true;
            self.entering_name = true;
            self.name_buffer.clear();
            self.name_score = self.snake.get_score();
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Name entry captures all input while open
        if self.entering_name {
            self.handle_name_input(key);
            return;
        }

        // Global keys
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                if matches!(self.current_tab, Tab::Home) {
                    self.should_quit = true;
                    return;
                }
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.prev_tab();
                } else {
                    self.next_tab();
                }
                return;
            }
            KeyCode::BackTab => {
                self.prev_tab();
                return;
            }
            KeyCode::Esc => {
                if !matches!(self.current_tab, Tab::Home) {
                    self.current_tab = Tab::Home;
                    return;
                }
            }
            _ => {}
        }

        // Home screen shortcuts and tile navigation
        if matches!(self.current_tab, Tab::Home) && key.modifiers.is_empty() {
            match key.code {
                KeyCode::Char('1') => { self.current_tab = Tab::Snake; return; }
                KeyCode::Char('2') => { self.current_tab = Tab::Speedway; return; }
                KeyCode::Char('3') => { self.current_tab = Tab::Canyon; return; }
                KeyCode::Char('4') => { self.current_tab = Tab::Bike; return; }
                KeyCode::Char('h') | KeyCode::Char('H') => {
                    self.show_leaderboard = !self.show_leaderboard;
                    return;
                }
                KeyCode::Char('x') | KeyCode::Char('X') => {
                    if self.show_leaderboard {
                        self.leaderboard.clear();
                    }
                    return;
                }
                // Arrow navigation over a 2x2 tile grid
                KeyCode::Right => {
                    self.selected_game = (self.selected_game + 1) % 4;
                    return;
                }
                KeyCode::Left => {
                    self.selected_game = (self.selected_game + 3) % 4;
                    return;
                }
                KeyCode::Down | KeyCode::Up => {
                    self.selected_game = (self.selected_game + 2) % 4;
                    return;
                }
                KeyCode::Enter => {
                    self.current_tab = match self.selected_game {
                        0 => Tab::Snake,
                        1 => Tab::Speedway,
                        2 => Tab::Canyon,
                        3 => Tab::Bike,
                        _ => Tab::Home,
                    };
                    return;
                }
                _ => {}
            }
        }

        // Forward to the active game
        match self.current_tab {
            Tab::Home => {}
            Tab::Snake => self.snake.handle_input(key),
            Tab::Speedway => self.speedway.handle_input(key),
            Tab::Canyon => self.canyon.handle_input(key),
            Tab::Bike => self.bike.handle_input(key),
        }
    }

    fn handle_name_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.leaderboard.append(&self.name_buffer, self.name_score);
                self.entering_name = false;
                self.name_buffer.clear();
            }
            KeyCode::Backspace => {
                self.name_buffer.pop();
            }
            KeyCode::Esc => {
                // Skip saving this run
                self.entering_name = false;
                self.name_buffer.clear();
            }
            KeyCode::Char(c) => {
                if self.name_buffer.chars().count() < MAX_NAME_LEN && c.is_ascii_graphic() {
                    self.name_buffer.push(c);
                }
            }
            _ => {}
        }
    }

    fn next_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.current_tab = tabs[(idx + 1) % tabs.len()];
    }

    fn prev_tab(&mut self) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.current_tab = tabs[(idx + tabs.len() - 1) % tabs.len()];
    }
}
