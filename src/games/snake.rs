use crossterm::event::{KeyCode, KeyEvent};
use rand::Rng;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::Game;

// ── Tuning ───────────────────────────────────────────────────────────────────
const TICK_MS: u32 = 16;
const START_MOVE_INTERVAL_MS: u32 = 120; // one cell per interval
const MIN_MOVE_INTERVAL_MS: u32 = 40;
const SPEEDUP_PER_FOOD_MS: u32 = 3;
const POWER_FOOD_CHANCE: f64 = 0.12;

const SHIELD_SECS: u32 = 8;
const SLOW_SECS: u32 = 8;
const DOUBLE_SECS: u32 = 12;
const BONUS_POINTS: u32 = 5;

// ── Power-ups ────────────────────────────────────────────────────────────────
/// Timed, mutually exclusive effects. Picking up a new one replaces
/// whatever is currently active.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PowerUp {
    /// Absorbs one otherwise-fatal collision.
    Shield,
    /// Halves the movement rate.
    Slow,
    /// Doubles points per food.
    Double,
}

impl PowerUp {
    fn duration_secs(&self) -> u32 {
        match self {
            PowerUp::Shield => SHIELD_SECS,
            PowerUp::Slow => SLOW_SECS,
            PowerUp::Double => DOUBLE_SECS,
        }
    }

    fn label(&self) -> &str {
        match self {
            PowerUp::Shield => "SHIELD",
            PowerUp::Slow => "SLOW",
            PowerUp::Double => "DOUBLE",
        }
    }

    fn glyph(&self) -> char {
        match self {
            PowerUp::Shield => 'S',
            PowerUp::Slow => 'Z',
            PowerUp::Double => 'D',
        }
    }
}

#[derive(Clone, Copy)]
struct ActiveEffect {
    kind: PowerUp,
    secs_left: u32,
}

#[derive(Clone, Copy, PartialEq)]
enum FoodKind {
    Plain,
    /// Instant +5 score, no timed effect.
    Bonus,
    Power(PowerUp),
}

#[derive(Clone, Copy)]
struct Food {
    x: i32,
    y: i32,
    kind: FoodKind,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    x: i32,
    y: i32,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    fn delta(&self) -> (i32, i32) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    fn opposite(&self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

pub struct Snake {
    cols: i32,
    rows: i32,
    body: Vec<Cell>, // head first
    dir: Dir,
    /// Single staged turn, applied at most once at the start of a step.
    /// Reversals onto the current heading are rejected at apply time.
    pending: Option<Dir>,
    food: Food,
    effect: Option<ActiveEffect>,
    score: u32,
    high_score: u32,
    elapsed_secs: u32,
    move_interval_ms: u32,
    ms_since_move: u32,
    ms_since_sec: u32,
    game_over: bool,
    started: bool,
    paused: bool,
    /// Set once per run when the shell has collected a leaderboard name.
    pub score_submitted: bool,
}

impl Snake {
    pub fn new() -> Self {
        Self::with_grid(40, 22)
    }

    fn with_grid(cols: i32, rows: i32) -> Self {
        let mut snake = Self {
            cols,
            rows,
            body: vec![Cell { x: cols / 2, y: rows / 2 }],
            dir: Dir::Right,
            pending: None,
            food: Food { x: 0, y: 0, kind: FoodKind::Plain },
            effect: None,
            score: 0,
            high_score: 0,
            elapsed_secs: 0,
            move_interval_ms: START_MOVE_INTERVAL_MS,
            ms_since_move: 0,
            ms_since_sec: 0,
            game_over: false,
            started: false,
            paused: false,
            score_submitted: false,
        };
        snake.food = snake.spawn_food();
        snake
    }

    /// Queue a turn for the next step. Only the latest request before a
    /// step is kept; there is no multi-turn buffer.
    fn queue_turn(&mut self, dir: Dir) {
        self.pending = Some(dir);
    }

    /// Pick a food cell not occupied by the body, with a small chance of
    /// a power-up or bonus instead of plain food.
    fn spawn_food(&mut self) -> Food {
        let mut rng = rand::thread_rng();
        let kind = if rng.gen_bool(POWER_FOOD_CHANCE) {
            match rng.gen_range(0..4) {
                0 => FoodKind::Power(PowerUp::Shield),
                1 => FoodKind::Power(PowerUp::Slow),
                2 => FoodKind::Power(PowerUp::Double),
                _ => FoodKind::Bonus,
            }
        } else {
            FoodKind::Plain
        };

        loop {
            let x = rng.gen_range(0..self.cols);
            let y = rng.gen_range(0..self.rows);
            if !self.body.iter().any(|c| c.x == x && c.y == y) {
                return Food { x, y, kind };
            }
        }
    }

    fn apply_power(&mut self, kind: PowerUp) {
        // Overwrites any currently active effect
        self.effect = Some(ActiveEffect {
            kind,
            secs_left: kind.duration_secs(),
        });
    }

    /// Consume an active shield if there is one. Returns true if a
    /// collision was absorbed.
    fn try_consume_shield(&mut self) -> bool {
        if matches!(self.effect, Some(ActiveEffect { kind: PowerUp::Shield, .. })) {
            self.effect = None;
            true
        } else {
            false
        }
    }

    fn effect_is(&self, kind: PowerUp) -> bool {
        matches!(self.effect, Some(e) if e.kind == kind)
    }

    /// Advance the snake by one cell. This is the per-move simulation
    /// step; `update` calls it on the move cadence.
    fn step(&mut self) {
        if self.game_over {
            return;
        }

        // Apply the staged turn exactly once, rejecting a reversal
        if let Some(next) = self.pending.take() {
            if next != self.dir.opposite() {
                self.dir = next;
            }
        }

        let (dx, dy) = self.dir.delta();
        let head = Cell {
            x: self.body[0].x + dx,
            y: self.body[0].y + dy,
        };

        // Wall hit: a shield absorbs it and the snake stays put this step
        if head.x < 0 || head.y < 0 || head.x >= self.cols || head.y >= self.rows {
            if !self.try_consume_shield() {
                self.game_over = true;
                if self.score > self.high_score {
                    self.high_score = self.score;
                }
            }
            return;
        }

        // Self hit: a shield absorbs it and the head passes through
        let hits_body = self.body.iter().any(|c| *c == head);
        if hits_body && !self.try_consume_shield() {
            self.game_over = true;
            if self.score > self.high_score {
                self.high_score = self.score;
            }
            return;
        }

        self.body.insert(0, head);

        if head.x == self.food.x && head.y == self.food.y {
            match self.food.kind {
                FoodKind::Plain => {
                    self.score += if self.effect_is(PowerUp::Double) { 2 } else { 1 };
                }
                FoodKind::Bonus => {
                    self.score += BONUS_POINTS;
                }
                FoodKind::Power(kind) => self.apply_power(kind),
            }
            // Grow: skip the tail pop, tighten the move cadence
            self.move_interval_ms = self
                .move_interval_ms
                .saturating_sub(SPEEDUP_PER_FOOD_MS)
                .max(MIN_MOVE_INTERVAL_MS);
            self.food = self.spawn_food();
        } else {
            self.body.pop();
        }
    }

    /// Per-second bookkeeping: elapsed clock and effect decay.
    fn second_elapsed(&mut self) {
        self.elapsed_secs += 1;
        if let Some(effect) = &mut self.effect {
            effect.secs_left = effect.secs_left.saturating_sub(1);
            if effect.secs_left == 0 {
                self.effect = None;
            }
        }
    }

    fn effective_interval(&self) -> u32 {
        if self.effect_is(PowerUp::Slow) {
            self.move_interval_ms * 2
        } else {
            self.move_interval_ms
        }
    }

    fn resize_grid(&mut self, cols: i32, rows: i32) {
        if cols == self.cols && rows == self.rows {
            return;
        }
        self.cols = cols.max(10);
        self.rows = rows.max(8);
        // Only safe to reposition while nothing is in motion
        if !self.started || self.game_over {
            self.body = vec![Cell { x: self.cols / 2, y: self.rows / 2 }];
            self.food = self.spawn_food();
        }
    }

    fn render_field(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let mut grid: Vec<Vec<(char, Style)>> = vec![vec![(' ', Style::default()); width]; height];

        // Each grid cell is 2 columns wide for a squarer aspect
        let put = |grid: &mut Vec<Vec<(char, Style)>>, cx: i32, cy: i32, ch: char, style: Style| {
            let x = (cx * 2) as usize;
            let y = cy as usize;
            if cy >= 0 && y < grid.len() && cx >= 0 && x + 1 < grid[y].len() {
                grid[y][x] = (ch, style);
                grid[y][x + 1] = (ch, style);
            }
        };

        // Checkerboard backdrop
        for y in 0..height {
            for x in 0..width {
                let dark = ((x / 2) + y) % 2 == 0;
                let v = if dark { 18 } else { 24 };
                grid[y][x] = (' ', Style::default().bg(Color::Rgb(v, v, v + 6)));
            }
        }

        // Food
        match self.food.kind {
            FoodKind::Plain => put(
                &mut grid,
                self.food.x,
                self.food.y,
                '▄',
                Style::default().fg(Color::Rgb(255, 60, 60)),
            ),
            FoodKind::Bonus => put(
                &mut grid,
                self.food.x,
                self.food.y,
                '5',
                Style::default()
                    .fg(Color::Rgb(255, 212, 0))
                    .add_modifier(Modifier::BOLD),
            ),
            FoodKind::Power(p) => put(
                &mut grid,
                self.food.x,
                self.food.y,
                p.glyph(),
                Style::default()
                    .fg(Color::Rgb(255, 212, 0))
                    .add_modifier(Modifier::BOLD),
            ),
        }

        // Body with a tail-fading gradient, head brightest
        let len = self.body.len().max(1);
        for (i, cell) in self.body.iter().enumerate().rev() {
            let fade = 1.0 - (i as f32 / len as f32) * 0.6;
            let g = (230.0 * fade) as u8;
            let style = if i == 0 {
                Style::default()
                    .fg(Color::Rgb(120, 255, 170))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Rgb(0, g, 102))
            };
            let ch = if i == 0 {
                match self.dir {
                    Dir::Up => '▀',
                    Dir::Down => '▄',
                    Dir::Left | Dir::Right => '█',
                }
            } else {
                '█'
            };
            put(&mut grid, cell.x, cell.y, ch, style);
        }

        grid.into_iter()
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

impl Game for Snake {
    fn update(&mut self) {
        if self.game_over || self.paused || !self.started {
            return;
        }

        self.ms_since_sec += TICK_MS;
        if self.ms_since_sec >= 1000 {
            self.ms_since_sec -= 1000;
            self.second_elapsed();
        }

        self.ms_since_move += TICK_MS;
        if self.ms_since_move >= self.effective_interval() {
            self.ms_since_move = 0;
            self.step();
        }
    }

    fn handle_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.reset();
                return;
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                if !self.game_over && self.started {
                    self.paused = !self.paused;
                }
                return;
            }
            _ => {}
        }

        if self.game_over {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                self.reset();
            }
            return;
        }
        if !self.started {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                self.started = true;
            }
            return;
        }
        if self.paused {
            return;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => self.queue_turn(Dir::Up),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => self.queue_turn(Dir::Down),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => self.queue_turn(Dir::Left),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => self.queue_turn(Dir::Right),
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 200, 120)))
            .title(" 🐍 Snake ")
            .title_style(
                Style::default()
                    .fg(Color::Rgb(120, 255, 170))
                    .add_modifier(Modifier::BOLD),
            );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Status bar
                Constraint::Min(8),    // Field
                Constraint::Length(1), // Help
            ])
            .split(inner);

        let field_w = chunks[1].width as usize;
        let field_h = chunks[1].height as usize;
        self.resize_grid((field_w / 2) as i32, field_h as i32);

        let power_text = match self.effect {
            Some(e) => format!("{} {}s", e.kind.label(), e.secs_left),
            None => "—".to_string(),
        };
        let status = Line::from(vec![
            Span::styled(
                format!(" Score: {:04} ", self.score),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("🏆 Best: {:04} ", self.high_score),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("⚡ {power_text} "),
                Style::default().fg(Color::Rgb(255, 212, 0)),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("⏱ {}s ", self.elapsed_secs),
                Style::default().fg(Color::Green),
            ),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[0]);

        let lines = self.render_field(field_w, field_h);
        frame.render_widget(Paragraph::new(lines), chunks[1]);

        if self.game_over {
            let msg = Paragraph::new(Line::from(vec![
                Span::styled(
                    " 💀 GAME OVER! ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("Score: {} │ ", self.score),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    "Press ENTER to restart, Esc for menu",
                    Style::default().fg(Color::Gray),
                ),
            ]));
            frame.render_widget(msg, chunks[2]);
        } else if !self.started {
            let msg = Paragraph::new(Line::from(vec![
                Span::styled(
                    " ▶ Press ENTER to start! ",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    "↑↓←→/WASD Turn │ P Pause │ R Restart │ Esc Menu",
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
            frame.render_widget(msg, chunks[2]);
        } else if self.paused {
            let msg = Paragraph::new(Line::from(vec![Span::styled(
                " ⏸ PAUSED - Press P to resume ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )]));
            frame.render_widget(msg, chunks[2]);
        } else {
            let help = Paragraph::new(Line::from(vec![
                Span::styled(" ↑↓←→/WASD Turn ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("P Pause ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("R Restart ", Style::default().fg(Color::DarkGray)),
                Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
                Span::styled("Esc Menu", Style::default().fg(Color::DarkGray)),
            ]));
            frame.render_widget(help, chunks[2]);
        }
    }

    fn reset(&mut self) {
        let hs = self.high_score;
        let (cols, rows) = (self.cols, self.rows);
        *self = Snake::with_grid(cols, rows);
        self.high_score = hs;
    }

    fn get_score(&self) -> u32 {
        self.score
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_snake() -> Snake {
        let mut snake = Snake::with_grid(20, 20);
        snake.started = true;
        // Keep food out of the way unless a test moves it
        snake.food = Food { x: 19, y: 19, kind: FoodKind::Plain };
        snake
    }

    fn place_head(snake: &mut Snake, x: i32, y: i32) {
        snake.body = vec![Cell { x, y }];
    }

    #[test]
    fn test_reversal_rejected() {
        let mut snake = test_snake();
        assert_eq!(snake.dir, Dir::Right);
        snake.queue_turn(Dir::Left);
        snake.step();
        assert_eq!(snake.dir, Dir::Right);
    }

    #[test]
    fn test_staged_turn_applied_once_per_step() {
        let mut snake = test_snake();
        snake.queue_turn(Dir::Up);
        snake.queue_turn(Dir::Down); // latest request wins before the step
        snake.step();
        assert_eq!(snake.dir, Dir::Down);
        assert!(snake.pending.is_none());
    }

    #[test]
    fn test_two_turns_cannot_reverse_in_one_step() {
        // Up then Left staged before a single step: only the last request
        // survives, and it is rejected as a reversal of Right
        let mut snake = test_snake();
        snake.dir = Dir::Right;
        snake.queue_turn(Dir::Up);
        snake.queue_turn(Dir::Left);
        snake.step();
        assert_eq!(snake.dir, Dir::Right);
    }

    #[test]
    fn test_wall_hit_is_terminal() {
        let mut snake = test_snake();
        place_head(&mut snake, 19, 10);
        snake.dir = Dir::Right;
        snake.step();
        assert!(snake.game_over);
    }

    #[test]
    fn test_shield_absorbs_wall_hit_once() {
        let mut snake = test_snake();
        place_head(&mut snake, 19, 10);
        snake.dir = Dir::Right;
        snake.apply_power(PowerUp::Shield);

        snake.step();
        assert!(!snake.game_over);
        assert!(snake.effect.is_none(), "shield consumed");
        assert_eq!(snake.body[0], Cell { x: 19, y: 10 }, "stays put on shielded wall hit");

        // Second hit with no shield left is terminal
        snake.step();
        assert!(snake.game_over);
    }

    #[test]
    fn test_self_collision_terminal_without_shield() {
        let mut snake = test_snake();
        // A 2x2 loop about to bite its own body
        snake.body = vec![
            Cell { x: 5, y: 5 },
            Cell { x: 5, y: 6 },
            Cell { x: 6, y: 6 },
            Cell { x: 6, y: 5 },
        ];
        snake.dir = Dir::Right; // head moves onto (6,5)
        snake.step();
        assert!(snake.game_over);
    }

    #[test]
    fn test_eating_grows_and_scores() {
        let mut snake = test_snake();
        place_head(&mut snake, 5, 5);
        snake.dir = Dir::Right;
        snake.food = Food { x: 6, y: 5, kind: FoodKind::Plain };

        let len_before = snake.body.len();
        snake.step();
        assert_eq!(snake.score, 1);
        assert_eq!(snake.body.len(), len_before + 1);
    }

    #[test]
    fn test_double_effect_doubles_food_score() {
        let mut snake = test_snake();
        place_head(&mut snake, 5, 5);
        snake.dir = Dir::Right;
        snake.apply_power(PowerUp::Double);
        snake.food = Food { x: 6, y: 5, kind: FoodKind::Plain };

        snake.step();
        assert_eq!(snake.score, 2);
    }

    #[test]
    fn test_bonus_food_adds_five() {
        let mut snake = test_snake();
        place_head(&mut snake, 5, 5);
        snake.dir = Dir::Right;
        snake.food = Food { x: 6, y: 5, kind: FoodKind::Bonus };

        snake.step();
        assert_eq!(snake.score, BONUS_POINTS);
    }

    #[test]
    fn test_new_effect_overwrites_active_one() {
        let mut snake = test_snake();
        snake.apply_power(PowerUp::Shield);
        snake.apply_power(PowerUp::Slow);
        assert!(snake.effect_is(PowerUp::Slow));
        assert!(!snake.effect_is(PowerUp::Shield));
    }

    #[test]
    fn test_effect_expires_after_duration() {
        let mut snake = test_snake();
        snake.apply_power(PowerUp::Slow);
        for _ in 0..SLOW_SECS {
            snake.second_elapsed();
        }
        assert!(snake.effect.is_none());
    }

    #[test]
    fn test_slow_effect_doubles_move_interval() {
        let mut snake = test_snake();
        let base = snake.effective_interval();
        snake.apply_power(PowerUp::Slow);
        assert_eq!(snake.effective_interval(), base * 2);
    }

    #[test]
    fn test_spawn_never_on_body() {
        let mut snake = Snake::with_grid(6, 6);
        // Fill most of the grid with body cells
        snake.body = (0..6)
            .flat_map(|y| (0..5).map(move |x| Cell { x, y }))
            .collect();
        for _ in 0..50 {
            let food = snake.spawn_food();
            assert!(
                !snake.body.iter().any(|c| c.x == food.x && c.y == food.y),
                "food spawned on the body"
            );
        }
    }

    #[test]
    fn test_terminal_step_is_noop_until_reset() {
        let mut snake = test_snake();
        place_head(&mut snake, 19, 10);
        snake.dir = Dir::Right;
        snake.step();
        assert!(snake.game_over);

        let body = snake.body.clone();
        let score = snake.score;
        for _ in 0..10 {
            snake.step();
            snake.update();
        }
        assert_eq!(snake.body, body);
        assert_eq!(snake.score, score);

        snake.reset();
        assert!(!snake.game_over);
        assert_eq!(snake.score, 0);
    }

    #[test]
    fn test_score_resets_to_zero_on_reset() {
        let mut snake = test_snake();
        snake.score = 17;
        snake.reset();
        assert_eq!(snake.score, 0);
    }

    proptest! {
        /// For any sequence of turn inputs, the heading after a step is
        /// never the exact reverse of the heading before it.
        #[test]
        fn prop_heading_never_reverses(turns in prop::collection::vec(0u8..4, 1..80)) {
            let mut snake = Snake::with_grid(1000, 1000);
            snake.started = true;
            place_head(&mut snake, 500, 500);
            snake.food = Food { x: 0, y: 0, kind: FoodKind::Plain };

            for chunk in turns.chunks(2) {
                let before = snake.dir;
                for t in chunk {
                    let dir = match t {
                        0 => Dir::Up,
                        1 => Dir::Down,
                        2 => Dir::Left,
                        _ => Dir::Right,
                    };
                    snake.queue_turn(dir);
                }
                snake.step();
                prop_assert!(snake.dir != before.opposite(),
                    "reversed from {:?} to {:?}", before, snake.dir);
            }
        }
    }
}
