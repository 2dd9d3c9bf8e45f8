use crossterm::event::{KeyCode, KeyEvent};
use rand::Rng;
use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::latch::{DriveLatch, HeldKey};
use crate::games::Game;

// ── Simulation constants ─────────────────────────────────────────────────────
const DT: f32 = 1.0 / 60.0; // seconds per tick
const LANE_SPACING_M: f32 = 3.5;
const LATERAL_RATE: f32 = 2.6; // lanes per second at full steer
const VIEW_DISTANCE_M: f32 = 140.0;
const DESPAWN_BEHIND_M: f32 = 10.0;
const NITRO_MAX: f32 = 100.0;

/// Everything that differs between the two racer variants. One simulation,
/// two tunings.
pub struct Tuning {
    pub name: &'static str,
    pub icon: &'static str,
    pub lanes: usize,
    pub accel: f32,         // m/s² under throttle
    pub brake: f32,         // m/s² under brake
    pub drag: f32,          // m/s² coasting
    pub max_speed: f32,     // m/s
    pub boost_speed: f32,   // raised cap while nitro burns
    pub spawn_gap_m: f32,   // average forward gap between spawns
    pub spawn_ahead_m: f32, // obstacles materialize this far ahead
    pub hit_radius_m: f32,  // collision threshold at size 1.0
    pub shield_chance: f64, // chance a spawn is a shield pickup
    pub nitro_gain: f32,    // meter points per meter traveled
    pub nitro_burn: f32,    // meter points per second while boosting
    pub road_color: Color,
    pub accent: Color,
}

/// Wide, forgiving four-lane speedway.
pub const SPEEDWAY: Tuning = Tuning {
    name: "Speedway",
    icon: "🏎",
    lanes: 4,
    accel: 9.0,
    brake: 16.0,
    drag: 3.0,
    max_speed: 42.0,
    boost_speed: 58.0,
    spawn_gap_m: 46.0,
    spawn_ahead_m: 120.0,
    hit_radius_m: 1.6,
    shield_chance: 0.10,
    nitro_gain: 0.035,
    nitro_burn: 28.0,
    road_color: Color::Rgb(70, 70, 82),
    accent: Color::Rgb(80, 200, 255),
};

/// Narrow three-lane canyon run: quicker, denser, less room for error.
pub const CANYON: Tuning = Tuning {
    name: "Canyon",
    icon: "🌄",
    lanes: 3,
    accel: 11.0,
    brake: 18.0,
    drag: 2.0,
    max_speed: 50.0,
    boost_speed: 66.0,
    spawn_gap_m: 34.0,
    spawn_ahead_m: 110.0,
    hit_radius_m: 1.5,
    shield_chance: 0.07,
    nitro_gain: 0.045,
    nitro_burn: 34.0,
    road_color: Color::Rgb(86, 66, 54),
    accent: Color::Rgb(255, 160, 60),
};

#[derive(Clone, Copy, PartialEq)]
enum ObstacleKind {
    Block,
    /// Pickup: grants a one-hit shield instead of ending the run.
    Shield,
}

#[derive(Clone, Copy)]
struct Obstacle {
    lane: usize,
    pos_m: f32, // forward position on the track
    size: f32,  // 0.6..1.4, scales the hit radius and the sprite
    kind: ObstacleKind,
}

pub struct Racer {
    tuning: Tuning,
    latch: DriveLatch,
    boost_held: HeldKey,
    lane_pos: f32, // fractional lane index, 0.0 .. lanes-1
    speed: f32,
    distance_m: f64,
    nitro: f32,
    has_shield: bool,
    obstacles: Vec<Obstacle>,
    next_spawn_m: f32,
    high_score: u32,
    game_over: bool,
    started: bool,
    paused: bool,
}

impl Racer {
    pub fn new(tuning: Tuning) -> Self {
        let lanes = tuning.lanes;
        let spawn_ahead = tuning.spawn_ahead_m;
        Self {
            tuning,
            latch: DriveLatch::default(),
            boost_held: Default::default(),
            lane_pos: (lanes as f32 - 1.0) / 2.0,
            speed: 0.0,
            distance_m: 0.0,
            nitro: 0.0,
            has_shield: false,
            obstacles: Vec::new(),
            next_spawn_m: spawn_ahead,
            high_score: 0,
            game_over: false,
            started: false,
            paused: false,
        }
    }

    fn boosting(&self) -> bool {
        self.boost_held.is_held() && self.nitro > 0.0
    }

    /// One fixed-dt simulation step: integrate speed and lateral position,
    /// spawn and cull obstacles, then resolve collisions.
    fn step(&mut self) {
        if self.game_over {
            return;
        }

        // Throttle/brake/coast, clamped to [0, cap]
        let cap = if self.boosting() {
            self.tuning.boost_speed
        } else {
            self.tuning.max_speed
        };
        if self.latch.throttle.is_held() {
            self.speed += self.tuning.accel * DT;
        } else if self.latch.brake.is_held() {
            self.speed -= self.tuning.brake * DT;
        } else {
            self.speed -= self.tuning.drag * DT;
        }
        self.speed = self.speed.clamp(0.0, cap);

        // Nitro: earn from ground covered, burn while held
        self.nitro = (self.nitro + self.speed * DT * self.tuning.nitro_gain).min(NITRO_MAX);
        if self.boosting() {
            self.nitro = (self.nitro - self.tuning.nitro_burn * DT).max(0.0);
        }

        // Distance only ever grows
        self.distance_m += (self.speed * DT) as f64;

        // Lateral steering toward the held direction
        let steer = self.latch.steer() as f32;
        self.lane_pos =
            (self.lane_pos + steer * LATERAL_RATE * DT).clamp(0.0, self.tuning.lanes as f32 - 1.0);

        self.spawn_due_obstacles();

        // Drop what is behind the player
        let cutoff = self.distance_m as f32 - DESPAWN_BEHIND_M;
        self.obstacles.retain(|o| o.pos_m > cutoff);

        self.resolve_collisions();
    }

    fn spawn_due_obstacles(&mut self) {
        let mut rng = rand::thread_rng();
        while self.distance_m as f32 + self.tuning.spawn_ahead_m >= self.next_spawn_m {
            let lane = rng.gen_range(0..self.tuning.lanes);
            let size = rng.gen_range(0.6..1.4);
            let kind = if rng.gen_bool(self.tuning.shield_chance) {
                ObstacleKind::Shield
            } else {
                ObstacleKind::Block
            };
            self.obstacles.push(Obstacle {
                lane,
                pos_m: self.next_spawn_m,
                size,
                kind,
            });
            let jitter = rng.gen_range(0.7..1.3);
            self.next_spawn_m += self.tuning.spawn_gap_m * jitter;
        }
    }

    /// Euclidean player-to-center distance against a size-scaled threshold.
    fn resolve_collisions(&mut self) {
        let player_pos = self.distance_m as f32;
        let mut hit: Option<usize> = None;
        let mut pickup: Option<usize> = None;

        for (i, obs) in self.obstacles.iter().enumerate() {
            let forward = obs.pos_m - player_pos;
            let lateral = (obs.lane as f32 - self.lane_pos) * LANE_SPACING_M;
            let dist = (forward * forward + lateral * lateral).sqrt();
            let threshold = match obs.kind {
                ObstacleKind::Block => self.tuning.hit_radius_m * obs.size,
                ObstacleKind::Shield => self.tuning.hit_radius_m,
            };
            if dist < threshold {
                match obs.kind {
                    ObstacleKind::Block => {
                        hit = Some(i);
                        break;
                    }
                    ObstacleKind::Shield => pickup = Some(i),
                }
            }
        }

        if let Some(i) = hit {
            if self.has_shield {
                // Shield soaks the crash; run continues unharmed
                self.has_shield = false;
                self.obstacles.remove(i);
            } else {
                self.game_over = true;
                if self.get_score() > self.high_score {
                    self.high_score = self.get_score();
                }
            }
        } else if let Some(i) = pickup {
            self.has_shield = true;
            self.obstacles.remove(i);
        }
    }

    fn render_road(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let mut grid: Vec<Vec<(char, Style)>> = vec![vec![(' ', Style::default()); width]; height];
        if width < 12 || height < 6 {
            return grid_to_lines(grid);
        }

        let lanes = self.tuning.lanes as f32;
        let center = width as f32 / 2.0;
        let bottom_half_width = (width as f32 * 0.42).min(lanes * 7.0);
        let top_half_width = bottom_half_width * 0.28;
        let player_dist = self.distance_m as f32;

        // Road trapezoid, edges and scrolling center dashes
        for row in 0..height {
            let t = row as f32 / (height - 1) as f32; // 0 horizon, 1 bumper
            let half = top_half_width + (bottom_half_width - top_half_width) * t;
            let left = (center - half) as i32;
            let right = (center + half) as i32;
            for x in left..=right {
                if x >= 0 && (x as usize) < width {
                    grid[row][x as usize] = (' ', Style::default().bg(self.tuning.road_color));
                }
            }
            for (x, ch) in [(left, '▐'), (right, '▌')] {
                if x >= 0 && (x as usize) < width {
                    grid[row][x as usize] =
                        (ch, Style::default().fg(Color::Rgb(220, 220, 220)));
                }
            }
            // Lane divider dashes scroll with distance
            let world_m = player_dist + (1.0 - t) * VIEW_DISTANCE_M;
            let dash_on = (world_m / 4.0) as i32 % 2 == 0;
            if dash_on {
                for divider in 1..self.tuning.lanes {
                    let frac = divider as f32 / lanes;
                    let x = (center - half + half * 2.0 * frac) as i32;
                    if x >= 0 && (x as usize) < width {
                        grid[row][x as usize] = (
                            '┊',
                            Style::default()
                                .fg(Color::Rgb(200, 200, 120))
                                .bg(self.tuning.road_color),
                        );
                    }
                }
            }
        }

        // Obstacles, far to near so closer sprites draw on top
        let mut sorted: Vec<&Obstacle> = self.obstacles.iter().collect();
        sorted.sort_by(|a, b| b.pos_m.total_cmp(&a.pos_m));
        for obs in sorted {
            let forward = obs.pos_m - player_dist;
            if !(0.0..VIEW_DISTANCE_M).contains(&forward) {
                continue;
            }
            let t = 1.0 - forward / VIEW_DISTANCE_M;
            let row = (t * (height - 1) as f32) as usize;
            let half = top_half_width + (bottom_half_width - top_half_width) * t;
            let frac = (obs.lane as f32 + 0.5) / lanes;
            let cx = (center - half + half * 2.0 * frac) as i32;
            let w = ((obs.size * 2.0 + 1.0) * (0.4 + 0.6 * t)) as i32;
            let (ch, style) = match obs.kind {
                ObstacleKind::Block => (
                    '█',
                    Style::default().fg(Color::Rgb(230, 80, 60)),
                ),
                ObstacleKind::Shield => (
                    '◈',
                    Style::default()
                        .fg(Color::Rgb(120, 220, 255))
                        .add_modifier(Modifier::BOLD),
                ),
            };
            for dx in -(w / 2)..=(w / 2) {
                let x = cx + dx;
                if x >= 0 && (x as usize) < width && row < height {
                    grid[row][x as usize] = (ch, style);
                }
            }
        }

        // Player car near the bottom edge
        let car_row = height.saturating_sub(2);
        let frac = (self.lane_pos + 0.5) / lanes;
        let cx = (center - bottom_half_width + bottom_half_width * 2.0 * frac) as i32;
        let car_color = if self.has_shield {
            Color::Rgb(120, 220, 255)
        } else {
            self.tuning.accent
        };
        let body = if self.boosting() {
            [('▄', car_color), ('█', car_color), ('▄', car_color)]
        } else {
            [('▗', car_color), ('█', car_color), ('▖', car_color)]
        };
        for (i, &(ch, color)) in body.iter().enumerate() {
            let x = cx - 1 + i as i32;
            if x >= 0 && (x as usize) < width && car_row < height {
                grid[car_row][x as usize] = (
                    ch,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                );
            }
        }
        // Exhaust flame while boosting
        if self.boosting() && car_row + 1 < height && cx >= 0 && (cx as usize) < width {
            grid[car_row + 1][cx as usize] = (
                '▲',
                Style::default().fg(Color::Rgb(255, 160, 40)),
            );
        }

        grid_to_lines(grid)
    }
}

fn grid_to_lines(grid: Vec<Vec<(char, Style)>>) -> Vec<Line<'static>> {
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

impl Game for Racer {
    fn update(&mut self) {
        if self.game_over || self.paused || !self.started {
            return;
        }
        self.step();
        self.latch.decay();
        self.boost_held.decay();
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
                    self.latch.clear();
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
            if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Up) {
                self.started = true;
            }
            return;
        }
        if self.paused {
            return;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => self.latch.throttle.press(),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => self.latch.brake.press(),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => self.latch.left.press(),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => self.latch.right.press(),
            KeyCode::Char(' ') => self.boost_held.press(),
            _ => {}
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.tuning.accent))
            .title(format!(" {} {} ", self.tuning.icon, self.tuning.name))
            .title_style(
                Style::default()
                    .fg(self.tuning.accent)
                    .add_modifier(Modifier::BOLD),
            );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Status bar
                Constraint::Min(8),    // Road
                Constraint::Length(1), // Help
            ])
            .split(inner);

        let kmh = (self.speed * 3.6) as u32;
        let nitro_cells = (self.nitro / NITRO_MAX * 10.0) as usize;
        let nitro_bar: String = "■".repeat(nitro_cells) + &"·".repeat(10 - nitro_cells.min(10));
        let status = Line::from(vec![
            Span::styled(
                format!(" {:>5} m ", self.distance_m as u64),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{kmh:>3} km/h "), Style::default().fg(Color::Green)),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("N₂O [{nitro_bar}] "),
                Style::default().fg(Color::Rgb(255, 160, 40)),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                if self.has_shield { "◈ SHIELD " } else { "  " },
                Style::default()
                    .fg(Color::Rgb(120, 220, 255))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("🏆 {:>5} ", self.high_score),
                Style::default().fg(Color::Cyan),
            ),
        ]);
        frame.render_widget(Paragraph::new(status), chunks[0]);

        let lines = self.render_road(chunks[1].width as usize, chunks[1].height as usize);
        frame.render_widget(Paragraph::new(lines), chunks[1]);

        if self.game_over {
            let msg = Paragraph::new(Line::from(vec![
                Span::styled(
                    " 💥 CRASHED! ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("Distance: {} m │ ", self.distance_m as u64),
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
                    "↑ Gas │ ↓ Brake │ ←→ Steer │ Space Nitro │ P Pause │ R Restart",
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
                Span::styled(
                    " ↑ Gas │ ↓ Brake │ ←→ Steer │ Space Nitro │ P Pause │ Esc Menu",
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
            frame.render_widget(help, chunks[2]);
        }
    }

    fn reset(&mut self) {
        let hs = self.high_score;
        let tuning = std::mem::replace(&mut self.tuning, SPEEDWAY);
        *self = Racer::new(tuning);
        self.high_score = hs;
    }

    fn get_score(&self) -> u32 {
        self.distance_m as u32
    }

    fn is_game_over(&self) -> bool {
        self.game_over
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_racer() -> Racer {
        let mut racer = Racer::new(SPEEDWAY);
        racer.started = true;
        racer
    }

    /// Push the spawn trigger out of reach so kinematics tests run on an
    /// empty road.
    fn no_spawns(racer: &mut Racer) {
        racer.next_spawn_m = f32::INFINITY;
    }

    /// Step with the throttle held, keeping the latch topped up the way
    /// auto-repeat would.
    fn throttle_ticks(racer: &mut Racer, n: usize) {
        for _ in 0..n {
            racer.latch.throttle.press();
            racer.update();
        }
    }

    #[test]
    fn test_speed_clamped_to_max() {
        let mut racer = test_racer();
        no_spawns(&mut racer);
        throttle_ticks(&mut racer, 60 * 30);
        assert!(racer.speed <= racer.tuning.max_speed + 1e-3);
        assert!(racer.speed > racer.tuning.max_speed * 0.95);
    }

    #[test]
    fn test_speed_never_negative_under_brake() {
        let mut racer = test_racer();
        no_spawns(&mut racer);
        throttle_ticks(&mut racer, 60);
        for _ in 0..60 * 10 {
            racer.latch.brake.press();
            racer.update();
        }
        assert!(racer.speed >= 0.0);
    }

    #[test]
    fn test_distance_is_integral_of_speed() {
        let mut racer = test_racer();
        no_spawns(&mut racer);
        let mut integral = 0.0f64;
        for _ in 0..60 * 5 {
            racer.latch.throttle.press();
            racer.update();
            integral += (racer.speed * DT) as f64;
        }
        assert!(
            (racer.distance_m - integral).abs() < 1e-3,
            "distance {} vs integral {}",
            racer.distance_m,
            integral
        );
    }

    #[test]
    fn test_distance_monotone_nondecreasing() {
        let mut racer = test_racer();
        no_spawns(&mut racer);
        let mut last = 0.0;
        for i in 0..60 * 8 {
            // Alternate throttle and brake phases
            if (i / 120) % 2 == 0 {
                racer.latch.throttle.press();
            } else {
                racer.latch.brake.press();
            }
            racer.update();
            assert!(racer.distance_m >= last);
            last = racer.distance_m;
        }
    }

    #[test]
    fn test_obstacles_spawn_ahead_of_player() {
        let mut racer = test_racer();
        racer.step(); // first spawns fire on the opening step
        assert!(!racer.obstacles.is_empty());
        // Everything materializes at least the spawn-ahead margin in
        // front of the player, never at the player's own position
        for obs in &racer.obstacles {
            assert!(obs.pos_m >= racer.distance_m as f32 + racer.tuning.spawn_ahead_m - 1.0);
        }
    }

    #[test]
    fn test_obstacles_culled_behind_player() {
        let mut racer = test_racer();
        racer.obstacles.push(Obstacle {
            lane: 0,
            pos_m: -50.0,
            size: 1.0,
            kind: ObstacleKind::Block,
        });
        racer.distance_m = 100.0;
        racer.step();
        assert!(racer
            .obstacles
            .iter()
            .all(|o| o.pos_m > racer.distance_m as f32 - DESPAWN_BEHIND_M));
    }

    #[test]
    fn test_collision_is_terminal() {
        let mut racer = test_racer();
        racer.lane_pos = 1.0;
        racer.obstacles.push(Obstacle {
            lane: 1,
            pos_m: racer.distance_m as f32,
            size: 1.0,
            kind: ObstacleKind::Block,
        });
        racer.resolve_collisions();
        assert!(racer.game_over);
    }

    #[test]
    fn test_shield_consumed_once_not_terminal() {
        let mut racer = test_racer();
        racer.lane_pos = 1.0;
        racer.has_shield = true;
        racer.obstacles.push(Obstacle {
            lane: 1,
            pos_m: racer.distance_m as f32,
            size: 1.0,
            kind: ObstacleKind::Block,
        });
        racer.resolve_collisions();
        assert!(!racer.game_over, "shield absorbs the hit");
        assert!(!racer.has_shield, "shield consumed");
        assert!(racer.obstacles.is_empty(), "obstacle cleared");

        // Next hit without a shield ends the run
        racer.obstacles.push(Obstacle {
            lane: 1,
            pos_m: racer.distance_m as f32,
            size: 1.0,
            kind: ObstacleKind::Block,
        });
        racer.resolve_collisions();
        assert!(racer.game_over);
    }

    #[test]
    fn test_shield_pickup_grants_shield() {
        let mut racer = test_racer();
        racer.lane_pos = 1.0;
        racer.obstacles.push(Obstacle {
            lane: 1,
            pos_m: racer.distance_m as f32,
            size: 1.0,
            kind: ObstacleKind::Shield,
        });
        racer.resolve_collisions();
        assert!(racer.has_shield);
        assert!(!racer.game_over);
        assert!(racer.obstacles.is_empty());
    }

    #[test]
    fn test_off_lane_obstacle_misses() {
        let mut racer = test_racer();
        racer.lane_pos = 0.0;
        racer.obstacles.push(Obstacle {
            lane: 3,
            pos_m: racer.distance_m as f32,
            size: 1.0,
            kind: ObstacleKind::Block,
        });
        racer.resolve_collisions();
        assert!(!racer.game_over);
    }

    #[test]
    fn test_terminal_step_is_noop_until_reset() {
        let mut racer = test_racer();
        racer.game_over = true;
        racer.speed = 10.0;
        let dist = racer.distance_m;
        let speed = racer.speed;
        for _ in 0..30 {
            racer.latch.throttle.press();
            racer.update();
        }
        assert_eq!(racer.distance_m, dist);
        assert_eq!(racer.speed, speed);

        racer.reset();
        assert!(!racer.game_over);
        assert_eq!(racer.get_score(), 0);
    }

    #[test]
    fn test_nitro_fills_and_burns() {
        let mut racer = test_racer();
        no_spawns(&mut racer);
        throttle_ticks(&mut racer, 60 * 10);
        assert!(racer.nitro > 0.0);
        let before = racer.nitro;
        racer.boost_held.press();
        racer.latch.throttle.press();
        racer.update();
        assert!(racer.nitro < before, "burn outpaces gain");
    }

    #[test]
    fn test_canyon_preset_differs_only_in_tuning() {
        let a = Racer::new(SPEEDWAY);
        let b = Racer::new(CANYON);
        assert_ne!(a.tuning.lanes, b.tuning.lanes);
        // Both start centered on their own road
        assert!((a.lane_pos - 1.5).abs() < 1e-6);
        assert!((b.lane_pos - 1.0).abs() < 1e-6);
    }
}
