use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::leaderboard::Leaderboard;

const BANNER: &str = r#"
 ╔══════════════════════════════════════════════════════════════════════╗
 ║  ██████╗ ███████╗████████╗██████╗  ██████╗  ██████╗ █████╗ ██████╗  ║
 ║  ██╔══██╗██╔════╝╚══██╔══╝██╔══██╗██╔═══██╗██╔════╝██╔══██╗██╔══██╗ ║
 ║  ██████╔╝█████╗     ██║   ██████╔╝██║   ██║██║     ███████║██║  ██║ ║
 ║  ██╔══██╗██╔══╝     ██║   ██╔══██╗██║   ██║██║     ██╔══██║██║  ██║ ║
 ║  ██║  ██║███████╗   ██║   ██║  ██║╚██████╔╝╚██████╗██║  ██║██████╔╝ ║
 ║  ╚═╝  ╚═╝╚══════╝   ╚═╝   ╚═╝  ╚═╝ ╚═════╝  ╚═════╝╚═╝  ╚═╝╚═════╝  ║
 ╚══════════════════════════════════════════════════════════════════════╝"#;

struct GameTile {
    key: &'static str,
    icon: &'static str,
    name: &'static str,
    desc: &'static str,
    color: Color,
    border_color: Color,
}

const GAME_TILES: [GameTile; 4] = [
    GameTile { key: "1", icon: "🐍", name: "Snake", desc: "Eat, grow, grab\npower-ups!", color: Color::Rgb(120, 255, 170), border_color: Color::Rgb(40, 120, 60) },
    GameTile { key: "2", icon: "🏎", name: "Speedway", desc: "Four lanes of\nwide-open road!", color: Color::Rgb(80, 200, 255), border_color: Color::Rgb(40, 100, 140) },
    GameTile { key: "3", icon: "🌄", name: "Canyon", desc: "Tight, fast and\nunforgiving!", color: Color::Rgb(255, 160, 60), border_color: Color::Rgb(140, 80, 30) },
    GameTile { key: "4", icon: "🚲", name: "Dirt Dash", desc: "Jump the rocks,\nclear the gaps!", color: Color::Rgb(255, 190, 80), border_color: Color::Rgb(130, 95, 40) },
];

pub fn render_home(
    frame: &mut Frame,
    area: Rect,
    selected: usize,
    show_leaderboard: bool,
    leaderboard: &Leaderboard,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10), // Banner
            Constraint::Min(10),    // Tiles / leaderboard
            Constraint::Length(2),  // Footer
        ])
        .split(area);

    let banner = Paragraph::new(BANNER)
        .style(Style::default().fg(Color::Rgb(200, 120, 255)))
        .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    if show_leaderboard {
        render_leaderboard(frame, chunks[1], leaderboard);
    } else {
        render_tiles(frame, chunks[1], selected);
    }

    let footer = Paragraph::new(Line::from(vec![
        Span::styled(" ←→↑↓ Select ", Style::default().fg(Color::DarkGray)),
        Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
        Span::styled("Enter/1-4 Play ", Style::default().fg(Color::DarkGray)),
        Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
        Span::styled(
            if show_leaderboard { "H Hide scores " } else { "H Snake leaderboard " },
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled("│ ", Style::default().fg(Color::Rgb(60, 60, 60))),
        Span::styled("Q Quit", Style::default().fg(Color::DarkGray)),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[2]);
}

fn render_tiles(frame: &mut Frame, area: Rect, selected: usize) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (row_idx, row_area) in rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(*row_area);
        for (col_idx, col_area) in cols.iter().enumerate() {
            let idx = row_idx * 2 + col_idx;
            render_game_tile(frame, *col_area, &GAME_TILES[idx], idx == selected);
        }
    }
}

fn render_game_tile(frame: &mut Frame, area: Rect, tile: &GameTile, selected: bool) {
    let border_color = if selected { Color::Rgb(255, 220, 80) } else { tile.border_color };
    let border_type = if selected { BorderType::Double } else { BorderType::Rounded };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let mut lines: Vec<Line> = vec![Line::from("")];

    let name_color = if selected { Color::Rgb(255, 255, 255) } else { tile.color };
    lines.push(Line::from(vec![
        Span::styled(
            format!("[{}] ", tile.key),
            Style::default()
                .fg(Color::Rgb(255, 220, 80))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{} ", tile.icon), Style::default()),
        Span::styled(
            tile.name,
            Style::default().fg(name_color).add_modifier(Modifier::BOLD),
        ),
    ]));

    for desc_line in tile.desc.split('\n') {
        lines.push(Line::from(Span::styled(
            desc_line,
            Style::default().fg(if selected {
                Color::Rgb(180, 180, 200)
            } else {
                Color::Rgb(120, 120, 140)
            }),
        )));
    }

    if selected {
        lines.push(Line::from(Span::styled(
            "▶ Enter to play",
            Style::default()
                .fg(Color::Rgb(255, 220, 80))
                .add_modifier(Modifier::BOLD),
        )));
    }

    let p = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(p, inner);
}

fn render_leaderboard(frame: &mut Frame, area: Rect, leaderboard: &Leaderboard) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(255, 220, 80)))
        .title(" 🏆 Snake Leaderboard — Top 20 ")
        .title_style(
            Style::default()
                .fg(Color::Rgb(255, 220, 80))
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let entries = leaderboard.list();
    let mut lines: Vec<Line> = vec![Line::from("")];

    if entries.is_empty() {
        lines.push(Line::from(Span::styled(
            "No scores yet — go play some Snake!",
            Style::default().fg(Color::Rgb(120, 120, 140)),
        )));
    } else {
        for (i, entry) in entries.iter().enumerate() {
            let rank_color = match i {
                0 => Color::Rgb(255, 215, 0),
                1 => Color::Rgb(192, 192, 192),
                2 => Color::Rgb(205, 127, 50),
                _ => Color::Rgb(120, 120, 140),
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:>2}. ", i + 1),
                    Style::default().fg(rank_color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{:<20} ", entry.name),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("{:>6}", entry.score),
                    Style::default()
                        .fg(Color::Rgb(255, 220, 80))
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  X Clear all scores",
            Style::default().fg(Color::Rgb(120, 60, 60)),
        )));
    }

    let p = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(p, inner);
}
