use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine, Points};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph};

use team_divider::config::{self, DividerConfig};
use team_divider::divide::{Rule, Side};
use team_divider::player::RankedPlayer;
use team_divider::state::{AppState, RosterSource, Screen, screen_label, source_label};
use team_divider::summary::{self, TeamSummary, side_label};

const WORKBOOK_FILE: &str = "teams.xlsx";

struct App {
    state: AppState,
    export_dir: PathBuf,
    should_quit: bool,
}

impl App {
    fn new(cfg: DividerConfig, arg_path: Option<PathBuf>) -> Self {
        let source = match arg_path.or(cfg.roster_path) {
            Some(path) => RosterSource::File(path),
            None => RosterSource::Demo {
                size: cfg.demo_size,
                seed: cfg.demo_seed,
            },
        };
        let mut state = AppState::new(source);
        state.reload();
        Self {
            state,
            export_dir: cfg.export_dir,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.state.set_screen(Screen::Roster),
            KeyCode::Char('2') => self.state.set_screen(Screen::Teams),
            KeyCode::Char('3') => self.state.set_screen(Screen::Charts),
            KeyCode::Char('4') => self.state.set_screen(Screen::Steps),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.state.reload(),
            KeyCode::Char('e') | KeyCode::Char('E') => {
                let dir = self.export_dir.clone();
                self.state.export_csv(&dir);
            }
            KeyCode::Char('x') | KeyCode::Char('X') => {
                let path = self.export_dir.join(WORKBOOK_FILE);
                self.state.export_xlsx(&path);
            }
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }
}

fn main() -> io::Result<()> {
    config::load_dotenv();
    let cfg = DividerConfig::from_env();
    let arg_path = std::env::args()
        .nth(1)
        .filter(|arg| !arg.trim().is_empty())
        .map(PathBuf::from);
    let mut app = App::new(cfg, arg_path);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        app.state.maybe_clear_export(Instant::now());
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    if let Some(err) = &app.state.error {
        let msg = Paragraph::new(format!("Cannot divide teams: {err}"))
            .style(Style::default().fg(Color::Red))
            .block(Block::default().title("Error").borders(Borders::ALL));
        frame.render_widget(msg, chunks[1]);
    } else {
        match app.state.screen {
            Screen::Roster => render_roster(frame, chunks[1], &app.state),
            Screen::Teams => render_teams(frame, chunks[1], &app.state),
            Screen::Charts => render_charts(frame, chunks[1], &app.state),
            Screen::Steps => render_steps(frame, chunks[1], &app.state),
        }
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text());
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let gap = state
        .summary
        .as_ref()
        .map(|s| format!("Gap: {:.3}", s.strength_gap))
        .unwrap_or_else(|| "Gap: -".to_string());
    let line1 = format!(
        "  TEAM DIVIDER | {} | {} players | {}",
        screen_label(state.screen),
        state.roster.len(),
        gap
    );
    let line2 = format!("  Source: {}", source_label(&state.source));
    let line3 = if state.export.active {
        format!("  {}", state.export.message)
    } else {
        String::new()
    };
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text() -> &'static str {
    "1 Roster | 2 Teams | 3 Charts | 4 Steps | j/k/↑/↓ Move | r Reload | e CSV | x XLSX | ? Help | q Quit"
}

fn render_roster(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut lines = vec![format!(
        "  {:<22} {:>6} {:>7} {:>7}",
        "Name", "Won", "Played", "Ratio"
    )];
    let visible = area.height.saturating_sub(3) as usize;
    let (start, end) = visible_range(state.selected, state.roster.len(), visible);
    for idx in start..end {
        let p = &state.roster[idx];
        let prefix = if idx == state.selected { "> " } else { "  " };
        lines.push(format!(
            "{prefix}{:<22} {:>6} {:>7} {:>7.3}",
            truncate(&p.name, 22),
            p.games_won,
            p.games_played,
            team_divider::player::win_ratio(p.games_won, p.games_played)
        ));
    }
    let roster = Paragraph::new(lines.join("\n"))
        .block(Block::default().title("Roster").borders(Borders::ALL));
    frame.render_widget(roster, area);
}

fn render_teams(frame: &mut Frame, area: Rect, state: &AppState) {
    let (Some(division), Some(summary)) = (&state.division, &state.summary) else {
        let empty = Paragraph::new("No teams yet").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (col, side) in [(cols[0], Side::Team1), (cols[1], Side::Team2)] {
        let team = summary.team(side);
        let title = format!(
            "{} | {} players | strength {:.3}",
            team.label, team.size, team.strength
        );
        let text = team_text(division.team(side), state.selected, col.height);
        let widget = Paragraph::new(text).block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(widget, col);
    }
}

fn team_text(members: &[RankedPlayer], selected: usize, height: u16) -> String {
    if members.is_empty() {
        return "No players".to_string();
    }
    let mut lines = vec![format!(
        "  {:<18} {:>5} {:>6} {:>6}",
        "Name", "Won", "Played", "Ratio"
    )];
    let visible = height.saturating_sub(3) as usize;
    let (start, end) = visible_range(selected, members.len(), visible);
    for (idx, p) in members.iter().enumerate().take(end).skip(start) {
        let prefix = if idx == selected { "> " } else { "  " };
        lines.push(format!(
            "{prefix}{:<18} {:>5} {:>6} {:>6.3}",
            truncate(p.name(), 18),
            p.games_won(),
            p.games_played(),
            p.win_ratio()
        ));
    }
    lines.join("\n")
}

fn render_charts(frame: &mut Frame, area: Rect, state: &AppState) {
    let (Some(division), Some(summary)) = (&state.division, &state.summary) else {
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(45),
            Constraint::Percentage(25),
        ])
        .split(rows[1]);

    for (col, side, color) in [
        (top[0], Side::Team1, Color::Green),
        (top[1], Side::Team2, Color::Blue),
    ] {
        let title = format!("{} Win Ratio %", side_label(side));
        frame.render_widget(ratio_bar_chart(division.team(side), &title, color), col);
    }

    frame.render_widget(averages_chart(&summary.team1, &summary.team2), bottom[0]);
    render_scatter(frame, bottom[1], state);

    let spread = Paragraph::new(distribution_text(&summary.team1, &summary.team2)).block(
        Block::default()
            .title("Games Played Distribution")
            .borders(Borders::ALL),
    );
    frame.render_widget(spread, bottom[2]);
}

fn ratio_bar_chart(members: &[RankedPlayer], title: &str, color: Color) -> BarChart<'static> {
    let bars: Vec<Bar> = summary::ratio_bars(members)
        .into_iter()
        .map(|(name, pct)| {
            Bar::default()
                .value(pct)
                .label(Line::from(truncate(&name, 6)))
                .style(Style::default().fg(color))
        })
        .collect();

    BarChart::default()
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .data(BarGroup::default().bars(&bars))
        .bar_width(6)
        .bar_gap(1)
        .max(100)
}

fn averages_chart(team1: &TeamSummary, team2: &TeamSummary) -> BarChart<'static> {
    let metric = |team: &TeamSummary, pick: fn(&summary::TeamAverages) -> f64| {
        team.averages.as_ref().map(pick).unwrap_or(0.0)
    };
    let group = |label: &'static str, v1: f64, v2: f64| {
        BarGroup::default().label(Line::from(label)).bars(&[
            Bar::default()
                .value(v1.round() as u64)
                .text_value(format!("{v1:.1}"))
                .style(Style::default().fg(Color::Green)),
            Bar::default()
                .value(v2.round() as u64)
                .text_value(format!("{v2:.1}"))
                .style(Style::default().fg(Color::Blue)),
        ])
    };

    BarChart::default()
        .block(
            Block::default()
                .title("Averages (T1 green, T2 blue)")
                .borders(Borders::ALL),
        )
        .data(group(
            "Won",
            metric(team1, |a| a.games_won),
            metric(team2, |a| a.games_won),
        ))
        .data(group(
            "Played",
            metric(team1, |a| a.games_played),
            metric(team2, |a| a.games_played),
        ))
        .data(group(
            "Ratio%",
            metric(team1, |a| a.win_ratio * 100.0),
            metric(team2, |a| a.win_ratio * 100.0),
        ))
        .bar_width(4)
        .bar_gap(1)
        .group_gap(2)
}

fn render_scatter(frame: &mut Frame, area: Rect, state: &AppState) {
    let points = summary::scatter_points(&state.roster);
    let extent = f64::from(summary::diagonal_extent(&state.roster).max(1));
    let labels: Vec<(f64, f64, String)> = state
        .roster
        .iter()
        .zip(&points)
        .map(|(p, (x, y))| (*x, *y, truncate(&p.name, 8)))
        .collect();

    let canvas = Canvas::default()
        .block(
            Block::default()
                .title("Games Won vs Games Played")
                .borders(Borders::ALL),
        )
        .marker(Marker::Braille)
        .x_bounds([0.0, extent * 1.1])
        .y_bounds([0.0, extent * 1.1])
        .paint(move |ctx| {
            ctx.draw(&CanvasLine {
                x1: 0.0,
                y1: 0.0,
                x2: extent,
                y2: extent,
                color: Color::Red,
            });
            ctx.draw(&Points {
                coords: &points,
                color: Color::Cyan,
            });
            for (x, y, name) in &labels {
                ctx.print(*x, *y, name.clone());
            }
        });
    frame.render_widget(canvas, area);
}

fn distribution_text(team1: &TeamSummary, team2: &TeamSummary) -> String {
    let mut lines = Vec::new();
    for team in [team1, team2] {
        lines.push(team.label.clone());
        match &team.games_played {
            Some(d) => {
                lines.push(format!(" min {:.0}  max {:.0}", d.min, d.max));
                lines.push(format!(" q1 {:.1}  q3 {:.1}", d.q1, d.q3));
                lines.push(format!(" median {:.1}", d.median));
            }
            None => lines.push(" no players".to_string()),
        }
    }
    lines.join("\n")
}

fn render_steps(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut lines = vec![format!(
        "  {:>3} {:<18} {:>6} {:<7} {:<8} {:>7} {:>15}",
        "#", "Player", "Ratio", "Team", "Rule", "Sizes", "Strengths"
    )];
    let visible = area.height.saturating_sub(3) as usize;
    let (start, end) = visible_range(state.selected, state.steps.len(), visible);
    for step in &state.steps[start..end] {
        let prefix = if step.index == state.selected { "> " } else { "  " };
        lines.push(format!(
            "{prefix}{:>3} {:<18} {:>6.3} {:<7} {:<8} {:>7} {:>15}",
            step.index + 1,
            truncate(&step.player, 18),
            step.win_ratio,
            side_label(step.side),
            rule_label(step.rule),
            format!("{}/{}", step.team1_size, step.team2_size),
            format!("{:.3}/{:.3}", step.team1_strength, step.team2_strength),
        ));
    }
    let steps = Paragraph::new(lines.join("\n"))
        .block(Block::default().title("Assignment Steps").borders(Borders::ALL));
    frame.render_widget(steps, area);
}

fn rule_label(rule: Rule) -> &'static str {
    match rule {
        Rule::SmallerTeam => "SIZE",
        Rule::WeakerTeam => "WEAKER",
        Rule::StrengthTie => "TIE",
    }
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    text.chars().take(max.saturating_sub(1)).chain(['…']).collect()
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Team Divider - Help",
        "",
        "Screens:",
        "  1            Roster",
        "  2            Teams",
        "  3            Charts",
        "  4            Assignment steps",
        "",
        "Actions:",
        "  j/k or ↑/↓   Move",
        "  r            Reload roster / new demo roster",
        "  e            Export team1.csv + team2.csv",
        "  x            Export teams.xlsx",
        "  ? / Esc      Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
