use crate::app::{App, View};
use crate::config::ThemeName;
use crate::file_store::FileStore;
use crate::session_log::SessionLog;
use crate::timer::{TimerState, format_clock};
use chrono::Local;
use ratatui::{prelude::*, widgets::*};

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub accent: Color,
    pub danger: Color,
    pub muted: Color,
}

const PRIMARY: Color = Color::Rgb(0x12, 0x16, 0x23);
const SECONDARY: Color = Color::Rgb(0x00, 0xdb, 0xf6);
const DANGER: Color = Color::Rgb(0xb6, 0x1c, 0x1d);

pub fn theme(name: ThemeName) -> Theme {
    match name {
        ThemeName::Dark => Theme {
            background: PRIMARY,
            foreground: Color::White,
            accent: SECONDARY,
            danger: DANGER,
            muted: Color::DarkGray,
        },
        ThemeName::Light => Theme {
            background: Color::White,
            foreground: PRIMARY,
            accent: Color::Rgb(0x00, 0x7c, 0x8c),
            danger: DANGER,
            muted: Color::Gray,
        },
    }
}

pub fn render<F: FileStore>(f: &mut Frame, app: &App<F>) {
    let t = theme(app.theme);
    f.render_widget(Block::default().style(Style::default().bg(t.background)), f.size());

    match app.view {
        View::Timer => render_timer(f, app, &t),
        View::History => render_history(f, app.history.as_ref(), &t),
        View::Help => render_help(f, &t),
    }

    if app.prompt.is_some() {
        render_prompt(f, app, &t);
    }
}

fn render_timer<F: FileStore>(f: &mut Frame, app: &App<F>, t: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(7),
            Constraint::Length(1),
            Constraint::Length(2),
        ])
        .split(f.size());

    f.render_widget(
        Paragraph::new(Span::styled(
            "Sport Tracker",
            Style::default().fg(t.foreground).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(t.muted)),
        ),
        chunks[0],
    );

    let (label, color) = match app.timer {
        TimerState::Idle => ("READY", t.muted),
        TimerState::Running { .. } => ("● RUNNING", t.accent),
        TimerState::Paused { .. } => ("⏸ PAUSED", t.danger),
    };
    let face = centered_rect(40, 60, chunks[1]);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            app.timer.to_string(),
            Style::default().fg(t.foreground).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(label, Style::default().fg(color))),
    ];
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(t.accent)),
        ),
        face,
    );

    let status = match (&app.status, app.last_timer) {
        (Some(status), _) => status.clone(),
        (None, Some(last)) => format!("Last timer: {}", format_clock(last)),
        (None, None) => String::new(),
    };
    f.render_widget(
        Paragraph::new(status)
            .style(Style::default().fg(t.muted))
            .alignment(Alignment::Center),
        chunks[2],
    );

    let primary = match app.timer {
        TimerState::Idle => " Start",
        TimerState::Running { .. } => " Pause",
        TimerState::Paused { .. } => " Resume",
    };
    let mut controls = vec![key_span("Space", t), Span::raw(primary)];
    if app.timer != TimerState::Idle {
        controls.extend([Span::raw("  •  "), key_span("R", t), Span::raw(" Reset")]);
    }
    controls.extend([
        Span::raw("  •  "),
        key_span("T", t),
        Span::raw(" Theme  •  "),
        key_span("H", t),
        Span::raw(" History  •  "),
        key_span("?", t),
        Span::raw(" Help  •  "),
        key_span("Q", t),
        Span::raw(" Quit"),
    ]);
    f.render_widget(
        Paragraph::new(Line::from(controls))
            .alignment(Alignment::Center)
            .style(Style::default().fg(t.muted)),
        chunks[3],
    );
}

fn key_span<'a>(text: &'a str, t: &Theme) -> Span<'a> {
    Span::styled(text, Style::default().fg(t.accent).add_modifier(Modifier::BOLD))
}

fn render_history(f: &mut Frame, history: Option<&SessionLog>, t: &Theme) {
    let area = centered_rect(70, 85, f.size());
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "SESSIONS (LAST 7 DAYS)",
            Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    match history {
        None => lines.push(Line::from(Span::styled(
            "  Session log could not be read.",
            Style::default().fg(t.danger),
        ))),
        Some(log) if log.is_empty() => lines.push(Line::from(Span::styled(
            "  No sessions yet!",
            Style::default().fg(t.muted),
        ))),
        Some(log) => {
            lines.push(Line::from(vec![
                Span::raw("  Total: "),
                Span::styled(
                    format_clock(log.total_seconds()),
                    Style::default().fg(t.foreground).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" across {} sessions", log.len())),
            ]));
            lines.push(Line::from(""));
            for entry in log.entries().iter().rev() {
                let when = entry.completed_at.with_timezone(&Local);
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {}", when.format("%a %d %b %H:%M")),
                        Style::default().fg(t.muted),
                    ),
                    Span::raw("  •  "),
                    Span::styled(
                        format_clock(entry.duration_seconds),
                        Style::default().fg(t.foreground),
                    ),
                ]));
            }
        }
    }

    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(" History ")
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(t.accent)),
        ),
        area,
    );
}

fn render_help(f: &mut Frame, t: &Theme) {
    let area = centered_rect(60, 60, f.size());
    let help = vec![
        Line::from(""),
        help_line("Space / S", "Start, pause or resume", t),
        help_line("R", "Reset and record the session", t),
        help_line("T", "Toggle dark/light theme", t),
        help_line("H", "Toggle session history", t),
        help_line("?", "Toggle this help", t),
        help_line("Q / Esc", "Quit or go back", t),
        help_line("Ctrl+C", "Force quit", t),
    ];
    f.render_widget(
        Paragraph::new(help).block(
            Block::default()
                .title(" Help ")
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(t.accent)),
        ),
        area,
    );
}

fn help_line<'a>(key: &'a str, desc: &'a str, t: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::raw("    "),
        Span::styled(key, Style::default().fg(t.accent).add_modifier(Modifier::BOLD)),
        Span::styled(format!("  {desc}"), Style::default().fg(t.foreground)),
    ])
}

fn render_prompt<F: FileStore>(f: &mut Frame, app: &App<F>, t: &Theme) {
    let Some(pending) = &app.prompt else {
        return;
    };
    let area = centered_rect(50, 30, f.size());
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "Save this {} session?",
                format_clock(pending.entry().duration_seconds)
            ),
            Style::default().fg(t.foreground).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} sessions in the last 7 days", pending.merged().len()),
            Style::default().fg(t.muted),
        )),
        Line::from(""),
        Line::from(vec![
            key_span("Y", t),
            Span::raw(" Save  •  "),
            key_span("N", t),
            Span::raw(" Discard"),
        ]),
    ];
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().bg(t.background))
            .block(
                Block::default()
                    .title(" Save session ")
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(t.accent)),
            ),
        area,
    );
}

fn centered_rect(w: u16, h: u16, r: Rect) -> Rect {
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h) / 2),
            Constraint::Percentage(h),
            Constraint::Percentage((100 - h) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w) / 2),
            Constraint::Percentage(w),
            Constraint::Percentage((100 - w) / 2),
        ])
        .split(v[1])[1]
}
