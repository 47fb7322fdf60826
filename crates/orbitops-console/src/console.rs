//! Fleet operations console.
//!
//! An interactive TUI that renders the simulated fleet, active conflicts,
//! and the event log, and accepts operator commands: pausing the sampler,
//! resolving conflicts, exporting snapshots, and dispatching simulated
//! uplinks.
//!
//! Launch with `orbitops-console run` (the default subcommand).

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame, Terminal,
};
use tokio::sync::RwLock;

use orbitops_protocol::{
    Asset, AssetKind, AssetStatus, ConflictRecord, ConflictSeverity, FleetStats, OperationType,
    ProtocolError,
};
use orbitops_sim::{
    export_snapshot, FleetState, LogCategory, LogEntry, Sampler, SamplerHandle,
};

use crate::commands::{dispatch_command, CommandLog, CommandRecord, CommandState};
use crate::config::ConsoleConfig;

/// Which panel the main area shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewMode {
    Fleet,
    Conflicts,
    Log,
}

impl ViewMode {
    fn next(self) -> Self {
        match self {
            Self::Fleet => Self::Conflicts,
            Self::Conflicts => Self::Log,
            Self::Log => Self::Fleet,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Fleet => "Fleet",
            Self::Conflicts => "Conflicts",
            Self::Log => "Log",
        }
    }
}

/// Snapshot of fleet state for rendering.
struct ConsoleSnapshot {
    stats: FleetStats,
    tick_count: u64,
    uptime_secs: i64,
    paused: bool,
    assets: Vec<Asset>,
    conflicts: Vec<ConflictRecord>,
    event_log: Vec<LogEntry>,
    commands: Vec<CommandRecord>,
}

/// The operator console state.
struct OperatorConsole {
    state: Arc<RwLock<FleetState>>,
    sampler: SamplerHandle,
    command_log: CommandLog,
    config: ConsoleConfig,
    /// Current text in the input field.
    input: String,
    /// Cursor position within the input field.
    cursor_pos: usize,
    /// Command history for up/down arrow navigation.
    history: Vec<String>,
    history_pos: Option<usize>,
    view_mode: ViewMode,
    /// Case-insensitive substring filter for the fleet panel.
    filter: Option<String>,
    /// Asset name highlighted in the fleet panel.
    selected: Option<String>,
    /// Scroll offset for the main panel.
    panel_scroll: u16,
    /// Messages displayed in the console output area.
    console_messages: Vec<(chrono::DateTime<chrono::Utc>, String, Color)>,
}

impl OperatorConsole {
    fn new(
        state: Arc<RwLock<FleetState>>,
        sampler: SamplerHandle,
        config: ConsoleConfig,
    ) -> Self {
        let mut console_messages = Vec::new();
        console_messages.push((
            chrono::Utc::now(),
            "OrbitOps console ready. Type /help for commands.".to_string(),
            Color::Cyan,
        ));

        Self {
            state,
            sampler,
            command_log: Arc::new(RwLock::new(Vec::new())),
            config,
            input: String::new(),
            cursor_pos: 0,
            history: Vec::new(),
            history_pos: None,
            view_mode: ViewMode::Fleet,
            filter: None,
            selected: None,
            panel_scroll: 0,
            console_messages,
        }
    }

    /// Take a snapshot of fleet state for rendering.
    async fn snapshot(&self) -> ConsoleSnapshot {
        let state = self.state.read().await;
        let commands = self.command_log.read().await.clone();

        ConsoleSnapshot {
            stats: state.stats,
            tick_count: state.tick_count,
            uptime_secs: state.uptime_secs(),
            paused: self.sampler.is_paused(),
            assets: state.assets.clone(),
            conflicts: state.conflicts.clone(),
            event_log: state.event_log.clone(),
            commands,
        }
    }

    /// Process a line of operator input.
    async fn process_input(&mut self) {
        let input = self.input.trim().to_string();
        if input.is_empty() {
            return;
        }

        self.history.push(input.clone());
        self.history_pos = None;

        if input.starts_with('/') {
            self.process_command(&input).await;
        } else {
            self.add_message(
                "Unknown input. Commands start with '/', e.g. /help.",
                Color::Yellow,
            );
        }

        self.input.clear();
        self.cursor_pos = 0;
    }

    /// Process a slash command.
    async fn process_command(&mut self, cmd: &str) {
        let parts: Vec<&str> = cmd.splitn(2, ' ').collect();
        let command = parts[0];
        let args = parts.get(1).copied().unwrap_or("").trim();

        match command {
            "/help" => {
                self.add_message("Available commands:", Color::Cyan);
                self.add_message("  /status            - Fleet summary", Color::White);
                self.add_message("  /fleet             - Show the fleet panel", Color::White);
                self.add_message("  /conflicts         - Show the conflicts panel", Color::White);
                self.add_message("  /log               - Show the event log panel", Color::White);
                self.add_message(
                    "  /resolve <id>      - Dismiss a conflict record",
                    Color::White,
                );
                self.add_message(
                    "  /filter [text]     - Filter the fleet panel (no text clears)",
                    Color::White,
                );
                self.add_message(
                    "  /inspect <asset>   - Select an asset and print its details",
                    Color::White,
                );
                self.add_message("  /pause, /resume    - Toggle auto-refresh", Color::White);
                self.add_message(
                    "  /export [path]     - Write a JSON snapshot",
                    Color::White,
                );
                self.add_message("  /links             - External dashboards", Color::White);
                self.add_message(
                    "  /task <asset> <op> - Dispatch a simulated uplink",
                    Color::White,
                );
                self.add_message("  /quit              - Exit the console", Color::White);
            }
            "/status" => {
                let (stats, tick, paused) = {
                    let state = self.state.read().await;
                    (state.stats, state.tick_count, self.sampler.is_paused())
                };
                self.add_message(
                    &format!(
                        "Assets: {} (run={} start={} stop={} err={} conflict={})",
                        stats.total_assets,
                        stats.running,
                        stats.starting,
                        stats.stopped,
                        stats.errored,
                        stats.conflicted
                    ),
                    Color::Green,
                );
                self.add_message(
                    &format!(
                        "Ops: {} | Conflicts: {} critical / {} error | Tick: {} | Sampler: {}",
                        stats.total_ops,
                        stats.critical_conflicts,
                        stats.error_conflicts,
                        tick,
                        if paused { "paused" } else { "live" }
                    ),
                    Color::Green,
                );
            }
            "/fleet" => {
                self.view_mode = ViewMode::Fleet;
                self.panel_scroll = 0;
            }
            "/conflicts" => {
                self.view_mode = ViewMode::Conflicts;
                self.panel_scroll = 0;
            }
            "/log" => {
                self.view_mode = ViewMode::Log;
                self.panel_scroll = 0;
            }
            "/resolve" => {
                if args.is_empty() {
                    self.add_message("Usage: /resolve <conflict_id>", Color::Yellow);
                } else {
                    let removed = {
                        let mut state = self.state.write().await;
                        let removed = state.resolve_conflict(args);
                        if removed {
                            state.push_log(
                                LogCategory::Conflict,
                                format!("Operator resolved conflict {}", args),
                            );
                        }
                        removed
                    };
                    if removed {
                        self.add_message(
                            &format!("Conflict {} dismissed (next scan may restore it)", args),
                            Color::Green,
                        );
                    } else {
                        self.add_message(&format!("No conflict with id {}", args), Color::Yellow);
                    }
                }
            }
            "/filter" => {
                if args.is_empty() {
                    self.filter = None;
                    self.add_message("Fleet filter cleared.", Color::Green);
                } else {
                    self.filter = Some(args.to_lowercase());
                    self.add_message(&format!("Fleet filtered by '{}'", args), Color::Green);
                }
                self.view_mode = ViewMode::Fleet;
                self.panel_scroll = 0;
            }
            "/inspect" => {
                if args.is_empty() {
                    self.add_message("Usage: /inspect <asset>", Color::Yellow);
                } else {
                    let found = {
                        let state = self.state.read().await;
                        state.assets.iter().find(|a| a.name == args).cloned()
                    };
                    match found {
                        Some(asset) => {
                            self.selected = Some(asset.name.clone());
                            self.add_message(
                                &format!(
                                    "{} [{}] {} cpu={:.1}% mem={:.1}% thr={:.1}Mbps err={:.2}%",
                                    asset.name,
                                    kind_label(asset.kind),
                                    asset.status,
                                    asset.metrics.cpu_pct,
                                    asset.metrics.memory_pct,
                                    asset.metrics.throughput_mbps,
                                    asset.metrics.error_rate
                                ),
                                Color::Cyan,
                            );
                            self.add_message(
                                &format!(
                                    "  pos lat={:.2} lon={:.2} alt={:.0}km",
                                    asset.position.latitude_deg,
                                    asset.position.longitude_deg,
                                    asset.position.altitude_km
                                ),
                                Color::White,
                            );
                            if asset.active_ops.is_empty() {
                                self.add_message("  no in-flight operations", Color::DarkGray);
                            } else {
                                for op in &asset.active_ops {
                                    self.add_message(
                                        &format!(
                                            "  op {} -> {} ({:?})",
                                            op.op_type,
                                            op.target.as_deref().unwrap_or("-"),
                                            op.priority
                                        ),
                                        Color::White,
                                    );
                                }
                            }
                        }
                        None => {
                            self.selected = None;
                            self.add_message(&format!("Unknown asset {}", args), Color::Yellow);
                        }
                    }
                }
            }
            "/pause" => {
                self.sampler.pause();
                self.add_message("Auto-refresh paused.", Color::Yellow);
            }
            "/resume" => {
                self.sampler.resume();
                self.add_message("Auto-refresh resumed.", Color::Green);
            }
            "/export" => {
                let result = {
                    let state = self.state.read().await;
                    if args.is_empty() {
                        export_snapshot(&state, std::path::Path::new("."))
                    } else {
                        export_snapshot(&state, std::path::Path::new(args))
                    }
                };
                match result {
                    Ok(path) => self.add_message(
                        &format!("Snapshot written to {}", path.display()),
                        Color::Green,
                    ),
                    Err(e) => self.add_message(&format!("Export failed: {}", e), Color::Red),
                }
            }
            "/links" => {
                if self.config.console.external_links.is_empty() {
                    self.add_message("No external dashboards configured.", Color::Yellow);
                } else {
                    self.add_message("External dashboards:", Color::Cyan);
                    let links = self.config.console.external_links.clone();
                    for link in links {
                        self.add_message(&format!("  {}", link), Color::White);
                    }
                }
            }
            "/task" => match parse_task_args(args) {
                Ok((asset_name, op_type)) => {
                    let known = {
                        let state = self.state.read().await;
                        state.assets.iter().any(|a| a.name == asset_name)
                    };
                    if !known {
                        self.add_message(&format!("Unknown asset {}", asset_name), Color::Yellow);
                    } else {
                        let id = dispatch_command(
                            self.state.clone(),
                            self.command_log.clone(),
                            asset_name.clone(),
                            op_type,
                        );
                        self.add_message(
                            &format!("Dispatched {} to {} ({})", op_type, asset_name, id),
                            Color::Green,
                        );
                    }
                }
                Err(e) => self.add_message(&format!("{}", e), Color::Yellow),
            },
            "/quit" | "/exit" | "/q" => {
                // Handled in the event loop.
            }
            _ => {
                self.add_message(
                    &format!("Unknown command: {}. Type /help.", command),
                    Color::Red,
                );
            }
        }
    }

    fn add_message(&mut self, msg: &str, color: Color) {
        self.console_messages
            .push((chrono::Utc::now(), msg.to_string(), color));
        if self.console_messages.len() > 500 {
            self.console_messages.remove(0);
        }
    }

    /// Render the full console layout.
    fn render(&self, frame: &mut Frame, snapshot: &ConsoleSnapshot) {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Min(8),    // Main area
                Constraint::Length(5), // Input area
            ])
            .split(frame.area());

        self.render_status_bar(frame, outer[0], snapshot);
        self.render_main_area(frame, outer[1], snapshot);
        self.render_input(frame, outer[2]);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, snap: &ConsoleSnapshot) {
        let block = Block::default()
            .title(" OrbitOps Console ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let sampler_label = if snap.paused { "PAUSED" } else { "LIVE" };
        let sampler_color = if snap.paused { Color::Yellow } else { Color::Green };
        let conflict_color = if snap.stats.critical_conflicts > 0 {
            Color::Red
        } else if snap.stats.error_conflicts > 0 {
            Color::Yellow
        } else {
            Color::Green
        };

        let status_line = Line::from(vec![
            Span::styled("  Assets: ", Style::default().fg(Color::Gray)),
            Span::styled(
                snap.stats.total_assets.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::styled("  |  Conflicts: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!(
                    "{}",
                    snap.stats.critical_conflicts + snap.stats.error_conflicts
                ),
                Style::default().fg(conflict_color),
            ),
            Span::styled("  |  Ops: ", Style::default().fg(Color::Gray)),
            Span::styled(
                snap.stats.total_ops.to_string(),
                Style::default().fg(Color::Magenta),
            ),
            Span::styled("  |  Tick: ", Style::default().fg(Color::Gray)),
            Span::styled(snap.tick_count.to_string(), Style::default().fg(Color::Cyan)),
            Span::styled("  |  Uptime: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}s", snap.uptime_secs),
                Style::default().fg(Color::White),
            ),
            Span::styled("  |  Sampler: ", Style::default().fg(Color::Gray)),
            Span::styled(sampler_label, Style::default().fg(sampler_color)),
            Span::styled("  |  View: ", Style::default().fg(Color::Gray)),
            Span::styled(
                self.view_mode.label(),
                Style::default().fg(Color::LightCyan),
            ),
        ]);

        frame.render_widget(Paragraph::new(status_line).block(block), area);
    }

    fn render_main_area(&self, frame: &mut Frame, area: Rect, snap: &ConsoleSnapshot) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(58), // View panel
                Constraint::Percentage(42), // Commands + console output
            ])
            .split(area);

        match self.view_mode {
            ViewMode::Fleet => self.render_fleet(frame, columns[0], snap),
            ViewMode::Conflicts => self.render_conflicts(frame, columns[0], snap),
            ViewMode::Log => self.render_log(frame, columns[0], snap),
        }

        let right_column = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7), // Recent commands
                Constraint::Min(4),    // Console output
            ])
            .split(columns[1]);

        self.render_commands(frame, right_column[0], snap);
        self.render_console_output(frame, right_column[1]);
    }

    fn render_fleet(&self, frame: &mut Frame, area: Rect, snap: &ConsoleSnapshot) {
        let filtered: Vec<&Asset> = snap
            .assets
            .iter()
            .filter(|asset| match &self.filter {
                Some(needle) => asset.name.to_lowercase().contains(needle),
                None => true,
            })
            .collect();

        let title = match &self.filter {
            Some(needle) => format!(" Fleet ({}/{}, filter '{}') ", filtered.len(), snap.assets.len(), needle),
            None => format!(" Fleet ({}) ", snap.assets.len()),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));

        if filtered.is_empty() {
            let hint = if snap.assets.is_empty() {
                "  Waiting for first telemetry pass..."
            } else {
                "  No assets match the filter."
            };
            let text = Paragraph::new(Line::from(Span::styled(
                hint,
                Style::default().fg(Color::DarkGray),
            )))
            .block(block);
            frame.render_widget(text, area);
            return;
        }

        let visible_rows = area.height.saturating_sub(3) as usize;
        let scroll = (self.panel_scroll as usize).min(filtered.len().saturating_sub(1));

        let rows: Vec<Row> = filtered
            .iter()
            .skip(scroll)
            .take(visible_rows)
            .map(|asset| {
                let is_selected = self.selected.as_deref() == Some(asset.name.as_str());
                let name_style = if is_selected {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                Row::new(vec![
                    ratatui::widgets::Cell::from(Span::styled(
                        format!("{}{}", if is_selected { "> " } else { "  " }, asset.name),
                        name_style,
                    )),
                    ratatui::widgets::Cell::from(Span::styled(
                        kind_label(asset.kind),
                        Style::default().fg(Color::Gray),
                    )),
                    ratatui::widgets::Cell::from(Span::styled(
                        asset.status.to_string(),
                        Style::default().fg(status_color(asset.status)),
                    )),
                    ratatui::widgets::Cell::from(Span::styled(
                        format!("{:5.1}", asset.metrics.cpu_pct),
                        Style::default().fg(Color::White),
                    )),
                    ratatui::widgets::Cell::from(Span::styled(
                        format!("{:5.1}", asset.metrics.memory_pct),
                        Style::default().fg(Color::White),
                    )),
                    ratatui::widgets::Cell::from(Span::styled(
                        format!("{:6.1}", asset.metrics.throughput_mbps),
                        Style::default().fg(Color::White),
                    )),
                    ratatui::widgets::Cell::from(Span::styled(
                        asset.active_ops.len().to_string(),
                        Style::default().fg(Color::Magenta),
                    )),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(10),
                Constraint::Length(9),
                Constraint::Length(9),
                Constraint::Length(6),
                Constraint::Length(6),
                Constraint::Length(7),
                Constraint::Length(4),
            ],
        )
        .block(block)
        .header(
            Row::new(vec!["  Name", "Kind", "Status", "CPU%", "Mem%", "Mbps", "Ops"])
                .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
        );

        frame.render_widget(table, area);
    }

    fn render_conflicts(&self, frame: &mut Frame, area: Rect, snap: &ConsoleSnapshot) {
        let block = Block::default()
            .title(format!(" Conflicts ({}) ", snap.conflicts.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));

        if snap.conflicts.is_empty() {
            let text = Paragraph::new(Line::from(Span::styled(
                "  No active conflicts.",
                Style::default().fg(Color::DarkGray),
            )))
            .block(block);
            frame.render_widget(text, area);
            return;
        }

        let mut lines: Vec<Line> = Vec::new();
        for conflict in &snap.conflicts {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  [{}] ", conflict.severity),
                    Style::default()
                        .fg(severity_color(conflict.severity))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(conflict.id().to_string(), Style::default().fg(Color::White)),
            ]));
            lines.push(Line::from(Span::styled(
                format!("      {}", conflict.description),
                Style::default().fg(Color::Gray),
            )));
        }

        let visible_height = area.height.saturating_sub(2) as usize;
        let visible: Vec<Line> = lines
            .into_iter()
            .skip(self.panel_scroll as usize)
            .take(visible_height)
            .collect();

        frame.render_widget(Paragraph::new(visible).block(block), area);
    }

    fn render_log(&self, frame: &mut Frame, area: Rect, snap: &ConsoleSnapshot) {
        let block = Block::default()
            .title(format!(" Event Log ({}) ", snap.event_log.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White));

        let inner_height = area.height.saturating_sub(2) as usize;
        let start = snap.event_log.len().saturating_sub(inner_height);
        let lines: Vec<Line> = snap.event_log[start..]
            .iter()
            .map(|entry| {
                Line::from(vec![
                    Span::styled(
                        format!("  [{}] ", entry.timestamp.format("%H:%M:%S")),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        entry.message.as_str(),
                        Style::default().fg(log_color(entry.category)),
                    ),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_commands(&self, frame: &mut Frame, area: Rect, snap: &ConsoleSnapshot) {
        let block = Block::default()
            .title(" Recent Uplinks ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::LightBlue));

        if snap.commands.is_empty() {
            let text = Paragraph::new(Line::from(Span::styled(
                "  No commands dispatched.",
                Style::default().fg(Color::DarkGray),
            )))
            .block(block);
            frame.render_widget(text, area);
            return;
        }

        let inner_height = area.height.saturating_sub(2) as usize;
        let start = snap.commands.len().saturating_sub(inner_height);
        let lines: Vec<Line> = snap.commands[start..]
            .iter()
            .map(|record| {
                let (label, color) = match record.state {
                    CommandState::Dispatched => ("...", Color::Yellow),
                    CommandState::Succeeded => ("ok ", Color::Green),
                    CommandState::Failed => ("ERR", Color::Red),
                };
                Line::from(vec![
                    Span::styled(
                        format!("  {} ", record.issued_at.format("%H:%M:%S")),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(format!("[{}] ", label), Style::default().fg(color)),
                    Span::styled(
                        format!("{} {}", record.asset_name, record.op_type),
                        Style::default().fg(Color::White),
                    ),
                    Span::styled(
                        format!(" {}", record.detail),
                        Style::default().fg(Color::Gray),
                    ),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_console_output(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Console Output ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White));

        let inner_height = area.height.saturating_sub(2) as usize;
        let start = self.console_messages.len().saturating_sub(inner_height);
        let lines: Vec<Line> = self.console_messages[start..]
            .iter()
            .map(|(ts, msg, color)| {
                Line::from(vec![
                    Span::styled(
                        format!("  [{}] ", ts.format("%H:%M:%S")),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(msg.as_str(), Style::default().fg(*color)),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Command Input (/help = commands, Tab = switch view, /quit = exit) ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green));

        let input_display = if self.input.is_empty() {
            Line::from(vec![
                Span::styled("  > ", Style::default().fg(Color::Green)),
                Span::styled(
                    "Type /command...",
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        } else {
            Line::from(vec![
                Span::styled("  > ", Style::default().fg(Color::Green)),
                Span::styled(&self.input, Style::default().fg(Color::White)),
            ])
        };

        let hint_line = Line::from(Span::styled(
            "  Ctrl+C or /quit to exit  |  Up/Down for history  |  PgUp/PgDn to scroll",
            Style::default().fg(Color::DarkGray),
        ));

        let paragraph = Paragraph::new(vec![Line::from(""), input_display, hint_line]).block(block);
        frame.render_widget(paragraph, area);

        let cursor_x = area.x + 4 + self.cursor_pos as u16;
        let cursor_y = area.y + 2;
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    /// Handle keyboard input. Returns `true` if the console should exit.
    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match (code, modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return true,
            (KeyCode::Tab, _) => {
                self.view_mode = self.view_mode.next();
                self.panel_scroll = 0;
            }
            (KeyCode::Char(c), _) => {
                self.input.insert(self.cursor_pos, c);
                self.cursor_pos += 1;
            }
            (KeyCode::Backspace, _) => {
                if self.cursor_pos > 0 {
                    self.input.remove(self.cursor_pos - 1);
                    self.cursor_pos -= 1;
                }
            }
            (KeyCode::Delete, _) => {
                if self.cursor_pos < self.input.len() {
                    self.input.remove(self.cursor_pos);
                }
            }
            (KeyCode::Left, _) => {
                if self.cursor_pos > 0 {
                    self.cursor_pos -= 1;
                }
            }
            (KeyCode::Right, _) => {
                if self.cursor_pos < self.input.len() {
                    self.cursor_pos += 1;
                }
            }
            (KeyCode::Home, _) => self.cursor_pos = 0,
            (KeyCode::End, _) => self.cursor_pos = self.input.len(),
            (KeyCode::Up, _) => {
                if !self.history.is_empty() {
                    let pos = match self.history_pos {
                        Some(p) if p > 0 => p - 1,
                        Some(p) => p,
                        None => self.history.len() - 1,
                    };
                    self.history_pos = Some(pos);
                    self.input = self.history[pos].clone();
                    self.cursor_pos = self.input.len();
                }
            }
            (KeyCode::Down, _) => {
                if let Some(pos) = self.history_pos {
                    if pos + 1 < self.history.len() {
                        let new_pos = pos + 1;
                        self.history_pos = Some(new_pos);
                        self.input = self.history[new_pos].clone();
                        self.cursor_pos = self.input.len();
                    } else {
                        self.history_pos = None;
                        self.input.clear();
                        self.cursor_pos = 0;
                    }
                }
            }
            (KeyCode::Enter, _) => {
                // Handled by caller (needs async).
            }
            (KeyCode::PageUp, _) => {
                self.panel_scroll = self.panel_scroll.saturating_sub(5);
            }
            (KeyCode::PageDown, _) => {
                self.panel_scroll += 5;
            }
            _ => {}
        }
        false
    }
}

/// Parse `/task` arguments: `<asset> <operation>`.
fn parse_task_args(args: &str) -> Result<(String, OperationType), ProtocolError> {
    let mut parts = args.split_whitespace();
    let asset = parts
        .next()
        .ok_or_else(|| ProtocolError::InvalidCommand("usage: /task <asset> <op>".into()))?;
    let op = parts
        .next()
        .ok_or_else(|| ProtocolError::InvalidCommand("usage: /task <asset> <op>".into()))?;
    Ok((asset.to_string(), OperationType::parse(op)?))
}

fn kind_label(kind: AssetKind) -> &'static str {
    match kind {
        AssetKind::Satellite => "sat",
        AssetKind::GroundStation => "ground",
        AssetKind::Relay => "relay",
    }
}

fn status_color(status: AssetStatus) -> Color {
    match status {
        AssetStatus::Running => Color::Green,
        AssetStatus::Starting => Color::Cyan,
        AssetStatus::Stopped => Color::Gray,
        AssetStatus::Error => Color::Red,
        AssetStatus::Conflict => Color::Magenta,
    }
}

fn severity_color(severity: ConflictSeverity) -> Color {
    match severity {
        ConflictSeverity::Critical => Color::Red,
        ConflictSeverity::Error => Color::Yellow,
    }
}

fn log_color(category: LogCategory) -> Color {
    match category {
        LogCategory::System => Color::Cyan,
        LogCategory::Telemetry => Color::White,
        LogCategory::Conflict => Color::Magenta,
        LogCategory::Command => Color::Green,
        LogCategory::Error => Color::Red,
    }
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the console event loop until the operator quits.
pub async fn run_console(config: ConsoleConfig) -> Result<(), anyhow::Error> {
    use std::io::IsTerminal;
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return Err(anyhow::anyhow!("The console requires a terminal (TTY)."));
    }

    let state = Arc::new(RwLock::new(FleetState::new(config.console.log_capacity)));
    let sampler = Sampler::spawn(
        state.clone(),
        config.sampler_options(),
        !config.sampler.auto_start,
    )
    .await;

    // Restore the terminal even if rendering panics.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut console = OperatorConsole::new(state, sampler, config);

    let tick_rate = Duration::from_millis(100); // ~10fps

    loop {
        let snapshot = console.snapshot().await;

        terminal.draw(|frame| {
            console.render(frame, &snapshot);
        })?;

        if event::poll(tick_rate)? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    if key_event.code == KeyCode::Enter {
                        let trimmed = console.input.trim().to_string();
                        if trimmed == "/quit" || trimmed == "/exit" || trimmed == "/q" {
                            break;
                        }
                        console.process_input().await;
                    } else if console.handle_key(key_event.code, key_event.modifiers) {
                        break; // Ctrl+C
                    }
                }
            }
        }
    }

    restore_terminal(&mut terminal)?;
    console.sampler.stop().await;
    Ok(())
}
