// UI rendering logic
//
// Renders the augmented page: prose blocks as plain text, preformatted
// containers as bordered boxes with their copy control overlaid on the
// top-right corner - the terminal rendition of the positioned-context
// overlay. Controls are styled off the same classes an external
// stylesheet would target.

use super::app::App;
use crate::augment::FLASH_CLASS;
use crate::config::VERSION;
use crate::dom::NodeId;
use crate::logging::LogLevel;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &mut App) {
    // Split the terminal into four vertical sections:
    // - Title bar (3 lines fixed)
    // - Page content (fills remaining space)
    // - System logs (6 lines fixed)
    // - Status bar (3 lines fixed)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(5),    // Page content - takes remaining space
            Constraint::Length(6), // System logs - fixed height
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    render_title(f, chunks[0], app);
    render_page(f, chunks[1], app);
    render_logs_panel(f, chunks[2], app);
    render_status(f, chunks[3], app);
}

/// Render the title bar
fn render_title(f: &mut Frame, area: Rect, app: &App) {
    let title = Line::from(vec![
        Span::styled(
            format!(" codecopy v{} ", VERSION),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("· "),
        Span::styled(&app.title, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            " · {} copy control(s) · up {}",
            app.buttons.len(),
            app.uptime()
        )),
    ]);
    let widget = Paragraph::new(title).block(Block::default().borders(Borders::ALL));
    f.render_widget(widget, area);
}

/// Render the page content: top-level blocks from the scroll offset down,
/// recording control hit areas for mouse activation.
fn render_page(f: &mut Frame, area: Rect, app: &mut App) {
    app.button_areas.clear();

    let blocks: Vec<NodeId> = app.doc.children(app.doc.root()).to_vec();
    let mut y = area.y;

    for &block in blocks.iter().skip(app.scroll) {
        if y >= area.y + area.height {
            break;
        }
        // Off-screen positioned elements (clipboard staging) never render.
        if app.doc.is_offscreen(block) {
            continue;
        }
        let remaining = area.y + area.height - y;

        let tag = app.doc.tag(block).map(str::to_string);
        let used = match tag.as_deref() {
            Some("pre") => render_pre_block(f, area, y, remaining, app, block),
            Some("hr") => {
                let rule = "─".repeat(area.width as usize);
                f.render_widget(
                    Paragraph::new(rule).style(Style::default().fg(Color::DarkGray)),
                    Rect::new(area.x, y, area.width, 1),
                );
                1
            }
            Some(tag) => render_prose_block(f, area, y, remaining, app, block, tag),
            None => 0,
        };
        y += used;
    }
}

/// Render a preformatted container as a bordered box with its control
/// overlaid top-right. Returns the height used.
fn render_pre_block(
    f: &mut Frame,
    area: Rect,
    y: u16,
    remaining: u16,
    app: &mut App,
    pre: NodeId,
) -> u16 {
    let doc = &app.doc;
    let code_text = match doc.descendant_by_tag(pre, "code") {
        Some(code) => doc.visible_text(code),
        // Bare preformatted block: no code element, no control.
        None => doc.visible_text(pre),
    };

    let inner_width = area.width.saturating_sub(2) as usize;
    let lines: Vec<Line> = code_text
        .lines()
        .map(|l| Line::from(truncate_to_width(l, inner_width)))
        .collect();
    let height = (lines.len() as u16 + 2).min(remaining);
    let rect = Rect::new(area.x, y, area.width, height);

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    if let Some(idx) = app.button_index_for(pre) {
        let control = app.buttons[idx].node();
        let label = format!(" {} ", doc.visible_text(control));
        let style = control_style(app, idx, control);
        block = block.title_top(Line::from(Span::styled(label.clone(), style)).right_aligned());

        // Hit area for pointer activation: where the overlaid label sits.
        let label_width = label.width() as u16;
        let hit_x = rect.x + rect.width.saturating_sub(label_width + 1);
        app.button_areas
            .push((Rect::new(hit_x, rect.y, label_width, 1), idx));
    }

    f.render_widget(
        Paragraph::new(lines)
            .style(Style::default().fg(Color::White))
            .block(block),
        rect,
    );
    height
}

/// Style for a control: flashing state first (the `copied` class), then
/// focus, then idle.
fn control_style(app: &App, idx: usize, control: NodeId) -> Style {
    let focused = idx == app.focused;
    if app.doc.has_class(control, FLASH_CLASS) {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    }
}

/// Render a prose block (heading, paragraph, list...). Returns the height
/// used.
fn render_prose_block(
    f: &mut Frame,
    area: Rect,
    y: u16,
    remaining: u16,
    app: &App,
    block: NodeId,
    tag: &str,
) -> u16 {
    let text = app.doc.visible_text(block);
    let style = match tag {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        "blockquote" => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
        _ => Style::default(),
    };

    let mut lines: Vec<Line> = text
        .lines()
        .map(|l| Line::from(Span::styled(truncate_to_width(l, area.width as usize), style)))
        .collect();
    // Blank separator line after each block
    lines.push(Line::default());

    let height = (lines.len() as u16).min(remaining);
    f.render_widget(
        Paragraph::new(lines),
        Rect::new(area.x, y, area.width, height),
    );
    height
}

/// Render the system logs panel
fn render_logs_panel(f: &mut Frame, area: Rect, app: &App) {
    let entries = app.log_buffer.get_all();
    let visible = area.height.saturating_sub(2) as usize;

    let lines: Vec<Line> = entries
        .iter()
        .rev()
        .take(visible)
        .rev()
        .map(|entry| {
            let level_color = match entry.level {
                LogLevel::Error => Color::Red,
                LogLevel::Warn => Color::Yellow,
                LogLevel::Info => Color::Green,
                LogLevel::Debug => Color::Blue,
                LogLevel::Trace => Color::DarkGray,
            };
            Line::from(vec![
                Span::styled(
                    format!("{} ", entry.timestamp.format("%H:%M:%S")),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:5} ", entry.level.as_str()),
                    Style::default().fg(level_color),
                ),
                Span::raw(&entry.message),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" System Logs "),
    );
    f.render_widget(widget, area);
}

/// Render the status bar with keybind hints and the active clipboard tier
fn render_status(f: &mut Frame, area: Rect, app: &mut App) {
    let tier = app.active_tier_name();
    let status = Line::from(vec![
        Span::styled(
            " Tab",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(":next control  "),
        Span::styled(
            "Enter/Space",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(":copy  "),
        Span::styled(
            "↑↓/jk",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(":scroll  "),
        Span::styled(
            "q",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(":quit  "),
        Span::styled(
            format!("clipboard: {}", tier),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let widget = Paragraph::new(status).block(Block::default().borders(Borders::ALL));
    f.render_widget(widget, area);
}

/// Truncate a line to the given display width, unicode-aware.
fn truncate_to_width(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + w > max.saturating_sub(1) {
            break;
        }
        width += w;
        out.push(ch);
    }
    out.push('…');
    out
}
