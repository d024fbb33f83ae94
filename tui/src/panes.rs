//! Side panes: Details, Controls, Tiers and Colors.

use crossterm::event::KeyCode;
use martin_core::EngagementTier;
use martin_core::Status;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Widget;
use ratatui::widgets::Wrap;

use crate::key_hint;
use crate::key_hint::KeyBinding;
use crate::table::status_color;

pub(crate) const QUIT: KeyBinding = key_hint::plain(KeyCode::Esc);
pub(crate) const RELOAD: KeyBinding = key_hint::ctrl(KeyCode::Char('r'));
pub(crate) const PAGE_DOWN: KeyBinding = key_hint::ctrl(KeyCode::Char('f'));
pub(crate) const PAGE_UP: KeyBinding = key_hint::ctrl(KeyCode::Char('b'));
pub(crate) const TOP: KeyBinding = key_hint::plain(KeyCode::Char('g'));
pub(crate) const BOTTOM: KeyBinding = key_hint::plain(KeyCode::Char('G'));
pub(crate) const SELECT: KeyBinding = key_hint::plain(KeyCode::Enter);
pub(crate) const BACK: KeyBinding = key_hint::plain(KeyCode::Esc);
pub(crate) const BIRTHDAY: KeyBinding = key_hint::ctrl(KeyCode::Char('b'));
pub(crate) const SAVE: KeyBinding = key_hint::plain(KeyCode::Enter);
pub(crate) const SAVE_ALT: KeyBinding = key_hint::plain(KeyCode::Tab);
pub(crate) const CANCEL: KeyBinding = key_hint::plain(KeyCode::Esc);

/// Which part of the screen has focus, for the Controls pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ControlsContext {
    Table,
    Details,
    Editing,
}

fn pane(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { Color::Yellow } else { Color::Cyan };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::from(format!(" {title} ")).fg(Color::Gray))
}

fn hint(binding: KeyBinding, label: &'static str) -> Line<'static> {
    Line::from(vec![binding.into(), Span::raw(" = "), Span::raw(label)])
}

pub(crate) fn controls_lines(context: ControlsContext) -> Vec<Line<'static>> {
    match context {
        ControlsContext::Table => vec![
            hint(PAGE_DOWN, "page down"),
            hint(PAGE_UP, "page up"),
            hint(RELOAD, "reload"),
            hint(TOP, "top"),
            hint(BOTTOM, "bottom"),
            hint(SELECT, "details, link, edit or sort"),
            hint(QUIT, "quit"),
        ],
        ControlsContext::Details => vec![
            hint(BACK, "back to table"),
            hint(BIRTHDAY, "last contact was birthday text"),
        ],
        ControlsContext::Editing => vec![
            hint(SAVE, "save"),
            hint(SAVE_ALT, "save"),
            hint(CANCEL, "cancel"),
        ],
    }
}

/// Raw record view; `scroll` is the first visible line.
pub(crate) fn render_details(
    area: Rect,
    buf: &mut Buffer,
    text: Option<&str>,
    scroll: u16,
    focused: bool,
) {
    let body = match text {
        Some(text) => Paragraph::new(text.to_string()),
        None => Paragraph::new(Line::from("Select a name to see its record.").italic().dim()),
    };
    body.block(pane("Details", focused))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .render(area, buf);
}

pub(crate) fn render_controls(area: Rect, buf: &mut Buffer, context: ControlsContext) {
    Paragraph::new(controls_lines(context))
        .block(pane("Controls", false))
        .wrap(Wrap { trim: false })
        .render(area, buf);
}

pub(crate) fn render_tiers(area: Rect, buf: &mut Buffer) {
    let lines: Vec<Line> = EngagementTier::ALL
        .into_iter()
        .map(|tier| Line::from(format!("{} = {}", tier.code(), tier.description())))
        .collect();
    Paragraph::new(lines)
        .block(pane("Tiers", false))
        .wrap(Wrap { trim: false })
        .render(area, buf);
}

pub(crate) fn render_colors(area: Rect, buf: &mut Buffer) {
    let lines: Vec<Line> = [
        Status::Normal,
        Status::Informational,
        Status::MissingData,
        Status::Overdue,
    ]
    .into_iter()
    .map(|status| Line::from(status.description()).fg(status_color(status)))
    .collect();
    Paragraph::new(lines)
        .block(pane("Colors", false))
        .wrap(Wrap { trim: false })
        .render(area, buf);
}
