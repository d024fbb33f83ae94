//! Dismissible message box shown over everything else.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Widget;
use ratatui::widgets::Wrap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NoticeKind {
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Notice {
    kind: NoticeKind,
    message: String,
}

impl Notice {
    pub(crate) fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub(crate) fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub(crate) fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn kind(&self) -> NoticeKind {
        self.kind
    }

    /// Whether `key` dismisses the notice.
    pub(crate) fn is_dismissed_by(key: KeyEvent) -> bool {
        key.kind != KeyEventKind::Release
            && matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' '))
    }

    pub(crate) fn render(&self, screen: Rect, buf: &mut Buffer) {
        let (title, color) = match self.kind {
            NoticeKind::Error => (" Error ", Color::Red),
            NoticeKind::Info => (" Notice ", Color::Yellow),
        };

        let width = (screen.width * 3 / 5).clamp(20.min(screen.width), screen.width);
        let text_lines = self.message.lines().count().max(1) as u16;
        let height = (text_lines + 6).min(screen.height);
        let area = Rect::new(
            screen.x + (screen.width - width) / 2,
            screen.y + (screen.height - height) / 2,
            width,
            height,
        );
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(color))
            .title(title);
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = self
            .message
            .lines()
            .map(|l| Line::from(l.to_string()).fg(Color::White))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("[Enter]", Style::default().fg(Color::Green)),
            Span::raw(" OK"),
        ]));
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
