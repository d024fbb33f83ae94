//! Single-line editor drawn over the selected table cell.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use martin_core::Field;
use ratatui::buffer::Buffer;
use ratatui::layout::Position;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Widget;
use tui_input::Input;
use tui_input::InputRequest;

use crate::table::cell_width;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EditOutcome {
    Editing,
    Cancelled,
    Submitted(String),
}

pub(crate) struct EditModal {
    record: usize,
    field: Field,
    input: Input,
}

impl EditModal {
    pub(crate) fn new(record: usize, field: Field, current: String) -> Self {
        Self {
            record,
            field,
            input: Input::new(current),
        }
    }

    pub(crate) fn record(&self) -> usize {
        self.record
    }

    pub(crate) fn field(&self) -> Field {
        self.field
    }

    /// Enter or Tab saves, Esc cancels, everything else edits.
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> EditOutcome {
        if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
            return EditOutcome::Editing;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let request = match key.code {
            KeyCode::Enter | KeyCode::Tab => {
                return EditOutcome::Submitted(self.input.value().to_string());
            }
            KeyCode::Esc => return EditOutcome::Cancelled,
            KeyCode::Char('u') if ctrl => InputRequest::DeleteLine,
            KeyCode::Char('w') if ctrl => InputRequest::DeletePrevWord,
            KeyCode::Char('a') if ctrl => InputRequest::GoToStart,
            KeyCode::Char('e') if ctrl => InputRequest::GoToEnd,
            KeyCode::Char(c) if !ctrl => InputRequest::InsertChar(c),
            KeyCode::Backspace => InputRequest::DeletePrevChar,
            KeyCode::Delete => InputRequest::DeleteNextChar,
            KeyCode::Left => InputRequest::GoToPrevChar,
            KeyCode::Right => InputRequest::GoToNextChar,
            KeyCode::Home => InputRequest::GoToStart,
            KeyCode::End => InputRequest::GoToEnd,
            _ => return EditOutcome::Editing,
        };
        self.input.handle(request);
        EditOutcome::Editing
    }

    /// Draw a bordered input whose text row sits on `anchor` (the selected
    /// cell), kept inside `screen`. Returns where the terminal cursor goes.
    pub(crate) fn render(&self, anchor: Rect, screen: Rect, buf: &mut Buffer) -> Position {
        let area = modal_area(anchor, screen, cell_width(self.field) as u16 + 1);
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::Yellow))
            .title(format!(" {} ", self.field.header()));
        let inner = block.inner(area);
        block.render(area, buf);

        let width = inner.width.max(1) as usize;
        let scroll = self.input.visual_scroll(width.saturating_sub(1));
        Paragraph::new(self.input.value())
            .style(Style::default().fg(Color::White).bold())
            .scroll((0, scroll as u16))
            .render(inner, buf);

        let cursor = self.input.visual_cursor().saturating_sub(scroll) as u16;
        Position::new(
            (inner.x + cursor).min(inner.right().saturating_sub(1)),
            inner.y,
        )
    }
}

fn modal_area(anchor: Rect, screen: Rect, text_width: u16) -> Rect {
    let width = (text_width + 2).min(screen.width);
    let height = 3.min(screen.height);
    let x = anchor
        .x
        .saturating_sub(1)
        .min(screen.right().saturating_sub(width))
        .max(screen.x);
    let y = anchor
        .y
        .saturating_sub(1)
        .min(screen.bottom().saturating_sub(height))
        .max(screen.y);
    Rect::new(x, y, width, height)
}
