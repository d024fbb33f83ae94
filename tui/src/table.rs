//! Contacts table: selection cursor, scrolling and rendering.

use chrono::NaiveDate;
use martin_core::ContactRecord;
use martin_core::Field;
use martin_core::Status;
use martin_core::status::classify;
use martin_utils_string::display_width;
use martin_utils_string::truncate_with_ellipsis;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Widget;

const COLUMN_SPACING: u16 = 1;

/// Widest text a cell shows before it is cut with an ellipsis.
pub(crate) fn cell_width(field: Field) -> usize {
    match field {
        Field::Birthday | Field::LastContactDate => 10,
        Field::Tier => 1,
        Field::Name | Field::Relationship | Field::LastContactNote | Field::ProfileUrl => 40,
    }
}

fn column_width(field: Field) -> u16 {
    cell_width(field).max(display_width(field.header())) as u16
}

pub(crate) fn status_color(status: Status) -> Color {
    match status {
        Status::Normal => Color::White,
        Status::Informational => Color::LightBlue,
        Status::MissingData => Color::Rgb(255, 165, 0),
        Status::Overdue => Color::Red,
    }
}

/// What the cursor is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Selection {
    Header { column: usize },
    Cell { record: usize, field: Field },
}

/// Cursor over a grid whose row 0 is the header and rows `1..=len` are
/// contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TableCursor {
    row: usize,
    column: usize,
    row_offset: usize,
    column_offset: usize,
    page_rows: usize,
    selected_area: Option<Rect>,
}

impl Default for TableCursor {
    fn default() -> Self {
        Self {
            row: 1,
            column: 0,
            row_offset: 0,
            column_offset: 0,
            page_rows: 1,
            selected_area: None,
        }
    }
}

impl TableCursor {
    pub(crate) fn selection(&self) -> Selection {
        match self.row {
            0 => Selection::Header {
                column: self.column,
            },
            row => Selection::Cell {
                record: row - 1,
                field: Field::from_index(self.column).unwrap_or(Field::Name),
            },
        }
    }

    /// Record index under the cursor, if on a contact row.
    pub(crate) fn record(&self) -> Option<usize> {
        self.row.checked_sub(1)
    }

    /// Screen area of the selected cell at the last render.
    pub(crate) fn selected_area(&self) -> Option<Rect> {
        self.selected_area
    }

    pub(crate) fn up(&mut self) {
        self.row = self.row.saturating_sub(1);
    }

    pub(crate) fn down(&mut self, len: usize) {
        self.row = (self.row + 1).min(len);
    }

    pub(crate) fn left(&mut self) {
        self.column = self.column.saturating_sub(1);
    }

    pub(crate) fn right(&mut self) {
        self.column = (self.column + 1).min(Field::ALL.len() - 1);
    }

    pub(crate) fn page_down(&mut self, len: usize) {
        self.row = (self.row + self.page_rows.max(1)).min(len);
    }

    pub(crate) fn page_up(&mut self, len: usize) {
        if self.row > 1 {
            self.row = self.row.saturating_sub(self.page_rows.max(1)).max(1);
        }
        self.clamp(len);
    }

    pub(crate) fn top(&mut self, len: usize) {
        self.row = 1.min(len);
    }

    pub(crate) fn bottom(&mut self, len: usize) {
        self.row = len;
    }

    /// Keep the cursor inside a table of `len` contacts.
    pub(crate) fn clamp(&mut self, len: usize) {
        self.row = self.row.min(len);
        self.row_offset = self.row_offset.min(len.saturating_sub(1));
    }

    fn scroll_into_view(&mut self, visible_rows: usize, widths: &[u16], width: u16) {
        self.page_rows = visible_rows.max(1);
        if let Some(record) = self.record() {
            if record < self.row_offset {
                self.row_offset = record;
            } else if record >= self.row_offset + self.page_rows {
                self.row_offset = record + 1 - self.page_rows;
            }
        }

        self.column_offset = self.column_offset.min(self.column);
        while self.column_offset < self.column
            && span_width(&widths[self.column_offset..=self.column]) > width
        {
            self.column_offset += 1;
        }
    }
}

fn span_width(widths: &[u16]) -> u16 {
    let cells: u16 = widths.iter().sum();
    cells + COLUMN_SPACING * widths.len().saturating_sub(1) as u16
}

/// Draw the table, scrolling it so the cursor stays visible.
pub(crate) fn render_contacts(
    area: Rect,
    buf: &mut Buffer,
    records: &[ContactRecord],
    cursor: &mut TableCursor,
    today: NaiveDate,
    busy: Option<&str>,
) {
    let mut title = vec![Span::from(" Contacts ").fg(Color::Gray)];
    if let Some(label) = busy {
        title.push(Span::from(format!("{label} ")).italic().dim());
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(title));
    let inner = block.inner(area);
    block.render(area, buf);
    if inner.width == 0 || inner.height == 0 {
        cursor.selected_area = None;
        return;
    }

    let widths: Vec<u16> = Field::ALL.into_iter().map(column_width).collect();
    let visible_rows = inner.height.saturating_sub(1) as usize;
    cursor.clamp(records.len());
    cursor.scroll_into_view(visible_rows, &widths, inner.width);
    cursor.selected_area = None;

    // Visible columns with their x positions.
    let mut columns = Vec::new();
    let mut x = inner.x;
    for (index, field) in Field::ALL.into_iter().enumerate().skip(cursor.column_offset) {
        let right = inner.x + inner.width;
        if x >= right {
            break;
        }
        let width = widths[index].min(right - x);
        columns.push((index, field, x, width));
        x = x.saturating_add(width + COLUMN_SPACING);
    }

    for &(index, field, x, width) in &columns {
        let header = field.header();
        let pad = (width as usize).saturating_sub(display_width(header)) / 2;
        let mut style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        if cursor.row == 0 && cursor.column == index {
            style = style.add_modifier(Modifier::REVERSED);
            cursor.selected_area = Some(Rect::new(x, inner.y, width, 1));
        }
        let text = format!("{}{header}", " ".repeat(pad));
        buf.set_stringn(x, inner.y, pad_to(&text, width), width as usize, style);
    }

    if records.is_empty() {
        let message = if busy.is_some() { "Loading…" } else { "No contacts" };
        if inner.height > 1 {
            buf.set_stringn(
                inner.x,
                inner.y + 1,
                message,
                inner.width as usize,
                Style::default().italic().dim(),
            );
        }
        return;
    }

    let shown = records
        .iter()
        .enumerate()
        .skip(cursor.row_offset)
        .take(visible_rows);
    for (line, (record_index, record)) in shown.enumerate() {
        let y = inner.y + 1 + line as u16;
        let color = status_color(classify(record, today));
        for &(index, field, x, width) in &columns {
            let text = field.text(record);
            let text = truncate_with_ellipsis(&text, cell_width(field));
            let mut style = Style::default().fg(color);
            if cursor.record() == Some(record_index) && cursor.column == index {
                style = style.add_modifier(Modifier::REVERSED);
                cursor.selected_area = Some(Rect::new(x, y, width, 1));
            }
            buf.set_stringn(x, y, pad_to(&text, width), width as usize, style);
        }
    }
}

fn pad_to(text: &str, width: u16) -> String {
    let fill = (width as usize).saturating_sub(display_width(text));
    format!("{text}{}", " ".repeat(fill))
}
