use chrono::NaiveDate;
use color_eyre::eyre::Result;
use crossterm::event::Event;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use futures::StreamExt;
use martin_core::ContactBook;
use martin_core::DataAnomaly;
use martin_core::DirectorySync;
use martin_core::Field;
use martin_core::details::details_text;
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::buffer::Buffer;
use ratatui::layout::Constraint;
use ratatui::layout::Layout;
use ratatui::layout::Position;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Widget;

use crate::app_event::AppEvent;
use crate::edit_modal::EditModal;
use crate::edit_modal::EditOutcome;
use crate::notice::Notice;
use crate::panes;
use crate::panes::ControlsContext;
use crate::table::Selection;
use crate::table::TableCursor;
use crate::table::render_contacts;

const MAX_LISTED_ANOMALIES: usize = 5;
const DETAILS_PAGE: u16 = 10;

enum Focus {
    Table,
    Details,
    Editing(EditModal),
}

struct DetailsView {
    record: usize,
    text: String,
    scroll: u16,
}

pub(crate) struct App {
    book: ContactBook,
    directory: Box<dyn DirectorySync>,
    cursor: TableCursor,
    focus: Focus,
    details: Option<DetailsView>,
    notice: Option<Notice>,
    busy: Option<&'static str>,
    birthday_note: String,
    clock: fn() -> NaiveDate,
    should_quit: bool,
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl App {
    pub(crate) fn new(directory: Box<dyn DirectorySync>, birthday_note: String) -> Self {
        Self {
            book: ContactBook::new(),
            directory,
            cursor: TableCursor::default(),
            focus: Focus::Table,
            details: None,
            notice: None,
            busy: None,
            birthday_note,
            clock: local_today,
            should_quit: false,
        }
    }

    pub(crate) async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.dispatch(AppEvent::Reload, terminal).await?;

        let mut events = EventStream::new();
        while !self.should_quit {
            self.draw(terminal)?;
            let Some(event) = events.next().await else {
                break;
            };
            if let Event::Key(key) = event?
                && let Some(app_event) = self.handle_key(key)
            {
                self.dispatch(app_event, terminal).await?;
            }
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let today = (self.clock)();
        terminal.draw(|frame| self.render(frame, today))?;
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, today: NaiveDate) {
        let area = frame.area();
        if let Some(cursor) = self.render_at(area, frame.buffer_mut(), today) {
            frame.set_cursor_position(cursor);
        }
    }

    /// Draw the whole screen. Returns the terminal cursor position while
    /// an edit is open.
    pub(crate) fn render_at(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        today: NaiveDate,
    ) -> Option<Position> {
        let outer = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Martin: Personal CRM ".bold());
        let inner = outer.inner(area);
        outer.render(area, buf);

        let [table_area, side] =
            Layout::horizontal([Constraint::Ratio(10, 16), Constraint::Ratio(6, 16)])
                .areas(inner);
        let [details_area, legend] =
            Layout::vertical([Constraint::Min(5), Constraint::Length(9)]).areas(side);
        let [controls_area, tiers_area, colors_area] =
            Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(legend);

        render_contacts(
            table_area,
            buf,
            self.book.records(),
            &mut self.cursor,
            today,
            self.busy,
        );
        let (text, scroll) = match &self.details {
            Some(view) => (Some(view.text.as_str()), view.scroll),
            None => (None, 0),
        };
        panes::render_details(
            details_area,
            buf,
            text,
            scroll,
            matches!(self.focus, Focus::Details),
        );
        panes::render_controls(controls_area, buf, self.controls_context());
        panes::render_tiers(tiers_area, buf);
        panes::render_colors(colors_area, buf);

        let mut cursor = None;
        if let Focus::Editing(modal) = &self.focus {
            let anchor = self.cursor.selected_area().unwrap_or(table_area);
            cursor = Some(modal.render(anchor, area, buf));
        }
        if let Some(notice) = &self.notice {
            notice.render(area, buf);
            return None;
        }
        cursor
    }

    fn controls_context(&self) -> ControlsContext {
        match self.focus {
            Focus::Table => ControlsContext::Table,
            Focus::Details => ControlsContext::Details,
            Focus::Editing(_) => ControlsContext::Editing,
        }
    }

    /// Route a key to whatever has focus. An open notice swallows every
    /// key until it is dismissed.
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if self.notice.is_some() {
            if Notice::is_dismissed_by(key) {
                self.notice = None;
            }
            return None;
        }

        match std::mem::replace(&mut self.focus, Focus::Table) {
            Focus::Editing(mut modal) => match modal.handle_key(key) {
                EditOutcome::Editing => {
                    self.focus = Focus::Editing(modal);
                    None
                }
                EditOutcome::Cancelled => None,
                EditOutcome::Submitted(value) => Some(AppEvent::SubmitEdit {
                    record: modal.record(),
                    field: modal.field(),
                    value,
                }),
            },
            Focus::Details => {
                self.focus = Focus::Details;
                self.handle_details_key(key)
            }
            Focus::Table => self.handle_table_key(key),
        }
    }

    fn handle_details_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        if panes::BACK.is_press(key) {
            self.focus = Focus::Table;
            return None;
        }
        if panes::BIRTHDAY.is_press(key) {
            return self
                .details
                .as_ref()
                .map(|view| AppEvent::AcknowledgeBirthday {
                    record: view.record,
                });
        }
        if let Some(view) = self.details.as_mut() {
            view.scroll = match key.code {
                KeyCode::Up | KeyCode::Char('k') => view.scroll.saturating_sub(1),
                KeyCode::Down | KeyCode::Char('j') => view.scroll.saturating_add(1),
                KeyCode::PageUp => view.scroll.saturating_sub(DETAILS_PAGE),
                KeyCode::PageDown => view.scroll.saturating_add(DETAILS_PAGE),
                _ => view.scroll,
            };
        }
        None
    }

    fn handle_table_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        let len = self.book.len();
        if panes::QUIT.is_press(key) {
            return Some(AppEvent::Quit);
        }
        if panes::RELOAD.is_press(key) {
            return Some(AppEvent::Reload);
        }
        if panes::SELECT.is_press(key) {
            return self.activate_selection();
        }
        if panes::PAGE_DOWN.is_press(key) {
            self.cursor.page_down(len);
        } else if panes::PAGE_UP.is_press(key) {
            self.cursor.page_up(len);
        } else if panes::TOP.is_press(key) {
            self.cursor.top(len);
        } else if panes::BOTTOM.is_press(key) {
            self.cursor.bottom(len);
        } else if !key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => self.cursor.up(),
                KeyCode::Down | KeyCode::Char('j') => self.cursor.down(len),
                KeyCode::Left | KeyCode::Char('h') => self.cursor.left(),
                KeyCode::Right | KeyCode::Char('l') => self.cursor.right(),
                KeyCode::PageDown => self.cursor.page_down(len),
                KeyCode::PageUp => self.cursor.page_up(len),
                KeyCode::Home => self.cursor.top(len),
                KeyCode::End => self.cursor.bottom(len),
                _ => {}
            }
        }
        None
    }

    /// Enter on the table: sort on a header, details on a name, open a
    /// non-empty profile link, edit anything else.
    fn activate_selection(&mut self) -> Option<AppEvent> {
        match self.cursor.selection() {
            Selection::Header { column } => Some(AppEvent::Sort { column }),
            Selection::Cell { record, field } => {
                let contact = self.book.get(record)?;
                match field {
                    Field::Name => Some(AppEvent::ShowDetails { record }),
                    Field::ProfileUrl if !contact.profile_url().is_empty() => {
                        Some(AppEvent::OpenUrl(contact.profile_url().to_string()))
                    }
                    _ => {
                        let current = field.text(contact);
                        self.focus = Focus::Editing(EditModal::new(record, field, current));
                        None
                    }
                }
            }
        }
    }

    pub(crate) async fn dispatch<B: Backend>(
        &mut self,
        event: AppEvent,
        terminal: &mut Terminal<B>,
    ) -> Result<()> {
        match event {
            AppEvent::Quit => self.should_quit = true,
            AppEvent::Reload => {
                self.show_busy(terminal, "Loading…")?;
                let result = self.book.reload(self.directory.as_ref()).await;
                self.busy = None;
                match result {
                    Ok(summary) => {
                        self.details = None;
                        self.focus = Focus::Table;
                        let len = self.book.len();
                        self.cursor.clamp(len);
                        if self.cursor.record().is_none() {
                            self.cursor.top(len);
                        }
                        if summary.anomalies > 0 {
                            self.notice = Some(Notice::info(anomaly_report(self.book.anomalies())));
                        }
                    }
                    Err(err) => {
                        tracing::error!("reload failed: {err}");
                        self.notice =
                            Some(Notice::error(format!("Could not load contacts.\n{err}")));
                    }
                }
            }
            AppEvent::Sort { column } => match self.book.activate_sort(column) {
                Ok(state) => {
                    tracing::debug!(?state, "sorted");
                    self.details = None;
                }
                Err(err) => self.notice = Some(Notice::error(err.to_string())),
            },
            AppEvent::ShowDetails { record } => {
                if let Some(contact) = self.book.get(record) {
                    self.details = Some(DetailsView {
                        record,
                        text: details_text(contact),
                        scroll: 0,
                    });
                    self.focus = Focus::Details;
                }
            }
            AppEvent::OpenUrl(url) => {
                if let Err(err) = webbrowser::open(&url) {
                    tracing::warn!("failed to open {url}: {err}");
                    self.notice = Some(Notice::error(format!("Could not open {url}\n{err}")));
                }
            }
            AppEvent::SubmitEdit {
                record,
                field,
                value,
            } => {
                self.show_busy(terminal, "Saving…")?;
                let result = self
                    .book
                    .submit_edit(self.directory.as_ref(), record, field.header(), &value)
                    .await;
                self.busy = None;
                if let Err(err) = result {
                    self.notice = Some(Notice::error(err.to_string()));
                }
                self.refresh_details(record);
            }
            AppEvent::AcknowledgeBirthday { record } => {
                self.show_busy(terminal, "Saving…")?;
                let today = (self.clock)();
                let result = self
                    .book
                    .acknowledge_birthday(
                        self.directory.as_ref(),
                        record,
                        today,
                        &self.birthday_note,
                    )
                    .await;
                self.busy = None;
                if let Err(err) = result {
                    self.notice = Some(Notice::error(err.to_string()));
                }
                self.refresh_details(record);
            }
        }
        Ok(())
    }

    fn show_busy<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        label: &'static str,
    ) -> Result<()> {
        self.busy = Some(label);
        self.draw(terminal)
    }

    fn refresh_details(&mut self, record: usize) {
        let Some(view) = self.details.as_mut().filter(|view| view.record == record) else {
            return;
        };
        if let Some(contact) = self.book.get(record) {
            view.text = details_text(contact);
        }
    }
}

fn anomaly_report(anomalies: &[DataAnomaly]) -> String {
    let mut lines = vec![format!(
        "{} stored value(s) could not be read and were ignored:",
        anomalies.len()
    )];
    lines.extend(
        anomalies
            .iter()
            .take(MAX_LISTED_ANOMALIES)
            .map(|anomaly| format!("- {anomaly}")),
    );
    if anomalies.len() > MAX_LISTED_ANOMALIES {
        lines.push(format!(
            "… and {} more, see the log",
            anomalies.len() - MAX_LISTED_ANOMALIES
        ));
    }
    lines.join("\n")
}
