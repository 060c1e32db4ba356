use std::time::Instant;

use automail_core::messages;
use automail_core::text::format_timestamp;
use automail_core::timer::{Banner, BannerPhase, Message};
use automail_core::{CategoryFilter, Upload};
use automail_service::{BlockingHttpService, ServiceError, UploadPayload};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::clipboard::{Clipboard, Osc52Clipboard};
use crate::components::upload_form::UploadForm;
use crate::components::uploads_list::UploadsList;
use crate::components::{category_badge, tone_style};

/// What the app is currently doing
#[derive(Debug, Clone)]
pub enum Mode {
    /// Landing screen with the two entry points
    Home,
    /// Upload form overlay
    Upload,
    /// Typing the path of the file to upload
    SelectFile { input: String },
    /// Browsing processed documents
    UploadsList,
    /// One document in full
    UploadDetail { upload: Upload, scroll: u16 },
    /// Waiting for y/n on a delete. Cancelling goes back to `back`.
    ConfirmDelete { target: DeleteTarget, back: Box<Mode> },
    /// Delete requests in flight
    Deleting { target: DeleteTarget },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    One { id: String, filename: String },
    All,
}

/// Blocking work queued by `handle_key`.
///
/// The event loop draws once more before calling `run_pending`, so the
/// loading state is on screen while the request runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    Upload,
    LoadUploads,
    RefreshDetail { id: String },
    Delete(DeleteTarget),
}

pub struct App {
    service: BlockingHttpService,
    clipboard: Box<dyn Clipboard>,
    mode: Mode,
    form: UploadForm,
    list: UploadsList,
    banner: Banner,
    pending: Option<PendingAction>,
}

impl App {
    pub fn new(service: BlockingHttpService) -> Self {
        Self::with_clipboard(service, Box::new(Osc52Clipboard::stdout()))
    }

    pub fn with_clipboard(service: BlockingHttpService, clipboard: Box<dyn Clipboard>) -> Self {
        Self {
            service,
            clipboard,
            mode: Mode::Home,
            form: UploadForm::new(),
            list: UploadsList::default(),
            banner: Banner::new(),
            pending: None,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn form(&self) -> &UploadForm {
        &self.form
    }

    pub fn list(&self) -> &UploadsList {
        &self.list
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub fn is_input_mode(&self) -> bool {
        matches!(self.mode, Mode::SelectFile { .. })
    }

    /// Ctrl+C always quits; q quits unless we're typing or answering a delete.
    pub fn is_quit(&self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        key.code == KeyCode::Char('q')
            && !self.is_input_mode()
            && !matches!(self.mode, Mode::ConfirmDelete { .. })
    }

    /// Returns true if the event loop should use a poll timeout instead of blocking.
    pub fn needs_polling(&self) -> bool {
        self.pending.is_some()
            || self.banner.is_active()
            || self.form.has_timers()
            || self.list.has_timers()
    }

    /// Expire timed state. Returns true when something changed on screen.
    pub fn tick(&mut self, now: Instant) -> bool {
        let banner = self.banner.tick(now);
        let form = self.form.tick(now);
        let list = self.list.tick(now);
        banner || form || list
    }

    fn notify(&mut self, message: Message) {
        self.banner.show(message, Instant::now());
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Keys typed while a request is queued are dropped.
        if self.pending.is_some() {
            return;
        }

        match &self.mode.clone() {
            Mode::Home => self.handle_home(key),
            Mode::Upload => self.handle_upload(key),
            Mode::SelectFile { input } => self.handle_select_file(key, input.clone()),
            Mode::UploadsList => self.handle_uploads_list(key),
            Mode::UploadDetail { upload, scroll } => {
                self.handle_upload_detail(key, upload.clone(), *scroll)
            }
            Mode::ConfirmDelete { target, back } => {
                self.handle_confirm_delete(key, target.clone(), (**back).clone())
            }
            Mode::Deleting { .. } => {}
        }
    }

    fn open_upload(&mut self) {
        self.form.reset();
        self.mode = Mode::Upload;
    }

    fn open_list(&mut self) {
        self.mode = Mode::UploadsList;
        self.list.set_loading(true);
        self.pending = Some(PendingAction::LoadUploads);
    }

    fn handle_home(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('u') | KeyCode::Char('1') => self.open_upload(),
            KeyCode::Char('l') | KeyCode::Char('2') => self.open_list(),
            _ => {}
        }
    }

    fn handle_upload(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.form.reset();
            self.mode = Mode::Home;
            return;
        }

        if let Some(result) = self.form.result().cloned() {
            match key.code {
                KeyCode::Char('j') | KeyCode::Down => self.form.scroll_down(),
                KeyCode::Char('k') | KeyCode::Up => self.form.scroll_up(),
                KeyCode::Char('c') if result.has_reply() => {
                    if self.copy(&result.resposta_automatica) {
                        self.notify(Message::success(messages::REPLY_COPIED));
                    }
                }
                KeyCode::Char('n') => self.form.reset(),
                KeyCode::Char('l') => {
                    self.form.reset();
                    self.open_list();
                }
                _ => {}
            }
            return;
        }

        if self.form.is_loading() {
            return;
        }

        match key.code {
            KeyCode::Char('f') => {
                self.mode = Mode::SelectFile {
                    input: String::new(),
                };
            }
            KeyCode::Char('x') => self.form.remove_file(),
            KeyCode::Enter => match self.form.begin_submit() {
                Ok(file) => {
                    tracing::info!(file = %file.name, size = file.size, "submitting upload");
                    self.pending = Some(PendingAction::Upload);
                }
                Err(e) => self.notify(Message::error(e.to_string())),
            },
            _ => {}
        }
    }

    fn handle_select_file(&mut self, key: KeyEvent, mut input: String) {
        match key.code {
            KeyCode::Esc => self.mode = Mode::Upload,
            KeyCode::Enter => {
                self.mode = Mode::Upload;
                let path = input.trim();
                if path.is_empty() {
                    return;
                }
                match self.form.select(path) {
                    Ok(()) => tracing::info!(path, "file selected"),
                    Err(e) => {
                        tracing::warn!(path, error = %e, "file rejected");
                        self.notify(Message::error(e.to_string()));
                    }
                }
            }
            KeyCode::Backspace => {
                input.pop();
                self.mode = Mode::SelectFile { input };
            }
            KeyCode::Char(c) => {
                input.push(c);
                self.mode = Mode::SelectFile { input };
            }
            _ => {}
        }
    }

    fn handle_uploads_list(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.mode = Mode::Home,
            KeyCode::Tab => self.list.next_filter(),
            KeyCode::Char('1') | KeyCode::Char('a') => self.list.set_filter(CategoryFilter::All),
            KeyCode::Char('2') => self.list.set_filter(CategoryFilter::Produtivo),
            KeyCode::Char('3') => self.list.set_filter(CategoryFilter::Improdutivo),
            KeyCode::Char('r') => self.open_list(),
            KeyCode::Char('u') => self.open_upload(),
            KeyCode::Enter => {
                if let Some(upload) = self.list.selected() {
                    self.mode = Mode::UploadDetail {
                        upload: upload.clone(),
                        scroll: 0,
                    };
                }
            }
            KeyCode::Char('c') => {
                if let Some(upload) = self.list.selected().cloned() {
                    self.copy_from_list(&upload);
                }
            }
            KeyCode::Char('d') => {
                if let Some(upload) = self.list.selected() {
                    self.mode = Mode::ConfirmDelete {
                        target: DeleteTarget::One {
                            id: upload.id.clone(),
                            filename: upload.filename.clone(),
                        },
                        back: Box::new(Mode::UploadsList),
                    };
                }
            }
            KeyCode::Char('D') => {
                if !self.list.is_empty() {
                    self.mode = Mode::ConfirmDelete {
                        target: DeleteTarget::All,
                        back: Box::new(Mode::UploadsList),
                    };
                }
            }
            _ => self.list.handle_key(key),
        }
    }

    fn handle_upload_detail(&mut self, key: KeyEvent, upload: Upload, scroll: u16) {
        match key.code {
            KeyCode::Esc => self.mode = Mode::UploadsList,
            KeyCode::Char('j') | KeyCode::Down => {
                self.mode = Mode::UploadDetail {
                    upload,
                    scroll: scroll.saturating_add(1),
                };
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.mode = Mode::UploadDetail {
                    upload,
                    scroll: scroll.saturating_sub(1),
                };
            }
            KeyCode::Char('c') => self.copy_from_list(&upload),
            KeyCode::Char('r') => {
                self.pending = Some(PendingAction::RefreshDetail { id: upload.id });
            }
            KeyCode::Char('d') => {
                self.mode = Mode::ConfirmDelete {
                    target: DeleteTarget::One {
                        id: upload.id.clone(),
                        filename: upload.filename.clone(),
                    },
                    back: Box::new(Mode::UploadDetail { upload, scroll }),
                };
            }
            _ => {}
        }
    }

    fn handle_confirm_delete(&mut self, key: KeyEvent, target: DeleteTarget, back: Mode) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.mode = Mode::Deleting {
                    target: target.clone(),
                };
                self.pending = Some(PendingAction::Delete(target));
            }
            _ => self.mode = back,
        }
    }

    fn copy(&mut self, text: &str) -> bool {
        match self.clipboard.copy(text) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "clipboard write failed");
                self.notify(Message::error(messages::COPY_FAILED));
                false
            }
        }
    }

    fn copy_from_list(&mut self, upload: &Upload) {
        if self.copy(&upload.resposta_automatica) {
            self.list.mark_copied(&upload.id, Instant::now());
        }
    }

    /// Run the queued request, if any. Called by the event loop after a draw.
    pub fn run_pending(&mut self) {
        let Some(action) = self.pending.take() else {
            return;
        };
        match action {
            PendingAction::Upload => self.run_upload(),
            PendingAction::LoadUploads => self.run_load_uploads(),
            PendingAction::RefreshDetail { id } => self.run_refresh_detail(&id),
            PendingAction::Delete(target) => self.run_delete(target),
        }
    }

    fn run_upload(&mut self) {
        let Some(file) = self.form.selected().cloned() else {
            return;
        };
        let now = Instant::now();
        // The file may have changed on disk since it was selected.
        let payload = match UploadPayload::from_selected(&file) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(file = %file.name, error = %e, "file rejected at send time");
                self.form.fail(now);
                self.banner.show(Message::error(e.to_string()), now);
                return;
            }
        };

        match self.service.upload(&payload) {
            Ok(result) => {
                tracing::info!(id = %result.id, categoria = %result.categoria, "upload processed");
                self.form.succeed(result, now);
                self.banner
                    .show(Message::success(messages::UPLOAD_SUCCEEDED), now);
            }
            Err(e) => {
                tracing::warn!(file = %file.name, error = %e, "upload failed");
                self.form.fail(now);
                self.banner.show(Message::error(messages::UPLOAD_FAILED), now);
            }
        }
    }

    fn run_load_uploads(&mut self) {
        match self.service.list_uploads() {
            Ok(uploads) => {
                tracing::info!(count = uploads.len(), "uploads loaded");
                self.list.set_uploads(uploads);
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load uploads");
                self.list.set_uploads(Vec::new());
            }
        }
    }

    fn run_refresh_detail(&mut self, id: &str) {
        match self.service.get_upload(id) {
            Ok(upload) => {
                self.list.replace(upload.clone());
                let scroll = match &self.mode {
                    Mode::UploadDetail { scroll, .. } => *scroll,
                    _ => 0,
                };
                self.mode = Mode::UploadDetail { upload, scroll };
            }
            Err(ServiceError::NotFound(_)) => {
                tracing::warn!(id, "upload no longer exists");
                self.list.remove(id);
                self.mode = Mode::UploadsList;
                self.notify(Message::error(messages::DOCUMENT_NOT_FOUND));
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "failed to refresh upload");
                self.notify(Message::error(messages::LOAD_FAILED));
            }
        }
    }

    fn run_delete(&mut self, target: DeleteTarget) {
        match target {
            DeleteTarget::One { id, filename } => match self.service.delete_upload(&id) {
                Ok(()) => {
                    tracing::info!(%id, %filename, "upload deleted");
                    self.list.remove(&id);
                }
                Err(e) => {
                    tracing::warn!(%id, error = %e, "delete failed");
                    self.notify(Message::error(messages::DELETE_FAILED));
                }
            },
            DeleteTarget::All => {
                let ids = self.list.ids();
                let report = self.service.delete_uploads(&ids);
                tracing::info!(summary = %report.summary(), "batch delete finished");
                self.list.clear();
                if !report.is_complete() {
                    self.notify(Message::error(report.summary()));
                }
            }
        }
        self.mode = Mode::UploadsList;
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let now = Instant::now();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_title_bar(frame, layout[0]);
        match &self.mode {
            Mode::Home | Mode::Upload | Mode::SelectFile { .. } => {
                self.render_home(frame, layout[1])
            }
            _ => self.list.render(frame, layout[1]),
        }
        self.render_status_bar(frame, layout[2], now);

        // Overlays
        match &self.mode {
            Mode::Home | Mode::UploadsList => {}
            Mode::Upload => self.render_upload_form(frame, area),
            Mode::SelectFile { input } => {
                self.render_upload_form(frame, area);
                self.render_input_bar(frame, " Caminho do arquivo (PDF ou TXT) ", input, area);
            }
            Mode::UploadDetail { upload, scroll } => {
                self.render_upload_detail(frame, upload, *scroll, area)
            }
            Mode::ConfirmDelete { target, back } => {
                if let Mode::UploadDetail { upload, scroll } = back.as_ref() {
                    self.render_upload_detail(frame, upload, *scroll, area);
                }
                self.render_confirm_delete_dialog(frame, target, area)
            }
            Mode::Deleting { .. } => self.render_deleting(frame, area),
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let title = Line::from(vec![
            Span::styled(
                format!(" {} ", messages::APP_TITLE),
                Style::default().bold().fg(Color::LightRed),
            ),
            Span::raw("| "),
            Span::styled(
                self.service.endpoints().to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(title, area);
    }

    fn render_home(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(60, 40, area);
        let lines = vec![
            Line::from(Span::styled(
                messages::APP_TITLE,
                Style::default().bold().fg(Color::LightRed),
            )),
            Line::from(""),
            Line::from(messages::HOME_PROMPT),
            Line::from(""),
            Line::from(vec![
                Span::styled("[u] ", Style::default().fg(Color::Yellow).bold()),
                Span::raw(messages::PROCESS_DOCUMENT),
                Span::raw("     "),
                Span::styled("[l] ", Style::default().fg(Color::Yellow).bold()),
                Span::raw(messages::VIEW_DOCUMENTS),
            ]),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, now: Instant) {
        let phase = self.banner.phase(now);
        if let (Some(msg), true) = (self.banner.message(), phase != BannerPhase::Hidden) {
            let mut style = tone_style(msg.tone);
            if phase == BannerPhase::Fading {
                style = style.add_modifier(Modifier::DIM);
            }
            let line = Line::from(Span::styled(format!(" {}", msg.text), style));
            frame.render_widget(line, area);
            return;
        }

        let hints = match &self.mode {
            Mode::Home => vec![("u", "upload"), ("l", "documents"), ("q", "quit")],
            Mode::Upload if self.form.result().is_some() => {
                let mut hints = vec![("j/k", "scroll")];
                if self.form.result().is_some_and(|r| r.has_reply()) {
                    hints.push(("c", "copy reply"));
                }
                hints.extend([("n", "another"), ("l", "documents"), ("Esc", "close")]);
                hints
            }
            Mode::Upload => vec![
                ("f", "file"),
                ("x", "remove"),
                ("Enter", "process"),
                ("Esc", "close"),
            ],
            Mode::SelectFile { .. } => vec![("Enter", "select"), ("Esc", "cancel")],
            Mode::UploadsList => vec![
                ("j/k", "nav"),
                ("1/2/3", "filter"),
                ("Enter", "detail"),
                ("c", "copy"),
                ("d", "del"),
                ("D", "del all"),
                ("r", "refresh"),
                ("u", "upload"),
                ("Esc", "back"),
            ],
            Mode::UploadDetail { .. } => vec![
                ("j/k", "scroll"),
                ("c", "copy"),
                ("r", "reload"),
                ("d", "del"),
                ("Esc", "back"),
            ],
            Mode::ConfirmDelete { .. } => vec![("y", "confirm"), ("any", "cancel")],
            Mode::Deleting { .. } => vec![],
        };

        let spans: Vec<Span> = hints
            .into_iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(
                        format!(" {key}"),
                        Style::default().fg(Color::Yellow).bold(),
                    ),
                    Span::raw(format!(" {desc} ")),
                ]
            })
            .collect();

        frame.render_widget(Line::from(spans), area);
    }

    fn render_upload_form(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(70, 70, area);
        frame.render_widget(Clear, popup);
        self.form.render(frame, popup);
    }

    fn render_input_bar(&self, frame: &mut Frame, label: &str, input: &str, area: Rect) {
        let input_area = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(3),
            width: area.width,
            height: 3u16.min(area.height),
        };
        frame.render_widget(Clear, input_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(label);
        let paragraph = Paragraph::new(input).block(block);
        frame.render_widget(paragraph, input_area);
    }

    fn render_upload_detail(&self, frame: &mut Frame, upload: &Upload, scroll: u16, area: Rect) {
        let popup = centered_rect(80, 80, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(format!(" {} ", upload.filename))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let heading = Style::default().fg(Color::Cyan).bold();
        let dim = Style::default().fg(Color::DarkGray);

        let mut lines = vec![
            Line::from(Span::styled(messages::EXTRACTED_TEXT, heading)),
        ];
        lines.extend(upload.texto_extraido.lines().map(Line::from));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(messages::CLASSIFICATION, heading)));
        lines.push(Line::from(category_badge(upload.category())));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(messages::AUTO_REPLY, heading)));
        if upload.has_reply() {
            lines.extend(upload.resposta_automatica.lines().map(Line::from));
        } else {
            lines.push(Line::from(Span::styled(messages::REPLY_NOT_GENERATED, dim)));
        }
        if self.list.is_copied(&upload.id) {
            lines.push(Line::from(Span::styled(
                messages::COPIED,
                Style::default().fg(Color::Green),
            )));
        }
        if let Some(created_at) = upload.created_at.as_deref() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("{}: {}", messages::PROCESSED_AT, format_timestamp(created_at)),
                dim,
            )));
        }

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0));
        frame.render_widget(paragraph, popup);
    }

    fn render_confirm_delete_dialog(&self, frame: &mut Frame, target: &DeleteTarget, area: Rect) {
        let popup = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup);

        let (title, body) = match target {
            DeleteTarget::One { filename, .. } => (
                messages::CONFIRM_DELETE_ONE,
                format!("{filename}\n\n{}", messages::CONFIRM_DELETE_ONE_BODY),
            ),
            DeleteTarget::All => (
                messages::CONFIRM_DELETE_ALL,
                messages::CONFIRM_DELETE_ALL_BODY.to_string(),
            ),
        };

        let block = Block::default()
            .title(format!(" {title} "))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));

        let text = format!("{body}\n\n(y) apagar / (qualquer tecla) cancelar");
        let paragraph = Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, popup);
    }

    fn render_deleting(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(30, 15, area);
        frame.render_widget(Clear, popup);
        let paragraph = Paragraph::new(messages::DELETING)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            )
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, popup);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
