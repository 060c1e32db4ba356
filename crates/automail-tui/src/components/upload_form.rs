use std::path::Path;
use std::time::Instant;

use automail_core::file::SelectedFile;
use automail_core::messages;
use automail_core::text::{truncate, RESULT_PREVIEW_CHARS};
use automail_core::timer::{Expiring, LOADING_TAIL};
use automail_core::{SelectionError, UploadResult};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::category_badge;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Loading,
    Success,
    Error,
}

/// The "process a document" form: one selected file, one result.
pub struct UploadForm {
    selected: Option<SelectedFile>,
    result: Option<UploadResult>,
    phase: FormPhase,
    /// Keeps the form disabled for a moment after the response arrives.
    tail: Expiring<()>,
    /// First line of the result view shown in the popup.
    scroll: u16,
}

impl Default for UploadForm {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadForm {
    pub fn new() -> Self {
        Self {
            selected: None,
            result: None,
            phase: FormPhase::Idle,
            tail: Expiring::new(LOADING_TAIL),
            scroll: 0,
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn result(&self) -> Option<&UploadResult> {
        self.result.as_ref()
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn scroll_down(&mut self) {
        if self.result.is_some() {
            self.scroll = self.scroll.saturating_add(1);
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn is_loading(&self) -> bool {
        self.phase == FormPhase::Loading || self.tail.is_set()
    }

    /// Validate and select the file at `path`, dropping any previous result.
    /// A rejected file leaves the current selection alone. Ignored while loading.
    pub fn select(&mut self, path: impl AsRef<Path>) -> Result<(), SelectionError> {
        if self.is_loading() {
            return Ok(());
        }
        let file = SelectedFile::from_path(path)?;
        self.selected = Some(file);
        self.result = None;
        self.phase = FormPhase::Idle;
        Ok(())
    }

    pub fn remove_file(&mut self) {
        if self.is_loading() {
            return;
        }
        self.selected = None;
        self.result = None;
        self.phase = FormPhase::Idle;
    }

    /// Move to `Loading` and hand back the file to send.
    pub fn begin_submit(&mut self) -> Result<SelectedFile, SelectionError> {
        let file = self
            .selected
            .clone()
            .ok_or(SelectionError::NoFileSelected)?;
        self.phase = FormPhase::Loading;
        self.result = None;
        Ok(file)
    }

    pub fn succeed(&mut self, result: UploadResult, now: Instant) {
        self.result = Some(result);
        self.scroll = 0;
        self.phase = FormPhase::Success;
        self.tail.set((), now);
    }

    pub fn fail(&mut self, now: Instant) {
        self.phase = FormPhase::Error;
        self.tail.set((), now);
    }

    /// Release the loading tail once it expires. An error returns the form to
    /// `Idle`; a success keeps its result on screen.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.tail.tick(now) {
            return false;
        }
        if self.phase == FormPhase::Error {
            self.phase = FormPhase::Idle;
        }
        true
    }

    pub fn has_timers(&self) -> bool {
        self.tail.is_set()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" {} ", messages::PROCESS_DOCUMENT))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let (lines, scroll) = match &self.result {
            Some(result) => (result_lines(result), self.scroll),
            None => (self.selection_lines(), 0),
        };

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0));
        frame.render_widget(paragraph, area);
    }

    fn selection_lines(&self) -> Vec<Line<'_>> {
        let dim = Style::default().fg(Color::DarkGray);
        let mut lines = Vec::new();

        match &self.selected {
            Some(file) => {
                lines.push(Line::from(vec![
                    Span::styled(file.name.as_str(), Style::default().bold()),
                    Span::styled(format!("  {}", file.size_label()), dim),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("[x] ", Style::default().fg(Color::Red).bold()),
                    Span::raw("Remover arquivo"),
                ]));
            }
            None => {
                lines.push(Line::from(Span::styled("Nenhum arquivo selecionado", dim)));
                lines.push(Line::from(vec![
                    Span::styled("[f] ", Style::default().fg(Color::Yellow).bold()),
                    Span::raw("Selecionar arquivo"),
                ]));
                lines.push(Line::from(Span::styled(
                    format!("{} (máx. 20MB)", messages::UNSUPPORTED_EXTENSION),
                    dim,
                )));
            }
        }

        lines.push(Line::from(""));
        if self.is_loading() {
            lines.push(Line::from(Span::styled(
                messages::PROCESSING,
                Style::default().fg(Color::Yellow),
            )));
        } else {
            let style = if self.selected.is_some() {
                Style::default().fg(Color::Green).bold()
            } else {
                dim
            };
            lines.push(Line::from(Span::styled(
                format!("[Enter] {}", messages::PROCESS_DOCUMENT),
                style,
            )));
        }
        lines
    }
}

fn result_lines(result: &UploadResult) -> Vec<Line<'_>> {
    let heading = Style::default().fg(Color::Cyan).bold();
    let mut lines = vec![
        Line::from(Span::styled(
            messages::UPLOAD_SUCCEEDED,
            Style::default().fg(Color::Green).bold(),
        )),
        Line::from(Span::styled(
            result.filename.as_str(),
            Style::default().bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(messages::EXTRACTED_TEXT, heading)),
    ];
    let preview = truncate(&result.texto_extraido, RESULT_PREVIEW_CHARS);
    lines.extend(preview.lines().map(|l| Line::from(l.to_string())));

    if !result.categoria.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(messages::CLASSIFICATION, heading)));
        lines.push(Line::from(category_badge(result.category())));
    }

    if result.has_reply() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(messages::AUTO_REPLY, heading)));
        lines.extend(result.resposta_automatica.lines().map(Line::from));
        lines.push(Line::from(vec![
            Span::styled("[c] ", Style::default().fg(Color::Yellow).bold()),
            Span::raw(messages::COPY_REPLY),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("[n] ", Style::default().fg(Color::Yellow).bold()),
        Span::raw(messages::SEND_ANOTHER),
        Span::raw("   "),
        Span::styled("[l] ", Style::default().fg(Color::Yellow).bold()),
        Span::raw(messages::VIEW_DOCUMENTS),
    ]));
    lines
}
