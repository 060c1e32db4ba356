use std::time::Instant;

use automail_core::messages;
use automail_core::text::{format_timestamp, single_line, truncate, LIST_PREVIEW_CHARS};
use automail_core::timer::{Expiring, COPIED_FLAG};
use automail_core::{CategoryFilter, FilterCounts, Upload};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use super::category_badge;

pub struct UploadsList {
    uploads: Vec<Upload>,
    filter: CategoryFilter,
    list_state: ListState,
    /// Id of the upload whose reply was just copied.
    copied: Expiring<String>,
    loading: bool,
}

impl Default for UploadsList {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl UploadsList {
    pub fn new(uploads: Vec<Upload>) -> Self {
        let mut list = Self {
            uploads,
            filter: CategoryFilter::All,
            list_state: ListState::default(),
            copied: Expiring::new(COPIED_FLAG),
            loading: false,
        };
        list.clamp_selection();
        list
    }

    /// Replace the contents, keeping the highlighted upload when it survives.
    pub fn set_uploads(&mut self, uploads: Vec<Upload>) {
        let selected_id = self.selected().map(|u| u.id.clone());
        self.uploads = uploads;
        self.loading = false;
        self.list_state.select(None);
        if let Some(id) = selected_id {
            self.select_by_id(&id);
        }
        self.clamp_selection();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn uploads(&self) -> &[Upload] {
        &self.uploads
    }

    pub fn is_empty(&self) -> bool {
        self.uploads.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.uploads.iter().map(|u| u.id.clone()).collect()
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        if self.filter != filter {
            self.filter = filter;
            self.list_state.select(None);
            self.clamp_selection();
        }
    }

    pub fn next_filter(&mut self) {
        let all = CategoryFilter::ALL;
        let idx = all.iter().position(|f| *f == self.filter).unwrap_or(0);
        self.set_filter(all[(idx + 1) % all.len()]);
    }

    pub fn visible(&self) -> Vec<&Upload> {
        self.filter.apply(&self.uploads)
    }

    pub fn counts(&self) -> FilterCounts {
        FilterCounts::from_uploads(&self.uploads)
    }

    pub fn selected(&self) -> Option<&Upload> {
        let idx = self.list_state.selected()?;
        self.visible().get(idx).copied()
    }

    /// Highlight `id` if the current filter shows it.
    pub fn select_by_id(&mut self, id: &str) -> bool {
        let found = self.visible().iter().position(|u| u.id == id);
        if let Some(idx) = found {
            self.list_state.select(Some(idx));
        }
        found.is_some()
    }

    /// Swap in a fresh copy of an upload already in the list.
    pub fn replace(&mut self, upload: Upload) -> bool {
        match self.uploads.iter_mut().find(|u| u.id == upload.id) {
            Some(slot) => {
                *slot = upload;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.uploads.len();
        self.uploads.retain(|u| u.id != id);
        if self.copied.is(&id.to_string()) {
            self.copied.clear();
        }
        self.clamp_selection();
        self.uploads.len() != before
    }

    pub fn clear(&mut self) {
        self.uploads.clear();
        self.copied.clear();
        self.list_state.select(None);
    }

    pub fn mark_copied(&mut self, id: &str, now: Instant) {
        self.copied.set(id.to_string(), now);
    }

    pub fn is_copied(&self, id: &str) -> bool {
        self.copied.get().is_some_and(|c| c == id)
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        self.copied.tick(now)
    }

    pub fn has_timers(&self) -> bool {
        self.copied.is_set()
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            self.list_state.select(None);
        } else {
            let current = self.list_state.selected().unwrap_or(0);
            self.list_state.select(Some(current.min(len - 1)));
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if current + 1 < len {
                    self.list_state.select(Some(current + 1));
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if current > 0 {
                    self.list_state.select(Some(current - 1));
                }
            }
            KeyCode::Char('g') | KeyCode::Home => self.list_state.select(Some(0)),
            KeyCode::Char('G') | KeyCode::End => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        self.render_filters(frame, layout[0]);

        let block = Block::default()
            .title(format!(" {} ", messages::LIST_TITLE))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        if self.loading {
            let p = Paragraph::new(messages::LOADING)
                .block(block)
                .alignment(Alignment::Center);
            frame.render_widget(p, layout[1]);
            return;
        }

        let visible = self.visible();
        if visible.is_empty() {
            let dim = Style::default().fg(Color::DarkGray);
            let lines = if self.uploads.is_empty() {
                vec![
                    Line::from(""),
                    Line::from(Span::styled(messages::NO_DOCUMENTS, Style::default().bold())),
                    Line::from(Span::styled(messages::NO_DOCUMENTS_HINT, dim)),
                ]
            } else {
                vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        self.filter.empty_message(),
                        Style::default().bold(),
                    )),
                    Line::from(vec![
                        Span::styled("[a] ", Style::default().fg(Color::Yellow).bold()),
                        Span::styled(messages::VIEW_ALL, dim),
                    ]),
                ]
            };
            let p = Paragraph::new(lines)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(p, layout[1]);
            return;
        }

        let items: Vec<ListItem> = visible.iter().map(|u| self.row(u)).collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");

        let mut state = self.list_state.clone();
        frame.render_stateful_widget(list, layout[1], &mut state);
    }

    fn render_filters(&self, frame: &mut Frame, area: Rect) {
        let counts = self.counts();
        let spans: Vec<Span> = CategoryFilter::ALL
            .iter()
            .enumerate()
            .flat_map(|(i, filter)| {
                let style = if *filter == self.filter {
                    Style::default().fg(Color::Black).bg(Color::Cyan).bold()
                } else {
                    Style::default().fg(Color::Gray)
                };
                vec![
                    Span::styled(format!(" {}", i + 1), Style::default().fg(Color::Yellow)),
                    Span::styled(
                        format!(" {} ({}) ", filter.label(), counts.for_filter(*filter)),
                        style,
                    ),
                ]
            })
            .collect();
        frame.render_widget(Line::from(spans), area);
    }

    fn row<'a>(&self, upload: &'a Upload) -> ListItem<'a> {
        let dim = Style::default().fg(Color::DarkGray);
        let date = upload
            .created_at
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_default();

        let mut reply_line = vec![Span::styled("Resposta: ", dim)];
        if upload.has_reply() {
            reply_line.push(Span::raw(preview(&upload.resposta_automatica)));
        } else {
            reply_line.push(Span::styled(messages::REPLY_NOT_GENERATED, dim.italic()));
        }
        if self.is_copied(&upload.id) {
            reply_line.push(Span::styled(
                format!("  {}", messages::COPIED),
                Style::default().fg(Color::Green),
            ));
        }

        ListItem::new(vec![
            Line::from(vec![
                Span::styled(upload.filename.as_str(), Style::default().bold()),
                Span::raw("  "),
                category_badge(upload.category()),
                Span::styled(format!("  {date}"), dim),
            ]),
            Line::from(vec![
                Span::styled("Texto: ", dim),
                Span::raw(preview(&upload.texto_extraido)),
            ]),
            Line::from(reply_line),
            Line::from(""),
        ])
    }
}

/// One row's worth of `text`, newlines folded into spaces.
fn preview(text: &str) -> String {
    truncate(&single_line(text), LIST_PREVIEW_CHARS).into_owned()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;

    fn make_upload(id: &str, categoria: &str) -> Upload {
        Upload {
            id: id.to_string(),
            filename: format!("{id}.txt"),
            texto_extraido: "texto".into(),
            categoria: categoria.to_string(),
            resposta_automatica: String::new(),
            resultado_itzam: String::new(),
            created_at: None,
        }
    }

    fn make_list() -> UploadsList {
        UploadsList::new(vec![
            make_upload("p1", "Produtivo"),
            make_upload("i1", "Improdutivo"),
            make_upload("p2", "Produtivo"),
            make_upload("x1", ""),
        ])
    }

    fn rendered(list: &UploadsList) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| list.render(f, f.area())).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect())
            .collect()
    }

    fn contains(rows: &[String], needle: &str) -> bool {
        rows.iter().any(|r| r.contains(needle))
    }

    #[test]
    fn starts_on_first_row() {
        let list = make_list();
        assert_eq!(list.selected().unwrap().id, "p1");
        assert!(UploadsList::default().selected().is_none());
    }

    #[test]
    fn counts_cover_every_filter() {
        let counts = make_list().counts();
        assert_eq!(counts.all, 4);
        assert_eq!(counts.produtivo, 2);
        assert_eq!(counts.improdutivo, 1);
        assert_eq!(counts.unclassified, 1);
    }

    #[test]
    fn filter_changes_visible_rows() {
        let mut list = make_list();
        list.set_filter(CategoryFilter::Produtivo);
        let ids: Vec<&str> = list.visible().iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
        assert_eq!(list.selected().unwrap().id, "p1");

        list.next_filter();
        assert_eq!(list.filter(), CategoryFilter::Improdutivo);
        assert_eq!(list.selected().unwrap().id, "i1");

        list.next_filter();
        assert_eq!(list.filter(), CategoryFilter::All);
    }

    #[test]
    fn empty_filter_has_no_selection() {
        let mut list = UploadsList::new(vec![make_upload("p1", "Produtivo")]);
        list.set_filter(CategoryFilter::Improdutivo);
        assert!(list.visible().is_empty());
        assert!(list.selected().is_none());
        assert!(!list.is_empty());
    }

    #[test]
    fn navigation_stays_in_bounds() {
        let mut list = make_list();
        list.handle_key(KeyEvent::from(KeyCode::Char('k')));
        assert_eq!(list.selected().unwrap().id, "p1");
        list.handle_key(KeyEvent::from(KeyCode::Char('G')));
        assert_eq!(list.selected().unwrap().id, "x1");
        list.handle_key(KeyEvent::from(KeyCode::Char('j')));
        assert_eq!(list.selected().unwrap().id, "x1");
    }

    #[test]
    fn remove_last_row_moves_selection_up() {
        let mut list = make_list();
        assert!(list.select_by_id("x1"));
        assert!(list.remove("x1"));
        assert_eq!(list.selected().unwrap().id, "p2");
        assert!(!list.remove("x1"));
    }

    #[test]
    fn refresh_keeps_selected_upload() {
        let mut list = make_list();
        list.select_by_id("p2");
        list.set_uploads(vec![make_upload("new", "Produtivo"), make_upload("p2", "Produtivo")]);
        assert_eq!(list.selected().unwrap().id, "p2");
    }

    #[test]
    fn copied_flag_expires() {
        let t0 = Instant::now();
        let mut list = make_list();
        list.mark_copied("i1", t0);
        assert!(list.is_copied("i1"));
        assert!(!list.is_copied("p1"));
        assert!(list.has_timers());
        assert!(!list.tick(t0 + Duration::from_millis(1500)));
        assert!(list.tick(t0 + COPIED_FLAG));
        assert!(!list.is_copied("i1"));
    }

    #[test]
    fn clear_drops_everything() {
        let mut list = make_list();
        list.mark_copied("p1", Instant::now());
        list.clear();
        assert!(list.is_empty());
        assert!(list.selected().is_none());
        assert!(!list.has_timers());
    }

    #[test]
    fn filter_tabs_show_counts() {
        let rows = rendered(&make_list());
        assert!(rows[0].contains("1 TODOS (4)"));
        assert!(rows[0].contains("2 PRODUTIVOS (2)"));
        assert!(rows[0].contains("3 IMPRODUTIVOS (1)"));
    }

    #[test]
    fn rows_fold_multiline_text() {
        let mut upload = make_upload("m1", "Produtivo");
        upload.texto_extraido = "Bom dia,\nSegue anexo".into();
        upload.resposta_automatica = "Prezado,\r\n\r\nObrigado".into();
        let rows = rendered(&UploadsList::new(vec![upload]));

        assert!(contains(&rows, "Texto: Bom dia, Segue anexo"));
        assert!(contains(&rows, "Resposta: Prezado, Obrigado"));
        assert!(!contains(&rows, "Bom dia,Segue"));
    }

    #[test]
    fn long_text_is_cut_on_the_row() {
        let mut upload = make_upload("l1", "Produtivo");
        upload.texto_extraido = "a".repeat(150);
        let rows = rendered(&UploadsList::new(vec![upload]));
        let expected = format!("Texto: {}...", "a".repeat(LIST_PREVIEW_CHARS));
        assert!(contains(&rows, &expected));
        assert!(!contains(&rows, &"a".repeat(LIST_PREVIEW_CHARS + 1)));
    }

    #[test]
    fn unknown_labels_render_as_unclassified() {
        let rows = rendered(&UploadsList::new(vec![
            make_upload("x1", ""),
            make_upload("x2", "produtivo"),
        ]));
        let badges = rows
            .iter()
            .filter(|r| r.contains("[Não classificado]"))
            .count();
        assert_eq!(badges, 2);
        assert!(contains(&rows, messages::REPLY_NOT_GENERATED));
    }

    #[test]
    fn empty_filter_shows_its_own_message() {
        let mut list = UploadsList::new(vec![make_upload("p1", "Produtivo")]);
        list.set_filter(CategoryFilter::Improdutivo);
        let rows = rendered(&list);
        assert!(contains(&rows, messages::NO_UNPRODUCTIVE));
        assert!(contains(&rows, messages::VIEW_ALL));
        assert!(!contains(&rows, messages::NO_DOCUMENTS));
    }

    #[test]
    fn copied_row_is_marked() {
        let mut list = make_list();
        list.mark_copied("i1", Instant::now());
        let rows = rendered(&list);
        assert_eq!(rows.iter().filter(|r| r.contains(messages::COPIED)).count(), 1);
    }
}
