pub mod upload_form;
pub mod uploads_list;

use automail_core::{Category, Tone};
use ratatui::prelude::*;

pub(crate) fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Success => Style::default().fg(Color::Green),
        Tone::Warning => Style::default().fg(Color::Yellow),
        Tone::Error => Style::default().fg(Color::Red),
        Tone::Muted => Style::default().fg(Color::DarkGray),
    }
}

/// `[Produtivo]`, `[Improdutivo]` or `[Não classificado]` in the category color.
pub(crate) fn category_badge(category: Category) -> Span<'static> {
    Span::styled(
        format!("[{}]", category.display_name()),
        tone_style(category.tone()).bold(),
    )
}
