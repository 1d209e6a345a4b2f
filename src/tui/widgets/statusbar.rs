use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::theme;

/// Key hints for the active view, followed by the global ones.
pub fn render(frame: &mut Frame, area: Rect, hints: &[(&str, &str)], now_playing: Option<&str>) {
    let mut spans = Vec::new();
    if let Some(title) = now_playing {
        spans.push(Span::styled("▶ ", theme::green()));
        spans.push(Span::styled(format!("{}   ", title), theme::dim()));
    }
    let globals = [("[Tab]", " view  "), ("[t]", " theme  "), ("[?]", " help  "), ("[q]", " quit")];
    for (key, label) in hints.iter().chain(globals.iter()) {
        spans.push(Span::styled(*key, theme::gold()));
        spans.push(Span::styled(*label, theme::dim()));
    }

    let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
