use chrono::Local;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, location: &str, hijri_str: &str, ramadan: bool) {
    let gregorian_str = Local::now().format("%A, %b %d, %Y").to_string();

    let title_line = Line::from(vec![
        Span::styled("  تِلَاوَة  ", theme::gold().add_modifier(Modifier::BOLD)),
        Span::styled("tilawah", theme::gold()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(location, theme::bold()),
    ]);

    let mut date_spans = vec![
        Span::styled(hijri_str, theme::amber()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(gregorian_str, theme::dim()),
    ];
    if ramadan {
        date_spans.push(Span::styled("  ·  ", theme::dim()));
        date_spans.push(Span::styled("رمضان مبارك", theme::green()));
    }
    let date_line = Line::from(date_spans);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold().add_modifier(Modifier::BOLD))
        .style(theme::base());

    let paragraph = Paragraph::new(vec![title_line, Line::from(""), date_line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
