use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::models::Dua;
use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    tabs: &[String],
    tab: usize,
    duas: &[&Dua],
    favorites: &[u32],
    state: &mut ListState,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let tab_bar = Tabs::new(tabs.iter().map(|t| Line::from(t.as_str())))
        .select(tab)
        .style(theme::dim())
        .highlight_style(theme::gold().add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme::border())
                .style(theme::surface()),
        );
    frame.render_widget(tab_bar, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    let items: Vec<ListItem> = duas
        .iter()
        .map(|d| {
            let star = if favorites.contains(&d.id) { "★ " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(star, theme::gold()),
                Span::styled(d.title, theme::bold()),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .title(Span::styled(" Duas ", theme::gold()))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme::border())
                .style(theme::surface()),
        )
        .highlight_style(theme::selected());
    frame.render_stateful_widget(list, body[0], state);

    let detail = match state.selected().and_then(|i| duas.get(i)) {
        Some(d) => {
            let mut lines = vec![
                Line::from(Span::styled(d.title, theme::gold().add_modifier(Modifier::BOLD))),
                Line::from(""),
                Line::from(Span::styled(d.arabic, theme::bold())),
                Line::from(""),
                Line::from(Span::styled(d.transliteration, theme::amber())),
                Line::from(""),
                Line::from(Span::raw(d.translation)),
            ];
            if let Some(reference) = d.reference {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(reference, theme::dim())));
            }
            lines
        }
        None => vec![Line::from(Span::styled("No duas here yet. Press [f] on a dua to favorite it.", theme::dim()))],
    };
    let detail = Paragraph::new(detail)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme::border())
                .style(theme::surface()),
        );
    frame.render_widget(detail, body[1]);
}
