use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState},
    Frame,
};

use crate::models::RadioStation;
use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    stations: &[RadioStation],
    playing: Option<u32>,
    state: &mut ListState,
) {
    let block = Block::default()
        .title(Span::styled(" Quran Radio ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let items: Vec<ListItem> = stations
        .iter()
        .map(|s| {
            let icon = if playing == Some(s.id) {
                Span::styled(" ▶ ", theme::green())
            } else {
                Span::styled("   ", theme::dim())
            };
            ListItem::new(Line::from(vec![
                icon,
                Span::styled(s.name.as_str(), theme::bold()),
            ]))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(theme::selected());
    frame.render_stateful_widget(list, area, state);
}
