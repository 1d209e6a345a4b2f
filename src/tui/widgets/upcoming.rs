use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

use crate::reminders::Trigger;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, upcoming: &[&Trigger]) {
    let block = Block::default()
        .title(Span::styled(" Upcoming Reminders ", theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let items: Vec<ListItem> = if upcoming.is_empty() {
        vec![ListItem::new(Line::from(Span::styled("  Nothing left today", theme::dim())))]
    } else {
        upcoming
            .iter()
            .map(|t| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("  {}  ", t.at.format("%H:%M")), theme::amber()),
                    Span::styled(t.label.as_str(), theme::bold()),
                    Span::styled(format!("  {}", t.sound.as_str()), theme::dim()),
                ]))
            })
            .collect()
    };

    frame.render_widget(List::new(items).block(block), area);
}
