use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState},
    Frame,
};

use crate::models::Surah;
use crate::tui::theme;
use crate::utils::format::fit_width;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    surahs: &[&Surah],
    state: &mut ListState,
    filter_label: &str,
) {
    let block = Block::default()
        .title(Span::styled(format!(" Surahs · {} ", filter_label), theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let items: Vec<ListItem> = surahs
        .iter()
        .map(|s| {
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:>3}  ", s.number), theme::dim()),
                Span::styled(fit_width(s.name_en, 18), theme::bold()),
                Span::styled(fit_width(s.translation_en, 28), theme::dim()),
                Span::styled(format!("{:>4} ayahs  ", s.verses), theme::dim()),
                Span::styled(s.revelation.display_name(), theme::amber()),
                Span::styled(format!("  {}", s.name_ar), theme::gold()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(theme::selected())
        .highlight_symbol("▸");
    frame.render_stateful_widget(list, area, state);
}
