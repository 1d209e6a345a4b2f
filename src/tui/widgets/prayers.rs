use chrono::NaiveDateTime;
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::{PrayerTimings, PrayerType, Reminder};
use crate::tui::theme;
use crate::utils::format::{fit_width, format_time};

/// Today's timings with a bell marker on prayers that have a reminder.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    timings: Option<&PrayerTimings>,
    reminders: &[Reminder],
    next: Option<PrayerType>,
    now: NaiveDateTime,
) {
    let title = match timings {
        Some(t) => format!(" Prayer Times · {} ", t.source.as_str()),
        None => " Prayer Times ".to_string(),
    };
    let block = Block::default()
        .title(Span::styled(title, theme::gold()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border())
        .style(theme::surface());

    let Some(times) = timings else {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("  Prayer times unavailable", theme::dim())),
        ])
        .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let items: Vec<ListItem> = times
        .as_list()
        .into_iter()
        .map(|(prayer, time)| {
            let past = times.date.and_time(time) <= now;
            let is_next = next == Some(prayer);

            let name_style = if is_next {
                theme::gold().add_modifier(Modifier::BOLD)
            } else if past {
                theme::dim()
            } else {
                theme::bold()
            };

            let marker = match reminders.iter().find(|r| r.prayer == prayer) {
                Some(r) if r.enabled => Span::styled(format!("🔔 -{}m", r.minutes_before), theme::amber()),
                Some(_) => Span::styled("🔕", theme::dim()),
                None => Span::raw(""),
            };

            ListItem::new(Line::from(vec![
                Span::styled(if is_next { "  ▸ " } else { "    " }, theme::gold()),
                Span::styled(fit_width(prayer.display_name(), 9), name_style),
                Span::styled(format!("{:<8}", format_time(time)), if past { theme::dim() } else { theme::bold() }),
                marker,
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
