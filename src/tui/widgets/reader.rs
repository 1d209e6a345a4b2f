use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::models::{Surah, SurahText};
use crate::tui::theme;

/// Ayahs from `cursor` onward; the cursor ayah is highlighted.
pub fn render(frame: &mut Frame, area: Rect, surah: &Surah, text: &SurahText, cursor: usize) {
    let title = format!(
        " {}. {} · {} · {}/{} ",
        surah.number,
        surah.name_en,
        surah.name_ar,
        cursor + 1,
        text.ayahs.len()
    );
    let block = Block::default()
        .title(Span::styled(title, theme::gold().add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::gold())
        .style(theme::surface());

    let mut lines = Vec::new();
    if cursor == 0 && surah.number != 1 && surah.number != 9 {
        lines.push(Line::from(Span::styled(
            "بِسۡمِ ٱللَّهِ ٱلرَّحۡمَٰنِ ٱلرَّحِيمِ",
            theme::gold(),
        )));
        lines.push(Line::from(""));
    }

    for (i, ayah) in text.ayahs.iter().enumerate().skip(cursor) {
        let marker_style = if i == cursor { theme::selected() } else { theme::amber() };
        lines.push(Line::from(vec![
            Span::styled(format!("﴿{}﴾ ", ayah.number_in_surah), marker_style),
            Span::styled(ayah.text_ar.as_str(), theme::bold()),
        ]));
        if let Some(tr) = &ayah.text_translation {
            lines.push(Line::from(Span::styled(tr.as_str(), theme::dim())));
        }
        lines.push(Line::from(""));
        // Enough to fill any reasonable terminal
        if lines.len() > area.height as usize * 2 {
            break;
        }
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
