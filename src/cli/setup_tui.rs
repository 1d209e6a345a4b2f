use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use log::info;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use rusqlite::Connection;

use crate::config::AppConfig;
use crate::db::repository::{CacheRepo, MetaRepo};
use crate::prayer_times::calculator::CALC_METHODS;
use crate::prayer_times::TimingsProvider;
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::utils::format::{format_tz_offset, parse_tz_offset};

/// Days of offline timings precomputed after setup.
const PRECOMPUTE_DAYS: u32 = 30;

const MADHABS: [&str; 2] = ["Shafi", "Hanafi"];
const HIJRI_OFFSETS: [i32; 3] = [-1, 0, 1];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Welcome,
    LocationName,
    Coordinates,
    Region,
    CalcMethod,
    Madhab,
    TimezoneOffset,
    HijriOffset,
    Confirm,
}

impl Step {
    const ORDER: [Step; 9] = [
        Step::Welcome,
        Step::LocationName,
        Step::Coordinates,
        Step::Region,
        Step::CalcMethod,
        Step::Madhab,
        Step::TimezoneOffset,
        Step::HijriOffset,
        Step::Confirm,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|s| *s == self).unwrap_or(0)
    }

    fn next(self) -> Step {
        Self::ORDER.get(self.index() + 1).copied().unwrap_or(Step::Confirm)
    }

    fn prev(self) -> Step {
        self.index()
            .checked_sub(1)
            .and_then(|i| Self::ORDER.get(i).copied())
            .unwrap_or(Step::Welcome)
    }

    fn is_text(self) -> bool {
        matches!(
            self,
            Step::LocationName | Step::Coordinates | Step::Region | Step::TimezoneOffset
        )
    }
}

fn parse_coordinates(s: &str) -> std::result::Result<(f64, f64), String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| "Enter latitude, longitude (e.g. 21.4225, 39.8262)".to_string())?;
    let lat: f64 = lat.trim().parse().map_err(|_| "Latitude is not a number".to_string())?;
    let lng: f64 = lng.trim().parse().map_err(|_| "Longitude is not a number".to_string())?;
    if !(-90.0..=90.0).contains(&lat) {
        return Err("Latitude must be between -90 and 90".to_string());
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err("Longitude must be between -180 and 180".to_string());
    }
    Ok((lat, lng))
}

/// Blank means "look up by coordinates".
fn parse_region(s: &str) -> std::result::Result<Option<(String, String)>, String> {
    if s.trim().is_empty() {
        return Ok(None);
    }
    match s.split_once(',') {
        Some((city, country)) if !city.trim().is_empty() && !country.trim().is_empty() => {
            Ok(Some((city.trim().to_string(), country.trim().to_string())))
        }
        _ => Err("Use City, Country (e.g. Istanbul, Turkey) or leave blank".to_string()),
    }
}

struct SetupWizard {
    step: Step,
    input: String,
    error: Option<String>,
    list_state: ListState,

    location_name: String,
    latitude: f64,
    longitude: f64,
    region: Option<(String, String)>,
    method_idx: usize,
    madhab_idx: usize,
    tz_minutes: i32,
    hijri_idx: usize,

    should_quit: bool,
    confirmed: bool,
}

impl SetupWizard {
    fn new(existing: &AppConfig) -> Self {
        let loc = &existing.location;
        let method_idx = CALC_METHODS
            .iter()
            .position(|m| *m == loc.calc_method)
            .unwrap_or(0);
        let madhab_idx = MADHABS.iter().position(|m| *m == loc.madhab).unwrap_or(0);
        let hijri_idx = HIJRI_OFFSETS
            .iter()
            .position(|o| *o == loc.hijri_offset)
            .unwrap_or(1);
        let region = match (&loc.city, &loc.country) {
            (Some(city), Some(country)) => Some((city.clone(), country.clone())),
            _ => None,
        };

        Self {
            step: Step::Welcome,
            input: String::new(),
            error: None,
            list_state: ListState::default().with_selected(Some(method_idx)),
            location_name: loc.name.clone(),
            latitude: loc.latitude,
            longitude: loc.longitude,
            region,
            method_idx,
            madhab_idx,
            tz_minutes: loc.timezone_offset,
            hijri_idx,
            should_quit: false,
            confirmed: false,
        }
    }

    fn prefill(&mut self) {
        self.input = match self.step {
            Step::LocationName => self.location_name.clone(),
            Step::Coordinates => format!("{}, {}", self.latitude, self.longitude),
            Step::Region => self
                .region
                .as_ref()
                .map(|(c, k)| format!("{}, {}", c, k))
                .unwrap_or_default(),
            Step::TimezoneOffset => format_tz_offset(self.tz_minutes),
            _ => String::new(),
        };
    }

    fn advance(&mut self) {
        self.error = None;
        if self.step == Step::Confirm {
            self.confirmed = true;
            return;
        }
        self.step = self.step.next();
        self.prefill();
    }

    fn go_back(&mut self) {
        self.error = None;
        if self.step == Step::Welcome {
            self.should_quit = true;
            return;
        }
        self.step = self.step.prev();
        self.prefill();
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.step.is_text() {
            self.handle_text_input(key);
            return;
        }

        match (self.step, key.code) {
            (_, KeyCode::Esc) => self.go_back(),
            (Step::Welcome, _) => self.advance(),
            (Step::CalcMethod, KeyCode::Up | KeyCode::Char('k')) => {
                self.method_idx = self.method_idx.saturating_sub(1);
                self.list_state.select(Some(self.method_idx));
            }
            (Step::CalcMethod, KeyCode::Down | KeyCode::Char('j')) => {
                if self.method_idx + 1 < CALC_METHODS.len() {
                    self.method_idx += 1;
                    self.list_state.select(Some(self.method_idx));
                }
            }
            (Step::Madhab, KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l')) => {
                self.madhab_idx = 1 - self.madhab_idx;
            }
            (Step::HijriOffset, KeyCode::Left | KeyCode::Char('h')) => {
                self.hijri_idx = self.hijri_idx.saturating_sub(1);
            }
            (Step::HijriOffset, KeyCode::Right | KeyCode::Char('l')) => {
                self.hijri_idx = (self.hijri_idx + 1).min(HIJRI_OFFSETS.len() - 1);
            }
            (Step::Confirm, KeyCode::Char('n')) => self.go_back(),
            (Step::Confirm, KeyCode::Char('y')) | (_, KeyCode::Enter) => self.advance(),
            _ => {}
        }
    }

    fn handle_text_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.go_back(),
            KeyCode::Enter => match self.commit_text_input() {
                Ok(()) => self.advance(),
                Err(e) => self.error = Some(e),
            },
            KeyCode::Backspace => {
                self.input.pop();
                self.error = None;
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                self.error = None;
            }
            _ => {}
        }
    }

    fn commit_text_input(&mut self) -> std::result::Result<(), String> {
        let val = self.input.trim();
        match self.step {
            Step::LocationName => {
                if val.is_empty() {
                    return Err("Please enter a name for this location".to_string());
                }
                self.location_name = val.to_string();
            }
            Step::Coordinates => {
                let (lat, lng) = parse_coordinates(val)?;
                self.latitude = lat;
                self.longitude = lng;
            }
            Step::Region => self.region = parse_region(val)?,
            Step::TimezoneOffset => {
                self.tz_minutes = parse_tz_offset(val).map_err(|e| e.to_string())?;
            }
            _ => {}
        }
        Ok(())
    }

    fn build_config(&self, existing: &AppConfig) -> AppConfig {
        let mut config = existing.clone();
        let loc = &mut config.location;
        loc.name = self.location_name.clone();
        loc.latitude = self.latitude;
        loc.longitude = self.longitude;
        loc.city = self.region.as_ref().map(|(c, _)| c.clone());
        loc.country = self.region.as_ref().map(|(_, k)| k.clone());
        loc.calc_method = CALC_METHODS[self.method_idx].to_string();
        loc.madhab = MADHABS[self.madhab_idx].to_string();
        loc.timezone_offset = self.tz_minutes;
        loc.hijri_offset = HIJRI_OFFSETS[self.hijri_idx];
        config
    }
}

// ─── Rendering ────────────────────────────────────────────────────────────────

fn centered_box(area: Rect, width: u16, height: u16) -> Rect {
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(height), Constraint::Min(0)])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(width), Constraint::Min(0)])
        .split(v[1])[1]
}

fn draw(frame: &mut Frame, wizard: &mut SetupWizard) {
    let area = frame.area();
    frame.render_widget(Block::default().style(theme::base()), area);

    let box_area = centered_box(area, 66, 26);
    frame.render_widget(Clear, box_area);
    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::gold())
            .style(theme::surface())
            .title(Span::styled(
                "  تِلَاوَة  tilawah · Setup  ",
                theme::gold().add_modifier(Modifier::BOLD),
            ))
            .title_alignment(Alignment::Center),
        box_area,
    );

    let inner = Rect {
        x: box_area.x + 2,
        y: box_area.y + 1,
        width: box_area.width.saturating_sub(4),
        height: box_area.height.saturating_sub(2),
    };
    let content = Rect {
        y: inner.y + 2,
        height: inner.height.saturating_sub(2),
        ..inner
    };

    match wizard.step {
        Step::Welcome => draw_welcome(frame, content),
        Step::CalcMethod => draw_method_list(frame, content, wizard),
        Step::Madhab => draw_choice(
            frame,
            content,
            "Madhab",
            "Affects the Asr time",
            &["Shafi, Maliki, Hanbali (earlier Asr)", "Hanafi (later Asr)"],
            wizard.madhab_idx,
        ),
        Step::HijriOffset => draw_choice(
            frame,
            content,
            "Hijri Date",
            "Adjust for your region's moon sighting",
            &["One day earlier", "As calculated", "One day later"],
            wizard.hijri_idx,
        ),
        Step::Confirm => draw_confirm(frame, content, wizard),
        _ => draw_text_step(frame, content, wizard),
    }

    draw_progress(frame, inner, wizard.step.index(), Step::ORDER.len() - 1);
}

fn draw_progress(frame: &mut Frame, area: Rect, current: usize, total: usize) {
    let mut spans = vec![Span::styled("  ", theme::dim())];
    for i in 1..=total {
        let (dot, style) = if i < current {
            ("● ", theme::green())
        } else if i == current {
            ("◉ ", theme::gold())
        } else {
            ("○ ", theme::dim())
        };
        spans.push(Span::styled(dot, style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), Rect { height: 1, ..area });
}

fn draw_welcome(frame: &mut Frame, area: Rect) {
    let bullet = |text: &'static str| {
        Line::from(vec![Span::styled("  ●  ", theme::gold()), Span::styled(text, theme::dim())])
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "بِسۡمِ ٱللَّهِ ٱلرَّحۡمَٰنِ ٱلرَّحِيمِ",
            theme::gold().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Welcome to tilawah", theme::bold())),
        Line::from(""),
        Line::from(Span::styled(
            "Read and listen to the Quran, with prayer times and reminders.",
            theme::dim(),
        )),
        Line::from(""),
        Line::from(Span::styled("This wizard will configure:", theme::dim())),
        bullet("Your location and how prayer times are looked up"),
        bullet("Calculation method and madhab"),
        bullet("UTC offset and Hijri date adjustment"),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled("Press  Enter  to begin  ·  Esc  to cancel", theme::dim())),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_text_step(frame: &mut Frame, area: Rect, wizard: &SetupWizard) {
    let (title, subtitle, hint) = match wizard.step {
        Step::LocationName => ("Location Name", "Shown in the header", "e.g.  Makkah,  Cairo,  London"),
        Step::Coordinates => (
            "Coordinates",
            "Latitude, longitude in decimal degrees",
            "e.g.  21.4225, 39.8262",
        ),
        Step::Region => (
            "City & Country (optional)",
            "Online lookups by city match local authorities more closely",
            "e.g.  Istanbul, Turkey  ·  blank to use coordinates",
        ),
        Step::TimezoneOffset => ("UTC Offset", "Your offset from UTC", "e.g.  +3  ·  +5:30  ·  -4"),
        _ => ("", "", ""),
    };

    let input_style = if wizard.error.is_some() { theme::red() } else { theme::amber() };
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(title, theme::gold().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(subtitle, theme::dim())),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}█  ", wizard.input),
            input_style.add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.push(match &wizard.error {
        Some(err) => Line::from(Span::styled(format!("✗  {}", err), theme::red())),
        None => Line::from(Span::styled(hint, theme::dim())),
    });
    lines.push(Line::from(""));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Enter  confirm   ·   Esc  back", theme::dim())));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_method_list(frame: &mut Frame, area: Rect, wizard: &mut SetupWizard) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled("Calculation Method", theme::gold().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled("Choose the authority for prayer times", theme::dim())),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(header, Rect { height: 3, ..area });

    let items: Vec<ListItem> = CALC_METHODS
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let (dot, style) = if i == wizard.method_idx {
                ("  ◉  ", theme::gold().add_modifier(Modifier::BOLD))
            } else {
                ("  ○  ", theme::dim())
            };
            ListItem::new(Line::from(vec![Span::styled(dot, style), Span::styled(*m, style)]))
        })
        .collect();
    let list_area = Rect {
        x: area.x + 2,
        y: area.y + 4,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(7),
    };
    frame.render_stateful_widget(List::new(items).style(theme::surface()), list_area, &mut wizard.list_state);

    let footer = Paragraph::new(Span::styled(
        "↑↓  navigate   ·   Enter  select   ·   Esc  back",
        theme::dim(),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(
        footer,
        Rect {
            y: area.y + area.height.saturating_sub(2),
            height: 1,
            ..area
        },
    );
}

fn draw_choice(frame: &mut Frame, area: Rect, title: &str, subtitle: &str, options: &[&str], selected: usize) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(title, theme::gold().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(subtitle, theme::dim())),
        Line::from(""),
    ];
    for (i, opt) in options.iter().enumerate() {
        let (dot, style) = if i == selected {
            ("◉  ", theme::gold().add_modifier(Modifier::BOLD))
        } else {
            ("○  ", theme::dim())
        };
        lines.push(Line::from(vec![Span::styled(dot, style), Span::styled(*opt, style)]));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "←→  choose   ·   Enter  confirm   ·   Esc  back",
        theme::dim(),
    )));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_confirm(frame: &mut Frame, area: Rect, wizard: &SetupWizard) {
    let row = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("  {:<13}", label), theme::dim()),
            Span::styled(value, theme::bold()),
        ])
    };
    let region = wizard
        .region
        .as_ref()
        .map(|(c, k)| format!("{}, {}", c, k))
        .unwrap_or_else(|| "by coordinates".to_string());
    let hijri = match HIJRI_OFFSETS[wizard.hijri_idx] {
        0 => "as calculated".to_string(),
        n => format!("{:+} day", n),
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Confirm Settings", theme::gold().add_modifier(Modifier::BOLD))),
        Line::from(""),
        row("Location", wizard.location_name.clone()),
        row("Coordinates", format!("{:.4}, {:.4}", wizard.latitude, wizard.longitude)),
        row("Lookup", region),
        row("Method", CALC_METHODS[wizard.method_idx].to_string()),
        row("Madhab", MADHABS[wizard.madhab_idx].to_string()),
        row("UTC Offset", format_tz_offset(wizard.tz_minutes)),
        row("Hijri Date", hijri),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            format!("Enter  save & cache {} days   ·   Esc  go back", PRECOMPUTE_DAYS),
            theme::dim(),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn draw_caching(frame: &mut Frame) {
    let area = frame.area();
    frame.render_widget(Block::default().style(theme::base()), area);
    let lines = vec![
        Line::from(Span::styled(
            "Calculating prayer times…",
            theme::gold().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Caching {} days offline so reminders work without a connection.", PRECOMPUTE_DAYS),
            theme::dim(),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        centered_box(area, area.width, 3),
    );
}

// ─── Public entry point ──────────────────────────────────────────────────────

/// Save the wizard's result, drop timings cached under old settings, precompute ahead.
fn apply(conn: &Connection, config: &mut AppConfig, wizard: &SetupWizard) -> Result<()> {
    *config = wizard.build_config(config);
    config.save()?;

    CacheRepo::clear_all(conn)?;
    let provider = TimingsProvider::offline(config.location.clone())?;
    provider.ensure_cached(conn, Local::now().date_naive(), PRECOMPUTE_DAYS)?;

    MetaRepo::set(conn, "setup_done", "1")?;
    info!("Setup complete for {}", config.location.name);
    Ok(())
}

pub fn run_setup_tui(conn: &Connection, config: &mut AppConfig) -> Result<()> {
    theme::set_mode(config.ui.theme);
    let mut wizard = SetupWizard::new(config);
    let mut terminal = ratatui::init();
    let events = EventHandler::new(100);

    let result = loop {
        if let Err(e) = terminal.draw(|frame| draw(frame, &mut wizard)) {
            break Err(e.into());
        }
        match events.next() {
            Ok(Event::Key(key)) => {
                wizard.handle_key(key);
                if wizard.should_quit {
                    break Ok(());
                }
                if wizard.confirmed {
                    if let Err(e) = terminal.draw(draw_caching) {
                        break Err(e.into());
                    }
                    break apply(conn, config, &wizard);
                }
            }
            Ok(Event::Tick | Event::Resize) => {}
            Err(e) => break Err(e.into()),
        }
    };

    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(wizard: &mut SetupWizard, code: KeyCode) {
        wizard.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_line(wizard: &mut SetupWizard, text: &str) {
        wizard.input.clear();
        for c in text.chars() {
            key(wizard, KeyCode::Char(c));
        }
        key(wizard, KeyCode::Enter);
    }

    #[test]
    fn coordinates_are_validated() {
        assert_eq!(parse_coordinates("30.0444, 31.2357").unwrap(), (30.0444, 31.2357));
        assert!(parse_coordinates("91, 0").is_err());
        assert!(parse_coordinates("0, 181").is_err());
        assert!(parse_coordinates("30.0").is_err());
        assert!(parse_coordinates("north, east").is_err());
    }

    #[test]
    fn region_is_optional_but_complete() {
        assert_eq!(parse_region("  ").unwrap(), None);
        assert_eq!(
            parse_region("Istanbul, Turkey").unwrap(),
            Some(("Istanbul".to_string(), "Turkey".to_string()))
        );
        assert!(parse_region("Istanbul").is_err());
        assert!(parse_region(", Turkey").is_err());
    }

    #[test]
    fn walk_through_builds_config() {
        let existing = AppConfig::default();
        let mut wizard = SetupWizard::new(&existing);

        key(&mut wizard, KeyCode::Enter);
        assert_eq!(wizard.step, Step::LocationName);
        type_line(&mut wizard, "Cairo");
        type_line(&mut wizard, "30.0444, 31.2357");
        type_line(&mut wizard, "Cairo, Egypt");

        assert_eq!(wizard.step, Step::CalcMethod);
        let start = wizard.method_idx;
        key(&mut wizard, KeyCode::Down);
        key(&mut wizard, KeyCode::Enter);

        key(&mut wizard, KeyCode::Right);
        key(&mut wizard, KeyCode::Enter);
        type_line(&mut wizard, "+2");
        key(&mut wizard, KeyCode::Left);
        key(&mut wizard, KeyCode::Enter);
        assert_eq!(wizard.step, Step::Confirm);
        key(&mut wizard, KeyCode::Enter);
        assert!(wizard.confirmed);

        let config = wizard.build_config(&existing);
        let loc = &config.location;
        assert_eq!(loc.name, "Cairo");
        assert_eq!((loc.latitude, loc.longitude), (30.0444, 31.2357));
        assert_eq!(loc.city.as_deref(), Some("Cairo"));
        assert_eq!(loc.country.as_deref(), Some("Egypt"));
        assert_eq!(loc.calc_method, CALC_METHODS[(start + 1).min(CALC_METHODS.len() - 1)]);
        assert_eq!(loc.madhab, "Hanafi");
        assert_eq!(loc.timezone_offset, 120);
        assert_eq!(loc.hijri_offset, -1);
    }

    #[test]
    fn bad_input_keeps_step_and_shows_error() {
        let mut wizard = SetupWizard::new(&AppConfig::default());
        key(&mut wizard, KeyCode::Enter);
        key(&mut wizard, KeyCode::Enter);
        assert_eq!(wizard.step, Step::Coordinates);

        type_line(&mut wizard, "200, 0");
        assert_eq!(wizard.step, Step::Coordinates);
        assert!(wizard.error.is_some());

        key(&mut wizard, KeyCode::Esc);
        assert_eq!(wizard.step, Step::LocationName);
        assert_eq!(wizard.input, "Makkah");
    }

    #[test]
    fn esc_on_welcome_quits() {
        let mut wizard = SetupWizard::new(&AppConfig::default());
        key(&mut wizard, KeyCode::Esc);
        assert!(wizard.should_quit);
    }
}
