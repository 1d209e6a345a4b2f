use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use log::{info, warn};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, ListState, Paragraph},
    Frame,
};
use rusqlite::Connection;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::api::alquran::{self, AlQuranApi};
use crate::api::{radio, HttpClient};
use crate::audio::AudioPlayer;
use crate::config::AppConfig;
use crate::data::{duas, surahs};
use crate::db::repository::{BookmarkRepo, FavoriteRepo, HistoryRepo, ReminderRepo};
use crate::models::{
    Dua, DuaCategory, PrayerTimings, PrayerType, RadioStation, Reminder, RevelationType, Surah,
    SurahText,
};
use crate::prayer_times::TimingsProvider;
use crate::reminders::{load_triggers, ReminderScheduler, SoundCue};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{
    duas as duas_widget, header, next_prayer, prayers, radio as radio_widget, reader, statusbar,
    surahs as surahs_widget, upcoming,
};
use crate::utils::hijri::{hijri_label, to_hijri};

const BANNER_TTL: Duration = Duration::from_secs(12);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Dashboard,
    Surahs,
    Reader,
    Duas,
    Radio,
}

impl View {
    fn next(self) -> Self {
        match self {
            View::Dashboard => View::Surahs,
            View::Surahs | View::Reader => View::Duas,
            View::Duas => View::Radio,
            View::Radio => View::Dashboard,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BannerKind {
    Reminder,
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
    shown_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurahFilter {
    All,
    Meccan,
    Medinan,
}

pub struct App {
    pub view: View,
    pub config: AppConfig,
    config_path: Option<PathBuf>,
    pub should_quit: bool,
    pub show_help: bool,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub banner: Option<Banner>,

    provider: TimingsProvider,
    client: Option<HttpClient>,
    scheduler: ReminderScheduler,
    cue: SoundCue,
    player: AudioPlayer,

    // Dashboard
    pub today: NaiveDate,
    pub hijri_str: String,
    pub ramadan: bool,
    pub timings: Option<PrayerTimings>,
    pub reminders: Vec<Reminder>,
    pub next_prayer_info: Option<(PrayerType, i64)>,

    // Surahs + reader
    pub surah_filter: SurahFilter,
    pub surah_query: String,
    pub surah_results: Vec<&'static Surah>,
    pub surah_state: ListState,
    pub reading: Option<(&'static Surah, SurahText)>,
    pub reader_cursor: usize,

    // Duas
    pub dua_tab: usize,
    pub favorites: Vec<u32>,
    pub dua_state: ListState,

    // Radio
    pub stations: Vec<RadioStation>,
    pub radio_state: ListState,
    pub playing_station: Option<u32>,
}

impl App {
    pub fn new(config: AppConfig, config_path: Option<PathBuf>) -> Result<Self> {
        theme::set_mode(config.ui.theme);
        let provider = TimingsProvider::from_config(&config)?;
        let client = if config.api.online {
            match HttpClient::from_config(&config.api) {
                Ok(c) => Some(c),
                Err(e) => {
                    warn!("HTTP client unavailable, staying offline: {}", e);
                    None
                }
            }
        } else {
            None
        };
        let today = Local::now().date_naive();

        Ok(App {
            view: View::Dashboard,
            config_path,
            should_quit: false,
            show_help: false,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            banner: None,
            provider,
            client,
            scheduler: ReminderScheduler::new(config.reminders.window_secs),
            cue: SoundCue::from_config(&config),
            player: AudioPlayer::from_config(&config.audio),
            today,
            hijri_str: String::new(),
            ramadan: false,
            timings: None,
            reminders: Vec::new(),
            next_prayer_info: None,
            surah_filter: SurahFilter::All,
            surah_query: String::new(),
            surah_results: surahs::SURAHS.iter().collect(),
            surah_state: ListState::default().with_selected(Some(0)),
            reading: None,
            reader_cursor: 0,
            dua_tab: 0,
            favorites: Vec::new(),
            dua_state: ListState::default().with_selected(Some(0)),
            stations: Vec::new(),
            radio_state: ListState::default().with_selected(Some(0)),
            playing_station: None,
            config,
        })
    }

    pub fn load(&mut self, conn: &Connection) -> Result<()> {
        let now = Local::now().naive_local();
        self.today = now.date();
        let timings = self.provider.timings(conn, self.today)?;
        self.hijri_str = hijri_label(
            self.today,
            self.config.location.hijri_offset,
            timings.hijri.as_deref(),
        );
        self.ramadan = to_hijri(self.today, self.config.location.hijri_offset)
            .map(|h| h.is_ramadan())
            .unwrap_or(false);
        self.timings = Some(timings);
        self.reminders = ReminderRepo::list(conn)?;
        self.favorites = FavoriteRepo::list(conn)?;
        self.next_prayer_info = self.provider.next_prayer(conn, now).ok();
        Ok(())
    }

    pub fn tick(&mut self, conn: &Connection) {
        let now = Local::now().naive_local();
        self.tick_at(conn, now);
    }

    fn tick_at(&mut self, conn: &Connection, now: NaiveDateTime) {
        if now.date() != self.today {
            if let Err(e) = self.load(conn) {
                self.show_error(format!("Could not refresh prayer times: {:#}", e));
            }
        }
        self.next_prayer_info = self.provider.next_prayer(conn, now).ok();

        if self.scheduler.needs_refresh(now) {
            let provider = &self.provider;
            if let Err(e) = self.scheduler.refresh(now, |d| load_triggers(conn, provider, d)) {
                warn!("Reminder schedule not rebuilt: {:#}", e);
            }
        }
        for trigger in self.scheduler.poll(now) {
            info!("Reminder fired: {}", trigger.label);
            self.banner = Some(Banner {
                kind: BannerKind::Reminder,
                text: format!("🔔 {}  ·  {}", trigger.label, trigger.at.format("%H:%M")),
                shown_at: Instant::now(),
            });
            self.cue.play(trigger.sound, &trigger.label);
        }

        if let Some(b) = &self.banner {
            if b.kind != BannerKind::Reminder && b.shown_at.elapsed() > BANNER_TTL {
                self.banner = None;
            }
        }
        if self.playing_station.is_some() && !self.player.is_playing() {
            self.playing_station = None;
        }
    }

    fn show_error(&mut self, text: String) {
        warn!("{}", text);
        self.banner = Some(Banner {
            kind: BannerKind::Error,
            text,
            shown_at: Instant::now(),
        });
    }

    fn show_info(&mut self, text: String) {
        self.banner = Some(Banner {
            kind: BannerKind::Info,
            text,
            shown_at: Instant::now(),
        });
    }

    // ─── Keys ────────────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent, conn: &Connection) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.input_mode == InputMode::Search {
            self.handle_search_input(key, conn);
            return;
        }
        // Any key acknowledges a reminder banner
        if matches!(&self.banner, Some(b) if b.kind == BannerKind::Reminder) {
            self.banner = None;
            self.cue.stop();
        }
        if self.show_help {
            self.show_help = false;
            return;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                return;
            }
            KeyCode::Char('t') => {
                self.toggle_theme();
                return;
            }
            KeyCode::Tab => {
                self.switch_view(self.view.next(), conn);
                return;
            }
            KeyCode::Char(c @ '1'..='4') => {
                let view = match c {
                    '1' => View::Dashboard,
                    '2' => View::Surahs,
                    '3' => View::Duas,
                    _ => View::Radio,
                };
                self.switch_view(view, conn);
                return;
            }
            _ => {}
        }

        match self.view {
            View::Dashboard => self.handle_dashboard_key(key, conn),
            View::Surahs => self.handle_surahs_key(key, conn),
            View::Reader => self.handle_reader_key(key, conn),
            View::Duas => self.handle_duas_key(key, conn),
            View::Radio => self.handle_radio_key(key),
        }
    }

    fn switch_view(&mut self, view: View, conn: &Connection) {
        if self.view == View::Reader && view != View::Reader {
            self.save_bookmark(conn);
        }
        if view == View::Radio && self.stations.is_empty() {
            self.stations = radio::stations(self.client.as_ref(), &self.config.api.radio_url);
        }
        self.view = view;
    }

    fn toggle_theme(&mut self) {
        self.config.ui.theme = self.config.ui.theme.toggled();
        theme::set_mode(self.config.ui.theme);
        if let Some(path) = &self.config_path {
            if let Err(e) = self.config.save_to(path) {
                self.show_error(format!("Theme not saved: {:#}", e));
            }
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent, conn: &Connection) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('b') => match BookmarkRepo::get(conn) {
                Ok(Some(b)) => self.open_reader(conn, b.surah, Some(b.ayah)),
                Ok(None) => self.show_info("No bookmark yet. Open a surah from the Surahs view.".into()),
                Err(e) => self.show_error(format!("{:#}", e)),
            },
            KeyCode::Char('r') => {
                if let Err(e) = self.load(conn) {
                    self.show_error(format!("Could not refresh prayer times: {:#}", e));
                }
                self.scheduler.invalidate();
            }
            _ => {}
        }
    }

    fn handle_surahs_key(&mut self, key: KeyEvent, conn: &Connection) {
        match key.code {
            KeyCode::Esc => {
                if self.surah_query.is_empty() {
                    self.view = View::Dashboard;
                } else {
                    self.surah_query.clear();
                    self.apply_surah_filter();
                }
            }
            KeyCode::Up | KeyCode::Char('k') => select_prev(&mut self.surah_state),
            KeyCode::Down | KeyCode::Char('j') => {
                select_next(&mut self.surah_state, self.surah_results.len())
            }
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Search;
                self.input_buffer = self.surah_query.clone();
            }
            KeyCode::Char('f') => {
                self.surah_filter = match self.surah_filter {
                    SurahFilter::All => SurahFilter::Meccan,
                    SurahFilter::Meccan => SurahFilter::Medinan,
                    SurahFilter::Medinan => SurahFilter::All,
                };
                self.apply_surah_filter();
            }
            KeyCode::Enter => {
                let selected = self
                    .surah_state
                    .selected()
                    .and_then(|i| self.surah_results.get(i))
                    .map(|s| s.number);
                if let Some(number) = selected {
                    self.open_reader(conn, number, None);
                }
            }
            _ => {}
        }
    }

    fn handle_search_input(&mut self, key: KeyEvent, conn: &Connection) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                self.surah_query = self.input_buffer.trim().to_string();
                if !self.surah_query.is_empty() {
                    if let Err(e) = HistoryRepo::record(conn, &self.surah_query) {
                        warn!("Search not recorded: {:#}", e);
                    }
                }
                self.apply_surah_filter();
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Char(c) => self.input_buffer.push(c),
            _ => {}
        }
    }

    pub fn apply_surah_filter(&mut self) {
        let base: Vec<&'static Surah> = if self.surah_query.is_empty() {
            surahs::SURAHS.iter().collect()
        } else {
            surahs::search(&self.surah_query)
        };
        self.surah_results = base
            .into_iter()
            .filter(|s| match self.surah_filter {
                SurahFilter::All => true,
                SurahFilter::Meccan => s.revelation == RevelationType::Meccan,
                SurahFilter::Medinan => s.revelation == RevelationType::Medinan,
            })
            .collect();
        self.surah_state
            .select(if self.surah_results.is_empty() { None } else { Some(0) });
    }

    /// Load a surah into the reader; on failure the current view is kept.
    fn open_reader(&mut self, conn: &Connection, number: u16, ayah: Option<u16>) {
        let Some(surah) = surahs::surah(number) else {
            self.show_error(format!("No surah {}", number));
            return;
        };
        let api = self
            .client
            .as_ref()
            .map(|c| AlQuranApi::new(c, &self.config.api.quran_url));
        match alquran::load_surah(conn, api.as_ref(), number, &self.config.quran.translation) {
            Ok(text) => {
                self.reader_cursor = ayah
                    .and_then(|a| text.ayahs.iter().position(|x| x.number_in_surah == a))
                    .unwrap_or(0);
                self.reading = Some((surah, text));
                self.view = View::Reader;
            }
            Err(e) => self.show_error(format!("{:#}", e)),
        }
    }

    fn save_bookmark(&mut self, conn: &Connection) {
        let pos = self
            .reading
            .as_ref()
            .and_then(|(s, t)| t.ayahs.get(self.reader_cursor).map(|a| (s.number, a.number_in_surah)));
        if let Some((surah, ayah)) = pos {
            if let Err(e) = BookmarkRepo::set(conn, surah, ayah) {
                warn!("Bookmark not saved: {:#}", e);
            }
        }
    }

    fn handle_reader_key(&mut self, key: KeyEvent, conn: &Connection) {
        let len = self.reading.as_ref().map(|(_, t)| t.ayahs.len()).unwrap_or(0);
        match key.code {
            KeyCode::Esc => {
                self.save_bookmark(conn);
                self.view = View::Surahs;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.reader_cursor = self.reader_cursor.saturating_sub(1)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.reader_cursor + 1 < len {
                    self.reader_cursor += 1;
                }
            }
            KeyCode::PageUp => self.reader_cursor = self.reader_cursor.saturating_sub(10),
            KeyCode::PageDown => self.reader_cursor = (self.reader_cursor + 10).min(len.saturating_sub(1)),
            KeyCode::Char('p') => self.play_reading(false),
            KeyCode::Char('a') => self.play_reading(true),
            KeyCode::Char('x') => self.stop_audio(),
            _ => {}
        }
    }

    /// Whole surah, or only the ayah under the cursor.
    fn play_reading(&mut self, single_ayah: bool) {
        let Some((surah, text)) = &self.reading else {
            return;
        };
        let q = &self.config.quran;
        let cdn = &self.config.api.audio_cdn_url;
        let (url, title) = match text.ayahs.get(self.reader_cursor) {
            Some(a) if single_ayah => (
                alquran::ayah_audio_url(cdn, &q.reciter, a.number_global, q.bitrate),
                format!("{} {}:{}", surah.name_en, surah.number, a.number_in_surah),
            ),
            _ => (
                alquran::surah_audio_url(cdn, &q.reciter, surah.number, q.bitrate),
                surah.name_en.to_string(),
            ),
        };
        self.playing_station = None;
        if let Err(e) = self.player.play(&url, &title) {
            self.show_error(format!("{:#}", e));
        }
    }

    fn stop_audio(&mut self) {
        if let Err(e) = self.player.stop() {
            self.show_error(format!("{:#}", e));
        }
        self.playing_station = None;
    }

    // ─── Duas ────────────────────────────────────────────────────────────────

    /// Category tabs, with Favorites last.
    pub fn dua_tabs() -> Vec<Option<DuaCategory>> {
        DuaCategory::all()
            .into_iter()
            .map(Some)
            .chain(std::iter::once(None))
            .collect()
    }

    pub fn visible_duas(&self) -> Vec<&'static Dua> {
        match Self::dua_tabs().get(self.dua_tab).copied().flatten() {
            Some(category) => duas::by_category(category),
            None => duas::DUAS
                .iter()
                .filter(|d| self.favorites.contains(&d.id))
                .collect(),
        }
    }

    fn handle_duas_key(&mut self, key: KeyEvent, conn: &Connection) {
        let tab_count = Self::dua_tabs().len();
        match key.code {
            KeyCode::Esc => self.view = View::Dashboard,
            KeyCode::Left | KeyCode::Char('h') => {
                self.dua_tab = (self.dua_tab + tab_count - 1) % tab_count;
                self.dua_state.select(Some(0));
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.dua_tab = (self.dua_tab + 1) % tab_count;
                self.dua_state.select(Some(0));
            }
            KeyCode::Up | KeyCode::Char('k') => select_prev(&mut self.dua_state),
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.visible_duas().len();
                select_next(&mut self.dua_state, len);
            }
            KeyCode::Char('f') => {
                let selected = self
                    .dua_state
                    .selected()
                    .and_then(|i| self.visible_duas().get(i).map(|d| d.id));
                if let Some(id) = selected {
                    match FavoriteRepo::toggle(conn, id).and_then(|_| FavoriteRepo::list(conn)) {
                        Ok(favs) => self.favorites = favs,
                        Err(e) => self.show_error(format!("{:#}", e)),
                    }
                    let len = self.visible_duas().len();
                    if self.dua_state.selected().is_some_and(|i| i >= len) {
                        self.dua_state.select(len.checked_sub(1));
                    }
                }
            }
            _ => {}
        }
    }

    // ─── Radio ───────────────────────────────────────────────────────────────

    fn handle_radio_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.view = View::Dashboard,
            KeyCode::Up | KeyCode::Char('k') => select_prev(&mut self.radio_state),
            KeyCode::Down | KeyCode::Char('j') => select_next(&mut self.radio_state, self.stations.len()),
            KeyCode::Enter => {
                let station = self
                    .radio_state
                    .selected()
                    .and_then(|i| self.stations.get(i))
                    .cloned();
                if let Some(s) = station {
                    match self.player.play(&s.url, &s.name) {
                        Ok(()) => self.playing_station = Some(s.id),
                        Err(e) => self.show_error(format!("{:#}", e)),
                    }
                }
            }
            KeyCode::Char('x') => self.stop_audio(),
            _ => {}
        }
    }

    // ─── Drawing ─────────────────────────────────────────────────────────────

    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Length(if self.banner.is_some() { 1 } else { 0 }),
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(frame, chunks[0], &self.config.location.name, &self.hijri_str, self.ramadan);
        self.draw_banner(frame, chunks[1]);

        let hints: &[(&str, &str)] = match self.view {
            View::Dashboard => &[("[b]", " resume reading  "), ("[r]", " refresh  ")],
            View::Surahs => &[("[/]", " search  "), ("[f]", " filter  "), ("[Enter]", " read  ")],
            View::Reader => &[("[p]", " play surah  "), ("[a]", " play ayah  "), ("[x]", " stop  ")],
            View::Duas => &[("[← →]", " category  "), ("[f]", " favorite  ")],
            View::Radio => &[("[Enter]", " play  "), ("[x]", " stop  ")],
        };
        statusbar::render(frame, chunks[3], hints, self.player.now_playing());

        let body = chunks[2];
        match self.view {
            View::Dashboard => self.draw_dashboard(frame, body),
            View::Surahs => {
                let label = match (&self.surah_filter, self.surah_query.is_empty()) {
                    (SurahFilter::All, true) => "all".to_string(),
                    (f, true) => format!("{:?}", f).to_lowercase(),
                    (f, false) => format!("{:?} · \"{}\"", f, self.surah_query).to_lowercase(),
                };
                surahs_widget::render(frame, body, &self.surah_results, &mut self.surah_state, &label);
            }
            View::Reader => match &self.reading {
                Some((surah, text)) => reader::render(frame, body, surah, text, self.reader_cursor),
                None => self.view = View::Surahs,
            },
            View::Duas => {
                let tabs: Vec<String> = Self::dua_tabs()
                    .into_iter()
                    .map(|t| match t {
                        Some(c) => c.display_name().to_string(),
                        None => "★ Favorites".to_string(),
                    })
                    .collect();
                let visible = self.visible_duas();
                duas_widget::render(frame, body, &tabs, self.dua_tab, &visible, &self.favorites, &mut self.dua_state);
            }
            View::Radio => {
                radio_widget::render(frame, body, &self.stations, self.playing_station, &mut self.radio_state)
            }
        }

        if self.input_mode == InputMode::Search {
            self.draw_search_input(frame);
        }
        if self.show_help {
            self.draw_help_overlay(frame);
        }
    }

    fn draw_banner(&self, frame: &mut Frame, area: Rect) {
        let Some(banner) = &self.banner else {
            return;
        };
        let style = match banner.kind {
            BannerKind::Reminder => theme::gold().add_modifier(Modifier::BOLD | Modifier::REVERSED),
            BannerKind::Info => theme::green(),
            BannerKind::Error => theme::red().add_modifier(Modifier::BOLD),
        };
        let prefix = if banner.kind == BannerKind::Error { " ✗ " } else { " " };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(format!("{}{}", prefix, banner.text), style))),
            area,
        );
    }

    fn draw_dashboard(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        let now = Local::now().naive_local();
        prayers::render(
            frame,
            columns[0],
            self.timings.as_ref(),
            &self.reminders,
            self.next_prayer_info.map(|(p, _)| p),
            now,
        );

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Min(0)])
            .split(columns[1]);
        next_prayer::render(frame, right[0], self.next_prayer_info.as_ref());
        upcoming::render(frame, right[1], &self.scheduler.upcoming(now, 6));
    }

    fn draw_search_input(&self, frame: &mut Frame) {
        let area = frame.area();
        let popup_area = Rect {
            x: area.width / 4,
            y: (area.height / 2).saturating_sub(2),
            width: area.width / 2,
            height: 4,
        };
        frame.render_widget(Clear, popup_area);

        let text = vec![
            Line::from(vec![
                Span::styled("  Surah: ", theme::dim()),
                Span::styled(self.input_buffer.as_str(), theme::gold().add_modifier(Modifier::BOLD)),
                Span::styled("█", theme::amber()),
            ]),
            Line::from(Span::styled("  Name, meaning, number or Arabic  ·  [Esc] cancel", theme::dim())),
        ];
        let block = Block::default()
            .title(Span::styled(" Search ", theme::gold()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::amber())
            .style(theme::surface());
        frame.render_widget(Paragraph::new(text).block(block), popup_area);
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();
        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 6,
            width: area.width / 2,
            height: (area.height * 2 / 3).min(22),
        };
        frame.render_widget(Clear, popup_area);

        let rows = [
            ("[Tab] / [1-4]", "Switch view"),
            ("[↑ ↓] / [j k]", "Move selection"),
            ("[/]", "Search surahs"),
            ("[f]", "Filter surahs · favorite dua"),
            ("[Enter]", "Open surah · play station"),
            ("[p] / [a]", "Play surah · play ayah"),
            ("[x]", "Stop audio"),
            ("[b]", "Resume from bookmark"),
            ("[t]", "Toggle dark/light theme"),
            ("[Esc]", "Back"),
            ("[q]", "Quit"),
        ];
        let mut help_text = vec![
            Line::from(Span::styled("  Keybindings", theme::gold().add_modifier(Modifier::BOLD))),
            Line::from(""),
        ];
        for (key, what) in rows {
            help_text.push(Line::from(vec![
                Span::styled(format!("  {:<16}", key), theme::gold()),
                Span::styled(what, theme::dim()),
            ]));
        }

        let block = Block::default()
            .title(Span::styled(" Help ", theme::gold()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::gold())
            .style(theme::surface());
        frame.render_widget(Paragraph::new(help_text).block(block), popup_area);
    }
}

fn select_prev(state: &mut ListState) {
    let i = state.selected().unwrap_or(0);
    state.select(Some(i.saturating_sub(1)));
}

fn select_next(state: &mut ListState, len: usize) {
    if len == 0 {
        state.select(None);
        return;
    }
    let i = state.selected().map(|i| i + 1).unwrap_or(0);
    state.select(Some(i.min(len - 1)));
}

/// Run the TUI event loop.
pub fn run(conn: Connection, config: AppConfig) -> Result<()> {
    let config_path = AppConfig::config_path().ok();
    let mut app = App::new(config, config_path)?;
    app.load(&conn)?;

    let mut terminal = ratatui::init();
    let events = EventHandler::new(app.config.reminders.poll_interval().as_millis() as u64);

    let result = loop {
        if let Err(e) = terminal.draw(|frame| app.draw(frame)) {
            break Err(e.into());
        }
        match events.next() {
            Ok(Event::Key(key)) => {
                app.handle_key(key, &conn);
                if app.should_quit {
                    break Ok(());
                }
            }
            Ok(Event::Tick) => app.tick(&conn),
            Ok(Event::Resize) => {}
            Err(e) => break Err(e.into()),
        }
    };

    if app.view == View::Reader {
        app.save_bookmark(&conn);
    }
    app.stop_audio();
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crossterm::event::KeyModifiers;

    fn setup() -> (App, Connection) {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let mut config = AppConfig::default();
        config.api.online = false;
        let mut app = App::new(config, None).unwrap();
        app.load(&conn).unwrap();
        (app, conn)
    }

    fn press(app: &mut App, conn: &Connection, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), conn);
    }

    fn type_str(app: &mut App, conn: &Connection, s: &str) {
        for c in s.chars() {
            press(app, conn, KeyCode::Char(c));
        }
    }

    #[test]
    fn load_fills_dashboard() {
        let (app, _conn) = setup();
        assert!(app.timings.is_some());
        assert_eq!(app.reminders.len(), 5);
        assert!(app.next_prayer_info.is_some());
        assert!(app.hijri_str.ends_with("AH"));
    }

    #[test]
    fn search_filters_and_records_history() {
        let (mut app, conn) = setup();
        press(&mut app, &conn, KeyCode::Char('2'));
        assert_eq!(app.view, View::Surahs);

        press(&mut app, &conn, KeyCode::Char('/'));
        type_str(&mut app, &conn, "yaseen");
        press(&mut app, &conn, KeyCode::Enter);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.surah_results.iter().map(|s| s.number).collect::<Vec<_>>(), vec![36]);
        assert_eq!(HistoryRepo::recent(&conn, 5).unwrap(), vec!["yaseen".to_string()]);

        // Esc clears the query before leaving the view
        press(&mut app, &conn, KeyCode::Esc);
        assert_eq!(app.surah_results.len(), 114);
        assert_eq!(app.view, View::Surahs);
    }

    #[test]
    fn dua_list_navigation_stays_in_bounds() {
        let (mut app, conn) = setup();
        press(&mut app, &conn, KeyCode::Char('3'));
        assert_eq!(app.view, View::Duas);

        let len = app.visible_duas().len();
        for _ in 0..len + 3 {
            press(&mut app, &conn, KeyCode::Down);
        }
        assert_eq!(app.dua_state.selected(), Some(len - 1));
        press(&mut app, &conn, KeyCode::Up);
        assert_eq!(app.dua_state.selected(), Some(len.saturating_sub(2)));
    }

    #[test]
    fn revelation_filter_cycles() {
        let (mut app, conn) = setup();
        app.view = View::Surahs;
        press(&mut app, &conn, KeyCode::Char('f'));
        assert_eq!(app.surah_results.len(), 86);
        press(&mut app, &conn, KeyCode::Char('f'));
        assert_eq!(app.surah_results.len(), 28);
        press(&mut app, &conn, KeyCode::Char('f'));
        assert_eq!(app.surah_results.len(), 114);
    }

    #[test]
    fn failed_open_keeps_view_and_shows_error() {
        let (mut app, conn) = setup();
        app.view = View::Surahs;
        press(&mut app, &conn, KeyCode::Enter);
        assert_eq!(app.view, View::Surahs);
        assert!(app.reading.is_none());
        assert!(matches!(&app.banner, Some(b) if b.kind == BannerKind::Error));
    }

    #[test]
    fn theme_toggle_flips_config() {
        let (mut app, conn) = setup();
        let before = app.config.ui.theme;
        press(&mut app, &conn, KeyCode::Char('t'));
        assert_eq!(app.config.ui.theme, before.toggled());
    }

    #[test]
    fn theme_toggle_persists_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let mut config = AppConfig::default();
        config.api.online = false;
        let mut app = App::new(config, Some(path.clone())).unwrap();

        press(&mut app, &conn, KeyCode::Char('t'));
        let saved = AppConfig::load_from(&path).unwrap();
        assert_eq!(saved.ui.theme, app.config.ui.theme);
    }

    #[test]
    fn favorite_toggle_shows_in_favorites_tab() {
        let (mut app, conn) = setup();
        press(&mut app, &conn, KeyCode::Char('3'));
        assert_eq!(app.view, View::Duas);

        let first = app.visible_duas()[0].id;
        press(&mut app, &conn, KeyCode::Char('f'));
        assert_eq!(app.favorites, vec![first]);

        // Favorites is the last tab
        press(&mut app, &conn, KeyCode::Left);
        assert_eq!(app.dua_tab, App::dua_tabs().len() - 1);
        assert_eq!(app.visible_duas().iter().map(|d| d.id).collect::<Vec<_>>(), vec![first]);

        press(&mut app, &conn, KeyCode::Char('f'));
        assert!(app.favorites.is_empty());
        assert!(app.visible_duas().is_empty());
        assert_eq!(app.dua_state.selected(), None);
    }

    #[test]
    fn radio_view_uses_builtin_stations_offline() {
        let (mut app, conn) = setup();
        press(&mut app, &conn, KeyCode::Char('4'));
        assert_eq!(app.view, View::Radio);
        assert!(!app.stations.is_empty());
    }

    #[test]
    fn reminder_banner_fires_on_tick_and_clears_on_key() {
        let (mut app, conn) = setup();
        let timings = app.timings.clone().unwrap();
        let at = timings.date.and_time(timings.zuhr) - chrono::Duration::minutes(10);

        app.tick_at(&conn, at - chrono::Duration::minutes(1));
        assert!(app.banner.is_none());
        app.tick_at(&conn, at);
        assert!(matches!(&app.banner, Some(b) if b.kind == BannerKind::Reminder));
        assert!(app.banner.as_ref().unwrap().text.contains("Zuhr"));

        press(&mut app, &conn, KeyCode::Char('j'));
        assert!(app.banner.is_none());
    }
}
