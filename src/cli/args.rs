use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tilawah", version, author, about = "Read and listen to the Quran, with prayer times and reminders, in your terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// First-run setup wizard (location, calculation method, madhab)
    Setup {
        /// Reset existing configuration
        #[arg(long)]
        reset: bool,
    },
    /// Show prayer times and countdown to the next prayer
    Times(TimesArgs),
    /// Browse, read and play surahs
    Surah {
        #[command(subcommand)]
        action: SurahCommands,
    },
    /// Builtin duas and favorites
    Dua {
        #[command(subcommand)]
        action: DuaCommands,
    },
    /// Per-prayer reminders
    Reminder {
        #[command(subcommand)]
        action: ReminderCommands,
    },
    /// Custom alarms anchored to a prayer
    Alarm {
        #[command(subcommand)]
        action: AlarmCommands,
    },
    /// Run the reminder loop in the foreground
    Watch,
    /// Quran radio stations
    Radio {
        #[command(subcommand)]
        action: RadioCommands,
    },
    /// Saved locations
    Location {
        #[command(subcommand)]
        action: LocationCommands,
    },
    /// Recent surah searches
    History {
        /// Forget all searches
        #[arg(long)]
        clear: bool,
    },
    /// Switch the TUI theme (no argument toggles)
    Theme {
        #[arg(value_parser = ["dark", "light"])]
        mode: Option<String>,
    },
    /// Show the last-read position
    Bookmark,
    /// List available reciters
    Reciters,
}

#[derive(Args, Debug)]
pub struct TimesArgs {
    /// Date to show (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Look up by city instead of the configured coordinates (needs the network)
    #[arg(long, requires = "country", conflicts_with = "offline")]
    pub city: Option<String>,
    #[arg(long, requires = "city")]
    pub country: Option<String>,
    /// Skip the network and use the local calculator
    #[arg(long)]
    pub offline: bool,
}

#[derive(Subcommand, Debug)]
pub enum SurahCommands {
    /// List all 114 surahs
    List {
        #[arg(long, conflicts_with = "medinan")]
        meccan: bool,
        #[arg(long)]
        medinan: bool,
    },
    /// Search by number, English name, translation or Arabic name
    Search {
        query: String,
    },
    /// Print a surah with translation
    Read {
        number: u16,
        /// First ayah to show
        #[arg(long)]
        from: Option<u16>,
        /// Last ayah to show
        #[arg(long)]
        to: Option<u16>,
        /// Translation edition (e.g. en.sahih)
        #[arg(long)]
        translation: Option<String>,
    },
    /// Recite a surah, or a single ayah, through the audio player
    Play {
        number: u16,
        #[arg(long)]
        ayah: Option<u16>,
    },
}

#[derive(Subcommand, Debug)]
pub enum DuaCommands {
    /// List categories with their dua counts
    Categories,
    /// List duas
    List {
        #[arg(long)]
        category: Option<String>,
        /// Only favorites
        #[arg(long)]
        favorites: bool,
    },
    /// Show one dua in full
    Show { id: u32 },
    /// Toggle a dua as favorite
    Fav { id: u32 },
}

#[derive(Subcommand, Debug)]
pub enum ReminderCommands {
    /// Show reminders for each prayer
    List,
    /// Set how many minutes before a prayer to remind
    Set {
        /// Prayer name (fajr, zuhr, asr, maghrib, isha)
        prayer: String,
        minutes: u32,
        /// adhan, beep, chime or silent
        #[arg(long)]
        sound: Option<String>,
    },
    Enable { prayer: String },
    Disable { prayer: String },
}

#[derive(Subcommand, Debug)]
pub enum AlarmCommands {
    List,
    /// Add an alarm relative to a prayer
    Add {
        label: String,
        /// Anchor prayer (sunrise allowed)
        #[arg(long)]
        prayer: String,
        /// Minutes after the prayer; negative for before
        #[arg(long, allow_hyphen_values = true, default_value_t = 0)]
        offset: i32,
        #[arg(long, default_value = "beep")]
        sound: String,
    },
    Remove { id: i64 },
    /// Enable or disable an alarm
    Toggle { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum RadioCommands {
    List,
    /// Stream a station until Ctrl-C
    Play { id: u32 },
}

#[derive(Subcommand, Debug)]
pub enum LocationCommands {
    List,
    /// Save the current location under a name
    Save { name: String },
    /// Switch to a saved location
    Use { name: String },
    Remove { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_lookup_cannot_be_offline() {
        let err = Cli::try_parse_from(["tilawah", "times", "--city", "Tokyo", "--country", "Japan", "--offline"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);

        let cli = Cli::try_parse_from(["tilawah", "times", "--city", "Tokyo", "--country", "Japan"]).unwrap();
        match cli.command {
            Some(Commands::Times(args)) => {
                assert_eq!(args.city.as_deref(), Some("Tokyo"));
                assert!(!args.offline);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn negative_alarm_offset_parses() {
        let cli = Cli::try_parse_from(["tilawah", "alarm", "add", "Tahajjud", "--prayer", "fajr", "--offset", "-60"])
            .unwrap();
        match cli.command {
            Some(Commands::Alarm { action: AlarmCommands::Add { offset, .. } }) => assert_eq!(offset, -60),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
