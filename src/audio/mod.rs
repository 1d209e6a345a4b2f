pub mod player;

pub use player::AudioPlayer;
