use anyhow::{Context, Result};
use log::{debug, info};
use std::process::{Child, Command, Stdio};

use crate::config::settings::AudioConfig;

/// Drives an external command-line player; at most one stream plays at a time.
pub struct AudioPlayer {
    command: String,
    args: Vec<String>,
    child: Option<Child>,
    now_playing: Option<String>,
}

impl AudioPlayer {
    pub fn new(command: &str, args: &[String]) -> Self {
        Self {
            command: command.to_string(),
            args: args.to_vec(),
            child: None,
            now_playing: None,
        }
    }

    pub fn from_config(audio: &AudioConfig) -> Self {
        Self::new(&audio.player, &audio.player_args)
    }

    /// Stop whatever is playing, then start `source` (URL or file path).
    pub fn play(&mut self, source: &str, title: &str) -> Result<()> {
        self.stop()?;
        debug!("Spawning {} {:?} {}", self.command, self.args, source);
        let child = Command::new(&self.command)
            .args(&self.args)
            .arg(source)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| {
                format!(
                    "Could not start audio player '{}'. Install it or set [audio] player in config.toml",
                    self.command
                )
            })?;
        info!("Playing {}", title);
        self.child = Some(child);
        self.now_playing = Some(title.to_string());
        Ok(())
    }

    pub fn stop(&mut self) -> Result<()> {
        if let Some(mut child) = self.child.take() {
            // Already exited is fine
            let _ = child.kill();
            child.wait().context("Waiting for audio player to exit")?;
        }
        self.now_playing = None;
        Ok(())
    }

    /// Reaps a finished player so `now_playing` stays accurate.
    pub fn is_playing(&mut self) -> bool {
        let finished = match self.child.as_mut() {
            None => return false,
            Some(child) => !matches!(child.try_wait(), Ok(None)),
        };
        if finished {
            self.child = None;
            self.now_playing = None;
        }
        !finished
    }

    pub fn now_playing(&self) -> Option<&str> {
        self.now_playing.as_deref()
    }

    /// Block until the current stream ends (CLI playback).
    pub fn wait(&mut self) -> Result<()> {
        if let Some(mut child) = self.child.take() {
            child.wait().context("Waiting for audio player")?;
        }
        self.now_playing = None;
        Ok(())
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_reported() {
        let mut player = AudioPlayer::new("definitely-not-a-player-binary", &[]);
        let err = player.play("x.mp3", "Test").unwrap_err();
        assert!(err.to_string().contains("definitely-not-a-player-binary"));
        assert!(!player.is_playing());
        assert!(player.now_playing().is_none());
    }

    #[test]
    fn play_replaces_and_stop_clears() {
        let mut player = AudioPlayer::new("sleep", &[]);
        player.play("5", "First").unwrap();
        player.play("5", "Second").unwrap();
        assert_eq!(player.now_playing(), Some("Second"));
        assert!(player.is_playing());

        player.stop().unwrap();
        assert!(!player.is_playing());
        assert!(player.now_playing().is_none());
    }

    #[test]
    fn finished_child_is_reaped() {
        let mut player = AudioPlayer::new("true", &[]);
        player.play("ignored", "Short").unwrap();
        player.wait().unwrap();
        assert!(!player.is_playing());
    }
}
