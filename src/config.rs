//! Game tuning and launch settings, loaded from an optional JSON file.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "FLAPPY_WUKONG_CONFIG";
/// Config file looked up in the working directory when the variable is unset.
pub const DEFAULT_CONFIG_FILE: &str = "flappy-wukong.json";

/// Which flavour of the game to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Fixed 400x600 window, play starts immediately.
    Desktop,
    /// Full-screen, waits on a Start button.
    Mobile,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Fixed horizontal position of the monkey's left edge.
    pub x: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            x: 100.0,
            width: 70.0,
            height: 70.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration in units/s².
    pub gravity: f64,
    /// Velocity set by a jump, in units/s.
    pub jump_velocity: f64,
    /// Zero the velocity when the monkey is pinned to the floor.
    /// Off by default: a grounded monkey keeps accumulating downward velocity.
    pub floor_resets_velocity: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 300.0,
            jump_velocity: 170.0,
            floor_resets_velocity: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub width: f64,
    /// Vertical opening between the top and bottom sticks.
    pub gap_size: u32,
    /// Minimum height of either stick.
    pub margin: u32,
    /// Scroll speed in units/s.
    pub speed: f64,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            width: 50.0,
            gap_size: 200,
            margin: 50,
            speed: 200.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub speed: f64,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self { speed: 100.0 }
    }
}

/// Where sound cues come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundSource {
    /// Cues generated in memory.
    Synth,
    /// Cues decoded from files in `assets_dir`.
    Files,
    Off,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub source: SoundSource,
    pub assets_dir: PathBuf,
    /// Master volume, 0.0 to 1.0.
    pub volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            source: SoundSource::Synth,
            assets_dir: PathBuf::from("assets"),
            volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub variant: Variant,
    pub screen: ScreenConfig,
    pub player: PlayerConfig,
    pub physics: PhysicsConfig,
    pub obstacle: ObstacleConfig,
    pub background: BackgroundConfig,
    /// Nominal updates per second.
    pub tick_rate: f64,
    /// Upper bound on the measured frame time handed to the game.
    pub max_frame_dt: f64,
    /// Fixed RNG seed for reproducible stick layouts.
    pub seed: Option<u64>,
    pub audio: AudioConfig,
    /// Log destination; `None` disables logging.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variant: Variant::Desktop,
            screen: ScreenConfig::default(),
            player: PlayerConfig::default(),
            physics: PhysicsConfig::default(),
            obstacle: ObstacleConfig::default(),
            background: BackgroundConfig::default(),
            tick_rate: 60.0,
            max_frame_dt: 0.1,
            seed: None,
            audio: AudioConfig::default(),
            log_file: Some(PathBuf::from("flappy-wukong.log")),
        }
    }
}

impl Config {
    /// Resolve the config path: the env variable wins, then the default file
    /// if it exists in the working directory.
    pub fn locate() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
        fallback.exists().then_some(fallback)
    }

    /// Load from `path`, or return defaults when there is no file to load.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text).context("malformed JSON")?;
        Ok(config)
    }

    /// Clamp settings that would break the game's geometry.
    pub fn validated(mut self) -> Self {
        let defaults = Config::default();

        if !(self.screen.width > 0.0) {
            warn!("screen width {} is not positive, using {}", self.screen.width, defaults.screen.width);
            self.screen.width = defaults.screen.width;
        }
        if !(self.screen.height > 0.0) {
            warn!("screen height {} is not positive, using {}", self.screen.height, defaults.screen.height);
            self.screen.height = defaults.screen.height;
        }
        if !(self.player.width > 0.0) || !(self.player.height > 0.0) {
            warn!("player size must be positive, using defaults");
            self.player.width = defaults.player.width;
            self.player.height = defaults.player.height;
        }
        if self.player.height > self.screen.height {
            warn!("player height {} exceeds screen height, clamping", self.player.height);
            self.player.height = self.screen.height;
        }
        if !(self.obstacle.width > 0.0) {
            warn!("obstacle width {} is not positive, using {}", self.obstacle.width, defaults.obstacle.width);
            self.obstacle.width = defaults.obstacle.width;
        }
        self.clamp_gap();
        self.obstacle.speed =
            positive_or("obstacle speed", self.obstacle.speed, defaults.obstacle.speed);
        self.background.speed =
            positive_or("background speed", self.background.speed, defaults.background.speed);
        if !self.physics.gravity.is_finite() {
            warn!("gravity {} is not finite, using {}", self.physics.gravity, defaults.physics.gravity);
            self.physics.gravity = defaults.physics.gravity;
        }
        if !self.physics.jump_velocity.is_finite() {
            warn!(
                "jump velocity {} is not finite, using {}",
                self.physics.jump_velocity, defaults.physics.jump_velocity
            );
            self.physics.jump_velocity = defaults.physics.jump_velocity;
        }
        if !(self.tick_rate > 0.0) {
            warn!("tick rate {} is not positive, using {}", self.tick_rate, defaults.tick_rate);
            self.tick_rate = defaults.tick_rate;
        }
        if !(self.max_frame_dt > 0.0) {
            self.max_frame_dt = defaults.max_frame_dt;
        }
        self.audio.volume = self.audio.volume.clamp(0.0, 1.0);
        self
    }

    /// The bottom stick height is drawn from `[margin, height - gap - margin]`;
    /// shrink the gap (and then the margin) until that range is non-empty.
    fn clamp_gap(&mut self) {
        let height = self.screen.height.floor().max(0.0) as u32;
        let margin = self.obstacle.margin;
        if height < margin.saturating_mul(2) {
            let clamped = height / 2;
            warn!("obstacle margin {margin} does not fit screen height {height}, clamping to {clamped}");
            self.obstacle.margin = clamped;
        }
        let max_gap = height.saturating_sub(self.obstacle.margin * 2);
        if self.obstacle.gap_size > max_gap {
            warn!(
                "gap size {} leaves no room for sticks on a {height}-high screen, clamping to {max_gap}",
                self.obstacle.gap_size
            );
            self.obstacle.gap_size = max_gap;
        }
    }

    /// Seconds between nominal ticks.
    pub fn tick_interval(&self) -> f64 {
        1.0 / self.tick_rate
    }

    /// Fit the logical screen to a full-screen surface of `pixel_w` x `pixel_h`,
    /// keeping the configured height.
    pub fn fit_fullscreen(&mut self, pixel_w: usize, pixel_h: usize) {
        if pixel_w == 0 || pixel_h == 0 {
            return;
        }
        let width = (self.screen.height * pixel_w as f64 / pixel_h as f64).round();
        info!("full-screen logical size {}x{}", width, self.screen.height);
        self.screen.width = width.max(1.0);
    }
}

/// Scroll speeds must move things leftward at a finite rate.
fn positive_or(name: &str, value: f64, default: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        return value;
    }
    warn!("{name} {value} must be positive and finite, using {default}");
    default
}
