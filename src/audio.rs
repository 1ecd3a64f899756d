//! Sound cues and background music.
//!
//! Every failure here is soft: a missing output device, a missing file or an
//! undecodable file just means that sound never plays.

use crate::config::{AudioConfig, SoundSource};
use crate::game::GameEvent;
use crate::synth::{self, CueSource};
use log::{debug, info, warn};
use rodio::buffer::SamplesBuffer;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Jump,
    Score,
    Collision,
    Music,
}

impl Cue {
    pub const ALL: [Cue; 4] = [Cue::Jump, Cue::Score, Cue::Collision, Cue::Music];

    /// Asset file looked up in the assets directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Cue::Jump => "jump_sound.mp3",
            Cue::Score => "score_sound.mp3",
            Cue::Collision => "collision_sound.mp3",
            Cue::Music => "background_music.mp3",
        }
    }

    fn synthesize(self) -> CueSource {
        match self {
            Cue::Jump => synth::jump(),
            Cue::Score => synth::score(),
            Cue::Collision => synth::collision(),
            Cue::Music => synth::music(),
        }
    }
}

/// A sound file decoded into memory, interleaved `f32` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub channels: u16,
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl Clip {
    pub fn duration_secs(&self) -> f32 {
        if self.channels == 0 || self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.channels as f32 / self.sample_rate as f32
    }

    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0_f32, |m, s| m.max(s.abs()))
    }

    fn buffer(&self) -> SamplesBuffer<f32> {
        SamplesBuffer::new(self.channels, self.sample_rate, self.samples.clone())
    }
}

#[derive(Debug, Clone)]
pub enum Sound {
    /// Rebuilt from the generators on every play.
    Synth(Cue),
    Decoded(Clip),
}

impl Sound {
    pub fn source(&self) -> CueSource {
        match self {
            Sound::Synth(cue) => cue.synthesize(),
            Sound::Decoded(clip) => Box::new(clip.buffer()),
        }
    }
}

/// Loaded sounds; an absent entry is a cue that stays silent.
#[derive(Debug, Clone, Default)]
pub struct SoundBank {
    sounds: [Option<Sound>; 4],
}

impl SoundBank {
    pub fn load(config: &AudioConfig) -> Self {
        let mut bank = SoundBank::default();
        for cue in Cue::ALL {
            bank.sounds[cue as usize] = match config.source {
                SoundSource::Off => None,
                SoundSource::Synth => Some(Sound::Synth(cue)),
                SoundSource::Files => {
                    load_file(&config.assets_dir.join(cue.file_name())).map(Sound::Decoded)
                }
            };
        }
        bank
    }

    pub fn get(&self, cue: Cue) -> Option<&Sound> {
        self.sounds[cue as usize].as_ref()
    }

    pub fn loaded(&self) -> usize {
        self.sounds.iter().flatten().count()
    }
}

/// Decode a whole file into memory, or `None` if it can't be had.
pub fn load_file(path: &Path) -> Option<Clip> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            warn!("sound {} unavailable: {e}", path.display());
            return None;
        }
    };
    let decoder = match Decoder::new(BufReader::new(file)) {
        Ok(d) => d,
        Err(e) => {
            warn!("sound {} could not be decoded: {e}", path.display());
            return None;
        }
    };
    let channels = decoder.channels();
    let sample_rate = decoder.sample_rate();
    let samples: Vec<f32> = decoder.convert_samples::<f32>().collect();
    if channels == 0 || sample_rate == 0 || samples.is_empty() {
        warn!("sound {} is empty", path.display());
        return None;
    }
    debug!("loaded {} ({} samples)", path.display(), samples.len());
    Some(Clip {
        channels,
        sample_rate,
        samples,
    })
}

// ── Playback ────────────────────────────────────────────────────────────────

struct Output {
    // Dropping the stream silences everything.
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

pub struct Audio {
    output: Option<Output>,
    bank: SoundBank,
    volume: f32,
    music: Option<Sink>,
}

impl Audio {
    /// Open the default output device and load the cues.
    pub fn open(config: &AudioConfig) -> Self {
        if config.source == SoundSource::Off {
            info!("audio disabled");
            return Self::silent();
        }
        let output = match OutputStream::try_default() {
            Ok((stream, handle)) => Some(Output {
                _stream: stream,
                handle,
            }),
            Err(e) => {
                warn!("no audio output device, playing silently: {e}");
                None
            }
        };
        let bank = if output.is_some() {
            SoundBank::load(config)
        } else {
            SoundBank::default()
        };
        info!("audio ready, {} of {} sounds loaded", bank.loaded(), Cue::ALL.len());
        Self {
            output,
            bank,
            volume: config.volume,
            music: None,
        }
    }

    pub fn silent() -> Self {
        Self {
            output: None,
            bank: SoundBank::default(),
            volume: 0.0,
            music: None,
        }
    }

    fn sink(&self) -> Option<Sink> {
        let output = self.output.as_ref()?;
        match Sink::try_new(&output.handle) {
            Ok(sink) => {
                sink.set_volume(self.volume);
                Some(sink)
            }
            Err(e) => {
                warn!("audio sink unavailable: {e}");
                None
            }
        }
    }

    /// Fire and forget.
    pub fn play(&self, cue: Cue) {
        let Some(sound) = self.bank.get(cue) else {
            return;
        };
        let Some(sink) = self.sink() else {
            return;
        };
        sink.append(sound.source());
        sink.detach(); // Play in background
    }

    pub fn start_music(&mut self) {
        self.stop_music();
        let Some(sound) = self.bank.get(Cue::Music) else {
            return;
        };
        let Some(sink) = self.sink() else {
            return;
        };
        sink.append(sound.source().repeat_infinite());
        self.music = Some(sink);
    }

    pub fn stop_music(&mut self) {
        if let Some(sink) = self.music.take() {
            sink.stop();
        }
    }

    pub fn handle(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Jumped => self.play(Cue::Jump),
            GameEvent::Scored(_) => self.play(Cue::Score),
            GameEvent::Collided => self.play(Cue::Collision),
            GameEvent::GameOver => self.stop_music(),
            GameEvent::Restarted => self.start_music(),
            GameEvent::Started => {
                if self.music.is_none() {
                    self.start_music();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("flappy-wukong-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// 16-bit mono PCM WAV.
    fn wav_bytes(samples: &[i16], rate: u32) -> Vec<u8> {
        let data_len = (samples.len() * 2) as u32;
        let mut b = Vec::new();
        b.extend_from_slice(b"RIFF");
        b.extend_from_slice(&(36 + data_len).to_le_bytes());
        b.extend_from_slice(b"WAVEfmt ");
        b.extend_from_slice(&16u32.to_le_bytes());
        b.extend_from_slice(&1u16.to_le_bytes());
        b.extend_from_slice(&1u16.to_le_bytes());
        b.extend_from_slice(&rate.to_le_bytes());
        b.extend_from_slice(&(rate * 2).to_le_bytes());
        b.extend_from_slice(&2u16.to_le_bytes());
        b.extend_from_slice(&16u16.to_le_bytes());
        b.extend_from_slice(b"data");
        b.extend_from_slice(&data_len.to_le_bytes());
        for s in samples {
            b.extend_from_slice(&s.to_le_bytes());
        }
        b
    }

    #[test]
    fn test_synth_bank_has_every_cue() {
        let bank = SoundBank::load(&AudioConfig::default());
        assert_eq!(bank.loaded(), 4);
        for cue in Cue::ALL {
            let sound = bank.get(cue).expect("synth cue missing");
            assert!(matches!(sound, Sound::Synth(c) if *c == cue));
            assert_eq!(sound.source().take(64).count(), 64);
        }
    }

    #[test]
    fn test_off_bank_is_empty() {
        let config = AudioConfig {
            source: SoundSource::Off,
            ..AudioConfig::default()
        };
        assert_eq!(SoundBank::load(&config).loaded(), 0);
    }

    #[test]
    fn test_missing_files_stay_silent() {
        let config = AudioConfig {
            source: SoundSource::Files,
            assets_dir: PathBuf::from("/no/such/assets"),
            ..AudioConfig::default()
        };
        let bank = SoundBank::load(&config);
        assert_eq!(bank.loaded(), 0);
        assert!(bank.get(Cue::Jump).is_none());
    }

    #[test]
    fn test_garbage_file_is_skipped() {
        let dir = scratch_dir("garbage");
        let path = dir.join(Cue::Score.file_name());
        std::fs::write(&path, b"definitely not audio").unwrap();
        assert!(load_file(&path).is_none());
    }

    #[test]
    fn test_wav_file_loads() {
        let dir = scratch_dir("wav");
        let path = dir.join("tone.wav");
        let samples: Vec<i16> = (0..800).map(|i| if i % 2 == 0 { 8000 } else { -8000 }).collect();
        std::fs::write(&path, wav_bytes(&samples, 8000)).unwrap();
        let clip = load_file(&path).expect("wav should decode");
        assert_eq!(clip.channels, 1);
        assert_eq!(clip.sample_rate, 8000);
        assert_eq!(clip.samples.len(), 800);
        assert!(clip.peak() > 0.2);
        assert!((clip.duration_secs() - 0.1).abs() < 1e-6);

        let played: Vec<f32> = Sound::Decoded(clip.clone()).source().collect();
        assert_eq!(played, clip.samples);
    }

    #[test]
    fn test_silent_audio_ignores_everything() {
        let mut audio = Audio::silent();
        for event in [
            GameEvent::Started,
            GameEvent::Jumped,
            GameEvent::Scored(1),
            GameEvent::Collided,
            GameEvent::GameOver,
            GameEvent::Restarted,
        ] {
            audio.handle(&event);
        }
        assert!(audio.music.is_none());
    }
}
