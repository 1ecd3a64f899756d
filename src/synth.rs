//! Built-in sound cues, composed from rodio's signal generators.

use rodio::Source;
use rodio::cpal::SampleRate;
use rodio::source::{self, Function, SignalGenerator, TakeDuration};
use std::time::Duration;

pub const SAMPLE_RATE: u32 = 44_100;
const RATE: SampleRate = SampleRate(SAMPLE_RATE);

/// A cue ready to hand to a sink.
pub type CueSource = Box<dyn Source<Item = f32> + Send>;

/// Resolution of a glide. The generators hold a fixed pitch, so a sweep is a
/// run of short fixed-pitch segments.
const GLIDE_STEP: Duration = Duration::from_millis(10);

fn tone(function: Function, freq: f32, duration: Duration) -> TakeDuration<SignalGenerator> {
    SignalGenerator::new(RATE, freq, function).take_duration(duration)
}

/// `function` sliding linearly from `from` to `to` Hz over `sweep`, then
/// holding `to` until `total` has played.
fn glide(
    function: Function,
    from: f32,
    to: f32,
    sweep: Duration,
    total: Duration,
) -> impl Source<Item = f32> + Send {
    let steps = (total.as_secs_f32() / GLIDE_STEP.as_secs_f32()).round() as u32;
    let sweep_steps = (sweep.as_secs_f32() / GLIDE_STEP.as_secs_f32()).max(1.0);
    source::from_iter((0..steps).map(move |i| {
        let t = (i as f32 / sweep_steps).min(1.0);
        tone(function.clone(), from + (to - from) * t, GLIDE_STEP)
    }))
}

// ── Cues ────────────────────────────────────────────────────────────────────

/// Short upward chirp.
pub fn jump() -> CueSource {
    let d = Duration::from_millis(150);
    Box::new(
        source::chirp(RATE, 320.0, 640.0, d)
            .take_duration(d)
            .linear_gain_ramp(d, 0.2, 0.0, true),
    )
}

/// Two bright notes.
pub fn score() -> CueSource {
    let note = |freq, ms| {
        let d = Duration::from_millis(ms);
        tone(Function::Sine, freq, d).linear_gain_ramp(d, 0.2, 0.0, true)
    };
    Box::new(source::from_iter([note(880.0, 80), note(1320.0, 180)]))
}

/// Falling saw: 400Hz down to 80Hz over 0.4s, gain 0.15 to silence over 0.5s.
pub fn collision() -> CueSource {
    let d = Duration::from_millis(500);
    Box::new(
        glide(Function::Sawtooth, 400.0, 80.0, Duration::from_millis(400), d)
            .linear_gain_ramp(d, 0.15, 0.0, true),
    )
}

/// Quiet arpeggio with a soft fifth on top, meant to be looped.
pub fn music() -> CueSource {
    const NOTES: [f32; 8] = [
        261.63, 329.63, 392.00, 523.25, 392.00, 329.63, 293.66, 349.23,
    ];
    let d = Duration::from_millis(250);
    Box::new(source::from_iter(NOTES.into_iter().map(move |f| {
        SignalGenerator::new(RATE, f, Function::Sine)
            .mix(SignalGenerator::new(RATE, f * 1.5, Function::Triangle).amplify(0.4))
            .take_duration(d)
            .linear_gain_ramp(d, 0.05, 0.01, true)
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(cue: impl Source<Item = f32>) -> Vec<f32> {
        cue.collect()
    }

    fn secs(samples: &[f32]) -> f32 {
        samples.len() as f32 / SAMPLE_RATE as f32
    }

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0_f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn test_collision_shape() {
        let samples = render(collision());
        assert!((secs(&samples) - 0.5).abs() < 0.005, "{}s", secs(&samples));
        assert!(peak(&samples) <= 0.15 + 1e-6);
        // Gain envelope has died out by the end.
        let tail = &samples[samples.len() - 50..];
        assert!(tail.iter().all(|s| s.abs() < 0.002));
    }

    #[test]
    fn test_collision_pitch_falls() {
        let samples = render(glide(
            Function::Sawtooth,
            400.0,
            80.0,
            Duration::from_millis(400),
            Duration::from_millis(500),
        ));
        let window = SAMPLE_RATE as usize / 10;
        // A rising saw wraps from +1 to -1 once per period.
        let wraps = |s: &[f32]| s.windows(2).filter(|w| w[0] - w[1] > 1.0).count();
        let early = wraps(&samples[..window]);
        let late = wraps(&samples[samples.len() - window..]);
        assert!(early > 2 * late, "early {early}, late {late}");
    }

    #[test]
    fn test_cues_are_audible_and_bounded() {
        for cue in [jump(), score(), collision(), music()] {
            let samples = render(cue);
            assert!(!samples.is_empty());
            assert!(peak(&samples) > 0.0);
            assert!(peak(&samples) <= 1.0);
        }
    }

    #[test]
    fn test_cue_lengths() {
        assert!((secs(&render(jump())) - 0.15).abs() < 0.005);
        assert!((secs(&render(score())) - 0.26).abs() < 0.005);
        assert!((secs(&render(music())) - 2.0).abs() < 0.005);
    }

    #[test]
    fn test_cues_are_mono_at_sample_rate() {
        for cue in [jump(), score(), collision(), music()] {
            assert_eq!(cue.channels(), 1);
            assert_eq!(cue.sample_rate(), SAMPLE_RATE);
        }
    }
}
