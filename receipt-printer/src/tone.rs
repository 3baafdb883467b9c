//! Print confirmation tone
//!
//! A short fixed-frequency beep. Playback goes through a [`ToneSink`], which
//! receives the tone parameters: sinks that drive a PCM device synthesize it
//! with [`ConfirmationTone::samples`], while the terminal bell only rings.
//! Whatever the sink does, a failed beep is logged and dropped and never fails
//! the print that triggered it.

use std::f32::consts::TAU;
use std::io::Write;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, trace};

/// Tone playback failures (never propagated past [`play_confirmation_tone`])
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Audio device error: {0}")]
    Device(String),

    #[error("Audio output not supported")]
    Unsupported,
}

/// Sine oscillator yielding samples in `[-1.0, 1.0]`
#[derive(Debug, Clone)]
pub struct Oscillator {
    phase: f32,
    step: f32,
}

impl Oscillator {
    pub fn new(frequency_hz: f32, sample_rate: u32) -> Self {
        Self {
            phase: 0.0,
            step: TAU * frequency_hz / sample_rate as f32,
        }
    }
}

impl Iterator for Oscillator {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let sample = self.phase.sin();
        self.phase = (self.phase + self.step) % TAU;
        Some(sample)
    }
}

/// Confirmation beep parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfirmationTone {
    pub frequency_hz: f32,
    pub duration: Duration,
    pub volume: f32,
}

impl Default for ConfirmationTone {
    fn default() -> Self {
        Self {
            frequency_hz: 800.0,
            duration: Duration::from_millis(200),
            volume: 0.3,
        }
    }
}

impl ConfirmationTone {
    /// Mono samples at `sample_rate`
    ///
    /// The gain decays linearly to zero over the last quarter so the tone ends
    /// without a click.
    pub fn samples(&self, sample_rate: u32) -> Vec<f32> {
        let total = (self.duration.as_secs_f32() * sample_rate as f32).round() as usize;
        let fade_start = total - total / 4;
        let volume = self.volume.clamp(0.0, 1.0);

        Oscillator::new(self.frequency_hz, sample_rate)
            .take(total)
            .enumerate()
            .map(|(i, s)| {
                let gain = if i < fade_start {
                    volume
                } else {
                    volume * (total - i) as f32 / (total - fade_start) as f32
                };
                s * gain
            })
            .collect()
    }
}

/// Audio output capability
pub trait ToneSink: Send + Sync {
    fn play(&self, tone: &ConfirmationTone) -> Result<(), AudioError>;
}

/// Rings the terminal bell on stderr
///
/// The bell has a fixed pitch, so the tone's frequency and volume are not used
/// and no samples are synthesized.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl ToneSink for TerminalBell {
    fn play(&self, tone: &ConfirmationTone) -> Result<(), AudioError> {
        trace!(duration = ?tone.duration, "ringing terminal bell");
        let mut stderr = std::io::stderr().lock();
        stderr
            .write_all(b"\x07")
            .and_then(|_| stderr.flush())
            .map_err(|e| AudioError::Device(e.to_string()))
    }
}

/// Discards the tone
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ToneSink for NullSink {
    fn play(&self, _tone: &ConfirmationTone) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Sample rate PCM sinks render the confirmation beep at
pub const TONE_SAMPLE_RATE: u32 = 44_100;

/// Play the confirmation beep; failures are swallowed
pub fn play_confirmation_tone(sink: &dyn ToneSink) {
    if let Err(e) = sink.play(&ConfirmationTone::default()) {
        debug!(error = %e, "confirmation tone failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// PCM sink: renders the tone and keeps the sample count
    struct Recording(Mutex<Vec<usize>>);

    impl ToneSink for Recording {
        fn play(&self, tone: &ConfirmationTone) -> Result<(), AudioError> {
            let samples = tone.samples(TONE_SAMPLE_RATE);
            self.0.lock().unwrap().push(samples.len());
            Ok(())
        }
    }

    /// Keeps the parameters it was asked to play
    struct Params(Mutex<Vec<ConfirmationTone>>);

    impl ToneSink for Params {
        fn play(&self, tone: &ConfirmationTone) -> Result<(), AudioError> {
            self.0.lock().unwrap().push(*tone);
            Ok(())
        }
    }

    struct Broken;

    impl ToneSink for Broken {
        fn play(&self, _tone: &ConfirmationTone) -> Result<(), AudioError> {
            Err(AudioError::Unsupported)
        }
    }

    #[test]
    fn test_sample_count_and_amplitude() {
        let tone = ConfirmationTone::default();
        let samples = tone.samples(8_000);
        assert_eq!(samples.len(), 1_600);
        assert!(samples.iter().all(|s| s.abs() <= tone.volume + f32::EPSILON));
        assert!(samples.iter().any(|s| s.abs() > 0.2));
        assert!(samples.last().unwrap().abs() < 0.01);
    }

    #[test]
    fn test_oscillator_period() {
        // 1 kHz at 4 kHz sampling: 0, 1, 0, -1
        let s: Vec<f32> = Oscillator::new(1_000.0, 4_000).take(4).collect();
        assert!(s[0].abs() < 1e-5);
        assert!((s[1] - 1.0).abs() < 1e-5);
        assert!(s[2].abs() < 1e-5);
        assert!((s[3] + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_confirmation_tone_reaches_sink() {
        let sink = Recording(Mutex::new(Vec::new()));
        play_confirmation_tone(&sink);
        assert_eq!(*sink.0.lock().unwrap(), vec![8_820]);
    }

    #[test]
    fn test_sink_receives_tone_parameters() {
        let sink = Params(Mutex::new(Vec::new()));
        play_confirmation_tone(&sink);
        let played = sink.0.lock().unwrap();
        assert_eq!(played.len(), 1);
        assert_eq!(played[0].frequency_hz, 800.0);
        assert_eq!(played[0].duration, Duration::from_millis(200));
        assert_eq!(played[0].volume, 0.3);
    }

    #[test]
    fn test_failing_sink_is_swallowed() {
        play_confirmation_tone(&Broken);
        play_confirmation_tone(&NullSink);
    }
}
