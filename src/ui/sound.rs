/// Sound effects for the game's cues, synthesized at startup and played
/// through rodio.
///
/// Every cue maps to one pre-rendered WAV buffer. Playback detaches the
/// sink, so a cue never blocks the frame that raised it.
///
/// Without the "sound" feature `SoundEngine` is an empty stub.

use crate::stage::event::Cue;

#[cfg(feature = "sound")]
mod inner {
    use std::f32::consts::TAU;
    use std::io::Cursor;
    use std::sync::Arc;

    use log::{debug, warn};
    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::Cue;

    pub(super) const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        navigate: Arc<Vec<u8>>,
        correct: Arc<Vec<u8>>,
        wrong: Arc<Vec<u8>>,
        won: Arc<Vec<u8>>,
        lost: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        /// `None` when no output device can be opened.
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("no audio output, running silent: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                navigate: Arc::new(make_wav(&gen_click())),
                correct: Arc::new(make_wav(&gen_chime())),
                wrong: Arc::new(make_wav(&gen_buzz())),
                won: Arc::new(make_wav(&gen_fanfare())),
                lost: Arc::new(make_wav(&gen_slide_down())),
            })
        }

        pub fn play(&self, cue: Cue) {
            let buf = match cue {
                Cue::Navigate => &self.navigate,
                Cue::Correct => &self.correct,
                Cue::Wrong => &self.wrong,
                Cue::RoundWon => &self.won,
                Cue::RoundLost => &self.lost,
            };
            match Sink::try_new(&self.handle) {
                Ok(sink) => {
                    let cursor = Cursor::new(buf.as_ref().clone());
                    if let Ok(src) = rodio::Decoder::new(cursor) {
                        sink.append(src);
                        sink.detach();
                    }
                }
                Err(e) => debug!("dropped {cue:?}: {e}"),
            }
        }
    }

    // ── Waveforms (mono f32 samples) ──

    fn tone(freq: f32, i: usize) -> f32 {
        (i as f32 / SAMPLE_RATE as f32 * freq * TAU).sin()
    }

    fn samples_for(secs: f32) -> usize {
        (SAMPLE_RATE as f32 * secs) as usize
    }

    /// Menu click: one short high tick.
    pub(super) fn gen_click() -> Vec<f32> {
        let n = samples_for(0.03);
        (0..n)
            .map(|i| {
                let env = 1.0 - i as f32 / n as f32;
                tone(1800.0, i) * env * env * 0.25
            })
            .collect()
    }

    /// Target found: two bright notes, E6 then A6.
    fn gen_chime() -> Vec<f32> {
        let mut out = Vec::new();
        for (freq, secs) in [(1319.0_f32, 0.05), (1760.0, 0.09)] {
            let n = samples_for(secs);
            out.extend((0..n).map(|i| {
                let env = 1.0 - (i as f32 / n as f32).sqrt();
                (tone(freq, i) * 0.75 + tone(freq * 2.0, i) * 0.25) * env * 0.3
            }));
        }
        out
    }

    /// Wrong tile: low square-ish buzz roughened with noise.
    fn gen_buzz() -> Vec<f32> {
        let n = samples_for(0.18);
        let mut seed: u32 = 0x5eed;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let square = tone(110.0, i).signum();
                seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (seed as f32 / u32::MAX as f32) * 2.0 - 1.0;
                (square * 0.7 + noise * 0.3) * (1.0 - t) * 0.2
            })
            .collect()
    }

    /// Round won: rising G4 C5 E5 G5 with the last note held.
    fn gen_fanfare() -> Vec<f32> {
        let notes = [392.0_f32, 523.0, 659.0, 784.0];
        let mut out = Vec::new();
        for (k, &freq) in notes.iter().enumerate() {
            let hold = if k == notes.len() - 1 { 0.3 } else { 0.08 };
            let n = samples_for(hold);
            out.extend((0..n).map(|i| {
                let env = 1.0 - (i as f32 / n as f32) * 0.6;
                (tone(freq, i) * 0.7 + tone(freq * 3.0, i) * 0.15) * env * 0.3
            }));
        }
        out
    }

    /// Round lost: a pitch slide from 500 Hz down to 120 Hz.
    fn gen_slide_down() -> Vec<f32> {
        let n = samples_for(0.45);
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 500.0 - t * 380.0;
                phase += freq / SAMPLE_RATE as f32 * TAU;
                phase.sin() * (1.0 - t).powf(0.7) * 0.3
            })
            .collect()
    }

    // ── WAV encoding (16-bit PCM mono) ──

    pub(super) fn make_wav(samples: &[f32]) -> Vec<u8> {
        let data_size = samples.len() as u32 * 2;
        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&1u16.to_le_bytes()); // mono
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes());
        buf.extend_from_slice(&2u16.to_le_bytes());
        buf.extend_from_slice(&16u16.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let v = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf
    }
}

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> {
        Some(SoundEngine)
    }

    pub fn play(&self, _cue: Cue) {}
}

#[cfg(all(test, feature = "sound"))]
mod tests {
    use super::inner::*;

    #[test]
    fn wav_header_describes_the_samples() {
        let samples = gen_click();
        let wav = make_wav(&samples);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(wav.len(), 44 + samples.len() * 2);
        let data_size = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]);
        assert_eq!(data_size as usize, samples.len() * 2);
        let rate = u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]);
        assert_eq!(rate, SAMPLE_RATE);
    }

    #[test]
    fn samples_are_clamped() {
        let wav = make_wav(&[4.0, -4.0]);
        assert_eq!(i16::from_le_bytes([wav[44], wav[45]]), i16::MAX);
        assert_eq!(i16::from_le_bytes([wav[46], wav[47]]), -i16::MAX);
    }
}
