use rodio::Source;
use std::f32::consts::PI;
use std::time::Duration;

const SAMPLE_RATE: u32 = 44100;

/// Short two-partial bell tone with an exponential decay.
/// Finite: ends after `duration`.
pub struct Chime {
    frequency: f32,
    total_samples: usize,
    num_sample: usize,
    volume: f32,
}

impl Chime {
    pub fn new(frequency: f32, duration: Duration, volume: f32) -> Self {
        Self {
            frequency,
            total_samples: (duration.as_millis() as u64 * u64::from(SAMPLE_RATE) / 1000) as usize,
            num_sample: 0,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    /// The tone played when a timer mode completes.
    pub fn completion(volume: f32) -> Self {
        Self::new(880.0, Duration::from_millis(900), volume)
    }
}

impl Iterator for Chime {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.num_sample >= self.total_samples {
            return None;
        }

        let t = self.num_sample as f32 / SAMPLE_RATE as f32;
        self.num_sample += 1;

        let envelope = (-4.0 * t).exp();
        let fundamental = (2.0 * PI * self.frequency * t).sin();
        let overtone = (2.0 * PI * self.frequency * 2.0 * t).sin() * 0.3;

        Some((fundamental + overtone) * envelope * 0.25 * self.volume)
    }
}

impl Source for Chime {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.total_samples.saturating_sub(self.num_sample))
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f32(
            self.total_samples as f32 / SAMPLE_RATE as f32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chime_is_finite_and_bounded() {
        let chime = Chime::new(440.0, Duration::from_millis(100), 1.0);
        assert!(chime.total_duration().is_some());

        let samples: Vec<f32> = chime.collect();
        assert_eq!(samples.len(), 4410);
        assert!(samples.iter().all(|s| s.abs() <= 0.5));
    }

    #[test]
    fn silent_at_zero_volume() {
        let chime = Chime::completion(0.0);
        assert!(chime.take(1000).all(|s| s == 0.0));
    }
}
