use ratatui::style::Color;

use crate::breath::BreathPhase;

/// Smallest circle size, as a fraction of the full radius
pub const MIN_SCALE: f64 = 0.35;

/// Circle size for a phase and its progress: grows on inhale, holds full,
/// shrinks on exhale. Eased so the motion starts and ends gently.
pub fn circle_scale(phase: BreathPhase, progress: f64) -> f64 {
    let t = ease(progress.clamp(0.0, 1.0));
    match phase {
        BreathPhase::Inhale => lerp(MIN_SCALE, 1.0, t),
        BreathPhase::Hold => 1.0,
        BreathPhase::Exhale => lerp(1.0, MIN_SCALE, t),
    }
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from * (1.0 - t) + to * t
}

fn ease(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

pub fn phase_color(phase: BreathPhase) -> Color {
    match phase {
        BreathPhase::Inhale => Color::Cyan,
        BreathPhase::Hold => Color::Yellow,
        BreathPhase::Exhale => Color::Green,
    }
}

/// Canvas bounds that keep a unit circle round in a `width` x `height` cell
/// area, taking terminal cells as twice as tall as they are wide.
pub fn canvas_bounds(width: u16, height: u16) -> ([f64; 2], [f64; 2]) {
    if width == 0 || height == 0 {
        return ([-1.0, 1.0], [-1.0, 1.0]);
    }
    let ratio = width as f64 / (height as f64 * 2.0);
    if ratio >= 1.0 {
        ([-ratio, ratio], [-1.0, 1.0])
    } else {
        ([-1.0, 1.0], [-1.0 / ratio, 1.0 / ratio])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_scale_endpoints() {
        assert_eq!(circle_scale(BreathPhase::Inhale, 0.0), MIN_SCALE);
        assert_eq!(circle_scale(BreathPhase::Inhale, 1.0), 1.0);
        assert_eq!(circle_scale(BreathPhase::Hold, 0.3), 1.0);
        assert_eq!(circle_scale(BreathPhase::Exhale, 0.0), 1.0);
        assert_eq!(circle_scale(BreathPhase::Exhale, 1.0), MIN_SCALE);
    }

    #[test]
    fn test_circle_scale_is_monotonic_within_phase() {
        let samples: Vec<f64> = (0..=10)
            .map(|i| circle_scale(BreathPhase::Inhale, i as f64 / 10.0))
            .collect();
        assert!(samples.windows(2).all(|w| w[0] <= w[1]));

        let samples: Vec<f64> = (0..=10)
            .map(|i| circle_scale(BreathPhase::Exhale, i as f64 / 10.0))
            .collect();
        assert!(samples.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_circle_scale_clamps_progress() {
        assert_eq!(circle_scale(BreathPhase::Inhale, 2.0), 1.0);
        assert_eq!(circle_scale(BreathPhase::Exhale, -1.0), 1.0);
    }

    #[test]
    fn test_canvas_bounds() {
        assert_eq!(canvas_bounds(40, 10), ([-2.0, 2.0], [-1.0, 1.0]));
        assert_eq!(canvas_bounds(10, 10), ([-1.0, 1.0], [-2.0, 2.0]));
        assert_eq!(canvas_bounds(0, 10), ([-1.0, 1.0], [-1.0, 1.0]));
    }
}
