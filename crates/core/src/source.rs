//! Excitation sources.
//!
//! A source maps a timestep to the Hz value injected at the source cell. The
//! engines call it exactly once per step and overwrite the field with the
//! returned value (a hard source, not an additive one), so it must be pure.

/// A deterministic, side-effect-free excitation.
pub trait Source {
    fn sample(&self, t: usize) -> f64;
}

impl<F: Fn(usize) -> f64> Source for F {
    fn sample(&self, t: usize) -> f64 {
        self(t)
    }
}

/// Slow sinusoid, sin(t/5).
pub fn sine_source(t: usize) -> f64 {
    (t as f64 / 5.0).sin()
}

/// Always zero. Mimics the call overhead of a real source, useful as a
/// baseline when timing runs.
pub fn null_source(_t: usize) -> f64 {
    0.0
}

/// Unit impulse at t = 0.
pub fn impulse_source(t: usize) -> f64 {
    if t == 0 {
        1.0
    } else {
        0.0
    }
}
