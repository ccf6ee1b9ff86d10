use crate::complex::Complex;
use crate::fractal::{CycleCheck, Fractal, FractalParams, IterationResult};

/// The Mandelbrot map `z ← z² + p` starting from `z₀ = 0`.
#[derive(Debug, Clone, Copy)]
pub struct Mandelbrot {
    max_iterations: u32,
    escape_radius_sq: f64,
}

impl Mandelbrot {
    pub fn from_params(params: &FractalParams) -> Self {
        Self {
            max_iterations: params.max_iterations,
            escape_radius_sq: params.escape_radius_sq(),
        }
    }

    /// Closed-form interior tests only hold when every bounded orbit stays
    /// inside the bailout circle, which is guaranteed for radius ≥ 2.
    #[inline]
    fn shortcuts_valid(&self) -> bool {
        self.escape_radius_sq >= 4.0
    }
}

impl Default for Mandelbrot {
    fn default() -> Self {
        Self::from_params(&FractalParams::default())
    }
}

/// Main cardioid membership.
#[inline]
fn in_cardioid(re: f64, im: f64) -> bool {
    let im2 = im * im;
    let q = (re - 0.25) * (re - 0.25) + im2;
    q * (q + (re - 0.25)) <= 0.25 * im2
}

/// Period-2 bulb membership (disc of radius 1/4 around -1).
#[inline]
fn in_period2_bulb(re: f64, im: f64) -> bool {
    (re + 1.0) * (re + 1.0) + im * im <= 0.0625
}

impl Fractal for Mandelbrot {
    fn iterate(&self, p: Complex) -> IterationResult {
        if self.shortcuts_valid() && (in_cardioid(p.re, p.im) || in_period2_bulb(p.re, p.im)) {
            return IterationResult::interior(self.max_iterations, 0.0);
        }

        let mut z = Complex::ZERO;
        let mut norm_sq = 0.0;
        let mut cycle = CycleCheck::new(z);

        for n in 0..self.max_iterations {
            z = z.square_add(p);
            norm_sq = z.norm_sq();
            if norm_sq > self.escape_radius_sq {
                return IterationResult::escaped(n, norm_sq);
            }
            // Orbits rarely settle early; checking every 4th step past 32
            // keeps the branch cheap.
            if n >= 32 && n & 3 == 0 && cycle.is_periodic(z) {
                break;
            }
        }

        IterationResult::interior(self.max_iterations, norm_sq)
    }

    #[inline]
    fn max_iterations(&self) -> u32 {
        self.max_iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mb(max: u32) -> Mandelbrot {
        Mandelbrot::from_params(&FractalParams::mandelbrot(max, 2.0).unwrap())
    }

    #[test]
    fn origin_never_escapes() {
        let r = mb(100).iterate(Complex::ZERO);
        assert_eq!(r, IterationResult::interior(100, 0.0));
    }

    #[test]
    fn far_point_escapes_on_first_step() {
        let r = mb(100).iterate(Complex::new(10.0, 0.0));
        assert!(r.escaped);
        assert_eq!(r.count, 0);
    }

    #[test]
    fn known_escape_count() {
        // 0 → 1 → 2 → 5: |2|² = 4 is not beyond the radius, |5|² is.
        let r = mb(256).iterate(Complex::new(1.0, 0.0));
        assert!(r.escaped);
        assert_eq!(r.count, 2);
        assert_eq!(r.final_norm_sq, 25.0);
    }

    #[test]
    fn period_two_point_is_interior() {
        let r = mb(1000).iterate(Complex::new(-1.0, 0.0));
        assert!(!r.escaped);
        assert_eq!(r.count, 1000);
    }

    #[test]
    fn shortcuts_disabled_for_small_radius() {
        // c = -1 cycles through |z| = 1, which escapes a radius of 0.5.
        let small = Mandelbrot::from_params(&FractalParams::mandelbrot(50, 0.5).unwrap());
        let r = small.iterate(Complex::new(-1.0, 0.0));
        assert!(r.escaped);
        assert_eq!(r.count, 0);
    }

    #[test]
    fn periodic_interior_outside_shortcuts() {
        // c = -0.1 + 0.75i sits in the period-3 bulb, outside the cardioid.
        let r = mb(5000).iterate(Complex::new(-0.1, 0.75));
        assert!(!r.escaped);
        assert_eq!(r.count, 5000);
    }

    /// Straight iteration with no shortcuts or cycle detection.
    fn plain(p: Complex, max: u32) -> (u32, bool) {
        let mut z = Complex::ZERO;
        for n in 0..max {
            z = z.square_add(p);
            if z.norm_sq() > 4.0 {
                return (n, true);
            }
        }
        (max, false)
    }

    #[test]
    fn slow_escape_near_cusp_is_not_mistaken_for_a_cycle() {
        // Just right of the cardioid cusp the orbit crawls past 1/2 in steps
        // of about 5e-14 and needs ~1.4e7 iterations to escape.
        let p = Complex::new(0.25 + 5e-14, 0.0);
        let max = 20_000_000;
        let r = mb(max).iterate(p);
        let (count, escaped) = plain(p, max);
        assert!(escaped);
        assert_eq!((r.count, r.escaped), (count, escaped));
    }

    #[test]
    fn escape_count_always_below_cap() {
        let m = mb(64);
        for i in 0..40 {
            let p = Complex::new(-2.2 + i as f64 * 0.11, 0.7);
            let r = m.iterate(p);
            if r.escaped {
                assert!(r.count < 64);
            } else {
                assert_eq!(r.count, 64);
            }
        }
    }
}
