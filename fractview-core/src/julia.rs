use crate::complex::Complex;
use crate::fractal::{CycleCheck, Fractal, FractalParams, IterationResult};

/// A Julia map `z ← z² + c` with fixed `c`, starting from `z₀ = p`.
#[derive(Debug, Clone, Copy)]
pub struct Julia {
    c: Complex,
    max_iterations: u32,
    escape_radius_sq: f64,
}

impl Julia {
    pub fn from_params(c: Complex, params: &FractalParams) -> Self {
        Self {
            c,
            max_iterations: params.max_iterations,
            escape_radius_sq: params.escape_radius_sq(),
        }
    }

    pub fn c(&self) -> Complex {
        self.c
    }
}

impl Fractal for Julia {
    fn iterate(&self, p: Complex) -> IterationResult {
        let mut z = p;
        let mut norm_sq = z.norm_sq();
        let mut cycle = CycleCheck::new(z);

        for n in 0..self.max_iterations {
            z = z.square_add(self.c);
            norm_sq = z.norm_sq();
            if norm_sq > self.escape_radius_sq {
                return IterationResult::escaped(n, norm_sq);
            }
            if cycle.is_periodic(z) {
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
