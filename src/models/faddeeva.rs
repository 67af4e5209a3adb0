//! Faddeeva function and the Voigt profile.
//!
//! `w(z) = exp(-z²) erfc(-iz)` is evaluated with Weideman's rational
//! approximation of order 32 (J. A. C. Weideman, "Computation of the complex
//! error function", SIAM J. Numer. Anal. 31, 1994). The expansion
//! coefficients are computed once and reused; evaluation is a fixed number of
//! complex operations with no iteration.

use num_complex::Complex64;
use std::f64::consts::{FRAC_2_SQRT_PI, PI, SQRT_2};
use std::sync::OnceLock;

/// Number of terms in the rational expansion
const N_TERMS: usize = 32;

/// `sqrt(2π)`
pub const SQRT_2PI: f64 = 2.5066282746310002;

static COEFFICIENTS: OnceLock<Coefficients> = OnceLock::new();

struct Coefficients {
    l: f64,
    a: [f64; N_TERMS + 1],
}

impl Coefficients {
    fn compute() -> Self {
        let n = N_TERMS as f64;
        let m = 2 * N_TERMS;
        let l = (n / SQRT_2).sqrt();

        let g = |k: i64| {
            let t = l * (k as f64 * PI / (2.0 * m as f64)).tan();
            (-t * t).exp() * (l * l + t * t)
        };

        let mut a = [0.0; N_TERMS + 1];
        for (idx, coeff) in a.iter_mut().enumerate() {
            let sum: f64 = (-(m as i64) + 1..m as i64)
                .map(|k| g(k) * (PI * idx as f64 * k as f64 / m as f64).cos())
                .sum();
            *coeff = sum / (2.0 * m as f64);
        }

        Self { l, a }
    }

    fn get() -> &'static Self {
        COEFFICIENTS.get_or_init(Self::compute)
    }
}

/// The Faddeeva function `w(z) = exp(-z²) erfc(-iz)`
///
/// Accurate to roughly 1e-13 relative in the upper half plane. The lower
/// half plane uses the reflection `w(z) = 2 exp(-z²) - w(-z)`.
///
/// # Examples
///
/// ```
/// use num_complex::Complex64;
/// use voigt_rs::models::faddeeva::faddeeva;
///
/// // w(0) = 1
/// let w = faddeeva(Complex64::new(0.0, 0.0));
/// assert!((w.re - 1.0).abs() < 1e-12);
/// assert!(w.im.abs() < 1e-12);
/// ```
pub fn faddeeva(z: Complex64) -> Complex64 {
    if z.im < 0.0 {
        return 2.0 * (-z * z).exp() - faddeeva(-z);
    }

    let coeffs = Coefficients::get();
    let iz = Complex64::i() * z;
    let denom = coeffs.l - iz;
    let zz = (coeffs.l + iz) / denom;

    let mut p = Complex64::new(0.0, 0.0);
    for &a in coeffs.a[1..].iter().rev() {
        p = p * zz + a;
    }

    2.0 * p / (denom * denom) + (FRAC_2_SQRT_PI / 2.0) / denom
}

/// Area-normalised Voigt profile at offset `dx` from the centre
///
/// `sigma` is the Gaussian standard deviation and `gamma` the Lorentzian
/// half width at half maximum. Either may be zero; both zero is a delta
/// and evaluates to zero everywhere except `dx == 0`, where it is infinite.
pub fn voigt_profile(dx: f64, sigma: f64, gamma: f64) -> f64 {
    if gamma == 0.0 {
        if sigma == 0.0 {
            return if dx == 0.0 { f64::INFINITY } else { 0.0 };
        }
        let u = dx / sigma;
        return (-0.5 * u * u).exp() / (sigma * SQRT_2PI);
    }

    if sigma == 0.0 {
        return gamma / (PI * (dx * dx + gamma * gamma));
    }

    let z = Complex64::new(dx, gamma) / (sigma * SQRT_2);
    faddeeva(z).re / (sigma * SQRT_2PI)
}
