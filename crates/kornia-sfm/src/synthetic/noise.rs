use rand::distr::Distribution;
use rand::Rng;

/// Source of the additive perturbation applied to each synthetic feature coordinate.
///
/// The random source is owned by the caller of the generator; implementations only
/// shape the distribution.
pub trait NoiseGenerator {
    /// Draw the next perturbation.
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64;
}

/// Noise that is always zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroNoise;

impl NoiseGenerator for ZeroNoise {
    fn sample<R: Rng + ?Sized>(&mut self, _rng: &mut R) -> f64 {
        0.0
    }
}

/// Noise drawn uniformly in `[-half_width, half_width]`.
#[derive(Debug, Clone, Copy)]
pub struct UniformNoise {
    half_width: f64,
}

impl UniformNoise {
    /// Create a uniform noise of the given half width. The sign of `half_width` is ignored.
    pub fn new(half_width: f64) -> Self {
        Self {
            half_width: half_width.abs(),
        }
    }

    /// Get the bound of the perturbation.
    pub fn half_width(&self) -> f64 {
        self.half_width
    }
}

impl NoiseGenerator for UniformNoise {
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        if self.half_width == 0.0 {
            return 0.0;
        }
        rng.random_range(-self.half_width..=self.half_width)
    }
}

/// Noise drawn from any `rand` distribution over `f64`.
#[derive(Debug, Clone, Copy)]
pub struct DistributionNoise<D>(pub D);

impl<D: Distribution<f64>> NoiseGenerator for DistributionNoise<D> {
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        self.0.sample(rng)
    }
}
