use rand::Rng;

/// Uniform draws for everything random on the board: generation, refill and placeholder hints.
pub trait RandomSource {
    /// Returns a value in `0..bound`. `bound` is never zero.
    fn draw(&mut self, bound: u8) -> u8;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn draw(&mut self, bound: u8) -> u8 {
        self.random_range(0..bound)
    }
}
