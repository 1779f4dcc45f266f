use crate::*;
pub use random::*;

mod random;

pub trait BoardGenerator {
    fn generate<S: RandomSource + ?Sized>(&self, config: BoardConfig, source: &mut S) -> Board;
}
