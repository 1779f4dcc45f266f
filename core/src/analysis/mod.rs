pub use hint::*;

mod hint;
