use super::core::Language;
use rand::seq::SliceRandom;

/// Supplies the words a round is built from.
pub trait WordSource {
    /// `count` words, each drawn independently (with replacement).
    fn generate(&self, count: usize) -> Vec<String>;
}

impl WordSource for Language {
    fn generate(&self, count: usize) -> Vec<String> {
        let rng = &mut rand::thread_rng();
        (0..count)
            .filter_map(|_| self.words.choose(rng).cloned())
            .collect()
    }
}

impl<S: WordSource + ?Sized> WordSource for &S {
    fn generate(&self, count: usize) -> Vec<String> {
        (**self).generate(count)
    }
}

impl<S: WordSource + ?Sized> WordSource for Box<S> {
    fn generate(&self, count: usize) -> Vec<String> {
        (**self).generate(count)
    }
}
