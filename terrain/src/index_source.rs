use rand::Rng;

/// Produces sprite indices for grid generation.
pub trait IndexSource {
    /// The next index in `0..n`. `n` is never zero.
    fn next_index(&mut self, n: usize) -> usize;
}

impl<R: Rng + ?Sized> IndexSource for R {
    fn next_index(&mut self, n: usize) -> usize {
        self.gen_range(0..n)
    }
}

/// Replays a fixed list of indices, starting over when it runs out.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<usize>,
    position: usize,
}

impl SequenceSource {
    pub fn new(values: impl Into<Vec<usize>>) -> Self {
        let values = values.into();
        assert!(!values.is_empty(), "A sequence source needs at least one value");
        Self {
            values,
            position: 0,
        }
    }
}

impl IndexSource for SequenceSource {
    fn next_index(&mut self, n: usize) -> usize {
        let value = self.values[self.position];
        self.position = (self.position + 1) % self.values.len();
        assert!(value < n, "Sequence value {value} is out of range 0..{n}");
        value
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::{IndexSource, SequenceSource};

    #[test]
    fn sequence_repeats() {
        let mut source = SequenceSource::new([2, 0]);
        let drawn: Vec<_> = (0..5).map(|_| source.next_index(3)).collect();
        assert_eq!(drawn, [2, 0, 2, 0, 2]);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn sequence_value_must_fit_the_range() {
        SequenceSource::new([4]).next_index(3);
    }

    #[test]
    fn rng_indices_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(rng.next_index(10) < 10);
        }
    }
}
