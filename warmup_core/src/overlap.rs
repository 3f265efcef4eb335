use crate::{snapshot::UnderCovered, Addr, UnderCoveredSet};

/// Blocks of `covered` that are in `set`, in `covered` order, duplicates kept.
pub fn overlap_of(set: &UnderCoveredSet, covered: &[Addr]) -> Vec<Addr> {
    covered
        .iter()
        .filter(|addr| set.contains(*addr))
        .copied()
        .collect()
}

impl UnderCovered {
    /// Blocks of `covered` that are currently under-covered.
    ///
    /// The snapshot is loaded once, so the whole result comes from one published set.
    pub fn find_overlap(&self, covered: &[Addr]) -> Vec<Addr> {
        let current = self.load();
        overlap_of(&current, covered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{prelude::SmallRng, Rng, SeedableRng};

    #[test]
    fn overlap_keeps_order_and_duplicates() {
        let set: UnderCoveredSet = [3, 5, 7].iter().copied().collect();
        assert_eq!(overlap_of(&set, &[7, 1, 3, 7, 4, 5]), vec![7, 3, 7, 5]);
    }

    #[test]
    fn no_overlap() {
        let set: UnderCoveredSet = [3, 5].iter().copied().collect();
        assert!(overlap_of(&set, &[1, 2, 4]).is_empty());
        assert!(overlap_of(&set, &[]).is_empty());
        assert!(overlap_of(&UnderCoveredSet::new(), &[3, 5]).is_empty());
    }

    #[test]
    fn find_overlap_reads_published_set() {
        let uc = UnderCovered::new();
        assert!(uc.find_overlap(&[1, 2, 3]).is_empty());

        uc.update([2, 3].iter().copied().collect());
        assert_eq!(uc.find_overlap(&[1, 2, 3, 2]), vec![2, 3, 2]);

        uc.update([1].iter().copied().collect());
        assert_eq!(uc.find_overlap(&[1, 2, 3, 2]), vec![1]);
    }

    #[test]
    fn overlap_is_ordered_subsequence() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        for _ in 0..100 {
            let set: UnderCoveredSet = (0..rng.gen_range(0..32))
                .map(|_| rng.gen_range(0..64))
                .collect();
            let covered = (0..rng.gen_range(0..128))
                .map(|_| rng.gen_range(0..64))
                .collect::<Vec<Addr>>();

            let overlap = overlap_of(&set, &covered);
            let expected = covered
                .iter()
                .copied()
                .filter(|a| set.contains(a))
                .collect::<Vec<_>>();
            assert_eq!(overlap, expected);
            assert!(overlap.iter().all(|a| set.contains(a)));
        }
    }
}
