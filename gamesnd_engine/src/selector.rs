use gamesnd_formats::CycleType;
use rand::Rng;

use crate::definition::SoundDefinition;

/// Picks the entry to play next and records it as the last one played.
///
/// Panics if the definition has no entries; every definition built from a
/// table carries at least one.
pub fn choose_entry<R: Rng + ?Sized>(definition: &mut SoundDefinition, rng: &mut R) -> usize {
    let count = definition.entries().len();
    assert!(
        count > 0,
        "sound '{}' has no entries to choose from",
        definition.name()
    );

    let index = match definition.cycle {
        _ if count == 1 => 0,
        CycleType::Random => rng.gen_range(0..count),
        CycleType::Sequential => match definition.last_entry() {
            None => 0,
            Some(last) => (last + 1) % count,
        },
    };
    definition.set_last_entry(index);
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sequential_starts_at_zero_and_wraps() {
        let mut definition =
            SoundDefinition::soundset("Laser", ["a.wav", "b.wav", "c.wav"], CycleType::Sequential);
        let mut rng = StdRng::seed_from_u64(7);
        let picks: Vec<_> = (0..7)
            .map(|_| choose_entry(&mut definition, &mut rng))
            .collect();
        assert_eq!(picks, [0, 1, 2, 0, 1, 2, 0]);
        assert_eq!(definition.last_entry(), Some(0));
    }

    #[test]
    fn random_stays_in_bounds_and_covers_entries() {
        let mut definition =
            SoundDefinition::soundset("Hit", ["a.wav", "b.wav", "c.wav", "d.wav"], CycleType::Random);
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 4];
        for _ in 0..500 {
            let index = choose_entry(&mut definition, &mut rng);
            assert!(index < 4);
            assert_eq!(definition.last_entry(), Some(index));
            seen[index] = true;
        }
        assert!(seen.iter().all(|&hit| hit));
    }

    #[test]
    fn single_entry_always_returns_zero() {
        let mut definition = SoundDefinition::new("Click", "click.wav");
        definition.cycle = CycleType::Random;
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10 {
            assert_eq!(choose_entry(&mut definition, &mut rng), 0);
        }
    }

    #[test]
    #[should_panic(expected = "no entries")]
    fn empty_definition_panics() {
        let mut definition = SoundDefinition::blank("Empty");
        choose_entry(&mut definition, &mut StdRng::seed_from_u64(0));
    }
}
