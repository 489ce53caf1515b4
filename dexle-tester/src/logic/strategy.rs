use dexle_game::{Catalog, Entity, Session, compare};
use rand::Rng;

/// How the automated player picks its next guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessStrategy {
    /// Any entity not yet guessed, uniformly
    Random,
    /// First entity consistent with every report so far
    Eliminator,
}

impl GuessStrategy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Eliminator => "eliminator",
        }
    }

    /// Next guess for `session`, or `None` when nothing is left to try.
    pub fn next_guess<'c, R: Rng + ?Sized>(
        self,
        catalog: &'c Catalog,
        session: &Session,
        rng: &mut R,
    ) -> Option<&'c Entity> {
        match self {
            Self::Random => {
                let open: Vec<&Entity> = catalog
                    .iter()
                    .filter(|entity| !session.has_guessed(&entity.name))
                    .collect();
                if open.is_empty() {
                    None
                } else {
                    Some(open[rng.gen_range(0..open.len())])
                }
            }
            Self::Eliminator => candidates(catalog, session).into_iter().next(),
        }
    }
}

/// Unguessed entities that would have produced exactly the reports seen so far.
#[must_use]
pub fn candidates<'c>(catalog: &'c Catalog, session: &Session) -> Vec<&'c Entity> {
    let reports = session.reports();
    catalog
        .iter()
        .filter(|candidate| !session.has_guessed(&candidate.name))
        .filter(|candidate| {
            reports
                .iter()
                .all(|(guess, report)| compare(guess, candidate) == *report)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dexle_game::GameMode;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn eliminator_keeps_the_target_in_play() {
        let catalog = Catalog::bundled().unwrap();
        let target = catalog.find("Dragonite").unwrap().clone();
        let mut session = Session::with_target(GameMode::FreePlay, target, None);
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        while !session.is_over() {
            let remaining = candidates(&catalog, &session);
            assert!(remaining.iter().any(|e| e.name == "Dragonite"));
            let guess = GuessStrategy::Eliminator
                .next_guess(&catalog, &session, &mut rng)
                .unwrap()
                .name
                .clone();
            session.submit_guess(&catalog, &guess).unwrap();
        }
        assert!(session.is_won());
        assert!(session.attempt_count() < 10);
    }

    #[test]
    fn labels_name_each_strategy() {
        assert_eq!(GuessStrategy::Random.label(), "random");
        assert_eq!(GuessStrategy::Eliminator.label(), "eliminator");
    }

    #[test]
    fn random_never_repeats() {
        let catalog = Catalog::bundled().unwrap();
        let target = catalog.find("Mew").unwrap().clone();
        let mut session = Session::with_target(GameMode::FreePlay, target, None);
        let mut rng = ChaCha20Rng::seed_from_u64(99);
        while let Some(guess) = GuessStrategy::Random.next_guess(&catalog, &session, &mut rng) {
            let name = guess.name.clone();
            session.submit_guess(&catalog, &name).unwrap();
            if session.is_over() {
                break;
            }
        }
        assert!(session.is_won());
        assert!(session.attempt_count() as usize <= catalog.len());
    }
}
