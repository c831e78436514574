//! Guessing games played over the stored relations.
//!
//! Rounds hold no timers and do no I/O: the caller draws them from a
//! [`RelationStore`], shows their prompts, and feeds back the player's input.

use rand::Rng;

use crate::model::{Concept, Relation};
use crate::store::{load_concepts, pick_random_concept, pick_random_relation};
use crate::traits::RelationStore;

/// Points a guess-who round starts with; every revealed clue costs one.
pub const GUESS_WHO_START_POINTS: u32 = 8;

/// Placeholder shown instead of a hidden concept.
pub const HIDDEN: &str = "???";

/// Case-insensitive comparison against a concept's name or slug.
pub fn is_match(concept: &Concept, guess: &str) -> bool {
    let guess = guess.trim().to_lowercase();
    !guess.is_empty()
        && (guess == concept.name.to_lowercase() || guess == concept.id.replace('_', " "))
}

// ---------------------------------------------------------------------------
// Recall
// ---------------------------------------------------------------------------

/// "cat CapableOf ?": name as many ends of the relation as possible.
#[derive(Debug, Clone)]
pub struct RecallRound {
    relation: Relation,
    remaining: Vec<Concept>,
    found: Vec<Concept>,
}

impl RecallRound {
    /// Draw a random relation. Every stored relation with the same start and
    /// type contributes its end as a valid answer.
    pub fn draw<R: Rng + ?Sized>(store: &dyn RelationStore, rng: &mut R) -> Option<Self> {
        let relation = pick_random_relation(store, &|_| true, rng)?;
        let start = relation.start.full_id();
        let ends: Vec<String> = store
            .load(&|r| r.id == relation.id && r.start.full_id() == start)
            .iter()
            .map(|r| r.end.full_id())
            .collect();
        let remaining = load_concepts(store, &|c| ends.contains(&c.full_id()));

        Some(Self::new(relation, remaining))
    }

    pub fn new(relation: Relation, answers: Vec<Concept>) -> Self {
        Self {
            relation,
            remaining: answers,
            found: Vec::new(),
        }
    }

    pub fn prompt(&self) -> String {
        format!("{} {} {HIDDEN}", self.relation.start.name, self.relation.name)
    }

    /// Score `guess`; a correct answer can only be found once.
    pub fn guess(&mut self, guess: &str) -> bool {
        match self.remaining.iter().position(|c| is_match(c, guess)) {
            Some(index) => {
                self.found.push(self.remaining.remove(index));
                true
            }
            None => false,
        }
    }

    pub fn points(&self) -> u32 {
        self.found.len() as u32
    }

    pub fn remaining(&self) -> &[Concept] {
        &self.remaining
    }

    pub fn is_complete(&self) -> bool {
        self.remaining.is_empty()
    }
}

// ---------------------------------------------------------------------------
// True / false
// ---------------------------------------------------------------------------

/// "cat IsA ? animal": decide whether the shown statement is stored as fact.
#[derive(Debug, Clone)]
pub struct TrueFalseRound {
    shown: Relation,
    expected: bool,
}

impl TrueFalseRound {
    /// Draw a relation and, by a coin flip, show either its real end or some
    /// other stored concept.
    pub fn draw<R: Rng + ?Sized>(store: &dyn RelationStore, rng: &mut R) -> Option<Self> {
        let relation = pick_random_relation(store, &|_| true, rng)?;
        let end = relation.end.full_id();
        let show_real = rng.gen_bool(0.5);

        let end_concept = if show_real {
            None
        } else {
            pick_random_concept(store, &|c| c.full_id() != end, rng)
        };
        let shown = match end_concept {
            Some(concept) => Relation { end: concept, ..relation },
            None => relation,
        };
        let shown_id = shown.full_id();
        let expected = !store.load(&|r| r.full_id() == shown_id).is_empty();

        Some(Self { shown, expected })
    }

    pub fn new(shown: Relation, expected: bool) -> Self {
        Self { shown, expected }
    }

    pub fn prompt(&self) -> String {
        format!(
            "{} {} ? {}",
            self.shown.start.name, self.shown.name, self.shown.end.name
        )
    }

    pub fn expected(&self) -> bool {
        self.expected
    }

    pub fn check(&self, answer: bool) -> bool {
        answer == self.expected
    }
}

/// Parse a true/false answer.
pub fn parse_answer(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "vrai" | "oui" => Some(true),
        "false" | "f" | "no" | "n" | "faux" | "non" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Guess who
// ---------------------------------------------------------------------------

/// Which endpoint of a clue is hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Start,
    End,
}

/// A relation shown with the concept to guess redacted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clue {
    pub relation: Relation,
    pub hidden: Side,
}

impl Clue {
    pub fn for_concept(relation: Relation, concept: &Concept) -> Self {
        let hidden = if relation.start.full_id() == concept.full_id() {
            Side::Start
        } else {
            Side::End
        };
        Self { relation, hidden }
    }

    pub fn display(&self) -> String {
        match self.hidden {
            Side::Start => format!("{HIDDEN} {} {}", self.relation.name, self.relation.end.name),
            Side::End => format!("{} {} {HIDDEN}", self.relation.start.name, self.relation.name),
        }
    }
}

/// Guess a concept from clues revealed one at a time.
#[derive(Debug, Clone)]
pub struct GuessWhoRound {
    concept: Concept,
    clues: Vec<Clue>,
    revealed: usize,
    solved: bool,
}

impl GuessWhoRound {
    /// Draw a random concept; every stored relation touching it is a clue.
    pub fn draw<R: Rng + ?Sized>(store: &dyn RelationStore, rng: &mut R) -> Option<Self> {
        let concept = pick_random_concept(store, &|_| true, rng)?;
        let relations = store.load(&|r| r.touches(&concept));
        Some(Self::new(concept, relations))
    }

    pub fn new(concept: Concept, relations: Vec<Relation>) -> Self {
        let clues = relations
            .into_iter()
            .map(|r| Clue::for_concept(r, &concept))
            .collect();
        Self {
            concept,
            clues,
            revealed: 0,
            solved: false,
        }
    }

    /// Reveal the next clue, if any remain.
    pub fn reveal(&mut self) -> Option<&Clue> {
        if self.solved {
            return None;
        }
        let clue = self.clues.get(self.revealed)?;
        self.revealed += 1;
        Some(clue)
    }

    pub fn revealed(&self) -> &[Clue] {
        &self.clues[..self.revealed]
    }

    pub fn guess(&mut self, guess: &str) -> bool {
        if is_match(&self.concept, guess) {
            self.solved = true;
        }
        self.solved
    }

    pub fn points(&self) -> u32 {
        if self.solved {
            GUESS_WHO_START_POINTS.saturating_sub(self.revealed as u32)
        } else {
            0
        }
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// No clue left to reveal.
    pub fn is_exhausted(&self) -> bool {
        self.revealed >= self.clues.len()
    }

    pub fn answer(&self) -> &Concept {
        &self.concept
    }
}
