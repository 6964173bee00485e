//! Sentence blanks
//!
//! One or two words of a lesson sentence are hidden and the learner types
//! them back. Backs the `blank_{i}` mastery flag.

use rand::seq::index;
use rand::Rng;

use crate::practice::fill_blanks::BLANK;

/// A sentence with some words hidden
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlankedSentence {
    /// Sentence with each hidden word replaced by the blank
    pub text: String,
    pub original: String,
    /// Hidden words in sentence order
    pub missing: Vec<String>,
}

impl BlankedSentence {
    pub fn has_blanks(&self) -> bool {
        !self.missing.is_empty()
    }

    /// Compare typed words with the hidden ones
    ///
    /// Words are matched in order, ignoring case and surrounding
    /// punctuation.
    pub fn check(&self, answer: &str) -> bool {
        let typed: Vec<String> = answer.split_whitespace().map(normalize).collect();
        typed.len() == self.missing.len()
            && typed
                .iter()
                .zip(&self.missing)
                .all(|(typed, missing)| *typed == normalize(missing))
    }
}

fn normalize(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// Hide one or two random words of `sentence`
///
/// Sentences of fewer than two words are returned without blanks.
pub fn create_blanks<R: Rng + ?Sized>(sentence: &str, rng: &mut R) -> BlankedSentence {
    let words: Vec<&str> = sentence.split(' ').collect();
    if words.len() < 2 {
        return BlankedSentence {
            text: sentence.to_string(),
            original: sentence.to_string(),
            missing: Vec::new(),
        };
    }

    let count = rng.gen_range(1..=2usize).min(words.len());
    let mut hidden = index::sample(rng, words.len(), count).into_vec();
    hidden.sort_unstable();

    let missing = hidden.iter().map(|&i| words[i].to_string()).collect();
    let text = words
        .iter()
        .enumerate()
        .map(|(i, word)| if hidden.contains(&i) { BLANK } else { *word })
        .collect::<Vec<_>>()
        .join(" ");

    BlankedSentence {
        text,
        original: sentence.to_string(),
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Put the missing words back into the blanks
    fn fill(blanked: &BlankedSentence) -> String {
        let mut missing = blanked.missing.iter();
        blanked
            .text
            .split(' ')
            .map(|word| {
                if word == BLANK {
                    missing.next().map(String::as_str).unwrap_or(word)
                } else {
                    word
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_create_blanks_hides_one_or_two_words() {
        let sentence = "Ik woon al drie jaar in Amsterdam.";
        let mut counts = [0usize; 3];

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let blanked = create_blanks(sentence, &mut rng);

            assert!(blanked.has_blanks());
            assert!(blanked.missing.len() <= 2);
            assert_eq!(blanked.text.matches(BLANK).count(), blanked.missing.len());
            assert_eq!(blanked.original, sentence);
            assert_eq!(fill(&blanked), sentence);
            counts[blanked.missing.len()] += 1;
        }

        assert!(counts[1] > 0);
        assert!(counts[2] > 0);
    }

    #[test]
    fn test_create_blanks_is_seeded() {
        let sentence = "De kat slaapt op de bank.";
        let a = create_blanks(sentence, &mut StdRng::seed_from_u64(3));
        let b = create_blanks(sentence, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_short_sentence_has_no_blanks() {
        let mut rng = StdRng::seed_from_u64(1);
        let blanked = create_blanks("Hallo!", &mut rng);
        assert!(!blanked.has_blanks());
        assert_eq!(blanked.text, "Hallo!");
    }

    #[test]
    fn test_check_answer() {
        let blanked = BlankedSentence {
            text: "Ik woon in _____ _____".to_string(),
            original: "Ik woon in mooi Amsterdam.".to_string(),
            missing: vec!["mooi".to_string(), "Amsterdam.".to_string()],
        };

        assert!(blanked.check("mooi amsterdam"));
        assert!(blanked.check("  Mooi   Amsterdam. "));
        assert!(!blanked.check("Amsterdam mooi"));
        assert!(!blanked.check("mooi"));
        assert!(!blanked.check(""));
    }
}
