//! Letter-by-letter feedback for a guess.

use std::collections::HashMap;

use serde::Serialize;
use strum::{Display, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display, IntoStaticStr,
)]
pub enum LetterStatus {
    #[strum(serialize = "-")]
    Absent,
    #[strum(serialize = "?")]
    Present,
    #[strum(serialize = "*")]
    Correct,
}

/// Compare `guess` against `target`, position by position.
///
/// Exact matches are marked first and consume their letter, so a repeated
/// letter in the guess is only marked present while unmatched copies remain
/// in the target. Comparison is case-insensitive. Positions past the end of
/// the target are absent.
pub fn evaluate_guess(guess: &str, target: &str) -> Vec<LetterStatus> {
    let guess: Vec<char> = guess.chars().map(|c| c.to_ascii_uppercase()).collect();
    let target: Vec<char> = target.chars().map(|c| c.to_ascii_uppercase()).collect();

    let mut remaining: HashMap<char, usize> = HashMap::new();
    for &ch in &target {
        *remaining.entry(ch).or_insert(0) += 1;
    }

    let mut result = vec![LetterStatus::Absent; guess.len()];

    for (i, &ch) in guess.iter().enumerate() {
        if target.get(i) == Some(&ch) {
            result[i] = LetterStatus::Correct;
            if let Some(count) = remaining.get_mut(&ch) {
                *count -= 1;
            }
        }
    }

    for (i, &ch) in guess.iter().enumerate() {
        if result[i] == LetterStatus::Correct {
            continue;
        }
        if let Some(count) = remaining.get_mut(&ch).filter(|c| **c > 0) {
            result[i] = LetterStatus::Present;
            *count -= 1;
        }
    }

    result
}

pub fn is_solved(feedback: &[LetterStatus]) -> bool {
    !feedback.is_empty() && feedback.iter().all(|s| *s == LetterStatus::Correct)
}

/// Best status seen so far for each letter across `guesses`, for a keyboard
/// overview.
pub fn letter_summary(guesses: &[String], target: &str) -> HashMap<char, LetterStatus> {
    let mut summary: HashMap<char, LetterStatus> = HashMap::new();
    for guess in guesses {
        for (ch, status) in guess
            .chars()
            .map(|c| c.to_ascii_uppercase())
            .zip(evaluate_guess(guess, target))
        {
            let best = summary.entry(ch).or_insert(status);
            *best = (*best).max(status);
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use LetterStatus::*;

    #[test]
    fn test_exact_match() {
        let feedback = evaluate_guess("CRANE", "CRANE");
        assert!(is_solved(&feedback));
    }

    #[test]
    fn test_mixed_feedback() {
        assert_eq!(
            evaluate_guess("SLATE", "PLANT"),
            vec![Absent, Correct, Correct, Present, Absent]
        );
    }

    #[test]
    fn test_repeated_letters_consume_counts() {
        assert_eq!(
            evaluate_guess("LLAMA", "ALLOY"),
            vec![Present, Correct, Present, Absent, Absent]
        );
        assert_eq!(
            evaluate_guess("EERIE", "THREE"),
            vec![Present, Absent, Correct, Absent, Correct]
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert!(is_solved(&evaluate_guess("crane", "CRANE")));
    }

    #[test]
    fn test_letter_summary_keeps_best() {
        let guesses = vec!["SLATE".to_string(), "PLANT".to_string()];
        let summary = letter_summary(&guesses, "PLANT");
        assert_eq!(summary[&'A'], Correct);
        assert_eq!(summary[&'S'], Absent);
        assert_eq!(summary[&'T'], Correct);
    }

    #[test]
    fn test_status_symbols() {
        assert_eq!(Correct.to_string(), "*");
        let s: &'static str = Present.into();
        assert_eq!(s, "?");
    }
}
