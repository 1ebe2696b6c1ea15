//! Word catalog.
//!
//! A plain-text file, one category per line:
//!
//! ```text
//! Animals|6|tiger,horse,camel
//! Food|5|bread,apple
//! ```
//!
//! The middle field is the number of guesses allowed for that category.

use std::fs;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::config::game::STANDARD_GUESSES;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    /// Guesses allowed
    pub difficulty: u32,
    pub words: Vec<String>,
}

/// A word chosen for a round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPick {
    pub category: Option<String>,
    pub word: String,
    pub max_guesses: u32,
}

#[derive(Debug, Clone, Default)]
pub struct WordCatalog {
    categories: Vec<Category>,
}

impl WordCatalog {
    /// Load the catalog at `path`. A missing file is an empty catalog.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                let err = Error::from(e);
                if err.is_not_found() {
                    debug!("Word catalog {} not found", path.display());
                    return Ok(Self::default());
                }
                return Err(err);
            }
        };
        let catalog = Self::parse(&text);
        debug!(
            "Loaded {} categories from {}",
            catalog.categories.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn parse(text: &str) -> Self {
        let mut catalog = Self::default();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let fields: Vec<&str> = line.split('|').collect();
            let [name, difficulty, words] = fields.as_slice() else {
                warn!("Skipping malformed catalog line: {:?}", line);
                continue;
            };

            let words: Vec<String> = words
                .split(',')
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect();
            if words.is_empty() {
                warn!("Category {} has no words, skipping", name);
                continue;
            }

            let category = Category {
                name: name.to_string(),
                difficulty: difficulty.trim().parse().unwrap_or(STANDARD_GUESSES),
                words,
            };
            match catalog.categories.iter_mut().find(|c| c.name == category.name) {
                Some(existing) => *existing = category,
                None => catalog.categories.push(category),
            }
        }
        catalog
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    fn all_words(&self) -> Vec<&String> {
        self.categories.iter().flat_map(|c| c.words.iter()).collect()
    }

    /// Random word from `category`, with that category's guess allowance.
    pub fn random_word<R: Rng + ?Sized>(&self, category: &str, rng: &mut R) -> Option<WordPick> {
        let category = self.get(category)?;
        let word = category.words.choose(rng)?;
        Some(WordPick {
            category: Some(category.name.clone()),
            word: word.to_uppercase(),
            max_guesses: category.difficulty,
        })
    }

    /// Random category, then a random word from it.
    pub fn random_mix<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<WordPick> {
        let category = self.categories.choose(rng)?;
        self.random_word(&category.name, rng)
    }

    /// Random word from any category, with the standard guess allowance.
    pub fn standard_word<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<WordPick> {
        let word = self.all_words().choose(rng)?.to_uppercase();
        Some(WordPick {
            category: None,
            word,
            max_guesses: STANDARD_GUESSES,
        })
    }

    /// The same word for every call on the same day.
    pub fn daily_word(&self, date: NaiveDate) -> Option<WordPick> {
        let mut rng = StdRng::seed_from_u64(date.num_days_from_ce() as u64);
        self.standard_word(&mut rng)
    }
}
