//! CLI implementation of SlotSelector for choosing which paused game to drop

use std::io::{self, BufRead, Write};

use wordle_store::SlotSelector;

/// Asks on stdin which session slot to give up
pub struct CliSlotSelector;

#[derive(Debug, PartialEq, Eq)]
enum Choice {
    Slot(usize),
    Cancel,
    Invalid,
}

fn parse_choice(line: &str, slots: usize) -> Choice {
    let line = line.trim();
    if line.is_empty() {
        return Choice::Cancel;
    }
    match line.parse::<usize>() {
        Ok(n) if (1..=slots).contains(&n) => Choice::Slot(n - 1),
        _ => Choice::Invalid,
    }
}

impl SlotSelector for CliSlotSelector {
    fn select_victim(&self, occupied: &[String]) -> Option<String> {
        println!("Storage full ({0}/{0}). Replace which saved game?", occupied.len());
        for (i, name) in occupied.iter().enumerate() {
            println!("  {}) {}", i + 1, name);
        }

        loop {
            print!("Slot number (empty to discard this game): ");
            io::stdout().flush().ok();
            let mut line = String::new();
            match io::stdin().lock().read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(_) => {
                    eprintln!("Failed to read input, please try again");
                    continue;
                }
            }
            match parse_choice(&line, occupied.len()) {
                Choice::Slot(index) => return Some(occupied[index].clone()),
                Choice::Cancel => return None,
                Choice::Invalid => eprintln!("Invalid slot, please try again"),
            }
        }
    }
}
