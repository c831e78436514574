//! The game commands: `recall`, `true-false` and `guess-who`.
//!
//! Rounds are drawn from the saved relations; answers are read line by line
//! from stdin.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};

use conceptquiz_client::config::load_config_from;
use conceptquiz_core::quiz::{parse_answer, GuessWhoRound, RecallRound, TrueFalseRound};
use conceptquiz_core::store::JsonFileStore;

const NOTHING_SAVED: &str = "no relations saved. Run `conceptquiz search <term>` first";

fn open_store(config_path: Option<PathBuf>) -> Result<JsonFileStore> {
    load_config_from(config_path.as_deref())?.store()
}

fn read_lines() -> impl Iterator<Item = String> {
    std::io::stdin().lock().lines().map_while(Result::ok)
}

pub fn recall(config_path: Option<PathBuf>) -> Result<()> {
    let store = open_store(config_path)?;
    let mut round =
        RecallRound::draw(&store, &mut rand::thread_rng()).context(NOTHING_SAVED)?;

    println!("{}", round.prompt());
    println!("Type one answer per line, an empty line to stop.");

    for line in read_lines() {
        if line.trim().is_empty() {
            break;
        }
        if round.guess(&line) {
            println!("Good job! That's a correct guess.");
            if round.is_complete() {
                break;
            }
        } else {
            println!("That's not it.");
        }
    }

    println!("You made {} point(s).", round.points());
    if !round.is_complete() {
        let remaining: Vec<&str> = round.remaining().iter().map(|c| c.name.as_str()).collect();
        println!("Remaining valid answers were: {}", remaining.join(", "));
    }

    Ok(())
}

pub fn true_false(config_path: Option<PathBuf>) -> Result<()> {
    let store = open_store(config_path)?;
    let round = TrueFalseRound::draw(&store, &mut rand::thread_rng()).context(NOTHING_SAVED)?;

    println!("{}", round.prompt());
    println!("Answer true or false.");

    for line in read_lines() {
        let Some(answer) = parse_answer(&line) else {
            println!("Please answer true or false.");
            continue;
        };
        if round.check(answer) {
            println!("Good job! That's the correct guess.");
        } else {
            println!("That's not it. The answer was {}.", round.expected());
        }
        return Ok(());
    }

    println!("No answer given. The answer was {}.", round.expected());
    Ok(())
}

pub fn guess_who(config_path: Option<PathBuf>) -> Result<()> {
    let store = open_store(config_path)?;
    let mut round = GuessWhoRound::draw(&store, &mut rand::thread_rng()).context(NOTHING_SAVED)?;

    println!("Who am I? An empty line reveals another clue.");
    if let Some(clue) = round.reveal() {
        println!("  {}", clue.display());
    }

    for line in read_lines() {
        if line.trim().is_empty() {
            match round.reveal() {
                Some(clue) => println!("  {}", clue.display()),
                None => break,
            }
            continue;
        }
        if round.guess(&line) {
            println!("Good job! That's a correct guess.");
            break;
        }
        println!("That's not it.");
    }

    println!("You made {} point(s).", round.points());
    if !round.is_solved() {
        println!("It was: {}", round.answer().name);
    }

    Ok(())
}
