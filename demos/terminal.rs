//! Line-based terminal front-end.
//!
//! Wraps the shared session orchestrator behind the `TableIo` capability
//! trait; all rules flow lives in the library. Type `quit` at any prompt to
//! abort the current round and end the session.

use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use twentyone::{
    Action, GameSettings, HandSnapshot, HandStatus, Player, RoundRecord, Session, TableEvent,
    TableIo, load_settings, store,
};

const RULES_FILE: &str = "blackjack-rules.json";

struct Terminal;

impl TableIo for Terminal {
    fn prompt_bet(&mut self, player: &Player, min_bet: u32, max_bet: u32) -> Option<u32> {
        loop {
            let input = prompt_line(&format!(
                "{} (Stack: ${}) - Enter bet (${min_bet}-${max_bet}): ",
                player.name, player.current_stack_size
            ));
            if input == "quit" || input == "q" {
                return None;
            }
            match input.parse::<u32>() {
                Ok(amount) => return Some(amount),
                Err(_) => println!("Please enter a valid number"),
            }
        }
    }

    fn prompt_action(&mut self, hand: &HandSnapshot, legal: &[Action]) -> Option<Action> {
        println!(
            "\nHand: {} | value {}{}",
            format_cards(&hand.cards),
            hand.value.total,
            if hand.value.soft { " (soft)" } else { "" }
        );
        println!("Actions: {}", format_actions(legal));

        loop {
            let input = prompt_line("Action: ");
            let action = match input.as_str() {
                "h" | "hit" => Action::Hit,
                "s" | "stand" => Action::Stand,
                "d" | "double" => Action::Double,
                "p" | "split" => Action::Split,
                "u" | "surrender" => Action::Surrender,
                "q" | "quit" => return None,
                _ => {
                    println!("Unknown action.");
                    continue;
                }
            };
            if legal.contains(&action) {
                return Some(action);
            }
            println!("That action is not available for this hand.");
        }
    }

    fn render(&mut self, event: TableEvent<'_>) {
        match event {
            TableEvent::Reshuffled => println!("Shuffling the shoe..."),
            TableEvent::Dealt(snapshot) => {
                println!("\nDealer shows: {}", snapshot.dealer_up);
                for hand in &snapshot.hands {
                    println!(
                        "Your cards: {} | value {}",
                        format_cards(&hand.cards),
                        hand.value.total
                    );
                    if hand.status == HandStatus::Blackjack {
                        println!("Blackjack!");
                    }
                }
            }
            TableEvent::HandUpdated(hand) => {
                println!(
                    "Hand: {} | value {} | {}",
                    format_cards(&hand.cards),
                    hand.value.total,
                    status_label(hand.status)
                );
            }
            TableEvent::BetRejected(err) => println!("Bet rejected: {err}"),
            TableEvent::Resolved(record) => print_results(record),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("Welcome to Blackjack! (type 'quit' at any prompt to stop)");

    let settings = match load_table_settings() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Error loading game settings: {err}");
            std::process::exit(1);
        }
    };

    let name = prompt_line("Enter your name: ");
    let name = if name.is_empty() { "Player".to_owned() } else { name };
    let player = Player::new("player1", name, 10_000);
    let min_bet = settings.min_bet;

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let mut session = match Session::new(settings, vec![player], seed) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("Error starting session: {err}");
            std::process::exit(1);
        }
    };

    println!(
        "\nHello {}! You start with ${}",
        session.players()[0].name, session.players()[0].current_stack_size
    );

    let mut terminal = Terminal;
    loop {
        if session.players()[0].current_stack_size < i64::from(min_bet) {
            println!("You can no longer cover the minimum bet. Session over.");
            break;
        }

        match session.play_round(&mut terminal) {
            Ok(true) => {
                let answer = prompt_line("\nPlay another hand? (y/n): ");
                if answer != "y" && answer != "yes" {
                    break;
                }
            }
            Ok(false) => break,
            Err(err) => {
                eprintln!("Round error: {err}");
                break;
            }
        }
    }

    let summary = session.end_session();
    println!("\n=== FINAL RESULTS ===");
    for player in &summary.record.players {
        let net = player.current_stack_size - player.starting_stack_size;
        println!(
            "{}: ${} -> ${} ({}${})",
            player.name,
            player.starting_stack_size,
            player.current_stack_size,
            if net >= 0 { "+" } else { "-" },
            net.abs()
        );
    }

    let filename = format!("{}.json", summary.record.session_id);
    match store::save_session(&summary.record, &filename) {
        Ok(()) => println!("Session saved to {filename}"),
        Err(err) => eprintln!("Failed to save session: {err}"),
    }
}

fn load_table_settings() -> Result<GameSettings, twentyone::SettingsError> {
    if let Some(path) = std::env::args().nth(1) {
        return load_settings(path);
    }
    if Path::new(RULES_FILE).exists() {
        return load_settings(RULES_FILE);
    }
    Ok(GameSettings::default())
}

fn prompt_line(prompt: &str) -> String {
    print!("{prompt}");
    let _ = io::stdout().flush();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return String::new();
    }
    input.trim().to_lowercase()
}

fn format_cards(cards: &[twentyone::Card]) -> String {
    cards
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_actions(legal: &[Action]) -> String {
    legal
        .iter()
        .map(|action| match action {
            Action::Hit => "[h]it",
            Action::Stand => "[s]tand",
            Action::Double => "[d]ouble",
            Action::Split => "s[p]lit",
            Action::Surrender => "s[u]rrender",
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn status_label(status: HandStatus) -> &'static str {
    match status {
        HandStatus::Active => "active",
        HandStatus::Stand => "standing",
        HandStatus::Bust => "BUST",
        HandStatus::Blackjack => "BLACKJACK",
        HandStatus::Surrendered => "surrendered",
    }
}

fn print_results(record: &RoundRecord) {
    println!("\n=== HAND RESULTS ===");
    println!(
        "Dealer: {} ({}){}",
        format_cards(&record.dealer.final_hand),
        record.dealer.hand_value,
        if record.dealer.busted { " BUST" } else { "" }
    );

    for action in &record.player_actions {
        for hand in &action.hands {
            println!(
                "  {} ({}) {:?} | bet ${}, payout ${}",
                format_cards(&hand.cards),
                hand.final_value,
                hand.outcome,
                action.bet,
                hand.payout
            );
        }
        println!(
            "  Total bet ${}, payout ${}, net {}${}",
            action.total_bet,
            action.total_payout,
            if action.net_result >= 0 { "+" } else { "-" },
            action.net_result.abs()
        );
    }
}
