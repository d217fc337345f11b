//! Headless mode for the drafting studio.
//!
//! This module provides a simple line-oriented interface for driving the
//! studio without a TUI. It's designed for scripts and automated testing.

use novelist_core::{Genre, SessionConfig, StudioSession};
use std::io::{self, BufRead};

/// Run the studio in headless mode.
///
/// Protocol:
/// - Lines starting with `#` are commands (status, save, export, quit, ...)
/// - All other lines are appended to the manuscript as-is
pub async fn run_headless(config: SessionConfig) -> io::Result<()> {
    let mut session = StudioSession::open(config).await;

    println!("=== Novelist Headless Mode ===");
    print_status(&session);
    println!();
    println!("Commands:");
    print_help();
    println!();
    println!("Everything else is appended to the manuscript (one line at a time):");
    println!();

    let stdin = io::stdin();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };

        let line = line.trim_end();
        if line.trim().is_empty() {
            continue;
        }

        // Handle commands
        if let Some(rest) = line.strip_prefix('#') {
            let (command, arg) = match rest.trim().split_once(char::is_whitespace) {
                Some((c, a)) => (c, a.trim()),
                None => (rest.trim(), ""),
            };

            match command {
                "quit" | "exit" => {
                    println!("Goodbye!");
                    break;
                }
                "save" => {
                    let stamp = session.save();
                    println!("[SAVED] Snapshot written at {stamp}");
                }
                "export" => match session.export().await {
                    Ok(path) => println!("[EXPORTED] {}", path.display()),
                    Err(e) => println!("[ERROR] Export failed: {e}"),
                },
                "status" => print_status(&session),
                "title" => {
                    session.set_title(arg);
                    println!("[OK] Title set to '{arg}'");
                }
                "genre" => match Genre::from_name(arg) {
                    Some(genre) => match session.set_genre(genre) {
                        Ok(()) => println!("[OK] Genre set to {}", genre.name()),
                        Err(e) => println!("[ERROR] {e}"),
                    },
                    None => println!("[ERROR] Unknown genre '{arg}'"),
                },
                "genres" => {
                    let names: Vec<_> = session
                        .selectable_genres()
                        .iter()
                        .map(|g| g.name())
                        .collect();
                    println!("[GENRES] {}", names.join(", "));
                }
                "char" => handle_char_command(&mut session, arg),
                "notes" => {
                    session.set_world_notes(arg);
                    println!("[OK] World notes updated");
                }
                "verify-age" => {
                    session.verify_age();
                    println!("[OK] Age verified");
                }
                "decline-age" => {
                    session.decline_age();
                    println!("[OK] Adult content off, age verification cleared");
                }
                "adult" => match arg {
                    "on" if session.draft().age_verified => {
                        session.set_adult_content(true);
                        println!("[OK] Adult genres unlocked");
                    }
                    "on" => println!("[ERROR] Run #verify-age first"),
                    "off" => {
                        session.set_adult_content(false);
                        println!("[OK] Adult genres hidden");
                    }
                    _ => println!("[ERROR] Usage: #adult on|off"),
                },
                "key" => {
                    if arg.is_empty() {
                        println!("[ERROR] Usage: #key <value>");
                    } else {
                        session.set_api_key(arg);
                        println!("[OK] API key stored in settings");
                    }
                }
                "suggest" => match session.request_suggestion().await {
                    Ok(suggestion) => {
                        session.accept_suggestion(&suggestion);
                        println!("[MUSE] {}", suggestion.text);
                    }
                    Err(e) => println!("[ERROR] Suggestion failed: {e}"),
                },
                "cover" => match session.generate_cover().await {
                    Ok(id) => println!("[COVER] Image {id} attached"),
                    Err(e) => println!("[ERROR] Cover generation failed: {e}"),
                },
                "body" => println!("{}", session.body()),
                "help" => print_help(),
                other => println!("[ERROR] Unknown command: #{other}"),
            }
            continue;
        }

        // Plain text: append as a manuscript line
        if !session.body().is_empty() {
            session.append_body("\n");
        }
        session.append_body(line);
        println!("[OK] {} chars", session.body().chars().count());
    }

    Ok(())
}

fn handle_char_command(session: &mut StudioSession, arg: &str) {
    let (action, rest) = match arg.split_once(char::is_whitespace) {
        Some((a, r)) => (a, r.trim()),
        None => (arg, ""),
    };

    match action {
        "add" => {
            let (name, bio) = match rest.split_once(';') {
                Some((n, b)) => (n.trim(), b.trim()),
                None => (rest, ""),
            };
            match session.add_character(name, bio) {
                Ok(id) => println!("[OK] Added '{name}' (id {id})"),
                Err(e) => println!("[ERROR] {e}"),
            }
        }
        "rm" => match rest.parse::<u64>() {
            Ok(raw) => match session.remove_character(novelist_core::CharacterId(raw)) {
                Ok(()) => println!("[OK] Removed character {raw}"),
                Err(e) => println!("[ERROR] {e}"),
            },
            Err(_) => println!("[ERROR] Usage: #char rm <id>"),
        },
        "list" | "" => {
            for character in session.characters() {
                println!("[CHAR] {} [{}] {}", character.name, character.id, character.bio);
            }
        }
        _ => println!("[ERROR] Usage: #char add <name> [; bio] | #char rm <id> | #char list"),
    }
}

fn print_status(session: &StudioSession) {
    let draft = session.draft();
    println!("[STATUS]");
    println!("  Title: {} ({})", draft.title, draft.genre.name());
    println!("  Manuscript: {} chars", draft.body.chars().count());
    println!("  Characters: {}", draft.characters.len());
    println!("  Images: {}", draft.images.len());
    println!(
        "  Content: age_verified={} adult_content={}",
        draft.age_verified, draft.adult_content
    );
    match session.key_source() {
        Some(source) => println!("  API key: from {source}"),
        None => println!("  API key: not set"),
    }
    match session.last_saved() {
        Some(stamp) => println!("  Last saved: {stamp}"),
        None => println!("  Last saved: never"),
    }
}

fn print_help() {
    println!("  #status        - Show draft status");
    println!("  #save          - Persist a snapshot");
    println!("  #export        - Write the text artifact");
    println!("  #title <t>     - Set the title");
    println!("  #genre <g>     - Set the genre (#genres lists options)");
    println!("  #char add <name> [; bio] | #char rm <id> | #char list");
    println!("  #notes <text>  - Set world notes");
    println!("  #verify-age / #decline-age / #adult on|off");
    println!("  #key <value>   - Store an API key in settings");
    println!("  #suggest       - Ask the muse to continue the draft");
    println!("  #cover         - Generate and attach a cover image");
    println!("  #body          - Print the manuscript");
    println!("  #quit          - Exit");
}
