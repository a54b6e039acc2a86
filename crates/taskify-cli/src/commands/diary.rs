use clap::Subcommand;
use taskify_core::{Config, DiaryEntry, Workspace};

use super::CommandResult;

#[derive(Subcommand)]
pub enum DiaryAction {
    /// Write a new entry dated now
    Write {
        /// Entry text
        content: String,
    },
    /// List entries, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an entry
    Delete { id: i64 },
}

fn print_entry(entry: &DiaryEntry) {
    let time = entry.timestamp.with_timezone(&chrono::Local).format("%H:%M");
    println!("{}  ({time}, id {})", entry.date, entry.id);
    for line in entry.content.lines() {
        println!("    {line}");
    }
}

pub fn run(action: DiaryAction, config: Config) -> CommandResult {
    let ws = Workspace::open(config);
    let mut diary = ws.diary()?;
    match action {
        DiaryAction::Write { content } => match diary.write(&content) {
            Some(entry) => println!("Entry saved: {}", entry.id),
            None => return Err("entry is empty".into()),
        },
        DiaryAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(diary.entries())?);
                return Ok(());
            }
            if diary.entries().is_empty() {
                println!("No entries yet.");
            }
            for entry in diary.entries() {
                print_entry(entry);
                println!();
            }
        }
        DiaryAction::Delete { id } => {
            if !diary.delete(id) {
                return Err(format!("entry not found: {id}").into());
            }
            println!("Entry deleted: {id}");
        }
    }
    Ok(())
}
