use clap::Subcommand;
use taskify_core::{Config, TaskFilter, TaskItem, Workspace};

use super::CommandResult;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task text
        text: String,
    },
    /// List tasks
    List {
        /// all, active or completed
        #[arg(long, default_value = "all")]
        filter: TaskFilter,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a task done, or not done again
    Toggle { id: i64 },
    /// Delete a task
    Delete { id: i64 },
}

fn print_item(item: &TaskItem) {
    let mark = if item.completed { "x" } else { " " };
    println!("{:>15}  [{mark}] {}", item.id, item.text);
}

pub fn run(action: TaskAction, config: Config) -> CommandResult {
    let ws = Workspace::open(config);
    let mut tasks = ws.tasks()?;
    match action {
        TaskAction::Add { text } => match tasks.add(&text) {
            Some(item) => println!("Task added: {}", item.id),
            None => return Err("task text is empty".into()),
        },
        TaskAction::List { filter, json } => {
            let items = tasks.filtered(filter);
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
                return Ok(());
            }
            if items.is_empty() {
                println!("No tasks.");
            }
            for item in &items {
                print_item(item);
            }
            let counts = tasks.counts();
            println!(
                "{} total, {} active, {} completed",
                counts.total, counts.active, counts.completed
            );
        }
        TaskAction::Toggle { id } => match tasks.toggle(id) {
            Some(item) => print_item(item),
            None => return Err(format!("task not found: {id}").into()),
        },
        TaskAction::Delete { id } => {
            if !tasks.delete(id) {
                return Err(format!("task not found: {id}").into());
            }
            println!("Task deleted: {id}");
        }
    }
    Ok(())
}
