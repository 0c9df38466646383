//! Task management commands for CLI.

use clap::Subcommand;
use gardentodo_core::{compute_progress, Database, DateKey, Task, TaskId, TaskStore};

use super::{day_or_today, open_store, present_events};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task text
        text: String,
        /// Day to add to (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<DateKey>,
    },
    /// List a day's tasks
    List {
        /// Day to list (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<DateKey>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Flip a task between done and not done
    Toggle {
        /// Task ID
        id: TaskId,
        #[arg(long)]
        date: Option<DateKey>,
    },
    /// Mark a task done
    Done {
        /// Task ID
        id: TaskId,
        #[arg(long)]
        date: Option<DateKey>,
    },
    /// Mark a task not done
    Undo {
        /// Task ID
        id: TaskId,
        #[arg(long)]
        date: Option<DateKey>,
    },
    /// Change a task's text
    Edit {
        /// Task ID
        id: TaskId,
        /// New text
        text: String,
        #[arg(long)]
        date: Option<DateKey>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: TaskId,
        #[arg(long)]
        date: Option<DateKey>,
    },
}

fn print_task(task: &Task) {
    let mark = if task.completed { 'x' } else { ' ' };
    println!("  [{mark}] {}  {}", task.id, task.text);
}

fn not_found(day: DateKey, id: TaskId) {
    eprintln!("task not found: {id} on {day}");
}

fn set_completed(
    store: &mut TaskStore<Database>,
    day: DateKey,
    id: TaskId,
    completed: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match store.set_completed(day, id, completed)? {
        Some(task) => print_task(&task),
        None => not_found(day, id),
    }
    Ok(())
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let (mut store, _config) = open_store()?;

    match action {
        TaskAction::Add { text, date } => {
            let day = day_or_today(date);
            match store.add_task(day, &text)? {
                Some(task) => {
                    println!("Task added: {}", task.id);
                    print_task(&task);
                }
                None => eprintln!("task text is empty; nothing added"),
            }
        }
        TaskAction::List { date, json } => {
            let day = day_or_today(date);
            let tasks = store.get_tasks_for(&day);
            if json {
                println!("{}", serde_json::to_string_pretty(tasks)?);
            } else {
                let progress = compute_progress(tasks);
                let done = tasks.iter().filter(|t| t.completed).count();
                if progress.is_empty {
                    println!("{day}  no tasks yet");
                } else {
                    println!(
                        "{day}  {done}/{} done ({}%)",
                        tasks.len(),
                        progress.percentage
                    );
                }
                tasks.iter().for_each(print_task);
            }
        }
        TaskAction::Toggle { id, date } => {
            let day = day_or_today(date);
            match store.toggle_task(day, id)? {
                Some(task) => print_task(&task),
                None => not_found(day, id),
            }
        }
        TaskAction::Done { id, date } => set_completed(&mut store, day_or_today(date), id, true)?,
        TaskAction::Undo { id, date } => set_completed(&mut store, day_or_today(date), id, false)?,
        TaskAction::Edit { id, text, date } => {
            let day = day_or_today(date);
            let Some(current) = store.get_tasks_for(&day).iter().find(|t| t.id == id).cloned()
            else {
                not_found(day, id);
                return Ok(());
            };
            let updated = Task { text, ..current };
            if store.update_task(day, updated)? {
                println!("Task updated: {id}");
            } else {
                eprintln!("task text is empty; nothing changed");
            }
        }
        TaskAction::Delete { id, date } => {
            let day = day_or_today(date);
            if store.remove_task(day, id)? {
                println!("Task deleted: {id}");
            } else {
                not_found(day, id);
            }
        }
    }

    present_events(&store.drain_events());
    Ok(())
}
