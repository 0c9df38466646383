use clap::Args;
use gardentodo_core::{compute_progress, DateKey, GrowthStage, Progress};
use serde::Serialize;

use super::{day_or_today, open_store};

const BAR_WIDTH: usize = 20;

#[derive(Args)]
pub struct ProgressArgs {
    /// Day to show (YYYY-MM-DD, default: today)
    #[arg(long)]
    date: Option<DateKey>,
    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ProgressReport {
    day: DateKey,
    #[serde(flatten)]
    progress: Progress,
    stage: GrowthStage,
}

fn headline(progress: Progress) -> String {
    if progress.is_empty {
        "Start your day!".to_string()
    } else {
        format!("{}% Completed", progress.percentage)
    }
}

fn bar(percentage: u8) -> String {
    let filled = (usize::from(percentage) * BAR_WIDTH + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

pub fn run(args: ProgressArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (store, config) = open_store()?;
    let day = day_or_today(args.date);
    let progress = compute_progress(store.get_tasks_for(&day));
    let stage = GrowthStage::classify(progress, config.progress.stage_table);

    if args.json {
        let report = ProgressReport {
            day,
            progress,
            stage,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{day}  {}", headline(progress));
        println!("{} {}", bar(progress.percentage), stage.symbol());
        println!("Stage: {}", stage.label());
    }
    Ok(())
}
