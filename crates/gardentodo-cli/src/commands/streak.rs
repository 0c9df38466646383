use clap::Args;
use gardentodo_core::{DateKey, StreakCalculator};

use super::{day_or_today, open_store};

#[derive(Args)]
pub struct StreakArgs {
    /// Count as if this were today (YYYY-MM-DD)
    #[arg(long)]
    today: Option<DateKey>,
    /// Output JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: StreakArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (store, config) = open_store()?;
    let today = day_or_today(args.today);
    let summary = StreakCalculator::with_config(&config.streak).summarize(store.store(), today);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        let unit = if summary.current == 1 { "day" } else { "days" };
        println!("🔥 {} {unit}", summary.current);
        println!("Longest: {}", summary.longest);
        if summary.current > 0 && !summary.today_counted {
            println!("Finish a task today to keep it going.");
        }
    }
    Ok(())
}
