use chrono::NaiveDate;
use clap::Args;
use gardentodo_core::{summarize_month, DateKey, DayStatus, DaySummary, MonthView};

use super::open_store;

#[derive(Args)]
pub struct CalendarArgs {
    /// Year (default: this year)
    #[arg(long)]
    year: Option<i32>,
    /// Month 1-12 (default: this month)
    #[arg(long)]
    month: Option<u32>,
    /// Output JSON
    #[arg(long)]
    json: bool,
}

fn status_mark(status: DayStatus) -> char {
    match status {
        DayStatus::NoData => ' ',
        DayStatus::HasIncomplete => '+',
        DayStatus::AllDone => '*',
    }
}

fn cell(day: Option<&DaySummary>) -> String {
    match day {
        None => "    ".to_string(),
        Some(d) => {
            let today = if d.is_today { '>' } else { ' ' };
            format!("{today}{:>2}{}", d.day, status_mark(d.status))
        }
    }
}

fn render(view: &MonthView, show_counts: bool) -> String {
    let mut out = String::new();
    let title = NaiveDate::from_ymd_opt(view.year, view.month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{}-{:02}", view.year, view.month));
    out.push_str(&format!("{title:^28}\n"));
    out.push_str("  Su  Mo  Tu  We  Th  Fr  Sa\n");

    let cells: Vec<String> = view.cells().map(cell).collect();
    for week in cells.chunks(7) {
        out.push_str(week.concat().trim_end());
        out.push('\n');
    }
    out.push_str("* all done  + in progress  > today\n");

    if show_counts {
        for d in view.days.iter().filter(|d| d.total > 0) {
            out.push_str(&format!("{}  {}/{}\n", d.key, d.completed, d.total));
        }
    }
    out
}

pub fn run(args: CalendarArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (store, config) = open_store()?;
    let today = DateKey::today();
    let year = args.year.unwrap_or_else(|| today.year());
    let month = args.month.unwrap_or_else(|| today.month());
    let view = summarize_month(store.store(), year, month, today)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render(&view, config.calendar.show_counts));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gardentodo_core::{Store, Task, TaskId};

    #[test]
    fn renders_february_2024() {
        let store: Store = [(
            "2024-02-01".parse::<DateKey>().unwrap(),
            vec![Task {
                id: TaskId(1),
                text: "a".into(),
                completed: true,
            }],
        )]
        .into_iter()
        .collect();
        let today = "2024-02-02".parse().unwrap();
        let view = summarize_month(&store, 2024, 2, today).unwrap();
        let text = render(&view, true);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0].trim(), "February 2024");
        // Thursday the 1st, done; Friday the 2nd is today.
        assert_eq!(lines[2], "                  1*> 2   3");
        assert!(lines.iter().any(|l| l.trim_end() == "2024-02-01  1/1"));
    }
}
