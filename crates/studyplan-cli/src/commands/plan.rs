use clap::Subcommand;
use studyplan_core::export::{GoogleCalendarClient, GoogleTokens};
use studyplan_core::{export_plan, plan_study, Config, PlanDb, PlanSummary, StoredItem, StoredPlan};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Generate a new plan and make it the current one
    Generate {
        /// Subject to study (repeatable); defaults to planner.subjects
        #[arg(long = "subject", short = 's')]
        subjects: Vec<String>,
        /// Number of days to plan (1-60)
        #[arg(long)]
        days: Option<i64>,
        /// Daily window start (HH:MM)
        #[arg(long)]
        start: Option<String>,
        /// Daily window end (HH:MM); may be earlier than start to wrap midnight
        #[arg(long)]
        end: Option<String>,
        /// Study hours per day (1-8)
        #[arg(long)]
        hours: Option<f64>,
        /// First day of the plan (YYYY-MM-DD); defaults to today
        #[arg(long)]
        from: Option<String>,
        /// Plan owner; defaults to the configured owner
        #[arg(long)]
        owner: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the current plan
    Show {
        #[arg(long)]
        owner: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Toggle the completion flag of a plan item
    Toggle {
        /// Item ID (as printed by `plan show`)
        id: String,
        #[arg(long)]
        owner: Option<String>,
    },
    /// Export the current plan to Google Calendar
    Export {
        #[arg(long)]
        owner: Option<String>,
        /// IANA time zone for the events; defaults to export.time_zone
        #[arg(long)]
        time_zone: Option<String>,
        /// Export study sessions only
        #[arg(long)]
        sessions_only: bool,
    },
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        PlanAction::Generate {
            subjects,
            days,
            start,
            end,
            hours,
            from,
            owner,
            json,
        } => {
            let mut request = config.plan_request();
            if !subjects.is_empty() {
                request.subjects = subjects;
            }
            if let Some(days) = days {
                request.days = Some(days);
            }
            if let Some(start) = start {
                request.start_time = start;
            }
            if let Some(end) = end {
                request.end_time = end;
            }
            if let Some(hours) = hours {
                request.hours_per_day = Some(hours);
            }
            request.start_date = from;

            let plan = plan_study(&request)?;
            let owner = owner.unwrap_or_else(|| config.owner.clone());
            let mut db = PlanDb::open()?;
            let stored = db.save_plan(&owner, &plan)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&stored)?);
            } else {
                print_plan(&stored);
            }
        }
        PlanAction::Show { owner, json } => {
            let owner = owner.unwrap_or_else(|| config.owner.clone());
            let db = PlanDb::open()?;
            let stored = db
                .latest_plan(&owner)?
                .ok_or_else(|| format!("no plan for {owner}; run `studyplan plan generate`"))?;

            if json {
                let out = serde_json::json!({
                    "plan": stored,
                    "summary": stored.summary(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print_plan(&stored);
            }
        }
        PlanAction::Toggle { id, owner } => {
            let owner = owner.unwrap_or_else(|| config.owner.clone());
            let db = PlanDb::open()?;
            let completed = db.toggle_item(&owner, &id)?;
            println!(
                "{id}: {}",
                if completed { "completed" } else { "not completed" }
            );
        }
        PlanAction::Export {
            owner,
            time_zone,
            sessions_only,
        } => {
            let owner = owner.unwrap_or_else(|| config.owner.clone());
            let db = PlanDb::open()?;
            let stored = db
                .latest_plan(&owner)?
                .ok_or_else(|| format!("no plan for {owner}; run `studyplan plan generate`"))?;

            let mut plan = stored.to_plan();
            if sessions_only {
                plan.items.retain(|item| item.is_study());
            }
            let time_zone = time_zone.unwrap_or_else(|| config.export.time_zone.clone());

            let client = GoogleCalendarClient::from_config(&config.export);
            let tokens = GoogleTokens::new();
            let report = super::runtime()?.block_on(export_plan(
                &client,
                &tokens,
                &plan.items,
                &time_zone,
            ))?;

            println!("exported {}/{} events", report.created, report.total);
            for error in &report.errors {
                eprintln!("  failed: {error}");
            }
            if report.failed > report.errors.len() {
                eprintln!("  ... and {} more", report.failed - report.errors.len());
            }
        }
    }
    Ok(())
}

fn print_plan(stored: &StoredPlan) {
    println!(
        "Plan {} ({}), created {}",
        stored.id,
        stored.owner,
        stored.created_at.format("%Y-%m-%d %H:%M UTC")
    );

    let mut current_day = None;
    for StoredItem { id, item } in &stored.items {
        let day = item.day();
        if current_day != Some(day) {
            println!();
            println!("{}", day.format("%A %Y-%m-%d"));
            current_day = Some(day);
        }
        let mark = match (item.is_study(), item.completed) {
            (false, _) => " ",
            (true, true) => "x",
            (true, false) => "-",
        };
        println!(
            "  [{mark}] {}-{}  {:<24} {id}",
            item.start.format("%H:%M"),
            item.end.format("%H:%M"),
            item.title,
        );
    }

    println!();
    print_summary(&stored.summary());
}

fn print_summary(summary: &PlanSummary) {
    println!(
        "{}/{} sessions completed ({:.0}%), {} breaks",
        summary.completed_sessions,
        summary.study_sessions,
        summary.progress() * 100.0,
        summary.break_count,
    );
    for (subject, minutes) in &summary.minutes_per_subject {
        println!("  {subject:<20} {}h{:02}", minutes / 60, minutes % 60);
    }
}
