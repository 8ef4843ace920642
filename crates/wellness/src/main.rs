//! wellness - Sleep, mood and challenges
//!
//! Usage:
//!   wellness                         Show a summary
//!   wellness sleep HOURS [-e N]      Log sleep for today
//!   wellness mood MOOD [--note ..]   Log a mood
//!   wellness challenges              Show challenge progress
//!   wellness progress ID             Count a step on a challenge

use anyhow::{anyhow, Result};
use chrono::{Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vitalis_core::format::{color, progress_bar, BOLD, CYAN, GREEN, MAGENTA, YELLOW};
use vitalis_core::VitalisConfig;
use wellness::challenge::Challenge;
use wellness::mood::{Mood, MoodLog};
use wellness::sleep::{SleepEntry, SleepLog, DEFAULT_ENERGY};
use wellness::store::WellnessStore;

/// Wellness - sleep, mood and challenges
#[derive(Parser)]
#[command(name = "wellness")]
#[command(about = "Sleep and mood logs with weekly challenges")]
#[command(version)]
#[command(after_help = r#"MOODS:
    happy, calm, neutral, anxious, sad

EXAMPLES:
    wellness sleep 7.5 --energy 4         # Last night
    wellness sleep 6 --date 2024-07-26    # Fix an earlier night
    wellness mood calm --note "yoga"      # How you feel now
    wellness progress 1                   # One more day of hydration
    wellness challenge-add --title "Stretch daily" --goal 7 --unit days

ALIASES:
    wellness s     # summary
    wellness ch    # challenges
"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show recent sleep, mood counts and challenges
    #[command(alias = "s")]
    Summary {
        /// Number of days to include (default: 7)
        #[arg(default_value = "7")]
        days: u32,
    },

    /// Log hours slept (replaces an earlier entry for the same date)
    Sleep {
        hours: f32,

        /// How rested you feel, 1 to 5
        #[arg(short, long, default_value_t = DEFAULT_ENERGY)]
        energy: u8,

        /// Date of the night (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Log how you feel
    Mood {
        mood: String,

        #[arg(long)]
        note: Option<String>,
    },

    /// Show challenge progress
    #[command(alias = "ch")]
    Challenges,

    /// Count one step towards a challenge
    Progress {
        id: u64,
    },

    /// Create a custom challenge
    ChallengeAdd {
        #[arg(long)]
        title: String,

        /// How many steps complete the challenge
        #[arg(long)]
        goal: u32,

        /// What a step is ("days", "glasses")
        #[arg(long, default_value = "days")]
        unit: String,

        #[arg(long, default_value = "")]
        description: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = VitalisConfig::load()?;
    let store = WellnessStore::new(&config.paths().state("wellness"))?;

    match cli.command {
        Some(Commands::Summary { days }) => cmd_summary(&store, days),
        None => cmd_summary(&store, 7),
        Some(Commands::Sleep { hours, energy, date }) => cmd_sleep(&store, hours, energy, date),
        Some(Commands::Mood { mood, note }) => cmd_mood(&store, &mood, note),
        Some(Commands::Challenges) => cmd_challenges(&store),
        Some(Commands::Progress { id }) => cmd_progress(&store, id),
        Some(Commands::ChallengeAdd {
            title,
            goal,
            unit,
            description,
        }) => cmd_challenge_add(&store, &title, goal, &unit, &description),
    }
}

fn print_challenge(c: &Challenge) {
    let percent = c.percent();
    let mark = if c.is_completed() { color(GREEN, "[x]") } else { "[ ]".to_string() };
    println!(
        "  {} {:>2}  {}  {}",
        mark,
        c.id,
        color(BOLD, &c.title),
        color(CYAN, &format!("({})", c.kind.as_str()))
    );
    println!(
        "          [{}] {}/{} {} ({}%)",
        progress_bar(percent, 20),
        c.current_value,
        c.goal_value,
        c.unit,
        percent
    );
}

fn energy_stars(level: u8) -> String {
    (1..=5).map(|i| if i <= level { '*' } else { '.' }).collect()
}

/// Recent sleep, mood counts and challenge progress
fn cmd_summary(store: &WellnessStore, days: u32) -> Result<()> {
    let today = Utc::now().date_naive();
    let since_date = today - Duration::days(i64::from(days.saturating_sub(1)));

    println!("{}", color(BOLD, &format!("Wellness (Last {} days)", days)));
    println!();

    let sleep = store.sleep();
    let nights: Vec<SleepEntry> = sleep
        .entries()
        .iter()
        .filter(|e| e.date >= since_date)
        .cloned()
        .collect();

    println!("{}", color(MAGENTA, "SLEEP"));
    if nights.is_empty() {
        println!("  No nights logged");
    } else {
        for night in &nights {
            println!(
                "  {}  {:>4.1}h  energy {}",
                night.date.format("%a %d/%m"),
                night.hours_slept,
                energy_stars(night.energy_level)
            );
        }
        if let Some(avg) = SleepLog::average_hours(&nights) {
            println!("  {} {:.1}h", color(CYAN, "Average:"), avg);
        }
    }
    println!();

    let since = since_date
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or(0);
    let moods = store.moods();

    println!("{}", color(MAGENTA, "MOOD"));
    if moods.since(since).next().is_none() {
        println!("  No moods logged");
    } else {
        for (mood, count) in MoodLog::counts(moods.since(since)) {
            println!("  {} {:<8} {}", mood.emoji(), mood.as_str(), "#".repeat(count));
        }
    }
    println!();

    let board = store.challenges();
    let (done, total) = board.completed();
    println!("{} ({}/{} complete)", color(MAGENTA, "CHALLENGES"), done, total);
    for c in board.iter() {
        print_challenge(c);
    }

    Ok(())
}

/// Log sleep for a date
fn cmd_sleep(store: &WellnessStore, hours: f32, energy: u8, date: Option<NaiveDate>) -> Result<()> {
    let date = date.unwrap_or_else(|| Utc::now().date_naive());
    let entry = SleepEntry::new(date, hours, energy)?;

    let mut log = store.sleep();
    let replaced = log.log(entry);
    store.save_sleep(&log)?;

    info!("Logged {}h of sleep for {}", hours, date);
    if replaced {
        println!("{} Updated sleep for {}: {:.1}h", color(GREEN, "[ok]"), date, hours);
    } else {
        println!("{} Logged sleep for {}: {:.1}h", color(GREEN, "[ok]"), date, hours);
    }
    Ok(())
}

/// Log a mood
fn cmd_mood(store: &WellnessStore, mood: &str, note: Option<String>) -> Result<()> {
    let mood = Mood::from_str(mood).ok_or_else(|| {
        anyhow!(
            "Unknown mood: {} (use one of: {})",
            mood,
            Mood::ALL.map(|m| m.as_str()).join(", ")
        )
    })?;

    let mut log = store.moods();
    let entry = log.record(mood, note, Utc::now().timestamp()).clone();
    store.save_moods(&log)?;

    println!("{} Feeling {} {}", color(GREEN, "[ok]"), mood.as_str(), mood.emoji());
    if let Some(note) = entry.note {
        println!("  {}", color(YELLOW, &note));
    }
    Ok(())
}

/// Show challenge progress
fn cmd_challenges(store: &WellnessStore) -> Result<()> {
    let board = store.challenges();
    let (done, total) = board.completed();

    println!("{} ({}/{} complete)", color(BOLD, "CHALLENGES"), done, total);
    println!();
    for c in board.iter() {
        print_challenge(c);
        if !c.description.is_empty() {
            println!("          {}", c.description);
        }
    }
    Ok(())
}

/// Count a step on a challenge
fn cmd_progress(store: &WellnessStore, id: u64) -> Result<()> {
    let mut board = store.challenges();
    let challenge = board.progress(id)?.clone();
    store.save_challenges(&board)?;

    print_challenge(&challenge);
    if challenge.is_completed() {
        println!();
        println!("{} Challenge complete!", color(GREEN, "[ok]"));
    }
    Ok(())
}

/// Create a custom challenge
fn cmd_challenge_add(store: &WellnessStore, title: &str, goal: u32, unit: &str, description: &str) -> Result<()> {
    let mut board = store.challenges();
    let added = board.add_custom(title, description, goal, unit)?.clone();
    store.save_challenges(&board)?;

    println!("{} Added challenge {}: {}", color(GREEN, "[ok]"), added.id, added.title);
    Ok(())
}
