//! cycle - Menstrual cycle tracker
//!
//! Usage:
//!   cycle status                      Show cycle day and phase for today
//!   cycle set --last-period DATE      Record the start of the last period
//!   cycle set --length DAYS           Set the average cycle length
//!   cycle clear                       Forget the last period date
//!   cycle calendar [YYYY-MM]          Show projected phases for a month
//!   cycle tips                        Suggestions for the current phase

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cycle::calendar::{self, WEEKDAYS};
use cycle::phase::{self, parse_cycle_length, CyclePhase};
use cycle::store::CycleStore;
use cycle::tips;
use vitalis_core::config::AssistConfig;
use vitalis_core::format::{color, use_colors, BOLD, CYAN, GREEN, MAGENTA, RED, REVERSE, YELLOW};
use vitalis_core::{Assistant, VitalisConfig};

/// Cycle - menstrual cycle tracker
#[derive(Parser)]
#[command(name = "cycle")]
#[command(about = "Menstrual cycle tracker with projected phase calendar")]
#[command(version)]
#[command(after_help = r#"PHASES:
    Menstruation   days 1-5
    Follicular     days 6-13
    Ovulation      days 14-15
    Luteal         day 16 to the end of the cycle

EXAMPLES:
    cycle set --last-period 2024-07-10 --length 29
    cycle status                # Where am I today?
    cycle calendar              # This month
    cycle calendar 2024-12      # Any month, past or future
    cycle tips --name Ana       # Suggestions for the current phase

ALIASES:
    cycle st    # status
    cycle cal   # calendar
"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show cycle day and phase for today
    #[command(alias = "st")]
    Status,

    /// Update cycle settings
    Set {
        /// First day of the last period (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        last_period: Option<NaiveDate>,

        /// Average cycle length in days (invalid values fall back to 28)
        #[arg(long, value_name = "DAYS")]
        length: Option<String>,
    },

    /// Forget the last period date
    Clear,

    /// Show the projected phases for a month
    #[command(alias = "cal")]
    Calendar {
        /// Month to show (YYYY-MM, default: current month)
        month: Option<String>,

        /// Print the projection as JSON
        #[arg(long)]
        json: bool,
    },

    /// Suggestions for the current phase
    Tips {
        /// Name to address the tips to
        #[arg(long, default_value = "friend")]
        name: String,

        /// Only a one-line summary
        #[arg(long)]
        summary: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = VitalisConfig::load()?;
    let store = CycleStore::new(&config.paths().state("cycle"))?;
    let default_length = config.cycle.default_length;

    match cli.command {
        Some(Commands::Status) | None => cmd_status(&store, default_length),
        Some(Commands::Set {
            last_period,
            length,
        }) => cmd_set(&store, default_length, last_period, length),
        Some(Commands::Clear) => cmd_clear(&store, default_length),
        Some(Commands::Calendar { month, json }) => cmd_calendar(&store, default_length, month, json),
        Some(Commands::Tips { name, summary }) => cmd_tips(&store, default_length, &config.assist, &name, summary),
    }
}

fn phase_color(phase: CyclePhase) -> &'static str {
    match phase {
        CyclePhase::Menstruation => RED,
        CyclePhase::Follicular => CYAN,
        CyclePhase::Ovulatory => MAGENTA,
        CyclePhase::Luteal => YELLOW,
        CyclePhase::Unknown => "",
    }
}

fn phase_marker(phase: CyclePhase) -> char {
    match phase {
        CyclePhase::Menstruation => 'M',
        CyclePhase::Follicular => 'F',
        CyclePhase::Ovulatory => 'O',
        CyclePhase::Luteal => 'L',
        CyclePhase::Unknown => ' ',
    }
}

/// Show today's cycle position
fn cmd_status(store: &CycleStore, default_length: u32) -> Result<()> {
    let today = phase::today_utc();
    let config = store.load(today, default_length);
    let reading = phase::current_phase(&config, today);

    println!("{}", color(BOLD, "CYCLE"));
    println!();
    match config.last_period_date() {
        Some(date) => println!("  {}  {}", color(CYAN, "Last period:"), date),
        None => println!("  {}  not set", color(CYAN, "Last period:")),
    }
    println!("  {}       {} days", color(CYAN, "Length:"), config.average_cycle_length());

    if reading.phase != CyclePhase::Unknown {
        println!("  {}          {}", color(CYAN, "Day:"), reading.day_in_cycle);
    }
    println!(
        "  {}        {}",
        color(CYAN, "Phase:"),
        color(phase_color(reading.phase), reading.phase.label())
    );
    println!();
    println!("{}", reading.phase.guidance());

    Ok(())
}

/// Update last period date and/or cycle length
fn cmd_set(
    store: &CycleStore,
    default_length: u32,
    last_period: Option<NaiveDate>,
    length: Option<String>,
) -> Result<()> {
    let today = phase::today_utc();
    let mut config = store.load(today, default_length);

    if let Some(date) = last_period {
        config = config.with_last_period(Some(date));
    }
    if let Some(input) = length {
        config = config.with_length(parse_cycle_length(&input))?;
    }

    store.save(&config)?;
    tracing::info!(
        "Cycle settings saved: last period {:?}, length {}",
        config.last_period_date(),
        config.average_cycle_length()
    );

    println!("{} Cycle settings saved", color(GREEN, "[ok]"));
    cmd_status(store, default_length)
}

/// Forget the last period date
fn cmd_clear(store: &CycleStore, default_length: u32) -> Result<()> {
    let config = store.load(phase::today_utc(), default_length);
    store.save(&config.with_last_period(None))?;

    println!("{} Last period date cleared", color(GREEN, "[ok]"));
    Ok(())
}

/// Render a month grid with projected phases
fn cmd_calendar(store: &CycleStore, default_length: u32, month: Option<String>, json: bool) -> Result<()> {
    let today = phase::today_utc();
    let config = store.load(today, default_length);

    let (year, month) = match month {
        Some(input) => calendar::parse_month(&input)?,
        None => (today.year(), today.month()),
    };

    let projection = calendar::project_month(&config, year, month)?;

    if json {
        let out = serde_json::to_string_pretty(&projection.to_iso_map())
            .context("Failed to serialize projection")?;
        println!("{}", out);
        return Ok(());
    }

    let (first, _) = calendar::month_bounds(year, month)?;
    println!("{}", color(BOLD, &first.format("%B %Y").to_string()));
    println!();

    let header: Vec<String> = WEEKDAYS
        .iter()
        .map(|w| format!("{:>3} ", &w.to_string()[..2]))
        .collect();
    println!("{}", header.join(""));

    let colors = use_colors();
    for row in calendar::weeks(year, month)? {
        let mut line = String::new();
        for cell in row {
            let Some(date) = cell else {
                line.push_str("    ");
                continue;
            };

            let phase = projection.phase_on(date).unwrap_or(CyclePhase::Unknown);
            let day = format!("{:>3}", date.day());

            if colors {
                let code = if date == today {
                    format!("{}{}", REVERSE, phase_color(phase))
                } else {
                    phase_color(phase).to_string()
                };
                line.push_str(&color(&code, &day));
                line.push(' ');
            } else {
                line.push_str(&day);
                line.push(if date == today { '*' } else { phase_marker(phase) });
            }
        }
        println!("{}", line.trim_end());
    }

    println!();
    let legend: Vec<String> = [
        CyclePhase::Menstruation,
        CyclePhase::Follicular,
        CyclePhase::Ovulatory,
        CyclePhase::Luteal,
    ]
    .iter()
    .map(|p| {
        if colors {
            color(phase_color(*p), p.label())
        } else {
            format!("{}={}", phase_marker(*p), p.label())
        }
    })
    .collect();
    println!("{}  {}", legend.join("  "), if colors { "(today inverted)" } else { "*=today" });

    if config.last_period_date().is_none() {
        println!();
        println!("No last period date set. Use: cycle set --last-period YYYY-MM-DD");
    }

    Ok(())
}

/// Print suggestions for the current phase
fn cmd_tips(store: &CycleStore, default_length: u32, assist: &AssistConfig, name: &str, summary: bool) -> Result<()> {
    let today = phase::today_utc();
    let config = store.load(today, default_length);
    let reading = phase::current_phase(&config, today);

    let rt = tokio::runtime::Runtime::new()?;
    let generator = Assistant::from_config(assist);

    let text = rt.block_on(async {
        if summary {
            tips::cycle_summary(&generator, &reading).await
        } else {
            tips::cycle_tips(&generator, &reading, name).await
        }
    });

    println!(
        "{} {}",
        color(&format!("{}{}", BOLD, phase_color(reading.phase)), reading.phase.label()),
        if reading.phase == CyclePhase::Unknown {
            String::new()
        } else {
            format!("(day {})", reading.day_in_cycle)
        }
    );
    println!();
    println!("{}", reading.phase.guidance());
    println!();
    println!("{}", text);

    if !generator.is_configured() {
        println!();
        println!("Set GEMINI_API_KEY (or assist.api_key in config.yaml) for personalized tips");
    }

    Ok(())
}
