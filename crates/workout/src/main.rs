//! workout - Interval timer and workout catalog
//!
//! Usage:
//!   workout list                     Show your workouts
//!   workout add --name NAME          Add a custom workout
//!   workout edit ID [...]            Change a custom workout
//!   workout delete ID                Remove a custom workout
//!   workout done ID                  Toggle completed
//!   workout run ID                   Start the work/rest countdown
//!   workout status                   Show the run in progress
//!   workout stop [--complete]        End the run in progress
//!   workout stats [DAYS]             Show statistics

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::execute;
use std::io::{stdout, IsTerminal, Write};
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vitalis_core::format::{color, format_clock, format_duration, progress_bar, BLUE, BOLD, CYAN, GREEN, MAGENTA, YELLOW};
use vitalis_core::VitalisConfig;
use workout::run::{ActiveRun, RunRecord};
use workout::stats::WorkoutStats;
use workout::store::WorkoutStore;
use workout::timer::{Phase, StopMode, Stopped, Tick, TimerConfig, TimerError, TimerRun, WorkoutTimer};
use workout::workout::{Difficulty, Location, NewWorkout, WorkoutError, WorkoutKind};

/// Workout - interval timer and workout catalog
#[derive(Parser)]
#[command(name = "workout")]
#[command(about = "Interval workout timer with work/rest sets")]
#[command(version)]
#[command(after_help = r#"WHEN TO USE:
    Keep a list of your workouts and let the timer call work and rest
    for every set. A workout is marked done when its last set ends.

DURING A RUN:
    p / space   pause or resume
    f           finish early (counts as done)
    q / Esc     stop (does not count)

EXAMPLES:
    workout add --name "Squats" --sets 4 --work 40 --rest 20
    workout list                # See ids and progress
    workout run 1               # Count it down
    workout run 1 --sets 2      # Shorter session today
    workout stop                # Clear a run left by a closed terminal
    workout stats 30            # Last 30 days

ALIASES:
    workout ls    # list
    workout st    # status
    workout rm    # delete
"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show your workouts
    #[command(alias = "ls")]
    List,

    /// Show one workout in detail
    Show {
        id: u64,
    },

    /// Add a custom workout
    Add {
        #[arg(long)]
        name: String,

        /// What the workout trains (e.g. "Legs and glutes")
        #[arg(long, default_value = "")]
        goal: String,

        /// Number of sets (default from config)
        #[arg(long)]
        sets: Option<u32>,

        /// Work seconds per set (default from config)
        #[arg(long)]
        work: Option<u32>,

        /// Rest seconds between sets (default from config)
        #[arg(long)]
        rest: Option<u32>,

        /// home or gym
        #[arg(long, default_value = "home")]
        location: String,

        /// beginner, intermediate or advanced
        #[arg(long, default_value = "beginner")]
        difficulty: String,

        /// cardio, strength, stretching, functional, yoga or hypertrophy
        #[arg(long, default_value = "functional")]
        kind: String,

        /// Comma separated equipment list
        #[arg(long, value_delimiter = ',')]
        equipment: Vec<String>,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long)]
        tips: Option<String>,
    },

    /// Change a custom workout
    Edit {
        id: u64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        goal: Option<String>,

        #[arg(long)]
        sets: Option<u32>,

        #[arg(long)]
        work: Option<u32>,

        #[arg(long)]
        rest: Option<u32>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        tips: Option<String>,
    },

    /// Remove a custom workout
    #[command(alias = "rm")]
    Delete {
        id: u64,
    },

    /// Toggle a workout's completed flag
    Done {
        id: u64,
    },

    /// Run the work/rest countdown for a workout
    Run {
        id: u64,

        /// Override the number of sets for this run
        #[arg(long)]
        sets: Option<u32>,

        /// Override work seconds for this run
        #[arg(long)]
        work: Option<u32>,

        /// Override rest seconds for this run
        #[arg(long)]
        rest: Option<u32>,
    },

    /// Show the run in progress
    #[command(alias = "st")]
    Status,

    /// End the run in progress
    Stop {
        /// Count the workout as done
        #[arg(long)]
        complete: bool,
    },

    /// Show workout statistics
    Stats {
        /// Number of days to show (default: 7)
        #[arg(default_value = "7")]
        days: u32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = VitalisConfig::load()?;
    let store = WorkoutStore::new(&config.paths().state("workout"))?;

    match cli.command {
        Some(Commands::List) | None => cmd_list(&store),
        Some(Commands::Show { id }) => cmd_show(&store, id),
        Some(Commands::Add {
            name,
            goal,
            sets,
            work,
            rest,
            location,
            difficulty,
            kind,
            equipment,
            description,
            tips,
        }) => {
            let new = NewWorkout {
                name,
                goal,
                location: Location::from_str(&location)
                    .ok_or_else(|| anyhow!("Unknown location: {}", location))?,
                equipment: equipment
                    .into_iter()
                    .map(|e| e.trim().to_string())
                    .filter(|e| !e.is_empty())
                    .collect(),
                sets: sets.unwrap_or(config.timer.sets),
                work_seconds: work.unwrap_or(config.timer.work_seconds),
                rest_seconds: rest.unwrap_or(config.timer.rest_seconds),
                description,
                tips,
                difficulty: Difficulty::from_str(&difficulty)
                    .ok_or_else(|| anyhow!("Unknown difficulty: {}", difficulty))?,
                kind: WorkoutKind::from_str(&kind).ok_or_else(|| anyhow!("Unknown kind: {}", kind))?,
            };
            cmd_add(&store, new)
        }
        Some(Commands::Edit {
            id,
            name,
            goal,
            sets,
            work,
            rest,
            description,
            tips,
        }) => cmd_edit(&store, id, name, goal, sets, work, rest, description, tips),
        Some(Commands::Delete { id }) => cmd_delete(&store, id),
        Some(Commands::Done { id }) => cmd_done(&store, id),
        Some(Commands::Run { id, sets, work, rest }) => cmd_run(&store, id, sets, work, rest),
        Some(Commands::Status) => cmd_status(&store),
        Some(Commands::Stop { complete }) => cmd_stop(&store, complete),
        Some(Commands::Stats { days }) => cmd_stats(&store, days),
    }
}

fn phase_color(phase: Phase) -> &'static str {
    match phase {
        Phase::Work => GREEN,
        Phase::Rest => BLUE,
    }
}

/// List the catalog
fn cmd_list(store: &WorkoutStore) -> Result<()> {
    let catalog = store.load_catalog();

    if catalog.is_empty() {
        println!("No workouts yet");
        println!();
        println!("Add one with: workout add --name \"Squats\" --sets 3 --work 45 --rest 15");
        return Ok(());
    }

    let (done, total) = catalog.progress();
    println!("{} ({}/{} done)", color(BOLD, "WORKOUTS"), done, total);
    println!();

    for w in catalog.iter() {
        let check = if w.completed { color(GREEN, "[x]") } else { "[ ]".to_string() };
        let custom = if w.is_custom { color(MAGENTA, " custom") } else { String::new() };
        println!(
            "  {} {:>3}  {}{}  {}",
            check,
            w.id,
            w.name,
            custom,
            color(CYAN, &format!("{} x {}s / {}s rest", w.sets, w.work_seconds, w.rest_seconds))
        );
    }

    Ok(())
}

/// Show one workout
fn cmd_show(store: &WorkoutStore, id: u64) -> Result<()> {
    let catalog = store.load_catalog();
    let w = catalog.get(id).ok_or(WorkoutError::NotFound(id))?;

    println!("{}", color(BOLD, &w.name));
    println!();
    println!("  {}        {}", color(CYAN, "Goal:"), w.goal);
    println!("  {}        {}", color(CYAN, "Type:"), w.kind.as_str());
    println!("  {}       {}", color(CYAN, "Level:"), w.difficulty.as_str());
    println!("  {}       {}", color(CYAN, "Where:"), w.location.as_str());
    println!(
        "  {}        {} sets of {}s with {}s rest",
        color(CYAN, "Sets:"),
        w.sets,
        w.work_seconds,
        w.rest_seconds
    );
    println!("  {}   {}", color(CYAN, "Estimated:"), format_duration(w.estimated_seconds()));
    if !w.equipment.is_empty() {
        println!("  {}   {}", color(CYAN, "Equipment:"), w.equipment.join(", "));
    }
    println!("  {}        {}", color(CYAN, "Done:"), if w.completed { "yes" } else { "no" });

    if !w.description.is_empty() {
        println!();
        println!("{}", w.description);
    }
    if let Some(ref tips) = w.tips {
        println!();
        println!("{} {}", color(YELLOW, "Tip:"), tips);
    }

    Ok(())
}

/// Add a custom workout
fn cmd_add(store: &WorkoutStore, new: NewWorkout) -> Result<()> {
    let mut catalog = store.load_catalog();
    let added = catalog.add_custom(new)?.clone();
    store.save_catalog(&catalog)?;

    info!("Added workout {} '{}'", added.id, added.name);
    println!("{} Added workout {}: {}", color(GREEN, "[ok]"), added.id, added.name);
    println!("Estimated time: {}", format_duration(added.estimated_seconds()));
    println!();
    println!("Run 'workout run {}' to start", added.id);

    Ok(())
}

/// Edit a custom workout
#[allow(clippy::too_many_arguments)]
fn cmd_edit(
    store: &WorkoutStore,
    id: u64,
    name: Option<String>,
    goal: Option<String>,
    sets: Option<u32>,
    work: Option<u32>,
    rest: Option<u32>,
    description: Option<String>,
    tips: Option<String>,
) -> Result<()> {
    let mut catalog = store.load_catalog();
    let mut edited = catalog.get(id).ok_or(WorkoutError::NotFound(id))?.clone();

    if let Some(name) = name {
        edited.name = name;
    }
    if let Some(goal) = goal {
        edited.goal = goal;
    }
    if let Some(sets) = sets {
        edited.sets = sets;
    }
    if let Some(work) = work {
        edited.work_seconds = work;
    }
    if let Some(rest) = rest {
        edited.rest_seconds = rest;
    }
    if let Some(description) = description {
        edited.description = description;
    }
    if let Some(tips) = tips {
        edited.tips = if tips.trim().is_empty() { None } else { Some(tips) };
    }

    catalog.update(edited)?;
    store.save_catalog(&catalog)?;

    println!("{} Updated workout {}", color(GREEN, "[ok]"), id);
    Ok(())
}

/// Delete a custom workout
fn cmd_delete(store: &WorkoutStore, id: u64) -> Result<()> {
    let mut catalog = store.load_catalog();
    let removed = catalog.delete(id)?;
    store.save_catalog(&catalog)?;

    println!("{} Deleted workout {}: {}", color(GREEN, "[ok]"), id, removed.name);
    Ok(())
}

/// Toggle completed
fn cmd_done(store: &WorkoutStore, id: u64) -> Result<()> {
    let mut catalog = store.load_catalog();
    let completed = catalog.toggle_completed(id)?;
    store.save_catalog(&catalog)?;

    if completed {
        println!("{} Workout {} marked as done", color(GREEN, "[ok]"), id);
    } else {
        println!("{} Workout {} marked as not done", color(GREEN, "[ok]"), id);
    }
    Ok(())
}

/// Restores the terminal when dropped
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Redraw the status line
fn render(name: &str, run: &TimerRun) -> Result<()> {
    let mut line = format!(
        "{} {}  set {}/{}  {}",
        color(&format!("{}{}", BOLD, phase_color(run.phase)), run.phase.label()),
        name,
        run.current_set,
        run.config.total_sets,
        color(BOLD, &format_clock(run.remaining_seconds)),
    );
    if run.paused {
        line.push_str(&format!("  {}", color(YELLOW, "PAUSED")));
    }
    line.push_str("   [p]ause [f]inish [q]uit");

    execute!(
        stdout(),
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(line)
    )?;
    Ok(())
}

/// Print a line above the status line
fn announce(text: &str) -> Result<()> {
    execute!(
        stdout(),
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(text),
        Print("\r\n")
    )?;
    Ok(())
}

/// How a driven run ended
enum RunEnd {
    /// Completed, finished early or abandoned in this terminal
    Finished(Stopped),
    /// The active-run slot was cleared by `workout stop` elsewhere
    Released(TimerRun),
}

/// Persist the timer state; false once another invocation has taken the slot away
fn sync_run(store: &WorkoutStore, active: &mut ActiveRun, run: &TimerRun) -> Result<bool> {
    active.timer = run.clone();
    store.update_run(active)
}

/// Tick the timer once per second until it completes or is stopped
fn drive(timer: &mut WorkoutTimer, store: &WorkoutStore, active: &mut ActiveRun, interactive: bool) -> Result<RunEnd> {
    let period = Duration::from_secs(1);
    let mut next_tick = Instant::now() + period;

    if let Some(run) = timer.run() {
        render(&active.workout_name, run)?;
    }

    loop {
        let wait = next_tick.saturating_duration_since(Instant::now());

        if interactive {
            if event::poll(wait)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    let stop = match key.code {
                        KeyCode::Char('p') | KeyCode::Char(' ') => {
                            timer.toggle_pause();
                            None
                        }
                        KeyCode::Char('f') => Some(StopMode::FinishEarly),
                        KeyCode::Char('q') | KeyCode::Esc => Some(StopMode::Abandon),
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            Some(StopMode::Abandon)
                        }
                        _ => None,
                    };

                    if let Some(mode) = stop {
                        let stopped = timer.stop(mode).ok_or_else(|| anyhow!("Timer was not running"))?;
                        return Ok(RunEnd::Finished(stopped));
                    }
                    if let Some(run) = timer.run() {
                        if !sync_run(store, active, run)? {
                            return Ok(RunEnd::Released(run.clone()));
                        }
                        render(&active.workout_name, run)?;
                    }
                }
                continue;
            }
        } else {
            std::thread::sleep(wait);
        }

        next_tick += period;
        match timer.tick() {
            Tick::Completed(run) => {
                return Ok(RunEnd::Finished(Stopped {
                    run,
                    completed: true,
                }))
            }
            Tick::RestStarted { set } => announce(&format!("Set {} done. Rest!", set))?,
            Tick::WorkStarted { set } => announce(&format!("Set {} - go!", set))?,
            Tick::Counting { .. } | Tick::Paused => {}
            Tick::Idle => bail!("Timer stopped unexpectedly"),
        }

        if let Some(run) = timer.run() {
            if !sync_run(store, active, run)? {
                return Ok(RunEnd::Released(run.clone()));
            }
            render(&active.workout_name, run)?;
        }
    }
}

/// Run a workout's countdown
fn cmd_run(store: &WorkoutStore, id: u64, sets: Option<u32>, work: Option<u32>, rest: Option<u32>) -> Result<()> {
    let workout = store.load_catalog().get(id).ok_or(WorkoutError::NotFound(id))?.clone();

    if let Some(existing) = store.active_run() {
        println!(
            "'{}' is already running. Use 'workout stop' to end it first.",
            existing.workout_name
        );
        return Err(TimerError::AlreadyActive.into());
    }

    let config = TimerConfig::new(
        sets.unwrap_or(workout.sets),
        work.unwrap_or(workout.work_seconds),
        rest.unwrap_or(workout.rest_seconds),
    )?;

    let mut timer = WorkoutTimer::new();
    let mut active = ActiveRun::new(&workout, timer.start(config)?.clone());
    store.begin_run(&active)?;

    println!("{}", color(&format!("{}{}", BOLD, MAGENTA), &workout.name.to_uppercase()));
    println!(
        "{} sets of {}s with {}s rest ({})",
        config.total_sets,
        config.work_seconds,
        config.rest_seconds,
        format_duration(config.estimated_seconds())
    );
    println!();

    let interactive = std::io::stdin().is_terminal();
    let outcome = {
        let _raw = if interactive { Some(RawMode::enable()?) } else { None };
        drive(&mut timer, store, &mut active, interactive)
    };
    println!();

    let stopped = match outcome {
        Ok(RunEnd::Finished(stopped)) => stopped,
        Ok(RunEnd::Released(run)) => {
            println!(
                "{} Stopped from another terminal in set {} of {}",
                color(CYAN, "[info]"),
                run.current_set,
                run.config.total_sets
            );
            return Ok(());
        }
        Err(e) => {
            store.release_run(&active)?;
            return Err(e);
        }
    };

    // A stop from elsewhere may land between the last tick and now
    if !store.release_run(&active)? {
        println!("{} Stopped from another terminal", color(CYAN, "[info]"));
        return Ok(());
    }

    if stopped.completed {
        let mut catalog = store.load_catalog();
        catalog.mark_completed(id)?;
        store.save_catalog(&catalog)?;
    }
    store.record_run(&RunRecord::from_run(&active, &stopped.run, stopped.completed))?;
    stdout().flush()?;

    if stopped.completed {
        println!("{} {} done!", color(GREEN, "[ok]"), workout.name);
    } else {
        println!(
            "{} Stopped in set {} of {}",
            color(CYAN, "[info]"),
            stopped.run.current_set,
            stopped.run.config.total_sets
        );
    }
    println!("Active time: {}", format_duration(stopped.run.elapsed_seconds));

    Ok(())
}

/// Show the run in progress
fn cmd_status(store: &WorkoutStore) -> Result<()> {
    let Some(active) = store.active_run() else {
        println!("No workout running");
        println!();
        println!("Start one with: workout run ID");
        return Ok(());
    };

    let run = &active.timer;
    let total = run.config.estimated_seconds().max(1);
    let percent = (run.elapsed_seconds.min(total) * 100) / total;

    println!("{}", color(&format!("{}{}", BOLD, MAGENTA), "WORKOUT RUNNING"));
    println!();
    println!("  {}   {}", color(CYAN, "Workout:"), active.workout_name);
    println!(
        "  {}     {}{}",
        color(CYAN, "Phase:"),
        color(phase_color(run.phase), run.phase.label()),
        if run.paused { " (paused)" } else { "" }
    );
    println!("  {}       {}/{}", color(CYAN, "Set:"), run.current_set, run.config.total_sets);
    println!("  {}      {}", color(CYAN, "Left:"), format_clock(run.remaining_seconds));
    println!("  {}  [{}] {}%", color(CYAN, "Progress:"), progress_bar(percent, 30), percent);
    println!(
        "  {}   {}",
        color(CYAN, "Started:"),
        active.start_time().with_timezone(&chrono::Local).format("%H:%M")
    );

    Ok(())
}

/// End the run in progress from another terminal
fn cmd_stop(store: &WorkoutStore, complete: bool) -> Result<()> {
    let Some(active) = store.active_run() else {
        println!("{} No workout running", color(CYAN, "[info]"));
        return Ok(());
    };

    if complete {
        let mut catalog = store.load_catalog();
        match catalog.mark_completed(active.workout_id) {
            Ok(()) => store.save_catalog(&catalog)?,
            Err(e) => tracing::warn!("Could not mark workout done: {}", e),
        }
    }

    store.record_run(&RunRecord::from_run(&active, &active.timer, complete))?;
    store.clear_run()?;

    println!("{} Stopped '{}'", color(GREEN, "[ok]"), active.workout_name);
    if complete {
        println!("Marked as done");
    }
    Ok(())
}

/// Show workout statistics
fn cmd_stats(store: &WorkoutStore, days: u32) -> Result<()> {
    let records = store.history_for_days(days);
    let stats = WorkoutStats::from_records(&records);
    let (hours, mins) = stats.total_time();
    let (done, total) = store.load_catalog().progress();

    println!("{}", color(BOLD, &format!("Workout Statistics (Last {} days)", days)));
    println!();
    println!("  {}      {}", color(CYAN, "Total Runs:"), stats.total_runs);
    println!(
        "  {}       {} ({}%)",
        color(CYAN, "Completed:"),
        stats.full_runs + stats.finished_early,
        stats.completion_rate
    );

    if stats.total_runs > 0 {
        println!(
            "                  {} full, {} finished early, {} abandoned",
            stats.full_runs, stats.finished_early, stats.abandoned
        );
        println!(
            "  {}    {:.1} per run ({}% of planned)",
            color(CYAN, "Sets Reached:"),
            stats.average_sets,
            stats.set_rate
        );
    }

    println!("  {}     {}h {}m", color(CYAN, "Active Time:"), hours, mins);

    if stats.total_runs > 0 {
        println!("  {}     {}", color(CYAN, "Average Run:"), format_duration(stats.average_seconds()));
    }
    if let Some((name, count)) = stats.favorite {
        println!("  {}        {} ({} runs)", color(CYAN, "Favorite:"), name, count);
    }

    println!();
    println!("  {}   {}/{}", color(CYAN, "Workouts Done:"), done, total);

    Ok(())
}
