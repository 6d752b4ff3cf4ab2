//! pushup-log: guided push-up progression from the terminal
//!
//! ```bash
//! pushup-log onboard 12        # initial max test, picks a program
//! pushup-log status            # this week at a glance
//! pushup-log workout           # next undone day, set by set
//! pushup-log workout --resume  # pick up an interrupted workout
//! pushup-log advance           # next week once all three days are done
//! ```

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use pushup_log_lib::aggregation::format_duration;
use pushup_log_lib::commands::{onboarding, progress, workout, AppState};
use pushup_log_lib::config::AppConfig;
use pushup_log_lib::db::SqliteStore;
use pushup_log_lib::logging::init_logging;
use pushup_log_lib::models::DayOfWeek;
use pushup_log_lib::reps::validate_rep_entry;
use pushup_log_lib::session::{Cue, SessionState, WorkoutSession};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "pushup-log", about = "Guided push-up progression tracker")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Show the current week, next workout and lifetime reps
  Status,

  /// Record an initial max-push-up test and start the matching program
  Onboard {
    /// Push-ups done in one go
    count: u32,
  },

  /// List every program and its test range
  Programs,

  /// Show the workouts of a week (default: current week)
  Plan {
    #[arg(long)]
    week: Option<u32>,
  },

  /// Run a workout set by set
  Workout {
    /// monday, wednesday or friday (default: next undone day)
    day: Option<DayOfWeek>,

    /// Continue the interrupted workout, if any
    #[arg(long)]
    resume: bool,

    /// Skip rest countdowns
    #[arg(long)]
    no_rest: bool,
  },

  /// Move on to the next week
  Advance,

  /// Go back to an earlier week
  Rewind { week: u32 },

  /// List completed workouts, newest first
  History,

  /// Delete all progress and history
  Reset {
    /// Required to actually reset
    #[arg(long)]
    yes: bool,
  },
}

#[tokio::main]
async fn main() -> CliResult {
  dotenvy::dotenv().ok();
  let cli = Cli::parse();

  let config = AppConfig::from_env()?;
  init_logging(&config.log_level);

  let state = pushup_log_lib::initialize_app(config).await?;

  match cli.command {
    Command::Status => status(&state).await,
    Command::Onboard { count } => {
      let onboarding::OnboardingOutcome { progress, program } =
        onboarding::complete_onboarding(&state, count).await?;
      println!("Starting {} at week {}", progress.current_program, progress.current_week);
      if !program.description.is_empty() {
        println!("  {}", program.description);
      }
      Ok(())
    }
    Command::Programs => {
      for program in onboarding::list_programs(&state).await? {
        let range = match program.initial_test_max {
          Some(max) => format!("{}-{}", program.initial_test_min, max),
          None => format!("{}+", program.initial_test_min),
        };
        println!("{:<16} {:>7} reps  {}", program.name, range, program.description);
      }
      Ok(())
    }
    Command::Plan { week } => plan(&state, week).await,
    Command::Workout { day, resume, no_rest } => run_workout(&state, day, resume, no_rest).await,
    Command::Advance => {
      let progress = progress::advance_week(&state).await?;
      println!("Now on week {}", progress.current_week);
      Ok(())
    }
    Command::Rewind { week } => {
      let progress = progress::rewind_week(&state, week).await?;
      println!("Now on week {}", progress.current_week);
      Ok(())
    }
    Command::History => history(&state).await,
    Command::Reset { yes } => {
      if !yes {
        return Err("This deletes all progress. Re-run with --yes to confirm.".into());
      }
      progress::reset_progress(&state).await?;
      println!("All progress deleted");
      Ok(())
    }
  }
}

async fn status(state: &AppState<SqliteStore>) -> CliResult {
  let Some(overview) = progress::get_home_overview(state).await? else {
    println!("No program yet. Start with `pushup-log onboard <count>`.");
    return Ok(());
  };

  println!(
    "{} - week {} of {}",
    overview.progress.current_program, overview.progress.current_week, overview.max_week
  );
  for day in DayOfWeek::ALL {
    let mark = if overview.week_completion.is_completed(day) {
      "done"
    } else if overview.in_progress_day == Some(day) {
      "in progress"
    } else if overview.next_up == Some(day) {
      "next up"
    } else {
      ""
    };
    println!("  {:<10} {}", day.display_name(), mark);
  }
  println!("Lifetime reps: {}", overview.total_reps);

  if overview.in_progress_day.is_some() {
    println!("Resume with `pushup-log workout --resume`.");
  } else if overview.can_advance {
    println!(
      "Week {} complete! Run `pushup-log advance` for week {}.",
      overview.progress.current_week,
      overview.progress.current_week + 1
    );
  }
  Ok(())
}

async fn plan(state: &AppState<SqliteStore>, week: Option<u32>) -> CliResult {
  let view = workout::get_week_plan(state, week).await?;
  println!("{} - week {} of {}", view.program, view.week, view.max_week);
  for day in view.days {
    let done = match day.total_reps {
      Some(reps) => format!("done, {} reps", reps),
      None => String::new(),
    };
    println!(
      "  {:<4} {} sets: {:<20} rest {}s  {}",
      day.day.short_name(),
      day.summary.total_sets,
      day.summary.reps_preview,
      day.summary.rest_seconds,
      done
    );
  }
  Ok(())
}

async fn history(state: &AppState<SqliteStore>) -> CliResult {
  let history = progress::get_history(state).await?;
  if history.workouts.is_empty() {
    println!("No workouts yet");
  }
  for w in history.workouts {
    println!(
      "{}  week {:>2} {:<4} {:>4} reps  {}",
      w.completed_at.format("%Y-%m-%d"),
      w.week,
      w.day.short_name(),
      w.total_reps,
      format_duration(w.duration_seconds)
    );
  }
  Ok(())
}

/// Lines from stdin, read on their own task so rest countdowns can race them
fn spawn_stdin_lines() -> mpsc::UnboundedReceiver<String> {
  let (tx, rx) = mpsc::unbounded_channel();
  tokio::spawn(async move {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
      if tx.send(line).is_err() {
        break;
      }
    }
  });
  rx
}

async fn run_workout(
  state: &AppState<SqliteStore>,
  day: Option<DayOfWeek>,
  resume: bool,
  no_rest: bool,
) -> CliResult {
  let request = workout::session_request_for(state, day, resume).await?;
  let mut session = WorkoutSession::new(&state.catalog, &state.store, state.config.finish_delay);
  let mut input = spawn_stdin_lines();

  session.start(request.clone(), Utc::now()).await;

  loop {
    match session.state().clone() {
      SessionState::Uninitialized => {
        println!(
          "Nothing to do for {} week {} {}",
          request.program, request.week, request.day
        );
        break;
      }
      SessionState::InProgress(w) => {
        if let Some(set) = w.current_set() {
          let hint = if set.target_reps.is_minimum() { " (as many as you can)" } else { "" };
          println!(
            "Set {}/{}: {} reps{}  [Enter when done]",
            set.set_number,
            w.sets.len(),
            set.target_reps,
            hint
          );
        }
        if input.recv().await.is_none() {
          println!("Workout saved. Continue with `pushup-log workout --resume`.");
          break;
        }
        session.complete_set(Utc::now()).await;
      }
      SessionState::AwaitingReps { minimum, .. } => {
        println!("How many reps? (at least {}, blank to go back)", minimum);
        let Some(line) = input.recv().await else {
          break;
        };
        let line = line.trim();
        if line.is_empty() {
          session.cancel_rep_entry().await;
          continue;
        }
        match line.parse::<u32>().map_err(|e| e.to_string()).and_then(|reps| {
          validate_rep_entry(minimum, reps).map_err(|e| e.to_string())
        }) {
          Ok(reps) => {
            session.submit_reps(reps, Utc::now()).await;
          }
          Err(e) => println!("{}", e),
        }
      }
      SessionState::Resting { remaining_seconds, .. } => {
        if no_rest {
          session.skip_rest().await;
          continue;
        }
        println!("Rest {}  [Enter to skip]", format_duration(u64::from(remaining_seconds)));
        let skip = async {
          input.recv().await;
        };
        session
          .run_rest(skip, |remaining| {
            print!("\r  {} ", format_duration(u64::from(remaining)));
            let _ = std::io::stdout().flush();
          })
          .await;
        println!();
      }
      SessionState::Finished(done) => {
        report_cues(session.take_cues());
        println!(
          "Workout complete: {} reps in {}",
          done.total_reps,
          format_duration(done.duration_seconds)
        );
        break;
      }
    }
    report_cues(session.take_cues());
  }

  Ok(())
}

fn report_cues(cues: Vec<Cue>) {
  for cue in cues {
    match cue {
      Cue::SetComplete => println!("\x07Set complete"),
      Cue::RestOver => println!("\x07Rest over"),
      Cue::WorkoutComplete => println!("\x07Nice work!"),
    }
  }
}
