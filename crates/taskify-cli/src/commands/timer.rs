use std::io::Write as _;

use clap::Subcommand;
use taskify_core::timer::{FocusTimer, TerminalBell, TimerSnapshot, TICK_PERIOD};
use taskify_core::{Config, Event, TimerMode, TimerSettings, TokioTicker, Workspace};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use super::CommandResult;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the timer in the foreground and read commands from stdin
    Run {
        /// Start in this mode: work, short or long
        #[arg(long)]
        mode: Option<TimerMode>,
        /// Start with the completion cue muted
        #[arg(long)]
        mute: bool,
    },
    /// Show or change timer settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the current settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change one or more settings
    Set {
        /// Focus minutes
        #[arg(long)]
        work: Option<u32>,
        /// Short break minutes
        #[arg(long)]
        short: Option<u32>,
        /// Long break minutes
        #[arg(long)]
        long: Option<u32>,
        /// Focus sessions per long break
        #[arg(long)]
        interval: Option<u32>,
        /// Start breaks automatically
        #[arg(long)]
        auto_breaks: Option<bool>,
        /// Start focus sessions automatically
        #[arg(long)]
        auto_work: Option<bool>,
    },
}

const HELP: &str = "commands: t toggle | r reset | s skip | w/short/long switch mode | m mute | \
set <work|short|long|interval|auto-breaks|auto-work> <value> | q quit";

enum Control {
    Continue,
    Quit,
}

pub fn run(action: TimerAction, config: Config) -> CommandResult {
    let ws = Workspace::open(config);
    match action {
        TimerAction::Run { mode, mute } => run_foreground(&ws, mode, mute),
        TimerAction::Settings { action } => settings(&ws, action),
    }
}

fn settings(ws: &Workspace, action: SettingsAction) -> CommandResult {
    match action {
        SettingsAction::Show { json } => {
            let s = ws.timer_settings()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&s)?);
            } else {
                print_settings(&s);
            }
        }
        SettingsAction::Set {
            work,
            short,
            long,
            interval,
            auto_breaks,
            auto_work,
        } => {
            let mut s = ws.timer_settings()?;
            if let Some(v) = work {
                s.work_duration = v;
            }
            if let Some(v) = short {
                s.short_break_duration = v;
            }
            if let Some(v) = long {
                s.long_break_duration = v;
            }
            if let Some(v) = interval {
                s.long_break_interval = v;
            }
            if let Some(v) = auto_breaks {
                s.auto_start_breaks = v;
            }
            if let Some(v) = auto_work {
                s.auto_start_work = v;
            }
            ws.save_timer_settings(&s)?;
            println!("Settings updated.");
            print_settings(&s);
        }
    }
    Ok(())
}

fn print_settings(s: &TimerSettings) {
    println!("Focus:            {} min", s.work_duration);
    println!("Short break:      {} min", s.short_break_duration);
    println!("Long break:       {} min", s.long_break_duration);
    println!("Long break every: {} sessions", s.long_break_interval);
    println!("Auto-start breaks: {}", s.auto_start_breaks);
    println!("Auto-start focus:  {}", s.auto_start_work);
}

fn run_foreground(ws: &Workspace, mode: Option<TimerMode>, mute: bool) -> CommandResult {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .enable_io()
        .build()?;
    let ticker = TokioTicker::new(runtime.handle().clone());
    let timer = ws.focus_timer(ticker, TerminalBell)?;
    if mute {
        timer.set_sound_enabled(false);
    }
    tracing::debug!(?mode, mute, "starting foreground timer");
    if let Some(mode) = mode {
        timer.switch_mode(mode);
    }

    println!("{HELP}");
    let result = runtime.block_on(drive(&timer));
    timer.shutdown();
    println!();
    result
}

async fn drive(timer: &FocusTimer) -> CommandResult {
    let mut events = timer.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut redraw = tokio::time::interval(TICK_PERIOD);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if let Control::Quit = handle_command(timer, line.trim()) {
                    break;
                }
                draw(&timer.snapshot());
            }
            event = events.recv() => match event {
                Ok(event @ Event::TimerCompleted { .. }) => announce(&event),
                Ok(_) | Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            },
            _ = redraw.tick() => draw(&timer.snapshot()),
        }
    }
    Ok(())
}

fn announce(event: &Event) {
    if let Event::TimerCompleted { finished, next, completed_work_cycles, .. } = event {
        let at = event.at().with_timezone(&chrono::Local).format("%H:%M");
        println!();
        println!("[{at}] {finished} finished ({completed_work_cycles} focus sessions). Next: {next}");
    }
}

fn handle_command(timer: &FocusTimer, input: &str) -> Control {
    match input {
        "" => {}
        "t" | "toggle" => {
            timer.toggle();
        }
        "r" | "reset" => {
            timer.reset();
        }
        "s" | "skip" => {
            timer.skip();
        }
        "w" | "work" => {
            timer.switch_mode(TimerMode::Work);
        }
        "short" => {
            timer.switch_mode(TimerMode::ShortBreak);
        }
        "long" => {
            timer.switch_mode(TimerMode::LongBreak);
        }
        "m" | "mute" => {
            let on = timer.toggle_sound();
            println!("sound {}", if on { "on" } else { "off" });
        }
        "q" | "quit" => return Control::Quit,
        cmd if cmd.starts_with("set ") => {
            let mut words = cmd.split_whitespace().skip(1);
            match (words.next(), words.next(), words.next()) {
                (Some(field), Some(value), None) => {
                    match timer.settings().with_field(field, value) {
                        Ok(settings) => {
                            timer.update_settings(settings);
                            println!("settings updated");
                        }
                        Err(e) => println!("{e}"),
                    }
                }
                _ => println!("usage: set <setting> <value>"),
            }
        }
        "h" | "help" | "?" => println!("{HELP}"),
        other => println!("unknown command: {other}"),
    }
    Control::Continue
}

fn draw(snap: &TimerSnapshot) {
    const WIDTH: usize = 20;
    let filled = ((snap.progress * WIDTH as f64).round() as usize).min(WIDTH);
    let state = if snap.is_active { "running" } else { "paused" };
    let sound = if snap.sound_enabled { "" } else { " (muted)" };
    print!(
        "\r{:<11} {} [{}{}] {state} | session {}/{}{sound}   ",
        snap.mode.label(),
        snap.display,
        "#".repeat(filled),
        "-".repeat(WIDTH - filled),
        snap.cycle_position,
        snap.long_break_interval,
    );
    let _ = std::io::stdout().flush();
}
