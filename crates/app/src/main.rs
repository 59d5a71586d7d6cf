use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use incense_altar_core::{
    layout_sticks, Action, AltarConfig, AltarError, AltarSession, FrameRenderer, PrayerMode,
};
use tracing_subscriber::EnvFilter;

fn main() -> incense_altar_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref(), cli.revision)?;

    match cli.command {
        Commands::Simulate {
            lights,
            lines,
            text,
            chant,
            step_ms,
        } => run_simulate(config, lights, &lines, text, chant, step_ms),
        Commands::Layout { count } => run_layout(&config, count),
        Commands::Interactive => run_interactive(config),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

fn load_config(path: Option<&PathBuf>, revision: Revision) -> incense_altar_core::Result<AltarConfig> {
    let config = match path {
        Some(path) => {
            tracing::info!(?path, "loading configuration");
            AltarConfig::from_path(path)?
        }
        None => revision.config(),
    };
    config.validate()?;
    Ok(config)
}

fn run_simulate(
    config: AltarConfig,
    lights: u32,
    lines: &[String],
    text: Option<String>,
    chant: bool,
    step_ms: u64,
) -> incense_altar_core::Result<()> {
    if step_ms == 0 {
        return Err(AltarError::msg("--step-ms must be greater than zero"));
    }
    tracing::info!(lights, chant, step_ms, "starting simulation");

    let renderer = FrameRenderer::default();
    let mut session = AltarSession::new(config);
    for _ in 0..lights {
        session.dispatch(Action::Light);
    }
    while session.lighting().pending() > 0 {
        session.advance(step_ms);
        print_frame(&renderer, &session)?;
    }

    if !chant {
        return Ok(());
    }

    if session.config().controls.composer {
        session.dispatch(Action::OpenComposer);
    }
    match session.prayer().mode() {
        PrayerMode::LineList if lines.is_empty() => {
            session.dispatch(Action::LoadSample);
        }
        PrayerMode::LineList => {
            for line in lines {
                session.dispatch(Action::SetDraft(line.clone()));
                session.dispatch(Action::AddLine);
            }
        }
        PrayerMode::FreeText => match text {
            Some(text) => {
                session.dispatch(Action::SetText(text));
            }
            None => {
                session.dispatch(Action::LoadSample);
            }
        },
    }

    if !session.dispatch(Action::StartChant) {
        return Err(AltarError::msg("chant could not start; light a stick and add a prayer first"));
    }
    while session.is_chanting() {
        print_frame(&renderer, &session)?;
        session.advance(step_ms);
    }
    print_frame(&renderer, &session)
}

fn run_layout(config: &AltarConfig, count: u64) -> incense_altar_core::Result<()> {
    let sticks = layout_sticks(count, &config.layout);
    let json = serde_json::to_string_pretty(&sticks)
        .map_err(|err| AltarError::msg(format!("failed to encode layout: {err}")))?;
    println!("{json}");
    Ok(())
}

fn run_interactive(config: AltarConfig) -> incense_altar_core::Result<()> {
    let renderer = FrameRenderer::default();
    let mut session = AltarSession::new(config);
    let mut last_tick = Instant::now();

    print_frame(&renderer, &session)?;
    prompt()?;
    for line in io::stdin().lock().lines() {
        let line = line?;
        let elapsed = last_tick.elapsed().as_millis() as u64;
        last_tick = Instant::now();
        session.advance(elapsed);

        match parse_command(line.trim()) {
            Some(Command::Quit) => break,
            Some(Command::Show) => {}
            Some(Command::Act(action)) => {
                if !session.dispatch(action) {
                    println!("(không khả dụng)");
                }
            }
            Some(Command::AddLine(text)) => {
                let added = session.dispatch(Action::SetDraft(text))
                    && session.dispatch(Action::AddLine);
                if !added {
                    println!("(không khả dụng)");
                }
            }
            None => println!("{HELP}"),
        }
        print_frame(&renderer, &session)?;
        prompt()?;
    }

    session.shutdown();
    Ok(())
}

const HELP: &str = "commands: light | reset | compose | close | draft <text> | add | remove <n> \
| sample | clear | text <text> | chant | done | show | quit";

enum Command {
    Act(Action),
    /// Sets the draft and commits it in one go.
    AddLine(String),
    Show,
    Quit,
}

fn parse_command(input: &str) -> Option<Command> {
    let (word, rest) = input.split_once(' ').unwrap_or((input, ""));
    let action = match word {
        "light" => Action::Light,
        "reset" => Action::Reset,
        "compose" => Action::OpenComposer,
        "close" => Action::CloseComposer,
        "draft" => Action::SetDraft(rest.to_string()),
        "add" if rest.is_empty() => Action::AddLine,
        "add" => return Some(Command::AddLine(rest.to_string())),
        "remove" => Action::RemoveLine(rest.trim().parse().ok()?),
        "sample" => Action::LoadSample,
        "clear" => Action::ClearPrayer,
        "text" => Action::SetText(rest.replace("\\n", "\n")),
        "chant" => Action::StartChant,
        "done" => Action::CompleteChant,
        "show" | "" => return Some(Command::Show),
        "quit" | "exit" => return Some(Command::Quit),
        _ => return None,
    };
    Some(Command::Act(action))
}

fn print_frame(renderer: &FrameRenderer, session: &AltarSession) -> incense_altar_core::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "--- t={}ms", session.now_ms())?;
    for line in renderer.render(&session.snapshot())? {
        writeln!(stdout, "{line}")?;
    }
    Ok(())
}

fn prompt() -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "> ")?;
    stdout.flush()
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Virtual incense altar", long_about = None)]
struct Cli {
    /// JSON configuration file. Overrides `--revision`.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Built-in configuration preset.
    #[arg(short, long, value_enum, default_value_t = Revision::Composer, global = true)]
    revision: Revision,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Revision {
    /// Prayer lines edited in a composer, grid layout.
    Composer,
    /// Free-text prayer, grid layout.
    FreeText,
    /// Free-text prayer, sticks on a single jittered band.
    Arc,
}

impl Revision {
    fn config(self) -> AltarConfig {
        match self {
            Revision::Composer => AltarConfig::composer_revision(),
            Revision::FreeText => AltarConfig::free_text_revision(),
            Revision::Arc => AltarConfig::arc_revision(),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a scripted session on a virtual clock and print every frame.
    Simulate {
        /// Number of sticks to light.
        #[arg(short, long, default_value_t = 3)]
        lights: u32,
        /// Prayer line to add (line-list prayers). May be repeated.
        #[arg(long = "line")]
        lines: Vec<String>,
        /// Prayer text (free-text prayers).
        #[arg(long)]
        text: Option<String>,
        /// Chant the prayer once the sticks are lit.
        #[arg(long)]
        chant: bool,
        /// Virtual milliseconds between printed frames.
        #[arg(long, default_value_t = 500)]
        step_ms: u64,
    },
    /// Print stick positions for a lit count as JSON.
    Layout {
        /// Number of lit sticks.
        #[arg(short = 'n', long, default_value_t = 10)]
        count: u64,
    },
    /// Read commands from stdin, advancing the altar in real time.
    Interactive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_arguments() {
        assert!(matches!(
            parse_command("remove 2"),
            Some(Command::Act(Action::RemoveLine(2)))
        ));
        assert!(matches!(
            parse_command("draft Cầu an"),
            Some(Command::Act(Action::SetDraft(text))) if text == "Cầu an"
        ));
        assert!(matches!(parse_command("add"), Some(Command::Act(Action::AddLine))));
        assert!(matches!(
            parse_command("add Vạn sự như ý"),
            Some(Command::AddLine(text)) if text == "Vạn sự như ý"
        ));
        assert!(parse_command("remove x").is_none());
        assert!(parse_command("dance").is_none());
    }

    #[test]
    fn text_command_expands_newlines() {
        let Some(Command::Act(Action::SetText(text))) = parse_command("text một\\nhai") else {
            panic!("expected SetText");
        };
        assert_eq!(text, "một\nhai");
    }

    #[test]
    fn cli_parses_simulate_flags() {
        let cli = Cli::parse_from([
            "incense-altar",
            "--revision",
            "free-text",
            "simulate",
            "--lights",
            "2",
            "--text",
            "Nam mô",
            "--chant",
        ]);
        assert_eq!(cli.revision, Revision::FreeText);
        assert!(matches!(
            cli.command,
            Commands::Simulate { lights: 2, chant: true, .. }
        ));
    }
}
