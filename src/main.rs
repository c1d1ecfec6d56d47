use anyhow::{Context, Result as AnyhowResult};
use catline::config::{ColorMode, Config};
use catline::primitives::highlighter::{theme_names, FormatterTarget};
use catline::primitives::lexer::LexerStrategy;
use catline::services::tracing_setup;
use catline::{render, LineWindow};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use crossterm::style::Stylize;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::PathBuf;

/// Print a window of a file's lines with line numbers
#[derive(Parser, Debug)]
#[command(name = "catline")]
#[command(
    about = "Print a range of lines from a file, numbered and syntax highlighted",
    long_about = None
)]
#[command(version)]
#[command(override_usage = "catline [OPTIONS] FILE [ START[:END] | START END ]")]
#[command(allow_negative_numbers = true)]
struct Args {
    /// File to print
    #[arg(value_name = "FILE", required_unless_present_any = ["dump_config", "list_themes"])]
    file: Option<PathBuf>,

    /// First line to print (zero-based), or a START:END range
    #[arg(value_name = "START")]
    start: Option<String>,

    /// Line to stop before; -1 prints through the end of the file
    #[arg(value_name = "END")]
    end: Option<String>,

    /// Don't syntax highlight
    #[arg(long)]
    plain: bool,

    /// How to pick a grammar for the file
    #[arg(long, value_enum, value_name = "STRATEGY")]
    lexer: Option<LexerStrategy>,

    /// When to use color
    #[arg(long, value_enum, value_name = "WHEN")]
    color: Option<ColorMode>,

    /// Highlighting theme (see --list-themes)
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file for diagnostics (default: stderr)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Print the available highlighting themes and exit
    #[arg(long)]
    list_themes: bool,
}

impl Args {
    /// Fold command-line overrides into the loaded configuration
    fn apply_to(&self, config: &mut Config) {
        if self.plain {
            config.highlight = false;
        }
        if let Some(lexer) = self.lexer {
            config.lexer_strategy = lexer;
        }
        if let Some(color) = self.color {
            config.color = color;
        }
        if let Some(theme) = &self.theme {
            config.theme = theme.clone();
        }
    }
}

fn load_config(args: &Args) -> AnyhowResult<Config> {
    match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::load_or_default()),
    }
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();
    tracing_setup::init(args.log_file.as_deref())?;

    if args.list_themes {
        return write_stdout(|out| {
            theme_names()
                .iter()
                .try_for_each(|name| writeln!(out, "{name}"))
        })
        .context("Failed to list themes");
    }

    let mut config = load_config(&args)?;
    args.apply_to(&mut config);
    config.validate().context("Invalid configuration")?;

    if args.dump_config {
        let json = serde_json::to_string_pretty(&config)?;
        return write_stdout(|out| writeln!(out, "{json}")).context("Failed to print config");
    }

    let Some(path) = args.file.as_deref() else {
        Args::command().print_help()?;
        return Ok(());
    };

    let window = match LineWindow::parse_args(args.start.as_deref(), args.end.as_deref()) {
        Ok(window) => window,
        Err(e) => Args::command().error(ErrorKind::ValueValidation, e).exit(),
    };

    if !path.is_file() {
        eprintln!("catline: {}: No such file", path.display());
        std::process::exit(1);
    }

    let options = config.render_options(io::stdout().is_terminal());
    tracing::debug!("Rendering {} window {} with {:?}", path.display(), window, options);
    let lines = render(path, window, &options)?;

    write_stdout(|out| print_lines(out, &lines, &config, options.formatter))
        .with_context(|| format!("Failed to print {}", path.display()))
}

/// Run `write` against buffered stdout; a reader that went away early is not an error
fn write_stdout(write: impl FnOnce(&mut dyn Write) -> io::Result<()>) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match write(&mut out).and_then(|()| out.flush()) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result,
    }
}

/// Write ` N` left-justified to the gutter width, the separator, then the text
fn print_lines(
    out: &mut dyn Write,
    lines: &[(usize, String)],
    config: &Config,
    target: FormatterTarget,
) -> io::Result<()> {
    for (number, text) in lines {
        let gutter = format!("{:<width$}", format!(" {number}"), width = config.gutter_width);
        match target {
            FormatterTarget::Terminal => write!(
                out,
                "{} {} ",
                gutter.as_str().dim(),
                config.separator.as_str().dim()
            )?,
            FormatterTarget::Plain => write!(out, "{} {} ", gutter, config.separator)?,
        }
        writeln!(out, "{text}")?;
    }
    Ok(())
}
