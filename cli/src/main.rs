use std::io::{self, BufRead, Write};
use std::rc::Rc;

use clap::Parser as ClapParser;
use optdispatch_core::{CliOption, FnOption, Parser, RegistryError, dispatch, expect_exactly};
use tracing::info;
use tracing_subscriber::EnvFilter;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

const USAGE: &str = "\
Commands:
    -w VALUE    store VALUE
    -r          print the stored value
    --help      show this message";

const BLANK_HINT: &str = "nothing to do, type --help for commands";

#[derive(Debug, ClapParser)]
#[command(name = "optdispatch-repl", version = PACKAGE_VERSION)]
#[command(about = "Dispatch each input line through one reusable option parser")]
struct Cli {
    /// Prompt printed before each line.
    #[arg(long, default_value = "> ")]
    prompt: String,
    /// Do not print a prompt.
    #[arg(long)]
    quiet: bool,
}

/// State shared by every cycle of the session.
#[derive(Debug, Default)]
struct Session {
    value: String,
}

fn build_parser() -> Result<Parser<Session>, RegistryError> {
    let read: Rc<dyn CliOption<Session>> =
        Rc::new(FnOption::new(1, |session: &mut Session, _: &[String]| {
            println!("{}", session.value);
            Ok(())
        }));

    Parser::builder()
        .leading(
            FnOption::new(0, |_: &mut Session, args: &[String]| {
                if !args.is_empty() {
                    info!(tokens = ?args, "leading tokens");
                }
                Ok(())
            })
            .with_check(|_| Ok(())),
        )
        .option(
            "--help",
            FnOption::new(-1, |_: &mut Session, _: &[String]| {
                println!("{USAGE}");
                Ok(())
            }),
        )
        .shared("-r", Rc::clone(&read))
        .option(
            "-w",
            FnOption::new(0, |session: &mut Session, args: &[String]| {
                session.value = args[0].clone();
                Ok(())
            })
            .with_check(|args| expect_exactly("-w", 1, args)),
        )
        .default_shared(read)
        .on_blank(|_: &mut Session| println!("{BLANK_HINT}"))
        .build()
}

fn run(cli: Cli) -> Result<(), String> {
    let mut parser = build_parser().map_err(|err| err.to_string())?;
    let mut session = Session::default();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if !cli.quiet {
            print!("{}", cli.prompt);
            io::stdout()
                .flush()
                .map_err(|err| format!("Failed to write prompt: {err}"))?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(|err| format!("Failed to read stdin: {err}"))?;

        dispatch(&mut parser, &mut session, line.split_whitespace());
        parser.clear();
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
