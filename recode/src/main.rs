use std::env;
use std::process;

use optdispatch_core::dispatch;
use optdispatch_recode::{RecodeContext, build_parser};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut parser = match build_parser() {
        Ok(parser) => parser,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    };

    let tokens = match env::args_os()
        .skip(1)
        .map(|arg| arg.into_string())
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(tokens) => tokens,
        Err(arg) => {
            eprintln!("error: argument is not valid UTF-8: {}", arg.to_string_lossy());
            process::exit(2);
        }
    };

    let mut ctx = RecodeContext::default();
    if !dispatch(&mut parser, &mut ctx, tokens).is_completed() {
        process::exit(2);
    }
}
