extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate shelf;
extern crate shlex;

use std::env;
use std::fs::File;
use std::io::{BufWriter, Write};

use clap::Parser;
use color_eyre::eyre::Result;
use shelf::prelude::*;

//------------------------------------------------------------------------------
fn main() {
    let opts = parse_args();
    if let Err(err) = init_logger(&opts) {
        eprintln!("shelf: could not open log file: {err}");
        std::process::exit(2);
    }

    match real_main(opts) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(err) => {
            // if downstream pipe is closed, exit silently
            if err
                .downcast_ref::<std::io::Error>()
                .is_some_and(|e| e.kind() == std::io::ErrorKind::BrokenPipe)
            {
                std::process::exit(0)
            }
            error!("{err:?}");
            eprintln!("shelf: {err}");
            std::process::exit(2)
        }
    }
}

fn parse_args() -> ShelfOptions {
    let mut args = Vec::new();

    args.push(env::args().next().unwrap_or_else(|| String::from("shelf")));
    args.extend(
        env::var("SHELF_DEFAULT_OPTIONS")
            .ok()
            .and_then(|val| shlex::split(&val))
            .unwrap_or_default(),
    );
    args.extend(env::args().skip(1));

    ShelfOptions::parse_from(args).build()
}

fn init_logger(opts: &ShelfOptions) -> std::io::Result<()> {
    let mut builder = env_logger::builder();
    builder.format_timestamp_nanos();
    if let Some(path) = &opts.log_file {
        builder.target(env_logger::Target::Pipe(Box::new(File::create(path)?)));
    }
    builder.init();
    Ok(())
}

fn real_main(opts: ShelfOptions) -> Result<i32> {
    color_eyre::install()?;

    //------------------------------------------------------------------------------
    // completions
    if let Some(shell) = &opts.shell {
        shelf::completions::generate(shell);
        return Ok(0);
    }

    //------------------------------------------------------------------------------
    let print_id = opts.print_id;
    let output = Shelf::run_with(opts, None)?;
    if output.is_abort {
        return Ok(output.exit_code());
    }

    //------------------------------------------------------------------------------
    // output
    let mut stdout = BufWriter::new(std::io::stdout().lock());
    for candidate in &output.committed {
        if print_id {
            writeln!(stdout, "{}", candidate.id)?;
        } else {
            writeln!(stdout, "{}", candidate.label)?;
        }
    }
    stdout.flush()?;

    Ok(output.exit_code())
}
