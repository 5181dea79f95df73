//! Command-line front end: parse one document and print every view of
//! it, from the raw node listing down to the plain-data projection.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use sexptree::{LogTrace, Tree};

#[derive(Parser)]
#[command(name = "sexptree")]
#[command(about = "Parse an s-expression file and print its tree, canonical and pretty forms")]
struct Args {
    /// Path of the file to parse.
    file: PathBuf,

    /// Log every rule the state machine dispatches.
    #[arg(long)]
    trace: bool,

    /// Line width for the pretty-printed form.
    #[arg(long, default_value_t = 80)]
    width: usize,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.trace { "trace" } else { "info" };
    // The handle must stay alive or logging shuts down early.
    let _logger = match flexi_logger::Logger::try_with_env_or_str(level).and_then(|l| l.start()) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("logging setup failed: {err}");
            None
        }
    };

    let tree = match parse(&args) {
        Ok(tree) => tree,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    print!("{}", tree.dump());
    println!("{tree}");
    println!("{}", sexptree::to_string_pretty(&tree, args.width));
    println!("{:?}", tree.to_value());
    ExitCode::SUCCESS
}

fn parse(args: &Args) -> Result<Tree, sexptree::ParseError> {
    if args.trace {
        let file = File::open(&args.file)?;
        sexptree::from_reader_with(BufReader::new(file), LogTrace)
    } else {
        sexptree::from_path(&args.file)
    }
}
