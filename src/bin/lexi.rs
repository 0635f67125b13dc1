use std::process;

use {
    clap::Parser,
    lexenv::{programs, ErrorCategory, Interpreter},
    simplelog::{ConfigBuilder, LevelFilter, SimpleLogger},
};

#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

/// Run one of the bundled closure programs.
#[derive(Parser)]
#[clap(name = "lexi", version)]
struct Params {
    /// Name of the program to run (see `--list`)
    program: Option<String>,

    /// List the bundled programs and exit
    #[clap(long)]
    list: bool,

    /// Print the static scope table before running
    #[clap(long)]
    scopes: bool,

    /// Maximum number of active calls
    #[clap(long, default_value_t = Interpreter::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Raise log verbosity (repeat for more)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Params::parse();
    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    SimpleLogger::init(
        level,
        ConfigBuilder::new()
            .set_thread_level(LevelFilter::Off)
            .set_time_level(LevelFilter::Off)
            .set_location_level(LevelFilter::Debug)
            .build(),
    )
    .unwrap();

    if args.list {
        for demo in programs::ALL {
            println!("{:24} {}", demo.name, demo.about);
        }
        return;
    }

    let name = match args.program {
        Some(name) => name,
        None => {
            eprintln!("No program given; try `--list`.");
            process::exit(64);
        }
    };

    let demo = match programs::find(&name) {
        Some(demo) => demo,
        None => {
            eprintln!("Unknown program `{}`; try `--list`.", name);
            process::exit(64);
        }
    };

    let program = (demo.build)();
    let mut interp = Interpreter::default().with_max_depth(args.max_depth);
    if args.scopes {
        print!("{}", interp.scope_table(&program));
    }

    match interp.interpret(&program) {
        Ok(value) => {
            log::info!("{:?}", interp.stats());
            println!("{}", value);
        }
        Err(e) => {
            eprintln!("{}", e);
            process::exit(match e.category() {
                ErrorCategory::Resolution => 65,
                ErrorCategory::Runtime => 70,
            })
        }
    }
}
