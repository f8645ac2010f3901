#[macro_use] extern crate log;

use std::fs::File;
use std::io::{self, Write};
use clap::{App, Arg, ArgMatches};
use optibf::{BrainfuckError, Compiler, Interpreter, Optimizer, Program, TapePolicy, generate_c};
use optibf::parser::parse;

fn load(path: &str, passes: &str) -> Result<Program, BrainfuckError> {

    // Parse the file
    debug!("Opening {}.", path);
    let file = File::open(path)?;
    debug!("Parsing source file.");
    let tokens = parse(file)?;

    // Optimize and pair the brackets
    let optimizer = Optimizer::with_passes_str(passes)?;
    optimizer.optimize(&tokens)
}

fn main_execute(program: &Program, policy: TapePolicy) -> Result<(), BrainfuckError> {

    // Prepare an interpreter to run the instructions
    let mut interpreter =
        Interpreter::builder()
        .tape(policy)
        .input(io::stdin())
        .output(io::stdout())
        .build();

    // Aaaaand, run!
    debug!("Running program.");
    interpreter.run(program)?;
    debug!("Done.");

    Ok(())
}

fn main_jit(program: &Program, policy: TapePolicy) -> Result<(), BrainfuckError> {
    let compiled = match Compiler::with_tape(policy).compile(program) {
        Ok(compiled) => compiled,
        Err(e @ BrainfuckError::LoopNestingTooDeep { .. }) => {
            warn!("{}, falling back to the interpreter.", e);
            return main_execute(program, policy);
        },
        Err(e) => return Err(e)
    };

    debug!("Running compiled program.");
    compiled.run(io::stdin(), io::stdout())?;
    debug!("Done.");

    Ok(())
}

fn main_dump(program: &Program) -> Result<(), BrainfuckError> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write!(lock, "{}", program)?;
    lock.flush()?;
    Ok(())
}

fn main_emit_c(program: &Program, policy: TapePolicy, path: &str) -> Result<(), BrainfuckError> {
    let tape_size = match policy {
        TapePolicy::Fixed(size) => size,
        TapePolicy::Growable => return Err("C output needs a fixed tape.".into())
    };

    debug!("Writing C source to {}.", path);
    let mut file = File::create(path)?;
    file.write_all(generate_c(program, tape_size).as_bytes())?;
    file.flush()?;
    Ok(())
}

fn tape_policy(matches: &ArgMatches) -> Result<TapePolicy, BrainfuckError> {
    if matches.is_present("growable") {
        return Ok(TapePolicy::Growable);
    }
    match matches.value_of("tape-size") {
        Some(s) => {
            let size: usize = s.parse().map_err(|_| format!("Invalid tape size: {}", s))?;
            if size == 0 {
                return Err("Tape size must be at least 1.".into());
            }
            Ok(TapePolicy::Fixed(size))
        },
        None => Ok(TapePolicy::default())
    }
}

fn run(matches: &ArgMatches) -> Result<(), BrainfuckError> {
    let file = matches.value_of("INPUT").ok_or("Missing input file")?;
    let passes = matches.value_of("optimizations").unwrap_or("all");
    let policy = tape_policy(matches)?;
    let program = load(file, passes)?;

    if matches.is_present("dump") {
        return main_dump(&program);
    }
    if let Some(path) = matches.value_of("emit-c") {
        return main_emit_c(&program, policy, path);
    }

    // Check if we are in interpreter or jit mode
    match (matches.is_present("execute"), matches.is_present("jit")) {
        (true, true) => {
            Err("Both switches for execute and jit mode cannot be present at the same time.".into())
        },
        (true, false) => {
            main_execute(&program, policy)
        },
        (false, _) => {
            // Default to jit mode
            main_jit(&program, policy)
        }
    }
}

fn main() {

    // All the cli options are here
    let matches = App::new("optibf")
        .version("0.1.0")
        .author("Marco Cameriero")
        .about("An optimizing Brainfuck interpreter and JIT")
        .arg(
            Arg::with_name("INPUT")
                .help("Sets the input file to use")
                .required(true)
                .index(1)
        )
        .arg(
            Arg::with_name("execute")
                .short("e")
                .long("execute")
                .help("Executes the given Brainfuck file with the interpreter")
        )
        .arg(
            Arg::with_name("jit")
                .short("j")
                .long("jit")
                .help("Compiles the given Brainfuck file to closures and runs it (default)")
        )
        .arg(
            Arg::with_name("optimizations")
                .short("O")
                .long("optimizations")
                .takes_value(true)
                .default_value("all")
                .help("Specifies the optimizations to use")
        )
        .arg(
            Arg::with_name("tape-size")
                .long("tape-size")
                .takes_value(true)
                .help("Number of cells of the tape (default 30000)")
        )
        .arg(
            Arg::with_name("growable")
                .long("growable")
                .conflicts_with("tape-size")
                .help("Grows the tape on demand instead of using a fixed size")
        )
        .arg(
            Arg::with_name("dump")
                .long("dump")
                .help("Prints the optimized instructions instead of running them")
        )
        .arg(
            Arg::with_name("emit-c")
                .long("emit-c")
                .takes_value(true)
                .value_name("PATH")
                .conflicts_with_all(&["execute", "jit", "dump"])
                .help("Writes the optimized program as C source to the given file instead of running it")
        )
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .help("Sets the level of verbosity. Repeat to increase.")
        )
        .get_matches();

    // Initialize logger as soon as possible
    let verbosity = match matches.occurrences_of("v") {
        0     => "warn",
        1     => "info",
        2     => "debug",
        3 | _ => "trace"
    };
    env_logger::Builder::from_env(
        env_logger::Env::new()
            .filter_or("OPTIBF_LOG", format!("optibf={}", verbosity))
            .write_style_or("OPTIBF_LOG_STYLE", "auto")
    )
    .init();

    if let Err(e) = run(&matches) {
        error!("{}", e);
        std::process::exit(1);
    }
}
