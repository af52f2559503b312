use std::env;
use std::io::{self, BufRead, Write};
use std::time::Instant;
use thompson_regex_transformer::{compile, to_regex, Nfa};

const PROMPT: &str = "> ";
const REGEX_COMMAND: &str = "regex=";
const EXIT_COMMAND: &str = "exit";

fn main() -> io::Result<()> {
    env_logger::init();

    let mut nfa = env::args().nth(1).and_then(|regex| build(&regex));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{PROMPT}");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        if line.eq_ignore_ascii_case(EXIT_COMMAND) {
            println!("\nExiting...");
            break;
        }

        if let Some(regex) = regex_argument(&line) {
            if let Some(built) = build(regex) {
                nfa = Some(built);
            }
        } else if let Some(nfa) = nfa.as_mut() {
            run(nfa, &line);
        } else {
            println!("Please supply a regular expression first, with {REGEX_COMMAND}<regex>");
        }

        println!();
    }

    Ok(())
}

/// The pattern following a case-insensitive `regex=` prefix.
fn regex_argument(line: &str) -> Option<&str> {
    let command = line.get(..REGEX_COMMAND.len())?;
    let argument = line.get(REGEX_COMMAND.len()..)?;
    command.eq_ignore_ascii_case(REGEX_COMMAND).then_some(argument)
}

fn build(regex: &str) -> Option<Nfa> {
    println!("New regex pattern: {regex}");

    let start = Instant::now();
    let nfa = match compile(regex) {
        Ok(nfa) => nfa,
        Err(e) => {
            eprintln!("{e}");
            return None;
        }
    };
    let build_time = start.elapsed();

    if let Ok(expression) = to_regex(regex) {
        println!("Read as        : {expression}");
    }
    println!("Built NFA in   : {build_time:?}\n");
    println!("{nfa:?}");

    Some(nfa)
}

fn run(nfa: &mut Nfa, line: &str) {
    let start = Instant::now();
    nfa.feed_symbols(line.chars(), true);
    let accepted = nfa.is_accepting();
    let match_time = start.elapsed();

    println!("String was {} by NFA", if accepted { "ACCEPTED" } else { "REJECTED" });
    println!("Calculated in  : {match_time:?}");

    nfa.reset();
}
