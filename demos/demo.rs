//! Interactive demonstration of `editline`.
//!
//! Lines ending in `\` continue on the next line. History is kept in
//! `~/.editline-demo_history`.

use std::io;

use ansi_term::Color;

use editline::{Config, DefaultTerminal, History, Line, ReadResult, Terminal};

fn main() -> editline::Result<()> {
    let mut history = match History::default_path("editline-demo") {
        Some(path) => History::with_path(path, 500),
        None => History::default(),
    };
    history.load()?;

    let style = Color::Green.bold();

    // '\x01' and '\x02' mark the color sequences as invisible,
    // so they do not count toward the width of the prompt.
    let config = Config{
        primary_prompt: format!("\x01{}\x02demo> \x01{}\x02",
            style.prefix(), style.suffix()),
        .. Config::default()
    };

    let mut line = Line::new(config, Some(&mut history))?;
    let interrupts = line.interrupts();

    say(&line, "This is the editline demo program.")?;
    say(&line, "Enter \"help\" for a list of commands.")?;
    say(&line, "Press Ctrl-D or enter \"quit\" to exit.")?;

    'read: loop {
        let mut input = match line.read()? {
            ReadResult::Input(input) => input,
            ReadResult::Eof => break,
        };

        while input.ends_with('\\') {
            input.pop();

            match line.read_continuation()? {
                ReadResult::Input(more) => input.push_str(&more),
                ReadResult::Eof => break 'read,
            }
        }

        if interrupts.try_recv().is_ok() {
            say(&line, "(interrupted)")?;
        }

        let (cmd, args) = split_first_word(&input);

        match cmd {
            "help" => {
                for &(cmd, help) in DEMO_COMMANDS {
                    say(&line, &format!("  {:15} - {}", cmd, help))?;
                }
            }
            "get" => {
                let msg = match line.config().get_variable(args) {
                    Some(var) => format!("{} = {}", args, var),
                    None => format!("no variable named `{}`", args),
                };
                say(&line, &msg)?;
            }
            "set" => {
                let (name, value) = split_first_word(args);

                let msg = match line.set_variable(name, value) {
                    Some(old) => format!("{} = {} (was {})", name, value, old),
                    None => format!("invalid variable or value: {} {}", name, value),
                };
                say(&line, &msg)?;
            }
            "list-variables" => {
                let vars = line.config().variables()
                    .map(|(name, var)| format!("{:30} = {}", name, var))
                    .collect::<Vec<_>>();

                for var in vars {
                    say(&line, &var)?;
                }
            }
            "history" => {
                let entries = line.history()
                    .map(|h| h.iter().cloned().collect::<Vec<_>>())
                    .unwrap_or_default();

                for (i, entry) in entries.iter().enumerate() {
                    say(&line, &format!("{:5}  {}", i + 1, entry))?;
                }
            }
            "quit" => break,
            "" => (),
            _ => say(&line, &format!("read input: {:?}", input))?,
        }
    }

    line.restore()?;
    drop(line);

    history.save()?;
    println!("Goodbye.");

    Ok(())
}

// Raw mode requires an explicit carriage return.
fn say(line: &Line<DefaultTerminal>, text: &str) -> io::Result<()> {
    let term = line.terminal();
    let mut w = term.lock_write();

    w.write(text)?;
    w.write("\r\n")?;
    w.flush()
}

fn split_first_word(s: &str) -> (&str, &str) {
    let s = s.trim();

    match s.find(|ch: char| ch.is_whitespace()) {
        Some(pos) => (&s[..pos], s[pos..].trim_start()),
        None => (s, "")
    }
}

static DEMO_COMMANDS: &[(&str, &str)] = &[
    ("get",             "Print the value of a variable"),
    ("help",            "You're looking at it"),
    ("history",         "List history entries"),
    ("list-variables",  "List variables"),
    ("quit",            "Quit the demo"),
    ("set",             "Assign a value to a variable"),
];
