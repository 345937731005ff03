use i8080pad::disassembler;
use i8080pad::instruction::EditOutcome;
use i8080pad::util::{format_address, parse_address};
use i8080pad::{CellReport, Editor, EditorConfig};
use log::{debug, info};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

fn print_usage(program: &str) {
    println!("i8080pad - Intel 8080 memory table editor");
    println!();
    println!("Usage: {} [--config <file.toml>]", program);
    println!();
    println!("Reads commands from stdin, one per line. Type 'h' for the command list.");
    println!("The config file may also be named by the I8080PAD_CONFIG variable.");
}

fn print_help() {
    println!("Commands (addresses are hex, 0000-00FF):");
    println!("  v <addr> <hex>     set a cell's byte value");
    println!("  m <addr> <text>    set a cell's mnemonic, e.g. m 0a MVI A,3C");
    println!("  c <addr>           show one cell");
    println!("  d <hex>            decode a byte without writing it");
    println!("  l [start end]      list the table");
    println!("  n <addr>           next editable row below");
    println!("  p <addr>           next editable row above");
    println!("  h                  this help");
    println!("  q                  quit");
}

fn print_report(report: &CellReport) {
    let value = report
        .value
        .map(|v| format!("{:02X}", v))
        .unwrap_or_else(|| "--".to_string());
    match report.owner {
        Some(owner) => println!(
            "{}  {}  (read-only, owned by {})",
            format_address(report.address),
            value,
            format_address(owner)
        ),
        None => println!("{}  {}  {}", format_address(report.address), value, report.mnemonic),
    }
}

fn print_outcome(outcome: &EditOutcome) {
    match &outcome.resolution {
        Ok(encoding) => println!("{}", encoding),
        Err(e) => println!("{}", e),
    }
    if outcome.dropped_operands > 0 {
        println!(
            "{} operand byte(s) did not fit in the table",
            outcome.dropped_operands
        );
    }
    for row in &outcome.rows {
        print_report(row);
    }
}

/// Split "cmd rest of line" into the command word and the remainder
fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (line, ""),
    }
}

fn execute(editor: &mut Editor, line: &str) -> Result<bool, Box<dyn std::error::Error>> {
    let (cmd, rest) = split_command(line);
    match cmd {
        "" => {}
        "q" | "quit" => return Ok(false),
        "h" | "help" => print_help(),
        "v" | "value" => {
            let (addr, hex) = split_command(rest);
            let report = editor.on_value_edited(parse_address(addr)?, hex)?;
            print_report(&report);
        }
        "m" | "mnemonic" => {
            let (addr, text) = split_command(rest);
            let outcome = editor.on_mnemonic_edited(parse_address(addr)?, text)?;
            print_outcome(&outcome);
        }
        "c" | "cell" => {
            let cell = editor.cell(parse_address(rest)?)?;
            print_report(&CellReport::from(cell));
        }
        "d" | "decode" => {
            let decoded = disassembler::decode_hex(rest);
            if decoded.is_empty() {
                println!("<no zero-operand mnemonic>");
            } else {
                println!("{}", decoded);
            }
        }
        "l" | "list" => {
            let listing = editor.listing();
            if rest.is_empty() {
                print!("{}", listing.render());
            } else {
                let (start, end) = split_command(rest);
                print!("{}", listing.render_range(parse_address(start)?, parse_address(end)?));
            }
        }
        "n" | "next" => match editor.next_editable_below(parse_address(rest)?) {
            Some(a) => println!("{}", format_address(a)),
            None => println!("<no editable row below>"),
        },
        "p" | "prev" => match editor.next_editable_above(parse_address(rest)?) {
            Some(a) => println!("{}", format_address(a)),
            None => println!("<no editable row above>"),
        },
        other => println!("Unknown command '{}'. Type 'h' for help.", other),
    }
    Ok(true)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-c" | "--config" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --config requires a filename");
                    std::process::exit(1);
                }
                config_path = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "-h" | "--help" => {
                print_usage(&args[0]);
                return Ok(());
            }
            other => {
                eprintln!("Unknown option: {}", other);
                print_usage(&args[0]);
                std::process::exit(1);
            }
        }
    }

    let config = EditorConfig::resolve(config_path.as_deref())?;
    debug!("config: {:?}", config);
    let mut editor = Editor::new(config);

    let interactive = atty::is(atty::Stream::Stdin);
    if interactive {
        info!("interactive session");
        println!("i8080pad - type 'h' for help, 'q' to quit");
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            print!("> ");
            io::stdout().flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        // bad input is reported and the session continues
        match execute(&mut editor, line.trim()) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("Error: {}", e),
        }
    }

    Ok(())
}
