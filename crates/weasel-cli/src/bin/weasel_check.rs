// weasel-check: Check words from stdin against a dictionary file.
//
// Reads stdin line by line. Each line is one word, or with -b a block of
// text split into tokens (double-quoted phrases stay together). Prints:
//   C: word    (valid or filtered)
//   W: word    (not in the dictionary)
//
// Usage:
//   weasel-check [-c CONFIG] [-l KEY] [-b] [--json] DICT_FILE
//
// Set RUST_LOG=debug to see registry activity on stderr.

use std::io::{self, BufRead, Write};

use weasel_core::WordResults;

fn print_results(out: &mut impl Write, results: &WordResults, json: bool) -> io::Result<()> {
    if json {
        let line = serde_json::to_string(results).map_err(io::Error::other)?;
        writeln!(out, "{line}")
    } else if results.is_success() {
        writeln!(out, "C: {}", results.original_word)
    } else {
        writeln!(out, "W: {}", results.original_word)
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if weasel_cli::wants_help(&args) {
        println!("weasel-check: Check words from stdin against a dictionary file.");
        println!();
        println!("Usage: weasel-check [-c CONFIG] [-l KEY] [-b] [--json] DICT_FILE");
        println!();
        println!("Reads words from stdin (one per line). Prints:");
        println!("  C: word    (valid)");
        println!("  W: word    (invalid)");
        println!();
        println!("Options:");
        println!("  -c, --config PATH   JSON dictionary configuration");
        println!("  -l, --key KEY       Dictionary key (default: {})", weasel_cli::DEFAULT_KEY);
        println!("  -b, --block         Treat each line as a block of text");
        println!("  --json              Print full results as JSON");
        println!("  -h, --help          Print this help");
        return;
    }

    weasel_cli::init_tracing();

    let opts = weasel_cli::parse_args(&args).unwrap_or_else(|e| weasel_cli::fatal(&e));
    let (_registry, dictionary) =
        weasel_cli::load_dictionary(&opts).unwrap_or_else(|e| weasel_cli::fatal(&e));

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("error reading stdin: {e}");
                break;
            }
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let written = if opts.block {
            match dictionary.block_results(text) {
                Ok(block) => block
                    .iter()
                    .try_for_each(|results| print_results(&mut out, results, opts.json)),
                Err(e) => weasel_cli::fatal(&e.to_string()),
            }
        } else {
            match dictionary.word_results(text) {
                Ok(results) => print_results(&mut out, &results, opts.json),
                Err(e) => weasel_cli::fatal(&e.to_string()),
            }
        };
        if written.is_err() {
            break;
        }
    }
    let _ = out.flush();
}
