use std::env;
use std::process;

use php_symbol_parser::entity::print::render_tree;
use php_symbol_parser::parser::{ParseOptions, parse_file};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <file.php> [--json]", args[0]);
        process::exit(1);
    }

    let path = std::path::Path::new(&args[1]);
    let options = ParseOptions {
        parse_function_body: true,
        file: None,
    };
    let unit = match parse_file(path, options) {
        Ok(unit) => unit,
        Err(err) => {
            eprintln!("Could not read {}: {}", path.display(), err);
            process::exit(1);
        }
    };

    if args.iter().any(|arg| arg == "--json") {
        match serde_json::to_string_pretty(&unit) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                eprintln!("Serialization failed: {}", err);
                process::exit(1);
            }
        }
        return;
    }

    if !unit.aliases.is_empty() {
        println!("Aliases:");
        for (alias, absolute) in unit.aliases.iter() {
            println!("  {} => {}", alias, absolute);
        }
    }
    print!("{}", render_tree(&unit));
    if unit.truncated {
        println!("(input ended with unclosed scopes)");
    }
}
