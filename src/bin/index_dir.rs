use std::env;
use std::path::Path;
use std::process;
use std::time::Instant;

use php_symbol_parser::indexer::index_directory;
use php_symbol_parser::parser::ParseOptions;
use php_symbol_parser::store::SymbolTable;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <directory> [symbol-name]", args[0]);
        process::exit(1);
    }

    let root = Path::new(&args[1]);
    let table = SymbolTable::new();
    let options = ParseOptions::default();

    let start = Instant::now();
    let stats = index_directory(root, &options, &table);
    let elapsed = start.elapsed();

    println!("Indexed {} files in {:.2?}", stats.files, elapsed);
    println!("  entities:  {}", stats.entities);
    println!("  truncated: {}", stats.truncated);
    println!("  failed:    {}", stats.failed);

    if let Some(name) = args.get(2) {
        let hits = table.find_by_name(name);
        if hits.is_empty() {
            println!("No declarations of {} found", name);
        } else {
            for (file, line) in hits {
                println!("{}:{}", file.display(), line);
            }
        }
    }
}
