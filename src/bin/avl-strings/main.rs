mod config;

use std::process::ExitCode;

use avl_strings::AvlTree;
use tracing::{info, warn};

use crate::config::{Command, Config, InsertMode, USAGE};

fn main() -> ExitCode {
    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            print!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("error: {err}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .init();

    let tree = build_tree(&config);
    if config.print {
        tree.print_tree();
    }
    println!(
        "size={} height={} rotations={}",
        tree.len(),
        tree.height(),
        tree.rotations()
    );
    ExitCode::SUCCESS
}

fn build_tree(config: &Config) -> AvlTree {
    let mut tree = AvlTree::new();
    for word in &config.words {
        let inserted = match config.mode {
            InsertMode::Balanced => tree.insert(word.as_str()),
            InsertMode::Unbalanced => tree.insert_unbalanced(word.as_str()),
        };
        match inserted {
            Ok(true) => info!(word = %word, "inserted"),
            Ok(false) => info!(word = %word, "already present"),
            Err(err) => warn!(word = %word, %err, "skipped"),
        }
    }
    tree
}
