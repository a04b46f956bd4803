//! Builds a small tree, logs every promotion and prints the diagram after
//! each step.
//!
//! Run with `cargo run --example render`.

use bubble_tree::BubbleTree;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

fn main() {
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_time_level(LevelFilter::Off)
        .build();
    TermLogger::init(LevelFilter::Trace, config, TerminalMode::Stderr, ColorChoice::Auto)
        .unwrap_or_else(|e| eprintln!("logger already set: {e}"));

    let keys = vec![5, 3, 8, 1, 4];
    let values = vec!["five", "three", "eight", "one", "four"];
    let mut tree = BubbleTree::from_pairs(keys, values);
    println!("after loading 5 3 8 1 4:\n{tree}");

    tree.get(&3);
    println!("after get(3):\n{tree}");

    tree.get(&42);
    println!("after get(42), a miss:\n{tree}");

    tree.remove(&3);
    println!("after remove(3):\n{tree}");

    println!("len = {}, height = {}, root = {:?}", tree.len(), tree.height(), tree.root_key());
    match tree.validate() {
        Ok(()) => println!("invariants hold"),
        Err(e) => println!("invariant violated: {e}"),
    }

    let empty: BubbleTree<u32, &str> = BubbleTree::new();
    print!("{}", empty.diagram());
}
