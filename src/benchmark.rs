use balanced_index::{BalancedIndex, TreeOps};
use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "tree-benchmark")]
#[command(about = "A tree performance testing tool")]
struct Args {
    #[arg(long, default_value = "1000000")]
    size: u64,

    #[arg(long, value_enum, default_value = "avl")]
    tree: TreeKind,

    #[arg(long, value_enum, default_value = "ascending")]
    order: KeyOrder,

    #[arg(long, default_value = "42")]
    seed: u64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TreeKind {
    Avl,
    Btree,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KeyOrder {
    Ascending,
    Shuffled,
}

fn main() {
    let args = Args::parse();
    let mut keys: Vec<u64> = (0..args.size).collect();
    if let KeyOrder::Shuffled = args.order {
        keys.shuffle(&mut rand::rngs::StdRng::seed_from_u64(args.seed));
    }

    println!(
        "Running with {:?} tree, {:?} keys and {} node count",
        args.tree, args.order, args.size
    );

    match args.tree {
        TreeKind::Avl => run(&mut BalancedIndex::new(), &keys),
        TreeKind::Btree => run(&mut BTreeMap::<u64, String>::new(), &keys),
    }
}

fn run<T: TreeOps>(tree: &mut T, keys: &[u64]) {
    let start = Instant::now();
    for (i, &key) in keys.iter().enumerate() {
        assert_eq!(tree.len(), i);
        assert!(tree.insert(key, String::new()).is_ok());
        assert!(tree.contains(key));
    }
    let inserted = Instant::now();
    for &key in keys {
        assert!(tree.contains(key));
    }
    let checked_contains = Instant::now();
    for &key in keys {
        assert!(tree.remove(key).is_ok());
    }
    let end = Instant::now();
    assert!(tree.is_empty());

    println!(
        "Inserts took {} seconds",
        inserted.saturating_duration_since(start).as_secs_f32()
    );
    println!(
        "Checking contains took {} seconds",
        checked_contains
            .saturating_duration_since(inserted)
            .as_secs_f32()
    );
    println!(
        "Removals took {} seconds",
        end.saturating_duration_since(checked_contains)
            .as_secs_f32()
    );
    println!(
        "Total {} seconds",
        end.saturating_duration_since(start).as_secs_f32()
    );
}
