use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use crate::cards::parse_board;
use crate::config::SolverConfig;
use crate::display::{
    board_display, exploitability_line, print_error, print_section, print_success, stats_table,
    strategy_table,
};
use crate::error::SolverResult;
use crate::game_tree::{BettingConfig, GameTree, TreeParams};
use crate::node::Player;
use crate::ranges::{class_labels, parse_range};
use crate::traversal::Discount;

#[derive(Parser)]
#[command(
    name = "subgame",
    version,
    about = "Heads-up postflop subgame solver using discounted CFR+."
)]
struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train strategies for a spot and report exploitability
    Solve {
        #[command(flatten)]
        spot: SpotArgs,

        /// Write the solution as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Hands shown per strategy table
        #[arg(long, default_value = "20")]
        show: usize,
    },
    /// Build the tree for a spot and print its shape
    Tree {
        #[command(flatten)]
        spot: SpotArgs,

        /// Print the full outline, not just node counts
        #[arg(long)]
        outline: bool,
    },
    /// Expand range notation into weighted combos
    Range {
        range: String,

        /// Remove combos that conflict with this board
        #[arg(short, long)]
        board: Option<String>,
    },
}

#[derive(Args)]
struct SpotArgs {
    /// JSON config file; flags below override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    board: Option<String>,

    #[arg(long)]
    oop: Option<String>,

    #[arg(long)]
    ip: Option<String>,

    #[arg(long)]
    pot: Option<f64>,

    #[arg(long)]
    stack: Option<f64>,

    #[arg(short = 'n', long)]
    iterations: Option<usize>,

    #[arg(long)]
    report_every: Option<usize>,

    #[arg(long)]
    alpha: Option<f64>,

    #[arg(long)]
    beta: Option<f64>,

    #[arg(long)]
    gamma: Option<f64>,

    /// Bet sizes as pot fractions for every street and player, e.g. "0.5,1.0"
    #[arg(long, value_delimiter = ',')]
    bet: Option<Vec<f64>>,

    #[arg(long)]
    all_in_cutoff: Option<f64>,
}

impl SpotArgs {
    fn resolve(&self) -> SolverResult<SolverConfig> {
        let mut cfg = match &self.config {
            Some(path) => SolverConfig::from_json_file(path)?,
            None => SolverConfig::default(),
        };
        if let Some(v) = &self.board {
            cfg.board = v.clone();
        }
        if let Some(v) = &self.oop {
            cfg.oop_range = v.clone();
        }
        if let Some(v) = &self.ip {
            cfg.ip_range = v.clone();
        }
        if let Some(v) = self.pot {
            cfg.starting_pot = v;
        }
        if let Some(v) = self.stack {
            cfg.starting_stack = v;
        }
        if let Some(v) = self.iterations {
            cfg.iterations = v;
        }
        if let Some(v) = self.report_every {
            cfg.report_every = v;
        }
        let d = cfg.discount;
        cfg.discount = Discount {
            alpha: self.alpha.unwrap_or(d.alpha),
            beta: self.beta.unwrap_or(d.beta),
            gamma: self.gamma.unwrap_or(d.gamma),
        };
        if let Some(sizes) = &self.bet {
            let keep = cfg.betting.clone();
            cfg.betting = BettingConfig {
                all_in_cutoff: keep.all_in_cutoff,
                default_bet: keep.default_bet,
                ..BettingConfig::uniform(sizes.clone())
            };
        }
        if let Some(v) = self.all_in_cutoff {
            cfg.betting.all_in_cutoff = v;
        }
        Ok(cfg)
    }
}

pub fn run() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(e) = dispatch(cli.command) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

fn dispatch(command: Commands) -> SolverResult<()> {
    match command {
        Commands::Solve { spot, output, show } => cmd_solve(&spot.resolve()?, output, show),
        Commands::Tree { spot, outline } => cmd_tree(&spot.resolve()?, outline),
        Commands::Range { range, board } => cmd_range(&range, board.as_deref()),
    }
}

fn print_header(cfg: &SolverConfig) -> SolverResult<()> {
    let board = parse_board(&cfg.board)?;
    println!();
    println!(
        "  {} Board: {}  |  Pot: {:.1}  |  Stack: {:.1}",
        "Subgame".bold(),
        board_display(&board),
        cfg.starting_pot,
        cfg.starting_stack
    );
    println!("  OOP: {}", cfg.oop_range.dimmed());
    println!("  IP:  {}", cfg.ip_range.dimmed());
    Ok(())
}

fn cmd_solve(cfg: &SolverConfig, output: Option<PathBuf>, show: usize) -> SolverResult<()> {
    print_header(cfg)?;
    let mut solver = cfg.build_solver()?;
    println!("{}", stats_table(&solver.tree().stats()));

    println!();
    println!(
        "  Training {} iterations (alpha {}, beta {}, gamma {})",
        cfg.iterations, cfg.discount.alpha, cfg.discount.beta, cfg.discount.gamma
    );
    for report in solver.train(cfg.iterations, cfg.report_every) {
        println!("{}", exploitability_line(&report));
    }

    let solution = solver.solution();
    if let Some(root) = solution.nodes.first() {
        let hands: Vec<String> = solution
            .hands(root.player)
            .iter()
            .map(|h| h.to_string())
            .collect();
        print_section("Root strategy", &strategy_table(root, &hands, show));
    }

    if let Some(path) = output {
        solution.save(&path)?;
        println!();
        print_success(&format!("  Solution written to {}", path.display()));
    }
    println!();
    Ok(())
}

fn cmd_tree(cfg: &SolverConfig, outline: bool) -> SolverResult<()> {
    print_header(cfg)?;
    let board = parse_board(&cfg.board)?;
    let oop = parse_range(&cfg.oop_range)?;
    let ip = parse_range(&cfg.ip_range)?;
    let tree = GameTree::build(&TreeParams {
        starting_pot: cfg.starting_pot,
        starting_stack: cfg.starting_stack,
        board: &board,
        betting: &cfg.betting,
        oop_range: &oop,
        ip_range: &ip,
    })?;
    println!(
        "  Combos after board removal: OOP {} | IP {}",
        tree.range(Player::OOP).len(),
        tree.range(Player::IP).len()
    );
    println!("{}", stats_table(&tree.stats()));
    if outline {
        print_section("Tree", &tree.describe());
    }
    Ok(())
}

fn cmd_range(notation: &str, board: Option<&str>) -> SolverResult<()> {
    let mut range = parse_range(notation)?;
    if let Some(b) = board {
        let cards = parse_board(b)?;
        println!("  Board: {}", board_display(&cards));
        range = range.remove_conflicts(&cards);
    }

    println!();
    println!(
        "  {} combos, total weight {:.2}",
        range.len().to_string().bold(),
        range.total_weight()
    );
    println!("  Classes: {}", class_labels(&range).join(", "));
    println!();
    for combo in range.iter() {
        println!("    {}  {:.2}", combo.hand, combo.weight);
    }
    Ok(())
}
