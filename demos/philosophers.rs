use clap::Parser;

use symbolic_ts::bdd::Bdd;
use symbolic_ts::encode::Encoder;
use symbolic_ts::expr::StatePredicate;
use symbolic_ts::philosophers::{Config, DiningPhilosophers};

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Number of philosophers.
    #[arg(value_name = "INT", default_value = "5")]
    n: usize,

    /// Allow a table with a single philosopher.
    #[clap(long)]
    allow_single: bool,

    /// BDD size (in bits, so the actual size is `2^size` nodes).
    #[clap(long, value_name = "INT", default_value = "16")]
    size: usize,

    /// Enable debug logging.
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();
    println!("args = {:?}", args);

    let config = Config::new(args.n).allow_single(args.allow_single);
    let model = DiningPhilosophers::from_config(config)?;
    let system = model.transition_system();

    println!("Dining philosophers with n = {}", model.philosophers());
    println!("Initial states: {}", system.initial_states);
    println!("Specification: {}", system.specification);

    let stats = system.check_well_formed()?;
    println!("States: {}", stats.states);
    println!("Initial states: {}", stats.initial_states);
    println!("Stutter-only states: {}", stats.stutter_only_states);
    println!("Transition relation: {} nodes", stats.relation_nodes);

    // Deadlocks: nobody can move
    let bdd = Bdd::new(args.size);
    let enc = Encoder::new(&bdd, system.shape);
    let stuck = enc.encode_predicate(&StatePredicate::new(model.all_stuck())?);
    println!("Deadlocked states: {}", enc.count_states(stuck));
    if let Some(state) = enc.pick_state(stuck) {
        println!("e.g. {}", state);
    }
    println!("bdd = {:?}", bdd);

    println!("\nAll done in {:.3} s", time_total.elapsed().as_secs_f64());
    Ok(())
}
