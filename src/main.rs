use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rtsched_model::{
    PolicyKind, Sim, SimConfig, TaskSet,
    sim::{
        analysis,
        generate::{GeneratorConfig, generate},
        render,
    },
};

#[derive(Parser)]
#[command(
    name = "rtsched",
    version,
    about = "Simulate RM, EDF and LLF scheduling of a periodic task set"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    Rm,
    Edf,
    Llf,
    All,
}

impl PolicyArg {
    fn policies(self) -> Vec<PolicyKind> {
        match self {
            Self::Rm => vec![PolicyKind::Rm],
            Self::Edf => vec![PolicyKind::Edf],
            Self::Llf => vec![PolicyKind::Llf],
            Self::All => PolicyKind::ALL.to_vec(),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Simulate a task file
    Run {
        /// Task file: optional header, then `A P C D` (or `P C D`) per line
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = PolicyArg::All)]
        policy: PolicyArg,

        /// Simulated ticks (defaults to the hyperperiod)
        #[arg(long)]
        horizon: Option<u64>,

        /// Skip policies whose utilization test fails
        #[arg(long)]
        skip_unschedulable: bool,

        /// Print the event log
        #[arg(long)]
        events: bool,

        /// Print per-task Gantt rows
        #[arg(long)]
        gantt: bool,
    },

    /// Print a random task file
    Generate {
        #[arg(short, long, default_value_t = 3)]
        tasks: usize,

        #[arg(short, long, default_value_t = 0.7)]
        utilization: f64,

        #[arg(short, long, default_value_t = 0)]
        seed: u64,

        /// Draw deadlines between the execution time and the period
        #[arg(long)]
        constrained: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match Cli::parse().command {
        Command::Run {
            file,
            policy,
            horizon,
            skip_unschedulable,
            events,
            gantt,
        } => {
            let tasks = TaskSet::load(&file)
                .with_context(|| format!("loading task set from {}", file.display()))?;
            let config = SimConfig {
                horizon,
                skip_unschedulable,
            };
            run(&tasks, config, &policy.policies(), events, gantt)
        }
        Command::Generate {
            tasks,
            utilization,
            seed,
            constrained,
        } => {
            let config = GeneratorConfig {
                tasks,
                utilization,
                seed,
                constrained_deadlines: constrained,
                ..Default::default()
            };
            let tasks = generate(&config).context("generating task set")?;
            print!("{}", tasks.to_file_format());
            Ok(())
        }
    }
}

fn run(
    tasks: &TaskSet,
    config: SimConfig,
    policies: &[PolicyKind],
    events: bool,
    gantt: bool,
) -> Result<()> {
    let sim = Sim::new(tasks, config).context("computing the simulation horizon")?;

    print!("{}", render::task_table(tasks));
    let hyperperiod = analysis::hyperperiod(tasks)
        .map_or_else(|_| "overflows".to_string(), |h| h.to_string());
    println!(
        "U = {:.4}, hyperperiod {hyperperiod}, simulating {} ticks",
        analysis::utilization(tasks),
        sim.horizon()
    );

    for report in sim.run_all(policies) {
        println!("{}", "=".repeat(64));
        println!("{} ({})", report.policy.name(), report.policy);
        println!("{}", report.bound);

        let (Some(schedule), Some(stats)) = (report.schedule(), report.stats()) else {
            println!("skipped");
            continue;
        };
        if events {
            print!("{}", render::events(schedule));
        }
        println!("{}", render::job_list(&schedule.timeline));
        if gantt {
            print!("{}", render::gantt(tasks, &schedule.timeline));
        }
        print!("{}", render::summary(stats, schedule));
    }

    Ok(())
}
