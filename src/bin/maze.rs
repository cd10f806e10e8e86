use kdam::{tqdm, BarExt};
use plotters::style::BLUE;

use platform_rl::env::{MazeAction, MazeEnv, MazeRewardTable};
use platform_rl::policy::{MlpConfig, MlpPolicy};
use platform_rl::utils::{moving_average, plot_moving_average};
use platform_rl::Agent;

extern crate structopt;

use structopt::StructOpt;

const MAZE: &str = "
##.########
#     #   #
#     #   #
#         #
#         #
########*##
";

/// Train an agent to walk the maze and plot its scores
#[derive(StructOpt, Debug)]
#[structopt(name = "platform_rl - maze")]
struct Cli {
    /// Number of episodes
    #[structopt(long = "n_episodes", short = "n", default_value = "200")]
    n_episodes: usize,

    /// Learning rate of the regressor's gradient step
    #[structopt(long = "learning_rate", default_value = "1.0")]
    learning_rate: f64,

    /// Discount factor of the accumulation update
    #[structopt(long = "discount_factor", default_value = "0.5")]
    discount_factor: f64,

    /// Width of the single hidden layer
    #[structopt(long = "hidden_size", default_value = "8")]
    hidden_size: usize,

    /// Step budget per episode before it is cut off
    #[structopt(long = "max_steps", default_value = "1000")]
    max_steps: usize,

    /// Moving average window for the plots
    #[structopt(long = "moving_average_window", default_value = "20")]
    moving_average_window: usize,

    /// Seed for weight init
    #[structopt(long = "seed")]
    seed: Option<u64>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli: Cli = Cli::from_args();

    let env = MazeEnv::parse(MAZE, MazeRewardTable::default()).expect("maze map");
    let policy: MlpPolicy<MazeAction, 4> = MlpPolicy::new(MlpConfig {
        hidden_layer_sizes: vec![cli.hidden_size],
        learning_rate: cli.learning_rate,
        discount_factor: cli.discount_factor,
        random_state: cli.seed,
        ..MlpConfig::default()
    })
    .expect("policy configuration");

    let mut agent: Agent<MazeAction, 4> =
        Agent::new(policy, env.observe(env.starting_point()));

    let mut scores: Vec<f64> = vec![];
    let mut lengths: Vec<f64> = vec![];
    let mut solved: usize = 0;

    let mut pb = tqdm!(total = cli.n_episodes);
    for _ in 0..cli.n_episodes {
        let mut pos = env.starting_point();
        agent.reset(env.observe(pos));

        let mut steps: usize = 0;
        while !env.is_goal(pos) && steps < cli.max_steps {
            let action = agent.choose_action().expect("action");
            let (new_pos, event) = env.apply(pos, action);
            let reward = env.reward(event);
            agent
                .learn(action, env.observe(new_pos), reward)
                .expect("update");
            pos = new_pos;
            steps += 1;
        }

        if env.is_goal(pos) {
            solved += 1;
        }
        scores.push(agent.score());
        lengths.push(steps as f64);

        pb.set_postfix(format!("score={:.0}", agent.score()));
        match pb.update(1) {
            Ok(_) => (),
            Err(e) => panic!("{}", e.to_string()),
        };
    }

    let window = (cli.n_episodes / cli.moving_average_window).max(1);
    plot_moving_average(
        &[moving_average(window, &scores)],
        &[&BLUE],
        &["score"],
        "Maze Scores",
    );
    plot_moving_average(
        &[moving_average(window, &lengths)],
        &[&BLUE],
        &["steps"],
        "Maze Episode Length",
    );

    println!(
        "{} episodes: {} reached the goal, mean score {:.2}",
        cli.n_episodes,
        solved,
        scores.iter().sum::<f64>() / scores.len().max(1) as f64
    );
}
