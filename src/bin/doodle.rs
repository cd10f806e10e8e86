use kdam::{tqdm, BarExt};
use plotters::style::BLUE;
use rand::rngs::StdRng;
use rand::SeedableRng;

use platform_rl::control::{Controller, DecisionTimer, EnumController, ScriptedControl};
use platform_rl::env::{
    JumpAction, JumpEvent, JumpRewardTable, JumpStateSpace, PlatformTrack, State,
};
use platform_rl::policy::{MlpConfig, MlpPolicy};
use platform_rl::utils::{moving_average, plot_moving_average};
use platform_rl::{Agent, CoreError};

extern crate structopt;

use structopt::StructOpt;

/// Train an agent on the platformer and plot its scores
#[derive(StructOpt, Debug)]
#[structopt(name = "platform_rl - doodle")]
struct Cli {
    /// Number of episodes
    #[structopt(long = "n_episodes", short = "n", default_value = "500")]
    n_episodes: usize,

    /// Use the scripted (non-learning) controller instead of the agent
    #[structopt(long = "scripted")]
    scripted: bool,

    /// Learning rate of the regressor's gradient step
    #[structopt(long = "learning_rate", default_value = "1.0")]
    learning_rate: f64,

    /// Discount factor of the accumulation update
    #[structopt(long = "discount_factor", default_value = "0.5")]
    discount_factor: f64,

    /// Width of the single hidden layer
    #[structopt(long = "hidden_size", default_value = "2")]
    hidden_size: usize,

    /// Simulated seconds between agent decisions
    #[structopt(long = "decision_interval", default_value = "0.12")]
    decision_interval: f64,

    /// Frame budget per episode before it is cut off
    #[structopt(long = "max_frames", default_value = "20000")]
    max_frames: usize,

    /// Game height in simulation units
    #[structopt(long = "game_height", default_value = "2000")]
    game_height: i64,

    /// Moving average window for the plots
    #[structopt(long = "moving_average_window", default_value = "50")]
    moving_average_window: usize,

    /// Seed for platform generation and weight init
    #[structopt(long = "seed")]
    seed: Option<u64>,
}

mod sim {
    use platform_rl::env::JumpAction;
    use rand::rngs::StdRng;
    use rand::Rng;

    pub const GAME_WIDTH: f64 = 400.0;
    pub const PLATFORM_WIDTH: f64 = 50.0;
    pub const AGENT_WIDTH: f64 = 40.0;
    pub const JUMP_MAX_HEIGHT: i64 = 50;
    pub const STEP_MS: f64 = 25.0;

    /// Minimal platformer physics, external to the learning core: one
    /// simulation unit of movement per 25 simulated milliseconds,
    /// horizontal wrap past the viewport edges, fixed-height jumps
    /// retriggered by landing on any platform.
    pub struct Simulation {
        pub x: f64,
        pub y: f64,
        pub jumping: bool,
        pub jump_height: i64,
        pub current_platform: usize,
        pub dead: bool,
        pub won: bool,
        pub game_height: i64,
        pub platforms: Vec<(f64, i64)>,
    }

    impl Simulation {
        pub fn generate_platforms(rng: &mut StdRng, game_height: i64) -> Vec<(f64, i64)> {
            let mut platforms = vec![];
            let mut current_height: i64 = 0;
            while current_height <= game_height {
                let x = rng.gen_range(0..(GAME_WIDTH - PLATFORM_WIDTH) as i64) as f64;
                let y = rng.gen_range(current_height..=current_height + JUMP_MAX_HEIGHT - 10);
                current_height = y;
                platforms.push((x, y));
                current_height += 1;
            }
            platforms
        }

        pub fn new(rng: &mut StdRng, game_height: i64) -> Self {
            let platforms = Self::generate_platforms(rng, game_height);
            let (x0, y0) = platforms[0];
            Self {
                x: x0 + PLATFORM_WIDTH / 2.0,
                y: (y0 + 5) as f64,
                jumping: false,
                jump_height: 0,
                current_platform: 0,
                dead: false,
                won: false,
                game_height,
                platforms,
            }
        }

        fn update_x(&mut self, action: JumpAction, mut elapsed_ms: f64) {
            while elapsed_ms > 0.0 {
                match action {
                    JumpAction::Left => self.x -= 1.0,
                    JumpAction::Right => self.x += 1.0,
                    JumpAction::None => {}
                }
                if self.x > GAME_WIDTH {
                    self.x = -AGENT_WIDTH;
                } else if self.x < -AGENT_WIDTH {
                    self.x = GAME_WIDTH;
                }
                elapsed_ms -= STEP_MS;
            }
        }

        fn update_y(&mut self, mut elapsed_ms: f64) {
            while elapsed_ms > 0.0 {
                if self.jumping {
                    self.y += 1.0;
                    self.jump_height += 1;
                    if self.jump_height >= JUMP_MAX_HEIGHT {
                        self.jumping = false;
                        self.jump_height = 0;
                    }
                } else {
                    self.y -= 1.0;
                }

                for (i, &(px, py)) in self.platforms.iter().enumerate() {
                    if self.y - 1.0 == py as f64 && self.x > px && self.x < px + PLATFORM_WIDTH {
                        self.jumping = true;
                        self.jump_height = 0;
                        self.current_platform = i;
                    }
                }

                elapsed_ms -= STEP_MS;
            }
        }

        pub fn step(&mut self, action: JumpAction, elapsed_ms: f64) {
            self.update_x(action, elapsed_ms);
            self.update_y(elapsed_ms);

            if self.y >= self.game_height as f64 {
                self.won = true;
            }
            if self.y < self.platforms[self.current_platform].1 as f64 {
                self.dead = true;
            }
        }
    }
}

struct EpisodeOutcome {
    score: f64,
    frames: usize,
    won: bool,
    died: bool,
}

fn run_episode(
    controller: &mut EnumController<JumpAction, 3>,
    rng: &mut StdRng,
    cli: &Cli,
) -> Result<EpisodeOutcome, CoreError> {
    const FRAME_DT: f64 = 1.0 / 60.0;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    let mut sim = sim::Simulation::new(rng, cli.game_height);
    // the agent steers toward platform centers
    let track: PlatformTrack = sim
        .platforms
        .iter()
        .map(|&(x, _)| x + sim::PLATFORM_WIDTH / 2.0)
        .collect();
    let mut space = JumpStateSpace::new(sim::GAME_WIDTH, track, JumpRewardTable::default())?;

    space.set_snapshot(sim.x, sim.current_platform);
    controller.begin_episode(space.observe()?);

    let mut timer = DecisionTimer::new(cli.decision_interval)?;
    let mut frames: usize = 0;

    while !sim.dead && !sim.won && frames < cli.max_frames {
        let action = controller.act()?;
        let platform_before = sim.current_platform;

        // keep applying the chosen action until the next decision tick
        let mut decide = false;
        while !decide && !sim.dead && !sim.won && frames < cli.max_frames {
            sim.step(action, FRAME_MS);
            frames += 1;
            decide = timer.tick(FRAME_DT);
        }

        let event = if sim.dead {
            JumpEvent::Died
        } else if sim.current_platform > platform_before {
            JumpEvent::Advanced
        } else if sim.current_platform < platform_before {
            JumpEvent::FellBack
        } else {
            JumpEvent::None
        };

        space.set_snapshot(sim.x, sim.current_platform);
        let (reward, new_state) = match (space.reward(event), space.observe()) {
            (Ok(r), Ok(s)) => (r, s),
            // ran past the generated track: nothing left to aim for
            (Err(CoreError::NoTarget { .. }), _) | (_, Err(CoreError::NoTarget { .. })) => {
                sim.won = true;
                break;
            }
            (Err(e), _) | (_, Err(e)) => return Err(e),
        };
        controller.feedback(action, new_state, reward)?;
    }

    Ok(EpisodeOutcome {
        score: controller.score(),
        frames,
        won: sim.won,
        died: sim.dead,
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli: Cli = Cli::from_args();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut controller: EnumController<JumpAction, 3> = if cli.scripted {
        EnumController::Scripted(ScriptedControl::new(JumpAction::None))
    } else {
        let policy: MlpPolicy<JumpAction, 3> = MlpPolicy::new(MlpConfig {
            hidden_layer_sizes: vec![cli.hidden_size],
            learning_rate: cli.learning_rate,
            discount_factor: cli.discount_factor,
            random_state: cli.seed,
            ..MlpConfig::default()
        })
        .expect("policy configuration");
        EnumController::Learning(Agent::new(policy, State(0.0, 0.0)))
    };

    let mut scores: Vec<f64> = vec![];
    let mut lengths: Vec<f64> = vec![];
    let mut wins: usize = 0;
    let mut deaths: usize = 0;

    let mut pb = tqdm!(total = cli.n_episodes);
    for _ in 0..cli.n_episodes {
        let outcome = run_episode(&mut controller, &mut rng, &cli).expect("episode");
        if outcome.won {
            wins += 1;
        }
        if outcome.died {
            deaths += 1;
        }
        scores.push(outcome.score);
        lengths.push(outcome.frames as f64);

        let running: f64 = scores.iter().sum::<f64>() / scores.len() as f64;
        pb.set_postfix(format!("avg score={:.1}", running));
        match pb.update(1) {
            Ok(_) => (),
            Err(e) => panic!("{}", e.to_string()),
        };
    }

    let window = (cli.n_episodes / cli.moving_average_window).max(1);
    let ma_scores = moving_average(window, &scores);
    let ma_lengths = moving_average(window, &lengths);
    plot_moving_average(&[ma_scores], &[&BLUE], &["score"], "Doodle Scores");
    plot_moving_average(&[ma_lengths], &[&BLUE], &["frames"], "Doodle Episode Length");

    println!(
        "{} episodes: {} won, {} died, mean score {:.2}",
        cli.n_episodes,
        wins,
        deaths,
        scores.iter().sum::<f64>() / scores.len().max(1) as f64
    );
}
