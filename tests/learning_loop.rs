use platform_rl::control::{Controller, DecisionTimer, EnumController, ScriptedControl};
use platform_rl::env::{
    JumpAction, JumpEvent, JumpRewardTable, JumpStateSpace, MazeAction, MazeEnv,
    MazeRewardTable, PlatformTrack, State,
};
use platform_rl::policy::{MlpConfig, MlpPolicy};
use platform_rl::{Agent, CoreError};

fn jump_policy(seed: u64) -> MlpPolicy<JumpAction, 3> {
    MlpPolicy::new(MlpConfig {
        random_state: Some(seed),
        ..MlpConfig::default()
    })
    .expect("policy")
}

#[test]
fn decision_cycle_against_the_adapter() {
    let track = PlatformTrack::new(vec![100.0, 220.0, 40.0, 310.0]);
    let mut space =
        JumpStateSpace::new(400.0, track, JumpRewardTable::default()).expect("state space");

    space.set_snapshot(125.0, 0);
    let initial = space.observe().expect("observe");
    let mut agent = Agent::new(jump_policy(5), initial);

    // cycle 1: the agent advances to the next platform
    let action = agent.choose_action().expect("choose");
    space.set_snapshot(214.0, 1);
    let reward = space.reward(JumpEvent::Advanced).expect("reward");
    let new_state = space.observe().expect("observe");
    agent.learn(action, new_state, reward).expect("learn");
    assert_eq!(agent.score(), 50.0);
    assert_eq!(agent.state(), new_state);

    // cycle 2: nothing happened; distance-shaped idle penalty
    let action = agent.choose_action().expect("choose");
    space.set_snapshot(218.0, 1);
    let reward = space.reward(JumpEvent::None).expect("reward");
    // |218 - 40| / 400 * 50, floored and negated
    assert_eq!(reward, -22.0);
    let new_state = space.observe().expect("observe");
    agent.learn(action, new_state, reward).expect("learn");
    assert_eq!(agent.score(), 28.0);
}

#[test]
fn learn_requires_a_fresh_choice_each_cycle() {
    let mut agent = Agent::new(jump_policy(8), State(0.5, 0.5));
    let action = agent.choose_action().expect("choose");
    agent.learn(action, State(0.5, 0.6), 50.0).expect("learn");
    assert_eq!(agent.score(), 50.0);

    // the cached vector was consumed by the first learn
    assert_eq!(
        agent.learn(action, State(0.5, 0.6), 50.0),
        Err(CoreError::NoCachedVector)
    );
}

#[test]
fn policy_parameters_survive_episode_resets() {
    let initial = State(0.25, 0.75);
    let mut agent = Agent::new(jump_policy(23), initial);

    let action = agent.choose_action().expect("choose");
    agent.learn(action, State(0.3, 0.75), -5.0).expect("learn");

    agent.reset(initial);
    let _ = agent.choose_action().expect("choose");
    let learned_q = agent.cached_q().expect("cached");

    agent.reset(initial);
    assert_eq!(agent.score(), 0.0);
    assert_eq!(agent.state(), initial);

    // same state, same parameters: the learned values answer unchanged
    let _ = agent.choose_action().expect("choose");
    assert_eq!(agent.cached_q().expect("cached"), learned_q);
}

#[test]
fn no_target_is_an_error_not_an_index_fault() {
    let track = PlatformTrack::new(vec![10.0, 20.0, 30.0]);
    let mut space =
        JumpStateSpace::new(400.0, track, JumpRewardTable::default()).expect("state space");

    // standing on the last generated platform: the "next" target is index 3
    space.set_snapshot(35.0, 2);
    assert_eq!(
        space.observe(),
        Err(CoreError::NoTarget { index: 3, len: 3 })
    );
}

#[test]
fn scripted_and_learning_controllers_share_the_seam() {
    let mut scripted: EnumController<JumpAction, 3> =
        EnumController::Scripted(ScriptedControl::new(JumpAction::None));
    let mut learning: EnumController<JumpAction, 3> =
        EnumController::Learning(Agent::new(jump_policy(40), State(0.5, 0.5)));

    for controller in [&mut scripted, &mut learning] {
        controller.begin_episode(State(0.5, 0.5));
        let action = controller.act().expect("act");
        controller
            .feedback(action, State(0.52, 0.5), -1.0)
            .expect("feedback");
        assert_eq!(controller.score(), -1.0);
    }
    assert_eq!(scripted.act().expect("act"), JumpAction::None);
}

#[test]
fn timer_gates_decisions_independently_of_frames() {
    let mut timer = DecisionTimer::new(0.12).expect("timer");
    let frame = 1.0 / 60.0;
    let mut decisions = 0;
    for _ in 0..60 {
        if timer.tick(frame) {
            decisions += 1;
        }
    }
    // 0.12s interval at 60fps: a decision every 8 frames
    assert_eq!(decisions, 7);
}

#[test]
fn maze_episode_learns_online_without_faults() {
    let maze = "
##.####
#     #
#     #
####*##
";
    let env = MazeEnv::parse(maze, MazeRewardTable::default()).expect("maze");
    let policy: MlpPolicy<MazeAction, 4> = MlpPolicy::new(MlpConfig {
        hidden_layer_sizes: vec![8],
        random_state: Some(77),
        ..MlpConfig::default()
    })
    .expect("policy");
    let mut agent = Agent::new(policy, env.observe(env.starting_point()));

    for _episode in 0..3 {
        let mut pos = env.starting_point();
        agent.reset(env.observe(pos));
        for _step in 0..50 {
            if env.is_goal(pos) {
                break;
            }
            let action = agent.choose_action().expect("choose");
            let (new_pos, event) = env.apply(pos, action);
            let reward = env.reward(event);
            agent
                .learn(action, env.observe(new_pos), reward)
                .expect("learn");
            pos = new_pos;
        }
        assert!(agent.score().is_finite());
    }
}
