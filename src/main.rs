//! Ballistic Sandbox headless driver
//!
//! Runs a scripted session without a window: clicks, ammo switches and
//! power/angle changes come from a seeded RNG, and the HUD is logged as the
//! session goes.
//!
//! Usage: `ballistic-sandbox [settings.json] [seed]`

use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use ballistic_sandbox::consts::FRAME_DT;
use ballistic_sandbox::platform::{FrameTimer, InputEvent, InputState, ManualClock};
use ballistic_sandbox::renderer::extract_instances;
use ballistic_sandbox::sim::{ImpulseResolver, Sandbox, StepOutcome, tick};
use ballistic_sandbox::{Settings, ui};

/// Ten seconds at 60 Hz
const FRAMES: u32 = 600;
const DEFAULT_SEED: u64 = 3002;

const KEYS: [char; 10] = ['1', '2', '3', '4', '+', '-', 'w', 's', '[', ']'];

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(Path::new(&path)),
        None => Settings::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);

    log::info!("Ballistic Sandbox (headless) starting, seed {}", seed);
    for line in ui::HELP_TEXT.lines() {
        log::debug!("{}", line);
    }

    let mut sandbox = Sandbox::new(settings);
    let mut resolver = ImpulseResolver::default();
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut clock = ManualClock::default();
    let mut timer = FrameTimer::new(0.1);
    let mut input = InputState::default();

    let frame_ms = (FRAME_DT * 1000.0).round() as u64;
    let mut fired = 0u32;
    let mut expired = 0usize;
    let mut absorbed = 0usize;
    let mut saturated_frames = 0u32;

    for frame in 0..FRAMES {
        if rng.random_bool(0.08) {
            input.handle(InputEvent::MouseDown);
            input.handle(InputEvent::MouseUp);
        }
        if rng.random_bool(0.02) {
            let key = KEYS[rng.random_range(0..KEYS.len())];
            input.handle(InputEvent::Key(key));
        }

        clock.advance(frame_ms);
        let frame_tick = timer.tick(&clock);
        let requests = input.take();
        fired += requests.fire;

        match tick(&mut sandbox, &requests, frame_tick.dt, frame_tick.now_ms, &mut resolver) {
            StepOutcome::Advanced(stats) => {
                expired += stats.expired;
                absorbed += stats.contacts.absorbed;
                if stats.contacts.saturated {
                    saturated_frames += 1;
                }
            }
            StepOutcome::Skipped(reason) => log::debug!("Frame {} skipped: {:?}", frame, reason),
        }

        if frame % 60 == 0 {
            log::info!(
                "t={}ms {} | {} | {} contacts",
                frame_tick.now_ms,
                ui::status_line(&sandbox),
                ui::pool_line(&sandbox),
                sandbox.contacts().len()
            );
        }
    }

    let instances = extract_instances(&sandbox);
    println!("Frames:          {}", sandbox.frame_number);
    println!("Spawn requests:  {}", fired);
    println!("Expired:         {}", expired);
    println!("Absorbed:        {}", absorbed);
    println!("Saturated:       {}", saturated_frames);
    println!("Live at end:     {}", sandbox.pool.live_count());
    println!("Instances:       {}", instances.len());
    println!("{}", ui::status_line(&sandbox));
}
