//! Tile Arcade entry point
//!
//! Native demo: generates a level from a seed, plays it headless and prints
//! the grid. Usage: `tile-arcade [maze|fill] [seed]`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let game = args.next().unwrap_or_else(|| "maze".to_string());
    let seed = match args.next() {
        Some(arg) => match arg.parse::<u64>() {
            Ok(seed) => seed,
            Err(e) => {
                eprintln!("Invalid seed {arg:?}: {e}");
                std::process::exit(2);
            }
        },
        None => rand::random(),
    };

    let settings = match std::env::var_os(tile_arcade::Settings::PATH_ENV) {
        Some(path) => tile_arcade::Settings::load(std::path::Path::new(&path)),
        None => tile_arcade::Settings::default(),
    };

    let result = match game.as_str() {
        "maze" => demo::maze(&settings, seed),
        "fill" => demo::fill(&settings, seed),
        other => {
            eprintln!("Unknown game {other:?}, expected \"maze\" or \"fill\"");
            std::process::exit(2);
        }
    };

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives the library directly
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use tile_arcade::Settings;
    use tile_arcade::audio::AudioMixer;
    use tile_arcade::consts::*;
    use tile_arcade::sim::{Direction, FillSession, FixedStep, MazeSession, Result};

    /// Seconds of simulated play before the maze demo gives up
    const MAZE_DEMO_SECONDS: f32 = 120.0;

    fn mixer(settings: &Settings) -> AudioMixer {
        let mut mixer = AudioMixer::new(settings.master_volume, settings.sfx_volume);
        mixer.set_muted(settings.muted);
        mixer
    }

    /// Roll the ball around with a fixed turn pattern until the maze is colored
    pub fn maze(settings: &Settings, seed: u64) -> Result<()> {
        let mut session = MazeSession::with_ball_speed(seed, settings.maze, settings.ball_speed)?;
        let mixer = mixer(settings);
        println!("Maze seed {seed}, start {}", session.start());
        println!("{}", session.grid());

        let turns = [Direction::Right, Direction::Down, Direction::Left, Direction::Up];
        let mut turn = 0;
        let mut clock = FixedStep::default();
        let mut tones = 0;
        let frames = (MAZE_DEMO_SECONDS * TICK_RATE) as u32;

        for _ in 0..frames {
            for _ in 0..clock.advance(SIM_DT) {
                if !session.ball().is_moving() {
                    session.steer(turns[turn % turns.len()]);
                    turn += 3;
                }
                session.tick()?;
            }
            tones += mixer.tones_for_events(&session.drain_events()).len();
            if session.is_completed() {
                break;
            }
        }

        println!("{}", session.grid());
        println!(
            "Colored {}/{} cells, completed: {}, tones played: {}",
            session.grid().count_visited(),
            session.grid().count_active(),
            session.is_completed(),
            tones
        );
        Ok(())
    }

    /// Trace the stored solution one cell at a time
    pub fn fill(settings: &Settings, seed: u64) -> Result<()> {
        let mut session = FillSession::new(seed, settings.fill)?;
        let mixer = mixer(settings);
        println!("Fill seed {seed}, start {}", session.puzzle().path().start());
        println!("{}", session.puzzle().grid());

        let solution = session.puzzle().solution().positions().to_vec();
        let mut tones = 0;
        for &pos in &solution[1..] {
            session.select(pos)?;
            tones += mixer.tones_for_events(&session.drain_events()).len();
        }

        println!("{}", session.puzzle().grid());
        println!(
            "Path length {}/{}, completed: {}, tones played: {}",
            session.puzzle().path().len(),
            solution.len(),
            session.is_completed(),
            tones
        );
        Ok(())
    }
}
