//! Mirror Maze entry point
//!
//! On the web the page drives `platform::web::WebSession`. Natively this is a
//! headless runner: load a level set, optionally apply the level's hint
//! placement, run the fixed-step loop and report the outcome.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;
    use mirror_maze::best_times::format_time;
    use mirror_maze::consts::*;
    use mirror_maze::platform::{FileStorage, MemoryStorage, Storage};
    use mirror_maze::sim::LevelSet;
    use mirror_maze::{Session, SessionEvent};

    /// Run a Mirror Maze level headless and report whether it was solved.
    #[derive(Debug, Parser)]
    #[command(author, version, about, long_about = None)]
    pub struct Args {
        /// Level set JSON to load instead of the built-in levels.
        #[arg(long, value_name = "PATH")]
        pub levels: Option<PathBuf>,
        /// Level to play, counting from 1.
        #[arg(
            long,
            value_name = "N",
            default_value_t = 1,
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
        )]
        pub level: usize,
        /// Simulated seconds to run before giving up.
        #[arg(long, value_name = "SECONDS", default_value_t = 5.0)]
        pub seconds: f32,
        /// Move the level's pieces onto its hint placement first.
        #[arg(long)]
        pub hint: bool,
        /// Directory for the progress document; progress is kept in memory when absent.
        #[arg(long, value_name = "DIR")]
        pub save_dir: Option<PathBuf>,
    }

    pub fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
        let levels = match &args.levels {
            Some(path) => LevelSet::from_json(&std::fs::read_to_string(path)?)?,
            None => LevelSet::builtin()?,
        };
        let storage: Box<dyn Storage> = match &args.save_dir {
            Some(dir) => Box::new(FileStorage::new(dir)),
            None => Box::new(MemoryStorage::new()),
        };

        let mut session = Session::new(levels, storage)?;
        session.start_level(args.level - 1, true)?;
        if args.hint {
            let placed = session.apply_hint_solution();
            log::info!("Placed {} hint pieces", placed);
        }

        let frames = (args.seconds / SIM_DT).round() as u32;
        let mut completed = None;
        for _ in 0..frames {
            for event in session.frame(SIM_DT) {
                match event {
                    SessionEvent::TargetPinged { target } => log::info!("Target {} lit", target),
                    SessionEvent::LevelComplete { time, new_best, .. } => {
                        completed = Some(time);
                        log::info!("Complete in {:.2}s (new best: {})", time, new_best);
                    }
                    other => log::debug!("{:?}", other),
                }
            }
            if completed.is_some() {
                break;
            }
        }

        let view = session.view();
        let lit = view.targets.iter().filter(|t| t.is_hit).count();
        println!(
            "Level {} \"{}\": {} beam segments, {}/{} targets lit",
            view.level_id,
            view.level_name,
            view.beams.len(),
            lit,
            view.targets.len()
        );
        println!(
            "Mirrors {}/{}, splitters {}/{}",
            view.mirrors,
            view.available_pieces.mirrors,
            view.splitters,
            view.available_pieces.splitters
        );
        match completed {
            Some(time) => println!("Solved in {} ({time:.2}s)", format_time(time)),
            None => println!("Unsolved after {}", format_time(args.seconds)),
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Mirror Maze (native) starting...");

    let args = native::Args::parse();
    match native::run(args) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::WebSession, this is just to satisfy the compiler
}
