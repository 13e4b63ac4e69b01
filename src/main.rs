//! Park It entry point
//!
//! The browser build is driven from the page through `parkit::web`. Natively
//! this runs level 1 headless with the starter brain and reports the outcome.
//!
//! Usage: `parkit [tuning.json] [level.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use parkit::brain::StarterBrain;
    use parkit::sim::{GameEvent, Level, Session};
    use parkit::tuning::Tuning;

    /// Give up after this much game time
    const TIME_LIMIT_SECONDS: u32 = 120;
    /// Host frame rate of the headless loop
    const HOST_FPS: u32 = 60;

    env_logger::init();
    log::info!("Park It (native) starting...");

    let mut args = std::env::args().skip(1);

    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let level = match args.next() {
        Some(path) => {
            let loaded = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|json| Level::from_json(&json, &tuning).map_err(|e| e.to_string()));
            match loaded {
                Ok(level) => level,
                Err(e) => {
                    log::error!("Could not load level {}: {}", path, e);
                    std::process::exit(1);
                }
            }
        }
        None => Level::parking_lot(&tuning),
    };

    let mut session = Session::start(level, &tuning, StarterBrain::default());
    let frame_dt = 1.0 / HOST_FPS as f32;

    let mut outcome = None;
    for _ in 0..TIME_LIMIT_SECONDS * HOST_FPS {
        if let Some(event) = session.advance(frame_dt) {
            outcome = Some(event);
            break;
        }
    }

    let elapsed = session.elapsed();
    let state = session.stop();
    match outcome {
        Some(GameEvent::Parked) => println!("Parked in {:.1}s", elapsed),
        Some(GameEvent::Crashed(pair)) => println!(
            "Crashed after {:.1}s (body {} hit body {})",
            elapsed, pair.a, pair.b
        ),
        None => println!("Still driving after {}s", TIME_LIMIT_SECONDS),
    }
    println!(
        "{} render ticks, {} brain ticks, final speed {:.2}, heading {:.2}",
        state.time_ticks, state.brain_ticks, state.level.player.speed, state.level.player.heading
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is parkit::web::start, this is just to satisfy the compiler
}
