// What you SEE:
// • A window with a ray-traced scene (three shiny spheres on a yellow floor)
//   in the middle, redrawn every frame.
// • W/A/S/D/Q/E move the red sphere, arrows + PgUp/PgDn move the camera.
// • SPACE pauses (image freezes), =/- resize the canvas, C recenters it,
//   G shows debug guides, P saves a PNG. ESC quits.
// • A HUD line at the top shows FPS, canvas and target sizes.

use std::path::Path;

use milwaukee::config::Config;
use milwaukee::draw::Drawer;
use milwaukee::error::Error;
use milwaukee::milwaukee::Milwaukee;
use milwaukee::orchestrator::FrameOrchestrator;

const CONFIG_FILE: &str = "milwaukee.json";

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load(Path::new(CONFIG_FILE)).inspect_err(|e| log::error!("{e}"))?;

    /* --- Window ---
       Visual: an empty window opens at the configured size. */
    let mut drawer = Drawer::new(&config.title, config.window_width, config.window_height)
        .inspect_err(|e| log::error!("{e}"))?;

    /* --- Scene + frame loop ---
       Visual: the traced spheres appear and follow your keys until ESC. */
    let (w, h) = (config.window_width, config.window_height);
    let mut orchestrator = FrameOrchestrator::new(Milwaukee::new(config), w, h);
    orchestrator.run(&mut drawer).inspect_err(|e| log::error!("{e}"))
}
