use std::process::ExitCode;

use asteroids::App;

fn main() -> ExitCode {
    env_logger::init();

    match App::new().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Asteroids failed to start: {e}");
            ExitCode::from(255)
        }
    }
}
