use std::env;

use arena_duel::common::error::ConfigError;
use arena_duel::common::tunables::Tunables;

/// `arena-duel [tunables.json]`
fn main() -> Result<(), ConfigError> {
    let tunables = match env::args().nth(1) {
        Some(path) => Tunables::from_json_file(path)?,
        None => Tunables::default(),
    };

    arena_duel::game::run(tunables);
    Ok(())
}
