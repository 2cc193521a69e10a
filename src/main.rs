//! Goblin Inferno headless runner
//!
//! Plays one scripted run with the persisted ledger and upgrades, logs the
//! outcome and writes the records back.
//!
//! Usage: goblin-inferno [--seed N] [--character NAME] [--ticks N]
//!                       [--save-dir DIR] [--balance FILE]

use std::path::PathBuf;

use glam::Vec2;

use goblin_inferno::BalanceTable;
use goblin_inferno::audio::AudioManager;
use goblin_inferno::consts::TICKS_PER_SECOND;
use goblin_inferno::persistence::{self, FileStore};
use goblin_inferno::sim::{
    Character, GamePhase, RenderSnapshot, RunConfig, SimulationContext, TickInput, WorldBounds,
    choose_upgrade, tick,
};

struct Options {
    seed: u64,
    character: Character,
    ticks: u64,
    save_dir: PathBuf,
    balance: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            seed: 0x60B1_1A,
            character: Character::default(),
            ticks: 10 * 60 * u64::from(TICKS_PER_SECOND),
            save_dir: PathBuf::from(".goblin-inferno"),
            balance: None,
        }
    }
}

fn parse_args() -> Options {
    let mut opts = Options::default();
    let mut args = std::env::args().skip(1);
    while let Some(flag) = args.next() {
        let Some(value) = args.next() else {
            log::warn!("Missing value for {flag}");
            break;
        };
        match flag.as_str() {
            "--seed" => match value.parse() {
                Ok(seed) => opts.seed = seed,
                Err(_) => log::warn!("Bad seed '{value}', keeping {}", opts.seed),
            },
            "--character" => match Character::from_str(&value) {
                Some(c) => opts.character = c,
                None => log::warn!("Unknown character '{value}'"),
            },
            "--ticks" => match value.parse() {
                Ok(ticks) => opts.ticks = ticks,
                Err(_) => log::warn!("Bad tick count '{value}'"),
            },
            "--save-dir" => opts.save_dir = PathBuf::from(value),
            "--balance" => opts.balance = Some(PathBuf::from(value)),
            _ => log::warn!("Ignoring unknown flag {flag}"),
        }
    }
    opts
}

fn load_balance(path: Option<&PathBuf>) -> BalanceTable {
    let Some(path) = path else {
        return BalanceTable::default();
    };
    match std::fs::read_to_string(path) {
        Ok(json) => BalanceTable::from_json(&json),
        Err(e) => {
            log::warn!("Could not read balance table {}: {e}", path.display());
            BalanceTable::default()
        }
    }
}

/// Circle the arena center and aim at the closest enemy
fn scripted_input(state: &SimulationContext) -> TickInput {
    let pos = state.player.pos();
    let to_center = state.bounds.center() - pos;
    let orbit = Vec2::new(-to_center.y, to_center.x).normalize_or_zero();
    let movement = (orbit + to_center.normalize_or_zero() * 0.3).normalize_or_zero();

    let aim = state
        .enemies
        .iter()
        .filter(|e| e.is_alive())
        .min_by(|a, b| a.pos.distance_squared(pos).total_cmp(&b.pos.distance_squared(pos)))
        .map(|e| e.pos - pos)
        .unwrap_or(Vec2::ZERO);

    TickInput {
        movement,
        aim,
        ..Default::default()
    }
}

fn main() {
    env_logger::init();
    let opts = parse_args();
    log::info!(
        "Goblin Inferno (headless) seed {} as {}",
        opts.seed,
        opts.character.name()
    );

    let mut store = FileStore::new(&opts.save_dir);
    let balance = load_balance(opts.balance.as_ref());
    let ledger = persistence::load_ledger(&store, balance.starting_debt);
    let upgrades = persistence::load_upgrades(&store);
    let mut audio = AudioManager::load(&store);

    let config = RunConfig {
        seed: opts.seed,
        character: opts.character,
        balance,
        bounds: WorldBounds::default(),
    };
    let mut state = SimulationContext::from_config(config, ledger, upgrades);

    let mut cues = 0usize;
    let mut steps = 0u64;
    while steps < opts.ticks {
        match state.phase {
            GamePhase::GameOver | GamePhase::Victory => break,
            GamePhase::UpgradeChoice => {
                match choose_upgrade(&mut state, 0) {
                    Some(choice) => log::debug!("Picked {}", choice.name()),
                    None => break,
                }
                continue;
            }
            _ => {}
        }

        let input = scripted_input(&state);
        tick(&mut state, &input);
        steps += 1;

        let events = state.drain_events();
        cues += audio.handle_events(&events);
        audio.drain();

        if state.time_ticks % (30 * u64::from(TICKS_PER_SECOND)) == 0 {
            log::info!(
                "t={}s hp {:.0} enemies {} difficulty {:.1} gold {:.1} debt {:.1}",
                state.time_ticks / u64::from(TICKS_PER_SECOND),
                state.player.body.hp,
                state.enemies.len(),
                state.difficulty,
                state.ledger.gold,
                state.ledger.debt
            );
        }
    }

    let snapshot = RenderSnapshot::capture(&state);
    let hud = &snapshot.hud;
    log::info!(
        "Run ended {:?} after {} ticks: level {}, bosses defeated {}, gold {:.1}, debt {:.1}, gems {}",
        hud.phase,
        snapshot.tick,
        hud.level,
        state.director.defeated,
        hud.gold,
        hud.debt,
        hud.gems
    );
    log::debug!("{cues} sound cues queued");
    match serde_json::to_string(hud) {
        Ok(json) => log::debug!("Final HUD: {json}"),
        Err(e) => log::warn!("Could not serialize HUD: {e}"),
    }

    if let Err(e) = persistence::save_ledger(&mut store, &state.ledger) {
        log::warn!("Failed to save ledger: {e}");
    }
    if let Err(e) = persistence::save_upgrades(&mut store, &state.progression.permanent) {
        log::warn!("Failed to save upgrades: {e}");
    }
    if let Err(e) = audio.save(&mut store) {
        log::warn!("Failed to save mute setting: {e}");
    }
    log::info!("Saved records to {}", store.dir().display());
}
