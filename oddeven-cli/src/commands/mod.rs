use anyhow::Context;
use comfy_table::{presets::UTF8_FULL, Table};
use oddeven_engine::status::pretty_timestamp;
use oddeven_engine::{
    compute_commitment, EngineConfig, OddsEvensEngine, RollupDriver, RollupRequest, Seat,
};
use rand::RngCore;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("oddeven").join("config.json"))
}

/// Load the engine config from `path`, else from the default location if it
/// exists, else use defaults.
pub async fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let path = match path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|p| p.exists()),
    };

    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };

    let content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = EngineConfig::from_json(&content)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    tracing::debug!("Loaded config from {}: {:?}", path.display(), config);
    Ok(config)
}

/// Parse JSON-lines requests; blank lines and `#` comments are skipped.
pub fn parse_requests(content: &str) -> anyhow::Result<Vec<RollupRequest>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(n, line)| {
            serde_json::from_str(line).with_context(|| format!("Invalid request on line {}", n + 1))
        })
        .collect()
}

async fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut content = String::new();
        tokio::io::stdin().read_to_string(&mut content).await?;
        return Ok(content);
    }
    tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))
}

pub async fn replay(
    config: EngineConfig,
    input: &Path,
    hex: bool,
    list: bool,
) -> anyhow::Result<()> {
    let requests = parse_requests(&read_input(input).await?)?;
    let driver = run_requests(config, &requests, hex)?;

    if list {
        println!();
        println!("{}", games_table(driver.engine()));
    }
    Ok(())
}

fn run_requests(
    config: EngineConfig,
    requests: &[RollupRequest],
    hex: bool,
) -> anyhow::Result<RollupDriver> {
    let mut driver = RollupDriver::new(OddsEvensEngine::new(config)?);

    for (index, request) in requests.iter().enumerate() {
        let (status, output) = driver
            .handle(request)
            .with_context(|| format!("Request {} left the engine in a corrupt state", index))?;

        match output {
            Some(output) => {
                let text = if hex { output.payload() } else { output.text };
                println!("[{}] {} {:?}: {}", index, status, output.kind, text);
            }
            None => println!("[{}] {}", index, status),
        }
    }

    if let Some(address) = driver.rollup_address() {
        tracing::info!("Rollup address: {}", address);
    }
    Ok(driver)
}

fn games_table(engine: &OddsEvensEngine) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Game ID",
        "Phase",
        "Last Interaction",
        "Creator",
        "Challenger",
    ]);

    for game in engine.store().iter() {
        let player = |seat: Seat| {
            format!(
                "{} ({})",
                game.player(seat).display_id(),
                game.slot(seat).parity
            )
        };
        table.add_row(vec![
            game.id().to_string(),
            game.phase().to_string(),
            format!(
                "{} - {}",
                game.last_interaction(),
                pretty_timestamp(Some(game.last_ts()))
            ),
            player(Seat::Creator),
            player(Seat::Challenger),
        ]);
    }

    table
}

fn random_nonce() -> String {
    let mut nonce = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut nonce);
    hex::encode(nonce)
}

pub fn commit(action: i64, nonce: Option<String>) -> anyhow::Result<()> {
    let nonce = nonce.unwrap_or_else(random_nonce);
    let commitment = compute_commitment(action, &nonce);

    println!("Commitment: {}", commitment);
    println!("Action: {}", action);
    println!("Nonce: {}", nonce);
    println!();
    println!("Keep the nonce secret until you reveal with:");
    println!("action {} nonce {}", action, nonce);
    Ok(())
}

pub fn show_game_id(config: EngineConfig, player_a: &str, player_b: &str) -> anyhow::Result<()> {
    let engine = OddsEvensEngine::new(config)?;
    println!("{}", engine.game_id(player_a, player_b));
    Ok(())
}
