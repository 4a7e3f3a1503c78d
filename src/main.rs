mod config;
mod data;
mod events;
mod menu;
mod session;

use anyhow::Context;
use config::Config;
use events::Event;
use menu::MenuEngine;
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

// Console simulator: stands in for the USSD gateway framework. Each stdin
// line is one session step; the engine's reply is printed as the "screen".
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load("config.toml").context("failed to load config.toml")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.general.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let data = cfg.market_data().context("invalid market data in config")?;
    info!(
        crops = data.catalog.crops().len(),
        markets = data.catalog.markets().len(),
        price_rows = data.prices.rows().len(),
        "loaded market data"
    );
    let engine = MenuEngine::new(cfg.farmer.name.clone(), data);

    let (tx, mut rx) = mpsc::channel::<Event>(16);

    // Blocking stdin reader; each line becomes one Input event.
    let input_tx = tx.clone();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        loop {
            let mut line = String::new();
            match stdin.read_line(&mut line) {
                Ok(0) | Err(_) => {
                    let _ = input_tx.blocking_send(Event::Shutdown);
                    break;
                }
                Ok(_) => {
                    let _ = input_tx.blocking_send(Event::Input {
                        content: line.trim().to_string(),
                    });
                }
            }
        }
    });

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(Event::Shutdown).await;
        }
    });

    // Session open: the gateway sends no content on first contact.
    let mut turn = engine.step(None, None);
    println!("{}\n", turn.response);

    while let Some(event) = rx.recv().await {
        match event {
            Event::Input { content } => {
                turn = engine.step(Some(turn.user), Some(&content));
                debug!(
                    next_state = turn.next_state.as_str(),
                    continue_session = turn.continue_session,
                    "step"
                );
                println!("{}\n", turn.response);
                if !turn.continue_session {
                    break;
                }
            }
            Event::Shutdown => {
                info!("session aborted");
                break;
            }
        }
    }

    Ok(())
}
