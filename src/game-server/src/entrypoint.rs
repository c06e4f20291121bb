use std::sync::Arc;

use common::model::match_state::MatchRules;
use tracing::{info, Level};

use super::service::game_manager::GameManager;

#[derive(Debug, Clone)]
pub struct GameServerConfig {
    pub rules: MatchRules,
    // Requests buffered per match before voters have to wait
    pub channel_capacity: usize,
    pub log_level: Level,
}

impl Default for GameServerConfig {
    fn default() -> Self {
        GameServerConfig {
            rules: MatchRules::default(),
            channel_capacity: 100,
            log_level: Level::DEBUG,
        }
    }
}

/// Init logging, ignore error if already set
pub fn init_tracing(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_line_number(true)
        .with_file(true)
        .with_max_level(level)
        .try_init();
}

pub struct GameServer {
    manager: Arc<GameManager>,
}
impl GameServer {
    pub fn new(config: GameServerConfig) -> Self {
        init_tracing(config.log_level);

        let manager = Arc::new(GameManager::new(&config));
        info!(
            "Game server ready, best of {} rounds",
            config.rules.max_rounds()
        );
        GameServer { manager }
    }

    pub fn manager(&self) -> Arc<GameManager> {
        self.manager.clone()
    }

    pub async fn shutdown(&self) {
        self.manager.shutdown().await;
    }
}
