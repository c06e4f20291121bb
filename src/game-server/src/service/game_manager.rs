use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, Ordering},
};

use common::model::{
    id::Id,
    match_state::{Match, MatchRules, MatchState},
    player::Player,
};
use tokio::sync::{broadcast, mpsc, Mutex};
use tracing::{debug, info, warn};

use crate::{
    entrypoint::GameServerConfig,
    error::{HostError, HostResult},
    service::game_thread::{GameThread, MatchHandle},
};

/// Registry of hosted matches. Each match runs on its own task.
pub struct GameManager {
    rules: MatchRules,
    channel_capacity: usize,
    shutdown_sender: broadcast::Sender<()>,
    shut_down: AtomicBool,
    games: Mutex<HashMap<Id, MatchHandle>>,
}

impl GameManager {
    pub fn new(config: &GameServerConfig) -> Self {
        let (shutdown_sender, _) = broadcast::channel(1);
        GameManager {
            rules: config.rules,
            channel_capacity: config.channel_capacity,
            shutdown_sender,
            shut_down: AtomicBool::new(false),
            games: Mutex::new(HashMap::new()),
        }
    }

    /// Validates the pairing, then spawns the match task. Nothing is spawned
    /// when validation fails or after shutdown.
    pub async fn create_match(
        &self,
        player1: impl Into<Option<Player>>,
        player2: impl Into<Option<Player>>,
    ) -> HostResult<MatchHandle> {
        let game = Match::create_with_rules(player1, player2, self.rules)?;
        // Subscribe before checking the flag so a concurrent shutdown is never missed
        let shutdown_receiver = self.shutdown_sender.subscribe();
        if self.shut_down.load(Ordering::SeqCst) {
            warn!("Refused to host match {} after shutdown", game.id());
            return Err(HostError::ShuttingDown);
        }

        let id = game.id();
        let (sender, receiver) = mpsc::channel(self.channel_capacity);
        tokio::spawn(GameThread::run(game, shutdown_receiver, receiver));

        let handle = MatchHandle::new(id, sender);
        self.games.lock().await.insert(id, handle.clone());
        Ok(handle)
    }

    /// Stops every match task and refuses new matches from then on.
    pub async fn shutdown(&self) {
        self.shut_down.store(true, Ordering::SeqCst);
        match self.shutdown_sender.send(()) {
            Ok(count) => info!("Stopping {} matches", count),
            Err(_) => debug!("No match running at shutdown"),
        }
        self.games.lock().await.clear();
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    pub async fn get(&self, id: Id) -> HostResult<MatchHandle> {
        self.games
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or(HostError::MatchNotFound(id))
    }

    /// Forgets a match. Its task stops once the last outstanding handle is dropped.
    pub async fn remove(&self, id: Id) -> HostResult<MatchHandle> {
        let handle = self
            .games
            .lock()
            .await
            .remove(&id)
            .ok_or(HostError::MatchNotFound(id))?;
        debug!("Removed match {}", id);
        Ok(handle)
    }

    pub async fn match_ids(&self) -> Vec<Id> {
        self.games.lock().await.keys().copied().collect()
    }

    /// Drops every finished match, and any whose task already stopped.
    pub async fn remove_finished(&self) -> Vec<Id> {
        let handles: Vec<MatchHandle> = self.games.lock().await.values().cloned().collect();
        let mut removed = Vec::new();
        for handle in handles {
            match handle.state().await {
                Ok(MatchState::Done) => removed.push(handle.id()),
                Ok(MatchState::InProgress) => {}
                Err(e) => {
                    warn!("Dropping match {}: {}", handle.id(), e);
                    removed.push(handle.id());
                }
            }
        }

        let mut games = self.games.lock().await;
        for id in removed.iter() {
            games.remove(id);
        }
        if !removed.is_empty() {
            info!("Removed {} finished matches", removed.len());
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use common::{model::game::Hand, GameError};

    use super::*;
    use crate::entrypoint::GameServer;

    fn player(name: &str) -> Player {
        Player::new(name).expect("Invalid name")
    }

    #[tokio::test]
    async fn create_and_look_up() {
        let server = GameServer::new(GameServerConfig::default());
        let manager = server.manager();
        let handle = manager
            .create_match(player("alice"), player("bob"))
            .await
            .unwrap();

        assert_eq!(manager.match_ids().await, vec![handle.id()]);
        let found = manager.get(handle.id()).await.unwrap();
        assert_eq!(found.id(), handle.id());
        assert_eq!(found.rounds().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_pairing_is_not_registered() {
        let server = GameServer::new(GameServerConfig::default());
        let manager = server.manager();
        assert_eq!(
            manager
                .create_match(player("alice"), player("alice"))
                .await
                .unwrap_err(),
            HostError::Game(GameError::DuplicatePlayer)
        );
        assert_eq!(
            manager.create_match(None::<Player>, player("bob")).await.unwrap_err(),
            HostError::Game(GameError::MissingPlayer)
        );
        assert!(manager.match_ids().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_match_is_not_found() {
        let server = GameServer::new(GameServerConfig::default());
        let id = Id::new();
        assert_eq!(
            server.manager().get(id).await.unwrap_err(),
            HostError::MatchNotFound(id)
        );
        assert_eq!(
            server.manager().remove(id).await.unwrap_err(),
            HostError::MatchNotFound(id)
        );
    }

    #[tokio::test]
    async fn configured_rules_apply_to_new_matches() {
        let config = GameServerConfig {
            rules: MatchRules::new(3).unwrap(),
            ..GameServerConfig::default()
        };
        let server = GameServer::new(config);
        let manager = server.manager();
        let (alice, bob) = (player("alice"), player("bob"));
        let handle = manager
            .create_match(alice.clone(), bob.clone())
            .await
            .unwrap();
        let other = manager
            .create_match(player("carol"), player("dave"))
            .await
            .unwrap();

        for _ in 0..2 {
            handle.vote(&alice, Hand::Scissors).await.unwrap();
            handle.vote(&bob, Hand::Paper).await.unwrap();
            let _ = handle.start_new_round().await;
        }
        assert_eq!(handle.compute_winner().await.unwrap(), Some(alice));
        assert_eq!(
            handle.start_new_round().await,
            Err(HostError::Game(GameError::MatchFinished))
        );

        assert_eq!(manager.remove_finished().await, vec![handle.id()]);
        assert_eq!(manager.match_ids().await, vec![other.id()]);
    }

    #[tokio::test]
    async fn server_shutdown_stops_every_match() {
        let server = GameServer::new(GameServerConfig::default());
        let manager = server.manager();
        let first = manager
            .create_match(player("alice"), player("bob"))
            .await
            .unwrap();
        let second = manager
            .create_match(player("carol"), player("dave"))
            .await
            .unwrap();

        server.shutdown().await;
        first.closed().await;
        second.closed().await;
        assert_eq!(first.rounds().await, Err(HostError::MatchClosed));
        assert!(manager.match_ids().await.is_empty());
    }

    #[tokio::test]
    async fn no_matches_are_hosted_after_shutdown() {
        let server = GameServer::new(GameServerConfig::default());
        let manager = server.manager();
        server.shutdown().await;
        assert!(manager.is_shut_down());

        assert_eq!(
            manager
                .create_match(player("alice"), player("bob"))
                .await
                .unwrap_err(),
            HostError::ShuttingDown
        );
        assert!(manager.match_ids().await.is_empty());
    }

    #[tokio::test]
    async fn remove_finished_drops_stopped_tasks() {
        let server = GameServer::new(GameServerConfig::default());
        let manager = server.manager();
        let handle = manager
            .create_match(player("alice"), player("bob"))
            .await
            .unwrap();
        let running = manager
            .create_match(player("carol"), player("dave"))
            .await
            .unwrap();

        // Registered handle whose task is already gone
        let stopped = MatchHandle::new(handle.id(), mpsc::channel(1).0);
        manager.games.lock().await.insert(handle.id(), stopped);
        drop(handle);

        assert_eq!(manager.remove_finished().await.len(), 1);
        assert_eq!(manager.match_ids().await, vec![running.id()]);
    }
}
