use std::sync::Arc;

use log::{debug, warn};
use renet::{ClientId, DefaultChannel, RenetServer};
use taraq_core::{
    commentary::Commentator,
    console::render,
    host::{HostSession, Outbound},
    player::{PlayerId, HOST_PLAYER_ID},
};
use tokio::{sync::mpsc::Sender, task, time};

/// Results of work started outside the game loop, fed back into it.
#[derive(Debug)]
pub enum HostEvent {
    RollSettled,
    Commentary(String),
    Avatar(PlayerId, String),
}

pub struct Dispatcher {
    pub events: Sender<HostEvent>,
    pub commentator: Arc<dyn Commentator + Send + Sync>,
}

impl Dispatcher {
    /// Carries out everything the host queued. Advisory work is spawned and
    /// never awaited here.
    pub fn dispatch(&self, host: &mut HostSession, server: &mut RenetServer) {
        let mut changed = false;
        for out in host.drain() {
            match out {
                Outbound::Broadcast(message) => match message.encode() {
                    Ok(bytes) => {
                        server.broadcast_message(DefaultChannel::ReliableOrdered, bytes);
                        changed = true;
                    }
                    Err(e) => warn!("could not encode snapshot: {}", e),
                },
                Outbound::SendTo(peer_id, message) => match message.encode() {
                    Ok(bytes) => server.send_message(
                        ClientId::from_raw(peer_id),
                        DefaultChannel::ReliableOrdered,
                        bytes,
                    ),
                    Err(e) => warn!("could not encode message for {}: {}", peer_id, e),
                },
                Outbound::SettleRoll(delay) => {
                    let events = self.events.clone();
                    tokio::spawn(async move {
                        time::sleep(delay).await;
                        let _ = events.send(HostEvent::RollSettled).await;
                    });
                }
                Outbound::Commentary(request) => {
                    self.advise(move |c| c.commentary(&request).map(HostEvent::Commentary));
                }
                Outbound::WinnerToast { winner, turns } => {
                    self.advise(move |c| c.winner_toast(&winner, turns).map(HostEvent::Commentary));
                }
                Outbound::Avatar { player_id, name } => {
                    self.advise(move |c| c.avatar(&name).map(|url| HostEvent::Avatar(player_id, url)));
                }
            }
        }
        if changed {
            println!("{}", render(host.state(), Some(HOST_PLAYER_ID)));
        }
    }

    fn advise<F>(&self, job: F)
    where
        F: FnOnce(&dyn Commentator) -> Option<HostEvent> + Send + 'static,
    {
        let commentator = self.commentator.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            match task::spawn_blocking(move || job(commentator.as_ref())).await {
                Ok(Some(event)) => {
                    let _ = events.send(event).await;
                }
                Ok(None) => debug!("no advisory content"),
                Err(e) => warn!("advisory task failed: {}", e),
            }
        });
    }
}

pub fn apply_event(host: &mut HostSession, event: HostEvent) {
    match event {
        HostEvent::RollSettled => host.settle_roll(),
        HostEvent::Commentary(text) => host.set_commentary(text),
        HostEvent::Avatar(player_id, url) => host.set_avatar(&player_id, url),
    }
}
