mod console_input;

use std::{
    error::Error,
    net::UdpSocket,
    str::FromStr,
    time::{Duration, Instant, SystemTime},
};

use itertools::Itertools;
use log::{debug, info, warn};
use renet::{
    transport::{ClientAuthentication, NetcodeClientTransport},
    ConnectionConfig, DefaultChannel, RenetClient,
};
use taraq_core::{
    config::PeerConfig,
    console::{render, Command},
    error::ConnectionError,
    events::NetworkMessage,
    peer::{PeerSession, PeerUpdate},
};
use tokio::time;

static RULES: &str = "
*** Taraq ***
Everybody starts with zero hearts. On your turn you roll a die and then either give the whole roll to one
player, take it from one player, or split it across several players. A player who drops to -5 hearts falls
and stays down. The last one standing wins.";

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(e) = run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = PeerConfig::from_args(&args)?;

    let mut client = RenetClient::new(ConnectionConfig::default());
    let socket = UdpSocket::bind("0.0.0.0:0").map_err(ConnectionError::from)?;
    let current_time = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH)?;
    let client_id = current_time.as_millis() as u64;
    let authentication = ClientAuthentication::Unsecure {
        server_addr: config.server_addr,
        client_id,
        user_data: None,
        protocol_id: config.protocol_id,
    };
    let mut transport =
        NetcodeClientTransport::new(current_time, authentication, socket).map_err(ConnectionError::from)?;

    let mut peer = PeerSession::new(&config.name);
    let mut joined = false;
    let mut console = console_input::spawn_reader();

    println!("{}", RULES);
    println!("Connecting to {} as {}...", config.server_addr, config.name);

    let mut interval = time::interval(Duration::from_millis(50));
    let mut last_updated = Instant::now();
    loop {
        let now = Instant::now();
        let duration = now - last_updated;
        last_updated = now;

        client.update(duration);
        if let Err(e) = transport.update(duration, &mut client) {
            debug!("transport update failed: {}", e);
        }
        if let Some(reason) = transport.disconnect_reason() {
            peer.disconnected();
            return Err(ConnectionError::from(reason).into());
        }

        if client.is_connected() {
            if !joined {
                info!("connected as {}", client_id);
                send(&mut client, &peer.connected(client_id));
                joined = true;
            }
            while let Some(message) = client.receive_message(DefaultChannel::ReliableOrdered) {
                let message = match NetworkMessage::decode(&message) {
                    Ok(message) => message,
                    Err(e) => {
                        warn!("dropping message from host: {}", e);
                        continue;
                    }
                };
                match peer.handle_message(message) {
                    PeerUpdate::Synced => {
                        if let Some(state) = peer.replica() {
                            println!("{}", render(state, peer.own_id().map(|id| id.as_str())));
                        }
                    }
                    PeerUpdate::Kicked => {
                        println!("You were removed from the game by the host.");
                        transport.disconnect();
                        return Ok(());
                    }
                    PeerUpdate::Ignored => {}
                }
            }
        }

        if let Err(e) = transport.send_packets(&mut client) {
            debug!("could not send packets: {}", e);
        }

        tokio::select! {
            _ = interval.tick() => {}
            Some(line) = console.recv() => {
                if !handle_command(&peer, &mut client, &line) {
                    break;
                }
            }
        }
    }

    transport.disconnect();
    peer.disconnected();
    Ok(())
}

/// Returns false when the player wants to quit.
fn handle_command(peer: &PeerSession, client: &mut RenetClient, line: &str) -> bool {
    let Ok(command) = Command::from_str(line) else {
        println!("Unknown command, h for help");
        return true;
    };
    match command {
        Command::Quit => return false,
        Command::Help => println!("{}", Command::help()),
        Command::Start | Command::Reset | Command::Add(_) | Command::Kick(_) => {
            println!("Only the host can do that.")
        }
        _ => {
            let Some(state) = peer.replica() else {
                println!("Waiting for the host...");
                return true;
            };
            if !peer.is_my_turn() {
                println!("Not your turn.");
                return true;
            }
            match command.intent(state) {
                Some(intent) => send(client, &peer.request(intent)),
                None => println!(
                    "No such player. Players are {}",
                    state
                        .players
                        .iter()
                        .enumerate()
                        .map(|(i, p)| format!("{}: {}", i, p.name))
                        .join(", ")
                ),
            }
        }
    }
    true
}

fn send(client: &mut RenetClient, message: &NetworkMessage) {
    match message.encode() {
        Ok(bytes) => client.send_message(DefaultChannel::ReliableOrdered, bytes),
        Err(e) => warn!("could not encode message: {}", e),
    }
}
