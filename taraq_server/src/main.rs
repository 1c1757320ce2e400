mod console_input;
mod dispatch;

use std::{
    error::Error,
    net::UdpSocket,
    str::FromStr,
    sync::Arc,
    time::{Duration, Instant, SystemTime},
};

use dispatch::{apply_event, Dispatcher, HostEvent};
use log::{info, warn};
use renet::{
    transport::{NetcodeServerTransport, ServerAuthentication, ServerConfig},
    ConnectionConfig, DefaultChannel, RenetServer, ServerEvent,
};
use taraq_core::{
    commentary::CannedCommentator,
    config::{HostConfig, SETTLE_DELAY_VAR},
    console::{render, Command},
    dice::RandomDice,
    error::ConnectionError,
    events::NetworkMessage,
    host::HostSession,
    player::HOST_PLAYER_ID,
};
use tokio::{sync::mpsc::channel, time};

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
    let settle_ms = std::env::var(SETTLE_DELAY_VAR).ok();
    let config = HostConfig::from_args(&args, settle_ms.as_deref())?;

    let mut server = RenetServer::new(ConnectionConfig::default());
    let current_time = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH)?;
    let server_config = ServerConfig {
        current_time,
        max_clients: config.max_clients,
        protocol_id: config.protocol_id,
        public_addresses: vec![config.public_addr()],
        authentication: ServerAuthentication::Unsecure,
    };
    let socket = UdpSocket::bind(config.public_addr()).map_err(ConnectionError::from)?;
    let mut transport = NetcodeServerTransport::new(server_config, socket).map_err(ConnectionError::from)?;

    let mut host = HostSession::new(&config.host_name, config.settle_delay, Box::new(RandomDice));
    for name in config.local_players.iter() {
        host.add_local_player(name);
    }

    let (event_tx, mut event_rx) = channel::<HostEvent>(32);
    let dispatcher = Dispatcher {
        events: event_tx,
        commentator: Arc::new(CannedCommentator),
    };
    let mut console = console_input::spawn_reader();

    info!("hosting on {}", config.public_addr());
    println!("{}", Command::help());
    println!("{}", render(host.state(), Some(HOST_PLAYER_ID)));

    let mut interval = time::interval(Duration::from_millis(50));
    let mut last_updated = Instant::now();
    loop {
        let now = Instant::now();
        let duration = now - last_updated;
        last_updated = now;

        server.update(duration);
        transport
            .update(duration, &mut server)
            .map_err(ConnectionError::from)?;

        while let Some(event) = server.get_event() {
            match event {
                ServerEvent::ClientConnected { client_id } => {
                    info!("client {} connected", client_id);
                }
                ServerEvent::ClientDisconnected { client_id, reason } => {
                    info!("client {} disconnected: {}", client_id, reason);
                    host.connection_closed(client_id.raw());
                }
            }
        }

        for client_id in server.clients_id() {
            while let Some(message) =
                server.receive_message(client_id, DefaultChannel::ReliableOrdered)
            {
                match NetworkMessage::decode(&message) {
                    Ok(message) => host.handle_message(client_id.raw(), message),
                    Err(e) => warn!("dropping message from {}: {}", client_id, e),
                }
            }
        }

        dispatcher.dispatch(&mut host, &mut server);
        transport.send_packets(&mut server);

        tokio::select! {
            _ = interval.tick() => {}
            Some(event) = event_rx.recv() => apply_event(&mut host, event),
            Some(line) = console.recv() => {
                if !handle_command(&mut host, &line) {
                    break;
                }
            }
        }
    }

    info!("shutting down");
    server.disconnect_all();
    transport.send_packets(&mut server);
    Ok(())
}

/// Returns false when the host wants to quit.
fn handle_command(host: &mut HostSession, line: &str) -> bool {
    let Ok(command) = Command::from_str(line) else {
        println!("Unknown command, h for help");
        return true;
    };
    let done = match &command {
        Command::Quit => return false,
        Command::Help => {
            println!("{}", Command::help());
            true
        }
        Command::Start => host.start_game(),
        Command::Reset => host.reset_game(),
        Command::Add(name) => host.add_local_player(name).is_some(),
        Command::Kick(index) => match host.state().players.get(*index).map(|p| p.id.clone()) {
            Some(id) => host.remove_player(&id),
            None => false,
        },
        _ => match command.intent(host.state()) {
            Some(intent) => {
                host.submit_local(intent);
                true
            }
            None => false,
        },
    };
    if !done {
        println!("Not possible right now");
    }
    true
}
