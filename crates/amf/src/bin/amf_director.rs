//! The director daemon: binds the D<->ND listener, drives `DirectorRuntime`
//! off a single-threaded `mio` poll loop (no async runtime, per the
//! teacher's "explicit control flow" design principle), and resends
//! unacked messages on a timer tick.

use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

use mio::net::TcpListener;
use mio::{Events, Interest, Poll, Token};

use amf::connection::Connection;
use amf::director::DirectorRuntime;
use amf_config::ConfigLoader;
use amf_kernel::DirectorState;
use amf_types::NodeId;

const LISTENER_TOKEN: Token = Token(0);
#[cfg(unix)]
const SIGNAL_TOKEN: Token = Token(1);
const FIRST_CONN_TOKEN: usize = 2;
const RESEND_TICK: Duration = Duration::from_millis(500);

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let config = ConfigLoader::new().load_or_default();

    let addr = config.cluster.director_address.parse()?;
    let mut listener = TcpListener::bind(addr)?;
    let mut poll = Poll::new()?;
    poll.registry().register(&mut listener, LISTENER_TOKEN, Interest::READABLE)?;

    #[cfg(unix)]
    let mut signals = {
        let mut signals = signal_hook_mio::v1_0::Signals::new([
            signal_hook::consts::SIGTERM,
            signal_hook::consts::SIGINT,
        ])?;
        poll.registry().register(&mut signals, SIGNAL_TOKEN, Interest::READABLE)?;
        signals
    };

    let mut connections: HashMap<Token, Connection> = HashMap::new();
    let mut next_token = FIRST_CONN_TOKEN;

    let mut runtime = DirectorRuntime::new(
        NodeId::new(config.node.node_id),
        DirectorState::new(),
        Duration::from_secs(config.cluster.wait_timeout_secs),
    );

    let mut events = Events::with_capacity(1024);
    tracing::info!(%addr, "director listening");
    loop {
        poll.poll(&mut events, Some(RESEND_TICK))?;

        if events.is_empty() {
            for message in runtime.due_for_resend(Instant::now()) {
                tracing::debug!(?message, "resending unacked message");
                send_to_peer(&mut connections, &message)?;
            }
            continue;
        }

        for event in &events {
            match event.token() {
                LISTENER_TOKEN => accept_loop(&listener, &poll, &mut connections, &mut next_token)?,
                #[cfg(unix)]
                SIGNAL_TOKEN => {
                    for signal in signals.pending() {
                        tracing::info!(signal, "received shutdown signal");
                        return Ok(());
                    }
                }
                token => {
                    if let Some(conn) = connections.get_mut(&token) {
                        if !conn.read_ready()? {
                            connections.remove(&token);
                            continue;
                        }
                        for message in conn.drain_messages()? {
                            if let Err(e) = runtime.accept_inbound(&message) {
                                tracing::warn!(error = %e, "rejecting message, resyncing peer");
                                connections.remove(&token);
                                break;
                            }
                        }
                        conn.write_ready()?;
                    }
                }
            }
        }
    }
}

fn accept_loop(
    listener: &TcpListener,
    poll: &Poll,
    connections: &mut HashMap<Token, Connection>,
    next_token: &mut usize,
) -> io::Result<()> {
    loop {
        match listener.accept() {
            Ok((mut stream, addr)) => {
                let token = Token(*next_token);
                *next_token += 1;
                poll.registry().register(&mut stream, token, Interest::READABLE)?;
                tracing::info!(%addr, "node director connected");
                // The peer's identity is established by its first RegSu;
                // NodeId::new(0) is a placeholder until then.
                connections.insert(token, Connection::new(token, NodeId::new(0), stream));
            }
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(()),
            Err(e) => return Err(e),
        }
    }
}

fn send_to_peer(
    connections: &mut HashMap<Token, Connection>,
    message: &amf_protocol::Message,
) -> anyhow::Result<()> {
    for conn in connections.values_mut() {
        if conn.peer == message.to {
            conn.queue(message)?;
            conn.write_ready()?;
            return Ok(());
        }
    }
    tracing::warn!(to = ?message.to, "no live connection for peer, dropping resend");
    Ok(())
}
