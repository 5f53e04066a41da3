//! The node-director daemon: connects to the active director, applies
//! `InfoSuSiAssign`/`Reboot` directives via `NodeDirectorRuntime`, and
//! acks/replies over the same `mio` poll loop.

use std::time::Instant;

use mio::net::TcpStream;
use mio::{Events, Interest, Poll, Token};

use amf::connection::Connection;
use amf::node_director::NodeDirectorRuntime;
use amf_config::ConfigLoader;
use amf_types::NodeId;

const DIRECTOR_TOKEN: Token = Token(0);
#[cfg(unix)]
const SIGNAL_TOKEN: Token = Token(1);

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let config = ConfigLoader::new().load_or_default();

    let director_addr = config.cluster.director_address.parse()?;
    let self_id = NodeId::new(config.node.node_id);
    let director_id = NodeId::new(0);

    let stream = TcpStream::connect(director_addr)?;
    let mut poll = Poll::new()?;
    let mut conn = Connection::new(DIRECTOR_TOKEN, director_id, stream);
    poll.registry().register(&mut conn.stream, DIRECTOR_TOKEN, conn.interest())?;

    #[cfg(unix)]
    let mut signals = {
        let mut signals = signal_hook_mio::v1_0::Signals::new([
            signal_hook::consts::SIGTERM,
            signal_hook::consts::SIGINT,
        ])?;
        poll.registry().register(&mut signals, SIGNAL_TOKEN, Interest::READABLE)?;
        signals
    };

    let mut runtime = NodeDirectorRuntime::new(self_id, director_id);
    let mut events = Events::with_capacity(256);
    tracing::info!(%director_addr, "node director connected, entering event loop");

    loop {
        poll.poll(&mut events, None)?;
        for event in &events {
            match event.token() {
                DIRECTOR_TOKEN => {
                    if event.is_readable() {
                        if !conn.read_ready()? {
                            tracing::error!("director connection closed");
                            return Ok(());
                        }
                        for message in conn.drain_messages()? {
                            for reply in runtime.handle(&message, Instant::now())? {
                                conn.queue(&reply)?;
                            }
                        }
                    }
                    if event.is_writable() {
                        conn.write_ready()?;
                    }
                    poll.registry().reregister(&mut conn.stream, DIRECTOR_TOKEN, conn.interest())?;
                }
                #[cfg(unix)]
                SIGNAL_TOKEN => {
                    for signal in signals.pending() {
                        tracing::info!(signal, "received shutdown signal");
                        return Ok(());
                    }
                }
                _ => {}
            }
        }
    }
}

