//! TCP server for the request/response service.
//!
//! Accepts connections, applies the per-source admission check, and runs
//! one task per connection: verify the signature, then repeatedly read a
//! frame, dispatch it, and write the reply until the client disconnects.

use crate::config::Config;
use crate::dispatch::dispatch;
use crate::frame::{self, FrameError};
use crate::limiter::RateLimiter;
use crate::quiz::{QuestionBank, QuizSession};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

/// Server instance
pub struct Server {
    listener: TcpListener,
    bank: Arc<QuestionBank>,
    limiter: Arc<RateLimiter>,
}

impl Server {
    /// Bind the listen address and prepare the shared state
    pub async fn bind(config: &Config) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind(&config.listen).await?;
        info!(address = %config.listen, "Server listening");

        Ok(Server {
            listener,
            bank: Arc::new(QuestionBank::with_defaults()),
            limiter: Arc::new(RateLimiter::new(config.max_conns_per_source)),
        })
    }

    /// Address the server actually bound (relevant with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// Accept connections until the process exits
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    if !self.limiter.admit(addr.ip()) {
                        warn!(peer = %addr, "Connection refused by admission limit");
                        drop(stream);
                        continue;
                    }

                    debug!(peer = %addr, "New connection");
                    let bank = Arc::clone(&self.bank);

                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, addr, bank).await {
                            warn!(peer = %addr, error = %e, "Connection error");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }
}

/// Handle a single client connection
async fn handle_connection(
    mut stream: TcpStream,
    addr: SocketAddr,
    bank: Arc<QuestionBank>,
) -> Result<(), FrameError> {
    match frame::read_magic(&mut stream).await {
        Ok(()) => {}
        Err(FrameError::BadMagic(header)) => {
            warn!(peer = %addr, header = %hex(&header), "Received invalid magic header");
            return Ok(());
        }
        Err(e) => return Err(e),
    }

    let mut session = QuizSession::new();

    loop {
        let payload = match frame::read_request(&mut stream).await? {
            Some(payload) => payload,
            None => {
                debug!(peer = %addr, "Connection closed by client");
                return Ok(());
            }
        };

        debug!(peer = %addr, request = %payload, "Request received");
        let reply = dispatch(&payload, &mut session, &bank);
        debug!(peer = %addr, response = %reply, "Sending response");

        frame::write_reply(&mut stream, &reply).await?;
    }
}

/// Render bytes as contiguous uppercase hex for diagnostics
fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}
