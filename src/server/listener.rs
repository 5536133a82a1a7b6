//! Listener setup
//!
//! TCP listeners with `SO_REUSEPORT`/`SO_REUSEADDR` so a replacement process
//! can bind the same address before the old one lets go.

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

const ACCEPT_BACKLOG: i32 = 128;

/// Binds `addr` with port/address reuse enabled and returns a non-blocking
/// tokio listener.
pub fn create_reusable_listener(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_port(true)?;
    socket.set_reuse_address(true)?;
    // Tokio requires the socket to already be non-blocking.
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(ACCEPT_BACKLOG)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
