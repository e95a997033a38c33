//! Server layer - HTTP transfer endpoint
//!
//! Inbound adapter: phones upload photos here and the paste use case puts
//! them on the clipboard.

pub mod response;
pub mod routes;
pub mod upload;

use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub use response::{ApiResponse, PingResponse, SUCCESS_MESSAGE};
pub use routes::{routes, SharedPaste};
pub use upload::{payload_from_body, payload_from_form, UploadError, IMAGE_FIELD};

/// Server startup errors
#[derive(Debug, thiserror::Error)]
#[error("Cannot listen on {addr}: {message}")]
pub struct BindError {
    pub addr: SocketAddr,
    pub message: String,
}

/// Bind and serve until `shutdown` resolves.
///
/// Binding happens before this returns the serving future, so a port
/// already in use is reported immediately.
pub fn serve(
    paste: SharedPaste,
    max_upload: u64,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(SocketAddr, impl Future<Output = ()>), BindError> {
    warp::serve(routes(paste, max_upload))
        .try_bind_with_graceful_shutdown(addr, shutdown)
        .map_err(|e| BindError {
            addr,
            message: e.to_string(),
        })
}

/// URL a phone should open
pub fn server_url(ip: Ipv4Addr, port: u16) -> String {
    format!("http://{}:{}/", ip, port)
}

/// Socket address for the listener
pub fn listen_addr(bind: IpAddr, port: u16) -> SocketAddr {
    SocketAddr::new(bind, port)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{ClipboardStrategy, Notifier, SilentNotifier, StrategyError};
    use crate::application::{ClipboardCommitter, PasteImageUseCase, StrategyChain};
    use crate::domain::image::{ClipboardFormat, NormalizedImage};
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    static LOCK: Mutex<()> = Mutex::const_new(());

    struct Discard;

    #[async_trait]
    impl ClipboardStrategy for Discard {
        fn name(&self) -> &'static str {
            "discard"
        }

        fn format(&self) -> ClipboardFormat {
            ClipboardFormat::Png
        }

        async fn commit(&self, _image: &NormalizedImage) -> Result<(), StrategyError> {
            Ok(())
        }
    }

    fn paste() -> SharedPaste {
        let committer =
            ClipboardCommitter::with_lock(StrategyChain::starting_with(Discard), &LOCK);
        let notifier: Box<dyn Notifier> = Box::new(SilentNotifier);
        Arc::new(PasteImageUseCase::new(committer, notifier, false))
    }

    #[test]
    fn url_format() {
        assert_eq!(
            server_url(Ipv4Addr::new(192, 168, 1, 23), 8080),
            "http://192.168.1.23:8080/"
        );
    }

    #[test]
    fn listen_on_all_interfaces() {
        let addr = listen_addr(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 9000);
        assert_eq!(addr.to_string(), "0.0.0.0:9000");
    }

    #[tokio::test]
    async fn serves_until_shutdown() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let (addr, server) = serve(
            paste(),
            1024,
            listen_addr(IpAddr::V4(Ipv4Addr::LOCALHOST), 0),
            async move {
                let _ = rx.await;
            },
        )
        .unwrap();

        assert_ne!(addr.port(), 0);
        let handle = tokio::spawn(server);
        tx.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn port_in_use_is_reported() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let taken = listener.local_addr().unwrap();

        let err = serve(paste(), 1024, taken, async {}).err().unwrap();
        assert_eq!(err.addr, taken);
    }
}
