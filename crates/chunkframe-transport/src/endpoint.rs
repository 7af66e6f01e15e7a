use std::fmt;
use std::fs::File;
use std::net::{TcpStream, ToSocketAddrs};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::stream::ByteStream;

/// Where a stream session reads its bytes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// TCP client connection to `host:port`.
    Tcp(String),
    /// Unix domain socket client connection.
    Unix(PathBuf),
    /// Filesystem path: device node, FIFO or capture file.
    Path(PathBuf),
    /// Standard input.
    Stdin,
}

impl Endpoint {
    /// Open the endpoint (blocking).
    ///
    /// `connect_timeout` bounds TCP connection setup only.
    pub fn open(&self, connect_timeout: Option<Duration>) -> Result<ByteStream> {
        match self {
            Endpoint::Tcp(addr) => connect_tcp(addr, connect_timeout),
            Endpoint::Unix(path) => connect_unix(path),
            Endpoint::Path(path) => {
                let file = File::open(path).map_err(|source| TransportError::Open {
                    path: path.clone(),
                    source,
                })?;
                info!(?path, "opened byte source");
                Ok(ByteStream::from_file(file, path.display().to_string()))
            }
            Endpoint::Stdin => {
                debug!("reading from stdin");
                Ok(ByteStream::stdin())
            }
        }
    }
}

fn connect_tcp(addr: &str, timeout: Option<Duration>) -> Result<ByteStream> {
    let connect_err = |source: std::io::Error| TransportError::Connect {
        addr: addr.to_string(),
        source,
    };

    let stream = match timeout {
        None => TcpStream::connect(addr).map_err(connect_err)?,
        Some(timeout) => {
            let mut last_err = None;
            let mut connected = None;
            for candidate in addr.to_socket_addrs().map_err(connect_err)? {
                match TcpStream::connect_timeout(&candidate, timeout) {
                    Ok(stream) => {
                        connected = Some(stream);
                        break;
                    }
                    Err(err) => {
                        debug!(%candidate, error = %err, "connect attempt failed");
                        last_err = Some(err);
                    }
                }
            }
            match connected {
                Some(stream) => stream,
                None => {
                    return Err(connect_err(last_err.unwrap_or_else(|| {
                        std::io::Error::new(
                            std::io::ErrorKind::NotFound,
                            "address resolved to no socket addresses",
                        )
                    })))
                }
            }
        }
    };

    info!(addr, "connected to tcp endpoint");
    Ok(ByteStream::from_tcp(stream, format!("tcp://{addr}")))
}

#[cfg(unix)]
fn connect_unix(path: &std::path::Path) -> Result<ByteStream> {
    let stream =
        std::os::unix::net::UnixStream::connect(path).map_err(|source| TransportError::Connect {
            addr: path.display().to_string(),
            source,
        })?;
    info!(?path, "connected to unix domain socket");
    Ok(ByteStream::from_unix(stream, format!("unix://{}", path.display())))
}

#[cfg(not(unix))]
fn connect_unix(path: &std::path::Path) -> Result<ByteStream> {
    Err(TransportError::InvalidEndpoint {
        input: format!("unix://{}", path.display()),
        reason: "unix domain sockets are not supported on this platform".to_string(),
    })
}

impl FromStr for Endpoint {
    type Err = TransportError;

    fn from_str(input: &str) -> Result<Self> {
        let invalid = |reason: &str| TransportError::InvalidEndpoint {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let input_trimmed = input.trim();
        if input_trimmed.is_empty() {
            return Err(invalid("endpoint must not be empty"));
        }
        if input_trimmed == "-" {
            return Ok(Endpoint::Stdin);
        }
        if let Some(addr) = input_trimmed.strip_prefix("tcp://") {
            return if is_host_port(addr) {
                Ok(Endpoint::Tcp(addr.to_string()))
            } else {
                Err(invalid("expected tcp://host:port"))
            };
        }
        if let Some(path) = input_trimmed.strip_prefix("unix://") {
            if path.is_empty() {
                return Err(invalid("expected unix:///path/to/socket"));
            }
            return Ok(Endpoint::Unix(PathBuf::from(path)));
        }
        if let Some(path) = input_trimmed.strip_prefix("file://") {
            return Ok(Endpoint::Path(PathBuf::from(path)));
        }
        if !input_trimmed.contains('/') && is_host_port(input_trimmed) {
            return Ok(Endpoint::Tcp(input_trimmed.to_string()));
        }
        Ok(Endpoint::Path(PathBuf::from(input_trimmed)))
    }
}

fn is_host_port(addr: &str) -> bool {
    match addr.rsplit_once(':') {
        Some((host, port)) => !host.is_empty() && port.parse::<u16>().is_ok(),
        None => false,
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Tcp(addr) => write!(f, "tcp://{addr}"),
            Endpoint::Unix(path) => write!(f, "unix://{}", path.display()),
            Endpoint::Path(path) => write!(f, "{}", path.display()),
            Endpoint::Stdin => write!(f, "-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};

    use super::*;

    fn unique_temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "chunkframe-transport-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn parses_endpoint_forms() {
        assert_eq!(
            "tcp://192.168.10.10:20301".parse::<Endpoint>().unwrap(),
            Endpoint::Tcp("192.168.10.10:20301".to_string())
        );
        assert_eq!(
            "localhost:9000".parse::<Endpoint>().unwrap(),
            Endpoint::Tcp("localhost:9000".to_string())
        );
        assert_eq!(
            "unix:///tmp/dev.sock".parse::<Endpoint>().unwrap(),
            Endpoint::Unix(PathBuf::from("/tmp/dev.sock"))
        );
        assert_eq!(
            "/dev/usb_uart0".parse::<Endpoint>().unwrap(),
            Endpoint::Path(PathBuf::from("/dev/usb_uart0"))
        );
        assert_eq!(
            "capture.bin".parse::<Endpoint>().unwrap(),
            Endpoint::Path(PathBuf::from("capture.bin"))
        );
        assert_eq!("-".parse::<Endpoint>().unwrap(), Endpoint::Stdin);
    }

    #[test]
    fn rejects_malformed_endpoints() {
        assert!(matches!(
            "".parse::<Endpoint>(),
            Err(TransportError::InvalidEndpoint { .. })
        ));
        assert!(matches!(
            "tcp://no-port".parse::<Endpoint>(),
            Err(TransportError::InvalidEndpoint { .. })
        ));
        assert!(matches!(
            "unix://".parse::<Endpoint>(),
            Err(TransportError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for input in ["tcp://127.0.0.1:80", "unix:///run/x.sock", "/dev/ttyS0", "-"] {
            let endpoint: Endpoint = input.parse().unwrap();
            assert_eq!(endpoint.to_string(), input);
        }
    }

    #[test]
    fn reads_from_tcp_endpoint() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = std::thread::spawn(move || {
            let (mut conn, _) = listener.accept().unwrap();
            conn.write_all(b"hello").unwrap();
        });

        let endpoint = Endpoint::Tcp(addr.to_string());
        let mut stream = endpoint.open(Some(Duration::from_secs(2))).unwrap();
        assert!(stream.is_socket());
        stream
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();

        server.join().unwrap();
        let mut received = Vec::new();
        stream.read_to_end(&mut received).unwrap();
        assert_eq!(received, b"hello");
    }

    #[test]
    fn tcp_connect_failure_is_reported() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = Endpoint::Tcp(addr.to_string()).open(None).unwrap_err();
        assert!(matches!(err, TransportError::Connect { .. }));
    }

    #[test]
    fn reads_from_file_endpoint() {
        let dir = unique_temp_dir("file");
        let path = dir.join("capture.bin");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let mut stream = Endpoint::Path(path.clone()).open(None).unwrap();
        assert!(!stream.is_socket());
        assert!(stream.set_read_timeout(Some(Duration::from_millis(5))).is_ok());
        assert_eq!(stream.describe(), path.display().to_string());

        let mut received = Vec::new();
        stream.read_to_end(&mut received).unwrap();
        assert_eq!(received, vec![1, 2, 3]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_open_error() {
        let dir = unique_temp_dir("missing");
        let err = Endpoint::Path(dir.join("absent"))
            .open(None)
            .unwrap_err();
        assert!(matches!(err, TransportError::Open { .. }));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    #[cfg(unix)]
    fn reads_from_unix_endpoint() {
        let dir = unique_temp_dir("uds");
        let sock_path = dir.join("dev.sock");
        let listener = std::os::unix::net::UnixListener::bind(&sock_path).unwrap();

        let server = std::thread::spawn(move || {
            let (mut conn, _) = listener.accept().unwrap();
            conn.write_all(b"uds").unwrap();
        });

        let mut stream = Endpoint::Unix(sock_path).open(None).unwrap();
        server.join().unwrap();

        let mut received = Vec::new();
        stream.read_to_end(&mut received).unwrap();
        assert_eq!(received, b"uds");
        assert!(format!("{stream:?}").contains("unix"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
