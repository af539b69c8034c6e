use anyhow::Context;
use clap::Parser;
use rustls_pemfile::certs;
use sparkfuse_server::client::{InputQueue, InputSender, format_incoming};
use std::io::{BufRead, Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};

#[derive(Debug, Parser)]
#[command(name = "sparkfuse-client", version, about = "Line client for a sparkfuse server")]
struct Args {
    /// Server address
    #[arg(long, default_value = "127.0.0.1:4000")]
    addr: String,

    /// Connect over TLS (requires --ca)
    #[arg(long, requires = "ca")]
    tls: bool,

    /// Name the server certificate is checked against
    #[arg(long, default_value = "localhost")]
    domain: String,

    /// PEM file with the CA (or self-signed server) certificate to trust
    #[arg(long)]
    ca: Option<PathBuf>,

    /// Prefix incoming lines with the local time
    #[arg(long)]
    timestamps: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let stream = TcpStream::connect(&args.addr)
        .await
        .with_context(|| format!("connecting to {}", args.addr))?;

    let (tx, queue) = InputQueue::new();
    spawn_stdin_reader(tx);

    match &args.ca {
        Some(ca) if args.tls => {
            let connector = tls_connector(ca)?;
            let domain = ServerName::try_from(args.domain.clone())?;
            let stream = connector.connect(domain, stream).await?;
            run(stream, queue, args.timestamps).await
        }
        _ => run(stream, queue, args.timestamps).await,
    }
}

fn tls_connector(ca: &Path) -> anyhow::Result<TlsConnector> {
    let pem = std::fs::read(ca).with_context(|| format!("reading {}", ca.display()))?;

    let mut roots = RootCertStore::empty();
    for cert in certs(&mut Cursor::new(pem)) {
        roots.add(cert?)?;
    }

    let config = ClientConfig::builder().with_root_certificates(roots).with_no_client_auth();
    Ok(TlsConnector::from(Arc::new(config)))
}

// stdin blocks, so it gets a plain thread of its own
fn spawn_stdin_reader(tx: InputSender) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if !tx.put(line) {
                break;
            }
        }
    });
}

async fn run<S>(stream: S, mut queue: InputQueue, timestamps: bool) -> anyhow::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let (r, mut w) = tokio::io::split(stream);
    let mut lines = BufReader::new(r).lines();

    let receive = async {
        while let Some(line) = lines.next_line().await? {
            print!("\r{}\n> ", format_incoming(&line, timestamps));
            std::io::stdout().flush()?;
        }
        println!("\rConnection closed by server.");
        anyhow::Ok(())
    };

    let send = async {
        while let Some(line) = queue.take().await {
            w.write_all(line.as_bytes()).await?;
            w.write_all(b"\n").await?;
            w.flush().await?;
        }
        anyhow::Ok(())
    };

    tokio::select! {
        res = receive => res,
        res = send => res,
    }
}
