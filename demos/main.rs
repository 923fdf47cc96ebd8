//! Connects to a Bolt server, runs one query, and prints the result row.
//!
//! Mirrors the original driver's `cmd/driver` example: handshake, HELLO,
//! RUN "RETURN 42", print the record, close.

use clap::Parser;

use boltlite::{AccessMode, Session};

#[derive(Parser)]
struct Args {
    /// Bolt URI, e.g. bolt://localhost or bolt://localhost:7687
    #[arg(long, default_value = "bolt://localhost")]
    uri: String,

    #[arg(long, default_value = "neo4j")]
    username: String,

    #[arg(long, default_value = "")]
    password: String,

    /// Query to run in auto-commit mode.
    #[arg(long, default_value = "RETURN 42")]
    query: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mut session = Session::connect(&args.uri).await.expect("connect failed");
    session.handshake().await.expect("handshake failed");
    session
        .hello(&args.username, &args.password)
        .await
        .expect("hello failed");

    let record = session
        .run(&args.query, AccessMode::Read)
        .await
        .expect("run failed");
    println!("{:?}", record.fields);

    session.close().await.expect("close failed");
}
