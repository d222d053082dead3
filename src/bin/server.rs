use std::{
    fs::{self, OpenOptions},
    net::SocketAddr,
    path::PathBuf,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use money_manager::{
    AppState, Clock, TokenVerifier, build_router, graceful_shutdown, logging_middleware,
};

/// The REST API server for money_manager.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "DB_PATH")]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// The shared secret for verifying HS256 signed bearer tokens.
    #[arg(long, env = "JWT_SECRET", conflicts_with = "jwt_public_key_path")]
    jwt_secret: Option<String>,

    /// File path to a PEM encoded RSA public key for verifying RS256 signed
    /// bearer tokens.
    #[arg(long, env = "JWT_PUBLIC_KEY_PATH")]
    jwt_public_key_path: Option<PathBuf>,

    /// The required `iss` claim of bearer tokens.
    #[arg(long, env = "TOKEN_ISSUER")]
    token_issuer: Option<String>,

    /// The required `aud` claim of bearer tokens.
    #[arg(long, env = "TOKEN_AUDIENCE")]
    token_audience: Option<String>,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));

    let token_verifier = build_token_verifier(&args);

    let conn = Connection::open(&args.db_path).expect("Could not open the database.");
    let state = AppState::new(conn, token_verifier, Clock::system())
        .expect("Could not initialise the database.");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("The server stopped unexpectedly.");
}

fn build_token_verifier(args: &Args) -> TokenVerifier {
    let issuer = args.token_issuer.as_deref();
    let audience = args.token_audience.as_deref();

    match (&args.jwt_secret, &args.jwt_public_key_path) {
        (Some(secret), _) => TokenVerifier::from_secret(secret.as_bytes(), issuer, audience),
        (None, Some(path)) => {
            let pem = fs::read(path).expect("Could not read the JWT public key.");
            TokenVerifier::from_rsa_pem(&pem, issuer, audience)
                .expect("The JWT public key is not a valid RSA public key.")
        }
        (None, None) => {
            panic!("Either JWT_SECRET or JWT_PUBLIC_KEY_PATH must be set.")
        }
    }
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(filter::LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
