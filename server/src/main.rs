use std::{env, path::PathBuf, sync::Arc};

use anyhow::Result;
use axum::{routing::post, Router, Server};
use clap::Parser;
use kinship_core::RuleStore;
use kinship_server::{post_infer, AppState};
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(
        short = 'c',
        long,
        default_value = "core/data/relationship_table.csv",
        value_parser
    )]
    csv: PathBuf,
    #[clap(short = 'a', long, default_value = "0.0.0.0:3000", value_parser)]
    addr: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env::set_var("RUST_BACKTRACE", "1");
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let rules = RuleStore::load_csv(&args.csv)?;
    let state = Arc::new(AppState { rules });

    let governor_conf = Box::leak(Box::new(
        GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(10)
            .finish()
            .expect("invalid rate limit configuration"),
    ));

    let app = Router::new()
        .route("/api/infer", post(post_infer))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive())
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    tracing::info!("kinship server listening on {}", args.addr);
    Server::bind(&args.addr.parse()?)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
