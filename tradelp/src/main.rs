use clap::Parser as _;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};
use tradelp::BaseArgs;

pub fn main() -> anyhow::Result<()> {
    // Library events go to stderr, filtered by RUST_LOG; stdout is reserved for output
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = BaseArgs::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_time()
        .build()?;
    let result = runtime.block_on(args.evaluate());

    // A solve that timed out is still running on the blocking pool; do not wait for it
    runtime.shutdown_background();
    result
}
