use std::io::Write;

use threadgrab_core::BatchSummary;
use threadgrab_engine::Engine;

use crate::cli::Cli;
use crate::error::AppError;
use crate::report::ConsoleReporter;

pub fn run(cli: &Cli) -> Result<BatchSummary, AppError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(AppError::Runtime)?;

    let reporter = ConsoleReporter::stdout();
    runtime.block_on(async {
        let engine = Engine::new(cli.engine_config())?;
        execute(&engine, &cli.thread_url, &reporter).await
    })
}

pub async fn execute<W: Write + Send>(
    engine: &Engine,
    thread_url: &str,
    reporter: &ConsoleReporter<W>,
) -> Result<BatchSummary, AppError> {
    let plan = engine.prepare(thread_url).await?;
    reporter.line(&format!(
        "Downloading {} images to {}",
        plan.descriptors.len(),
        plan.output_dir.display()
    ));

    let summary = engine.download(plan, reporter).await?;
    reporter.line("Done");
    Ok(summary)
}
