mod command;
mod render;

use anyhow::Context;
use colored::Colorize;
use search_pipeline::{PipelineConfig, ReviewForm, SearchPipeline};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt};

use crate::{
    command::Input,
    render::{Frame, ToastNotifier},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            return Err(err).context("failed to load .env");
        }
    }

    // Logs go to stderr so they do not interleave with the rendered grid.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cfg = PipelineConfig::from_env().context("invalid pipeline configuration")?;
    let mut pipeline = SearchPipeline::from_config(&cfg, ToastNotifier)?;
    let handle = pipeline.start()?;
    tracing::debug!(proxy = %cfg.proxy_url, changes = %cfg.changes_url, "pipeline started");

    println!("{}", "Movie Database".bold());
    println!(
        "{}",
        "Type to search. Commands: :open <id>, :close, :review <text>, :quit".dimmed()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut view_rx = handle.watch();
    let mut review = ReviewForm::new();
    let mut last_frame: Option<Frame> = None;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Input::parse(&line) {
                    Input::Query(query) => handle.set_query(query)?,
                    Input::Open(id) => handle.select(id)?,
                    Input::Close => handle.close_detail()?,
                    Input::Review(text) => {
                        if handle.view().detail_open {
                            review.set_text(text);
                            review.submit(&ToastNotifier);
                        } else {
                            println!("{}", "Open a movie first with :open <id>.".dimmed());
                        }
                    }
                    Input::Quit => break,
                    Input::Invalid(reason) => println!("{}", reason.red()),
                }
            }
            changed = view_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let frame = Frame::from_view(&view_rx.borrow_and_update());
                if last_frame.as_ref() != Some(&frame) {
                    print!("{frame}");
                    last_frame = Some(frame);
                }
            }
        }
    }

    handle.shutdown().await?;
    Ok(())
}
