use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use yardcraft::cli::Args;
use yardcraft::config::Config;
use yardcraft::pipeline::{DesignState, Pipeline, PipelineSettings};
use yardcraft::prompt::compose;
use yardcraft::provider::make_services;
use yardcraft::{ux, ReferenceImage, ReferenceSlot};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut cfg = Config::load(args.config.as_deref())?;
    if let Some(url) = &args.base_url {
        cfg.service.base_url = url.clone();
    }
    if let Some(mode) = args.top_view_mode {
        cfg.top_view.mode = mode;
    }
    if let Some(secs) = args.timeout_secs {
        cfg.service.timeout_secs = secs;
    }

    let selection = args.apply_features(cfg.features.clone());

    // Validation happens here, before anything touches the network.
    let mut reference = ReferenceSlot::new();
    if let Some(path) = &args.reference {
        reference.set(ReferenceImage::from_path(path, cfg.reference.max_bytes)?);
    }

    ux::show_selection(&selection, reference.get());
    if args.print_prompt {
        ux::show_prompt(&compose(&selection, reference.get().is_some()));
        return Ok(());
    }

    let pipeline = Pipeline::new(make_services(&cfg)?, PipelineSettings::from(&cfg));
    info!(session = %pipeline.session_id(), base_url = %cfg.service.base_url, "session started");

    let design = ux::with_spinner(
        "Generating your custom design...",
        pipeline.run_design(&selection, reference.get()),
    )
    .await?;
    ux::print_design(&design);
    if !design_ready(&design)? {
        return Ok(());
    }

    let want_breakdown = args.breakdown
        || args.auto_approve
        || ux::confirm("Generate cost breakdown, plants & strategy?");
    let want_top_view = args.top_view
        || args.auto_approve
        || ux::confirm("Generate top-down detailed plan (with labels)?");

    let breakdown = async {
        if want_breakdown {
            if let Err(e) = pipeline.run_breakdown().await {
                error!("breakdown not started: {e}");
            }
        }
    };
    let top_view = async {
        if want_top_view {
            if let Err(e) = pipeline.run_top_view().await {
                error!("top-view plan not started: {e}");
            }
        }
    };
    if want_breakdown || want_top_view {
        ux::with_spinner("Analyzing design and creating plan view...", async {
            tokio::join!(breakdown, top_view)
        })
        .await;
    }

    ux::print_dashboard(&pipeline.snapshot());
    Ok(())
}

/// A failed design ends the run with a non-zero exit.
fn design_ready(design: &DesignState) -> anyhow::Result<bool> {
    if let Some(reason) = design.error() {
        anyhow::bail!("design stage failed: {reason}");
    }
    Ok(design.artifact().is_some())
}
