use clap::Parser;
use formscout::cli::commands::{
    ScanOptions, cmd_classify, cmd_generate, cmd_locate, cmd_record, cmd_scan, cmd_selector, cmd_watch,
};
use formscout::cli::config::{Cli, Commands, load_config};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Scan {
            page,
            layout,
            hide_non_form,
            drop_hidden,
            message,
            store,
            output,
        } => {
            let opts = ScanOptions {
                layout: layout.as_deref(),
                hide_non_form,
                drop_hidden,
                message,
                store: store.as_deref(),
                output: output.as_deref(),
            };
            cmd_scan(&page, &opts, &config)?;
        }
        Commands::Selector {
            page,
            target,
            within,
            iframe,
            copy,
        } => {
            let resolved = cmd_selector(&page, &target, within.as_deref(), iframe, copy, &config)?;
            if !resolved.is_found() {
                std::process::exit(1);
            }
        }
        Commands::Classify { page, target, iframe } => {
            cmd_classify(&page, &target, iframe, &config)?;
        }
        Commands::Generate { task, output } => {
            cmd_generate(&task, output.as_deref(), &config)?;
        }
        Commands::Locate {
            page,
            selector,
            parent,
            iframe,
            timeout_ms,
        } => {
            let found = cmd_locate(&page, &selector, parent.as_deref(), iframe, timeout_ms, &config)?;
            if found.is_none() {
                std::process::exit(1);
            }
        }
        Commands::Record {
            file,
            events,
            page_url,
            store,
            output,
        } => {
            cmd_record(&file, &events, &page_url, store.as_deref(), output.as_deref(), &config)?;
        }
        Commands::Watch {
            file,
            trace,
            store,
            max_passes,
        } => {
            cmd_watch(&file, &trace, store.as_deref(), max_passes, &config)?;
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `-v` raises the level from warn.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("formscout={level}")));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
