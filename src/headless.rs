use crate::app::HeicConverterApp;
use crate::cli::Cli;
use crate::config::AppConfig;
use crate::state::CancelFlag;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

/// Runs one batch in the terminal and blocks until it completes.
pub fn run(cli: &Cli) -> Result<()> {
    let cancel = install_ctrlc_handler()?;

    let mut app = HeicConverterApp::new(AppConfig::from_cli(cli));
    let run_id = app.start_conversion()?;

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .context("invalid progress template")?
            .progress_chars("=> "),
    );
    bar.set_message(app.status_text());

    let mut printed = 0;
    loop {
        if cancel.is_cancelled() && !app.state.cancel_requested() {
            app.stop_conversion();
        }

        let next_poll = app.update_status();

        for line in app.relay.log().since(printed) {
            bar.println(line.render());
        }
        printed = app.relay.log().next_seq();
        bar.set_position(app.relay.progress().round() as u64);
        bar.set_message(app.status_text());

        match next_poll {
            Some(wait) => std::thread::sleep(wait),
            None => break,
        }
    }
    bar.finish_with_message(app.status_text());

    if cli.json {
        let summary = serde_json::json!({
            "input_directory": app.input_dir,
            "output_directory": app.output_dir,
            "quality": app.quality,
            "summary": app.last_summary,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    if cli.open {
        app.open_output_dir();
        if let Some(error) = &app.error {
            tracing::warn!("Run {}: {}", run_id, error);
        }
    }

    Ok(())
}

/// Ctrl-C only raises a flag; the poll loop forwards it to the running batch.
fn install_ctrlc_handler() -> Result<CancelFlag> {
    let flag = CancelFlag::new();
    let handler_flag = flag.clone();
    ctrlc::set_handler(move || handler_flag.cancel()).context("Failed to install Ctrl-C handler")?;
    Ok(flag)
}
