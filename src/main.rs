use anyhow::{bail, Result};
use std::path::PathBuf;
use std::sync::Arc;
use visitmap::{
    init_tracing_once, Authenticator, ClientCredentials, ExportFormat, ExportOptions, Exporter, HttpTransport,
    OAuthAuthenticator, TerminalProgress, TimeWindow,
};

const DEFAULT_YEARS_BACK: u32 = 10;

fn env(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn main() -> Result<()> {
    init_tracing_once();

    let opts = ExportOptions::default()
        .with_window(TimeWindow::last_years(DEFAULT_YEARS_BACK))
        .from_env();

    let token = match env("VISITMAP_TOKEN") {
        Some(t) => t,
        None => obtain_token(&opts)?,
    };

    let out_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("export-{}.kml", opts.window)));
    let format = ExportFormat::from_path(&out_path);

    let show_progress = opts.progress;
    let exporter = Exporter::with_http(opts);
    let stats = if show_progress {
        let mut bars = TerminalProgress::new();
        let stats = {
            let mut cb = bars.callback();
            exporter.run_to_file(&token, &out_path, format, Some(&mut cb))?
        };
        bars.finish();
        stats
    } else {
        exporter.run_to_file(&token, &out_path, format, None)?
    };

    println!(
        "Exported {} venues ({} unknown-category) to {}; {} check-ins matched, {} unmatched across {} venue ids",
        stats.venues_exported,
        stats.unknown_category_venues,
        out_path.display(),
        stats.checkins_matched_to_venues,
        stats.checkins_unmatched_to_venues,
        stats.unmatched_venue_ids,
    );
    Ok(())
}

/// Without a stored token: print the consent URL, or exchange VISITMAP_CODE if given.
fn obtain_token(opts: &ExportOptions) -> Result<String> {
    let (Some(client_id), Some(client_secret), Some(redirect_uri)) = (
        env("VISITMAP_CLIENT_ID"),
        env("VISITMAP_CLIENT_SECRET"),
        env("VISITMAP_REDIRECT_URL"),
    ) else {
        bail!("set VISITMAP_TOKEN, or VISITMAP_CLIENT_ID / VISITMAP_CLIENT_SECRET / VISITMAP_REDIRECT_URL");
    };

    let auth = OAuthAuthenticator::new(
        Arc::new(HttpTransport::new(opts.request_timeout)),
        opts.oauth_base.clone(),
        ClientCredentials { client_id, client_secret, redirect_uri },
    );
    let Some(code) = env("VISITMAP_CODE") else {
        println!("Open this URL, approve access, then rerun with VISITMAP_CODE set:");
        println!("{}", auth.authorize_url());
        bail!("no authorization code yet");
    };
    Ok(auth.access_token(&code)?)
}
