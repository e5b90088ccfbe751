use clap::Parser;

/// Pick a project and add its properties from the listings API
#[derive(Debug, Default, Parser)]
#[command(name = "property_picker", version)]
pub struct Args {
    /// Base URL of the listings API (overrides PROPERTY_PICKER_API_BASE_URL)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Where to write logs (overrides PROPERTY_PICKER_LOG_FILE)
    #[arg(long)]
    pub log_file: Option<String>,

    /// Request timeout in seconds (overrides PROPERTY_PICKER_REQUEST_TIMEOUT_SECS)
    #[arg(long)]
    pub timeout: Option<u64>,
}
