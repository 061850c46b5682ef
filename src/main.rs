use clap::Parser;
use recommendlet_client::{
    build_url, dispatch, Config, Container, Endpoint, RecommendletParams, RenderMode,
    WriterContainer,
};
use std::{
    process::ExitCode,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "recommendlet", version, about = "Fetch a recommendlet snippet")]
struct Cli {
    /// External user id.
    #[arg(long = "user")]
    external_user_id: String,

    /// External item id.
    #[arg(long = "item")]
    external_item_id: Option<String>,

    /// Rating the user gives the item.
    #[arg(long)]
    rating: Option<f64>,

    /// Ask for the JSON snippet.
    #[arg(long)]
    json: bool,

    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,

    #[arg(long)]
    reg_name: Option<String>,

    #[arg(long)]
    max_recommend: Option<u32>,

    /// Print the request url and exit.
    #[arg(long)]
    url_only: bool,

    /// Remove markup from the snippet before printing.
    #[arg(long)]
    strip_tags: bool,
}

impl Cli {
    fn params(&self, config: Config) -> RecommendletParams {
        let mut params = RecommendletParams::new(
            self.host.clone().unwrap_or(config.host),
            self.port.unwrap_or(config.port),
            self.reg_name.clone().unwrap_or(config.reg_name),
            self.external_user_id.clone(),
        )
        .with_max_recommend(self.max_recommend.unwrap_or(config.max_recommend));
        params.external_item_id = self.external_item_id.clone();
        params.rating = self.rating;
        params
    }

    fn endpoint(&self) -> Endpoint {
        if self.json {
            Endpoint::Json
        } else {
            Endpoint::Plain
        }
    }
}

fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let params = cli.params(config);
    let endpoint = cli.endpoint();

    if cli.url_only {
        println!("{}", build_url(endpoint, &params));
        return ExitCode::SUCCESS;
    }

    let mode = if cli.strip_tags {
        RenderMode::PlainText
    } else {
        RenderMode::Verbatim
    };
    let mut container = WriterContainer::stdout(mode);
    container.set_loading();

    let failed = Arc::new(AtomicBool::new(false));
    let worker_failed = Arc::clone(&failed);
    let request = dispatch(&params, endpoint, move |result| match result {
        Ok(recommendation) => container.set_content(&recommendation.body),
        Err(e) => {
            error!("{e}");
            worker_failed.store(true, Ordering::SeqCst);
        }
    });
    let request = match request {
        Ok(request) => request,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    info!(url = request.url(), "Waiting for recommendlet");

    match request.wait() {
        Ok(()) if failed.load(Ordering::SeqCst) => ExitCode::FAILURE,
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
