use {
    actix_files::Files,
    actix_web::{middleware, App, HttpServer},
    clap::Parser,
    env_logger::Env,
    log::info,
    std::path::PathBuf,
    wedding_site::{
        content::SiteContent, endpoint::DEFAULT_ENDPOINT, routes::app_config, state::AppState,
    },
};

/// Web server for the wedding invitation and its RSVP form
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(short, long, default_value_t = String::from("127.0.0.1:8080"))]
    bind: String,

    /// URL that receives each RSVP as JSON
    #[arg(short, long, default_value_t = String::from(DEFAULT_ENDPOINT))]
    endpoint: String,

    /// JSON file to use instead of the built-in site content
    #[arg(short, long)]
    content: Option<PathBuf>,

    /// Directory served under /static
    #[arg(long, default_value = "static")]
    static_dir: PathBuf,

    /// Test mode, doesn't actually send RSVPs
    #[arg(short, long)]
    test: bool,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let content = match &args.content {
        Some(path) => SiteContent::load(path)?,
        None => SiteContent::embedded()?,
    };
    info!(
        "Serving {} & {}, counting down to {}",
        content.couple[0], content.couple[1], content.wedding_date
    );
    if args.test {
        info!("Test mode, RSVPs will only be logged");
    } else {
        info!("Forwarding RSVPs to {}", args.endpoint);
    }

    let Args {
        bind,
        endpoint,
        static_dir,
        test,
        ..
    } = args;

    // start http server
    HttpServer::new(move || {
        let endpoint = endpoint.clone();
        let content = content.clone();
        App::new()
            .wrap(middleware::Logger::default())
            .data_factory(move || {
                let endpoint = endpoint.clone();
                let content = content.clone();
                async move { AppState::new(&endpoint, content, test) }
            })
            .service(Files::new("/static", static_dir.clone()))
            .configure(app_config)
    })
    .bind(bind.as_str())?
    .run()
    .await
}
