//! A VERY simple URL shortener. It maps short path segments to target URLs,
//! optionally bounded to a time window, and serves plain HTTP redirects.
//!
//! This is intended not to be directly accessible to the public internet but
//! rather reverse-proxied by something like nginx that would handle TLS.
//!
//! The config file is passed in with the --config flag; URL mappings are
//! defined in a separate file named by the config.

mod body;
mod config;
mod err;
mod mapping;
mod opt;
mod routes;
mod server;

use std::fs::OpenOptions;
use tokio::sync::RwLock;

#[tokio::main]
async fn main() -> Result<(), err::DisplayError> {
    let opt::Options {
        config,
        logfile,
        foreground,
        validate,
        verbose,
    } = clap::Parser::parse();

    let mut logger = env_logger::Builder::new();
    logger.filter_level(match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    });
    if !foreground && !validate {
        let file = OpenOptions::new().create(true).append(true).open(&logfile)?;
        logger.target(env_logger::Target::Pipe(Box::new(file)));
    }
    logger.init();

    let config = config::load(&config)?;
    let map = mapping::load(&config.map_file)?;

    if validate {
        println!("ok");
        return Ok(());
    }

    log::info!(
        "loaded {} service mappings from {}",
        map.len(),
        config.map_file.display()
    );

    let listen = config.listen_addr();
    log::info!("listening on http://{}", listen);

    let state = routes::State {
        config,
        map: RwLock::new(map),
    };
    server::run(&listen, state).await?;

    Ok(())
}
