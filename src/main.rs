use std::{process, sync::Arc};

use log::{error, info};

use restaurant::{
    logger, repository::GeneralRepository, signal::StateDump, Config, Restaurant, Result,
};

fn run() -> Result<()> {
    let config = Config::from_args(std::env::args().skip(1))?;
    info!(
        "{} students, {} courses, log in {}",
        config.students,
        config.courses,
        config.log_file.display()
    );

    let repo = Arc::new(GeneralRepository::create(&config.log_file, config.students)?);
    let dump = StateDump::install(repo.clone())?;
    info!("pid: {} (SIGUSR1 prints the current states)", process::id());

    let restaurant = Restaurant::new(&config, repo.clone())?;
    restaurant.run()?;

    dump.close();
    repo.flush();
    Ok(())
}

fn main() {
    logger::init();
    if let Err(err) = run() {
        error!("{}", err);
        process::exit(1);
    }
}
