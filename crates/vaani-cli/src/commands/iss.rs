//! ISS position command.

use anyhow::Result;
use colored::Colorize;

use vaani_space::IssTracker;
use vaani_web::AppConfig;

pub async fn execute(config: AppConfig) -> Result<()> {
    let tracker = IssTracker::new(&config.space);
    let position = tracker.fetch().await?;

    println!("{}", "🛰️ International Space Station".bold());
    println!("  {}  {:>9.4}", "Latitude".green(), position.latitude);
    println!("  {} {:>9.4}", "Longitude".green(), position.longitude);
    println!("  {}        {}", "Time".green(), position.timestamp);
    Ok(())
}
