//! One-shot check against the live sources; prints the report JSON.

use chrono::Utc;
use room_price_watch::config::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    room_price_watch::init_tracing();

    let settings = Settings::load_default()?;
    let checker = settings.build_checker()?;

    match checker.check(Utc::now()).await {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", serde_json::json!({ "status": "error", "message": e.to_string() }));
            std::process::exit(1);
        }
    }
}
