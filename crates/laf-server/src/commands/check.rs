//! Startup check command
//!
//! Usage: laf-server check [--log-profile <PROFILE>]

use clap::Args;
use laf_core::logging_facility::{init, Profile};
use laf_store::Settings;

use crate::context::AppContext;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Logging profile (development, production, test); overrides LAF_LOG_PROFILE
    #[arg(long)]
    pub log_profile: Option<Profile>,
}

/// Execute startup check
pub fn execute(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    init(args.log_profile.unwrap_or(settings.log_profile));

    // Any failure here aborts startup
    let context = AppContext::bootstrap(settings)?;
    context.logger().info("resource registry ready");

    for (store, db) in [("sys", context.sys_db()), ("app", context.app_db())] {
        db.ping()?;
        println!(
            "✓ {} store '{}' reachable ({} connections)",
            store,
            db.database(),
            db.accessor().pool_size()
        );
    }

    Ok(())
}
