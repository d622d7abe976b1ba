fn main() {
    // Initialize logger. Set RUST_LOG environment variable to control log level.
    // Examples: RUST_LOG=info, RUST_LOG=card_desk=debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Server address comes from CARD_API_URL, defaulting to localhost
    let base_url = std::env::var("CARD_API_URL")
        .unwrap_or_else(|_| card_desk::api::DEFAULT_BASE_URL.to_string());
    log::info!("Starting Card Ledger desktop client against {base_url}");

    let api = card_desk::CardApi::new(base_url);
    if let Err(e) = card_desk::ui::launch_gui(api) {
        log::error!("Application error: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
