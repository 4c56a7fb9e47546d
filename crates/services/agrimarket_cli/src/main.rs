// File: services/agrimarket_cli/src/main.rs
use agrimarket_client::views::{AboutUsView, FavoritesView, ListingView, NotificationsView};
use agrimarket_client::{Dispatcher, FileStore, ItemKind, LanguagePreference, Services, ViewScope};
use agrimarket_common::logging;
use agrimarket_config::load_config;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "agrimarket", about = "Browse and act on the agrimarket backend", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the about-us page.
    About,
    /// List favorites, optionally of one kind.
    Favorites {
        #[arg(long, value_parser = parse_kind)]
        kind: Option<ItemKind>,
    },
    /// Show notifications.
    Notifications,
    /// Browse crops, farmers, buyers or agro-shops.
    List {
        #[arg(value_parser = parse_kind)]
        kind: ItemKind,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Request an OTP for a phone number.
    Otp { phone: String },
    /// Verify an OTP and store the session credential.
    Verify { phone: String, otp: String },
    /// Log out and clear the stored credential.
    Logout,
    /// Change the preferred language, e.g. `language Hindi hi`.
    Language { name: String, code: String },
}

fn parse_kind(raw: &str) -> Result<ItemKind, String> {
    ItemKind::parse(raw).ok_or_else(|| format!("unknown kind `{raw}`, expected crop, farmer, buyer or agro-shop"))
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => error!(error = %err, "failed to render output"),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load config: {err}");
            return ExitCode::FAILURE;
        }
    };
    logging::init_from_str(&config.logging.level);
    info!(base_url = %config.api.base_url, "agrimarket client starting");

    let store = FileStore::new(&config.storage.path);
    let services = match Services::connect(&config.api, store) {
        Ok(services) => services,
        Err(err) => {
            error!(error = %err, "failed to build API client");
            return ExitCode::FAILURE;
        }
    };

    run(cli.command, services).await;
    ExitCode::SUCCESS
}

async fn run(command: Command, services: Services) {
    let scope = ViewScope::new();
    match command {
        Command::About => {
            let mut view = AboutUsView::new();
            view.load(&services, &scope).await;
            print_json(&view.state);
        }
        Command::Favorites { kind } => {
            let mut view = FavoritesView::new();
            view.load(&services, &scope).await;
            view.set_filter(kind);
            print_json(&view.visible());
        }
        Command::Notifications => {
            let mut view = NotificationsView::new();
            view.load(&services, &scope).await;
            print_json(&view.state);
        }
        Command::List { kind, page } => {
            let mut view = ListingView::new(kind);
            view.load(&services, &scope, page).await;
            print_json(&view.state);
        }
        Command::Otp { phone } => {
            let dispatcher = Dispatcher::new(services);
            print_json(&dispatcher.send_otp(&phone).await);
        }
        Command::Verify { phone, otp } => {
            let dispatcher = Dispatcher::new(services);
            print_json(&dispatcher.verify_otp(&phone, &otp).await);
        }
        Command::Logout => {
            let dispatcher = Dispatcher::new(services);
            print_json(&dispatcher.logout().await);
        }
        Command::Language { name, code } => {
            let dispatcher = Dispatcher::new(services);
            print_json(&dispatcher.update_language(&LanguagePreference::new(name, code)).await);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_listing_with_page() {
        let cli = Cli::try_parse_from(["agrimarket", "list", "agro-shop", "--page", "2"]).unwrap();
        match cli.command {
            Command::List { kind, page } => {
                assert_eq!(kind, ItemKind::AgroShop);
                assert_eq!(page, Some(2));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["agrimarket", "list", "tractor"]).is_err());
    }

    #[test]
    fn favorites_filter_is_optional() {
        let cli = Cli::try_parse_from(["agrimarket", "favorites"]).unwrap();
        assert!(matches!(cli.command, Command::Favorites { kind: None }));
    }
}
