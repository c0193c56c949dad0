//! OpenSASE Storefront - headless product page harness
//!
//! Opens one product page session against the catalog and drives it from
//! stdin: `pick <property> <value>`, `route <path-or-id>`, `show`, `quit`.

use std::sync::Arc;

use anyhow::{Context, Result};
use opensase_storefront::catalog::{CatalogApi, HttpCatalog};
use opensase_storefront::config::StorefrontConfig;
use opensase_storefront::domain::{PageEvent, VariantId};
use opensase_storefront::fixtures::{self, FixtureCatalog};
use opensase_storefront::navigation::ProductPageSession;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();
    let config = StorefrontConfig::from_env()?;

    if let Some(path) = &config.fixture_path {
        let catalog = Arc::new(FixtureCatalog::from_path(path).with_context(|| format!("loading {}", path.display()))?);
        let listener = tokio::net::TcpListener::bind(config.fixture_addr).await?;
        tracing::info!("🚀 Fixture catalog listening on {}", config.fixture_addr);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, fixtures::router(catalog)).await {
                tracing::error!(error = %e, "Fixture catalog stopped");
            }
        });
    }

    let api = Arc::new(HttpCatalog::new(&config.catalog_base_url(), config.catalog_timeout_secs, &config.user_agent)?);
    let initial = match (std::env::args().nth(1), &config.initial_variant) {
        (Some(arg), _) => parse_route(&arg),
        (None, Some(id)) => id.clone(),
        (None, None) => anyhow::bail!("no variant id given (argument or INITIAL_VARIANT)"),
    };

    let mut session = ProductPageSession::open(api, initial);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(_) = session.next_settled(), if session.has_pending() => {
                pump_events(&mut session);
                render(&session);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let mut words = line.split_whitespace();
                match (words.next(), words.next(), words.next()) {
                    (Some("pick"), Some(property), Some(value)) => {
                        let outcome = session.select(property, value);
                        tracing::info!(?outcome, "Pick");
                        pump_events(&mut session);
                        render(&session);
                    }
                    (Some("route"), Some(target), None) => {
                        session.route_changed(parse_route(target));
                        pump_events(&mut session);
                    }
                    (Some("show"), None, None) => render(&session),
                    (Some("quit"), None, None) => break,
                    (None, _, _) => {}
                    _ => println!("commands: pick <property> <value> | route <path-or-id> | show | quit"),
                }
            }
        }
    }
    session.close();
    Ok(())
}

fn parse_route(raw: &str) -> VariantId {
    VariantId::from_product_path(raw).unwrap_or_else(|| VariantId::new(raw))
}

/// Plays the router: every URL replace comes straight back as a route change.
fn pump_events<C: CatalogApi + 'static>(session: &mut ProductPageSession<C>) {
    loop {
        let events = session.take_events();
        if events.is_empty() { return; }
        for event in events {
            match event {
                PageEvent::UrlReplaced { variant_id, path } => {
                    println!("[history.replace] {path}");
                    session.route_changed(variant_id);
                }
                PageEvent::LoadFailed { error, .. } => println!("[error] {error}"),
                other => tracing::debug!(?other, "Page event"),
            }
        }
    }
}

fn render<C: CatalogApi + 'static>(session: &ProductPageSession<C>) {
    let c = session.controller();
    if c.is_loading() { println!("loading..."); return; }
    if let Some(err) = c.error().filter(|e| e.blocks_variant_area()) { println!("{err}"); return; }
    let Some(matrix) = c.matrix() else { return };

    println!("== {}", c.display_name().unwrap_or("?"));
    if let Some(detail) = c.detail() {
        let stock = if detail.is_in_stock() { format!("{} in stock", detail.stock.value()) } else { "sold out".into() };
        println!("   {}  ({stock})", detail.price);
    }
    for name in matrix.selectable_names() {
        let chosen = c.selection().get(name).unwrap_or("-");
        let options: Vec<_> = c.available_values(name).into_iter().collect();
        println!("   {name}: {chosen}  [{}]", options.join(", "));
    }
}
