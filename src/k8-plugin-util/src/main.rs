use std::env;

use anyhow::Result;
use tracing::info;

use fluvio_future::task::run_block_on;
use k8_plugin_config::ConsoleConfig;
use k8_plugin_registry::NavGroup;
use k8_plugin_registry::PluginRegistry;

/// Performs following
///     read console config from argument, `K8_PLUGIN_CONFIG` or home directory
///     load every configured plugin bundle
///     print navigation and resource kinds of loaded plugins
fn main() {
    fluvio_future::subscriber::init_tracer(None);
    if let Err(e) = run_block_on(run()) {
        println!("{}", e);
    }
}

async fn run() -> Result<()> {
    let config = match env::args().nth(1) {
        Some(path) => ConsoleConfig::from_file(path)?,
        None => ConsoleConfig::load()?,
    };
    info!("{} bundle sources configured", config.bundles.len());

    let registry = PluginRegistry::from_config(&config)?;
    registry.load().await;

    for plugin in registry.plugins() {
        println!("{} {}", plugin.metadata.title(), plugin.metadata.version);
        for kind in plugin.kinds() {
            println!(
                "    {} ({}, {:?})",
                kind.api_version(),
                kind.plural,
                kind.scope
            );
        }
    }

    print_nav("organization", &registry.organization_nav());
    print_nav("project", &registry.project_nav());
    Ok(())
}

fn print_nav(scope: &str, groups: &[NavGroup]) {
    println!("{} menu:", scope);
    for group in groups {
        println!("  {}", group.title);
        for item in &group.items {
            let action = if item.create { " (+ create)" } else { "" };
            println!(
                "    {} -> /{}/{}{}",
                item.label, item.plugin, item.plural, action
            );
        }
    }
}
