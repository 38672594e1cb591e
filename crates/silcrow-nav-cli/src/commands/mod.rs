pub mod parse;
pub mod routes;
pub mod stringify;

use std::path::Path;

use anyhow::Context;
use silcrow_router::{RouteConfig, RouteTable};

pub fn load_table(path: &Path) -> anyhow::Result<RouteTable> {
    let config = RouteConfig::load_from(path)
        .with_context(|| format!("loading route file {}", path.display()))?;
    let table = config.compile().context("compiling routes")?;
    tracing::debug!(routes = table.routes().len(), file = %path.display(), "route file loaded");
    Ok(table)
}
