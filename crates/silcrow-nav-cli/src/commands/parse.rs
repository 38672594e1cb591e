use std::process::ExitCode;

use silcrow_router::RouteTable;

pub fn run(table: &RouteTable, path: &str) -> anyhow::Result<ExitCode> {
    match table.parse(path) {
        Some(navigation) => {
            println!("{}", serde_json::to_string_pretty(&navigation)?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("no route matches {path}");
            Ok(ExitCode::FAILURE)
        }
    }
}
