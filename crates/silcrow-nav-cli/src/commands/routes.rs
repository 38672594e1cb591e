use std::process::ExitCode;

use silcrow_router::{RouteTable, Term};

pub fn run(table: &RouteTable) -> anyhow::Result<ExitCode> {
    if table.routes().is_empty() {
        println!("no routes");
        return Ok(ExitCode::SUCCESS);
    }
    for (index, route) in table.routes().iter().enumerate() {
        println!(
            "{index:>3}  {:<24} -> {}  [{}]",
            route.pattern(),
            route.destination(),
            summary(route.terms())
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// One token per term: quoted literals, variables in pattern syntax
fn summary(terms: &[Term]) -> String {
    terms
        .iter()
        .map(|term| match term {
            Term::Literal(text) => format!("{text:?}"),
            Term::Variable(variable) => variable.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
