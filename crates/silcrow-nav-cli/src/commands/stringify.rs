use std::process::ExitCode;

use anyhow::{anyhow, bail};
use silcrow_router::{Navigation, RouteTable, Scalar};

pub fn run(
    table: &RouteTable,
    destination: &str,
    params: &[String],
    lists: &[String],
    rest: Option<&str>,
) -> anyhow::Result<ExitCode> {
    let navigation = build_navigation(destination, params, lists, rest)?;
    println!("{}", table.stringify(&navigation)?);
    Ok(ExitCode::SUCCESS)
}

fn build_navigation(
    destination: &str,
    params: &[String],
    lists: &[String],
    rest: Option<&str>,
) -> anyhow::Result<Navigation> {
    let mut navigation = Navigation::new(destination);
    for param in params {
        let (name, value) = split_assignment(param)?;
        navigation = navigation.with_param(name, scalar(value));
    }
    for list in lists {
        let (name, values) = split_assignment(list)?;
        let elements: Vec<Scalar> = if values.is_empty() {
            Vec::new()
        } else {
            values.split(',').map(scalar).collect()
        };
        navigation = navigation.with_list(name, elements);
    }
    if let Some(rest) = rest {
        navigation = navigation.with_remaining_path(rest);
    }
    Ok(navigation)
}

fn split_assignment(arg: &str) -> anyhow::Result<(&str, &str)> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=VALUE, got '{arg}'"))?;
    if name.is_empty() {
        bail!("parameter name missing in '{arg}'");
    }
    Ok((name, value))
}

/// Digit-only values become integers; anything else stays a string
fn scalar(value: &str) -> Scalar {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = value.parse::<i64>() {
            return Scalar::Int(n);
        }
    }
    Scalar::from(value)
}
