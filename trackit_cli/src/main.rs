//! Interactive client for a running trackit server.

use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use reqwest::blocking::Client;
use trackit_core::types::{Archive, Json};

fn main() {
    tracing_subscriber::fmt().init();

    let base_url = std::env::var("TRACKIT_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
    let client = Client::new();

    println!("trackit_cli connected to {base_url} (type 'help' or 'exit')");

    loop {
        print!("trackit> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        if io::stdin().read_line(&mut line).is_err() {
            println!("Failed to read input");
            continue;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        if input.eq_ignore_ascii_case("help") {
            print_help();
            continue;
        }

        match run_command(&client, &base_url, input) {
            Ok(out) => println!("{out}"),
            Err(err) => println!("error: {err}"),
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  schemata <ns>                    -> list schemata in a namespace");
    println!("  schema <ns> <name> <json>        -> store a schema body");
    println!("  data <ns> <schema>               -> list data under a schema");
    println!("  get <ns> <schema> <key>          -> fetch one datum");
    println!("  put <ns> <schema> <key> <json>   -> store one datum");
    println!("  archive                          -> export the whole store");
    println!("  restore <json>                   -> import an archive (merge)");
    println!("  purge                            -> delete everything");
    println!("  exit|quit                        -> quit");
}

fn run_command(client: &Client, base_url: &str, input: &str) -> Result<String> {
    let mut words = input.splitn(2, ' ');
    let command = words.next().unwrap_or_default();
    let rest = words.next().unwrap_or_default().trim();
    tracing::debug!(command, "dispatching");

    match command {
        "schemata" => {
            let ns = single_arg(rest, "schemata <ns>")?;
            fetch(client.get(format!("{base_url}/schemata/{ns}/")))
        }
        "schema" => {
            let (ns, rest) = split_arg(rest, "schema <ns> <name> <json>")?;
            let (name, json) = split_arg(rest, "schema <ns> <name> <json>")?;
            let body: Json = serde_json::from_str(json).context("schema body is not valid JSON")?;
            fetch(client.put(format!("{base_url}/schemata/{ns}/{name}/")).json(&body))
        }
        "data" => {
            let (ns, schema) = split_arg(rest, "data <ns> <schema>")?;
            fetch(client.get(format!("{base_url}/data/{ns}/{schema}/")))
        }
        "get" => {
            let (ns, rest) = split_arg(rest, "get <ns> <schema> <key>")?;
            let (schema, key) = split_arg(rest, "get <ns> <schema> <key>")?;
            fetch(client.get(format!("{base_url}/data/{ns}/{schema}/{key}/")))
        }
        "put" => {
            let (ns, rest) = split_arg(rest, "put <ns> <schema> <key> <json>")?;
            let (schema, rest) = split_arg(rest, "put <ns> <schema> <key> <json>")?;
            let (key, json) = split_arg(rest, "put <ns> <schema> <key> <json>")?;
            let value: Json = serde_json::from_str(json).context("datum is not valid JSON")?;
            fetch(client.put(format!("{base_url}/data/{ns}/{schema}/{key}/")).json(&value))
        }
        "archive" => fetch(client.get(format!("{base_url}/archive/"))),
        "restore" => {
            if rest.is_empty() {
                bail!("usage: restore <json>");
            }
            let archive: Archive =
                serde_json::from_str(rest).context("payload is not a valid archive")?;
            fetch(client.put(format!("{base_url}/archive/")).json(&archive))
        }
        "purge" => fetch(client.post(format!("{base_url}/purge/"))),
        other => bail!("unknown command '{other}' (try 'help')"),
    }
}

fn single_arg<'a>(rest: &'a str, usage: &str) -> Result<&'a str> {
    if rest.is_empty() || rest.contains(' ') {
        bail!("usage: {usage}");
    }
    Ok(rest)
}

fn split_arg<'a>(rest: &'a str, usage: &str) -> Result<(&'a str, &'a str)> {
    let mut words = rest.splitn(2, ' ');
    match (words.next(), words.next()) {
        (Some(first), Some(second)) if !first.is_empty() && !second.trim().is_empty() => {
            Ok((first, second.trim()))
        }
        _ => bail!("usage: {usage}"),
    }
}

fn fetch(request: reqwest::blocking::RequestBuilder) -> Result<String> {
    let response = request.send().context("request failed")?;
    let status = response.status();
    let text = response.text().context("failed to read response body")?;
    if status.is_success() {
        Ok(text)
    } else {
        bail!("{status}: {text}")
    }
}
