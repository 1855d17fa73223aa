// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! rest-action-client CLI
//!
//! Runs a single framework action and prints how its response was
//! classified, plus the auth context it left behind.

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};

use rest_action_client::client::{FieldValue, Fields};
use rest_action_client::{
    Action, AuthContextProvider, ClientConfig, ClientContext, CsrfConfig, CsrfTokenExtender,
    DispatchOutcome, FrameworkResponse, NonFrameworkError, RestClient,
};

/// Environment variable holding the server origin
const ORIGIN_ENV: &str = "REST_CLIENT_ORIGIN";

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rest_action_client=info".parse().unwrap()),
        )
        .init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let origin = match take_origin(&mut args) {
        Ok(origin) => origin,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    if args.is_empty() {
        print_usage();
        return ExitCode::from(1);
    }

    let result = match args[0].as_str() {
        "get" | "post" => {
            if args.len() < 3 {
                eprintln!("Usage: rest-action-client {} <bundle> <action> [key=value...]", args[0]);
                return ExitCode::from(1);
            }
            run_action(&origin, &args[0] == "post", &args[1], &args[2], &args[3..]).await
        }
        "whoami" => whoami(&origin).await,
        "--help" | "-h" | "help" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        "--version" | "-v" | "version" => {
            println!("rest-action-client {}", rest_action_client::VERSION);
            return ExitCode::SUCCESS;
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            return ExitCode::from(1);
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"rest-action-client - Framework REST action client

USAGE:
    rest-action-client [--origin <url>] <COMMAND> [ARGS]

COMMANDS:
    get <bundle> <action> [key=value...]     Run an action as GET
    post <bundle> <action> [key=value...]    Run an action as POST (with CSRF token)
    whoami                                   Show the auth context the server reports
    help                                     Show this help message
    version                                  Show version information

OPTIONS:
    --origin <url>    Server origin (default: ${}, then {})

EXAMPLES:
    rest-action-client get my-bundle list-pages limit=10
    rest-action-client --origin http://localhost:4502 post my-bundle hello name=Test
    rest-action-client whoami
"#,
        ORIGIN_ENV,
        rest_action_client::config::DEFAULT_ORIGIN
    );
}

/// Remove `--origin <url>` from `args` and resolve the origin
fn take_origin(args: &mut Vec<String>) -> anyhow::Result<String> {
    if let Some(pos) = args.iter().position(|a| a == "--origin") {
        if pos + 1 >= args.len() {
            bail!("--origin requires a value");
        }
        let origin = args.remove(pos + 1);
        args.remove(pos);
        return Ok(origin);
    }
    Ok(env::var(ORIGIN_ENV).unwrap_or_else(|_| rest_action_client::config::DEFAULT_ORIGIN.to_string()))
}

/// Parse `key=value` pairs; repeated keys become lists
fn parse_fields(pairs: &[String]) -> anyhow::Result<Fields> {
    let mut fields = Fields::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("expected key=value, got '{}'", pair))?;

        let merged = match fields.get(key) {
            Some(FieldValue::Text(previous)) => {
                FieldValue::List(vec![previous.clone(), value.to_string()])
            }
            Some(FieldValue::List(items)) => {
                let mut items = items.clone();
                items.push(value.to_string());
                FieldValue::List(items)
            }
            _ => FieldValue::from(value),
        };
        fields.insert(key, merged);
    }
    Ok(fields)
}

fn context_for(origin: &str) -> anyhow::Result<ClientContext> {
    let config = ClientConfig::for_origin(origin).with_context(|| format!("invalid origin '{}'", origin))?;
    Ok(ClientContext::new(config)?)
}

fn print_response(label: &str, response: &FrameworkResponse) {
    println!("\n=== {} ===", label);
    println!("Status: {}", response.status);
    if let Some(ref message) = response.message {
        println!("Message: {}", message);
    }
    if let Some(ref details) = response.message_details {
        println!("Details: {}", details);
    }
    for error in response.validation_errors() {
        println!("  - {}: {}", error.path, error.message);
    }
    if let Some(ref entity) = response.entity {
        match serde_json::to_string_pretty(entity) {
            Ok(json) => println!("Entity:\n{}", json),
            Err(_) => println!("Entity: {}", entity),
        }
    }
}

async fn run_action(
    origin: &str,
    post: bool,
    bundle: &str,
    name: &str,
    pairs: &[String],
) -> anyhow::Result<ExitCode> {
    let context = context_for(origin)?;
    let fields = parse_fields(pairs)?;

    let builder = Action::builder(name)
        .on_success(|r| print_response("Success", r))
        .on_failure(|r| print_response("Failure", r))
        .on_validation_failure(|r| print_response("Validation failure", r))
        .on_error(|r| print_response("Error", r))
        .on_non_framework_error(|e: &NonFrameworkError| {
            println!("\n=== Non-framework response ===");
            println!("{}", e);
            if let Some(response) = e.response() {
                println!("URL: {}", response.url);
                let body = response.text_lossy();
                if !body.is_empty() {
                    println!("Body: {}", body.chars().take(200).collect::<String>());
                }
            }
        });

    let outcome = if post {
        CsrfTokenExtender::new(CsrfConfig::default(), Arc::clone(&context.transport))
            .install(&context.registry)?;
        let action = builder.data(fields).build()?;
        let client = RestClient::new(bundle, context);
        println!("POST {}", client.build_post_fetch_parameters(&action).await.url);
        let outcome = client.post(&action).await;
        print_auth(&client);
        outcome
    } else {
        let action = builder.parameters(fields).build()?;
        let client = RestClient::new(bundle, context);
        println!("GET {}", client.build_get_fetch_parameters(&action).await.url);
        let outcome = client.get(&action).await;
        print_auth(&client);
        outcome
    };

    Ok(exit_code(outcome))
}

fn print_auth(client: &RestClient) {
    let auth = client.auth_context();
    println!(
        "\nAuth: {} (logged in: {})",
        auth.user_id().unwrap_or("<unknown>"),
        auth.is_logged_in()
    );
}

fn exit_code(outcome: DispatchOutcome) -> ExitCode {
    match outcome {
        _ if outcome.is_success() => ExitCode::SUCCESS,
        DispatchOutcome::Handled(_) => ExitCode::from(2),
        DispatchOutcome::NonFramework(_) => ExitCode::from(3),
    }
}

async fn whoami(origin: &str) -> anyhow::Result<ExitCode> {
    let provider = AuthContextProvider::new(context_for(origin)?);
    let auth = provider.get_or_fetch_context().await;

    match auth.user_id() {
        Some(user_id) if auth.is_initialized() => {
            println!("User: {}", user_id);
            println!("Logged in: {}", auth.is_logged_in());
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            println!("The server did not report an auth context");
            Ok(ExitCode::from(3))
        }
    }
}
