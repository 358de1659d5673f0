// src/main.rs
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use packwise::api::{CalculateRequest, PackService};
use packwise::config::AppConfig;

fn main() -> ExitCode {
    if let Err(err) = dotenvy::dotenv() {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("could not load .env: {}", err);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env();
    let service = PackService::from_config(&config);

    let Some(raw) = std::env::args().nth(1) else {
        eprintln!("usage: packwise <items-ordered>");
        eprintln!("catalog: {:?}", service.pack_sizes().pack_sizes);
        return ExitCode::from(2);
    };

    let items_ordered: u64 = match raw.parse() {
        Ok(value) => value,
        Err(err) => {
            eprintln!("could not parse '{}' as an order quantity: {}", raw, err);
            return ExitCode::from(2);
        }
    };

    match service.calculate(CalculateRequest { items_ordered }) {
        Ok(shipment) => {
            match serde_json::to_string_pretty(&shipment) {
                Ok(json) => println!("{}", json),
                Err(err) => {
                    eprintln!("could not serialize shipment: {}", err);
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", err.message);
            ExitCode::FAILURE
        }
    }
}
