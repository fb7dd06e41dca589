//! Setup command: API key status and storage.

use crate::cli::SetupArgs;
use scout_core::config::{key_file_path, save_api_key};
use scout_core::{AppConfig, Error};

struct ServiceInfo {
    service: &'static str,
    name: &'static str,
    url: &'static str,
    purpose: &'static str,
}

const SERVICE_INFO: [ServiceInfo; 3] = [
    ServiceInfo { service: "exa", name: "Exa", url: "https://exa.ai", purpose: "web search" },
    ServiceInfo {
        service: "firecrawl",
        name: "Firecrawl",
        url: "https://firecrawl.dev",
        purpose: "page extraction",
    },
    ServiceInfo {
        service: "gemini",
        name: "Google Gemini",
        url: "https://aistudio.google.com/apikey",
        purpose: "content analysis",
    },
];

fn info_for(service: &str) -> Option<&'static ServiceInfo> {
    SERVICE_INFO.iter().find(|info| info.service == service)
}

pub fn run(config: &AppConfig, args: SetupArgs) -> Result<(), Error> {
    if let (Some(service), Some(key)) = (&args.service, &args.key) {
        let Some(info) = info_for(service) else {
            return Err(Error::InvalidInput(format!(
                "unknown service: {service}. Use: exa, firecrawl, or gemini"
            )));
        };

        save_api_key(service, key)?;
        println!("✓ {} API key saved to {}", info.name, key_file_path(service).display());
        return Ok(());
    }

    println!("\nscout requires three API keys:\n");

    let statuses = config.key_status();
    for (service, configured) in &statuses {
        let info = info_for(service).expect("known service");
        let icon = if *configured { "✓" } else { "✗" };
        let state = if *configured { "configured" } else { "missing" };
        println!("  {icon} {:<15} {state:<12} {}", info.name, info.purpose);
    }

    let missing: Vec<&str> = statuses.iter().filter(|(_, ok)| !ok).map(|(s, _)| *s).collect();

    if missing.is_empty() {
        println!("\nAll keys configured. Ready to search.");
        return Ok(());
    }

    println!("\nGet your keys:");
    for service in &missing {
        let info = info_for(service).expect("known service");
        println!("  {:<15} {}", info.name, info.url);
    }

    println!("\nThen run:");
    for service in &missing {
        println!("  scout setup {service} <your-key>");
    }
    println!();

    Ok(())
}
