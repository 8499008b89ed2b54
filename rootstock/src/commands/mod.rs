use anyhow::{Context, Result};
use rootstock_core::{metadata::SchemaTerm, service::Service};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::{
    cli::{ParamsArgs, RunArgs, ServicesArgs},
    AppContext,
};

const DESCRIPTION_WIDTH: usize = 72;

// --- Handler Functions ---

pub fn handle_services(args: ServicesArgs, cx: &AppContext) -> Result<()> {
    if args.json {
        let summaries = cx.services.iter().map(service_summary).collect::<Vec<_>>();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    for service in cx.services.iter() {
        println!("{} ({})", service.name(), service.alias());
        println!("  {}", service.uri());
        for line in textwrap::wrap(service.description(), DESCRIPTION_WIDTH) {
            println!("  {}", line);
        }
        if let Some(metadata) = service.metadata() {
            println!("  Category: {}", term_label(metadata.category()));
            for term in metadata.inputs() {
                println!("  Input:    {}", term_label(term));
            }
            for term in metadata.outputs() {
                println!("  Output:   {}", term_label(term));
            }
        }
        println!();
    }
    Ok(())
}

pub fn handle_params(args: ParamsArgs, cx: &AppContext) -> Result<()> {
    let service = cx
        .services
        .find(&args.alias)
        .with_context(|| format!("No service with alias '{}'", args.alias))?;
    let params = service.parameters()?;

    println!("{}: {}", params.name(), params.description());
    println!();
    println!("  {:<16} {:<18} {:<10} Description", "Name", "Type", "Default");
    println!("  {:-<16} {:-<18} {:-<10} {:-<40}", "", "", "", "");
    for param in params.iter() {
        let default = param.default().map(ToString::to_string).unwrap_or_else(|| "--".into());
        println!(
            "  {:<16} {:<18} {:<10} {}",
            param.name(),
            param.param_type().to_string(),
            default,
            param.description()
        );
    }

    service.release_parameters(params);
    Ok(())
}

/// Run a service once and print its job set. Returns whether every job succeeded.
pub async fn handle_run(args: RunArgs, cx: &mut AppContext) -> Result<bool> {
    let service = cx
        .services
        .find_mut(&args.alias)
        .with_context(|| format!("No service with alias '{}'", args.alias))?;

    let mut params = service.parameters()?;
    params.apply_strings(args.params.iter().map(String::as_str))?;
    if let Some(raw) = &args.json_params {
        let values: Value = serde_json::from_str(raw).context("Invalid --json-params")?;
        let values = values
            .as_object()
            .context("--json-params must be a JSON object")?;
        params.apply_values(values)?;
    }
    debug!(service = service.alias(), parameters = params.len(), "Running service");

    let jobs = service.run(&params).await;
    service.release_parameters(params);
    let jobs = jobs?;

    for job in jobs.jobs() {
        info!(job_id = %job.id(), status = %job.status(), results = job.results().len(), "Job finished");
    }
    println!("{}", serde_json::to_string_pretty(&jobs)?);
    Ok(jobs.all_succeeded())
}

fn term_label(term: &SchemaTerm) -> String {
    format!("{} <{}>", term.name(), term.url())
}

fn service_summary(service: &dyn Service) -> Value {
    json!({
        "name": service.name(),
        "alias": service.alias(),
        "description": service.description(),
        "uri": service.uri(),
        "synchronicity": service.synchronicity(),
        "metadata": service.metadata(),
    })
}

#[cfg(test)]
mod tests {
    use rootstock_services::{ensembl::EnsemblConfig, get_services_with_config};

    use super::*;

    #[test]
    fn summary_includes_identity_and_metadata() {
        let services = get_services_with_config(EnsemblConfig::new().unwrap());
        let summary = service_summary(services.find("ensembl/search").unwrap());
        assert_eq!(summary["alias"], "ensembl/search");
        assert_eq!(summary["synchronicity"], "synchronous");
        assert_eq!(
            summary["metadata"]["inputs"][0]["url"],
            "http://edamontology.org/data_1063"
        );
    }

    #[tokio::test]
    async fn unknown_alias_is_an_error() {
        let mut cx = AppContext {
            services: get_services_with_config(EnsemblConfig::new().unwrap()),
        };
        let args = RunArgs {
            alias: "ensembl/align".into(),
            params: vec![],
            json_params: None,
        };
        assert!(handle_run(args, &mut cx).await.is_err());
    }

    #[tokio::test]
    async fn unknown_parameter_is_an_error() {
        let mut cx = AppContext {
            services: get_services_with_config(EnsemblConfig::new().unwrap()),
        };
        let args = RunArgs {
            alias: "ensembl/search".into(),
            params: vec!["gene=AT1G01010".into()],
            json_params: None,
        };
        let err = handle_run(args, &mut cx).await.unwrap_err();
        assert!(err.to_string().contains("Unknown parameter"));
    }
}
