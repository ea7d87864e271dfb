use anyhow::Context;
use clap::Args;

use faultline_core::stress::{StressVector, catalog, get_applicable_scenarios};
use faultline_core::types::ArchitectureType;

use super::OutputFormat;

#[derive(Args, Debug)]
pub struct ScenariosArgs {
    /// Only scenarios applicable to this architecture type (e.g. backend_api)
    #[arg(long)]
    pub arch: Option<String>,

    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub fn run(args: &ScenariosArgs) -> anyhow::Result<()> {
    let vectors: Vec<&StressVector> = match &args.arch {
        Some(name) => {
            let arch = ArchitectureType::parse(name).with_context(|| {
                let known: Vec<&str> = ArchitectureType::ALL.iter().map(|t| t.as_str()).collect();
                format!("Unknown architecture type '{name}' (known: {})", known.join(", "))
            })?;
            get_applicable_scenarios(arch)
        }
        None => catalog().iter().collect(),
    };

    match args.format {
        OutputFormat::Json => super::print_json(&vectors)?,
        OutputFormat::Text => {
            for v in &vectors {
                println!(
                    "{:<24} {:<10} {:.2}  [{}]",
                    v.name,
                    v.propagation_type,
                    v.severity,
                    v.target_layers.join(", ")
                );
                println!("{:<24} {}", "", v.description);
            }
        }
    }
    Ok(())
}
