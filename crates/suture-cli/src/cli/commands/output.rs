use anyhow::Context;
use suture_core::report::{format_report, to_json_pretty, write_json};
use suture_core::EvaluationReport;

use crate::cli::args::{OutputArgs, OutputFormat};

pub(crate) fn emit(report: &EvaluationReport, output: &OutputArgs) -> anyhow::Result<()> {
    match output.format {
        OutputFormat::Json => println!("{}", to_json_pretty(report)?),
        OutputFormat::Text => print!("{}", format_report(report)),
    }
    if let Some(out) = &output.out {
        write_json(report, out).with_context(|| format!("failed to write {}", out.display()))?;
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}
