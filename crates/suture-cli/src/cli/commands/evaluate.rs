use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use suture_core::{
    Evaluator, FakeProvider, FixedScaleEstimator, MeasureOptions, MeasurementProvider,
    OpenAiVisionProvider, ProviderConfig,
};

use crate::cli::args::{EvaluateArgs, ProviderKind};
use crate::exit_codes::SUCCESS;

pub(crate) async fn run(args: EvaluateArgs) -> anyhow::Result<i32> {
    let provider = build_provider(&args)?;
    tracing::debug!(provider = provider.provider_name(), "provider ready");

    let mut evaluator = Evaluator::new(provider);
    if let Some(scale) = args.scale {
        evaluator = evaluator.with_scale_estimator(Arc::new(FixedScaleEstimator::new(scale)?));
    }
    if let Some(secs) = args.timeout {
        evaluator =
            evaluator.with_options(MeasureOptions::with_timeout(Duration::from_secs(secs)));
    }

    let report = evaluator
        .evaluate(&args.image)
        .await
        .with_context(|| format!("evaluating {}", args.image.display()))?;

    super::output::emit(&report, &args.output)?;
    Ok(SUCCESS)
}

fn build_provider(args: &EvaluateArgs) -> anyhow::Result<Arc<dyn MeasurementProvider>> {
    match args.provider {
        ProviderKind::Fake => {
            let fake = match &args.fake_response {
                Some(path) => FakeProvider::from_file(path)?,
                None => FakeProvider::demo(),
            };
            Ok(Arc::new(fake))
        }
        ProviderKind::Openai => {
            let mut config = match &args.config {
                Some(path) => ProviderConfig::from_file(path)?,
                None => ProviderConfig::from_env(),
            };
            if let Some(model) = &args.model {
                config = config.with_model(model.clone());
            }
            if let Some(url) = &args.base_url {
                config = config.with_base_url(url.clone());
            }
            Ok(Arc::new(OpenAiVisionProvider::new(config)?))
        }
    }
}
