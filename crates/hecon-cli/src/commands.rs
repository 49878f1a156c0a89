use anyhow::Result;
use hecon_anonymize::AnonymizationPolicy;
use hecon_cli::config::HeconConfig;
use hecon_cli::pipeline::{AnalyzeOutcome, AnonymizeOutcome, analyze_file, anonymize_file};

use crate::cli::{AnalyzeArgs, AnonymizeArgs};

pub fn run_anonymize(args: &AnonymizeArgs, mut config: HeconConfig) -> Result<AnonymizeOutcome> {
    if let Some(salt) = &args.salt {
        config.anonymize.salt = Some(salt.clone());
    }
    if let Some(granularity) = args.granularity {
        config.anonymize.policy.granularity = granularity.into();
    }
    if args.drop_unlisted {
        config.anonymize.policy.drop_unlisted = true;
    }
    if args.detail {
        let detail = AnonymizationPolicy::detail();
        config.anonymize.policy.hash_fragments = detail.hash_fragments;
        config.anonymize.policy.period_fragments = detail.period_fragments;
    }
    anonymize_file(&args.input, args.output_dir.as_deref(), &config)
}

pub fn run_analyze(args: &AnalyzeArgs, mut config: HeconConfig) -> Result<AnalyzeOutcome> {
    let analysis = &mut config.analysis;
    if let Some(strategy) = args.strategy {
        analysis.forecast_strategy = strategy.into();
    }
    if let Some(estimator) = args.estimator {
        analysis.growth_estimator = estimator.into();
    }
    if let Some(seed) = args.seed {
        analysis.seed = seed;
    }
    if let Some(clusters) = args.clusters {
        analysis.n_clusters = clusters;
    }
    analyze_file(&args.input, args.output.as_deref(), &config)
}
