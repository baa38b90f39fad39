//! Command-line overrides applied on top of the loaded configuration

use colloquy_infrastructure::{FileConfig, GeneratorProvider};
use colloquy_presentation::{Cli, ProviderArg};

/// Apply every flag the user gave; flags win over all config sources.
pub fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(capacity) = cli.capacity {
        config.log.capacity = capacity;
    }

    if let Some(secs) = cli.tick_interval {
        config.driver.tick_interval_secs = secs;
    }
    if !cli.agent.is_empty() {
        config.driver.agents = cli.agent.clone();
    }
    if let Some(limit) = cli.memory_limit {
        config.driver.memory_limit = limit;
    }
    if cli.atomic_ticks {
        config.driver.atomic_ticks = true;
    }

    if !cli.topic.is_empty() {
        config.topics.seeds = cli.topic.clone();
    }

    if let Some(provider) = cli.provider {
        config.generator.provider = match provider {
            ProviderArg::Babble => GeneratorProvider::Babble,
            ProviderArg::Openai => GeneratorProvider::OpenAi,
        };
    }
    if let Some(model) = &cli.model {
        config.generator.model = model.clone();
    }
    if let Some(url) = &cli.base_url {
        config.generator.base_url = url.clone();
    }

    if let Some(path) = &cli.transcript {
        config.transcript.path = Some(path.to_string_lossy().into_owned());
    }
}
