use crate::brief_export::{copy_to_clipboard, save_brief};
use crate::{interactive, render};
use application::consulting_service::{prepare_brief, ConsultingService};
use application::knowledge_service::KnowledgeService;
use application::providers::{completion_model_name, completion_provider, embedding_provider};
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use domain::engagement::EngagementType;
use domain::models::{BusinessChallenge, StrategyBrief};
use domain::scenario::find_scenario;
use infrastructure::brief_cache::BriefCache;
use infrastructure::config::Config;
use shared::types::Result;
use std::path::PathBuf;
use std::sync::OnceLock;

#[derive(Parser, Debug)]
#[command(name = "ai-consultant")]
#[command(about = "Strategy & Operations analysis grounded in a consulting framework knowledge base")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fill in a challenge interactively (default)
    Interactive,
    /// Generate one strategy brief from flags or a sample scenario
    Brief(BriefArgs),
    /// Build or refresh the framework knowledge base
    Index {
        /// Discard the existing vectors and embed everything again
        #[arg(long, action = ArgAction::SetTrue)]
        rebuild: bool,
    },
    /// Show the framework chunks retrieved for a query
    Search {
        /// Number of chunks to return
        #[arg(short, long, default_value_t = 3)]
        k: usize,
        #[arg(required = true, trailing_var_arg = true)]
        query: Vec<String>,
    },
    /// List the built-in sample scenarios
    Scenarios,
    /// List engagement types and their framework emphasis
    Engagements,
    /// Manage the generated-brief cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Delete every cached brief
    Clear,
}

#[derive(Args, Debug, Default)]
pub struct BriefArgs {
    /// Engagement type, by slug (strategy, process, operations, org-design, mna) or label
    #[arg(short, long)]
    pub engagement: Option<EngagementType>,

    #[arg(short, long)]
    pub industry: Option<String>,

    /// The business problem to analyze
    #[arg(short, long)]
    pub challenge: Option<String>,

    #[arg(long)]
    pub constraints: Option<String>,

    /// Start from a sample scenario; other flags override its fields
    #[arg(short, long)]
    pub scenario: Option<String>,

    /// Save the brief (.txt, .md or .docx)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Copy the brief to the clipboard
    #[arg(long, action = ArgAction::SetTrue)]
    pub copy: bool,

    /// Neither read nor write the brief cache
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_cache: bool,

    /// Print the retrieval query and prompts instead of calling the model
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,
}

impl BriefArgs {
    pub fn to_challenge(&self) -> Result<BusinessChallenge> {
        let mut challenge = match &self.scenario {
            Some(name) => find_scenario(name)?.to_challenge(),
            None => BusinessChallenge::default(),
        };
        if let Some(engagement) = self.engagement {
            challenge.engagement_type = engagement;
        }
        if let Some(industry) = &self.industry {
            challenge.industry = industry.clone();
        }
        if let Some(text) = &self.challenge {
            challenge.challenge = text.clone();
        }
        if let Some(constraints) = &self.constraints {
            challenge.constraints = Some(constraints.clone());
        }
        Ok(challenge)
    }
}

/// Config is read on first use so the static listings work even when
/// `.env` is broken.
pub struct CliApp {
    load_config: fn() -> Result<Config>,
    config: OnceLock<Config>,
    cache: BriefCache,
}

impl CliApp {
    pub fn new() -> Result<Self> {
        Ok(Self::with_config_loader(
            Config::load,
            BriefCache::new(BriefCache::default_path()),
        ))
    }

    pub fn with_config_loader(load_config: fn() -> Result<Config>, cache: BriefCache) -> Self {
        Self {
            load_config,
            config: OnceLock::new(),
            cache,
        }
    }

    pub fn config(&self) -> Result<&Config> {
        if let Some(config) = self.config.get() {
            return Ok(config);
        }
        let loaded = (self.load_config)()?;
        Ok(self.config.get_or_init(|| loaded))
    }

    pub async fn run(&self, cli: Cli) -> Result<()> {
        match cli.command.unwrap_or(Command::Interactive) {
            Command::Interactive => interactive::run(self).await,
            Command::Brief(args) => self.handle_brief(&args).await,
            Command::Index { rebuild } => self.handle_index(rebuild).await,
            Command::Search { k, query } => self.handle_search(&query.join(" "), k).await,
            Command::Scenarios => {
                render::print_scenarios();
                Ok(())
            }
            Command::Engagements => {
                render::print_engagements();
                Ok(())
            }
            Command::Cache {
                action: CacheAction::Clear,
            } => self.handle_cache_clear(),
        }
    }

    pub fn knowledge_service(&self) -> Result<KnowledgeService> {
        let config = self.config()?;
        KnowledgeService::from_config(config, embedding_provider(config))
    }

    /// Knowledge base loaded (or built on first use) plus the configured model.
    pub async fn consulting_service(&self) -> Result<ConsultingService> {
        let config = self.config()?;
        let generator = completion_provider(config)?;
        let knowledge = self.knowledge_service()?;
        eprintln!("{}", "Loading knowledge base...".dimmed());
        knowledge.ensure_ready().await?;
        Ok(ConsultingService::new(
            knowledge,
            generator,
            config.top_k,
            config.max_tokens,
        ))
    }

    /// Cached brief for this request, if caching is on and one is fresh.
    pub fn cached_brief(&self, challenge: &BusinessChallenge) -> Option<StrategyBrief> {
        let config = self.config().ok()?;
        let key = BriefCache::key_for(challenge, completion_model_name(config));
        match self.cache.load(&key) {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable brief cache");
                None
            }
        }
    }

    pub fn remember_brief(&self, challenge: &BusinessChallenge, brief: &StrategyBrief) {
        let key = BriefCache::key_for(challenge, &brief.model);
        if let Err(e) = self.cache.store(&key, brief) {
            tracing::warn!(error = %e, "could not write brief cache");
        }
    }

    async fn handle_brief(&self, args: &BriefArgs) -> Result<()> {
        let challenge = args.to_challenge()?;
        challenge.validate()?;

        if args.dry_run {
            return self.handle_dry_run(&challenge).await;
        }

        let cached = if args.no_cache {
            None
        } else {
            self.cached_brief(&challenge)
        };
        let from_cache = cached.is_some();
        let brief = match cached {
            Some(brief) => brief,
            None => {
                let service = self.consulting_service().await?;
                eprintln!(
                    "{}",
                    format!(
                        "Analyzing challenge with {} and retrieving relevant frameworks...",
                        service.model_name()
                    )
                    .dimmed()
                );
                let brief = service.generate_brief(&challenge).await?;
                if !args.no_cache {
                    self.remember_brief(&challenge, &brief);
                }
                brief
            }
        };

        render::print_brief(&brief, from_cache);
        if let Some(path) = &args.output {
            save_brief(&brief, path)?;
            println!("{} {}", "Saved to".green(), path.display());
        }
        if args.copy {
            copy_to_clipboard(&brief.content)?;
            println!("{}", "Copied to clipboard.".green());
        }
        Ok(())
    }

    async fn handle_dry_run(&self, challenge: &BusinessChallenge) -> Result<()> {
        let knowledge = self.knowledge_service()?;
        knowledge.ensure_ready().await?;
        let config = self.config()?;
        let prepared = prepare_brief(&knowledge, challenge, config.top_k, config.max_tokens).await?;
        println!("{} {}", "Retrieval query:".green().bold(), prepared.query);
        println!("\n{}\n{}", "System prompt:".green().bold(), prepared.request.system);
        println!("\n{}\n{}", "User prompt:".green().bold(), prepared.request.user);
        Ok(())
    }

    async fn handle_index(&self, rebuild: bool) -> Result<()> {
        let knowledge = self.knowledge_service()?;
        eprintln!(
            "{}",
            format!(
                "Indexing framework documents in {}...",
                knowledge.knowledge_base_path().display()
            )
            .dimmed()
        );
        let report = if rebuild {
            knowledge.rebuild().await?
        } else {
            knowledge.build_knowledge_base().await?
        };
        render::print_index_report(&report);
        Ok(())
    }

    async fn handle_search(&self, query: &str, k: usize) -> Result<()> {
        let knowledge = self.knowledge_service()?;
        knowledge.ensure_ready().await?;
        let frameworks = knowledge.get_relevant_frameworks(query, k.max(1)).await?;
        render::print_frameworks(query, &frameworks);
        Ok(())
    }

    fn handle_cache_clear(&self) -> Result<()> {
        if self.cache.clear()? {
            println!("{} {}", "Cache cleared:".green(), self.cache.path().display());
        } else {
            println!("{}", "Cache already empty.".yellow());
        }
        Ok(())
    }
}
