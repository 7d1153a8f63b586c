//! CLI binary for contact directories: create, browse, and validate organization trees.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use contact_core::config::ContactConfig;
use contact_core::content::{
    ContentKind, DirectoryData, HeldPositionData, OrganizationData, PersonData, PositionData,
};
use contact_core::tree::ContactTree;
use contact_core::vocabulary::{Term, VocabularyKind};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "contact", about = "Organization directory manager")]
struct Cli {
    /// Project root directory (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new directory store
    Init {
        /// Id of the directory
        #[arg(long, default_value = "directory")]
        id: String,

        /// Title of the directory
        #[arg(long, default_value = "Directory")]
        title: String,

        /// Seed with the sample military directory instead of an empty one
        #[arg(long, conflicts_with_all = ["id", "title"])]
        sample: bool,

        /// Overwrite an existing .contact/directory.json
        #[arg(long)]
        force: bool,
    },

    /// Add an organization inside a directory or another organization
    AddOrganization {
        /// Containing directory or organization id
        parent: String,
        /// New organization id
        id: String,
        #[arg(long)]
        title: String,
        /// Organization type (top level) or level (nested) token
        #[arg(long = "type")]
        organization_type: String,
    },

    /// Add a person inside a directory
    AddPerson {
        /// Containing directory id
        parent: String,
        /// New person id
        id: String,
        #[arg(long)]
        lastname: String,
        #[arg(long)]
        firstname: Option<String>,
        /// Honorific or rank shown before the name
        #[arg(long)]
        person_title: Option<String>,
        /// Birthday as YYYY-MM-DD
        #[arg(long)]
        birthday: Option<String>,
    },

    /// Add a position inside an organization
    AddPosition {
        /// Owning organization id
        organization: String,
        /// New position id
        id: String,
        #[arg(long)]
        title: String,
        /// Position type token
        #[arg(long = "type")]
        position_type: String,
    },

    /// Assign a person to a position or an organization
    AddHeldPosition {
        /// Person id
        person: String,
        /// New held position id
        id: String,
        /// Id of the position (or organization) held
        #[arg(long)]
        position: String,
    },

    /// Add a term to a directory vocabulary
    AddTerm {
        /// Directory id
        directory: String,
        /// Vocabulary: position_types, organization_types, organization_levels
        vocabulary: String,
        /// Human-readable name
        name: String,
        /// Stored token (derived from the name if omitted)
        #[arg(long)]
        token: Option<String>,
    },

    /// Show titles, organization chain and path of a node
    Show {
        /// Content id
        id: String,
    },

    /// Print the content tree
    Tree {
        /// Start from this node instead of the top level
        id: Option<String>,
    },

    /// Show directory statistics
    Info,

    /// Validate tree integrity (dangling parents, wrong containers, unknown terms)
    Validate,

    /// Remove a node and everything inside it
    Remove {
        /// Content id
        id: String,
    },
}

fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let project_root = get_project_root(&cli)?;

    match cli.command {
        Commands::Init {
            id,
            title,
            sample,
            force,
        } => cmd_init(&project_root, &id, &title, sample, force),
        Commands::AddOrganization {
            parent,
            id,
            title,
            organization_type,
        } => mutate(&project_root, |tree| {
            tree.add_organization(&parent, &id, OrganizationData::new(title, organization_type))?;
            eprintln!("Added organization '{}'", id);
            Ok(())
        }),
        Commands::AddPerson {
            parent,
            id,
            lastname,
            firstname,
            person_title,
            birthday,
        } => {
            let birthday = birthday.as_deref().map(parse_date).transpose()?;
            mutate(&project_root, |tree| {
                let person = PersonData {
                    lastname,
                    firstname,
                    person_title,
                    birthday,
                };
                tree.add_person(&parent, &id, person)?;
                eprintln!("Added person '{}'", id);
                Ok(())
            })
        }
        Commands::AddPosition {
            organization,
            id,
            title,
            position_type,
        } => mutate(&project_root, |tree| {
            tree.add_position(&organization, &id, PositionData::new(title, position_type))?;
            eprintln!("Added position '{}'", id);
            Ok(())
        }),
        Commands::AddHeldPosition {
            person,
            id,
            position,
        } => mutate(&project_root, |tree| {
            tree.add_held_position(&person, &id, HeldPositionData::new(position))?;
            eprintln!("Added held position '{}'", id);
            Ok(())
        }),
        Commands::AddTerm {
            directory,
            vocabulary,
            name,
            token,
        } => {
            let kind: VocabularyKind = vocabulary.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let term = match token {
                Some(token) => Term::new(name, token),
                None => Term::from_name(name),
            };
            mutate(&project_root, |tree| {
                let token = term.token.clone();
                if tree.add_term(&directory, kind, term)? {
                    eprintln!("Added term '{}' to {}", token, kind);
                } else {
                    eprintln!("Term '{}' already in {}", token, kind);
                }
                Ok(())
            })
        }
        Commands::Show { id } => cmd_show(&project_root, &id),
        Commands::Tree { id } => cmd_tree(&project_root, id.as_deref()),
        Commands::Info => cmd_info(&project_root),
        Commands::Validate => cmd_validate(&project_root),
        Commands::Remove { id } => mutate(&project_root, |tree| {
            let removed = tree.remove(&id)?;
            eprintln!("Removed {} node(s)", removed.len());
            Ok(())
        }),
    }
}

fn parse_date(s: &str) -> Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", s))
}

/// Load the tree with config applied.
fn load_tree(project_root: &Path, config: &ContactConfig) -> Result<ContactTree> {
    if !contact_core::storage::contact_exists(project_root) {
        anyhow::bail!("No directory found. Run `contact init` first.");
    }
    let mut tree = contact_core::storage::load(project_root)?;
    tree.enforce_vocabularies = config.validation.enforce_vocabularies;
    tracing::debug!(nodes = tree.len(), "loaded directory");
    Ok(tree)
}

/// Load, apply `edit`, refresh metadata and save.
fn mutate(project_root: &Path, edit: impl FnOnce(&mut ContactTree) -> Result<()>) -> Result<()> {
    let config = ContactConfig::load(project_root)?;
    let mut tree = load_tree(project_root, &config)?;
    edit(&mut tree)?;
    tree.refresh_metadata();
    contact_core::storage::save_with_config(project_root, &tree, &config.storage)
}

fn cmd_init(project_root: &Path, id: &str, title: &str, sample: bool, force: bool) -> Result<()> {
    if contact_core::storage::contact_exists(project_root) && !force {
        anyhow::bail!(".contact/directory.json already exists. Use --force to overwrite.");
    }
    let config = ContactConfig::load(project_root)?;

    let mut tree = if sample {
        contact_core::sample::military_directory()?
    } else {
        let mut tree = ContactTree::new();
        tree.add_directory(id, DirectoryData::new(title))?;
        tree
    };
    tree.refresh_metadata();
    contact_core::storage::save_with_config(project_root, &tree, &config.storage)?;

    let _ = contact_core::storage::ensure_gitignore(project_root);

    eprintln!("Directory initialized!");
    eprintln!("  Nodes: {}", tree.len());
    eprintln!("  Saved to: .contact/directory.json");
    Ok(())
}

fn cmd_show(project_root: &Path, id: &str) -> Result<()> {
    let config = ContactConfig::load(project_root)?;
    let tree = load_tree(project_root, &config)?;
    let node = tree.node(id)?;

    println!("Id: {}", node.id);
    println!("Kind: {}", node.kind());
    println!("Title: {}", tree.title(id)?);
    println!("Full title: {}", tree.get_full_title_with(id, &config.titles)?);
    println!("Path: /{}", tree.physical_path(id)?.join("/"));

    let chain = tree.get_organizations_titles(id)?;
    if !chain.is_empty() {
        println!("Organizations: {}", chain.join(&config.titles.organization_separator));
    }
    if let Some(person) = node.as_person()
        && let Some(birthday) = person.birthday
    {
        println!("Birthday: {}", birthday);
    }
    if let Some(org) = node.as_organization() {
        println!("Type: {}", org.organization_type);
    }
    if let Some(pos) = node.as_position() {
        println!("Type: {}", pos.position_type);
    }
    if let Some(directory) = node.as_directory() {
        for kind in VocabularyKind::ALL {
            let tokens: Vec<&str> = directory
                .terms(kind)
                .iter()
                .map(|t| t.token.as_str())
                .collect();
            println!("{}: {}", kind, tokens.join(", "));
        }
    }
    let allowed: Vec<&str> = contact_core::policy::allowed_children(Some(node.kind()))
        .into_iter()
        .map(ContentKind::as_str)
        .collect();
    if !allowed.is_empty() {
        println!("Can contain: {}", allowed.join(", "));
    }
    let children: Vec<&str> = tree.children(id).iter().map(|c| c.id.as_str()).collect();
    if !children.is_empty() {
        println!("Children: {}", children.join(", "));
    }
    let referrers: Vec<&str> = tree.referrers(id).iter().map(|r| r.id.as_str()).collect();
    if !referrers.is_empty() {
        println!("Held by: {}", referrers.join(", "));
    }

    Ok(())
}

fn cmd_tree(project_root: &Path, id: Option<&str>) -> Result<()> {
    let config = ContactConfig::load(project_root)?;
    let tree = load_tree(project_root, &config)?;
    match id {
        Some(id) => print!("{}", contact_core::outline::format_outline(&tree, id)?),
        None => print!("{}", contact_core::outline::format_forest(&tree)),
    }
    Ok(())
}

fn cmd_info(project_root: &Path) -> Result<()> {
    let config = ContactConfig::load(project_root)?;
    let tree = load_tree(project_root, &config)?;
    let m = &tree.metadata;

    println!("Format version: {}", tree.version);
    println!("Created: {}", tree.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Updated: {}", tree.updated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Directories: {}", m.directories);
    println!("Organizations: {}", m.organizations);
    println!("Persons: {}", m.persons);
    println!("Positions: {}", m.positions);
    println!("Held positions: {}", m.held_positions);
    println!("Deepest organization chain: {}", m.max_organization_depth);
    Ok(())
}

fn cmd_validate(project_root: &Path) -> Result<()> {
    let config = ContactConfig::load(project_root)?;
    let tree = load_tree(project_root, &config)?;
    let issues = contact_core::validate::validate(&tree);

    if issues.is_empty() {
        println!("Directory is valid ({} nodes).", tree.len());
        return Ok(());
    }
    for issue in &issues {
        println!("  - {}", issue);
    }
    anyhow::bail!("{} integrity issue(s) found", issues.len());
}
