use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{anyhow, bail, Context};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use oix_crypto::DigestVerifier;
use oix_registry::{ObjectArray, ObjectList, ObjectRegistry, Payload, RegistryConfig, TableStats};
use oix_store::{
    Blob, CommitRecord, EntryMode, InMemoryObjectStore, ObjectStore, TreeEntry, TreeRecord,
};
use oix_types::ObjectId;

use crate::cli::*;

/// Low bits every probe word of a colliding ID has in common.
const SHARED_BITS: u32 = 8;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref(), cli.probes)?;
    match cli.command {
        Command::Stress(args) => cmd_stress(&config, args),
        Command::Collide(args) => cmd_collide(&config, args),
        Command::Walk(args) => cmd_walk(&config, args),
    }
}

/// Read the registry configuration, then apply the command-line override.
pub(crate) fn load_config(path: Option<&Path>, probes: Option<usize>) -> anyhow::Result<RegistryConfig> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            RegistryConfig::from_toml_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => RegistryConfig::default(),
    };
    if let Some(probes) = probes {
        config.probe_count = probes;
        config.validate()?;
    }
    Ok(config)
}

fn cmd_stress(config: &RegistryConfig, args: StressArgs) -> anyhow::Result<()> {
    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    println!("Registering {} random hashes (seed {})", args.count.to_string().bold(), seed.to_string().cyan());
    let start = Instant::now();
    let stats = stress(config, args.count, seed)?;
    println!("{} Every lookup matched ({:.2?})", "✓".green().bold(), start.elapsed());
    print_stats(config, &stats);
    Ok(())
}

fn cmd_collide(config: &RegistryConfig, args: CollideArgs) -> anyhow::Result<()> {
    println!(
        "Registering {} hashes sharing their low {} bits in all {} probe words",
        args.count.to_string().bold(),
        SHARED_BITS,
        config.probe_count
    );
    let stats = collide(config, args.count)?;
    println!("{} All colliding hashes placed", "✓".green().bold());
    print_stats(config, &stats);
    Ok(())
}

fn cmd_walk(config: &RegistryConfig, args: WalkArgs) -> anyhow::Result<()> {
    let store = InMemoryObjectStore::new();
    let head = synthetic_history(&store, args.depth)?;
    println!("Wrote {} objects, head {}", store.len().to_string().bold(), head.short_hex().yellow());

    let mut registry = ObjectRegistry::with_config(config)?;
    let walk = walk_history(&mut registry, &store, head)?;

    println!("\n{}", "Commits".bold());
    for entry in &walk.commits {
        let obj = registry.get(entry.object);
        let message = obj.as_commit().map(|c| c.message.as_str()).unwrap_or_default();
        println!("  {} {:<10} {}", obj.id().short_hex().yellow(), entry.name, message);
    }
    println!("\n{}", "Paths at newest version".bold());
    for entry in &walk.paths {
        println!("  {} {} {}", entry.mode.to_string().dimmed(), registry.get(entry.object).id().short_hex().yellow(), entry.name);
    }
    println!("\nVisited {} objects", walk.visited.to_string().bold());
    print_stats(config, &registry.stats());
    Ok(())
}

fn print_stats(config: &RegistryConfig, stats: &TableStats) {
    let load = if stats.capacity == 0 {
        0.0
    } else {
        stats.len as f64 / stats.capacity as f64
    };
    println!("  Probes:    {}", config.probe_count);
    println!("  Objects:   {}", stats.len);
    println!("  Capacity:  {} (load {:.3})", stats.capacity, load);
    println!("  Grows:     {}", stats.grows.to_string().cyan());
    println!("  Retries:   {}", stats.rebuild_retries.to_string().cyan());
    println!("  Evictions: {}", stats.evictions.to_string().cyan());
}

/// Register `count` seeded random hashes and check that each one finds
/// the object it created.
pub(crate) fn stress(config: &RegistryConfig, count: usize, seed: u64) -> anyhow::Result<TableStats> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut registry = ObjectRegistry::with_config(config)?;
    let mut created = Vec::with_capacity(count);
    for _ in 0..count {
        let id = ObjectId::from_hash(rng.gen());
        created.push((id, registry.lookup_or_create_placeholder(id)));
    }
    for (id, handle) in &created {
        if registry.lookup(id) != Some(*handle) {
            bail!("lookup for {id} did not return its object");
        }
    }
    Ok(registry.stats())
}

fn colliding_id(k: usize, probes: usize) -> ObjectId {
    let words: Vec<u32> = (0..probes as u32)
        .map(|i| ((k as u32) << SHARED_BITS) | i)
        .collect();
    let mut tail = [0u8; 32];
    tail[24..].copy_from_slice(&(k as u64).to_le_bytes());
    ObjectId::with_words(&words, &tail)
}

/// Register `count` hashes that land on the same probe slots until the
/// table outgrows their shared bits.
pub(crate) fn collide(config: &RegistryConfig, count: usize) -> anyhow::Result<TableStats> {
    if count >= 1 << (32 - SHARED_BITS) {
        bail!("at most {} colliding hashes can be generated", (1u64 << (32 - SHARED_BITS)) - 1);
    }
    let mut registry = ObjectRegistry::with_config(config)?;
    let ids: Vec<ObjectId> = (0..count).map(|k| colliding_id(k, config.probe_count)).collect();
    for id in &ids {
        registry.lookup_or_create_placeholder(*id);
    }
    for id in &ids {
        if registry.lookup(id).is_none() {
            bail!("colliding hash {id} was lost");
        }
    }
    Ok(registry.stats())
}

/// Write a linear history of `depth` commits. Every tree holds a shared
/// `README` and a `log.txt` that changes with each commit.
pub(crate) fn synthetic_history(store: &InMemoryObjectStore, depth: usize) -> anyhow::Result<ObjectId> {
    let readme = store.write(&Blob::new(b"synthetic history\n".to_vec()).to_stored_object())?;
    let mut head = None;
    for n in 0..depth {
        let log = store.write(&Blob::new(format!("entry {n}\n").into_bytes()).to_stored_object())?;
        let tree = TreeRecord::new(vec![
            TreeEntry::new(EntryMode::Regular, "README", readme),
            TreeEntry::new(EntryMode::Regular, "log.txt", log),
        ]);
        let tree = store.write(&tree.to_stored_object()?)?;
        let commit = CommitRecord {
            tree,
            parents: head.into_iter().collect(),
            author: "oix".into(),
            message: format!("commit {n}"),
        };
        head = Some(store.write(&commit.to_stored_object()?)?);
    }
    head.ok_or_else(|| anyhow!("history depth must be at least 1"))
}

pub(crate) struct Walk {
    /// Commits from newest to oldest, named relative to `HEAD`.
    pub commits: ObjectArray,
    /// Blobs by path, newest version first, duplicates removed.
    pub paths: ObjectArray,
    pub visited: usize,
}

/// Resolve everything reachable from `head`, newest commit first.
pub(crate) fn walk_history(
    registry: &mut ObjectRegistry,
    store: &dyn ObjectStore,
    head: ObjectId,
) -> anyhow::Result<Walk> {
    let mut seen = ObjectList::new();
    let mut commits = ObjectArray::new();
    let mut paths = ObjectArray::new();
    let mut pending = vec![(head, "HEAD".to_string(), EntryMode::Invalid)];

    while let Some((id, name, mode)) = pending.pop() {
        let handle = registry.resolve_from_store(&id, store, &DigestVerifier)?;
        if seen.contains(handle) {
            continue;
        }
        seen.push_front(handle);

        match registry.get(handle).payload() {
            Payload::Commit(commit) => {
                commits.append(handle, name.clone());
                for (n, parent) in commit.parents.iter().enumerate().rev() {
                    let parent_name = if n == 0 {
                        ancestor_name(&name)
                    } else {
                        format!("{name}^{}", n + 1)
                    };
                    pending.push((*registry.get(*parent).id(), parent_name, EntryMode::Invalid));
                }
                // Pushed last so the tree is visited before any parent.
                pending.push((*registry.get(commit.tree).id(), format!("{name}^{{tree}}"), EntryMode::Directory));
            }
            Payload::Tree(tree) => {
                for item in tree.entries.iter().rev() {
                    pending.push((*registry.get(item.object).id(), item.name.clone(), item.mode));
                }
            }
            Payload::Blob => paths.append_with_mode(handle, name, mode),
            Payload::Tag(tag) => {
                pending.push((*registry.get(tag.target).id(), name, EntryMode::Invalid));
            }
            Payload::Empty => bail!("{id} resolved without content"),
        }
    }

    paths.remove_duplicates();
    Ok(Walk {
        commits,
        paths,
        visited: seen.len(),
    })
}

/// `HEAD` -> `HEAD~1`, `HEAD~1` -> `HEAD~2`.
fn ancestor_name(name: &str) -> String {
    match name.rsplit_once('~') {
        Some((base, n)) => match n.parse::<usize>() {
            Ok(n) => format!("{base}~{}", n + 1),
            Err(_) => format!("{name}~1"),
        },
        None => format!("{name}~1"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_without_file() {
        let config = load_config(None, None).unwrap();
        assert_eq!(config, RegistryConfig::default());
    }

    #[test]
    fn config_file_and_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "probe_count = 3").unwrap();
        let config = load_config(Some(file.path()), None).unwrap();
        assert_eq!(config.probe_count, 3);

        let config = load_config(Some(file.path()), Some(5)).unwrap();
        assert_eq!(config.probe_count, 5);
    }

    #[test]
    fn bad_probe_counts_are_rejected() {
        assert!(load_config(None, Some(1)).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "probe_count = 9").unwrap();
        assert!(load_config(Some(file.path()), None).is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("absent.toml")), None).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }

    #[test]
    fn stress_is_reproducible() {
        let config = RegistryConfig::default();
        let a = stress(&config, 2_000, 7).unwrap();
        let b = stress(&config, 2_000, 7).unwrap();
        assert_eq!(a.len, 2_000);
        assert_eq!(a, b);
    }

    #[test]
    fn collide_forces_growth() {
        for probes in RegistryConfig::MIN_PROBES..=RegistryConfig::MAX_PROBES {
            let config = RegistryConfig { probe_count: probes };
            let stats = collide(&config, 64).unwrap();
            assert_eq!(stats.len, 64);
            assert!(stats.capacity > 1 << SHARED_BITS);
            assert!(stats.grows >= 3);
        }
    }

    #[test]
    fn zero_depth_history_is_an_error() {
        let store = InMemoryObjectStore::new();
        assert!(synthetic_history(&store, 0).is_err());
    }

    #[test]
    fn walk_visits_history_once() {
        let store = InMemoryObjectStore::new();
        let head = synthetic_history(&store, 3).unwrap();
        let mut registry = ObjectRegistry::new();
        let walk = walk_history(&mut registry, &store, head).unwrap();

        let names: Vec<_> = walk.commits.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["HEAD", "HEAD~1", "HEAD~2"]);

        // 3 commits, 3 trees, 3 log blobs, 1 shared README.
        assert_eq!(walk.visited, 10);
        assert_eq!(registry.len(), 10);

        let paths: Vec<_> = walk.paths.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(paths, vec!["README", "log.txt"]);
        let newest_log = walk.paths.get(1).unwrap();
        assert_eq!(newest_log.mode, EntryMode::Regular);
        let expected = Blob::new(b"entry 2\n".to_vec()).to_stored_object().compute_id();
        assert_eq!(registry.get(newest_log.object).id(), &expected);
    }

    #[test]
    fn ancestor_names() {
        assert_eq!(ancestor_name("HEAD"), "HEAD~1");
        assert_eq!(ancestor_name("HEAD~1"), "HEAD~2");
        assert_eq!(ancestor_name("HEAD^2"), "HEAD^2~1");
    }
}
