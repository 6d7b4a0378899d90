use crate::entry::DirectoryEntry;
use crate::namer::destination_name;
use crate::rules::{MatchRule, NamingRule, RuleError};
use crate::selector::{scan_directory, select_entries};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub source_dir: PathBuf,
    pub dest_dir: Option<PathBuf>,
    pub match_rule: MatchRule,
    pub naming_rule: NamingRule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanEntry {
    pub source: DirectoryEntry,
    pub destination: PathBuf,
    pub destination_name: String,
    pub changed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BatchStats {
    pub scanned_entries: usize,
    pub skipped_non_files: usize,
    pub matched: usize,
    pub skipped_unmatched: usize,
    pub planned: usize,
    pub unchanged: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPlan {
    pub source_dir: PathBuf,
    pub dest_dir: Option<PathBuf>,
    pub entries: Vec<PlanEntry>,
    pub stats: BatchStats,
}

pub fn generate_plan(options: &PlanOptions) -> Result<BatchPlan> {
    if !options.source_dir.is_dir() {
        anyhow::bail!("フォルダが存在しません: {}", options.source_dir.display());
    }

    let mut stats = BatchStats::default();
    let scanned = scan_directory(&options.source_dir, &mut stats)?;
    let selected = select_entries(&scanned, &options.match_rule);
    stats.matched = selected.len();
    stats.skipped_unmatched = scanned.len() - selected.len();

    if let NamingRule::Counter { start, .. } = &options.naming_rule {
        if start.checked_add(selected.len()).is_none() {
            return Err(RuleError::CounterOverflow {
                start: *start,
                count: selected.len(),
            }
            .into());
        }
    }

    let target_dir = options.dest_dir.as_deref().unwrap_or(&options.source_dir);
    let mut counter = options.naming_rule.counter_start();
    let mut entries = Vec::with_capacity(selected.len());
    let mut planned_destinations = HashSet::<PathBuf>::new();

    for source in selected {
        let name = destination_name(&source, &options.naming_rule, &mut counter);
        let destination = target_dir.join(&name);
        let changed = destination != source.path;

        if changed && !planned_destinations.insert(destination.clone()) {
            anyhow::bail!("重複した移動先が含まれています: {}", destination.display());
        }
        if !changed {
            stats.unchanged += 1;
        }

        stats.planned += 1;
        entries.push(PlanEntry {
            source,
            destination,
            destination_name: name,
            changed,
        });
    }

    Ok(BatchPlan {
        source_dir: options.source_dir.clone(),
        dest_dir: options.dest_dir.clone(),
        entries,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::{generate_plan, PlanOptions};
    use crate::rules::{compile_pattern, MatchRule, NamingRule};
    use std::fs::File;
    use std::path::Path;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        File::create(path).expect("file must be creatable");
    }

    fn counter_options(dir: &Path, exts: &[&str], prefix: &str, start: usize) -> PlanOptions {
        let exts: Vec<String> = exts.iter().map(ToString::to_string).collect();
        PlanOptions {
            source_dir: dir.to_path_buf(),
            dest_dir: None,
            match_rule: MatchRule::extensions(&exts).expect("rule"),
            naming_rule: NamingRule::Counter {
                prefix: prefix.to_string(),
                start,
            },
        }
    }

    fn substitution_options(
        dir: &Path,
        dest: &Path,
        pattern: &str,
        replacement: Option<&str>,
    ) -> PlanOptions {
        let pattern = compile_pattern(pattern).expect("pattern");
        PlanOptions {
            source_dir: dir.to_path_buf(),
            dest_dir: Some(dest.to_path_buf()),
            match_rule: MatchRule::Stem(pattern.clone()),
            naming_rule: NamingRule::Substitution {
                pattern,
                replacement: replacement.map(ToString::to_string),
            },
        }
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp = tempdir().expect("tempdir");
        let options = counter_options(&temp.path().join("missing"), &["py"], "x_", 1);
        let err = generate_plan(&options).expect_err("must fail");
        assert!(err.to_string().contains("フォルダが存在しません"));
    }

    #[test]
    fn counter_plan_numbers_matches_in_name_order() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("b.py"));
        touch(&temp.path().join("a.py"));
        touch(&temp.path().join("c.txt"));

        let plan = generate_plan(&counter_options(temp.path(), &[".py"], "x_", 1)).expect("plan");
        let names: Vec<&str> = plan
            .entries
            .iter()
            .map(|e| e.destination_name.as_str())
            .collect();
        assert_eq!(names, vec!["x_1.py", "x_2.py"]);
        assert_eq!(plan.entries[0].source.name, "a.py");
        assert_eq!(plan.entries[1].source.name, "b.py");
        assert_eq!(plan.stats.matched, 2);
        assert_eq!(plan.stats.skipped_unmatched, 1);
        assert_eq!(plan.stats.planned, 2);
    }

    #[test]
    fn planning_twice_yields_identical_destinations() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("b.py"));
        touch(&temp.path().join("a.py"));

        let options = counter_options(temp.path(), &["py"], "x_", 1);
        let first = generate_plan(&options).expect("first plan");
        let second = generate_plan(&options).expect("second plan");
        let names = |plan: &super::BatchPlan| -> Vec<String> {
            plan.entries
                .iter()
                .map(|e| e.destination_name.clone())
                .collect()
        };
        assert_eq!(names(&first), names(&second));
    }

    #[test]
    fn counter_plan_starts_at_the_configured_value() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("a.py"));
        touch(&temp.path().join("b.py"));
        touch(&temp.path().join("c.py"));

        let plan = generate_plan(&counter_options(temp.path(), &["py"], "x_", 5)).expect("plan");
        let names: Vec<&str> = plan
            .entries
            .iter()
            .map(|e| e.destination_name.as_str())
            .collect();
        assert_eq!(names, vec!["x_5.py", "x_6.py", "x_7.py"]);
    }

    #[test]
    fn counter_start_too_large_for_the_matches_is_rejected() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("a.py"));

        let options = counter_options(temp.path(), &["py"], "x_", usize::MAX);
        let err = generate_plan(&options).expect_err("must fail");
        assert!(err.to_string().contains("連番が上限を超えます"));
    }

    #[test]
    fn substitution_plan_rewrites_matching_stems() {
        let temp = tempdir().expect("tempdir");
        let dest = temp.path().join("out");
        touch(&temp.path().join("ETH_1.jpg"));
        touch(&temp.path().join("btc_1.jpg"));

        let options = substitution_options(temp.path(), &dest, "eth_", Some("eth_l2_"));
        let plan = generate_plan(&options).expect("plan");
        assert_eq!(plan.entries.len(), 1);
        assert_eq!(plan.entries[0].destination_name, "eth_l2_1.jpg");
        assert_eq!(plan.entries[0].destination, dest.join("eth_l2_1.jpg"));
        assert!(plan.entries[0].changed);
    }

    #[test]
    fn relocation_without_replacement_keeps_names() {
        let temp = tempdir().expect("tempdir");
        let dest = temp.path().join("out");
        touch(&temp.path().join("eth_1.jpg"));
        touch(&temp.path().join("eth_2.jpg"));

        let options = substitution_options(temp.path(), &dest, "eth_", None);
        let plan = generate_plan(&options).expect("plan");
        let names: Vec<&str> = plan
            .entries
            .iter()
            .map(|e| e.destination_name.as_str())
            .collect();
        assert_eq!(names, vec!["eth_1.jpg", "eth_2.jpg"]);
        assert!(plan.entries.iter().all(|e| e.changed));
    }

    #[test]
    fn identical_destination_is_marked_unchanged() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("eth_l2_1.jpg"));

        let pattern = compile_pattern("eth_").expect("pattern");
        let options = PlanOptions {
            source_dir: temp.path().to_path_buf(),
            dest_dir: None,
            match_rule: MatchRule::Stem(pattern.clone()),
            naming_rule: NamingRule::Substitution {
                pattern,
                replacement: None,
            },
        };
        let plan = generate_plan(&options).expect("plan");
        assert_eq!(plan.entries.len(), 1);
        assert!(!plan.entries[0].changed);
        assert_eq!(plan.stats.unchanged, 1);
    }

    #[test]
    fn duplicate_destinations_fail_at_plan_time() {
        let temp = tempdir().expect("tempdir");
        touch(&temp.path().join("ab1.txt"));
        touch(&temp.path().join("ab2.txt"));

        let pattern = compile_pattern(r"\d").expect("pattern");
        let options = PlanOptions {
            source_dir: temp.path().to_path_buf(),
            dest_dir: None,
            match_rule: MatchRule::Stem(pattern.clone()),
            naming_rule: NamingRule::Substitution {
                pattern,
                replacement: Some(String::new()),
            },
        };
        let err = generate_plan(&options).expect_err("must fail");
        assert!(err.to_string().contains("重複した移動先が含まれています"));
    }
}
