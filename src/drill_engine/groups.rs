//! Group files on disk and interactive group selection.
//!
//! Each group is stored as `bld_pairs_<label>.csv` with a `letter_pair,image`
//! header. Selecting groups merges their entries into one drill set.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::drill_engine::{
    comparator::is_cancel,
    console::Console,
    error::{DrillError, Result},
    models::{AssociationEntry, Group, GroupName},
};

const FILE_PREFIX: &str = "bld_pairs_";
const FILE_SUFFIX: &str = ".csv";

/// Typed at the group prompt to leave the program.
pub const EXIT_SENTINEL: &str = "exit";

#[derive(Debug, Serialize, Deserialize)]
struct GroupRow {
    letter_pair: String,
    image: String,
}

pub fn group_file_name(name: GroupName) -> String {
    format!("{FILE_PREFIX}{name}{FILE_SUFFIX}")
}

/// Write one CSV per group into `dir`, creating it if needed.
///
/// Fails before touching the disk if two groups map to the same file, e.g. a
/// sheet row `Z` next to the deferred group.
pub fn write_groups(dir: &Path, groups: &[Group]) -> Result<Vec<PathBuf>> {
    let mut claimed: HashMap<String, GroupName> = HashMap::with_capacity(groups.len());
    for group in groups {
        let file_name = group_file_name(group.name);
        if let Some(prev) = claimed.insert(file_name.clone(), group.name) {
            return Err(DrillError::GroupFileCollision(
                format!("{prev:?} and {:?}", group.name),
                file_name,
            ));
        }
    }

    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(groups.len());
    for group in groups {
        let path = dir.join(group_file_name(group.name));
        let mut writer = csv::Writer::from_path(&path)?;
        for entry in &group.entries {
            writer.serialize(GroupRow {
                letter_pair: entry.key.clone(),
                image: entry.reference.clone(),
            })?;
        }
        writer.flush()?;
        debug!(path = %path.display(), entries = group.len(), "Group file written");
        written.push(path);
    }
    info!(dir = %dir.display(), groups = written.len(), "Group files written");
    Ok(written)
}

/// Group files found in `dir`, keyed by group name.
pub fn discover_groups(dir: &Path) -> Result<BTreeMap<GroupName, PathBuf>> {
    if !dir.is_dir() {
        return Err(DrillError::MissingGroupDir(dir.to_path_buf()));
    }
    let mut found = BTreeMap::new();
    for dir_entry in fs::read_dir(dir)? {
        let path = dir_entry?.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else { continue };
        let Some(label) = file_name
            .strip_prefix(FILE_PREFIX)
            .and_then(|rest| rest.strip_suffix(FILE_SUFFIX))
        else {
            continue;
        };
        match GroupName::parse(label) {
            Some(name) => {
                found.insert(name, path);
            }
            None => debug!(file = file_name, "Ignoring file with unrecognised group label"),
        }
    }
    Ok(found)
}

/// Read the entries of one group file, trimming both columns.
pub fn load_group_file(path: &Path) -> Result<Vec<AssociationEntry>> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut entries = Vec::new();
    for row in reader.deserialize::<GroupRow>() {
        let row = row?;
        entries.push(AssociationEntry::new(row.letter_pair.trim(), row.image.trim()));
    }
    Ok(entries)
}

/// Load several group files in order. Duplicate keys resolve at session
/// construction, where the later file wins.
pub fn load_entries<'a, I>(paths: I) -> Result<Vec<AssociationEntry>>
where
    I: IntoIterator<Item = &'a Path>,
{
    let mut entries = Vec::new();
    for path in paths {
        entries.extend(load_group_file(path)?);
    }
    Ok(entries)
}

/// What the learner typed at the group prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Exit,
    /// Known groups in the order typed, without repeats.
    Groups(Vec<GroupName>),
    /// Nothing typed matched an available group.
    Invalid,
}

/// Parse a space-separated, case-insensitive list of group labels.
///
/// Unknown labels are dropped; the selection is `Invalid` only when none
/// of the labels is available. `quit` leaves just like `exit`, which also
/// covers a closed input stream.
pub fn parse_selection<'a, I>(input: &str, available: I) -> Selection
where
    I: IntoIterator<Item = &'a GroupName>,
{
    if input.trim().eq_ignore_ascii_case(EXIT_SENTINEL) || is_cancel(input) {
        return Selection::Exit;
    }
    let available: Vec<&GroupName> = available.into_iter().collect();
    let mut picked: Vec<GroupName> = Vec::new();
    for name in input.split_whitespace().filter_map(GroupName::parse) {
        if available.contains(&&name) && !picked.contains(&name) {
            picked.push(name);
        }
    }
    if picked.is_empty() {
        Selection::Invalid
    } else {
        Selection::Groups(picked)
    }
}

/// Ask until the learner picks at least one available group or exits.
///
/// Returns `None` on exit.
pub fn prompt_selection<C: Console>(
    console: &mut C,
    available: &BTreeMap<GroupName, PathBuf>,
) -> Result<Option<Vec<GroupName>>> {
    loop {
        console.say(&format!("\nAvailable groups: {}", join_labels(available.keys())));
        let input = console.prompt("Select group(s) to drill (space-separated, or 'exit' to quit): ")?;
        match parse_selection(&input, available.keys()) {
            Selection::Exit => return Ok(None),
            Selection::Groups(names) => return Ok(Some(names)),
            Selection::Invalid => console.say("No valid groups selected. Please try again."),
        }
    }
}

/// Comma-separated labels, e.g. for the "Available groups" line.
pub fn join_labels<'a, I>(names: I) -> String
where
    I: IntoIterator<Item = &'a GroupName>,
{
    names.into_iter().map(|n| n.label()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drill_engine::console::ScriptedConsole;

    fn sample_groups() -> Vec<Group> {
        vec![
            Group {
                name: GroupName::Letter('B'),
                entries: vec![AssociationEntry::new("BC", "bic"), AssociationEntry::new("BD", "bed")],
            },
            Group {
                name: GroupName::Deferred,
                entries: vec![AssociationEntry::new("BA", "bat")],
            },
        ]
    }

    #[test]
    fn written_groups_are_discovered_and_loaded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let paths = write_groups(dir.path(), &sample_groups()).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[1].ends_with("bld_pairs_Z.csv"));

        let header = fs::read_to_string(&paths[0]).unwrap();
        assert!(header.starts_with("letter_pair,image\n"));

        let found = discover_groups(dir.path()).unwrap();
        let names: Vec<GroupName> = found.keys().copied().collect();
        assert_eq!(names, [GroupName::Letter('B'), GroupName::Deferred]);

        let entries = load_group_file(&found[&GroupName::Letter('B')]).unwrap();
        assert_eq!(entries, sample_groups()[0].entries);
    }

    #[test]
    fn letter_z_group_clashing_with_deferred_is_refused() {
        use crate::drill_engine::{partition, PartitionOptions, RawTable};

        let sheet = RawTable::new(vec!["A".into(), "B".into(), "Y".into()])
            .with_row("Z", &["zap", "zeb", "zoy"]);
        let groups = partition(&sheet, &PartitionOptions::default());
        assert_eq!(groups.len(), 2);

        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("groups");
        let err = write_groups(&out, &groups).err();
        match err {
            Some(DrillError::GroupFileCollision(_, file)) => assert_eq!(file, "bld_pairs_Z.csv"),
            other => panic!("expected a file collision, got {other:?}"),
        }
        assert!(!out.exists());
    }

    #[test]
    fn discovery_skips_foreign_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join("bld_pairs_long.csv"), "letter_pair,image\n").unwrap();
        assert!(discover_groups(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_dir_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = discover_groups(&dir.path().join("nope")).err();
        assert!(matches!(err, Some(DrillError::MissingGroupDir(_))));
    }

    #[test]
    fn load_trims_cells() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bld_pairs_C.csv");
        fs::write(&path, "letter_pair,image\n CD , cod \n").unwrap();
        assert_eq!(load_group_file(&path).unwrap(), vec![AssociationEntry::new("CD", "cod")]);
    }

    #[test]
    fn selection_is_case_insensitive_and_filters_unknown() {
        let available = [GroupName::Letter('B'), GroupName::Letter('C'), GroupName::Deferred];
        assert_eq!(
            parse_selection("b z q c b", &available),
            Selection::Groups(vec![GroupName::Letter('B'), GroupName::Deferred, GroupName::Letter('C')])
        );
        assert_eq!(parse_selection("q x", &available), Selection::Invalid);
        assert_eq!(parse_selection("   ", &available), Selection::Invalid);
        assert_eq!(parse_selection("EXIT", &available), Selection::Exit);
        assert_eq!(parse_selection("quit", &available), Selection::Exit);
    }

    #[test]
    fn prompt_selection_retries_until_valid() {
        let available: BTreeMap<GroupName, PathBuf> = [
            (GroupName::Letter('B'), PathBuf::from("b.csv")),
            (GroupName::Deferred, PathBuf::from("z.csv")),
        ]
        .into_iter()
        .collect();
        let mut console = ScriptedConsole::new(["k", "z"]);
        let picked = prompt_selection(&mut console, &available).unwrap();
        assert_eq!(picked, Some(vec![GroupName::Deferred]));
        assert_eq!(console.prompts.len(), 2);
        assert!(console.said.contains(&"No valid groups selected. Please try again.".to_string()));
        assert_eq!(console.said[0], "\nAvailable groups: B, Z");

        let mut console = ScriptedConsole::new(["exit"]);
        assert_eq!(prompt_selection(&mut console, &available).unwrap(), None);
    }

    #[test]
    fn labels_join_in_order() {
        let names = [GroupName::Letter('B'), GroupName::Deferred];
        assert_eq!(join_labels(&names), "B, Z");
    }
}
