use crate::entry::DirectoryEntry;
use crate::rules::NamingRule;

pub fn destination_name(entry: &DirectoryEntry, rule: &NamingRule, counter: &mut usize) -> String {
    match rule {
        NamingRule::Counter { prefix, .. } => {
            let name = format!("{}{}{}", prefix, *counter, entry.extension);
            *counter += 1;
            name
        }
        NamingRule::Substitution { pattern, replacement } => {
            let stem = match replacement {
                Some(replacement) => pattern
                    .replace(&entry.stem, replacement.as_str())
                    .into_owned(),
                None => entry.stem.clone(),
            };
            format!("{}{}", stem, entry.extension)
        }
    }
}
