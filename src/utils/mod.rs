use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extension of single-alias export files
pub const EXPORT_EXTENSION: &str = ".out";

/// Role tags used in export file names (`{env}_{section}_{role}_{alias}.out`)
pub const ROLE_TAGS: [&str; 2] = ["SC", "PC"];

/// Header and marker texts that share the alias column but are not aliases
pub const NON_ALIAS_CELLS: [&str; 9] = [
    "alias",
    "no existen",
    "# signer certificates",
    "# personal certificates",
    "# personal certificate requests",
    "# custom properties",
    "issued by",
    "issued to",
    "keystore provider: ibmjce",
];

/// Whether an alias-column cell names a certificate
pub fn is_certificate_alias(cell: Option<&str>) -> bool {
    match cell.map(str::trim) {
        Some(alias) if !alias.is_empty() => {
            let lower = alias.to_lowercase();
            !NON_ALIAS_CELLS.contains(&lower.as_str())
        }
        _ => false,
    }
}

/// Resolve an environment folder under `base`, ignoring case.
/// Falls back to `base/<environment>` when no folder matches.
pub fn environment_dir(base: &Path, environment: &str) -> PathBuf {
    WalkDir::new(base)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .find(|e| {
            e.file_name()
                .to_str()
                .is_some_and(|name| name.eq_ignore_ascii_case(environment))
        })
        .map(|e| e.into_path())
        .unwrap_or_else(|| base.join(environment))
}

/// Today's date in local time
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_certificate_alias() {
        assert!(is_certificate_alias(Some("mysite")));
        assert!(is_certificate_alias(Some("  Root CA ")));
        assert!(!is_certificate_alias(Some("Alias")));
        assert!(!is_certificate_alias(Some("# Personal Certificates")));
        assert!(!is_certificate_alias(Some("Keystore provider: IBMJCE")));
        assert!(!is_certificate_alias(Some("   ")));
        assert!(!is_certificate_alias(None));
    }

    #[test]
    fn test_environment_dir_case_insensitive() {
        let base = tempfile::tempdir().unwrap();
        std::fs::create_dir(base.path().join("camaraprod")).unwrap();

        assert_eq!(
            environment_dir(base.path(), "CAMARAPROD"),
            base.path().join("camaraprod")
        );
        assert_eq!(
            environment_dir(base.path(), "CAMARATEST"),
            base.path().join("CAMARATEST")
        );
    }
}
