//! Credential file loading and round-robin addressing

use std::path::Path;

use common::Secret;
use tracing::info;

use crate::error::{Error, Result};

/// Label for the account at zero-based `index`.
pub fn label_for(index: usize) -> String {
    format!("account_{}", index + 1)
}

/// One credentialed account.
#[derive(Debug, Clone)]
pub struct Account {
    pub label: String,
    pub token: Secret<String>,
}

/// Ordered, non-empty, immutable set of accounts.
#[derive(Debug, Clone)]
pub struct AccountSet {
    accounts: Vec<Account>,
}

impl AccountSet {
    /// Build a set from file contents: one token per line, blank lines and
    /// surrounding whitespace ignored.
    pub fn parse(contents: &str) -> Result<Self> {
        let accounts: Vec<Account> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(i, token)| Account {
                label: label_for(i),
                token: Secret::new(token.to_string()),
            })
            .collect();

        if accounts.is_empty() {
            return Err(Error::NoCredentials(
                "credential file has no non-blank lines".into(),
            ));
        }
        Ok(Self { accounts })
    }

    /// Read and parse the credentials file.
    pub async fn load(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::Io(format!("reading credential file {}: {e}", path.display())))?;
        let set = Self::parse(&contents).map_err(|e| match e {
            Error::NoCredentials(_) => {
                Error::NoCredentials(format!("{} has no non-blank lines", path.display()))
            }
            other => other,
        })?;
        info!(path = %path.display(), accounts = set.len(), "loaded credentials");
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Always false: an empty set cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Account at `index`, wrapping modulo the set size.
    pub fn get(&self, index: usize) -> &Account {
        &self.accounts[index % self.accounts.len()]
    }

    /// Resolve a label such as `account_2` to its index.
    pub fn index_of(&self, label: &str) -> Result<usize> {
        self.accounts
            .iter()
            .position(|a| a.label == label)
            .ok_or_else(|| {
                Error::UnknownAccount(format!(
                    "{label} (have account_1..account_{})",
                    self.accounts.len()
                ))
            })
    }

    /// Round-robin successor of `index`.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.accounts.len()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.accounts.iter().map(|a| a.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_file_order() {
        let set = AccountSet::parse("tok-a\ntok-b\ntok-c\n").unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(
            set.labels().collect::<Vec<_>>(),
            vec!["account_1", "account_2", "account_3"]
        );
        assert_eq!(set.get(0).token.expose(), "tok-a");
        assert_eq!(set.get(2).token.expose(), "tok-c");
    }

    #[test]
    fn blank_lines_and_whitespace_are_ignored() {
        let set = AccountSet::parse("\n  tok-a  \n\n\t\ntok-b\r\n   \n").unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).token.expose(), "tok-a");
        assert_eq!(set.get(1).label, "account_2");
        assert_eq!(set.get(1).token.expose(), "tok-b");
    }

    #[test]
    fn empty_contents_are_rejected() {
        assert!(matches!(
            AccountSet::parse(""),
            Err(Error::NoCredentials(_))
        ));
        assert!(matches!(
            AccountSet::parse(" \n\n \t\n"),
            Err(Error::NoCredentials(_))
        ));
    }

    #[test]
    fn rotation_wraps_around() {
        let set = AccountSet::parse("a\nb\nc").unwrap();
        assert_eq!(set.next_index(0), 1);
        assert_eq!(set.next_index(1), 2);
        assert_eq!(set.next_index(2), 0);
    }

    #[test]
    fn n_rotations_return_to_start() {
        for n in 1..=5 {
            let contents: Vec<String> = (0..n).map(|i| format!("tok-{i}")).collect();
            let set = AccountSet::parse(&contents.join("\n")).unwrap();
            for start in 0..n {
                let mut index = start;
                for _ in 0..n {
                    index = set.next_index(index);
                }
                assert_eq!(index, start, "n={n} start={start}");
            }
        }
    }

    #[test]
    fn single_account_rotates_onto_itself() {
        let set = AccountSet::parse("only").unwrap();
        assert_eq!(set.next_index(0), 0);
    }

    #[test]
    fn index_of_resolves_labels() {
        let set = AccountSet::parse("a\nb").unwrap();
        assert_eq!(set.index_of("account_1").unwrap(), 0);
        assert_eq!(set.index_of("account_2").unwrap(), 1);
        let err = set.index_of("account_3").unwrap_err();
        assert!(err.to_string().contains("account_3"), "got: {err}");
    }

    #[test]
    fn debug_output_redacts_tokens() {
        let set = AccountSet::parse("super-secret-token").unwrap();
        let debug = format!("{set:?}");
        assert!(!debug.contains("super-secret-token"), "got: {debug}");
        assert!(debug.contains("account_1"));
    }

    #[tokio::test]
    async fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.txt");
        tokio::fs::write(&path, "first\n\nsecond\n").await.unwrap();

        let set = AccountSet::load(&path).await.unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(1).token.expose(), "second");
    }

    #[tokio::test]
    async fn load_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = AccountSet::load(&dir.path().join("missing.txt")).await;
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn load_blank_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.txt");
        tokio::fs::write(&path, "\n   \n").await.unwrap();

        let err = AccountSet::load(&path).await.unwrap_err();
        assert!(matches!(err, Error::NoCredentials(_)));
        assert!(err.to_string().contains("token.txt"), "got: {err}");
    }

    #[test]
    fn errors_convert_to_config_errors() {
        let err: common::Error = Error::UnknownAccount("account_9".into()).into();
        assert!(matches!(err, common::Error::Config(_)));
    }
}
