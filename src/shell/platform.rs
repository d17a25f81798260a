//! Platform queries: privileges and account records.

/// Check if running as root.
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}

/// Real user id of this process.
pub fn current_uid() -> Option<u32> {
    #[cfg(unix)]
    {
        // SAFETY: getuid() cannot fail and has no side effects
        Some(unsafe { libc::getuid() })
    }

    #[cfg(not(unix))]
    {
        None
    }
}

/// One parsed `passwd(5)` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswdEntry {
    pub name: String,
    pub uid: u32,
    pub shell: String,
}

/// Parse `passwd(5)` content. Malformed lines are skipped.
pub fn parse_passwd(content: &str) -> Vec<PasswdEntry> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let fields: Vec<&str> = line.split(':').collect();
            if fields.len() != 7 {
                return None;
            }
            Some(PasswdEntry {
                name: fields[0].to_string(),
                uid: fields[2].parse().ok()?,
                shell: fields[6].to_string(),
            })
        })
        .collect()
}

/// Find the login shell for `uid` in `passwd(5)` content.
pub fn parse_login_shell(content: &str, uid: u32) -> Option<String> {
    parse_passwd(content)
        .into_iter()
        .find(|entry| entry.uid == uid)
        .map(|entry| entry.shell)
        .filter(|shell| !shell.is_empty())
}
