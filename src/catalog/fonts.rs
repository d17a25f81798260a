//! Font downloads with checksum verification.

use sha2::{Digest, Sha256};
use std::path::PathBuf;

use crate::config::{FontSource, Settings};
use crate::error::{Result, SettleError};
use crate::host::Privilege;
use crate::shell::quote;
use crate::steps::{Action, Guard, Step};

/// Check `bytes` against an expected hex SHA-256.
pub fn verify_sha256(url: &str, bytes: &[u8], expected: &str) -> Result<()> {
    let actual = hex::encode(Sha256::digest(bytes));
    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(SettleError::Download {
            url: url.to_string(),
            message: format!("checksum mismatch: expected {}, got {}", expected, actual),
        })
    }
}

fn install_font(font: &FontSource, dir: PathBuf, settings: &Settings) -> Action {
    let target = dir.join(&font.name);
    let guard = Guard::path_exists(target.clone());
    let font = font.clone();
    let timeout = settings.download_timeout();

    Action::best_effort(format!("Install font {}", font.name), move |ctx| {
        if ctx.dry_run() {
            return ctx.info(format!(
                "Would download {} to {}",
                font.url,
                target.display()
            ));
        }
        let bytes = ctx.fetch(&font.url, timeout)?;
        if let Some(expected) = &font.sha256 {
            verify_sha256(&font.url, &bytes, expected)?;
        }
        ctx.write_file(&target, &bytes)
    })
    .guarded_by(guard)
}

/// Download fonts into the font directory and refresh the font cache.
pub fn fonts(settings: &Settings) -> Step {
    let dir = settings.font_dir();
    let mut actions: Vec<Action> = settings
        .fonts
        .iter()
        .map(|font| install_font(font, dir.clone(), settings))
        .collect();

    let cache_dir = quote(&dir.to_string_lossy());
    actions.push(Action::best_effort("Refresh the font cache", move |ctx| {
        ctx.run(&format!("fc-cache -f {}", cache_dir), Privilege::User)
            .map(|_| ())
    }));

    Step::optional(
        "fonts",
        "Install fonts",
        format!("Install fonts into {}?", dir.display()),
        actions,
    )
}
