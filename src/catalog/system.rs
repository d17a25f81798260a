//! Hostname, system upgrade and login shell.

use crate::config::{validate_hostname, Settings};
use crate::host::Privilege;
use crate::prompts::input;
use crate::steps::{Action, Guard, Step};

/// Set the hostname, asking for one when none is configured.
pub fn hostname(settings: &Settings) -> Step {
    let action = match settings.hostname.clone() {
        Some(target) => {
            let guard = hostname_is(target.clone());
            Action::best_effort(format!("Set hostname to {}", target), move |ctx| {
                ctx.set_hostname(&target)
            })
            .guarded_by(guard)
        }
        None => Action::best_effort("Set hostname", |ctx| {
            let current = ctx.host().hostname()?;
            ctx.info(format!("Current hostname: {}", current))?;
            let name = input(ctx.journal(), "New hostname:", validate_hostname)?;
            if ctx.check_guard(&hostname_is(name.clone())) {
                return Ok(());
            }
            ctx.set_hostname(&name)
        }),
    };

    Step::optional("hostname", "Set hostname", "Set the hostname?", vec![action])
}

fn hostname_is(wanted: String) -> Guard {
    Guard::new(format!("hostname is already set to {}", wanted), move |host| {
        host.hostname().map(|h| h == wanted).unwrap_or(false)
    })
}

/// Upgrade every installed package.
pub fn upgrade() -> Step {
    Step::optional(
        "upgrade",
        "Upgrade system packages",
        "Upgrade all installed packages now?",
        vec![Action::best_effort("Upgrade installed packages", |ctx| {
            ctx.run("dnf upgrade --refresh -y", Privilege::Root)
                .map(|_| ())
        })],
    )
}

/// Install the configured shell and make it the login shell.
pub fn login_shell(settings: &Settings) -> Step {
    let shell = settings.shell.clone();
    let package = settings.shell_package.clone();

    let install = Action::best_effort(format!("Install {}", package), {
        let package = package.clone();
        move |ctx| ctx.install_packages(&[package.as_str()])
    })
    .guarded_by(Guard::package_installed(package));

    let wanted = shell.clone();
    let switch = Action::best_effort(format!("Change login shell to {}", shell), move |ctx| {
        ctx.set_login_shell(&shell)
    })
    .guarded_by(Guard::new(
        format!("login shell is already {}", wanted),
        {
            let wanted = wanted.clone();
            move |host| matches!(host.login_shell(), Ok(Some(current)) if current == wanted)
        },
    ));

    Step::optional(
        "shell",
        "Set default shell",
        format!("Make {} your login shell?", wanted),
        vec![install, switch],
    )
}
