//! Third-party repositories: RPM Fusion and Flathub.

use super::packages::rpmfusion;
use crate::config::Settings;
use crate::error::SettleError;
use crate::host::Privilege;
use crate::shell::quote;
use crate::steps::{Action, Guard, Step};

const FLATHUB_URL: &str = "https://dl.flathub.org/repo/flathub.flatpakrepo";

/// Release RPM URL for an RPM Fusion repository flavour (`free`/`nonfree`).
fn release_url(flavour: &str) -> String {
    format!(
        "https://mirrors.rpmfusion.org/{flavour}/fedora/rpmfusion-{flavour}-release-$(rpm -E %fedora).noarch.rpm"
    )
}

fn enable_rpmfusion(repository: &'static str, flavour: &'static str) -> Action {
    Action::fatal(format!("Enable {}", repository), move |ctx| {
        ctx.run(
            &format!("dnf install -y {}", release_url(flavour)),
            Privilege::Root,
        )
        .map(|_| ())
        .map_err(|e| SettleError::RepositorySetup {
            repository: repository.to_string(),
            message: e.to_string(),
        })
    })
    .guarded_by(Guard::package_installed(repository))
}

/// Enable the RPM Fusion free and nonfree repositories.
///
/// Everything after this step depends on these repositories, so failing to
/// register either one aborts the session.
pub fn rpmfusion() -> Step {
    Step::required(
        "rpmfusion",
        "Enable RPM Fusion repositories",
        vec![
            enable_rpmfusion(rpmfusion::FREE, "free"),
            enable_rpmfusion(rpmfusion::NONFREE, "nonfree"),
            Action::best_effort("Enable the Cisco OpenH264 repository", |ctx| {
                ctx.run(
                    "dnf config-manager setopt fedora-cisco-openh264.enabled=1",
                    Privilege::Root,
                )
                .map(|_| ())
            })
            .guarded_by(Guard::probe(
                "fedora-cisco-openh264 is already enabled",
                "dnf repolist --enabled | grep -q fedora-cisco-openh264",
            )),
        ],
    )
}

/// Add the Flathub remote and install the configured Flatpak apps.
pub fn flathub(settings: &Settings) -> Step {
    let mut actions = vec![Action::best_effort("Add the Flathub remote", |ctx| {
        ctx.run(
            &format!("flatpak remote-add --if-not-exists flathub {}", FLATHUB_URL),
            Privilege::Root,
        )
        .map(|_| ())
    })
    .guarded_by(Guard::probe(
        "Flathub is already configured",
        "flatpak remotes --columns=name | grep -qx flathub",
    ))];

    for app in &settings.flatpaks {
        let id = quote(app);
        actions.push(
            Action::best_effort(format!("Install {} from Flathub", app), {
                let id = id.clone();
                move |ctx| {
                    ctx.run(
                        &format!("flatpak install -y --noninteractive flathub {}", id),
                        Privilege::Root,
                    )
                    .map(|_| ())
                }
            })
            .guarded_by(Guard::probe(
                format!("{} is already installed", app),
                format!("flatpak info {}", id),
            )),
        );
    }

    Step::optional(
        "flathub",
        "Enable Flathub",
        "Enable Flathub and install Flatpak applications?",
        actions,
    )
}
