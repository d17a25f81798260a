//! Multimedia codecs and applications.

use super::packages::{all_installed, codecs};
use crate::config::Settings;
use crate::host::Privilege;
use crate::steps::{Action, Guard, Step};

/// Replace the stripped-down ffmpeg and install full codec support.
pub fn codecs() -> Step {
    Step::optional(
        "codecs",
        "Install multimedia codecs",
        "Install multimedia codecs?",
        vec![
            Action::best_effort("Swap ffmpeg-free for ffmpeg", |ctx| {
                ctx.run(
                    "dnf swap -y ffmpeg-free ffmpeg --allowerasing",
                    Privilege::Root,
                )
                .map(|_| ())
            })
            .guarded_by(Guard::package_installed("ffmpeg")),
            Action::best_effort("Update the multimedia group", |ctx| {
                ctx.run(
                    "dnf update -y @multimedia --setopt=install_weak_deps=False --exclude=PackageKit-gstreamer-plugin",
                    Privilege::Root,
                )
                .map(|_| ())
            }),
            Action::best_effort("Install GStreamer plugins", |ctx| {
                ctx.install_packages(codecs::GSTREAMER)
            })
            .guarded_by(all_installed(codecs::GSTREAMER)),
        ],
    )
}

/// Install the configured applications, one guarded action per package.
pub fn applications(settings: &Settings) -> Step {
    let actions = settings
        .applications
        .iter()
        .map(|package| {
            let name = package.clone();
            Action::best_effort(format!("Install {}", package), move |ctx| {
                ctx.install_packages(&[name.as_str()])
            })
            .guarded_by(Guard::package_installed(package.clone()))
        })
        .collect();

    Step::optional(
        "applications",
        "Install applications",
        format!(
            "Install applications ({})?",
            settings.applications.join(", ")
        ),
        actions,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::StepBody;

    #[test]
    fn applications_are_guarded_individually() {
        let settings = Settings {
            applications: vec!["git".into(), "vlc".into()],
            ..Default::default()
        };
        let step = applications(&settings);
        let StepBody::Actions(actions) = step.body() else {
            panic!("expected actions");
        };

        assert_eq!(actions.len(), 2);
        assert_eq!(
            actions[1].guard().unwrap().description(),
            "vlc is already installed"
        );
        assert_eq!(step.gate(), Some("Install applications (git, vlc)?"));
    }

    #[test]
    fn codecs_step_is_optional() {
        let step = codecs();
        assert!(!step.is_required());
    }
}
